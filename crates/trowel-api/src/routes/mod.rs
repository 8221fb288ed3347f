//! Router assembly.

mod monitoring;
mod pages;
mod planning;
mod trajectories;
mod walls;

use axum::Router;
use axum::middleware::from_fn_with_state;
use axum::routing::get;
use tower_http::services::ServeDir;

use crate::middleware::{compression_layer, cors_layer, request_context};
use crate::state::AppState;

/// Prefix of the versioned API.
pub const API_PREFIX: &str = "/api/v1";

/// Routes under [`API_PREFIX`].
fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/walls", get(walls::list_walls).post(walls::create_wall))
        .route(
            "/walls/{wall_id}",
            get(walls::get_wall)
                .put(walls::update_wall)
                .delete(walls::delete_wall),
        )
        .route(
            "/walls/{wall_id}/obstacles",
            get(walls::list_obstacles).post(walls::create_obstacle),
        )
        .route(
            "/walls/{wall_id}/obstacles/{obstacle_id}",
            axum::routing::delete(walls::delete_obstacle),
        )
        .route("/trajectories", get(trajectories::list_trajectories))
        .route(
            "/trajectories/{trajectory_id}",
            get(trajectories::get_trajectory).delete(trajectories::delete_trajectory),
        )
        .route(
            "/trajectories/{trajectory_id}/points",
            get(trajectories::trajectory_points),
        )
        .route(
            "/trajectories/{trajectory_id}/points-detailed",
            get(trajectories::trajectory_points_detailed),
        )
        .route(
            "/trajectories/{trajectory_id}/stats",
            get(trajectories::trajectory_stats),
        )
        .route("/planning/plan", axum::routing::post(planning::plan_trajectory))
        .route("/planning/algorithms", get(planning::list_algorithms))
        .route("/monitoring/system-status", get(monitoring::system_status))
}

/// The complete application: API, health, landing page, static files and
/// the middleware stack.
pub fn build_router(state: AppState) -> Router {
    let static_files = ServeDir::new(&state.config.server.static_dir);
    Router::new()
        .route("/", get(pages::index))
        .route("/health", get(monitoring::health))
        .nest(API_PREFIX, api_routes())
        .nest_service("/static", static_files)
        .fallback(pages::not_found)
        .layer(from_fn_with_state(state.clone(), request_context))
        .layer(compression_layer())
        .layer(cors_layer(state.config.server.debug))
        .with_state(state)
}
