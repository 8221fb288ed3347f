//! Wall and obstacle endpoints.

use axum::extract::State;
use axum::http::StatusCode;
use serde::Deserialize;
use serde_json::{Value, json};
use trowel_core::model::{Obstacle, ObstacleCreate, Validate, Wall, WallCreate, WallUpdate};
use trowel_store::WallQuery;
use trowel_store::walls::DEFAULT_WALL_LIMIT;

use crate::error::{ApiError, FailedTo};
use crate::extract::{Json, Path, Query, check_param};
use crate::state::AppState;

/// Upper bound for `limit` on wall listings.
pub const MAX_WALL_LIMIT: i64 = 1000;

/// Query string of `GET /walls`.
#[derive(Debug, Deserialize)]
pub struct WallListParams {
    #[serde(default)]
    skip: i64,
    #[serde(default = "default_limit")]
    limit: i64,
    #[serde(default)]
    search: Option<String>,
}

fn default_limit() -> i64 {
    DEFAULT_WALL_LIMIT
}

pub(crate) async fn create_wall(
    State(state): State<AppState>,
    Json(payload): Json<WallCreate>,
) -> Result<(StatusCode, Json<Wall>), ApiError> {
    payload.validate()?;
    let wall = state
        .store
        .create_wall(&payload)
        .await
        .failed_to("create wall")?;
    Ok((StatusCode::CREATED, Json(wall)))
}

pub(crate) async fn list_walls(
    State(state): State<AppState>,
    Query(params): Query<WallListParams>,
) -> Result<Json<Vec<Wall>>, ApiError> {
    check_param("skip", params.skip, 0, None)?;
    check_param("limit", params.limit, 1, Some(MAX_WALL_LIMIT))?;
    let query = WallQuery {
        skip: params.skip,
        limit: params.limit,
        search: params.search,
    };
    let walls = state
        .store
        .list_walls(&query)
        .await
        .failed_to("retrieve walls")?;
    Ok(Json(walls))
}

pub(crate) async fn get_wall(
    State(state): State<AppState>,
    Path(wall_id): Path<i64>,
) -> Result<Json<Wall>, ApiError> {
    let wall = state
        .store
        .get_wall(wall_id)
        .await
        .failed_to("retrieve wall")?;
    Ok(Json(wall))
}

pub(crate) async fn update_wall(
    State(state): State<AppState>,
    Path(wall_id): Path<i64>,
    Json(payload): Json<WallUpdate>,
) -> Result<Json<Wall>, ApiError> {
    payload.validate()?;
    let wall = state
        .store
        .update_wall(wall_id, &payload)
        .await
        .failed_to("update wall")?;
    Ok(Json(wall))
}

pub(crate) async fn delete_wall(
    State(state): State<AppState>,
    Path(wall_id): Path<i64>,
) -> Result<Json<Value>, ApiError> {
    state
        .store
        .delete_wall(wall_id)
        .await
        .failed_to("delete wall")?;
    Ok(Json(json!({"message": "Wall deleted successfully"})))
}

pub(crate) async fn create_obstacle(
    State(state): State<AppState>,
    Path(wall_id): Path<i64>,
    Json(payload): Json<ObstacleCreate>,
) -> Result<(StatusCode, Json<Obstacle>), ApiError> {
    payload.validate()?;
    let obstacle = state
        .store
        .create_obstacle(wall_id, &payload)
        .await
        .failed_to("create obstacle")?;
    Ok((StatusCode::CREATED, Json(obstacle)))
}

pub(crate) async fn list_obstacles(
    State(state): State<AppState>,
    Path(wall_id): Path<i64>,
) -> Result<Json<Vec<Obstacle>>, ApiError> {
    let obstacles = state
        .store
        .list_obstacles(wall_id)
        .await
        .failed_to("retrieve obstacles")?;
    Ok(Json(obstacles))
}

pub(crate) async fn delete_obstacle(
    State(state): State<AppState>,
    Path((wall_id, obstacle_id)): Path<(i64, i64)>,
) -> Result<Json<Value>, ApiError> {
    state
        .store
        .delete_obstacle(wall_id, obstacle_id)
        .await
        .failed_to("delete obstacle")?;
    Ok(Json(json!({"message": "Obstacle deleted successfully"})))
}
