//! Trajectory browsing endpoints.

use axum::extract::State;
use serde::Deserialize;
use serde_json::{Value, json};
use trowel_core::model::{
    Algorithm, PointSummary, Trajectory, TrajectoryPoint, TrajectoryStats, TrajectoryStatus,
};
use trowel_store::TrajectoryFilter;
use trowel_store::trajectories::DEFAULT_POINT_LIMIT;

use crate::error::{ApiError, FailedTo};
use crate::extract::{Json, Path, Query, check_param};
use crate::routes::walls::MAX_WALL_LIMIT;
use crate::state::AppState;

/// Upper bound for `limit` on point listings.
pub const MAX_POINT_LIMIT: i64 = 10_000;

#[derive(Debug, Deserialize)]
pub(crate) struct TrajectoryListParams {
    #[serde(default)]
    wall_id: Option<i64>,
    #[serde(default)]
    status: Option<TrajectoryStatus>,
    #[serde(default)]
    algorithm: Option<Algorithm>,
    #[serde(default)]
    skip: i64,
    #[serde(default = "default_list_limit")]
    limit: i64,
}

fn default_list_limit() -> i64 {
    TrajectoryFilter::default().limit
}

#[derive(Debug, Deserialize)]
pub(crate) struct DetailParams {
    #[serde(default)]
    include_points: bool,
}

#[derive(Debug, Deserialize)]
pub(crate) struct PointParams {
    #[serde(default)]
    start_sequence: i64,
    #[serde(default = "default_point_limit")]
    limit: i64,
}

fn default_point_limit() -> i64 {
    DEFAULT_POINT_LIMIT
}

impl PointParams {
    fn check(&self) -> Result<(), ApiError> {
        check_param("start_sequence", self.start_sequence, 0, None)?;
        check_param("limit", self.limit, 1, Some(MAX_POINT_LIMIT))
    }
}

pub(crate) async fn list_trajectories(
    State(state): State<AppState>,
    Query(params): Query<TrajectoryListParams>,
) -> Result<Json<Vec<Trajectory>>, ApiError> {
    check_param("skip", params.skip, 0, None)?;
    check_param("limit", params.limit, 1, Some(MAX_WALL_LIMIT))?;
    let filter = TrajectoryFilter {
        wall_id: params.wall_id,
        status: params.status,
        algorithm: params.algorithm,
        skip: params.skip,
        limit: params.limit,
    };
    let trajectories = state
        .store
        .list_trajectories(&filter)
        .await
        .failed_to("retrieve trajectories")?;
    Ok(Json(trajectories))
}

pub(crate) async fn get_trajectory(
    State(state): State<AppState>,
    Path(trajectory_id): Path<i64>,
    Query(params): Query<DetailParams>,
) -> Result<Json<Trajectory>, ApiError> {
    let trajectory = state
        .store
        .get_trajectory(trajectory_id, params.include_points)
        .await
        .failed_to("retrieve trajectory")?;
    Ok(Json(trajectory))
}

pub(crate) async fn trajectory_points(
    State(state): State<AppState>,
    Path(trajectory_id): Path<i64>,
    Query(params): Query<PointParams>,
) -> Result<Json<Vec<PointSummary>>, ApiError> {
    params.check()?;
    let points = state
        .store
        .trajectory_points(trajectory_id, params.start_sequence, params.limit)
        .await
        .failed_to("retrieve trajectory points")?;
    Ok(Json(points.iter().map(PointSummary::from).collect()))
}

pub(crate) async fn trajectory_points_detailed(
    State(state): State<AppState>,
    Path(trajectory_id): Path<i64>,
    Query(params): Query<PointParams>,
) -> Result<Json<Vec<TrajectoryPoint>>, ApiError> {
    params.check()?;
    let points = state
        .store
        .trajectory_points(trajectory_id, params.start_sequence, params.limit)
        .await
        .failed_to("retrieve detailed trajectory points")?;
    Ok(Json(points))
}

pub(crate) async fn trajectory_stats(
    State(state): State<AppState>,
    Path(trajectory_id): Path<i64>,
) -> Result<Json<TrajectoryStats>, ApiError> {
    let stats = state
        .store
        .trajectory_stats(trajectory_id)
        .await
        .failed_to("retrieve trajectory statistics")?;
    Ok(Json(stats))
}

pub(crate) async fn delete_trajectory(
    State(state): State<AppState>,
    Path(trajectory_id): Path<i64>,
) -> Result<Json<Value>, ApiError> {
    state
        .store
        .delete_trajectory(trajectory_id)
        .await
        .failed_to("delete trajectory")?;
    Ok(Json(json!({"message": "Trajectory deleted successfully"})))
}
