//! Planning endpoints.

use axum::extract::State;
use serde::Serialize;
use trowel_core::model::{Algorithm, AlgorithmInfo, PlanningResult, TrajectoryPlanRequest};

use crate::error::{ApiError, FailedTo};
use crate::extract::Json;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub(crate) struct AlgorithmsResponse {
    algorithms: Vec<AlgorithmInfo>,
}

pub(crate) async fn plan_trajectory(
    State(state): State<AppState>,
    Json(request): Json<TrajectoryPlanRequest>,
) -> Result<Json<PlanningResult>, ApiError> {
    let result = state
        .planning
        .plan(&request)
        .await
        .failed_to("plan trajectory")?;
    Ok(Json(result))
}

pub(crate) async fn list_algorithms() -> Json<AlgorithmsResponse> {
    Json(AlgorithmsResponse {
        algorithms: Algorithm::ALL.iter().map(Algorithm::info).collect(),
    })
}
