//! Health and system status.

use axum::extract::State;
use serde_json::{Value, json};
use trowel_core::lifecycle::ServiceState;

use crate::error::unix_timestamp;
use crate::extract::Json;
use crate::state::{AppState, SERVICE_NAME};

pub(crate) async fn health() -> Json<Value> {
    Json(json!({
        "status": "healthy",
        "timestamp": unix_timestamp(),
        "version": env!("CARGO_PKG_VERSION"),
        "service": SERVICE_NAME,
    }))
}

pub(crate) async fn system_status(State(state): State<AppState>) -> Json<Value> {
    let lifecycle = state.lifecycle.state();
    let (database, counts) = match state.store.counts().await {
        Ok(counts) => ("connected", json!(counts)),
        Err(e) => {
            tracing::warn!(error = %e, "database status check failed");
            ("unavailable", Value::Null)
        }
    };
    let status = match (&lifecycle, database) {
        (ServiceState::Ready, "connected") => "healthy",
        (ServiceState::Ready, _) => "degraded",
        (other, _) => other.label(),
    };

    Json(json!({
        "status": status,
        "timestamp": unix_timestamp(),
        "system": {
            "service": SERVICE_NAME,
            "version": env!("CARGO_PKG_VERSION"),
            "lifecycle": lifecycle.to_string(),
            "database": database,
            "counts": counts,
            "debug": state.config.server.debug,
        },
        "process": {
            "pid": std::process::id(),
            "uptime_seconds": state.lifecycle.uptime().as_secs_f64(),
            "max_trajectory_points": state.config.planning.max_trajectory_points,
        },
    }))
}
