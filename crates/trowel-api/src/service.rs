//! Planning service: load the wall, plan off the async runtime, persist.

use std::time::Instant;

use chrono::Utc;
use serde_json::json;
use trowel_core::config::PlanningConfig;
use trowel_core::model::{
    PlanningResult, SystemLogEntry, TrajectoryPlanRequest, TrajectoryStatus,
};
use trowel_planner::{Planner, PlanningParameters};
use trowel_store::{NewTrajectory, Store};

use crate::Result;

/// Component name written to `system_logs`.
pub const LOG_COMPONENT: &str = "planner";

/// Plans trajectories for stored walls and stores the result.
#[derive(Debug, Clone)]
pub struct PlanningService {
    store: Store,
    planner: Planner,
    defaults: PlanningConfig,
}

impl PlanningService {
    /// Service over `store`; omitted request values come from `defaults`.
    pub fn new(store: Store, planner: Planner, defaults: PlanningConfig) -> Self {
        Self {
            store,
            planner,
            defaults,
        }
    }

    /// Plans `request`, stores the trajectory with its points and records a
    /// `system_logs` entry.
    pub async fn plan(&self, request: &TrajectoryPlanRequest) -> Result<PlanningResult> {
        let started = Instant::now();
        let started_at = Utc::now();
        let settings = request.resolve(&self.defaults)?;

        let wall = self.store.get_wall(request.wall_id).await?;
        tracing::info!(
            wall_id = wall.id,
            wall = %wall.name,
            width = wall.width,
            height = wall.height,
            obstacles = wall.obstacles.len(),
            algorithm = %settings.algorithm,
            "planning trajectory"
        );

        let params = PlanningParameters::for_wall(&wall, &settings)?;
        let planner = self.planner;
        let algorithm = settings.algorithm;
        let planned =
            tokio::task::spawn_blocking(move || planner.plan(algorithm, &params)).await??;
        let points = planned.trajectory_points();

        let new = NewTrajectory {
            wall_id: wall.id,
            name: Some(format!("{} - {}", algorithm.capitalized(), wall.name)),
            algorithm,
            status: TrajectoryStatus::Completed,
            robot_width: settings.robot_width,
            overlap_percentage: settings.overlap_percentage,
            resolution: settings.resolution,
            total_length: planned.metrics.total_length,
            coverage_percentage: planned.metrics.coverage_percentage,
            execution_time_ms: started.elapsed().as_millis() as i64,
            estimated_duration_minutes: planned.metrics.estimated_duration_minutes,
            started_at: Some(started_at),
            completed_at: Some(Utc::now()),
        };
        let trajectory = self.store.insert_trajectory(&new, &points).await?;
        let execution_time_ms = started.elapsed().as_millis() as i64;

        let mut entry = SystemLogEntry::new(
            "INFO",
            LOG_COMPONENT,
            format!(
                "Planned trajectory {} for wall {}",
                trajectory.id, wall.id
            ),
        );
        entry.execution_time_ms = Some(execution_time_ms);
        entry.context_data = Some(json!({
            "trajectory_id": trajectory.id,
            "wall_id": wall.id,
            "algorithm": algorithm.as_str(),
            "total_points": trajectory.total_points,
            "passes": planned.passes,
        }));
        if let Err(e) = self.store.record_log(&entry).await {
            tracing::warn!(error = %e, trajectory_id = trajectory.id, "could not record planning log");
        }

        tracing::info!(
            trajectory_id = trajectory.id,
            points = trajectory.total_points,
            length_m = trajectory.total_length,
            coverage = trajectory.coverage_percentage,
            execution_time_ms,
            "trajectory planned"
        );

        Ok(PlanningResult {
            trajectory_id: trajectory.id,
            wall_id: wall.id,
            algorithm,
            total_points: trajectory.total_points,
            total_length: trajectory.total_length,
            coverage_percentage: trajectory.coverage_percentage,
            execution_time_ms,
            estimated_duration_minutes: trajectory.estimated_duration_minutes,
            status: trajectory.status,
        })
    }
}
