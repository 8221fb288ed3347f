//! Common test utilities and harness for trowel-store integration tests.

#![allow(dead_code, clippy::unwrap_used)]

use serde_json::json;
use trowel_core::config::DatabaseConfig;
use trowel_core::model::{
    Algorithm, MotionType, ObstacleCreate, ObstacleType, TrajectoryPoint, TrajectoryStatus, Wall,
    WallCreate,
};
use trowel_store::{NewTrajectory, Store};

/// Test harness owning an initialised in-memory store.
pub struct TestHarness {
    /// Store with the schema applied
    pub store: Store,
}

impl TestHarness {
    /// Fresh in-memory database with the schema applied.
    pub async fn new() -> Self {
        let config = DatabaseConfig {
            url: "sqlite::memory:".to_string(),
            ..Default::default()
        };
        Self {
            store: Store::open(&config).await.unwrap(),
        }
    }

    /// Creates a `width` x `height` wall called `name`.
    pub async fn wall(&self, name: &str, width: f64, height: f64) -> Wall {
        self.store
            .create_wall(&WallCreate {
                name: name.to_string(),
                width,
                height,
                origin_x: 0.0,
                origin_y: 0.0,
            })
            .await
            .unwrap()
    }

    /// Adds a rectangular window to `wall_id`.
    pub async fn window(&self, wall_id: i64, cx: f64, cy: f64, size: f64) {
        self.store
            .create_obstacle(wall_id, &rectangle("Window", cx, cy, size))
            .await
            .unwrap();
    }

    /// Stores a trajectory with `n` straight-line points on `wall_id`.
    pub async fn trajectory(&self, wall_id: i64, algorithm: Algorithm, n: usize) -> i64 {
        self.store
            .insert_trajectory(&new_trajectory(wall_id, algorithm), &line_points(n))
            .await
            .unwrap()
            .id
    }
}

/// Rectangular obstacle payload.
pub fn rectangle(name: &str, cx: f64, cy: f64, size: f64) -> ObstacleCreate {
    ObstacleCreate {
        name: name.to_string(),
        obstacle_type: ObstacleType::Rectangle,
        geometry_data: json!({"center_x": cx, "center_y": cy, "width": size, "height": size}),
    }
}

/// Trajectory header with plausible metrics.
pub fn new_trajectory(wall_id: i64, algorithm: Algorithm) -> NewTrajectory {
    NewTrajectory {
        wall_id,
        name: Some(format!("{} - Test Wall", algorithm.capitalized())),
        algorithm,
        status: TrajectoryStatus::Completed,
        robot_width: 0.1,
        overlap_percentage: 20.0,
        resolution: 0.01,
        total_length: 12.5,
        coverage_percentage: 48.0,
        execution_time_ms: 15,
        estimated_duration_minutes: 125.0,
        started_at: None,
        completed_at: None,
    }
}

/// `n` points along y = 0.05 spaced 1 cm apart, every tenth a rapid move.
pub fn line_points(n: usize) -> Vec<TrajectoryPoint> {
    (0..n)
        .map(|i| {
            let rapid = i > 0 && i % 10 == 0;
            TrajectoryPoint {
                sequence_number: i as i64,
                x: 0.05 + i as f64 * 0.01,
                y: 0.05,
                z: 0.0,
                orientation: 0.0,
                tool_active: !rapid,
                motion_type: if rapid {
                    MotionType::Rapid
                } else {
                    MotionType::Linear
                },
                planned_time: Some(i as f64 * 0.1),
                feed_rate: 100.0,
            }
        })
        .collect()
}
