//! Tests for the `sample`, `migrate` and `plan` commands against a file
//! database.

#![allow(clippy::unwrap_used)]

use tempfile::TempDir;
use trowel_core::config::TrowelConfig;
use trowel_core::model::{Algorithm, ObstacleType, TrajectoryPlanRequest, TrajectoryStatus};
use trowel_store::Store;

use trowel_cli::commands::{SAMPLE_WALL_SIZE, migrate, plan, seed_sample};

fn config_in(dir: &TempDir) -> TrowelConfig {
    let mut config = TrowelConfig::default();
    config.database.url = format!("sqlite://{}", dir.path().join("trowel.db").display());
    config
}

// ============================================================================
// migrate
// ============================================================================

#[tokio::test]
async fn test_migrate_creates_empty_database() {
    let dir = TempDir::new().unwrap();
    let config = config_in(&dir);

    let counts = migrate(&config).await.unwrap();
    assert_eq!(counts.walls, 0);
    assert!(dir.path().join("trowel.db").exists());

    // Running twice is harmless.
    let again = migrate(&config).await.unwrap();
    assert_eq!(again, counts);
}

// ============================================================================
// sample
// ============================================================================

#[tokio::test]
async fn test_seed_sample_stores_wall_with_window() {
    let dir = TempDir::new().unwrap();
    let config = config_in(&dir);
    let store = Store::open(&config.database).await.unwrap();

    let wall = seed_sample(&store).await.unwrap();
    assert_eq!(wall.name, "Sample Wall");
    assert_eq!(wall.width, SAMPLE_WALL_SIZE);
    assert_eq!(wall.height, SAMPLE_WALL_SIZE);
    assert_eq!(wall.obstacles.len(), 1);
    assert_eq!(wall.obstacles[0].name, "Window");
    assert_eq!(wall.obstacles[0].obstacle_type, ObstacleType::Rectangle);

    store.close().await;
}

// ============================================================================
// plan
// ============================================================================

#[tokio::test]
async fn test_plan_persists_trajectory() {
    let dir = TempDir::new().unwrap();
    let config = config_in(&dir);
    let store = Store::open(&config.database).await.unwrap();
    let wall = seed_sample(&store).await.unwrap();

    let request = TrajectoryPlanRequest {
        resolution: Some(0.05),
        ..TrajectoryPlanRequest::for_wall(wall.id, Algorithm::Spiral)
    };
    let result = plan(&store, &config, &request).await.unwrap();

    assert_eq!(result.wall_id, wall.id);
    assert_eq!(result.algorithm, Algorithm::Spiral);
    assert_eq!(result.status, TrajectoryStatus::Completed);
    assert!(result.total_points > 0);

    let stored = store.get_trajectory(result.trajectory_id, false).await.unwrap();
    assert_eq!(stored.total_points, result.total_points);
    store.close().await;
}

#[tokio::test]
async fn test_plan_unknown_wall_fails() {
    let dir = TempDir::new().unwrap();
    let config = config_in(&dir);
    let store = Store::open(&config.database).await.unwrap();

    let request = TrajectoryPlanRequest::for_wall(404, Algorithm::Boustrophedon);
    let err = plan(&store, &config, &request).await.unwrap_err();
    assert!(format!("{err:#}").contains("Wall not found"));
    store.close().await;
}
