//! The [`Store`] handle and its housekeeping operations.

use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;
use trowel_core::config::DatabaseConfig;

use crate::{Result, pool, schema};

/// Row counts per table.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreCounts {
    /// Walls
    pub walls: i64,
    /// Obstacles
    pub obstacles: i64,
    /// Trajectories
    pub trajectories: i64,
    /// Trajectory points
    pub trajectory_points: i64,
    /// System log rows
    pub system_logs: i64,
}

/// Cloneable handle over the SQLite pool.
#[derive(Debug, Clone)]
pub struct Store {
    pool: SqlitePool,
}

impl Store {
    /// Wraps an existing pool.
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Opens a pool for `config`. Does not touch the schema.
    pub async fn connect(config: &DatabaseConfig) -> Result<Self> {
        Ok(Self::new(pool::connect(config).await?))
    }

    /// Opens a pool for `config` and makes sure the schema is current.
    pub async fn open(config: &DatabaseConfig) -> Result<Self> {
        let store = Self::connect(config).await?;
        store.init_schema().await?;
        Ok(store)
    }

    /// Underlying pool.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Creates tables and indexes and runs column migrations.
    pub async fn init_schema(&self) -> Result<()> {
        schema::init_schema(&self.pool).await
    }

    /// Round-trips a trivial query.
    pub async fn ping(&self) -> Result<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    /// Row counts for the monitoring endpoint.
    pub async fn counts(&self) -> Result<StoreCounts> {
        let (walls, obstacles, trajectories, trajectory_points, system_logs): (
            i64,
            i64,
            i64,
            i64,
            i64,
        ) = sqlx::query_as(
            "SELECT
                (SELECT COUNT(*) FROM walls),
                (SELECT COUNT(*) FROM obstacles),
                (SELECT COUNT(*) FROM trajectories),
                (SELECT COUNT(*) FROM trajectory_points),
                (SELECT COUNT(*) FROM system_logs)",
        )
        .fetch_one(&self.pool)
        .await?;
        Ok(StoreCounts {
            walls,
            obstacles,
            trajectories,
            trajectory_points,
            system_logs,
        })
    }

    /// Closes every pooled connection.
    pub async fn close(&self) {
        self.pool.close().await;
        tracing::info!("database connections closed");
    }
}
