//! Tables, indexes and column migrations.

use sqlx::SqlitePool;

use crate::{Error, Result};

const TABLES: &[&str] = &[
    "CREATE TABLE IF NOT EXISTS walls (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        uuid TEXT NOT NULL UNIQUE,
        name TEXT NOT NULL,
        width REAL NOT NULL,
        height REAL NOT NULL,
        origin_x REAL NOT NULL DEFAULT 0.0,
        origin_y REAL NOT NULL DEFAULT 0.0,
        created_at TEXT NOT NULL,
        updated_at TEXT
    )",
    "CREATE TABLE IF NOT EXISTS obstacles (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        wall_id INTEGER NOT NULL REFERENCES walls(id) ON DELETE CASCADE,
        name TEXT NOT NULL,
        obstacle_type TEXT NOT NULL DEFAULT 'rectangle',
        min_x REAL NOT NULL,
        min_y REAL NOT NULL,
        max_x REAL NOT NULL,
        max_y REAL NOT NULL,
        geometry_data TEXT NOT NULL,
        created_at TEXT NOT NULL
    )",
    "CREATE TABLE IF NOT EXISTS trajectories (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        uuid TEXT NOT NULL UNIQUE,
        wall_id INTEGER NOT NULL REFERENCES walls(id) ON DELETE CASCADE,
        name TEXT,
        algorithm TEXT NOT NULL,
        status TEXT NOT NULL DEFAULT 'completed',
        robot_width REAL NOT NULL,
        overlap_percentage REAL NOT NULL,
        resolution REAL NOT NULL,
        total_points INTEGER DEFAULT 0,
        total_length REAL NOT NULL DEFAULT 0.0,
        coverage_percentage REAL NOT NULL DEFAULT 0.0,
        execution_time_ms INTEGER NOT NULL DEFAULT 0,
        estimated_duration_minutes REAL NOT NULL DEFAULT 0.0,
        started_at TEXT,
        completed_at TEXT,
        created_at TEXT NOT NULL,
        updated_at TEXT
    )",
    "CREATE TABLE IF NOT EXISTS trajectory_points (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        trajectory_id INTEGER NOT NULL REFERENCES trajectories(id) ON DELETE CASCADE,
        sequence_number INTEGER NOT NULL,
        x REAL NOT NULL,
        y REAL NOT NULL,
        z REAL NOT NULL DEFAULT 0.0,
        orientation REAL NOT NULL DEFAULT 0.0,
        tool_active INTEGER NOT NULL DEFAULT 1,
        feed_rate REAL NOT NULL DEFAULT 100.0,
        motion_type TEXT NOT NULL DEFAULT 'linear',
        planned_time REAL,
        actual_time REAL
    )",
    "CREATE TABLE IF NOT EXISTS system_logs (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        timestamp TEXT NOT NULL,
        level TEXT NOT NULL,
        component TEXT,
        message TEXT NOT NULL,
        request_id TEXT,
        endpoint TEXT,
        execution_time_ms INTEGER,
        context_data TEXT
    )",
];

const INDEXES: &[(&str, &str)] = &[
    ("idx_wall_dimensions", "walls(width, height)"),
    ("idx_wall_created", "walls(created_at)"),
    ("idx_obstacle_spatial", "obstacles(min_x, min_y, max_x, max_y)"),
    ("idx_obstacle_wall", "obstacles(wall_id)"),
    ("idx_trajectory_status", "trajectories(status, created_at)"),
    ("idx_trajectory_wall", "trajectories(wall_id)"),
    ("idx_trajectory_algorithm", "trajectories(algorithm)"),
    ("idx_trajectory_point_spatial", "trajectory_points(x, y)"),
    (
        "idx_trajectory_point_sequence",
        "trajectory_points(trajectory_id, sequence_number)",
    ),
    ("idx_log_timestamp", "system_logs(timestamp)"),
    ("idx_log_level", "system_logs(level)"),
];

/// Columns added after the first schema version: `(table, column, definition)`.
const ADDED_COLUMNS: &[(&str, &str, &str)] =
    &[("trajectories", "total_points", "INTEGER DEFAULT 0")];

/// Creates every table and index, runs the column migrations and refreshes
/// the query planner statistics. Safe to run repeatedly.
pub async fn init_schema(pool: &SqlitePool) -> Result<()> {
    let mut tx = pool.begin().await?;
    for ddl in TABLES {
        sqlx::query(ddl).execute(&mut *tx).await?;
    }
    for (name, target) in INDEXES {
        sqlx::query(&format!("CREATE INDEX IF NOT EXISTS {name} ON {target}"))
            .execute(&mut *tx)
            .await?;
    }
    tx.commit().await?;

    let added = run_migrations(pool).await?;
    sqlx::query("ANALYZE").execute(pool).await?;
    tracing::info!(
        tables = TABLES.len(),
        indexes = INDEXES.len(),
        migrated_columns = added,
        "database schema ready"
    );
    Ok(())
}

/// Adds any missing columns; returns how many were added.
pub async fn run_migrations(pool: &SqlitePool) -> Result<usize> {
    let mut added = 0;
    for (table, column, definition) in ADDED_COLUMNS {
        if table_has_column(pool, table, column).await? {
            tracing::debug!(table, column, "column already present");
            continue;
        }
        sqlx::query(&format!("ALTER TABLE {table} ADD COLUMN {column} {definition}"))
            .execute(pool)
            .await
            .map_err(|e| Error::Migration {
                message: format!("adding {table}.{column}: {e}"),
            })?;
        tracing::info!(table, column, "column added");
        added += 1;
    }
    Ok(added)
}

/// Whether `table` has a column called `column`.
pub async fn table_has_column(pool: &SqlitePool, table: &str, column: &str) -> Result<bool> {
    let columns: Vec<(String,)> =
        sqlx::query_as(&format!("SELECT name FROM pragma_table_info('{table}')"))
            .fetch_all(pool)
            .await?;
    Ok(columns.iter().any(|(name,)| name == column))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::pool::connect;
    use trowel_core::config::DatabaseConfig;

    async fn memory_pool() -> SqlitePool {
        connect(&DatabaseConfig {
            url: "sqlite::memory:".to_string(),
            ..Default::default()
        })
        .await
        .unwrap()
    }

    #[tokio::test]
    async fn test_init_schema_is_idempotent() {
        let pool = memory_pool().await;
        init_schema(&pool).await.unwrap();
        init_schema(&pool).await.unwrap();

        let (tables,): (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name IN
             ('walls', 'obstacles', 'trajectories', 'trajectory_points', 'system_logs')",
        )
        .fetch_one(&pool)
        .await
        .unwrap();
        assert_eq!(tables, 5);
    }

    #[tokio::test]
    async fn test_indexes_created() {
        let pool = memory_pool().await;
        init_schema(&pool).await.unwrap();
        let names: Vec<(String,)> =
            sqlx::query_as("SELECT name FROM sqlite_master WHERE type = 'index' AND name LIKE 'idx_%'")
                .fetch_all(&pool)
                .await
                .unwrap();
        assert_eq!(names.len(), INDEXES.len());
    }

    #[tokio::test]
    async fn test_migration_adds_total_points_to_old_table() {
        let pool = memory_pool().await;
        sqlx::query(
            "CREATE TABLE trajectories (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                uuid TEXT NOT NULL UNIQUE,
                wall_id INTEGER NOT NULL,
                name TEXT,
                algorithm TEXT NOT NULL,
                status TEXT NOT NULL DEFAULT 'completed',
                robot_width REAL NOT NULL,
                overlap_percentage REAL NOT NULL,
                resolution REAL NOT NULL,
                total_length REAL NOT NULL DEFAULT 0.0,
                coverage_percentage REAL NOT NULL DEFAULT 0.0,
                execution_time_ms INTEGER NOT NULL DEFAULT 0,
                estimated_duration_minutes REAL NOT NULL DEFAULT 0.0,
                started_at TEXT,
                completed_at TEXT,
                created_at TEXT NOT NULL,
                updated_at TEXT
            )",
        )
        .execute(&pool)
        .await
        .unwrap();
        assert!(!table_has_column(&pool, "trajectories", "total_points").await.unwrap());

        init_schema(&pool).await.unwrap();
        assert!(table_has_column(&pool, "trajectories", "total_points").await.unwrap());
        assert_eq!(run_migrations(&pool).await.unwrap(), 0);
    }
}
