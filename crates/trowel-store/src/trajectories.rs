//! Trajectory and trajectory point operations.

use chrono::{DateTime, Utc};
use sqlx::{QueryBuilder, Sqlite};
use trowel_core::model::{
    Algorithm, Trajectory, TrajectoryPoint, TrajectoryStats, TrajectoryStatus,
};
use uuid::Uuid;

use crate::rows::{POINT_COLUMNS, PointRow, TRAJECTORY_COLUMNS, TrajectoryRow, convert_all};
use crate::{Error, Result, Store};

/// Points written per INSERT statement.
pub const POINT_BATCH_SIZE: usize = 1000;

/// Default page size for point listings.
pub const DEFAULT_POINT_LIMIT: i64 = 1000;

/// A trajectory about to be stored; `total_points` comes from the points.
#[derive(Debug, Clone, PartialEq)]
pub struct NewTrajectory {
    /// Wall the path covers
    pub wall_id: i64,
    /// Display name
    pub name: Option<String>,
    /// Pattern used
    pub algorithm: Algorithm,
    /// Lifecycle status
    pub status: TrajectoryStatus,
    /// Tool width
    pub robot_width: f64,
    /// Pass overlap
    pub overlap_percentage: f64,
    /// Sampling step
    pub resolution: f64,
    /// Path length
    pub total_length: f64,
    /// Coverage
    pub coverage_percentage: f64,
    /// Planning time
    pub execution_time_ms: i64,
    /// Duration estimate
    pub estimated_duration_minutes: f64,
    /// When planning started
    pub started_at: Option<DateTime<Utc>>,
    /// When planning finished
    pub completed_at: Option<DateTime<Utc>>,
}

/// Filters and paging for [`Store::list_trajectories`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrajectoryFilter {
    /// Only trajectories of this wall
    pub wall_id: Option<i64>,
    /// Only this status
    pub status: Option<TrajectoryStatus>,
    /// Only this pattern
    pub algorithm: Option<Algorithm>,
    /// Rows to skip
    pub skip: i64,
    /// Maximum rows returned
    pub limit: i64,
}

impl Default for TrajectoryFilter {
    fn default() -> Self {
        Self {
            wall_id: None,
            status: None,
            algorithm: None,
            skip: 0,
            limit: 100,
        }
    }
}

impl Store {
    /// Stores the trajectory and all of its points in one transaction.
    ///
    /// Points are renumbered by position so sequence numbers always run
    /// `0..n`.
    pub async fn insert_trajectory(
        &self,
        new: &NewTrajectory,
        points: &[TrajectoryPoint],
    ) -> Result<Trajectory> {
        let mut tx = self.pool().begin().await?;

        let row: TrajectoryRow = sqlx::query_as(&format!(
            "INSERT INTO trajectories
                (uuid, wall_id, name, algorithm, status, robot_width, overlap_percentage,
                 resolution, total_points, total_length, coverage_percentage, execution_time_ms,
                 estimated_duration_minutes, started_at, completed_at, created_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
             RETURNING {TRAJECTORY_COLUMNS}"
        ))
        .bind(Uuid::new_v4().to_string())
        .bind(new.wall_id)
        .bind(new.name.as_deref())
        .bind(new.algorithm.as_str())
        .bind(new.status.as_str())
        .bind(new.robot_width)
        .bind(new.overlap_percentage)
        .bind(new.resolution)
        .bind(points.len() as i64)
        .bind(new.total_length)
        .bind(new.coverage_percentage)
        .bind(new.execution_time_ms)
        .bind(new.estimated_duration_minutes)
        .bind(new.started_at)
        .bind(new.completed_at)
        .bind(Utc::now())
        .fetch_one(&mut *tx)
        .await?;

        for (batch_index, batch) in points.chunks(POINT_BATCH_SIZE).enumerate() {
            let offset = batch_index * POINT_BATCH_SIZE;
            let mut builder: QueryBuilder<Sqlite> = QueryBuilder::new(
                "INSERT INTO trajectory_points (trajectory_id, sequence_number, x, y, z, \
                 orientation, tool_active, feed_rate, motion_type, planned_time) ",
            );
            builder.push_values(batch.iter().enumerate(), |mut b, (i, p)| {
                b.push_bind(row.id)
                    .push_bind((offset + i) as i64)
                    .push_bind(p.x)
                    .push_bind(p.y)
                    .push_bind(p.z)
                    .push_bind(p.orientation)
                    .push_bind(p.tool_active)
                    .push_bind(p.feed_rate)
                    .push_bind(p.motion_type.as_str())
                    .push_bind(p.planned_time);
            });
            builder.build().execute(&mut *tx).await?;
        }

        tx.commit().await?;
        tracing::info!(
            trajectory_id = row.id,
            wall_id = new.wall_id,
            points = points.len(),
            "trajectory stored"
        );
        Trajectory::try_from(row)
    }

    /// Trajectories newest first, without points.
    pub async fn list_trajectories(&self, filter: &TrajectoryFilter) -> Result<Vec<Trajectory>> {
        let mut builder: QueryBuilder<Sqlite> =
            QueryBuilder::new(format!("SELECT {TRAJECTORY_COLUMNS} FROM trajectories WHERE 1 = 1"));
        if let Some(wall_id) = filter.wall_id {
            builder.push(" AND wall_id = ").push_bind(wall_id);
        }
        if let Some(status) = filter.status {
            builder.push(" AND status = ").push_bind(status.as_str());
        }
        if let Some(algorithm) = filter.algorithm {
            builder.push(" AND algorithm = ").push_bind(algorithm.as_str());
        }
        builder
            .push(" ORDER BY created_at DESC, id DESC LIMIT ")
            .push_bind(filter.limit)
            .push(" OFFSET ")
            .push_bind(filter.skip);

        let rows: Vec<TrajectoryRow> = builder.build_query_as().fetch_all(self.pool()).await?;
        convert_all(rows)
    }

    /// One trajectory, optionally with every point.
    pub async fn get_trajectory(&self, trajectory_id: i64, include_points: bool) -> Result<Trajectory> {
        let mut trajectory = Trajectory::try_from(self.trajectory_row(trajectory_id).await?)?;
        if include_points {
            trajectory.points = self.all_points(trajectory_id).await?;
        }
        Ok(trajectory)
    }

    /// Up to `limit` points with `sequence_number >= start_sequence`, in order.
    pub async fn trajectory_points(
        &self,
        trajectory_id: i64,
        start_sequence: i64,
        limit: i64,
    ) -> Result<Vec<TrajectoryPoint>> {
        self.trajectory_row(trajectory_id).await?;
        let rows: Vec<PointRow> = sqlx::query_as(&format!(
            "SELECT {POINT_COLUMNS} FROM trajectory_points
             WHERE trajectory_id = ? AND sequence_number >= ?
             ORDER BY sequence_number
             LIMIT ?"
        ))
        .bind(trajectory_id)
        .bind(start_sequence)
        .bind(limit)
        .fetch_all(self.pool())
        .await?;
        convert_all(rows)
    }

    /// Counts and lengths recomputed from the stored points.
    pub async fn trajectory_stats(&self, trajectory_id: i64) -> Result<TrajectoryStats> {
        let trajectory = Trajectory::try_from(self.trajectory_row(trajectory_id).await?)?;
        let points = self.all_points(trajectory_id).await?;
        Ok(TrajectoryStats::compute(&trajectory, &points))
    }

    /// Deletes a trajectory and its points.
    pub async fn delete_trajectory(&self, trajectory_id: i64) -> Result<()> {
        let result = sqlx::query("DELETE FROM trajectories WHERE id = ?")
            .bind(trajectory_id)
            .execute(self.pool())
            .await?;
        if result.rows_affected() == 0 {
            return Err(Error::not_found("Trajectory", trajectory_id));
        }
        tracing::info!(trajectory_id, "trajectory deleted");
        Ok(())
    }

    async fn trajectory_row(&self, trajectory_id: i64) -> Result<TrajectoryRow> {
        sqlx::query_as(&format!(
            "SELECT {TRAJECTORY_COLUMNS} FROM trajectories WHERE id = ?"
        ))
        .bind(trajectory_id)
        .fetch_optional(self.pool())
        .await?
        .ok_or_else(|| Error::not_found("Trajectory", trajectory_id))
    }

    async fn all_points(&self, trajectory_id: i64) -> Result<Vec<TrajectoryPoint>> {
        let rows: Vec<PointRow> = sqlx::query_as(&format!(
            "SELECT {POINT_COLUMNS} FROM trajectory_points
             WHERE trajectory_id = ?
             ORDER BY sequence_number"
        ))
        .bind(trajectory_id)
        .fetch_all(self.pool())
        .await?;
        convert_all(rows)
    }
}
