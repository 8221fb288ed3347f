//! Flat row types as stored in SQLite, and their conversion into the
//! domain model.

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use trowel_core::model::{Obstacle, Trajectory, TrajectoryPoint, Wall};

use crate::{Error, Result};

/// Columns selected for a wall.
pub(crate) const WALL_COLUMNS: &str =
    "id, uuid, name, width, height, origin_x, origin_y, created_at, updated_at";

/// Columns selected for an obstacle.
pub(crate) const OBSTACLE_COLUMNS: &str =
    "id, wall_id, name, obstacle_type, min_x, min_y, max_x, max_y, geometry_data, created_at";

/// Columns selected for a trajectory.
pub(crate) const TRAJECTORY_COLUMNS: &str = "id, uuid, wall_id, name, algorithm, status, \
    robot_width, overlap_percentage, resolution, total_points, total_length, \
    coverage_percentage, execution_time_ms, estimated_duration_minutes, started_at, \
    completed_at, created_at, updated_at";

/// Columns selected for a trajectory point.
pub(crate) const POINT_COLUMNS: &str = "id, sequence_number, x, y, z, orientation, tool_active, \
    feed_rate, motion_type, planned_time";

/// Maps to the `walls` table.
#[derive(Debug, Clone, FromRow)]
pub(crate) struct WallRow {
    pub id: i64,
    pub uuid: String,
    pub name: String,
    pub width: f64,
    pub height: f64,
    pub origin_x: f64,
    pub origin_y: f64,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl WallRow {
    pub(crate) fn into_wall(self, obstacles: Vec<Obstacle>) -> Wall {
        Wall {
            id: self.id,
            uuid: self.uuid,
            name: self.name,
            width: self.width,
            height: self.height,
            origin_x: self.origin_x,
            origin_y: self.origin_y,
            created_at: self.created_at,
            updated_at: self.updated_at,
            obstacles,
        }
    }
}

/// Maps to the `obstacles` table; `geometry_data` is JSON text.
#[derive(Debug, Clone, FromRow)]
pub(crate) struct ObstacleRow {
    pub id: i64,
    pub wall_id: i64,
    pub name: String,
    pub obstacle_type: String,
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
    pub geometry_data: String,
    pub created_at: DateTime<Utc>,
}

impl TryFrom<ObstacleRow> for Obstacle {
    type Error = Error;

    fn try_from(row: ObstacleRow) -> Result<Self> {
        let obstacle_type = row
            .obstacle_type
            .parse()
            .map_err(|e: trowel_core::Error| Error::corrupt("obstacles", row.id, e.to_string()))?;
        let geometry_data = serde_json::from_str(&row.geometry_data)
            .map_err(|e| Error::corrupt("obstacles", row.id, e.to_string()))?;
        Ok(Obstacle {
            id: row.id,
            wall_id: row.wall_id,
            name: row.name,
            obstacle_type,
            geometry_data,
            min_x: row.min_x,
            min_y: row.min_y,
            max_x: row.max_x,
            max_y: row.max_y,
            created_at: row.created_at,
        })
    }
}

/// Maps to the `trajectories` table.
#[derive(Debug, Clone, FromRow)]
pub(crate) struct TrajectoryRow {
    pub id: i64,
    pub uuid: String,
    pub wall_id: i64,
    pub name: Option<String>,
    pub algorithm: String,
    pub status: String,
    pub robot_width: f64,
    pub overlap_percentage: f64,
    pub resolution: f64,
    pub total_points: Option<i64>,
    pub total_length: f64,
    pub coverage_percentage: f64,
    pub execution_time_ms: i64,
    pub estimated_duration_minutes: f64,
    pub started_at: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl TryFrom<TrajectoryRow> for Trajectory {
    type Error = Error;

    fn try_from(row: TrajectoryRow) -> Result<Self> {
        let corrupt = |e: trowel_core::Error| Error::corrupt("trajectories", row.id, e.to_string());
        let algorithm = row.algorithm.parse().map_err(corrupt)?;
        let status = row.status.parse().map_err(corrupt)?;
        Ok(Trajectory {
            id: row.id,
            uuid: row.uuid,
            wall_id: row.wall_id,
            name: row.name,
            algorithm,
            status,
            robot_width: row.robot_width,
            overlap_percentage: row.overlap_percentage,
            resolution: row.resolution,
            total_points: row.total_points.unwrap_or(0),
            total_length: row.total_length,
            coverage_percentage: row.coverage_percentage,
            execution_time_ms: row.execution_time_ms,
            estimated_duration_minutes: row.estimated_duration_minutes,
            started_at: row.started_at,
            completed_at: row.completed_at,
            created_at: row.created_at,
            updated_at: row.updated_at,
            points: Vec::new(),
        })
    }
}

/// Maps to the `trajectory_points` table.
#[derive(Debug, Clone, FromRow)]
pub(crate) struct PointRow {
    pub id: i64,
    pub sequence_number: i64,
    pub x: f64,
    pub y: f64,
    pub z: f64,
    pub orientation: f64,
    pub tool_active: bool,
    pub feed_rate: f64,
    pub motion_type: String,
    pub planned_time: Option<f64>,
}

impl TryFrom<PointRow> for TrajectoryPoint {
    type Error = Error;

    fn try_from(row: PointRow) -> Result<Self> {
        let motion_type = row.motion_type.parse().map_err(|e: trowel_core::Error| {
            Error::corrupt("trajectory_points", row.id, e.to_string())
        })?;
        Ok(TrajectoryPoint {
            sequence_number: row.sequence_number,
            x: row.x,
            y: row.y,
            z: row.z,
            orientation: row.orientation,
            tool_active: row.tool_active,
            motion_type,
            planned_time: row.planned_time,
            feed_rate: row.feed_rate,
        })
    }
}

/// Converts a batch of rows, failing on the first corrupt one.
pub(crate) fn convert_all<R, T>(rows: Vec<R>) -> Result<Vec<T>>
where
    T: TryFrom<R, Error = Error>,
{
    rows.into_iter().map(T::try_from).collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use trowel_core::model::{Algorithm, MotionType, ObstacleType, TrajectoryStatus};

    fn trajectory_row(algorithm: &str) -> TrajectoryRow {
        TrajectoryRow {
            id: 4,
            uuid: "u".to_string(),
            wall_id: 1,
            name: None,
            algorithm: algorithm.to_string(),
            status: "completed".to_string(),
            robot_width: 0.1,
            overlap_percentage: 20.0,
            resolution: 0.01,
            total_points: None,
            total_length: 0.0,
            coverage_percentage: 0.0,
            execution_time_ms: 0,
            estimated_duration_minutes: 0.0,
            started_at: None,
            completed_at: None,
            created_at: Utc::now(),
            updated_at: None,
        }
    }

    #[test]
    fn test_trajectory_row_converts() {
        let trajectory = Trajectory::try_from(trajectory_row("spiral")).unwrap();
        assert_eq!(trajectory.algorithm, Algorithm::Spiral);
        assert_eq!(trajectory.status, TrajectoryStatus::Completed);
        assert_eq!(trajectory.total_points, 0);
    }

    #[test]
    fn test_unknown_algorithm_is_corrupt() {
        let err = Trajectory::try_from(trajectory_row("random")).unwrap_err();
        assert!(matches!(err, Error::Corrupt { id: 4, .. }));
    }

    #[test]
    fn test_obstacle_row_parses_geometry_json() {
        let row = ObstacleRow {
            id: 2,
            wall_id: 1,
            name: "Socket".to_string(),
            obstacle_type: "circle".to_string(),
            min_x: 0.9,
            min_y: 0.9,
            max_x: 1.1,
            max_y: 1.1,
            geometry_data: r#"{"center_x":1.0,"center_y":1.0,"radius":0.1}"#.to_string(),
            created_at: Utc::now(),
        };
        let obstacle = Obstacle::try_from(row).unwrap();
        assert_eq!(obstacle.obstacle_type, ObstacleType::Circle);
        assert_eq!(obstacle.geometry_data["radius"], 0.1);
    }

    #[test]
    fn test_point_row_converts_motion() {
        let row = PointRow {
            id: 1,
            sequence_number: 0,
            x: 0.0,
            y: 0.0,
            z: 0.0,
            orientation: 0.0,
            tool_active: false,
            feed_rate: 100.0,
            motion_type: "rapid".to_string(),
            planned_time: Some(0.0),
        };
        let points: Vec<TrajectoryPoint> = convert_all(vec![row]).unwrap();
        assert_eq!(points[0].motion_type, MotionType::Rapid);
    }
}
