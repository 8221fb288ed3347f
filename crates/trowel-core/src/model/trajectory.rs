use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{Algorithm, MotionType, TrajectoryStatus};
use crate::geometry::distance3;

/// A planned tool path for one wall.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trajectory {
    /// Database id
    pub id: i64,
    /// Stable external identifier
    pub uuid: String,
    /// Wall the path covers
    pub wall_id: i64,
    /// Display name, `"<Algorithm> - <wall name>"` when planned by Trowel
    pub name: Option<String>,
    /// Coverage pattern
    pub algorithm: Algorithm,
    /// Lifecycle status
    pub status: TrajectoryStatus,
    /// Tool width in metres
    pub robot_width: f64,
    /// Overlap between neighbouring passes, percent
    pub overlap_percentage: f64,
    /// Sampling step along a pass in metres
    pub resolution: f64,
    /// Number of stored points
    pub total_points: i64,
    /// Path length including rapid moves, metres
    pub total_length: f64,
    /// Estimated share of the free wall surface covered, percent
    pub coverage_percentage: f64,
    /// Planning time in milliseconds
    pub execution_time_ms: i64,
    /// Estimated finishing time in minutes
    pub estimated_duration_minutes: f64,
    /// When planning started
    pub started_at: Option<DateTime<Utc>>,
    /// When planning finished
    pub completed_at: Option<DateTime<Utc>>,
    /// Creation time
    pub created_at: DateTime<Utc>,
    /// Last modification time
    pub updated_at: Option<DateTime<Utc>>,
    /// Points, only populated on request
    #[serde(default)]
    pub points: Vec<TrajectoryPoint>,
}

/// One waypoint of a trajectory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrajectoryPoint {
    /// Position in the trajectory, starting at 0
    pub sequence_number: i64,
    /// Horizontal position on the wall
    pub x: f64,
    /// Vertical position on the wall
    pub y: f64,
    /// Tool offset from the wall surface
    pub z: f64,
    /// Heading in radians
    pub orientation: f64,
    /// Whether the tool is engaged when arriving at this point
    pub tool_active: bool,
    /// Motion used to reach this point
    pub motion_type: MotionType,
    /// Planned arrival time in seconds from the start
    pub planned_time: Option<f64>,
    /// Feed rate
    pub feed_rate: f64,
}

/// Compact point form used by the visualisation endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PointSummary {
    /// Horizontal position
    pub x: f64,
    /// Vertical position
    pub y: f64,
    /// Tool offset
    pub z: f64,
    /// Tool engaged
    pub tool_active: bool,
}

impl From<&TrajectoryPoint> for PointSummary {
    fn from(p: &TrajectoryPoint) -> Self {
        Self {
            x: p.x,
            y: p.y,
            z: p.z,
            tool_active: p.tool_active,
        }
    }
}

/// Summary returned after planning a trajectory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanningResult {
    /// Id of the stored trajectory
    pub trajectory_id: i64,
    /// Wall that was planned
    pub wall_id: i64,
    /// Pattern used
    pub algorithm: Algorithm,
    /// Number of points
    pub total_points: i64,
    /// Path length in metres
    pub total_length: f64,
    /// Coverage in percent
    pub coverage_percentage: f64,
    /// Planning plus persistence time in milliseconds
    pub execution_time_ms: i64,
    /// Estimated finishing time in minutes
    pub estimated_duration_minutes: f64,
    /// Status of the stored trajectory
    pub status: TrajectoryStatus,
}

/// Statistics recomputed from the stored points of a trajectory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrajectoryStats {
    /// Trajectory id
    pub trajectory_id: i64,
    /// Pattern used
    pub algorithm: Algorithm,
    /// All points
    pub total_points: i64,
    /// Points reached with the tool engaged
    pub cutting_points: i64,
    /// Points reached with the tool off
    pub rapid_points: i64,
    /// Length of every segment
    pub total_length: f64,
    /// Length of segments ending in a cutting point
    pub cutting_length: f64,
    /// Length of segments ending in a rapid point
    pub rapid_length: f64,
    /// Coverage recorded at planning time
    pub coverage_percentage: f64,
    /// Planning time recorded at planning time
    pub execution_time_ms: i64,
    /// Duration estimate recorded at planning time
    pub estimated_duration_minutes: f64,
    /// Tool width
    pub robot_width: f64,
    /// Pass overlap
    pub overlap_percentage: f64,
    /// Sampling step
    pub resolution: f64,
}

impl TrajectoryStats {
    /// Recomputes point counts and lengths from `points`, which must be in
    /// sequence order.
    pub fn compute(trajectory: &Trajectory, points: &[TrajectoryPoint]) -> Self {
        let cutting_points = points.iter().filter(|p| p.tool_active).count() as i64;
        let total_points = points.len() as i64;

        let (mut total_length, mut cutting_length, mut rapid_length) = (0.0, 0.0, 0.0);
        for pair in points.windows(2) {
            let (prev, curr) = (&pair[0], &pair[1]);
            let d = distance3([prev.x, prev.y, prev.z], [curr.x, curr.y, curr.z]);
            total_length += d;
            if curr.tool_active {
                cutting_length += d;
            } else {
                rapid_length += d;
            }
        }

        Self {
            trajectory_id: trajectory.id,
            algorithm: trajectory.algorithm,
            total_points,
            cutting_points,
            rapid_points: total_points - cutting_points,
            total_length,
            cutting_length,
            rapid_length,
            coverage_percentage: trajectory.coverage_percentage,
            execution_time_ms: trajectory.execution_time_ms,
            estimated_duration_minutes: trajectory.estimated_duration_minutes,
            robot_width: trajectory.robot_width,
            overlap_percentage: trajectory.overlap_percentage,
            resolution: trajectory.resolution,
        }
    }
}

/// A row of the `system_logs` table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SystemLogEntry {
    /// Severity (`INFO`, `ERROR`, ...)
    pub level: String,
    /// Subsystem that wrote the entry
    pub component: Option<String>,
    /// Message text
    pub message: String,
    /// Request that triggered the entry
    pub request_id: Option<String>,
    /// Endpoint that triggered the entry
    pub endpoint: Option<String>,
    /// Duration of the logged operation
    pub execution_time_ms: Option<i64>,
    /// Extra JSON context
    pub context_data: Option<serde_json::Value>,
}

impl SystemLogEntry {
    /// Entry with only level, component and message set.
    pub fn new(level: &str, component: &str, message: impl Into<String>) -> Self {
        Self {
            level: level.to_string(),
            component: Some(component.to_string()),
            message: message.into(),
            request_id: None,
            endpoint: None,
            execution_time_ms: None,
            context_data: None,
        }
    }
}
