//! Planner inputs and the path point type patterns emit.

use serde::{Deserialize, Serialize};
use trowel_core::geometry::ObstacleShape;
use trowel_core::model::{MotionType, PlanSettings, TrajectoryPoint, Wall};

use crate::{Error, Result};

/// Feed rate stamped on every generated point.
pub const DEFAULT_FEED_RATE: f64 = 100.0;

/// Seconds between consecutive points in the planned timeline.
pub const POINT_INTERVAL_SECS: f64 = 0.1;

/// A waypoint produced by the planner.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PathPoint {
    /// Horizontal position on the wall
    pub x: f64,
    /// Vertical position on the wall
    pub y: f64,
    /// Tool offset
    pub z: f64,
    /// Heading in radians
    pub orientation: f64,
    /// Tool engaged when arriving here
    pub tool_active: bool,
    /// Motion used to reach this point
    pub motion_type: MotionType,
    /// Feed rate
    pub feed_rate: f64,
}

impl PathPoint {
    /// Cutting point at `(x, y)` heading `orientation`.
    pub fn cutting(x: f64, y: f64, orientation: f64) -> Self {
        Self {
            x,
            y,
            z: 0.0,
            orientation,
            tool_active: true,
            motion_type: MotionType::Linear,
            feed_rate: DEFAULT_FEED_RATE,
        }
    }

    /// Tool-off repositioning move to `target`.
    pub fn rapid_to(target: &PathPoint) -> Self {
        Self {
            z: 0.0,
            tool_active: false,
            motion_type: MotionType::Rapid,
            ..*target
        }
    }

    /// Persistable point at position `sequence` of the trajectory.
    pub fn to_trajectory_point(&self, sequence: usize) -> TrajectoryPoint {
        TrajectoryPoint {
            sequence_number: sequence as i64,
            x: self.x,
            y: self.y,
            z: self.z,
            orientation: self.orientation,
            tool_active: self.tool_active,
            motion_type: self.motion_type,
            planned_time: Some(sequence as f64 * POINT_INTERVAL_SECS),
            feed_rate: self.feed_rate,
        }
    }
}

/// One uninterrupted sweep of the tool.
pub type Pass = Vec<PathPoint>;

/// Everything a pattern needs to know about the wall and the tool.
#[derive(Debug, Clone, PartialEq)]
pub struct PlanningParameters {
    /// Tool width in metres
    pub robot_width: f64,
    /// Overlap between neighbouring passes, percent
    pub overlap_percentage: f64,
    /// Sampling step along a pass in metres
    pub resolution: f64,
    /// Wall width in metres
    pub wall_width: f64,
    /// Wall height in metres
    pub wall_height: f64,
    /// Shapes the tool must keep clear of
    pub obstacles: Vec<ObstacleShape>,
}

impl PlanningParameters {
    /// Parameters for planning `wall` with `settings`.
    pub fn for_wall(wall: &Wall, settings: &PlanSettings) -> Result<Self> {
        let params = Self {
            robot_width: settings.robot_width,
            overlap_percentage: settings.overlap_percentage,
            resolution: settings.resolution,
            wall_width: wall.width,
            wall_height: wall.height,
            obstacles: wall.obstacle_shapes()?,
        };
        params.validate()?;
        Ok(params)
    }

    /// Checks that the parameters describe a plannable problem.
    pub fn validate(&self) -> Result<()> {
        let all_finite = [
            self.robot_width,
            self.overlap_percentage,
            self.resolution,
            self.wall_width,
            self.wall_height,
        ]
        .iter()
        .all(|v| v.is_finite());
        if !all_finite {
            return Err(Error::invalid("parameters must be finite numbers"));
        }
        if self.robot_width <= 0.0 {
            return Err(Error::invalid("robot_width must be positive"));
        }
        if self.effective_width() <= 0.0 {
            return Err(Error::invalid(format!(
                "overlap of {}% leaves no effective width",
                self.overlap_percentage
            )));
        }
        if self.resolution <= 0.0 {
            return Err(Error::invalid("resolution must be positive"));
        }
        if self.wall_width <= 0.0 || self.wall_height <= 0.0 {
            return Err(Error::invalid("wall dimensions must be positive"));
        }
        Ok(())
    }

    /// Distance between neighbouring passes.
    pub fn effective_width(&self) -> f64 {
        self.robot_width * (1.0 - self.overlap_percentage / 100.0)
    }

    /// Half the tool width: the inset from the wall edge and the obstacle clearance.
    pub fn half_width(&self) -> f64 {
        self.robot_width / 2.0
    }

    /// Whether `(x, y)` keeps the tool clear of every obstacle.
    pub fn is_free(&self, x: f64, y: f64) -> bool {
        let clearance = self.half_width();
        !self.obstacles.iter().any(|o| o.blocks(x, y, clearance))
    }

    /// Whether the whole tool stays on the wall when centred on `(x, y)`.
    pub fn within_inset(&self, x: f64, y: f64) -> bool {
        let h = self.half_width();
        (h..=self.wall_width - h).contains(&x) && (h..=self.wall_height - h).contains(&y)
    }

    /// Upper estimate of the samples a pattern takes: one per `resolution`
    /// across the wall, on every sweep line `effective_width` apart.
    pub fn estimated_samples(&self) -> f64 {
        (self.wall_width / self.resolution).ceil() * (self.wall_height / self.effective_width()).ceil()
    }

    /// Wall area minus the area of every obstacle.
    pub fn effective_area(&self) -> f64 {
        self.wall_width * self.wall_height - self.obstacles.iter().map(|o| o.area()).sum::<f64>()
    }
}
