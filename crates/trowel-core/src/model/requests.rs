use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::ops::RangeInclusive;

use super::{Algorithm, ObstacleType};
use crate::config::PlanningConfig;
use crate::{Error, Result};

const NAME_LEN: RangeInclusive<usize> = 1..=100;
const DIMENSION_MAX: f64 = 100.0;
const ORIGIN: RangeInclusive<f64> = -1000.0..=1000.0;
const ROBOT_WIDTH_MAX: f64 = 1.0;
const OVERLAP: RangeInclusive<f64> = 0.0..=50.0;
const RESOLUTION_MAX: f64 = 0.1;

/// Field-level checks for incoming payloads.
pub trait Validate {
    /// Returns the first violated constraint.
    fn validate(&self) -> Result<()>;
}

fn check_name(field: &str, name: &str) -> Result<()> {
    let len = name.chars().count();
    if NAME_LEN.contains(&len) {
        Ok(())
    } else {
        Err(Error::validation_field(
            field,
            format!(
                "{field} must be between {} and {} characters",
                NAME_LEN.start(),
                NAME_LEN.end()
            ),
        ))
    }
}

/// `(0, max]`
fn check_positive(field: &str, value: f64, max: f64) -> Result<()> {
    if value.is_finite() && value > 0.0 && value <= max {
        Ok(())
    } else {
        Err(Error::validation_field(
            field,
            format!("{field} must be greater than 0 and at most {max}"),
        ))
    }
}

fn check_range(field: &str, value: f64, range: &RangeInclusive<f64>) -> Result<()> {
    if range.contains(&value) {
        Ok(())
    } else {
        Err(Error::validation_field(
            field,
            format!(
                "{field} must be between {} and {}",
                range.start(),
                range.end()
            ),
        ))
    }
}

/// Payload for `POST /walls`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WallCreate {
    /// 1 to 100 characters
    pub name: String,
    /// Metres, `(0, 100]`
    pub width: f64,
    /// Metres, `(0, 100]`
    pub height: f64,
    /// `[-1000, 1000]`
    #[serde(default)]
    pub origin_x: f64,
    /// `[-1000, 1000]`
    #[serde(default)]
    pub origin_y: f64,
}

impl Validate for WallCreate {
    fn validate(&self) -> Result<()> {
        check_name("name", &self.name)?;
        check_positive("width", self.width, DIMENSION_MAX)?;
        check_positive("height", self.height, DIMENSION_MAX)?;
        check_range("origin_x", self.origin_x, &ORIGIN)?;
        check_range("origin_y", self.origin_y, &ORIGIN)
    }
}

/// Payload for `PUT /walls/{id}`; absent fields are left unchanged.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WallUpdate {
    /// New name
    #[serde(default)]
    pub name: Option<String>,
    /// New width
    #[serde(default)]
    pub width: Option<f64>,
    /// New height
    #[serde(default)]
    pub height: Option<f64>,
    /// New origin x
    #[serde(default)]
    pub origin_x: Option<f64>,
    /// New origin y
    #[serde(default)]
    pub origin_y: Option<f64>,
}

impl WallUpdate {
    /// Whether the payload changes anything.
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.width.is_none()
            && self.height.is_none()
            && self.origin_x.is_none()
            && self.origin_y.is_none()
    }
}

impl Validate for WallUpdate {
    fn validate(&self) -> Result<()> {
        if let Some(name) = &self.name {
            check_name("name", name)?;
        }
        if let Some(width) = self.width {
            check_positive("width", width, DIMENSION_MAX)?;
        }
        if let Some(height) = self.height {
            check_positive("height", height, DIMENSION_MAX)?;
        }
        if let Some(x) = self.origin_x {
            check_range("origin_x", x, &ORIGIN)?;
        }
        if let Some(y) = self.origin_y {
            check_range("origin_y", y, &ORIGIN)?;
        }
        Ok(())
    }
}

/// Payload for `POST /walls/{id}/obstacles`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObstacleCreate {
    /// 1 to 100 characters
    pub name: String,
    /// Defaults to rectangle
    #[serde(default)]
    pub obstacle_type: ObstacleType,
    /// Shape payload, see [`crate::geometry::ObstacleShape::parse`]
    pub geometry_data: Value,
}

impl Validate for ObstacleCreate {
    fn validate(&self) -> Result<()> {
        check_name("name", &self.name)
    }
}

/// Payload for `POST /planning/plan`.
///
/// Omitted tuning values fall back to the `[planning]` configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrajectoryPlanRequest {
    /// Wall to plan
    pub wall_id: i64,
    /// Coverage pattern
    #[serde(default)]
    pub algorithm: Algorithm,
    /// Tool width in metres, `(0, 1]`
    #[serde(default)]
    pub robot_width: Option<f64>,
    /// Pass overlap in percent, `[0, 50]`
    #[serde(default)]
    pub overlap_percentage: Option<f64>,
    /// Sampling step in metres, `(0, 0.1]`
    #[serde(default)]
    pub resolution: Option<f64>,
}

/// Fully resolved planning inputs.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlanSettings {
    /// Coverage pattern
    pub algorithm: Algorithm,
    /// Tool width in metres
    pub robot_width: f64,
    /// Pass overlap in percent
    pub overlap_percentage: f64,
    /// Sampling step in metres
    pub resolution: f64,
}

impl TrajectoryPlanRequest {
    /// Request for `wall_id` with every tuning value left to the defaults.
    pub fn for_wall(wall_id: i64, algorithm: Algorithm) -> Self {
        Self {
            wall_id,
            algorithm,
            robot_width: None,
            overlap_percentage: None,
            resolution: None,
        }
    }

    /// Fills omitted values from `defaults` and validates the result.
    pub fn resolve(&self, defaults: &PlanningConfig) -> Result<PlanSettings> {
        let settings = PlanSettings {
            algorithm: self.algorithm,
            robot_width: self.robot_width.unwrap_or(defaults.robot_width_m()),
            overlap_percentage: self
                .overlap_percentage
                .unwrap_or(defaults.overlap_percentage),
            resolution: self.resolution.unwrap_or(defaults.resolution_m()),
        };
        check_positive("robot_width", settings.robot_width, ROBOT_WIDTH_MAX)?;
        check_range("overlap_percentage", settings.overlap_percentage, &OVERLAP)?;
        check_positive("resolution", settings.resolution, RESOLUTION_MAX)?;
        Ok(settings)
    }
}
