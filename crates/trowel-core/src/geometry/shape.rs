use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::f64::consts::PI;

use super::{Bounds, distance, point_in_polygon, point_segment_distance};
use crate::model::ObstacleType;
use crate::{Error, Result};

/// Rectangle obstacle payload.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RectangleGeometry {
    /// Centre x
    #[serde(default)]
    pub center_x: f64,
    /// Centre y
    #[serde(default)]
    pub center_y: f64,
    /// Horizontal extent
    pub width: f64,
    /// Vertical extent
    pub height: f64,
}

/// Circle obstacle payload.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CircleGeometry {
    /// Centre x
    #[serde(default)]
    pub center_x: f64,
    /// Centre y
    #[serde(default)]
    pub center_y: f64,
    /// Radius
    pub radius: f64,
}

/// A polygon corner.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Vertex {
    /// Horizontal position
    pub x: f64,
    /// Vertical position
    pub y: f64,
}

/// Polygon obstacle payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PolygonGeometry {
    /// Vertices in order (either winding)
    pub points: Vec<Vertex>,
}

impl PolygonGeometry {
    fn signed_area(&self) -> f64 {
        let n = self.points.len();
        let mut sum = 0.0;
        for i in 0..n {
            let (a, b) = (self.points[i], self.points[(i + 1) % n]);
            sum += a.x * b.y - b.x * a.y;
        }
        sum / 2.0
    }

    fn edges(&self) -> impl Iterator<Item = (Vertex, Vertex)> + '_ {
        let n = self.points.len();
        (0..n).map(move |i| (self.points[i], self.points[(i + 1) % n]))
    }
}

/// An obstacle's typed geometry.
///
/// The wire form is an `(obstacle_type, geometry_data)` pair where
/// `geometry_data` is a free JSON object; [`ObstacleShape::parse`] turns it
/// into one of these variants.
#[derive(Debug, Clone, PartialEq)]
pub enum ObstacleShape {
    /// Axis-aligned rectangle
    Rectangle(RectangleGeometry),
    /// Circle
    Circle(CircleGeometry),
    /// Simple polygon
    Polygon(PolygonGeometry),
}

impl ObstacleShape {
    /// Parses a geometry payload of the given kind.
    ///
    /// Fails with [`Error::Geometry`] when required fields are missing, have
    /// the wrong type, or are not finite numbers.
    pub fn parse(kind: ObstacleType, data: &Value) -> Result<Self> {
        if !data.is_object() {
            return Err(Error::geometry("geometry_data must be a JSON object"));
        }
        let shape = match kind {
            ObstacleType::Rectangle => ObstacleShape::Rectangle(from_value(data)?),
            ObstacleType::Circle => ObstacleShape::Circle(from_value(data)?),
            ObstacleType::Polygon => ObstacleShape::Polygon(from_value(data)?),
        };
        if !shape.is_finite() {
            return Err(Error::geometry("geometry values must be finite numbers"));
        }
        Ok(shape)
    }

    /// The obstacle type this shape was parsed as.
    pub fn kind(&self) -> ObstacleType {
        match self {
            ObstacleShape::Rectangle(_) => ObstacleType::Rectangle,
            ObstacleShape::Circle(_) => ObstacleType::Circle,
            ObstacleShape::Polygon(_) => ObstacleType::Polygon,
        }
    }

    /// Normalised JSON payload, as stored and returned by the API.
    pub fn geometry_data(&self) -> Value {
        let value = match self {
            ObstacleShape::Rectangle(r) => serde_json::to_value(r),
            ObstacleShape::Circle(c) => serde_json::to_value(c),
            ObstacleShape::Polygon(p) => serde_json::to_value(p),
        };
        value.unwrap_or(Value::Null)
    }

    /// Axis-aligned bounding box.
    pub fn bounds(&self) -> Bounds {
        match self {
            ObstacleShape::Rectangle(r) => {
                Bounds::of_rectangle(r.center_x, r.center_y, r.width, r.height)
            }
            ObstacleShape::Circle(c) => Bounds::of_circle(c.center_x, c.center_y, c.radius),
            ObstacleShape::Polygon(p) => p.points.iter().fold(
                Bounds {
                    min_x: f64::INFINITY,
                    min_y: f64::INFINITY,
                    max_x: f64::NEG_INFINITY,
                    max_y: f64::NEG_INFINITY,
                },
                |b, v| Bounds {
                    min_x: b.min_x.min(v.x),
                    min_y: b.min_y.min(v.y),
                    max_x: b.max_x.max(v.x),
                    max_y: b.max_y.max(v.y),
                },
            ),
        }
    }

    /// Surface covered by the obstacle in square metres.
    pub fn area(&self) -> f64 {
        match self {
            ObstacleShape::Rectangle(r) => r.width * r.height,
            ObstacleShape::Circle(c) => PI * c.radius * c.radius,
            ObstacleShape::Polygon(p) => p.signed_area().abs(),
        }
    }

    /// Checks that the shape is well-formed and lies entirely on a wall of
    /// the given size.
    pub fn validate_within(&self, wall_width: f64, wall_height: f64) -> Result<()> {
        match self {
            ObstacleShape::Rectangle(r) if r.width <= 0.0 || r.height <= 0.0 => {
                return Err(Error::geometry("rectangle width and height must be positive"));
            }
            ObstacleShape::Circle(c) if c.radius <= 0.0 => {
                return Err(Error::geometry("circle radius must be positive"));
            }
            ObstacleShape::Polygon(p) if p.points.len() < 3 => {
                return Err(Error::geometry("polygon needs at least 3 points"));
            }
            ObstacleShape::Polygon(p) if p.signed_area().abs() <= f64::EPSILON => {
                return Err(Error::geometry("polygon has zero area"));
            }
            _ => {}
        }
        if !self.bounds().fits_within(wall_width, wall_height) {
            return Err(Error::geometry(format!(
                "obstacle extends beyond the {wall_width}x{wall_height}m wall"
            )));
        }
        Ok(())
    }

    /// Whether a tool centred at `(x, y)` would touch the obstacle when
    /// keeping `clearance` metres away from it.
    pub fn blocks(&self, x: f64, y: f64, clearance: f64) -> bool {
        match self {
            ObstacleShape::Rectangle(r) => {
                Bounds::of_rectangle(r.center_x, r.center_y, r.width, r.height)
                    .inflate(clearance)
                    .contains(x, y)
            }
            ObstacleShape::Circle(c) => distance(x, y, c.center_x, c.center_y) <= c.radius + clearance,
            ObstacleShape::Polygon(p) => {
                if !self.bounds().inflate(clearance).contains(x, y) {
                    return false;
                }
                point_in_polygon(x, y, &p.points)
                    || p.edges()
                        .any(|(a, b)| point_segment_distance((x, y), (a.x, a.y), (b.x, b.y)) <= clearance)
            }
        }
    }

    fn is_finite(&self) -> bool {
        match self {
            ObstacleShape::Rectangle(r) => [r.center_x, r.center_y, r.width, r.height]
                .iter()
                .all(|v| v.is_finite()),
            ObstacleShape::Circle(c) => [c.center_x, c.center_y, c.radius]
                .iter()
                .all(|v| v.is_finite()),
            ObstacleShape::Polygon(p) => p.points.iter().all(|v| v.x.is_finite() && v.y.is_finite()),
        }
    }
}

fn from_value<T: serde::de::DeserializeOwned>(data: &Value) -> Result<T> {
    serde_json::from_value(data.clone()).map_err(|e| Error::geometry(e.to_string()))
}
