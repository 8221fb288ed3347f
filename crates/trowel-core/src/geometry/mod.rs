//! Planar geometry in wall coordinates (metres, origin at the bottom-left
//! corner of the wall).

mod shape;

pub use shape::{CircleGeometry, ObstacleShape, PolygonGeometry, RectangleGeometry, Vertex};

use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

/// Axis-aligned bounding box.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    /// Left edge
    pub min_x: f64,
    /// Bottom edge
    pub min_y: f64,
    /// Right edge
    pub max_x: f64,
    /// Top edge
    pub max_y: f64,
}

impl Bounds {
    /// Bounding box of a rectangle given by centre and size.
    pub fn of_rectangle(center_x: f64, center_y: f64, width: f64, height: f64) -> Self {
        Self {
            min_x: center_x - width / 2.0,
            min_y: center_y - height / 2.0,
            max_x: center_x + width / 2.0,
            max_y: center_y + height / 2.0,
        }
    }

    /// Bounding box of a circle.
    pub fn of_circle(center_x: f64, center_y: f64, radius: f64) -> Self {
        Self {
            min_x: center_x - radius,
            min_y: center_y - radius,
            max_x: center_x + radius,
            max_y: center_y + radius,
        }
    }

    /// Inclusive containment test.
    pub fn contains(&self, x: f64, y: f64) -> bool {
        self.min_x <= x && x <= self.max_x && self.min_y <= y && y <= self.max_y
    }

    /// Box grown by `margin` on every side.
    pub fn inflate(&self, margin: f64) -> Self {
        Self {
            min_x: self.min_x - margin,
            min_y: self.min_y - margin,
            max_x: self.max_x + margin,
            max_y: self.max_y + margin,
        }
    }

    /// Whether the box lies inside `[0, width] × [0, height]`.
    pub fn fits_within(&self, width: f64, height: f64) -> bool {
        self.min_x >= 0.0 && self.max_x <= width && self.min_y >= 0.0 && self.max_y <= height
    }
}

/// Euclidean distance between two points.
pub fn distance(x1: f64, y1: f64, x2: f64, y2: f64) -> f64 {
    (x2 - x1).hypot(y2 - y1)
}

/// Euclidean distance in three dimensions.
pub fn distance3(a: [f64; 3], b: [f64; 3]) -> f64 {
    let (dx, dy, dz) = (b[0] - a[0], b[1] - a[1], b[2] - a[2]);
    (dx * dx + dy * dy + dz * dz).sqrt()
}

/// Normalises an angle into `[-π, π]`.
pub fn normalize_angle(angle: f64) -> f64 {
    let mut angle = angle;
    while angle > PI {
        angle -= 2.0 * PI;
    }
    while angle < -PI {
        angle += 2.0 * PI;
    }
    angle
}

/// Inclusive point-in-rectangle test.
pub fn point_in_rectangle(
    x: f64,
    y: f64,
    center_x: f64,
    center_y: f64,
    width: f64,
    height: f64,
) -> bool {
    Bounds::of_rectangle(center_x, center_y, width, height).contains(x, y)
}

/// Inclusive point-in-circle test.
pub fn point_in_circle(x: f64, y: f64, center_x: f64, center_y: f64, radius: f64) -> bool {
    distance(x, y, center_x, center_y) <= radius
}

/// Shortest distance from `p` to the segment `a`–`b`.
pub fn point_segment_distance(p: (f64, f64), a: (f64, f64), b: (f64, f64)) -> f64 {
    let (abx, aby) = (b.0 - a.0, b.1 - a.1);
    let len_sq = abx * abx + aby * aby;
    if len_sq == 0.0 {
        return distance(p.0, p.1, a.0, a.1);
    }
    let t = (((p.0 - a.0) * abx + (p.1 - a.1) * aby) / len_sq).clamp(0.0, 1.0);
    distance(p.0, p.1, a.0 + t * abx, a.1 + t * aby)
}

/// Even-odd ray casting test; points on an edge may land either way.
pub fn point_in_polygon(x: f64, y: f64, vertices: &[Vertex]) -> bool {
    let n = vertices.len();
    if n < 3 {
        return false;
    }
    let mut inside = false;
    let mut j = n - 1;
    for i in 0..n {
        let (vi, vj) = (vertices[i], vertices[j]);
        if (vi.y > y) != (vj.y > y) && x < (vj.x - vi.x) * (y - vi.y) / (vj.y - vi.y) + vi.x {
            inside = !inside;
        }
        j = i;
    }
    inside
}
