//! Length, coverage and duration of a planned path.

use serde::{Deserialize, Serialize};
use trowel_core::geometry::distance3;

use crate::params::{PathPoint, PlanningParameters};

/// Average finishing speed in metres per minute.
pub const AVG_FEED_RATE: f64 = 0.1;

/// Summary figures for a path.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PathMetrics {
    /// Length of every segment, metres
    pub total_length: f64,
    /// Length of segments ending at a cutting point, metres
    pub cutting_length: f64,
    /// Covered share of the obstacle-free wall area, percent, at most 100
    pub coverage_percentage: f64,
    /// Cutting length at [`AVG_FEED_RATE`], minutes
    pub estimated_duration_minutes: f64,
}

impl PathMetrics {
    /// Metrics for `points` planned with `params`.
    pub fn compute(points: &[PathPoint], params: &PlanningParameters) -> Self {
        let (mut total_length, mut cutting_length) = (0.0, 0.0);
        for pair in points.windows(2) {
            let (a, b) = (&pair[0], &pair[1]);
            let segment = distance3([a.x, a.y, a.z], [b.x, b.y, b.z]);
            total_length += segment;
            if b.tool_active {
                cutting_length += segment;
            }
        }

        let effective_area = params.effective_area();
        let coverage_percentage = if effective_area > 0.0 {
            (cutting_length * params.robot_width / effective_area * 100.0).min(100.0)
        } else {
            0.0
        };

        Self {
            total_length,
            cutting_length,
            coverage_percentage,
            estimated_duration_minutes: cutting_length / AVG_FEED_RATE,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;
    use trowel_core::geometry::ObstacleShape;
    use trowel_core::model::ObstacleType;

    fn params(width: f64, height: f64) -> PlanningParameters {
        PlanningParameters {
            robot_width: 0.1,
            overlap_percentage: 20.0,
            resolution: 0.01,
            wall_width: width,
            wall_height: height,
            obstacles: vec![],
        }
    }

    #[test]
    fn test_empty_path_has_zero_metrics() {
        assert_eq!(
            PathMetrics::compute(&[], &params(1.0, 1.0)),
            PathMetrics::default()
        );
    }

    #[test]
    fn test_rapid_segments_excluded_from_cutting() {
        let a = PathPoint::cutting(0.0, 0.0, 0.0);
        let b = PathPoint::cutting(1.0, 0.0, 0.0);
        let c = PathPoint::cutting(1.0, 0.5, 0.0);
        let points = [a, b, PathPoint::rapid_to(&c), c];
        let metrics = PathMetrics::compute(&points, &params(2.0, 1.0));
        assert!((metrics.total_length - 1.5).abs() < 1e-12);
        assert!((metrics.cutting_length - 1.0).abs() < 1e-12);
        // 1.0 m * 0.1 m over 2 m²
        assert!((metrics.coverage_percentage - 5.0).abs() < 1e-9);
        assert!((metrics.estimated_duration_minutes - 10.0).abs() < 1e-9);
    }

    #[test]
    fn test_coverage_capped_at_100() {
        let points = [
            PathPoint::cutting(0.0, 0.0, 0.0),
            PathPoint::cutting(50.0, 0.0, 0.0),
        ];
        let metrics = PathMetrics::compute(&points, &params(1.0, 1.0));
        assert_eq!(metrics.coverage_percentage, 100.0);
    }

    #[test]
    fn test_fully_blocked_wall_reports_zero_coverage() {
        let mut p = params(1.0, 1.0);
        p.obstacles.push(
            ObstacleShape::parse(
                ObstacleType::Rectangle,
                &json!({"center_x": 0.5, "center_y": 0.5, "width": 1.0, "height": 1.0}),
            )
            .unwrap(),
        );
        let points = [
            PathPoint::cutting(0.0, 0.0, 0.0),
            PathPoint::cutting(1.0, 0.0, 0.0),
        ];
        assert_eq!(PathMetrics::compute(&points, &p).coverage_percentage, 0.0);
    }
}
