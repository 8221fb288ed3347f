use std::f64::consts::PI;

use trowel_core::model::Algorithm;

use super::{CoveragePattern, PassSink, arange};
use crate::Result;
use crate::params::{PathPoint, PlanningParameters};

/// Horizontal rows swept alternately left-to-right and right-to-left,
/// bottom row first.
#[derive(Debug, Clone, Copy, Default)]
pub struct Boustrophedon;

impl CoveragePattern for Boustrophedon {
    fn algorithm(&self) -> Algorithm {
        Algorithm::Boustrophedon
    }

    fn trace(&self, params: &PlanningParameters, sink: &mut dyn PassSink) -> Result<()> {
        let h = params.half_width();
        let (left, right) = (h, params.wall_width - h);

        for (row, y) in arange(h, params.wall_height - h, params.effective_width()).enumerate() {
            let forward = row % 2 == 0;
            let (start, stop, step, orientation) = if forward {
                (left, right, params.resolution, 0.0)
            } else {
                (right, left, -params.resolution, PI)
            };
            for x in arange(start, stop, step) {
                sink.sample(params.is_free(x, y), PathPoint::cutting(x, y, orientation))?;
            }
            sink.break_pass()?;
        }
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::patterns::raw_passes;
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
    fn test_rows_alternate_direction() {
        let passes = raw_passes(&Boustrophedon, &params(1.0, 0.3));
        // rows at 0.05, 0.13, 0.21
        assert_eq!(passes.len(), 3);
        assert!(passes[0][0].x < passes[0][passes[0].len() - 1].x);
        assert!(passes[1][0].x > passes[1][passes[1].len() - 1].x);
        assert_eq!(passes[0][0].orientation, 0.0);
        assert_eq!(passes[1][0].orientation, PI);
    }

    #[test]
    fn test_rows_span_the_inset() {
        let passes = raw_passes(&Boustrophedon, &params(1.0, 0.3));
        let row = &passes[0];
        assert!((row[0].x - 0.05).abs() < 1e-12);
        let last = row[row.len() - 1].x;
        assert!(last < 0.95 && last > 0.93, "last sample at {last}");
        assert!(row.len() >= 89 && row.len() <= 91);
    }

    #[test]
    fn test_obstacle_splits_rows() {
        let mut p = params(2.0, 1.0);
        p.obstacles.push(
            ObstacleShape::parse(
                ObstacleType::Rectangle,
                &json!({"center_x": 1.0, "center_y": 0.5, "width": 0.2, "height": 0.2}),
            )
            .unwrap(),
        );
        let passes = raw_passes(&Boustrophedon, &p);
        let rows = arange(0.05, 0.95, 0.08).count();
        assert!(passes.len() > rows, "rows through the obstacle must split");
        for point in passes.iter().flatten() {
            assert!(p.is_free(point.x, point.y));
        }
    }

    #[test]
    fn test_wall_narrower_than_tool_yields_nothing() {
        assert!(raw_passes(&Boustrophedon, &params(0.08, 1.0)).is_empty());
    }
}
