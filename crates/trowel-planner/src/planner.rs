//! Planning entry point: pattern, optimisation, point cap, metrics.

use std::time::Instant;

use trowel_core::config::PlanningConfig;
use trowel_core::model::{Algorithm, TrajectoryPoint};

use crate::metrics::PathMetrics;
use crate::optimize::PathBuilder;
use crate::params::{PathPoint, PlanningParameters};
use crate::patterns::pattern_for;
use crate::{Error, Result};

/// Default upper bound on points in one trajectory.
pub const DEFAULT_MAX_POINTS: usize = 100_000;

/// Plans whose sampling estimate exceeds this are refused before any work.
pub const MAX_SAMPLES: f64 = 250_000_000.0;

/// An optimised path with its metrics.
#[derive(Debug, Clone, PartialEq)]
pub struct PlannedPath {
    /// Pattern used
    pub algorithm: Algorithm,
    /// Points in execution order, rapid moves included
    pub points: Vec<PathPoint>,
    /// Length, coverage and duration
    pub metrics: PathMetrics,
    /// Number of passes the pattern produced
    pub passes: usize,
}

impl PlannedPath {
    /// Points numbered from 0 with their planned arrival times.
    pub fn trajectory_points(&self) -> Vec<TrajectoryPoint> {
        self.points
            .iter()
            .enumerate()
            .map(|(i, p)| p.to_trajectory_point(i))
            .collect()
    }
}

/// Runs coverage patterns under a point cap.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Planner {
    max_points: usize,
}

impl Default for Planner {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_POINTS)
    }
}

impl Planner {
    /// Planner rejecting paths longer than `max_points`.
    pub fn new(max_points: usize) -> Self {
        Self { max_points }
    }

    /// Planner using the `[planning]` cap.
    pub fn from_config(config: &PlanningConfig) -> Self {
        Self::new(config.max_trajectory_points)
    }

    /// Configured point cap.
    pub fn max_points(&self) -> usize {
        self.max_points
    }

    /// Plans a full-coverage path for `params` with `algorithm`.
    pub fn plan(&self, algorithm: Algorithm, params: &PlanningParameters) -> Result<PlannedPath> {
        params.validate()?;
        let started = Instant::now();
        tracing::info!(
            %algorithm,
            wall_width = params.wall_width,
            wall_height = params.wall_height,
            obstacles = params.obstacles.len(),
            "planning trajectory"
        );

        let estimate = params.estimated_samples();
        if estimate > MAX_SAMPLES {
            return Err(Error::invalid(format!(
                "resolution {} is too fine for a {} x {} m wall (about {estimate:.0} samples, at most {MAX_SAMPLES:.0})",
                params.resolution, params.wall_width, params.wall_height
            )));
        }

        let mut builder = PathBuilder::new(self.max_points);
        if let Err(err) = pattern_for(algorithm).trace(params, &mut builder) {
            tracing::warn!(%algorithm, samples = builder.samples(), error = %err, "planning aborted");
            return Err(err);
        }
        let (passes, raw) = (builder.passes(), builder.samples());
        let points = builder.finish()?;
        let metrics = PathMetrics::compute(&points, params);

        tracing::info!(
            %algorithm,
            passes,
            raw_points = raw,
            points = points.len(),
            total_length = metrics.total_length,
            coverage = metrics.coverage_percentage,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "trajectory planned"
        );

        Ok(PlannedPath {
            algorithm,
            points,
            metrics,
            passes,
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;
    use trowel_core::geometry::ObstacleShape;
    use trowel_core::model::{MotionType, ObstacleType};

    fn reference_case() -> PlanningParameters {
        PlanningParameters {
            robot_width: 0.1,
            overlap_percentage: 20.0,
            resolution: 0.01,
            wall_width: 5.0,
            wall_height: 5.0,
            obstacles: vec![
                ObstacleShape::parse(
                    ObstacleType::Rectangle,
                    &json!({"center_x": 2.5, "center_y": 2.5, "width": 0.25, "height": 0.25}),
                )
                .unwrap(),
            ],
        }
    }

    #[test]
    fn test_every_algorithm_plans_reference_case() {
        let params = reference_case();
        for algorithm in Algorithm::ALL {
            let path = Planner::default().plan(*algorithm, &params).unwrap();
            assert!(!path.points.is_empty(), "{algorithm} produced no points");
            assert!(path.metrics.coverage_percentage > 0.0);
            assert!(path.metrics.total_length >= path.metrics.cutting_length);
            for point in &path.points {
                assert!(params.is_free(point.x, point.y));
            }
        }
    }

    #[test]
    fn test_rapid_moves_are_tool_off() {
        let path = Planner::default()
            .plan(Algorithm::Boustrophedon, &reference_case())
            .unwrap();
        let rapids: Vec<_> = path
            .points
            .iter()
            .filter(|p| p.motion_type == MotionType::Rapid)
            .collect();
        assert!(!rapids.is_empty());
        assert!(rapids.iter().all(|p| !p.tool_active && p.z == 0.0));
    }

    #[test]
    fn test_point_cap_enforced() {
        let err = Planner::new(10)
            .plan(Algorithm::Spiral, &reference_case())
            .unwrap_err();
        let Error::TooManyPoints { limit } = err else {
            unreachable!("Expected TooManyPoints");
        };
        assert_eq!(limit, 10);
    }

    fn large_wall(resolution: f64) -> PlanningParameters {
        PlanningParameters {
            robot_width: 0.1,
            overlap_percentage: 20.0,
            resolution,
            wall_width: 100.0,
            wall_height: 100.0,
            obstacles: vec![],
        }
    }

    #[test]
    fn test_fine_resolution_on_large_wall_stays_small() {
        match Planner::default().plan(Algorithm::Boustrophedon, &large_wall(0.001)) {
            Ok(path) => {
                // two endpoints and a rapid per row
                assert!(path.points.len() <= 3 * path.passes);
                assert!(path.points.len() <= DEFAULT_MAX_POINTS);
            }
            Err(err) => assert!(matches!(err, Error::TooManyPoints { .. }), "{err}"),
        }
    }

    #[test]
    fn test_cap_stops_large_plan_early() {
        let err = Planner::new(500)
            .plan(Algorithm::Boustrophedon, &large_wall(0.001))
            .unwrap_err();
        assert!(matches!(err, Error::TooManyPoints { limit: 500 }));
    }

    #[test]
    fn test_absurd_sample_estimate_rejected() {
        let err = Planner::default()
            .plan(Algorithm::Spiral, &large_wall(0.000_01))
            .unwrap_err();
        assert!(matches!(err, Error::InvalidParameters { .. }));
        assert!(err.to_string().contains("too fine"));
    }

    #[test]
    fn test_invalid_parameters_rejected() {
        let mut params = reference_case();
        params.overlap_percentage = 100.0;
        assert!(matches!(
            Planner::default().plan(Algorithm::Zigzag, &params),
            Err(Error::InvalidParameters { .. })
        ));
    }

    #[test]
    fn test_trajectory_points_are_sequenced() {
        let path = Planner::default()
            .plan(Algorithm::Zigzag, &reference_case())
            .unwrap();
        let points = path.trajectory_points();
        assert_eq!(points.len(), path.points.len());
        for (i, point) in points.iter().enumerate() {
            assert_eq!(point.sequence_number, i as i64);
        }
        assert_eq!(points[0].planned_time, Some(0.0));
    }

    #[test]
    fn test_from_config_reads_cap() {
        let config = PlanningConfig {
            max_trajectory_points: 42,
            ..Default::default()
        };
        assert_eq!(Planner::from_config(&config).max_points(), 42);
    }
}
