//! Path optimisation: collinear pruning inside a pass and rapid moves
//! between passes.

use trowel_core::geometry::{distance, point_segment_distance};

use crate::params::PathPoint;
use crate::patterns::PassSink;
use crate::{Error, Result};

/// Points deviating less than this from the line through their kept
/// neighbours are dropped.
pub const COLLINEAR_TOLERANCE: f64 = 0.001;

/// Gaps between passes longer than this get a tool-off repositioning move.
pub const RAPID_THRESHOLD: f64 = 0.05;

/// Builds the final path while a pattern streams its samples.
///
/// Within a pass, a point is dropped when it lies within
/// [`COLLINEAR_TOLERANCE`] of the chord from the last kept point to the
/// sample after it. The first and last points of a pass are always kept.
/// A rapid move is inserted before any pass that starts more than
/// [`RAPID_THRESHOLD`] from where the previous one ended.
///
/// Only kept points are stored, and the builder fails with
/// [`Error::TooManyPoints`] as soon as the path grows past `max_points`.
#[derive(Debug)]
pub struct PathBuilder {
    points: Vec<PathPoint>,
    max_points: usize,
    pending: Option<PathPoint>,
    pass_len: usize,
    passes: usize,
    samples: usize,
}

impl PathBuilder {
    /// Empty path capped at `max_points`.
    pub fn new(max_points: usize) -> Self {
        Self {
            points: Vec::new(),
            max_points,
            pending: None,
            pass_len: 0,
            passes: 0,
            samples: 0,
        }
    }

    /// Passes started so far.
    pub fn passes(&self) -> usize {
        self.passes
    }

    /// Free samples received so far, before pruning.
    pub fn samples(&self) -> usize {
        self.samples
    }

    /// Closes the last pass and returns the path.
    pub fn finish(mut self) -> Result<Vec<PathPoint>> {
        self.break_pass()?;
        Ok(self.points)
    }

    fn emit(&mut self, point: PathPoint) -> Result<()> {
        if self.points.len() >= self.max_points {
            return Err(Error::TooManyPoints {
                limit: self.max_points,
            });
        }
        self.points.push(point);
        Ok(())
    }
}

impl PassSink for PathBuilder {
    fn push(&mut self, point: PathPoint) -> Result<()> {
        self.samples += 1;
        self.pass_len += 1;
        if self.pass_len == 1 {
            self.passes += 1;
            let gap = self
                .points
                .last()
                .is_some_and(|last| distance(last.x, last.y, point.x, point.y) > RAPID_THRESHOLD);
            if gap {
                self.emit(PathPoint::rapid_to(&point))?;
            }
            return self.emit(point);
        }

        if let Some(candidate) = self.pending.take() {
            let bends = self.points.last().is_some_and(|anchor| {
                point_segment_distance(
                    (candidate.x, candidate.y),
                    (anchor.x, anchor.y),
                    (point.x, point.y),
                ) >= COLLINEAR_TOLERANCE
            });
            if bends {
                self.emit(candidate)?;
            }
        }
        self.pending = Some(point);
        Ok(())
    }

    fn break_pass(&mut self) -> Result<()> {
        self.pass_len = 0;
        match self.pending.take() {
            Some(last) => self.emit(last),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::params::Pass;
    use proptest::prelude::*;
    use trowel_core::model::MotionType;

    fn line(y: f64, xs: &[f64]) -> Pass {
        xs.iter().map(|&x| PathPoint::cutting(x, y, 0.0)).collect()
    }

    fn build(passes: &[Pass]) -> Vec<PathPoint> {
        let mut builder = PathBuilder::new(usize::MAX);
        for pass in passes {
            for point in pass {
                builder.push(*point).unwrap();
            }
            builder.break_pass().unwrap();
        }
        builder.finish().unwrap()
    }

    // ========================================================================
    // Collinear pruning
    // ========================================================================

    #[test]
    fn test_straight_line_collapses_to_endpoints() {
        let path = build(&[line(0.5, &[0.0, 0.1, 0.2, 0.3, 0.4])]);
        assert_eq!(path.len(), 2);
        assert_eq!(path[0].x, 0.0);
        assert_eq!(path[1].x, 0.4);
    }

    #[test]
    fn test_corner_is_kept() {
        let pass = vec![
            PathPoint::cutting(0.0, 0.0, 0.0),
            PathPoint::cutting(1.0, 0.0, 0.0),
            PathPoint::cutting(1.0, 1.0, 0.0),
        ];
        assert_eq!(build(&[pass]).len(), 3);
    }

    #[test]
    fn test_gentle_curve_keeps_drifting_points() {
        // Each step bends by less than the tolerance, but the drift from
        // the anchor accumulates and must eventually be kept.
        let pass: Pass = (0..50)
            .map(|i| {
                let x = i as f64 * 0.01;
                PathPoint::cutting(x, x * x, 0.0)
            })
            .collect();
        let path = build(std::slice::from_ref(&pass));
        assert!(path.len() > 2);
        assert!(path.len() < pass.len());
    }

    #[test]
    fn test_short_passes_untouched() {
        let pass = line(0.0, &[0.0, 0.5]);
        assert_eq!(build(std::slice::from_ref(&pass)), pass);
        assert_eq!(build(&[line(0.0, &[0.3])]).len(), 1);
        assert!(build(&[]).is_empty());
    }

    // ========================================================================
    // Rapid moves
    // ========================================================================

    #[test]
    fn test_rapid_inserted_between_distant_passes() {
        let passes = vec![line(0.05, &[0.05, 0.5, 0.95]), line(0.13, &[0.95, 0.5, 0.05])];
        let path = build(&passes);
        // 2 + rapid + 2
        assert_eq!(path.len(), 5);
        assert!(path[0].tool_active && path[1].tool_active);
        assert!(!path[2].tool_active);
        assert_eq!(path[2].motion_type, MotionType::Rapid);
        assert_eq!((path[2].x, path[2].y), (0.95, 0.13));
        assert!(path[3].tool_active && path[4].tool_active);
    }

    #[test]
    fn test_close_passes_join_without_rapid() {
        let passes = vec![line(0.0, &[0.0, 1.0]), line(0.04, &[1.0, 0.0])];
        let path = build(&passes);
        assert_eq!(path.len(), 4);
        assert!(path.iter().all(|p| p.tool_active));
    }

    #[test]
    fn test_repeated_breaks_do_not_start_passes() {
        let mut builder = PathBuilder::new(usize::MAX);
        builder.break_pass().unwrap();
        for point in line(0.0, &[0.0, 0.5, 1.0]) {
            builder.push(point).unwrap();
        }
        builder.break_pass().unwrap();
        builder.break_pass().unwrap();
        assert_eq!(builder.passes(), 1);
        assert_eq!(builder.samples(), 3);
        assert_eq!(builder.finish().unwrap().len(), 2);
    }

    // ========================================================================
    // Point cap
    // ========================================================================

    #[test]
    fn test_cap_fails_on_first_point_over_limit() {
        let mut builder = PathBuilder::new(3);
        builder.push(PathPoint::cutting(0.0, 0.0, 0.0)).unwrap();
        builder.break_pass().unwrap();
        // Rapid plus first point of the next pass fill the cap.
        builder.push(PathPoint::cutting(0.0, 1.0, 0.0)).unwrap();
        builder.break_pass().unwrap();
        let err = builder.push(PathPoint::cutting(0.0, 2.0, 0.0)).unwrap_err();
        assert!(matches!(err, Error::TooManyPoints { limit: 3 }));
    }

    #[test]
    fn test_pruned_samples_do_not_count_against_cap() {
        let mut builder = PathBuilder::new(2);
        for i in 0..10_000 {
            builder
                .push(PathPoint::cutting(i as f64 * 0.001, 0.5, 0.0))
                .unwrap();
        }
        let path = builder.finish().unwrap();
        assert_eq!(path.len(), 2);
    }

    proptest! {
        #[test]
        fn prop_pruning_keeps_endpoints_and_never_grows(
            ys in prop::collection::vec(-1.0f64..1.0, 2..60)
        ) {
            let pass: Pass = ys
                .iter()
                .enumerate()
                .map(|(i, &y)| PathPoint::cutting(i as f64 * 0.01, y * 0.01, 0.0))
                .collect();
            let path = build(std::slice::from_ref(&pass));
            prop_assert!(path.len() <= pass.len());
            prop_assert_eq!(path[0], pass[0]);
            prop_assert_eq!(path[path.len() - 1], pass[pass.len() - 1]);
        }
    }
}
