//! Coverage patterns.
//!
//! Each pattern walks its sweep lines, samples them at the configured
//! resolution and splits them into passes wherever an obstacle (or the wall
//! inset) interrupts the line.

mod boustrophedon;
mod spiral;
mod zigzag;

pub use boustrophedon::Boustrophedon;
pub use spiral::Spiral;
pub use zigzag::Zigzag;

use trowel_core::model::Algorithm;

use crate::Result;
use crate::params::{PathPoint, PlanningParameters};
#[cfg(test)]
use crate::params::Pass;

/// Receives samples as a pattern walks its sweep lines.
pub trait PassSink {
    /// Appends a free point to the current pass.
    fn push(&mut self, point: PathPoint) -> Result<()>;

    /// Ends the current pass, if it has any points.
    fn break_pass(&mut self) -> Result<()>;

    /// Pushes `point` when `keep`, otherwise breaks the pass.
    fn sample(&mut self, keep: bool, point: PathPoint) -> Result<()> {
        if keep {
            self.push(point)
        } else {
            self.break_pass()
        }
    }
}

/// A way of sweeping the tool across the whole wall.
pub trait CoveragePattern: Send + Sync {
    /// Which algorithm this pattern implements.
    fn algorithm(&self) -> Algorithm;

    /// Streams free points into `sink`, breaking passes wherever an
    /// obstacle or the wall inset interrupts a sweep line. Stops at the
    /// first error the sink returns.
    fn trace(&self, params: &PlanningParameters, sink: &mut dyn PassSink) -> Result<()>;
}

/// The pattern implementing `algorithm`.
pub fn pattern_for(algorithm: Algorithm) -> Box<dyn CoveragePattern> {
    match algorithm {
        Algorithm::Boustrophedon => Box::new(Boustrophedon),
        Algorithm::Spiral => Box::new(Spiral),
        Algorithm::Zigzag => Box::new(Zigzag),
    }
}

/// `start, start + step, ...` up to but excluding `stop`; `step` may be
/// negative. Yields `ceil((stop - start) / step)` values.
pub(crate) fn arange(start: f64, stop: f64, step: f64) -> impl Iterator<Item = f64> {
    let span = (stop - start) / step;
    let count = if span.is_finite() && span > 0.0 {
        span.ceil() as usize
    } else {
        0
    };
    (0..count).map(move |i| start + i as f64 * step)
}

/// Keeps every raw sample, grouped into passes.
#[cfg(test)]
#[derive(Debug, Default)]
pub(crate) struct PassBuilder {
    passes: Vec<Pass>,
    current: Pass,
}

#[cfg(test)]
impl PassSink for PassBuilder {
    fn push(&mut self, point: PathPoint) -> Result<()> {
        self.current.push(point);
        Ok(())
    }

    fn break_pass(&mut self) -> Result<()> {
        if !self.current.is_empty() {
            self.passes.push(std::mem::take(&mut self.current));
        }
        Ok(())
    }
}

#[cfg(test)]
impl PassBuilder {
    pub(crate) fn finish(mut self) -> Vec<Pass> {
        let _ = self.break_pass();
        self.passes
    }
}

/// Raw passes of `pattern`, before pruning.
#[cfg(test)]
pub(crate) fn raw_passes(pattern: &dyn CoveragePattern, params: &PlanningParameters) -> Vec<Pass> {
    let mut builder = PassBuilder::default();
    let traced = pattern.trace(params, &mut builder);
    assert!(traced.is_ok());
    builder.finish()
}
