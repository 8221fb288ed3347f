use std::f64::consts::{FRAC_PI_2, TAU};

use trowel_core::model::Algorithm;

use super::{CoveragePattern, PassSink};
use crate::Result;
use crate::params::{PathPoint, PlanningParameters};

/// Smallest radius used to derive the angular step near the centre.
const MIN_STEP_RADIUS: f64 = 0.01;

/// Concentric rings around the wall centre, innermost first. Each ring is
/// walked counter-clockwise from angle 0.
#[derive(Debug, Clone, Copy, Default)]
pub struct Spiral;

impl CoveragePattern for Spiral {
    fn algorithm(&self) -> Algorithm {
        Algorithm::Spiral
    }

    fn trace(&self, params: &PlanningParameters, sink: &mut dyn PassSink) -> Result<()> {
        let (cx, cy) = (params.wall_width / 2.0, params.wall_height / 2.0);
        let max_radius = params.wall_width.min(params.wall_height) / 2.0 - params.half_width();

        let mut radius = params.half_width();
        while radius < max_radius {
            let step = params.resolution / radius.max(MIN_STEP_RADIUS);
            let mut angle = 0.0;
            while angle < TAU {
                let (x, y) = (cx + radius * angle.cos(), cy + radius * angle.sin());
                let keep = params.within_inset(x, y) && params.is_free(x, y);
                sink.sample(keep, PathPoint::cutting(x, y, angle + FRAC_PI_2))?;
                angle += step;
            }
            sink.break_pass()?;
            radius += params.effective_width();
        }
        Ok(())
    }
}
