use std::f64::consts::FRAC_PI_4;

use trowel_core::geometry::distance;
use trowel_core::model::Algorithm;

use super::{CoveragePattern, PassSink};
use crate::Result;
use crate::params::{PathPoint, PlanningParameters};

/// 45° diagonals spaced along the bottom edge; even passes rise from the
/// bottom, odd passes fall from the top.
#[derive(Debug, Clone, Copy, Default)]
pub struct Zigzag;

impl CoveragePattern for Zigzag {
    fn algorithm(&self) -> Algorithm {
        Algorithm::Zigzag
    }

    fn trace(&self, params: &PlanningParameters, sink: &mut dyn PassSink) -> Result<()> {
        let h = params.half_width();
        let (top, right) = (params.wall_height - h, params.wall_width - h);
        let spacing = params.effective_width() / FRAC_PI_4.sin();
        let count = (params.wall_width / spacing).floor() as usize + 1;

        for i in 0..count {
            let start_x = i as f64 * spacing;
            let end_x = right.min(start_x + params.wall_height);
            let run = end_x - start_x;
            let (start_y, end_y, orientation) = if i % 2 == 0 {
                (h, top.min(h + run), FRAC_PI_4)
            } else {
                (top, h.max(top - run), -FRAC_PI_4)
            };

            let length = distance(start_x, start_y, end_x, end_y);
            let samples = ((length / params.resolution).floor() as usize).max(2);
            for j in 0..samples {
                let t = j as f64 / (samples - 1) as f64;
                let x = start_x + t * (end_x - start_x);
                let y = start_y + t * (end_y - start_y);
                let keep = params.within_inset(x, y) && params.is_free(x, y);
                sink.sample(keep, PathPoint::cutting(x, y, orientation))?;
            }
            sink.break_pass()?;
        }
        Ok(())
    }
}
