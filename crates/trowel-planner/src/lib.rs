#![doc = include_str!("../README.md")]
#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod error;
pub mod metrics;
pub mod optimize;
pub mod params;
pub mod patterns;
pub mod planner;

pub use error::{Error, Result};
pub use metrics::PathMetrics;
pub use params::{Pass, PathPoint, PlanningParameters};
pub use optimize::PathBuilder;
pub use patterns::{CoveragePattern, PassSink, pattern_for};
pub use planner::{PlannedPath, Planner};
