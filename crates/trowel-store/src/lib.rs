#![doc = include_str!("../README.md")]
#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod error;
mod logs;
pub mod pool;
mod rows;
pub mod schema;
mod store;
pub mod trajectories;
pub mod walls;

pub use error::{Error, Result};
pub use pool::connect;
pub use store::{Store, StoreCounts};
pub use trajectories::{NewTrajectory, TrajectoryFilter};
pub use walls::WallQuery;
