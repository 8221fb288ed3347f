//! Domain entities and the request payloads that create or change them.

mod enums;
mod requests;
mod trajectory;
mod wall;

pub use enums::{Algorithm, AlgorithmInfo, MotionType, ObstacleType, TrajectoryStatus};
pub use requests::{
    ObstacleCreate, PlanSettings, TrajectoryPlanRequest, Validate, WallCreate, WallUpdate,
};
pub use trajectory::{
    PlanningResult, PointSummary, SystemLogEntry, Trajectory, TrajectoryPoint, TrajectoryStats,
};
pub use wall::{Obstacle, Wall};
