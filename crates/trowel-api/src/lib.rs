#![doc = include_str!("../README.md")]
#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod error;
pub mod extract;
pub mod middleware;
mod routes;
pub mod server;
pub mod service;
pub mod state;

pub use error::{ApiError, Error, Result};
pub use routes::{API_PREFIX, build_router};
pub use server::{Server, shutdown_signal};
pub use service::PlanningService;
pub use state::AppState;
