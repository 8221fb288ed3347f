//! Shared handler state.

use std::sync::Arc;
use std::time::Duration;

use trowel_core::config::TrowelConfig;
use trowel_core::lifecycle::Lifecycle;
use trowel_planner::Planner;
use trowel_store::Store;

use crate::service::PlanningService;

/// Name reported by `/health`.
pub const SERVICE_NAME: &str = "Wall Finishing Robot Control System";

/// State cloned into every handler.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Database handle
    pub store: Store,
    /// Effective configuration
    pub config: Arc<TrowelConfig>,
    /// Server lifecycle
    pub lifecycle: Lifecycle,
    /// Plans and persists trajectories
    pub planning: PlanningService,
}

impl AppState {
    /// State over an opened store.
    pub fn new(store: Store, config: TrowelConfig, lifecycle: Lifecycle) -> Self {
        let planning = PlanningService::new(
            store.clone(),
            Planner::from_config(&config.planning),
            config.planning.clone(),
        );
        Self {
            store,
            config: Arc::new(config),
            lifecycle,
            planning,
        }
    }

    /// Upper bound on handling time for a single request.
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.config.server.request_timeout_secs.max(1))
    }
}
