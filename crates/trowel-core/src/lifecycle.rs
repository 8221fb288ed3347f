//! Lifecycle tracking for long-running services.
//!
//! The API server owns one [`Lifecycle`]; the health and monitoring endpoints
//! read it, shutdown handling writes it.
//!
//! ```rust
//! use trowel_core::lifecycle::{Lifecycle, ServiceState};
//!
//! let lifecycle = Lifecycle::new("api");
//! lifecycle.set_state(ServiceState::Starting);
//! lifecycle.set_state(ServiceState::Ready);
//! assert!(lifecycle.state().is_available());
//! ```

use std::fmt;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::watch;

use crate::{Error, Result};

// ============================================================================
// ServiceState
// ============================================================================

/// Where a service is in its lifecycle.
#[derive(Clone, Debug, PartialEq)]
pub enum ServiceState {
    /// Not started
    Stopped,
    /// Connecting to the database, running migrations
    Starting,
    /// Serving requests
    Ready,
    /// Serving, but a dependency is unhealthy
    Degraded(String),
    /// Draining connections
    Stopping,
    /// Could not start
    Failed(String),
}

impl ServiceState {
    /// `Ready` or `Degraded`.
    pub fn is_available(&self) -> bool {
        matches!(self, Self::Ready | Self::Degraded(_))
    }

    /// Short label used in health payloads.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Stopped => "stopped",
            Self::Starting => "starting",
            Self::Ready => "healthy",
            Self::Degraded(_) => "degraded",
            Self::Stopping => "stopping",
            Self::Failed(_) => "failed",
        }
    }
}

impl fmt::Display for ServiceState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Degraded(reason) | Self::Failed(reason) => {
                write!(f, "{}: {reason}", self.label())
            }
            other => f.write_str(other.label()),
        }
    }
}

// ============================================================================
// Lifecycle
// ============================================================================

/// Shared, cloneable view of one service's state and uptime.
#[derive(Clone)]
pub struct Lifecycle {
    inner: Arc<Inner>,
}

struct Inner {
    name: String,
    tx: watch::Sender<ServiceState>,
    created: Instant,
}

impl Lifecycle {
    /// New handle in [`ServiceState::Stopped`].
    pub fn new(name: impl Into<String>) -> Self {
        let (tx, _rx) = watch::channel(ServiceState::Stopped);
        Self {
            inner: Arc::new(Inner {
                name: name.into(),
                tx,
                created: Instant::now(),
            }),
        }
    }

    /// Service name.
    pub fn name(&self) -> &str {
        &self.inner.name
    }

    /// Current state.
    pub fn state(&self) -> ServiceState {
        self.inner.tx.borrow().clone()
    }

    /// Records a transition and notifies subscribers. Repeating the current
    /// state is a no-op.
    pub fn set_state(&self, state: ServiceState) {
        let changed = self.inner.tx.send_if_modified(|current| {
            if *current == state {
                false
            } else {
                *current = state.clone();
                true
            }
        });
        if changed {
            tracing::info!(service = %self.inner.name, %state, "service state changed");
        }
    }

    /// Receiver that observes every later transition.
    pub fn subscribe(&self) -> watch::Receiver<ServiceState> {
        self.inner.tx.subscribe()
    }

    /// Waits for `Ready`; fails on `Failed` or after `timeout`.
    pub async fn wait_ready(&self, timeout: Duration) -> Result<()> {
        let mut rx = self.subscribe();
        let wait = async {
            loop {
                let state = rx.borrow_and_update().clone();
                match state {
                    ServiceState::Ready => return Ok(()),
                    ServiceState::Failed(reason) => {
                        return Err(Error::unavailable(self.name(), reason));
                    }
                    _ => {}
                }
                if rx.changed().await.is_err() {
                    return Err(Error::unavailable(self.name(), "state channel closed"));
                }
            }
        };
        match tokio::time::timeout(timeout, wait).await {
            Ok(result) => result,
            Err(_) => Err(Error::unavailable(
                self.name(),
                format!("not ready after {timeout:?} (state: {})", self.state()),
            )),
        }
    }

    /// Time since the handle was created.
    pub fn uptime(&self) -> Duration {
        self.inner.created.elapsed()
    }
}

impl fmt::Debug for Lifecycle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Lifecycle")
            .field("name", &self.inner.name)
            .field("state", &self.state())
            .finish()
    }
}

// ============================================================================
// Tests
// ============================================================================
