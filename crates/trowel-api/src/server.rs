//! API server lifecycle: open the store, bind, serve until shutdown.

use std::future::Future;

use axum::Router;
use tokio::net::TcpListener;
use trowel_core::config::TrowelConfig;
use trowel_core::lifecycle::{Lifecycle, ServiceState};
use trowel_store::Store;

use crate::routes::build_router;
use crate::state::AppState;
use crate::Result;

/// Lifecycle name of the HTTP service.
pub const SERVICE_ID: &str = "trowel-api";

/// An API server with its database open and schema applied.
#[derive(Debug, Clone)]
pub struct Server {
    state: AppState,
}

impl Server {
    /// Opens the database from `config` and prepares the router state.
    pub async fn open(config: TrowelConfig) -> Result<Self> {
        let lifecycle = Lifecycle::new(SERVICE_ID);
        lifecycle.set_state(ServiceState::Starting);
        let store = match Store::open(&config.database).await {
            Ok(store) => store,
            Err(e) => {
                lifecycle.set_state(ServiceState::Failed(e.to_string()));
                return Err(e.into());
            }
        };
        tracing::info!(database = %config.database.url, "database initialised");
        Ok(Self::with_store(store, config, lifecycle))
    }

    /// Server over an already opened store.
    pub fn with_store(store: Store, config: TrowelConfig, lifecycle: Lifecycle) -> Self {
        Self {
            state: AppState::new(store, config, lifecycle),
        }
    }

    /// Shared handler state.
    pub fn state(&self) -> &AppState {
        &self.state
    }

    /// The application router.
    pub fn router(&self) -> Router {
        build_router(self.state.clone())
    }

    /// Binds the configured address and serves until `shutdown` resolves.
    pub async fn run<F>(self, shutdown: F) -> Result<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let address = self.state.config.server.bind_address();
        let listener = match TcpListener::bind(&address).await {
            Ok(listener) => listener,
            Err(e) => {
                self.state
                    .lifecycle
                    .set_state(ServiceState::Failed(e.to_string()));
                return Err(e.into());
            }
        };
        self.serve(listener, shutdown).await
    }

    /// Serves on `listener` until `shutdown` resolves, then drains in-flight
    /// requests and closes the database.
    pub async fn serve<F>(self, listener: TcpListener, shutdown: F) -> Result<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let lifecycle = self.state.lifecycle.clone();
        let store = self.state.store.clone();
        tracing::info!(address = %listener.local_addr()?, "API server listening");
        lifecycle.set_state(ServiceState::Ready);

        let draining = lifecycle.clone();
        let served = axum::serve(listener, self.router())
            .with_graceful_shutdown(async move {
                shutdown.await;
                draining.set_state(ServiceState::Stopping);
                tracing::info!("shutting down, draining connections");
            })
            .await;

        store.close().await;
        match served {
            Ok(()) => {
                lifecycle.set_state(ServiceState::Stopped);
                Ok(())
            }
            Err(e) => {
                lifecycle.set_state(ServiceState::Failed(e.to_string()));
                Err(e.into())
            }
        }
    }
}

/// Resolves on Ctrl-C, or on SIGTERM on Unix.
pub async fn shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{SignalKind, signal};
        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                tokio::select! {
                    _ = sigterm.recv() => {}
                    _ = tokio::signal::ctrl_c() => {}
                }
            }
            Err(e) => {
                tracing::warn!(error = %e, "cannot listen for SIGTERM");
                let _ = tokio::signal::ctrl_c().await;
            }
        }
    }
    #[cfg(not(unix))]
    {
        let _ = tokio::signal::ctrl_c().await;
    }
}
