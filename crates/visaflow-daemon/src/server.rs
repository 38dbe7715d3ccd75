//! Server setup and lifecycle management

use crate::api::create_router;
use crate::api::rest::state::AppState;
use crate::config::DaemonConfig;
use crate::error::{DaemonError, DaemonResult};
use crate::storage::InMemorySessionStore;
use std::sync::Arc;
use tokio::net::TcpListener;
use visaflow_engine::SessionEngine;

/// VisaFlow daemon server
pub struct Server {
    config: DaemonConfig,
    store: Arc<InMemorySessionStore>,
    engine: Arc<SessionEngine>,
}

impl Server {
    /// Create a new server with the given configuration
    pub fn new(config: DaemonConfig) -> Self {
        Self {
            config,
            store: Arc::new(InMemorySessionStore::new()),
            engine: Arc::new(SessionEngine::new()),
        }
    }

    /// Run the server until a shutdown signal arrives
    pub async fn run(self) -> DaemonResult<()> {
        let addr = self.config.server.listen_addr;

        let state = AppState::new(self.store.clone(), self.engine.clone());
        let app = create_router(state);

        let listener = TcpListener::bind(addr).await?;

        tracing::info!("VisaFlow daemon listening on {}", addr);
        tracing::info!(
            flows = self.engine.catalog().list().len(),
            "Flow catalog loaded"
        );

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await
            .map_err(|e| DaemonError::Server(e.to_string()))?;

        tracing::info!("VisaFlow daemon shutting down");
        Ok(())
    }
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, initiating graceful shutdown");
        }
        _ = terminate => {
            tracing::info!("Received terminate signal, initiating graceful shutdown");
        }
    }
}
