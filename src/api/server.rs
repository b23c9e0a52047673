//! Risk API server lifecycle.
//!
//! bind → spawn background task → return handle with shutdown channel and
//! the task handle, so callers can wait for in-flight requests to drain.

use std::net::SocketAddr;

use serde::Serialize;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;

use crate::api::router::risk_api_router;
use crate::api::types::ApiContext;

/// Session metadata for a running risk API server.
#[derive(Debug, Clone, Serialize)]
pub struct RiskApiSession {
    pub server_addr: String,
    pub port: u16,
    pub started_at: String,
}

/// Handle to a running risk API server.
pub struct RiskApiServer {
    pub session: RiskApiSession,
    shutdown_tx: Option<oneshot::Sender<()>>,
    task: Option<JoinHandle<()>>,
}

impl RiskApiServer {
    /// Shut down the server gracefully. Safe to call more than once.
    pub fn shutdown(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
            tracing::info!("Risk API server shutdown signal sent");
        }
    }

    /// Signal shutdown if not already done and wait until the serve task has
    /// drained open connections and exited.
    pub async fn stopped(mut self) {
        self.shutdown();
        if let Some(task) = self.task.take() {
            if let Err(e) = task.await {
                tracing::error!("Risk API server task failed: {e}");
            }
        }
    }
}

/// Start the risk API server on `addr` (port 0 picks an ephemeral port).
pub async fn start_risk_api_server_on(
    ctx: ApiContext,
    addr: SocketAddr,
) -> Result<RiskApiServer, std::io::Error> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    let addr = listener.local_addr()?;

    let app = risk_api_router(ctx);

    let session = RiskApiSession {
        server_addr: addr.to_string(),
        port: addr.port(),
        started_at: chrono::Utc::now().to_rfc3339(),
    };

    let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();

    let task = tokio::spawn(async move {
        let shutdown_signal = async move {
            let _ = shutdown_rx.await;
            tracing::info!("Risk API server received shutdown signal");
        };

        tracing::info!(%addr, "Risk API server started");

        if let Err(e) = axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal)
            .await
        {
            tracing::error!("Risk API server error: {e}");
        }

        tracing::info!("Risk API server stopped");
    });

    Ok(RiskApiServer {
        session,
        shutdown_tx: Some(shutdown_tx),
        task: Some(task),
    })
}
