//! API server lifecycle: bind, spawn the axum server in the background,
//! return a handle with a shutdown channel.

use std::net::SocketAddr;

use serde::Serialize;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;

use crate::api::router::api_router;
use crate::api::types::ApiContext;

#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("Failed to bind API server to {addr}: {source}")]
    Bind {
        addr: SocketAddr,
        source: std::io::Error,
    },
    #[error("Failed to get server address: {0}")]
    LocalAddr(std::io::Error),
}

/// Session metadata for a running server.
#[derive(Debug, Clone, Serialize)]
pub struct ApiSession {
    pub session_id: String,
    pub server_addr: String,
    pub port: u16,
    pub started_at: String,
}

/// Handle to a running API server.
pub struct ApiServer {
    pub session: ApiSession,
    shutdown_tx: Option<oneshot::Sender<()>>,
    task: JoinHandle<()>,
}

impl ApiServer {
    /// Send the graceful shutdown signal.
    pub fn shutdown(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
            tracing::info!("API server shutdown signal sent");
        }
    }

    /// Signal shutdown and wait for in-flight requests to finish.
    pub async fn stop(mut self) {
        self.shutdown();
        if let Err(e) = self.task.await {
            tracing::error!("API server task failed: {e}");
        }
    }
}

/// Bind to `addr` (port 0 picks an ephemeral port), build the router and
/// spawn the server in a background tokio task.
pub async fn start_api_server(addr: SocketAddr, ctx: ApiContext) -> Result<ApiServer, ServerError> {
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|source| ServerError::Bind { addr, source })?;

    let addr = listener.local_addr().map_err(ServerError::LocalAddr)?;

    let app = api_router(ctx);

    let session = ApiSession {
        session_id: uuid::Uuid::new_v4().to_string(),
        server_addr: addr.to_string(),
        port: addr.port(),
        started_at: chrono::Utc::now().to_rfc3339(),
    };

    let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();

    let task = tokio::spawn(async move {
        let shutdown_signal = async move {
            let _ = shutdown_rx.await;
            tracing::info!("API server received shutdown signal");
        };

        tracing::info!(%addr, "API server started");

        // Peer addresses feed the per-client rate limiter.
        if let Err(e) = axum::serve(
            listener,
            app.into_make_service_with_connect_info::<SocketAddr>(),
        )
        .with_graceful_shutdown(shutdown_signal)
        .await
        {
            tracing::error!("API server error: {e}");
        }

        tracing::info!("API server stopped");
    });

    Ok(ApiServer {
        session,
        shutdown_tx: Some(shutdown_tx),
        task,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    use crate::ai::{AiAssistant, MockLlmClient};
    use crate::api::types::RateLimiter;
    use crate::facilities::nearby::StaticPlaces;
    use crate::facilities::nominatim::StaticSearch;
    use crate::shortage::DrugCatalog;
    use crate::store::HealthStore;
    use crate::symptoms::{sample_response, MockSymptomPredictor};

    fn test_ctx() -> ApiContext {
        ApiContext {
            store: Arc::new(HealthStore::seeded()),
            catalog: Arc::new(DrugCatalog::bundled().unwrap()),
            assistant: AiAssistant::new(Arc::new(MockLlmClient::new("ok")), None),
            symptoms: Arc::new(MockSymptomPredictor {
                outcome: Ok(sample_response()),
            }),
            places: Arc::new(StaticPlaces(Ok(Vec::new()))),
            search: Arc::new(StaticSearch(Ok(Vec::new()))),
            rate_limiter: Arc::new(Mutex::new(RateLimiter::default())),
        }
    }

    #[tokio::test]
    async fn start_serve_and_stop() {
        let server = start_api_server(SocketAddr::from(([127, 0, 0, 1], 0)), test_ctx())
            .await
            .expect("server should start");

        assert!(server.session.port > 0);
        assert!(!server.session.session_id.is_empty());

        let url = format!("http://127.0.0.1:{}/api/stocks", server.session.port);
        let stocks: serde_json::Value = reqwest::get(&url).await.unwrap().json().await.unwrap();
        assert_eq!(stocks.as_array().unwrap().len(), 3);

        server.stop().await;
    }

    #[tokio::test]
    async fn bind_conflict_is_reported() {
        let first = start_api_server(SocketAddr::from(([127, 0, 0, 1], 0)), test_ctx())
            .await
            .unwrap();
        let taken: SocketAddr = first.session.server_addr.parse().unwrap();

        let second = start_api_server(taken, test_ctx()).await;
        assert!(matches!(second, Err(ServerError::Bind { .. })));

        first.stop().await;
    }
}
