//! Test server harness.

use relate::classifier::{ChainedClassifier, RelatednessService, ThresholdUpdates};
use relate::embedding::{BertEmbedder, Reranker};
use relate::gateway::{HandlerState, create_router_with_state};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;

const STARTUP_WAIT_TIMEOUT_SECS: u64 = 5;
const STARTUP_POLL_INTERVAL_MS: u64 = 50;

#[derive(Debug, Clone)]
pub struct TestServerConfig {
    pub cache_capacity: u64,
    pub thresholds: ThresholdUpdates,
}

impl Default for TestServerConfig {
    fn default() -> Self {
        Self {
            cache_capacity: 100,
            thresholds: ThresholdUpdates::new(),
        }
    }
}

pub struct TestServer {
    pub addr: SocketAddr,
    pub service: Arc<RelatednessService>,
    _server_handle: JoinHandle<()>,
    shutdown_tx: Option<oneshot::Sender<()>>,
}

impl TestServer {
    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub async fn shutdown(mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}

pub async fn wait_for_server_ready(
    addr: SocketAddr,
    timeout: Duration,
    interval: Duration,
) -> Result<(), ServerStartupError> {
    let start = std::time::Instant::now();

    loop {
        if start.elapsed() > timeout {
            return Err(ServerStartupError::Timeout);
        }

        match tokio::net::TcpStream::connect(addr).await {
            Ok(_) => return Ok(()),
            Err(_) => {
                tokio::time::sleep(interval).await;
            }
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ServerStartupError {
    #[error("Server failed to start within timeout")]
    Timeout,
    #[error("Failed to bind to address: {0}")]
    BindError(#[from] std::io::Error),
    #[error("Server startup failed: {0}")]
    StartupFailed(String),
}

/// Spawns a server on an ephemeral port with both models in stub mode.
///
/// The stub embedder is hash-seeded, so identical texts embed identically and
/// different texts are close to orthogonal. The stub reranker scores lexical overlap.
pub async fn spawn_test_server(config: TestServerConfig) -> Result<TestServer, ServerStartupError> {
    let listener = TcpListener::bind(SocketAddr::from(([127, 0, 0, 1], 0))).await?;
    let local_addr = listener.local_addr()?;

    let embedder =
        BertEmbedder::stub().map_err(|e| ServerStartupError::StartupFailed(e.to_string()))?;
    let reranker =
        Reranker::stub().map_err(|e| ServerStartupError::StartupFailed(e.to_string()))?;

    let service = Arc::new(RelatednessService::new(ChainedClassifier::from_models(
        embedder,
        reranker,
        config.cache_capacity,
    )));
    service
        .update_thresholds(&config.thresholds)
        .map_err(|e| ServerStartupError::StartupFailed(e.to_string()))?;

    let app = create_router_with_state(HandlerState::new(Arc::clone(&service)));

    let (shutdown_tx, shutdown_rx) = oneshot::channel();

    let server_handle = tokio::spawn(async move {
        axum::serve(listener, app)
            .with_graceful_shutdown(async {
                let _ = shutdown_rx.await;
            })
            .await
            .unwrap();
    });

    wait_for_server_ready(
        local_addr,
        Duration::from_secs(STARTUP_WAIT_TIMEOUT_SECS),
        Duration::from_millis(STARTUP_POLL_INTERVAL_MS),
    )
    .await?;

    Ok(TestServer {
        addr: local_addr,
        service,
        _server_handle: server_handle,
        shutdown_tx: Some(shutdown_tx),
    })
}
