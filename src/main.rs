//! Relate HTTP server entrypoint.

use std::sync::Arc;
use std::time::Duration;

use mimalloc::MiMalloc;
use tokio::net::TcpListener;
use tokio::signal;

use relate::classifier::{ChainedClassifier, RelatednessService};
use relate::config::Config;
use relate::constants::DEFAULT_PORT;
use relate::embedding::{BertEmbedder, EmbedderConfig, Reranker, RerankerConfig};
use relate::gateway::{HandlerState, create_router_with_state};

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    if std::env::args().any(|arg| arg == "--health-check") {
        std::process::exit(run_health_check().await);
    }

    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let config = Config::from_env()?;
    config.validate()?;
    let addr = config.socket_addr();

    tracing::info!(
        bind_addr = %config.bind_addr,
        port = config.port,
        cache_capacity = config.cache_capacity,
        "Relate starting"
    );

    let mut embedder_config = match &config.embedder_path {
        Some(path) => EmbedderConfig::new(path.clone()),
        None => EmbedderConfig::stub(),
    };
    if let Some(instruction) = &config.query_instruction {
        embedder_config = embedder_config.with_query_instruction(instruction.clone());
    }

    let reranker_config = match &config.reranker_path {
        Some(path) => RerankerConfig::new(path.clone()),
        None => RerankerConfig::stub(),
    };

    // Model loading reads safetensors from disk; keep it off the runtime threads.
    let (embedder, reranker) = tokio::task::spawn_blocking(move || {
        anyhow::Ok((
            BertEmbedder::load(embedder_config)?,
            Reranker::load(reranker_config)?,
        ))
    })
    .await??;

    let embedder_is_stub = embedder.is_stub();
    let reranker_is_stub = !reranker.is_model_loaded();

    let service = Arc::new(RelatednessService::new(ChainedClassifier::from_models(
        embedder,
        reranker,
        config.cache_capacity,
    )));

    if !config.thresholds.is_empty() {
        let changed = service.update_thresholds(&config.thresholds)?;
        tracing::info!(changed = ?changed, "Applied RELATE_THRESHOLDS overrides");
    }

    for (stage, thresholds) in service.thresholds() {
        tracing::info!(
            stage = %stage,
            true_threshold = thresholds.true_threshold,
            false_threshold = thresholds.false_threshold,
            "Stage ready"
        );
    }

    let state = HandlerState::new(service).with_model_modes(embedder_is_stub, reranker_is_stub);
    let app = create_router_with_state(state);

    let listener = TcpListener::bind(addr).await?;
    tracing::info!(addr = %addr, "Server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Relate shutdown complete");
    Ok(())
}

async fn run_health_check() -> i32 {
    let port = std::env::var("RELATE_PORT")
        .ok()
        .and_then(|p| p.trim().parse::<u16>().ok())
        .unwrap_or(DEFAULT_PORT);

    let url = format!("http://127.0.0.1:{}/healthz", port);

    let Ok(client) = reqwest::Client::builder()
        .timeout(Duration::from_secs(1))
        .build()
    else {
        return 1;
    };

    match client.get(&url).send().await {
        Ok(res) if res.status().is_success() => 0,
        _ => 1,
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
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
            tracing::info!("Received SIGTERM, initiating graceful shutdown");
        }
    }
}
