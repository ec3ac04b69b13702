use std::net::SocketAddr;
use std::sync::Arc;

use tokio::net::TcpListener;
use tokio::signal;

use warehouse_report_generator::config::Config;
use warehouse_report_generator::inventory::MockInventorySource;
use warehouse_report_generator::llm::{LlmClient, provider_from_config};
use warehouse_report_generator::pipeline::{AnalysisClient, ReportOrchestrator};
use warehouse_report_generator::telemetry::init_telemetry;
use warehouse_report_generator::{AppState, build_router};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_env()?;

    let telemetry_guard = init_telemetry(&config)?;

    tracing::info!(
        port = config.port,
        environment = %config.environment,
        "Starting warehouse-report-generator"
    );

    let provider = provider_from_config(&config);
    tracing::info!(
        provider = %provider.name(),
        model = %config.llm_model,
        timeout_secs = config.analysis_timeout.as_secs(),
        "LLM client initialized"
    );
    let llm_client = Arc::new(LlmClient::new(provider));
    let analysis = AnalysisClient::from_config(llm_client, &config);

    let mut source =
        MockInventorySource::new(config.mock_item_count).with_latency(config.mock_latency);
    if let Some(seed) = config.mock_seed {
        source = source.with_seed(seed);
    }
    tracing::info!(
        items = config.mock_item_count,
        latency_ms = config.mock_latency.as_millis() as u64,
        seeded = config.mock_seed.is_some(),
        "Mock inventory source initialized"
    );

    let orchestrator = ReportOrchestrator::new(
        Arc::new(source),
        analysis,
        config.analysis_timeout,
    );

    let port = config.port;
    let app = build_router(AppState {
        config: Arc::new(config),
        orchestrator: Arc::new(orchestrator),
    });

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = TcpListener::bind(addr).await?;

    tracing::info!(%addr, "Server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server shutdown complete");
    telemetry_guard.shutdown();

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install signal handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
