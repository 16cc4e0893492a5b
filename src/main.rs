use std::sync::Arc;

use anyhow::Context;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use fashion_decoder::catalog::Catalog;
use fashion_decoder::chat::SessionStore;
use fashion_decoder::config::AppConfig;
use fashion_decoder::gateway::{FashionGateway, LlmGateway};
use fashion_decoder::llm::create_provider;
use fashion_decoder::server;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = AppConfig::from_env().context("failed to load configuration")?;

    // Keep the guard alive so buffered file logs are flushed on exit.
    let _log_guard = init_tracing(&config);

    let llm = create_provider(&config.llm).context("failed to create LLM provider")?;
    tracing::info!(
        backend = %config.llm.backend,
        model = llm.model_name(),
        "LLM provider ready"
    );

    let gateway: Arc<dyn FashionGateway> = Arc::new(LlmGateway::new(llm, config.gateway.clone()));
    let sessions = SessionStore::new(config.server.gateway_timeout);
    let catalog = Arc::new(Catalog::builtin());
    tracing::info!(
        products = catalog.products().len(),
        xray_items = catalog.xray_items().len(),
        "Catalog loaded"
    );

    let app = server::routes(gateway, sessions, catalog);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;

    eprintln!("👗 Fashion Decoder v{}", env!("CARGO_PKG_VERSION"));
    eprintln!("   Model: {} ({})", config.llm.model, config.llm.backend);
    eprintln!("   API:   http://{}/api", addr);
    eprintln!("   WS:    ws://{}/ws/sessions/{{id}}", addr);

    tracing::info!(%addr, "Fashion Decoder server started");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    tracing::info!("Shut down");
    Ok(())
}

/// Stderr logging, plus a daily rolling file when a log dir is configured.
fn init_tracing(config: &AppConfig) -> Option<tracing_appender::non_blocking::WorkerGuard> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let stderr = tracing_subscriber::fmt::layer()
        .with_target(false)
        .with_writer(std::io::stderr);

    match &config.log_dir {
        Some(dir) => {
            let appender = tracing_appender::rolling::daily(dir, "fashion-decoder.log");
            let (writer, guard) = tracing_appender::non_blocking(appender);
            tracing_subscriber::registry()
                .with(filter)
                .with(stderr)
                .with(
                    tracing_subscriber::fmt::layer()
                        .with_target(false)
                        .with_ansi(false)
                        .with_writer(writer),
                )
                .init();
            Some(guard)
        }
        None => {
            tracing_subscriber::registry().with(filter).with(stderr).init();
            None
        }
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "Failed to listen for Ctrl-C");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
