//! askstack server
//!
//! Main entry point for the askstack backend. Streams a Q&A corpus,
//! ranks matches against incoming questions, and serves LLM-generated
//! answers over HTTP.

use askstack::api::create_router;
use askstack::api::handlers::{AppState, LocalSearch};
use askstack_core::{config::AppConfig, logging, AppResult};
use askstack_llm::create_client;
use askstack_retrieval::{
    CachedSearch, HfRowsSource, JsonFileSource, ProgressReporter, StreamingMatcher,
};
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;

/// askstack server - retrieval-augmented Q&A over a streamed corpus
#[derive(Parser, Debug)]
#[command(name = "askstack")]
#[command(about = "Retrieval-augmented Q&A backend", long_about = None)]
#[command(version)]
struct Cli {
    /// Port to listen on
    #[arg(short, long, env = "ASKSTACK_PORT")]
    port: Option<u16>,

    /// Path to config file
    #[arg(short, long, env = "ASKSTACK_CONFIG")]
    config: Option<PathBuf>,

    /// LLM provider (gemini)
    #[arg(long, env = "ASKSTACK_PROVIDER")]
    provider: Option<String>,

    /// Model identifier
    #[arg(short, long, env = "ASKSTACK_MODEL")]
    model: Option<String>,

    /// Path to a local JSON Q&A corpus
    #[arg(long, env = "ASKSTACK_DATA")]
    data: Option<PathBuf>,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, env = "RUST_LOG")]
    log_level: Option<String>,

    /// Disable colored output
    #[arg(long, env = "NO_COLOR")]
    no_color: bool,

    /// Emit logs as newline-delimited JSON
    #[arg(long, env = "ASKSTACK_LOG_JSON")]
    log_json: bool,
}

#[tokio::main]
async fn main() -> AppResult<()> {
    // Parse command-line arguments first (needed for logging config)
    let cli = Cli::parse();

    // Load base configuration from environment
    let config = AppConfig::load()?;

    // Apply CLI overrides
    let config = config.with_overrides(
        cli.port,
        cli.config,
        cli.provider,
        cli.model,
        cli.data,
        cli.log_level,
        cli.no_color,
        cli.log_json,
    )?;

    // Initialize logging with final configuration
    logging::init_logging(config.log_level.as_deref(), config.no_color, config.log_json)?;

    tracing::info!("askstack server starting");
    tracing::debug!("Provider: {}", config.provider);
    tracing::debug!("Model: {}", config.model);
    tracing::debug!("Dataset: {}/{} ({})", config.dataset, config.dataset_config, config.split);

    config.validate()?;

    let state = build_state(config)?;
    let addr = format!("0.0.0.0:{}", state.config.port);
    let app = create_router(state.clone());

    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        addr = %addr,
        provider = %state.config.provider,
        dataset = %state.config.dataset,
        local_corpus = state.local.is_some(),
        "askstack listening"
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server shutdown complete");
    Ok(())
}

/// Assemble the shared application state from the resolved configuration.
fn build_state(config: AppConfig) -> AppResult<AppState> {
    let dataset = Arc::new(
        HfRowsSource::new(
            config.dataset.clone(),
            config.dataset_config.clone(),
            config.split.clone(),
        )
        .with_endpoint(config.hf_endpoint.clone()),
    );

    let matcher = StreamingMatcher::new(dataset.clone())
        .with_progress(ProgressReporter::noop().with_interval(config.scan.progress_every as u64));
    let search = Arc::new(CachedSearch::with_capacity(matcher, config.cache_capacity));

    // A missing local corpus only fails requests that ask for it.
    let local = match &config.local_data {
        Some(path) if path.exists() => {
            let source = JsonFileSource::load(path)?;
            tracing::info!(path = %path.display(), records = source.len(), "Local corpus loaded");
            Some(Arc::new(LocalSearch::new(source)))
        }
        Some(path) => {
            tracing::warn!(path = %path.display(), "Local corpus not found, local source disabled");
            None
        }
        None => None,
    };

    let llm = create_client(
        &config.provider,
        config.llm_endpoint.as_deref(),
        config.api_key.as_deref(),
    )?;

    Ok(AppState {
        config: Arc::new(config),
        search,
        dataset,
        local,
        llm,
    })
}

/// Resolve on Ctrl+C or SIGTERM.
async fn shutdown_signal() {
    use tokio::signal;

    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut term) => {
                term.recv().await;
            }
            Err(e) => tracing::error!("Failed to install SIGTERM handler: {}", e),
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => tracing::info!("Received Ctrl+C, shutting down"),
        _ = terminate => tracing::info!("Received SIGTERM, shutting down"),
    }
}
