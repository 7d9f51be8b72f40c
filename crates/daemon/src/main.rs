//! MergeGate daemon entry point.
//!
//! Loads configuration, wires the git adapter and resolution store, starts
//! the review web service, and handles graceful shutdown.

mod signals;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use mergegate_core::config::AppConfig;
use mergegate_core::context::ProjectContext;
use mergegate_core::git::GitCli;
use mergegate_core::store::sink::TracingSink;
use mergegate_core::store::{LocalStore, RemoteStore, ResolutionStore};
use mergegate_web::WebServer;

// ---------------------------------------------------------------------------
// CLI arguments
// ---------------------------------------------------------------------------

/// MergeGate review daemon.
#[derive(Parser, Debug)]
#[command(
    name = "mergegate-daemon",
    version,
    about = "Merge-conflict resolution review daemon"
)]
struct Args {
    /// Path to the TOML configuration file.
    #[arg(short, long)]
    config: PathBuf,

    /// Override the log level from the config file (trace, debug, info, warn, error).
    #[arg(long)]
    log_level: Option<String>,

    /// Enable review mode: proposals are held for human review and
    /// proposals without a substantive reason are hidden from listings.
    #[arg(long)]
    review: bool,

    /// Delegate all store operations to a peer review service at this base
    /// URL instead of serving them locally.
    #[arg(long)]
    delegate: Option<String>,
}

// ---------------------------------------------------------------------------
// Main
// ---------------------------------------------------------------------------

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Load configuration, then fold in command-line overrides before
    // validating so an override is subject to the same checks.
    let mut config =
        AppConfig::load_from_file(&args.config).context("failed to load configuration file")?;
    if args.review {
        config.web.review_mode = true;
    }
    if let Some(url) = &args.delegate {
        config.delegate.url = Some(url.clone());
    }
    config
        .validate()
        .context("configuration validation failed")?;

    // Initialize tracing
    let log_level = args
        .log_level
        .as_deref()
        .unwrap_or(&config.daemon.log_level);

    let filter = EnvFilter::try_new(log_level).unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(false)
        .with_file(false)
        .init();

    let store_desc = match &config.delegate.url {
        Some(url) => format!("delegated to {url}"),
        None => "local".to_string(),
    };

    // Startup banner
    info!("========================================");
    info!("  MergeGate Daemon v{}", env!("CARGO_PKG_VERSION"));
    info!("========================================");
    info!("Config file  : {}", args.config.display());
    info!("Project root : {}", config.project.root.display());
    info!("Web listen   : {}", config.web.listen);
    info!("Review mode  : {}", config.web.review_mode);
    info!("Store        : {}", store_desc);
    if let Some(state_file) = &config.store.state_file {
        info!("State file   : {}", state_file.display());
    }
    info!("Log level    : {}", log_level);
    info!("========================================");

    // Project context and git adapter
    let context = Arc::new(ProjectContext::new(config.project.root.clone()));
    let source = Arc::new(GitCli::new());

    // Resolution store: local authority, or a relay onto a peer service.
    let store: Arc<dyn ResolutionStore> = match &config.delegate.url {
        Some(url) => {
            let remote = RemoteStore::connect(url)
                .await
                .context("failed to connect to delegation peer")?;
            info!("Delegating resolution store to {}", url);
            Arc::new(remote)
        }
        None => {
            if let Some(state_file) = &config.store.state_file {
                if let Some(parent) = state_file.parent() {
                    std::fs::create_dir_all(parent)
                        .context("failed to create state file directory")?;
                }
            }
            Arc::new(LocalStore::new(
                source,
                context,
                Arc::new(TracingSink),
                config.web.review_mode,
                config.store.state_file.clone(),
            ))
        }
    };

    // Start the review web service in the background
    let web_server = WebServer::new(store, config.web.review_mode);
    let listen_addr = config.web.listen.clone();
    let web_handle = tokio::spawn(async move {
        if let Err(e) = web_server.start(&listen_addr).await {
            error!("Web server error: {}", e);
        }
    });

    // Wait for shutdown signal
    signals::wait_for_shutdown().await;

    info!("Shutdown signal received, stopping...");
    web_handle.abort();

    info!("MergeGate daemon stopped.");
    Ok(())
}
