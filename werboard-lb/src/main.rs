//! werboard-lb - Word error rate leaderboard service
//!
//! Serves an upload form, scores uploaded transcripts against the stored
//! reference with corpus WER, and displays the ranked leaderboard.

use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tokio::signal;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;
use werboard_common::config::{default_config_path, Config, ConfigOverrides, TomlConfig};
use werboard_common::db::{init_database, Store};
use werboard_common::processor::seed_baseline;
use werboard_common::ReferenceSet;
use werboard_lb::{build_router, AppState};

/// Command-line arguments for werboard-lb
#[derive(Parser, Debug)]
#[command(name = "werboard-lb")]
#[command(about = "Word error rate leaderboard service")]
#[command(version)]
struct Args {
    /// TOML configuration file
    #[arg(short, long, env = "WERBOARD_CONFIG")]
    config: Option<PathBuf>,

    /// Folder holding the database (overrides WERBOARD_ROOT_FOLDER and TOML)
    #[arg(short, long)]
    root_folder: Option<PathBuf>,

    /// SQLite database path
    #[arg(short, long, env = "WERBOARD_DATABASE")]
    database: Option<PathBuf>,

    /// Port to listen on
    #[arg(short, long, env = "WERBOARD_PORT")]
    port: Option<u16>,

    /// Address to bind
    #[arg(short, long)]
    bind: Option<String>,

    /// Replace the stored reference with this header-less ID<TAB>transcript file
    #[arg(long, value_name = "TSV")]
    import_reference: Option<PathBuf>,

    /// Create or update the baseline leaderboard row with this WER
    #[arg(long, value_name = "WER")]
    seed_baseline: Option<f64>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let config_path = args.config.clone().unwrap_or_else(default_config_path);
    let toml_config = TomlConfig::load(&config_path)
        .await
        .context("Failed to load configuration")?;

    // RUST_LOG wins over the configured level
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&toml_config.logging.level));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    info!(
        "Starting werboard-lb v{} [{}] built {} ({})",
        env!("CARGO_PKG_VERSION"),
        env!("GIT_HASH"),
        env!("BUILD_TIMESTAMP"),
        env!("BUILD_PROFILE")
    );
    if config_path.exists() {
        info!("Config file: {}", config_path.display());
    } else {
        warn!("Config file {} not found, using defaults", config_path.display());
    }

    let overrides = ConfigOverrides {
        root_folder: args.root_folder,
        database_path: args.database,
        bind_address: args.bind,
        port: args.port,
    };
    let config = Config::resolve(toml_config, overrides).context("Invalid configuration")?;

    info!("Database path: {}", config.database_path.display());
    let pool = init_database(&config.database_path)
        .await
        .context("Failed to open database")?;
    let store = Store::new(pool);

    if let Some(path) = &args.import_reference {
        let bytes = tokio::fs::read(path)
            .await
            .with_context(|| format!("Failed to read reference file {}", path.display()))?;
        let reference = ReferenceSet::parse(&bytes)
            .with_context(|| format!("Invalid reference file {}", path.display()))?;
        store.replace_reference(&reference).await?;
        info!("✓ Imported {} reference transcripts", reference.len());
    }

    if let Some(wer) = args.seed_baseline {
        seed_baseline(&store, &config.scoring, wer)
            .await
            .context("Failed to seed baseline entry")?;
        info!(
            "✓ Baseline '{}' set to WER {:.3}",
            config.scoring.baseline_username, wer
        );
    }

    let reference = store.fetch_reference().await?;
    if reference.is_empty() {
        warn!("Reference store is empty; every submission will be rejected until --import-reference is used");
    } else {
        info!("Reference store holds {} transcripts", reference.len());
    }

    let state = AppState::new(store, config.scoring.clone(), config.max_upload_bytes);
    let app = build_router(state);

    let addr: SocketAddr = format!("{}:{}", config.bind_address, config.port)
        .parse()
        .with_context(|| format!("Invalid bind address {}:{}", config.bind_address, config.port))?;

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .context("Failed to bind to address")?;
    info!("werboard-lb listening on http://{}", addr);
    info!("Health check: http://{}/health", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server shutdown complete");
    Ok(())
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                warn!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, shutting down");
        },
        _ = terminate => {
            info!("Received terminate signal, shutting down");
        },
    }
}
