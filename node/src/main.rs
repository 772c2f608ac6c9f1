//! KV store node (`kvstore-node`)
//!
//! Opens the durable store and serves the ABCI socket protocol to a
//! consensus engine until interrupted.

use std::net::SocketAddr;
use std::path::PathBuf;

use clap::Parser;
use kvstore_app::KvStoreApp;
use kvstore_node::{NodeConfig, NodeError};
use kvstore_store::{KvStore, RedbStore};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "kvstore-node", version, about = "Key-value store ABCI application")]
struct Args {
    /// JSON config file
    #[arg(long, short)]
    config: Option<PathBuf>,

    /// Address to listen on (overrides config)
    #[arg(long)]
    listen: Option<SocketAddr>,

    /// Storage directory (overrides config)
    #[arg(long)]
    storage_dir: Option<PathBuf>,

    /// Verbose logging (-v for debug, -vv for trace)
    #[arg(long, short, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => NodeConfig::load(path)?,
        None => NodeConfig::default(),
    };
    if let Some(listen) = args.listen {
        config.listen_addr = listen;
    }
    if let Some(dir) = args.storage_dir {
        config.storage_dir = dir;
    }

    init_tracing(&config.log_level, args.verbose)?;

    tracing::info!("kvstore-node v{} starting...", env!("CARGO_PKG_VERSION"));

    let store = RedbStore::open(&config.storage_dir).map_err(|e| {
        tracing::error!("Failed to open store at {}: {}", config.storage_dir.display(), e);
        NodeError::from(e)
    })?;
    tracing::info!("Store: {}", store.path().display());

    let app = KvStoreApp::new(KvStore::new(store));

    kvstore_node::run(config.listen_addr, app, async {
        shutdown_signal().await;
        tracing::info!("Shutdown signal received...");
    })
    .await?;

    tracing::info!("Node stopped");
    Ok(())
}

fn init_tracing(default_level: &str, verbosity: u8) -> anyhow::Result<()> {
    let mut filter = EnvFilter::from_default_env();

    // Only apply defaults if RUST_LOG is not set
    if std::env::var("RUST_LOG").is_err() {
        let level = match verbosity {
            0 => default_level,
            1 => "debug",
            _ => "trace",
        };
        filter = filter.add_directive(level.parse()?);
    }

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
    Ok(())
}

async fn shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};
        let (mut sigint, mut sigterm) =
            match (signal(SignalKind::interrupt()), signal(SignalKind::terminate())) {
                (Ok(int), Ok(term)) => (int, term),
                (Err(e), _) | (_, Err(e)) => {
                    tracing::error!("Failed to install signal handlers: {}", e);
                    let _ = tokio::signal::ctrl_c().await;
                    return;
                }
            };
        tokio::select! {
            _ = sigint.recv() => {}
            _ = sigterm.recv() => {}
        }
    }
    #[cfg(not(unix))]
    {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl+C: {}", e);
        }
    }
}
