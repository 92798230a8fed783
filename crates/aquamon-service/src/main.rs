//! Aquamon Service - basin monitoring loop.
//!
//! Run with: `cargo run -p aquamon-service`

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use tracing::info;

use aquamon_service::{Config, Runner, stop_channel};
use aquamon_store::FileStore;

/// Aquamon Service - background basin monitoring loop.
#[derive(Parser, Debug)]
#[command(name = "aquamon-service")]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Data directory (overrides config).
    #[arg(short, long)]
    data_dir: Option<PathBuf>,

    /// Sampling interval in milliseconds (overrides config).
    #[arg(short, long)]
    refresh: Option<u64>,

    /// Sample every basin once and exit.
    #[arg(long)]
    once: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("aquamon_service=info".parse()?)
                .add_directive("aquamon_store=info".parse()?),
        )
        .init();

    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => Config::load(path)?,
        None => Config::load_default(),
    };

    if let Some(data_dir) = args.data_dir {
        config.storage.path = data_dir;
    }
    if let Some(refresh) = args.refresh {
        config.display.refresh_interval_ms = refresh;
    }

    config.validate()?;

    info!("Opening data directory at {:?}", config.storage.path);
    let store = Arc::new(FileStore::open(&config.storage.path)?);

    let mut runner = Runner::new(&config, store)?;

    if args.once {
        runner.run_once();
        return Ok(());
    }

    let (stop_tx, stop_rx) = stop_channel();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            let _ = stop_tx.send(true);
        }
    });

    runner.run(stop_rx).await;
    Ok(())
}
