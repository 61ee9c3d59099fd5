//! ollfs
//!
//! Watches a list of backend servers and keeps track of the preferred one
//! that is currently reachable.
//!
//! # Architecture Overview
//!
//! ```text
//!   ollfs.conf ──▶ config ──▶ MonitorConfig
//!                                  │
//!                                  ▼
//!                        ┌───────────────────┐   HEAD /api/tags   ┌──────────┐
//!                        │   HealthMonitor   │ ─────────────────▶ │ backends │
//!                        │  (probe pass +    │ ◀───────────────── │          │
//!                        │   watchdog)       │    200 / error     └──────────┘
//!                        └─────────┬─────────┘
//!                                  │ atomic publish
//!                                  ▼
//!                             HealthySet ──▶ best()
//! ```

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;

use ollfs::config::{load_config, load_default_config};
use ollfs::health::HealthMonitor;
use ollfs::lifecycle::signals;
use ollfs::observability::logging;

#[derive(Parser)]
#[command(name = "ollfs")]
#[command(about = "Select the preferred healthy backend server", long_about = None)]
struct Cli {
    /// Configuration file (default: ./ollfs.conf, then /etc/ollfs.conf)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Run a single probe pass, print the healthy servers as JSON and exit
    #[arg(long)]
    once: bool,

    /// Log at debug level unless RUST_LOG is set
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<ExitCode, Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    let loaded = match &cli.config {
        Some(path) => load_config(path),
        None => load_default_config(),
    };
    let config = match loaded {
        Ok(config) => config,
        Err(e) => {
            tracing::error!(error = %e, "Invalid configuration");
            return Ok(ExitCode::FAILURE);
        }
    };

    tracing::info!(
        servers = config.candidates().len(),
        timeout_ms = config.timeout().as_millis() as u64,
        interval_secs = config.refresh_interval().as_secs(),
        watchdog = config.watchdog_enabled(),
        "Configuration loaded"
    );

    let monitor = HealthMonitor::start(config).await;

    if cli.once {
        let healthy = monitor.healthy();
        println!("{}", serde_json::to_string_pretty(healthy.servers())?);
        monitor.shutdown().await;
        return Ok(if healthy.is_empty() {
            ExitCode::FAILURE
        } else {
            ExitCode::SUCCESS
        });
    }

    match monitor.best() {
        Ok(best) => tracing::info!(
            endpoint = %best.endpoint,
            priority = best.priority,
            "Best server selected"
        ),
        Err(e) => tracing::warn!(error = %e, "Starting without a healthy server"),
    }

    signals::wait_for_signal().await;
    monitor.shutdown().await;

    tracing::info!("Shutdown complete");
    Ok(ExitCode::SUCCESS)
}
