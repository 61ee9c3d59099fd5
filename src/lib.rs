//! Health-aware selection of the preferred backend server.
//!
//! Probes a fixed list of candidate endpoints (e.g. model-serving daemons)
//! concurrently and answers which reachable one has the lowest priority
//! value.
//!
//! ```no_run
//! # async fn demo() -> Result<(), Box<dyn std::error::Error>> {
//! let config = ollfs::config::load_default_config()?;
//! let monitor = ollfs::HealthMonitor::start(config).await;
//! let server = monitor.best()?;
//! println!("using {}", server.endpoint);
//! monitor.shutdown().await;
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod health;
pub mod lifecycle;
pub mod observability;

pub use config::{ConfigError, MonitorConfig, ServerCandidate};
pub use health::{HealthMonitor, HealthySet, SelectionError};
pub use lifecycle::Shutdown;
