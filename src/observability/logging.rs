//! Structured logging.
//!
//! # Responsibilities
//! - Initialize the tracing subscriber once per process
//! - Configure log level from `RUST_LOG`, falling back to a default
//!
//! # Design Decisions
//! - Uses tracing crate for structured logging
//! - Library code only emits events; installing a subscriber is the binary's job

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Default filter when `RUST_LOG` is unset.
pub const DEFAULT_FILTER: &str = "ollfs=info";

/// Install the global subscriber.
///
/// `verbose` raises the crate's default level to `debug`. An explicit
/// `RUST_LOG` always takes precedence.
pub fn init(verbose: bool) {
    let fallback = if verbose { "ollfs=debug" } else { DEFAULT_FILTER };

    let result = tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| fallback.into()))
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .try_init();

    if let Err(e) = result {
        // Already installed (e.g. by an embedding application).
        tracing::debug!(error = %e, "Tracing subscriber not installed");
    }
}
