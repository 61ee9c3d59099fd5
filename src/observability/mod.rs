//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Health monitor produces:
//!     → logging.rs (structured log events)
//!     → metrics.rs (counters, gauges, histograms)
//! ```
//!
//! # Design Decisions
//! - Structured fields (`endpoint`, `error`) on every probe event
//! - Metrics are cheap (atomic increments)

pub mod logging;
pub mod metrics;
