//! Health checking subsystem.
//!
//! # Data Flow
//! ```text
//! Probe pass (probe.rs):
//!     For every candidate, concurrently
//!     → HEAD <endpoint>/api/tags
//!     → join all, keep 200s, sort by priority
//!
//! Published state (state.rs):
//!     New HealthySet per pass
//!     → atomic swap, newest generation wins
//!
//! Monitor (monitor.rs):
//!     Initial pass on start
//!     → Watchdog: sleep interval → pass → repeat until stopped
//!     → best() reads the current snapshot
//! ```
//!
//! # Design Decisions
//! - Health is binary per pass; no thresholds or history
//! - Probing is behind the `Probe` trait so passes can be driven without HTTP

pub mod monitor;
pub mod probe;
pub mod state;

pub use monitor::{HealthMonitor, SelectionError};
pub use probe::{probe_all, HttpProbe, Probe, ProbeError, HEALTH_PATH};
pub use state::{HealthState, HealthySet, MonitorState};
