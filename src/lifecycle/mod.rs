//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (main.rs):
//!     Load config → Validate → First probe pass → Start watchdog
//!
//! Shutdown (shutdown.rs):
//!     Signal received → Trigger stop → Watchdog exits → Process exits
//!
//! Signals (signals.rs):
//!     SIGTERM/SIGINT → Trigger shutdown
//! ```
//!
//! # Design Decisions
//! - Fail fast: any configuration error is fatal at startup
//! - Stop is cooperative; tasks check the signal between units of work

pub mod shutdown;
pub mod signals;

pub use shutdown::{Shutdown, ShutdownSignal};
