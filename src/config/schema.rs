//! Configuration schema definitions.
//!
//! This module defines the candidate list and monitor-wide settings consumed
//! by the health monitor. A [`MonitorConfig`] can only be obtained through
//! validation, so every value of it is usable as-is.

use std::time::Duration;

use serde::Serialize;

use crate::config::validation::{validate, ValidationError};

/// A configured backend server.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct ServerCandidate {
    /// Base URI of the backend (e.g., "http://10.0.0.5:11434").
    pub endpoint: String,

    /// Preference (lower = preferred). Not required to be unique.
    pub priority: i64,
}

impl ServerCandidate {
    /// Create a new candidate.
    pub fn new(endpoint: impl Into<String>, priority: i64) -> Self {
        Self {
            endpoint: endpoint.into(),
            priority,
        }
    }
}

/// Validated settings for the health monitor.
#[derive(Debug, Clone, Serialize)]
pub struct MonitorConfig {
    /// Per-probe timeout in milliseconds.
    timeout_ms: u64,

    /// Watchdog cadence in seconds.
    refresh_interval_secs: u64,

    /// Run periodic passes in the background.
    watchdog: bool,

    /// Candidates in configuration order.
    candidates: Vec<ServerCandidate>,
}

impl MonitorConfig {
    /// Validate the settings and build a config.
    pub fn new(
        candidates: Vec<ServerCandidate>,
        timeout_ms: u64,
        refresh_interval_secs: u64,
        watchdog: bool,
    ) -> Result<Self, Vec<ValidationError>> {
        validate(&candidates, timeout_ms, refresh_interval_secs)?;

        Ok(Self {
            timeout_ms,
            refresh_interval_secs,
            watchdog,
            candidates,
        })
    }

    /// Per-probe timeout.
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Delay between two watchdog passes.
    pub fn refresh_interval(&self) -> Duration {
        Duration::from_secs(self.refresh_interval_secs)
    }

    pub fn watchdog_enabled(&self) -> bool {
        self.watchdog
    }

    pub fn candidates(&self) -> &[ServerCandidate] {
        &self.candidates
    }
}
