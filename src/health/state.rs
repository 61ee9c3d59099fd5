//! Published health state.
//!
//! # States
//! - Idle: no pass has completed (generation 0, empty set)
//! - Running: at least one pass has been published
//!
//! # Design Decisions
//! - Each pass builds a whole new [`HealthySet`]; nothing is patched in place
//! - Publishing is a single compare-and-swap of an `Arc`, readers never lock
//! - A snapshot is only installed if its generation is newer than the current
//!   one, so a slow pass that finishes late cannot overwrite a newer result

use std::sync::Arc;

use arc_swap::ArcSwap;
use serde::Serialize;

use crate::config::ServerCandidate;

/// Lifecycle of the monitor as seen through its published state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MonitorState {
    Idle,
    Running,
}

/// Priority-sorted candidates that passed one probe pass.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct HealthySet {
    generation: u64,
    servers: Vec<ServerCandidate>,
}

impl HealthySet {
    /// Build the snapshot for pass `generation`.
    ///
    /// `servers` must already be in ascending priority order, as returned by
    /// [`probe_all`](crate::health::probe_all). The order is kept as given.
    pub fn new(generation: u64, servers: Vec<ServerCandidate>) -> Self {
        debug_assert!(
            servers.windows(2).all(|w| w[0].priority <= w[1].priority),
            "healthy servers must be sorted by priority"
        );
        Self { generation, servers }
    }

    /// The most preferred healthy server.
    pub fn best(&self) -> Option<&ServerCandidate> {
        self.servers.first()
    }

    pub fn servers(&self) -> &[ServerCandidate] {
        &self.servers
    }

    /// Number of the pass that produced this set (0 = none yet).
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn is_empty(&self) -> bool {
        self.servers.is_empty()
    }

    pub fn len(&self) -> usize {
        self.servers.len()
    }
}

/// Holder of the currently published [`HealthySet`].
#[derive(Debug)]
pub struct HealthState {
    current: ArcSwap<HealthySet>,
}

impl HealthState {
    /// Start Idle with an empty set.
    pub fn new() -> Self {
        Self {
            current: ArcSwap::from_pointee(HealthySet::default()),
        }
    }

    /// Take a snapshot of the current set.
    pub fn snapshot(&self) -> Arc<HealthySet> {
        self.current.load_full()
    }

    /// Clone out the best server without taking a reference count.
    pub fn best(&self) -> Option<ServerCandidate> {
        self.current.load().best().cloned()
    }

    pub fn state(&self) -> MonitorState {
        if self.current.load().generation() == 0 {
            MonitorState::Idle
        } else {
            MonitorState::Running
        }
    }

    /// Install `next` unless a newer generation is already published.
    ///
    /// Returns the replaced snapshot, or `None` if `next` was stale.
    pub fn publish(&self, next: Arc<HealthySet>) -> Option<Arc<HealthySet>> {
        let previous = self.current.rcu(|current| {
            if current.generation() < next.generation() {
                Arc::clone(&next)
            } else {
                Arc::clone(current)
            }
        });

        if previous.generation() < next.generation() {
            Some(previous)
        } else {
            None
        }
    }
}

impl Default for HealthState {
    fn default() -> Self {
        Self::new()
    }
}
