//! Health monitor and best-server selection.
//!
//! # Responsibilities
//! - Run the initial probe pass before handing out the monitor
//! - Periodically re-probe in the background (watchdog), if enabled
//! - Answer "which server should I use right now?"
//!
//! # Design Decisions
//! - Passes are numbered when they start; only the newest result is published
//! - `best()` reads an atomic snapshot and never blocks on a running pass
//! - The watchdog stops cooperatively: the stop signal is checked before every
//!   sleep and raced against every pass, whose probes are aborted on stop

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Instant;

use thiserror::Error;
use tokio::task::JoinHandle;
use tokio::time;

use crate::config::{MonitorConfig, ServerCandidate};
use crate::health::probe::{probe_all, HttpProbe, Probe};
use crate::health::state::{HealthState, HealthySet, MonitorState};
use crate::lifecycle::{Shutdown, ShutdownSignal};
use crate::observability::metrics;

/// Errors returned by the selection query.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SelectionError {
    /// No candidate passed the most recent probe pass.
    #[error("no healthy server available")]
    NoHealthyServer,
}

/// State shared between the monitor handle and its watchdog task.
struct Shared<P> {
    config: MonitorConfig,
    prober: Arc<P>,
    health: HealthState,
    generations: AtomicU64,
}

impl<P: Probe> Shared<P> {
    /// Run one full pass and try to publish it.
    ///
    /// Returns false if a newer pass had already been published.
    async fn run_pass(&self) -> bool {
        let generation = self.generations.fetch_add(1, Ordering::SeqCst) + 1;
        let started = Instant::now();

        let healthy = probe_all(&self.prober, self.config.candidates(), self.config.timeout()).await;
        let elapsed = started.elapsed();

        tracing::debug!(
            generation,
            healthy = healthy.len(),
            total = self.config.candidates().len(),
            elapsed_ms = elapsed.as_millis() as u64,
            "Probe pass complete"
        );
        metrics::record_pass(healthy.len(), elapsed);

        let next = Arc::new(HealthySet::new(generation, healthy));
        match self.health.publish(Arc::clone(&next)) {
            Some(previous) => {
                log_best_change(&previous, &next);
                true
            }
            None => {
                tracing::debug!(generation, "Discarding result of superseded probe pass");
                false
            }
        }
    }

    async fn watchdog(self: Arc<Self>, mut stop: ShutdownSignal) {
        let interval = self.config.refresh_interval();
        tracing::info!(interval_secs = interval.as_secs(), "Watchdog starting");

        loop {
            if stop.is_triggered() {
                break;
            }
            tokio::select! {
                biased;
                _ = stop.recv() => break,
                _ = time::sleep(interval) => {}
            }

            if stop.is_triggered() {
                break;
            }
            tokio::select! {
                biased;
                _ = stop.recv() => break,
                _ = self.run_pass() => {}
            }
        }

        tracing::info!("Watchdog stopped");
    }
}

fn log_best_change(previous: &HealthySet, next: &HealthySet) {
    let before = previous.best().map(|s| s.endpoint.as_str());
    let after = next.best().map(|s| s.endpoint.as_str());
    if before == after {
        return;
    }

    match next.best() {
        Some(best) => tracing::info!(
            endpoint = %best.endpoint,
            priority = best.priority,
            healthy = next.len(),
            "Best server changed"
        ),
        None => tracing::warn!("No healthy server available"),
    }
}

/// Tracks which candidates are healthy and selects the preferred one.
pub struct HealthMonitor<P: Probe = HttpProbe> {
    shared: Arc<Shared<P>>,
    shutdown: Shutdown,
    watchdog: Option<JoinHandle<()>>,
}

impl HealthMonitor<HttpProbe> {
    /// Probe all candidates over HTTP, then start the watchdog if enabled.
    ///
    /// Returns once the first pass has been published.
    pub async fn start(config: MonitorConfig) -> Self {
        Self::with_probe(config, HttpProbe::new()).await
    }
}

impl<P: Probe> HealthMonitor<P> {
    /// Like [`HealthMonitor::start`] with a custom probe.
    pub async fn with_probe(config: MonitorConfig, prober: P) -> Self {
        let shared = Arc::new(Shared {
            config,
            prober: Arc::new(prober),
            health: HealthState::new(),
            generations: AtomicU64::new(0),
        });

        shared.run_pass().await;

        let shutdown = Shutdown::new();
        let watchdog = if shared.config.watchdog_enabled() {
            let task = Arc::clone(&shared).watchdog(shutdown.subscribe());
            Some(tokio::spawn(task))
        } else {
            tracing::info!("Watchdog disabled, healthy set fixed after initial pass");
            None
        };

        Self {
            shared,
            shutdown,
            watchdog,
        }
    }

    /// The healthy server with the lowest priority value.
    pub fn best(&self) -> Result<ServerCandidate, SelectionError> {
        self.shared
            .health
            .best()
            .ok_or(SelectionError::NoHealthyServer)
    }

    /// The full currently published healthy set.
    pub fn healthy(&self) -> Arc<HealthySet> {
        self.shared.health.snapshot()
    }

    pub fn state(&self) -> MonitorState {
        self.shared.health.state()
    }

    pub fn config(&self) -> &MonitorConfig {
        &self.shared.config
    }

    /// Run a pass now, outside the watchdog schedule.
    ///
    /// Returns true if its result was published.
    pub async fn refresh(&self) -> bool {
        self.shared.run_pass().await
    }

    /// Stop the watchdog and wait for it to exit.
    pub async fn shutdown(mut self) {
        self.shutdown.trigger();

        if let Some(handle) = self.watchdog.take() {
            if let Err(e) = handle.await {
                tracing::error!(error = %e, "Watchdog task failed");
            }
        }
    }
}

impl<P: Probe> Drop for HealthMonitor<P> {
    fn drop(&mut self) {
        self.shutdown.trigger();
    }
}
