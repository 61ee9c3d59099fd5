//! Liveness probing.
//!
//! # Responsibilities
//! - Issue `HEAD <endpoint>/api/tags` against a candidate (http or https)
//! - Run one probe per candidate concurrently and join them all (a pass)
//! - Return the healthy candidates sorted by ascending priority
//!
//! # Design Decisions
//! - Healthy means HTTP 200 within the timeout; anything else is unhealthy
//! - The timeout is enforced by the pass, so every [`Probe`] honours it
//! - Failures are logged and dropped; callers only see membership
//! - No retries: a candidate failing once is out until the next pass

use std::error::Error as StdError;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use reqwest::StatusCode;
use thiserror::Error;
use tokio::task::JoinSet;
use tokio::time;

use crate::config::ServerCandidate;
use crate::observability::metrics;

/// Path appended to every candidate endpoint.
pub const HEALTH_PATH: &str = "/api/tags";

/// Why a candidate was classified unhealthy.
#[derive(Debug, Error)]
pub enum ProbeError {
    #[error("invalid probe URI `{uri}`: {reason}")]
    InvalidUri { uri: String, reason: String },

    #[error("connection error: {}", error_chain(.0))]
    Transport(reqwest::Error),

    #[error("non-success status {0}")]
    Status(StatusCode),

    #[error("timed out after {0:?}")]
    Timeout(Duration),
}

/// Render an error with all of its causes, outermost first.
fn error_chain(err: &dyn StdError) -> String {
    let mut rendered = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        let cause_text = cause.to_string();
        if !rendered.ends_with(&cause_text) {
            rendered.push_str(": ");
            rendered.push_str(&cause_text);
        }
        source = cause.source();
    }
    rendered
}

/// A single liveness check against one endpoint.
pub trait Probe: Send + Sync + 'static {
    /// Resolve to `Ok(())` if the endpoint is alive.
    fn check(&self, endpoint: &str) -> impl Future<Output = Result<(), ProbeError>> + Send;
}

/// Probes candidates over HTTP or HTTPS.
#[derive(Clone)]
pub struct HttpProbe {
    client: reqwest::Client,
}

impl HttpProbe {
    pub fn new() -> Self {
        // Backends are dialed directly, never through an environment proxy.
        let client = reqwest::Client::builder()
            .user_agent("ollfs-health-check")
            .no_proxy()
            .build()
            .unwrap_or_else(|e| {
                tracing::warn!(error = %e, "Falling back to default HTTP client");
                reqwest::Client::new()
            });
        Self::with_client(client)
    }

    /// Use a preconfigured client (custom roots, proxies, ...).
    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

impl Default for HttpProbe {
    fn default() -> Self {
        Self::new()
    }
}

impl Probe for HttpProbe {
    async fn check(&self, endpoint: &str) -> Result<(), ProbeError> {
        let uri = format!("{}{}", endpoint, HEALTH_PATH);

        let request = self
            .client
            .head(uri.as_str())
            .build()
            .map_err(|e| ProbeError::InvalidUri {
                uri: uri.clone(),
                reason: error_chain(&e),
            })?;

        let response = self
            .client
            .execute(request)
            .await
            .map_err(ProbeError::Transport)?;

        match response.status() {
            StatusCode::OK => Ok(()),
            status => Err(ProbeError::Status(status)),
        }
    }
}

/// Probe every candidate concurrently and return the healthy ones.
///
/// All probes are spawned before any is awaited. The result is sorted by
/// ascending priority with a stable sort applied to completion order, so the
/// relative order of equal priorities varies between passes. This is the only
/// place the healthy set is ordered; [`HealthySet::new`](crate::health::HealthySet::new)
/// takes it as is.
pub async fn probe_all<P: Probe>(
    prober: &Arc<P>,
    candidates: &[ServerCandidate],
    timeout: Duration,
) -> Vec<ServerCandidate> {
    let mut probes = JoinSet::new();

    for candidate in candidates.iter().cloned() {
        let prober = Arc::clone(prober);
        probes.spawn(async move {
            let outcome = match time::timeout(timeout, prober.check(&candidate.endpoint)).await {
                Ok(result) => result,
                Err(_) => Err(ProbeError::Timeout(timeout)),
            };
            (candidate, outcome)
        });
    }

    let mut healthy = Vec::with_capacity(probes.len());

    while let Some(joined) = probes.join_next().await {
        let (candidate, outcome) = match joined {
            Ok(done) => done,
            Err(e) => {
                tracing::error!(error = %e, "Probe task failed");
                continue;
            }
        };

        metrics::record_probe(&candidate.endpoint, outcome.is_ok());

        match outcome {
            Ok(()) => {
                tracing::trace!(endpoint = %candidate.endpoint, "Health check passed");
                healthy.push(candidate);
            }
            Err(e @ ProbeError::Status(_)) => {
                tracing::debug!(endpoint = %candidate.endpoint, error = %e, "Health check failed");
            }
            Err(e) => {
                tracing::warn!(endpoint = %candidate.endpoint, error = %e, "Health check failed");
            }
        }
    }

    healthy.sort_by_key(|c| c.priority);
    healthy
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::health::testing::ScriptedProbe;
    use std::collections::HashSet;
    use std::time::Instant;

    fn candidates(entries: &[(&str, i64)]) -> Vec<ServerCandidate> {
        entries
            .iter()
            .map(|(endpoint, priority)| ServerCandidate::new(*endpoint, *priority))
            .collect()
    }

    #[tokio::test]
    async fn test_only_healthy_candidates_are_kept() {
        let probe = ScriptedProbe::default();
        probe.set_healthy("a", true);
        probe.set_healthy("c", true);

        let all = candidates(&[("c", 7), ("b", 1), ("a", 3)]);
        let healthy = probe_all(&Arc::new(probe), &all, Duration::from_secs(1)).await;

        assert_eq!(healthy, candidates(&[("a", 3), ("c", 7)]));
    }

    #[tokio::test]
    async fn test_single_unhealthy_candidate_yields_empty_set() {
        let probe = Arc::new(ScriptedProbe::default());
        let healthy = probe_all(&probe, &candidates(&[("down", 1)]), Duration::from_millis(50)).await;
        assert!(healthy.is_empty());
    }

    #[tokio::test]
    async fn test_timeout_marks_unhealthy() {
        let probe = ScriptedProbe::default();
        probe.set_healthy("fast", true);
        probe.set_healthy("slow", true);
        probe.set_delay("slow", Duration::from_millis(500));

        let all = candidates(&[("slow", 0), ("fast", 1)]);
        let healthy = probe_all(&Arc::new(probe), &all, Duration::from_millis(100)).await;

        assert_eq!(healthy, candidates(&[("fast", 1)]));
    }

    #[tokio::test]
    async fn test_probes_run_concurrently() {
        let probe = ScriptedProbe::default();
        let names: Vec<String> = (0..8).map(|i| format!("s{}", i)).collect();
        for name in &names {
            probe.set_healthy(name, true);
            probe.set_delay(name, Duration::from_millis(150));
        }
        let all: Vec<ServerCandidate> = names
            .iter()
            .enumerate()
            .map(|(i, n)| ServerCandidate::new(n.clone(), i as i64))
            .collect();

        let started = Instant::now();
        let healthy = probe_all(&Arc::new(probe), &all, Duration::from_secs(2)).await;

        assert_eq!(healthy.len(), 8);
        // Serial execution would take 8 * 150ms.
        assert!(started.elapsed() < Duration::from_millis(600));
    }

    #[tokio::test]
    async fn test_repeated_passes_have_stable_membership() {
        let probe = ScriptedProbe::default();
        let all = candidates(&[("a", 2), ("b", 1), ("c", 2), ("d", 1), ("e", 0)]);
        for c in &all {
            probe.set_healthy(&c.endpoint, true);
        }
        let probe = Arc::new(probe);

        let expected: HashSet<ServerCandidate> = all.iter().cloned().collect();
        for _ in 0..5 {
            let healthy = probe_all(&probe, &all, Duration::from_secs(1)).await;
            assert!(healthy.windows(2).all(|w| w[0].priority <= w[1].priority));
            let members: HashSet<ServerCandidate> = healthy.into_iter().collect();
            assert_eq!(members, expected);
        }
    }

    #[tokio::test]
    async fn test_http_probe_rejects_unreachable_and_malformed() {
        let probe = HttpProbe::new();

        // Nothing listens on port 1.
        let err = probe.check("http://127.0.0.1:1").await.unwrap_err();
        assert!(matches!(err, ProbeError::Transport(_)));

        let err = probe.check("not a uri").await.unwrap_err();
        assert!(matches!(err, ProbeError::InvalidUri { .. }));
    }

    #[tokio::test]
    async fn test_transport_error_names_the_cause() {
        let err = HttpProbe::new()
            .check("http://127.0.0.1:1")
            .await
            .unwrap_err();

        let message = err.to_string();
        assert!(message.starts_with("connection error: "), "got {:?}", message);
        assert!(message.to_lowercase().contains("refused"), "got {:?}", message);
    }

    #[derive(Debug)]
    struct Layer(&'static str, Option<Box<Layer>>);

    impl std::fmt::Display for Layer {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            f.write_str(self.0)
        }
    }

    impl StdError for Layer {
        fn source(&self) -> Option<&(dyn StdError + 'static)> {
            self.1.as_deref().map(|l| l as &(dyn StdError + 'static))
        }
    }

    #[test]
    fn test_error_chain_joins_causes() {
        let io = Layer("Connection refused (os error 111)", None);
        let connect = Layer("tcp connect error", Some(Box::new(io)));
        let outer = Layer("error sending request", Some(Box::new(connect)));

        assert_eq!(
            error_chain(&outer),
            "error sending request: tcp connect error: Connection refused (os error 111)"
        );
    }

    #[test]
    fn test_error_chain_skips_repeated_causes() {
        let inner = Layer("socket closed", None);
        let outer = Layer("read failed: socket closed", Some(Box::new(inner)));

        assert_eq!(error_chain(&outer), "read failed: socket closed");
    }
}
