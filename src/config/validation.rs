//! Configuration validation.
//!
//! # Responsibilities
//! - Validate value ranges (timeout > 0, interval > 0)
//! - Require at least one candidate server
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Endpoint URIs are not checked; a malformed one simply fails every probe
//! - Runs before config is accepted into the system

use thiserror::Error;

use crate::config::schema::ServerCandidate;

/// A single violated configuration constraint.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("interval is not set")]
    ZeroInterval,

    #[error("timeout is not set")]
    ZeroTimeout,

    #[error("no servers configured")]
    NoServers,
}

/// Check the monitor settings.
pub fn validate(
    candidates: &[ServerCandidate],
    timeout_ms: u64,
    refresh_interval_secs: u64,
) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if refresh_interval_secs == 0 {
        errors.push(ValidationError::ZeroInterval);
    }
    if timeout_ms == 0 {
        errors.push(ValidationError::ZeroTimeout);
    }
    if candidates.is_empty() {
        errors.push(ValidationError::NoServers);
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn one_server() -> Vec<ServerCandidate> {
        vec![ServerCandidate::new("http://localhost:11434", 0)]
    }

    #[test]
    fn test_accepts_minimal_config() {
        assert!(validate(&one_server(), 1, 1).is_ok());
    }

    #[test]
    fn test_each_constraint_is_reported() {
        assert_eq!(
            validate(&one_server(), 100, 0),
            Err(vec![ValidationError::ZeroInterval])
        );
        assert_eq!(
            validate(&one_server(), 0, 10),
            Err(vec![ValidationError::ZeroTimeout])
        );
        assert_eq!(validate(&[], 100, 10), Err(vec![ValidationError::NoServers]));
    }

    #[test]
    fn test_collects_all_errors() {
        let errors = validate(&[], 0, 0).unwrap_err();
        assert_eq!(
            errors,
            vec![
                ValidationError::ZeroInterval,
                ValidationError::ZeroTimeout,
                ValidationError::NoServers,
            ]
        );
    }

    #[test]
    fn test_malformed_endpoint_is_not_rejected() {
        let candidates = vec![ServerCandidate::new("not a uri", 3)];
        assert!(validate(&candidates, 10, 10).is_ok());
    }
}
