//! Line-directive parser for `ollfs.conf`.
//!
//! # Format
//! ```text
//! # comment (leading whitespace allowed)
//! watchdog=yes
//! timeout=500
//! interval=30
//! server=http://10.0.0.5:11434,1
//! server=http://10.0.0.6:11434,2
//! ```
//!
//! # Design Decisions
//! - Each line is split once at `=`; the key selects exactly one recognizer
//! - Unknown keys and blank lines are ignored
//! - Scalar directives repeated later in the file override earlier ones
//! - A `#` after content does not start a comment

use thiserror::Error;

use crate::config::loader::ConfigError;
use crate::config::schema::{MonitorConfig, ServerCandidate};

/// Reasons a single directive line can be rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("watchdog must be `yes` or `no`, got `{0}`")]
    InvalidWatchdog(String),

    #[error("{key} must be a non-negative integer, got `{value}`")]
    InvalidNumber { key: &'static str, value: String },

    #[error("Could not read server entry `{0}`, expected `server=<uri>,<priority>`")]
    MalformedServer(String),

    #[error("server priority must be an integer, got `{0}`")]
    InvalidPriority(String),
}

/// A recognized configuration line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Directive {
    Watchdog(bool),
    Timeout(u64),
    Interval(u64),
    Server(ServerCandidate),
}

type Recognizer = fn(&str) -> Result<Directive, ParseError>;

const RECOGNIZERS: &[(&str, Recognizer)] = &[
    ("watchdog", parse_watchdog),
    ("timeout", parse_timeout),
    ("interval", parse_interval),
    ("server", parse_server),
];

/// Settings collected from a configuration file, before validation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawConfig {
    pub watchdog: bool,
    pub timeout_ms: u64,
    pub interval_secs: u64,
    pub servers: Vec<ServerCandidate>,
}

impl RawConfig {
    /// Validate into a [`MonitorConfig`].
    pub fn into_config(self) -> Result<MonitorConfig, ConfigError> {
        let config = MonitorConfig::new(
            self.servers,
            self.timeout_ms,
            self.interval_secs,
            self.watchdog,
        )?;
        Ok(config)
    }

    fn apply(&mut self, directive: Directive) {
        match directive {
            Directive::Watchdog(enabled) => self.watchdog = enabled,
            Directive::Timeout(ms) => self.timeout_ms = ms,
            Directive::Interval(secs) => self.interval_secs = secs,
            Directive::Server(candidate) => self.servers.push(candidate),
        }
    }
}

/// Returns true if `#` is the first character after any ASCII spaces, tabs
/// and line breaks.
pub fn is_comment(line: &str) -> bool {
    line.trim_start_matches([' ', '\t', '\r', '\n']).starts_with('#')
}

/// Classify a single line.
///
/// Returns `Ok(None)` for comments, blank lines and unknown keys.
pub fn parse_line(line: &str) -> Result<Option<Directive>, ParseError> {
    if is_comment(line) {
        return Ok(None);
    }

    let Some((key, value)) = line.split_once('=') else {
        return Ok(None);
    };
    let key = key.trim();

    match RECOGNIZERS.iter().find(|(name, _)| *name == key) {
        Some((_, recognize)) => recognize(value.trim()).map(Some),
        None => Ok(None),
    }
}

/// Parse a whole configuration document.
pub fn parse_document(text: &str) -> Result<RawConfig, ConfigError> {
    let mut raw = RawConfig::default();

    for (index, line) in text.lines().enumerate() {
        let line_no = index + 1;
        match parse_line(line).map_err(|source| ConfigError::Parse { line: line_no, source })? {
            Some(directive) => raw.apply(directive),
            None => {
                if !line.trim().is_empty() && !is_comment(line) {
                    tracing::debug!(line = line_no, "Ignoring unrecognized configuration line");
                }
            }
        }
    }

    Ok(raw)
}

fn parse_watchdog(value: &str) -> Result<Directive, ParseError> {
    match value {
        "yes" => Ok(Directive::Watchdog(true)),
        "no" => Ok(Directive::Watchdog(false)),
        other => Err(ParseError::InvalidWatchdog(other.to_string())),
    }
}

fn parse_timeout(value: &str) -> Result<Directive, ParseError> {
    parse_number("timeout", value).map(Directive::Timeout)
}

fn parse_interval(value: &str) -> Result<Directive, ParseError> {
    parse_number("interval", value).map(Directive::Interval)
}

fn parse_number(key: &'static str, value: &str) -> Result<u64, ParseError> {
    value.parse().map_err(|_| ParseError::InvalidNumber {
        key,
        value: value.to_string(),
    })
}

fn parse_server(value: &str) -> Result<Directive, ParseError> {
    let (endpoint, priority) = value
        .rsplit_once(',')
        .ok_or_else(|| ParseError::MalformedServer(value.to_string()))?;

    let endpoint = endpoint.trim();
    if endpoint.is_empty() {
        return Err(ParseError::MalformedServer(value.to_string()));
    }

    let priority = priority
        .trim()
        .parse()
        .map_err(|_| ParseError::InvalidPriority(priority.trim().to_string()))?;

    Ok(Directive::Server(ServerCandidate::new(endpoint, priority)))
}
