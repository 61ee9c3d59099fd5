//! Configuration loading from disk.

use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::config::parser::{parse_document, ParseError};
use crate::config::schema::MonitorConfig;
use crate::config::validation::ValidationError;

/// Looked up first, relative to the working directory.
pub const LOCAL_CONFIG_PATH: &str = "./ollfs.conf";

/// Fallback system-wide location.
pub const SYSTEM_CONFIG_PATH: &str = "/etc/ollfs.conf";

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Config file is missing (searched {})", display_paths(.searched))]
    Missing { searched: Vec<PathBuf> },

    #[error("IO error reading {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Parse error on line {line}: {source}")]
    Parse { line: usize, source: ParseError },

    #[error("Validation failed: {}", display_errors(.0))]
    Validation(Vec<ValidationError>),
}

impl From<Vec<ValidationError>> for ConfigError {
    fn from(errors: Vec<ValidationError>) -> Self {
        ConfigError::Validation(errors)
    }
}

fn display_paths(paths: &[PathBuf]) -> String {
    paths
        .iter()
        .map(|p| p.display().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

fn display_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Parse and validate configuration text.
pub fn parse_config(text: &str) -> Result<MonitorConfig, ConfigError> {
    parse_document(text)?.into_config()
}

/// Load and validate configuration from a file.
pub fn load_config(path: &Path) -> Result<MonitorConfig, ConfigError> {
    let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let config = parse_config(&content)?;

    tracing::debug!(
        path = %path.display(),
        servers = config.candidates().len(),
        "Configuration parsed"
    );
    Ok(config)
}

/// Load from the first existing path among `candidates`.
pub fn load_first_existing<P: AsRef<Path>>(candidates: &[P]) -> Result<MonitorConfig, ConfigError> {
    let mut searched = Vec::with_capacity(candidates.len());

    for candidate in candidates {
        let path: &Path = candidate.as_ref();
        if path.is_file() {
            return load_config(path);
        }
        searched.push(path.to_path_buf());
    }

    Err(ConfigError::Missing { searched })
}

/// Load from `./ollfs.conf`, falling back to `/etc/ollfs.conf`.
pub fn load_default_config() -> Result<MonitorConfig, ConfigError> {
    load_first_existing(&[LOCAL_CONFIG_PATH, SYSTEM_CONFIG_PATH])
}
