//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! ollfs.conf (line directives)
//!     → loader.rs (locate & read)
//!     → parser.rs (classify each line)
//!     → validation.rs (semantic checks)
//!     → MonitorConfig (validated, immutable)
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded
//! - MonitorConfig cannot be constructed without passing validation
//! - Parsing (per line) is separate from validation (whole config)

pub mod loader;
pub mod parser;
pub mod schema;
pub mod validation;

pub use loader::{load_config, load_default_config, parse_config, ConfigError};
pub use schema::{MonitorConfig, ServerCandidate};
pub use validation::ValidationError;
