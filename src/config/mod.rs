//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML) or ClientConfig::new(endpoint)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → ClientConfig (validated, immutable)
//!     → owned by SigningClient, shared across concurrent calls
//! ```
//!
//! # Design Decisions
//! - Config is immutable once the client is built
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, parse_config, read_config, ConfigError};
pub use schema::{BackoffConfig, ClientConfig, ObservabilityConfig};
pub use validation::{validate_config, ValidationError};
