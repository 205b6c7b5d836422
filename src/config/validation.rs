//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Endpoint must be an absolute http(s) URL
//! - Timeouts, size ceiling and backoff factors must be in range
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: ClientConfig → Result<(), Vec<ValidationError>>

use std::fmt;

use url::Url;

use crate::config::schema::ClientConfig;

/// A single semantic problem in a [`ClientConfig`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// Dotted path of the offending field.
    pub field: &'static str,
    pub message: String,
}

impl ValidationError {
    fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Check a configuration for values the client cannot operate with.
pub fn validate_config(config: &ClientConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.endpoint.is_empty() {
        errors.push(ValidationError::new("endpoint", "must be set"));
    } else {
        match Url::parse(&config.endpoint) {
            Ok(url) if matches!(url.scheme(), "http" | "https") => {}
            Ok(url) => errors.push(ValidationError::new(
                "endpoint",
                format!("unsupported scheme '{}'", url.scheme()),
            )),
            Err(e) => errors.push(ValidationError::new(
                "endpoint",
                format!("invalid URL '{}': {}", config.endpoint, e),
            )),
        }
    }

    if config.total_timeout_ms == 0 {
        errors.push(ValidationError::new("total_timeout_ms", "must be greater than 0"));
    }
    if config.request_timeout_ms == 0 {
        errors.push(ValidationError::new("request_timeout_ms", "must be greater than 0"));
    }
    if config.max_response_bytes == 0 {
        errors.push(ValidationError::new("max_response_bytes", "must be greater than 0"));
    }
    if config.user_agent.trim().is_empty() {
        errors.push(ValidationError::new("user_agent", "must not be empty"));
    }

    let backoff = &config.backoff;
    if backoff.initial_interval_ms == 0 {
        errors.push(ValidationError::new(
            "backoff.initial_interval_ms",
            "must be greater than 0",
        ));
    }
    if backoff.max_interval_ms < backoff.initial_interval_ms {
        errors.push(ValidationError::new(
            "backoff.max_interval_ms",
            "must not be smaller than initial_interval_ms",
        ));
    }
    if !(backoff.multiplier >= 1.0 && backoff.multiplier.is_finite()) {
        errors.push(ValidationError::new("backoff.multiplier", "must be a finite value >= 1.0"));
    }
    if !(0.0..=1.0).contains(&backoff.randomization_factor) {
        errors.push(ValidationError::new(
            "backoff.randomization_factor",
            "must be between 0.0 and 1.0",
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
