//! Configuration schema definitions.
//!
//! This module defines the configuration structure for the signing client.
//! All types derive Serde traits for deserialization from config files.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Default total retry budget. Roughly ten attempts under the default backoff.
pub const DEFAULT_TOTAL_TIMEOUT_MS: u64 = 60_000;

/// Default deadline for a single attempt.
pub const DEFAULT_REQUEST_TIMEOUT_MS: u64 = 5_000;

/// Largest response body accepted from the signing service.
pub const DEFAULT_MAX_RESPONSE_BYTES: usize = 768;

/// Root configuration for the signing client.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Signing service URL (e.g., "https://tssig.example.com/").
    pub endpoint: String,

    /// Total time spent retrying before giving up, in milliseconds.
    pub total_timeout_ms: u64,

    /// Deadline for one request/response exchange, in milliseconds.
    pub request_timeout_ms: u64,

    /// Maximum response body size in bytes.
    pub max_response_bytes: usize,

    /// Value sent in the `User-Agent` header.
    pub user_agent: String,

    /// Exponential backoff tuning.
    pub backoff: BackoffConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

impl ClientConfig {
    /// Default configuration pointed at `endpoint`.
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            ..Self::default()
        }
    }

    pub fn total_timeout(&self) -> Duration {
        Duration::from_millis(self.total_timeout_ms)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            endpoint: String::new(),
            total_timeout_ms: DEFAULT_TOTAL_TIMEOUT_MS,
            request_timeout_ms: DEFAULT_REQUEST_TIMEOUT_MS,
            max_response_bytes: DEFAULT_MAX_RESPONSE_BYTES,
            user_agent: default_user_agent(),
            backoff: BackoffConfig::default(),
            observability: ObservabilityConfig::default(),
        }
    }
}

fn default_user_agent() -> String {
    format!("sts-client-rust/{}", env!("CARGO_PKG_VERSION"))
}

/// Exponential backoff configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct BackoffConfig {
    /// First retry interval in milliseconds.
    pub initial_interval_ms: u64,

    /// Growth factor applied to the interval after each retry.
    pub multiplier: f64,

    /// Jitter as a fraction of the interval (0.5 = ±50%).
    pub randomization_factor: f64,

    /// Upper bound for a single interval in milliseconds.
    pub max_interval_ms: u64,
}

impl BackoffConfig {
    pub fn initial_interval(&self) -> Duration {
        Duration::from_millis(self.initial_interval_ms)
    }

    pub fn max_interval(&self) -> Duration {
        Duration::from_millis(self.max_interval_ms)
    }
}

impl Default for BackoffConfig {
    fn default() -> Self {
        Self {
            initial_interval_ms: 500,
            multiplier: 1.5,
            randomization_factor: 0.5,
            max_interval_ms: 60_000,
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ClientConfig::new("http://localhost:8080");
        assert_eq!(config.total_timeout(), Duration::from_secs(60));
        assert_eq!(config.request_timeout(), Duration::from_secs(5));
        assert_eq!(config.max_response_bytes, 768);
        assert_eq!(config.backoff.initial_interval(), Duration::from_millis(500));
        assert!(config.user_agent.starts_with("sts-client-rust/"));
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config: ClientConfig = toml::from_str(
            r#"
            endpoint = "https://tsa.example.com/sign"
            request_timeout_ms = 2000

            [backoff]
            multiplier = 2.0
            "#,
        )
        .unwrap();

        assert_eq!(config.endpoint, "https://tsa.example.com/sign");
        assert_eq!(config.request_timeout_ms, 2000);
        assert_eq!(config.total_timeout_ms, DEFAULT_TOTAL_TIMEOUT_MS);
        assert_eq!(config.backoff.multiplier, 2.0);
        assert_eq!(config.backoff.initial_interval_ms, 500);
        assert_eq!(config.observability.log_level, "info");
    }
}
