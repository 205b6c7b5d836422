//! Structured logging.
//!
//! # Responsibilities
//! - Initialize the tracing subscriber for the binary
//! - Log retries reported by the signing client
//!
//! # Design Decisions
//! - `RUST_LOG` wins over the configured level when set
//! - Library code never installs a subscriber on its own

use std::time::Duration;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::signing::types::AttemptError;

/// Install the global subscriber. `level` is used when `RUST_LOG` is unset.
pub fn init(level: &str) {
    let _ = tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| format!("sts_client={}", level).into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .try_init();
}

/// Emit one event per retry.
pub fn log_retry(error: &AttemptError, delay: Duration) {
    tracing::warn!(
        reason = error.reason(),
        error = %error,
        delay_ms = delay.as_millis() as u64,
        "Signing attempt failed, retrying"
    );
}
