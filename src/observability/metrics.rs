//! Signing metrics.
//!
//! # Metrics
//! - `sts_client_retries_total` (counter): retries by failure reason
//! - `sts_client_retry_delay_seconds` (histogram): backoff delays
//! - `sts_client_sign_total` (counter): finished calls by outcome
//!
//! No recorder is installed here; without one these are no-ops.

use std::time::Duration;

use crate::signing::types::{AttemptError, ErrorKind, SignError};

pub fn record_retry(error: &AttemptError, delay: Duration) {
    metrics::counter!("sts_client_retries_total", "reason" => error.reason()).increment(1);
    metrics::histogram!("sts_client_retry_delay_seconds").record(delay.as_secs_f64());
}

pub fn record_outcome<T>(result: &Result<T, SignError>) {
    metrics::counter!("sts_client_sign_total", "outcome" => outcome_label(result)).increment(1);
}

fn outcome_label<T>(result: &Result<T, SignError>) -> &'static str {
    match result {
        Ok(_) => "success",
        Err(e) => match e.kind() {
            ErrorKind::Validation => "invalid_digest",
            ErrorKind::Permanent => "permanent",
            ErrorKind::Exhausted => "exhausted",
        },
    }
}
