//! Retry classification.
//!
//! # Responsibilities
//! - Map HTTP status codes to retryable / permanent failures
//! - Fold an attempt result into exactly one [`Outcome`]
//!
//! # Design Decisions
//! - 429 and 5xx are the only statuses worth repeating
//! - Timeouts are retryable; other transport failures are not
//! - Oversized or undecodable bodies are protocol violations, never retried

use reqwest::StatusCode;

use crate::signing::types::AttemptError;

/// Result of one attempt.
#[derive(Debug)]
pub enum Outcome<T> {
    Success(T),
    Retryable(AttemptError),
    Permanent(AttemptError),
}

impl<T> Outcome<T> {
    pub fn is_success(&self) -> bool {
        matches!(self, Outcome::Success(_))
    }
}

impl<T> From<Result<T, AttemptError>> for Outcome<T> {
    fn from(result: Result<T, AttemptError>) -> Self {
        match result {
            Ok(value) => Outcome::Success(value),
            Err(e) if e.is_retryable() => Outcome::Retryable(e),
            Err(e) => Outcome::Permanent(e),
        }
    }
}

/// Check a response status. `Ok` only for 200.
pub fn check_status(status: StatusCode) -> Result<(), AttemptError> {
    if status == StatusCode::OK {
        Ok(())
    } else if status == StatusCode::TOO_MANY_REQUESTS || status.is_server_error() {
        Err(AttemptError::RetryableStatus(status.as_u16()))
    } else {
        Err(AttemptError::Status(status.as_u16()))
    }
}
