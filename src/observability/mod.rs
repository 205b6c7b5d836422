//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! SigningClient retry
//!     → notify observer (retry_observer)
//!         → logging.rs (structured warn event)
//!         → metrics.rs (counters, histogram)
//! ```
//!
//! # Design Decisions
//! - The signing path itself stays silent; callers opt in with `retry_observer`
//! - Observers only record, they never block or influence the retry loop

pub mod logging;
pub mod metrics;

use std::time::Duration;

use crate::signing::types::AttemptError;

/// Observer that logs and counts every retry.
pub fn retry_observer() -> impl Fn(&AttemptError, Duration) + Send + Sync + 'static {
    |error: &AttemptError, delay: Duration| {
        logging::log_retry(error, delay);
        metrics::record_retry(error, delay);
    }
}
