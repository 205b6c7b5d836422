//! Per-attempt deadline.
//!
//! Wraps the whole exchange (send and bounded body read) so a slow server
//! cannot hold a single attempt past `request_timeout`.

use std::future::Future;
use std::time::Duration;

use tokio::time::timeout;

use crate::signing::types::AttemptError;

/// Run `attempt`, failing with [`AttemptError::Timeout`] after `limit`.
pub async fn with_deadline<F, T>(limit: Duration, attempt: F) -> Result<T, AttemptError>
where
    F: Future<Output = Result<T, AttemptError>>,
{
    match timeout(limit, attempt).await {
        Ok(result) => result,
        Err(_) => Err(AttemptError::Timeout(format!("no response within {:?}", limit))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_fast_attempt_passes_through() {
        let result = with_deadline(Duration::from_millis(100), async { Ok::<_, AttemptError>(7) }).await;
        assert_eq!(result.unwrap(), 7);

        let result: Result<(), _> =
            with_deadline(Duration::from_millis(100), async { Err(AttemptError::Status(404)) }).await;
        assert!(matches!(result, Err(AttemptError::Status(404))));
    }

    #[tokio::test(start_paused = true)]
    async fn test_slow_attempt_times_out() {
        let result = with_deadline(Duration::from_millis(50), async {
            tokio::time::sleep(Duration::from_secs(10)).await;
            Ok::<_, AttemptError>(())
        })
        .await;

        let err = result.unwrap_err();
        assert!(err.is_retryable());
        assert_eq!(err.to_string(), "request timed out: no response within 50ms");
    }
}
