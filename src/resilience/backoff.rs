//! Exponential backoff with jitter.
//!
//! The controller is a plain value: [`RetryState::advance`] takes the current
//! state plus the elapsed time and a jitter sample, and returns either the
//! delay to sleep together with the next state, or [`Step::Stop`].

use std::time::Duration;

use rand::Rng;

use crate::config::ClientConfig;

/// Backoff tuning for one client.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BackoffPolicy {
    pub initial_interval: Duration,
    pub multiplier: f64,
    pub randomization_factor: f64,
    pub max_interval: Duration,
    /// Total budget measured from the start of the call.
    pub max_elapsed: Duration,
}

impl BackoffPolicy {
    pub fn from_config(config: &ClientConfig) -> Self {
        Self {
            initial_interval: config.backoff.initial_interval(),
            multiplier: config.backoff.multiplier,
            randomization_factor: config.backoff.randomization_factor,
            max_interval: config.backoff.max_interval(),
            max_elapsed: config.total_timeout(),
        }
    }
}

impl Default for BackoffPolicy {
    fn default() -> Self {
        Self::from_config(&ClientConfig::default())
    }
}

/// Backoff state for a single call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryState {
    /// Interval the next delay is randomized around.
    pub current_interval: Duration,
    /// Elapsed time observed at the last advance.
    pub elapsed: Duration,
    pub max_elapsed: Duration,
}

/// Decision returned by [`RetryState::advance`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// Sleep for `delay`, then retry with `state`.
    Wait { delay: Duration, state: RetryState },
    /// The budget does not allow another attempt.
    Stop,
}

impl RetryState {
    pub fn start(policy: &BackoffPolicy) -> Self {
        Self {
            current_interval: policy.initial_interval,
            elapsed: Duration::ZERO,
            max_elapsed: policy.max_elapsed,
        }
    }

    /// Advance after a retryable failure.
    ///
    /// `elapsed` is the time since the call started and `sample` a uniform
    /// value in `[0, 1)`. Stops when `elapsed` plus the next delay would
    /// exceed the budget.
    pub fn advance(self, policy: &BackoffPolicy, elapsed: Duration, sample: f64) -> Step {
        let delay = randomize(self.current_interval, policy.randomization_factor, sample);

        if elapsed.saturating_add(delay) > self.max_elapsed {
            return Step::Stop;
        }

        Step::Wait {
            delay,
            state: RetryState {
                current_interval: grow(self.current_interval, policy.multiplier, policy.max_interval),
                elapsed,
                max_elapsed: self.max_elapsed,
            },
        }
    }
}

/// Uniform jitter sample in `[0, 1)`.
pub fn jitter_sample() -> f64 {
    rand::thread_rng().gen::<f64>()
}

/// Spread `interval` over `interval * (1 ± factor)` according to `sample`.
fn randomize(interval: Duration, factor: f64, sample: f64) -> Duration {
    let scale = 1.0 - factor + 2.0 * factor * sample;
    Duration::from_nanos((interval.as_nanos() as f64 * scale).round() as u64)
}

fn grow(interval: Duration, multiplier: f64, max_interval: Duration) -> Duration {
    let next = interval.as_nanos() as f64 * multiplier;
    if next >= max_interval.as_nanos() as f64 {
        max_interval
    } else {
        Duration::from_nanos(next.round() as u64)
    }
}
