//! Resilience subsystem.
//!
//! # Data Flow
//! ```text
//! Each attempt:
//!     → timeouts.rs (per-request deadline over send + body read)
//!     → retries.rs (fold the result into Success / Retryable / Permanent)
//!     → On Retryable: backoff.rs (next delay, or stop when the budget is spent)
//! ```
//!
//! # Design Decisions
//! - Every attempt has a deadline independent of the total budget
//! - The backoff controller is a value, advanced by a pure function
//! - Jittered backoff prevents synchronized retries from many callers

pub mod backoff;
pub mod retries;
pub mod timeouts;

pub use backoff::{BackoffPolicy, RetryState, Step};
pub use retries::{check_status, Outcome};
pub use timeouts::with_deadline;
