//! Timestamp signing subsystem.
//!
//! # Data Flow
//! ```text
//! caller digest
//!     → types.rs (length check: 224/256/384/512 bits)
//!     → client.rs (retry loop)
//!         → http::request (JSON body) → reqwest POST
//!         → http::response (bounded read) → resilience::retries (classify)
//!         → resilience::backoff (sleep or stop)
//!     → SignedTimestamp | SignError
//! ```
//!
//! # Design Decisions
//! - Validation failures never reach the network
//! - The client never logs; retries are reported through the observer
//! - No state is shared between calls beyond the HTTP connection pool

pub mod client;
pub mod types;

pub use client::{Notify, SigningClient};
pub use types::{
    AttemptError, Digest, DigestSize, ErrorKind, SignError, SignResult, SignedTimestamp,
};
