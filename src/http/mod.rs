//! HTTP wire handling.
//!
//! # Data Flow
//! ```text
//! Digest
//!     → request.rs (SigningRequest JSON body + fixed headers)
//!     → reqwest POST (transport)
//!     → response.rs (bounded body read, JSON decode)
//! ```
//!
//! # Design Decisions
//! - The transport is reqwest; this module only shapes bytes in and out
//! - Response size is enforced on bytes actually read, not on headers alone

pub mod request;
pub mod response;

pub use request::{default_headers, SigningRequest};
pub use response::{read_bounded, read_json, BodyError};
