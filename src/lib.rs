//! Signed timestamp client library.
//!
//! Requests a signed timestamp for a message digest from a remote signing
//! service, retrying transient failures with jittered exponential backoff and
//! refusing oversized responses.
//!
//! ```no_run
//! # async fn demo() -> Result<(), Box<dyn std::error::Error>> {
//! use sts_client::{ClientConfig, SigningClient};
//!
//! let client = SigningClient::new(ClientConfig::new("https://tssig.example.com/"))?;
//! let timestamp = client.sign(&[0u8; 32]).await?;
//! println!("{}", serde_json::to_string(&timestamp)?);
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod http;
pub mod observability;
pub mod resilience;
pub mod signing;

pub use config::{ClientConfig, ConfigError};
pub use signing::{AttemptError, ErrorKind, SignError, SignedTimestamp, SigningClient};
