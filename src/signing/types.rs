//! Signing types and error definitions.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

use crate::http::response::BodyError;

/// Digest sizes accepted by the signing service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DigestSize {
    Sha224,
    Sha256,
    Sha384,
    Sha512,
}

impl DigestSize {
    /// Map a byte length to a digest size.
    pub fn from_len(len: usize) -> Option<Self> {
        match len {
            28 => Some(Self::Sha224),
            32 => Some(Self::Sha256),
            48 => Some(Self::Sha384),
            64 => Some(Self::Sha512),
            _ => None,
        }
    }

    pub fn bits(self) -> usize {
        match self {
            Self::Sha224 => 224,
            Self::Sha256 => 256,
            Self::Sha384 => 384,
            Self::Sha512 => 512,
        }
    }
}

/// A caller-supplied digest whose length has been checked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Digest<'a> {
    bytes: &'a [u8],
    size: DigestSize,
}

impl<'a> Digest<'a> {
    pub fn new(bytes: &'a [u8]) -> Result<Self, SignError> {
        let size = DigestSize::from_len(bytes.len()).ok_or(SignError::InvalidDigest {
            bits: bytes.len() * 8,
        })?;
        Ok(Self { bytes, size })
    }

    pub fn as_bytes(&self) -> &'a [u8] {
        self.bytes
    }

    pub fn size(&self) -> DigestSize {
        self.size
    }
}

/// Signed timestamp issued by the service.
///
/// The structure is opaque to this crate; it is kept as the JSON object the
/// service returned. Use [`SigningClient::sign_as`](crate::SigningClient::sign_as)
/// to decode into a concrete type instead.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SignedTimestamp(Map<String, Value>);

impl SignedTimestamp {
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn fields(&self) -> &Map<String, Value> {
        &self.0
    }

    pub fn into_inner(self) -> Map<String, Value> {
        self.0
    }
}

/// Why a single attempt failed.
#[derive(Debug, Error)]
pub enum AttemptError {
    /// 429 or 5xx.
    #[error("returned non-200 status code {0}, retryable")]
    RetryableStatus(u16),

    /// Any other non-200 status.
    #[error("returned non-200 status code {0}")]
    Status(u16),

    #[error("request timed out: {0}")]
    Timeout(String),

    #[error("transport error: {0}")]
    Transport(String),

    #[error("failed to encode request: {0}")]
    Encode(#[source] serde_json::Error),

    #[error(transparent)]
    Body(#[from] BodyError),
}

impl AttemptError {
    /// Whether the failure is transient and the attempt may be repeated.
    pub fn is_retryable(&self) -> bool {
        match self {
            AttemptError::RetryableStatus(_) | AttemptError::Timeout(_) => true,
            AttemptError::Body(e) => e.is_timeout(),
            AttemptError::Status(_) | AttemptError::Transport(_) | AttemptError::Encode(_) => false,
        }
    }

    /// Short label used in log fields and metric labels.
    pub fn reason(&self) -> &'static str {
        match self {
            AttemptError::RetryableStatus(_) | AttemptError::Status(_) => "status",
            AttemptError::Timeout(_) => "timeout",
            AttemptError::Transport(_) => "transport",
            AttemptError::Encode(_) => "encode",
            AttemptError::Body(BodyError::Decode(_)) => "decode",
            AttemptError::Body(BodyError::Read { .. }) => "body_read",
            AttemptError::Body(_) => "oversized",
        }
    }
}

impl From<reqwest::Error> for AttemptError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            AttemptError::Timeout(e.to_string())
        } else {
            AttemptError::Transport(e.to_string())
        }
    }
}

/// Coarse category of a terminal [`SignError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Validation,
    Permanent,
    Exhausted,
}

/// Terminal error returned by [`SigningClient::sign`](crate::SigningClient::sign).
#[derive(Debug, Error)]
pub enum SignError {
    /// The digest is not 224, 256, 384 or 512 bits long. No request was made.
    #[error("digest must be exactly 224, 256, 384, or 512 bits. {bits} bits found")]
    InvalidDigest { bits: usize },

    /// A non-transient failure ended the call.
    #[error("signing failed after {attempts} attempt(s): {source}")]
    Permanent {
        attempts: u32,
        #[source]
        source: AttemptError,
    },

    /// The retry budget ran out; `source` is the last retryable failure.
    #[error("retry budget exhausted after {attempts} attempt(s) in {elapsed:?}: {source}")]
    Exhausted {
        attempts: u32,
        elapsed: Duration,
        #[source]
        source: AttemptError,
    },
}

impl SignError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            SignError::InvalidDigest { .. } => ErrorKind::Validation,
            SignError::Permanent { .. } => ErrorKind::Permanent,
            SignError::Exhausted { .. } => ErrorKind::Exhausted,
        }
    }

    /// Number of requests issued before the call ended.
    pub fn attempts(&self) -> u32 {
        match self {
            SignError::InvalidDigest { .. } => 0,
            SignError::Permanent { attempts, .. } | SignError::Exhausted { attempts, .. } => {
                *attempts
            }
        }
    }

    /// The failure of the last attempt, if any attempt was made.
    pub fn attempt_error(&self) -> Option<&AttemptError> {
        match self {
            SignError::InvalidDigest { .. } => None,
            SignError::Permanent { source, .. } | SignError::Exhausted { source, .. } => {
                Some(source)
            }
        }
    }
}

/// Result type for signing operations.
pub type SignResult<T> = Result<T, SignError>;
