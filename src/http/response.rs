//! Bounded response body handling.
//!
//! # Responsibilities
//! - Reject bodies whose declared length exceeds the ceiling without reading them
//! - Read the body until EOF, failing as soon as the ceiling is crossed
//! - Deserialize the bounded bytes
//!
//! # Design Decisions
//! - The declared `Content-Length` is never trusted on its own; actual bytes are counted
//! - The body is drained chunk by chunk so short reads never truncate a valid payload
//! - Nothing past `max_bytes` is ever buffered

use std::io;

use futures_util::{Stream, StreamExt};
use serde::de::DeserializeOwned;
use thiserror::Error;

/// Upper bound on the buffer reserved before any bytes arrive.
const INITIAL_CAPACITY: usize = 4 * 1024;

/// Errors produced while reading or decoding a response body.
#[derive(Debug, Error)]
pub enum BodyError {
    /// `Content-Length` announced more than the ceiling.
    #[error("the maximum allowed response size is {limit} bytes. the returned response is {declared} bytes")]
    DeclaredTooLarge { limit: usize, declared: u64 },

    /// More bytes arrived than the ceiling allows.
    #[error("the maximum allowed response size is {limit} bytes. the returned response is bigger")]
    TooLarge { limit: usize },

    /// The body stream failed before EOF.
    #[error("failed to read response body: {message}")]
    Read { message: String, timeout: bool },

    /// The bounded body is not the expected structure.
    #[error("failed to decode response body: {0}")]
    Decode(#[from] serde_json::Error),
}

impl BodyError {
    /// Whether the read failed because the transport timed out.
    pub fn is_timeout(&self) -> bool {
        matches!(self, BodyError::Read { timeout: true, .. })
    }
}

impl From<reqwest::Error> for BodyError {
    fn from(e: reqwest::Error) -> Self {
        BodyError::Read {
            timeout: e.is_timeout(),
            message: e.to_string(),
        }
    }
}

impl From<io::Error> for BodyError {
    fn from(e: io::Error) -> Self {
        BodyError::Read {
            timeout: e.kind() == io::ErrorKind::TimedOut,
            message: e.to_string(),
        }
    }
}

/// Collect a chunked body into memory, never holding more than `max_bytes`.
pub async fn read_bounded<S, B, E>(
    declared_len: Option<u64>,
    body: S,
    max_bytes: usize,
) -> Result<Vec<u8>, BodyError>
where
    S: Stream<Item = Result<B, E>>,
    B: AsRef<[u8]>,
    BodyError: From<E>,
{
    if let Some(declared) = declared_len {
        if declared > max_bytes as u64 {
            return Err(BodyError::DeclaredTooLarge {
                limit: max_bytes,
                declared,
            });
        }
    }

    // The ceiling is configurable; never reserve more than a small buffer up front.
    let capacity = declared_len
        .map_or(max_bytes, |len| len as usize)
        .min(INITIAL_CAPACITY);
    let mut buf = Vec::with_capacity(capacity);

    let mut body = std::pin::pin!(body);
    while let Some(chunk) = body.next().await {
        let chunk = chunk?;
        let chunk = chunk.as_ref();
        if buf.len() + chunk.len() > max_bytes {
            return Err(BodyError::TooLarge { limit: max_bytes });
        }
        buf.extend_from_slice(chunk);
    }

    Ok(buf)
}

/// Read a bounded JSON body from `response` and deserialize it into `T`.
pub async fn read_json<T: DeserializeOwned>(
    response: reqwest::Response,
    max_bytes: usize,
) -> Result<T, BodyError> {
    let declared_len = response.content_length();
    let bytes = read_bounded(declared_len, response.bytes_stream(), max_bytes).await?;
    Ok(serde_json::from_slice(&bytes)?)
}
