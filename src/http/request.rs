//! Signing request payload.
//!
//! # Responsibilities
//! - Encode the digest as URL-safe base64
//! - Serialize the single-field JSON body once per call
//! - Attach the fixed request headers

use base64::engine::general_purpose::URL_SAFE;
use base64::Engine;
use reqwest::header::{HeaderMap, HeaderValue, InvalidHeaderValue, CONTENT_TYPE, USER_AGENT};
use serde::{Deserialize, Serialize};

use crate::signing::types::Digest;

/// JSON body sent to the signing service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SigningRequest {
    /// URL-safe base64 (padded) encoding of the digest.
    pub digest: String,
}

impl SigningRequest {
    pub fn new(digest: &Digest<'_>) -> Self {
        Self {
            digest: URL_SAFE.encode(digest.as_bytes()),
        }
    }

    /// Serialize to the wire body.
    pub fn to_body(&self) -> Result<Vec<u8>, serde_json::Error> {
        serde_json::to_vec(self)
    }

    /// Decode the digest field back into raw bytes.
    pub fn decode_digest(&self) -> Result<Vec<u8>, base64::DecodeError> {
        URL_SAFE.decode(&self.digest)
    }
}

/// Headers attached to every signing request.
pub fn default_headers(user_agent: &str) -> Result<HeaderMap, InvalidHeaderValue> {
    let mut headers = HeaderMap::new();
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    headers.insert(USER_AGENT, HeaderValue::from_str(user_agent)?);
    Ok(headers)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_body_shape() {
        let bytes = [0u8; 32];
        let digest = Digest::new(&bytes).unwrap();
        let body = SigningRequest::new(&digest).to_body().unwrap();
        assert_eq!(
            String::from_utf8(body).unwrap(),
            r#"{"digest":"AAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAA="}"#
        );
    }

    #[test]
    fn test_uses_url_safe_alphabet() {
        // 0xfb 0xff encodes to "+/" in the standard alphabet.
        let mut bytes = [0xffu8; 28];
        bytes[0] = 0xfb;
        let digest = Digest::new(&bytes).unwrap();
        let request = SigningRequest::new(&digest);
        assert!(!request.digest.contains('+'));
        assert!(!request.digest.contains('/'));
        assert!(request.digest.contains('-') || request.digest.contains('_'));
        assert_eq!(request.decode_digest().unwrap(), bytes);
    }

    #[test]
    fn test_round_trip_for_every_size() {
        for len in [28usize, 32, 48, 64] {
            let bytes: Vec<u8> = (0..len).map(|i| (i * 37 + 11) as u8).collect();
            let digest = Digest::new(&bytes).unwrap();
            let body = SigningRequest::new(&digest).to_body().unwrap();
            let parsed: SigningRequest = serde_json::from_slice(&body).unwrap();
            assert_eq!(parsed.decode_digest().unwrap(), bytes, "length {}", len);
        }
    }

    #[test]
    fn test_default_headers() {
        let headers = default_headers("sts-client-rust/test").unwrap();
        assert_eq!(headers[CONTENT_TYPE], "application/json");
        assert_eq!(headers[USER_AGENT], "sts-client-rust/test");
        assert!(default_headers("bad\nagent").is_err());
    }
}
