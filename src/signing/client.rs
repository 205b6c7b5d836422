//! Signing client with retry and backoff.
//!
//! # Responsibilities
//! - Validate the digest before any network activity
//! - POST the signing request, one attempt at a time
//! - Classify every attempt and retry transient failures within the budget
//! - Report retries to an optional observer

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use reqwest::header::HeaderMap;
use serde::de::DeserializeOwned;
use tokio::time::{sleep, Instant};
use url::Url;

use crate::config::{validate_config, ClientConfig, ConfigError};
use crate::http::request::{default_headers, SigningRequest};
use crate::http::response::read_json;
use crate::resilience::backoff::{jitter_sample, BackoffPolicy, RetryState, Step};
use crate::resilience::retries::{check_status, Outcome};
use crate::resilience::timeouts::with_deadline;
use crate::signing::types::{AttemptError, Digest, SignError, SignResult, SignedTimestamp};

/// Retry observer: receives the failed attempt's error and the delay before
/// the next attempt. Called synchronously, so it must return quickly.
pub type Notify = Arc<dyn Fn(&AttemptError, Duration) + Send + Sync>;

/// Client for a remote timestamp signing service.
///
/// Cheap to clone; clones share the HTTP connection pool. Each call to
/// [`sign`](Self::sign) owns its own retry state, so concurrent calls do not
/// interact.
#[derive(Clone)]
pub struct SigningClient {
    http: reqwest::Client,
    endpoint: Url,
    headers: HeaderMap,
    config: Arc<ClientConfig>,
    policy: BackoffPolicy,
    notify: Option<Notify>,
}

impl SigningClient {
    /// Build a client with its own HTTP transport.
    pub fn new(config: ClientConfig) -> Result<Self, ConfigError> {
        let http = reqwest::Client::builder()
            .timeout(config.request_timeout())
            .build()
            .map_err(|e| ConfigError::Transport(e.to_string()))?;
        Self::with_http_client(config, http)
    }

    /// Build a client on top of an existing, possibly shared, HTTP client.
    pub fn with_http_client(config: ClientConfig, http: reqwest::Client) -> Result<Self, ConfigError> {
        validate_config(&config).map_err(ConfigError::Validation)?;

        let endpoint = Url::parse(&config.endpoint).map_err(|e| {
            ConfigError::Transport(format!("invalid endpoint '{}': {}", config.endpoint, e))
        })?;
        let headers = default_headers(&config.user_agent)
            .map_err(|e| ConfigError::Transport(format!("invalid user agent: {}", e)))?;

        Ok(Self {
            http,
            endpoint,
            headers,
            policy: BackoffPolicy::from_config(&config),
            config: Arc::new(config),
            notify: None,
        })
    }

    /// Install a retry observer.
    pub fn with_notify<F>(mut self, notify: F) -> Self
    where
        F: Fn(&AttemptError, Duration) + Send + Sync + 'static,
    {
        self.notify = Some(Arc::new(notify));
        self
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Obtain a signed timestamp for `digest`.
    ///
    /// `digest` must be 28, 32, 48 or 64 bytes long; anything else fails
    /// with [`SignError::InvalidDigest`] without touching the network.
    pub async fn sign(&self, digest: &[u8]) -> SignResult<SignedTimestamp> {
        self.sign_as(digest).await
    }

    /// Like [`sign`](Self::sign), decoding the response into `T`.
    pub async fn sign_as<T: DeserializeOwned>(&self, digest: &[u8]) -> SignResult<T> {
        let digest = Digest::new(digest)?;
        let body = SigningRequest::new(&digest)
            .to_body()
            .map_err(|e| SignError::Permanent {
                attempts: 0,
                source: AttemptError::Encode(e),
            })?;

        let started = Instant::now();
        let mut state = RetryState::start(&self.policy);
        let mut attempts = 0u32;

        loop {
            attempts += 1;
            let result = with_deadline(self.config.request_timeout(), self.attempt::<T>(&body)).await;

            match Outcome::from(result) {
                Outcome::Success(value) => return Ok(value),
                Outcome::Permanent(source) => {
                    return Err(SignError::Permanent { attempts, source });
                }
                Outcome::Retryable(source) => {
                    match state.advance(&self.policy, started.elapsed(), jitter_sample()) {
                        Step::Wait { delay, state: next } => {
                            if let Some(notify) = &self.notify {
                                notify(&source, delay);
                            }
                            sleep(delay).await;
                            state = next;
                        }
                        Step::Stop => {
                            return Err(SignError::Exhausted {
                                attempts,
                                elapsed: started.elapsed(),
                                source,
                            });
                        }
                    }
                }
            }
        }
    }

    /// One request/response exchange.
    async fn attempt<T: DeserializeOwned>(&self, body: &[u8]) -> Result<T, AttemptError> {
        let response = self
            .http
            .post(self.endpoint.clone())
            .headers(self.headers.clone())
            .body(body.to_vec())
            .send()
            .await?;

        check_status(response.status())?;

        Ok(read_json(response, self.config.max_response_bytes).await?)
    }
}

impl fmt::Debug for SigningClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SigningClient")
            .field("endpoint", &self.endpoint.as_str())
            .field("total_timeout_ms", &self.config.total_timeout_ms)
            .field("request_timeout_ms", &self.config.request_timeout_ms)
            .field("max_response_bytes", &self.config.max_response_bytes)
            .field("notify", &self.notify.is_some())
            .finish()
    }
}
