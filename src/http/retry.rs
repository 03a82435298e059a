//! Retry-with-backoff around a single JSON request.
//!
//! Statuses 429, 500 and 503 and transport failures are retried with
//! `base_delay * 2^attempt` between attempts. Everything else fails fast.

use super::{HttpRequest, HttpResponse, Transport};
use crate::{Error, Result};
use async_trait::async_trait;
use reqwest::{Method, Url};
use serde_json::Value;
use std::time::Duration;

pub const DEFAULT_MAX_RETRIES: u32 = 3;
pub const DEFAULT_BASE_DELAY: Duration = Duration::from_secs(1);
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

const TRANSIENT_STATUSES: [u16; 3] = [429, 500, 503];

/// Attempt budget and backoff base for one logical call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total number of attempts, including the first.
    pub max_retries: u32,
    pub base_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: DEFAULT_MAX_RETRIES,
            base_delay: DEFAULT_BASE_DELAY,
        }
    }
}

impl RetryPolicy {
    pub fn new(max_retries: u32, base_delay: Duration) -> Self {
        Self {
            max_retries,
            base_delay,
        }
    }

    /// Delay before the attempt following `attempt` (0-based). No jitter.
    pub fn backoff(&self, attempt: u32) -> Duration {
        self.base_delay.saturating_mul(2u32.saturating_pow(attempt))
    }
}

pub fn is_transient_status(status: u16) -> bool {
    TRANSIENT_STATUSES.contains(&status)
}

/// The suspension point between attempts.
#[async_trait]
pub trait Sleeper: Send + Sync {
    async fn sleep(&self, duration: Duration);
}

#[derive(Debug, Clone, Copy, Default)]
pub struct TokioSleeper;

#[async_trait]
impl Sleeper for TokioSleeper {
    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

/// Sends requests through a [`Transport`], retrying transient failures.
pub struct ResilientClient {
    transport: Box<dyn Transport>,
    sleeper: Box<dyn Sleeper>,
    timeout: Duration,
}

impl ResilientClient {
    pub fn new(
        transport: Box<dyn Transport>,
        sleeper: Box<dyn Sleeper>,
        timeout: Duration,
    ) -> Self {
        Self {
            transport,
            sleeper,
            timeout,
        }
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Send `body` to `endpoint` with `key=<credential>` appended to the
    /// query string, and return the parsed JSON of the first 200 response.
    pub async fn send(
        &self,
        endpoint: &str,
        credential: &str,
        method: Method,
        headers: &[(String, String)],
        body: String,
        policy: &RetryPolicy,
    ) -> Result<Value> {
        let request = HttpRequest {
            method,
            url: with_credential(endpoint, credential)?,
            headers: headers.to_vec(),
            body,
        };

        for attempt in 0..policy.max_retries {
            let is_last = attempt + 1 >= policy.max_retries;
            tracing::debug!(
                "Sending {} request (attempt {}/{})",
                request.method,
                attempt + 1,
                policy.max_retries
            );

            match self.transport.execute(&request, self.timeout).await {
                Ok(HttpResponse { status: 200, body }) => {
                    return serde_json::from_str(&body).map_err(|e| {
                        tracing::error!("Failed to parse response JSON: {}", e);
                        Error::MalformedResponse(format!("response is not valid JSON: {}", e))
                    });
                }
                Ok(HttpResponse { status, body }) if is_transient_status(status) => {
                    if is_last {
                        tracing::error!(
                            "API error (status {}) after {} attempts: {}",
                            status,
                            attempt + 1,
                            body
                        );
                        return Err(Error::TransientExhausted {
                            status,
                            body,
                            attempts: attempt + 1,
                        });
                    }
                    let delay = policy.backoff(attempt);
                    tracing::warn!(
                        "Transient API error (status {}), retrying in {:?}",
                        status,
                        delay
                    );
                    self.sleeper.sleep(delay).await;
                }
                Ok(HttpResponse { status, body }) => {
                    tracing::error!("API error (status {}): {}", status, body);
                    return Err(Error::PermanentHttp { status, body });
                }
                Err(e) => {
                    if is_last {
                        tracing::error!("Request failed after {} attempts: {}", attempt + 1, e);
                        return Err(e);
                    }
                    let delay = policy.backoff(attempt);
                    tracing::warn!("Request failed: {}, retrying in {:?}", e, delay);
                    self.sleeper.sleep(delay).await;
                }
            }
        }

        Err(Error::RetriesExhausted {
            attempts: policy.max_retries,
        })
    }
}

fn with_credential(endpoint: &str, credential: &str) -> Result<String> {
    let mut url = Url::parse(endpoint)
        .map_err(|e| Error::InvalidInput(format!("Invalid endpoint URL '{}': {}", endpoint, e)))?;
    url.query_pairs_mut().append_pair("key", credential);
    Ok(url.into())
}
