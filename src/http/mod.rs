//! HTTP plumbing for talking to the model endpoint.
//!
//! `Transport` executes exactly one request; `ResilientClient` layers the
//! credential, status classification and backoff on top of it.

pub mod mock;
pub mod retry;

pub use mock::{MockTransport, RecordingSleeper};
pub use retry::{ResilientClient, RetryPolicy, Sleeper, TokioSleeper};

use crate::{Error, Result};
use async_trait::async_trait;
use reqwest::{Client, Method};
use std::time::Duration;

/// A fully resolved outbound request.
#[derive(Debug, Clone)]
pub struct HttpRequest {
    pub method: Method,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

/// Status and raw body of a completed exchange.
#[derive(Debug, Clone, PartialEq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }
}

/// Sends a single request. Connection, DNS and timeout failures come back as
/// `Error::Transport`; any HTTP status, including errors, is a response.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn execute(&self, request: &HttpRequest, timeout: Duration) -> Result<HttpResponse>;
}

/// `Transport` backed by a shared reqwest connection pool.
#[derive(Debug, Clone, Default)]
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    pub fn new() -> Self {
        Self::with_client(Client::new())
    }

    pub fn with_client(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn execute(&self, request: &HttpRequest, timeout: Duration) -> Result<HttpResponse> {
        let mut builder = self
            .client
            .request(request.method.clone(), &request.url)
            .timeout(timeout);
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }

        let response = builder
            .body(request.body.clone())
            .send()
            .await
            .map_err(|e| Error::Transport(describe_reqwest_error(&e)))?;

        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| Error::Transport(describe_reqwest_error(&e)))?;

        Ok(HttpResponse { status, body })
    }
}

/// reqwest includes the full URL in its error text, and ours carries the API
/// key in the query string.
fn describe_reqwest_error(err: &reqwest::Error) -> String {
    let kind = if err.is_timeout() {
        "request timed out"
    } else if err.is_connect() {
        "connection failed"
    } else if err.is_body() || err.is_decode() {
        "failed to read response body"
    } else {
        "request failed"
    };

    let source = std::error::Error::source(err)
        .map(|s| s.to_string())
        .unwrap_or_default();
    if source.is_empty() {
        kind.to_string()
    } else {
        format!("{}: {}", kind, source)
    }
}
