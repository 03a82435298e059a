//! Client configuration
//!
//! Endpoint, model and retry settings are explicit values handed to the
//! client. `from_env` is a convenience for the binary; the library never
//! reads the environment on its own.

use crate::http::retry::{RetryPolicy, DEFAULT_TIMEOUT};
use crate::{Error, Result};
use std::str::FromStr;
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";
pub const DEFAULT_API_VERSION: &str = "v1beta";
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash-preview-09-2025";

#[derive(Debug, Clone, PartialEq)]
pub struct ClientConfig {
    pub base_url: String,
    pub api_version: String,
    /// Bare model ID. A `models/` prefix is stripped when the endpoint is built.
    pub model: String,
    pub timeout: Duration,
    pub retry: RetryPolicy,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_version: DEFAULT_API_VERSION.to_string(),
            model: DEFAULT_MODEL.to_string(),
            timeout: DEFAULT_TIMEOUT,
            retry: RetryPolicy::default(),
        }
    }
}

impl ClientConfig {
    /// Load overrides from the process environment (and `.env`, if present).
    ///
    /// Recognised variables: `GEMINI_BASE_URL`, `GEMINI_MODEL`,
    /// `GEMINI_MAX_RETRIES`, `GEMINI_RETRY_BASE_DELAY_MS`, `GEMINI_TIMEOUT_SECS`.
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Like [`ClientConfig::from_env`], reading variables through `lookup`.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let max_retries = parse_var(&lookup, "GEMINI_MAX_RETRIES")?
            .unwrap_or(defaults.retry.max_retries);
        let base_delay = parse_var::<u64, _>(&lookup, "GEMINI_RETRY_BASE_DELAY_MS")?
            .map(Duration::from_millis)
            .unwrap_or(defaults.retry.base_delay);
        let timeout = parse_var::<u64, _>(&lookup, "GEMINI_TIMEOUT_SECS")?
            .map(Duration::from_secs)
            .unwrap_or(defaults.timeout);

        Ok(Self {
            base_url: lookup("GEMINI_BASE_URL")
                .map(|url| normalize_base_url(&url))
                .unwrap_or(defaults.base_url),
            api_version: defaults.api_version,
            model: lookup("GEMINI_MODEL").unwrap_or(defaults.model),
            timeout,
            retry: RetryPolicy::new(max_retries, base_delay),
        })
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = normalize_base_url(&base_url.into());
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Model ID without the `models/` prefix.
    pub fn model_id(&self) -> &str {
        self.model.strip_prefix("models/").unwrap_or(&self.model)
    }

    /// Full `generateContent` URL, without credentials.
    pub fn generate_content_url(&self) -> String {
        format!(
            "{}/{}/models/{}:generateContent",
            self.base_url,
            self.api_version,
            self.model_id()
        )
    }
}

fn normalize_base_url(url: &str) -> String {
    url.trim().trim_end_matches('/').to_string()
}

fn parse_var<T, F>(lookup: &F, key: &str) -> Result<Option<T>>
where
    T: FromStr,
    T::Err: std::fmt::Display,
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        None => Ok(None),
        Some(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|e| Error::Config(format!("{} has invalid value '{}': {}", key, raw, e))),
    }
}
