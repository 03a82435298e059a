use super::payload::build_request;
use super::response::extract_answer;
use crate::ai::VisionService;
use crate::config::ClientConfig;
use crate::http::{ReqwestTransport, ResilientClient, Sleeper, TokioSleeper, Transport};
use crate::Result;
use async_trait::async_trait;
use reqwest::{Client, Method};

/// Gemini `generateContent` client for single-image questions.
pub struct GeminiVisionClient {
    http: ResilientClient,
    config: ClientConfig,
}

impl GeminiVisionClient {
    pub fn new(config: ClientConfig) -> Self {
        Self::new_with_client(config, Client::new())
    }

    pub fn new_with_client(config: ClientConfig, client: Client) -> Self {
        Self::with_parts(
            config,
            Box::new(ReqwestTransport::with_client(client)),
            Box::new(TokioSleeper),
        )
    }

    /// Build a client over an arbitrary transport and delay, for tests and
    /// harnesses that must not touch the network or the clock.
    pub fn with_parts(
        config: ClientConfig,
        transport: Box<dyn Transport>,
        sleeper: Box<dyn Sleeper>,
    ) -> Self {
        Self {
            http: ResilientClient::new(transport, sleeper, config.timeout),
            config,
        }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }
}

#[async_trait]
impl VisionService for GeminiVisionClient {
    async fn describe_image(
        &self,
        image: &[u8],
        mime_type: &str,
        prompt: &str,
        credential: &str,
    ) -> Result<String> {
        tracing::debug!(
            "Describing image ({} bytes, {}) via Gemini model {}",
            image.len(),
            mime_type,
            self.config.model_id()
        );

        let request = build_request(image, mime_type, prompt)?;
        let body = serde_json::to_string(&request)?;
        let headers = [("Content-Type".to_string(), "application/json".to_string())];

        let response = self
            .http
            .send(
                &self.config.generate_content_url(),
                credential,
                Method::POST,
                &headers,
                body,
                &self.config.retry,
            )
            .await?;

        extract_answer(&response)
    }
}
