use super::VisionService;
use crate::{Error, Result};
use async_trait::async_trait;
use std::sync::{Arc, Mutex};

/// Scripted [`VisionService`] for exercising callers without HTTP.
#[derive(Clone)]
pub struct MockVisionClient {
    responses: Arc<Mutex<Vec<std::result::Result<String, String>>>>,
    prompts: Arc<Mutex<Vec<String>>>,
    credentials: Arc<Mutex<Vec<String>>>,
    call_count: Arc<Mutex<usize>>,
}

impl MockVisionClient {
    pub fn new() -> Self {
        Self {
            responses: Arc::new(Mutex::new(Vec::new())),
            prompts: Arc::new(Mutex::new(Vec::new())),
            credentials: Arc::new(Mutex::new(Vec::new())),
            call_count: Arc::new(Mutex::new(0)),
        }
    }

    pub fn with_answer(self, answer: String) -> Self {
        self.responses.lock().unwrap().push(Ok(answer));
        self
    }

    /// Queue a failure, surfaced as `Error::MalformedResponse`.
    pub fn with_failure(self, message: String) -> Self {
        self.responses.lock().unwrap().push(Err(message));
        self
    }

    pub fn get_call_count(&self) -> usize {
        *self.call_count.lock().unwrap()
    }

    /// Prompts received so far, in call order.
    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }

    /// Credentials received so far, in call order.
    pub fn credentials(&self) -> Vec<String> {
        self.credentials.lock().unwrap().clone()
    }
}

impl Default for MockVisionClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl VisionService for MockVisionClient {
    async fn describe_image(
        &self,
        image: &[u8],
        mime_type: &str,
        prompt: &str,
        credential: &str,
    ) -> Result<String> {
        let mut count = self.call_count.lock().unwrap();
        *count += 1;
        self.prompts.lock().unwrap().push(prompt.to_string());
        self.credentials.lock().unwrap().push(credential.to_string());

        let responses = self.responses.lock().unwrap();
        if responses.is_empty() {
            // Default mock response
            return Ok(format!(
                "A {} image of {} bytes",
                mime_type,
                image.len()
            ));
        }

        let index = (*count - 1) % responses.len();
        responses[index].clone().map_err(Error::MalformedResponse)
    }
}
