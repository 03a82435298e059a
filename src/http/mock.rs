use super::retry::Sleeper;
use super::{HttpRequest, HttpResponse, Transport};
use crate::{Error, Result};
use async_trait::async_trait;
use std::sync::{Arc, Mutex};
use std::time::Duration;

const DEFAULT_BODY: &str = r#"{"candidates":[{"content":{"parts":[{"text":"A mock description"}]}}]}"#;

#[derive(Debug, Clone)]
enum Scripted {
    Response(HttpResponse),
    TransportError(String),
}

/// Scripted [`Transport`]. Responses are replayed in order and cycle once
/// exhausted, so a single scripted 503 means "always 503". Clones share
/// state, so a test can keep a handle after boxing one into a client.
#[derive(Clone)]
pub struct MockTransport {
    responses: Arc<Mutex<Vec<Scripted>>>,
    requests: Arc<Mutex<Vec<HttpRequest>>>,
    call_count: Arc<Mutex<usize>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self {
            responses: Arc::new(Mutex::new(Vec::new())),
            requests: Arc::new(Mutex::new(Vec::new())),
            call_count: Arc::new(Mutex::new(0)),
        }
    }

    pub fn with_response(self, status: u16, body: impl Into<String>) -> Self {
        self.responses
            .lock()
            .unwrap()
            .push(Scripted::Response(HttpResponse::new(status, body)));
        self
    }

    pub fn with_transport_error(self, detail: impl Into<String>) -> Self {
        self.responses
            .lock()
            .unwrap()
            .push(Scripted::TransportError(detail.into()));
        self
    }

    pub fn get_call_count(&self) -> usize {
        *self.call_count.lock().unwrap()
    }

    /// Every request seen so far, in order.
    pub fn requests(&self) -> Vec<HttpRequest> {
        self.requests.lock().unwrap().clone()
    }
}

impl Default for MockTransport {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn execute(&self, request: &HttpRequest, _timeout: Duration) -> Result<HttpResponse> {
        let mut count = self.call_count.lock().unwrap();
        *count += 1;
        self.requests.lock().unwrap().push(request.clone());

        let responses = self.responses.lock().unwrap();
        if responses.is_empty() {
            return Ok(HttpResponse::new(200, DEFAULT_BODY));
        }

        let index = (*count - 1) % responses.len();
        match &responses[index] {
            Scripted::Response(response) => Ok(response.clone()),
            Scripted::TransportError(detail) => Err(Error::Transport(detail.clone())),
        }
    }
}

/// [`Sleeper`] that returns immediately and remembers each requested delay.
#[derive(Clone, Default)]
pub struct RecordingSleeper {
    sleeps: Arc<Mutex<Vec<Duration>>>,
}

impl RecordingSleeper {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sleeps(&self) -> Vec<Duration> {
        self.sleeps.lock().unwrap().clone()
    }
}

#[async_trait]
impl Sleeper for RecordingSleeper {
    async fn sleep(&self, duration: Duration) {
        self.sleeps.lock().unwrap().push(duration);
    }
}
