//! Application layer: turns an image file and an optional question into a
//! described answer.

use crate::ai::{detect_image_mime, GeminiVisionClient, ImageMime, VisionService};
use crate::config::ClientConfig;
use crate::prompts;
use crate::{Error, Result};
use std::path::{Path, PathBuf};
use tracing::info;

/// One describe invocation as gathered from the command line.
#[derive(Debug, Clone, Default)]
pub struct DescribeRequest {
    pub image_path: PathBuf,
    /// Explicit MIME type; sniffed from the file when absent.
    pub mime_type: Option<String>,
    /// Follow-up question appended to the default instruction.
    pub question: Option<String>,
    pub credential: Option<String>,
}

pub struct App {
    vision: Box<dyn VisionService>,
}

impl App {
    pub fn new(config: ClientConfig) -> Self {
        info!(
            "Vision provider: Gemini (model: {}, max attempts: {})",
            config.model_id(),
            config.retry.max_retries
        );
        Self::with_service(Box::new(GeminiVisionClient::new(config)))
    }

    /// Build an app around any vision backend, e.g. a mock in tests.
    pub fn with_service(vision: Box<dyn VisionService>) -> Self {
        Self { vision }
    }

    pub async fn describe(&self, request: &DescribeRequest) -> Result<String> {
        let credential = request
            .credential
            .as_deref()
            .filter(|c| !c.trim().is_empty())
            .ok_or_else(|| {
                Error::Config(
                    "An API key is required. Pass --api-key or set GEMINI_API_KEY".to_string(),
                )
            })?;

        let image = tokio::fs::read(&request.image_path).await?;
        if image.is_empty() {
            return Err(Error::InvalidInput(format!(
                "Image file {} is empty",
                request.image_path.display()
            )));
        }

        let mime = resolve_mime(&request.image_path, &image, request.mime_type.as_deref())?;
        let prompt = prompts::compose_prompt(prompts::DESCRIBE_IMAGE, request.question.as_deref());

        info!(
            "Describing {} ({}, {} bytes)",
            request.image_path.display(),
            mime,
            image.len()
        );

        let answer = self
            .vision
            .describe_image(&image, mime.as_str(), &prompt, credential)
            .await?;

        info!("Received description ({} chars)", answer.chars().count());
        Ok(answer)
    }
}

/// Explicit MIME type wins, then the file signature, then the extension.
fn resolve_mime(path: &Path, bytes: &[u8], explicit: Option<&str>) -> Result<ImageMime> {
    if let Some(mime_type) = explicit {
        return ImageMime::parse(mime_type);
    }

    detect_image_mime(bytes)
        .or_else(|| {
            path.extension()
                .and_then(|ext| ext.to_str())
                .and_then(ImageMime::from_extension)
        })
        .ok_or_else(|| {
            Error::InvalidInput(format!(
                "Could not determine image type of {}. Supported: jpeg, png, webp",
                path.display()
            ))
        })
}
