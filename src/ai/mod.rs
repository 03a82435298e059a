//! Vision model integration
//!
//! Provides the caller-facing [`VisionService`] seam and its Gemini
//! implementation, which sends an image plus a question to the model and
//! returns the generated description.

pub mod gemini;
pub mod mime;
pub mod mock;

pub use gemini::GeminiVisionClient;
pub use mime::{detect_image_mime, ImageMime};
pub use mock::MockVisionClient;

use crate::Result;
use async_trait::async_trait;

#[async_trait]
pub trait VisionService: Send + Sync {
    /// Ask the model about `image` and return its plain-text answer.
    ///
    /// `credential` is forwarded as-is; checking that one was supplied is the
    /// caller's job.
    async fn describe_image(
        &self,
        image: &[u8],
        mime_type: &str,
        prompt: &str,
        credential: &str,
    ) -> Result<String>;
}
