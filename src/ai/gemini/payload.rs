//! Builds the `generateContent` request body for a single image question.
//!
//! The credential never appears in the body; the request client appends it
//! to the URL at send time.

use super::types::{Content, GenerateContentRequest, InlineData, Part};
use crate::ai::mime::ImageMime;
use crate::{Error, Result};
use base64::Engine as _;

/// Assemble a one-turn request: the prompt text part followed by the image as
/// base64 inline data.
///
/// Rejects empty images and MIME types the endpoint does not accept. The
/// prompt is passed through untouched, even when empty.
pub fn build_request(
    image: &[u8],
    mime_type: &str,
    prompt: &str,
) -> Result<GenerateContentRequest> {
    if image.is_empty() {
        return Err(Error::InvalidInput("Image data is empty".to_string()));
    }
    let mime = ImageMime::parse(mime_type)?;

    let data = base64::engine::general_purpose::STANDARD.encode(image);

    Ok(GenerateContentRequest {
        contents: vec![Content {
            role: Some("user".to_string()),
            parts: vec![
                Part::Text {
                    text: prompt.to_string(),
                },
                Part::InlineData {
                    inline_data: InlineData {
                        mime_type: mime.as_str().to_string(),
                        data,
                    },
                },
            ],
        }],
    })
}
