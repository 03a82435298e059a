use crate::{Error, Result};
use std::fmt;

/// Image formats the vision endpoint accepts as inline data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageMime {
    Jpeg,
    Png,
    Webp,
}

impl ImageMime {
    pub fn as_str(&self) -> &'static str {
        match self {
            ImageMime::Jpeg => "image/jpeg",
            ImageMime::Png => "image/png",
            ImageMime::Webp => "image/webp",
        }
    }

    /// Parse a MIME type string, case-insensitively. `image/jpg` is accepted
    /// as an alias since browsers and upload widgets emit it.
    pub fn parse(mime_type: &str) -> Result<Self> {
        match mime_type.trim().to_ascii_lowercase().as_str() {
            "image/jpeg" | "image/jpg" => Ok(ImageMime::Jpeg),
            "image/png" => Ok(ImageMime::Png),
            "image/webp" => Ok(ImageMime::Webp),
            other => Err(Error::InvalidInput(format!(
                "Unsupported image MIME type '{}'. Expected image/jpeg, image/png or image/webp",
                other
            ))),
        }
    }

    pub fn from_extension(extension: &str) -> Option<Self> {
        match extension.to_ascii_lowercase().as_str() {
            "jpg" | "jpeg" => Some(ImageMime::Jpeg),
            "png" => Some(ImageMime::Png),
            "webp" => Some(ImageMime::Webp),
            _ => None,
        }
    }
}

impl fmt::Display for ImageMime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

pub fn detect_image_mime(bytes: &[u8]) -> Option<ImageMime> {
    match bytes {
        [0xFF, 0xD8, 0xFF, ..] => Some(ImageMime::Jpeg),
        [0x89, 0x50, 0x4E, 0x47, ..] => Some(ImageMime::Png),
        [0x52, 0x49, 0x46, 0x46, _, _, _, _, 0x57, 0x45, 0x42, 0x50, ..] => Some(ImageMime::Webp),
        _ => {
            tracing::debug!(
                "Unrecognized image signature (first 4 bytes: {:02X?})",
                &bytes[..bytes.len().min(4)]
            );
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_png() {
        assert_eq!(
            detect_image_mime(&[0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A]),
            Some(ImageMime::Png)
        );
    }

    #[test]
    fn test_detect_jpeg() {
        assert_eq!(
            detect_image_mime(&[0xFF, 0xD8, 0xFF, 0xE0]),
            Some(ImageMime::Jpeg)
        );
    }

    #[test]
    fn test_detect_webp() {
        assert_eq!(
            detect_image_mime(&[
                0x52, 0x49, 0x46, 0x46, 0x00, 0x00, 0x00, 0x00, 0x57, 0x45, 0x42, 0x50
            ]),
            Some(ImageMime::Webp)
        );
    }

    #[test]
    fn test_unknown_signature_is_none() {
        assert_eq!(detect_image_mime(&[0x00, 0x01, 0x02, 0x03]), None);
        assert_eq!(detect_image_mime(&[]), None);
    }

    #[test]
    fn test_parse_accepts_jpg_alias_and_case() {
        assert_eq!(ImageMime::parse("image/jpg").unwrap(), ImageMime::Jpeg);
        assert_eq!(ImageMime::parse("IMAGE/PNG").unwrap(), ImageMime::Png);
    }

    #[test]
    fn test_parse_rejects_non_image_types() {
        let err = ImageMime::parse("application/pdf").unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)));
    }

    #[test]
    fn test_from_extension() {
        assert_eq!(ImageMime::from_extension("JPG"), Some(ImageMime::Jpeg));
        assert_eq!(ImageMime::from_extension("gif"), None);
    }
}
