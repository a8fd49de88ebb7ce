use super::{AspectRatio, ImageStyle};
use crate::error::{Result, WeberError};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::path::Path;
use uuid::Uuid;

pub const SUPPORTED_REFERENCE_TYPES: [&str; 3] = ["image/png", "image/jpeg", "image/webp"];

/// User supplied image sent ahead of the instruction text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReferenceImage {
    pub bytes: Vec<u8>,
    pub mime_type: String,
}

impl ReferenceImage {
    pub fn new(bytes: Vec<u8>, mime_type: impl Into<String>) -> Result<Self> {
        let mime_type: String = mime_type.into();
        let mime_type = mime_type.to_ascii_lowercase();
        if !SUPPORTED_REFERENCE_TYPES.contains(&mime_type.as_str()) {
            return Err(WeberError::ValidationError(format!(
                "Unsupported reference image type: {} (expected PNG, JPEG or WebP)",
                mime_type
            )));
        }
        if bytes.is_empty() {
            return Err(WeberError::ValidationError(
                "Reference image is empty".into(),
            ));
        }
        Ok(Self { bytes, mime_type })
    }

    pub fn mime_type_for_path(path: &Path) -> Option<&'static str> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "png" => Some("image/png"),
            "jpg" | "jpeg" => Some("image/jpeg"),
            "webp" => Some("image/webp"),
            _ => None,
        }
    }

    pub fn to_base64(&self) -> String {
        STANDARD.encode(&self.bytes)
    }
}

#[derive(Debug, Clone)]
pub struct GenerationRequest {
    pub prompt: String,
    pub style: ImageStyle,
    pub reference_image: Option<ReferenceImage>,
    pub aspect_ratio: AspectRatio,
    pub seed: Option<i32>,
}

impl GenerationRequest {
    pub fn new(prompt: impl Into<String>, style: ImageStyle) -> Self {
        Self {
            prompt: prompt.into(),
            style,
            reference_image: None,
            aspect_ratio: AspectRatio::default(),
            seed: None,
        }
    }

    pub fn with_reference_image(mut self, image: Option<ReferenceImage>) -> Self {
        self.reference_image = image;
        self
    }

    pub fn with_aspect_ratio(mut self, aspect_ratio: AspectRatio) -> Self {
        self.aspect_ratio = aspect_ratio;
        self
    }

    pub fn with_seed(mut self, seed: Option<i32>) -> Self {
        self.seed = seed;
        self
    }
}

/// One gallery entry. Created only after a successful generation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneratedImage {
    pub id: String,
    /// `data:<mime>;base64,<payload>` URI, ready for display.
    pub src: String,
    pub prompt: String,
    pub style: ImageStyle,
    pub aspect_ratio: AspectRatio,
    pub seed: Option<i32>,
}

impl GeneratedImage {
    pub fn new(
        src: String,
        prompt: impl Into<String>,
        style: ImageStyle,
        aspect_ratio: AspectRatio,
        seed: Option<i32>,
    ) -> Self {
        Self {
            id: format!("{}-{}", Utc::now().timestamp_millis(), Uuid::new_v4()),
            src,
            prompt: prompt.into(),
            style,
            aspect_ratio,
            seed,
        }
    }

    pub fn mime_type(&self) -> Option<&str> {
        self.src.strip_prefix("data:")?.split(';').next()
    }
}

/// Decodes the base64 payload of a `data:<mime>;base64,<payload>` URI.
pub fn decode_data_uri(src: &str) -> Result<Vec<u8>> {
    let payload = src
        .strip_prefix("data:")
        .and_then(|rest| rest.split_once(";base64,"))
        .map(|(_, payload)| payload)
        .ok_or_else(|| WeberError::ValidationError("Image source is not a base64 data URI".into()))?;
    STANDARD
        .decode(payload)
        .map_err(|e| WeberError::ValidationError(format!("Invalid image payload: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reference_image_types() {
        assert!(ReferenceImage::new(vec![1, 2, 3], "image/png").is_ok());
        assert!(ReferenceImage::new(vec![1, 2, 3], "IMAGE/WEBP").is_ok());
        assert!(ReferenceImage::new(vec![1, 2, 3], "image/gif").is_err());
        assert!(ReferenceImage::new(vec![], "image/jpeg").is_err());
        assert_eq!(
            ReferenceImage::mime_type_for_path(Path::new("cat.JPG")),
            Some("image/jpeg")
        );
        assert_eq!(ReferenceImage::mime_type_for_path(Path::new("notes.txt")), None);
    }

    #[test]
    fn test_generated_image_payload() {
        let image = GeneratedImage::new(
            "data:image/png;base64,aGVsbG8=".to_string(),
            "hello",
            ImageStyle::Anime,
            AspectRatio::Square,
            None,
        );
        assert_eq!(image.mime_type(), Some("image/png"));
        assert_eq!(decode_data_uri(&image.src).unwrap(), b"hello".to_vec());
        assert!(decode_data_uri("https://example.com/a.png").is_err());
        assert!(decode_data_uri("data:image/png;base64,@@@").is_err());
    }

    #[test]
    fn test_generated_ids_differ() {
        let make = || {
            GeneratedImage::new(
                "data:image/png;base64,AA==".to_string(),
                "p",
                ImageStyle::DigitalArt,
                AspectRatio::Square,
                Some(7),
            )
        };
        assert_ne!(make().id, make().id);
    }
}
