use crate::error::{Result, WeberError};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum ImageStyle {
    #[serde(rename = "Realistic photography")]
    Realistic,
    #[serde(rename = "Anime style")]
    Anime,
    #[default]
    #[serde(rename = "Digital art")]
    DigitalArt,
    #[serde(rename = "3D render")]
    ThreeD,
    #[serde(rename = "Pixel art")]
    PixelArt,
    #[serde(rename = "Fantasy art")]
    Fantasy,
    #[serde(rename = "Neon-punk")]
    NeonPunk,
    #[serde(rename = "Pencil Art")]
    PencilArt,
}

impl ImageStyle {
    pub const ALL: [ImageStyle; 8] = [
        ImageStyle::Realistic,
        ImageStyle::Anime,
        ImageStyle::DigitalArt,
        ImageStyle::ThreeD,
        ImageStyle::PixelArt,
        ImageStyle::Fantasy,
        ImageStyle::NeonPunk,
        ImageStyle::PencilArt,
    ];

    /// Label sent to the model as part of the instruction.
    pub fn label(&self) -> &'static str {
        match self {
            ImageStyle::Realistic => "Realistic photography",
            ImageStyle::Anime => "Anime style",
            ImageStyle::DigitalArt => "Digital art",
            ImageStyle::ThreeD => "3D render",
            ImageStyle::PixelArt => "Pixel art",
            ImageStyle::Fantasy => "Fantasy art",
            ImageStyle::NeonPunk => "Neon-punk",
            ImageStyle::PencilArt => "Pencil Art",
        }
    }

    pub fn short_name(&self) -> &'static str {
        match self {
            ImageStyle::Realistic => "realistic",
            ImageStyle::Anime => "anime",
            ImageStyle::DigitalArt => "digital-art",
            ImageStyle::ThreeD => "3d",
            ImageStyle::PixelArt => "pixel-art",
            ImageStyle::Fantasy => "fantasy",
            ImageStyle::NeonPunk => "neon-punk",
            ImageStyle::PencilArt => "pencil",
        }
    }

    /// Label for menus, without the " style" / " photography" suffix.
    pub fn display_label(&self) -> &'static str {
        let label = self.label();
        label
            .strip_suffix(" style")
            .or_else(|| label.strip_suffix(" photography"))
            .unwrap_or(label)
    }

    pub fn requires_reference_image(&self) -> bool {
        matches!(self, ImageStyle::PencilArt)
    }
}

impl fmt::Display for ImageStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for ImageStyle {
    type Err = WeberError;

    fn from_str(s: &str) -> Result<Self> {
        let wanted = s.trim();
        ImageStyle::ALL
            .iter()
            .copied()
            .find(|style| {
                style.label().eq_ignore_ascii_case(wanted)
                    || style.short_name().eq_ignore_ascii_case(wanted)
                    || style.display_label().eq_ignore_ascii_case(wanted)
            })
            .ok_or_else(|| WeberError::ValidationError(format!("Unknown style: {}", wanted)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_styles() {
        assert_eq!("pencil".parse::<ImageStyle>().unwrap(), ImageStyle::PencilArt);
        assert_eq!("Digital art".parse::<ImageStyle>().unwrap(), ImageStyle::DigitalArt);
        assert_eq!("anime".parse::<ImageStyle>().unwrap(), ImageStyle::Anime);
        assert_eq!("Realistic".parse::<ImageStyle>().unwrap(), ImageStyle::Realistic);
        assert!("watercolor".parse::<ImageStyle>().is_err());
    }

    #[test]
    fn test_display_labels() {
        assert_eq!(ImageStyle::Realistic.display_label(), "Realistic");
        assert_eq!(ImageStyle::Anime.display_label(), "Anime");
        assert_eq!(ImageStyle::NeonPunk.display_label(), "Neon-punk");
        assert_eq!(ImageStyle::default(), ImageStyle::DigitalArt);
        assert!(ImageStyle::PencilArt.requires_reference_image());
        assert!(!ImageStyle::ThreeD.requires_reference_image());
    }

    #[test]
    fn test_serde_uses_labels() {
        let json = serde_json::to_string(&ImageStyle::ThreeD).unwrap();
        assert_eq!(json, "\"3D render\"");
    }
}
