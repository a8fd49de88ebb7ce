//! Text rendering of session state. Every function here is pure: it takes
//! immutable state and returns the lines to print.

use crate::{
    models::{AspectRatio, GeneratedImage, ImageStyle},
    session::Session,
};

pub use crate::session::PENCIL_NOTICE;

pub fn render_form(session: &Session) -> String {
    let mut lines = Vec::new();

    let prompt = if session.prompt().trim().is_empty() {
        if session.style().requires_reference_image() {
            "(describe your subject for the pencil sketch)".to_string()
        } else {
            "(describe the image you want to create)".to_string()
        }
    } else {
        session.prompt().to_string()
    };
    lines.push(format!("Prompt:       {}", prompt));
    lines.push(format!("Style:        {}", session.style().display_label()));
    lines.push(format!(
        "Reference:    {}",
        session
            .reference_image()
            .map(|r| format!("{} ({} bytes)", r.mime_type, r.bytes.len()))
            .unwrap_or_else(|| "none".to_string())
    ));
    lines.push(format!("Aspect ratio: {}", session.aspect_ratio()));
    lines.push(format!(
        "Seed:         {}",
        if session.seed().is_empty() {
            "random"
        } else {
            session.seed()
        }
    ));

    if session.style().requires_reference_image() && session.reference_image().is_none() {
        lines.push(PENCIL_NOTICE.to_string());
    }
    if session.is_loading() {
        lines.push("Generating...".to_string());
    }
    if session.is_fetching_prompt() {
        lines.push("Fetching a random prompt...".to_string());
    }
    if let Some(error) = session.error() {
        lines.push(format!("Error: {}", error));
    }

    lines.join("\n")
}

pub fn render_card(index: usize, image: &GeneratedImage) -> String {
    let mut details = format!("AR: {}", image.aspect_ratio);
    if let Some(seed) = image.seed.filter(|seed| *seed != 0) {
        details.push_str(&format!(", Seed: {}", seed));
    }
    format!(
        "[{}] {}, {}  ({})  {}",
        index + 1,
        image.prompt,
        image.style,
        details,
        image.mime_type().unwrap_or("unknown")
    )
}

pub fn render_gallery(images: &[GeneratedImage]) -> String {
    if images.is_empty() {
        return "No images yet.".to_string();
    }
    images
        .iter()
        .enumerate()
        .map(|(i, image)| render_card(i, image))
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn render_styles(selected: ImageStyle) -> String {
    ImageStyle::ALL
        .iter()
        .map(|style| {
            let marker = if *style == selected { "*" } else { " " };
            format!("{} {:<12} {}", marker, style.short_name(), style.display_label())
        })
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn render_ratios(selected: AspectRatio) -> String {
    AspectRatio::ALL
        .iter()
        .map(|ratio| {
            if *ratio == selected {
                format!("[{}]", ratio)
            } else {
                ratio.to_string()
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

pub fn render_help() -> String {
    [
        "prompt <text>    set the prompt",
        "style <name>     pick a style (see `styles`)",
        "styles           list styles",
        "ratio <w:h>      pick an aspect ratio",
        "seed [n]         set or clear the seed",
        "ref <path>       attach a PNG, JPEG or WebP reference image",
        "unref            remove the reference image",
        "random           replace the prompt with a random one",
        "generate         generate an image from the form",
        "regen <n>        regenerate gallery entry n",
        "download <n>     save gallery entry n",
        "list             show the gallery",
        "form             show the form",
        "help             show this help",
        "quit             exit",
    ]
    .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Result;
    use crate::gemini::{ImageGenerator, PromptGenerator};
    use crate::models::GenerationRequest;
    use async_trait::async_trait;
    use std::sync::Arc;

    struct Unused;

    #[async_trait]
    impl ImageGenerator for Unused {
        async fn generate_image(&self, _request: GenerationRequest) -> Result<String> {
            unreachable!("rendering never generates")
        }
    }

    #[async_trait]
    impl PromptGenerator for Unused {
        async fn random_prompt(&self) -> String {
            unreachable!("rendering never fetches prompts")
        }
    }

    fn image(seed: Option<i32>) -> GeneratedImage {
        GeneratedImage::new(
            "data:image/webp;base64,AA==".to_string(),
            "a red fox in snow",
            ImageStyle::DigitalArt,
            AspectRatio::Widescreen,
            seed,
        )
    }

    #[test]
    fn test_card_hides_zero_seed() {
        assert_eq!(
            render_card(0, &image(Some(42))),
            "[1] a red fox in snow, Digital art  (AR: 16:9, Seed: 42)  image/webp"
        );
        assert_eq!(
            render_card(2, &image(Some(0))),
            "[3] a red fox in snow, Digital art  (AR: 16:9)  image/webp"
        );
    }

    #[test]
    fn test_empty_gallery() {
        assert_eq!(render_gallery(&[]), "No images yet.");
        assert_eq!(render_gallery(&[image(None), image(None)]).lines().count(), 2);
    }

    #[test]
    fn test_form_shows_pencil_notice() {
        let mut session = Session::new(Arc::new(Unused), Arc::new(Unused));
        assert!(!render_form(&session).contains(PENCIL_NOTICE));
        session.set_style(ImageStyle::PencilArt);
        let form = render_form(&session);
        assert!(form.contains(PENCIL_NOTICE));
        assert!(form.contains("Seed:         random"));
    }

    #[test]
    fn test_selection_markers() {
        assert!(render_styles(ImageStyle::Anime).contains("* anime"));
        assert_eq!(
            render_ratios(AspectRatio::Tall),
            "1:1 16:9 9:16 4:3 [3:4]"
        );
    }
}
