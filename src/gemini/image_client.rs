use crate::{
    config::WeberConfig,
    error::{Result, WeberError},
    gemini::{invoke_model, traits::ImageGenerator},
    logger,
    models::{
        AspectRatio, Content, GenerateContentRequest, GenerateContentResponse, GenerationConfig,
        GenerationRequest, ImageStyle, Part,
    },
};
use async_trait::async_trait;
use reqwest::Client;
use std::sync::Arc;

pub const PENCIL_ART_PROMPT: &str = "Transform this photo into a hyper-realistic sketch made with a pencil on a plain white sheet. Erase all background elements so that only the person(s) remain in the drawing. Use precise shading, hatching, and cross-hatching techniques with the pen to bring out the depth, texture, and likeness. Add a slightly angled pencil at one corner of the paper as a subtle signature, indicating it was the tool used to create the artwork. The final image should consist solely of the sketched figure(s) and the pencil on a clean white background.";

pub fn compose_instruction(prompt: &str, style: ImageStyle, aspect_ratio: AspectRatio) -> String {
    let mut instruction = match style {
        ImageStyle::PencilArt => format!("{}. {}", prompt, PENCIL_ART_PROMPT),
        other => format!("{}, in the style of {}", prompt, other.label()),
    };

    if !aspect_ratio.is_default() {
        instruction.push_str(&format!(", {} aspect ratio", aspect_ratio));
    }

    instruction
}

/// Builds the `generateContent` body: reference image first, then the
/// instruction text, image-only output, seed only when non-zero.
pub fn build_payload(request: &GenerationRequest) -> Result<GenerateContentRequest> {
    if request.style.requires_reference_image() && request.reference_image.is_none() {
        return Err(WeberError::ValidationError(format!(
            "\"{}\" style requires a reference image to transform.",
            request.style
        )));
    }

    let mut parts = Vec::with_capacity(2);
    if let Some(image) = &request.reference_image {
        parts.push(Part::inline(image.mime_type.clone(), image.to_base64()));
    }
    parts.push(Part::text(compose_instruction(
        &request.prompt,
        request.style,
        request.aspect_ratio,
    )));

    Ok(GenerateContentRequest {
        contents: vec![Content {
            role: Some("user".to_string()),
            parts,
        }],
        generation_config: Some(GenerationConfig {
            response_modalities: Some(vec!["IMAGE".to_string()]),
            seed: request.seed.filter(|seed| *seed != 0),
        }),
    })
}

/// First inline image of the first candidate, as a data URI.
pub fn extract_image(response: &GenerateContentResponse) -> Result<String> {
    response
        .first_parts()
        .iter()
        .filter_map(|part| part.inline_data.as_ref())
        .find(|inline| !inline.data.is_empty())
        .map(|inline| format!("data:{};base64,{}", inline.mime_type, inline.data))
        .ok_or(WeberError::NoImageProduced)
}

#[derive(Clone)]
pub struct ImageClient {
    http: Client,
    config: Arc<WeberConfig>,
}

impl ImageClient {
    pub fn new(http: Client, config: Arc<WeberConfig>) -> Self {
        Self { http, config }
    }

    pub async fn generate(&self, request: GenerationRequest) -> Result<String> {
        let payload = build_payload(&request)?;
        let model = self.config.image_model.as_str();

        log::info!(
            "Generating image with model: {} (style: {}, aspect ratio: {}, reference: {})",
            model,
            request.style,
            request.aspect_ratio,
            request.reference_image.is_some()
        );

        let _timer = logger::timer("image generation");
        let outcome = match invoke_model(&self.http, &self.config, model, &payload).await {
            Ok(response) => extract_image(&response).map_err(|e| {
                if let Some(reason) = response.finish_reason() {
                    log::warn!("Model finished without an image: {}", reason);
                }
                e
            }),
            Err(e) => Err(e),
        };

        outcome.map_err(|e| {
            log::error!("Error generating image: {}", e);
            WeberError::GenerationFailed
        })
    }
}

#[async_trait]
impl ImageGenerator for ImageClient {
    async fn generate_image(&self, request: GenerationRequest) -> Result<String> {
        self.generate(request).await
    }
}
