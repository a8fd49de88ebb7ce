//! Session state for one front end: the form fields, the in-flight flags,
//! the single error slot and the gallery of generated images.
//!
//! Operations take `&mut self`, so only one of them mutates the session at a
//! time. The loading flags are advisory: front ends use them to disable
//! actions while a request is running.

use crate::{
    error::{Result, WeberError},
    gemini::{GeminiClient, ImageGenerator, PromptGenerator},
    models::{
        decode_data_uri, AspectRatio, GeneratedImage, GenerationRequest, ImageStyle,
        ReferenceImage,
    },
};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

pub const DOWNLOAD_PREFIX: &str = "weber_image_";
const MAX_FILENAME_STEM: usize = 50;

pub const PENCIL_NOTICE: &str =
    "\"Pencil Art\" style requires a reference image to transform. Your text prompt will describe the subject.";
pub const EMPTY_PROMPT: &str = "Prompt is empty.";
pub const BUSY: &str = "A request is already in progress.";

#[derive(Debug)]
pub enum GenerationOutcome {
    /// Blank prompt or blocked submission; nothing changed.
    Skipped,
    /// Id of the image now at the front of the gallery.
    Generated(String),
    /// Its message is now held in the error slot.
    Failed(WeberError),
}

pub struct Session {
    images: Arc<dyn ImageGenerator>,
    prompts: Arc<dyn PromptGenerator>,

    gallery: Vec<GeneratedImage>,
    is_loading: bool,
    is_fetching_prompt: bool,
    error: Option<String>,

    // Form fields
    prompt: String,
    style: ImageStyle,
    reference_image: Option<ReferenceImage>,
    aspect_ratio: AspectRatio,
    seed: String,
}

impl Session {
    pub fn new(images: Arc<dyn ImageGenerator>, prompts: Arc<dyn PromptGenerator>) -> Self {
        Self {
            images,
            prompts,
            gallery: Vec::new(),
            is_loading: false,
            is_fetching_prompt: false,
            error: None,
            prompt: String::new(),
            style: ImageStyle::default(),
            reference_image: None,
            aspect_ratio: AspectRatio::default(),
            seed: String::new(),
        }
    }

    pub fn with_client(client: Arc<GeminiClient>) -> Self {
        Self::new(client.clone(), client)
    }

    pub fn gallery(&self) -> &[GeneratedImage] {
        &self.gallery
    }

    pub fn image(&self, id: &str) -> Option<&GeneratedImage> {
        self.gallery.iter().find(|image| image.id == id)
    }

    pub fn is_loading(&self) -> bool {
        self.is_loading
    }

    pub fn is_fetching_prompt(&self) -> bool {
        self.is_fetching_prompt
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    pub fn style(&self) -> ImageStyle {
        self.style
    }

    pub fn reference_image(&self) -> Option<&ReferenceImage> {
        self.reference_image.as_ref()
    }

    pub fn aspect_ratio(&self) -> AspectRatio {
        self.aspect_ratio
    }

    pub fn seed(&self) -> &str {
        &self.seed
    }

    pub fn set_prompt(&mut self, prompt: impl Into<String>) {
        self.prompt = prompt.into();
    }

    pub fn set_style(&mut self, style: ImageStyle) {
        self.style = style;
    }

    pub fn set_reference_image(&mut self, image: ReferenceImage) {
        self.reference_image = Some(image);
    }

    pub fn clear_reference_image(&mut self) {
        self.reference_image = None;
    }

    pub fn set_aspect_ratio(&mut self, aspect_ratio: AspectRatio) {
        self.aspect_ratio = aspect_ratio;
    }

    /// Keeps only the digits of `seed`, like a numeric input box.
    pub fn set_seed(&mut self, seed: &str) {
        self.seed = seed.chars().filter(|c| c.is_ascii_digit()).collect();
    }

    /// Whether the form's submit action is currently allowed. Pencil Art
    /// needs a reference image; every other style needs a prompt.
    pub fn can_submit(&self) -> bool {
        if self.is_loading || self.is_fetching_prompt {
            return false;
        }
        if self.style.requires_reference_image() {
            self.reference_image.is_some()
        } else {
            !self.prompt.trim().is_empty()
        }
    }

    /// Why the form cannot be submitted right now, if it cannot.
    pub fn skip_reason(&self) -> Option<&'static str> {
        if self.is_loading || self.is_fetching_prompt {
            Some(BUSY)
        } else if self.style.requires_reference_image() && self.reference_image.is_none() {
            Some(PENCIL_NOTICE)
        } else if self.prompt.trim().is_empty() {
            Some(EMPTY_PROMPT)
        } else {
            None
        }
    }

    /// Submit the form and fold the outcome into a `Result`: the new image
    /// id, or the error that stopped it. A skipped submission is reported
    /// as a validation error carrying the reason.
    pub async fn submit(&mut self) -> Result<String> {
        match self.generate_from_form().await {
            GenerationOutcome::Generated(id) => Ok(id),
            GenerationOutcome::Failed(e) => Err(e),
            GenerationOutcome::Skipped => Err(WeberError::ValidationError(
                self.skip_reason().unwrap_or(EMPTY_PROMPT).to_string(),
            )),
        }
    }

    /// Submit the form with its current fields.
    pub async fn generate_from_form(&mut self) -> GenerationOutcome {
        if !self.can_submit() {
            log::debug!("Submission blocked for style {}", self.style);
            return GenerationOutcome::Skipped;
        }
        let prompt = self.prompt.clone();
        let reference = self.reference_image.clone();
        let seed = self.seed.clone();
        self.generate(&prompt, self.style, reference, self.aspect_ratio, &seed)
            .await
    }

    pub async fn generate(
        &mut self,
        prompt: &str,
        style: ImageStyle,
        reference_image: Option<ReferenceImage>,
        aspect_ratio: AspectRatio,
        seed: &str,
    ) -> GenerationOutcome {
        if prompt.trim().is_empty() {
            return GenerationOutcome::Skipped;
        }

        self.is_loading = true;
        self.error = None;

        let images = self.images.clone();
        let result =
            run_generation(images.as_ref(), prompt, style, reference_image, aspect_ratio, seed)
                .await;

        self.is_loading = false;

        match result {
            Ok(image) => {
                let id = image.id.clone();
                log::info!("Generated image {} ({} in gallery)", id, self.gallery.len() + 1);
                self.gallery.insert(0, image);
                GenerationOutcome::Generated(id)
            }
            Err(e) => {
                log::warn!("Generation did not complete: {}", e);
                self.error = Some(e.to_string());
                GenerationOutcome::Failed(e)
            }
        }
    }

    /// Re-run a gallery entry's prompt and style with the form's current
    /// aspect ratio and seed. The reference image is never reused.
    pub async fn regenerate(&mut self, prompt: &str, style: ImageStyle) -> GenerationOutcome {
        let seed = self.seed.clone();
        self.generate(prompt, style, None, self.aspect_ratio, &seed)
            .await
    }

    /// Replace the prompt with a model-suggested one.
    pub async fn surprise_me(&mut self) -> &str {
        self.is_fetching_prompt = true;
        self.error = None;

        let prompts = self.prompts.clone();
        let prompt = prompts.random_prompt().await;

        self.prompt = prompt;
        self.is_fetching_prompt = false;
        &self.prompt
    }

    /// Save an image payload under a name derived from its prompt.
    pub fn download(src: &str, prompt: &str, dir: &Path) -> Result<PathBuf> {
        let bytes = decode_data_uri(src)?;
        fs::create_dir_all(dir)?;
        let path = dir.join(download_filename(prompt));
        fs::write(&path, bytes)?;
        log::info!("💾 Image saved to: {}", path.display());
        Ok(path)
    }
}

pub fn parse_seed(seed: &str) -> Result<Option<i32>> {
    let seed = seed.trim();
    if seed.is_empty() {
        return Ok(None);
    }
    seed.parse::<i32>()
        .map(Some)
        .map_err(|_| WeberError::ValidationError("Seed must be a valid number.".into()))
}

pub fn download_filename(prompt: &str) -> String {
    let stem: String = prompt
        .chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .take(MAX_FILENAME_STEM)
        .collect();
    format!("{}{}.png", DOWNLOAD_PREFIX, stem)
}

async fn run_generation(
    images: &dyn ImageGenerator,
    prompt: &str,
    style: ImageStyle,
    reference_image: Option<ReferenceImage>,
    aspect_ratio: AspectRatio,
    seed: &str,
) -> Result<GeneratedImage> {
    let seed = parse_seed(seed)?;

    let request = GenerationRequest::new(prompt, style)
        .with_reference_image(reference_image)
        .with_aspect_ratio(aspect_ratio)
        .with_seed(seed);

    let src = images.generate_image(request).await?;
    Ok(GeneratedImage::new(src, prompt, style, aspect_ratio, seed))
}
