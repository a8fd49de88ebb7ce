use crate::{error::Result, models::GenerationRequest};
use async_trait::async_trait;

/// Backend able to turn a generation request into a displayable data URI.
#[async_trait]
pub trait ImageGenerator: Send + Sync {
    async fn generate_image(&self, request: GenerationRequest) -> Result<String>;
}

/// Source of "surprise me" prompts. Never fails; implementations fall back
/// to a fixed sentence.
#[async_trait]
pub trait PromptGenerator: Send + Sync {
    async fn random_prompt(&self) -> String;
}
