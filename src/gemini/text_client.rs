use crate::{
    config::WeberConfig,
    error::{Result, WeberError},
    gemini::{invoke_model, traits::PromptGenerator},
    models::GenerateContentRequest,
};
use async_trait::async_trait;
use reqwest::Client;
use std::sync::Arc;

pub const RANDOM_PROMPT_INSTRUCTION: &str = "Generate a single, short, creative, and visually descriptive prompt for an AI image generator. The prompt should be a concise sentence describing a unique scene. No quotes.";

pub const FALLBACK_PROMPT: &str = "A majestic lion with a fiery mane roaring on a cliff";

#[derive(Clone)]
pub struct TextClient {
    http: Client,
    config: Arc<WeberConfig>,
}

impl TextClient {
    pub fn new(http: Client, config: Arc<WeberConfig>) -> Self {
        Self { http, config }
    }

    pub async fn generate(&self, prompt: &str) -> Result<String> {
        let model = self.config.text_model.as_str();
        log::info!("Invoking text model: {}", model);

        let payload = GenerateContentRequest::from_text(prompt);
        let response = invoke_model(&self.http, &self.config, model, &payload).await?;

        let text = response.text().trim().to_string();
        if text.is_empty() {
            return Err(WeberError::ResponseError("Empty text response".into()));
        }
        Ok(text)
    }

    pub async fn random_prompt(&self) -> String {
        match self.generate(RANDOM_PROMPT_INSTRUCTION).await {
            Ok(text) => text,
            Err(e) => {
                log::error!("Error generating random prompt: {}", e);
                FALLBACK_PROMPT.to_string()
            }
        }
    }
}

#[async_trait]
impl PromptGenerator for TextClient {
    async fn random_prompt(&self) -> String {
        TextClient::random_prompt(self).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_unreachable_service_falls_back() {
        // Nothing listens on port 9 locally; the request fails at connect time.
        let config = WeberConfig::new("test-key").with_api_base("http://127.0.0.1:9/v1beta");
        let client = TextClient::new(Client::new(), Arc::new(config));
        assert_eq!(client.random_prompt().await, FALLBACK_PROMPT);
    }
}
