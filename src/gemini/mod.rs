pub mod image_client;
pub mod text_client;
pub mod traits;

use crate::{
    config::WeberConfig,
    error::{Result, WeberError},
    models::{GenerateContentRequest, GenerateContentResponse, GenerationRequest},
};
use async_trait::async_trait;
use reqwest::Client;
use std::sync::Arc;

pub use image_client::{build_payload, compose_instruction, extract_image, ImageClient};
pub use text_client::{TextClient, FALLBACK_PROMPT};
pub use traits::{ImageGenerator, PromptGenerator};

/// Process-wide handle to the Gemini API. Built once from configuration;
/// stateless per call.
#[derive(Clone)]
pub struct GeminiClient {
    text_client: TextClient,
    image_client: ImageClient,
    config: Arc<WeberConfig>,
}

impl GeminiClient {
    pub fn new(config: WeberConfig) -> Result<Self> {
        if config.api_key.trim().is_empty() {
            return Err(WeberError::ConfigError("API key is required".into()));
        }

        let http = Client::builder()
            .user_agent(concat!("weber/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| WeberError::ConfigError(format!("Failed to build HTTP client: {}", e)))?;
        let config = Arc::new(config);

        Ok(Self {
            text_client: TextClient::new(http.clone(), config.clone()),
            image_client: ImageClient::new(http, config.clone()),
            config,
        })
    }

    pub fn text(&self) -> &TextClient {
        &self.text_client
    }

    pub fn image(&self) -> &ImageClient {
        &self.image_client
    }

    pub fn config(&self) -> &WeberConfig {
        &self.config
    }
}

#[async_trait]
impl ImageGenerator for GeminiClient {
    async fn generate_image(&self, request: GenerationRequest) -> Result<String> {
        self.image_client.generate(request).await
    }
}

#[async_trait]
impl PromptGenerator for GeminiClient {
    async fn random_prompt(&self) -> String {
        self.text_client.random_prompt().await
    }
}

pub(crate) async fn invoke_model(
    http: &Client,
    config: &WeberConfig,
    model: &str,
    payload: &GenerateContentRequest,
) -> Result<GenerateContentResponse> {
    let endpoint = config.endpoint_for_model(model);

    if log::log_enabled!(log::Level::Debug) {
        let body = serde_json::to_string(payload)
            .map_err(|e| WeberError::SerializationError(e.to_string()))?;
        log::debug!("POST {} ({} bytes)", endpoint, body.len());
    }

    let response = http
        .post(&endpoint)
        .header("x-goog-api-key", &config.api_key)
        .json(payload)
        .send()
        .await
        .map_err(|e| WeberError::RequestError(format!("Gemini request failed: {}", e)))?;

    let status = response.status();
    if !status.is_success() {
        let error_text = response.text().await.unwrap_or_default();
        return Err(WeberError::ResponseError(format!(
            "Gemini returned {}: {}",
            status, error_text
        )));
    }

    let body = response
        .text()
        .await
        .map_err(|e| WeberError::ResponseError(e.to_string()))?;
    log::debug!("Gemini response: {} bytes", body.len());

    serde_json::from_str(&body).map_err(|e| WeberError::ResponseError(e.to_string()))
}


#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_client_requires_key() {
        assert!(GeminiClient::new(WeberConfig::new("")).is_err());
        let client = GeminiClient::new(WeberConfig::new("key")).unwrap();
        assert_eq!(client.config().api_key, "key");
    }

    #[tokio::test]
    async fn test_error_status_is_a_response_error() {
        let base = test_server::respond_once(500, r#"{"error":{"message":"boom"}}"#).await;
        let config = WeberConfig::new("key").with_api_base(base);
        let payload = GenerateContentRequest::from_text("hi");

        let err = invoke_model(&test_server::http(), &config, "m", &payload)
            .await
            .unwrap_err();
        let WeberError::ResponseError(message) = err else {
            panic!("expected a response error, got {:?}", err);
        };
        assert!(message.contains("500"));
        assert!(message.contains("boom"));
    }

    #[tokio::test]
    async fn test_success_body_is_decoded() {
        let body = json!({
            "candidates": [{"content": {"parts": [{"text": "hello"}]}, "finishReason": "STOP"}]
        })
        .to_string();
        let base = test_server::respond_once(200, &body).await;
        let config = WeberConfig::new("key").with_api_base(base);

        let response = invoke_model(
            &test_server::http(),
            &config,
            "m",
            &GenerateContentRequest::from_text("hi"),
        )
        .await
        .unwrap();
        assert_eq!(response.text(), "hello");
        assert_eq!(response.finish_reason(), Some("STOP"));
    }

    #[tokio::test]
    async fn test_malformed_body_is_a_response_error() {
        let base = test_server::respond_once(200, "not json").await;
        let config = WeberConfig::new("key").with_api_base(base);

        let err = invoke_model(
            &test_server::http(),
            &config,
            "m",
            &GenerateContentRequest::from_text("hi"),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, WeberError::ResponseError(_)));
    }
}
