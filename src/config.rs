use crate::error::{Result, WeberError};
use std::env;
use std::path::PathBuf;

pub const DEFAULT_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_IMAGE_MODEL: &str = "gemini-2.5-flash-image";
pub const DEFAULT_TEXT_MODEL: &str = "gemini-2.5-flash";

#[derive(Debug, Clone)]
pub struct WeberConfig {
    pub api_key: String,
    pub api_base: String,
    pub image_model: String,
    pub text_model: String,
    pub download_dir: PathBuf,
}

impl WeberConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        WeberConfig {
            api_key: api_key.into(),
            api_base: DEFAULT_API_BASE.to_string(),
            image_model: DEFAULT_IMAGE_MODEL.to_string(),
            text_model: DEFAULT_TEXT_MODEL.to_string(),
            download_dir: PathBuf::from("."),
        }
    }

    /// Reads the process environment. A missing `API_KEY` (or
    /// `GEMINI_API_KEY`) is fatal.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let api_key = non_empty("API_KEY")
            .or_else(|| non_empty("GEMINI_API_KEY"))
            .ok_or_else(|| {
                WeberError::ConfigError("API_KEY environment variable not set".into())
            })?;

        let mut config = WeberConfig::new(api_key.trim());
        if let Some(base) = non_empty("WEBER_API_BASE") {
            config = config.with_api_base(base);
        }
        if let Some(model) = non_empty("WEBER_IMAGE_MODEL") {
            config = config.with_image_model(model);
        }
        if let Some(model) = non_empty("WEBER_TEXT_MODEL") {
            config = config.with_text_model(model);
        }
        if let Some(dir) = non_empty("WEBER_DOWNLOAD_DIR") {
            config = config.with_download_dir(dir);
        }
        Ok(config)
    }

    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        let api_base: String = api_base.into();
        self.api_base = api_base.trim().trim_end_matches('/').to_string();
        self
    }

    pub fn with_image_model(mut self, model: impl Into<String>) -> Self {
        self.image_model = model.into();
        self
    }

    pub fn with_text_model(mut self, model: impl Into<String>) -> Self {
        self.text_model = model.into();
        self
    }

    pub fn with_download_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.download_dir = dir.into();
        self
    }

    pub fn endpoint_for_model(&self, model: &str) -> String {
        let model = model.trim();
        let model_path = if model.starts_with("models/") {
            model.to_string()
        } else {
            format!("models/{}", model)
        };
        format!("{}/{}:generateContent", self.api_base, model_path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn test_missing_api_key_is_fatal() {
        let err = WeberConfig::from_lookup(lookup(&[])).unwrap_err();
        assert!(matches!(err, WeberError::ConfigError(_)));

        let err = WeberConfig::from_lookup(lookup(&[("API_KEY", "  ")])).unwrap_err();
        assert!(matches!(err, WeberError::ConfigError(_)));
    }

    #[test]
    fn test_defaults_and_overrides() {
        let config = WeberConfig::from_lookup(lookup(&[("GEMINI_API_KEY", "secret")])).unwrap();
        assert_eq!(config.api_key, "secret");
        assert_eq!(config.image_model, DEFAULT_IMAGE_MODEL);
        assert_eq!(config.text_model, DEFAULT_TEXT_MODEL);

        let config = WeberConfig::from_lookup(lookup(&[
            ("API_KEY", "k"),
            ("WEBER_API_BASE", "http://localhost:8080/"),
            ("WEBER_IMAGE_MODEL", "img"),
            ("WEBER_DOWNLOAD_DIR", "/tmp/out"),
        ]))
        .unwrap();
        assert_eq!(config.api_base, "http://localhost:8080");
        assert_eq!(config.image_model, "img");
        assert_eq!(config.download_dir, PathBuf::from("/tmp/out"));
    }

    #[test]
    fn test_endpoint_for_model() {
        let config = WeberConfig::new("k");
        assert_eq!(
            config.endpoint_for_model("gemini-2.5-flash"),
            "https://generativelanguage.googleapis.com/v1beta/models/gemini-2.5-flash:generateContent"
        );
        assert_eq!(
            config.endpoint_for_model("models/x"),
            "https://generativelanguage.googleapis.com/v1beta/models/x:generateContent"
        );
    }
}
