pub mod config;
pub mod error;
pub mod gemini;
pub mod logger;
pub mod models;
pub mod session;
pub mod view;

pub use config::WeberConfig;
pub use error::{Result, WeberError};
pub use gemini::{GeminiClient, ImageClient, ImageGenerator, PromptGenerator, TextClient};
pub use models::{
    AspectRatio, GeneratedImage, GenerationRequest, ImageStyle, ReferenceImage,
};
pub use session::{download_filename, GenerationOutcome, Session};
