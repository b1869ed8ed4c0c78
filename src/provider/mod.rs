//! Text-generation provider
//!
//! The resolver only sees [`TextGenerator`]; the concrete client is built
//! once at startup and shared through `AppState`.

pub mod openai;

use async_trait::async_trait;
use serde::Serialize;
use thiserror::Error;

pub use openai::OpenAIClient;

/// Output format requested from the model
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ResponseFormat {
    JsonObject,
}

/// One generation call
#[derive(Debug, Clone)]
pub struct GenerationRequest {
    pub model: String,
    pub system_instruction: String,
    pub user_prompt: String,
    pub response_format: ResponseFormat,
}

/// Provider output, by response shape
#[derive(Debug, Clone, PartialEq)]
pub enum ProviderResponse {
    /// First text item of a structured content array
    Structured(String),
    /// Flat output-text field
    FlatText(String),
}

impl ProviderResponse {
    /// Raw text payload regardless of shape
    pub fn text(&self) -> &str {
        match self {
            Self::Structured(text) | Self::FlatText(text) => text,
        }
    }

    pub fn shape(&self) -> &'static str {
        match self {
            Self::Structured(_) => "structured",
            Self::FlatText(_) => "flat_text",
        }
    }
}

#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("network error: {0}")]
    Network(String),

    #[error("request timed out after {0}s")]
    Timeout(u64),

    #[error("authentication failed: {0}")]
    Unauthorized(String),

    #[error("rate limited: {0}")]
    RateLimited(String),

    #[error("provider returned {status}: {body}")]
    Server { status: u16, body: String },

    #[error("unreadable provider response: {0}")]
    Parse(String),
}

/// Capability: turn a prompt into model text
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Provider name for logs
    fn name(&self) -> &'static str;

    async fn generate(&self, request: &GenerationRequest) -> Result<ProviderResponse, ProviderError>;
}
