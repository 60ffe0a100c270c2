use thiserror::Error;

use crate::core::ProviderKind;

/// LLM-specific errors
#[derive(Error, Debug)]
pub enum LlmError {
    #[error("No API key for {provider}: set {env_var}")]
    MissingApiKey {
        provider: ProviderKind,
        env_var: String,
    },

    #[error("API key rejected by {provider}: {message}")]
    InvalidApiKey {
        provider: ProviderKind,
        message: String,
    },

    #[error("API request failed with status {status}: {message}")]
    ApiError { status: u16, message: String },

    #[error("Failed to build HTTP client: {0}")]
    ClientBuildFailed(String),

    #[error("Invalid response format: {0}")]
    InvalidResponse(String),

    #[error("Response has no answer: {0}")]
    MissingAnswer(String),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, LlmError>;
