pub mod anthropic;
pub mod client;
pub mod error;
pub mod gemini;


use async_trait::async_trait;
use std::time::Duration;

use crate::config::Config;
use crate::core::{GenerationRequest, GenerationResult, ProviderKind};

pub use anthropic::ClaudeClient;
pub use client::HttpClient;
pub use error::{LlmError, Result};
pub use gemini::GeminiClient;

/// A remote provider that turns one request into generated text
#[async_trait]
pub trait TextProvider: Send + Sync {
    fn kind(&self) -> ProviderKind;

    /// Perform exactly one call to the provider
    async fn generate(&self, request: &GenerationRequest) -> Result<GenerationResult>;
}

/// Create the adapter for `kind`
pub fn build_provider(kind: ProviderKind, config: &Config) -> Result<Box<dyn TextProvider>> {
    let timeout = config.timeout_secs.map(Duration::from_secs);
    Ok(match kind {
        ProviderKind::Claude => Box::new(ClaudeClient::new(config.claude.clone(), timeout)?),
        ProviderKind::Gemini => Box::new(GeminiClient::new(config.gemini.clone(), timeout)?),
    })
}
