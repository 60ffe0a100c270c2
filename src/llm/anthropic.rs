use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

use super::client::{key_header, HttpClient};
use super::error::{LlmError, Result};
use super::TextProvider;
use crate::config::{resolve_api_key, ClaudeConfig};
use crate::core::metrics::Timer;
use crate::core::{GenerationRequest, GenerationResult, ProviderKind};

const ANTHROPIC_VERSION: &str = "2023-06-01";

/// Claude adapter for the Anthropic Messages API with extended thinking
#[derive(Clone)]
pub struct ClaudeClient {
    http: HttpClient,
    config: ClaudeConfig,
}

impl ClaudeClient {
    pub fn new(config: ClaudeConfig, timeout: Option<Duration>) -> Result<Self> {
        Ok(Self {
            http: HttpClient::new(timeout)?,
            config,
        })
    }

    /// Build the request body for `request`
    pub fn build_request<'a>(&'a self, request: &'a GenerationRequest) -> MessagesRequest<'a> {
        MessagesRequest {
            model: &self.config.model,
            max_tokens: request.max_output_tokens,
            system: &request.system_instruction,
            messages: vec![UserMessage {
                role: "user",
                content: &request.prompt,
            }],
            thinking: ThinkingConfig {
                kind: "enabled",
                budget_tokens: self.config.thinking_budget,
            },
        }
    }
}

#[async_trait]
impl TextProvider for ClaudeClient {
    fn kind(&self) -> ProviderKind {
        ProviderKind::Claude
    }

    async fn generate(&self, request: &GenerationRequest) -> Result<GenerationResult> {
        let api_key = resolve_api_key(self.config.api_key.as_deref(), &self.config.api_key_env)
            .ok_or_else(|| LlmError::MissingApiKey {
                provider: ProviderKind::Claude,
                env_var: self.config.api_key_env.clone(),
            })?;

        let mut headers = HeaderMap::new();
        headers.insert("x-api-key", key_header(ProviderKind::Claude, &api_key)?);
        headers.insert(
            "anthropic-version",
            HeaderValue::from_static(ANTHROPIC_VERSION),
        );

        let url = format!("{}/messages", self.config.base_url.trim_end_matches('/'));
        let body = self.build_request(request);

        let timer = Timer::start(format!("claude {}", self.config.model));
        let sent = self
            .http
            .post_json(ProviderKind::Claude, &url, headers, &body)
            .await;
        timer.stop_with_result(&sent);
        let raw = sent?;

        let response: MessagesResponse = serde_json::from_value(raw.clone())?;
        for reasoning in response.reasoning() {
            debug!("Thinking block:\n{}", reasoning);
        }

        let generated_text = response.answer().ok_or_else(|| {
            LlmError::MissingAnswer(format!(
                "no text block among {} content blocks",
                response.content.len()
            ))
        })?;
        debug!("Text block:\n{}", generated_text);

        Ok(GenerationResult {
            generated_text,
            raw_provider_response: raw,
        })
    }
}

/// Request for the Messages API
#[derive(Debug, Clone, Serialize)]
pub struct MessagesRequest<'a> {
    pub model: &'a str,
    pub max_tokens: u32,
    pub system: &'a str,
    pub messages: Vec<UserMessage<'a>>,
    pub thinking: ThinkingConfig,
}

#[derive(Debug, Clone, Serialize)]
pub struct UserMessage<'a> {
    pub role: &'static str,
    pub content: &'a str,
}

#[derive(Debug, Clone, Serialize)]
pub struct ThinkingConfig {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub budget_tokens: u32,
}

/// Response from the Messages API - only fields we actually use
#[derive(Debug, Clone, Deserialize)]
pub struct MessagesResponse {
    pub content: Vec<ContentBlock>,
    #[serde(default)]
    pub stop_reason: Option<String>,
}

/// Content block, selected by its `type` tag rather than its position
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentBlock {
    Thinking {
        thinking: String,
    },
    RedactedThinking,
    Text {
        text: String,
    },
    #[serde(other)]
    Other,
}

impl MessagesResponse {
    /// Final answer: all text blocks in order, or None if there are none
    /// or they are empty
    pub fn answer(&self) -> Option<String> {
        let text: String = self
            .content
            .iter()
            .filter_map(|block| match block {
                ContentBlock::Text { text } => Some(text.as_str()),
                _ => None,
            })
            .collect();
        (!text.is_empty()).then_some(text)
    }

    /// Reasoning traces that accompany the answer
    pub fn reasoning(&self) -> impl Iterator<Item = &str> {
        self.content.iter().filter_map(|block| match block {
            ContentBlock::Thinking { thinking } => Some(thinking.as_str()),
            _ => None,
        })
    }
}
