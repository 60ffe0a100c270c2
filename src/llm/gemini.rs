use async_trait::async_trait;
use reqwest::header::HeaderMap;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

use super::client::{key_header, HttpClient};
use super::error::{LlmError, Result};
use super::TextProvider;
use crate::config::{resolve_api_key, GeminiConfig};
use crate::core::metrics::Timer;
use crate::core::{GenerationRequest, GenerationResult, ProviderKind};

/// Gemini adapter for the generateContent API
#[derive(Clone)]
pub struct GeminiClient {
    http: HttpClient,
    config: GeminiConfig,
}

impl GeminiClient {
    pub fn new(config: GeminiConfig, timeout: Option<Duration>) -> Result<Self> {
        Ok(Self {
            http: HttpClient::new(timeout)?,
            config,
        })
    }

    /// Build the request body. No token limit is forwarded.
    pub fn build_request<'a>(
        &self,
        request: &'a GenerationRequest,
    ) -> GenerateContentRequest<'a> {
        GenerateContentRequest {
            system_instruction: Instruction {
                parts: vec![TextPart {
                    text: &request.system_instruction,
                }],
            },
            contents: vec![Turn {
                role: "user",
                parts: vec![TextPart {
                    text: &request.prompt,
                }],
            }],
        }
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.config.base_url.trim_end_matches('/'),
            self.config.model
        )
    }
}

#[async_trait]
impl TextProvider for GeminiClient {
    fn kind(&self) -> ProviderKind {
        ProviderKind::Gemini
    }

    async fn generate(&self, request: &GenerationRequest) -> Result<GenerationResult> {
        let api_key = resolve_api_key(self.config.api_key.as_deref(), &self.config.api_key_env)
            .ok_or_else(|| LlmError::MissingApiKey {
                provider: ProviderKind::Gemini,
                env_var: self.config.api_key_env.clone(),
            })?;

        let mut headers = HeaderMap::new();
        headers.insert("x-goog-api-key", key_header(ProviderKind::Gemini, &api_key)?);

        let body = self.build_request(request);

        let timer = Timer::start(format!("gemini {}", self.config.model));
        let sent = self
            .http
            .post_json(ProviderKind::Gemini, &self.endpoint(), headers, &body)
            .await;
        timer.stop_with_result(&sent);
        let raw = sent?;

        let response: GenerateContentResponse = serde_json::from_value(raw.clone())?;
        let generated_text = response.answer().ok_or_else(|| {
            let reason = response
                .candidates
                .first()
                .and_then(|candidate| candidate.finish_reason.clone())
                .unwrap_or_else(|| "no candidates".to_string());
            LlmError::MissingAnswer(format!("empty response ({})", reason))
        })?;
        debug!("Response text:\n{}", generated_text);

        Ok(GenerationResult {
            generated_text,
            raw_provider_response: raw,
        })
    }
}

/// Request for the generateContent API
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentRequest<'a> {
    pub system_instruction: Instruction<'a>,
    pub contents: Vec<Turn<'a>>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Instruction<'a> {
    pub parts: Vec<TextPart<'a>>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Turn<'a> {
    pub role: &'static str,
    pub parts: Vec<TextPart<'a>>,
}

#[derive(Debug, Clone, Serialize)]
pub struct TextPart<'a> {
    pub text: &'a str,
}

/// Response from the generateContent API - only fields we actually use
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    #[serde(default)]
    pub content: Option<CandidateContent>,
    #[serde(default)]
    pub finish_reason: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CandidateContent {
    #[serde(default)]
    pub parts: Vec<Part>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Part {
    #[serde(default)]
    pub text: Option<String>,
    /// Set on thought summaries, which are not part of the answer
    #[serde(default)]
    pub thought: bool,
}

impl GenerateContentResponse {
    /// Text parts of the first candidate, or None if there is no text
    pub fn answer(&self) -> Option<String> {
        let content = self.candidates.first()?.content.as_ref()?;
        let text: String = content
            .parts
            .iter()
            .filter(|part| !part.thought)
            .filter_map(|part| part.text.as_deref())
            .collect();
        (!text.is_empty()).then_some(text)
    }
}
