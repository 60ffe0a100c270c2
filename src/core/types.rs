use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// Remote text-generation provider
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    /// Anthropic Messages API with extended thinking
    Claude,
    /// Google generateContent API
    Gemini,
}

impl ProviderKind {
    /// Label used in log output and in output filenames
    pub fn label(&self) -> &'static str {
        match self {
            ProviderKind::Claude => "claude",
            ProviderKind::Gemini => "gemini",
        }
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One prompt addressed to one provider
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationRequest {
    pub prompt: String,
    pub system_instruction: String,
    /// Ignored by providers that take no token budget
    pub max_output_tokens: u32,
    pub provider: ProviderKind,
}

/// Text extracted from a provider response, with the response it came from
#[derive(Debug, Clone)]
pub struct GenerationResult {
    pub generated_text: String,
    pub raw_provider_response: serde_json::Value,
}

/// The `.txt` and `.pdf` files written for one generation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputArtifacts {
    pub stem: String,
    pub txt_path: PathBuf,
    pub pdf_path: PathBuf,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_labels() {
        assert_eq!(ProviderKind::Claude.label(), "claude");
        assert_eq!(ProviderKind::Gemini.to_string(), "gemini");
    }

    #[test]
    fn test_provider_kind_from_toml_value() {
        let kind: ProviderKind = serde_json::from_str("\"gemini\"").unwrap();
        assert_eq!(kind, ProviderKind::Gemini);
    }
}
