pub mod error;

use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::warn;

use crate::export::encoding::Unrepresentable;
use error::{ConfigError, Result};

/// Name of the optional configuration file
pub const CONFIG_FILE_NAME: &str = "promptpress.toml";

/// Instruction every Claude system prompt starts with
pub const REASONING_PREFIX: &str =
    "To answer this question, use reasoning mode to think through the answer step by step.";

pub const DEFAULT_GEMINI_SYSTEM_PROMPT: &str =
    "You are a thoughtful creative writer. Answer the request in full.";

/// Main configuration structure
#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct Config {
    /// Directory receiving the `.txt` and `.pdf` outputs
    pub output_dir: PathBuf,

    /// Log level: error, warn, info, debug, trace
    pub log_level: Option<String>,

    /// HTTP timeout; the client default (none) applies when unset
    pub timeout_secs: Option<u64>,

    pub claude: ClaudeConfig,
    pub gemini: GeminiConfig,
    pub pdf: PdfConfig,
}

/// Anthropic Messages API settings
#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct ClaudeConfig {
    pub model: String,
    pub max_tokens: u32,
    /// Tokens reserved for the reasoning pass, must stay below `max_tokens`
    pub thinking_budget: u32,
    /// Appended after [`REASONING_PREFIX`]
    pub system_prompt: Option<String>,
    pub api_key: Option<String>,
    pub api_key_env: String,
    pub base_url: String,
}

/// Google generateContent API settings
#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct GeminiConfig {
    pub model: String,
    pub system_prompt: Option<String>,
    pub api_key: Option<String>,
    pub api_key_env: String,
    pub base_url: String,
}

/// PDF rendering settings
#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct PdfConfig {
    pub font_size: f32,
    /// What happens to characters outside the single-byte PDF character set
    pub unrepresentable: Unrepresentable,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("outputs"),
            log_level: None,
            timeout_secs: None,
            claude: ClaudeConfig::default(),
            gemini: GeminiConfig::default(),
            pdf: PdfConfig::default(),
        }
    }
}

impl Default for ClaudeConfig {
    fn default() -> Self {
        Self {
            model: "claude-3-7-sonnet-20250219".to_string(),
            max_tokens: 2024,
            thinking_budget: 1024,
            system_prompt: None,
            api_key: None,
            api_key_env: "ANTHROPIC_API_KEY".to_string(),
            base_url: "https://api.anthropic.com/v1".to_string(),
        }
    }
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            model: "gemini-2.0-flash".to_string(),
            system_prompt: None,
            api_key: None,
            api_key_env: "GEMINI_API_KEY".to_string(),
            base_url: "https://generativelanguage.googleapis.com/v1beta".to_string(),
        }
    }
}

impl Default for PdfConfig {
    fn default() -> Self {
        Self {
            font_size: 12.0,
            unrepresentable: Unrepresentable::Replace,
        }
    }
}

/// Values given on the command line, taking precedence over the file
#[derive(Debug, Default, Clone)]
pub struct Overrides {
    pub claude_model: Option<String>,
    pub gemini_model: Option<String>,
    pub max_tokens: Option<u32>,
    pub system_prompt: Option<String>,
    pub output_dir: Option<PathBuf>,
}

impl Config {
    /// Load configuration from promptpress.toml, falling back to defaults
    /// when no file exists in `start_dir` or any parent directory
    pub fn load(start_dir: impl AsRef<Path>) -> Result<Self> {
        let Some(config_path) = find_config_file(start_dir.as_ref())? else {
            return Ok(Self::default());
        };

        let config_data =
            fs::read_to_string(&config_path).map_err(|source| ConfigError::ReadFailed {
                path: config_path.display().to_string(),
                source,
            })?;

        let mut config: Config = toml::from_str(&config_data)?;
        config.expand_env_vars();

        // Relative output directories are relative to the config file
        if config.output_dir.is_relative() {
            if let Some(config_dir) = config_path.parent() {
                config.output_dir = config_dir.join(&config.output_dir);
            }
        }

        config.validate()?;
        Ok(config)
    }

    /// Apply command-line overrides and re-validate
    pub fn apply(&mut self, overrides: Overrides) -> Result<()> {
        if let Some(model) = overrides.claude_model {
            self.claude.model = model;
        }
        if let Some(model) = overrides.gemini_model {
            self.gemini.model = model;
        }
        if let Some(max_tokens) = overrides.max_tokens {
            self.claude.max_tokens = max_tokens;
        }
        if let Some(system_prompt) = overrides.system_prompt {
            self.claude.system_prompt = Some(system_prompt.clone());
            self.gemini.system_prompt = Some(system_prompt);
        }
        if let Some(output_dir) = overrides.output_dir {
            self.output_dir = output_dir;
        }
        self.validate()
    }

    /// Validate field values that serde cannot check
    pub fn validate(&self) -> Result<()> {
        if self.claude.model.is_empty() {
            return Err(ConfigError::MissingField("claude.model".to_string()));
        }
        if self.gemini.model.is_empty() {
            return Err(ConfigError::MissingField("gemini.model".to_string()));
        }
        if self.claude.max_tokens == 0 {
            return Err(ConfigError::Invalid(
                "'claude.max_tokens' must be positive".to_string(),
            ));
        }
        if self.claude.thinking_budget >= self.claude.max_tokens {
            return Err(ConfigError::Invalid(format!(
                "'claude.thinking_budget' ({}) must be less than 'claude.max_tokens' ({})",
                self.claude.thinking_budget, self.claude.max_tokens
            )));
        }
        if self.pdf.font_size.is_nan() || self.pdf.font_size <= 0.0 {
            return Err(ConfigError::Invalid(
                "'pdf.font_size' must be positive".to_string(),
            ));
        }
        Ok(())
    }

    /// System instruction sent to Claude
    pub fn claude_system_instruction(&self) -> String {
        match self.claude.system_prompt.as_deref() {
            Some(extra) if !extra.trim().is_empty() => format!("{} {}", REASONING_PREFIX, extra),
            _ => REASONING_PREFIX.to_string(),
        }
    }

    /// System instruction sent to Gemini
    pub fn gemini_system_instruction(&self) -> String {
        self.gemini
            .system_prompt
            .clone()
            .filter(|prompt| !prompt.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_GEMINI_SYSTEM_PROMPT.to_string())
    }

    /// Warn about API keys written directly into the config file
    pub fn warn_hardcoded_keys(&self) {
        for (section, key) in [
            ("claude", &self.claude.api_key),
            ("gemini", &self.gemini.api_key),
        ] {
            if key.as_deref().is_some_and(looks_hardcoded) {
                warn!(
                    "API key appears to be hardcoded in [{}]. Consider api_key = \"${{VAR}}\" or the api_key_env setting",
                    section
                );
            }
        }
    }

    fn expand_env_vars(&mut self) {
        self.claude.api_key = self.claude.api_key.take().and_then(|key| expand_key(&key));
        self.gemini.api_key = self.gemini.api_key.take().and_then(|key| expand_key(&key));
    }
}

/// Resolve an API key: explicit value first, then the environment
pub fn resolve_api_key(explicit: Option<&str>, env_var: &str) -> Option<String> {
    explicit
        .map(str::to_string)
        .or_else(|| env::var(env_var).ok())
        .map(|key| key.trim().to_string())
        .filter(|key| !key.is_empty())
}

fn looks_hardcoded(key: &str) -> bool {
    !key.contains("${") && (key.starts_with("sk-") || key.starts_with("AIza"))
}

/// Find promptpress.toml by searching upward from the given path
fn find_config_file(start_path: &Path) -> Result<Option<PathBuf>> {
    let current_dir = if start_path.is_file() {
        start_path.parent().unwrap_or(Path::new("."))
    } else {
        start_path
    };

    let mut current_dir = current_dir.canonicalize()?;

    loop {
        let config_path = current_dir.join(CONFIG_FILE_NAME);
        if config_path.exists() {
            return Ok(Some(config_path));
        }

        match current_dir.parent() {
            Some(parent) => current_dir = parent.to_path_buf(),
            None => return Ok(None),
        }
    }
}

/// Expand a key of the form ${VAR_NAME}; unset variables yield None
fn expand_key(value: &str) -> Option<String> {
    match expand_env_var(value) {
        Some(expanded) => Some(expanded),
        None if value.starts_with("${") => None,
        None => Some(value.to_string()),
    }
}

/// Expand environment variable in the format ${VAR_NAME}
fn expand_env_var(value: &str) -> Option<String> {
    if value.starts_with("${") && value.ends_with('}') {
        let var_name = &value[2..value.len() - 1];
        env::var(var_name).ok()
    } else {
        None
    }
}
