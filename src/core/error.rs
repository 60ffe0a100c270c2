use thiserror::Error;

/// Main application error type that aggregates domain-specific errors
#[derive(Error, Debug)]
pub enum AppError {
    /// Configuration layer errors
    #[error(transparent)]
    Config(#[from] crate::config::error::ConfigError),

    /// LLM layer errors
    #[error(transparent)]
    Llm(#[from] crate::llm::error::LlmError),

    /// Output file errors
    #[error(transparent)]
    Export(#[from] crate::export::error::ExportError),

    /// Invalid command-line input
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

/// Result type alias for promptpress operations
pub type Result<T> = std::result::Result<T, AppError>;

impl AppError {
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        AppError::InvalidInput(msg.into())
    }
}
