pub mod error;
pub mod metrics;
pub mod types;

pub use error::{AppError, Result};
pub use types::{GenerationRequest, GenerationResult, OutputArtifacts, ProviderKind};
