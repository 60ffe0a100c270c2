pub mod stem;

use chrono::Local;
use tracing::{error, info};

use crate::config::Config;
use crate::core::{
    AppError, GenerationRequest, GenerationResult, OutputArtifacts, ProviderKind, Result,
};
use crate::export::Exporter;
use crate::llm::{build_provider, TextProvider};

pub use stem::filename_stem;

/// A provider adapter paired with the exporter that persists its output
pub struct Generator {
    provider: Box<dyn TextProvider>,
    exporter: Exporter,
}

/// Successful generation and the files written for it
#[derive(Debug, Clone)]
pub struct Generated {
    pub result: GenerationResult,
    pub artifacts: OutputArtifacts,
}

/// A generator with the request it will run
pub struct Job {
    pub generator: Generator,
    pub request: GenerationRequest,
}

/// Result of one job in a run
#[derive(Debug)]
pub struct Outcome {
    pub provider: ProviderKind,
    pub result: Result<Generated>,
}

impl Generator {
    pub fn new(provider: Box<dyn TextProvider>, exporter: Exporter) -> Self {
        Self { provider, exporter }
    }

    pub fn kind(&self) -> ProviderKind {
        self.provider.kind()
    }

    /// Call the provider once and export its text. The filename timestamp
    /// is taken when the call starts.
    pub async fn run(&self, request: &GenerationRequest) -> Result<Generated> {
        let kind = self.kind();
        if request.provider != kind {
            return Err(AppError::invalid_input(format!(
                "request for {} sent to the {} adapter",
                request.provider, kind
            )));
        }

        let started = Local::now().naive_local();
        info!(provider = %kind, "Requesting generation");
        let result = self.provider.generate(request).await?;

        let stem = filename_stem(kind, started);
        let artifacts = self.exporter.export(&stem, &result.generated_text)?;

        Ok(Generated { result, artifacts })
    }
}

/// Providers to invoke, in their fixed order. Claude is the default.
pub fn select_providers(claude: bool, gemini: bool) -> Vec<ProviderKind> {
    let mut providers = Vec::new();
    if claude || !gemini {
        providers.push(ProviderKind::Claude);
    }
    if gemini {
        providers.push(ProviderKind::Gemini);
    }
    providers
}

/// Build the request a provider receives for `prompt`
pub fn build_request(
    provider: ProviderKind,
    prompt: &str,
    config: &Config,
) -> Result<GenerationRequest> {
    if prompt.trim().is_empty() {
        return Err(AppError::invalid_input("prompt must not be empty"));
    }

    let system_instruction = match provider {
        ProviderKind::Claude => config.claude_system_instruction(),
        ProviderKind::Gemini => config.gemini_system_instruction(),
    };

    Ok(GenerationRequest {
        prompt: prompt.to_string(),
        system_instruction,
        max_output_tokens: config.claude.max_tokens,
        provider,
    })
}

/// Build one job per provider, all writing through the configured exporter
pub fn plan(providers: &[ProviderKind], prompt: &str, config: &Config) -> Result<Vec<Job>> {
    let exporter = Exporter::from_config(config);
    providers
        .iter()
        .map(|&kind| -> Result<Job> {
            Ok(Job {
                generator: Generator::new(build_provider(kind, config)?, exporter.clone()),
                request: build_request(kind, prompt, config)?,
            })
        })
        .collect()
}

/// Run jobs one after another. A failed job does not stop later ones.
pub async fn run_all(jobs: &[Job]) -> Vec<Outcome> {
    let mut outcomes = Vec::with_capacity(jobs.len());
    for job in jobs {
        let provider = job.generator.kind();
        let result = job.generator.run(&job.request).await;
        if let Err(e) = &result {
            error!(%provider, "Generation failed: {}", e);
        }
        outcomes.push(Outcome { provider, result });
    }
    outcomes
}
