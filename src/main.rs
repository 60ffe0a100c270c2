use promptpress::config::{Config, Overrides};
use promptpress::generation::{self, Outcome};

use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

/// Send a prompt to hosted LLMs and save each response as text and PDF
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Prompt to send
    #[arg(long, default_value = "I would like a sonnet about love")]
    prompt: String,

    /// Ask Claude (the default when no provider is selected)
    #[arg(long)]
    claude: bool,

    /// Ask Gemini
    #[arg(long)]
    gemini: bool,

    /// Claude model name
    #[arg(long = "claude_model")]
    claude_model: Option<String>,

    /// Gemini model name
    #[arg(long = "gemini_model")]
    gemini_model: Option<String>,

    /// Output token limit for Claude
    #[arg(long = "max_tokens")]
    max_tokens: Option<u32>,

    /// Extra system instruction
    #[arg(long = "system_prompt")]
    system_prompt: Option<String>,

    /// Directory for the .txt and .pdf files
    #[arg(long = "output_dir")]
    output_dir: Option<PathBuf>,

    /// Config directory (contains promptpress.toml)
    #[arg(long = "config_dir", short = 'c', default_value = ".")]
    config_dir: PathBuf,

    /// Verbose logging
    #[arg(long)]
    debug: bool,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let args = Args::parse();

    let mut config = Config::load(&args.config_dir)?;
    config.apply(Overrides {
        claude_model: args.claude_model,
        gemini_model: args.gemini_model,
        max_tokens: args.max_tokens,
        system_prompt: args.system_prompt,
        output_dir: args.output_dir,
    })?;

    // --debug wins, then RUST_LOG, then the config file, then "warn"
    let env_filter = if args.debug {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(config.log_level.as_deref().unwrap_or("warn"))
        })
    };

    let subscriber = FmtSubscriber::builder()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;
    config.warn_hardcoded_keys();

    let providers = generation::select_providers(args.claude, args.gemini);
    info!(?providers, output_dir = %config.output_dir.display(), "Starting");

    let jobs = generation::plan(&providers, &args.prompt, &config)?;
    let outcomes = generation::run_all(&jobs).await;

    let mut failed = Vec::new();
    for Outcome { provider, result } in outcomes {
        match result {
            Ok(generated) => println!(
                "Response saved to {} and {}",
                generated.artifacts.txt_path.display(),
                generated.artifacts.pdf_path.display()
            ),
            Err(e) => failed.push(format!("{}: {}", provider, e)),
        }
    }

    if !failed.is_empty() {
        anyhow::bail!("Generation failed for {}", failed.join("; "));
    }

    Ok(())
}
