pub mod encoding;
pub mod error;
pub mod pdf;

use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::config::Config;
use crate::core::metrics::Timer;
use crate::core::OutputArtifacts;
use encoding::Unrepresentable;
use error::{ExportError, Result};
use pdf::PdfLayout;

/// Writes generated text to a `.txt` and a `.pdf` file sharing a stem
#[derive(Debug, Clone)]
pub struct Exporter {
    output_dir: PathBuf,
    layout: PdfLayout,
    policy: Unrepresentable,
}

impl Exporter {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
            layout: PdfLayout::a4(12.0),
            policy: Unrepresentable::default(),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self {
            output_dir: config.output_dir.clone(),
            layout: PdfLayout::a4(config.pdf.font_size),
            policy: config.pdf.unrepresentable,
        }
    }

    pub fn with_policy(mut self, policy: Unrepresentable) -> Self {
        self.policy = policy;
        self
    }

    /// Write both files. The `.txt` file is written first and is left in
    /// place if the `.pdf` write fails.
    pub fn export(&self, stem: &str, text: &str) -> Result<OutputArtifacts> {
        let timer = Timer::start_debug(format!("export {}", stem));

        fs::create_dir_all(&self.output_dir).map_err(|source| ExportError::CreateDir {
            path: self.output_dir.clone(),
            source,
        })?;

        let txt_path = self.output_dir.join(format!("{}.txt", stem));
        write_file(&txt_path, text.as_bytes())?;
        debug!(path = %txt_path.display(), bytes = text.len(), "Wrote text output");

        let pdf_path = self.output_dir.join(format!("{}.pdf", stem));
        let document = pdf::render(text, &self.layout, self.policy);
        write_file(&pdf_path, &document)?;
        debug!(path = %pdf_path.display(), bytes = document.len(), "Wrote PDF output");

        timer.stop();
        info!(stem, "Exported response");

        Ok(OutputArtifacts {
            stem: stem.to_string(),
            txt_path,
            pdf_path,
        })
    }
}

fn write_file(path: &Path, contents: &[u8]) -> Result<()> {
    fs::write(path, contents).map_err(|source| ExportError::Write {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_export_writes_both_files() -> anyhow::Result<()> {
        let temp_dir = TempDir::new()?;
        let exporter = Exporter::new(temp_dir.path().join("outputs"));

        let artifacts = exporter.export("claude_response_test", "Ünïcode text ✓")?;

        assert_eq!(
            artifacts.txt_path,
            temp_dir.path().join("outputs/claude_response_test.txt")
        );
        assert_eq!(fs::read_to_string(&artifacts.txt_path)?, "Ünïcode text ✓");
        assert!(fs::read(&artifacts.pdf_path)?.starts_with(b"%PDF-"));
        Ok(())
    }

    #[test]
    fn test_existing_directory_is_reused() -> anyhow::Result<()> {
        let temp_dir = TempDir::new()?;
        let exporter = Exporter::new(temp_dir.path());

        exporter.export("first", "one")?;
        exporter.export("second", "two")?;

        assert!(temp_dir.path().join("first.pdf").exists());
        assert!(temp_dir.path().join("second.pdf").exists());
        Ok(())
    }

    #[test]
    fn test_unwritable_directory_fails() -> anyhow::Result<()> {
        let temp_dir = TempDir::new()?;
        let blocker = temp_dir.path().join("not_a_dir");
        fs::write(&blocker, "file")?;

        let exporter = Exporter::new(&blocker);
        let result = exporter.export("stem", "text");
        assert!(matches!(result, Err(ExportError::CreateDir { .. })));
        Ok(())
    }
}
