//! `demodoc render` command implementation.

use std::io::Write;
use std::path::PathBuf;

use clap::Args;
use demodoc_config::{CliSettings, Config};

use super::markdown_from_config;
use crate::error::CliError;
use crate::output::Output;

/// Arguments for the render command.
#[derive(Args)]
pub(crate) struct RenderArgs {
    /// Markdown file to render.
    file: PathBuf,

    /// Write HTML to this file instead of stdout.
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Path to configuration file (default: auto-discover demodoc.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Disable heading anchors.
    #[arg(long)]
    no_anchors: bool,

    /// Enable verbose output.
    #[arg(short, long)]
    pub verbose: bool,
}

impl RenderArgs {
    /// Execute the render command.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration fails or the file cannot be read or written.
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();

        let cli_settings = CliSettings {
            anchors_enabled: self.no_anchors.then_some(false),
            ..CliSettings::default()
        };
        let config = Config::load(self.config.as_deref(), Some(&cli_settings))?;
        let md = markdown_from_config(&config);

        let source = std::fs::read_to_string(&self.file).map_err(CliError::file(&self.file))?;
        let result = md.render(&source);
        output.document_warnings(&self.file.display().to_string(), &result.warnings);

        match &self.output {
            Some(path) => {
                if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                    std::fs::create_dir_all(parent).map_err(CliError::file(parent))?;
                }
                std::fs::write(path, &result.html).map_err(CliError::file(path))?;
                output.success(&format!("Rendered {}", path.display()));
            }
            None => {
                let mut stdout = std::io::stdout().lock();
                stdout.write_all(result.html.as_bytes())?;
                stdout.flush()?;
            }
        }

        Ok(())
    }
}
