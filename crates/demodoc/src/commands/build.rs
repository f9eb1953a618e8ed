//! `demodoc build` command implementation.

use std::path::{Path, PathBuf};
use std::time::Instant;

use clap::Args;
use demodoc_config::{CliSettings, Config};
use demodoc_renderer::Markdown;
use rayon::prelude::*;
use tracing::{debug, info};

use super::markdown_from_config;
use crate::error::CliError;
use crate::output::Output;

/// Arguments for the build command.
#[derive(Args)]
pub(crate) struct BuildArgs {
    /// Markdown source directory (overrides config).
    #[arg(short, long)]
    source_dir: Option<PathBuf>,

    /// HTML output directory (overrides config).
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

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

impl BuildArgs {
    /// Execute the build command.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration fails, the source directory is
    /// missing, or a page cannot be read or written.
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();

        let cli_settings = CliSettings {
            source_dir: self.source_dir,
            output_dir: self.output_dir,
            anchors_enabled: self.no_anchors.then_some(false),
        };
        let config = Config::load(self.config.as_deref(), Some(&cli_settings))?;
        let source_dir = &config.docs_resolved.source_dir;
        let output_dir = &config.docs_resolved.output_dir;

        output.info(&format!("Source directory: {}", source_dir.display()));
        output.info(&format!("Output directory: {}", output_dir.display()));

        let started = Instant::now();
        let md = markdown_from_config(&config);
        let pages = build_site(&md, source_dir, output_dir)?;

        let mut warning_count = 0;
        for page in &pages {
            warning_count += page.warnings.len();
            output.document_warnings(&page.source.display().to_string(), &page.warnings);
        }

        output.success(&format!(
            "Rendered {} page(s) in {:.2?}",
            pages.len(),
            started.elapsed()
        ));
        if warning_count > 0 {
            output.warning(&format!("{warning_count} warning(s)"));
        }

        Ok(())
    }
}

/// One rendered page.
#[derive(Debug)]
pub(crate) struct PageReport {
    /// Markdown path relative to the source directory.
    pub source: PathBuf,
    pub warnings: Vec<String>,
}

/// Render every `**/*.md` file under `source_dir` into `output_dir`.
///
/// The directory layout is mirrored and `.md` becomes `.html`. Pages are
/// rendered in parallel with one shared engine and reported in path order.
pub(crate) fn build_site(
    md: &Markdown,
    source_dir: &Path,
    output_dir: &Path,
) -> Result<Vec<PageReport>, CliError> {
    if !source_dir.is_dir() {
        return Err(CliError::Validation(format!(
            "Source directory not found: {}",
            source_dir.display()
        )));
    }

    let files = find_markdown_files(source_dir)?;
    debug!(count = files.len(), "found markdown files");

    files
        .par_iter()
        .map(|path| build_page(md, source_dir, output_dir, path))
        .collect()
}

/// Markdown files under `source_dir`, sorted.
fn find_markdown_files(source_dir: &Path) -> Result<Vec<PathBuf>, CliError> {
    let root = glob::Pattern::escape(&source_dir.to_string_lossy());
    let pattern = format!("{root}/**/*.md");

    let mut files = glob::glob(&pattern)?
        .filter(|entry| entry.as_ref().map_or(true, |path| path.is_file()))
        .collect::<Result<Vec<_>, _>>()?;
    files.sort();
    Ok(files)
}

fn build_page(
    md: &Markdown,
    source_dir: &Path,
    output_dir: &Path,
    path: &Path,
) -> Result<PageReport, CliError> {
    let relative = path.strip_prefix(source_dir).unwrap_or(path).to_path_buf();
    let target = output_dir.join(&relative).with_extension("html");

    let source = std::fs::read_to_string(path).map_err(CliError::file(path))?;
    let result = md.render(&source);

    if let Some(parent) = target.parent() {
        std::fs::create_dir_all(parent).map_err(CliError::file(parent))?;
    }
    std::fs::write(&target, &result.html).map_err(CliError::file(&target))?;
    info!(page = %relative.display(), warnings = result.warnings.len(), "rendered page");

    Ok(PageReport {
        source: relative,
        warnings: result.warnings,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use demodoc_renderer::MarkdownConfig;
    use pretty_assertions::assert_eq;

    fn write(path: &Path, content: &str) {
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(path, content).unwrap();
    }

    #[test]
    fn test_build_site_mirrors_tree() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("docs");
        let output = dir.path().join("dist");
        write(&source.join("index.md"), "# Components\n");
        write(
            &source.join("button/basic.md"),
            "## Button\n\n::: demo Primary\n```html\n<button>OK</button>\n```\n:::\n",
        );
        write(&source.join("notes.txt"), "not markdown");

        let md = Markdown::new(MarkdownConfig::demo_docs());
        let pages = build_site(&md, &source, &output).unwrap();

        let sources: Vec<PathBuf> = pages.iter().map(|p| p.source.clone()).collect();
        assert_eq!(
            sources,
            vec![PathBuf::from("button/basic.md"), PathBuf::from("index.md")]
        );

        let index = std::fs::read_to_string(output.join("index.html")).unwrap();
        assert_eq!(index, "<h1>Components</h1>\n");

        let button = std::fs::read_to_string(output.join("button/basic.html")).unwrap();
        assert!(button.contains("<h2 id=\"button\">"));
        assert!(button.contains("<demo-block class=\"demo-box\""));
        assert!(!output.join("notes.html").exists());
    }

    #[test]
    fn test_build_site_collects_warnings() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("docs");
        write(&source.join("broken.md"), "::: demo\n<b>x</b>\n");

        let md = Markdown::new(MarkdownConfig::demo_docs());
        let pages = build_site(&md, &source, &dir.path().join("dist")).unwrap();

        assert_eq!(pages.len(), 1);
        assert_eq!(pages[0].warnings.len(), 1);
        assert!(pages[0].warnings[0].contains("unclosed"));
    }

    #[test]
    fn test_build_site_missing_source() {
        let dir = tempfile::tempdir().unwrap();
        let md = Markdown::new(MarkdownConfig::default());
        let err = build_site(&md, &dir.path().join("missing"), dir.path()).unwrap_err();
        assert!(matches!(err, CliError::Validation(_)));
        assert!(err.to_string().contains("Source directory not found"));
    }

    #[test]
    fn test_build_site_empty_source() {
        let dir = tempfile::tempdir().unwrap();
        let md = Markdown::new(MarkdownConfig::default());
        let pages = build_site(&md, dir.path(), &dir.path().join("dist")).unwrap();
        assert!(pages.is_empty());
    }

    #[test]
    fn test_source_dir_with_glob_characters() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("docs[v2]");
        write(&source.join("a.md"), "text\n");

        let files = find_markdown_files(&source).unwrap();
        assert_eq!(files, vec![source.join("a.md")]);
    }
}
