//! CLI error types.

use std::path::PathBuf;

use demodoc_config::ConfigError;

/// CLI error type.
#[derive(Debug, thiserror::Error)]
pub(crate) enum CliError {
    #[error("{0}")]
    Config(#[from] ConfigError),

    #[error("{0}")]
    Io(#[from] std::io::Error),

    #[error("{}: {source}", path.display())]
    File {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Invalid source pattern: {0}")]
    Pattern(#[from] glob::PatternError),

    #[error("{0}")]
    Walk(#[from] glob::GlobError),

    #[error("{0}")]
    Validation(String),
}

impl CliError {
    /// Attach the offending path to an I/O error.
    pub(crate) fn file(path: impl Into<PathBuf>) -> impl FnOnce(std::io::Error) -> Self {
        let path = path.into();
        move |source| Self::File { path, source }
    }
}
