use std::path::PathBuf;
use thiserror::Error;

use driftlint_parser::ParseError;

/// Errors surfaced by the lint engine.
///
/// Rule panics and per-file parse failures are deliberately absent: both
/// are contained per run and reported as synthetic diagnostics instead of
/// aborting the lint.
#[derive(Debug, Error)]
pub enum LinterError {
    /// Invalid or contradictory configuration.
    #[error("configuration error: {message}")]
    Config { message: String },

    /// A file could not be read from disk.
    #[error("failed to read {path}: {source}")]
    File {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A parser failed to produce a tree during fix verification.
    #[error(transparent)]
    Parse(#[from] ParseError),

    /// Writing fixed output back to disk failed.
    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl LinterError {
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    pub fn file(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::File {
            path: path.into(),
            source,
        }
    }

    pub fn write(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Write {
            path: path.into(),
            source,
        }
    }
}
