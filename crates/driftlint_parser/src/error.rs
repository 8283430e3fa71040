use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while turning source text into a syntax tree.
#[derive(Debug, Error)]
pub enum ParseError {
    /// No registered parser handles this file's extension.
    #[error("unsupported file type: {path}")]
    UnsupportedFile { path: PathBuf },

    /// The grammar could not be loaded into the parser.
    #[error("failed to load grammar for {language}: {message}")]
    Grammar { language: String, message: String },

    /// The parser gave up entirely and produced no tree at all.
    ///
    /// Partial parses with error nodes are not reported here; they come
    /// back as trees containing `NodeKind::Error` nodes.
    #[error("failed to parse {path}")]
    Failed { path: PathBuf },
}

impl ParseError {
    pub fn unsupported_file(path: impl Into<PathBuf>) -> Self {
        Self::UnsupportedFile { path: path.into() }
    }

    pub fn grammar(language: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Grammar {
            language: language.into(),
            message: message.into(),
        }
    }

    pub fn failed(path: impl Into<PathBuf>) -> Self {
        Self::Failed { path: path.into() }
    }
}
