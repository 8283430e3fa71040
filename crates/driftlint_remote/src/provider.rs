use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use driftlint_ast::Span;
use driftlint_core::{Diagnostic, Severity, Suggestion};

use crate::error::RemoteError;

/// Message id stamped on suggestions carried back from a provider.
pub const REMOTE_SUGGESTION_ID: &str = "remoteSuggestion";

/// The excerpt of a file sent to a provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceSample {
    pub path: PathBuf,
    pub source: String,
}

impl SourceSample {
    pub fn new(path: impl Into<PathBuf>, source: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            source: source.into(),
        }
    }

    /// Content hash used as the cache key.
    pub fn content_hash(&self) -> String {
        blake3::hash(self.source.as_bytes()).to_hex().to_string()
    }
}

/// One finding as a provider reports it, positions 1-based.
///
/// Severity arrives as a raw token since providers are not bound to our
/// vocabulary; it is mapped during [`into_diagnostic`]
/// (RemoteFinding::into_diagnostic).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RemoteFinding {
    pub line: u32,
    pub column: u32,
    pub severity: String,
    pub rule_id: String,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,
}

impl RemoteFinding {
    /// Converts to an engine diagnostic against the sampled source.
    ///
    /// Unknown severity tokens map to `warn` rather than `off`: a remote
    /// finding was judged worth returning, so it should stay visible.
    pub fn into_diagnostic(self, sample: &SourceSample) -> Diagnostic {
        let severity = match self.severity.as_str() {
            "off" => Severity::Off,
            "info" => Severity::Info,
            "warn" | "warning" => Severity::Warn,
            "error" => Severity::Error,
            _ => Severity::Warn,
        };
        let offset = offset_of(&sample.source, self.line, self.column);

        let mut diagnostic = Diagnostic::new(
            &sample.path,
            self.line,
            self.column,
            Span::empty(offset),
            severity,
            self.rule_id,
            self.message,
        );
        if let Some(desc) = self.suggestion {
            diagnostic.suggestions = vec![Suggestion::new(REMOTE_SUGGESTION_ID, desc, None)];
        }
        diagnostic
    }
}

fn offset_of(source: &str, line: u32, column: u32) -> u32 {
    let mut current = 1u32;
    let mut offset = 0usize;
    for text_line in source.split_inclusive('\n') {
        if current == line.max(1) {
            let column = (column.max(1) - 1) as usize;
            return (offset + column.min(text_line.len())) as u32;
        }
        offset += text_line.len();
        current += 1;
    }
    source.len() as u32
}

/// A remote code analysis backend.
pub trait RemoteProvider: Send + Sync {
    fn name(&self) -> &str;

    fn analyze(&self, sample: &SourceSample) -> Result<Vec<RemoteFinding>, RemoteError>;
}
