//! Diagnostics, severities and the edits attached to them.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use tracing::debug;

use driftlint_ast::Span;

/// How seriously a finding is treated.
///
/// The ordering is part of the contract: `Off < Info < Warn < Error`, so
/// severities can be compared and the highest one wins in summaries.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Rule disabled; its listeners are never invoked.
    Off,
    /// Informational note, never blocks.
    Info,
    /// Worth attention, does not fail a run.
    #[default]
    #[serde(alias = "warning")]
    Warn,
    /// Blocking problem.
    Error,
}

impl Severity {
    /// Parses a severity token, falling back to `Off` for unknown input.
    ///
    /// Fail-closed: a misspelled severity must not silently enable a rule.
    pub fn parse_lenient(token: &str) -> Self {
        match token {
            "off" => Self::Off,
            "info" => Self::Info,
            "warn" | "warning" => Self::Warn,
            "error" => Self::Error,
            other => {
                tracing::warn!(severity = other, "unknown severity, treating as off");
                Self::Off
            }
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Off => "off",
            Self::Info => "info",
            Self::Warn => "warn",
            Self::Error => "error",
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single text edit: replace the bytes in `span` with `text`.
///
/// Insertions use an empty span, deletions an empty `text`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fix {
    pub span: Span,
    pub text: String,
}

impl Fix {
    pub fn new(span: Span, text: impl Into<String>) -> Self {
        Self {
            span,
            text: text.into(),
        }
    }

    pub fn insert(offset: u32, text: impl Into<String>) -> Self {
        Self::new(Span::empty(offset), text)
    }

    pub fn delete(span: Span) -> Self {
        Self::new(span, "")
    }

    /// Signed length change this edit causes when applied.
    pub fn delta(&self) -> i64 {
        self.text.len() as i64 - self.span.len() as i64
    }
}

/// An alternative edit offered alongside a diagnostic but never applied
/// automatically. The fix is optional so purely descriptive advice (for
/// example from a remote analysis) fits the same shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Suggestion {
    pub message_id: String,
    pub desc: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fix: Option<Fix>,
}

impl Suggestion {
    pub fn new(message_id: impl Into<String>, desc: impl Into<String>, fix: Option<Fix>) -> Self {
        Self {
            message_id: message_id.into(),
            desc: desc.into(),
            fix,
        }
    }
}

/// One finding against one file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub file: PathBuf,
    /// 1-based line of the finding's start.
    pub line: u32,
    /// 1-based byte column of the finding's start.
    pub column: u32,
    pub span: Span,
    pub severity: Severity,
    pub rule_id: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fix: Option<Fix>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub suggestions: Vec<Suggestion>,
}

impl Diagnostic {
    pub fn new(
        file: impl Into<PathBuf>,
        line: u32,
        column: u32,
        span: Span,
        severity: Severity,
        rule_id: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            file: file.into(),
            line,
            column,
            span,
            severity,
            rule_id: rule_id.into(),
            message: message.into(),
            message_id: None,
            fix: None,
            suggestions: Vec::new(),
        }
    }

    pub fn with_message_id(mut self, message_id: impl Into<String>) -> Self {
        self.message_id = Some(message_id.into());
        self
    }

    pub fn with_fix(mut self, fix: Fix) -> Self {
        self.fix = Some(fix);
        self
    }

    pub fn with_suggestions(mut self, suggestions: Vec<Suggestion>) -> Self {
        self.suggestions = suggestions;
        self
    }

    pub fn is_fixable(&self) -> bool {
        self.fix.is_some()
    }
}

/// Collects fixes produced by a fixer callback.
///
/// A diagnostic carries at most one automatic fix; if a rule pushes more
/// than one, the first wins and the rest are dropped.
#[derive(Debug, Default)]
pub struct FixList {
    fixes: Vec<Fix>,
}

impl FixList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, fix: Fix) {
        self.fixes.push(fix);
    }

    /// Resolves the list to the single retained fix.
    pub fn into_fix(self) -> Option<Fix> {
        let mut fixes = self.fixes.into_iter();
        let first = fixes.next();
        let discarded = fixes.count();
        if discarded > 0 {
            debug!(discarded, "multiple fixes pushed, keeping the first");
        }
        first
    }

    pub fn is_empty(&self) -> bool {
        self.fixes.is_empty()
    }
}
