use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::diagnostic::{Diagnostic, Severity};

/// Outcome of linting one file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LintResult {
    pub file: PathBuf,
    pub diagnostics: Vec<Diagnostic>,
    pub error_count: usize,
    pub warning_count: usize,
    pub info_count: usize,
    pub fixable_error_count: usize,
    pub fixable_warning_count: usize,
}

impl LintResult {
    /// Builds a result from collected diagnostics, tallying the counts.
    pub fn from_diagnostics(file: impl Into<PathBuf>, diagnostics: Vec<Diagnostic>) -> Self {
        let mut result = Self {
            file: file.into(),
            ..Self::default()
        };
        for diagnostic in &diagnostics {
            match diagnostic.severity {
                Severity::Error => {
                    result.error_count += 1;
                    if diagnostic.is_fixable() {
                        result.fixable_error_count += 1;
                    }
                }
                Severity::Warn => {
                    result.warning_count += 1;
                    if diagnostic.is_fixable() {
                        result.fixable_warning_count += 1;
                    }
                }
                Severity::Info => result.info_count += 1,
                Severity::Off => {}
            }
        }
        result.diagnostics = diagnostics;
        result
    }

    pub fn has_errors(&self) -> bool {
        self.error_count > 0
    }

    /// Diagnostics carrying an automatic fix, regardless of severity.
    pub fn fixable_count(&self) -> usize {
        self.diagnostics.iter().filter(|d| d.is_fixable()).count()
    }
}

/// Aggregate over a batch of [`LintResult`]s.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LintSummary {
    pub file_count: usize,
    pub error_count: usize,
    pub warning_count: usize,
    pub info_count: usize,
    pub fixable_error_count: usize,
    pub fixable_warning_count: usize,
}

impl LintSummary {
    pub fn from_results(results: &[LintResult]) -> Self {
        let mut summary = Self::default();
        for result in results {
            summary.file_count += 1;
            summary.error_count += result.error_count;
            summary.warning_count += result.warning_count;
            summary.info_count += result.info_count;
            summary.fixable_error_count += result.fixable_error_count;
            summary.fixable_warning_count += result.fixable_warning_count;
        }
        summary
    }

    /// The non-zero-exit contract: errors block, warnings do not.
    pub fn has_blocking_errors(&self) -> bool {
        self.error_count > 0
    }
}
