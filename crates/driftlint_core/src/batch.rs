//! Parallel lint runs across a file set.

use std::path::PathBuf;

use rayon::prelude::*;
use tracing::debug;

use driftlint_parser::Parser;

use crate::error::LinterError;
use crate::linter::Linter;
use crate::result::{LintResult, LintSummary};

/// Lints every file on a rayon worker pool.
///
/// Files are independent, so each worker reads and lints its own set.
/// Results come back in input order. An unreadable file fails the whole
/// batch; partially linted output for a set the caller named explicitly
/// would be misleading.
pub fn lint_files(
    linter: &Linter,
    parser: &dyn Parser,
    files: &[PathBuf],
) -> Result<Vec<LintResult>, LinterError> {
    debug!(files = files.len(), "starting batch lint");
    files
        .par_iter()
        .map(|path| {
            let source =
                std::fs::read_to_string(path).map_err(|err| LinterError::file(path, err))?;
            Ok(linter.lint_source(parser, path, &source))
        })
        .collect()
}

/// [`lint_files`] plus an aggregate summary.
pub fn lint_files_with_summary(
    linter: &Linter,
    parser: &dyn Parser,
    files: &[PathBuf],
) -> Result<(Vec<LintResult>, LintSummary), LinterError> {
    let results = lint_files(linter, parser, files)?;
    let summary = LintSummary::from_results(&results);
    Ok((results, summary))
}
