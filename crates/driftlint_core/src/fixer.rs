//! Applies and verifies automatic fixes.
//!
//! Application is a pure text splice; verification is a separate pass
//! that rejects overlapping or out-of-bounds edits and re-parses the
//! candidate output before anything touches disk.

use std::path::Path;

use thiserror::Error;
use tracing::{debug, info};

use driftlint_ast::Span;
use driftlint_parser::{ParseError, Parser};

use crate::diagnostic::{Diagnostic, Fix};
use crate::error::LinterError;

/// Marker that must never survive into fixed output. A fix whose
/// replacement text carries it is treated as malformed.
pub const MALFORMED_FIX_SENTINEL: &str = "__DRIFTLINT_FIX__";

/// Why a batch of fixes was rejected.
#[derive(Debug, Error)]
pub enum FixError {
    #[error("fix spans {first} and {second} overlap")]
    Overlap { first: Span, second: Span },

    #[error("fix span {span} is outside the source (len {len})")]
    OutOfBounds { span: Span, len: usize },

    #[error("fix span {span} does not fall on character boundaries")]
    NotCharBoundary { span: Span },

    #[error("fix text contains the malformed-fix sentinel")]
    Sentinel,

    #[error("fixed output no longer parses: {0}")]
    Reparse(#[from] ParseError),
}

/// Splices fixes into the source, highest offset first.
///
/// Pure text surgery: callers are responsible for having validated the
/// batch. Applying in descending offset order keeps earlier spans valid
/// while later ones are rewritten.
pub fn apply_fixes(source: &str, fixes: &[Fix]) -> String {
    let mut ordered: Vec<&Fix> = fixes.iter().collect();
    ordered.sort_by_key(|fix| std::cmp::Reverse((fix.span.start, fix.span.end)));

    let mut output = source.to_string();
    for fix in ordered {
        let start = fix.span.start as usize;
        let end = fix.span.end as usize;
        output.replace_range(start..end, &fix.text);
    }
    output
}

/// Checks a batch of fixes and returns the fixed text if every check
/// passes.
///
/// The batch is rejected wholesale when any two fixes overlap, any span
/// leaves the source, any replacement carries the sentinel, or the
/// candidate output fails to re-parse.
pub fn validate_fixes(
    source: &str,
    fixes: &[Fix],
    parser: &dyn Parser,
    path: &Path,
) -> Result<String, FixError> {
    let mut ordered: Vec<&Fix> = fixes.iter().collect();
    ordered.sort_by_key(|fix| (fix.span.start, fix.span.end));

    for fix in &ordered {
        let span = fix.span;
        if span.end as usize > source.len() || span.start > span.end {
            return Err(FixError::OutOfBounds {
                span,
                len: source.len(),
            });
        }
        if !source.is_char_boundary(span.start as usize)
            || !source.is_char_boundary(span.end as usize)
        {
            return Err(FixError::NotCharBoundary { span });
        }
        if fix.text.contains(MALFORMED_FIX_SENTINEL) {
            return Err(FixError::Sentinel);
        }
    }

    for pair in ordered.windows(2) {
        if pair[0].span.overlaps(&pair[1].span) {
            return Err(FixError::Overlap {
                first: pair[0].span,
                second: pair[1].span,
            });
        }
    }

    let output = apply_fixes(source, fixes);
    parser.parse(path, &output)?;
    Ok(output)
}

/// Extracts the automatic fixes attached to a set of diagnostics.
pub fn collect_fixes(diagnostics: &[Diagnostic]) -> Vec<Fix> {
    diagnostics
        .iter()
        .filter_map(|diagnostic| diagnostic.fix.clone())
        .collect()
}

/// All-or-nothing fix application for one file's diagnostics.
///
/// Returns `None` when there is nothing to fix or the batch fails
/// validation; the source is never partially rewritten.
pub fn apply_fixes_safely(
    source: &str,
    diagnostics: &[Diagnostic],
    parser: &dyn Parser,
    path: &Path,
) -> Option<String> {
    let fixes = collect_fixes(diagnostics);
    if fixes.is_empty() {
        return None;
    }
    match validate_fixes(source, &fixes, parser, path) {
        Ok(output) => Some(output),
        Err(err) => {
            debug!(path = %path.display(), %err, "fix batch rejected");
            None
        }
    }
}

/// Applies a file's validated fixes and writes the whole file back.
///
/// Returns whether the file changed on disk.
pub fn apply_fixes_to_file(
    path: &Path,
    diagnostics: &[Diagnostic],
    parser: &dyn Parser,
) -> Result<bool, LinterError> {
    let source = std::fs::read_to_string(path).map_err(|err| LinterError::file(path, err))?;
    let Some(output) = apply_fixes_safely(&source, diagnostics, parser, path) else {
        return Ok(false);
    };
    if output == source {
        return Ok(false);
    }
    std::fs::write(path, &output).map_err(|err| LinterError::write(path, err))?;
    info!(path = %path.display(), fixes = collect_fixes(diagnostics).len(), "applied fixes");
    Ok(true)
}
