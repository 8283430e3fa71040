use std::path::Path;

use driftlint_ast::SyntaxTree;

use crate::error::ParseError;

/// A source-language front end.
///
/// Implementations must be [`Send`] + [`Sync`] so the batch runner can
/// share one parser across worker threads; stateful parser objects should
/// be created per call rather than held in `self`.
pub trait Parser: Send + Sync {
    /// Human-readable parser name, used in logs.
    fn name(&self) -> &str;

    /// File extensions this parser accepts, without the leading dot.
    fn extensions(&self) -> &[&str];

    /// Parses one file into a syntax tree.
    ///
    /// A returned tree may contain [`driftlint_ast::NodeKind::Error`]
    /// nodes for unparseable regions; `Err` means no tree could be
    /// produced at all.
    fn parse(&self, path: &Path, source: &str) -> Result<SyntaxTree, ParseError>;

    /// Whether this parser handles the given path, judged by extension.
    fn can_parse(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| self.extensions().contains(&ext))
    }
}
