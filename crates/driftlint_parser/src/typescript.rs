use std::path::Path;

use tracing::trace;
use tree_sitter::Language;

use driftlint_ast::{NodeId, NodeKind, Span, SyntaxTree};

use crate::error::ParseError;
use crate::traits::Parser;

/// TypeScript and TSX front end backed by tree-sitter.
///
/// A fresh tree-sitter parser is built per call, so the value itself is
/// stateless and can be shared across threads freely.
#[derive(Debug, Default, Clone, Copy)]
pub struct TypeScriptParser;

impl TypeScriptParser {
    pub fn new() -> Self {
        Self
    }

    fn language_for(&self, path: &Path) -> Language {
        let ext = path.extension().and_then(|ext| ext.to_str());
        match ext {
            Some("tsx") | Some("jsx") => tree_sitter_typescript::LANGUAGE_TSX.into(),
            _ => tree_sitter_typescript::LANGUAGE_TYPESCRIPT.into(),
        }
    }
}

impl Parser for TypeScriptParser {
    fn name(&self) -> &str {
        "typescript"
    }

    fn extensions(&self) -> &[&str] {
        &["ts", "tsx", "js", "jsx", "mts", "cts", "mjs", "cjs"]
    }

    fn parse(&self, path: &Path, source: &str) -> Result<SyntaxTree, ParseError> {
        if !self.can_parse(path) {
            return Err(ParseError::unsupported_file(path));
        }

        let language = self.language_for(path);
        let mut parser = tree_sitter::Parser::new();
        parser
            .set_language(&language)
            .map_err(|err| ParseError::grammar(self.name(), err.to_string()))?;

        let tree = parser
            .parse(source, None)
            .ok_or_else(|| ParseError::failed(path))?;

        trace!(
            path = %path.display(),
            root = tree.root_node().kind(),
            "parsed file"
        );

        Ok(convert(source, &tree))
    }
}

/// Copies a tree-sitter parse tree into an owned [`SyntaxTree`], pushing
/// nodes in pre-order so arena order matches traversal order.
fn convert(source: &str, tree: &tree_sitter::Tree) -> SyntaxTree {
    let mut builder = SyntaxTree::builder(source);
    let mut cursor = tree.walk();
    let mut ancestors: Vec<NodeId> = Vec::new();

    loop {
        let node = cursor.node();
        let id = builder.push(
            NodeKind::from_grammar(node.kind()),
            Span::new(node.start_byte() as u32, node.end_byte() as u32),
            node.is_named(),
            cursor.field_name(),
            ancestors.last().copied(),
        );

        if cursor.goto_first_child() {
            ancestors.push(id);
            continue;
        }

        loop {
            if cursor.goto_next_sibling() {
                break;
            }
            if !cursor.goto_parent() {
                return builder.finish();
            }
            ancestors.pop();
        }
    }
}
