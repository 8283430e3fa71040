//! Syntax tree data structures shared across the driftlint crates.
//!
//! Parsers produce a [`SyntaxTree`] and the rule engine consumes it; this
//! crate knows nothing about either side. Nodes live in a slot arena and
//! are addressed by [`NodeId`], so trees are plain owned values with no
//! lifetime parameters.

mod node_kind;
mod span;
mod tree;

pub use node_kind::NodeKind;
pub use span::{Position, Span};
pub use tree::{NodeId, SyntaxTree, TreeBuilder};
