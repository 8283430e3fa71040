//! The syntax tree facade.
//!
//! A [`SyntaxTree`] owns one file's immutable source text together with a
//! slot arena of nodes. A [`NodeId`] is a plain index into the arena, so
//! parent back-references never form ownership cycles and handles stay
//! `Copy`. Nodes are pushed in pre-order by the parser, which means the
//! arena order doubles as the traversal order.

use crate::{NodeKind, Position, Span};

/// Handle to a node inside a [`SyntaxTree`].
///
/// Only meaningful for the tree that produced it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(u32);

impl NodeId {
    #[inline]
    pub(crate) const fn new(index: usize) -> Self {
        Self(index as u32)
    }

    #[inline]
    pub(crate) const fn index(self) -> usize {
        self.0 as usize
    }
}

/// One slot in the node arena.
#[derive(Debug)]
struct NodeData {
    kind: NodeKind,
    span: Span,
    /// Named grammar nodes form the AST proper; anonymous nodes are
    /// punctuation and keyword tokens, kept for token lookup only.
    named: bool,
    /// Grammar field name this node fills in its parent, if any.
    field: Option<Box<str>>,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

/// One parsed file: immutable source text plus its node arena.
pub struct SyntaxTree {
    source: String,
    nodes: Vec<NodeData>,
    /// Byte offsets of line starts, for offset -> (line, column) lookup.
    line_starts: Vec<u32>,
}

/// Incrementally assembles a [`SyntaxTree`] in pre-order.
pub struct TreeBuilder {
    source: String,
    nodes: Vec<NodeData>,
}

impl TreeBuilder {
    /// Pushes a node and links it to its parent. Returns the new handle.
    ///
    /// The first pushed node becomes the root and must have no parent.
    pub fn push(
        &mut self,
        kind: NodeKind,
        span: Span,
        named: bool,
        field: Option<&str>,
        parent: Option<NodeId>,
    ) -> NodeId {
        let id = NodeId::new(self.nodes.len());
        self.nodes.push(NodeData {
            kind,
            span,
            named,
            field: field.map(Into::into),
            parent,
            children: Vec::new(),
        });
        if let Some(parent) = parent {
            self.nodes[parent.index()].children.push(id);
        }
        id
    }

    /// Finishes the build, computing the line index.
    pub fn finish(self) -> SyntaxTree {
        let mut line_starts = vec![0u32];
        for (offset, byte) in self.source.bytes().enumerate() {
            if byte == b'\n' {
                line_starts.push(offset as u32 + 1);
            }
        }
        SyntaxTree {
            source: self.source,
            nodes: self.nodes,
            line_starts,
        }
    }
}

impl SyntaxTree {
    /// Starts building a tree over the given source text.
    pub fn builder(source: impl Into<String>) -> TreeBuilder {
        TreeBuilder {
            source: source.into(),
            nodes: Vec::new(),
        }
    }

    /// The root node. Panics on an empty tree, which the parser never
    /// produces (even an empty file yields a `Program` node).
    #[inline]
    pub fn root(&self) -> NodeId {
        debug_assert!(!self.nodes.is_empty());
        NodeId::new(0)
    }

    /// Full source text of the file.
    #[inline]
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Source lines, without trailing newlines.
    pub fn lines(&self) -> impl Iterator<Item = &str> {
        self.source.lines()
    }

    /// Number of nodes in the arena (named and anonymous).
    #[inline]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Kind tag of a node.
    #[inline]
    pub fn kind(&self, id: NodeId) -> NodeKind {
        self.nodes[id.index()].kind
    }

    /// Byte span of a node.
    #[inline]
    pub fn span(&self, id: NodeId) -> Span {
        self.nodes[id.index()].span
    }

    /// True if this is a named (AST) node rather than a raw token.
    #[inline]
    pub fn is_named(&self, id: NodeId) -> bool {
        self.nodes[id.index()].named
    }

    /// Parent slot, if the node isn't the root.
    #[inline]
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes[id.index()].parent
    }

    /// All children, including anonymous tokens.
    #[inline]
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.nodes[id.index()].children
    }

    /// Named children only: the AST view of a node.
    pub fn named_children(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        self.children(id)
            .iter()
            .copied()
            .filter(|&child| self.is_named(child))
    }

    /// First named child filling the given grammar field.
    pub fn child_by_field(&self, id: NodeId, field: &str) -> Option<NodeId> {
        self.children(id).iter().copied().find(|&child| {
            self.nodes[child.index()]
                .field
                .as_deref()
                .is_some_and(|f| f == field)
        })
    }

    /// First named child of the given kind.
    pub fn child_of_kind(&self, id: NodeId, kind: NodeKind) -> Option<NodeId> {
        self.named_children(id).find(|&child| self.kind(child) == kind)
    }

    /// Raw text slice covered by a node.
    pub fn text(&self, id: NodeId) -> &str {
        let span = self.span(id);
        &self.source[span.start as usize..span.end as usize]
    }

    /// Leftmost leaf under a node; the node itself if it has no children.
    pub fn first_token(&self, id: NodeId) -> NodeId {
        let mut current = id;
        while let Some(&first) = self.children(current).first() {
            current = first;
        }
        current
    }

    /// Rightmost leaf under a node; the node itself if it has no children.
    pub fn last_token(&self, id: NodeId) -> NodeId {
        let mut current = id;
        while let Some(&last) = self.children(current).last() {
            current = last;
        }
        current
    }

    /// Resolves a byte offset to a 1-based (line, column) position.
    ///
    /// Columns count bytes from the line start; offsets past the end of
    /// the source clamp to the final position.
    pub fn position_at(&self, offset: u32) -> Position {
        let offset = offset.min(self.source.len() as u32);
        let line_idx = match self.line_starts.binary_search(&offset) {
            Ok(idx) => idx,
            Err(idx) => idx - 1,
        };
        Position::new(
            line_idx as u32 + 1,
            offset - self.line_starts[line_idx] + 1,
        )
    }

    /// Inverse of [`position_at`](Self::position_at): 1-based (line,
    /// column) to a byte offset. Out-of-range lines clamp to the source end.
    pub fn offset_at(&self, line: u32, column: u32) -> u32 {
        if line == 0 {
            return 0;
        }
        match self.line_starts.get(line as usize - 1) {
            Some(start) => (start + column.saturating_sub(1)).min(self.source.len() as u32),
            None => self.source.len() as u32,
        }
    }

    /// Start position of a node.
    #[inline]
    pub fn position_of(&self, id: NodeId) -> Position {
        self.position_at(self.span(id).start)
    }

    /// Every comment in the file, in source order.
    pub fn all_comments(&self) -> impl Iterator<Item = NodeId> + '_ {
        (0..self.nodes.len())
            .map(NodeId::new)
            .filter(|&id| self.kind(id) == NodeKind::Comment)
    }

    /// Comments immediately preceding a node among its siblings.
    ///
    /// Returns the contiguous run of comment siblings that ends right
    /// before the node, in source order.
    pub fn comments_before(&self, id: NodeId) -> Vec<NodeId> {
        let Some(parent) = self.parent(id) else {
            return Vec::new();
        };
        let siblings = self.children(parent);
        let Some(pos) = siblings.iter().position(|&sibling| sibling == id) else {
            return Vec::new();
        };
        let mut comments: Vec<NodeId> = siblings[..pos]
            .iter()
            .rev()
            .copied()
            .take_while(|&sibling| self.kind(sibling) == NodeKind::Comment)
            .collect();
        comments.reverse();
        comments
    }

    /// Comments immediately following a node among its siblings.
    pub fn comments_after(&self, id: NodeId) -> Vec<NodeId> {
        let Some(parent) = self.parent(id) else {
            return Vec::new();
        };
        let siblings = self.children(parent);
        let Some(pos) = siblings.iter().position(|&sibling| sibling == id) else {
            return Vec::new();
        };
        siblings[pos + 1..]
            .iter()
            .copied()
            .take_while(|&sibling| self.kind(sibling) == NodeKind::Comment)
            .collect()
    }

    /// All comments nested anywhere inside a node.
    pub fn comments_inside(&self, id: NodeId) -> Vec<NodeId> {
        let span = self.span(id);
        self.all_comments()
            .filter(|&comment| {
                let c = self.span(comment);
                c.start >= span.start && c.end <= span.end && comment != id
            })
            .collect()
    }

    /// Pre-order depth-first walk over named nodes, calling `enter` before
    /// a node's children and `exit` after them.
    pub fn walk<E, X>(&self, mut enter: E, mut exit: X)
    where
        E: FnMut(NodeId),
        X: FnMut(NodeId),
    {
        if self.nodes.is_empty() {
            return;
        }
        self.walk_from(self.root(), &mut enter, &mut exit);
    }

    fn walk_from<E, X>(&self, id: NodeId, enter: &mut E, exit: &mut X)
    where
        E: FnMut(NodeId),
        X: FnMut(NodeId),
    {
        enter(id);
        // Collect to end the borrow of the children slice before recursing.
        let named: Vec<NodeId> = self.named_children(id).collect();
        for child in named {
            self.walk_from(child, enter, exit);
        }
        exit(id);
    }
}

impl std::fmt::Debug for SyntaxTree {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SyntaxTree")
            .field("nodes", &self.nodes.len())
            .field("bytes", &self.source.len())
            .finish()
    }
}
