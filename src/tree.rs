//! The syntax tree arena.
//!
//! A parsed file becomes an owned arena of [`SyntaxNode`]s indexed by
//! [`NodeId`]. Children are stored in source order; the parent relation is
//! a side table built once at construction, so the tree itself stays
//! acyclic and exclusively owned by the analysis run.

use crate::error::AnalysisError;
use crate::source::SourceRange;

/// Index of a node within one [`SyntaxTree`]. Ids are only meaningful for
/// the tree that produced them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(pub(crate) u32);

impl NodeId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// One immutable node of the parsed tree.
#[derive(Debug)]
pub struct SyntaxNode {
    /// Grammar node-type tag (e.g. `"call_expression"`). Tags come from the
    /// tree-sitter grammar and are `'static`.
    pub kind: &'static str,
    /// Absolute byte range in the source buffer.
    pub range: SourceRange,
    /// Whether this is a named grammar node (punctuation tokens are not).
    pub named: bool,
    /// Children in source order.
    pub children: Vec<NodeId>,
}

/// An arena-backed syntax tree for one analysis run.
#[derive(Debug)]
pub struct SyntaxTree {
    nodes: Vec<SyntaxNode>,
    parents: Vec<Option<NodeId>>,
}

impl SyntaxTree {
    /// Root node id. Every non-empty tree has one; the builder guarantees
    /// index 0 is the root.
    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Look up a node, failing with `UnknownNode` for an id that does not
    /// belong to this tree.
    pub fn node(&self, id: NodeId) -> Result<&SyntaxNode, AnalysisError> {
        self.nodes
            .get(id.index())
            .ok_or(AnalysisError::UnknownNode(id))
    }

    /// Infallible lookup for ids produced by this tree's own traversal.
    pub(crate) fn get(&self, id: NodeId) -> &SyntaxNode {
        &self.nodes[id.index()]
    }

    /// Parent of `id`, or `None` for the root.
    pub fn parent(&self, id: NodeId) -> Result<Option<NodeId>, AnalysisError> {
        self.parents
            .get(id.index())
            .copied()
            .ok_or(AnalysisError::UnknownNode(id))
    }

    /// Pre-order iterator over the whole tree, children left to right as
    /// they appear in source.
    pub fn preorder(&self) -> Preorder<'_> {
        let mut stack = Vec::new();
        if !self.nodes.is_empty() {
            stack.push(self.root());
        }
        Preorder { tree: self, stack }
    }

    /// Named children of a node, filtered from its child list.
    pub fn named_children<'a>(&'a self, id: NodeId) -> impl Iterator<Item = NodeId> + 'a {
        self.get(id)
            .children
            .iter()
            .copied()
            .filter(move |c| self.get(*c).named)
    }

    /// First child with the given kind tag.
    pub fn child_of_kind(&self, id: NodeId, kind: &str) -> Option<NodeId> {
        self.get(id)
            .children
            .iter()
            .copied()
            .find(|c| self.get(*c).kind == kind)
    }
}

/// Incremental builder used by the parser while flattening the
/// tree-sitter tree into the arena.
pub struct TreeBuilder {
    nodes: Vec<SyntaxNode>,
    parents: Vec<Option<NodeId>>,
}

impl TreeBuilder {
    pub fn new() -> Self {
        Self {
            nodes: Vec::new(),
            parents: Vec::new(),
        }
    }

    /// Append a node and record its parent link. The first node pushed is
    /// the root and must have no parent.
    pub fn push(
        &mut self,
        kind: &'static str,
        range: SourceRange,
        named: bool,
        parent: Option<NodeId>,
    ) -> NodeId {
        debug_assert!(self.nodes.is_empty() == parent.is_none());
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(SyntaxNode {
            kind,
            range,
            named,
            children: Vec::new(),
        });
        self.parents.push(parent);
        if let Some(p) = parent {
            self.nodes[p.index()].children.push(id);
        }
        id
    }

    pub fn finish(self) -> SyntaxTree {
        SyntaxTree {
            nodes: self.nodes,
            parents: self.parents,
        }
    }
}

impl Default for TreeBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Iterator produced by [`SyntaxTree::preorder`].
pub struct Preorder<'a> {
    tree: &'a SyntaxTree,
    stack: Vec<NodeId>,
}

impl<'a> Iterator for Preorder<'a> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let id = self.stack.pop()?;
        let node = self.tree.get(id);
        // push reversed so the leftmost child pops first
        self.stack.extend(node.children.iter().rev().copied());
        Some(id)
    }
}
