//! Resolved syntax tree of one source unit.
//!
//! Nodes live in a flat arena and point at their parent by index, so an
//! ancestor walk is plain index chasing. Only the six node kinds the
//! deprecation pass cares about are materialised; everything else in the
//! source is folded into the nearest materialised ancestor.

use crate::model::{MethodBinding, Modifiers, TypeBinding};

/// Index of a node inside its [`SyntaxTree`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(u32);

impl NodeId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// A type written in source, together with its resolved binding
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TypeRef {
    pub binding: Option<TypeBinding>,
}

impl TypeRef {
    pub fn new(binding: Option<TypeBinding>) -> Self {
        Self { binding }
    }

    pub fn unresolved() -> Self {
        Self { binding: None }
    }
}

/// Node kinds, each carrying the bindings resolved for it
#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    /// `receiver.name(args)`
    MethodCall { method: Option<MethodBinding> },

    /// `new T(args)`, with or without an anonymous body
    ObjectConstruction {
        ty: Option<TypeBinding>,
        constructor: Option<MethodBinding>,
    },

    /// Class, interface, enum, record or annotation type declaration
    TypeDeclaration {
        binding: Option<TypeBinding>,
        superclass: Option<TypeRef>,
        interfaces: Vec<TypeRef>,
    },

    FieldDeclaration { modifiers: Modifiers, ty: TypeRef },

    /// Method or constructor declaration. Constructors have no return type.
    MethodDeclaration {
        modifiers: Modifiers,
        binding: Option<MethodBinding>,
        return_type: Option<TypeRef>,
    },

    /// Formal, variable-arity, catch, enhanced-for and record-component
    /// parameters
    ParameterDeclaration { modifiers: Modifiers, ty: TypeRef },
}

impl NodeKind {
    pub fn name(&self) -> &'static str {
        match self {
            NodeKind::MethodCall { .. } => "method-call",
            NodeKind::ObjectConstruction { .. } => "object-construction",
            NodeKind::TypeDeclaration { .. } => "type-declaration",
            NodeKind::FieldDeclaration { .. } => "field-declaration",
            NodeKind::MethodDeclaration { .. } => "method-declaration",
            NodeKind::ParameterDeclaration { .. } => "parameter-declaration",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SyntaxNode {
    pub kind: NodeKind,
    /// Byte offset of the node start in the unit source
    pub start: usize,
    pub parent: Option<NodeId>,
    children: Vec<NodeId>,
}

impl SyntaxNode {
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }
}

/// Maps byte offsets to 1-based line numbers
#[derive(Debug, Clone, Default)]
pub struct LineIndex {
    line_starts: Vec<usize>,
}

impl LineIndex {
    pub fn new(source: &str) -> Self {
        let mut line_starts = vec![0];
        line_starts.extend(
            source
                .bytes()
                .enumerate()
                .filter(|(_, b)| *b == b'\n')
                .map(|(i, _)| i + 1),
        );
        Self { line_starts }
    }

    pub fn line_of(&self, offset: usize) -> usize {
        self.line_starts.partition_point(|&start| start <= offset).max(1)
    }
}

/// Arena-backed tree for one source unit
#[derive(Debug, Clone, Default)]
pub struct SyntaxTree {
    nodes: Vec<SyntaxNode>,
    roots: Vec<NodeId>,
    lines: LineIndex,
}

impl SyntaxTree {
    pub fn new(lines: LineIndex) -> Self {
        Self {
            nodes: Vec::new(),
            roots: Vec::new(),
            lines,
        }
    }

    /// Build a tree for `source`
    pub fn for_source(source: &str) -> Self {
        Self::new(LineIndex::new(source))
    }

    /// Append a node under `parent` (or as a root) and return its id
    pub fn push(&mut self, kind: NodeKind, start: usize, parent: Option<NodeId>) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(SyntaxNode {
            kind,
            start,
            parent,
            children: Vec::new(),
        });
        match parent {
            Some(parent) => self.nodes[parent.index()].children.push(id),
            None => self.roots.push(id),
        }
        id
    }

    pub fn node(&self, id: NodeId) -> &SyntaxNode {
        &self.nodes[id.index()]
    }

    pub fn roots(&self) -> &[NodeId] {
        &self.roots
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn line_of(&self, offset: usize) -> usize {
        self.lines.line_of(offset)
    }

    /// The node itself followed by each ancestor up to its root
    pub fn ancestors(&self, id: NodeId) -> Ancestors<'_> {
        Ancestors {
            tree: self,
            next: Some(id),
        }
    }

    /// Depth-first preorder over every node, each visited exactly once
    pub fn preorder(&self) -> Preorder<'_> {
        Preorder {
            tree: self,
            stack: self.roots.iter().rev().copied().collect(),
        }
    }
}

pub struct Ancestors<'a> {
    tree: &'a SyntaxTree,
    next: Option<NodeId>,
}

impl Iterator for Ancestors<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let current = self.next?;
        self.next = self.tree.node(current).parent;
        Some(current)
    }
}

pub struct Preorder<'a> {
    tree: &'a SyntaxTree,
    stack: Vec<NodeId>,
}

impl Iterator for Preorder<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let id = self.stack.pop()?;
        self.stack
            .extend(self.tree.node(id).children.iter().rev().copied());
        Some(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn field() -> NodeKind {
        NodeKind::FieldDeclaration {
            modifiers: Modifiers::empty(),
            ty: TypeRef::unresolved(),
        }
    }

    fn call() -> NodeKind {
        NodeKind::MethodCall { method: None }
    }

    #[test]
    fn test_line_index() {
        let lines = LineIndex::new("a\nbb\n\nccc");
        assert_eq!(lines.line_of(0), 1);
        assert_eq!(lines.line_of(1), 1);
        assert_eq!(lines.line_of(2), 2);
        assert_eq!(lines.line_of(5), 3);
        assert_eq!(lines.line_of(6), 4);
        assert_eq!(lines.line_of(100), 4);
    }

    #[test]
    fn test_ancestors_start_at_self() {
        let mut tree = SyntaxTree::for_source("");
        let root = tree.push(field(), 0, None);
        let child = tree.push(call(), 1, Some(root));
        let grandchild = tree.push(call(), 2, Some(child));

        let chain: Vec<_> = tree.ancestors(grandchild).collect();
        assert_eq!(chain, vec![grandchild, child, root]);
    }

    #[test]
    fn test_preorder_visits_each_node_once() {
        let mut tree = SyntaxTree::for_source("");
        let a = tree.push(field(), 0, None);
        let b = tree.push(call(), 1, Some(a));
        let c = tree.push(call(), 2, Some(b));
        let d = tree.push(call(), 3, Some(a));
        let e = tree.push(field(), 4, None);

        let order: Vec<_> = tree.preorder().collect();
        assert_eq!(order, vec![a, b, c, d, e]);
        assert_eq!(tree.len(), 5);
    }
}
