//! The structural tree a template parses into.
//!
//! Nodes live in an arena and refer to each other by index: children are
//! owned in order, the parent link is a non-owning index used only for
//! ascent during parsing, resolution and pruning.

use crate::grammar::ClauseProperties;

pub mod builder;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NodeId(usize);

#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    /// Ordered sequence of clauses; also nests inside groups and functions
    /// for sub-selects.
    Statement,
    Clause {
        /// The keyword run as written, single-spaced (`ORDER BY`).
        keyword: String,
        properties: ClauseProperties,
    },
    /// One separator-delimited unit inside a clause or expression group.
    Expression {
        /// The separator token that preceded this expression, empty for the
        /// first.
        separator: String,
    },
    /// Parenthesized multi-expression list, e.g. a `VALUES (...)` row.
    ExpressionGroup,
    /// Parenthesized sub-tree that is not an expression list.
    Group,
    Function {
        name: String,
    },
    /// A quoted literal span.
    Value,
    /// Literal text: keyword fragment, operator, identifier.
    Part {
        text: String,
    },
    /// An unresolved interpolation slot.
    Placeholder {
        name: String,
    },
    /// A resolved, parameter-bound slot; `index` is the zero-based position
    /// in the bound-value list.
    Bind {
        index: usize,
    },
}

impl NodeKind {
    pub fn is_holder(&self) -> bool {
        matches!(self, NodeKind::Clause { .. } | NodeKind::ExpressionGroup)
    }
}

#[derive(Debug)]
pub struct Node {
    pub kind: NodeKind,
    pub parent: Option<NodeId>,
    pub children: Vec<NodeId>,
    pub removed: bool,
}

#[derive(Debug, Default)]
pub struct Tree {
    nodes: Vec<Node>,
    /// Top-level statements in template order.
    pub statements: Vec<NodeId>,
}

impl Tree {
    pub fn new() -> Self {
        Tree::default()
    }

    /// Allocates a node and links it under `parent` (when given) as the last
    /// child.
    pub fn alloc(&mut self, kind: NodeKind, parent: Option<NodeId>) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node {
            kind,
            parent,
            children: Vec::new(),
            removed: false,
        });
        if let Some(parent) = parent {
            self.nodes[parent.0].children.push(id);
        }
        id
    }

    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }

    pub fn node_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.nodes[id.0]
    }

    pub fn kind(&self, id: NodeId) -> &NodeKind {
        &self.nodes[id.0].kind
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes[id.0].parent
    }

    /// Walks parent links upward from `start` (inclusive) to the first node
    /// matching `pred`.
    pub fn nearest(&self, start: NodeId, pred: impl Fn(&NodeKind) -> bool) -> Option<NodeId> {
        let mut current = Some(start);
        while let Some(id) = current {
            if pred(self.kind(id)) {
                return Some(id);
            }
            current = self.parent(id);
        }
        None
    }

    /// True when the node or any of its ancestors is marked removed.
    pub fn is_removed(&self, id: NodeId) -> bool {
        let mut current = Some(id);
        while let Some(node) = current {
            if self.node(node).removed {
                return true;
            }
            current = self.parent(node);
        }
        false
    }

    /// All placeholder nodes in document order.
    pub fn placeholders(&self) -> Vec<NodeId> {
        let mut found = Vec::new();
        let mut stack: Vec<NodeId> = self.statements.iter().rev().copied().collect();
        while let Some(id) = stack.pop() {
            if matches!(self.kind(id), NodeKind::Placeholder { .. }) {
                found.push(id);
            }
            for child in self.node(id).children.iter().rev() {
                stack.push(*child);
            }
        }
        found
    }

    /// The expression new content attaches to: the last expression of a
    /// clause or expression group.
    pub fn current_expression(&self, holder: NodeId) -> NodeId {
        debug_assert!(self.kind(holder).is_holder());
        *self
            .node(holder)
            .children
            .last()
            .expect("holder always has at least one expression")
    }
}
