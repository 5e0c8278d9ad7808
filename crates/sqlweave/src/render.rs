//! Serializes the surviving forest back into SQL text.
//!
//! Formatting contract: token case is preserved exactly as written in the
//! template and whitespace is normalized to single spaces; comma-separated
//! expressions join with `", "`, connector-separated ones with the spaced
//! connector as written; function names sit flush against their parenthesis.

use crate::context::ParamStyle;
use crate::tree::{NodeId, NodeKind, Tree};

pub fn render(tree: &Tree, style: ParamStyle) -> String {
    let renderer = Renderer { tree, style };
    let statements: Vec<String> = tree
        .statements
        .iter()
        .filter(|s| !tree.node(**s).removed)
        .map(|s| renderer.statement(*s))
        .filter(|text| !text.is_empty())
        .collect();
    statements.join("; ")
}

struct Renderer<'a> {
    tree: &'a Tree,
    style: ParamStyle,
}

impl Renderer<'_> {
    fn surviving(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        self.tree
            .node(id)
            .children
            .iter()
            .copied()
            .filter(|child| !self.tree.node(*child).removed)
    }

    fn statement(&self, id: NodeId) -> String {
        let clauses: Vec<String> = self
            .surviving(id)
            .map(|clause| self.clause(clause))
            .filter(|text| !text.is_empty())
            .collect();
        clauses.join(" ")
    }

    fn clause(&self, id: NodeId) -> String {
        let NodeKind::Clause { keyword, .. } = self.tree.kind(id) else {
            return String::new();
        };
        let body = self.expressions(id);
        if body.is_empty() {
            keyword.clone()
        } else {
            format!("{} {}", keyword, body)
        }
    }

    /// Joins the surviving expressions of a clause or expression group per
    /// their recorded separators.
    fn expressions(&self, holder: NodeId) -> String {
        let mut out = String::new();
        for expression in self.surviving(holder) {
            let NodeKind::Expression { separator } = self.tree.kind(expression) else {
                continue;
            };
            let text = self.parts(expression);
            if text.is_empty() {
                continue;
            }
            if out.is_empty() {
                out = text;
            } else if separator == "," {
                out.push_str(", ");
                out.push_str(&text);
            } else if separator.is_empty() {
                out.push(' ');
                out.push_str(&text);
            } else {
                out.push(' ');
                out.push_str(separator);
                out.push(' ');
                out.push_str(&text);
            }
        }
        out
    }

    /// Joins a node's surviving parts with single spaces; literal commas
    /// attach to the preceding part.
    fn parts(&self, id: NodeId) -> String {
        let mut out = String::new();
        for child in self.surviving(id) {
            let piece = self.part(child);
            if piece.is_empty() {
                continue;
            }
            if !out.is_empty() && piece != "," && piece != ";" {
                out.push(' ');
            }
            out.push_str(&piece);
        }
        out
    }

    fn part(&self, id: NodeId) -> String {
        match self.tree.kind(id) {
            NodeKind::Part { text } => text.clone(),
            NodeKind::Bind { index } => self.style.placeholder(*index),
            NodeKind::Group => format!("({})", self.parts(id)),
            NodeKind::ExpressionGroup => format!("({})", self.expressions(id)),
            NodeKind::Function { name } => format!("{}({})", name, self.parts(id)),
            NodeKind::Value => format!("'{}'", self.parts(id)),
            NodeKind::Statement => self.statement(id),
            NodeKind::Expression { .. } => self.parts(id),
            NodeKind::Clause { .. } => self.clause(id),
            // Placeholders never survive resolution.
            NodeKind::Placeholder { .. } => String::new(),
        }
    }
}
