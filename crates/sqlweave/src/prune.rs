//! Bottom-up pruning: folds away everything resolution emptied out.
//!
//! Removal propagates upward until something non-empty survives or a clause
//! that may be empty is reached. Connector and comma folding is structural:
//! separators live on the expressions they precede, so dropping removed
//! expressions and clearing the first survivor's separator covers leading,
//! trailing and doubled-up separators in one rule.

use crate::tree::{NodeId, NodeKind, Tree};
use tracing::trace;

pub fn prune(tree: &mut Tree) {
    let statements: Vec<NodeId> = tree.statements.clone();
    for statement in statements {
        prune_node(tree, statement);
    }
}

/// Post-order walk; returns whether the node survives.
fn prune_node(tree: &mut Tree, id: NodeId) -> bool {
    if tree.node(id).removed {
        return false;
    }

    let children: Vec<NodeId> = tree.node(id).children.clone();
    let mut surviving: Vec<NodeId> = Vec::new();
    for child in &children {
        if prune_node(tree, *child) {
            surviving.push(*child);
        }
    }

    // The first surviving expression of a clause or expression group must
    // not render a leading separator.
    if tree.kind(id).is_holder() {
        if let Some(first) = surviving.first() {
            if let NodeKind::Expression { separator } = &mut tree.node_mut(*first).kind {
                separator.clear();
            }
        }
    }

    let survives = match tree.kind(id) {
        NodeKind::Part { .. } | NodeKind::Bind { .. } | NodeKind::Placeholder { .. } => true,
        // A literal span renders even when empty.
        NodeKind::Value => true,
        // Zero-argument calls like NOW() and empty groups written in the
        // template survive; ones emptied by removal do not.
        NodeKind::Group | NodeKind::Function { .. } => {
            children.is_empty() || !surviving.is_empty()
        }
        NodeKind::Expression { .. } | NodeKind::ExpressionGroup | NodeKind::Statement => {
            !surviving.is_empty()
        }
        NodeKind::Clause { properties, .. } => properties.allow_empty || !surviving.is_empty(),
    };

    if !survives {
        trace!(?id, "pruned");
        tree.node_mut(id).removed = true;
    }
    survives
}
