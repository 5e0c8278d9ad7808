//! Resolves every placeholder against the caller's value mapping and
//! rewrites the tree accordingly: binding parameters, emitting validated
//! identifiers, or marking subtrees for removal.

use crate::{
    context::RewriteContext,
    error::{Result, RewriteError},
    grammar::PlaceholderKind,
    tree::{NodeId, NodeKind, Tree},
    value::{Slot, SqlValue},
};
use std::collections::HashMap;
use tracing::trace;

const LOCK_MODES: &[&str] = &["", "nowait", "skip locked"];

/// Rewrites placeholders in document order and returns the bound values.
/// The bound order is final: pruning never reorders surviving markers and
/// removed placeholders contribute nothing.
pub fn resolve(
    tree: &mut Tree,
    values: &HashMap<String, Slot>,
    ctx: &RewriteContext,
) -> Result<Vec<SqlValue>> {
    let mut params: Vec<SqlValue> = Vec::new();

    for id in tree.placeholders() {
        let NodeKind::Placeholder { name } = tree.kind(id) else {
            continue;
        };
        let name = name.clone();
        let slot = values
            .get(&name)
            .ok_or_else(|| RewriteError::UnknownSlot(name.clone()))?
            .clone();

        // An earlier sentinel may have dropped the enclosing expression; the
        // slot still had to exist, but it contributes nothing.
        if tree.is_removed(id) {
            continue;
        }

        // Inside a quoted span the value is substituted textually, never
        // bound or validated.
        if tree.nearest(id, |k| matches!(k, NodeKind::Value)).is_some() {
            resolve_in_literal(tree, id, &slot);
            continue;
        }

        let clause = tree
            .nearest(id, |k| matches!(k, NodeKind::Clause { .. }))
            .ok_or_else(|| RewriteError::Syntax(format!("{{{}}}", name)))?;
        let NodeKind::Clause {
            keyword,
            properties,
        } = tree.kind(clause)
        else {
            continue;
        };
        let keyword = keyword.clone();
        let category = properties.placeholders;
        trace!(slot = %name, clause = %keyword, ?category, "resolving placeholder");

        match category {
            PlaceholderKind::Disallowed => {
                return Err(RewriteError::PlaceholderNotAllowed { clause: keyword });
            }
            PlaceholderKind::Column => resolve_identifier(tree, id, &slot, "column", |text| {
                ctx.is_valid_column(text)
            })?,
            PlaceholderKind::Table => resolve_identifier(tree, id, &slot, "table", |text| {
                ctx.is_valid_table(text)
            })?,
            PlaceholderKind::Lock => resolve_lock(tree, id, &slot)?,
            PlaceholderKind::Variable => match &slot {
                Slot::Value(value) => bind(tree, id, value, &mut params),
                Slot::Absent | Slot::IsNull => remove_enclosing_expression(tree, id)?,
            },
            PlaceholderKind::VariableCondition => match &slot {
                Slot::Value(value) => bind(tree, id, value, &mut params),
                Slot::Absent => remove_enclosing_expression(tree, id)?,
                Slot::IsNull => rewrite_is_null(tree, id)?,
            },
            PlaceholderKind::VariableDefault => match &slot {
                Slot::Value(value) => bind(tree, id, value, &mut params),
                Slot::Absent | Slot::IsNull => {
                    tree.node_mut(id).kind = NodeKind::Part {
                        text: "DEFAULT".to_string(),
                    };
                }
            },
        }
    }

    Ok(params)
}

fn bind(tree: &mut Tree, id: NodeId, value: &SqlValue, params: &mut Vec<SqlValue>) {
    let index = params.len();
    params.push(value.clone());
    tree.node_mut(id).kind = NodeKind::Bind { index };
}

/// COLUMN and TABLE slots emit a validated identifier literally, or vanish.
fn resolve_identifier(
    tree: &mut Tree,
    id: NodeId,
    slot: &Slot,
    kind: &'static str,
    valid: impl Fn(&str) -> bool,
) -> Result<()> {
    match slot {
        Slot::Value(value) => {
            let text = value.as_text().filter(|t| valid(t)).ok_or_else(|| {
                RewriteError::InvalidIdentifier {
                    value: value.to_string(),
                    kind,
                }
            })?;
            tree.node_mut(id).kind = NodeKind::Part {
                text: text.to_string(),
            };
            Ok(())
        }
        Slot::Absent | Slot::IsNull => {
            tree.node_mut(id).removed = true;
            Ok(())
        }
    }
}

fn resolve_lock(tree: &mut Tree, id: NodeId, slot: &Slot) -> Result<()> {
    match slot {
        Slot::Value(value) => {
            let text = value
                .as_text()
                .filter(|t| LOCK_MODES.contains(t))
                .ok_or_else(|| RewriteError::InvalidIdentifier {
                    value: value.to_string(),
                    kind: "lock mode",
                })?;
            if text.is_empty() {
                tree.node_mut(id).removed = true;
            } else {
                tree.node_mut(id).kind = NodeKind::Part {
                    text: text.to_string(),
                };
            }
            Ok(())
        }
        Slot::Absent | Slot::IsNull => {
            tree.node_mut(id).removed = true;
            Ok(())
        }
    }
}

fn resolve_in_literal(tree: &mut Tree, id: NodeId, slot: &Slot) {
    match slot {
        Slot::Value(value) => {
            tree.node_mut(id).kind = NodeKind::Part {
                text: value.to_string(),
            };
        }
        Slot::Absent | Slot::IsNull => {
            tree.node_mut(id).removed = true;
        }
    }
}

/// Drops the whole comparison or assignment the placeholder sits in: the
/// separator-delimited expression. Removal of what that leaves behind (an
/// empty group, a childless clause) is the pruner's job.
fn remove_enclosing_expression(tree: &mut Tree, id: NodeId) -> Result<()> {
    let expression = tree
        .nearest(id, |k| matches!(k, NodeKind::Expression { .. }))
        .ok_or(RewriteError::Unbalanced)?;
    tree.node_mut(expression).removed = true;
    Ok(())
}

/// Rewrites `left <op> {slot}` into `left IS NULL`, whatever the operator.
fn rewrite_is_null(tree: &mut Tree, id: NodeId) -> Result<()> {
    let expression = tree
        .nearest(id, |k| matches!(k, NodeKind::Expression { .. }))
        .ok_or(RewriteError::Unbalanced)?;

    // The expression child whose subtree holds the placeholder; the operator
    // is its immediately preceding sibling.
    let mut child = id;
    while tree.parent(child) != Some(expression) {
        child = tree.parent(child).ok_or(RewriteError::Unbalanced)?;
    }
    let position = tree
        .node(expression)
        .children
        .iter()
        .position(|c| *c == child)
        .ok_or(RewriteError::Unbalanced)?;

    // A placeholder with nothing to its left has no operand to test for
    // nullity; drop the expression as if the slot were absent.
    if position == 0 {
        tree.node_mut(expression).removed = true;
        return Ok(());
    }

    tree.node_mut(child).removed = true;
    let operator = tree.node(expression).children[position - 1];
    tree.node_mut(operator).removed = true;
    tree.alloc(
        NodeKind::Part {
            text: "IS NULL".to_string(),
        },
        Some(expression),
    );
    Ok(())
}
