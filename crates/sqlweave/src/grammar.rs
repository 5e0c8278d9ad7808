//! Static clause grammar: which keyword runs open a clause, and how that
//! clause treats placeholders, emptiness, and separators.

use lazy_static::lazy_static;
use std::collections::HashMap;

/// What a placeholder denotes inside a given clause.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaceholderKind {
    Column,
    Disallowed,
    Lock,
    Table,
    Variable,
    VariableCondition,
    VariableDefault,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClauseProperties {
    /// Whether the clause survives with zero expressions (`ON CONFLICT`,
    /// `FOR UPDATE`, ...).
    pub allow_empty: bool,
    pub placeholders: PlaceholderKind,
    /// Tokens that split the clause body into expressions, lower-cased.
    pub separators: &'static [&'static str],
}

impl ClauseProperties {
    pub fn is_separator(&self, token: &str) -> bool {
        let token = token.to_lowercase();
        self.separators.iter().any(|s| *s == token)
    }
}

const fn props(
    allow_empty: bool,
    placeholders: PlaceholderKind,
    separators: &'static [&'static str],
) -> ClauseProperties {
    ClauseProperties {
        allow_empty,
        placeholders,
        separators,
    }
}

const COMMA: &[&str] = &[","];
const CONNECTORS: &[&str] = &["and", "or"];

/// Every JOIN spelling shares this one value so their behavior cannot drift.
const JOIN_CLAUSE: ClauseProperties = props(false, PlaceholderKind::Table, &[]);

/// Keyword sequence -> clause properties. Folded into a trie at first use.
const CLAUSE_TABLE: &[(&[&str], ClauseProperties)] = &[
    (&["delete", "from"], props(false, PlaceholderKind::Table, &[])),
    (&["default", "values"], props(true, PlaceholderKind::Disallowed, &[])),
    (&["for", "update"], props(true, PlaceholderKind::Lock, &[])),
    (&["from"], props(false, PlaceholderKind::Table, &[])),
    (&["full", "join"], JOIN_CLAUSE),
    (&["full", "outer", "join"], JOIN_CLAUSE),
    (&["group", "by"], props(false, PlaceholderKind::Column, COMMA)),
    (&["having"], props(false, PlaceholderKind::VariableCondition, CONNECTORS)),
    (&["inner", "join"], JOIN_CLAUSE),
    (&["insert", "into"], props(true, PlaceholderKind::Disallowed, &[])),
    (&["join"], JOIN_CLAUSE),
    (&["left", "join"], JOIN_CLAUSE),
    (&["left", "outer", "join"], JOIN_CLAUSE),
    (&["limit"], props(false, PlaceholderKind::Variable, &[])),
    (&["offset"], props(false, PlaceholderKind::Variable, &[])),
    (&["on"], props(false, PlaceholderKind::Variable, COMMA)),
    (&["on", "conflict"], props(true, PlaceholderKind::Disallowed, &[])),
    (&["do"], props(false, PlaceholderKind::Disallowed, &[])),
    (&["do", "update", "set"], props(false, PlaceholderKind::Variable, COMMA)),
    (&["order", "by"], props(false, PlaceholderKind::Column, COMMA)),
    (&["returning"], props(false, PlaceholderKind::Disallowed, COMMA)),
    (&["right", "join"], JOIN_CLAUSE),
    (&["right", "outer", "join"], JOIN_CLAUSE),
    (&["select"], props(false, PlaceholderKind::Column, COMMA)),
    (&["set"], props(false, PlaceholderKind::Variable, COMMA)),
    (&["update"], props(false, PlaceholderKind::Disallowed, &[])),
    (&["values"], props(false, PlaceholderKind::VariableDefault, COMMA)),
    (&["where"], props(false, PlaceholderKind::VariableCondition, CONNECTORS)),
    (&["with"], props(false, PlaceholderKind::Disallowed, &[])),
];

#[derive(Debug, Default)]
pub struct GrammarNode {
    children: HashMap<&'static str, GrammarNode>,
    terminal: Option<ClauseProperties>,
}

impl GrammarNode {
    /// Follows one keyword (already lower-cased) deeper into the trie.
    pub fn descend(&self, keyword: &str) -> Option<&GrammarNode> {
        self.children.get(keyword)
    }

    pub fn terminal(&self) -> Option<ClauseProperties> {
        self.terminal
    }
}

lazy_static! {
    /// Root of the clause keyword trie.
    pub static ref CLAUSES: GrammarNode = build_trie();
}

fn build_trie() -> GrammarNode {
    let mut root = GrammarNode::default();
    for (path, properties) in CLAUSE_TABLE {
        let mut node = &mut root;
        for keyword in *path {
            node = node.children.entry(keyword).or_default();
        }
        debug_assert!(node.terminal.is_none(), "duplicate clause path");
        node.terminal = Some(*properties);
    }
    root
}

/// Whether `token` can begin a clause keyword run.
pub fn starts_clause(token: &str) -> bool {
    CLAUSES.children.contains_key(token.to_lowercase().as_str())
}
