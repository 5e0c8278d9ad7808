//! Consumes the token stream and produces the statement forest.
//!
//! A cursor tracks the node new content attaches to; every token either
//! moves the cursor (clauses, parentheses, quotes, terminators) or attaches
//! a leaf under it.

use crate::{
    error::{Result, RewriteError},
    grammar::{ClauseProperties, GrammarNode, CLAUSES},
    lexer::token::{Token, TokenKind},
    tree::{NodeId, NodeKind, Tree},
};
use tracing::debug;

pub fn build(tokens: &[Token]) -> Result<Tree> {
    TreeBuilder::new().build(tokens)
}

struct TreeBuilder {
    tree: Tree,
    cursor: NodeId,
}

impl TreeBuilder {
    fn new() -> Self {
        let mut tree = Tree::new();
        let root = tree.alloc(NodeKind::Statement, None);
        tree.statements.push(root);
        TreeBuilder { tree, cursor: root }
    }

    fn build(mut self, tokens: &[Token]) -> Result<Tree> {
        let mut index = 0;
        while index < tokens.len() {
            let token = &tokens[index];

            // Quote runs come first: only they can close a literal span.
            if let TokenKind::Quotes(run) = token.kind {
                self.on_quotes(run, &token.lexeme)?;
                index += 1;
                continue;
            }

            // Inside a literal span every other token is content.
            if matches!(self.tree.kind(self.cursor), NodeKind::Value) {
                match &token.kind {
                    TokenKind::Slot(name) => {
                        let name = name.clone();
                        self.attach(NodeKind::Placeholder { name }, &token.lexeme)?;
                    }
                    _ => {
                        let text = token.lexeme.clone();
                        self.attach(NodeKind::Part { text }, &token.lexeme)?;
                    }
                }
                index += 1;
                continue;
            }

            if matches!(token.kind, TokenKind::Word) {
                if let Some(consumed) = self.try_clause(&tokens[index..])? {
                    index += consumed;
                    continue;
                }
            }

            match &token.kind {
                TokenKind::Word => self.on_text(&token.lexeme)?,
                TokenKind::Comma => self.on_text(",")?,
                TokenKind::Semicolon => self.on_terminator()?,
                TokenKind::LeftParen => self.on_group()?,
                TokenKind::FunctionOpen(name) => self.on_function(name.clone(), &token.lexeme)?,
                TokenKind::RightParen => self.on_close_paren()?,
                TokenKind::Slot(name) => {
                    let name = name.clone();
                    self.attach(NodeKind::Placeholder { name }, &token.lexeme)?;
                }
                TokenKind::Quotes(_) => unreachable!("handled above"),
            }
            index += 1;
        }

        self.finish()
    }

    /// Tries to consume a clause keyword run starting at `tokens[0]`.
    /// Matching is greedy-longest: the deepest trie node with a terminal
    /// wins, so `ON CONFLICT` beats `ON`. A run that never reaches a
    /// terminal (a literal `DEFAULT`, say) is left for ordinary handling.
    fn try_clause(&mut self, tokens: &[Token]) -> Result<Option<usize>> {
        let mut node: &GrammarNode = &CLAUSES;
        let mut best: Option<(ClauseProperties, usize)> = None;
        let mut depth = 0;
        for token in tokens {
            if !matches!(token.kind, TokenKind::Word) {
                break;
            }
            match node.descend(token.lexeme.to_lowercase().as_str()) {
                Some(next) => {
                    node = next;
                    depth += 1;
                    if let Some(properties) = next.terminal() {
                        best = Some((properties, depth));
                    }
                }
                None => break,
            }
        }
        let Some((properties, consumed)) = best else {
            return Ok(None);
        };
        let keyword = tokens[..consumed]
            .iter()
            .map(|t| t.lexeme.as_str())
            .collect::<Vec<_>>()
            .join(" ");
        debug!(keyword = %keyword, "clause");

        // A clause inside a group or function opens a nested statement
        // (sub-selects, inline derived tables).
        if matches!(
            self.tree.kind(self.cursor),
            NodeKind::Function { .. } | NodeKind::Group
        ) {
            self.cursor = self.tree.alloc(NodeKind::Statement, Some(self.cursor));
        } else if matches!(self.tree.kind(self.cursor), NodeKind::ExpressionGroup) {
            let expr = self.tree.current_expression(self.cursor);
            self.cursor = self.tree.alloc(NodeKind::Statement, Some(expr));
        }

        let statement = self
            .tree
            .nearest(self.cursor, |k| matches!(k, NodeKind::Statement))
            .ok_or(RewriteError::Unbalanced)?;
        let clause = self
            .tree
            .alloc(NodeKind::Clause { keyword, properties }, Some(statement));
        self.new_expression(clause, String::new());
        self.cursor = clause;
        Ok(Some(consumed))
    }

    /// A word or comma: either a separator splitting the enclosing clause's
    /// expressions, or plain literal text.
    fn on_text(&mut self, lexeme: &str) -> Result<()> {
        if self.tree.kind(self.cursor).is_holder() {
            let clause = self
                .tree
                .nearest(self.cursor, |k| matches!(k, NodeKind::Clause { .. }));
            if let Some(clause) = clause {
                let NodeKind::Clause { properties, .. } = self.tree.kind(clause) else {
                    return Err(RewriteError::Syntax(lexeme.to_string()));
                };
                if properties.is_separator(lexeme) {
                    self.new_expression(self.cursor, lexeme.to_string());
                    return Ok(());
                }
            }
        }
        let text = lexeme.to_string();
        self.attach(NodeKind::Part { text }, lexeme)
    }

    fn on_terminator(&mut self) -> Result<()> {
        if !matches!(
            self.tree.kind(self.cursor),
            NodeKind::Statement | NodeKind::Clause { .. }
        ) {
            return Err(RewriteError::Unbalanced);
        }
        let statement = self.tree.alloc(NodeKind::Statement, None);
        self.tree.statements.push(statement);
        self.cursor = statement;
        Ok(())
    }

    /// A standalone `(` opens an ExpressionGroup when it begins an
    /// expression (enabling comma-separated rows), a plain Group otherwise.
    fn on_group(&mut self) -> Result<()> {
        match self.tree.kind(self.cursor) {
            NodeKind::Statement => Err(RewriteError::Syntax("(".to_string())),
            NodeKind::Function { .. } | NodeKind::Group => {
                self.cursor = self.tree.alloc(NodeKind::Group, Some(self.cursor));
                Ok(())
            }
            _ => {
                let expr = self.tree.current_expression(self.cursor);
                if self.tree.node(expr).children.is_empty() {
                    let group = self.tree.alloc(NodeKind::ExpressionGroup, Some(expr));
                    self.new_expression(group, String::new());
                    self.cursor = group;
                } else {
                    self.cursor = self.tree.alloc(NodeKind::Group, Some(expr));
                }
                Ok(())
            }
        }
    }

    fn on_function(&mut self, name: String, lexeme: &str) -> Result<()> {
        let parent = match self.tree.kind(self.cursor) {
            NodeKind::Statement => return Err(RewriteError::Syntax(lexeme.to_string())),
            NodeKind::Function { .. } | NodeKind::Group => self.cursor,
            _ => self.tree.current_expression(self.cursor),
        };
        self.cursor = self.tree.alloc(NodeKind::Function { name }, Some(parent));
        Ok(())
    }

    fn on_close_paren(&mut self) -> Result<()> {
        let mut inner = self.cursor;
        while !matches!(
            self.tree.kind(inner),
            NodeKind::ExpressionGroup | NodeKind::Function { .. } | NodeKind::Group
        ) {
            inner = self.tree.parent(inner).ok_or(RewriteError::Unbalanced)?;
        }
        let above = self.tree.parent(inner).ok_or(RewriteError::Unbalanced)?;
        self.cursor = self
            .tree
            .nearest(above, |k| {
                matches!(
                    k,
                    NodeKind::Clause { .. }
                        | NodeKind::ExpressionGroup
                        | NodeKind::Function { .. }
                        | NodeKind::Group
                )
            })
            .ok_or(RewriteError::Unbalanced)?;
        Ok(())
    }

    fn on_quotes(&mut self, run: usize, lexeme: &str) -> Result<()> {
        match run {
            1 => {
                if matches!(self.tree.kind(self.cursor), NodeKind::Value) {
                    let parent = self.tree.parent(self.cursor).ok_or(RewriteError::Unbalanced)?;
                    self.cursor = self
                        .tree
                        .nearest(parent, |k| {
                            matches!(
                                k,
                                NodeKind::Clause { .. }
                                    | NodeKind::ExpressionGroup
                                    | NodeKind::Function { .. }
                                    | NodeKind::Group
                            )
                        })
                        .ok_or(RewriteError::Unbalanced)?;
                } else {
                    let parent = match self.tree.kind(self.cursor) {
                        NodeKind::Statement => {
                            return Err(RewriteError::Syntax(lexeme.to_string()))
                        }
                        NodeKind::Function { .. } | NodeKind::Group => self.cursor,
                        _ => self.tree.current_expression(self.cursor),
                    };
                    self.cursor = self.tree.alloc(NodeKind::Value, Some(parent));
                }
                Ok(())
            }
            // An even run is an escaped empty literal: lexical no-op.
            n if n % 2 == 0 => Ok(()),
            _ => {
                let text = lexeme.to_string();
                self.attach(NodeKind::Part { text }, lexeme)
            }
        }
    }

    /// Attaches a leaf under the cursor's attachment point.
    fn attach(&mut self, kind: NodeKind, lexeme: &str) -> Result<()> {
        let parent = match self.tree.kind(self.cursor) {
            NodeKind::Statement => return Err(RewriteError::Syntax(lexeme.to_string())),
            NodeKind::Function { .. } | NodeKind::Group | NodeKind::Value => self.cursor,
            _ => self.tree.current_expression(self.cursor),
        };
        self.tree.alloc(kind, Some(parent));
        Ok(())
    }

    fn new_expression(&mut self, holder: NodeId, separator: String) -> NodeId {
        self.tree
            .alloc(NodeKind::Expression { separator }, Some(holder))
    }

    /// Input may only end at statement or clause level. A nested statement
    /// can put the cursor on a clause while a paren scope is still open, so
    /// the whole parent chain is checked, not just the cursor.
    fn finish(self) -> Result<Tree> {
        let mut current = Some(self.cursor);
        while let Some(id) = current {
            if matches!(
                self.tree.kind(id),
                NodeKind::ExpressionGroup
                    | NodeKind::Function { .. }
                    | NodeKind::Group
                    | NodeKind::Value
            ) {
                return Err(RewriteError::Unbalanced);
            }
            current = self.tree.parent(id);
        }
        Ok(self.tree)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::Lexer;

    fn parse(template: &str) -> Result<Tree> {
        build(&Lexer::new().tokenize(template).unwrap())
    }

    fn clause_keywords(tree: &Tree) -> Vec<String> {
        let mut found = Vec::new();
        for statement in &tree.statements {
            for child in &tree.node(*statement).children {
                if let NodeKind::Clause { keyword, .. } = tree.kind(*child) {
                    found.push(keyword.clone());
                }
            }
        }
        found
    }

    #[test]
    fn test_clause_recognition() {
        let tree = parse("SELECT x FROM y WHERE a = 1 ORDER BY x").unwrap();
        assert_eq!(
            clause_keywords(&tree),
            vec!["SELECT", "FROM", "WHERE", "ORDER BY"]
        );
    }

    #[test]
    fn test_greedy_longest_keyword_run() {
        let tree = parse("INSERT INTO x DEFAULT VALUES ON CONFLICT").unwrap();
        assert_eq!(
            clause_keywords(&tree),
            vec!["INSERT INTO", "DEFAULT VALUES", "ON CONFLICT"]
        );
    }

    #[test]
    fn test_separator_splits_expressions() {
        let tree = parse("SELECT a, b WHERE c = 1 AND d = 2").unwrap();
        let statement = tree.statements[0];
        let select = tree.node(statement).children[0];
        let expressions: Vec<_> = tree
            .node(select)
            .children
            .iter()
            .map(|e| tree.kind(*e).clone())
            .collect();
        assert_eq!(
            expressions,
            vec![
                NodeKind::Expression {
                    separator: String::new()
                },
                NodeKind::Expression {
                    separator: ",".to_string()
                },
            ]
        );
        let where_ = tree.node(statement).children[1];
        let separators: Vec<_> = tree
            .node(where_)
            .children
            .iter()
            .filter_map(|e| match tree.kind(*e) {
                NodeKind::Expression { separator } => Some(separator.clone()),
                _ => None,
            })
            .collect();
        assert_eq!(separators, vec!["".to_string(), "AND".to_string()]);
    }

    #[test]
    fn test_expression_group_at_expression_start() {
        // The parenthesis after VALUES begins an expression, so it must be
        // an ExpressionGroup; the column list follows `x` and must not be.
        let tree = parse("INSERT INTO x (a, b) VALUES (1, 2)").unwrap();
        let statement = tree.statements[0];
        let insert = tree.node(statement).children[0];
        let insert_expr = tree.node(insert).children[0];
        let kinds: Vec<_> = tree
            .node(insert_expr)
            .children
            .iter()
            .map(|c| tree.kind(*c).clone())
            .collect();
        assert!(matches!(kinds[0], NodeKind::Part { .. }));
        assert!(matches!(kinds[1], NodeKind::Group));

        let values = tree.node(statement).children[1];
        let values_expr = tree.node(values).children[0];
        let first = tree.node(values_expr).children[0];
        assert!(matches!(tree.kind(first), NodeKind::ExpressionGroup));
    }

    #[test]
    fn test_nested_statement_in_group() {
        let tree = parse("SELECT x FROM (SELECT y FROM z)").unwrap();
        assert_eq!(tree.statements.len(), 1);
        assert_eq!(clause_keywords(&tree), vec!["SELECT", "FROM"]);
    }

    #[test]
    fn test_statement_terminator() {
        let tree = parse("SELECT x; SELECT y").unwrap();
        assert_eq!(tree.statements.len(), 2);
    }

    #[test]
    fn test_bare_token_without_clause_is_an_error() {
        assert!(matches!(parse("foo"), Err(RewriteError::Syntax(_))));
        assert!(matches!(parse("( x )"), Err(RewriteError::Syntax(_))));
    }

    #[test]
    fn test_unbalanced_parentheses() {
        assert!(matches!(
            parse("SELECT (a"),
            Err(RewriteError::Unbalanced)
        ));
        assert!(matches!(
            parse("SELECT a )"),
            Err(RewriteError::Unbalanced)
        ));
    }

    #[test]
    fn test_unclosed_paren_followed_by_clause() {
        // The clause keyword nests a statement inside the open group, moving
        // the cursor off the group; the unclosed scope must still surface.
        assert!(matches!(
            parse("SELECT (a FROM y"),
            Err(RewriteError::Unbalanced)
        ));
        assert!(matches!(
            parse("SELECT x FROM (SELECT y FROM z"),
            Err(RewriteError::Unbalanced)
        ));
    }

    #[test]
    fn test_unbalanced_quote() {
        assert!(matches!(
            parse("SELECT 'a FROM b"),
            Err(RewriteError::Unbalanced)
        ));
    }

    #[test]
    fn test_clause_keyword_inside_literal_is_text() {
        let tree = parse("SELECT 'select from where'").unwrap();
        assert_eq!(clause_keywords(&tree), vec!["SELECT"]);
    }

    #[test]
    fn test_keyword_run_without_terminal_falls_back_to_text() {
        // A literal DEFAULT inside VALUES must not be mistaken for the
        // DEFAULT VALUES clause.
        let tree = parse("INSERT INTO x (a) VALUES (DEFAULT)").unwrap();
        assert_eq!(clause_keywords(&tree), vec!["INSERT INTO", "VALUES"]);
    }
}
