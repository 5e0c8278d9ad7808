//! Rewrites SQL-shaped templates with named `{slot}` interpolations into a
//! final SQL string plus an ordered list of bound parameter values.
//!
//! Slots resolve against a caller-supplied mapping. Two sentinel values
//! change the shape of the query instead of binding: [`Slot::Absent`] drops
//! the slot's contribution (up to and including the whole clause), and
//! [`Slot::IsNull`] turns the enclosing comparison into an `IS NULL` test.
//! Column, table and lock-mode slots are validated against allow-lists in
//! the [`RewriteContext`] and emitted literally rather than bound.
//!
//! ```
//! use sqlweave::{rewrite_with, slots, ParamStyle, RewriteContext, Slot, SqlValue};
//!
//! let values = slots! { "a" => Slot::Absent, "b" => 2 };
//! let ctx = RewriteContext::new();
//! let result = rewrite_with(
//!     "SELECT x FROM y WHERE a = {a} AND (b = {b} OR c = 1)",
//!     &values,
//!     &ctx,
//! ).unwrap();
//! assert_eq!(result.sql, "SELECT x FROM y WHERE (b = ? OR c = 1)");
//! assert_eq!(result.params, vec![SqlValue::Int(2)]);
//! ```

pub mod context;
pub mod error;
pub mod grammar;
pub mod lexer;
pub mod prune;
pub mod render;
pub mod resolve;
pub mod tree;
pub mod value;

pub use context::{ContextGuard, ParamStyle, RewriteContext};
pub use error::{Result, RewriteError};
pub use value::{Slot, SqlValue};

use crate::lexer::Lexer;
use std::collections::HashMap;

/// The outcome of a rewrite: the SQL text and the values to bind, in marker
/// order.
#[derive(Debug, Clone, PartialEq)]
pub struct Rewritten {
    pub sql: String,
    pub params: Vec<SqlValue>,
}

/// Rewrites `template` under the ambient [`RewriteContext`] of the current
/// thread (see [`RewriteContext::enter`]).
pub fn rewrite(template: &str, values: &HashMap<String, Slot>) -> Result<Rewritten> {
    rewrite_with(template, values, &RewriteContext::current())
}

/// Rewrites `template` under an explicitly threaded context.
///
/// The call is a pure function of its inputs: it parses the template into a
/// fresh tree, resolves every slot, prunes what resolution emptied, and
/// renders the survivors. Errors abort atomically; no partial output is
/// ever returned.
pub fn rewrite_with(
    template: &str,
    values: &HashMap<String, Slot>,
    ctx: &RewriteContext,
) -> Result<Rewritten> {
    let tokens = Lexer::new().tokenize(template)?;
    let mut tree = tree::builder::build(&tokens)?;
    let params = resolve::resolve(&mut tree, values, ctx)?;
    prune::prune(&mut tree);
    let sql = render::render(&tree, ctx.param_style);
    Ok(Rewritten { sql, params })
}
