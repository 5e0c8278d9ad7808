//! Structural behavior: templates without sentinels render back to
//! themselves (modulo whitespace normalization), malformed templates fail.

use sqlweave::{rewrite_with, slots, RewriteContext, RewriteError};

fn roundtrip(template: &str) -> String {
    let result = rewrite_with(template, &slots!(), &RewriteContext::new()).unwrap();
    assert!(result.params.is_empty());
    result.sql
}

#[test]
fn test_literal_roundtrip() {
    let query = "SELECT x FROM y WHERE x = 'NONE'";
    assert_eq!(roundtrip(query), query);
}

#[test]
fn test_case_is_preserved() {
    let query = "select X from Y where X = 1";
    assert_eq!(roundtrip(query), query);
}

#[test]
fn test_whitespace_is_normalized() {
    assert_eq!(
        roundtrip("SELECT  a ,   b\n  FROM t"),
        "SELECT a, b FROM t"
    );
}

#[test]
fn test_function_call() {
    let query = "SELECT COUNT(x) FROM y";
    assert_eq!(roundtrip(query), query);
}

#[test]
fn test_in_list_group() {
    let query = "SELECT x FROM y WHERE a IN (1, 2)";
    assert_eq!(roundtrip(query), query);
}

#[test]
fn test_subselect() {
    let query = "SELECT x FROM (SELECT y FROM z) WHERE a = 1";
    assert_eq!(roundtrip(query), query);
}

#[test]
fn test_join_with_on() {
    let query = "SELECT x FROM a LEFT OUTER JOIN b ON a.id = b.id AND b.live = 1";
    assert_eq!(roundtrip(query), query);
}

#[test]
fn test_multiple_statements() {
    assert_eq!(roundtrip("SELECT a; SELECT b"), "SELECT a; SELECT b");
}

#[test]
fn test_trailing_terminator_is_dropped() {
    assert_eq!(roundtrip("SELECT a;"), "SELECT a");
}

#[test]
fn test_brace_escape_is_literal() {
    let result = rewrite_with("SELECT '{{}}' FROM y", &slots!(), &RewriteContext::new()).unwrap();
    assert_eq!(result.sql, "SELECT '{}' FROM y");
    assert!(result.params.is_empty());
}

#[test]
fn test_default_values_clause_is_kept_empty() {
    let query = "INSERT INTO x DEFAULT VALUES";
    assert_eq!(roundtrip(query), query);
}

#[test]
fn test_unbalanced_parenthesis_is_an_error() {
    let err = rewrite_with("SELECT (a FROM y", &slots!(), &RewriteContext::new()).unwrap_err();
    assert!(matches!(err, RewriteError::Unbalanced));
}

#[test]
fn test_unbalanced_quote_is_an_error() {
    let err = rewrite_with("SELECT 'a FROM y", &slots!(), &RewriteContext::new()).unwrap_err();
    assert!(matches!(err, RewriteError::Unbalanced));
}

#[test]
fn test_token_without_clause_is_an_error() {
    let err = rewrite_with("bare words", &slots!(), &RewriteContext::new()).unwrap_err();
    assert!(matches!(err, RewriteError::Syntax(_)));
}

#[test]
fn test_slot_name_must_be_identifier() {
    let err = rewrite_with(
        "SELECT x FROM y WHERE a = {not an ident}",
        &slots!(),
        &RewriteContext::new(),
    )
    .unwrap_err();
    assert!(matches!(err, RewriteError::InvalidSlotName(_)));
}

#[test]
fn test_empty_template() {
    assert_eq!(roundtrip(""), "");
}
