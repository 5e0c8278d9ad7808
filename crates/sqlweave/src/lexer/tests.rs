use super::*;

fn kinds(input: &str) -> Vec<TokenKind> {
    Lexer::new()
        .tokenize(input)
        .unwrap()
        .into_iter()
        .map(|t| t.kind)
        .collect()
}

fn lexemes(input: &str) -> Vec<String> {
    Lexer::new()
        .tokenize(input)
        .unwrap()
        .into_iter()
        .map(|t| t.lexeme)
        .collect()
}

#[test]
fn test_words_split_on_whitespace() {
    assert_eq!(
        lexemes("SELECT x  FROM\ty"),
        vec!["SELECT", "x", "FROM", "y"]
    );
}

#[test]
fn test_delimiters() {
    assert_eq!(
        kinds("a, b; (c)"),
        vec![
            TokenKind::Word,
            TokenKind::Comma,
            TokenKind::Word,
            TokenKind::Semicolon,
            TokenKind::LeftParen,
            TokenKind::Word,
            TokenKind::RightParen,
        ]
    );
}

#[test]
fn test_function_open_fuses_name_and_paren() {
    let tokens = Lexer::new().tokenize("b = ANY({b})").unwrap();
    assert_eq!(tokens[2].kind, TokenKind::FunctionOpen("ANY".to_string()));
    assert_eq!(tokens[2].lexeme, "ANY(");
    assert_eq!(tokens[3].kind, TokenKind::Slot("b".to_string()));
    assert_eq!(tokens[4].kind, TokenKind::RightParen);
}

#[test]
fn test_quote_runs() {
    assert_eq!(
        kinds("'NONE' '' x"),
        vec![
            TokenKind::Quotes(1),
            TokenKind::Word,
            TokenKind::Quotes(1),
            TokenKind::Quotes(2),
            TokenKind::Word,
        ]
    );
}

#[test]
fn test_slot_marker() {
    assert_eq!(kinds("{a_1}"), vec![TokenKind::Slot("a_1".to_string())]);
}

#[test]
fn test_slot_name_must_be_identifier() {
    assert!(matches!(
        Lexer::new().tokenize("{not an ident}"),
        Err(RewriteError::InvalidSlotName(_))
    ));
    assert!(matches!(
        Lexer::new().tokenize("{1a}"),
        Err(RewriteError::InvalidSlotName(_))
    ));
}

#[test]
fn test_unterminated_slot() {
    assert!(matches!(
        Lexer::new().tokenize("WHERE a = {a"),
        Err(RewriteError::Unbalanced)
    ));
}

#[test]
fn test_brace_escape_collapses() {
    assert_eq!(lexemes("'{{}}'"), vec!["'", "{}", "'"]);
    assert_eq!(lexemes("{{literal}}"), vec!["{literal}"]);
}

#[test]
fn test_operators_stay_single_tokens() {
    assert_eq!(lexemes("a != b"), vec!["a", "!=", "b"]);
    assert_eq!(lexemes("a>=b"), vec!["a>=b"]);
}
