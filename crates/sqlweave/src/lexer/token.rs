use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    /// The raw text as written in the template.
    pub lexeme: String,
}

impl Token {
    pub fn new(kind: TokenKind, lexeme: impl Into<String>) -> Self {
        Token {
            kind,
            lexeme: lexeme.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    /// Any run of non-delimiter text: keywords, identifiers, operators.
    Word,
    /// An identifier fused with its opening parenthesis: `count(`.
    FunctionOpen(String),
    LeftParen,
    RightParen,
    Comma,
    Semicolon,
    /// A run of one or more quote characters; the length decides whether it
    /// toggles a literal span or is an escape.
    Quotes(usize),
    /// An interpolation marker `{name}` carrying the slot name.
    Slot(String),
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenKind::Word => write!(f, "word"),
            TokenKind::FunctionOpen(name) => write!(f, "{}(", name),
            TokenKind::LeftParen => write!(f, "("),
            TokenKind::RightParen => write!(f, ")"),
            TokenKind::Comma => write!(f, ","),
            TokenKind::Semicolon => write!(f, ";"),
            TokenKind::Quotes(n) => write!(f, "{}", "'".repeat(*n)),
            TokenKind::Slot(name) => write!(f, "{{{}}}", name),
        }
    }
}
