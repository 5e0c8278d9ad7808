//! Splits raw template text into tokens and interpolation markers.
//!
//! Literal text splits on whitespace, commas, semicolons, parentheses and
//! quote runs; an identifier directly followed by `(` is kept as one
//! function-open token. `{name}` becomes a slot marker, `{{...}}` collapses
//! to literal braces.

use crate::{
    error::{Result, RewriteError},
    lexer::token::{Token, TokenKind},
};
use std::iter::Peekable;
use std::str::Chars;

pub mod token;

pub struct Lexer {
    tokens: Vec<Token>,
    word: String,
}

impl Lexer {
    pub fn new() -> Self {
        Lexer {
            tokens: Vec::new(),
            word: String::new(),
        }
    }

    pub fn tokenize(mut self, input: &str) -> Result<Vec<Token>> {
        let mut chars = input.chars().peekable();

        while let Some(ch) = chars.next() {
            match ch {
                c if c.is_whitespace() => self.flush_word(),
                '(' => {
                    if self.word.is_empty() {
                        self.tokens.push(Token::new(TokenKind::LeftParen, "("));
                    } else {
                        let name = std::mem::take(&mut self.word);
                        let lexeme = format!("{}(", name);
                        self.tokens
                            .push(Token::new(TokenKind::FunctionOpen(name), lexeme));
                    }
                }
                ')' => {
                    self.flush_word();
                    self.tokens.push(Token::new(TokenKind::RightParen, ")"));
                }
                ',' => {
                    self.flush_word();
                    self.tokens.push(Token::new(TokenKind::Comma, ","));
                }
                ';' => {
                    self.flush_word();
                    self.tokens.push(Token::new(TokenKind::Semicolon, ";"));
                }
                '\'' => {
                    self.flush_word();
                    let mut run = 1;
                    while chars.next_if_eq(&'\'').is_some() {
                        run += 1;
                    }
                    self.tokens
                        .push(Token::new(TokenKind::Quotes(run), "'".repeat(run)));
                }
                '{' => self.scan_braces(&mut chars)?,
                _ => self.word.push(ch),
            }
        }

        self.flush_word();
        Ok(self.tokens)
    }

    fn flush_word(&mut self) {
        if !self.word.is_empty() {
            let word = std::mem::take(&mut self.word);
            self.tokens.push(Token::new(TokenKind::Word, word));
        }
    }

    /// Scans the remainder of a `{name}` slot or a `{{...}}` escape, with the
    /// leading `{` already consumed.
    fn scan_braces(&mut self, chars: &mut Peekable<Chars<'_>>) -> Result<()> {
        if chars.next_if_eq(&'{').is_some() {
            // {{...}} collapses to literal {...} inside the current word.
            let mut inner = String::new();
            loop {
                match chars.next() {
                    Some('}') => break,
                    Some(c) => inner.push(c),
                    None => return Err(RewriteError::Unbalanced),
                }
            }
            if chars.next_if_eq(&'}').is_none() {
                return Err(RewriteError::InvalidSlotName(format!("{{{}}}", inner)));
            }
            self.word.push('{');
            self.word.push_str(&inner);
            self.word.push('}');
            return Ok(());
        }

        self.flush_word();
        let mut name = String::new();
        loop {
            match chars.next() {
                Some('}') => break,
                Some(c) => name.push(c),
                None => return Err(RewriteError::Unbalanced),
            }
        }
        if !is_identifier(&name) {
            return Err(RewriteError::InvalidSlotName(name));
        }
        let lexeme = format!("{{{}}}", name);
        self.tokens.push(Token::new(TokenKind::Slot(name), lexeme));
        Ok(())
    }
}

impl Default for Lexer {
    fn default() -> Self {
        Lexer::new()
    }
}

fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_alphanumeric() || c == '_')
}

#[cfg(test)]
mod tests;
