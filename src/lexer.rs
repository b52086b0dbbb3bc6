use logos::Logos;
use std::fmt;

use crate::Span;

#[derive(Logos, Debug, Clone, PartialEq)]
#[logos(skip r"[ \t\n\r\f\x0B]+")] // Skip whitespace
#[logos(skip r";[^\n\r]*")] // Skip comments
pub enum TokenKind {
    #[token("(")]
    LParen,
    #[token(")")]
    RParen,
    // Anything else up to the next delimiter. Classification into numbers,
    // booleans and symbols happens later, in `types::token_to_atom`.
    #[regex(r"[^ \t\n\r\f\x0B();]+", |lex| lex.slice().to_string())]
    Atom(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Span,
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenKind::LParen => write!(f, "("),
            TokenKind::RParen => write!(f, ")"),
            TokenKind::Atom(text) => write!(f, "{}", text),
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.kind.fmt(f)
    }
}

/// Splits `input` into tokens.
///
/// Tokenizing never fails: every character is either a delimiter, part of a
/// comment, or part of an atom. Malformed atoms are rejected by the parser.
pub fn tokenize(input: &str) -> Vec<Token> {
    let mut lexer = TokenKind::lexer(input);
    let mut tokens = Vec::new();
    while let Some(result) = lexer.next() {
        let span = Span::from(lexer.span());
        // The atom pattern covers every character that isn't skipped, so the
        // error arm is unreachable in practice. Keep the text rather than lose it.
        let kind = result.unwrap_or_else(|_| TokenKind::Atom(lexer.slice().to_string()));
        tokens.push(Token { kind, span });
    }
    tokens
}
