use crate::Span;
use crate::lexer::{Token, TokenKind};
use crate::types::{Atom, Expression, token_to_atom};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParseError {
    #[error("invalid syntax: unexpected token '{found}', expected {expected}")]
    UnexpectedToken { found: Token, expected: String },
    #[error("invalid syntax: unexpected end of input, expected {0}")]
    UnexpectedEof(String),
    #[error("invalid syntax [at {span}]: '{token}' is not a number, boolean or symbol")]
    InvalidAtom { token: String, span: Span },
}

// Result type alias for convenience
pub type ParseResult<T> = Result<T, ParseError>;

/// Builds an `Expression` tree from a token sequence.
///
/// The parser owns its tokens and walks them with an index, so a failed parse
/// never leaves a half-consumed queue behind.
pub struct Parser {
    tokens: Vec<Token>,
    position: usize,
}

impl Parser {
    pub fn new(tokens: Vec<Token>) -> Self {
        Parser {
            tokens,
            position: 0,
        }
    }

    // Peeks at the next token without consuming.
    fn peek_token(&self) -> Option<&Token> {
        self.tokens.get(self.position)
    }

    // Consumes the next token if available.
    fn next_token(&mut self) -> Option<&Token> {
        let token = self.tokens.get(self.position);
        if token.is_some() {
            self.position += 1;
        }
        token
    }

    /// Parses a single expression starting at the current position.
    pub fn parse_expr(&mut self) -> ParseResult<Expression> {
        match self.next_token().cloned() {
            Some(Token {
                kind: TokenKind::LParen,
                ..
            }) => self.parse_list(),
            Some(
                found @ Token {
                    kind: TokenKind::RParen,
                    ..
                },
            ) => Err(ParseError::UnexpectedToken {
                found,
                expected: "an atom or '('".to_string(),
            }),
            Some(Token {
                kind: TokenKind::Atom(text),
                span,
            }) => Ok(Expression::leaf(classify(text, span)?)),
            None => Err(ParseError::UnexpectedEof("an expression".to_string())),
        }
    }

    /// Parses the rest of a list after its opening `(`: the head atom, then
    /// children up to and including the matching `)`.
    fn parse_list(&mut self) -> ParseResult<Expression> {
        let head = match self.next_token().cloned() {
            Some(Token {
                kind: TokenKind::Atom(text),
                span,
            }) => classify(text, span)?,
            Some(Token {
                kind: TokenKind::RParen,
                ..
            }) => return Ok(Expression::default()), // ()
            // A nested list cannot be a head; rejected here rather than
            // bound as a symbol named "(" that no lookup can find.
            Some(found) => {
                return Err(ParseError::UnexpectedToken {
                    found,
                    expected: "an atom at the head of a list".to_string(),
                });
            }
            None => return Err(ParseError::UnexpectedEof("')'".to_string())),
        };

        let mut tail = Vec::new();
        loop {
            match self.peek_token().map(|token| &token.kind) {
                Some(TokenKind::RParen) => {
                    self.position += 1;
                    return Ok(Expression::new(head, tail));
                }
                Some(_) => tail.push(self.parse_expr()?),
                None => return Err(ParseError::UnexpectedEof("')'".to_string())),
            }
        }
    }

    /// Parses exactly one top-level expression; trailing tokens are an error.
    pub fn parse(mut self) -> ParseResult<Expression> {
        let expr = self.parse_expr()?;

        if let Some(found) = self.next_token().cloned() {
            Err(ParseError::UnexpectedToken {
                found,
                expected: "end of input".to_string(),
            })
        } else {
            Ok(expr)
        }
    }
}

fn classify(token: String, span: Span) -> ParseResult<Atom> {
    token_to_atom(&token).ok_or(ParseError::InvalidAtom { token, span })
}

// Helper function to lex and parse a string directly (useful for tests and REPL)
pub fn parse_str(input: &str) -> ParseResult<Expression> {
    let tokens = crate::lexer::tokenize(input);
    Parser::new(tokens).parse()
}
