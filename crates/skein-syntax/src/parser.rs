//! Recursive descent parser for guard expressions.
//!
//! Grammar, precedence low to high:
//!
//! ```text
//! expr    ::= term ( "OR" term )*
//! term    ::= factor ( "AND" factor )*
//! factor  ::= "NOT" factor | primary
//! primary ::= "TRUE" | "FALSE" | "(" expr ")" | ident "." ident
//! ```
//!
//! Atoms are validated against the assembly the guard is parsed for: naming
//! a machine the assembly does not contain fails the parse. There is no
//! recovering or partial parse.

use crate::ast::Proposition;
use crate::lexer::Lexer;
use crate::token::{Span, Token, TokenKind};
use skein_model::Assembly;
use thiserror::Error;

/// Parse failure, annotated with the offending span.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("unexpected {found} at {span}: expected {expected}")]
    UnexpectedToken {
        expected: String,
        found: String,
        span: Span,
    },
    #[error("unexpected end of input at {span}")]
    UnexpectedEof { span: Span },
    #[error("unmatched '(' at {span}")]
    UnmatchedParen { span: Span },
    #[error("unknown machine '{machine}' at {span}")]
    UnknownMachine { machine: String, span: Span },
}

impl ParseError {
    /// The source span where this error occurred.
    pub fn span(&self) -> Span {
        match self {
            ParseError::UnexpectedToken { span, .. } => *span,
            ParseError::UnexpectedEof { span } => *span,
            ParseError::UnmatchedParen { span } => *span,
            ParseError::UnknownMachine { span, .. } => *span,
        }
    }

    /// Byte position of the error, for single-offset reporting.
    pub fn position(&self) -> usize {
        self.span().start
    }
}

pub type ParseResult<T> = Result<T, ParseError>;

/// Parser over a lexed guard expression.
pub struct Parser<'a> {
    tokens: Vec<Token>,
    pos: usize,
    assembly: &'a Assembly,
}

impl<'a> Parser<'a> {
    /// Create a parser for `source`, validating atoms against `assembly`.
    pub fn new(source: &str, assembly: &'a Assembly) -> Self {
        Self {
            tokens: Lexer::new(source).tokenize(),
            pos: 0,
            assembly,
        }
    }

    /// Parse the whole input as one proposition.
    pub fn parse(mut self) -> ParseResult<Proposition> {
        let prop = self.parse_expr()?;
        let trailing = self.peek();
        if !trailing.is_eof() {
            return Err(ParseError::UnexpectedToken {
                expected: "end of input".to_string(),
                found: describe(trailing),
                span: trailing.span,
            });
        }
        Ok(prop)
    }

    fn parse_expr(&mut self) -> ParseResult<Proposition> {
        let mut left = self.parse_term()?;
        while self.eat(TokenKind::Or) {
            let right = self.parse_term()?;
            left = Proposition::or(left, right);
        }
        Ok(left)
    }

    fn parse_term(&mut self) -> ParseResult<Proposition> {
        let mut left = self.parse_factor()?;
        while self.eat(TokenKind::And) {
            let right = self.parse_factor()?;
            left = Proposition::and(left, right);
        }
        Ok(left)
    }

    fn parse_factor(&mut self) -> ParseResult<Proposition> {
        if self.eat(TokenKind::Not) {
            let inner = self.parse_factor()?;
            return Ok(inner.negate());
        }
        self.parse_primary()
    }

    fn parse_primary(&mut self) -> ParseResult<Proposition> {
        let token = self.peek().clone();
        match token.kind {
            TokenKind::True => {
                self.advance();
                Ok(Proposition::True)
            }
            TokenKind::False => {
                self.advance();
                Ok(Proposition::False)
            }
            TokenKind::LParen => {
                self.advance();
                let inner = self.parse_expr()?;
                if !self.eat(TokenKind::RParen) {
                    return Err(ParseError::UnmatchedParen { span: token.span });
                }
                Ok(inner)
            }
            TokenKind::Ident => self.parse_atom(),
            TokenKind::Eof => Err(ParseError::UnexpectedEof { span: token.span }),
            _ => Err(ParseError::UnexpectedToken {
                expected: "TRUE, FALSE, NOT, '(' or machine.state".to_string(),
                found: describe(&token),
                span: token.span,
            }),
        }
    }

    fn parse_atom(&mut self) -> ParseResult<Proposition> {
        let machine = self.expect_ident("machine identifier")?;
        if !self.assembly.contains_machine(&machine.text) {
            return Err(ParseError::UnknownMachine {
                machine: machine.text,
                span: machine.span,
            });
        }
        self.expect(TokenKind::Dot)?;
        let state = self.expect_ident("state name")?;
        Ok(Proposition::atom(machine.text, state.text))
    }

    fn expect_ident(&mut self, expected: &str) -> ParseResult<Token> {
        let token = self.peek().clone();
        if token.kind == TokenKind::Ident {
            self.advance();
            Ok(token)
        } else if token.is_eof() {
            Err(ParseError::UnexpectedEof { span: token.span })
        } else {
            Err(ParseError::UnexpectedToken {
                expected: expected.to_string(),
                found: describe(&token),
                span: token.span,
            })
        }
    }

    fn expect(&mut self, kind: TokenKind) -> ParseResult<()> {
        let token = self.peek().clone();
        if token.kind == kind {
            self.advance();
            Ok(())
        } else if token.is_eof() {
            Err(ParseError::UnexpectedEof { span: token.span })
        } else {
            Err(ParseError::UnexpectedToken {
                expected: kind.to_string(),
                found: describe(&token),
                span: token.span,
            })
        }
    }

    fn eat(&mut self, kind: TokenKind) -> bool {
        if self.peek().kind == kind {
            self.advance();
            true
        } else {
            false
        }
    }

    fn peek(&self) -> &Token {
        &self.tokens[self.pos]
    }

    fn advance(&mut self) {
        if self.pos + 1 < self.tokens.len() {
            self.pos += 1;
        }
    }
}

fn describe(token: &Token) -> String {
    match token.kind {
        TokenKind::Ident | TokenKind::Unknown => format!("'{}'", token.text),
        kind => kind.to_string(),
    }
}

/// Parse a guard expression against an assembly.
pub fn parse(source: &str, assembly: &Assembly) -> ParseResult<Proposition> {
    Parser::new(source, assembly).parse()
}
