//! Token types and source span tracking for guard expressions.

use std::fmt;

/// A byte-offset span in the guard text. Guard expressions are single-line,
/// so no line/column bookkeeping is kept.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Span {
    /// Start byte offset (inclusive).
    pub start: usize,
    /// End byte offset (exclusive).
    pub end: usize,
}

impl Span {
    /// Create a new span.
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.start, self.end)
    }
}

/// Kind of a lexed token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    /// `AND`
    And,
    /// `OR`
    Or,
    /// `NOT`
    Not,
    /// `TRUE`
    True,
    /// `FALSE`
    False,
    /// A machine or state identifier.
    Ident,
    /// `.`
    Dot,
    /// `(`
    LParen,
    /// `)`
    RParen,
    /// End of input.
    Eof,
    /// A character the lexer does not recognize; reported by the parser.
    Unknown,
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            TokenKind::And => "AND",
            TokenKind::Or => "OR",
            TokenKind::Not => "NOT",
            TokenKind::True => "TRUE",
            TokenKind::False => "FALSE",
            TokenKind::Ident => "identifier",
            TokenKind::Dot => "'.'",
            TokenKind::LParen => "'('",
            TokenKind::RParen => "')'",
            TokenKind::Eof => "end of input",
            TokenKind::Unknown => "unknown character",
        };
        f.write_str(s)
    }
}

/// A lexed token with its source text and span.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    /// Token kind.
    pub kind: TokenKind,
    /// Source text of the token.
    pub text: String,
    /// Source span.
    pub span: Span,
}

impl Token {
    /// Whether this token marks the end of input.
    pub fn is_eof(&self) -> bool {
        self.kind == TokenKind::Eof
    }
}
