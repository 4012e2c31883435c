//! Lexer for guard expressions.

use crate::token::{Span, Token, TokenKind};

/// Hand-written lexer over guard text. Identifiers are alphanumeric plus
/// underscore; the keywords `AND`, `OR`, `NOT`, `TRUE`, `FALSE` are matched
/// case-sensitively against whole identifiers.
pub struct Lexer<'a> {
    source: &'a str,
    pos: usize,
}

impl<'a> Lexer<'a> {
    /// Create a new lexer for the given source text.
    pub fn new(source: &'a str) -> Self {
        Self { source, pos: 0 }
    }

    /// Tokenize the entire source, returning all tokens including EOF.
    pub fn tokenize(mut self) -> Vec<Token> {
        let mut tokens = Vec::new();
        loop {
            let token = self.next_token();
            let is_eof = token.is_eof();
            tokens.push(token);
            if is_eof {
                break;
            }
        }
        tokens
    }

    fn peek(&self) -> Option<char> {
        self.source[self.pos..].chars().next()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    fn skip_whitespace(&mut self) {
        while self.peek().is_some_and(char::is_whitespace) {
            self.bump();
        }
    }

    fn next_token(&mut self) -> Token {
        self.skip_whitespace();
        let start = self.pos;

        let Some(c) = self.peek() else {
            return self.make(TokenKind::Eof, start);
        };

        if is_ident_char(c) {
            while self.peek().is_some_and(is_ident_char) {
                self.bump();
            }
            let kind = match &self.source[start..self.pos] {
                "AND" => TokenKind::And,
                "OR" => TokenKind::Or,
                "NOT" => TokenKind::Not,
                "TRUE" => TokenKind::True,
                "FALSE" => TokenKind::False,
                _ => TokenKind::Ident,
            };
            return self.make(kind, start);
        }

        self.bump();
        let kind = match c {
            '.' => TokenKind::Dot,
            '(' => TokenKind::LParen,
            ')' => TokenKind::RParen,
            _ => TokenKind::Unknown,
        };
        self.make(kind, start)
    }

    fn make(&self, kind: TokenKind, start: usize) -> Token {
        Token {
            kind,
            text: self.source[start..self.pos].to_string(),
            span: Span::new(start, self.pos),
        }
    }
}

fn is_ident_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}
