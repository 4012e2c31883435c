//! Proposition algebra and guard-expression parser for skein.
//!
//! Guards over an assembly are Boolean expressions whose atoms are
//! `machine.state` facts. [`Proposition`] is the closed expression tree;
//! [`parse`] turns user guard text into one, validating machine identifiers
//! against the assembly it is parsed for.

pub mod ast;
pub mod lexer;
pub mod parser;
pub mod token;

pub use ast::Proposition;
pub use lexer::Lexer;
pub use parser::{parse, ParseError, Parser};
pub use token::{Span, Token, TokenKind};
