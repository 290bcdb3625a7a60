//! Jutsu source code parser
//!
//! This module transforms Jutsu source text into an Abstract Syntax Tree (AST):
//! - [`lexer`]: Tokenization (source text → tokens)
//! - [`parse`]: Parsing (tokens → AST), split across `statements`,
//!   `declarations` and `expressions`
//! - [`ast`]: AST node definitions
//!
//! # Language
//!
//! - Statements end at a newline; newlines inside brackets are ignored
//! - Assignment `x = e` and augmented assignment `x += e` (also `-= *= /= //= **=`)
//! - Function definitions `jutsu name(a, b) { ... }`
//! - `if cond { ... }`, `release e` (return), `print e`
//! - Expressions: `or`, `and`, `!`, comparisons, `+ - * / // %`, unary `-`,
//!   `**`, calls, integer/string/boolean literals
//! - `#` line comments
//!
//! # Parser Implementation
//!
//! Hand-written recursive descent parser with cursor backtracking for
//! statements and a layered precedence cascade for expressions.
//! No external parser generator dependencies.

pub mod ast;
mod declarations;
mod expressions;
pub mod lexer;
pub mod parse;
mod statements;

use thiserror::Error;

pub use ast::{Node, NodeKind, SourceLocation};
pub use lexer::{LexError, Lexer, Token, TokenKind};
pub use parse::{ParseError, Parser};

/// Failure of either front-end stage.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SyntaxError {
    #[error(transparent)]
    Lex(#[from] LexError),

    #[error(transparent)]
    Parse(#[from] ParseError),
}

impl SyntaxError {
    pub fn line(&self) -> usize {
        match self {
            SyntaxError::Lex(err) => err.location().line,
            SyntaxError::Parse(err) => err.line(),
        }
    }
}

/// Lex and parse `source` into a `Program` node.
pub fn parse_source(source: &str) -> Result<Node, SyntaxError> {
    let mut parser = Parser::from_source(source)?;
    Ok(parser.parse()?)
}
