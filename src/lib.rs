//! # Introduction
//!
//! Jutsu is a small scripting language. This crate is its front end: it
//! turns source text into a token stream and the token stream into an
//! abstract syntax tree, validating syntax and shape along the way.
//!
//! ## Pipeline
//!
//! ```text
//! Source → Lexer → Tokens → Parser → AST
//! ```
//!
//! 1. [`parser::lexer`]: tokenises the source. Newlines are statement
//!    terminators except inside brackets.
//! 2. [`parser::parse`]: recursive descent with backtracking for statements
//!    and a precedence cascade for expressions.
//! 3. [`parser::ast`]: the uniform [`parser::Node`] tree, with a pre-order
//!    iterator and an indented dump.
//!
//! ```
//! use jutsu::parser::{parse_source, NodeKind};
//!
//! let program = parse_source("x += 1\n").unwrap();
//! assert_eq!(program.children[0].kind, NodeKind::AssignStmt);
//! ```
//!
//! Evaluation is out of scope; consumers walk the returned tree.

pub mod parser;

/// Version reported by the driver.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
