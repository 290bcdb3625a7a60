//! Main parser coordinator
//!
//! This module provides the [`Parser`] struct and core parsing infrastructure,
//! including error types, cursor primitives, backtracking, and the main parse
//! entry point.
//!
//! # Parser Architecture
//!
//! The Parser uses a recursive descent approach with the following organization:
//! - This module: Parser struct, helper methods, and coordination
//! - `declarations`: Parsing `jutsu` function definitions
//! - `statements`: Parsing statements (assignment, if, release, print, ...)
//! - `expressions`: Parsing expressions through the precedence cascade
//!
//! # Backtracking
//!
//! Assignment and expression statements can share an arbitrarily long prefix,
//! so they are tried speculatively through [`Parser::first_match`]: the cursor
//! is saved, an alternative is attempted, and the cursor is restored if the
//! alternative fails. Tokens are never consumed destructively, so restoring
//! the cursor index is all a rollback needs.

use crate::parser::ast::*;
use crate::parser::lexer::{Lexer, Token, TokenKind};
use crate::parser::SyntaxError;
use thiserror::Error;
use tracing::{debug, trace};

/// Parser error type
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// An explicitly required token was not found.
    #[error("Parse error at {location}: expected {expected}, found {found}")]
    UnexpectedToken {
        expected: TokenKind,
        found: String,
        location: SourceLocation,
    },

    /// Every alternative for a statement or expression failed.
    #[error("Parse error at {location}: no valid {context} here, found {found}")]
    NoMatchingAlternative {
        context: &'static str,
        found: String,
        location: SourceLocation,
    },

    /// A definition's parameters are not a comma-separated list of names.
    #[error(
        "Parse error at {location}: invalid argument list for '{name}' \
         ({params} parameter(s), {commas} comma(s))"
    )]
    InvalidArgumentList {
        name: String,
        params: usize,
        commas: usize,
        location: SourceLocation,
    },
}

impl ParseError {
    pub fn location(&self) -> SourceLocation {
        match self {
            ParseError::UnexpectedToken { location, .. }
            | ParseError::NoMatchingAlternative { location, .. }
            | ParseError::InvalidArgumentList { location, .. } => *location,
        }
    }

    /// 1-based line the error was raised on.
    pub fn line(&self) -> usize {
        self.location().line
    }
}

pub type ParseResult<T> = Result<T, ParseError>;

/// A grammar production that may be attempted speculatively.
pub(crate) type Alternative = fn(&mut Parser) -> ParseResult<Node>;

/// Recursive descent parser for Jutsu
pub struct Parser {
    pub(crate) tokens: Vec<Token>,
    pub(crate) position: usize,
    /// Number of `{ ... }` bodies currently being parsed.
    pub(crate) body_depth: usize,
}

impl Parser {
    /// Create a parser over a token stream produced by the lexer.
    pub fn new(mut tokens: Vec<Token>) -> Self {
        if !tokens.last().is_some_and(|t| t.is(TokenKind::Eof)) {
            let location = tokens
                .last()
                .map(|t| t.location)
                .unwrap_or_else(|| SourceLocation::new(1, 1));
            tokens.push(Token::new(TokenKind::Eof, location));
        }
        Self {
            tokens,
            position: 0,
            body_depth: 0,
        }
    }

    /// Lex `source` and create a parser over the resulting tokens.
    pub fn from_source(source: &str) -> Result<Self, SyntaxError> {
        let tokens = Lexer::new(source).tokenize()?;
        Ok(Self::new(tokens))
    }

    /// Parse the entire program.
    ///
    /// Every top-level statement must be followed by a newline unless it is
    /// the last thing in the input. Blank lines produce no node.
    pub fn parse(&mut self) -> ParseResult<Node> {
        let mut statements = Vec::new();

        while !self.is_at_end() {
            if let Some(statement) = self.parse_statement()? {
                statements.push(statement);
            }
            if !self.is_at_end() {
                self.expect(TokenKind::Newline)?;
            }
        }

        debug!(statements = statements.len(), "parsed program");
        Ok(Node::program(statements))
    }

    // ===== Backtracking =====

    /// Try each alternative in order from the same starting position and keep
    /// the first one that both parses and ends on a statement boundary. When
    /// all of them fail, the error points at the furthest token any
    /// alternative reached.
    pub(crate) fn first_match(
        &mut self,
        context: &'static str,
        alternatives: &[Alternative],
    ) -> ParseResult<Node> {
        let start = self.mark();
        let mut furthest = start;

        for alternative in alternatives {
            match alternative(self) {
                Ok(node) if self.at_statement_boundary() => return Ok(node),
                Ok(_) => {
                    trace!(context, found = %self.peek(), "alternative stopped short, backtracking");
                }
                Err(err) => {
                    trace!(context, error = %err, "alternative failed, backtracking");
                }
            }
            furthest = furthest.max(self.position);
            self.reset(start);
        }

        let token = &self.tokens[furthest];
        Err(ParseError::NoMatchingAlternative {
            context,
            found: token.describe(),
            location: token.location,
        })
    }

    /// Whether the next token may follow a complete statement. At top level
    /// only a newline or the end of input may; inside a body, where newlines
    /// are not tokens, so may the closing brace or the start of the next
    /// statement.
    pub(crate) fn at_statement_boundary(&self) -> bool {
        match self.peek_kind() {
            TokenKind::Newline | TokenKind::Eof => true,
            kind if self.body_depth > 0 => matches!(
                kind,
                TokenKind::RBrace
                    | TokenKind::Name
                    | TokenKind::Int
                    | TokenKind::Str
                    | TokenKind::True
                    | TokenKind::False
                    | TokenKind::LParen
                    | TokenKind::Bang
                    | TokenKind::Minus
                    | TokenKind::Jutsu
                    | TokenKind::If
                    | TokenKind::Release
                    | TokenKind::Print
            ),
            _ => false,
        }
    }

    pub(crate) fn mark(&self) -> usize {
        self.position
    }

    pub(crate) fn reset(&mut self, mark: usize) {
        self.position = mark;
    }

    // ===== Helper methods =====

    pub(crate) fn accept(&mut self, kinds: &[TokenKind]) -> Option<TokenKind> {
        let kind = self.peek_kind();
        if kinds.contains(&kind) {
            self.advance();
            Some(kind)
        } else {
            None
        }
    }

    /// Like [`Parser::accept`], returning the operator's source spelling.
    pub(crate) fn accept_operator(&mut self, kinds: &[TokenKind]) -> Option<&'static str> {
        self.accept(kinds).and_then(TokenKind::symbol)
    }

    pub(crate) fn check(&self, kind: TokenKind) -> bool {
        self.peek().is(kind)
    }

    pub(crate) fn advance(&mut self) -> &Token {
        if !self.is_at_end() {
            self.position += 1;
        }
        self.previous()
    }

    pub(crate) fn is_at_end(&self) -> bool {
        self.check(TokenKind::Eof)
    }

    pub(crate) fn peek(&self) -> &Token {
        &self.tokens[self.position]
    }

    pub(crate) fn peek_kind(&self) -> TokenKind {
        self.peek().kind
    }

    pub(crate) fn peek_ahead(&self, n: usize) -> Option<&Token> {
        self.tokens.get(self.position + n)
    }

    pub(crate) fn previous(&self) -> &Token {
        &self.tokens[self.position.saturating_sub(1)]
    }

    pub(crate) fn current_location(&self) -> SourceLocation {
        self.peek().location
    }

    pub(crate) fn expect(&mut self, kind: TokenKind) -> ParseResult<Token> {
        if self.check(kind) {
            Ok(self.advance().clone())
        } else {
            Err(self.unexpected(kind))
        }
    }

    pub(crate) fn expect_name(&mut self) -> ParseResult<String> {
        let token = self.expect(TokenKind::Name)?;
        Ok(token.lexeme.unwrap_or_default())
    }

    pub(crate) fn unexpected(&self, expected: TokenKind) -> ParseError {
        ParseError::UnexpectedToken {
            expected,
            found: self.peek().describe(),
            location: self.current_location(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_simple_program() {
        let mut parser = Parser::from_source("x = 1\nprint x\n").unwrap();
        let program = parser.parse().unwrap();

        assert!(program.is(NodeKind::Program));
        assert_eq!(program.children.len(), 2);
        assert!(program.children[0].is(NodeKind::AssignStmt));
        assert!(program.children[1].is(NodeKind::CallStmt));
    }

    #[test]
    fn test_blank_lines_are_discarded() {
        let mut parser = Parser::from_source("\n\nx\n\n\ny\n").unwrap();
        let program = parser.parse().unwrap();

        assert_eq!(program.children.len(), 2);
    }

    #[test]
    fn test_empty_input() {
        let program = Parser::new(Vec::new()).parse().unwrap();

        assert_eq!(program, Node::program(Vec::new()));
    }

    #[test]
    fn test_mark_and_reset() {
        let mut parser = Parser::from_source("a b c").unwrap();
        let start = parser.mark();
        parser.advance();
        parser.advance();
        assert_eq!(parser.peek().lexeme(), Some("c"));

        parser.reset(start);
        assert_eq!(parser.peek().lexeme(), Some("a"));
    }

    #[test]
    fn test_advance_stops_at_eof() {
        let mut parser = Parser::from_source("a").unwrap();
        parser.advance();
        parser.advance();
        parser.advance();

        assert!(parser.is_at_end());
    }

    #[test]
    fn test_statements_must_end_with_newline() {
        let err = Parser::from_source("x = 1 2").unwrap().parse().unwrap_err();

        match err {
            ParseError::NoMatchingAlternative { found, location, .. } => {
                assert_eq!(found, "integer literal 2");
                assert_eq!(location, SourceLocation::new(1, 7));
            }
            other => panic!("Expected no matching alternative, got {:?}", other),
        }
    }

    #[test]
    fn test_error_reports_line() {
        let err = Parser::from_source("x = 1\ny = 2\n)\n")
            .unwrap()
            .parse()
            .unwrap_err();

        assert!(matches!(
            err,
            ParseError::NoMatchingAlternative {
                context: "statement",
                ..
            }
        ));
        assert_eq!(err.line(), 3);
    }

    #[test]
    fn test_malformed_assignment_reports_right_hand_side() {
        // The missing operand is only noticed at the `)` on line 3
        let err = Parser::from_source("x = (1 +\n\n )\n")
            .unwrap()
            .parse()
            .unwrap_err();

        assert_eq!(
            err,
            ParseError::NoMatchingAlternative {
                context: "statement",
                found: "')'".to_string(),
                location: SourceLocation::new(3, 2),
            }
        );
    }

    #[test]
    fn test_malformed_assignment_in_body_reports_right_hand_side() {
        let err = Parser::from_source("if a {\n  b = c *\n}\n")
            .unwrap()
            .parse()
            .unwrap_err();

        match err {
            ParseError::NoMatchingAlternative { found, location, .. } => {
                assert_eq!(found, "'}'");
                assert_eq!(location.line, 3);
            }
            other => panic!("Expected no matching alternative, got {:?}", other),
        }
    }

    #[test]
    fn test_definition_errors_are_not_rolled_back() {
        let err = Parser::from_source("if a {\n  jutsu f(x,, y) { }\n}\n")
            .unwrap()
            .parse()
            .unwrap_err();

        assert!(matches!(err, ParseError::InvalidArgumentList { .. }));
        assert_eq!(err.line(), 2);
    }
}
