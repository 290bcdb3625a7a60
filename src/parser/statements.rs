//! Statement parsing implementation
//!
//! # Grammar
//!
//! ```text
//! statement   ::= function_def | if_stmt | return_stmt | print_stmt
//!               | assignment | expression
//! assignment  ::= NAME ('=' | '+=' | '-=' | '*=' | '/=' | '//=' | '**=') expression
//! if_stmt     ::= 'if' expression body
//! body        ::= '{' (statement NEWLINE?)* '}'
//! return_stmt ::= 'release' expression
//! print_stmt  ::= 'print' expression
//! ```
//!
//! Keyword-led statements commit on their keyword. Assignment and expression
//! statements are tried speculatively, assignment first.
//!
//! All parsing methods are implemented as `pub(crate)` methods on the [`Parser`] struct.

use crate::parser::ast::*;
use crate::parser::lexer::TokenKind;
use crate::parser::parse::{Alternative, ParseResult, Parser};

/// Operator an augmented assignment applies, `None` for plain `=`.
fn augmented_operator(kind: TokenKind) -> Option<&'static str> {
    match kind {
        TokenKind::PlusEq => Some("+"),
        TokenKind::MinusEq => Some("-"),
        TokenKind::StarEq => Some("*"),
        TokenKind::SlashEq => Some("/"),
        TokenKind::SlashSlashEq => Some("//"),
        TokenKind::StarStarEq => Some("**"),
        _ => None,
    }
}

impl Parser {
    /// Parse a statement. Returns `None` for a blank line or at the end of a
    /// body, leaving the newline or closing brace for the caller.
    pub(crate) fn parse_statement(&mut self) -> ParseResult<Option<Node>> {
        let statement = match self.peek_kind() {
            TokenKind::Newline | TokenKind::Eof | TokenKind::RBrace => return Ok(None),
            TokenKind::Jutsu => self.parse_function_definition()?,
            TokenKind::If => self.parse_if_statement()?,
            TokenKind::Release => self.parse_return_statement()?,
            TokenKind::Print => self.parse_print_statement()?,
            _ => self.first_match(
                "statement",
                &[
                    Parser::parse_assignment as Alternative,
                    Parser::parse_expression_statement as Alternative,
                ],
            )?,
        };
        Ok(Some(statement))
    }

    /// Parse assignment, desugaring `x op= e` into `x = x op e`
    fn parse_assignment(&mut self) -> ParseResult<Node> {
        let target = self.expect_name()?;

        let kind = self.peek_kind();
        let augmented = augmented_operator(kind);
        if kind != TokenKind::Eq && augmented.is_none() {
            return Err(self.unexpected(TokenKind::Eq));
        }
        self.advance();

        let value = match augmented {
            None => self.parse_expression()?,
            Some(op) => Node::binary(op, Node::variable(target.as_str()), self.parse_disjunction()?),
        };

        Ok(Node::assign(Node::variable(target), value))
    }

    fn parse_expression_statement(&mut self) -> ParseResult<Node> {
        self.parse_expression()
    }

    /// Parse if statement. The body child is left out when it is empty.
    fn parse_if_statement(&mut self) -> ParseResult<Node> {
        self.expect(TokenKind::If)?;
        let condition = self.parse_expression()?;
        let body = self.parse_body()?;

        let mut node = Node::new(NodeKind::IfStmt).with_child(condition);
        if !body.children.is_empty() {
            node.push(body);
        }
        Ok(node)
    }

    /// Parse a braced statement list
    pub(crate) fn parse_body(&mut self) -> ParseResult<Node> {
        self.expect(TokenKind::LBrace)?;

        self.body_depth += 1;
        let statements = self.parse_body_statements();
        self.body_depth -= 1;
        let statements = statements?;

        self.expect(TokenKind::RBrace)?;
        Ok(Node::body(statements))
    }

    /// Parse statements up to (not including) the closing brace
    fn parse_body_statements(&mut self) -> ParseResult<Vec<Node>> {
        let mut statements = Vec::new();

        while !self.check(TokenKind::RBrace) && !self.is_at_end() {
            if let Some(statement) = self.parse_statement()? {
                statements.push(statement);
            }
            self.accept(&[TokenKind::Newline]);
        }

        Ok(statements)
    }

    fn parse_return_statement(&mut self) -> ParseResult<Node> {
        self.expect(TokenKind::Release)?;
        let value = self.parse_expression()?;
        Ok(Node::new(NodeKind::ReturnStmt).with_child(value))
    }

    /// `print e` is a call to the built-in `print` with one argument
    fn parse_print_statement(&mut self) -> ParseResult<Node> {
        self.expect(TokenKind::Print)?;
        let value = self.parse_expression()?;
        Ok(Node::call("print", vec![value]))
    }
}
