//! Expression parsing implementation
//!
//! Precedence is encoded as a cascade of grammar levels, loosest first. Each
//! level calls the next tighter one:
//!
//! ```text
//! expression  ::= disjunction
//! disjunction ::= conjunction ('or' conjunction)*
//! conjunction ::= inversion ('and' inversion)*
//! inversion   ::= '!' inversion | comparison
//! comparison  ::= sum (('==' | '!=' | '<=' | '<' | '>=' | '>') sum)*
//! sum         ::= term (('+' | '-') term)*
//! term        ::= factor (('*' | '/' | '//' | '%') factor)*
//! factor      ::= '-' factor | power
//! power       ::= primary ('**' factor)?
//! primary     ::= NAME '(' (expression (',' expression)*)? ')' | atom
//! atom        ::= INT | STRING | NAME | 'True' | 'False' | '(' expression ')'
//! ```
//!
//! Repeated operators on one level fold to the left, so `a - b - c` is
//! `(a - b) - c`. `power` is the exception: its right operand re-enters at
//! `factor`, which makes `2 ** 3 ** 2` group as `2 ** (3 ** 2)`.
//!
//! All parsing methods are implemented as `pub(crate)` methods on the [`Parser`] struct.

use crate::parser::ast::*;
use crate::parser::lexer::TokenKind;
use crate::parser::parse::{ParseError, ParseResult, Parser};

impl Parser {
    /// Parse expression (top-level entry point). The result is wrapped in an
    /// `Expr` marker node.
    pub(crate) fn parse_expression(&mut self) -> ParseResult<Node> {
        Ok(Node::expr(self.parse_disjunction()?))
    }

    /// Parse logical `or`
    pub(crate) fn parse_disjunction(&mut self) -> ParseResult<Node> {
        let mut left = self.parse_conjunction()?;

        while let Some(op) = self.accept_operator(&[TokenKind::Or]) {
            let right = self.parse_conjunction()?;
            left = Node::binary(op, left, right);
        }

        Ok(left)
    }

    /// Parse logical `and`
    fn parse_conjunction(&mut self) -> ParseResult<Node> {
        let mut left = self.parse_inversion()?;

        while let Some(op) = self.accept_operator(&[TokenKind::And]) {
            let right = self.parse_inversion()?;
            left = Node::binary(op, left, right);
        }

        Ok(left)
    }

    /// Parse prefix `!`
    fn parse_inversion(&mut self) -> ParseResult<Node> {
        if let Some(op) = self.accept_operator(&[TokenKind::Bang]) {
            let operand = self.parse_inversion()?;
            return Ok(Node::unary(op, operand));
        }

        self.parse_comparison()
    }

    /// Parse comparison (== != <= < >= >)
    fn parse_comparison(&mut self) -> ParseResult<Node> {
        let mut left = self.parse_sum()?;

        while let Some(op) = self.accept_operator(&[
            TokenKind::EqEq,
            TokenKind::NotEq,
            TokenKind::Le,
            TokenKind::Lt,
            TokenKind::Ge,
            TokenKind::Gt,
        ]) {
            let right = self.parse_sum()?;
            left = Node::binary(op, left, right);
        }

        Ok(left)
    }

    /// Parse additive (+ -)
    fn parse_sum(&mut self) -> ParseResult<Node> {
        let mut left = self.parse_term()?;

        while let Some(op) = self.accept_operator(&[TokenKind::Plus, TokenKind::Minus]) {
            let right = self.parse_term()?;
            left = Node::binary(op, left, right);
        }

        Ok(left)
    }

    /// Parse multiplicative (* / // %)
    fn parse_term(&mut self) -> ParseResult<Node> {
        let mut left = self.parse_factor()?;

        while let Some(op) = self.accept_operator(&[
            TokenKind::Star,
            TokenKind::Slash,
            TokenKind::SlashSlash,
            TokenKind::Percent,
        ]) {
            let right = self.parse_factor()?;
            left = Node::binary(op, left, right);
        }

        Ok(left)
    }

    /// Parse unary minus
    fn parse_factor(&mut self) -> ParseResult<Node> {
        if let Some(op) = self.accept_operator(&[TokenKind::Minus]) {
            let operand = self.parse_factor()?;
            return Ok(Node::unary(op, operand));
        }

        self.parse_power()
    }

    /// Parse `**` (right-associative)
    fn parse_power(&mut self) -> ParseResult<Node> {
        let base = self.parse_primary()?;

        if let Some(op) = self.accept_operator(&[TokenKind::StarStar]) {
            let exponent = self.parse_factor()?;
            return Ok(Node::binary(op, base, exponent));
        }

        Ok(base)
    }

    /// Parse a call or fall through to an atom
    fn parse_primary(&mut self) -> ParseResult<Node> {
        let is_call = self.check(TokenKind::Name)
            && self
                .peek_ahead(1)
                .is_some_and(|t| t.is(TokenKind::LParen));

        if is_call {
            return self.parse_call();
        }

        self.parse_atom()
    }

    /// Parse call: name(arg, arg, ...)
    fn parse_call(&mut self) -> ParseResult<Node> {
        let callee = self.expect_name()?;
        self.expect(TokenKind::LParen)?;

        let mut args = Vec::new();
        if !self.check(TokenKind::RParen) {
            loop {
                args.push(self.parse_expression()?);
                if self.accept(&[TokenKind::Comma]).is_none() {
                    break;
                }
            }
        }

        self.expect(TokenKind::RParen)?;
        Ok(Node::call(callee, args))
    }

    /// Parse literal, name, or parenthesized expression
    fn parse_atom(&mut self) -> ParseResult<Node> {
        let token = self.peek().clone();

        let node = match token.kind {
            TokenKind::Int => Node::integer(token.lexeme.unwrap_or_default()),
            TokenKind::Str => Node::string(token.lexeme.unwrap_or_default()),
            TokenKind::Name => Node::variable(token.lexeme.unwrap_or_default()),
            TokenKind::True => Node::boolean(true),
            TokenKind::False => Node::boolean(false),
            TokenKind::LParen => {
                self.advance();
                let inner = self.parse_expression()?;
                self.expect(TokenKind::RParen)?;
                return Ok(inner);
            }
            _ => {
                return Err(ParseError::NoMatchingAlternative {
                    context: "expression",
                    found: token.describe(),
                    location: token.location,
                });
            }
        };

        self.advance();
        Ok(node)
    }
}
