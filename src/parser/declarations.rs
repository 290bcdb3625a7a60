//! Function definition parsing
//!
//! ```text
//! function_def ::= 'jutsu' NAME '(' (NAME (',' NAME)*)? ')' body
//! ```
//!
//! A definition becomes a `VarDecl` node named after the function, holding one
//! `Variable` per parameter followed by the `Body`.

use crate::parser::ast::*;
use crate::parser::lexer::TokenKind;
use crate::parser::parse::{ParseError, ParseResult, Parser};

impl Parser {
    /// Parse function definition: jutsu name(params) { body }
    pub(crate) fn parse_function_definition(&mut self) -> ParseResult<Node> {
        self.expect(TokenKind::Jutsu)?;
        let name = self.expect_name()?;

        self.expect(TokenKind::LParen)?;
        let params = self.parse_parameter_list(&name)?;
        self.expect(TokenKind::RParen)?;

        let body = self.parse_body()?;

        let mut decl = Node::with_value(NodeKind::VarDecl, name);
        for param in params {
            decl.push(Node::variable(param));
        }
        decl.push(body);
        Ok(decl)
    }

    /// Parse parameter names up to (not including) the closing parenthesis.
    ///
    /// Names and commas are collected as they come and validated afterwards:
    /// they must alternate, starting with a name, and there must be exactly
    /// one comma fewer than names.
    fn parse_parameter_list(&mut self, name: &str) -> ParseResult<Vec<String>> {
        let location = self.current_location();
        let mut params = Vec::new();
        let mut commas = 0;
        let mut alternating = true;

        loop {
            match self.peek_kind() {
                TokenKind::Name => {
                    alternating &= params.len() == commas;
                    params.push(self.expect_name()?);
                }
                TokenKind::Comma => {
                    self.advance();
                    commas += 1;
                    alternating &= commas == params.len();
                }
                _ => break,
            }
        }

        let counts_match = if params.is_empty() {
            commas == 0
        } else {
            commas + 1 == params.len()
        };

        if !alternating || !counts_match {
            return Err(ParseError::InvalidArgumentList {
                name: name.to_string(),
                params: params.len(),
                commas,
                location,
            });
        }

        Ok(params)
    }
}
