//! Expression parsing implementation
//!
//! This module handles parsing of expressions using precedence climbing
//! for binary operators and recursive descent for factors.
//!
//! # Supported Expressions
//!
//! - Literals: numbers and strings
//! - Identifiers
//! - Calls: `name(args)`, where `name` is an identifier or a builtin such
//!   as `printf` or `pow`
//! - Parenthesized expressions
//! - Binary operators, lowest to highest binding:
//!
//! ```text
//! ||                      left
//! &&                      left
//! == !=                   left
//! < <= > >=               left
//! + -                     left
//! * / %                   left
//! ^                       right
//! ```
//!
//! `2 ^ 3 ^ 2` therefore groups as `2 ^ (3 ^ 2)`, while `8 - 4 - 2` groups
//! as `(8 - 4) - 2`.

use crate::parser::ast::*;
use crate::parser::lexer::{TokenKind, TokenValue};
use crate::parser::parse::{Parser, SyntaxError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Assoc {
    Left,
    Right,
}

/// Binding power and associativity of a binary operator token
fn binary_operator(kind: TokenKind) -> Option<(BinOp, u8, Assoc)> {
    let op = match kind {
        TokenKind::Or => (BinOp::Or, 1, Assoc::Left),
        TokenKind::And => (BinOp::And, 2, Assoc::Left),
        TokenKind::Equal => (BinOp::Eq, 3, Assoc::Left),
        TokenKind::NotEqual => (BinOp::Ne, 3, Assoc::Left),
        TokenKind::LessThan => (BinOp::Lt, 4, Assoc::Left),
        TokenKind::LessEqual => (BinOp::Le, 4, Assoc::Left),
        TokenKind::GreaterThan => (BinOp::Gt, 4, Assoc::Left),
        TokenKind::GreaterEqual => (BinOp::Ge, 4, Assoc::Left),
        TokenKind::Plus => (BinOp::Add, 5, Assoc::Left),
        TokenKind::Minus => (BinOp::Sub, 5, Assoc::Left),
        TokenKind::Times => (BinOp::Mul, 6, Assoc::Left),
        TokenKind::Divide => (BinOp::Div, 6, Assoc::Left),
        TokenKind::Modulus => (BinOp::Mod, 6, Assoc::Left),
        TokenKind::Exponent => (BinOp::Pow, 7, Assoc::Right),
        _ => return None,
    };
    Some(op)
}

impl Parser {
    /// Parse expression (top-level entry point)
    pub(crate) fn parse_expression(&mut self) -> Result<Expr, SyntaxError> {
        self.parse_binary(0)
    }

    /// Parse a chain of binary operators binding at least as tightly as `min_prec`
    fn parse_binary(&mut self, min_prec: u8) -> Result<Expr, SyntaxError> {
        self.nested("Expression nested too deeply", |parser| {
            let left = parser.parse_factor()?;
            parser.parse_binary_rest(left, min_prec)
        })
    }

    /// Continue a binary expression whose leftmost factor is already parsed
    pub(crate) fn parse_binary_rest(&mut self, mut left: Expr, min_prec: u8) -> Result<Expr, SyntaxError> {
        while let Some((op, prec, assoc)) = self.cursor.peek_kind().and_then(binary_operator) {
            if prec < min_prec {
                break;
            }

            let location = self.current_location();
            self.advance();

            let next_min = match assoc {
                Assoc::Left => prec + 1,
                Assoc::Right => prec,
            };
            let right = self.parse_binary(next_min)?;

            left = Expr::BinOp {
                op,
                left: Box::new(left),
                right: Box::new(right),
                location,
            };
        }

        Ok(left)
    }

    /// Parse factor (literals, identifiers, calls, parenthesized expressions)
    pub(crate) fn parse_factor(&mut self) -> Result<Expr, SyntaxError> {
        let kind = match self.cursor.peek_kind() {
            Some(kind) => kind,
            None => return Err(self.error("Expected expression")),
        };

        if kind == TokenKind::LParen {
            self.advance();
            let expr = self.parse_expression()?;
            self.expect_rparen("after expression")?;
            return Ok(expr);
        }

        if kind.is_builtin() {
            let token = self.advance().ok_or_else(|| self.error("Expected expression"))?;
            let callee = token.text();
            if !self.check(TokenKind::LParen) {
                return Err(self.error(format!("Expected '(' after '{}'", callee)));
            }
            return self.parse_call(callee, token.location);
        }

        if !matches!(
            kind,
            TokenKind::Number | TokenKind::String | TokenKind::Identifier
        ) {
            return Err(self.error("Expected expression"));
        }

        let token = self.advance().ok_or_else(|| self.error("Expected expression"))?;
        let location = token.location;

        match token.value {
            TokenValue::Number(n) => Ok(Expr::Number(n, location)),
            TokenValue::Str(s) => Ok(Expr::String(s, location)),
            TokenValue::Ident(name) => {
                if self.check(TokenKind::LParen) {
                    self.parse_call(name, location)
                } else {
                    Ok(Expr::Identifier(name, location))
                }
            }
            TokenValue::None => Err(self.error("Expected expression")),
        }
    }

    /// Parse the argument list of a call: "(" [expr ("," expr)*] ")"
    fn parse_call(&mut self, callee: String, location: SourceLocation) -> Result<Expr, SyntaxError> {
        self.expect_lparen("before call arguments")?;

        let mut args = Vec::new();
        if !self.check(TokenKind::RParen) {
            loop {
                args.push(self.parse_expression()?);

                if !self.match_token(TokenKind::Comma) {
                    break;
                }
            }
        }

        self.expect_rparen("after call arguments")?;

        Ok(Expr::Call(Call {
            callee,
            args,
            location,
        }))
    }
}
