//! Statement parsing implementation
//!
//! This module handles parsing of all statement types:
//!
//! - Variable declarations: `int x = 42;`
//! - Assignments: `x = 1;` and `x += 1;`
//! - Control flow: `if`, `if`/`else`, `while`, `break`
//! - `return` statements and `{ ... }` blocks
//! - Function call statements: `printf("%g", x);`
//! - Expression statements: `a + b;`
//!
//! # Grammar
//!
//! ```text
//! statement ::= declaration | assignment | compound_assignment | return_stmt
//!             | block | if_stmt | while_stmt | break_stmt
//!             | func_call_stmt | expr_stmt
//! block     ::= "{" statement+ "}"
//! if_stmt   ::= "if" "(" expression ")" statement ["else" statement]
//! ```
//!
//! An `else` always belongs to the innermost `if` still waiting for one:
//! the nested `parse_if_statement` call sees the `else` first and takes it.
//!
//! A statement made of a single factor (`f(x);`, `x;`, `(a + b);`) is only
//! accepted when that factor is a call.

use crate::parser::ast::*;
use crate::parser::lexer::TokenKind;
use crate::parser::parse::{Parser, SyntaxError};

impl Parser {
    /// Parse a braced block: { statement+ }
    pub(crate) fn parse_block(&mut self) -> Result<Block, SyntaxError> {
        let location = self.current_location();
        self.expect_token(TokenKind::LBrace, "Expected '{' to open block")?;

        if self.check(TokenKind::RBrace) {
            return Err(self.error("Expected statement in block"));
        }

        let mut statements = Vec::new();
        while !self.check(TokenKind::RBrace) {
            statements.push(self.parse_statement()?);
        }

        self.expect_token(TokenKind::RBrace, "Expected '}' after block")?;

        Ok(Block {
            statements,
            location,
        })
    }

    /// Parse a statement
    pub(crate) fn parse_statement(&mut self) -> Result<Stmt, SyntaxError> {
        self.nested("Statement nested too deeply", Self::parse_statement_inner)
    }

    fn parse_statement_inner(&mut self) -> Result<Stmt, SyntaxError> {
        let loc = self.current_location();

        if self.is_type_keyword() {
            return Ok(Stmt::Declaration(self.parse_declaration()?));
        }

        match self.cursor.peek_kind() {
            None => return Err(self.error("Expected statement")),
            Some(TokenKind::Return) => return self.parse_return_statement(),
            Some(TokenKind::If) => return self.parse_if_statement(),
            Some(TokenKind::While) => return self.parse_while_statement(),
            Some(TokenKind::LBrace) => return Ok(Stmt::Block(self.parse_block()?)),
            Some(TokenKind::Break) => {
                self.advance();
                self.expect_semicolon("after 'break'")?;
                return Ok(Stmt::Break { location: loc });
            }
            Some(TokenKind::Identifier) => {
                if let Some(stmt) = self.try_parse_assignment()? {
                    return Ok(stmt);
                }
            }
            _ => {}
        }

        self.parse_expression_statement()
    }

    /// Parse `name = value;` or `name op= value;` if the next two tokens start one
    fn try_parse_assignment(&mut self) -> Result<Option<Stmt>, SyntaxError> {
        let compound_op = if self.check_ahead(1, TokenKind::Assign) {
            None
        } else if self.check_ahead(1, TokenKind::AddAssign) {
            Some(AssignOp::Add)
        } else if self.check_ahead(1, TokenKind::SubAssign) {
            Some(AssignOp::Sub)
        } else if self.check_ahead(1, TokenKind::MulAssign) {
            Some(AssignOp::Mul)
        } else if self.check_ahead(1, TokenKind::DivAssign) {
            Some(AssignOp::Div)
        } else {
            return Ok(None);
        };

        let (name, location) = self.expect_identifier("in assignment")?;
        self.advance(); // consume the assignment operator
        let value = self.parse_expression()?;
        self.expect_semicolon("after assignment")?;

        let stmt = match compound_op {
            None => Stmt::Assign {
                name,
                value,
                location,
            },
            Some(op) => Stmt::CompoundAssign {
                name,
                op,
                value,
                location,
            },
        };
        Ok(Some(stmt))
    }

    /// Parse a function call statement or an expression statement
    fn parse_expression_statement(&mut self) -> Result<Stmt, SyntaxError> {
        let first = self.parse_factor()?;

        if self.check(TokenKind::Terminator) {
            return match first {
                Expr::Call(call) => {
                    self.advance();
                    Ok(Stmt::FuncCall(call))
                }
                _ => Err(self.error("Expected a function call")),
            };
        }

        let expr = self.parse_binary_rest(first, 0)?;
        self.expect_semicolon("after expression")?;
        Ok(Stmt::ExprStmt(expr))
    }

    /// Parse return statement
    fn parse_return_statement(&mut self) -> Result<Stmt, SyntaxError> {
        let location = self.current_location();
        self.expect_token(TokenKind::Return, "Expected 'return'")?;

        let value = self.parse_expression()?;
        self.expect_semicolon("after return value")?;

        Ok(Stmt::Return { value, location })
    }

    /// Parse if statement, with optional else branch
    fn parse_if_statement(&mut self) -> Result<Stmt, SyntaxError> {
        let location = self.current_location();
        self.expect_token(TokenKind::If, "Expected 'if'")?;

        self.expect_lparen("after 'if'")?;
        let condition = self.parse_expression()?;
        self.expect_rparen("after if condition")?;

        let then_branch = Box::new(self.parse_statement()?);

        if self.match_token(TokenKind::Else) {
            let else_branch = Box::new(self.parse_statement()?);
            return Ok(Stmt::IfElse {
                condition,
                then_branch,
                else_branch,
                location,
            });
        }

        Ok(Stmt::If {
            condition,
            then_branch,
            location,
        })
    }

    /// Parse while statement
    fn parse_while_statement(&mut self) -> Result<Stmt, SyntaxError> {
        let location = self.current_location();
        self.expect_token(TokenKind::While, "Expected 'while'")?;

        self.expect_lparen("after 'while'")?;
        let condition = self.parse_expression()?;
        self.expect_rparen("after while condition")?;

        let body = Box::new(self.parse_statement()?);

        Ok(Stmt::While {
            condition,
            body,
            location,
        })
    }
}

#[cfg(test)]
mod tests {
    use crate::parser::ast::*;
    use crate::parser::lexer::TokenKind;
    use crate::parser::parse::{Parser, SyntaxError};

    fn parse_body(body: &str) -> Result<Vec<Stmt>, SyntaxError> {
        let source = format!("int main() {{ {} }}", body);
        let program = Parser::from_source(&source).unwrap().parse_program()?;
        match program.items.into_iter().next() {
            Some(Item::Function(func)) => Ok(func.body.statements),
            other => panic!("Expected function, got {:?}", other),
        }
    }

    #[test]
    fn test_assignment() {
        let stmts = parse_body("x = 1 + 2;").unwrap();
        assert_eq!(stmts[0].to_string(), "(assign x (+ 1 2))");
    }

    #[test]
    fn test_compound_assignment() {
        let stmts = parse_body("x += 2; y /= x;").unwrap();
        match &stmts[0] {
            Stmt::CompoundAssign { name, op, .. } => {
                assert_eq!(name, "x");
                assert_eq!(*op, AssignOp::Add);
            }
            other => panic!("Expected compound assignment, got {:?}", other),
        }
        assert_eq!(stmts[1].to_string(), "(assign/= y x)");
    }

    #[test]
    fn test_equality_is_not_assignment() {
        let stmts = parse_body("x == 1;").unwrap();
        assert!(matches!(stmts[0], Stmt::ExprStmt(_)));
    }

    #[test]
    fn test_dangling_else_binds_inner_if() {
        let stmts = parse_body("if (a) if (b) x = 1; else x = 2; return 0;").unwrap();

        match &stmts[0] {
            Stmt::If { then_branch, .. } => {
                assert!(matches!(**then_branch, Stmt::IfElse { .. }));
            }
            other => panic!("Expected outer if without else, got {:?}", other),
        }
    }

    #[test]
    fn test_else_if_chain() {
        let stmts = parse_body("if (a) { x = 1; } else if (b) { x = 2; } else { x = 3; }").unwrap();
        assert_eq!(
            stmts[0].to_string(),
            "(if a (block (assign x 1)) (if b (block (assign x 2)) (block (assign x 3))))"
        );
    }

    #[test]
    fn test_while_with_break() {
        let stmts = parse_body("while (i < 10) { i += 1; break; }").unwrap();
        assert_eq!(
            stmts[0].to_string(),
            "(while (< i 10) (block (assign+= i 1) (break)))"
        );
    }

    #[test]
    fn test_call_statement() {
        let stmts = parse_body("printf(\"%g\", x); foo();").unwrap();
        assert!(matches!(&stmts[0], Stmt::FuncCall(call) if call.callee == "printf" && call.args.len() == 2));
        assert!(matches!(&stmts[1], Stmt::FuncCall(call) if call.callee == "foo" && call.args.is_empty()));
    }

    #[test]
    fn test_call_inside_expression_is_expression_statement() {
        let stmts = parse_body("foo(x) + 1;").unwrap();
        assert!(matches!(stmts[0], Stmt::ExprStmt(Expr::BinOp { .. })));
    }

    #[test]
    fn test_bare_factor_statement_rejected() {
        for body in ["x;", "(a + b);", "5;", "\"text\";"] {
            let err = parse_body(body).unwrap_err();
            assert_eq!(err.message, "Expected a function call", "body: {}", body);
            assert_eq!(err.found_kind(), Some(TokenKind::Terminator));
        }
    }

    #[test]
    fn test_nested_blocks() {
        let stmts = parse_body("{ int y = 2; { y = 3; } }").unwrap();
        assert_eq!(stmts[0].to_string(), "(block (declare int y 2) (block (assign y 3)))");
    }

    #[test]
    fn test_empty_block_rejected() {
        let err = parse_body("if (a) { }").unwrap_err();
        assert_eq!(err.message, "Expected statement in block");
        assert_eq!(err.found_kind(), Some(TokenKind::RBrace));
    }

    #[test]
    fn test_unclosed_block_reports_end_of_input() {
        let err = Parser::from_source("int main() { return 1;")
            .unwrap()
            .parse_program()
            .unwrap_err();
        assert!(err.is_end_of_input());
    }

    #[test]
    fn test_return_requires_value() {
        let err = parse_body("return;").unwrap_err();
        assert_eq!(err.found_kind(), Some(TokenKind::Terminator));
    }
}
