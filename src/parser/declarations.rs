//! Declaration parsing implementation
//!
//! This module handles parsing of top-level items and variable declarations:
//!
//! - Variable declarations: `int x;` and `const double y = 2.5;`
//! - Function definitions: `int main() { ... }`
//! - Types: `int`, `double`, `str`, each optionally prefixed by `const`
//!
//! # Grammar
//!
//! ```text
//! item        ::= declaration | function
//! function    ::= type identifier "(" ")" block
//! declaration ::= type identifier ";" | type identifier "=" expression ";"
//! type        ::= "int" | "double" | "str" | "const" type
//! ```
//!
//! Functions and declarations share the `type identifier` prefix, so the
//! choice between them is made on the token that follows the name.

use crate::parser::ast::*;
use crate::parser::lexer::TokenKind;
use crate::parser::parse::{Parser, SyntaxError};

impl Parser {
    /// Parse a top-level item (function definition or variable declaration)
    pub(crate) fn parse_top_level_item(&mut self) -> Result<Item, SyntaxError> {
        if !self.is_type_keyword() {
            return Err(self.error("Expected a declaration or function definition"));
        }

        let location = self.current_location();
        let ty = self.parse_type()?;
        let (name, _) = self.expect_identifier("after type")?;

        if self.check(TokenKind::LParen) {
            let function = self.parse_function_rest(ty, name, location)?;
            return Ok(Item::Function(function));
        }

        let declaration = self.parse_declaration_rest(ty, name, location)?;
        Ok(Item::Declaration(declaration))
    }

    /// Parse function definition after `type name`: () { body }
    fn parse_function_rest(
        &mut self,
        return_type: Type,
        name: String,
        location: SourceLocation,
    ) -> Result<FunctionDecl, SyntaxError> {
        self.expect_lparen("after function name")?;
        self.expect_rparen("in function definition")?;

        let body = self.parse_block()?;

        Ok(FunctionDecl {
            return_type,
            name,
            body,
            location,
        })
    }

    /// Parse a variable declaration: type name [= init];
    pub(crate) fn parse_declaration(&mut self) -> Result<Declaration, SyntaxError> {
        let location = self.current_location();
        let ty = self.parse_type()?;
        let (name, _) = self.expect_identifier("after type")?;
        self.parse_declaration_rest(ty, name, location)
    }

    fn parse_declaration_rest(
        &mut self,
        ty: Type,
        name: String,
        location: SourceLocation,
    ) -> Result<Declaration, SyntaxError> {
        if self.match_token(TokenKind::Assign) {
            let value = self.parse_expression()?;
            self.expect_semicolon("after declaration")?;
            return Ok(Declaration::VarDeclAssign {
                ty,
                name,
                value,
                location,
            });
        }

        self.expect_semicolon("after declaration")?;
        Ok(Declaration::VarDecl { ty, name, location })
    }

    /// Parse type: ["const"]* ("int" | "double" | "str")
    pub(crate) fn parse_type(&mut self) -> Result<Type, SyntaxError> {
        if self.match_token(TokenKind::Const) {
            return Ok(self.parse_type()?.with_const());
        }

        let ty = match self.cursor.peek_kind() {
            Some(TokenKind::Int) => Type::Int,
            Some(TokenKind::Double) => Type::Double,
            Some(TokenKind::Str) => Type::Str,
            _ => return Err(self.error("Expected type")),
        };
        self.advance();

        Ok(ty)
    }
}

#[cfg(test)]
mod tests {
    use crate::parser::ast::*;
    use crate::parser::lexer::TokenKind;
    use crate::parser::parse::Parser;

    fn parse_items(source: &str) -> Vec<Item> {
        Parser::from_source(source)
            .unwrap()
            .parse_program()
            .unwrap()
            .items
    }

    #[test]
    fn test_declaration_without_initializer() {
        let items = parse_items("double total;");
        match &items[0] {
            Item::Declaration(Declaration::VarDecl { ty, name, location }) => {
                assert_eq!(ty, &Type::Double);
                assert_eq!(name, "total");
                assert_eq!(location.line, 1);
                assert_eq!(location.column, 1);
            }
            other => panic!("Expected VarDecl, got {:?}", other),
        }
    }

    #[test]
    fn test_nested_const() {
        let items = parse_items("const const str s = \"hi\";");
        match &items[0] {
            Item::Declaration(decl) => {
                assert_eq!(decl.ty(), &Type::Str.with_const().with_const());
                assert_eq!(decl.name(), "s");
            }
            other => panic!("Expected declaration, got {:?}", other),
        }
    }

    #[test]
    fn test_char_is_not_a_declarable_type() {
        let err = Parser::from_source("char c;")
            .unwrap()
            .parse_program()
            .unwrap_err();
        assert_eq!(err.found_kind(), Some(TokenKind::Char));
    }

    #[test]
    fn test_function_requires_empty_parameter_list() {
        let err = Parser::from_source("int f(int a) { return a; }")
            .unwrap()
            .parse_program()
            .unwrap_err();
        assert_eq!(err.message, "Expected ')' in function definition");
    }

    #[test]
    fn test_function_body_must_be_block() {
        let err = Parser::from_source("int f() return 1;")
            .unwrap()
            .parse_program()
            .unwrap_err();
        assert_eq!(err.found_kind(), Some(TokenKind::Return));
    }
}
