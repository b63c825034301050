//! Main parser coordinator
//!
//! This module provides the [`Parser`] struct and core parsing infrastructure,
//! including error types, helper methods, and the main parse entry point.
//!
//! # Parser Architecture
//!
//! The Parser uses a recursive descent approach with the following organization:
//! - This module: Parser struct, helper methods, and coordination
//! - `declarations`: Parsing types, variable declarations and function definitions
//! - `statements`: Parsing statements (if, while, return, blocks, ...)
//! - `expressions`: Parsing expressions with precedence climbing
//!
//! # Implementation
//!
//! Parser methods are split across multiple files using `impl Parser` blocks,
//! allowing each module to extend the Parser with related functionality while
//! maintaining access to the shared parser state. Tokens are pulled through a
//! [`TokenCursor`]; no construct needs more than two tokens of lookahead.

use crate::parser::ast::*;
use crate::parser::cursor::TokenCursor;
use crate::parser::lexer::{LexError, Lexer, Token, TokenKind};
use std::fmt;

/// What the parser was looking at when it gave up
#[derive(Debug, Clone, PartialEq)]
pub enum Found {
    Token(Token),
    EndOfInput { line: usize },
}

impl fmt::Display for Found {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Found::Token(token) => write!(f, "{}", token),
            Found::EndOfInput { .. } => write!(f, "end of input"),
        }
    }
}

/// Parser error type
#[derive(Debug, Clone, PartialEq)]
pub struct SyntaxError {
    pub message: String,
    pub found: Found,
}

impl SyntaxError {
    pub fn line(&self) -> usize {
        match &self.found {
            Found::Token(token) => token.line(),
            Found::EndOfInput { line } => *line,
        }
    }

    pub fn is_end_of_input(&self) -> bool {
        matches!(self.found, Found::EndOfInput { .. })
    }

    /// Kind of the offending token, `None` at end of input
    pub fn found_kind(&self) -> Option<TokenKind> {
        match &self.found {
            Found::Token(token) => Some(token.kind),
            Found::EndOfInput { .. } => None,
        }
    }
}

impl fmt::Display for SyntaxError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.found {
            Found::Token(token) => write!(
                f,
                "Syntax error at line {}, column {}: {}, found {}",
                token.location.line, token.location.column, self.message, token
            ),
            Found::EndOfInput { line } => write!(
                f,
                "Syntax error at end of input (line {}): {}",
                line, self.message
            ),
        }
    }
}

impl std::error::Error for SyntaxError {}

/// Either failure of the tokenize + parse pipeline
#[derive(Debug, Clone, PartialEq)]
pub enum Error {
    Lex(LexError),
    Syntax(SyntaxError),
}

impl Error {
    pub fn line(&self) -> usize {
        match self {
            Error::Lex(err) => err.location.line,
            Error::Syntax(err) => err.line(),
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Lex(err) => write!(f, "{}", err),
            Error::Syntax(err) => write!(f, "{}", err),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Lex(err) => Some(err),
            Error::Syntax(err) => Some(err),
        }
    }
}

impl From<LexError> for Error {
    fn from(err: LexError) -> Self {
        Error::Lex(err)
    }
}

impl From<SyntaxError> for Error {
    fn from(err: SyntaxError) -> Self {
        Error::Syntax(err)
    }
}

/// Deepest combined nesting of statements and subexpressions accepted
pub const MAX_NESTING_DEPTH: usize = 128;

/// Recursive descent parser for minic
pub struct Parser {
    pub(crate) cursor: TokenCursor,
    depth: usize,
}

impl Parser {
    pub fn new(tokens: Vec<Token>) -> Self {
        Self {
            cursor: TokenCursor::new(tokens),
            depth: 0,
        }
    }

    /// Tokenize `source` and prepare a parser over the result.
    pub fn from_source(source: &str) -> Result<Self, LexError> {
        let tokens = Lexer::new(source).tokenize()?;
        Ok(Self::new(tokens))
    }

    /// Parse the entire program: one or more declarations and functions
    pub fn parse_program(&mut self) -> Result<Program, SyntaxError> {
        let mut program = Program::new();

        loop {
            program.items.push(self.parse_top_level_item()?);
            if self.is_at_end() {
                break;
            }
        }

        Ok(program)
    }

    // ===== Helper methods =====

    pub(crate) fn is_type_keyword(&self) -> bool {
        matches!(
            self.cursor.peek_kind(),
            Some(TokenKind::Int | TokenKind::Double | TokenKind::Str | TokenKind::Const)
        )
    }

    /// Run `parse` one nesting level deeper, failing once the input nests
    /// past [`MAX_NESTING_DEPTH`].
    pub(crate) fn nested<T>(
        &mut self,
        message: &str,
        parse: impl FnOnce(&mut Self) -> Result<T, SyntaxError>,
    ) -> Result<T, SyntaxError> {
        if self.depth >= MAX_NESTING_DEPTH {
            return Err(self.error(message));
        }

        self.depth += 1;
        let result = parse(self);
        self.depth -= 1;
        result
    }

    pub(crate) fn check(&self, kind: TokenKind) -> bool {
        self.cursor.peek_kind() == Some(kind)
    }

    pub(crate) fn check_ahead(&self, n: usize, kind: TokenKind) -> bool {
        self.cursor.peek_nth(n).map(|t| t.kind) == Some(kind)
    }

    pub(crate) fn match_token(&mut self, kind: TokenKind) -> bool {
        if self.check(kind) {
            self.cursor.next();
            true
        } else {
            false
        }
    }

    pub(crate) fn advance(&mut self) -> Option<Token> {
        self.cursor.next().cloned()
    }

    pub(crate) fn is_at_end(&self) -> bool {
        self.cursor.is_at_end()
    }

    pub(crate) fn current_location(&self) -> SourceLocation {
        match self.cursor.peek() {
            Some(token) => token.location,
            None => SourceLocation::new(self.cursor.last_line(), 1, 0),
        }
    }

    /// Build an error describing the next token (or end of input).
    pub(crate) fn error(&self, message: impl Into<String>) -> SyntaxError {
        let found = match self.cursor.peek() {
            Some(token) => Found::Token(token.clone()),
            None => Found::EndOfInput {
                line: self.cursor.last_line(),
            },
        };

        SyntaxError {
            message: message.into(),
            found,
        }
    }

    pub(crate) fn expect_token(&mut self, kind: TokenKind, message: &str) -> Result<Token, SyntaxError> {
        if self.check(kind) {
            self.advance().ok_or_else(|| self.error(message))
        } else {
            Err(self.error(message))
        }
    }

    pub(crate) fn expect_lparen(&mut self, ctx: &str) -> Result<Token, SyntaxError> {
        self.expect_token(TokenKind::LParen, &format!("Expected '(' {ctx}"))
    }

    pub(crate) fn expect_rparen(&mut self, ctx: &str) -> Result<Token, SyntaxError> {
        self.expect_token(TokenKind::RParen, &format!("Expected ')' {ctx}"))
    }

    pub(crate) fn expect_semicolon(&mut self, ctx: &str) -> Result<Token, SyntaxError> {
        self.expect_token(TokenKind::Terminator, &format!("Expected ';' {ctx}"))
    }

    pub(crate) fn expect_identifier(&mut self, ctx: &str) -> Result<(String, SourceLocation), SyntaxError> {
        if !self.check(TokenKind::Identifier) {
            return Err(self.error(format!("Expected identifier {ctx}")));
        }

        let token = self
            .advance()
            .ok_or_else(|| self.error(format!("Expected identifier {ctx}")))?;
        let name = token.identifier().unwrap_or_default().to_string();
        Ok((name, token.location))
    }
}
