//! minic source parser
//!
//! This module transforms minic source text into an Abstract Syntax Tree (AST):
//! - [`lexer`]: Tokenization (source text → tokens)
//! - [`cursor`]: Single-pass token reader used by the parser
//! - [`parse`]: Parsing (tokens → AST)
//! - [`ast`]: AST node definitions
//!
//! # Supported Language
//!
//! - Types: `int`, `double`, `str`, each optionally `const`
//! - Top level: variable declarations and parameterless function definitions
//! - Statements: declarations, assignments (`=`, `+=`, `-=`, `*=`, `/=`),
//!   `return`, blocks, `if`/`else`, `while`, `break`, call statements
//! - Expressions: arithmetic including right-associative `^`, comparison,
//!   logical `&&`/`||`, calls, numbers and strings
//! - `#` lines and comments are skipped
//!
//! # Parser Implementation
//!
//! Hand-written recursive descent parser with precedence climbing for binary
//! operators, over a regex-table lexer.

pub mod ast;
pub mod cursor;
mod declarations;
mod expressions;
pub mod lexer;
pub mod parse;
mod statements;

pub use ast::Program;
pub use cursor::TokenCursor;
pub use lexer::{tokenize, LexError, Lexer, Token, TokenKind, TokenValue};
pub use parse::{Error, Found, Parser, SyntaxError, MAX_NESTING_DEPTH};

/// Parse an already tokenized program.
pub fn parse(tokens: Vec<Token>) -> Result<Program, SyntaxError> {
    Parser::new(tokens).parse_program()
}

/// Tokenize and parse `source` in one step.
pub fn parse_source(source: &str) -> Result<Program, Error> {
    let tokens = tokenize(source)?;
    Ok(parse(tokens)?)
}
