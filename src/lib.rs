//! # Introduction
//!
//! minic is the front end of a small C-like language: a tokenizer that turns
//! source text into positioned tokens and a recursive descent parser that
//! builds a typed abstract syntax tree from them.
//!
//! ## Pipeline
//!
//! ```text
//! Source → Lexer → Tokens → TokenCursor → Parser → AST
//! ```
//!
//! 1. [`parser::lexer`]: ordered regex rules classify the source into
//!    [`parser::Token`]s, skipping whitespace, comments and `#` lines.
//! 2. [`parser::cursor`]: a forward-only reader the parser pulls from.
//! 3. [`parser::parse`]: the grammar engine; fails on the first
//!    [`parser::SyntaxError`].
//! 4. [`parser::ast`]: the resulting [`parser::Program`], printable as an
//!    s-expression and serializable with serde.
//!
//! ```
//! let program = minic::parser::parse_source("int main() { return 1 + 2 * 3; }").unwrap();
//! assert_eq!(
//!     program.to_string(),
//!     "(program (function int main (block (return (+ 1 (* 2 3))))))"
//! );
//! ```

pub mod parser;
