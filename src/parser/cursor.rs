//! Single-pass reader over a token sequence
//!
//! The grammar engine pulls tokens through a [`TokenCursor`]. There is no
//! rewind: the only lookahead available is [`TokenCursor::peek`] and
//! [`TokenCursor::peek_nth`], and `None` stands in for end of input.

use super::lexer::{Token, TokenKind};

#[derive(Debug, Clone)]
pub struct TokenCursor {
    tokens: Vec<Token>,
    position: usize,
}

impl TokenCursor {
    pub fn new(tokens: Vec<Token>) -> Self {
        Self {
            tokens,
            position: 0,
        }
    }

    /// Consume and return the next token, or `None` once the stream is exhausted.
    #[allow(clippy::should_implement_trait)]
    pub fn next(&mut self) -> Option<&Token> {
        let token = self.tokens.get(self.position)?;
        self.position += 1;
        Some(token)
    }

    pub fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.position)
    }

    /// Look `n` tokens past the next one (`peek_nth(0)` is `peek()`).
    pub fn peek_nth(&self, n: usize) -> Option<&Token> {
        self.tokens.get(self.position + n)
    }

    pub fn peek_kind(&self) -> Option<TokenKind> {
        self.peek().map(|t| t.kind)
    }

    pub fn is_at_end(&self) -> bool {
        self.position >= self.tokens.len()
    }

    /// Line of the final token, used to place end-of-input diagnostics.
    pub fn last_line(&self) -> usize {
        self.tokens.last().map(|t| t.line()).unwrap_or(1)
    }
}
