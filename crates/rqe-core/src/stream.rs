//! Forward-only token cursor with bounded lookahead.

use crate::token::Token;

/// Tokens of one filter expression plus its end-of-input marker.
///
/// Reads past the last token yield the end-of-input token, so lookahead never
/// fails; advancement is forward-only.
#[derive(Debug, Clone)]
pub struct TokenStream {
    tokens: Vec<Token>,
    eof: Token,
    pos: usize,
}

impl TokenStream {
    /// Build a stream from lexed tokens and the trailing end-of-input token.
    #[must_use]
    pub fn new(tokens: Vec<Token>, eof: Token) -> Self {
        Self {
            tokens,
            eof,
            pos: 0,
        }
    }

    /// All tokens, excluding the end-of-input marker.
    #[must_use]
    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    /// The end-of-input marker.
    #[must_use]
    pub fn eof(&self) -> &Token {
        &self.eof
    }

    /// Number of tokens, excluding the end-of-input marker.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    /// Whether the input held no tokens at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Index of the current token.
    #[must_use]
    pub fn index(&self) -> usize {
        self.pos
    }

    /// The token under the cursor.
    #[must_use]
    pub fn current(&self) -> &Token {
        self.peek_nth(0)
    }

    /// The token right after the cursor.
    #[must_use]
    pub fn peek(&self) -> &Token {
        self.peek_nth(1)
    }

    /// The token `n` places after the cursor (`0` is the current token).
    #[must_use]
    pub fn peek_nth(&self, n: usize) -> &Token {
        self.tokens.get(self.pos + n).unwrap_or(&self.eof)
    }

    /// The token right before the cursor, if any.
    #[must_use]
    pub fn previous(&self) -> Option<&Token> {
        self.pos.checked_sub(1).and_then(|i| self.tokens.get(i))
    }

    /// Move the cursor one token forward.
    pub fn advance(&mut self) {
        self.advance_by(1);
    }

    /// Move the cursor `n` tokens forward, stopping at end of input.
    pub fn advance_by(&mut self, n: usize) {
        self.pos = (self.pos + n).min(self.tokens.len());
    }

    /// Whether the cursor has reached end of input.
    #[must_use]
    pub fn is_at_end(&self) -> bool {
        self.pos >= self.tokens.len()
    }
}
