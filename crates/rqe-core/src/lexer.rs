//! Lexer for filter expressions.
//!
//! Turns raw filter text into a [`TokenStream`]. Keywords are matched
//! case-insensitively. Malformed string and array literals are terminal errors
//! raised before the compiler sees any token; characters the grammar has no use
//! for become [`TokenKind::Unknown`] tokens so they are reported in source order.

use std::iter::Peekable;
use std::str::CharIndices;

use crate::operator::Operator;
use crate::stream::TokenStream;
use crate::token::{LogicalOp, Position, Token, TokenKind};

/// Errors raised while tokenizing.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LexError {
    /// A quoted string has no closing quote.
    #[error("unterminated string literal at {position}")]
    UnterminatedString {
        /// Where the string starts.
        position: Position,
    },
    /// An array literal has no closing bracket.
    #[error("unterminated array literal at {position}")]
    UnterminatedArray {
        /// Where the array starts.
        position: Position,
    },
    /// A numeric literal does not fit its type.
    #[error("invalid number '{text}' at {position}")]
    InvalidNumber {
        /// The literal text.
        text: String,
        /// Where the number starts.
        position: Position,
    },
}

impl LexError {
    /// Where the offending literal starts.
    #[must_use]
    pub fn position(&self) -> Position {
        match self {
            Self::UnterminatedString { position }
            | Self::UnterminatedArray { position }
            | Self::InvalidNumber { position, .. } => *position,
        }
    }
}

/// Tokenize a filter expression.
///
/// # Errors
///
/// Returns `LexError` for unterminated strings or arrays and out-of-range numbers.
pub fn tokenize(input: &str) -> Result<TokenStream, LexError> {
    Lexer::new(input).tokenize()
}

struct Lexer<'a> {
    src: &'a str,
    chars: Peekable<CharIndices<'a>>,
    line: u32,
    line_start: usize,
}

impl<'a> Lexer<'a> {
    fn new(src: &'a str) -> Self {
        Self {
            src,
            chars: src.char_indices().peekable(),
            line: 1,
            line_start: 0,
        }
    }

    fn tokenize(&mut self) -> Result<TokenStream, LexError> {
        let mut tokens = Vec::new();
        loop {
            let tok = self.next_token()?;
            if tok.is_eof() {
                return Ok(TokenStream::new(tokens, tok));
            }
            tokens.push(tok);
        }
    }

    fn position_at(&self, idx: usize) -> Position {
        let offset = u32::try_from(idx - self.line_start).unwrap_or(u32::MAX);
        Position::new(self.line, offset)
    }

    /// Byte index of the next unread character.
    fn cursor(&mut self) -> usize {
        self.chars.peek().map_or(self.src.len(), |&(i, _)| i)
    }

    fn rest(&mut self) -> &'a str {
        let idx = self.cursor();
        &self.src[idx..]
    }

    fn bump(&mut self) -> Option<char> {
        let (idx, c) = self.chars.next()?;
        if c == '\n' {
            self.line = self.line.saturating_add(1);
            self.line_start = idx + 1;
        }
        Some(c)
    }

    fn bump_while(&mut self, pred: impl Fn(char) -> bool) {
        while self.chars.peek().is_some_and(|&(_, c)| pred(c)) {
            self.bump();
        }
    }

    fn next_token(&mut self) -> Result<Token, LexError> {
        self.bump_while(char::is_whitespace);

        let Some(&(start, ch)) = self.chars.peek() else {
            let position = self.position_at(self.src.len());
            return Ok(Token::new(TokenKind::Eof, "", position));
        };
        let position = self.position_at(start);

        let kind = match ch {
            '(' => {
                self.bump();
                TokenKind::ParenOpen
            }
            ')' => {
                self.bump();
                TokenKind::ParenClose
            }
            '"' | '\'' => self.read_string(ch, position)?,
            '[' => self.read_array(start, position)?,
            '-' if self.src[start + 1..].starts_with(|c: char| c.is_ascii_digit()) => {
                self.read_number(start, position)?
            }
            c if c.is_ascii_digit() => self.read_number(start, position)?,
            c if is_ident_start(c) => self.read_word(start),
            _ => {
                self.bump_while(is_unknown);
                let end = self.cursor();
                TokenKind::Unknown(self.src[start..end].to_owned())
            }
        };

        let end = self.cursor();
        Ok(Token::new(kind, &self.src[start..end], position))
    }

    fn read_string(&mut self, quote: char, position: Position) -> Result<TokenKind, LexError> {
        self.bump(); // opening quote
        let mut value = String::new();
        loop {
            match self.bump() {
                None => return Err(LexError::UnterminatedString { position }),
                Some('\\') => match self.bump() {
                    Some(c @ ('"' | '\'' | '\\')) => value.push(c),
                    Some(c) => {
                        value.push('\\');
                        value.push(c);
                    }
                    None => return Err(LexError::UnterminatedString { position }),
                },
                Some(c) if c == quote => return Ok(TokenKind::Str(value)),
                Some(c) => value.push(c),
            }
        }
    }

    fn read_array(&mut self, start: usize, position: Position) -> Result<TokenKind, LexError> {
        let mut depth = 0usize;
        let mut quote: Option<char> = None;
        loop {
            let Some(c) = self.bump() else {
                return Err(LexError::UnterminatedArray { position });
            };
            match quote {
                Some(q) => {
                    if c == '\\' {
                        self.bump();
                    } else if c == q {
                        quote = None;
                    }
                }
                None => match c {
                    '"' | '\'' => quote = Some(c),
                    '[' => depth += 1,
                    ']' => {
                        depth -= 1;
                        if depth == 0 {
                            break;
                        }
                    }
                    _ => {}
                },
            }
        }
        let end = self.cursor();
        Ok(TokenKind::Array(self.src[start..end].to_owned()))
    }

    fn read_number(&mut self, start: usize, position: Position) -> Result<TokenKind, LexError> {
        if self.chars.peek().is_some_and(|&(_, c)| c == '-') {
            self.bump();
        }
        self.bump_while(|c| c.is_ascii_digit());

        let mut is_float = false;
        let rest = self.rest();
        if rest.starts_with('.') && rest[1..].starts_with(|c: char| c.is_ascii_digit()) {
            is_float = true;
            self.bump();
            self.bump_while(|c| c.is_ascii_digit());
        }

        let rest = self.rest();
        if rest.starts_with(['e', 'E']) {
            let exp = &rest[1..];
            let digits = exp.strip_prefix(['+', '-']).unwrap_or(exp);
            if digits.starts_with(|c: char| c.is_ascii_digit()) {
                is_float = true;
                self.bump(); // 'e'
                if digits.len() < exp.len() {
                    self.bump(); // sign
                }
                self.bump_while(|c| c.is_ascii_digit());
            }
        }

        let src = self.src;
        let text = &src[start..self.cursor()];
        let invalid = || LexError::InvalidNumber {
            text: text.to_owned(),
            position,
        };
        if is_float {
            text.parse::<f64>()
                .ok()
                .filter(|n| n.is_finite())
                .map(TokenKind::Float)
                .ok_or_else(invalid)
        } else {
            text.parse::<i64>()
                .map(TokenKind::Integer)
                .map_err(|_| invalid())
        }
    }

    fn read_word(&mut self, start: usize) -> TokenKind {
        self.bump_while(is_ident_continue);
        let src = self.src;
        let word = &src[start..self.cursor()];

        if let Some(op) = Operator::from_keyword(word) {
            return TokenKind::Operator(op);
        }
        if let Some(op) = LogicalOp::from_keyword(word) {
            return TokenKind::Logical(op);
        }
        if self.rest().trim_start().starts_with('(') {
            TokenKind::Macro(word.to_owned())
        } else {
            TokenKind::Identifier(word.to_owned())
        }
    }
}

/// Returns `true` if `c` can start an identifier.
fn is_ident_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_'
}

/// Returns `true` if `c` can continue an identifier.
fn is_ident_continue(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

/// Characters swallowed into a single [`TokenKind::Unknown`] run.
fn is_unknown(c: char) -> bool {
    !(c.is_whitespace() || is_ident_continue(c) || matches!(c, '(' | ')' | '"' | '\'' | '['))
}
