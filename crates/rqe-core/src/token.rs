//! Token and source position types produced by the lexer.

use std::fmt;

use crate::operator::Operator;

/// Location of a token in the filter source.
///
/// `line` is 1-based, `offset` is the 0-based byte offset within that line.
/// A `line` of zero marks a position that could not be attributed to a token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct Position {
    /// 1-based line number.
    pub line: u32,
    /// 0-based byte offset from the start of the line.
    pub offset: u32,
}

impl Position {
    /// Sentinel for errors without a natural token position.
    pub const UNKNOWN: Self = Self { line: 0, offset: 0 };

    /// Create a position.
    #[must_use]
    pub const fn new(line: u32, offset: u32) -> Self {
        Self { line, offset }
    }

    /// Whether this position points at real source text.
    #[must_use]
    pub const fn is_known(&self) -> bool {
        self.line != 0
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_known() {
            write!(f, "line {}, offset {}", self.line, self.offset)
        } else {
            f.write_str("unknown position")
        }
    }
}

/// Logical connectives joining clauses and groups.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LogicalOp {
    /// `and`
    And,
    /// `or`
    Or,
}

impl LogicalOp {
    /// Resolve a logical keyword, ignoring ASCII case.
    #[must_use]
    pub fn from_keyword(word: &str) -> Option<Self> {
        if word.eq_ignore_ascii_case("and") {
            Some(Self::And)
        } else if word.eq_ignore_ascii_case("or") {
            Some(Self::Or)
        } else {
            None
        }
    }
}

impl fmt::Display for LogicalOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::And => f.write_str("AND"),
            Self::Or => f.write_str("OR"),
        }
    }
}

/// Token classification with its decoded payload.
#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    /// A bare word in column position.
    Identifier(String),
    /// A comparison keyword such as `eq` or `between`.
    Operator(Operator),
    /// `and` / `or`.
    Logical(LogicalOp),
    /// `(`
    ParenOpen,
    /// `)`
    ParenClose,
    /// A quoted string with quotes stripped and escapes resolved.
    Str(String),
    /// A bracketed array literal, kept as raw JSON text.
    Array(String),
    /// An integer literal.
    Integer(i64),
    /// A floating point literal.
    Float(f64),
    /// A word directly followed by `(`, naming a macro call.
    Macro(String),
    /// A run of characters the grammar has no use for.
    Unknown(String),
    /// End of input.
    Eof,
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Identifier(s) => write!(f, "identifier '{s}'"),
            Self::Operator(op) => write!(f, "operator '{op}'"),
            Self::Logical(op) => write!(f, "logical operator '{op}'"),
            Self::ParenOpen => f.write_str("'('"),
            Self::ParenClose => f.write_str("')'"),
            Self::Str(s) => write!(f, "string \"{s}\""),
            Self::Array(raw) => write!(f, "array {raw}"),
            Self::Integer(n) => write!(f, "integer {n}"),
            Self::Float(n) => write!(f, "float {n}"),
            Self::Macro(name) => write!(f, "macro '{name}'"),
            Self::Unknown(s) => write!(f, "'{s}'"),
            Self::Eof => f.write_str("end of input"),
        }
    }
}

/// A classified slice of the filter source.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    /// Classification and decoded payload.
    pub kind: TokenKind,
    /// The literal source text of the token.
    pub text: String,
    /// Where the token starts.
    pub position: Position,
}

impl Token {
    /// Create a token.
    #[must_use]
    pub fn new(kind: TokenKind, text: impl Into<String>, position: Position) -> Self {
        Self {
            kind,
            text: text.into(),
            position,
        }
    }

    /// Whether the token is `and` / `or`.
    #[must_use]
    pub fn is_logical(&self) -> bool {
        matches!(self.kind, TokenKind::Logical(_))
    }

    /// Whether the token is the end-of-input marker.
    #[must_use]
    pub fn is_eof(&self) -> bool {
        matches!(self.kind, TokenKind::Eof)
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.kind, f)
    }
}
