//! Error model for filter compilation.

use std::fmt;

use crate::lexer::LexError;
use crate::macros::MacroError;
use crate::token::Position;

/// Which half of a parenthesis pair is missing its partner.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParenKind {
    /// A `(` was never closed.
    Opening,
    /// A `)` has no matching `(`.
    Closing,
}

impl fmt::Display for ParenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Opening => f.write_str("opening"),
            Self::Closing => f.write_str("closing"),
        }
    }
}

/// Errors produced while compiling a filter expression.
///
/// Every variant is terminal for the compile call that raised it.
#[derive(Debug, thiserror::Error)]
pub enum CompileError {
    /// The column validator rejected an identifier.
    #[error("invalid column '{column}' at {position}")]
    InvalidColumn {
        /// The rejected column name.
        column: String,
        /// Where the column appears.
        position: Position,
    },

    /// A token is not valid in its grammar position.
    #[error("unexpected {found} at {position}, expected {expected}")]
    UnexpectedToken {
        /// What the grammar allows here.
        expected: String,
        /// What was found.
        found: String,
        /// Where it was found.
        position: Position,
    },

    /// An operator is not followed by a usable value.
    #[error("expected a valid value for column '{column}' at {position}")]
    MissingValue {
        /// Column of the incomplete clause.
        column: String,
        /// Where the value should have been.
        position: Position,
    },

    /// Unknown operator keyword or a value count the operator cannot take.
    #[error("invalid operation '{operation}' for column '{column}' at {position}")]
    InvalidOperation {
        /// The operator and what was wrong with it.
        operation: String,
        /// Column of the clause.
        column: String,
        /// Where the operator or value appears.
        position: Position,
    },

    /// Parentheses do not balance.
    #[error("unmatched {kind} parenthesis at {position}")]
    UnmatchedParenthesis {
        /// Which half is unmatched.
        kind: ParenKind,
        /// Location of the stray `)`, or [`Position::UNKNOWN`] for an unclosed `(`.
        position: Position,
    },

    /// `and` / `or` at either end, next to another logical keyword, or before `)`.
    #[error("misplaced logical operator '{operator}' at {position}: {reason}")]
    MisplacedLogicalOperator {
        /// The keyword as written.
        operator: String,
        /// Why it is misplaced.
        reason: &'static str,
        /// Where the keyword appears.
        position: Position,
    },

    /// A macro call names no registered macro.
    #[error("macro '{name}' is not implemented (column '{column}') at {position}")]
    MacroNotImplemented {
        /// The macro name as written.
        name: String,
        /// Column of the clause.
        column: String,
        /// Where the macro call starts.
        position: Position,
    },

    /// A macro rejected its argument.
    #[error("invalid value for macro '{name}' on column '{column}' at {position}: {source}")]
    InvalidMacroValue {
        /// The macro name as written.
        name: String,
        /// Column of the clause.
        column: String,
        /// Where the macro argument appears.
        position: Position,
        /// What the macro reported.
        source: MacroError,
    },

    /// The column validator itself failed.
    #[error("column validator failed for '{column}' at {position}")]
    Collaborator {
        /// The column being validated.
        column: String,
        /// Where the column appears.
        position: Position,
        /// The validator's error.
        source: anyhow::Error,
    },
}

impl CompileError {
    /// Where the error was detected.
    #[must_use]
    pub fn position(&self) -> Position {
        match self {
            Self::InvalidColumn { position, .. }
            | Self::UnexpectedToken { position, .. }
            | Self::MissingValue { position, .. }
            | Self::InvalidOperation { position, .. }
            | Self::UnmatchedParenthesis { position, .. }
            | Self::MisplacedLogicalOperator { position, .. }
            | Self::MacroNotImplemented { position, .. }
            | Self::InvalidMacroValue { position, .. }
            | Self::Collaborator { position, .. } => *position,
        }
    }

    /// The column the error concerns, when it concerns one.
    #[must_use]
    pub fn column(&self) -> Option<&str> {
        match self {
            Self::InvalidColumn { column, .. }
            | Self::MissingValue { column, .. }
            | Self::InvalidOperation { column, .. }
            | Self::MacroNotImplemented { column, .. }
            | Self::InvalidMacroValue { column, .. }
            | Self::Collaborator { column, .. } => Some(column),
            Self::UnexpectedToken { .. }
            | Self::UnmatchedParenthesis { .. }
            | Self::MisplacedLogicalOperator { .. } => None,
        }
    }
}

impl From<LexError> for CompileError {
    fn from(e: LexError) -> Self {
        let (expected, found) = match &e {
            LexError::UnterminatedString { .. } => ("closing quote", "unterminated string"),
            LexError::UnterminatedArray { .. } => ("closing ']'", "unterminated array"),
            LexError::InvalidNumber { .. } => ("a number in range", "invalid number"),
        };
        let found = match &e {
            LexError::InvalidNumber { text, .. } => format!("{found} '{text}'"),
            _ => found.to_owned(),
        };
        Self::UnexpectedToken {
            expected: expected.to_owned(),
            found,
            position: e.position(),
        }
    }
}

/// Convenience result type for compilation.
pub type CompileResult<T> = Result<T, CompileError>;
