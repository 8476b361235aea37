//! Scalar query arguments and array literal decoding.

use std::fmt;

/// A single query argument bound to a `?` placeholder.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(untagged)]
pub enum Value {
    /// Signed integer.
    Integer(i64),
    /// Floating point number.
    Float(f64),
    /// Boolean (only reachable through array literals).
    Bool(bool),
    /// UTF-8 string.
    String(String),
}

impl Value {
    /// Short type name used in error messages.
    #[must_use]
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Integer(_) => "integer",
            Self::Float(_) => "float",
            Self::Bool(_) => "bool",
            Self::String(_) => "string",
        }
    }

    /// Convert a decoded JSON element; non-scalars and `null` yield `None`.
    #[must_use]
    pub fn from_json(value: serde_json::Value) -> Option<Self> {
        match value {
            serde_json::Value::Bool(b) => Some(Self::Bool(b)),
            serde_json::Value::Number(n) => n
                .as_i64()
                .map(Self::Integer)
                .or_else(|| n.as_f64().map(Self::Float)),
            serde_json::Value::String(s) => Some(Self::String(s)),
            serde_json::Value::Null | serde_json::Value::Array(_) | serde_json::Value::Object(_) => {
                None
            }
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Integer(n) => write!(f, "{n}"),
            Self::Float(n) => write!(f, "{n}"),
            Self::Bool(b) => write!(f, "{b}"),
            Self::String(s) => f.write_str(s),
        }
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Self::Integer(n)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Self::Float(n)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::String(s.to_owned())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Self::String(s)
    }
}

/// Errors produced while decoding an array literal.
#[derive(Debug, thiserror::Error)]
pub enum ArrayError {
    /// The literal is not a JSON list.
    #[error("not a JSON array: {0}")]
    Json(#[from] serde_json::Error),
    /// An element is not a string, number or bool.
    #[error("element {index} is not a scalar value")]
    NonScalar {
        /// Zero-based element index.
        index: usize,
    },
    /// An integer element does not fit a signed 64-bit integer.
    #[error("element {index} is out of integer range")]
    IntegerOverflow {
        /// Zero-based element index.
        index: usize,
    },
}

/// Decode a bracketed array literal into scalar values, preserving order.
///
/// # Errors
///
/// Returns `ArrayError` if the text is not a JSON list, holds a non-scalar, or
/// holds an integer outside the `i64` range.
pub fn decode_array(raw: &str) -> Result<Vec<Value>, ArrayError> {
    let items: Vec<serde_json::Value> = serde_json::from_str(raw)?;
    items
        .into_iter()
        .enumerate()
        .map(|(index, item)| {
            if let serde_json::Value::Number(n) = &item {
                if n.is_u64() && n.as_i64().is_none() {
                    return Err(ArrayError::IntegerOverflow { index });
                }
            }
            Value::from_json(item).ok_or(ArrayError::NonScalar { index })
        })
        .collect()
}
