//! Named value transforms applied before values become query arguments.
//!
//! A macro call such as `dob lte age(18)` hands the decoded argument to the
//! registered [`Macro`], whose output replaces it. Registries are built once
//! and only read afterwards.

use std::collections::HashMap;
use std::fmt::{self, Write as _};
use std::sync::Arc;

use chrono::{Local, Months, NaiveDateTime};

use crate::value::Value;

/// Errors reported by macro transforms.
#[derive(Debug, thiserror::Error)]
pub enum MacroError {
    /// The value cannot be read as a whole number.
    #[error("{value} of type {kind} cannot be used as a whole number")]
    NotAnInteger {
        /// Rendered value.
        value: String,
        /// Value type name.
        kind: &'static str,
    },
    /// The computed date falls outside the supported calendar range.
    #[error("{years} years is out of range")]
    OutOfRange {
        /// Requested year count.
        years: i64,
    },
    /// The configured timestamp format could not be rendered.
    #[error("invalid timestamp format '{format}'")]
    Format {
        /// The offending chrono format string.
        format: String,
    },
    /// Failure reported by a custom macro.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// A value transform registered under a macro name.
pub trait Macro: Send + Sync + fmt::Debug {
    /// Transform the decoded values of a macro call for `column`.
    fn transform(&self, column: &str, values: Vec<Value>) -> Result<Vec<Value>, MacroError>;
}

/// Source of the current local time.
pub trait Clock: Send + Sync + fmt::Debug {
    /// The current wall-clock time.
    fn now(&self) -> NaiveDateTime;
}

/// Reads the host's local clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        Local::now().naive_local()
    }
}

/// Always reports the same instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub NaiveDateTime);

impl Clock for FixedClock {
    fn now(&self) -> NaiveDateTime {
        self.0
    }
}

/// `age(N)`: the timestamp exactly `N` years before now.
///
/// Subtraction works in calendar months, so Feb 29 clamps to Feb 28 in
/// non-leap target years. Negative counts move forward in time.
#[derive(Debug, Clone)]
pub struct AgeMacro {
    format: String,
    clock: Arc<dyn Clock>,
}

impl AgeMacro {
    /// Registry name of the macro.
    pub const NAME: &'static str = "age";

    /// Create the macro with a chrono format string and a clock.
    #[must_use]
    pub fn new(format: impl Into<String>, clock: Arc<dyn Clock>) -> Self {
        Self {
            format: format.into(),
            clock,
        }
    }

    fn years_before(now: NaiveDateTime, years: i64) -> Option<NaiveDateTime> {
        let months = Months::new(u32::try_from(years.unsigned_abs().checked_mul(12)?).ok()?);
        if years >= 0 {
            now.checked_sub_months(months)
        } else {
            now.checked_add_months(months)
        }
    }

    fn render(&self, at: NaiveDateTime) -> Result<String, MacroError> {
        let mut out = String::new();
        write!(out, "{}", at.format(&self.format)).map_err(|_| MacroError::Format {
            format: self.format.clone(),
        })?;
        Ok(out)
    }
}

impl Macro for AgeMacro {
    fn transform(&self, _column: &str, values: Vec<Value>) -> Result<Vec<Value>, MacroError> {
        let now = self.clock.now();
        values
            .into_iter()
            .map(|value| {
                let years = whole_number(&value)?;
                let at = Self::years_before(now, years).ok_or(MacroError::OutOfRange { years })?;
                self.render(at).map(Value::String)
            })
            .collect()
    }
}

/// Read an integer, or a float with no fractional part, as `i64`.
#[allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)]
fn whole_number(value: &Value) -> Result<i64, MacroError> {
    match value {
        Value::Integer(n) => Ok(*n),
        Value::Float(f) if f.fract() == 0.0 && f.abs() < i64::MAX as f64 => Ok(*f as i64),
        other => Err(MacroError::NotAnInteger {
            value: other.to_string(),
            kind: other.type_name(),
        }),
    }
}

/// Macro handlers keyed by lower-cased name.
#[derive(Debug, Clone, Default)]
pub struct MacroRegistry {
    handlers: HashMap<String, Arc<dyn Macro>>,
}

impl MacroRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with the built-in macros, rendering timestamps with `time_format`.
    #[must_use]
    pub fn builtin(time_format: &str, clock: Arc<dyn Clock>) -> Self {
        Self::new().with_macro(AgeMacro::NAME, AgeMacro::new(time_format, clock))
    }

    /// Register `handler` under `name`, replacing any previous handler.
    #[must_use]
    pub fn with_macro(mut self, name: &str, handler: impl Macro + 'static) -> Self {
        self.handlers
            .insert(name.to_ascii_lowercase(), Arc::new(handler));
        self
    }

    /// Look up a handler, ignoring ASCII case.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Arc<dyn Macro>> {
        self.handlers.get(&name.to_ascii_lowercase())
    }

    /// Registered names, sorted.
    #[must_use]
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.handlers.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Number of registered macros.
    #[must_use]
    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    /// Whether no macro is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}
