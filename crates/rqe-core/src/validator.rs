//! Column whitelisting.

use std::collections::HashSet;

/// Decides whether an identifier may be used as a column.
///
/// Implemented for every `Fn(&str) -> bool`. Implementations that consult an
/// external source report failures through `Err`, which the compiler surfaces
/// as [`CompileError::Collaborator`](crate::CompileError::Collaborator).
pub trait ColumnValidator {
    /// Whether `column` is an allowed column name.
    fn validate(&self, column: &str) -> anyhow::Result<bool>;
}

impl<F> ColumnValidator for F
where
    F: Fn(&str) -> bool,
{
    fn validate(&self, column: &str) -> anyhow::Result<bool> {
        Ok(self(column))
    }
}

/// A fixed set of allowed column names.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AllowedColumns(HashSet<String>);

impl AllowedColumns {
    /// Build a whitelist from column names.
    #[must_use]
    pub fn new<I, S>(columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(columns.into_iter().map(Into::into).collect())
    }

    /// Whether `column` is on the list.
    #[must_use]
    pub fn contains(&self, column: &str) -> bool {
        self.0.contains(column)
    }

    /// Number of allowed columns.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the list is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<S: Into<String>> FromIterator<S> for AllowedColumns {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self::new(iter)
    }
}

impl ColumnValidator for AllowedColumns {
    fn validate(&self, column: &str) -> anyhow::Result<bool> {
        Ok(self.contains(column))
    }
}
