//! Comparison operators and their SQL rendering rules.
//!
//! The set of operators is closed: every keyword the lexer recognizes maps to
//! exactly one [`Operator`], and every operator has one static
//! [`OperationMeta`] describing its arity and how it renders.

use std::fmt;

/// Comparison operator keywords.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operator {
    /// `lt` (`<`).
    Lt,
    /// `lte` (`<=`).
    Lte,
    /// `eq` (`=`).
    Eq,
    /// `gte` (`>=`).
    Gte,
    /// `gt` (`>`).
    Gt,
    /// `ne` (`<>`).
    Ne,
    /// `in` (`IN (...)`), any number of values.
    In,
    /// `between` (`BETWEEN ? AND ?`), exactly two values.
    Between,
}

/// SQL shape an operator renders into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderTemplate {
    /// `<symbol> ?`
    Scalar(&'static str),
    /// `<keyword> (?, ?, ...)`
    List(&'static str),
    /// `<keyword> ? AND ?`
    Range(&'static str),
}

/// Rendering rule and arity class of an operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OperationMeta {
    /// How the operator renders.
    pub template: RenderTemplate,
    /// Whether the operator takes a collection of values.
    pub is_multi_value: bool,
    /// Exact number of values required, when fixed.
    pub multi_value_limit: Option<usize>,
}

impl OperationMeta {
    const fn scalar(symbol: &'static str) -> Self {
        Self {
            template: RenderTemplate::Scalar(symbol),
            is_multi_value: false,
            multi_value_limit: None,
        }
    }

    /// Render the operator with `placeholders` value slots.
    ///
    /// Callers check [`OperationMeta::accepts`] first; scalar and range
    /// templates ignore the count.
    #[must_use]
    pub fn render(&self, placeholders: usize) -> String {
        match self.template {
            RenderTemplate::Scalar(symbol) => format!("{symbol} ?"),
            RenderTemplate::List(keyword) => {
                let slots = vec!["?"; placeholders];
                format!("{keyword} ({})", slots.join(", "))
            }
            RenderTemplate::Range(keyword) => format!("{keyword} ? AND ?"),
        }
    }

    /// Whether `count` values satisfy this operator's arity.
    #[must_use]
    pub fn accepts(&self, count: usize) -> bool {
        match (self.is_multi_value, self.multi_value_limit) {
            (false, _) => count == 1,
            (true, Some(limit)) => count == limit,
            (true, None) => count >= 1,
        }
    }
}

static LT: OperationMeta = OperationMeta::scalar("<");
static LTE: OperationMeta = OperationMeta::scalar("<=");
static EQ: OperationMeta = OperationMeta::scalar("=");
static GTE: OperationMeta = OperationMeta::scalar(">=");
static GT: OperationMeta = OperationMeta::scalar(">");
static NE: OperationMeta = OperationMeta::scalar("<>");
static IN: OperationMeta = OperationMeta {
    template: RenderTemplate::List("IN"),
    is_multi_value: true,
    multi_value_limit: None,
};
static BETWEEN: OperationMeta = OperationMeta {
    template: RenderTemplate::Range("BETWEEN"),
    is_multi_value: true,
    multi_value_limit: Some(2),
};

impl Operator {
    /// Every registered operator.
    pub const ALL: [Self; 8] = [
        Self::Lt,
        Self::Lte,
        Self::Eq,
        Self::Gte,
        Self::Gt,
        Self::Ne,
        Self::In,
        Self::Between,
    ];

    /// Resolve an operator keyword, ignoring ASCII case.
    #[must_use]
    pub fn from_keyword(word: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|op| op.keyword().eq_ignore_ascii_case(word))
    }

    /// The keyword spelling used in filter expressions.
    #[must_use]
    pub const fn keyword(self) -> &'static str {
        match self {
            Self::Lt => "lt",
            Self::Lte => "lte",
            Self::Eq => "eq",
            Self::Gte => "gte",
            Self::Gt => "gt",
            Self::Ne => "ne",
            Self::In => "in",
            Self::Between => "between",
        }
    }

    /// Static metadata for this operator.
    #[must_use]
    pub fn meta(self) -> &'static OperationMeta {
        match self {
            Self::Lt => &LT,
            Self::Lte => &LTE,
            Self::Eq => &EQ,
            Self::Gte => &GTE,
            Self::Gt => &GT,
            Self::Ne => &NE,
            Self::In => &IN,
            Self::Between => &BETWEEN,
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}
