//! Argument inlining for diagnostics.
//!
//! **Never send the output of this module to a database.** It splices
//! argument values straight into SQL text, which is exactly the injection
//! surface the compiler exists to close.

use tracing::warn;

use crate::compiler::ParsedQuery;
use crate::value::Value;

/// Replace each `?` in `sql` with the matching argument, in order.
///
/// Strings are single-quoted with embedded quotes doubled. Placeholders
/// beyond the argument list are left as `?`; surplus arguments are ignored.
#[must_use]
pub fn dangerous_inline_args(sql: &str, args: &[Value]) -> String {
    warn!(
        placeholders = sql.matches('?').count(),
        args = args.len(),
        "inlining query arguments into SQL, output is for display only"
    );

    let mut out = String::with_capacity(sql.len() + args.len() * 8);
    let mut args = args.iter();
    for ch in sql.chars() {
        match (ch, args.as_slice().first()) {
            ('?', Some(arg)) => {
                out.push_str(&literal(arg));
                args.next();
            }
            (c, _) => out.push(c),
        }
    }
    out
}

impl ParsedQuery {
    /// The SQL with its arguments inlined. See [`dangerous_inline_args`].
    #[must_use]
    pub fn dangerous_debug_sql(&self) -> String {
        dangerous_inline_args(&self.sql, &self.args)
    }
}

fn literal(value: &Value) -> String {
    match value {
        Value::String(s) => format!("'{}'", s.replace('\'', "''")),
        Value::Bool(true) => "TRUE".to_owned(),
        Value::Bool(false) => "FALSE".to_owned(),
        other => other.to_string(),
    }
}
