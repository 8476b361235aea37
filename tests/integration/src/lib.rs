//! End-to-end tests for the rqe filter compiler.
//!
//! Each module drives the public API the way an application would: a column
//! whitelist for a `users` table, the default compiler, and a compiler pinned
//! to a fixed clock for timestamp macros.
//!
//! ```text
//! cargo test -p rqe-integration
//! ```

use std::sync::{Arc, Once};

use chrono::NaiveDate;
use rqe_core::{AllowedColumns, CompileResult, Compiler, FixedClock, MacroRegistry, ParsedQuery};

static INIT: Once = Once::new();

/// Initialize tracing (once).
fn init_tracing() {
    INIT.call_once(|| {
        tracing_subscriber::fmt()
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
            )
            .with_test_writer()
            .init();
    });
}

/// Columns of the `users` table used throughout the tests.
#[must_use]
pub fn users_columns() -> AllowedColumns {
    AllowedColumns::new([
        "id",
        "name",
        "age",
        "city",
        "status",
        "dob",
        "score",
        "active",
        "created_at",
    ])
}

/// Compile `filter` against the `users` whitelist with the default compiler.
pub fn compile_users(filter: &str) -> CompileResult<ParsedQuery> {
    init_tracing();
    tracing::debug!(filter, "compiling test filter");
    rqe_core::compile(filter, &users_columns())
}

/// A compiler whose macros see `year-month-day 00:00:00` as the current time.
#[must_use]
pub fn compiler_at(year: i32, month: u32, day: u32) -> Compiler {
    init_tracing();
    let now = NaiveDate::from_ymd_opt(year, month, day)
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .unwrap_or_default();
    Compiler::with_macros(MacroRegistry::builtin(
        rqe_core::config::DEFAULT_TIME_FORMAT,
        Arc::new(FixedClock(now)),
    ))
}

mod test_errors;
mod test_injection;
mod test_macros;
mod test_scenarios;
