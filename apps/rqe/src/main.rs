//! rqe: compile a filter expression to parameterized SQL.
//!
//! ```text
//! rqe [--columns a,b,c] [--inline] <filter>
//! ```
//!
//! Prints the compiled query as JSON on stdout. Logs go to stderr.
//!
//! # Environment
//!
//! | Variable          | Default               | Description                              |
//! |-------------------|-----------------------|------------------------------------------|
//! | `RQE_COLUMNS`     | (unset)               | Comma-separated column whitelist         |
//! | `RQE_TIME_FORMAT` | `%Y-%m-%d %H:%M:%S`   | chrono format for timestamp macros       |
//! | `LOG_LEVEL`       | `info`                | Log filter when `RUST_LOG` is not set    |
//! | `RUST_LOG`        | (unset)               | Full tracing filter directive            |

use anyhow::{Context, Result, bail};
use rqe_core::config::parse_columns;
use rqe_core::{AllowedColumns, ColumnValidator, Compiler, RqeConfig};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

const USAGE: &str = "usage: rqe [--columns a,b,c] [--inline] <filter>";

/// Parsed command line.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Command {
    Help,
    Compile(CompileArgs),
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct CompileArgs {
    columns: Option<Vec<String>>,
    inline: bool,
    filter: String,
}

/// Parse arguments (without the program name).
///
/// Positional arguments are joined with spaces, so an unquoted filter works.
fn parse_args<I>(args: I) -> Result<Command>
where
    I: IntoIterator<Item = String>,
{
    let mut columns = None;
    let mut inline = false;
    let mut filter: Vec<String> = Vec::new();

    let mut args = args.into_iter();
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "-h" | "--help" => return Ok(Command::Help),
            "--inline" => inline = true,
            "--columns" => {
                let raw = args.next().context("--columns requires a value")?;
                columns = parse_columns(&raw);
            }
            "--" => {
                filter.extend(args.by_ref());
            }
            other => {
                if let Some(raw) = other.strip_prefix("--columns=") {
                    columns = parse_columns(raw);
                } else if other.starts_with("--") {
                    bail!("unknown option '{other}'\n{USAGE}");
                } else {
                    filter.push(other.to_owned());
                }
            }
        }
    }

    if filter.is_empty() {
        bail!("missing filter expression\n{USAGE}");
    }

    Ok(Command::Compile(CompileArgs {
        columns,
        inline,
        filter: filter.join(" "),
    }))
}

/// Initialize the tracing subscriber, writing to stderr.
///
/// `RUST_LOG` takes precedence over the configured level.
fn init_tracing(log_level: &str) -> Result<()> {
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else {
        EnvFilter::try_new(log_level)
            .with_context(|| format!("invalid log level filter: {log_level}"))?
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    Ok(())
}

fn build_validator(columns: Option<Vec<String>>) -> Box<dyn ColumnValidator> {
    match columns {
        Some(columns) => {
            info!(count = columns.len(), "using column whitelist");
            Box::new(AllowedColumns::new(columns))
        }
        None => {
            warn!("no column whitelist given, every identifier is accepted as a column");
            Box::new(|_: &str| true)
        }
    }
}

fn main() -> Result<()> {
    let config = RqeConfig::from_env();
    init_tracing(&config.log_level)?;

    let args = match parse_args(std::env::args().skip(1))? {
        Command::Help => {
            println!("{USAGE}");
            return Ok(());
        }
        Command::Compile(args) => args,
    };

    let validator = build_validator(args.columns.or_else(|| config.columns.clone()));
    let compiler = Compiler::new(&config);
    let query = compiler
        .compile(&args.filter, validator.as_ref())
        .with_context(|| format!("failed to compile filter: {}", args.filter))?;

    if args.inline {
        eprintln!("{}", query.dangerous_debug_sql());
    }
    println!("{}", serde_json::to_string_pretty(&query)?);

    Ok(())
}
