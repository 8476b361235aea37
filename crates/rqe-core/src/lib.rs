//! Compile readable filter expressions into parameterized SQL.
//!
//! A filter such as `age gte 25 and (city eq "NY")` becomes a SQL boolean
//! fragment with `?` placeholders plus the ordered argument list:
//!
//! ```
//! use rqe_core::{AllowedColumns, Value, compile};
//!
//! let columns = AllowedColumns::new(["age", "city"]);
//! let query = compile(r#"age gte 25 and (city eq "NY")"#, &columns).unwrap();
//!
//! assert_eq!(query.sql, "age >= ? AND ( city = ? )");
//! assert_eq!(query.args, vec![Value::Integer(25), Value::from("NY")]);
//! ```
//!
//! Column names are checked against a caller-supplied [`ColumnValidator`]
//! before they reach the output. Values never do.

pub mod config;
pub mod debug;
pub mod error;
pub mod lexer;
pub mod macros;
pub mod operator;
pub mod stream;
pub mod token;
pub mod validator;
pub mod value;

mod compiler;

pub use compiler::{Compiler, ParsedQuery, compile};
pub use config::RqeConfig;
pub use debug::dangerous_inline_args;
pub use error::{CompileError, CompileResult, ParenKind};
pub use macros::{AgeMacro, Clock, FixedClock, Macro, MacroError, MacroRegistry, SystemClock};
pub use operator::Operator;
pub use token::Position;
pub use validator::{AllowedColumns, ColumnValidator};
pub use value::Value;
