//! Single-pass compiler from filter expressions to parameterized SQL.
//!
//! The compiler walks the token stream once, left to right, with at most four
//! tokens of lookahead (for macro calls). Every value becomes a `?` placeholder
//! plus an entry in the argument list; no value text is ever copied into the
//! SQL output.

use std::sync::{Arc, LazyLock};

use tracing::{debug, trace};

use crate::config::RqeConfig;
use crate::error::{CompileError, CompileResult, ParenKind};
use crate::lexer;
use crate::macros::{MacroRegistry, SystemClock};
use crate::operator::Operator;
use crate::stream::TokenStream;
use crate::token::{Position, Token, TokenKind};
use crate::validator::ColumnValidator;
use crate::value::{self, Value};

/// Compiled SQL fragment and its positional arguments.
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ParsedQuery {
    /// SQL boolean expression with `?` placeholders.
    pub sql: String,
    /// Arguments in placeholder order.
    pub args: Vec<Value>,
}

impl ParsedQuery {
    /// Number of `?` placeholders in the SQL text.
    #[must_use]
    pub fn placeholder_count(&self) -> usize {
        self.sql.matches('?').count()
    }

    /// Whether the filter was empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sql.is_empty()
    }
}

static DEFAULT_COMPILER: LazyLock<Compiler> = LazyLock::new(Compiler::default);

/// Compile `filter` with the process-wide default compiler.
///
/// # Errors
///
/// Returns `CompileError` describing the first problem found, with its position.
pub fn compile<V>(filter: &str, validator: &V) -> CompileResult<ParsedQuery>
where
    V: ColumnValidator + ?Sized,
{
    DEFAULT_COMPILER.compile(filter, validator)
}

/// Filter expression compiler.
///
/// Holds only read-only registries, so one instance can serve concurrent calls.
#[derive(Debug, Clone)]
pub struct Compiler {
    macros: MacroRegistry,
}

impl Default for Compiler {
    fn default() -> Self {
        Self::new(&RqeConfig::default())
    }
}

impl Compiler {
    /// Create a compiler with the built-in macros on the system clock.
    #[must_use]
    pub fn new(config: &RqeConfig) -> Self {
        Self::with_macros(MacroRegistry::builtin(
            &config.time_format,
            Arc::new(SystemClock),
        ))
    }

    /// Create a compiler with a custom macro registry.
    #[must_use]
    pub fn with_macros(macros: MacroRegistry) -> Self {
        Self { macros }
    }

    /// The macros this compiler expands.
    #[must_use]
    pub fn macros(&self) -> &MacroRegistry {
        &self.macros
    }

    /// Compile a filter expression into SQL and arguments.
    ///
    /// `validator` is consulted exactly once per column, before the rest of
    /// its clause is read. Empty input compiles to an empty query.
    ///
    /// # Errors
    ///
    /// Returns `CompileError` describing the first problem found, with its position.
    pub fn compile<V>(&self, filter: &str, validator: &V) -> CompileResult<ParsedQuery>
    where
        V: ColumnValidator + ?Sized,
    {
        let stream = lexer::tokenize(filter)?;
        debug!(tokens = stream.len(), "compiling filter expression");

        let query = Compilation::new(&self.macros, validator, stream).run()?;

        debug!(
            placeholders = query.args.len(),
            sql_len = query.sql.len(),
            "compiled filter expression"
        );
        Ok(query)
    }
}

// ---------------------------------------------------------------------------
// Per-call state machine
// ---------------------------------------------------------------------------

struct Compilation<'a, V: ?Sized> {
    macros: &'a MacroRegistry,
    validator: &'a V,
    stream: TokenStream,
    /// Emitted SQL pieces, joined with single spaces at the end.
    output: Vec<String>,
    args: Vec<Value>,
    /// Positions of currently open `(`.
    parens: Vec<Position>,
    /// `true` where a clause or `(` must come next, `false` where a logical
    /// operator, `)` or end of input must.
    expect_operand: bool,
}

impl<'a, V> Compilation<'a, V>
where
    V: ColumnValidator + ?Sized,
{
    fn new(macros: &'a MacroRegistry, validator: &'a V, stream: TokenStream) -> Self {
        Self {
            macros,
            validator,
            stream,
            output: Vec::new(),
            args: Vec::new(),
            parens: Vec::new(),
            expect_operand: true,
        }
    }

    fn run(mut self) -> CompileResult<ParsedQuery> {
        while !self.stream.is_at_end() {
            let token = self.stream.current().clone();
            match &token.kind {
                TokenKind::Identifier(column) => {
                    self.require_operand(&token)?;
                    self.clause(column, token.position)?;
                }
                TokenKind::Logical(_) => self.logical(&token)?,
                TokenKind::ParenOpen => self.open_group(&token)?,
                TokenKind::ParenClose => self.close_group(&token)?,
                _ => return Err(self.unexpected(&token)),
            }
        }

        if let Some(open) = self.parens.last() {
            debug!(line = open.line, offset = open.offset, "unclosed group");
            return Err(CompileError::UnmatchedParenthesis {
                kind: ParenKind::Opening,
                position: Position::UNKNOWN,
            });
        }

        Ok(ParsedQuery {
            sql: self.output.join(" "),
            args: self.args,
        })
    }

    /// Error for a token that cannot start or continue an expression here.
    fn unexpected(&self, token: &Token) -> CompileError {
        let expected = if self.expect_operand {
            "a column name or '('"
        } else {
            "a logical operator or ')'"
        };
        unexpected_token(expected, token)
    }

    fn require_operand(&self, token: &Token) -> CompileResult<()> {
        if self.expect_operand {
            Ok(())
        } else {
            Err(self.unexpected(token))
        }
    }

    // -- clauses ------------------------------------------------------------

    /// `<column> <operator> <value>`
    fn clause(&mut self, column: &str, position: Position) -> CompileResult<()> {
        let allowed =
            self.validator
                .validate(column)
                .map_err(|source| CompileError::Collaborator {
                    column: column.to_owned(),
                    position,
                    source,
                })?;
        if !allowed {
            return Err(CompileError::InvalidColumn {
                column: column.to_owned(),
                position,
            });
        }
        self.stream.advance();

        let op_token = self.stream.current().clone();
        let operator = match &op_token.kind {
            TokenKind::Operator(op) => *op,
            TokenKind::Identifier(word) | TokenKind::Macro(word) => {
                return Err(CompileError::InvalidOperation {
                    operation: word.clone(),
                    column: column.to_owned(),
                    position: op_token.position,
                });
            }
            _ => return Err(unexpected_token("a comparison operator", &op_token)),
        };
        self.stream.advance();

        let values = self.acquire_values(column, operator)?;
        let meta = operator.meta();
        if !meta.accepts(values.len()) {
            return Err(CompileError::InvalidOperation {
                operation: format!("{operator} with {} value(s)", values.len()),
                column: column.to_owned(),
                position: op_token.position,
            });
        }

        trace!(column, %operator, values = values.len(), "emitting clause");
        self.output
            .push(format!("{column} {}", meta.render(values.len())));
        self.args.extend(values);
        self.expect_operand = false;
        Ok(())
    }

    /// Read the value (or macro call) following an operator and advance past it.
    fn acquire_values(&mut self, column: &str, operator: Operator) -> CompileResult<Vec<Value>> {
        let token = self.stream.current().clone();
        match &token.kind {
            TokenKind::Macro(name) => return self.expand_macro(name, column, operator, &token),
            TokenKind::Identifier(name) if self.macros.get(name).is_some() => {
                return Err(unexpected_token(
                    &format!("'(' after macro '{name}'"),
                    self.stream.peek(),
                ));
            }
            _ => {}
        }

        let values =
            decode_value(&token, column, operator)?.ok_or_else(|| CompileError::MissingValue {
                column: column.to_owned(),
                position: token.position,
            })?;
        self.stream.advance();
        Ok(values)
    }

    /// `<macro> ( <value> )`, validated as a whole before the cursor moves.
    fn expand_macro(
        &mut self,
        name: &str,
        column: &str,
        operator: Operator,
        call: &Token,
    ) -> CompileResult<Vec<Value>> {
        let open = self.stream.peek_nth(1);
        let close = self.stream.peek_nth(3);
        if !matches!(open.kind, TokenKind::ParenOpen) {
            return Err(unexpected_token(&format!("'(' after macro '{name}'"), open));
        }
        if !matches!(close.kind, TokenKind::ParenClose) {
            return Err(unexpected_token(
                &format!("')' closing a single-value call to macro '{name}'"),
                close,
            ));
        }

        let arg = self.stream.peek_nth(2).clone();
        let Some(values) = decode_value(&arg, column, operator)? else {
            return Err(unexpected_token(
                &format!("a value inside macro '{name}'"),
                &arg,
            ));
        };

        let handler = self
            .macros
            .get(name)
            .ok_or_else(|| CompileError::MacroNotImplemented {
                name: name.to_owned(),
                column: column.to_owned(),
                position: call.position,
            })?;
        let values =
            handler
                .transform(column, values)
                .map_err(|source| CompileError::InvalidMacroValue {
                    name: name.to_owned(),
                    column: column.to_owned(),
                    position: arg.position,
                    source,
                })?;

        trace!(name, column, values = values.len(), "expanded macro");
        self.stream.advance_by(4);
        Ok(values)
    }

    // -- connectors and groups ----------------------------------------------

    fn logical(&mut self, token: &Token) -> CompileResult<()> {
        let next = self.stream.peek();
        let reason = if self.stream.previous().is_some_and(Token::is_logical) || next.is_logical()
        {
            Some("a logical operator must sit between two expressions")
        } else if self.stream.index() == 0 {
            Some("an expression cannot start with a logical operator")
        } else if next.is_eof() {
            Some("an expression cannot end with a logical operator")
        } else if matches!(next.kind, TokenKind::ParenClose) {
            Some("a group cannot end with a logical operator")
        } else {
            None
        };
        if let Some(reason) = reason {
            return Err(CompileError::MisplacedLogicalOperator {
                operator: token.text.clone(),
                reason,
                position: token.position,
            });
        }

        let TokenKind::Logical(op) = &token.kind else {
            return Err(self.unexpected(token));
        };
        self.output.push(op.to_string());
        self.expect_operand = true;
        self.stream.advance();
        Ok(())
    }

    fn open_group(&mut self, token: &Token) -> CompileResult<()> {
        self.require_operand(token)?;
        let next = self.stream.peek();
        if !matches!(next.kind, TokenKind::Identifier(_)) {
            return Err(unexpected_token("a column name after '('", next));
        }

        self.parens.push(token.position);
        self.output.push("(".to_owned());
        self.stream.advance();
        Ok(())
    }

    fn close_group(&mut self, token: &Token) -> CompileResult<()> {
        if self.parens.pop().is_none() {
            return Err(CompileError::UnmatchedParenthesis {
                kind: ParenKind::Closing,
                position: token.position,
            });
        }
        self.output.push(")".to_owned());
        self.stream.advance();
        Ok(())
    }
}

/// Decode a value token; `Ok(None)` when the token is not a value at all.
fn decode_value(
    token: &Token,
    column: &str,
    operator: Operator,
) -> CompileResult<Option<Vec<Value>>> {
    let values = match &token.kind {
        TokenKind::Integer(n) => vec![Value::Integer(*n)],
        TokenKind::Float(n) => vec![Value::Float(*n)],
        TokenKind::Str(s) => vec![Value::String(s.clone())],
        TokenKind::Array(raw) => {
            if !operator.meta().is_multi_value {
                return Err(CompileError::InvalidOperation {
                    operation: format!("{operator} with an array"),
                    column: column.to_owned(),
                    position: token.position,
                });
            }
            let values = value::decode_array(raw).map_err(|e| CompileError::UnexpectedToken {
                expected: format!("a JSON array of scalar values ({e})"),
                found: token.text.clone(),
                position: token.position,
            })?;
            if values.is_empty() {
                return Err(CompileError::InvalidOperation {
                    operation: format!("{operator} with an empty array"),
                    column: column.to_owned(),
                    position: token.position,
                });
            }
            values
        }
        _ => return Ok(None),
    };
    Ok(Some(values))
}

fn unexpected_token(expected: &str, token: &Token) -> CompileError {
    CompileError::UnexpectedToken {
        expected: expected.to_owned(),
        found: token.to_string(),
        position: token.position,
    }
}
