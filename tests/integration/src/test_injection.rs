//! Hostile input must never reach the SQL text.

#[cfg(test)]
mod tests {
    use rqe_core::{CompileError, Value, compile};

    use crate::{compile_users, users_columns};

    #[test]
    fn test_should_parameterize_quote_breakout() {
        let payload = "' OR '1'='1";
        let query = compile_users(&format!("name eq \"{payload}\"")).unwrap();
        assert_eq!(query.sql, "name = ?");
        assert_eq!(query.args, vec![Value::from(payload)]);
    }

    #[test]
    fn test_should_parameterize_escaped_quotes() {
        let query = compile_users(r#"name eq "x\" or 1=1 --""#).unwrap();
        assert_eq!(query.sql, "name = ?");
        assert_eq!(query.args, vec![Value::from("x\" or 1=1 --")]);
    }

    #[test]
    fn test_should_parameterize_array_payloads() {
        let query = compile_users(r#"status in ["a'); DROP TABLE users; --", "b"]"#).unwrap();
        assert_eq!(query.sql, "status IN (?, ?)");
        assert_eq!(query.args[0], Value::from("a'); DROP TABLE users; --"));
    }

    #[test]
    fn test_should_reject_sql_in_column_position() {
        for filter in [
            "1=1 eq 1",
            "name; DROP TABLE users eq 1",
            "id eq 1 or 1 eq 1",
            "users.password eq 'x'",
        ] {
            let result = compile_users(filter);
            assert!(result.is_err(), "accepted hostile filter: {filter}");
        }
    }

    #[test]
    fn test_should_reject_trailing_sql() {
        for filter in [
            "id eq 1; DROP TABLE users",
            "id eq 1 --",
            "id eq 1 /* x */",
            "id eq 1 union select 1",
        ] {
            assert!(
                matches!(compile_users(filter), Err(CompileError::UnexpectedToken { .. })),
                "accepted hostile filter: {filter}"
            );
        }
    }

    #[test]
    fn test_should_only_emit_whitelisted_columns() {
        let columns = users_columns();
        let filter = "name eq 'a' and (age gt 1 or city ne 'b') and status in ['x', 'y']";
        let filter = filter.replace('\'', "\"");
        let query = compile(&filter, &columns).unwrap();
        let words: Vec<&str> = query
            .sql
            .split_whitespace()
            .filter(|w| w.chars().all(|c| c.is_ascii_alphanumeric() || c == '_'))
            .filter(|w| !matches!(*w, "AND" | "OR" | "IN" | "BETWEEN"))
            .collect();
        assert!(!words.is_empty());
        for word in words {
            assert!(columns.contains(word), "unexpected word in SQL: {word}");
        }
    }
}
