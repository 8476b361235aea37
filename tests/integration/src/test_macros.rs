//! Timestamp macros with a pinned clock.

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use chrono::NaiveDate;
    use rqe_core::{
        AgeMacro, CompileError, Compiler, FixedClock, MacroError, MacroRegistry, Value,
    };

    use crate::{compile_users, compiler_at, users_columns};

    #[test]
    fn test_should_expand_age_to_timestamp() {
        let query = compiler_at(2025, 1, 1)
            .compile("dob lte age(18)", &users_columns())
            .unwrap();
        assert_eq!(query.sql, "dob <= ?");
        assert_eq!(query.args, vec![Value::from("2007-01-01 00:00:00")]);
    }

    #[test]
    fn test_should_expand_age_inside_groups() {
        let query = compiler_at(2025, 6, 30)
            .compile(
                r#"(dob lte age(21) and dob gt age(65)) or status eq "vip""#,
                &users_columns(),
            )
            .unwrap();
        assert_eq!(query.sql, "( dob <= ? AND dob > ? ) OR status = ?");
        assert_eq!(
            query.args,
            vec![
                Value::from("2004-06-30 00:00:00"),
                Value::from("1960-06-30 00:00:00"),
                Value::from("vip"),
            ]
        );
    }

    #[test]
    fn test_should_use_configured_time_format() {
        let now = NaiveDate::from_ymd_opt(2025, 3, 15)
            .and_then(|d| d.and_hms_opt(12, 30, 0))
            .unwrap();
        let registry = MacroRegistry::new().with_macro(
            AgeMacro::NAME,
            AgeMacro::new("%Y-%m-%d", Arc::new(FixedClock(now))),
        );
        let query = Compiler::with_macros(registry)
            .compile("dob lte AGE(30)", &users_columns())
            .unwrap();
        assert_eq!(query.args, vec![Value::from("1995-03-15")]);
    }

    #[test]
    fn test_should_reject_unregistered_macro() {
        match compile_users("created_at gt now(0)") {
            Err(CompileError::MacroNotImplemented { name, column, .. }) => {
                assert_eq!(name, "now");
                assert_eq!(column, "created_at");
            }
            other => panic!("expected MacroNotImplemented, got {other:?}"),
        }
    }

    #[test]
    fn test_should_reject_non_numeric_age() {
        match compile_users("dob lte age('eighteen')") {
            Err(CompileError::InvalidMacroValue { name, source, .. }) => {
                assert_eq!(name, "age");
                assert!(matches!(source, MacroError::NotAnInteger { .. }));
            }
            other => panic!("expected InvalidMacroValue, got {other:?}"),
        }
    }

    #[test]
    fn test_should_not_consume_tokens_of_malformed_call() {
        for filter in ["dob lte age(18", "dob lte age 18", "dob lte age(18, 19)"] {
            assert!(
                matches!(
                    compile_users(filter),
                    Err(CompileError::UnexpectedToken { .. })
                ),
                "failed for filter: {filter}"
            );
        }
    }
}
