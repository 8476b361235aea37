//! Error kinds and positions as a caller sees them.

#[cfg(test)]
mod tests {
    use rqe_core::{ColumnValidator, CompileError, ParenKind, Position, compile};

    use crate::compile_users;

    #[test]
    fn test_should_report_missing_value_for_age() {
        match compile_users(r#"age eq and city eq "X""#) {
            Err(CompileError::MissingValue { column, .. }) => assert_eq!(column, "age"),
            other => panic!("expected MissingValue, got {other:?}"),
        }
    }

    #[test]
    fn test_should_report_invalid_column_with_position() {
        let err = compile_users("name eq 'x'\nand password eq 'y'").unwrap_err();
        assert!(matches!(err, CompileError::InvalidColumn { .. }));
        assert_eq!(err.column(), Some("password"));
        assert_eq!(err.position(), Position::new(2, 4));
        assert_eq!(
            err.to_string(),
            "invalid column 'password' at line 2, offset 4"
        );
    }

    #[test]
    fn test_should_report_unclosed_group_without_position() {
        let err = compile_users("(age gt 1 or (age lt 5)").unwrap_err();
        assert!(matches!(
            err,
            CompileError::UnmatchedParenthesis {
                kind: ParenKind::Opening,
                ..
            }
        ));
        assert!(!err.position().is_known());
    }

    #[test]
    fn test_should_report_stray_closing_paren() {
        let err = compile_users("age gt 1) and (age lt 5").unwrap_err();
        assert!(matches!(
            err,
            CompileError::UnmatchedParenthesis {
                kind: ParenKind::Closing,
                ..
            }
        ));
        assert_eq!(err.position(), Position::new(1, 8));
    }

    #[test]
    fn test_should_report_first_error_only() {
        let err = compile_users("secret eq 1 and age eq").unwrap_err();
        assert!(matches!(err, CompileError::InvalidColumn { .. }));
    }

    #[test]
    fn test_should_report_lexical_errors_as_unexpected_tokens() {
        for filter in [
            r#"name eq "unterminated"#,
            "status in [1, 2",
            "id eq 99999999999999999999",
            "score lt 1e999",
            "id in [18446744073709551615]",
        ] {
            assert!(
                matches!(compile_users(filter), Err(CompileError::UnexpectedToken { .. })),
                "failed for filter: {filter}"
            );
        }
    }

    #[test]
    fn test_should_report_misplaced_logical_operators() {
        for filter in ["or age eq 1", "age eq 1 and", "age eq 1 or or age eq 2"] {
            let err = compile_users(filter).unwrap_err();
            assert!(
                matches!(err, CompileError::MisplacedLogicalOperator { .. }),
                "failed for filter: {filter}"
            );
        }
    }

    #[test]
    fn test_should_report_operator_arity_errors() {
        for filter in [
            "age between [1, 2, 3]",
            "age gt [1, 2]",
            "status in []",
            "name contains 'x'",
        ] {
            assert!(
                matches!(compile_users(filter), Err(CompileError::InvalidOperation { .. })),
                "failed for filter: {filter}"
            );
        }
    }

    #[test]
    fn test_should_surface_validator_failures() {
        #[derive(Debug)]
        struct Catalog;

        impl ColumnValidator for Catalog {
            fn validate(&self, column: &str) -> anyhow::Result<bool> {
                anyhow::bail!("schema lookup for '{column}' timed out")
            }
        }

        let err = compile("age eq 1", &Catalog).unwrap_err();
        assert!(matches!(err, CompileError::Collaborator { .. }));
        assert_eq!(err.column(), Some("age"));
        let source = std::error::Error::source(&err).map(ToString::to_string);
        assert_eq!(
            source.as_deref(),
            Some("schema lookup for 'age' timed out")
        );
    }
}
