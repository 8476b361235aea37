//! Filters an application would send from a search form.

#[cfg(test)]
mod tests {
    use rqe_core::{Compiler, RqeConfig, Value};

    use crate::{compile_users, users_columns};

    #[test]
    fn test_should_compile_name_and_age() {
        let query = compile_users(r#"name eq "John" and age gte 25"#).unwrap();
        assert_eq!(query.sql, "name = ? AND age >= ?");
        assert_eq!(query.args, vec![Value::from("John"), Value::Integer(25)]);
    }

    #[test]
    fn test_should_compile_city_and_status_list() {
        let query = compile_users(r#"city eq "New York" and status in ["active","pending"]"#).unwrap();
        assert_eq!(query.sql, "city = ? AND status IN (?, ?)");
        assert_eq!(
            query.args,
            vec![
                Value::from("New York"),
                Value::from("active"),
                Value::from("pending"),
            ]
        );
    }

    #[test]
    fn test_should_compile_age_range_group() {
        let query = compile_users("(age gte 18 and age lte 65)").unwrap();
        assert_eq!(query.sql, "( age >= ? AND age <= ? )");
        assert_eq!(query.args, vec![Value::Integer(18), Value::Integer(65)]);
    }

    #[test]
    fn test_should_compile_multiline_filter() {
        let filter = "active eq 1\n  and (score gte 4.5\n    or id in [1, 2, 3])";
        let query = compile_users(filter).unwrap();
        assert_eq!(query.sql, "active = ? AND ( score >= ? OR id IN (?, ?, ?) )");
        assert_eq!(
            query.args,
            vec![
                Value::Integer(1),
                Value::Float(4.5),
                Value::Integer(1),
                Value::Integer(2),
                Value::Integer(3),
            ]
        );
        assert_eq!(query.placeholder_count(), query.args.len());
    }

    #[test]
    fn test_should_compile_every_operator() {
        let query = compile_users(
            "id lt 1 or id lte 2 or id eq 3 or id gte 4 or id gt 5 or id ne 6 \
             or id in [7] or id between [8, 9]",
        )
        .unwrap();
        assert_eq!(
            query.sql,
            "id < ? OR id <= ? OR id = ? OR id >= ? OR id > ? OR id <> ? OR id IN (?) OR id BETWEEN ? AND ?"
        );
        assert_eq!(query.args.len(), 9);
    }

    #[test]
    fn test_should_accept_mixed_scalar_arrays() {
        let query = compile_users(r#"status in ["a", 1, 2.5, true]"#).unwrap();
        assert_eq!(query.sql, "status IN (?, ?, ?, ?)");
        assert_eq!(
            query.args,
            vec![
                Value::from("a"),
                Value::Integer(1),
                Value::Float(2.5),
                Value::Bool(true),
            ]
        );
    }

    #[test]
    fn test_should_serialize_query_as_json() {
        let query = compile_users(r#"name eq "John" and age between [18, 65]"#).unwrap();
        let json = serde_json::to_value(&query).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "sql": "name = ? AND age BETWEEN ? AND ?",
                "args": ["John", 18, 65],
            })
        );
    }

    #[test]
    fn test_should_compile_identically_across_threads() {
        let compiler = Compiler::new(&RqeConfig::default());
        let columns = users_columns();
        let filter = r#"(city eq "Paris" or city eq "Rome") and age gt 30"#;
        let expected = compiler.compile(filter, &columns).unwrap();

        std::thread::scope(|scope| {
            let handles: Vec<_> = (0..4)
                .map(|_| scope.spawn(|| compiler.compile(filter, &columns).unwrap()))
                .collect();
            for handle in handles {
                assert_eq!(handle.join().unwrap(), expected);
            }
        });
    }

    #[test]
    fn test_should_compile_empty_filter_to_empty_query() {
        let query = compile_users("   ").unwrap();
        assert!(query.is_empty());
        assert!(query.args.is_empty());
    }
}
