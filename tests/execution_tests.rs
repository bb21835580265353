// tests/execution_tests.rs

use std::sync::Arc;
use std::thread;

use ottl_lang::cli::json_to_value;
use ottl_lang::error::{CompileError, EvalError};
use ottl_lang::{
    CompareOp, Compiler, FunctionRegistry, MapPathResolver, Statement, SymbolTable, Value,
    execute_all,
};
use serde_json::json;

fn compiler() -> Compiler<Value, MapPathResolver, SymbolTable> {
    Compiler::new(
        FunctionRegistry::with_standard_functions(),
        MapPathResolver,
        SymbolTable::new().with("TEST_ENUM", 0).with("TEST_ENUM_ONE", 1),
    )
}

fn statement(text: &str) -> Statement<Value> {
    compiler().compile(text).unwrap()
}

fn record() -> Value {
    json_to_value(json!({
        "name": "fido",
        "count": 1,
        "ratio": 0.5,
        "enabled": true,
        "attributes": {"http.method": "GET", "n": "7"}
    }))
}

/// Run a where-clause against `record()` through a no-op converter.
fn matches(clause: &str) -> Result<bool, EvalError> {
    let statement = statement(&format!("Int(1) where {clause}"));
    statement
        .execute(&mut record())
        .map(|execution| execution.condition_matched)
}

// ============================================================================
// Execute contract
// ============================================================================

#[test]
fn test_false_condition_leaves_record_untouched() {
    let statement = statement(r#"set(name, "test") where name == "fido""#);
    let mut rex = json_to_value(json!({"name": "rex"}));
    let before = rex.clone();

    let execution = statement.execute(&mut rex).unwrap();
    assert!(!execution.condition_matched);
    assert_eq!(execution.result, None);
    assert_eq!(rex, before);
}

#[test]
fn test_true_condition_runs_action() {
    let statement = statement(r#"set(name, "test") where name == "fido""#);
    let mut fido = record();

    let execution = statement.execute(&mut fido).unwrap();
    assert!(execution.condition_matched);
    assert_eq!(execution.result, None);
    assert_eq!(fido.as_map().unwrap().get("name"), Some(&Value::from("test")));
}

#[test]
fn test_no_where_clause_always_matches() {
    let statement = statement(r#"set(attributes["x"], 1)"#);
    assert!(statement.condition().is_always());
    assert!(statement.execute(&mut record()).unwrap().condition_matched);
}

#[test]
fn test_converter_result_is_returned() {
    let execution = statement(r#"Concat([name, "!"], "")"#)
        .execute(&mut record())
        .unwrap();
    assert_eq!(execution.result, Some(Value::from("fido!")));
}

#[test]
fn test_runtime_error_is_per_record() {
    let statement = statement(r#"set(attributes["out"], missing)"#);

    let err = statement.execute(&mut record()).unwrap_err();
    assert_eq!(err, EvalError::MissingField("missing".to_string()));

    let mut with_field = json_to_value(json!({"missing": 3}));
    statement.execute(&mut with_field).unwrap();
    assert_eq!(
        with_field.as_map().unwrap().get("attributes"),
        Some(&json_to_value(json!({"out": 3})))
    );
}

// ============================================================================
// Short-circuit evaluation
// ============================================================================

#[test]
fn test_or_skips_unresolvable_operand() {
    assert_eq!(matches("true or missing.field == 1"), Ok(true));
    assert_eq!(matches(r#"name == "fido" or missing == 1"#), Ok(true));
}

#[test]
fn test_and_skips_unresolvable_operand() {
    assert_eq!(matches("false and missing.field == 1"), Ok(false));
    assert_eq!(matches(r#"name == "rex" and missing == 1"#), Ok(false));
}

#[test]
fn test_reached_operand_fails() {
    assert_eq!(
        matches("false or missing == 1"),
        Err(EvalError::MissingField("missing".to_string()))
    );
    assert_eq!(
        matches("true and missing == 1"),
        Err(EvalError::MissingField("missing".to_string()))
    );
}

#[test]
fn test_grouping_short_circuits_inside() {
    assert_eq!(matches("false and (missing == 1 or true)"), Ok(false));
    assert_eq!(matches("(true or missing == 1) and count == 1"), Ok(true));
}

#[test]
fn test_precedence_at_runtime() {
    assert_eq!(matches("false and true or true"), Ok(true));
    assert_eq!(matches("false and (true or true)"), Ok(false));
    assert_eq!(matches("true or false and false"), Ok(true));
}

// ============================================================================
// Comparison policy
// ============================================================================

#[test]
fn test_equality_across_kinds() {
    assert_eq!(matches("count == 1"), Ok(true));
    assert_eq!(matches("count == 1.0"), Ok(true));
    assert_eq!(matches(r#"count == "1""#), Ok(false));
    assert_eq!(matches("count != nil"), Ok(true));
    assert_eq!(matches("enabled == true"), Ok(true));
    assert_eq!(matches("nil == nil"), Ok(true));
    assert_eq!(matches("TEST_ENUM_ONE == count"), Ok(true));
}

#[test]
fn test_ordering_numbers_and_strings() {
    assert_eq!(matches("ratio < 1"), Ok(true));
    assert_eq!(matches("count >= 1"), Ok(true));
    assert_eq!(matches("count > 0.5"), Ok(true));
    assert_eq!(matches(r#"name < "rex""#), Ok(true));
    assert_eq!(matches(r#"name >= "zed""#), Ok(false));
}

#[test]
fn test_ordering_across_kinds_is_an_error() {
    assert_eq!(
        matches(r#"attributes["n"] > 3"#),
        Err(EvalError::Comparison {
            op: CompareOp::Gt,
            left: "string",
            right: "int",
        })
    );
    assert_eq!(
        matches("nil < 1"),
        Err(EvalError::Comparison {
            op: CompareOp::Lt,
            left: "nil",
            right: "int",
        })
    );
    assert!(matches("enabled <= true").is_err());
    assert!(matches("0x01 < 0x02").is_err());
}

#[test]
fn test_list_equality_is_structural() {
    assert_eq!(matches(r#"["a", 1] == ["a", 1]"#), Ok(true));
    assert_eq!(matches(r#"["a", 1] == [1, "a"]"#), Ok(false));
}

// ============================================================================
// Compiler
// ============================================================================

#[test]
fn test_compile_all_is_all_or_nothing() {
    let errors = compiler()
        .compile_all(&[
            r#"set(name, "a")"#,
            "set(",
            r#"explode(name)"#,
            r#"set(attributes["x"], 1) where name == "fido""#,
        ])
        .unwrap_err();

    assert_eq!(errors.len(), 2);
    assert!(matches!(errors[0], CompileError::Parse(_)));
    assert!(matches!(&errors[1], CompileError::Bind { statement, .. } if statement == "explode(name)"));
}

#[test]
fn test_compile_all_keeps_order() {
    let statements = compiler()
        .compile_all(&[r#"set(name, "a")"#, r#"set(attributes["x"], name)"#])
        .unwrap();

    assert_eq!(statements[0].source(), r#"set(name, "a")"#);
    assert_eq!(statements[1].source(), r#"set(attributes["x"], name)"#);
}

#[test]
fn test_execute_all_counts_matches() {
    let statements = compiler()
        .compile_all(&[
            r#"set(attributes["first"], name) where name == "fido""#,
            r#"set(name, "rex")"#,
            r#"set(attributes["second"], name) where name == "fido""#,
        ])
        .unwrap();

    let mut record = record();
    assert_eq!(execute_all(&statements, &mut record), Ok(2));

    let attributes = record.as_map().unwrap().get("attributes").unwrap();
    assert_eq!(attributes.as_map().unwrap().get("first"), Some(&Value::from("fido")));
    assert_eq!(attributes.as_map().unwrap().get("second"), None);
}

#[test]
fn test_execute_all_stops_at_first_error() {
    let statements = compiler()
        .compile_all(&[
            r#"set(attributes["a"], missing)"#,
            r#"set(attributes["b"], 1)"#,
        ])
        .unwrap();

    let mut record = record();
    assert!(execute_all(&statements, &mut record).is_err());
    let attributes = record.as_map().unwrap().get("attributes").unwrap();
    assert_eq!(attributes.as_map().unwrap().get("b"), None);
}

#[test]
fn test_statement_shared_across_threads() {
    let statement = Arc::new(statement(r#"set(attributes["seen"], name) where count == 1"#));

    let handles: Vec<_> = ["a", "b", "c", "d"]
        .into_iter()
        .map(|name| {
            let statement = Arc::clone(&statement);
            thread::spawn(move || {
                let mut record = json_to_value(json!({"name": name, "count": 1}));
                statement.execute(&mut record).unwrap();
                record
            })
        })
        .collect();

    for (handle, name) in handles.into_iter().zip(["a", "b", "c", "d"]) {
        let record = handle.join().unwrap();
        let attributes = record.as_map().unwrap().get("attributes").unwrap();
        assert_eq!(attributes.as_map().unwrap().get("seen"), Some(&Value::from(name)));
    }
}
