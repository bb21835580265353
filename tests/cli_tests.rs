// tests/cli_tests.rs

use ottl_lang::cli::{CheckOptions, CheckResult, CliError, execute_check};
use serde_json::json;

fn options(statements: &[&str], input: Option<&str>) -> CheckOptions {
    CheckOptions {
        statements: statements.iter().map(|s| s.to_string()).collect(),
        input: input.map(str::to_string),
        ..CheckOptions::default()
    }
}

#[test]
fn test_check_runs_statements_in_order() {
    let opts = options(
        &[
            r#"set(attributes["greeting"], Concat(["hi", name], " ")) where name == "fido""#,
            r#"delete_key(attributes, "secret")"#,
        ],
        Some(r#"{"name": "fido", "attributes": {"secret": "x"}}"#),
    );

    match execute_check(&opts).unwrap() {
        CheckResult::Success { record, matched } => {
            assert_eq!(matched, 2);
            assert_eq!(
                record,
                json!({"name": "fido", "attributes": {"greeting": "hi fido"}})
            );
        }
        other => panic!("expected success, got {other:?}"),
    }
}

#[test]
fn test_check_with_enum_symbols() {
    let mut opts = options(
        &[r#"set(attributes["kind"], SPAN_KIND_SERVER)"#],
        Some("{}"),
    );
    opts.symbols = vec![("SPAN_KIND_SERVER".to_string(), 2)];

    match execute_check(&opts).unwrap() {
        CheckResult::Success { record, .. } => {
            assert_eq!(record, json!({"attributes": {"kind": 2}}))
        }
        other => panic!("expected success, got {other:?}"),
    }
}

#[test]
fn test_syntax_only() {
    let mut opts = options(&[r#"set(name, "x") where name == "fido""#], None);
    opts.syntax_only = true;
    assert!(matches!(execute_check(&opts).unwrap(), CheckResult::SyntaxValid));
}

#[test]
fn test_syntax_only_reports_parse_error() {
    let mut opts = options(&[r#"set(name, "x") where name = "fido""#], None);
    opts.syntax_only = true;
    assert!(matches!(execute_check(&opts), Err(CliError::Parse(_))));
}

#[test]
fn test_ast_output_is_canonical() {
    let mut opts = options(&[r#"set  ( name,"x")   where  count>=3.0"#], None);
    opts.ast = true;

    match execute_check(&opts).unwrap() {
        CheckResult::Ast(rendered) => {
            assert_eq!(rendered, vec![r#"set(name, "x") where count >= 3.0"#.to_string()])
        }
        other => panic!("expected ast, got {other:?}"),
    }
}

#[test]
fn test_missing_input() {
    let opts = options(&[r#"set(name, "x")"#], None);
    assert!(matches!(execute_check(&opts), Err(CliError::NoInput)));
}

#[test]
fn test_no_statements() {
    let opts = options(&[], Some("{}"));
    assert!(matches!(execute_check(&opts), Err(CliError::NoStatements)));
}

#[test]
fn test_invalid_json() {
    let opts = options(&[r#"set(name, "x")"#], Some("{not json"));
    assert!(matches!(execute_check(&opts), Err(CliError::Json(_))));
}

#[test]
fn test_compile_errors_are_collected() {
    let opts = options(&["set(", "explode(name)"], Some("{}"));
    match execute_check(&opts) {
        Err(CliError::Compile(errors)) => {
            assert_eq!(errors.len(), 2);
            let message = CliError::Compile(errors).to_string();
            assert!(message.starts_with("2 statement(s) failed to compile:"));
            assert!(message.contains("explode"));
        }
        other => panic!("expected compile errors, got {other:?}"),
    }
}

#[test]
fn test_eval_error_names_statement() {
    let opts = options(&[r#"set(name, missing)"#], Some("{}"));
    let err = execute_check(&opts).unwrap_err();
    assert!(matches!(err, CliError::Eval { .. }));
    assert!(err.to_string().contains("set(name, missing)"));
}
