//! CLI support for ottl-lang
//!
//! Provides programmatic access to the `ottl check` command so other tools
//! can validate and dry-run statements against JSON records.

mod check;
mod convert;

pub use check::{CheckOptions, CheckResult, execute_check, parse_symbol};
pub use convert::{json_to_value, value_to_json};

use std::io;

use thiserror::Error;

use crate::error::{CompileError, EvalError, ParseError};

/// Errors that can occur during CLI operations
#[derive(Debug, Error)]
pub enum CliError {
    #[error("Parse error: {0}")]
    Parse(#[from] ParseError),

    #[error("{}", compile_report(.0))]
    Compile(Vec<CompileError>),

    #[error("Evaluation error in '{statement}': {source}")]
    Eval {
        statement: String,
        #[source]
        source: EvalError,
    },

    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("No input provided. Use --input or pipe JSON to stdin.")]
    NoInput,

    #[error("No statements given.")]
    NoStatements,

    #[error("Invalid enum definition '{0}': expected NAME=INTEGER")]
    InvalidSymbol(String),
}

fn compile_report(errors: &[CompileError]) -> String {
    let mut report = format!("{} statement(s) failed to compile:", errors.len());
    for err in errors {
        report.push_str("\n  ");
        report.push_str(&err.to_string());
    }
    report
}
