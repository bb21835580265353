//! Compile statements and run them against a JSON record

use super::{CliError, json_to_value, value_to_json};
use crate::{Compiler, FunctionRegistry, MapPathResolver, SymbolTable, parse};

/// Options for the check command
#[derive(Debug, Clone, Default)]
pub struct CheckOptions {
    /// Statements to run, in order
    pub statements: Vec<String>,
    /// JSON record
    pub input: Option<String>,
    /// Pretty-print the output
    pub pretty: bool,
    /// Only validate syntax, don't execute
    pub syntax_only: bool,
    /// Print the parsed statements instead of executing
    pub ast: bool,
    /// Enum symbols available to the statements
    pub symbols: Vec<(String, i64)>,
}

/// Result of a check operation
#[derive(Debug)]
pub enum CheckResult {
    /// Syntax validation passed
    SyntaxValid,
    /// Canonical rendering of each parsed statement
    Ast(Vec<String>),
    /// Statements ran; the record after all of them
    Success {
        record: serde_json::Value,
        matched: usize,
    },
}

/// Parse a `NAME=INTEGER` enum definition.
pub fn parse_symbol(definition: &str) -> Result<(String, i64), CliError> {
    let invalid = || CliError::InvalidSymbol(definition.to_string());
    let (name, value) = definition.split_once('=').ok_or_else(invalid)?;
    let name = name.trim();
    if name.is_empty() {
        return Err(invalid());
    }
    let value = value.trim().parse::<i64>().map_err(|_| invalid())?;
    Ok((name.to_string(), value))
}

/// Execute an ottl check operation
pub fn execute_check(options: &CheckOptions) -> Result<CheckResult, CliError> {
    if options.statements.is_empty() {
        return Err(CliError::NoStatements);
    }

    if options.syntax_only || options.ast {
        let mut rendered = Vec::with_capacity(options.statements.len());
        for text in &options.statements {
            rendered.push(parse(text)?.to_string());
        }
        return Ok(if options.ast {
            CheckResult::Ast(rendered)
        } else {
            CheckResult::SyntaxValid
        });
    }

    let json_str = options.input.as_ref().ok_or(CliError::NoInput)?;
    let json_value: serde_json::Value = serde_json::from_str(json_str)?;
    let mut record = json_to_value(json_value);

    let symbols: SymbolTable = options.symbols.iter().cloned().collect();
    let compiler = Compiler::new(
        FunctionRegistry::with_standard_functions(),
        MapPathResolver,
        symbols,
    );
    let statements = compiler
        .compile_all(&options.statements)
        .map_err(CliError::Compile)?;

    let mut matched = 0;
    for statement in &statements {
        let execution = statement
            .execute(&mut record)
            .map_err(|source| CliError::Eval {
                statement: statement.source().to_string(),
                source,
            })?;
        if execution.condition_matched {
            matched += 1;
        }
    }
    tracing::info!(statements = statements.len(), matched, "check complete");

    Ok(CheckResult::Success {
        record: value_to_json(record),
        matched,
    })
}
