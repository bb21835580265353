//! Error types for every stage of a statement's life.
//!
//! Parse and bind errors happen once, while configuration is loaded, and
//! abort construction of the statement. Evaluation errors are returned per
//! record from [`Statement::execute`](crate::Statement::execute) and leave the
//! statement usable for the next record.

use thiserror::Error;

use crate::ast::CompareOp;
use crate::lexer::Position;

/// What went wrong while turning characters into tokens.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LexErrorKind {
    #[error("unterminated string: missing closing quote")]
    UnterminatedString,
    #[error("invalid escape sequence '\\{0}'")]
    InvalidEscape(char),
    #[error("byte literal needs an even number of hex digits, found {0}")]
    OddHexLiteral(usize),
    #[error("byte literal has no hex digits after '0x'")]
    EmptyHexLiteral,
    #[error("number out of range: {0}")]
    NumberOutOfRange(String),
    #[error("unexpected '=' (did you mean '=='?)")]
    BareEquals,
    #[error("unexpected character '{0}'")]
    UnexpectedChar(char),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind} at {position}")]
pub struct LexError {
    pub kind: LexErrorKind,
    pub position: Position,
}

/// Malformed statement text. Carries the statement so it can be redisplayed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unable to parse statement '{statement}': {message} at {position}")]
pub struct ParseError {
    pub statement: String,
    pub position: Position,
    pub message: String,
}

impl ParseError {
    pub fn new(statement: &str, position: Position, message: impl Into<String>) -> Self {
        ParseError {
            statement: statement.to_string(),
            position,
            message: message.into(),
        }
    }

    pub(crate) fn from_lex(statement: &str, err: LexError) -> Self {
        ParseError::new(statement, err.position, err.kind.to_string())
    }
}

/// Failure reported by a host while resolving paths or enum symbols.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolveError {
    #[error("unrecognized path '{0}'")]
    UnknownPath(String),
    #[error("unknown enum symbol '{0}'")]
    UnknownEnum(String),
}

/// A parsed statement could not be attached to a record type.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BindError {
    #[error("undefined function '{0}'")]
    UnknownFunction(String),

    #[error("incorrect number of arguments to '{function}': expected {expected}, got {got}")]
    Arity {
        function: String,
        expected: String,
        got: usize,
    },

    #[error("argument {index} of '{function}' must be {expected}, found {found}")]
    ArgumentKind {
        function: String,
        index: usize,
        expected: String,
        found: String,
    },

    #[error("path '{0}' cannot be written to")]
    NotSettable(String),

    #[error("'{0}' modifies the record and cannot be used as a value")]
    EditorAsValue(String),

    #[error("invalid arguments to '{function}': {message}")]
    Factory { function: String, message: String },

    #[error(transparent)]
    Resolve(#[from] ResolveError),
}

/// Per-record failure while evaluating a condition or running an action.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EvalError {
    #[error("field '{0}' not present on record")]
    MissingField(String),

    #[error("cannot index into {found} at '{path}'")]
    NotAMap { path: String, found: &'static str },

    #[error("cannot compare {left} {op} {right}")]
    Comparison {
        op: CompareOp,
        left: &'static str,
        right: &'static str,
    },

    #[error("expected {expected}, found {found}")]
    TypeMismatch {
        expected: &'static str,
        found: &'static str,
    },

    #[error("target is not settable")]
    NotSettable,

    #[error("{function}: {message}")]
    Function { function: String, message: String },
}

/// Either stage failing for one statement of a batch.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CompileError {
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error("unable to bind statement '{statement}': {source}")]
    Bind {
        statement: String,
        #[source]
        source: BindError,
    },
}
