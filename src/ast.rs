//! # Statement Language - Abstract Syntax Tree
//!
//! This module defines the Abstract Syntax Tree (AST) for the statement
//! language used to query and mutate telemetry records (spans, metric points,
//! log records) from pipeline configuration.
//!
//! ## Architecture Overview
//!
//! The AST module is organized into focused submodules:
//!
//! - **[tokens]** - Lexical tokens produced by the lexer
//! - **[expressions]** - Literal values, paths and invocations
//! - **[operators]** - The six comparison operators
//! - **[statements]** - Statements and the where-clause boolean tree
//!
//! ## Quick Start
//!
//! ```text
//! set(attributes["test"], ["value1", "value2"]) where name == "fido"
//! ```
//!
//! This statement sets the `test` attribute to a two-element list on every
//! record whose `name` is `fido`.
//!
//! ## Core Concepts
//!
//! ### Statement Structure
//!
//! ```text
//! function(args...) [where booleanExpression]
//! ```
//!
//! ### Precedence
//!
//! `and` binds tighter than `or`. The tree mirrors this directly: a
//! [`BooleanExpression`] is a list of OR-ed [`Term`]s and each term is a list
//! of AND-ed [`BooleanValue`]s. Parentheses nest a whole expression back in
//! as a boolean value.
//!
//! ```text
//! false and true or false   ==   (false and true) or false
//! ```
//!
//! ### Literal Kinds
//!
//! | Source | Variant |
//! |---|---|
//! | `"text"` | [`Expr::String`] |
//! | `1.5` | [`Expr::Float`] |
//! | `12` | [`Expr::Int`] |
//! | `true` | [`Expr::Bool`] |
//! | `0x0a0b` | [`Expr::Bytes`] |
//! | `nil` | [`Expr::Nil`] |
//! | `SPAN_KIND_SERVER` | [`Expr::Enum`] |
//! | `a.b["c"]` | [`Expr::Path`] |
//! | `Concat(...)` | [`Expr::Invocation`] |
//! | `[1, "a"]` | [`Expr::List`] |
//!
//! Every AST type implements `Display` and renders statement text that
//! parses back to an equal tree.
pub mod tokens;
pub mod expressions;
pub mod operators;
pub mod statements;

pub use tokens::Token;
pub use expressions::{EnumSymbol, Expr, Field, Invocation, Path};
pub use operators::CompareOp;
pub use statements::{BooleanExpression, BooleanValue, Comparison, ParsedStatement, Term};
