use std::fmt;

use crate::ast::{CompareOp, Expr, Invocation};

/// A parsed statement: one invocation and an optional where-clause.
///
/// # Example
/// ```text
/// set(attributes["test"], "pass") where name == "fido"
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedStatement {
    pub invocation: Invocation,
    pub where_clause: Option<BooleanExpression>,
}

/// `term {or term}`
///
/// OR sits above AND, so every AND chain lives inside a single [`Term`].
#[derive(Debug, Clone, PartialEq)]
pub struct BooleanExpression {
    pub left: Term,
    pub rest: Vec<Term>,
}

/// `booleanValue {and booleanValue}`
#[derive(Debug, Clone, PartialEq)]
pub struct Term {
    pub left: BooleanValue,
    pub rest: Vec<BooleanValue>,
}

/// Operand of AND.
#[derive(Debug, Clone, PartialEq)]
pub enum BooleanValue {
    /// `value op value`
    Comparison(Comparison),
    /// `true` / `false`
    Constant(bool),
    /// Parenthesized sub-expression
    SubExpr(Box<BooleanExpression>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Comparison {
    pub left: Expr,
    pub op: CompareOp,
    pub right: Expr,
}

impl BooleanExpression {
    pub fn single(term: Term) -> Self {
        BooleanExpression {
            left: term,
            rest: Vec::new(),
        }
    }

    /// Iterate the OR-ed terms in evaluation order.
    pub fn terms(&self) -> impl Iterator<Item = &Term> {
        std::iter::once(&self.left).chain(self.rest.iter())
    }
}

impl Term {
    pub fn single(value: BooleanValue) -> Self {
        Term {
            left: value,
            rest: Vec::new(),
        }
    }

    /// Iterate the AND-ed values in evaluation order.
    pub fn values(&self) -> impl Iterator<Item = &BooleanValue> {
        std::iter::once(&self.left).chain(self.rest.iter())
    }
}

impl fmt::Display for ParsedStatement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.invocation)?;
        if let Some(condition) = &self.where_clause {
            write!(f, " where {condition}")?;
        }
        Ok(())
    }
}

impl fmt::Display for BooleanExpression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, term) in self.terms().enumerate() {
            if i > 0 {
                f.write_str(" or ")?;
            }
            write!(f, "{term}")?;
        }
        Ok(())
    }
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, value) in self.values().enumerate() {
            if i > 0 {
                f.write_str(" and ")?;
            }
            write!(f, "{value}")?;
        }
        Ok(())
    }
}

impl fmt::Display for BooleanValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BooleanValue::Comparison(c) => write!(f, "{c}"),
            BooleanValue::Constant(b) => write!(f, "{b}"),
            BooleanValue::SubExpr(expr) => write!(f, "({expr})"),
        }
    }
}

impl fmt::Display for Comparison {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.left, self.op, self.right)
    }
}
