use crate::{
    ast::CompareOp,
    compare::compare,
    error::EvalError,
    resolver::Getter,
};

/// A where-clause after binding: the same OR-of-ANDs shape as
/// [`BooleanExpression`](crate::ast::BooleanExpression), with every operand
/// replaced by a getter for the record type.
///
/// A statement without a where-clause holds [`Condition::always`].
pub struct Condition<R> {
    expression: Option<CompiledExpression<R>>,
}

/// `term {or term}`
pub(crate) struct CompiledExpression<R> {
    pub(crate) terms: Vec<CompiledTerm<R>>,
}

/// `value {and value}`
pub(crate) struct CompiledTerm<R> {
    pub(crate) values: Vec<CompiledValue<R>>,
}

pub(crate) enum CompiledValue<R> {
    Constant(bool),
    Comparison {
        left: Getter<R>,
        op: CompareOp,
        right: Getter<R>,
    },
    SubExpr(CompiledExpression<R>),
}

impl<R: 'static> Condition<R> {
    /// True for every record, without evaluating anything.
    pub fn always() -> Self {
        Condition { expression: None }
    }

    /// A fixed outcome, e.g. for tests that need a condition which never holds.
    pub fn constant(result: bool) -> Self {
        Condition::from_expression(CompiledExpression {
            terms: vec![CompiledTerm {
                values: vec![CompiledValue::Constant(result)],
            }],
        })
    }

    /// A single `left op right` comparison.
    pub fn comparison(left: Getter<R>, op: CompareOp, right: Getter<R>) -> Self {
        Condition::from_expression(CompiledExpression {
            terms: vec![CompiledTerm {
                values: vec![CompiledValue::Comparison { left, op, right }],
            }],
        })
    }

    pub(crate) fn from_expression(expression: CompiledExpression<R>) -> Self {
        Condition {
            expression: Some(expression),
        }
    }

    pub fn is_always(&self) -> bool {
        self.expression.is_none()
    }

    /// Evaluate against one record.
    ///
    /// Terms of an `or` are evaluated left to right and evaluation stops at
    /// the first true term; values of an `and` stop at the first false one.
    /// Operands past the deciding point are never read, so a getter that
    /// would fail on this record is harmless there.
    pub fn evaluate(&self, record: &R) -> Result<bool, EvalError> {
        match &self.expression {
            None => Ok(true),
            Some(expression) => expression.evaluate(record),
        }
    }
}

impl<R> CompiledExpression<R> {
    fn evaluate(&self, record: &R) -> Result<bool, EvalError> {
        for term in &self.terms {
            if term.evaluate(record)? {
                return Ok(true);
            }
        }
        Ok(false)
    }
}

impl<R> CompiledTerm<R> {
    fn evaluate(&self, record: &R) -> Result<bool, EvalError> {
        for value in &self.values {
            if !value.evaluate(record)? {
                return Ok(false);
            }
        }
        Ok(true)
    }
}

impl<R> CompiledValue<R> {
    fn evaluate(&self, record: &R) -> Result<bool, EvalError> {
        match self {
            CompiledValue::Constant(b) => Ok(*b),
            CompiledValue::Comparison { left, op, right } => {
                let left = left(record)?;
                let right = right(record)?;
                compare(&left, *op, &right)
            }
            CompiledValue::SubExpr(inner) => inner.evaluate(record),
        }
    }
}

impl<R: 'static> Default for Condition<R> {
    fn default() -> Self {
        Condition::always()
    }
}

impl<R: 'static> From<bool> for Condition<R> {
    fn from(result: bool) -> Self {
        Condition::constant(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{resolver::constant, value::Value};
    use std::sync::{
        Arc,
        atomic::{AtomicUsize, Ordering},
    };

    type Record = Value;

    fn failing(calls: Arc<AtomicUsize>) -> Getter<Record> {
        Arc::new(move |_: &Record| {
            calls.fetch_add(1, Ordering::SeqCst);
            Err(EvalError::MissingField("missing".into()))
        })
    }

    fn value(v: CompiledValue<Record>) -> CompiledTerm<Record> {
        CompiledTerm { values: vec![v] }
    }

    #[test]
    fn or_stops_at_first_true_term() {
        let calls = Arc::new(AtomicUsize::new(0));
        let condition = Condition::from_expression(CompiledExpression {
            terms: vec![
                value(CompiledValue::Constant(true)),
                value(CompiledValue::Comparison {
                    left: failing(calls.clone()),
                    op: CompareOp::Eq,
                    right: constant(Value::Nil),
                }),
            ],
        });

        assert!(condition.evaluate(&Value::Nil).unwrap());
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn and_stops_at_first_false_value() {
        let calls = Arc::new(AtomicUsize::new(0));
        let condition = Condition::from_expression(CompiledExpression {
            terms: vec![CompiledTerm {
                values: vec![
                    CompiledValue::Constant(false),
                    CompiledValue::Comparison {
                        left: failing(calls.clone()),
                        op: CompareOp::Eq,
                        right: constant(Value::Nil),
                    },
                ],
            }],
        });

        assert!(!condition.evaluate(&Value::Nil).unwrap());
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn reached_failure_propagates() {
        let calls = Arc::new(AtomicUsize::new(0));
        let condition: Condition<Record> =
            Condition::comparison(failing(calls.clone()), CompareOp::Eq, constant(Value::Nil));

        assert_eq!(
            condition.evaluate(&Value::Nil),
            Err(EvalError::MissingField("missing".into()))
        );
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn always_and_constant() {
        assert!(Condition::<Record>::always().evaluate(&Value::Nil).unwrap());
        assert!(!Condition::<Record>::constant(false).evaluate(&Value::Nil).unwrap());
    }
}
