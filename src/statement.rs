use std::fmt;

use crate::{error::EvalError, evaluator::Condition, registry::Action, value::Value};

/// A bound statement: a compiled condition paired with a compiled action.
///
/// Built once by [`bind`](crate::binder::bind) or a
/// [`Compiler`](crate::binder::Compiler), then shared read-only by every
/// worker. Nothing inside is mutated by [`execute`](Statement::execute), so
/// a `Statement<R>` can sit behind an `Arc` and be used from many threads
/// as long as each record is handed to one execution at a time.
pub struct Statement<R> {
    source: String,
    condition: Condition<R>,
    action: Action<R>,
}

/// Outcome of running one statement against one record.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Execution {
    /// What the action returned. Always `None` when the condition did not match.
    pub result: Option<Value>,
    pub condition_matched: bool,
}

impl<R: 'static> Statement<R> {
    pub fn new(source: impl Into<String>, condition: Condition<R>, action: Action<R>) -> Self {
        Statement {
            source: source.into(),
            condition,
            action,
        }
    }

    /// Text the statement was compiled from.
    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn condition(&self) -> &Condition<R> {
        &self.condition
    }

    /// Evaluate the condition and, only if it holds, run the action.
    ///
    /// `Ok` with `condition_matched == false` means the predicate was false and
    /// the record was not touched. An `Err` is scoped to this record; the
    /// statement stays usable.
    pub fn execute(&self, record: &mut R) -> Result<Execution, EvalError> {
        if !self.condition.evaluate(record)? {
            tracing::debug!(statement = %self.source, "condition did not match");
            return Ok(Execution::default());
        }

        let result = (self.action)(record)?;
        tracing::trace!(statement = %self.source, ?result, "executed");
        Ok(Execution {
            result,
            condition_matched: true,
        })
    }
}

impl<R> fmt::Debug for Statement<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Statement")
            .field("source", &self.source)
            .finish_non_exhaustive()
    }
}

/// Run `statements` in order against one record.
///
/// Stops at the first error. Returns how many statements had a matching
/// condition.
pub fn execute_all<R: 'static>(statements: &[Statement<R>], record: &mut R) -> Result<usize, EvalError> {
    let mut matched = 0;
    for statement in statements {
        if statement.execute(record)?.condition_matched {
            matched += 1;
        }
    }
    Ok(matched)
}
