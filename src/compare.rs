//! Comparison rules shared by where-clauses and functions.
//!
//! - `==` / `!=` work between any two values. Numbers compare by value, so
//!   `1 == 1.0`; everything else compares structurally.
//! - `<`, `<=`, `>`, `>=` are defined for number against number and string
//!   against string only. Any other pairing is an
//!   [`EvalError::Comparison`], never a silent `false`.

use std::cmp::Ordering;

use rust_decimal::{
    Decimal,
    prelude::{FromPrimitive, ToPrimitive},
};

use crate::{ast::CompareOp, error::EvalError, value::Value};

/// Order two numeric values. `None` when either side is not a number or a
/// float is NaN.
pub fn compare_numbers(left: &Value, right: &Value) -> Option<Ordering> {
    match (left, right) {
        (Value::Int(a), Value::Int(b)) => Some(a.cmp(b)),
        (Value::Float(a), Value::Float(b)) => a.partial_cmp(b),
        (Value::Int(a), Value::Float(b)) => mixed_cmp(*a, *b),
        (Value::Float(a), Value::Int(b)) => mixed_cmp(*b, *a).map(Ordering::reverse),
        _ => None,
    }
}

/// Compare an integer with a float without losing precision on large integers.
/// Floats that do not convert to a `Decimal` exactly are compared as `f64`.
fn mixed_cmp(int: i64, float: f64) -> Option<Ordering> {
    if let Some(id) = Decimal::from_i64(int)
        && let Some(fd) = Decimal::from_f64_retain(float)
        && fd.to_f64() == Some(float)
    {
        return Some(id.cmp(&fd));
    }
    (int as f64).partial_cmp(&float)
}

fn is_number(value: &Value) -> bool {
    matches!(value, Value::Int(_) | Value::Float(_))
}

/// Equality as used by `==`.
pub fn values_equal(left: &Value, right: &Value) -> bool {
    if is_number(left) && is_number(right) {
        return compare_numbers(left, right) == Some(Ordering::Equal);
    }
    left == right
}

/// Apply `op` to two resolved values.
///
/// # Examples
///
/// ```
/// use ottl_lang::{CompareOp, Value, compare::compare};
///
/// assert!(compare(&Value::Int(2), CompareOp::Lt, &Value::Float(2.5)).unwrap());
/// assert!(compare(&Value::from("cat"), CompareOp::Lt, &Value::from("dog")).unwrap());
/// assert!(compare(&Value::from("1"), CompareOp::Lt, &Value::Int(2)).is_err());
/// ```
pub fn compare(left: &Value, op: CompareOp, right: &Value) -> Result<bool, EvalError> {
    let result = match op {
        CompareOp::Eq => values_equal(left, right),
        CompareOp::Ne => !values_equal(left, right),
        CompareOp::Lt => ordering(left, op, right)? == Ordering::Less,
        CompareOp::Lte => ordering(left, op, right)? != Ordering::Greater,
        CompareOp::Gt => ordering(left, op, right)? == Ordering::Greater,
        CompareOp::Gte => ordering(left, op, right)? != Ordering::Less,
    };

    tracing::trace!(?left, %op, ?right, result, "compared values");
    Ok(result)
}

fn ordering(left: &Value, op: CompareOp, right: &Value) -> Result<Ordering, EvalError> {
    match (left, right) {
        (Value::String(a), Value::String(b)) => Some(a.cmp(b)),
        (a, b) if is_number(a) && is_number(b) => compare_numbers(a, b),
        _ => None,
    }
    .ok_or(EvalError::Comparison {
        op,
        left: left.type_name(),
        right: right.type_name(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn int_and_float_are_equal_by_value() {
        assert!(values_equal(&Value::Int(1), &Value::Float(1.0)));
        assert!(!values_equal(&Value::Int(1), &Value::Float(1.5)));
    }

    #[test]
    fn large_ints_compare_exactly_against_floats() {
        let big = Value::Int(9_007_199_254_740_993);
        let float = Value::Float(9_007_199_254_740_992.0);
        assert_eq!(compare_numbers(&big, &float), Some(Ordering::Greater));
    }

    #[test]
    fn tiny_floats_are_not_zero() {
        let zero = Value::Int(0);
        assert!(!values_equal(&zero, &Value::Float(1e-40)));
        assert!(!values_equal(&zero, &Value::Float(1e-29)));
        assert!(compare(&zero, CompareOp::Lt, &Value::Float(1e-40)).unwrap());
        assert!(compare(&zero, CompareOp::Gt, &Value::Float(-1e-40)).unwrap());
        assert_eq!(
            compare_numbers(&Value::Float(1e-40), &zero),
            Some(Ordering::Greater)
        );
    }

    #[test]
    fn floats_beyond_decimal_range() {
        assert_eq!(
            compare_numbers(&Value::Int(i64::MAX), &Value::Float(1e30)),
            Some(Ordering::Less)
        );
        assert_eq!(
            compare_numbers(&Value::Int(i64::MIN), &Value::Float(-1e30)),
            Some(Ordering::Greater)
        );
        assert_eq!(compare_numbers(&Value::Int(1), &Value::Float(f64::NAN)), None);
    }

    #[test]
    fn nil_equality() {
        assert!(compare(&Value::Nil, CompareOp::Eq, &Value::Nil).unwrap());
        assert!(compare(&Value::Nil, CompareOp::Ne, &Value::from("x")).unwrap());
    }

    #[test]
    fn ordering_against_nil_is_an_error() {
        let err = compare(&Value::Nil, CompareOp::Gt, &Value::from("a")).unwrap_err();
        assert_eq!(
            err,
            EvalError::Comparison {
                op: CompareOp::Gt,
                left: "nil",
                right: "string"
            }
        );
    }

    #[test]
    fn nan_ordering_is_an_error() {
        assert!(compare(&Value::Float(f64::NAN), CompareOp::Lt, &Value::Int(1)).is_err());
    }

    #[test]
    fn inclusive_operators() {
        assert!(compare(&Value::Int(3), CompareOp::Lte, &Value::Int(3)).unwrap());
        assert!(compare(&Value::Int(3), CompareOp::Gte, &Value::Float(3.0)).unwrap());
        assert!(!compare(&Value::from("b"), CompareOp::Lte, &Value::from("a")).unwrap());
    }
}
