use std::{cmp::Ordering, rc::Rc};

use crate::{
    ast::BinaryOperator,
    interpreter::{
        evaluator::{
            binary::{core::unsupported, scalar::as_integer},
            core::{EvalResult, Interpreter},
        },
        value::core::Value,
    },
};

/// Decides an operator from the ordering of its operands.
///
/// `None` stands for unordered operands (a NaN is involved); only `!=` holds
/// for those.
fn holds(op: BinaryOperator, ordering: Option<Ordering>) -> bool {
    use BinaryOperator::{Equal, Greater, GreaterEqual, Less, LessEqual, NotEqual};

    match (op, ordering) {
        (NotEqual, None) => true,
        (_, None) => false,
        (Equal, Some(o)) => o == Ordering::Equal,
        (NotEqual, Some(o)) => o != Ordering::Equal,
        (Less, Some(o)) => o == Ordering::Less,
        (LessEqual, Some(o)) => o != Ordering::Greater,
        (Greater, Some(o)) => o == Ordering::Greater,
        (GreaterEqual, Some(o)) => o != Ordering::Less,
        _ => false,
    }
}

impl Interpreter {
    /// Evaluates one of the six comparison operators.
    ///
    /// - Numbers and booleans compare numerically.
    /// - Strings compare lexicographically.
    /// - A comparison involving an array and a number or array is
    ///   elementwise with broadcasting and yields an integer array of
    ///   `0`/`1`.
    /// - Any other pair of values supports only `==` and `!=`; values of
    ///   different kinds are never equal.
    ///
    /// # Errors
    /// - `RuntimeError::UnsupportedOperator` for ordering operators on values
    ///   that have no order.
    /// - `RuntimeError::ShapeMismatch` for arrays that cannot be broadcast.
    ///
    /// # Example
    /// ```
    /// use mathpy::{
    ///     ast::BinaryOperator,
    ///     interpreter::{evaluator::core::Interpreter, value::core::Value},
    /// };
    ///
    /// let v = Interpreter::eval_comparison(BinaryOperator::Less,
    ///                                      &Value::Integer(1),
    ///                                      &Value::Real(1.5),
    ///                                      1).unwrap();
    /// assert_eq!(v, Value::Bool(true));
    ///
    /// let v = Interpreter::eval_comparison(BinaryOperator::Equal,
    ///                                      &Value::from("a"),
    ///                                      &Value::Integer(1),
    ///                                      1).unwrap();
    /// assert_eq!(v, Value::Bool(false));
    /// ```
    pub fn eval_comparison(op: BinaryOperator,
                           left: &Value,
                           right: &Value,
                           line: usize)
                           -> EvalResult<Value> {
        let is_equality = matches!(op, BinaryOperator::Equal | BinaryOperator::NotEqual);

        match (left, right) {
            (Value::Array(_), other) | (other, Value::Array(_))
                if other.is_numeric() || matches!(other, Value::Array(_)) =>
            {
                let a = left.to_tensor(line)?;
                let b = right.to_tensor(line)?;
                let truth =
                    a.zip_with(&b, line, |x, y| if holds(op, x.partial_cmp(&y)) { 1.0 } else { 0.0 })?;
                Ok(Value::Array(Rc::new(truth.with_integral(true))))
            },
            _ if left.is_numeric() && right.is_numeric() => {
                let ordering = match (as_integer(left), as_integer(right)) {
                    (Some(a), Some(b)) => Some(a.cmp(&b)),
                    _ => left.as_real(line)?.partial_cmp(&right.as_real(line)?),
                };
                Ok(Value::Bool(holds(op, ordering)))
            },
            (Value::Str(a), Value::Str(b)) => Ok(Value::Bool(holds(op, Some(a.cmp(b))))),
            _ if is_equality => {
                let equal = left == right;
                Ok(Value::Bool(if op == BinaryOperator::Equal { equal } else { !equal }))
            },
            _ => Err(unsupported(op, left, right, line)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{error::RuntimeError, interpreter::value::tensor::Tensor};

    fn compare(op: BinaryOperator, left: &Value, right: &Value) -> EvalResult<Value> {
        Interpreter::eval_comparison(op, left, right, 1)
    }

    #[test]
    fn integers_and_reals_compare_as_one_number_type() {
        assert_eq!(compare(BinaryOperator::Equal, &Value::Integer(2), &Value::Real(2.0)),
                   Ok(Value::Bool(true)));
        assert_eq!(compare(BinaryOperator::GreaterEqual, &Value::Bool(true), &Value::Integer(1)),
                   Ok(Value::Bool(true)));
    }

    #[test]
    fn nan_is_only_unequal() {
        let nan = Value::Real(f64::NAN);
        assert_eq!(compare(BinaryOperator::Equal, &nan, &nan), Ok(Value::Bool(false)));
        assert_eq!(compare(BinaryOperator::NotEqual, &nan, &nan), Ok(Value::Bool(true)));
        assert_eq!(compare(BinaryOperator::Less, &nan, &Value::Integer(1)), Ok(Value::Bool(false)));
    }

    #[test]
    fn array_comparisons_are_elementwise() {
        let a = Value::Array(Rc::new(Tensor::vector(vec![1.0, 2.0, 3.0])));
        let result = compare(BinaryOperator::Greater, &a, &Value::Integer(1)).unwrap();
        assert_eq!(result,
                   Value::Array(Rc::new(Tensor::vector(vec![0.0, 1.0, 1.0]).with_integral(true))));
        assert_eq!(result.to_string(), "[0 1 1]");
    }

    #[test]
    fn strings_have_an_order_but_none_does_not() {
        assert_eq!(compare(BinaryOperator::Less, &Value::from("abc"), &Value::from("abd")),
                   Ok(Value::Bool(true)));

        let err = compare(BinaryOperator::Less, &Value::None, &Value::None).unwrap_err();
        assert!(matches!(err, RuntimeError::UnsupportedOperator { .. }));
        assert_eq!(compare(BinaryOperator::Equal, &Value::None, &Value::None),
                   Ok(Value::Bool(true)));
    }
}
