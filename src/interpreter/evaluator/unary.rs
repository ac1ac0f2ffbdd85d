use std::rc::Rc;

use crate::{
    ast::UnaryOperator,
    error::RuntimeError,
    interpreter::{
        evaluator::core::{EvalResult, Interpreter},
        value::core::Value,
    },
};

impl Interpreter {
    /// Evaluates a unary operation on a value.
    ///
    /// Supported operators:
    /// - `Plus`: identity on numbers and arrays; booleans become integers.
    /// - `Negate`: numeric negation, elementwise on arrays. Integer negation
    ///   is checked.
    /// - `Not`: the negated truth value of any operand.
    ///
    /// # Parameters
    /// - `op`: Unary operator.
    /// - `value`: Input value.
    /// - `line`: Line number for error reporting.
    ///
    /// # Returns
    /// The computed `Value` wrapped in `EvalResult`.
    ///
    /// # Example
    /// ```
    /// use mathpy::{
    ///     ast::UnaryOperator,
    ///     interpreter::{evaluator::core::Interpreter, value::core::Value},
    /// };
    ///
    /// let v = Interpreter::eval_unary(UnaryOperator::Negate, &Value::Integer(5), 1).unwrap();
    /// assert_eq!(v, Value::Integer(-5));
    ///
    /// let v = Interpreter::eval_unary(UnaryOperator::Not, &Value::Integer(0), 1).unwrap();
    /// assert_eq!(v, Value::Bool(true));
    /// ```
    pub fn eval_unary(op: UnaryOperator, value: &Value, line: usize) -> EvalResult<Value> {
        match (op, value) {
            (UnaryOperator::Not, _) => Ok(Value::Bool(!value.is_truthy(line)?)),

            (UnaryOperator::Plus, Value::Integer(_) | Value::Real(_) | Value::Array(_)) => {
                Ok(value.clone())
            },
            (UnaryOperator::Plus, Value::Bool(b)) => Ok(Value::Integer(i64::from(*b))),

            (UnaryOperator::Negate, Value::Integer(n)) => {
                n.checked_neg().map(Value::Integer).ok_or(RuntimeError::Overflow { line })
            },
            (UnaryOperator::Negate, Value::Real(r)) => Ok(Value::Real(-r)),
            (UnaryOperator::Negate, Value::Bool(b)) => Ok(Value::Integer(-i64::from(*b))),
            (UnaryOperator::Negate, Value::Array(tensor)) => {
                Ok(Value::Array(Rc::new(tensor.map(|x| -x))))
            },

            _ => Err(RuntimeError::UnsupportedUnaryOperator { operator: op.to_string(),
                                                              operand: value.type_name(),
                                                              line }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interpreter::value::tensor::Tensor;

    #[test]
    fn negation_of_arrays_is_elementwise() {
        let array = Value::Array(Rc::new(Tensor::vector(vec![1.0, -2.0])));
        let negated = Interpreter::eval_unary(UnaryOperator::Negate, &array, 1).unwrap();
        assert_eq!(negated, Value::Array(Rc::new(Tensor::vector(vec![-1.0, 2.0]))));
    }

    #[test]
    fn negating_the_smallest_integer_overflows() {
        let result = Interpreter::eval_unary(UnaryOperator::Negate, &Value::Integer(i64::MIN), 2);
        assert_eq!(result, Err(RuntimeError::Overflow { line: 2 }));
    }

    #[test]
    fn strings_cannot_be_negated() {
        let err = Interpreter::eval_unary(UnaryOperator::Negate, &Value::from("a"), 3).unwrap_err();
        assert_eq!(err.to_string(), "Error on line 3: Unsupported unary operator '-' for str.");
    }

    #[test]
    fn plus_turns_booleans_into_integers() {
        let v = Interpreter::eval_unary(UnaryOperator::Plus, &Value::Bool(true), 1).unwrap();
        assert_eq!(v, Value::Integer(1));
    }
}
