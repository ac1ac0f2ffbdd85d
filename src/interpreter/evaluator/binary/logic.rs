use crate::{
    ast::BinaryOperator,
    interpreter::{
        evaluator::{
            binary::core::unsupported,
            core::{EvalResult, Interpreter},
        },
        value::core::Value,
    },
};

impl Interpreter {
    /// Evaluates a logical operation between two values.
    ///
    /// The operands are converted to booleans using `is_truthy`. Both of them
    /// have been evaluated before this is called, so neither operator
    /// short-circuits.
    ///
    /// # Parameters
    /// - `op`: The logical operator.
    /// - `left`: Left operand.
    /// - `right`: Right operand.
    /// - `line`: Line number for error reporting.
    ///
    /// # Returns
    /// An `EvalResult<Value>` containing a boolean.
    ///
    /// # Example
    /// ```
    /// use mathpy::{
    ///     ast::BinaryOperator,
    ///     interpreter::{evaluator::core::Interpreter, value::core::Value},
    /// };
    ///
    /// let result = Interpreter::eval_logic(BinaryOperator::Or,
    ///                                      &Value::Integer(0),
    ///                                      &Value::from("x"),
    ///                                      1);
    /// assert_eq!(result.unwrap(), Value::Bool(true));
    /// ```
    pub fn eval_logic(op: BinaryOperator,
                      left: &Value,
                      right: &Value,
                      line: usize)
                      -> EvalResult<Value> {
        match op {
            BinaryOperator::And => Ok(Value::Bool(left.is_truthy(line)? & right.is_truthy(line)?)),
            BinaryOperator::Or => Ok(Value::Bool(left.is_truthy(line)? | right.is_truthy(line)?)),
            _ => Err(unsupported(op, left, right, line)),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::rc::Rc;

    use super::*;
    use crate::{error::RuntimeError, interpreter::value::tensor::Tensor};

    #[test]
    fn both_sides_are_coerced_even_when_the_left_decides() {
        let ambiguous = Value::Array(Rc::new(Tensor::vector(vec![1.0, 2.0])));

        let err = Interpreter::eval_logic(BinaryOperator::And, &Value::Bool(false), &ambiguous, 2)
            .unwrap_err();
        assert_eq!(err, RuntimeError::AmbiguousTruth { line: 2 });
    }

    #[test]
    fn results_are_booleans() {
        let result = Interpreter::eval_logic(BinaryOperator::And,
                                             &Value::Integer(3),
                                             &Value::from("y"),
                                             1).unwrap();
        assert_eq!(result, Value::Bool(true));
    }
}
