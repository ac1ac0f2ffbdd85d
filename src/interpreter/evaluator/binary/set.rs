use std::collections::HashSet;

use crate::{
    ast::BinaryOperator,
    error::RuntimeError,
    interpreter::{
        evaluator::core::{EvalResult, Interpreter},
        value::{core::Value, set_value::SetValue},
    },
};

impl Interpreter {
    /// Evaluates an operator whose operands are both sets.
    ///
    /// - `|` produces the union.
    /// - `&` produces the intersection.
    /// - `-` produces the difference.
    ///
    /// # Parameters
    /// - `op`: The set operator.
    /// - `left`: Left-hand set.
    /// - `right`: Right-hand set.
    /// - `line`: Line number for error reporting.
    ///
    /// # Errors
    /// `RuntimeError::UnsupportedOperator` for any other operator, comparisons
    /// included.
    ///
    /// # Example
    /// ```
    /// use std::collections::HashSet;
    ///
    /// use mathpy::{
    ///     ast::BinaryOperator,
    ///     interpreter::{
    ///         evaluator::core::Interpreter,
    ///         value::{core::Value, set_value::SetValue},
    ///     },
    /// };
    ///
    /// let a: HashSet<SetValue> = [SetValue::Integer(1), SetValue::Integer(2)].into();
    /// let b: HashSet<SetValue> = [SetValue::Integer(2), SetValue::Integer(3)].into();
    ///
    /// let result = Interpreter::eval_set_op(BinaryOperator::Intersection, &a, &b, 1).unwrap();
    /// assert_eq!(result.to_string(), "{2}");
    /// ```
    pub fn eval_set_op(op: BinaryOperator,
                       left: &HashSet<SetValue>,
                       right: &HashSet<SetValue>,
                       line: usize)
                       -> EvalResult<Value> {
        use BinaryOperator::{Intersection, Sub, Union};

        let result = match op {
            Union => Value::from(left.union(right).cloned().collect::<HashSet<_>>()),
            Intersection => Value::from(left.intersection(right).cloned().collect::<HashSet<_>>()),
            Sub => Value::from(left.difference(right).cloned().collect::<HashSet<_>>()),
            _ => {
                return Err(RuntimeError::UnsupportedOperator { operator: op.to_string(),
                                                               left: "set",
                                                               right: "set",
                                                               line });
            },
        };

        Ok(result)
    }
}
