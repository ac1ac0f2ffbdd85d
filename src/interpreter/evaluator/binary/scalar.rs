use crate::{
    ast::BinaryOperator,
    error::RuntimeError,
    interpreter::{
        evaluator::{
            binary::core::unsupported,
            core::{EvalResult, Interpreter},
        },
        value::core::Value,
    },
    util::num::i64_to_f64,
};

/// The integer value of an `Integer` or `Bool` operand.
pub(crate) const fn as_integer(value: &Value) -> Option<i64> {
    match value {
        Value::Integer(n) => Some(*n),
        Value::Bool(b) => Some(*b as i64),
        _ => None,
    }
}

impl Interpreter {
    /// Evaluates a scalar arithmetic operation.
    ///
    /// Two integer operands (booleans count as `0` and `1`) use checked
    /// integer arithmetic. As soon as one operand is real, the operation is
    /// done in `f64`. Division is true division; it stays an integer only when
    /// it is exact. Real results that hold an integral value become integers.
    ///
    /// The operator must be one of `Add`, `Sub`, `Mul` or `Div`.
    ///
    /// # Parameters
    /// - `op`: The arithmetic operator.
    /// - `left`: Left operand.
    /// - `right`: Right operand.
    /// - `line`: Line number for error reporting.
    ///
    /// # Errors
    /// - `RuntimeError::DivisionByZero` for a zero divisor.
    /// - `RuntimeError::Overflow` if an integer result does not fit.
    ///
    /// # Example
    /// ```
    /// use mathpy::{
    ///     ast::BinaryOperator,
    ///     interpreter::{evaluator::core::Interpreter, value::core::Value},
    /// };
    ///
    /// let result = Interpreter::eval_scalar_op(BinaryOperator::Mul,
    ///                                          &Value::Real(1.5),
    ///                                          &Value::Real(3.0),
    ///                                          1).unwrap();
    /// assert_eq!(result, Value::Real(4.5));
    ///
    /// let result = Interpreter::eval_scalar_op(BinaryOperator::Div,
    ///                                          &Value::Integer(7),
    ///                                          &Value::Integer(2),
    ///                                          1).unwrap();
    /// assert_eq!(result, Value::Real(3.5));
    /// ```
    pub fn eval_scalar_op(op: BinaryOperator,
                          left: &Value,
                          right: &Value,
                          line: usize)
                          -> EvalResult<Value> {
        use BinaryOperator::{Add, Div, Mul, Sub};

        if let (Some(a), Some(b)) = (as_integer(left), as_integer(right)) {
            let result = match op {
                Add => a.checked_add(b),
                Sub => a.checked_sub(b),
                Mul => a.checked_mul(b),
                Div => {
                    if b == 0 {
                        return Err(RuntimeError::DivisionByZero { line });
                    }
                    if a.checked_rem(b) != Some(0) {
                        return Ok(Value::number(i64_to_f64(a) / i64_to_f64(b)));
                    }
                    a.checked_div(b)
                },
                _ => return Err(unsupported(op, left, right, line)),
            };
            return result.map(Value::Integer).ok_or(RuntimeError::Overflow { line });
        }

        let a = left.as_real(line)?;
        let b = right.as_real(line)?;

        let result = match op {
            Add => a + b,
            Sub => a - b,
            Mul => a * b,
            Div => {
                if b == 0.0 {
                    return Err(RuntimeError::DivisionByZero { line });
                }
                a / b
            },
            _ => return Err(unsupported(op, left, right, line)),
        };

        Ok(Value::number(result))
    }
}
