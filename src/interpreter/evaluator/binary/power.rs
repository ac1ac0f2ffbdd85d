use crate::{
    error::RuntimeError,
    interpreter::{
        evaluator::{
            binary::scalar::as_integer,
            core::{EvalResult, Interpreter},
        },
        value::core::Value,
    },
    util::num::i64_to_f64,
};

impl Interpreter {
    /// Raises a scalar to a scalar power.
    ///
    /// An integer base with a non-negative integer exponent is computed
    /// exactly. Everything else goes through `f64::powf`, and an integral
    /// result is returned as an integer.
    ///
    /// # Errors
    /// - `RuntimeError::DivisionByZero` when zero is raised to a negative
    ///   power.
    /// - `RuntimeError::Overflow` if an exact integer power does not fit.
    ///
    /// # Example
    /// ```
    /// use mathpy::interpreter::{evaluator::core::Interpreter, value::core::Value};
    ///
    /// assert_eq!(Interpreter::eval_pow(&Value::Integer(2), &Value::Integer(9), 1).unwrap(),
    ///            Value::Integer(512));
    /// assert_eq!(Interpreter::eval_pow(&Value::Integer(2), &Value::Integer(-1), 1).unwrap(),
    ///            Value::Real(0.5));
    /// ```
    pub fn eval_pow(base: &Value, exponent: &Value, line: usize) -> EvalResult<Value> {
        if let (Some(b), Some(e)) = (as_integer(base), as_integer(exponent))
           && e >= 0
        {
            if let Ok(e) = u32::try_from(e) {
                return b.checked_pow(e).map(Value::Integer).ok_or(RuntimeError::Overflow { line });
            }
            if b.abs() > 1 {
                return Err(RuntimeError::Overflow { line });
            }
            return Ok(Value::number(i64_to_f64(b).powf(i64_to_f64(e))));
        }

        let b = base.as_real(line)?;
        let e = exponent.as_real(line)?;

        if b == 0.0 && e < 0.0 {
            return Err(RuntimeError::DivisionByZero { line });
        }

        Ok(Value::number(b.powf(e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exact_integer_powers() {
        assert_eq!(Interpreter::eval_pow(&Value::Integer(-3), &Value::Integer(3), 1),
                   Ok(Value::Integer(-27)));
        assert_eq!(Interpreter::eval_pow(&Value::Integer(5), &Value::Integer(0), 1),
                   Ok(Value::Integer(1)));
    }

    #[test]
    fn real_powers_collapse_when_integral() {
        assert_eq!(Interpreter::eval_pow(&Value::Real(4.0), &Value::Real(0.5), 1),
                   Ok(Value::Integer(2)));
        assert_eq!(Interpreter::eval_pow(&Value::Real(2.0), &Value::Real(0.5), 1),
                   Ok(Value::Real(2.0_f64.sqrt())));
    }

    #[test]
    fn zero_to_a_negative_power_divides_by_zero() {
        assert_eq!(Interpreter::eval_pow(&Value::Integer(0), &Value::Integer(-2), 3),
                   Err(RuntimeError::DivisionByZero { line: 3 }));
    }

    #[test]
    fn huge_integer_powers_overflow() {
        assert_eq!(Interpreter::eval_pow(&Value::Integer(10), &Value::Integer(40), 1),
                   Err(RuntimeError::Overflow { line: 1 }));
        assert_eq!(Interpreter::eval_pow(&Value::Integer(-1), &Value::Integer(5_000_000_001), 1),
                   Ok(Value::Integer(-1)));
    }
}
