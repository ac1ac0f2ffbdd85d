use std::rc::Rc;

use crate::{
    error::RuntimeError,
    interpreter::{evaluator::core::EvalResult, value::core::Value},
    util::num::{f64_to_i64_truncated, integral_to_i64},
};

/// The error for an argument that is neither a number nor an array.
fn expected_numeric(name: &str, value: &Value, line: usize) -> RuntimeError {
    RuntimeError::TypeError { details: format!("{name}() expects a number or an array, found {}",
                                               value.type_name()),
                              line }
}

/// Applies `f` to a number, or to every element of an array.
///
/// Numbers (and booleans) give a `Value::Real`; arrays give a float array of
/// the same shape.
fn map_real(name: &str, value: &Value, line: usize, f: impl Fn(f64) -> f64) -> EvalResult<Value> {
    match value {
        Value::Array(tensor) => Ok(Value::Array(Rc::new(tensor.map(f).with_integral(false)))),
        v if v.is_numeric() => Ok(Value::Real(f(v.as_real(line)?))),
        other => Err(expected_numeric(name, other, line)),
    }
}

/// Applies an `f64` function elementwise.
///
/// The generated functions accept exactly one argument, a number or an
/// array. Scalar results are always `Value::Real`, even when integral; domain
/// errors follow IEEE semantics and yield NaN or an infinity.
///
/// # Parameters
/// - `args`: Slice containing one argument.
/// - `line`: Line number for error reporting.
///
/// # Returns
/// An `EvalResult<Value>` containing the computed value.
///
/// # Example
/// ```
/// use mathpy::interpreter::{evaluator::function::builtin::sqrt, value::core::Value};
///
/// assert_eq!(sqrt(&[Value::Integer(4)], 1).unwrap(), Value::Real(2.0));
/// assert!(matches!(sqrt(&[Value::Integer(-1)], 1).unwrap(), Value::Real(r) if r.is_nan()));
/// ```
macro_rules! elementwise_builtin {
    ($fname:ident, $real_fn:path) => {
        #[doc = concat!("Elementwise `", stringify!($fname), "`.")]
        pub fn $fname(args: &[Value], line: usize) -> EvalResult<Value> {
            map_real(stringify!($fname), &args[0], line, $real_fn)
        }
    };
}

elementwise_builtin!(sin, f64::sin);
elementwise_builtin!(cos, f64::cos);
elementwise_builtin!(tan, f64::tan);
elementwise_builtin!(exp, f64::exp);
elementwise_builtin!(ln, f64::ln);
elementwise_builtin!(log10, f64::log10);
elementwise_builtin!(log2, f64::log2);
elementwise_builtin!(sqrt, f64::sqrt);
elementwise_builtin!(ceil, f64::ceil);
elementwise_builtin!(floor, f64::floor);

/// Returns the absolute value of a number, or of every element of an array.
///
/// Integers and integer arrays stay integers.
///
/// # Errors
/// `RuntimeError::Overflow` for the absolute value of `i64::MIN`.
///
/// # Example
/// ```
/// use mathpy::interpreter::{evaluator::function::builtin::abs, value::core::Value};
///
/// assert_eq!(abs(&[Value::Integer(-3)], 1).unwrap(), Value::Integer(3));
/// assert_eq!(abs(&[Value::Real(-0.5)], 1).unwrap(), Value::Real(0.5));
/// ```
pub fn abs(args: &[Value], line: usize) -> EvalResult<Value> {
    match &args[0] {
        Value::Integer(n) => n.checked_abs().map(Value::Integer).ok_or(RuntimeError::Overflow { line }),
        Value::Bool(b) => Ok(Value::Integer(i64::from(*b))),
        Value::Array(tensor) => Ok(Value::Array(Rc::new(tensor.map(f64::abs)))),
        other => map_real("abs", other, line, f64::abs),
    }
}

/// Rounds half to even, optionally to a number of decimals.
///
/// The number of decimals is truncated to an integer and may be negative.
/// Integer input stays an integer; reals and arrays keep their kind.
///
/// # Parameters
/// - `args`: The value, and optionally the number of decimals.
/// - `line`: Line number for error reporting.
///
/// # Example
/// ```
/// use mathpy::interpreter::{evaluator::function::builtin::round, value::core::Value};
///
/// assert_eq!(round(&[Value::Real(2.5)], 1).unwrap(), Value::Real(2.0));
/// assert_eq!(round(&[Value::Real(3.14159), Value::Integer(2)], 1).unwrap(), Value::Real(3.14));
/// assert_eq!(round(&[Value::Integer(1250), Value::Integer(-2)], 1).unwrap(),
///            Value::Integer(1200));
/// ```
pub fn round(args: &[Value], line: usize) -> EvalResult<Value> {
    let decimals = match args.get(1) {
        Some(v) => f64_to_i64_truncated(v.as_real(line)?, line)?,
        None => 0,
    };
    let decimals = i32::try_from(decimals).map_err(|_| {
                       RuntimeError::InvalidArgument { details: format!("round() cannot use {decimals} decimals"),
                                                       line }
                   })?;

    let round_to = |x: f64| {
        let scale = 10f64.powf(f64::from(decimals).abs());
        match decimals {
            0 => x.round_ties_even(),
            d if d > 0 => (x * scale).round_ties_even() / scale,
            _ => (x / scale).round_ties_even() * scale,
        }
    };

    match &args[0] {
        Value::Integer(n) if decimals >= 0 => Ok(Value::Integer(*n)),
        Value::Integer(_) | Value::Bool(_) => {
            let rounded = round_to(args[0].as_real(line)?);
            Ok(integral_to_i64(rounded).map_or(Value::Real(rounded), Value::Integer))
        },
        Value::Array(tensor) => Ok(Value::Array(Rc::new(tensor.map(round_to)))),
        other => map_real("round", other, line, round_to),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interpreter::value::tensor::Tensor;

    #[test]
    fn elementwise_functions_map_over_arrays() {
        let array = Value::Array(Rc::new(Tensor::vector(vec![1.0, 4.0, 9.0])));
        assert_eq!(sqrt(&[array], 1).unwrap(),
                   Value::Array(Rc::new(Tensor::vector(vec![1.0, 2.0, 3.0]))));
    }

    #[test]
    fn float_functions_turn_integer_arrays_into_floats() {
        let ints = Value::Array(Rc::new(Tensor::vector(vec![1.0, 4.0]).with_integral(true)));
        assert_eq!(sqrt(&[ints.clone()], 1).unwrap().to_string(), "[1. 2.]");
        assert_eq!(floor(&[ints.clone()], 1).unwrap().to_string(), "[1. 4.]");
        assert_eq!(abs(&[ints.clone()], 1).unwrap().to_string(), "[1 4]");
        assert_eq!(round(&[ints], 1).unwrap().to_string(), "[1 4]");

        let floats = Value::Array(Rc::new(Tensor::vector(vec![-1.0, 2.5])));
        assert_eq!(abs(&[floats.clone()], 1).unwrap().to_string(), "[1.  2.5]");
        assert_eq!(round(&[floats], 1).unwrap().to_string(), "[-1.  2.]");
    }

    #[test]
    fn scalar_results_are_never_collapsed() {
        assert_eq!(floor(&[Value::Real(2.7)], 1).unwrap(), Value::Real(2.0));
        assert_eq!(exp(&[Value::Integer(0)], 1).unwrap(), Value::Real(1.0));
        assert_eq!(log2(&[Value::Bool(true)], 1).unwrap(), Value::Real(0.0));
    }

    #[test]
    fn strings_are_rejected() {
        let err = sin(&[Value::from("x")], 2).unwrap_err();
        assert_eq!(err.to_string(),
                   "Error on line 2: Type error: sin() expects a number or an array, found str.");
    }

    #[test]
    fn round_uses_bankers_rounding() {
        assert_eq!(round(&[Value::Real(0.5)], 1).unwrap(), Value::Real(0.0));
        assert_eq!(round(&[Value::Real(1.5)], 1).unwrap(), Value::Real(2.0));
        assert_eq!(round(&[Value::Integer(7)], 1).unwrap(), Value::Integer(7));

        let array = Value::Array(Rc::new(Tensor::vector(vec![0.5, 2.5, -1.5])));
        assert_eq!(round(&[array], 1).unwrap(),
                   Value::Array(Rc::new(Tensor::vector(vec![0.0, 2.0, -2.0]))));
    }

    #[test]
    fn abs_of_the_smallest_integer_overflows() {
        assert_eq!(abs(&[Value::Integer(i64::MIN)], 4),
                   Err(RuntimeError::Overflow { line: 4 }));
    }
}
