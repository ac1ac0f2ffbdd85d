use std::rc::Rc;

use crate::{
    error::RuntimeError,
    interpreter::{
        evaluator::core::EvalResult,
        value::{core::Value, tensor::Tensor},
    },
    util::num::{f64_to_i64_truncated, i64_to_usize_checked},
};

/// Coerces an argument to an integer, truncating reals toward zero.
fn integer_arg(name: &str, value: &Value, line: usize) -> EvalResult<i64> {
    match value {
        Value::Integer(n) => Ok(*n),
        Value::Bool(b) => Ok(i64::from(*b)),
        Value::Real(r) => f64_to_i64_truncated(*r, line),
        other => Err(RuntimeError::TypeError { details: format!("{name}() expects integer arguments, found {}",
                                                                other.type_name()),
                                               line }),
    }
}

fn array(tensor: Tensor) -> Value {
    Value::Array(Rc::new(tensor))
}

/// Returns an integer vector of evenly stepped values.
///
/// - `range(stop)` counts from `0` to `stop`,
/// - `range(start, stop)` counts from `start` to `stop`,
/// - `range(start, stop, step)` uses the given step, which may be negative.
///
/// `stop` is never included. Arguments are truncated to integers.
///
/// # Errors
/// `RuntimeError::InvalidArgument` if the step is zero or the range is too
/// long to allocate.
///
/// # Example
/// ```
/// use mathpy::interpreter::{evaluator::function::constructors::range, value::core::Value};
///
/// let v = range(&[Value::Integer(10), Value::Integer(0), Value::Integer(-3)], 1).unwrap();
/// assert_eq!(v.to_string(), "[10  7  4  1]");
/// ```
pub fn range(args: &[Value], line: usize) -> EvalResult<Value> {
    let ints = args.iter()
                   .map(|v| integer_arg("range", v, line))
                   .collect::<EvalResult<Vec<_>>>()?;

    let (start, stop, step) = match ints.as_slice() {
        [stop] => (0, *stop, 1),
        [start, stop] => (*start, *stop, 1),
        [start, stop, step] => (*start, *stop, *step),
        _ => {
            return Err(RuntimeError::ArgumentCountMismatch { name: "range".to_string(),
                                                             expected: "1, 2 or 3".to_string(),
                                                             found: args.len(),
                                                             line });
        },
    };

    if step == 0 {
        return Err(RuntimeError::InvalidArgument { details: "range() step must not be zero".to_string(),
                                                   line });
    }

    Ok(array(Tensor::arange(start, stop, step, line)?))
}

/// Reads the dimensions passed to `zeros` or `ones` as an array shape.
fn shape_args(name: &str, args: &[Value], line: usize) -> EvalResult<Vec<usize>> {
    args.iter()
        .map(|v| i64_to_usize_checked(integer_arg(name, v, line)?, "dimension", line))
        .collect()
}

/// Returns a float array of zeros.
///
/// One argument gives a vector of that length; several arguments give an
/// array of that shape.
///
/// # Errors
/// `RuntimeError::InvalidArgument` for a negative dimension, or for a shape
/// too large to allocate.
///
/// # Example
/// ```
/// use mathpy::interpreter::{evaluator::function::constructors::zeros, value::core::Value};
///
/// let v = zeros(&[Value::Integer(2), Value::Integer(2)], 1).unwrap();
/// assert_eq!(v.to_string(), "[[0. 0.]\n [0. 0.]]");
/// ```
pub fn zeros(args: &[Value], line: usize) -> EvalResult<Value> {
    Ok(array(Tensor::filled(shape_args("zeros", args, line)?, 0.0, line)?))
}

/// Returns a float array of ones, shaped like [`zeros`].
pub fn ones(args: &[Value], line: usize) -> EvalResult<Value> {
    Ok(array(Tensor::filled(shape_args("ones", args, line)?, 1.0, line)?))
}

/// Returns `count` evenly spaced floats from `start` to `stop`, both
/// included.
///
/// # Errors
/// `RuntimeError::InvalidArgument` for a negative or oversized count.
///
/// # Example
/// ```
/// use mathpy::interpreter::{evaluator::function::constructors::linspace, value::core::Value};
///
/// let v = linspace(&[Value::Integer(0), Value::Integer(1), Value::Integer(5)], 1).unwrap();
/// assert_eq!(v.to_string(), "[0.   0.25 0.5  0.75 1.  ]");
/// ```
pub fn linspace(args: &[Value], line: usize) -> EvalResult<Value> {
    let start = args[0].as_real(line)?;
    let stop = args[1].as_real(line)?;
    let count = i64_to_usize_checked(integer_arg("linspace", &args[2], line)?, "count", line)?;

    Ok(array(Tensor::linspace(start, stop, count, line)?))
}
