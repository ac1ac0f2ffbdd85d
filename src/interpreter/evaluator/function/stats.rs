use crate::{
    error::RuntimeError,
    interpreter::{evaluator::core::EvalResult, value::core::Value},
    util::num::usize_to_f64,
};

/// Collects the elements a reduction runs over.
///
/// A number counts as a single element; an array contributes all of its
/// elements regardless of shape.
fn elements(name: &str, value: &Value, line: usize) -> EvalResult<Vec<f64>> {
    match value {
        Value::Array(tensor) => Ok(tensor.data().to_vec()),
        v if v.is_numeric() => Ok(vec![v.as_real(line)?]),
        other => Err(RuntimeError::TypeError { details: format!("{name}() expects a number or an array, found {}",
                                                                other.type_name()),
                                               line }),
    }
}

fn average(data: &[f64]) -> f64 {
    data.iter().sum::<f64>() / usize_to_f64(data.len())
}

/// Returns the arithmetic mean of all elements.
///
/// The result is always a `Value::Real`. An empty array has a NaN mean.
///
/// # Example
/// ```
/// use std::rc::Rc;
///
/// use mathpy::interpreter::{
///     evaluator::function::stats::mean,
///     value::{core::Value, tensor::Tensor},
/// };
///
/// let v = Value::Array(Rc::new(Tensor::vector(vec![1.0, 2.0, 3.0, 4.0])));
/// assert_eq!(mean(&[v], 1).unwrap(), Value::Real(2.5));
/// ```
pub fn mean(args: &[Value], line: usize) -> EvalResult<Value> {
    Ok(Value::Real(average(&elements("mean", &args[0], line)?)))
}

/// Returns the median of all elements.
///
/// For an even number of elements this is the mean of the two middle ones.
pub fn median(args: &[Value], line: usize) -> EvalResult<Value> {
    let mut data = elements("median", &args[0], line)?;
    data.sort_by(f64::total_cmp);

    let n = data.len();
    let result = match n {
        0 => f64::NAN,
        _ if n % 2 == 1 => data[n / 2],
        _ => f64::midpoint(data[n / 2 - 1], data[n / 2]),
    };

    Ok(Value::Real(result))
}

/// Returns the population standard deviation of all elements.
pub fn std(args: &[Value], line: usize) -> EvalResult<Value> {
    let data = elements("std", &args[0], line)?;
    let mu = average(&data);
    let variance = average(&data.iter().map(|x| (x - mu).powi(2)).collect::<Vec<_>>());

    Ok(Value::Real(variance.sqrt()))
}

#[cfg(test)]
mod tests {
    use std::rc::Rc;

    use super::*;
    use crate::interpreter::value::tensor::Tensor;

    fn array(data: &[f64]) -> Value {
        Value::Array(Rc::new(Tensor::vector(data.to_vec())))
    }

    #[test]
    fn median_of_odd_and_even_counts() {
        assert_eq!(median(&[array(&[3.0, 1.0, 2.0])], 1).unwrap(), Value::Real(2.0));
        assert_eq!(median(&[array(&[4.0, 1.0, 3.0, 2.0])], 1).unwrap(), Value::Real(2.5));
    }

    #[test]
    fn std_is_the_population_deviation() {
        let data = array(&[2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0]);
        assert_eq!(std(&[data], 1).unwrap(), Value::Real(2.0));
    }

    #[test]
    fn reductions_accept_scalars_and_matrices() {
        assert_eq!(mean(&[Value::Integer(5)], 1).unwrap(), Value::Real(5.0));

        let m = Tensor::from_shape(vec![2, 2], vec![1.0, 2.0, 3.0, 6.0]).unwrap();
        assert_eq!(mean(&[Value::Array(Rc::new(m))], 1).unwrap(), Value::Real(3.0));
    }

    #[test]
    fn strings_cannot_be_reduced() {
        assert!(matches!(std(&[Value::from("abc")], 1), Err(RuntimeError::TypeError { .. })));
    }
}
