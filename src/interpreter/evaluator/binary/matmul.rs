use crate::{
    error::RuntimeError,
    interpreter::{
        evaluator::core::{EvalResult, Interpreter},
        value::{core::Value, tensor::Tensor},
    },
};

impl Interpreter {
    /// Performs matrix multiplication between two arrays.
    ///
    /// - vector × vector: the dot product, returned as a number.
    /// - matrix × matrix: the matrix product.
    /// - matrix × vector and vector × matrix: a vector.
    ///
    /// The product holds integers when both operands do.
    ///
    /// # Parameters
    /// - `a`: Left operand.
    /// - `b`: Right operand.
    /// - `line`: Line number for error reporting.
    ///
    /// # Errors
    /// `RuntimeError::ShapeMismatch` if the inner dimensions differ or either
    /// operand has more than two axes.
    ///
    /// # Example
    /// ```
    /// use mathpy::interpreter::{
    ///     evaluator::core::Interpreter,
    ///     value::{core::Value, tensor::Tensor},
    /// };
    ///
    /// let a = Tensor::from_shape(vec![2, 2], vec![1.0, 2.0, 3.0, 4.0]).unwrap()
    ///                                                                  .with_integral(true);
    /// let b = Tensor::from_shape(vec![2, 2], vec![5.0, 6.0, 7.0, 8.0]).unwrap()
    ///                                                                  .with_integral(true);
    ///
    /// let result = Interpreter::eval_matmul(&a, &b, 1).unwrap();
    /// assert_eq!(result.to_string(), "[[19 22]\n [43 50]]");
    ///
    /// let halves = Tensor::from_shape(vec![2, 2], vec![0.5, 0.0, 0.0, 0.5]).unwrap();
    /// let result = Interpreter::eval_matmul(&a, &halves, 1).unwrap();
    /// assert_eq!(result.to_string(), "[[0.5 1. ]\n [1.5 2. ]]");
    /// ```
    pub fn eval_matmul(a: &Tensor, b: &Tensor, line: usize) -> EvalResult<Value> {
        a.dot(b)
         .map(Value::from_arithmetic)
         .ok_or_else(|| RuntimeError::ShapeMismatch { left: a.shape().to_vec(),
                                                      right: b.shape().to_vec(),
                                                      line })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matrix_times_vector_is_a_vector() {
        let m = Tensor::from_shape(vec![2, 3], vec![1.0, 0.0, 0.0, 0.0, 1.0, 1.0]).unwrap();
        let v = Tensor::vector(vec![1.0, 2.0, 3.0]);

        let result = Interpreter::eval_matmul(&m, &v, 1).unwrap();
        assert_eq!(result, Value::from(Tensor::vector(vec![1.0, 5.0])));
    }

    #[test]
    fn mismatched_inner_dimensions_fail() {
        let a = Tensor::vector(vec![1.0, 2.0]);
        let b = Tensor::vector(vec![1.0, 2.0, 3.0]);

        let err = Interpreter::eval_matmul(&a, &b, 7).unwrap_err();
        assert_eq!(err,
                   RuntimeError::ShapeMismatch { left:  vec![2],
                                                 right: vec![3],
                                                 line:  7, });
    }
}
