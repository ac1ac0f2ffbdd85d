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

/// The scalar function an arithmetic operator applies to each element pair.
fn element_fn(op: BinaryOperator) -> Option<fn(f64, f64) -> f64> {
    use BinaryOperator::{Add, Div, ElemAdd, ElemDiv, ElemMul, ElemPow, ElemSub, Mul, Pow, Sub};

    match op {
        Add | ElemAdd => Some(|a, b| a + b),
        Sub | ElemSub => Some(|a, b| a - b),
        Mul | ElemMul => Some(|a, b| a * b),
        Div | ElemDiv => Some(|a, b| a / b),
        Pow | ElemPow => Some(f64::powf),
        _ => None,
    }
}

/// Whether an operator keeps integer operands integral.
///
/// Division never does; a power does unless some exponent is negative.
fn keeps_integers(op: BinaryOperator, exponents: &[f64]) -> bool {
    use BinaryOperator::{Div, ElemDiv, ElemPow, Pow};

    match op {
        Div | ElemDiv => false,
        Pow | ElemPow => exponents.iter().all(|&e| e >= 0.0),
        _ => true,
    }
}

impl Interpreter {
    /// Applies an arithmetic operator element by element.
    ///
    /// Numbers act as 0-dimensional arrays, so a scalar combines with every
    /// element of an array. Arrays are broadcast to a common shape. All
    /// arithmetic is done in `f64`: division by zero gives an infinity or
    /// NaN instead of an error. A 0-dimensional result becomes a number.
    ///
    /// The result holds integers when both operands do, except after a
    /// division or a negative power.
    ///
    /// # Errors
    /// - `RuntimeError::ShapeMismatch` if the shapes cannot be broadcast.
    /// - `RuntimeError::InvalidArgument` if the result would be too large.
    ///
    /// # Example
    /// ```
    /// use std::rc::Rc;
    ///
    /// use mathpy::{
    ///     ast::BinaryOperator,
    ///     interpreter::{
    ///         evaluator::core::Interpreter,
    ///         value::{core::Value, tensor::Tensor},
    ///     },
    /// };
    ///
    /// let a = Value::Array(Rc::new(Tensor::vector(vec![1.0, 2.0, 3.0])));
    /// let b = Value::Array(Rc::new(Tensor::vector(vec![2.0, 2.0, 2.0])));
    ///
    /// let result = Interpreter::eval_elementwise(BinaryOperator::ElemPow, &a, &b, 1).unwrap();
    /// assert_eq!(result, Value::Array(Rc::new(Tensor::vector(vec![1.0, 4.0, 9.0]))));
    /// ```
    pub fn eval_elementwise(op: BinaryOperator,
                            left: &Value,
                            right: &Value,
                            line: usize)
                            -> EvalResult<Value> {
        let f = element_fn(op).ok_or_else(|| unsupported(op, left, right, line))?;
        let a = left.to_tensor(line)?;
        let b = right.to_tensor(line)?;

        let integral = a.is_integral() && b.is_integral() && keeps_integers(op, b.data());

        Ok(Value::from_arithmetic(a.zip_with(&b, line, f)?.with_integral(integral)))
    }
}
