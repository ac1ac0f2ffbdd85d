use crate::{
    ast::BinaryOperator,
    error::RuntimeError,
    interpreter::{
        evaluator::{
            binary::scalar::as_integer,
            core::{EvalResult, Interpreter},
        },
        value::{core::Value, tensor::MAX_ELEMENTS},
    },
};

/// Builds the error for an operator that has no meaning for its operands.
pub(crate) fn unsupported(op: BinaryOperator,
                          left: &Value,
                          right: &Value,
                          line: usize)
                          -> RuntimeError {
    RuntimeError::UnsupportedOperator { operator: op.to_string(),
                                        left: left.type_name(),
                                        right: right.type_name(),
                                        line }
}

/// Repeats a string `count` times; a count below one gives the empty string.
fn repeat_str(text: &str, count: i64, line: usize) -> EvalResult<Value> {
    let count = usize::try_from(count).unwrap_or(0);

    match text.len().checked_mul(count) {
        Some(len) if len <= MAX_ELEMENTS => Ok(Value::from(text.repeat(count).as_str())),
        _ => Err(RuntimeError::InvalidArgument { details: format!("cannot repeat a string {count} times"),
                                                 line }),
    }
}

impl Interpreter {
    /// Evaluates a binary operation between two values.
    ///
    /// Both operands are already evaluated; `and` and `or` therefore never
    /// short-circuit. The operation is routed as follows:
    /// 1. Two sets go to `eval_set_op`, whatever the operator.
    /// 2. `and`/`or` call `eval_logic`.
    /// 3. Relational and equality operators use `eval_comparison`.
    /// 4. Arithmetic operators use `eval_arithmetic`.
    ///
    /// `|` and `&` on anything but two sets are unsupported.
    ///
    /// # Parameters
    /// - `op`: The operator.
    /// - `left`: Left operand.
    /// - `right`: Right operand.
    /// - `line`: Line number for error reporting.
    ///
    /// # Returns
    /// An `EvalResult<Value>` containing the evaluated result.
    ///
    /// # Example
    /// ```
    /// use mathpy::{
    ///     ast::BinaryOperator,
    ///     interpreter::{evaluator::core::Interpreter, value::core::Value},
    /// };
    ///
    /// let result = Interpreter::eval_binary(BinaryOperator::Div,
    ///                                       &Value::Integer(4),
    ///                                       &Value::Integer(2),
    ///                                       1);
    /// assert_eq!(result.unwrap(), Value::Integer(2));
    /// ```
    pub fn eval_binary(op: BinaryOperator,
                       left: &Value,
                       right: &Value,
                       line: usize)
                       -> EvalResult<Value> {
        use BinaryOperator::{
            Add, And, Div, ElemAdd, ElemDiv, ElemMul, ElemPow, ElemSub, Equal, Greater,
            GreaterEqual, Intersection, Less, LessEqual, Mul, NotEqual, Or, Pow, Sub, Union,
        };

        if let (Value::Set(a), Value::Set(b)) = (left, right) {
            return Self::eval_set_op(op, a, b, line);
        }

        match op {
            And | Or => Self::eval_logic(op, left, right, line),
            Equal | NotEqual | Less | Greater | LessEqual | GreaterEqual => {
                Self::eval_comparison(op, left, right, line)
            },
            Union | Intersection => Err(unsupported(op, left, right, line)),
            Add | Sub | Mul | Div | Pow | ElemAdd | ElemSub | ElemMul | ElemDiv | ElemPow => {
                Self::eval_arithmetic(op, left, right, line)
            },
        }
    }

    /// Evaluates an arithmetic operator.
    ///
    /// - `String + String` concatenates.
    /// - `String * Integer` (either order) repeats the string.
    /// - `*` on two arrays is the matrix product.
    /// - Any array operand, or a dotted operator, makes the operation
    ///   elementwise with broadcasting.
    /// - Otherwise both operands are scalars: `^` goes to `eval_pow`, the rest
    ///   to `eval_scalar_op`.
    fn eval_arithmetic(op: BinaryOperator,
                       left: &Value,
                       right: &Value,
                       line: usize)
                       -> EvalResult<Value> {
        match (left, right) {
            (Value::Str(a), Value::Str(b)) if op == BinaryOperator::Add => {
                Ok(Value::from(format!("{a}{b}").as_str()))
            },
            (Value::Str(text), count) | (count, Value::Str(text))
                if op == BinaryOperator::Mul && as_integer(count).is_some() =>
            {
                repeat_str(text, as_integer(count).unwrap_or(0), line)
            },
            _ if !is_arithmetic_operand(left) || !is_arithmetic_operand(right) => {
                Err(unsupported(op, left, right, line))
            },
            (Value::Array(a), Value::Array(b)) if op == BinaryOperator::Mul => {
                Self::eval_matmul(a, b, line)
            },
            (Value::Array(_), _) | (_, Value::Array(_)) => {
                Self::eval_elementwise(op, left, right, line)
            },
            _ if op.is_elementwise() => Self::eval_elementwise(op, left, right, line),
            _ if op == BinaryOperator::Pow => Self::eval_pow(left, right, line),
            _ => Self::eval_scalar_op(op, left, right, line),
        }
    }
}

/// Numbers, booleans and arrays take part in arithmetic.
const fn is_arithmetic_operand(value: &Value) -> bool {
    value.is_numeric() || matches!(value, Value::Array(_))
}

#[cfg(test)]
mod tests {
    use std::rc::Rc;

    use super::*;
    use crate::interpreter::value::tensor::Tensor;

    fn vector(data: &[f64]) -> Value {
        Value::Array(Rc::new(Tensor::vector(data.to_vec())))
    }

    #[test]
    fn strings_concatenate_but_do_not_subtract() {
        let joined = Interpreter::eval_binary(BinaryOperator::Add,
                                              &Value::from("ab"),
                                              &Value::from("cd"),
                                              1).unwrap();
        assert_eq!(joined, Value::from("abcd"));

        let err = Interpreter::eval_binary(BinaryOperator::Sub,
                                           &Value::from("ab"),
                                           &Value::from("cd"),
                                           1).unwrap_err();
        assert_eq!(err.to_string(),
                   "Error on line 1: Unsupported operator '-' for str and str.");
    }

    #[test]
    fn strings_repeat_when_multiplied_by_an_integer() {
        let mul = |left: &Value, right: &Value| {
            Interpreter::eval_binary(BinaryOperator::Mul, left, right, 2)
        };

        assert_eq!(mul(&Value::from("ab"), &Value::Integer(2)), Ok(Value::from("abab")));
        assert_eq!(mul(&Value::Integer(3), &Value::from("x")), Ok(Value::from("xxx")));
        assert_eq!(mul(&Value::from("ab"), &Value::Integer(-1)), Ok(Value::from("")));
        assert_eq!(mul(&Value::from("ab"), &Value::Bool(true)), Ok(Value::from("ab")));

        assert!(matches!(mul(&Value::from("ab"), &Value::Real(2.0)),
                         Err(RuntimeError::UnsupportedOperator { .. })));
        assert!(matches!(mul(&Value::from("ab"), &Value::from("cd")),
                         Err(RuntimeError::UnsupportedOperator { .. })));
        assert!(matches!(mul(&Value::from("ab"), &Value::Integer(i64::MAX)),
                         Err(RuntimeError::InvalidArgument { line: 2, .. })));
    }

    #[test]
    fn pipe_needs_two_sets() {
        let err = Interpreter::eval_binary(BinaryOperator::Union,
                                           &Value::Integer(1),
                                           &Value::Integer(2),
                                           5).unwrap_err();
        assert!(matches!(err, RuntimeError::UnsupportedOperator { line: 5, .. }));
    }

    #[test]
    fn star_is_the_dot_product_and_dot_star_is_elementwise() {
        let a = vector(&[1.0, 2.0, 3.0]);
        let b = vector(&[4.0, 5.0, 6.0]);

        let dot = Interpreter::eval_binary(BinaryOperator::Mul, &a, &b, 1).unwrap();
        assert_eq!(dot, Value::Integer(32));

        let product = Interpreter::eval_binary(BinaryOperator::ElemMul, &a, &b, 1).unwrap();
        assert_eq!(product, vector(&[4.0, 10.0, 18.0]));
    }

    #[test]
    fn scalars_broadcast_over_arrays() {
        let a = vector(&[1.0, 2.0]);
        let sum = Interpreter::eval_binary(BinaryOperator::Add, &Value::Real(0.5), &a, 1).unwrap();
        assert_eq!(sum, vector(&[1.5, 2.5]));

        let scaled = Interpreter::eval_binary(BinaryOperator::Mul, &a, &Value::Integer(3), 1).unwrap();
        assert_eq!(scaled, vector(&[3.0, 6.0]));
    }

    #[test]
    fn dotted_operators_on_scalars_use_float_semantics() {
        let q = Interpreter::eval_binary(BinaryOperator::ElemDiv,
                                         &Value::Integer(1),
                                         &Value::Integer(0),
                                         1).unwrap();
        assert_eq!(q, Value::Real(f64::INFINITY));

        let p = Interpreter::eval_binary(BinaryOperator::ElemPow,
                                         &Value::Integer(2),
                                         &Value::Integer(10),
                                         1).unwrap();
        assert_eq!(p, Value::Integer(1024));
    }
}
