use std::{collections::HashSet, rc::Rc};

use crate::{
    ast::Expr,
    error::RuntimeError,
    interpreter::{
        environment::EnvRef,
        evaluator::core::{EvalResult, Interpreter},
        value::{core::Value, set_value::SetValue, tensor::Tensor},
    },
};

impl Interpreter {
    /// Evaluates a list literal into an array.
    ///
    /// Numbers and booleans become the elements of a vector. Arrays of equal
    /// shape are stacked along a new leading axis, so `[[1, 2], [3, 4]]` is a
    /// 2×2 matrix. `[]` is an empty vector.
    ///
    /// The array holds integers unless some element is a real, so `[1, 2]`
    /// is an integer vector and `[1.0, 2]` a float one.
    ///
    /// # Errors
    /// `RuntimeError::TypeError` for non-numeric elements, for a mix of
    /// numbers and arrays, and for arrays of unequal shape.
    pub(crate) fn eval_list_literal(&mut self,
                                    elements: &[Expr],
                                    line: usize,
                                    env: &EnvRef)
                                    -> EvalResult<Value> {
        let values = elements.iter()
                             .map(|e| self.evaluate(e, env))
                             .collect::<EvalResult<Vec<_>>>()?;

        if values.iter().all(Value::is_numeric) {
            let data = values.iter()
                             .map(|v| v.as_real(line))
                             .collect::<EvalResult<Vec<_>>>()?;
            let integral = !values.iter().any(|v| matches!(v, Value::Real(_)));
            return Ok(Value::Array(Rc::new(Tensor::vector(data).with_integral(integral))));
        }

        let mut parts = Vec::with_capacity(values.len());
        for value in &values {
            match value {
                Value::Array(tensor) => parts.push(tensor.as_ref()),
                other if other.is_numeric() => {
                    return Err(RuntimeError::TypeError { details: "cannot mix numbers and arrays in a list".to_string(),
                                                         line });
                },
                other => {
                    return Err(RuntimeError::TypeError { details: format!("arrays hold numbers, found {}",
                                                                          other.type_name()),
                                                         line });
                },
            }
        }

        Tensor::stack(&parts).map(|t| Value::Array(Rc::new(t)))
                             .ok_or_else(|| RuntimeError::TypeError { details: "list elements must all have the same shape".to_string(),
                                                                      line })
    }

    /// Evaluates a set literal.
    ///
    /// Elements are evaluated from left to right; duplicates collapse into a
    /// single member.
    ///
    /// # Errors
    /// `RuntimeError::TypeError` for elements that cannot be set members.
    pub(crate) fn eval_set_literal(&mut self,
                                   elements: &[Expr],
                                   line: usize,
                                   env: &EnvRef)
                                   -> EvalResult<Value> {
        let mut set = HashSet::with_capacity(elements.len());
        for element in elements {
            let value = self.evaluate(element, env)?;
            set.insert(SetValue::from_value(&value, line)?);
        }
        Ok(Value::from(set))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interpreter::{
        evaluator::function::plot::TextPlotter, lexer::tokenize, parser::core::parse,
    };

    fn eval(source: &str) -> EvalResult<Value> {
        let program = parse(&tokenize(&format!("r = {source}\n")).unwrap()).unwrap();
        let mut interpreter = Interpreter::with_io(Box::new(std::io::sink()),
                                                   Box::new(TextPlotter::default()));
        interpreter.interpret(&program)?;
        Ok(interpreter.global("r").unwrap_or(Value::None))
    }

    #[test]
    fn nested_lists_stack_into_matrices() {
        let value = eval("[[1, 2], [3, 4], [5, 6]]").unwrap();
        let Value::Array(tensor) = value else {
            panic!("expected an array");
        };
        assert_eq!(tensor.shape(), &[3, 2]);
    }

    #[test]
    fn booleans_are_numbers_and_empty_lists_are_vectors() {
        assert_eq!(eval("[True, 2]").unwrap().to_string(), "[1 2]");

        let Value::Array(empty) = eval("[]").unwrap() else {
            panic!("expected an array");
        };
        assert_eq!(empty.shape(), &[0]);
    }

    #[test]
    fn a_single_real_makes_the_whole_array_float() {
        assert_eq!(eval("[1, 2]").unwrap().to_string(), "[1 2]");
        assert_eq!(eval("[1.0, 2.5]").unwrap().to_string(), "[1.  2.5]");
        assert_eq!(eval("[[1, 2], [3.5, 4]]").unwrap().to_string(), "[[1.  2. ]\n [3.5 4. ]]");
        assert_eq!(eval("[[1, 2], [3, 4]]").unwrap().to_string(), "[[1 2]\n [3 4]]");
    }

    #[test]
    fn malformed_lists_are_type_errors() {
        assert!(matches!(eval("[1, [2]]"), Err(RuntimeError::TypeError { .. })));
        assert!(matches!(eval("[[1], [2, 3]]"), Err(RuntimeError::TypeError { .. })));
        assert!(matches!(eval("[\"a\"]"), Err(RuntimeError::TypeError { .. })));
    }

    #[test]
    fn set_literals_absorb_duplicates() {
        assert_eq!(eval("{2, 1, 2.0, True}").unwrap().to_string(), "{1, 2}");
        assert_eq!(eval("{\"b\", 3, \"a\"}").unwrap().to_string(), "{3, 'a', 'b'}");
        assert!(matches!(eval("{[1]}"), Err(RuntimeError::TypeError { .. })));
    }
}
