use std::rc::Rc;

use log::trace;

use crate::{
    ast::{Expr, Statement},
    error::RuntimeError,
    interpreter::{
        environment::EnvRef,
        evaluator::core::{EvalResult, Flow, Interpreter},
        value::{core::Value, set_value::SetValue},
    },
};

impl Interpreter {
    /// Executes a `for` loop.
    ///
    /// The iterable is evaluated once. For each element, the loop variable is
    /// rebound with [`Environment::update`] and the body runs in the current
    /// environment. Because of that, a loop variable that is not bound yet ends
    /// up in the outermost scope and stays visible after the loop.
    ///
    /// A `return` inside the body ends the loop and is passed on.
    ///
    /// # Parameters
    /// - `var`: Name of the loop variable.
    /// - `iterable`: Expression producing the values to iterate.
    /// - `body`: Statements executed once per element.
    /// - `line`: Line number for error reporting.
    /// - `env`: Environment the loop runs in.
    ///
    /// [`Environment::update`]: crate::interpreter::environment::Environment::update
    pub(crate) fn execute_for(&mut self,
                              var: &str,
                              iterable: &Expr,
                              body: &[Statement],
                              line: usize,
                              env: &EnvRef)
                              -> EvalResult<Flow> {
        let iterable = self.evaluate(iterable, env)?;
        let items = Self::iteration_items(&iterable, line)?;
        trace!("line {line}: for-loop over {} items", items.len());

        for item in items {
            env.borrow_mut().update(var, item);

            let flow = self.execute_block(body, env)?;
            if matches!(flow, Flow::Return { .. }) {
                return Ok(flow);
            }
        }

        Ok(Flow::Normal)
    }

    /// Lists the values a `for` loop visits.
    ///
    /// - arrays: slices along the first axis; a vector yields numbers,
    /// - strings: one-character strings,
    /// - sets: elements in sorted order,
    /// - tuples: their elements.
    ///
    /// # Errors
    /// `RuntimeError::NotIterable` for every other kind of value.
    fn iteration_items(iterable: &Value, line: usize) -> EvalResult<Vec<Value>> {
        match iterable {
            Value::Array(tensor) => Ok(tensor.outer().into_iter().map(Value::from).collect()),
            Value::Str(s) => Ok(s.chars().map(|c| Value::Str(Rc::from(c.to_string()))).collect()),
            Value::Set(set) => {
                let mut elements: Vec<&SetValue> = set.iter().collect();
                elements.sort();
                Ok(elements.into_iter().cloned().map(Value::from).collect())
            },
            Value::Tuple(items) => Ok(items.to_vec()),
            other => Err(RuntimeError::NotIterable { kind: other.type_name(),
                                                     line }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interpreter::{
        evaluator::function::plot::TextPlotter, lexer::tokenize, parser::core::parse,
    };

    fn run(source: &str) -> EvalResult<Interpreter> {
        let program = parse(&tokenize(source).unwrap()).unwrap();
        let mut interpreter = Interpreter::with_io(Box::new(std::io::sink()),
                                                   Box::new(TextPlotter::default()));
        interpreter.interpret(&program)?;
        Ok(interpreter)
    }

    #[test]
    fn iterating_a_vector_yields_numbers() {
        let interpreter = run("s = 0\nfor x in [1, 2, 3]: s = s + x end\n").unwrap();
        assert_eq!(interpreter.global("s"), Some(Value::Integer(6)));
        assert_eq!(interpreter.global("x"), Some(Value::Integer(3)));
    }

    #[test]
    fn iterating_a_matrix_yields_rows() {
        let interpreter = run("n = 0\nfor row in [[1, 2], [3, 4]]: n = n + row[1] end\n").unwrap();
        assert_eq!(interpreter.global("n"), Some(Value::Integer(6)));
    }

    #[test]
    fn iterating_strings_and_sets() {
        let interpreter = run("t = \"\"\nfor c in \"abc\": t = c + t end\n\
                               last = 0\nfor e in {3, 1, 2}: last = e end\n").unwrap();
        assert_eq!(interpreter.global("t"), Some(Value::from("cba")));
        assert_eq!(interpreter.global("last"), Some(Value::Integer(3)));
    }

    #[test]
    fn loop_variable_inside_a_function_lands_in_the_root_scope() {
        let interpreter = run("def f():\n  for k in range(3): x = k end\n  return x\nend\nr = f()\n")
            .unwrap();
        assert_eq!(interpreter.global("k"), Some(Value::Integer(2)));
        assert_eq!(interpreter.global("r"), Some(Value::Integer(2)));
        assert_eq!(interpreter.global("x"), None);
    }

    #[test]
    fn numbers_are_not_iterable() {
        let err = run("for i in 5: x = i end").err().unwrap();
        assert_eq!(err,
                   RuntimeError::NotIterable { kind: "int",
                                               line: 1, });
    }
}
