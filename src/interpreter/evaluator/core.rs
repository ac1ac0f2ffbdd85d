use std::{io::Write, rc::Rc};

use log::{info, trace};

use crate::{
    ast::{Expr, Statement},
    error::RuntimeError,
    interpreter::{
        environment::{EnvRef, Environment},
        evaluator::function::{
            core::install_builtins,
            plot::{Plotter, TextPlotter},
        },
        value::core::Value,
    },
};

/// Result type used by the evaluator.
///
/// All evaluation functions return either a value of type `T` or a
/// `RuntimeError` describing the failure.
pub type EvalResult<T> = Result<T, RuntimeError>;

/// How a statement finished.
///
/// `Return` travels outwards through every enclosing block until the function
/// call that owns it turns it back into a value.
#[derive(Debug, Clone, PartialEq)]
pub enum Flow {
    /// Execution continues with the next statement.
    Normal,
    /// A `return` statement ran.
    Return {
        /// The returned value, `None` for a bare `return`.
        value: Value,
        /// Line of the `return` statement.
        line:  usize,
    },
}

/// Executes programs.
///
/// The interpreter owns the global environment, pre-populated with the
/// builtin functions and constants, together with the sinks that `print` and
/// `plot` write to. Globals persist across calls to [`Interpreter::interpret`].
///
/// ## Usage
///
/// ```
/// use mathpy::interpreter::{
///     evaluator::core::Interpreter, lexer::tokenize, parser::core::parse,
///     value::core::Value,
/// };
///
/// let tokens = tokenize("x = 4 / 2\n").unwrap();
/// let program = parse(&tokens).unwrap();
///
/// let mut interpreter = Interpreter::new();
/// interpreter.interpret(&program).unwrap();
///
/// assert_eq!(interpreter.global("x"), Some(Value::Integer(2)));
/// ```
pub struct Interpreter {
    globals:            EnvRef,
    pub(crate) out:     Box<dyn Write>,
    pub(crate) plotter: Box<dyn Plotter>,
}

impl Default for Interpreter {
    fn default() -> Self {
        Self::new()
    }
}

impl Interpreter {
    /// Creates an interpreter that prints to standard output and plots with
    /// the [`TextPlotter`].
    #[must_use]
    pub fn new() -> Self {
        Self::with_io(Box::new(std::io::stdout()), Box::new(TextPlotter::default()))
    }

    /// Creates an interpreter with the given output and plotting sinks.
    ///
    /// # Parameters
    /// - `out`: Receives everything written by `print`, and whatever the
    ///   plotter draws as text.
    /// - `plotter`: Receives every `plot` call.
    #[must_use]
    pub fn with_io(out: Box<dyn Write>, plotter: Box<dyn Plotter>) -> Self {
        let globals = Environment::new_global();
        install_builtins(&mut globals.borrow_mut());

        Self { globals,
               out,
               plotter }
    }

    /// Reads a global binding.
    #[must_use]
    pub fn global(&self, name: &str) -> Option<Value> {
        self.globals.borrow().get(name)
    }

    /// Runs a whole program in the global environment.
    ///
    /// # Errors
    /// Returns the first `RuntimeError` raised. A `return` executed outside
    /// any function is reported as `RuntimeError::ReturnOutsideFunction`.
    pub fn interpret(&mut self, statements: &[Statement]) -> EvalResult<()> {
        let globals = Rc::clone(&self.globals);

        match self.execute_block(statements, &globals)? {
            Flow::Normal => {
                info!("program finished after {} top-level statements", statements.len());
                Ok(())
            },
            Flow::Return { line, .. } => Err(RuntimeError::ReturnOutsideFunction { line }),
        }
    }

    /// Executes statements in order until one of them returns.
    ///
    /// Blocks do not open a scope: every statement runs in `env`.
    pub fn execute_block(&mut self, statements: &[Statement], env: &EnvRef) -> EvalResult<Flow> {
        for statement in statements {
            let flow = self.execute(statement, env)?;
            if matches!(flow, Flow::Return { .. }) {
                return Ok(flow);
            }
        }
        Ok(Flow::Normal)
    }

    /// Executes a single statement.
    ///
    /// # Parameters
    /// - `statement`: Statement to execute.
    /// - `env`: Environment the statement reads and writes.
    ///
    /// # Returns
    /// [`Flow::Return`] if a `return` ran, otherwise [`Flow::Normal`].
    pub fn execute(&mut self, statement: &Statement, env: &EnvRef) -> EvalResult<Flow> {
        trace!("line {}: executing statement", statement.line_number());

        match statement {
            Statement::Assign { name, value, .. } => {
                let value = self.evaluate(value, env)?;
                env.borrow_mut().set(name, value);
                Ok(Flow::Normal)
            },
            Statement::Compound(statements) => self.execute_block(statements, env),
            Statement::NoOp { .. } => Ok(Flow::Normal),
            Statement::If { condition,
                            then_block,
                            else_block,
                            line, } => {
                if self.evaluate(condition, env)?.is_truthy(*line)? {
                    self.execute_block(then_block, env)
                } else if let Some(else_block) = else_block {
                    self.execute_block(else_block, env)
                } else {
                    Ok(Flow::Normal)
                }
            },
            Statement::While { condition, body, line } => {
                while self.evaluate(condition, env)?.is_truthy(*line)? {
                    let flow = self.execute_block(body, env)?;
                    if matches!(flow, Flow::Return { .. }) {
                        return Ok(flow);
                    }
                }
                Ok(Flow::Normal)
            },
            Statement::For { var,
                             iterable,
                             body,
                             line, } => self.execute_for(var, iterable, body, *line, env),
            Statement::FunctionDef(def) => {
                env.borrow_mut().set(&def.name, Value::Function(Rc::clone(def)));
                Ok(Flow::Normal)
            },
            Statement::Return { value, line } => {
                let value = match value {
                    Some(expr) => self.evaluate(expr, env)?,
                    None => Value::None,
                };
                Ok(Flow::Return { value,
                                  line: *line })
            },
            Statement::Expression { expr, .. } => {
                self.evaluate(expr, env)?;
                Ok(Flow::Normal)
            },
        }
    }

    /// Evaluates an expression and returns the resulting value.
    ///
    /// This is the main entry point for expression evaluation. The evaluator
    /// dispatches on the expression variant: literals, variables, unary and
    /// binary operations, function calls, list and set literals, and
    /// subscripts.
    ///
    /// # Parameters
    /// - `expr`: Expression to evaluate.
    /// - `env`: Environment names are resolved in.
    pub fn evaluate(&mut self, expr: &Expr, env: &EnvRef) -> EvalResult<Value> {
        match expr {
            Expr::Literal { value, .. } => Ok(Value::from(value)),
            Expr::Variable { name, line } => {
                env.borrow()
                   .get(name)
                   .ok_or_else(|| RuntimeError::UndefinedName { name: name.clone(),
                                                                line: *line, })
            },
            Expr::UnaryOp { op, expr, line } => {
                let operand = self.evaluate(expr, env)?;
                Self::eval_unary(*op, &operand, *line)
            },
            Expr::BinaryOp { left,
                             op,
                             right,
                             line, } => {
                let left = self.evaluate(left, env)?;
                let right = self.evaluate(right, env)?;
                Self::eval_binary(*op, &left, &right, *line)
            },
            Expr::FunctionCall { name,
                                 arguments,
                                 line, } => self.eval_function_call(name, arguments, *line, env),
            Expr::ListLiteral { elements, line } => self.eval_list_literal(elements, *line, env),
            Expr::SetLiteral { elements, line } => self.eval_set_literal(elements, *line, env),
            Expr::Subscript { target,
                              indices,
                              line, } => self.eval_subscript(target, indices, *line, env),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interpreter::{lexer::tokenize, parser::core::parse};

    fn run(source: &str) -> EvalResult<Interpreter> {
        let program = parse(&tokenize(source).unwrap()).unwrap();
        let mut interpreter = Interpreter::with_io(Box::new(std::io::sink()),
                                                   Box::new(TextPlotter::default()));
        interpreter.interpret(&program)?;
        Ok(interpreter)
    }

    #[test]
    fn while_loop_counts() {
        let interpreter = run("i = 0\ntotal = 0\nwhile i < 5:\n  i = i + 1\n  total = total + i\nend\n")
            .unwrap();
        assert_eq!(interpreter.global("total"), Some(Value::Integer(15)));
    }

    #[test]
    fn else_branch_runs_when_condition_is_false() {
        let interpreter = run("if 0:\n  x = 1\nelse:\n  x = 2\nend\n").unwrap();
        assert_eq!(interpreter.global("x"), Some(Value::Integer(2)));
    }

    #[test]
    fn return_stops_a_function_early() {
        let source = "def f(n):\n  while 1:\n    if n > 3: return n end\n    n = n + 1\n  end\n  \
                      return 0\nend\nr = f(1)\n";
        let interpreter = run(source).unwrap();
        assert_eq!(interpreter.global("r"), Some(Value::Integer(4)));
    }

    #[test]
    fn return_at_top_level_is_an_error() {
        let err = run("x = 1\nif x:\n  return 5\nend\n").err().unwrap();
        assert_eq!(err, RuntimeError::ReturnOutsideFunction { line: 3 });
    }

    #[test]
    fn undefined_names_are_reported() {
        let err = run("y = x + 1").err().unwrap();
        assert_eq!(err,
                   RuntimeError::UndefinedName { name: "x".to_string(),
                                                 line: 1, });
    }

    #[test]
    fn ambiguous_conditions_fail() {
        let err = run("if [1, 2]: x = 1 end").err().unwrap();
        assert_eq!(err, RuntimeError::AmbiguousTruth { line: 1 });
    }
}
