use std::{fmt, io::Write, rc::Rc};

use log::debug;

use crate::{
    ast::{Expr, FunctionDef},
    error::RuntimeError,
    interpreter::{
        environment::{EnvRef, Environment},
        evaluator::{
            core::{EvalResult, Flow, Interpreter},
            function::{builtin, constructors, linalg, print, stats},
        },
        value::core::Value,
    },
};

/// Handler behind a builtin function.
///
/// Most builtins only look at their arguments. Those that produce program
/// output also receive the interpreter's output sink.
#[derive(Clone, Copy)]
pub enum BuiltinFn {
    /// Computes a value from the arguments alone.
    Pure(fn(&[Value], usize) -> EvalResult<Value>),
    /// Writes to the output sink.
    Output(fn(&mut dyn Write, &[Value], usize) -> EvalResult<Value>),
}

/// Specifies the allowed number of arguments for a builtin.
///
/// - `Exact(n)` means the builtin must receive exactly `n` arguments.
/// - `OneOf(slice)` means the builtin accepts any arity listed in `slice`.
/// - `AtLeast(n)` means the builtin takes `n` or more arguments.
#[derive(Clone, Copy, Debug)]
pub enum Arity {
    /// Exactly this many arguments.
    Exact(usize),
    /// Any of the listed counts.
    OneOf(&'static [usize]),
    /// This many arguments or more.
    AtLeast(usize),
}

/// Defines builtin functions by generating a lookup table and a name list.
///
/// Each entry provides:
/// - a string name,
/// - an arity specification,
/// - a [`BuiltinFn`] implementing the builtin.
///
/// The macro produces:
/// - `BuiltinDef` (metadata behind a [`Builtin`] value),
/// - `BUILTIN_TABLE` (static table installed into every global environment),
/// - `BUILTIN_FUNCTIONS` (public list of builtin names).
macro_rules! builtin_functions {
    (
        $(
            $name:literal => {
                arity: $arity:expr,
                func: $func:expr $(,)?
            }
        ),* $(,)?
    ) => {
        /// An entry of the builtin table.
        pub struct BuiltinDef {
            name:  &'static str,
            arity: Arity,
            func:  BuiltinFn,
        }
        static BUILTIN_TABLE: &[BuiltinDef] = &[
            $(
                BuiltinDef { name: $name, arity: $arity, func: $func },
            )*
        ];
        /// Names of all builtin functions, in table order.
        pub const BUILTIN_FUNCTIONS: &[&str] = &[
            $($name,)*
        ];
    };
}

builtin_functions! {
    "print"    => { arity: Arity::AtLeast(0), func: BuiltinFn::Output(print::print) },
    "sin"      => { arity: Arity::Exact(1), func: BuiltinFn::Pure(builtin::sin) },
    "cos"      => { arity: Arity::Exact(1), func: BuiltinFn::Pure(builtin::cos) },
    "tan"      => { arity: Arity::Exact(1), func: BuiltinFn::Pure(builtin::tan) },
    "exp"      => { arity: Arity::Exact(1), func: BuiltinFn::Pure(builtin::exp) },
    "ln"       => { arity: Arity::Exact(1), func: BuiltinFn::Pure(builtin::ln) },
    "log10"    => { arity: Arity::Exact(1), func: BuiltinFn::Pure(builtin::log10) },
    "log2"     => { arity: Arity::Exact(1), func: BuiltinFn::Pure(builtin::log2) },
    "sqrt"     => { arity: Arity::Exact(1), func: BuiltinFn::Pure(builtin::sqrt) },
    "ceil"     => { arity: Arity::Exact(1), func: BuiltinFn::Pure(builtin::ceil) },
    "floor"    => { arity: Arity::Exact(1), func: BuiltinFn::Pure(builtin::floor) },
    "abs"      => { arity: Arity::Exact(1), func: BuiltinFn::Pure(builtin::abs) },
    "round"    => { arity: Arity::OneOf(&[1, 2]), func: BuiltinFn::Pure(builtin::round) },
    "mean"     => { arity: Arity::Exact(1), func: BuiltinFn::Pure(stats::mean) },
    "median"   => { arity: Arity::Exact(1), func: BuiltinFn::Pure(stats::median) },
    "std"      => { arity: Arity::Exact(1), func: BuiltinFn::Pure(stats::std) },
    "det"      => { arity: Arity::Exact(1), func: BuiltinFn::Pure(linalg::det) },
    "inv"      => { arity: Arity::Exact(1), func: BuiltinFn::Pure(linalg::inv) },
    "eig"      => { arity: Arity::Exact(1), func: BuiltinFn::Pure(linalg::eig) },
    "range"    => { arity: Arity::OneOf(&[1, 2, 3]), func: BuiltinFn::Pure(constructors::range) },
    "zeros"    => { arity: Arity::AtLeast(1), func: BuiltinFn::Pure(constructors::zeros) },
    "ones"     => { arity: Arity::AtLeast(1), func: BuiltinFn::Pure(constructors::ones) },
    "linspace" => { arity: Arity::Exact(3), func: BuiltinFn::Pure(constructors::linspace) },
}

impl Arity {
    /// Tests whether the given argument count satisfies this arity constraint.
    ///
    /// Returns `true` if the count is permitted, `false` otherwise.
    fn check(&self, n: usize) -> bool {
        match self {
            Self::Exact(m) => n == *m,
            Self::OneOf(arr) => arr.contains(&n),
            Self::AtLeast(m) => n >= *m,
        }
    }
}

impl fmt::Display for Arity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Exact(n) => write!(f, "{n}"),
            Self::AtLeast(n) => write!(f, "at least {n}"),
            Self::OneOf(counts) => match counts.split_last() {
                Some((last, [])) => write!(f, "{last}"),
                Some((last, rest)) => {
                    let rest: Vec<String> = rest.iter().map(ToString::to_string).collect();
                    write!(f, "{} or {last}", rest.join(", "))
                },
                None => write!(f, "no"),
            },
        }
    }
}

/// A native function, as stored in an environment.
///
/// Two builtins are equal when they refer to the same table entry.
#[derive(Clone, Copy)]
pub struct Builtin(&'static BuiltinDef);

impl Builtin {
    /// The name the builtin is installed under.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.0.name
    }

    /// Checks the arity and runs the builtin.
    ///
    /// # Errors
    /// `RuntimeError::ArgumentCountMismatch` for a wrong number of arguments,
    /// otherwise whatever the builtin reports.
    pub fn call(&self, out: &mut dyn Write, args: &[Value], line: usize) -> EvalResult<Value> {
        let def = self.0;
        if !def.arity.check(args.len()) {
            return Err(RuntimeError::ArgumentCountMismatch { name: def.name.to_string(),
                                                             expected: def.arity.to_string(),
                                                             found: args.len(),
                                                             line });
        }

        match def.func {
            BuiltinFn::Pure(func) => func(args, line),
            BuiltinFn::Output(func) => func(out, args, line),
        }
    }
}

impl PartialEq for Builtin {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.0, other.0)
    }
}

impl fmt::Debug for Builtin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Builtin({})", self.0.name)
    }
}

/// Binds every builtin function and constant in a global environment.
///
/// Besides the functions of the builtin table this installs `pi`, `True` and
/// `False`. All of them are ordinary bindings and can be reassigned.
pub fn install_builtins(env: &mut Environment) {
    for def in BUILTIN_TABLE {
        env.set(def.name, Value::Builtin(Builtin(def)));
    }

    env.set("pi", Value::Real(std::f64::consts::PI));
    env.set("True", Value::Bool(true));
    env.set("False", Value::Bool(false));
}

impl Interpreter {
    /// Evaluates a function call.
    ///
    /// The arguments are evaluated left to right in the caller's environment
    /// before anything else happens. A call to `plot` goes to the plotter.
    /// Any other name is looked up along the environment chain:
    /// - a user-defined function runs in a new environment whose parent is
    ///   the caller's environment,
    /// - a builtin checks its arity and runs,
    /// - any other value is not callable.
    ///
    /// # Parameters
    /// - `name`: Function name.
    /// - `arguments`: Argument expressions.
    /// - `line`: Line number for error reporting.
    /// - `env`: The caller's environment.
    ///
    /// # Returns
    /// The function result. A user-defined function that finishes without
    /// `return` yields `None`.
    pub(crate) fn eval_function_call(&mut self,
                                     name: &str,
                                     arguments: &[Expr],
                                     line: usize,
                                     env: &EnvRef)
                                     -> EvalResult<Value> {
        let args = arguments.iter()
                            .map(|arg| self.evaluate(arg, env))
                            .collect::<EvalResult<Vec<_>>>()?;

        if name == "plot" {
            return self.eval_plot(&args, line);
        }

        let callee = env.borrow()
                        .get(name)
                        .ok_or_else(|| RuntimeError::UndefinedName { name: name.to_string(),
                                                                     line })?;

        match callee {
            Value::Function(def) => self.call_user_defined_function(&def, args, env),
            Value::Builtin(builtin) => builtin.call(self.out.as_mut(), &args, line),
            _ => Err(RuntimeError::NotCallable { name: name.to_string(),
                                                 line }),
        }
    }

    /// Executes a user-defined function.
    ///
    /// Parameters are bound positionally in a fresh environment. Parameters
    /// without an argument stay unbound and surplus arguments are dropped.
    fn call_user_defined_function(&mut self,
                                  def: &Rc<FunctionDef>,
                                  args: Vec<Value>,
                                  caller: &EnvRef)
                                  -> EvalResult<Value> {
        debug!("calling {}() with {} argument(s)", def.name, args.len());

        let local = Environment::child_of(caller);
        {
            let mut scope = local.borrow_mut();
            for (param, value) in def.params.iter().zip(args) {
                scope.set(param, value);
            }
        }

        let result = match self.execute_block(&def.body, &local)? {
            Flow::Return { value, .. } => value,
            Flow::Normal => Value::None,
        };

        debug!("{}() returned {}", def.name, result.repr());
        Ok(result)
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
    fn every_builtin_is_installed() {
        let interpreter = run("").unwrap();
        for name in BUILTIN_FUNCTIONS {
            assert!(matches!(interpreter.global(name), Some(Value::Builtin(b)) if b.name() == *name));
        }
        assert_eq!(interpreter.global("True"), Some(Value::Bool(true)));
    }

    #[test]
    fn arity_descriptions() {
        assert_eq!(Arity::Exact(1).to_string(), "1");
        assert_eq!(Arity::OneOf(&[1, 2, 3]).to_string(), "1, 2 or 3");
        assert_eq!(Arity::AtLeast(1).to_string(), "at least 1");
    }

    #[test]
    fn wrong_argument_counts_name_the_builtin() {
        let err = run("x = sqrt(1, 2)").err().unwrap();
        assert_eq!(err.to_string(),
                   "Error on line 1: sqrt() takes 1 argument(s) (2 given).");
    }

    #[test]
    fn missing_parameters_stay_unbound_and_extra_arguments_are_dropped() {
        let interpreter = run("def f(a, b):\n  return a\nend\nx = f(1, 2, 3)\n").unwrap();
        assert_eq!(interpreter.global("x"), Some(Value::Integer(1)));

        let err = run("def g(a, b):\n  return b\nend\nx = g(1)\n").err().unwrap();
        assert!(matches!(err, RuntimeError::UndefinedName { ref name, .. } if name == "b"));
    }

    #[test]
    fn functions_see_the_callers_environment() {
        let source = "def show():\n  return y\nend\n\
                      def outer():\n  y = 7\n  return show()\nend\n\
                      r = outer()\n";
        let interpreter = run(source).unwrap();
        assert_eq!(interpreter.global("r"), Some(Value::Integer(7)));
    }

    #[test]
    fn completion_without_return_yields_none() {
        let interpreter = run("def f():\n  x = 1\nend\nr = f()\n").unwrap();
        assert_eq!(interpreter.global("r"), Some(Value::None));
    }

    #[test]
    fn only_functions_are_callable() {
        let err = run("a = 3\nb = a(1)\n").err().unwrap();
        assert_eq!(err,
                   RuntimeError::NotCallable { name: "a".to_string(),
                                               line: 2, });
    }

    #[test]
    fn builtins_can_be_rebound() {
        let interpreter = run("sqrt = 2\nx = sqrt\n").unwrap();
        assert_eq!(interpreter.global("x"), Some(Value::Integer(2)));
    }
}
