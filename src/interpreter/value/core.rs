use std::{collections::HashSet, fmt::Display, rc::Rc};

use crate::{
    ast::{FunctionDef, LiteralValue},
    error::RuntimeError,
    interpreter::{
        evaluator::{core::EvalResult, function::core::Builtin},
        value::{set_value::SetValue, tensor::Tensor},
    },
    util::num::{format_real, i64_to_f64, integral_to_i64},
};

/// Represents a runtime value in the interpreter.
///
/// This enum models all the possible types that can appear in expressions,
/// assignments, function returns, and conditional evaluations. Numbers are
/// split into `Integer` and `Real`; both behave as a single number type in
/// arithmetic and comparisons.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// An integer value (64 bit integer).
    Integer(i64),
    /// A numeric value (double precision floating-point).
    Real(f64),
    /// A string such as `"hello"`.
    Str(Rc<str>),
    /// A boolean value (`True` or `False`).
    Bool(bool),
    /// A dense numeric array with at least one axis.
    Array(Rc<Tensor>),
    /// A set of unique numbers and strings.
    Set(Rc<HashSet<SetValue>>),
    /// A fixed sequence of values, as returned by `eig`.
    Tuple(Rc<Vec<Self>>),
    /// A user-defined function.
    Function(Rc<FunctionDef>),
    /// A native function from the builtin table.
    Builtin(Builtin),
    /// The result of a function that returns nothing.
    None,
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Self::Real(v)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Self::Integer(v)
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Self::Str(Rc::from(v))
    }
}

impl From<Tensor> for Value {
    /// Wraps a tensor; a 0-dimensional tensor becomes a number of the
    /// tensor's kind, so an element read from a float array stays a real.
    fn from(tensor: Tensor) -> Self {
        match tensor.as_scalar() {
            Some(x) if tensor.is_integral() => Self::number(x),
            Some(x) => Self::Real(x),
            None => Self::Array(Rc::new(tensor)),
        }
    }
}

impl From<HashSet<SetValue>> for Value {
    fn from(set: HashSet<SetValue>) -> Self {
        Self::Set(Rc::new(set))
    }
}

impl From<&LiteralValue> for Value {
    fn from(lit: &LiteralValue) -> Self {
        match lit {
            LiteralValue::Integer(i) => (*i).into(),
            LiteralValue::Real(n) => (*n).into(),
            LiteralValue::Str(s) => Self::Str(Rc::clone(s)),
        }
    }
}

impl Value {
    /// Builds a number, using `Integer` when the value is integral.
    ///
    /// # Example
    /// ```
    /// use mathpy::interpreter::value::core::Value;
    ///
    /// assert_eq!(Value::number(2.0), Value::Integer(2));
    /// assert_eq!(Value::number(0.5), Value::Real(0.5));
    /// assert!(matches!(Value::number(f64::NAN), Value::Real(_)));
    /// ```
    #[must_use]
    pub fn number(value: f64) -> Self {
        integral_to_i64(value).map_or(Self::Real(value), Self::Integer)
    }

    /// Wraps the result of an arithmetic operator.
    ///
    /// Unlike `Value::from`, a 0-dimensional result is collapsed with
    /// [`Value::number`] whatever the kind of the tensor.
    ///
    /// # Example
    /// ```
    /// use mathpy::interpreter::value::{core::Value, tensor::Tensor};
    ///
    /// assert_eq!(Value::from_arithmetic(Tensor::scalar(4.0)), Value::Integer(4));
    /// assert_eq!(Value::from(Tensor::scalar(4.0)), Value::Real(4.0));
    /// ```
    #[must_use]
    pub fn from_arithmetic(tensor: Tensor) -> Self {
        match tensor.as_scalar() {
            Some(x) => Self::number(x),
            None => Self::Array(Rc::new(tensor)),
        }
    }

    /// The name of the value's type as it appears in error messages.
    #[must_use]
    pub const fn type_name(&self) -> &'static str {
        match self {
            Self::Integer(_) => "int",
            Self::Real(_) => "float",
            Self::Str(_) => "str",
            Self::Bool(_) => "bool",
            Self::Array(_) => "array",
            Self::Set(_) => "set",
            Self::Tuple(_) => "tuple",
            Self::Function(_) => "function",
            Self::Builtin(_) => "builtin_function",
            Self::None => "NoneType",
        }
    }

    /// Whether the value is a number or a boolean.
    #[must_use]
    pub const fn is_numeric(&self) -> bool {
        matches!(self, Self::Integer(_) | Self::Real(_) | Self::Bool(_))
    }

    /// Converts the value to an `f64`, or returns an error if not numeric.
    ///
    /// Accepts `Integer`, `Real` and `Bool` (as `0` or `1`).
    ///
    /// # Errors
    /// `RuntimeError::TypeError` for every other value.
    ///
    /// # Example
    /// ```
    /// use mathpy::interpreter::value::core::Value;
    ///
    /// assert_eq!(Value::Integer(10).as_real(42).unwrap(), 10.0);
    /// assert_eq!(Value::Bool(true).as_real(42).unwrap(), 1.0);
    /// assert!(Value::from("x").as_real(42).is_err());
    /// ```
    pub fn as_real(&self, line: usize) -> EvalResult<f64> {
        match self {
            Self::Integer(n) => Ok(i64_to_f64(*n)),
            Self::Real(r) => Ok(*r),
            Self::Bool(b) => Ok(if *b { 1.0 } else { 0.0 }),
            other => Err(RuntimeError::TypeError { details: format!("expected a number, found {}",
                                                                    other.type_name()),
                                                   line }),
        }
    }

    /// Views the value as a tensor.
    ///
    /// Numbers become 0-dimensional tensors, holding integers unless the
    /// number is a `Real`; arrays are shared.
    ///
    /// # Errors
    /// `RuntimeError::TypeError` for non-numeric values.
    pub fn to_tensor(&self, line: usize) -> EvalResult<Rc<Tensor>> {
        match self {
            Self::Array(tensor) => Ok(Rc::clone(tensor)),
            Self::Real(r) => Ok(Rc::new(Tensor::scalar(*r))),
            other => Ok(Rc::new(Tensor::scalar(other.as_real(line)?).with_integral(true))),
        }
    }

    /// Decides the truth of the value.
    ///
    /// Numbers are true when non-zero, strings, sets and tuples when
    /// non-empty. An array is false when empty and takes the truth of its only
    /// element when it has one.
    ///
    /// # Errors
    /// `RuntimeError::AmbiguousTruth` for arrays with more than one element.
    pub fn is_truthy(&self, line: usize) -> EvalResult<bool> {
        match self {
            Self::Integer(n) => Ok(*n != 0),
            Self::Real(r) => Ok(*r != 0.0),
            Self::Str(s) => Ok(!s.is_empty()),
            Self::Bool(b) => Ok(*b),
            Self::Array(tensor) => match tensor.data() {
                [] => Ok(false),
                [only] => Ok(*only != 0.0),
                _ => Err(RuntimeError::AmbiguousTruth { line }),
            },
            Self::Set(set) => Ok(!set.is_empty()),
            Self::Tuple(items) => Ok(!items.is_empty()),
            Self::Function(_) | Self::Builtin(_) => Ok(true),
            Self::None => Ok(false),
        }
    }

    /// Formats the value as it appears inside a container: strings are
    /// quoted.
    #[must_use]
    pub fn repr(&self) -> String {
        match self {
            Self::Str(s) => format!("'{s}'"),
            other => other.to_string(),
        }
    }
}

impl Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Integer(n) => write!(f, "{n}"),
            Self::Real(r) => write!(f, "{}", format_real(*r)),
            Self::Str(s) => write!(f, "{s}"),
            Self::Bool(true) => write!(f, "True"),
            Self::Bool(false) => write!(f, "False"),
            Self::Array(tensor) => write!(f, "{tensor}"),
            Self::Set(set) => {
                if set.is_empty() {
                    return write!(f, "set()");
                }

                let mut elems: Vec<&SetValue> = set.iter().collect();
                elems.sort();

                write!(f, "{{")?;
                for (i, v) in elems.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{v}")?;
                }
                write!(f, "}}")
            },
            Self::Tuple(items) => {
                write!(f, "(")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", item.repr())?;
                }
                if items.len() == 1 {
                    write!(f, ",")?;
                }
                write!(f, ")")
            },
            Self::Function(def) => write!(f, "<function {}>", def.name),
            Self::Builtin(builtin) => write!(f, "<built-in function {}>", builtin.name()),
            Self::None => write!(f, "None"),
        }
    }
}
