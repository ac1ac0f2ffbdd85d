use std::{cmp::Ordering, fmt::Display, rc::Rc};

use ordered_float::OrderedFloat;

use crate::{
    error::RuntimeError,
    interpreter::{evaluator::core::EvalResult, value::core::Value},
    util::num::{format_real, i64_to_f64, integral_to_i64},
};

/// Enum representing values allowed in sets.
///
/// Only numbers and strings are hashable. Integral reals and booleans are
/// stored as integers, so `{1, 1.0, True}` has a single member.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum SetValue {
    /// An integer such as `-4` or `42`.
    Integer(i64),
    /// A non-integral real such as `0.5`.
    Real(OrderedFloat<f64>),
    /// A string such as `"abc"`.
    Str(Rc<str>),
}

impl SetValue {
    /// Converts a runtime value into a set element.
    ///
    /// # Errors
    /// Returns `RuntimeError::TypeError` for values that cannot be hashed:
    /// arrays, sets, tuples, functions and `None`.
    ///
    /// # Example
    /// ```
    /// use mathpy::interpreter::value::{core::Value, set_value::SetValue};
    ///
    /// assert_eq!(SetValue::from_value(&Value::Real(2.0), 1).unwrap(),
    ///            SetValue::Integer(2));
    /// assert_eq!(SetValue::from_value(&Value::Bool(true), 1).unwrap(),
    ///            SetValue::Integer(1));
    /// assert!(SetValue::from_value(&Value::None, 1).is_err());
    /// ```
    pub fn from_value(value: &Value, line: usize) -> EvalResult<Self> {
        match value {
            Value::Integer(n) => Ok(Self::Integer(*n)),
            Value::Bool(b) => Ok(Self::Integer(i64::from(*b))),
            Value::Real(r) => {
                Ok(integral_to_i64(*r).map_or(Self::Real(OrderedFloat(*r)), Self::Integer))
            },
            Value::Str(s) => Ok(Self::Str(Rc::clone(s))),
            other => Err(RuntimeError::TypeError { details: format!("unhashable type: '{}'",
                                                                    other.type_name()),
                                                   line }),
        }
    }

    /// The numeric value of a number element.
    const fn as_number(&self) -> Option<f64> {
        match self {
            Self::Integer(n) => Some(i64_to_f64(*n)),
            Self::Real(r) => Some(r.0),
            Self::Str(_) => None,
        }
    }
}

impl Ord for SetValue {
    /// Numbers come first in ascending order, then strings in lexicographic
    /// order.
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Self::Str(a), Self::Str(b)) => a.cmp(b),
            (Self::Str(_), _) => Ordering::Greater,
            (_, Self::Str(_)) => Ordering::Less,
            (Self::Integer(a), Self::Integer(b)) => a.cmp(b),
            _ => {
                let a = OrderedFloat(self.as_number().unwrap_or(f64::NAN));
                let b = OrderedFloat(other.as_number().unwrap_or(f64::NAN));
                a.cmp(&b).then_with(|| match (self, other) {
                                       (Self::Integer(_), Self::Real(_)) => Ordering::Less,
                                       (Self::Real(_), Self::Integer(_)) => Ordering::Greater,
                                       _ => Ordering::Equal,
                                   })
            },
        }
    }
}

impl PartialOrd for SetValue {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl From<SetValue> for Value {
    fn from(s: SetValue) -> Self {
        match s {
            SetValue::Integer(i) => Self::Integer(i),
            SetValue::Real(r) => Self::Real(r.into_inner()),
            SetValue::Str(s) => Self::Str(s),
        }
    }
}

impl Display for SetValue {
    /// Prints the element as it appears inside a set: strings are quoted.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Integer(n) => write!(f, "{n}"),
            Self::Real(r) => write!(f, "{}", format_real(r.0)),
            Self::Str(s) => write!(f, "'{s}'"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numbers_sort_before_strings() {
        let mut elements = vec![SetValue::Str(Rc::from("b")),
                                SetValue::Real(OrderedFloat(1.5)),
                                SetValue::Str(Rc::from("a")),
                                SetValue::Integer(3),
                                SetValue::Integer(-1)];
        elements.sort();
        let printed: Vec<String> = elements.iter().map(ToString::to_string).collect();
        assert_eq!(printed, vec!["-1", "1.5", "3", "'a'", "'b'"]);
    }

    #[test]
    fn arrays_are_unhashable() {
        let array = Value::Array(Rc::new(crate::interpreter::value::tensor::Tensor::vector(vec![1.0])));
        let err = SetValue::from_value(&array, 7).unwrap_err();
        assert_eq!(err.to_string(), "Error on line 7: Type error: unhashable type: 'array'.");
    }
}
