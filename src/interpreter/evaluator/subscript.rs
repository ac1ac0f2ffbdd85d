use std::rc::Rc;

use crate::{
    ast::{Expr, Index},
    error::RuntimeError,
    interpreter::{
        environment::EnvRef,
        evaluator::core::{EvalResult, Interpreter},
        value::{
            core::Value,
            tensor::{IndexSpec, normalize_index, normalize_range},
        },
    },
    util::num::f64_to_i64_truncated,
};

/// An index entry whose expressions have been evaluated.
enum IndexValue {
    Single(Value),
    Slice(Option<Value>, Option<Value>),
}

/// Coerces an index value to an integer, truncating reals toward zero.
fn to_position(value: &Value, line: usize) -> EvalResult<i64> {
    match value {
        Value::Integer(n) => Ok(*n),
        Value::Bool(b) => Ok(i64::from(*b)),
        Value::Real(r) => f64_to_i64_truncated(*r, line),
        other => Err(RuntimeError::TypeError { details: format!("indices must be numbers, not {}",
                                                                other.type_name()),
                                               line }),
    }
}

fn to_spec(index: &IndexValue, line: usize) -> EvalResult<IndexSpec> {
    match index {
        IndexValue::Single(value) => Ok(IndexSpec::At(to_position(value, line)?)),
        IndexValue::Slice(start, end) => {
            Ok(IndexSpec::Range { start: start.as_ref()
                                              .map(|v| to_position(v, line))
                                              .transpose()?,
                                  end:   end.as_ref()
                                            .map(|v| to_position(v, line))
                                            .transpose()?, })
        },
    }
}

/// Indexes a sequence of `length` items that takes a single index.
///
/// Returns the selected positions, and whether the result is a single item.
fn sequence_positions(specs: &[IndexSpec],
                      length: usize,
                      kind: &str,
                      line: usize)
                      -> EvalResult<(Vec<usize>, bool)> {
    match specs {
        [IndexSpec::At(index)] => Ok((vec![normalize_index(*index, length, line)?], true)),
        [IndexSpec::Range { start, end }] => Ok((normalize_range(*start, *end, length).collect(), false)),
        _ => Err(RuntimeError::TypeError { details: format!("{kind} indices take a single index, found {}",
                                                            specs.len()),
                                           line }),
    }
}

/// Applies evaluated subscripts to a value.
fn apply_subscript(target: &Value, specs: &[IndexSpec], line: usize) -> EvalResult<Value> {
    match target {
        Value::Array(tensor) => Ok(Value::from(tensor.select(specs, line)?)),
        Value::Str(s) => {
            let chars: Vec<char> = s.chars().collect();
            let (positions, _) = sequence_positions(specs, chars.len(), "string", line)?;
            let selected: String = positions.into_iter().map(|p| chars[p]).collect();
            Ok(Value::from(selected.as_str()))
        },
        Value::Tuple(items) => {
            let (positions, single) = sequence_positions(specs, items.len(), "tuple", line)?;
            if single {
                return Ok(items[positions[0]].clone());
            }
            Ok(Value::Tuple(Rc::new(positions.into_iter().map(|p| items[p].clone()).collect())))
        },
        other => Err(RuntimeError::TypeError { details: format!("'{}' object is not subscriptable",
                                                                other.type_name()),
                                               line }),
    }
}

impl Interpreter {
    /// Evaluates a subscript expression such as `a[1]`, `m[0, 1:]` or `s[:2]`.
    ///
    /// The target is evaluated first, then every index expression from left
    /// to right. Numeric indices are truncated toward zero and negative
    /// indices count from the end.
    ///
    /// - Arrays take one index per axis. A single index drops its axis and a
    ///   slice keeps it. A single element is an integer when read from an
    ///   integer array and a real when read from a float array.
    /// - Strings and tuples take one index or one slice.
    ///
    /// # Errors
    /// Failures while evaluating the target or index expressions are passed on
    /// unchanged. Failures while applying the subscript are wrapped in
    /// `RuntimeError::Subscript`.
    pub(crate) fn eval_subscript(&mut self,
                                 target: &Expr,
                                 indices: &[Index],
                                 line: usize,
                                 env: &EnvRef)
                                 -> EvalResult<Value> {
        let target = self.evaluate(target, env)?;

        let mut values = Vec::with_capacity(indices.len());
        for index in indices {
            values.push(match index {
                            Index::Single(expr) => IndexValue::Single(self.evaluate(expr, env)?),
                            Index::Slice { start, end } => {
                                let start = start.as_ref().map(|e| self.evaluate(e, env)).transpose()?;
                                let end = end.as_ref().map(|e| self.evaluate(e, env)).transpose()?;
                                IndexValue::Slice(start, end)
                            },
                        });
        }

        values.iter()
              .map(|index| to_spec(index, line))
              .collect::<EvalResult<Vec<_>>>()
              .and_then(|specs| apply_subscript(&target, &specs, line))
              .map_err(|source| RuntimeError::Subscript { source: Box::new(source),
                                                          line })
    }
}
