use std::io::Write;

use crate::{
    error::RuntimeError,
    interpreter::{evaluator::core::EvalResult, value::core::Value},
};

/// Writes its arguments to the output sink and returns `None`.
///
/// The display forms of the arguments are separated by single spaces and
/// followed by a newline. Any number of arguments is accepted; `print()`
/// writes an empty line.
///
/// # Parameters
/// - `out`: The interpreter's output sink.
/// - `args`: The values to print.
/// - `line`: Line number for error reporting.
///
/// # Errors
/// `RuntimeError::Output` if the sink cannot be written.
///
/// # Example
/// ```
/// use mathpy::interpreter::{evaluator::function::print::print, value::core::Value};
///
/// let mut out = Vec::new();
/// let result = print(&mut out, &[Value::Integer(42), Value::from("apples")], 1).unwrap();
///
/// assert_eq!(result, Value::None);
/// assert_eq!(String::from_utf8(out).unwrap(), "42 apples\n");
/// ```
pub fn print(out: &mut dyn Write, args: &[Value], line: usize) -> EvalResult<Value> {
    let text = args.iter().map(ToString::to_string).collect::<Vec<_>>().join(" ");

    writeln!(out, "{text}").map_err(|e| RuntimeError::Output { details: e.to_string(),
                                                               line })?;
    Ok(Value::None)
}
