/// Numeric conversion and formatting helpers.
///
/// This module provides the conversions between `i64`, `usize` and `f64` the
/// interpreter relies on, the integral-collapse test behind its "int when it
/// is one" numbers, and the float formatting used when values are printed.
pub mod num;
