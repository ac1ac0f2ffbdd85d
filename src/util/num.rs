use crate::{error::RuntimeError, interpreter::evaluator::core::EvalResult};

/// `2^63` as an `f64`; the first value above the `i64` range.
const I64_UPPER_BOUND: f64 = 9_223_372_036_854_775_808.0;

/// Converts an `f64` to `i64` when it holds an integral value that fits.
///
/// This backs the "looks like an int when it is one" collapse applied to
/// arithmetic results and scalar reads from arrays.
///
/// # Parameters
/// - `value`: The floating-point value to inspect.
///
/// # Returns
/// - `Some(i64)`: The exact integer when `value` is finite, integral and in
///   range.
/// - `None`: Otherwise.
///
/// # Example
/// ```
/// use mathpy::util::num::integral_to_i64;
///
/// assert_eq!(integral_to_i64(4.0), Some(4));
/// assert_eq!(integral_to_i64(-0.0), Some(0));
/// assert_eq!(integral_to_i64(2.5), None);
/// assert_eq!(integral_to_i64(f64::INFINITY), None);
/// ```
#[must_use]
#[allow(clippy::cast_possible_truncation)]
pub fn integral_to_i64(value: f64) -> Option<i64> {
    if !value.is_finite() || value.fract() != 0.0 {
        return None;
    }
    if !(-I64_UPPER_BOUND..I64_UPPER_BOUND).contains(&value) {
        return None;
    }
    Some(value as i64)
}

/// Truncates an `f64` toward zero and converts it to `i64`.
///
/// Used wherever the language coerces a number to an integer: subscripts and
/// the integer arguments of `range`, `zeros`, `ones`, `linspace` and `round`.
///
/// # Errors
/// Returns `RuntimeError::TypeError` for NaN, infinities and values outside
/// the `i64` range.
///
/// # Example
/// ```
/// use mathpy::util::num::f64_to_i64_truncated;
///
/// assert_eq!(f64_to_i64_truncated(2.9, 1).unwrap(), 2);
/// assert_eq!(f64_to_i64_truncated(-2.9, 1).unwrap(), -2);
/// assert!(f64_to_i64_truncated(f64::NAN, 1).is_err());
/// ```
#[allow(clippy::cast_possible_truncation)]
pub fn f64_to_i64_truncated(value: f64, line: usize) -> EvalResult<i64> {
    let truncated = value.trunc();
    if !truncated.is_finite() || !(-I64_UPPER_BOUND..I64_UPPER_BOUND).contains(&truncated) {
        return Err(RuntimeError::TypeError { details: format!("cannot convert {} to an integer",
                                                              format_real(value)),
                                             line });
    }
    Ok(truncated as i64)
}

/// Safely converts an `i64` to a `usize` if and only if it can be represented
/// exactly.
///
/// ## Errors
/// Returns `RuntimeError::InvalidArgument` if the value is negative or exceeds
/// the maximum representable `usize`. `what` names the quantity in the
/// message.
///
/// ## Example
/// ```
/// use mathpy::util::num::i64_to_usize_checked;
///
/// assert_eq!(i64_to_usize_checked(42, "dimension", 0).unwrap(), 42);
/// assert!(i64_to_usize_checked(-1, "dimension", 5).is_err());
/// ```
pub fn i64_to_usize_checked(value: i64, what: &str, line: usize) -> EvalResult<usize> {
    usize::try_from(value).map_err(|_| RuntimeError::InvalidArgument { details: format!("{what} must be a non-negative integer, found {value}"),
                                                                        line })
}

/// Converts a `usize` to `f64`.
///
/// Sizes in this interpreter stay far below `2^53`, where the conversion is
/// exact.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub const fn usize_to_f64(value: usize) -> f64 {
    value as f64
}

/// Converts an `i64` to `f64`, rounding to the nearest representable value
/// beyond `2^53`.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub const fn i64_to_f64(value: i64) -> f64 {
    value as f64
}

/// Formats a real number the way the language prints floats.
///
/// Integral values keep a trailing `.0`, magnitudes below `1e-4` or from
/// `1e16` upward switch to exponent notation with a signed, two-digit
/// exponent, and non-finite values print as `inf`, `-inf` and `nan`.
///
/// # Example
/// ```
/// use mathpy::util::num::format_real;
///
/// assert_eq!(format_real(2.0), "2.0");
/// assert_eq!(format_real(0.1), "0.1");
/// assert_eq!(format_real(1e16), "1e+16");
/// assert_eq!(format_real(0.00001), "1e-05");
/// assert_eq!(format_real(-1.5e-7), "-1.5e-07");
/// assert_eq!(format_real(f64::NEG_INFINITY), "-inf");
/// ```
#[must_use]
pub fn format_real(value: f64) -> String {
    if value.is_nan() {
        return "nan".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "inf" } else { "-inf" }.to_string();
    }
    if value == 0.0 {
        return if value.is_sign_negative() { "-0.0" } else { "0.0" }.to_string();
    }

    let scientific = format!("{value:e}");
    let (mantissa, exponent) = scientific.split_once('e')
                                         .unwrap_or((scientific.as_str(), "0"));
    let exponent: i32 = exponent.parse().unwrap_or(0);

    if (-4..16).contains(&exponent) {
        let plain = format!("{value}");
        if plain.contains('.') { plain } else { format!("{plain}.0") }
    } else {
        let sign = if exponent < 0 { '-' } else { '+' };
        format!("{mantissa}e{sign}{:02}", exponent.unsigned_abs())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_like_the_language_prints() {
        assert_eq!(format_real(3.5), "3.5");
        assert_eq!(format_real(100.0), "100.0");
        assert_eq!(format_real(0.0001), "0.0001");
        assert_eq!(format_real(123_456_789.125), "123456789.125");
        assert_eq!(format_real(1.234e20), "1.234e+20");
        assert_eq!(format_real(f64::NAN), "nan");
    }

    #[test]
    fn integral_collapse_rejects_out_of_range_values() {
        assert_eq!(integral_to_i64(1e19), None);
        assert_eq!(integral_to_i64(-9_223_372_036_854_775_808.0), Some(i64::MIN));
    }
}
