/// Binary operator dispatch.
///
/// Routes every binary operation to the handler for its operator and operand
/// kinds, and builds the error for unsupported combinations.
pub mod core;

/// Elementwise operations on arrays with broadcasting.
pub mod array;

/// Ordering and equality of numbers, strings and arrays.
pub mod comparison;

/// Logical `and` and `or`.
pub mod logic;

/// The matrix product behind `*` on two arrays.
pub mod matmul;

/// Scalar exponentiation.
pub mod power;

/// Scalar arithmetic on integers and reals.
pub mod scalar;

/// Union, intersection, difference and comparison of sets.
pub mod set;
