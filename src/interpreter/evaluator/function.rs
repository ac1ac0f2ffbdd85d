/// Elementwise mathematical builtins.
///
/// Trigonometric, exponential and logarithmic functions, square roots,
/// rounding and absolute values.
pub mod builtin;
/// Array constructors: `range`, `zeros`, `ones` and `linspace`.
pub mod constructors;
/// Function call evaluation and the builtin table.
pub mod core;
/// Determinants, inverses and eigen decompositions.
pub mod linalg;
/// The `plot` call and the plotting sink it reports to.
pub mod plot;
/// The `print` function implementation.
///
/// Writes values to the interpreter's output sink.
pub mod print;
/// Reductions over all elements: `mean`, `median` and `std`.
pub mod stats;
