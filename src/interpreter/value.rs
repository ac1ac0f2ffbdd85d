/// The `Value` enum and its conversions, truthiness and display forms.
pub mod core;
/// Set value representation.
///
/// Defines the `SetValue` type, which is used for the elements of a
/// `Value::Set`. Only numbers and strings are allowed; integral reals and
/// booleans are normalised to integers so that equal numbers collapse to one
/// member.
pub mod set_value;
/// Dense numeric arrays.
///
/// Defines `Tensor`, a row-major `f64` array with numpy-style broadcasting,
/// the matrix product, per-axis indexing and slicing, and its printed form.
pub mod tensor;
