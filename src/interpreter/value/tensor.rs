use std::{fmt::Display, ops::Range};

use crate::{
    error::RuntimeError,
    interpreter::evaluator::core::EvalResult,
    util::num::{format_real, i64_to_f64, integral_to_i64, usize_to_f64},
};

/// Largest number of elements a single array may hold.
pub const MAX_ELEMENTS: usize = 1 << 27;

/// A dense, row-major array of `f64`.
///
/// The shape may have any number of axes. A tensor with an empty shape holds
/// exactly one element and stands for a scalar; the interpreter never exposes
/// such a tensor as an array value.
///
/// Elements are stored as `f64` either way, but every tensor records whether
/// it holds integers or floats. The kind decides how the elements print and
/// whether reading a single element yields an integer or a real. Constructors
/// produce floats; [`Tensor::with_integral`] marks integer data.
#[derive(Debug, Clone, PartialEq)]
pub struct Tensor {
    shape:    Vec<usize>,
    data:     Vec<f64>,
    integral: bool,
}

/// One per-axis entry of a subscript, after the index values were evaluated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndexSpec {
    /// A single position; negative values count from the end. Drops the axis.
    At(i64),
    /// A half-open range with optional bounds. Keeps the axis.
    Range {
        /// First position included.
        start: Option<i64>,
        /// First position excluded.
        end:   Option<i64>,
    },
}

/// Resolves a possibly negative index against an axis of `length` elements.
///
/// # Errors
/// Returns `RuntimeError::IndexOutOfBounds` if the index falls outside the
/// axis.
///
/// # Example
/// ```
/// use mathpy::interpreter::value::tensor::normalize_index;
///
/// assert_eq!(normalize_index(-1, 4, 1).unwrap(), 3);
/// assert!(normalize_index(4, 4, 1).is_err());
/// ```
pub fn normalize_index(index: i64, length: usize, line: usize) -> EvalResult<usize> {
    let signed_length = i64::try_from(length).unwrap_or(i64::MAX);
    let resolved = if index < 0 { index + signed_length } else { index };

    usize::try_from(resolved).ok()
                             .filter(|&position| position < length)
                             .ok_or(RuntimeError::IndexOutOfBounds { index,
                                                                     length,
                                                                     line })
}

/// Resolves slice bounds against an axis of `length` elements.
///
/// Negative bounds count from the end; bounds beyond the axis are clamped and
/// an end before the start yields an empty range. Slicing never fails.
///
/// # Example
/// ```
/// use mathpy::interpreter::value::tensor::normalize_range;
///
/// assert_eq!(normalize_range(Some(1), None, 5), 1..5);
/// assert_eq!(normalize_range(Some(-2), Some(100), 5), 3..5);
/// assert_eq!(normalize_range(Some(4), Some(2), 5), 4..4);
/// ```
#[must_use]
pub fn normalize_range(start: Option<i64>, end: Option<i64>, length: usize) -> Range<usize> {
    let clamp = |bound: i64| {
        let signed_length = i64::try_from(length).unwrap_or(i64::MAX);
        let resolved = if bound < 0 { bound + signed_length } else { bound };
        usize::try_from(resolved.clamp(0, signed_length)).unwrap_or(0)
    };

    let start = start.map_or(0, clamp);
    let end = end.map_or(length, clamp);

    start..end.max(start)
}

/// Counts the elements of an array of the given shape.
///
/// # Errors
/// `RuntimeError::InvalidArgument` if the count overflows or exceeds
/// [`MAX_ELEMENTS`].
///
/// # Example
/// ```
/// use mathpy::interpreter::value::tensor::element_count;
///
/// assert_eq!(element_count(&[2, 3], 1).unwrap(), 6);
/// assert!(element_count(&[100_000, 100_000, 100_000, 100_000], 1).is_err());
/// ```
pub fn element_count(shape: &[usize], line: usize) -> EvalResult<usize> {
    shape.iter()
         .try_fold(1_usize, |count, &dim| count.checked_mul(dim))
         .filter(|&count| count <= MAX_ELEMENTS)
         .ok_or_else(|| RuntimeError::InvalidArgument { details: format!("an array of shape {shape:?} exceeds {MAX_ELEMENTS} elements"),
                                                        line })
}

/// Row-major strides of `shape`, with a zero stride on every axis that is
/// broadcast into `target`.
fn broadcast_strides(shape: &[usize], target: &[usize]) -> Vec<usize> {
    let offset = target.len() - shape.len();
    let mut strides = vec![0; target.len()];
    let mut stride = 1;

    for (axis, &dim) in shape.iter().enumerate().rev() {
        strides[axis + offset] = if dim == 1 { 0 } else { stride };
        stride *= dim;
    }

    strides
}

/// Advances a row-major multi-index; returns `false` once it wraps around.
fn advance(index: &mut [usize], extents: &[usize]) -> bool {
    for axis in (0..index.len()).rev() {
        index[axis] += 1;
        if index[axis] < extents[axis] {
            return true;
        }
        index[axis] = 0;
    }
    false
}

impl Tensor {
    /// Creates a 0-dimensional tensor holding one value.
    #[must_use]
    pub fn scalar(value: f64) -> Self {
        Self { shape:    Vec::new(),
               data:     vec![value],
               integral: false, }
    }

    /// Creates a 1-dimensional tensor from its elements.
    #[must_use]
    pub fn vector(data: Vec<f64>) -> Self {
        Self { shape: vec![data.len()],
               data,
               integral: false }
    }

    /// Creates a tensor from a shape and row-major data.
    ///
    /// # Returns
    /// `None` if the number of elements does not match the shape.
    #[must_use]
    pub fn from_shape(shape: Vec<usize>, data: Vec<f64>) -> Option<Self> {
        let len = shape.iter().try_fold(1_usize, |count, &dim| count.checked_mul(dim))?;
        (len == data.len()).then_some(Self { shape,
                                             data,
                                             integral: false })
    }

    /// Creates a float tensor of the given shape with every element set to
    /// `value`.
    ///
    /// # Errors
    /// `RuntimeError::InvalidArgument` if the shape holds more than
    /// [`MAX_ELEMENTS`] elements.
    pub fn filled(shape: Vec<usize>, value: f64, line: usize) -> EvalResult<Self> {
        let len = element_count(&shape, line)?;
        Ok(Self { shape,
                  data: vec![value; len],
                  integral: false })
    }

    /// Marks the elements as integers or as floats.
    ///
    /// Marking is the caller's claim about the data: integer tensors are
    /// expected to hold integral values only.
    #[must_use]
    pub fn with_integral(mut self, integral: bool) -> Self {
        self.integral = integral;
        self
    }

    /// Whether the elements are integers.
    #[must_use]
    pub const fn is_integral(&self) -> bool {
        self.integral
    }

    /// Stacks tensors of equal shape along a new leading axis.
    ///
    /// # Returns
    /// `None` if the shapes differ or `parts` is empty.
    #[must_use]
    pub fn stack(parts: &[&Self]) -> Option<Self> {
        let first = parts.first()?;
        if parts.iter().any(|part| part.shape != first.shape) {
            return None;
        }

        let mut shape = Vec::with_capacity(first.shape.len() + 1);
        shape.push(parts.len());
        shape.extend_from_slice(&first.shape);

        let data = parts.iter().flat_map(|part| part.data.iter().copied()).collect();
        Some(Self { shape,
                    data,
                    integral: parts.iter().all(|part| part.integral) })
    }

    /// Integers from `start` towards `stop` (exclusive) in steps of `step`.
    ///
    /// An empty tensor results when `step` is zero or the range does not
    /// reach towards `stop`.
    ///
    /// # Errors
    /// `RuntimeError::InvalidArgument` if the range holds more than
    /// [`MAX_ELEMENTS`] integers.
    pub fn arange(start: i64, stop: i64, step: i64, line: usize) -> EvalResult<Self> {
        let span = i128::from(stop) - i128::from(start);
        let step_wide = i128::from(step);
        let count = if step_wide == 0 || span.signum() != step_wide.signum() {
            0
        } else {
            (span.abs() + step_wide.abs() - 1) / step_wide.abs()
        };
        let count = usize::try_from(count).unwrap_or(usize::MAX);
        let count = element_count(&[count], line)?;

        let data = (0..count).map(|k| i64_to_f64(start) + i64_to_f64(step) * usize_to_f64(k))
                             .collect();
        Ok(Self::vector(data).with_integral(true))
    }

    /// `count` evenly spaced floats from `start` to `stop`, both included.
    ///
    /// # Errors
    /// `RuntimeError::InvalidArgument` if `count` exceeds [`MAX_ELEMENTS`].
    pub fn linspace(start: f64, stop: f64, count: usize, line: usize) -> EvalResult<Self> {
        let count = element_count(&[count], line)?;
        let data = match count {
            0 => Vec::new(),
            1 => vec![start],
            _ => {
                let step = (stop - start) / usize_to_f64(count - 1);
                (0..count).map(|k| if k == count - 1 { stop } else { start + step * usize_to_f64(k) })
                          .collect()
            },
        };
        Ok(Self::vector(data))
    }

    /// The extent of every axis.
    #[must_use]
    pub fn shape(&self) -> &[usize] {
        &self.shape
    }

    /// The elements in row-major order.
    #[must_use]
    pub fn data(&self) -> &[f64] {
        &self.data
    }

    /// Number of axes.
    #[must_use]
    pub fn ndim(&self) -> usize {
        self.shape.len()
    }

    /// Total number of elements.
    #[must_use]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Whether the tensor holds no elements.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// The value of a 0-dimensional tensor.
    #[must_use]
    pub fn as_scalar(&self) -> Option<f64> {
        if self.shape.is_empty() { self.data.first().copied() } else { None }
    }

    /// The side length of a square matrix, or `None` for any other shape.
    #[must_use]
    pub fn square_size(&self) -> Option<usize> {
        match self.shape.as_slice() {
            [rows, cols] if rows == cols => Some(*rows),
            _ => None,
        }
    }

    /// Applies `f` to every element. The result keeps the kind of `self`.
    #[must_use]
    pub fn map(&self, f: impl Fn(f64) -> f64) -> Self {
        Self { shape:    self.shape.clone(),
               data:     self.data.iter().map(|&x| f(x)).collect(),
               integral: self.integral, }
    }

    /// The shape two operands broadcast to, following numpy's rules.
    ///
    /// Shapes are aligned at their last axis; paired extents must be equal or
    /// one of them must be `1`.
    ///
    /// # Example
    /// ```
    /// use mathpy::interpreter::value::tensor::Tensor;
    ///
    /// assert_eq!(Tensor::broadcast_shapes(&[2, 3], &[3]), Some(vec![2, 3]));
    /// assert_eq!(Tensor::broadcast_shapes(&[2, 1], &[1, 4]), Some(vec![2, 4]));
    /// assert_eq!(Tensor::broadcast_shapes(&[2], &[3]), None);
    /// ```
    #[must_use]
    pub fn broadcast_shapes(left: &[usize], right: &[usize]) -> Option<Vec<usize>> {
        let ndim = left.len().max(right.len());
        let mut shape = vec![0; ndim];

        for axis in 0..ndim {
            let l = (axis + left.len()).checked_sub(ndim).map_or(1, |a| left[a]);
            let r = (axis + right.len()).checked_sub(ndim).map_or(1, |a| right[a]);
            shape[axis] = match (l, r) {
                _ if l == r => l,
                (1, other) | (other, 1) => other,
                _ => return None,
            };
        }

        Some(shape)
    }

    /// Combines two tensors element by element after broadcasting them to a
    /// common shape.
    ///
    /// The result holds integers when both operands do; callers whose
    /// function yields fractions mark it with [`Tensor::with_integral`].
    ///
    /// # Errors
    /// - `RuntimeError::ShapeMismatch` if the shapes cannot be broadcast
    ///   together.
    /// - `RuntimeError::InvalidArgument` if the broadcast shape holds more
    ///   than [`MAX_ELEMENTS`] elements.
    pub fn zip_with(&self,
                    other: &Self,
                    line: usize,
                    f: impl Fn(f64, f64) -> f64)
                    -> EvalResult<Self> {
        let shape = Self::broadcast_shapes(&self.shape, &other.shape).ok_or_else(|| {
                        RuntimeError::ShapeMismatch { left: self.shape.clone(),
                                                      right: other.shape.clone(),
                                                      line }
                    })?;
        let left_strides = broadcast_strides(&self.shape, &shape);
        let right_strides = broadcast_strides(&other.shape, &shape);

        let total = element_count(&shape, line)?;
        let mut data = Vec::with_capacity(total);
        let mut index = vec![0; shape.len()];

        for _ in 0..total {
            let l: usize = index.iter().zip(&left_strides).map(|(i, s)| i * s).sum();
            let r: usize = index.iter().zip(&right_strides).map(|(i, s)| i * s).sum();
            data.push(f(self.data[l], other.data[r]));
            advance(&mut index, &shape);
        }

        Ok(Self { shape,
                  data,
                  integral: self.integral && other.integral })
    }

    /// The matrix or dot product.
    ///
    /// Supported operand shapes are vector·vector (a 0-dimensional result),
    /// matrix·matrix, matrix·vector and vector·matrix. The shared axis must
    /// agree.
    ///
    /// # Returns
    /// `None` for any other combination of shapes.
    #[must_use]
    pub fn dot(&self, other: &Self) -> Option<Self> {
        let (rows, inner, cols, shape) = match (self.shape.as_slice(), other.shape.as_slice()) {
            ([k], [k2]) if k == k2 => (1, *k, 1, Vec::new()),
            ([n, k], [k2, m]) if k == k2 => (*n, *k, *m, vec![*n, *m]),
            ([n, k], [k2]) if k == k2 => (*n, *k, 1, vec![*n]),
            ([k], [k2, m]) if k == k2 => (1, *k, *m, vec![*m]),
            _ => return None,
        };

        let mut data = vec![0.0; rows * cols];
        for i in 0..rows {
            for j in 0..cols {
                data[i * cols + j] =
                    (0..inner).map(|p| self.data[i * inner + p] * other.data[p * cols + j]).sum();
            }
        }

        Some(Self { shape,
                    data,
                    integral: self.integral && other.integral })
    }

    /// Selects a sub-tensor with one [`IndexSpec`] per leading axis.
    ///
    /// Axes indexed by [`IndexSpec::At`] are removed from the result; ranged
    /// and unindexed axes are kept.
    ///
    /// # Errors
    /// - `RuntimeError::IndexOutOfBounds` for a position outside its axis.
    /// - `RuntimeError::TypeError` if more indices than axes are given.
    pub fn select(&self, indices: &[IndexSpec], line: usize) -> EvalResult<Self> {
        if indices.len() > self.ndim() {
            return Err(RuntimeError::TypeError { details: format!("too many indices for array: array is {}-dimensional, but {} were indexed",
                                                                  self.ndim(),
                                                                  indices.len()),
                                                 line });
        }

        let mut positions: Vec<Vec<usize>> = Vec::with_capacity(self.ndim());
        let mut shape = Vec::new();

        for (axis, &length) in self.shape.iter().enumerate() {
            match indices.get(axis) {
                Some(IndexSpec::At(index)) => {
                    positions.push(vec![normalize_index(*index, length, line)?]);
                },
                Some(IndexSpec::Range { start, end }) => {
                    let range = normalize_range(*start, *end, length);
                    shape.push(range.len());
                    positions.push(range.collect());
                },
                None => {
                    shape.push(length);
                    positions.push((0..length).collect());
                },
            }
        }

        let mut strides = vec![1; self.ndim()];
        for axis in (0..self.ndim().saturating_sub(1)).rev() {
            strides[axis] = strides[axis + 1] * self.shape[axis + 1];
        }

        let extents: Vec<usize> = positions.iter().map(Vec::len).collect();
        let total: usize = extents.iter().product();
        let mut data = Vec::with_capacity(total);
        let mut cursor = vec![0; extents.len()];

        for _ in 0..total {
            let offset: usize = cursor.iter()
                                      .enumerate()
                                      .map(|(axis, &k)| positions[axis][k] * strides[axis])
                                      .sum();
            data.push(self.data[offset]);
            advance(&mut cursor, &extents);
        }

        Ok(Self { shape,
                  data,
                  integral: self.integral })
    }

    /// Splits the tensor along its first axis.
    ///
    /// A 1-dimensional tensor yields 0-dimensional tensors. A 0-dimensional
    /// tensor yields nothing.
    #[must_use]
    pub fn outer(&self) -> Vec<Self> {
        let Some((&rows, rest)) = self.shape.split_first() else {
            return Vec::new();
        };
        let width: usize = rest.iter().product();

        (0..rows).map(|row| Self { shape:    rest.to_vec(),
                                   data:     self.data[row * width..(row + 1) * width].to_vec(),
                                   integral: self.integral, })
                 .collect()
    }

    /// Element at `(row, col)` of a matrix.
    pub(crate) fn at(&self, row: usize, col: usize) -> f64 {
        self.data[row * self.shape[1] + col]
    }
}

/// Formats one element of an integer tensor.
fn format_integer(value: f64) -> String {
    integral_to_i64(value).map_or_else(|| format_real(value), |n| n.to_string())
}

/// Splits a float element into the digits before and after the point.
///
/// At most eight decimals are kept and trailing zeros are dropped, so `1.0`
/// splits into `("1", "")`. Non-finite values have no fractional part.
fn float_parts(value: f64) -> (String, Option<String>) {
    if value.is_nan() {
        return ("nan".to_string(), None);
    }
    if value.is_infinite() {
        return (if value > 0.0 { "inf" } else { "-inf" }.to_string(), None);
    }

    let text = format!("{value:.8}");
    match text.split_once('.') {
        Some((whole, fraction)) => {
            (whole.to_string(), Some(fraction.trim_end_matches('0').to_string()))
        },
        None => (text, Some(String::new())),
    }
}

/// Formats the elements of a float tensor the way numpy does: points
/// aligned, integral values keep a trailing `.`, and shorter fractions are
/// padded with spaces.
fn format_floats(data: &[f64]) -> Vec<String> {
    let parts: Vec<_> = data.iter().map(|&x| float_parts(x)).collect();

    let whole_width = parts.iter()
                           .filter(|(_, fraction)| fraction.is_some())
                           .map(|(whole, _)| whole.len())
                           .max()
                           .unwrap_or(0);
    let fraction_width = parts.iter()
                              .filter_map(|(_, fraction)| fraction.as_ref().map(String::len))
                              .max()
                              .unwrap_or(0);

    parts.into_iter()
         .map(|(whole, fraction)| match fraction {
             Some(fraction) => format!("{whole:>whole_width$}.{fraction:<fraction_width$}"),
             None => whole,
         })
         .collect()
}

fn write_nested(f: &mut std::fmt::Formatter<'_>,
                shape: &[usize],
                cells: &[String],
                width: usize,
                depth: usize)
                -> std::fmt::Result {
    let Some((&rows, rest)) = shape.split_first() else {
        return write!(f, "{:>width$}", cells.first().map_or("", String::as_str));
    };

    write!(f, "[")?;
    if rest.is_empty() {
        for (i, cell) in cells.iter().enumerate() {
            if i > 0 {
                write!(f, " ")?;
            }
            write!(f, "{cell:>width$}")?;
        }
    } else {
        let block: usize = rest.iter().product();
        for row in 0..rows {
            if row > 0 {
                write!(f, "{}{}", "\n".repeat(rest.len()), " ".repeat(depth + 1))?;
            }
            write_nested(f, rest, &cells[row * block..(row + 1) * block], width, depth + 1)?;
        }
    }
    write!(f, "]")
}

impl Display for Tensor {
    /// Prints the tensor the way numpy does: nested brackets, elements
    /// separated by spaces and right-aligned to a common width, one row per
    /// line. Floats always show their decimal point.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let cells: Vec<String> = if self.integral {
            self.data.iter().map(|&x| format_integer(x)).collect()
        } else {
            format_floats(&self.data)
        };
        let width = cells.iter().map(String::len).max().unwrap_or(0);
        write_nested(f, &self.shape, &cells, width, 0)
    }
}
