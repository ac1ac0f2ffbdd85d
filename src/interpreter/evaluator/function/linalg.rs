use std::rc::Rc;

use crate::{
    error::RuntimeError,
    interpreter::{
        evaluator::core::EvalResult,
        value::{core::Value, tensor::Tensor},
    },
    util::num::usize_to_f64,
};

/// Relative size below which an entry counts as zero.
const TOLERANCE: f64 = 1e-12;

/// Shifted QR steps allowed per eigenvalue before giving up.
const MAX_QR_STEPS: usize = 500;

/// Sweeps of the Jacobi method before giving up on further accuracy.
const MAX_JACOBI_SWEEPS: usize = 64;

/// A square matrix in row-major order.
struct Matrix {
    n:    usize,
    data: Vec<f64>,
}

impl Matrix {
    fn identity(n: usize) -> Self {
        let mut data = vec![0.0; n * n];
        for i in 0..n {
            data[i * n + i] = 1.0;
        }
        Self { n, data }
    }

    fn get(&self, row: usize, col: usize) -> f64 {
        self.data[row * self.n + col]
    }

    fn set(&mut self, row: usize, col: usize, value: f64) {
        self.data[row * self.n + col] = value;
    }

    fn swap_rows(&mut self, a: usize, b: usize) {
        for col in 0..self.n {
            self.data.swap(a * self.n + col, b * self.n + col);
        }
    }

    /// The largest absolute entry, or `1` for a zero matrix.
    fn scale(&self) -> f64 {
        let max = self.data.iter().fold(0.0_f64, |m, x| m.max(x.abs()));
        if max == 0.0 { 1.0 } else { max }
    }

    /// Row index of the largest absolute entry in `col`, from `from` down.
    fn pivot_row(&self, col: usize, from: usize) -> usize {
        (from..self.n).max_by(|&a, &b| self.get(a, col).abs().total_cmp(&self.get(b, col).abs()))
                      .unwrap_or(from)
    }

    fn is_symmetric(&self) -> bool {
        let tol = TOLERANCE * self.scale();
        (0..self.n).all(|i| (0..i).all(|j| (self.get(i, j) - self.get(j, i)).abs() <= tol))
    }

    /// A float tensor; `data` always holds `n * n` entries.
    fn into_tensor(self) -> Tensor {
        let n = self.n;
        Tensor::from_shape(vec![n, n], self.data).unwrap_or_else(|| Tensor::vector(Vec::new()))
    }
}

/// Reads the single argument of a linear-algebra builtin as a square matrix.
fn square_matrix(name: &str, value: &Value, line: usize) -> EvalResult<Matrix> {
    let Value::Array(tensor) = value else {
        return Err(RuntimeError::TypeError { details: format!("{name}() expects a matrix, found {}",
                                                              value.type_name()),
                                             line });
    };

    let n = tensor.square_size().ok_or_else(|| {
                                    RuntimeError::LinearAlgebra { details: format!("{name}() expects a square matrix, found shape {:?}",
                                                                                   tensor.shape()),
                                                                  line }
                                })?;

    let mut matrix = Matrix { n,
                              data: vec![0.0; n * n] };
    for row in 0..n {
        for col in 0..n {
            matrix.set(row, col, tensor.at(row, col));
        }
    }
    Ok(matrix)
}

/// Returns the determinant of a square matrix.
///
/// Uses LU decomposition with partial pivoting. The result is a
/// `Value::Real`.
///
/// # Errors
/// - `RuntimeError::TypeError` if the argument is not an array.
/// - `RuntimeError::LinearAlgebra` if the array is not a square matrix.
///
/// # Example
/// ```
/// use std::rc::Rc;
///
/// use mathpy::interpreter::{
///     evaluator::function::linalg::det,
///     value::{core::Value, tensor::Tensor},
/// };
///
/// let m = Tensor::from_shape(vec![2, 2], vec![4.0, 0.0, 0.0, 0.5]).unwrap();
/// assert_eq!(det(&[Value::Array(Rc::new(m))], 1).unwrap(), Value::Real(2.0));
/// ```
pub fn det(args: &[Value], line: usize) -> EvalResult<Value> {
    let mut a = square_matrix("det", &args[0], line)?;
    let n = a.n;
    let mut det = 1.0;

    for k in 0..n {
        let p = a.pivot_row(k, k);
        if a.get(p, k) == 0.0 {
            return Ok(Value::Real(0.0));
        }
        if p != k {
            a.swap_rows(p, k);
            det = -det;
        }

        let pivot = a.get(k, k);
        det *= pivot;
        for i in k + 1..n {
            let factor = a.get(i, k) / pivot;
            for j in k..n {
                a.set(i, j, a.get(i, j) - factor * a.get(k, j));
            }
        }
    }

    Ok(Value::Real(det))
}

/// Returns the inverse of a square matrix.
///
/// Uses Gauss-Jordan elimination with partial pivoting.
///
/// # Errors
/// - `RuntimeError::TypeError` if the argument is not an array.
/// - `RuntimeError::LinearAlgebra` if the array is not a square matrix or
///   the matrix is singular.
pub fn inv(args: &[Value], line: usize) -> EvalResult<Value> {
    let mut a = square_matrix("inv", &args[0], line)?;
    let n = a.n;
    let tol = TOLERANCE * a.scale();
    let mut inverse = Matrix::identity(n);

    for k in 0..n {
        let p = a.pivot_row(k, k);
        if a.get(p, k).abs() <= tol {
            return Err(RuntimeError::LinearAlgebra { details: "singular matrix".to_string(),
                                                     line });
        }
        a.swap_rows(p, k);
        inverse.swap_rows(p, k);

        let pivot = a.get(k, k);
        for j in 0..n {
            a.set(k, j, a.get(k, j) / pivot);
            inverse.set(k, j, inverse.get(k, j) / pivot);
        }

        for i in (0..n).filter(|&i| i != k) {
            let factor = a.get(i, k);
            if factor == 0.0 {
                continue;
            }
            for j in 0..n {
                a.set(i, j, a.get(i, j) - factor * a.get(k, j));
                inverse.set(i, j, inverse.get(i, j) - factor * inverse.get(k, j));
            }
        }
    }

    Ok(Value::Array(Rc::new(inverse.into_tensor())))
}

/// Returns the eigenvalues and eigenvectors of a square matrix.
///
/// The result is a tuple `(values, vectors)`. The eigenvalues are sorted in
/// ascending order. Column `i` of `vectors` is a unit eigenvector for
/// `values[i]`, signed so that its first non-zero component is positive.
///
/// Symmetric matrices use the Jacobi method and get orthonormal eigenvectors.
/// Other matrices use shifted QR iteration for the eigenvalues and inverse
/// iteration for the eigenvectors.
///
/// # Errors
/// - `RuntimeError::TypeError` if the argument is not an array.
/// - `RuntimeError::LinearAlgebra` if the array is not a square matrix, if
///   the eigenvalues are complex, or if the iteration does not converge.
pub fn eig(args: &[Value], line: usize) -> EvalResult<Value> {
    let a = square_matrix("eig", &args[0], line)?;

    let mut pairs = if a.is_symmetric() {
        jacobi(&a)
    } else {
        let values = qr_eigenvalues(&a).map_err(|details| RuntimeError::LinearAlgebra { details,
                                                                                         line })?;
        values.into_iter().map(|lambda| (lambda, inverse_iteration(&a, lambda))).collect()
    };

    pairs.sort_by(|(x, _), (y, _)| x.total_cmp(y));

    let n = a.n;
    let mut vectors = Matrix { n,
                               data: vec![0.0; n * n] };
    for (col, (_, vector)) in pairs.iter().enumerate() {
        for (row, x) in normalized(vector).into_iter().enumerate() {
            vectors.set(row, col, x);
        }
    }

    let values = Tensor::vector(pairs.iter().map(|(lambda, _)| *lambda).collect());
    Ok(Value::Tuple(Rc::new(vec![Value::Array(Rc::new(values)),
                                 Value::Array(Rc::new(vectors.into_tensor()))])))
}

/// Scales a vector to unit length with its first significant component
/// positive.
fn normalized(vector: &[f64]) -> Vec<f64> {
    let norm = vector.iter().map(|x| x * x).sum::<f64>().sqrt();
    if norm == 0.0 {
        return vector.to_vec();
    }

    let sign = vector.iter()
                     .find(|x| x.abs() > TOLERANCE * norm)
                     .map_or(1.0, |x| x.signum());
    vector.iter().map(|x| sign * x / norm).collect()
}

/// Cyclic Jacobi rotations on a symmetric matrix.
///
/// Returns `(eigenvalue, eigenvector)` pairs in no particular order.
fn jacobi(a: &Matrix) -> Vec<(f64, Vec<f64>)> {
    let n = a.n;
    let mut m = Matrix { n,
                         data: a.data.clone() };
    let mut v = Matrix::identity(n);
    let threshold = f64::EPSILON * a.scale();

    for _ in 0..MAX_JACOBI_SWEEPS {
        let off = (0..n).flat_map(|i| (0..n).filter(move |&j| j != i).map(move |j| (i, j)))
                        .map(|(i, j)| m.get(i, j).powi(2))
                        .sum::<f64>()
                        .sqrt();
        if off <= threshold {
            break;
        }

        for p in 0..n {
            for q in p + 1..n {
                let apq = m.get(p, q);
                if apq == 0.0 {
                    continue;
                }

                let theta = (m.get(q, q) - m.get(p, p)) / (2.0 * apq);
                let t = theta.signum() / (theta.abs() + theta.mul_add(theta, 1.0).sqrt());
                let c = 1.0 / t.mul_add(t, 1.0).sqrt();
                let s = t * c;

                for k in 0..n {
                    let (kp, kq) = (m.get(k, p), m.get(k, q));
                    m.set(k, p, c * kp - s * kq);
                    m.set(k, q, s * kp + c * kq);
                }
                for k in 0..n {
                    let (pk, qk) = (m.get(p, k), m.get(q, k));
                    m.set(p, k, c * pk - s * qk);
                    m.set(q, k, s * pk + c * qk);
                }
                for k in 0..n {
                    let (kp, kq) = (v.get(k, p), v.get(k, q));
                    v.set(k, p, c * kp - s * kq);
                    v.set(k, q, s * kp + c * kq);
                }
            }
        }
    }

    (0..n).map(|i| (m.get(i, i), (0..n).map(|row| v.get(row, i)).collect()))
          .collect()
}

/// The eigenvalues of the 2×2 block at `(k, k)`, or `None` if they are
/// complex.
fn block_eigenvalues(h: &Matrix, k: usize) -> Option<(f64, f64)> {
    let (a, b) = (h.get(k, k), h.get(k, k + 1));
    let (c, d) = (h.get(k + 1, k), h.get(k + 1, k + 1));

    let half_trace = (a + d) / 2.0;
    let disc = ((a - d) / 2.0).powi(2) + b * c;
    if disc < 0.0 {
        return None;
    }
    let root = disc.sqrt();
    Some((half_trace - root, half_trace + root))
}

/// Householder QR decomposition of the leading `m`×`m` block of `h`.
fn householder_qr(h: &Matrix, m: usize) -> (Matrix, Matrix) {
    let mut r = Matrix { n:    m,
                         data: (0..m * m).map(|i| h.get(i / m, i % m)).collect(), };
    let mut q = Matrix::identity(m);

    for k in 0..m.saturating_sub(1) {
        let norm = (k..m).map(|i| r.get(i, k).powi(2)).sum::<f64>().sqrt();
        if norm == 0.0 {
            continue;
        }
        let alpha = if r.get(k, k) > 0.0 { -norm } else { norm };

        let mut v = vec![0.0; m];
        for (i, vi) in v.iter_mut().enumerate().skip(k) {
            *vi = r.get(i, k);
        }
        v[k] -= alpha;
        let v_norm2: f64 = v.iter().map(|x| x * x).sum();
        if v_norm2 == 0.0 {
            continue;
        }

        for j in 0..m {
            let f = 2.0 * (k..m).map(|i| v[i] * r.get(i, j)).sum::<f64>() / v_norm2;
            for i in k..m {
                r.set(i, j, r.get(i, j) - f * v[i]);
            }
        }
        for i in 0..m {
            let f = 2.0 * (k..m).map(|j| q.get(i, j) * v[j]).sum::<f64>() / v_norm2;
            for j in k..m {
                q.set(i, j, q.get(i, j) - f * v[j]);
            }
        }
    }

    (q, r)
}

/// Computes the eigenvalues of a general real matrix with shifted QR steps.
///
/// The active block shrinks whenever its last row, or its last two rows,
/// decouple from the rest.
fn qr_eigenvalues(a: &Matrix) -> Result<Vec<f64>, String> {
    let n = a.n;
    let mut h = Matrix { n,
                         data: a.data.clone() };
    let tol = TOLERANCE * a.scale();
    let mut values = Vec::with_capacity(n);
    let mut m = n;
    let mut steps = 0;

    while m > 0 {
        if m == 1 {
            values.push(h.get(0, 0));
            break;
        }

        let last = m - 1;
        if (0..last).all(|j| h.get(last, j).abs() <= tol) {
            values.push(h.get(last, last));
            m -= 1;
            steps = 0;
            continue;
        }

        let pair = last - 1;
        if (0..pair).all(|j| h.get(pair, j).abs() <= tol && h.get(last, j).abs() <= tol) {
            let (lo, hi) = block_eigenvalues(&h, pair).ok_or_else(|| {
                                                          "matrix has complex eigenvalues".to_string()
                                                      })?;
            values.push(lo);
            values.push(hi);
            m -= 2;
            steps = 0;
            continue;
        }

        if steps >= MAX_QR_STEPS {
            return Err("eigenvalue iteration did not converge".to_string());
        }
        steps += 1;

        let shift = block_eigenvalues(&h, pair).map_or(h.get(last, last), |(lo, hi)| {
                                                    let d = h.get(last, last);
                                                    if (lo - d).abs() < (hi - d).abs() { lo } else { hi }
                                                });

        for i in 0..m {
            h.set(i, i, h.get(i, i) - shift);
        }
        let (q, r) = householder_qr(&h, m);
        for i in 0..m {
            for j in 0..m {
                let rq: f64 = (0..m).map(|k| r.get(i, k) * q.get(k, j)).sum();
                h.set(i, j, rq + if i == j { shift } else { 0.0 });
            }
        }
    }

    Ok(values)
}

/// Solves `a x = b` in place with partial pivoting; zero pivots are replaced
/// by a tiny value so the solve always completes.
fn solve_perturbed(mut a: Matrix, mut b: Vec<f64>) -> Vec<f64> {
    let n = a.n;
    let tiny = f64::EPSILON * a.scale();

    for k in 0..n {
        let p = a.pivot_row(k, k);
        a.swap_rows(p, k);
        b.swap(p, k);
        if a.get(k, k).abs() < tiny {
            a.set(k, k, tiny);
        }

        for i in k + 1..n {
            let factor = a.get(i, k) / a.get(k, k);
            for j in k..n {
                a.set(i, j, a.get(i, j) - factor * a.get(k, j));
            }
            b[i] -= factor * b[k];
        }
    }

    let mut x = vec![0.0; n];
    for i in (0..n).rev() {
        let tail: f64 = (i + 1..n).map(|j| a.get(i, j) * x[j]).sum();
        x[i] = (b[i] - tail) / a.get(i, i);
    }
    x
}

/// Finds an eigenvector for a known eigenvalue by inverse iteration.
fn inverse_iteration(a: &Matrix, lambda: f64) -> Vec<f64> {
    let n = a.n;
    let shift = lambda + TOLERANCE * a.scale();
    let mut x: Vec<f64> = (0..n).map(|i| 1.0 / usize_to_f64(i + 1)).collect();

    for _ in 0..4 {
        let mut shifted = Matrix { n,
                                   data: a.data.clone() };
        for i in 0..n {
            shifted.set(i, i, shifted.get(i, i) - shift);
        }
        x = normalized(&solve_perturbed(shifted, x));
    }
    x
}

#[cfg(test)]
mod tests {
    use super::*;

    fn matrix(rows: usize, data: &[f64]) -> Value {
        Value::Array(Rc::new(Tensor::from_shape(vec![rows, data.len() / rows], data.to_vec()).unwrap()))
    }

    fn assert_close(actual: &[f64], expected: &[f64]) {
        assert_eq!(actual.len(), expected.len());
        for (a, e) in actual.iter().zip(expected) {
            assert!((a - e).abs() < 1e-9, "{actual:?} != {expected:?}");
        }
    }

    fn eig_parts(value: &Value) -> (Vec<f64>, Vec<f64>) {
        let Value::Tuple(parts) = value else {
            panic!("expected a tuple");
        };
        let (Value::Array(values), Value::Array(vectors)) = (&parts[0], &parts[1]) else {
            panic!("expected two arrays");
        };
        (values.data().to_vec(), vectors.data().to_vec())
    }

    #[test]
    fn determinant_with_row_swaps() {
        let Value::Real(d) = det(&[matrix(2, &[1.0, 2.0, 3.0, 4.0])], 1).unwrap() else {
            panic!("expected a real");
        };
        assert!((d + 2.0).abs() < 1e-12);

        assert_eq!(det(&[matrix(2, &[1.0, 2.0, 2.0, 4.0])], 1).unwrap(), Value::Real(0.0));
    }

    #[test]
    fn inverse_times_matrix_is_identity() {
        let Value::Array(inverse) = inv(&[matrix(2, &[4.0, 7.0, 2.0, 6.0])], 1).unwrap() else {
            panic!("expected an array");
        };
        assert_close(inverse.data(), &[0.6, -0.7, -0.2, 0.4]);
    }

    #[test]
    fn singular_and_non_square_matrices_fail() {
        let err = inv(&[matrix(2, &[1.0, 2.0, 2.0, 4.0])], 3).unwrap_err();
        assert_eq!(err,
                   RuntimeError::LinearAlgebra { details: "singular matrix".to_string(),
                                                 line:    3, });

        let err = det(&[matrix(1, &[1.0, 2.0])], 1).unwrap_err();
        assert!(matches!(err, RuntimeError::LinearAlgebra { .. }));

        let err = det(&[Value::Integer(3)], 1).unwrap_err();
        assert!(matches!(err, RuntimeError::TypeError { .. }));
    }

    #[test]
    fn symmetric_eigen_decomposition() {
        let (values, vectors) = eig_parts(&eig(&[matrix(2, &[2.0, 1.0, 1.0, 2.0])], 1).unwrap());
        let h = std::f64::consts::FRAC_1_SQRT_2;

        assert_close(&values, &[1.0, 3.0]);
        assert_close(&vectors, &[h, h, -h, h]);
    }

    #[test]
    fn general_eigen_decomposition() {
        let (values, vectors) = eig_parts(&eig(&[matrix(2, &[2.0, 1.0, 0.0, 3.0])], 1).unwrap());
        let h = std::f64::consts::FRAC_1_SQRT_2;

        assert_close(&values, &[2.0, 3.0]);
        assert_close(&vectors, &[1.0, h, 0.0, h]);
    }

    #[test]
    fn rotations_have_complex_eigenvalues() {
        let err = eig(&[matrix(2, &[0.0, -1.0, 1.0, 0.0])], 2).unwrap_err();
        assert_eq!(err,
                   RuntimeError::LinearAlgebra { details: "matrix has complex eigenvalues".to_string(),
                                                 line:    2, });
    }
}
