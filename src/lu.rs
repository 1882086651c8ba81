//! LU factorization with partial pivoting
//!
//! Provides the pivoted decomposition P·A = L·U for dense square matrices,
//! with solve-against-a-vector reusing the factorization. The factorization
//! costs O(n³) once; each subsequent solve is O(n²).

use crate::traits::RealField;
use ndarray::{Array1, Array2};
use thiserror::Error;

/// Errors produced by factorization, solving and inversion
#[derive(Error, Debug, Clone, PartialEq)]
pub enum LuError {
    /// Input matrix is not square, or has no rows
    #[error("matrix must be square with at least one row, got {rows}x{cols}")]
    Shape { rows: usize, cols: usize },
    /// Right-hand side length does not match the matrix dimension
    #[error("right-hand side length mismatch: expected {expected}, got {got}")]
    DimensionMismatch { expected: usize, got: usize },
    /// A pivot magnitude fell at or below the configured tolerance
    #[error(
        "matrix is numerically singular: |U[{index},{index}]| = {magnitude:e} \
         with tolerance {tolerance:e}"
    )]
    SingularMatrix {
        index: usize,
        magnitude: f64,
        tolerance: f64,
    },
    /// A non-finite value appeared during elimination
    #[error("non-finite value during elimination at step {index}")]
    NumericOverflow { index: usize },
}

/// LU factorization result
///
/// Stores the packed L and U factors along with the pivot sequence.
#[derive(Debug, Clone, PartialEq)]
pub struct LuFactorization<T: RealField> {
    /// Combined L and U matrices (L is unit lower triangular, stored below
    /// the diagonal; U is on and above it)
    pub lu: Array2<T>,
    /// Row swapped into position k at elimination step k. Applying the
    /// recorded transpositions in order reproduces the permutation P.
    pub pivots: Vec<usize>,
    /// Matrix dimension
    pub n: usize,
}

impl<T: RealField> LuFactorization<T> {
    /// Solve Ax = b using the pre-computed factorization
    ///
    /// Permutes b, forward-substitutes through L, back-substitutes through
    /// U. O(n²) per call, so repeated right-hand sides amortize the single
    /// O(n³) factorization.
    pub fn solve(&self, b: &Array1<T>) -> Result<Array1<T>, LuError> {
        if b.len() != self.n {
            return Err(LuError::DimensionMismatch {
                expected: self.n,
                got: b.len(),
            });
        }

        let mut x = b.clone();

        // Apply the recorded row transpositions: x = P·b
        for i in 0..self.n {
            let pivot = self.pivots[i];
            if pivot != i {
                x.swap(i, pivot);
            }
        }

        // Forward substitution: Ly = Pb
        for i in 0..self.n {
            for j in 0..i {
                let l_ij = self.lu[[i, j]];
                x[i] = x[i] - l_ij * x[j];
            }
        }

        // Backward substitution: Ux = y
        for i in (0..self.n).rev() {
            for j in (i + 1)..self.n {
                let u_ij = self.lu[[i, j]];
                x[i] = x[i] - u_ij * x[j];
            }
            let u_ii = self.lu[[i, i]];
            if u_ii == T::zero() {
                return Err(LuError::SingularMatrix {
                    index: i,
                    magnitude: 0.0,
                    tolerance: 0.0,
                });
            }
            x[i] = x[i] / u_ii;
        }

        Ok(x)
    }

    /// Enforce that every pivot magnitude is above the given tolerance
    ///
    /// The pivots are the diagonal entries of the packed U. The first entry
    /// at or below the tolerance is reported as numerically singular.
    pub fn check_pivots(&self, tolerance: T) -> Result<(), LuError> {
        for i in 0..self.n {
            let u_ii = self.lu[[i, i]];
            if u_ii.is_zero_approx(tolerance) {
                return Err(LuError::SingularMatrix {
                    index: i,
                    magnitude: u_ii.abs().as_f64(),
                    tolerance: tolerance.as_f64(),
                });
            }
        }
        Ok(())
    }
}

/// Compute the LU factorization of a square matrix with partial pivoting
///
/// The input is not modified; elimination runs on an internal working copy.
/// A column whose best pivot candidate is exactly zero is left uneliminated
/// with a zero on U's diagonal, so singularity is diagnosed by
/// [`LuFactorization::check_pivots`] rather than here.
pub fn lu_factorize<T: RealField>(a: &Array2<T>) -> Result<LuFactorization<T>, LuError> {
    let n = a.nrows();
    if n == 0 || n != a.ncols() {
        return Err(LuError::Shape {
            rows: n,
            cols: a.ncols(),
        });
    }

    let mut lu = a.clone();
    let mut pivots = vec![0usize; n];

    for k in 0..n {
        // Find the largest-magnitude candidate in column k
        let mut max_val = lu[[k, k]].abs();
        let mut max_row = k;

        for i in (k + 1)..n {
            let val = lu[[i, k]].abs();
            if val > max_val {
                max_val = val;
                max_row = i;
            }
        }

        if !max_val.is_finite() {
            return Err(LuError::NumericOverflow { index: k });
        }

        pivots[k] = max_row;

        // Swap rows if needed
        if max_row != k {
            for j in 0..n {
                let tmp = lu[[k, j]];
                lu[[k, j]] = lu[[max_row, j]];
                lu[[max_row, j]] = tmp;
            }
        }

        // Exactly zero pivot: leave the column uneliminated and let the
        // tolerance check report the singularity
        if max_val == T::zero() {
            continue;
        }

        // Compute multipliers and eliminate below the pivot
        let pivot = lu[[k, k]];
        for i in (k + 1)..n {
            let mult = lu[[i, k]] / pivot;
            lu[[i, k]] = mult; // Store multiplier in L part

            for j in (k + 1)..n {
                let update = mult * lu[[k, j]];
                lu[[i, j]] -= update;
            }
        }
    }

    Ok(LuFactorization { lu, pivots, n })
}

/// Solve Ax = b by factorizing and substituting directly
///
/// This is the direct path: factorize once, check the pivots against the
/// tolerance, then run one forward/backward substitution. It solves the
/// same systems as [`crate::inverse::inverse_solve`] without forming the
/// inverse, and is the faster of the two.
pub fn lu_solve<T: RealField>(
    a: &Array2<T>,
    b: &Array1<T>,
    tolerance: T,
) -> Result<Array1<T>, LuError> {
    let factorization = lu_factorize(a)?;
    factorization.check_pivots(tolerance)?;
    factorization.solve(b)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use ndarray::array;

    #[test]
    fn test_lu_solve() {
        let a = array![[4.0_f64, 1.0], [1.0, 3.0]];
        let b = array![1.0_f64, 2.0];

        let x = lu_solve(&a, &b, 1e-14).expect("LU solve should succeed");

        // Verify: Ax = b
        let ax = a.dot(&x);
        for i in 0..2 {
            assert_relative_eq!(ax[i], b[i], epsilon = 1e-10);
        }
    }

    #[test]
    fn test_lu_identity() {
        let n = 5;
        let a = Array2::from_diag(&Array1::from_elem(n, 1.0_f64));
        let b = Array1::from_iter((1..=n).map(|i| i as f64));

        let x = lu_solve(&a, &b, 1e-14).expect("LU solve should succeed");

        for i in 0..n {
            assert_relative_eq!(x[i], b[i], epsilon = 1e-10);
        }
    }

    #[test]
    fn test_lu_factorize_and_solve() {
        let a = array![[4.0_f64, 1.0, 0.0], [1.0, 3.0, 1.0], [0.0, 1.0, 2.0]];

        let factorization = lu_factorize(&a).expect("Factorization should succeed");

        // Solve multiple RHS against the same factorization
        let b1 = array![1.0_f64, 2.0, 3.0];
        let x1 = factorization.solve(&b1).expect("Solve should succeed");

        let ax1 = a.dot(&x1);
        for i in 0..3 {
            assert_relative_eq!(ax1[i], b1[i], epsilon = 1e-10);
        }

        let b2 = array![4.0_f64, 5.0, 6.0];
        let x2 = factorization.solve(&b2).expect("Solve should succeed");

        let ax2 = a.dot(&x2);
        for i in 0..3 {
            assert_relative_eq!(ax2[i], b2[i], epsilon = 1e-10);
        }
    }

    #[test]
    fn test_lu_cyclic_pivoting() {
        // Pivot order here is a cycle of row transpositions, which a naive
        // permutation-array representation gets wrong
        let a = array![[0.0_f64, 1.0, 2.0], [3.0, 4.0, 5.0], [6.0, 7.0, 9.0]];
        let x_true = array![1.0_f64, 2.0, 3.0];
        let b = a.dot(&x_true);

        let x = lu_solve(&a, &b, 1e-14).expect("LU solve should succeed");

        for i in 0..3 {
            assert_relative_eq!(x[i], x_true[i], epsilon = 1e-10);
        }
    }

    #[test]
    fn test_lu_input_unmodified() {
        let a = array![[4.0_f64, 1.0], [1.0, 3.0]];
        let a_before = a.clone();

        lu_factorize(&a).expect("Factorization should succeed");

        assert_eq!(a, a_before);
    }

    #[test]
    fn test_lu_factorize_deterministic() {
        let a = array![[2.0_f64, -1.0, 3.0], [4.0, 2.0, 1.0], [-2.0, 5.0, 2.0]];

        let f1 = lu_factorize(&a).expect("Factorization should succeed");
        let f2 = lu_factorize(&a).expect("Factorization should succeed");

        assert_eq!(f1, f2);
    }

    #[test]
    fn test_lu_singular() {
        let a = array![[1.0_f64, 2.0], [2.0, 4.0]]; // rank 1

        let b = array![1.0_f64, 2.0];
        let result = lu_solve(&a, &b, 1e-14);

        assert!(matches!(
            result,
            Err(LuError::SingularMatrix { index: 1, .. })
        ));
    }

    #[test]
    fn test_lu_near_singular_tolerance() {
        let a = array![[1.0_f64, 0.0], [0.0, 1e-15]];
        let factorization = lu_factorize(&a).expect("Factorization should succeed");

        // Below tolerance: flagged
        let err = factorization.check_pivots(1e-14).unwrap_err();
        assert!(matches!(
            err,
            LuError::SingularMatrix {
                index: 1,
                tolerance,
                ..
            } if tolerance == 1e-14
        ));

        // With a tighter tolerance the same pivot passes
        assert!(factorization.check_pivots(1e-16).is_ok());
    }

    #[test]
    fn test_lu_shape_error() {
        let a = Array2::<f64>::zeros((2, 3));
        assert!(matches!(
            lu_factorize(&a),
            Err(LuError::Shape { rows: 2, cols: 3 })
        ));

        let empty = Array2::<f64>::zeros((0, 0));
        assert!(matches!(lu_factorize(&empty), Err(LuError::Shape { .. })));
    }

    #[test]
    fn test_lu_rhs_mismatch() {
        let a = array![[4.0_f64, 1.0], [1.0, 3.0]];
        let factorization = lu_factorize(&a).expect("Factorization should succeed");

        let b = array![1.0_f64, 2.0, 3.0];
        assert!(matches!(
            factorization.solve(&b),
            Err(LuError::DimensionMismatch {
                expected: 2,
                got: 3
            })
        ));
    }

    #[test]
    fn test_lu_non_finite_input() {
        let a = array![[f64::INFINITY, 1.0], [1.0, 1.0]];
        assert!(matches!(
            lu_factorize(&a),
            Err(LuError::NumericOverflow { index: 0 })
        ));

        let a = array![[f64::NAN, 1.0], [1.0, 1.0]];
        assert!(matches!(
            lu_factorize(&a),
            Err(LuError::NumericOverflow { index: 0 })
        ));
    }
}
