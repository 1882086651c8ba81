//! Matrix inversion via LU decomposition
//!
//! Computes A⁻¹ by factorizing A once, then solving A·xᵢ = eᵢ for each
//! column eᵢ of the identity matrix; xᵢ is the i-th column of the inverse.
//! The single O(n³) factorization is reused for all n O(n²) column solves.
//!
//! [`inverse`] writes the result to freshly allocated storage and leaves the
//! input untouched; [`inverse_in_place`] overwrites the caller's matrix.

use crate::lu::{LuError, LuFactorization, lu_factorize};
use crate::traits::RealField;
use ndarray::{Array1, Array2};

#[cfg(feature = "rayon")]
use rayon::prelude::*;

/// Pivot magnitudes at or below this threshold are treated as zero
pub const DEFAULT_TOLERANCE: f64 = 1e-14;

/// [`DEFAULT_TOLERANCE`] converted to the scalar type in use
#[inline]
pub fn default_tolerance<T: RealField>() -> T {
    T::from_f64(DEFAULT_TOLERANCE).unwrap()
}

/// Minimum dimension before parallel column solves pay off
#[cfg(feature = "rayon")]
const PARALLEL_THRESHOLD: usize = 64;

/// Compute the inverse of a square matrix into fresh storage
///
/// The input is left unmodified. Fails with [`LuError::SingularMatrix`] if
/// any pivot magnitude is at or below `tolerance`; no degenerate inverse is
/// ever returned.
pub fn inverse<T: RealField>(a: &Array2<T>, tolerance: T) -> Result<Array2<T>, LuError> {
    let factorization = lu_factorize(a)?;
    factorization.check_pivots(tolerance)?;

    let mut ai = Array2::from_elem((factorization.n, factorization.n), T::zero());
    solve_columns(&factorization, &mut ai)?;
    Ok(ai)
}

/// Compute the inverse of a square matrix, overwriting the input storage
///
/// Elimination runs on an internal copy, so the caller's matrix is only
/// written once the factorization and the singularity check have succeeded.
/// On error the input is left unmodified.
pub fn inverse_in_place<T: RealField>(a: &mut Array2<T>, tolerance: T) -> Result<(), LuError> {
    let factorization = lu_factorize(a)?;
    factorization.check_pivots(tolerance)?;

    solve_columns(&factorization, a)
}

/// Solve Ax = b by computing the full inverse and multiplying: x = A⁻¹·b
///
/// This costs the O(n³) inversion plus an O(n²) matrix–vector product, and
/// exists to compare the inverse-based approach against the direct
/// [`crate::lu::lu_solve`] path, which is the recommended way to solve a
/// single system. Both return the same solution up to rounding.
pub fn inverse_solve<T: RealField>(
    a: &Array2<T>,
    b: &Array1<T>,
    tolerance: T,
) -> Result<Array1<T>, LuError> {
    if b.len() != a.nrows() {
        return Err(LuError::DimensionMismatch {
            expected: a.nrows(),
            got: b.len(),
        });
    }

    let ai = inverse(a, tolerance)?;
    Ok(ai.dot(b))
}

/// Solve against each identity column and assemble the inverse in `dest`
fn solve_columns<T: RealField>(
    factorization: &LuFactorization<T>,
    dest: &mut Array2<T>,
) -> Result<(), LuError> {
    #[cfg(feature = "rayon")]
    {
        if factorization.n >= PARALLEL_THRESHOLD {
            return solve_columns_parallel(factorization, dest);
        }
    }

    solve_columns_sequential(factorization, dest)
}

fn solve_columns_sequential<T: RealField>(
    factorization: &LuFactorization<T>,
    dest: &mut Array2<T>,
) -> Result<(), LuError> {
    let n = factorization.n;
    let mut e = Array1::from_elem(n, T::zero());

    for i in 0..n {
        e[i] = T::one();
        let column = factorization.solve(&e)?;
        dest.column_mut(i).assign(&column);
        e[i] = T::zero();
    }

    Ok(())
}

/// Column solves are independent: each owns its basis vector and solution
/// buffer, so no state is shared between iterations.
#[cfg(feature = "rayon")]
fn solve_columns_parallel<T: RealField>(
    factorization: &LuFactorization<T>,
    dest: &mut Array2<T>,
) -> Result<(), LuError> {
    let n = factorization.n;

    let columns = (0..n)
        .into_par_iter()
        .map(|i| {
            let mut e = Array1::from_elem(n, T::zero());
            e[i] = T::one();
            factorization.solve(&e)
        })
        .collect::<Result<Vec<_>, LuError>>()?;

    for (i, column) in columns.into_iter().enumerate() {
        dest.column_mut(i).assign(&column);
    }

    Ok(())
}
