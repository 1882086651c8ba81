//! Dense matrix inversion and linear-system solving via LU decomposition
//!
//! This crate computes the inverse of a dense, non-singular square matrix by
//! LU factorization with partial pivoting, and solves linear systems either
//! through the inverse or through the direct factorize-then-substitute path.
//!
//! # Features
//!
//! - **Factorization**: partial-pivoted LU with the factors packed into one
//!   array, reusable across right-hand sides
//! - **Inversion**: one factorization, one O(n²) solve per identity column,
//!   with fresh-allocation and in-place variants
//! - **Singularity detection**: explicit tolerance check on the pivot
//!   magnitudes, surfaced as a structured error
//! - **Generic Scalar Types**: works with f64 (default) and f32
//! - **Optional Parallelism**: inverse columns solved in parallel with the
//!   `rayon` feature
//!
//! # Example
//!
//! ```
//! use dense_lu::{inverse, inverse_solve};
//! use ndarray::array;
//!
//! let a = array![[2.0, 0.0], [0.0, 2.0]];
//!
//! let ai = inverse(&a, 1e-14).unwrap();
//! assert_eq!(ai, array![[0.5, 0.0], [0.0, 0.5]]);
//!
//! let b = array![4.0, 6.0];
//! let x = inverse_solve(&a, &b, 1e-14).unwrap();
//! assert_eq!(x, array![2.0, 3.0]);
//! ```

pub mod inverse;
pub mod lu;
pub mod traits;

// Re-export main types
pub use traits::RealField;

// Re-export the factorizer
pub use lu::{LuError, LuFactorization, lu_factorize, lu_solve};

// Re-export the inverse engine
pub use inverse::{
    DEFAULT_TOLERANCE, default_tolerance, inverse, inverse_in_place, inverse_solve,
};
