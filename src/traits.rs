//! Core scalar trait for the solvers
//!
//! This module defines [`RealField`], the bound on matrix element types used
//! throughout the crate. It abstracts over real floating-point scalars,
//! providing the magnitude test used for singularity detection and a lossy
//! f64 view used in error payloads.
//!
//! # Implementations
//!
//! Provided for:
//! - `f64` (default for all solve and inversion paths)
//! - `f32` (for memory-constrained applications)

use num_traits::{Float, FromPrimitive, NumAssign, ToPrimitive};
use std::fmt::Debug;

/// Trait for real scalar types that can be used in factorization and solves.
pub trait RealField:
    Float + NumAssign + FromPrimitive + ToPrimitive + Send + Sync + Debug + 'static
{
    /// Check if this value is numerically zero under the given tolerance
    fn is_zero_approx(&self, tol: Self) -> bool {
        self.abs() <= tol
    }

    /// Lossy conversion to f64, for reporting magnitudes in errors
    fn as_f64(&self) -> f64 {
        self.to_f64().unwrap_or(f64::NAN)
    }
}

impl RealField for f64 {}

impl RealField for f32 {}
