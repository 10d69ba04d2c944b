// Copyright 2026 Unified Noise Contributors
// SPDX-License-Identifier: Apache-2.0

//! Matrix-free linear operators on vectorized density matrices.

use ndarray::Array1;
use num_complex::Complex64;

use crate::error::Result;

/// A linear map on Cᵈ known only through its action and adjoint action.
///
/// The adjoint is taken with respect to the Euclidean inner product on the
/// flattened vectors, which for column-major vectorization coincides with the
/// Hilbert–Schmidt inner product on matrices.
pub trait LinearOperator: Send + Sync {
    /// Length of the vectors the operator acts on.
    fn dim(&self) -> usize;

    /// y ↦ A y
    fn apply(&self, y: &Array1<Complex64>) -> Result<Array1<Complex64>>;

    /// y ↦ A† y
    fn apply_adjoint(&self, y: &Array1<Complex64>) -> Result<Array1<Complex64>>;
}
