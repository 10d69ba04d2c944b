// Copyright 2026 Unified Noise Contributors
// SPDX-License-Identifier: Apache-2.0

//! Column-major vectorization of density matrices.
//!
//! vec(ρ)[i + j·N] = ρ[i, j]. Every superoperator in the crate flattens and
//! restores matrices through this module, never through ndarray's default
//! row-major ordering.

use ndarray::{Array1, Array2, ShapeBuilder};
use num_complex::Complex64;

use crate::error::{Error, Result};

/// Flatten a matrix column by column.
pub fn vec(rho: &Array2<Complex64>) -> Array1<Complex64> {
    rho.t().iter().copied().collect()
}

/// Restore an N×N matrix from its column-major flattening.
pub fn unvec(y: &Array1<Complex64>, n: usize) -> Result<Array2<Complex64>> {
    if y.len() != n * n {
        return Err(Error::vector_length(n * n, y.len()));
    }
    Array2::from_shape_vec((n, n).f(), y.to_vec()).map_err(|_| Error::vector_length(n * n, y.len()))
}

/// Euclidean inner product ⟨x, y⟩ = Σ conj(xᵢ)·yᵢ.
pub fn inner(x: &Array1<Complex64>, y: &Array1<Complex64>) -> Complex64 {
    x.iter().zip(y.iter()).map(|(a, b)| a.conj() * b).sum()
}

/// Euclidean norm ‖x‖₂.
pub fn norm(x: &Array1<Complex64>) -> f64 {
    x.iter().map(|z| z.norm_sqr()).sum::<f64>().sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(n: usize) -> Array2<Complex64> {
        Array2::from_shape_fn((n, n), |(i, j)| Complex64::new(i as f64, j as f64))
    }

    #[test]
    fn test_vec_is_column_major() {
        let rho = sample(3);
        let y = vec(&rho);
        for i in 0..3 {
            for j in 0..3 {
                assert_eq!(y[i + 3 * j], rho[[i, j]]);
            }
        }
    }

    #[test]
    fn test_unvec_inverts_vec() {
        let rho = sample(4);
        let back = unvec(&vec(&rho), 4).unwrap();
        assert_eq!(back, rho);
    }

    #[test]
    fn test_unvec_wrong_length() {
        let y = Array1::zeros(8);
        assert!(matches!(
            unvec(&y, 3),
            Err(Error::ShapeMismatch {
                expected: (9, 1),
                actual: (8, 1)
            })
        ));
    }

    #[test]
    fn test_inner_is_conjugate_linear_in_first_argument() {
        let x = Array1::from(vec![Complex64::new(0.0, 1.0)]);
        let y = Array1::from(vec![Complex64::new(1.0, 0.0)]);
        assert_eq!(inner(&x, &y), Complex64::new(0.0, -1.0));
        assert_eq!(norm(&x), 1.0);
    }
}
