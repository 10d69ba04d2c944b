// Copyright 2026 Unified Noise Contributors
// SPDX-License-Identifier: Apache-2.0

//! Shared fixtures for unit tests.

use ndarray::{Array1, Array2};
use num_complex::Complex64;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Pure Fock projector |k⟩⟨k| in an N-level truncation.
pub fn fock_rho(n: usize, k: usize) -> Array2<Complex64> {
    let mut rho = Array2::zeros((n, n));
    rho[[k, k]] = Complex64::new(1.0, 0.0);
    rho
}

fn random_entry(rng: &mut StdRng) -> Complex64 {
    Complex64::new(rng.gen_range(-1.0..1.0), rng.gen_range(-1.0..1.0))
}

/// Dense complex matrix with entries uniform in the unit square.
pub fn random_matrix(n: usize, seed: u64) -> Array2<Complex64> {
    let mut rng = StdRng::seed_from_u64(seed);
    Array2::from_shape_simple_fn((n, n), || random_entry(&mut rng))
}

/// Complex vector with entries uniform in the unit square.
pub fn random_vector(len: usize, seed: u64) -> Array1<Complex64> {
    let mut rng = StdRng::seed_from_u64(seed);
    Array1::from_shape_simple_fn(len, || random_entry(&mut rng))
}

/// Hilbert–Schmidt inner product Tr(X† Y).
pub fn frobenius_inner(x: &Array2<Complex64>, y: &Array2<Complex64>) -> Complex64 {
    x.iter().zip(y.iter()).map(|(a, b)| a.conj() * b).sum()
}
