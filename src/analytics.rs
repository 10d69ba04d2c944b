// Copyright 2026 Unified Noise Contributors
// SPDX-License-Identifier: Apache-2.0

//! Scalar reductions of density matrices.

use ndarray::Array2;
use num_complex::Complex64;

/// Tr(ρ)
pub fn trace(rho: &Array2<Complex64>) -> Complex64 {
    rho.diag().iter().sum()
}

/// Re Tr(ρ N) for an observable N.
pub fn expectation(rho: &Array2<Complex64>, op: &Array2<Complex64>) -> f64 {
    // Tr(ρ N) = Σᵢⱼ ρᵢⱼ Nⱼᵢ, without forming the product
    rho.indexed_iter()
        .map(|((i, j), r)| r * op[[j, i]])
        .sum::<Complex64>()
        .re
}

/// Mean excitation ⟨n⟩ = Re Tr(ρ n).
pub fn n_expectation(rho: &Array2<Complex64>, n_op: &Array2<Complex64>) -> f64 {
    expectation(rho, n_op)
}

/// Purity Tr(ρ²).
pub fn purity(rho: &Array2<Complex64>) -> f64 {
    expectation(rho, rho)
}

/// Population of the highest retained Fock level, ρ[N−1, N−1].
pub fn top_level_population(rho: &Array2<Complex64>) -> f64 {
    let n = rho.nrows();
    if n == 0 {
        return 0.0;
    }
    rho[[n - 1, n - 1]].re
}

/// Fidelity Tr(ρ_target ρ) against a pure target state.
pub fn state_fidelity(rho: &Array2<Complex64>, target_rho: &Array2<Complex64>) -> f64 {
    expectation(rho, target_rho)
}
