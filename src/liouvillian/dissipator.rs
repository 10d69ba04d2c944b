// Copyright 2026 Unified Noise Contributors
// SPDX-License-Identifier: Apache-2.0

//! Lindblad dissipators and their Hilbert–Schmidt adjoints.
//!
//! D[L](ρ)  = L ρ L† − ½{L†L, ρ}
//! D†[L](σ) = L† σ L − ½{L†L, σ}
//!
//! Callers pass L, L† and the precomputed product L†L so that the bath terms
//! do not re-form them on every action.
//!
//! Ref: Breuer & Petruccione, "The Theory of Open Quantum Systems" (2002), Ch. 3.

use ndarray::Array2;
use num_complex::Complex64;

/// A jump operator together with its adjoint and L†L.
#[derive(Debug, Clone)]
pub struct Channel {
    pub l: Array2<Complex64>,
    pub l_dag: Array2<Complex64>,
    pub l_dag_l: Array2<Complex64>,
}

impl Channel {
    pub fn new(l: &Array2<Complex64>, l_dag: &Array2<Complex64>) -> Self {
        Self {
            l: l.clone(),
            l_dag: l_dag.clone(),
            l_dag_l: l_dag.dot(l),
        }
    }

    /// D[L](ρ)
    pub fn dissipate(&self, rho: &Array2<Complex64>) -> Array2<Complex64> {
        sandwich_minus_anticommutator(&self.l, &self.l_dag, &self.l_dag_l, rho)
    }

    /// D†[L](σ): the sandwiching operators swap roles, L†L is unchanged.
    pub fn dissipate_adjoint(&self, sigma: &Array2<Complex64>) -> Array2<Complex64> {
        sandwich_minus_anticommutator(&self.l_dag, &self.l, &self.l_dag_l, sigma)
    }
}

/// left · x · right − ½ (k x + x k)
fn sandwich_minus_anticommutator(
    left: &Array2<Complex64>,
    right: &Array2<Complex64>,
    k: &Array2<Complex64>,
    x: &Array2<Complex64>,
) -> Array2<Complex64> {
    let half = Complex64::new(0.5, 0.0);
    let sandwich = left.dot(x).dot(right);
    let anti = k.dot(x) + x.dot(k);
    sandwich - anti * half
}

/// −i/ħ [H, ρ], or its adjoint +i/ħ [H, σ] when `adjoint` is set.
pub fn commutator_term(
    hamiltonian: &Array2<Complex64>,
    hbar: f64,
    x: &Array2<Complex64>,
    adjoint: bool,
) -> Array2<Complex64> {
    let sign = if adjoint { 1.0 } else { -1.0 };
    let factor = Complex64::new(0.0, sign / hbar);
    (hamiltonian.dot(x) - x.dot(hamiltonian)) * factor
}
