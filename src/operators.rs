// Copyright 2026 Unified Noise Contributors
// SPDX-License-Identifier: Apache-2.0

//! Ladder operators and the oscillator Hamiltonian in a truncated Fock basis.
//!
//! Basis states are |0⟩ … |N−1⟩. The annihilation operator has
//! a[k−1, k] = √k; amplitude pushed above |N−1⟩ by a† is discarded.

use ndarray::Array2;
use num_complex::Complex64;

use crate::error::{Error, Result};

/// Reduced Planck constant [J·s] (CODATA 2018, exact).
pub const HBAR: f64 = 1.054_571_817e-34;

/// Fixed operators of a truncated harmonic mode.
#[derive(Debug, Clone)]
pub struct LadderOperators {
    /// Number operator n = diag(0, 1, …, N−1).
    pub number: Array2<Complex64>,
    /// Annihilation operator a.
    pub annihilation: Array2<Complex64>,
    /// Creation operator a†.
    pub creation: Array2<Complex64>,
}

impl LadderOperators {
    /// Build the ladder operators for truncation size `n`.
    pub fn new(n: usize) -> Result<Self> {
        if n == 0 {
            return Err(Error::InvalidConfiguration(
                "truncation size must be >= 1".into(),
            ));
        }

        let number = Array2::from_diag(
            &(0..n)
                .map(|k| Complex64::new(k as f64, 0.0))
                .collect::<ndarray::Array1<_>>(),
        );

        let mut annihilation = Array2::zeros((n, n));
        for k in 1..n {
            annihilation[[k - 1, k]] = Complex64::new((k as f64).sqrt(), 0.0);
        }
        let creation = dagger(&annihilation);

        Ok(Self {
            number,
            annihilation,
            creation,
        })
    }

    /// Truncation size N.
    pub fn dim(&self) -> usize {
        self.number.nrows()
    }
}

/// H = ħω(n + ½), in joules.
pub fn hamiltonian(ops: &LadderOperators, omega: f64) -> Array2<Complex64> {
    let eye = Array2::<Complex64>::eye(ops.dim());
    let half = Complex64::new(0.5, 0.0);
    (&ops.number + &(eye * half)) * Complex64::new(HBAR * omega, 0.0)
}

/// Conjugate transpose (dagger) of a matrix.
pub fn dagger(m: &Array2<Complex64>) -> Array2<Complex64> {
    m.t().mapv(|z| z.conj())
}
