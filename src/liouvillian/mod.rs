// Copyright 2026 Unified Noise Contributors
// SPDX-License-Identifier: Apache-2.0

//! Matrix-free Liouvillian for one harmonic mode in a thermal bath.
//!
//!   dρ/dt = −i/ħ [H, ρ] + γ[(n̄+1) D[a] + n̄ D[a†]](ρ) + L_jump(ρ)
//!
//! with D[L](ρ) = LρL† − ½{L†L, ρ}. The generator acts on column-major
//! vec(ρ) of length N² and is never materialized as an N²×N² matrix.
//!
//! A [`Liouvillian`] is an immutable snapshot. Installing or clearing a jump
//! term builds a new snapshot that shares the fixed operators through `Arc`.

pub mod dissipator;
pub mod jump;
pub mod linear_op;

use std::sync::Arc;

use ndarray::{Array1, Array2};
use num_complex::Complex64;

use crate::error::{Error, Result};
use crate::operators::{LadderOperators, HBAR};
use crate::vectorize::{unvec, vec};

use dissipator::{commutator_term, Channel};
pub use jump::{JumpTerm, SuperopFn};
pub use linear_op::LinearOperator;

/// Thermal bath coupling: damping rate and mean occupation.
#[derive(Debug, Clone)]
struct Bath {
    gamma: f64,
    nbar: f64,
    damping: Channel,
    heating: Channel,
}

/// Generator of the master equation as a linear operator on vec(ρ).
#[derive(Debug, Clone)]
pub struct Liouvillian {
    n: usize,
    hamiltonian: Arc<Array2<Complex64>>,
    bath: Option<Arc<Bath>>,
    jump: Option<JumpTerm>,
}

impl Liouvillian {
    /// Build the generator from the fixed operators and bath parameters.
    ///
    /// The bath terms are dropped entirely when `gamma == 0`.
    pub fn new(
        ops: &LadderOperators,
        hamiltonian: Arc<Array2<Complex64>>,
        gamma: f64,
        nbar: f64,
    ) -> Self {
        let bath = (gamma != 0.0).then(|| {
            Arc::new(Bath {
                gamma,
                nbar,
                damping: Channel::new(&ops.annihilation, &ops.creation),
                heating: Channel::new(&ops.creation, &ops.annihilation),
            })
        });
        Self {
            n: ops.dim(),
            hamiltonian,
            bath,
            jump: None,
        }
    }

    /// New snapshot with the given jump term (or none).
    pub fn with_jump(&self, jump: Option<JumpTerm>) -> Self {
        Self {
            n: self.n,
            hamiltonian: Arc::clone(&self.hamiltonian),
            bath: self.bath.clone(),
            jump,
        }
    }

    /// Truncation size N.
    pub fn truncation(&self) -> usize {
        self.n
    }

    pub fn has_bath(&self) -> bool {
        self.bath.is_some()
    }

    pub fn has_jump(&self) -> bool {
        self.jump.is_some()
    }

    /// Apply the generator (or its adjoint) to a density matrix.
    pub fn apply_matrix(&self, rho: &Array2<Complex64>, adjoint: bool) -> Result<Array2<Complex64>> {
        if rho.dim() != (self.n, self.n) {
            return Err(Error::ShapeMismatch {
                expected: (self.n, self.n),
                actual: rho.dim(),
            });
        }

        let mut out = commutator_term(&self.hamiltonian, HBAR, rho, adjoint);

        if let Some(bath) = &self.bath {
            let (d_down, d_up) = if adjoint {
                (
                    bath.damping.dissipate_adjoint(rho),
                    bath.heating.dissipate_adjoint(rho),
                )
            } else {
                (bath.damping.dissipate(rho), bath.heating.dissipate(rho))
            };
            let down = Complex64::new(bath.gamma * (bath.nbar + 1.0), 0.0);
            let up = Complex64::new(bath.gamma * bath.nbar, 0.0);
            out = out + d_down * down + d_up * up;
        }

        if let Some(jump) = &self.jump {
            let y = vec(rho);
            let jy = if adjoint {
                jump.adjoint(&y)?
            } else {
                jump.forward(&y)?
            };
            out = out + unvec(&jy, self.n)?;
        }

        Ok(out)
    }

    fn apply_vec(&self, y: &Array1<Complex64>, adjoint: bool) -> Result<Array1<Complex64>> {
        let rho = unvec(y, self.n)?;
        Ok(vec(&self.apply_matrix(&rho, adjoint)?))
    }
}

impl LinearOperator for Liouvillian {
    fn dim(&self) -> usize {
        self.n * self.n
    }

    fn apply(&self, y: &Array1<Complex64>) -> Result<Array1<Complex64>> {
        self.apply_vec(y, false)
    }

    fn apply_adjoint(&self, y: &Array1<Complex64>) -> Result<Array1<Complex64>> {
        self.apply_vec(y, true)
    }
}
