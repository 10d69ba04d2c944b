// Copyright 2026 Unified Noise Contributors
// SPDX-License-Identifier: Apache-2.0

//! Master-equation solver for a single truncated bosonic mode.
//!
//! The solver owns an immutable snapshot of the generator. Installing or
//! clearing a jump term builds a fresh [`Liouvillian`] that shares the cached
//! operators and Hamiltonian; snapshots handed out earlier are never mutated.
//!
//! # Example
//!
//! ```ignore
//! use unified_noise::{MasterEquationSolver, ModelParams};
//! use unified_noise::states::ground_state;
//!
//! let solver = MasterEquationSolver::new(10, ModelParams::default())?;
//! let states = solver.evolve(&ground_state(10)?, &[0.0, 1e-6, 2e-6])?;
//! ```

use std::sync::Arc;

use ndarray::Array2;
use num_complex::Complex64;
use tracing::{debug, info};

use crate::error::Result;
use crate::liouvillian::{JumpTerm, Liouvillian, SuperopFn};
use crate::operators::{hamiltonian, LadderOperators};
use crate::params::ModelParams;
use crate::propagate::{self, PropagatorOptions};

/// Lindblad solver with a pluggable jump superoperator.
#[derive(Debug, Clone)]
pub struct MasterEquationSolver {
    params: ModelParams,
    options: PropagatorOptions,
    operators: Arc<LadderOperators>,
    hamiltonian: Arc<Array2<Complex64>>,
    liouvillian: Arc<Liouvillian>,
}

impl MasterEquationSolver {
    /// Build a solver with default propagator options.
    pub fn new(n: usize, params: ModelParams) -> Result<Self> {
        Self::with_options(n, params, PropagatorOptions::default())
    }

    pub fn with_options(n: usize, params: ModelParams, options: PropagatorOptions) -> Result<Self> {
        params.validate()?;
        options.validate()?;

        let operators = Arc::new(LadderOperators::new(n)?);
        let hamiltonian = Arc::new(hamiltonian(&operators, params.omega));
        let liouvillian = Arc::new(Liouvillian::new(
            &operators,
            Arc::clone(&hamiltonian),
            params.gamma,
            params.nbar_bath,
        ));

        info!(
            truncation = n,
            omega = params.omega,
            gamma = params.gamma,
            nbar = params.nbar_bath,
            jump_law = %params.jump_law,
            "master-equation solver built"
        );

        Ok(Self {
            params,
            options,
            operators,
            hamiltonian,
            liouvillian,
        })
    }

    /// Current generator snapshot.
    pub fn liouvillian(&self) -> Arc<Liouvillian> {
        Arc::clone(&self.liouvillian)
    }

    /// Truncation size N.
    pub fn truncation(&self) -> usize {
        self.operators.dim()
    }

    pub fn params(&self) -> &ModelParams {
        &self.params
    }

    pub fn options(&self) -> &PropagatorOptions {
        &self.options
    }

    pub fn number_operator(&self) -> &Array2<Complex64> {
        &self.operators.number
    }

    pub fn annihilation(&self) -> &Array2<Complex64> {
        &self.operators.annihilation
    }

    pub fn creation(&self) -> &Array2<Complex64> {
        &self.operators.creation
    }

    pub fn hamiltonian(&self) -> &Array2<Complex64> {
        &self.hamiltonian
    }

    /// Install a jump superoperator from its forward and adjoint maps.
    ///
    /// A missing `matvec` clears the jump term and ignores `rmatvec`. A
    /// `matvec` without `rmatvec` is rejected and leaves the solver unchanged.
    pub fn install_jump(
        &mut self,
        matvec: Option<SuperopFn>,
        rmatvec: Option<SuperopFn>,
    ) -> Result<()> {
        let jump = JumpTerm::from_pair(matvec, rmatvec)?;
        self.rebuild(jump);
        Ok(())
    }

    pub fn set_jump(&mut self, jump: JumpTerm) {
        self.rebuild(Some(jump));
    }

    pub fn clear_jump(&mut self) {
        self.rebuild(None);
    }

    fn rebuild(&mut self, jump: Option<JumpTerm>) {
        debug!(installed = jump.is_some(), "rebuilding Liouvillian snapshot");
        self.liouvillian = Arc::new(self.liouvillian.with_jump(jump));
    }

    /// Propagate `rho0` over `t_grid`, returning the states at t₁ … t_k.
    pub fn evolve(
        &self,
        rho0: &Array2<Complex64>,
        t_grid: &[f64],
    ) -> Result<Vec<Array2<Complex64>>> {
        if self.params.lam > 0.0 && !self.liouvillian.has_jump() {
            debug!(
                lam = self.params.lam,
                jump_law = %self.params.jump_law,
                "jump rate set but no jump superoperator installed"
            );
        }

        let liouvillian = self.liouvillian();
        let states = propagate::evolve(
            liouvillian.as_ref(),
            self.truncation(),
            rho0,
            t_grid,
            &self.options,
        )?;

        debug!(
            points = t_grid.len(),
            states = states.len(),
            "evolution finished"
        );
        Ok(states)
    }
}
