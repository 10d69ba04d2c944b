// Copyright 2026 Unified Noise Contributors
// SPDX-License-Identifier: Apache-2.0

//! Piecewise propagation of a vectorized density matrix over a time grid.
//!
//! Each interval [tᵢ, tᵢ₊₁] is advanced by one Krylov exponential action,
//! evaluated only at the interval end. The fold carries vec(ρ) from one
//! interval to the next and never re-emits ρ(t₀).
//!
//! # Example
//!
//! ```ignore
//! use unified_noise::propagate::{evolve, PropagatorOptions};
//!
//! let states = evolve(&liouvillian, n, &rho0, &[0.0, 1e-6, 2e-6], &PropagatorOptions::default())?;
//! assert_eq!(states.len(), 2);
//! ```

pub mod expm;
pub mod krylov;

use ndarray::Array2;
use num_complex::Complex64;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::analytics::{top_level_population, trace};
use crate::error::{Error, Result};
use crate::liouvillian::LinearOperator;
use crate::validation::{validate_density_shape, validate_time_grid};
use crate::vectorize::{unvec, vec};

pub use expm::matrix_exp;
pub use krylov::{expmv, KrylovOptions, KrylovStats};

/// Trace deviation beyond which a propagated state is renormalized.
pub const TRACE_TOLERANCE: f64 = 1e-12;

/// Options for [`evolve`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PropagatorOptions {
    /// Krylov exponential-action settings.
    #[serde(default)]
    pub krylov: KrylovOptions,
    /// Warn when the population of the top Fock level exceeds this value.
    #[serde(default)]
    pub leakage_threshold: Option<f64>,
}

impl PropagatorOptions {
    pub fn validate(&self) -> Result<()> {
        self.krylov.validate()?;
        if let Some(threshold) = self.leakage_threshold {
            if !(0.0..=1.0).contains(&threshold) {
                return Err(Error::InvalidConfiguration(format!(
                    "leakage threshold must be in [0, 1], got {threshold}"
                )));
            }
        }
        Ok(())
    }
}

/// Propagate ρ₀ across `t_grid`, returning ρ(t₁) … ρ(t_k).
///
/// # Arguments
/// * `generator`: Liouvillian acting on vec(ρ), dimension N².
/// * `n`: Truncation size N.
/// * `rho0`: Initial density matrix (N × N).
/// * `t_grid`: Non-decreasing time points t₀ … t_k, k ≥ 1.
pub fn evolve(
    generator: &dyn LinearOperator,
    n: usize,
    rho0: &Array2<Complex64>,
    t_grid: &[f64],
    options: &PropagatorOptions,
) -> Result<Vec<Array2<Complex64>>> {
    validate_density_shape(rho0, n)?;
    validate_time_grid(t_grid)?;
    if generator.dim() != n * n {
        return Err(Error::vector_length(n * n, generator.dim()));
    }

    let mut y = vec(rho0);
    let mut states = Vec::with_capacity(t_grid.len() - 1);

    for (step, w) in t_grid.windows(2).enumerate() {
        let dt = w[1] - w[0];
        if dt == 0.0 {
            states.push(unvec(&y, n)?);
            continue;
        }

        let (next, stats) = expmv(generator, dt, &y, &options.krylov)?;
        let mut rho = unvec(&next, n)?;

        let tr = trace(&rho);
        if (tr - 1.0).norm() > TRACE_TOLERANCE {
            if tr.norm() == 0.0 {
                warn!(step, "propagated state has zero trace, not renormalized");
                y = next;
            } else {
                rho.mapv_inplace(|z| z / tr);
                y = vec(&rho);
            }
        } else {
            y = next;
        }

        debug!(
            step,
            t = w[1],
            dt,
            substeps = stats.steps,
            rejections = stats.rejections,
            matvecs = stats.matvecs,
            trace_drift = (tr - 1.0).norm(),
            "interval propagated"
        );

        if let Some(threshold) = options.leakage_threshold {
            let top = top_level_population(&rho);
            if top > threshold {
                warn!(
                    t = w[1],
                    population = top,
                    threshold,
                    level = n - 1,
                    "population at truncation edge exceeds threshold"
                );
            }
        }

        states.push(rho);
    }

    Ok(states)
}
