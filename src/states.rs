// Copyright 2026 Unified Noise Contributors
// SPDX-License-Identifier: Apache-2.0

//! Standard initial density matrices in the truncated Fock basis.

use ndarray::Array2;
use num_complex::Complex64;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Initial state selector, as written in configuration files.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum InitialState {
    /// |0⟩⟨0|
    #[default]
    Ground,
    /// |n⟩⟨n|
    Fock { n: usize },
    /// Truncated thermal state with mean occupation `nbar`.
    Thermal { nbar: f64 },
}

impl InitialState {
    /// Build the density matrix for truncation size `n`.
    pub fn build(&self, n: usize) -> Result<Array2<Complex64>> {
        match self {
            InitialState::Ground => ground_state(n),
            InitialState::Fock { n: k } => fock_state(n, *k),
            InitialState::Thermal { nbar } => thermal_state(n, *nbar),
        }
    }
}

/// Fock projector |k⟩⟨k|.
pub fn fock_state(n: usize, k: usize) -> Result<Array2<Complex64>> {
    if k >= n {
        return Err(Error::InvalidConfiguration(format!(
            "Fock level {k} outside truncation of size {n}"
        )));
    }
    let mut rho = Array2::zeros((n, n));
    rho[[k, k]] = Complex64::new(1.0, 0.0);
    Ok(rho)
}

pub fn ground_state(n: usize) -> Result<Array2<Complex64>> {
    fock_state(n, 0)
}

/// Thermal state pₖ ∝ (n̄/(n̄+1))ᵏ over the retained levels, renormalized to unit trace.
pub fn thermal_state(n: usize, nbar: f64) -> Result<Array2<Complex64>> {
    if n == 0 {
        return Err(Error::InvalidConfiguration(
            "truncation size must be >= 1".into(),
        ));
    }
    if !nbar.is_finite() || nbar < 0.0 {
        return Err(Error::InvalidConfiguration(format!(
            "thermal occupation must be finite and >= 0, got {nbar}"
        )));
    }

    let ratio = nbar / (nbar + 1.0);
    let weights: Vec<f64> = (0..n).map(|k| ratio.powi(k as i32)).collect();
    let z: f64 = weights.iter().sum();

    let mut rho = Array2::zeros((n, n));
    for (k, w) in weights.iter().enumerate() {
        rho[[k, k]] = Complex64::new(w / z, 0.0);
    }
    Ok(rho)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analytics::{n_expectation, trace};
    use crate::operators::LadderOperators;
    use approx::assert_relative_eq;

    #[test]
    fn test_fock_state() {
        let rho = fock_state(4, 2).unwrap();
        assert_eq!(rho[[2, 2]], Complex64::new(1.0, 0.0));
        assert_relative_eq!(trace(&rho).re, 1.0);
    }

    #[test]
    fn test_fock_level_out_of_range() {
        assert!(matches!(
            fock_state(3, 3),
            Err(Error::InvalidConfiguration(_))
        ));
    }

    #[test]
    fn test_thermal_state_unit_trace() {
        let rho = thermal_state(5, 2.0).unwrap();
        assert_relative_eq!(trace(&rho).re, 1.0, epsilon = 1e-14);
    }

    #[test]
    fn test_thermal_mean_occupation_in_large_truncation() {
        let n = 60;
        let ops = LadderOperators::new(n).unwrap();
        let rho = thermal_state(n, 0.5).unwrap();
        assert_relative_eq!(n_expectation(&rho, &ops.number), 0.5, epsilon = 1e-12);
    }

    #[test]
    fn test_zero_occupation_is_ground() {
        assert_eq!(thermal_state(4, 0.0).unwrap(), ground_state(4).unwrap());
    }

    #[test]
    fn test_negative_occupation_rejected() {
        assert!(thermal_state(4, -0.1).is_err());
    }

    #[test]
    fn test_initial_state_from_yaml() {
        let s: InitialState = serde_yaml::from_str("kind: fock\nn: 3\n").unwrap();
        assert_eq!(s, InitialState::Fock { n: 3 });
        let s: InitialState = serde_yaml::from_str("kind: thermal\nnbar: 0.2\n").unwrap();
        assert_eq!(s, InitialState::Thermal { nbar: 0.2 });
        assert_eq!(s.build(3).unwrap().dim(), (3, 3));
    }
}
