// Copyright 2026 Unified Noise Contributors
// SPDX-License-Identifier: Apache-2.0

//! Physical model parameters.
//!
//! Only `omega`, `gamma` and `nbar_bath` enter the Liouvillian. The mass,
//! bath energy scale and jump-law fields are carried for jump-law-specific
//! superoperators, which are built outside this crate and installed through
//! [`crate::solver::MasterEquationSolver::install_jump`].

use std::collections::BTreeMap;
use std::f64::consts::PI;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Distribution family of the momentum kicks of the jump process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JumpLaw {
    #[default]
    Gauss,
    Laplace,
    Stable,
    Table,
    Langevin,
}

impl fmt::Display for JumpLaw {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            JumpLaw::Gauss => "gauss",
            JumpLaw::Laplace => "laplace",
            JumpLaw::Stable => "stable",
            JumpLaw::Table => "table",
            JumpLaw::Langevin => "langevin",
        };
        f.write_str(s)
    }
}

/// Model parameters for a single trapped mode.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelParams {
    /// Particle mass [kg]
    pub m: f64,
    /// Trap frequency [rad/s]
    pub omega: f64,
    /// Damping rate [1/s]
    pub gamma: f64,
    /// Effective bath energy scale kB·T [J]
    pub kbt_eff: f64,
    /// Poisson jump rate [1/s]
    pub lam: f64,
    /// Jump-law tag
    #[serde(default)]
    pub jump_law: JumpLaw,
    /// Jump-law parameters
    #[serde(default)]
    pub jump_pars: BTreeMap<String, f64>,
    /// Mean bath occupation n̄
    #[serde(default)]
    pub nbar_bath: f64,
}

impl Default for ModelParams {
    /// 40 amu ion in a 2 MHz trap, 5 kHz damping, room-temperature kB·T.
    fn default() -> Self {
        let mut jump_pars = BTreeMap::new();
        jump_pars.insert("sigma_p".to_string(), 1.0);
        Self {
            m: 6.64e-26,
            omega: 2.0 * PI * 2e6,
            gamma: 2.0 * PI * 5e3,
            kbt_eff: 4.1e-21,
            lam: 0.0,
            jump_law: JumpLaw::Gauss,
            jump_pars,
            nbar_bath: 0.05,
        }
    }
}

impl ModelParams {
    /// Validate the parameter record.
    pub fn validate(&self) -> Result<()> {
        let fields = [
            ("m", self.m),
            ("omega", self.omega),
            ("gamma", self.gamma),
            ("kbt_eff", self.kbt_eff),
            ("lam", self.lam),
            ("nbar_bath", self.nbar_bath),
        ];
        for (name, value) in fields {
            if !value.is_finite() {
                return Err(Error::InvalidConfiguration(format!(
                    "parameter '{name}' must be finite, got {value}"
                )));
            }
        }
        for (name, value) in &self.jump_pars {
            if !value.is_finite() {
                return Err(Error::InvalidConfiguration(format!(
                    "jump parameter '{name}' must be finite, got {value}"
                )));
            }
        }
        if self.gamma < 0.0 {
            return Err(Error::InvalidConfiguration(format!(
                "damping rate must be >= 0, got {}",
                self.gamma
            )));
        }
        if self.nbar_bath < 0.0 {
            return Err(Error::InvalidConfiguration(format!(
                "bath occupation must be >= 0, got {}",
                self.nbar_bath
            )));
        }
        if self.lam < 0.0 {
            return Err(Error::InvalidConfiguration(format!(
                "jump rate must be >= 0, got {}",
                self.lam
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_params_are_valid() {
        let p = ModelParams::default();
        assert!(p.validate().is_ok());
        assert_eq!(p.jump_law, JumpLaw::Gauss);
        assert_eq!(p.jump_pars.get("sigma_p"), Some(&1.0));
    }

    #[test]
    fn test_negative_gamma_rejected() {
        let p = ModelParams {
            gamma: -1.0,
            ..ModelParams::default()
        };
        let err = p.validate().unwrap_err();
        assert!(matches!(err, Error::InvalidConfiguration(_)));
        assert!(err.to_string().contains("damping rate"));
    }

    #[test]
    fn test_non_finite_rejected() {
        let p = ModelParams {
            omega: f64::NAN,
            ..ModelParams::default()
        };
        assert!(p.validate().is_err());

        let mut p = ModelParams::default();
        p.jump_pars.insert("alpha".into(), f64::INFINITY);
        assert!(p.validate().unwrap_err().to_string().contains("alpha"));
    }

    #[test]
    fn test_deserialize_with_defaults() {
        let yaml = r#"
m: 6.64e-26
omega: 1.0e7
gamma: 0.0
kbt_eff: 0.0
lam: 0.0
"#;
        let p: ModelParams = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(p.jump_law, JumpLaw::Gauss);
        assert!(p.jump_pars.is_empty());
        assert_eq!(p.nbar_bath, 0.0);
    }

    #[test]
    fn test_jump_law_tags() {
        let law: JumpLaw = serde_yaml::from_str("stable").unwrap();
        assert_eq!(law, JumpLaw::Stable);
        assert_eq!(JumpLaw::Langevin.to_string(), "langevin");
        assert!(serde_yaml::from_str::<JumpLaw>("cauchy").is_err());
    }
}
