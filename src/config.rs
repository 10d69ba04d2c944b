// Copyright 2026 Unified Noise Contributors
// SPDX-License-Identifier: Apache-2.0

//! Configuration for evolution runs.
//!
//! Configuration is loaded from multiple sources with the following priority
//! (later sources override earlier ones):
//!
//! 1. Built-in defaults
//! 2. unoise.yaml file
//! 3. Environment variables (UNOISE_*)
//! 4. CLI arguments

use serde::{Deserialize, Serialize};
use std::env;
use std::path::Path;

use crate::error::{Error, Result};
use crate::params::ModelParams;
use crate::propagate::{KrylovOptions, PropagatorOptions};
use crate::states::InitialState;

/// Main configuration structure.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Physical model parameters
    #[serde(default)]
    pub model: ModelParams,

    /// Solver settings
    #[serde(default)]
    pub solver: SolverConfig,

    /// Output time grid
    #[serde(default)]
    pub grid: GridConfig,

    /// Initial density matrix
    #[serde(default)]
    pub initial_state: InitialState,

    /// Logging settings
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from file and environment.
    pub fn load(config_path: Option<&Path>) -> Result<Self> {
        let mut config = Config::default();

        if let Some(path) = config_path {
            if !path.exists() {
                return Err(Error::Config(format!(
                    "config file not found: {}",
                    path.display()
                )));
            }
            config = Self::from_file(path)?;
        } else {
            for path in &["unoise.yaml", "unoise.yml"] {
                let path = Path::new(path);
                if path.exists() {
                    config = Self::from_file(path)?;
                    break;
                }
            }
        }

        config.apply_env_overrides();

        Ok(config)
    }

    fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config = serde_yaml::from_str(&content)?;
        tracing::debug!(path = %path.display(), "loaded configuration file");
        Ok(config)
    }

    /// Apply environment variable overrides.
    fn apply_env_overrides(&mut self) {
        if let Ok(val) = env::var("UNOISE_TRUNCATION") {
            if let Ok(n) = val.parse() {
                self.solver.truncation = n;
            }
        }
        if let Ok(val) = env::var("UNOISE_KRYLOV_DIM") {
            if let Ok(m) = val.parse() {
                self.solver.krylov.dimension = m;
            }
        }
        if let Ok(val) = env::var("UNOISE_KRYLOV_TOL") {
            if let Ok(tol) = val.parse() {
                self.solver.krylov.tolerance = tol;
            }
        }
        if let Ok(val) = env::var("UNOISE_NBAR") {
            if let Ok(nbar) = val.parse() {
                self.model.nbar_bath = nbar;
            }
        }
        if let Ok(val) = env::var("UNOISE_GAMMA") {
            if let Ok(gamma) = val.parse() {
                self.model.gamma = gamma;
            }
        }
        if let Ok(val) = env::var("UNOISE_LOG_LEVEL") {
            self.logging.level = val;
        }
    }

    /// Validate configuration.
    pub fn validate(&self) -> Result<()> {
        if self.solver.truncation == 0 {
            return Err(Error::Config("truncation must be > 0".into()));
        }
        self.model.validate()?;
        self.solver.propagator_options().validate()?;
        self.grid.validate()?;
        self.initial_state.build(self.solver.truncation)?;

        if self.model.lam > 0.0 {
            tracing::warn!(
                lam = self.model.lam,
                "jump rate is set but the CLI installs no jump superoperator; \
                 evolution is Gaussian"
            );
        }
        Ok(())
    }
}

/// Solver configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SolverConfig {
    /// Fock-space truncation size N
    #[serde(default = "default_truncation")]
    pub truncation: usize,

    /// Krylov exponential-action settings
    #[serde(default)]
    pub krylov: KrylovOptions,

    /// Warn when the top Fock level population exceeds this value
    #[serde(default)]
    pub leakage_threshold: Option<f64>,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            truncation: default_truncation(),
            krylov: KrylovOptions::default(),
            leakage_threshold: None,
        }
    }
}

impl SolverConfig {
    pub fn propagator_options(&self) -> PropagatorOptions {
        PropagatorOptions {
            krylov: self.krylov.clone(),
            leakage_threshold: self.leakage_threshold,
        }
    }
}

fn default_truncation() -> usize {
    10
}

/// Uniform output grid from `start` to `stop` in `steps` intervals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GridConfig {
    /// First time point [s]
    #[serde(default)]
    pub start: f64,

    /// Last time point [s]
    #[serde(default = "default_stop")]
    pub stop: f64,

    /// Number of intervals
    #[serde(default = "default_steps")]
    pub steps: usize,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            start: 0.0,
            stop: default_stop(),
            steps: default_steps(),
        }
    }
}

impl GridConfig {
    /// Time points t₀ … t_steps.
    pub fn points(&self) -> Vec<f64> {
        let dt = (self.stop - self.start) / self.steps as f64;
        (0..=self.steps)
            .map(|i| {
                if i == self.steps {
                    self.stop
                } else {
                    self.start + dt * i as f64
                }
            })
            .collect()
    }

    pub fn validate(&self) -> Result<()> {
        if self.steps == 0 {
            return Err(Error::Config("grid steps must be > 0".into()));
        }
        if !self.start.is_finite() || !self.stop.is_finite() {
            return Err(Error::Config("grid bounds must be finite".into()));
        }
        if self.stop < self.start {
            return Err(Error::Config(format!(
                "grid stop {:e} is before start {:e}",
                self.stop, self.start
            )));
        }
        Ok(())
    }
}

fn default_stop() -> f64 {
    2e-6
}

fn default_steps() -> usize {
    2
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".into()
}
