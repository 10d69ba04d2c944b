// Copyright 2026 Unified Noise Contributors
// SPDX-License-Identifier: Apache-2.0

//! Unified Noise master-equation engine
//!
//! This crate evolves the density matrix of a single truncated bosonic mode
//! coupled to a thermal bath, with an optional externally supplied jump
//! superoperator, using a matrix-free Krylov exponential action.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │          MasterEquationSolver           │
//! ├──────────────────┬──────────────────────┤
//! │   Liouvillian    │   Propagator         │
//! │   (snapshot)     │   (Krylov expmv)     │
//! ├──────────────────┴──────────────────────┤
//! │  Ladder operators · Hamiltonian · vec   │
//! └─────────────────────────────────────────┘
//! ```
//!
//! # Modules
//!
//! - [`solver`]: Solver owning the generator snapshot
//! - [`liouvillian`]: Generator, dissipators, jump extension point
//! - [`propagate`]: Krylov exponential action and the time-grid fold
//! - [`operators`]: Ladder operators and Hamiltonian
//! - [`vectorize`]: Column-major vec / unvec
//! - [`params`]: Model parameters
//! - [`analytics`]: Trace, ⟨n⟩, purity
//! - [`states`]: Fock, ground, thermal states
//! - [`config`]: Configuration management
//! - [`validation`]: Input validation utilities
//! - [`error`]: Error types

pub mod analytics;
pub mod config;
pub mod error;
pub mod liouvillian;
pub mod operators;
pub mod params;
pub mod propagate;
pub mod solver;
pub mod states;
pub mod validation;
pub mod vectorize;

pub use config::Config;
pub use error::{Error, Result};
pub use liouvillian::{JumpTerm, LinearOperator, Liouvillian, SuperopFn};
pub use params::{JumpLaw, ModelParams};
pub use solver::MasterEquationSolver;

#[cfg(test)]
pub mod test_utils;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
