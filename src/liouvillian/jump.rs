// Copyright 2026 Unified Noise Contributors
// SPDX-License-Identifier: Apache-2.0

//! Extension point for an externally supplied jump superoperator.
//!
//! A jump law (Poisson kicks averaged over a momentum-transfer distribution,
//! Lévy flights, tabulated kernels, …) is built elsewhere and handed to the
//! solver as a pair of closures acting on vec(ρ). The adjoint is mandatory:
//! the propagator estimates the generator norm through A†A.

use std::fmt;
use std::sync::Arc;

use ndarray::Array1;
use num_complex::Complex64;

use crate::error::{Error, Result};

/// Action of a superoperator on a vectorized density matrix.
pub type SuperopFn = Arc<dyn Fn(&Array1<Complex64>) -> Array1<Complex64> + Send + Sync>;

/// Forward and adjoint action of a jump superoperator.
#[derive(Clone)]
pub struct JumpTerm {
    forward: SuperopFn,
    adjoint: SuperopFn,
}

impl fmt::Debug for JumpTerm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "JumpTerm {{ forward: Fn(..), adjoint: Fn(..) }}")
    }
}

impl JumpTerm {
    pub fn new(forward: SuperopFn, adjoint: SuperopFn) -> Self {
        Self { forward, adjoint }
    }

    /// Build from closures without wrapping them in `Arc` first.
    pub fn from_fns<F, G>(forward: F, adjoint: G) -> Self
    where
        F: Fn(&Array1<Complex64>) -> Array1<Complex64> + Send + Sync + 'static,
        G: Fn(&Array1<Complex64>) -> Array1<Complex64> + Send + Sync + 'static,
    {
        Self::new(Arc::new(forward), Arc::new(adjoint))
    }

    /// The zero superoperator. Installing it leaves the dynamics unchanged.
    pub fn zero() -> Self {
        Self::from_fns(|y| Array1::zeros(y.len()), |y| Array1::zeros(y.len()))
    }

    /// Apply the install contract to an optional pair.
    ///
    /// No forward action clears the term, a forward action without its
    /// adjoint is rejected, and a complete pair yields a new term.
    pub fn from_pair(
        matvec: Option<SuperopFn>,
        rmatvec: Option<SuperopFn>,
    ) -> Result<Option<Self>> {
        match (matvec, rmatvec) {
            (None, _) => Ok(None),
            (Some(_), None) => Err(Error::InvalidConfiguration(
                "jump superoperator requires both forward and adjoint actions".into(),
            )),
            (Some(forward), Some(adjoint)) => Ok(Some(Self::new(forward, adjoint))),
        }
    }

    /// Forward action, checked against the expected vector length.
    pub fn forward(&self, y: &Array1<Complex64>) -> Result<Array1<Complex64>> {
        checked(&self.forward, y)
    }

    /// Adjoint action, checked against the expected vector length.
    pub fn adjoint(&self, y: &Array1<Complex64>) -> Result<Array1<Complex64>> {
        checked(&self.adjoint, y)
    }
}

fn checked(f: &SuperopFn, y: &Array1<Complex64>) -> Result<Array1<Complex64>> {
    let out = f(y);
    if out.len() != y.len() {
        return Err(Error::vector_length(y.len(), out.len()));
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scale(c: f64) -> SuperopFn {
        Arc::new(move |y: &Array1<Complex64>| y.mapv(|z| z * c))
    }

    #[test]
    fn test_pair_with_forward_only_rejected() {
        let result = JumpTerm::from_pair(Some(scale(1.0)), None);
        assert!(matches!(result, Err(Error::InvalidConfiguration(_))));
    }

    #[test]
    fn test_missing_forward_clears() {
        assert!(JumpTerm::from_pair(None, None).unwrap().is_none());
        assert!(JumpTerm::from_pair(None, Some(scale(1.0))).unwrap().is_none());
    }

    #[test]
    fn test_complete_pair_installs() {
        let term = JumpTerm::from_pair(Some(scale(2.0)), Some(scale(2.0)))
            .unwrap()
            .unwrap();
        let y = Array1::from_elem(4, Complex64::new(1.0, -1.0));
        assert_eq!(term.forward(&y).unwrap()[0], Complex64::new(2.0, -2.0));
    }

    #[test]
    fn test_zero_term() {
        let term = JumpTerm::zero();
        let y = Array1::from_elem(9, Complex64::new(3.0, 0.0));
        assert!(term.forward(&y).unwrap().iter().all(|z| z.norm() == 0.0));
        assert!(term.adjoint(&y).unwrap().iter().all(|z| z.norm() == 0.0));
    }

    #[test]
    fn test_wrong_output_length_rejected() {
        let term = JumpTerm::from_fns(|_| Array1::zeros(3), |y| y.clone());
        let y = Array1::zeros(4);
        assert!(matches!(
            term.forward(&y),
            Err(Error::ShapeMismatch { .. })
        ));
        assert!(term.adjoint(&y).is_ok());
    }
}
