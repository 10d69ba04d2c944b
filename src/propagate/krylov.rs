// Copyright 2026 Unified Noise Contributors
// SPDX-License-Identifier: Apache-2.0

//! Action of the matrix exponential exp(tA)·v through Arnoldi projection.
//!
//! The operator is only ever applied to vectors. Each sub-step builds an
//! m-dimensional Krylov basis Vₘ with Hessenberg matrix Hₘ and approximates
//!
//!   exp(τA) w ≈ β Vₘ exp(τHₘ) e₁,   β = ‖w‖.
//!
//! The small exponential is taken of the augmented matrix [[τHₘ, e₁], [0, 0]]
//! whose last column carries φ₁(τHₘ)e₁ for the a posteriori error estimate
//! β·h₍ₘ₊₁,ₘ₎·τ·|eₘᵀ φ₁(τHₘ) e₁|. Rejected sub-steps only recompute the
//! small exponential; the basis does not depend on τ.
//!
//! Ref: Saad (1992), SIAM J. Numer. Anal. 29(1), 209.
//! Ref: Sidje (1998), "Expokit", ACM Trans. Math. Softw. 24(1), 130.

use ndarray::{s, Array1, Array2};
use num_complex::Complex64;
use serde::{Deserialize, Serialize};
use tracing::warn;

use super::expm::matrix_exp;
use crate::error::{Error, Result};
use crate::liouvillian::LinearOperator;
use crate::vectorize::{inner, norm};

/// Relative size of h₍ⱼ₊₁,ⱼ₎ below which the Krylov space is invariant.
const BREAKDOWN_TOL: f64 = 1e-12;
/// Power iterations used for the ‖A‖₂ estimate.
const NORM_ITERATIONS: usize = 4;
/// Safety factor on step-size updates.
const SAFETY: f64 = 0.9;

/// Tuning of the Krylov exponential action.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KrylovOptions {
    /// Maximum Krylov subspace dimension m.
    #[serde(default = "default_dimension")]
    pub dimension: usize,
    /// Accepted local error per sub-step, relative to ‖w‖.
    #[serde(default = "default_tolerance")]
    pub tolerance: f64,
    /// Consecutive rejections after which a sub-step is accepted anyway.
    #[serde(default = "default_max_rejections")]
    pub max_rejections: usize,
}

impl Default for KrylovOptions {
    fn default() -> Self {
        Self {
            dimension: default_dimension(),
            tolerance: default_tolerance(),
            max_rejections: default_max_rejections(),
        }
    }
}

fn default_dimension() -> usize {
    30
}

fn default_tolerance() -> f64 {
    1e-10
}

fn default_max_rejections() -> usize {
    64
}

impl KrylovOptions {
    pub fn validate(&self) -> Result<()> {
        if self.dimension == 0 {
            return Err(Error::InvalidConfiguration(
                "Krylov dimension must be >= 1".into(),
            ));
        }
        if !(self.tolerance > 0.0 && self.tolerance < 1.0) {
            return Err(Error::InvalidConfiguration(format!(
                "Krylov tolerance must be in (0, 1), got {}",
                self.tolerance
            )));
        }
        Ok(())
    }
}

/// Work done by one call to [`expmv`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct KrylovStats {
    /// Accepted sub-steps.
    pub steps: usize,
    /// Rejected sub-step attempts.
    pub rejections: usize,
    /// Sub-steps finished by an invariant Krylov space.
    pub breakdowns: usize,
    /// Operator applications, including the norm estimate.
    pub matvecs: usize,
}

/// Compute exp(t·A)·v.
pub fn expmv(
    op: &dyn LinearOperator,
    t: f64,
    v: &Array1<Complex64>,
    opts: &KrylovOptions,
) -> Result<(Array1<Complex64>, KrylovStats)> {
    let dim = op.dim();
    if v.len() != dim {
        return Err(Error::vector_length(dim, v.len()));
    }
    if !t.is_finite() || t < 0.0 {
        return Err(Error::InvalidTimeGrid(format!(
            "exponential step must be finite and >= 0, got {t}"
        )));
    }

    let mut stats = KrylovStats::default();
    let mut w = v.clone();
    if t == 0.0 || dim == 0 {
        return Ok((w, stats));
    }

    let m = opts.dimension.min(dim).max(1);
    let mut anorm = norm_estimate(op, &mut stats)?;
    let mut next_tau: Option<f64> = None;
    let mut t_now = 0.0;

    while t_now < t {
        let beta = norm(&w);
        if beta == 0.0 {
            break;
        }
        let t_left = t - t_now;

        let arnoldi = arnoldi(op, &w, beta, m, &mut anorm, &mut stats)?;
        let mb = arnoldi.size;

        let mut tau = if arnoldi.breakdown {
            t_left
        } else {
            next_tau
                .unwrap_or_else(|| initial_step(anorm, m, opts.tolerance))
                .min(t_left)
        };

        let target = opts.tolerance * beta;
        let mut rejections = 0;
        let (f, err) = loop {
            let f = augmented_exp(&arnoldi.h, mb, tau)?;
            let err = if arnoldi.breakdown {
                0.0
            } else {
                beta * arnoldi.h_next * tau * f[[mb - 1, mb]].norm()
            };
            if err <= target {
                break (f, err);
            }
            if rejections >= opts.max_rejections {
                warn!(
                    tau,
                    err,
                    target,
                    rejections,
                    "Krylov step accepted above tolerance"
                );
                break (f, err);
            }
            rejections += 1;
            tau *= step_factor(target, err, m).clamp(0.1, SAFETY);
        };
        stats.rejections += rejections;

        let mut next = Array1::<Complex64>::zeros(dim);
        for (i, vi) in arnoldi.basis.iter().take(mb).enumerate() {
            next.scaled_add(f[[i, 0]] * beta, vi);
        }
        w = next;
        stats.steps += 1;
        if tau >= t_left {
            t_now = t;
        } else if t_now + tau == t_now {
            return Err(Error::Numerical(format!(
                "Krylov step size underflow at t = {t_now:e}"
            )));
        } else {
            t_now += tau;
        }

        if arnoldi.breakdown {
            stats.breakdowns += 1;
            // The remaining interval was covered in one exact step.
            break;
        }
        let grow = if err > 0.0 {
            step_factor(target, err, m).clamp(0.2, 2.0)
        } else {
            2.0
        };
        next_tau = Some(tau * grow);
    }

    Ok((w, stats))
}

struct Arnoldi {
    basis: Vec<Array1<Complex64>>,
    /// (m+1)×m Hessenberg matrix; only the leading `size`×`size` block is used.
    h: Array2<Complex64>,
    /// h₍ₘ₊₁,ₘ₎ when the process ran to full dimension.
    h_next: f64,
    size: usize,
    breakdown: bool,
}

/// Modified Gram–Schmidt Arnoldi started from w/β.
fn arnoldi(
    op: &dyn LinearOperator,
    w: &Array1<Complex64>,
    beta: f64,
    m: usize,
    anorm: &mut f64,
    stats: &mut KrylovStats,
) -> Result<Arnoldi> {
    let mut basis = Vec::with_capacity(m + 1);
    basis.push(w.mapv(|z| z / beta));
    let mut h = Array2::<Complex64>::zeros((m + 1, m));

    for j in 0..m {
        let mut p = op.apply(&basis[j])?;
        stats.matvecs += 1;
        *anorm = anorm.max(norm(&p));

        for (i, vi) in basis.iter().enumerate() {
            let hij = inner(vi, &p);
            h[[i, j]] = hij;
            p.scaled_add(-hij, vi);
        }

        let s = norm(&p);
        if !s.is_finite() {
            return Err(Error::Numerical(
                "non-finite vector in Krylov basis".into(),
            ));
        }
        if s <= BREAKDOWN_TOL * *anorm {
            return Ok(Arnoldi {
                basis,
                h,
                h_next: 0.0,
                size: j + 1,
                breakdown: true,
            });
        }
        h[[j + 1, j]] = Complex64::new(s, 0.0);
        basis.push(p.mapv(|z| z / s));
    }

    Ok(Arnoldi {
        basis,
        h_next: h[[m, m - 1]].re,
        h,
        size: m,
        breakdown: false,
    })
}

/// exp of [[τHₖ, e₁], [0, 0]], size (k+1)×(k+1).
fn augmented_exp(h: &Array2<Complex64>, k: usize, tau: f64) -> Result<Array2<Complex64>> {
    let mut a = Array2::<Complex64>::zeros((k + 1, k + 1));
    a.slice_mut(s![..k, ..k])
        .assign(&h.slice(s![..k, ..k]).mapv(|z| z * tau));
    a[[0, k]] = Complex64::new(1.0, 0.0);
    matrix_exp(&a)
}

/// Expokit's step-size update factor (target/err)^(1/m) with safety.
fn step_factor(target: f64, err: f64, m: usize) -> f64 {
    SAFETY * (target / err).powf(1.0 / m as f64)
}

/// Expokit's first step τ₀ = ((fact·tol)/4)^(1/m) / ‖A‖ with
/// fact = ((m+1)/e)^(m+1)·√(2π(m+1)), evaluated in logarithms.
fn initial_step(anorm: f64, m: usize, tol: f64) -> f64 {
    if anorm == 0.0 {
        return f64::INFINITY;
    }
    let mp1 = (m + 1) as f64;
    let ln_fact = mp1 * (mp1.ln() - 1.0) + 0.5 * (2.0 * std::f64::consts::PI * mp1).ln();
    let ln_tau = (ln_fact + tol.ln() - 4.0_f64.ln()) / m as f64 - anorm.ln();
    ln_tau.exp()
}

/// Estimate ‖A‖₂ by power iteration on A†A.
///
/// Returns a lower bound that is typically within a small factor of the true
/// norm after a few iterations.
pub fn norm_estimate(op: &dyn LinearOperator, stats: &mut KrylovStats) -> Result<f64> {
    let dim = op.dim();
    if dim == 0 {
        return Ok(0.0);
    }
    // Deterministic start vector with no special symmetry.
    let mut x: Array1<Complex64> = (0..dim)
        .map(|i| {
            let u = i as f64 / dim as f64;
            Complex64::new(1.0 + u, 0.5 - u * u)
        })
        .collect();
    let nx = norm(&x);
    x.mapv_inplace(|z| z / nx);

    let mut estimate = 0.0_f64;
    for _ in 0..NORM_ITERATIONS {
        let ax = op.apply(&x)?;
        let z = op.apply_adjoint(&ax)?;
        stats.matvecs += 2;

        estimate = estimate.max(norm(&ax));
        let nz = norm(&z);
        if nz == 0.0 || !nz.is_finite() {
            break;
        }
        estimate = estimate.max(nz.sqrt());
        x = z.mapv(|c| c / nz);
    }
    Ok(estimate)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{random_matrix, random_vector};

    /// Dense matrix wrapped as a linear operator.
    struct Dense(Array2<Complex64>);

    impl LinearOperator for Dense {
        fn dim(&self) -> usize {
            self.0.nrows()
        }

        fn apply(&self, y: &Array1<Complex64>) -> Result<Array1<Complex64>> {
            Ok(self.0.dot(y))
        }

        fn apply_adjoint(&self, y: &Array1<Complex64>) -> Result<Array1<Complex64>> {
            Ok(self.0.t().mapv(|z| z.conj()).dot(y))
        }
    }

    fn max_diff(a: &Array1<Complex64>, b: &Array1<Complex64>) -> f64 {
        a.iter()
            .zip(b.iter())
            .map(|(x, y)| (x - y).norm())
            .fold(0.0, f64::max)
    }

    #[test]
    fn test_matches_dense_exponential() {
        let a = random_matrix(12, 3);
        let v = random_vector(12, 4);
        let t = 0.7;
        let dense = matrix_exp(&a.mapv(|z| z * t)).unwrap().dot(&v);

        let opts = KrylovOptions {
            dimension: 6,
            tolerance: 1e-12,
            ..KrylovOptions::default()
        };
        let (w, stats) = expmv(&Dense(a), t, &v, &opts).unwrap();
        assert!(max_diff(&w, &dense) < 1e-9, "diff = {}", max_diff(&w, &dense));
        assert!(stats.steps >= 1);
    }

    #[test]
    fn test_full_dimension_is_exact_via_breakdown() {
        let a = random_matrix(5, 9);
        let v = random_vector(5, 10);
        let dense = matrix_exp(&a.mapv(|z| z * 2.0)).unwrap().dot(&v);
        let (w, _) = expmv(&Dense(a), 2.0, &v, &KrylovOptions::default()).unwrap();
        assert!(max_diff(&w, &dense) < 1e-8);
    }

    #[test]
    fn test_large_norm_skew_hermitian_needs_substeps() {
        // A = −iω·diag(0..d−1), exp(tA)v is a pure phase rotation.
        let d = 16;
        let omega = 1.2e7;
        let mut a = Array2::<Complex64>::zeros((d, d));
        for k in 0..d {
            a[[k, k]] = Complex64::new(0.0, -omega * k as f64);
        }
        let v = random_vector(d, 21);
        let t = 1e-6;
        let opts = KrylovOptions {
            dimension: 8,
            ..KrylovOptions::default()
        };
        let (w, stats) = expmv(&Dense(a), t, &v, &opts).unwrap();
        for k in 0..d {
            let expected = v[k] * Complex64::new(0.0, -omega * k as f64 * t).exp();
            assert!((w[k] - expected).norm() < 1e-6, "component {k}");
        }
        assert!(stats.steps > 1, "expected sub-stepping, got {stats:?}");
    }

    #[test]
    fn test_zero_operator_leaves_vector() {
        let a = Array2::<Complex64>::zeros((4, 4));
        let v = random_vector(4, 1);
        let (w, stats) = expmv(&Dense(a), 3.0, &v, &KrylovOptions::default()).unwrap();
        assert!(max_diff(&w, &v) < 1e-14);
        assert_eq!(stats.breakdowns, 1);
    }

    #[test]
    fn test_zero_time_is_identity() {
        let a = random_matrix(4, 2);
        let v = random_vector(4, 3);
        let (w, stats) = expmv(&Dense(a), 0.0, &v, &KrylovOptions::default()).unwrap();
        assert_eq!(w, v);
        assert_eq!(stats.matvecs, 0);
    }

    #[test]
    fn test_zero_vector_stays_zero() {
        let a = random_matrix(4, 2);
        let v = Array1::<Complex64>::zeros(4);
        let (w, _) = expmv(&Dense(a), 1.0, &v, &KrylovOptions::default()).unwrap();
        assert!(w.iter().all(|z| z.norm() == 0.0));
    }

    #[test]
    fn test_rejects_wrong_length_and_negative_time() {
        let a = Dense(random_matrix(3, 2));
        let opts = KrylovOptions::default();
        assert!(matches!(
            expmv(&a, 1.0, &Array1::zeros(4), &opts),
            Err(Error::ShapeMismatch { .. })
        ));
        assert!(matches!(
            expmv(&a, -1.0, &Array1::zeros(3), &opts),
            Err(Error::InvalidTimeGrid(_))
        ));
    }

    #[test]
    fn test_norm_estimate_of_diagonal() {
        let mut a = Array2::<Complex64>::zeros((3, 3));
        a[[0, 0]] = Complex64::new(1.0, 0.0);
        a[[1, 1]] = Complex64::new(0.0, -5.0);
        a[[2, 2]] = Complex64::new(2.0, 0.0);
        let mut stats = KrylovStats::default();
        let est = norm_estimate(&Dense(a), &mut stats).unwrap();
        assert!(est <= 5.0 + 1e-12);
        assert!(est > 4.0, "estimate {est}");
        assert_eq!(stats.matvecs, 2 * NORM_ITERATIONS);
    }

    #[test]
    fn test_options_validation() {
        assert!(KrylovOptions::default().validate().is_ok());
        let bad = KrylovOptions {
            dimension: 0,
            ..KrylovOptions::default()
        };
        assert!(bad.validate().is_err());
        let bad = KrylovOptions {
            tolerance: 0.0,
            ..KrylovOptions::default()
        };
        assert!(bad.validate().is_err());
    }

    #[test]
    fn test_initial_step_scales_inversely_with_norm() {
        let t1 = initial_step(1.0, 30, 1e-10);
        let t2 = initial_step(1e8, 30, 1e-10);
        assert!((t1 / t2 - 1e8).abs() / 1e8 < 1e-9);
        assert!(initial_step(0.0, 30, 1e-10).is_infinite());
    }
}
