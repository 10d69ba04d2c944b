// Copyright 2026 Unified Noise Contributors
// SPDX-License-Identifier: Apache-2.0

//! Dense matrix exponential via scaling-and-squaring with Padé approximants.
//!
//! Used only on the small projected matrices of the Krylov method, so the
//! implementation favors simplicity over BLAS throughput. The Padé degree is
//! chosen from {3, 5, 7, 9, 13} by the 1-norm, and scaling by 2⁻ˢ is applied
//! only for degree 13.
//!
//! Ref: Higham (2005), "The Scaling and Squaring Method for the Matrix
//! Exponential Revisited", SIAM J. Matrix Anal. Appl. 26(4), 1179.

use ndarray::Array2;
use num_complex::Complex64;

use crate::error::{Error, Result};

/// Padé(3) … Padé(9) numerator coefficients b₀ … bₘ and the 1-norm bound θₘ
/// below which that degree reaches unit roundoff (Higham 2005, Table 2.3).
const LOW_DEGREES: [(&[f64], f64); 4] = [
    (&[120.0, 60.0, 12.0, 1.0], 1.495_585_217_958_292e-2),
    (
        &[30240.0, 15120.0, 3360.0, 420.0, 30.0, 1.0],
        2.539_398_330_063_230e-1,
    ),
    (
        &[
            17_297_280.0,
            8_648_640.0,
            1_995_840.0,
            277_200.0,
            25_200.0,
            1512.0,
            56.0,
            1.0,
        ],
        9.504_178_996_162_932e-1,
    ),
    (
        &[
            17_643_225_600.0,
            8_821_612_800.0,
            2_075_673_600.0,
            302_702_400.0,
            30_270_240.0,
            2_162_160.0,
            110_880.0,
            3960.0,
            90.0,
            1.0,
        ],
        2.097_847_961_257_068,
    ),
];

const PADE13: [f64; 14] = [
    64_764_752_532_480_000.0,
    32_382_376_266_240_000.0,
    7_771_770_303_897_600.0,
    1_187_353_796_428_800.0,
    129_060_195_264_000.0,
    10_559_470_521_600.0,
    670_442_572_800.0,
    33_522_128_640.0,
    1_323_241_920.0,
    40_840_800.0,
    960_960.0,
    16_380.0,
    182.0,
    1.0,
];

const THETA13: f64 = 5.371_920_351_148_152;

/// Compute exp(A) for a square complex matrix.
pub fn matrix_exp(a: &Array2<Complex64>) -> Result<Array2<Complex64>> {
    let n = a.nrows();
    if n != a.ncols() {
        return Err(Error::ShapeMismatch {
            expected: (n, n),
            actual: a.dim(),
        });
    }
    if n == 0 {
        return Ok(Array2::zeros((0, 0)));
    }
    if n == 1 {
        let mut out = Array2::zeros((1, 1));
        out[[0, 0]] = a[[0, 0]].exp();
        return Ok(out);
    }

    let norm = one_norm(a);
    if !norm.is_finite() {
        return Err(Error::Numerical(
            "matrix exponential of a non-finite matrix".into(),
        ));
    }

    for (coeffs, theta) in LOW_DEGREES {
        if norm <= theta {
            let (u, v) = pade_low(a, coeffs);
            return solve(&v - &u, &v + &u);
        }
    }

    let s = if norm > THETA13 {
        (norm / THETA13).log2().ceil() as i32
    } else {
        0
    };
    let scaled = a * c(0.5_f64.powi(s));
    let (u, v) = pade13(&scaled);
    let r = solve(&v - &u, &v + &u)?;
    Ok(square_repeatedly(r, s))
}

#[inline]
fn c(x: f64) -> Complex64 {
    Complex64::new(x, 0.0)
}

/// Odd part U and even part V of a low-degree Padé numerator.
fn pade_low(a: &Array2<Complex64>, b: &[f64]) -> (Array2<Complex64>, Array2<Complex64>) {
    let n = a.nrows();
    let a2 = a.dot(a);
    let mut power = Array2::<Complex64>::eye(n);
    let mut u_inner = Array2::<Complex64>::zeros((n, n));
    let mut v = Array2::<Complex64>::zeros((n, n));
    // b has an even number of entries: pairs (b_{2j}, b_{2j+1}) share A^{2j}
    for pair in b.chunks(2) {
        v = v + &power * c(pair[0]);
        if let Some(&odd) = pair.get(1) {
            u_inner = u_inner + &power * c(odd);
        }
        power = power.dot(&a2);
    }
    (a.dot(&u_inner), v)
}

fn pade13(a: &Array2<Complex64>) -> (Array2<Complex64>, Array2<Complex64>) {
    let b = &PADE13;
    let eye = Array2::<Complex64>::eye(a.nrows());
    let a2 = a.dot(a);
    let a4 = a2.dot(&a2);
    let a6 = a2.dot(&a4);

    let u_hi = &a6 * c(b[13]) + &a4 * c(b[11]) + &a2 * c(b[9]);
    let u_inner = a6.dot(&u_hi)
        + &a6 * c(b[7])
        + &a4 * c(b[5])
        + &a2 * c(b[3])
        + &eye * c(b[1]);
    let u = a.dot(&u_inner);

    let v_hi = &a6 * c(b[12]) + &a4 * c(b[10]) + &a2 * c(b[8]);
    let v = a6.dot(&v_hi) + &a6 * c(b[6]) + &a4 * c(b[4]) + &a2 * c(b[2]) + &eye * c(b[0]);
    (u, v)
}

/// Solve A·X = B by Gaussian elimination with partial pivoting.
fn solve(mut a: Array2<Complex64>, mut b: Array2<Complex64>) -> Result<Array2<Complex64>> {
    let n = a.nrows();
    let m = b.ncols();

    for col in 0..n {
        let pivot_row = (col..n)
            .max_by(|&i, &j| a[[i, col]].norm().total_cmp(&a[[j, col]].norm()))
            .unwrap_or(col);
        if pivot_row != col {
            for j in 0..n {
                a.swap([col, j], [pivot_row, j]);
            }
            for j in 0..m {
                b.swap([col, j], [pivot_row, j]);
            }
        }

        let pivot = a[[col, col]];
        if pivot.norm() == 0.0 || !pivot.is_finite() {
            return Err(Error::Numerical(
                "singular Padé denominator in matrix exponential".into(),
            ));
        }

        for row in (col + 1)..n {
            let factor = a[[row, col]] / pivot;
            if factor.norm() == 0.0 {
                continue;
            }
            for j in col..n {
                let v = a[[col, j]];
                a[[row, j]] -= factor * v;
            }
            for j in 0..m {
                let v = b[[col, j]];
                b[[row, j]] -= factor * v;
            }
        }
    }

    let mut x = Array2::<Complex64>::zeros((n, m));
    for row in (0..n).rev() {
        for j in 0..m {
            let mut sum = b[[row, j]];
            for k in (row + 1)..n {
                sum -= a[[row, k]] * x[[k, j]];
            }
            x[[row, j]] = sum / a[[row, row]];
        }
    }
    Ok(x)
}

fn square_repeatedly(mut m: Array2<Complex64>, s: i32) -> Array2<Complex64> {
    for _ in 0..s {
        m = m.dot(&m);
    }
    m
}

/// Max column sum of absolute values.
pub(crate) fn one_norm(a: &Array2<Complex64>) -> f64 {
    a.columns()
        .into_iter()
        .map(|col| col.iter().map(|z| z.norm()).sum::<f64>())
        .fold(0.0, f64::max)
}
