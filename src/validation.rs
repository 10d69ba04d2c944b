// Copyright 2026 Unified Noise Contributors
// SPDX-License-Identifier: Apache-2.0

//! Input validation for propagation requests.

use ndarray::Array2;
use num_complex::Complex64;

use crate::error::{Error, Result};

/// Validate that an initial density matrix is N×N.
pub fn validate_density_shape(rho: &Array2<Complex64>, n: usize) -> Result<()> {
    if rho.dim() != (n, n) {
        return Err(Error::ShapeMismatch {
            expected: (n, n),
            actual: rho.dim(),
        });
    }
    Ok(())
}

/// Validate a time grid: at least two finite, non-decreasing points.
pub fn validate_time_grid(t_grid: &[f64]) -> Result<()> {
    if t_grid.len() < 2 {
        return Err(Error::InvalidTimeGrid(format!(
            "need at least 2 time points, got {}",
            t_grid.len()
        )));
    }

    if let Some(i) = t_grid.iter().position(|t| !t.is_finite()) {
        return Err(Error::InvalidTimeGrid(format!(
            "t[{i}] = {} is not finite",
            t_grid[i]
        )));
    }

    for (i, w) in t_grid.windows(2).enumerate() {
        if w[1] < w[0] {
            return Err(Error::InvalidTimeGrid(format!(
                "must be non-decreasing: t[{}] = {:e} < t[{}] = {:e}",
                i + 1,
                w[1],
                i,
                w[0]
            )));
        }
    }

    Ok(())
}
