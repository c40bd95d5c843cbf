//! Ordinary least-squares line used by regression on order statistics

use crate::{Error, Result};
use nalgebra::{DMatrix, DVector};

/// A fitted line `y = intercept + slope * x`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearFit {
    pub intercept: f64,
    pub slope: f64,
    /// Number of points used in the fit
    pub n: usize,
}

impl LinearFit {
    pub fn predict(&self, x: f64) -> f64 {
        self.intercept + self.slope * x
    }
}

/// Fit `y` against `x` by solving the normal equations `XᵀX β = Xᵀy`
///
/// Cholesky is tried first; rank-deficient systems fall back to SVD.
pub fn fit_line(x: &[f64], y: &[f64]) -> Result<LinearFit> {
    if x.len() != y.len() {
        return Err(Error::size_mismatch(x.len(), y.len(), "regression response"));
    }
    if x.len() < 2 {
        return Err(Error::insufficient_observed(2, x.len()));
    }
    if x.iter().chain(y).any(|v| !v.is_finite()) {
        return Err(Error::non_finite("regression input"));
    }

    let n = x.len();
    let design = DMatrix::from_fn(n, 2, |i, j| if j == 0 { 1.0 } else { x[i] });
    let response = DVector::from_column_slice(y);
    let xt = design.transpose();
    let xtx = &xt * &design;
    let xty = &xt * &response;

    let coeffs = match xtx.clone().cholesky() {
        Some(chol) => chol.solve(&xty),
        None => xtx
            .svd(true, true)
            .solve(&xty, 1e-10)
            .map_err(|e| Error::Computation(format!("Failed to solve regression system: {e}")))?,
    };

    let intercept = coeffs[0];
    let slope = coeffs[1];
    if !intercept.is_finite() || !slope.is_finite() {
        return Err(Error::non_finite("regression coefficients"));
    }

    Ok(LinearFit { intercept, slope, n })
}
