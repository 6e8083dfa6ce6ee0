//! Sample autocorrelation and partial autocorrelation functions.
//!
//! Purpose
//! -------
//! Compute the correlograms used to judge whether model residuals are
//! serially uncorrelated, together with the usual large-sample band.
//!
//! Key behaviors
//! -------------
//! - [`acf`] uses the biased autocovariance
//!   `γ̂_h = (1/n) Σ_{t=h}^{n−1} (y_t − ȳ)(y_{t−h} − ȳ)`, so the implied
//!   Toeplitz matrix is positive semi-definite, and `ρ̂_h = γ̂_h / γ̂_0`.
//! - [`pacf`] solves the Yule–Walker equations on those autocorrelations
//!   with the Levinson–Durbin recursion; `φ_hh` is the lag-`h` partial
//!   autocorrelation.
//! - Both report `±1.96/√n` as the approximate 95% band under white noise.
//!
//! Conventions
//! -----------
//! - `values[i]` is the coefficient at lag `i + 1`; lag 0 (always 1) is
//!   omitted.
//! - Requested lags beyond `n − 1` are clamped to `n − 1`.
use serde::Serialize;

use crate::statistical_tests::{
    errors::{TestError, TestResult},
    validation::{validate_lags, validate_series},
};

/// Half-width multiplier of the white-noise band.
const BAND_Z: f64 = 1.96;

/// Correlogram of one series.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Correlogram {
    /// Coefficients at lags `1..=values.len()`.
    pub values: Vec<f64>,
    /// `1.96 / √n`.
    pub band: f64,
}

impl Correlogram {
    /// Lags whose coefficient lies outside `±band`.
    pub fn significant_lags(&self) -> Vec<usize> {
        self.values
            .iter()
            .enumerate()
            .filter(|(_, v)| v.abs() > self.band)
            .map(|(i, _)| i + 1)
            .collect()
    }
}

/// Sample autocorrelations at lags `1..=min(lags, n − 1)`.
///
/// # Errors
/// - [`TestError::InvalidLag`] for `lags == 0`.
/// - [`TestError::InsufficientData`] / [`TestError::InvalidData`] from
///   validation (`n ≥ 2`, finite).
/// - [`TestError::ZeroVariance`] for a constant series.
pub fn acf(data: &[f64], lags: usize) -> TestResult<Correlogram> {
    validate_lags(lags)?;
    validate_series(data, 2)?;
    let lags = lags.min(data.len() - 1);
    let values = autocorrelations(data, lags)?;
    Ok(Correlogram { values, band: band(data.len()) })
}

/// Sample partial autocorrelations at lags `1..=min(lags, n − 1)`.
///
/// # Errors
/// Same as [`acf`].
pub fn pacf(data: &[f64], lags: usize) -> TestResult<Correlogram> {
    validate_lags(lags)?;
    validate_series(data, 2)?;
    let lags = lags.min(data.len() - 1);
    let rho = autocorrelations(data, lags)?;
    Ok(Correlogram { values: levinson_durbin(&rho), band: band(data.len()) })
}

// ---- Helper methods ----

fn band(n: usize) -> f64 {
    BAND_Z / (n as f64).sqrt()
}

#[inline]
fn calc_mean(data: &[f64]) -> f64 {
    data.iter().sum::<f64>() / data.len() as f64
}

/// Biased lag-`h` autocovariance.
#[inline]
fn calc_gamma_h(data: &[f64], h: usize, mean: f64) -> f64 {
    data[h..].iter().zip(data).map(|(y_t, y_lag)| (y_t - mean) * (y_lag - mean)).sum::<f64>()
        / data.len() as f64
}

fn autocorrelations(data: &[f64], lags: usize) -> TestResult<Vec<f64>> {
    let mean = calc_mean(data);
    let gamma_0 = calc_gamma_h(data, 0, mean);
    if gamma_0 <= 0.0 {
        return Err(TestError::ZeroVariance);
    }
    Ok((1..=lags).map(|h| calc_gamma_h(data, h, mean) / gamma_0).collect())
}

/// Partial autocorrelations `φ_11, φ_22, …` from `ρ_1, ρ_2, …`.
fn levinson_durbin(rho: &[f64]) -> Vec<f64> {
    let mut out = Vec::with_capacity(rho.len());
    let mut phi: Vec<f64> = Vec::with_capacity(rho.len());
    for k in 0..rho.len() {
        let num = rho[k] - (0..k).map(|j| phi[j] * rho[k - 1 - j]).sum::<f64>();
        let den = 1.0 - (0..k).map(|j| phi[j] * rho[j]).sum::<f64>();
        let phi_kk = if den.abs() > f64::EPSILON { num / den } else { 0.0 };
        let prev = phi.clone();
        for j in 0..k {
            phi[j] = prev[j] - phi_kk * prev[k - 1 - j];
        }
        phi.push(phi_kk);
        out.push(phi_kk);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - hand-computed autocorrelations of a short series,
    // - PACF of an AR(1)-shaped ACF cutting off after lag 1,
    // - lag clamping, band width and the error branches.
    // -------------------------------------------------------------------------

    #[test]
    // Purpose
    // -------
    // `acf` matches a hand computation with the biased estimator.
    //
    // Given
    // -----
    // - y = (1, 2, 3, 4), ȳ = 2.5, deviations (−1.5, −0.5, 0.5, 1.5).
    //
    // Expect
    // ------
    // - γ̂_0 = 5/4, γ̂_1 = 1.25/4, so ρ̂_1 = 0.25; ρ̂_2 = −1.5/5 = −0.3.
    fn acf_matches_hand_computation() {
        // Arrange
        let y = [1.0, 2.0, 3.0, 4.0];

        // Act
        let out = acf(&y, 2).expect("valid series");

        // Assert
        assert_abs_diff_eq!(out.values[0], 0.25, epsilon = 1e-12);
        assert_abs_diff_eq!(out.values[1], -0.3, epsilon = 1e-12);
        assert_abs_diff_eq!(out.band, 1.96 / 2.0, epsilon = 1e-12);
    }

    #[test]
    // Purpose
    // -------
    // Levinson–Durbin returns φ_11 = ρ_1 and zero beyond lag 1 for an
    // exactly geometric ACF.
    //
    // Given
    // -----
    // - ρ_h = 0.6^h for h = 1..4.
    //
    // Expect
    // ------
    // - PACF (0.6, 0, 0, 0).
    fn levinson_durbin_cuts_off_for_ar1_acf() {
        let rho: Vec<f64> = (1..=4).map(|h| 0.6_f64.powi(h)).collect();

        let phi = levinson_durbin(&rho);

        assert_abs_diff_eq!(phi[0], 0.6, epsilon = 1e-12);
        for v in &phi[1..] {
            assert_abs_diff_eq!(*v, 0.0, epsilon = 1e-12);
        }
    }

    #[test]
    // Purpose
    // -------
    // Requested lags are clamped to n − 1 and invalid inputs are rejected.
    //
    // Given
    // -----
    // - A 5-point series with 40 lags requested; lags = 0; a constant series.
    //
    // Expect
    // ------
    // - 4 coefficients; `InvalidLag`; `ZeroVariance`.
    fn lags_are_clamped_and_errors_surface() {
        let y = [0.3, -1.0, 0.8, 0.1, -0.4];

        let out = pacf(&y, 40).expect("valid series");

        assert_eq!(out.values.len(), 4);
        assert_eq!(acf(&y, 0), Err(TestError::InvalidLag { lags: 0 }));
        assert_eq!(acf(&[2.0, 2.0, 2.0], 1), Err(TestError::ZeroVariance));
    }
}
