//! statistical_tests::validation — shared input guards for diagnostics.
//!
//! Purpose
//! -------
//! Centralize the checks every residual statistic needs before touching the
//! data: a minimum length and finite values. Lag arguments are checked
//! separately because only the correlogram takes one.
//!
//! Conventions
//! -----------
//! - Pure validation; no allocation beyond error construction.
//! - The first offending element is reported.
use crate::statistical_tests::errors::{TestError, TestResult};

/// Require `data.len() ≥ min_len` and every element finite.
///
/// # Errors
/// - [`TestError::InsufficientData`] for a short series.
/// - [`TestError::InvalidData`] at the first `NaN`/`±∞`.
pub fn validate_series(data: &[f64], min_len: usize) -> TestResult<()> {
    if data.len() < min_len {
        return Err(TestError::InsufficientData { required: min_len, found: data.len() });
    }
    if let Some((index, &value)) = data.iter().enumerate().find(|(_, v)| !v.is_finite()) {
        return Err(TestError::InvalidData { index, value });
    }
    Ok(())
}

/// Require at least one lag.
///
/// # Errors
/// - [`TestError::InvalidLag`] when `lags == 0`.
pub fn validate_lags(lags: usize) -> TestResult<()> {
    if lags == 0 {
        return Err(TestError::InvalidLag { lags });
    }
    Ok(())
}
