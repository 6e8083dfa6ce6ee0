//! Jarque–Bera normality test.
//!
//! With central moments `m_j = (1/n) Σ (y_t − ȳ)^j`:
//! ```text
//! S  = m_3 / m_2^{3/2}          K = m_4 / m_2²
//! JB = n/6 · (S² + (K − 3)² / 4)  ~  χ²(2) under normality
//! ```
//! `K` is reported as plain (not excess) kurtosis.
use serde::Serialize;
use statrs::distribution::{ChiSquared, ContinuousCDF};

use crate::statistical_tests::{
    errors::{TestError, TestResult},
    validation::validate_series,
};

/// Outcome of a Jarque–Bera test on one series.
#[derive(Debug, Copy, Clone, PartialEq, Serialize)]
pub struct JarqueBeraOutcome {
    pub statistic: f64,
    /// Upper-tail χ²(2) probability of `statistic`.
    pub p_value: f64,
    pub skewness: f64,
    pub kurtosis: f64,
}

impl JarqueBeraOutcome {
    /// Run the test on `data`.
    ///
    /// # Errors
    /// - [`TestError::InsufficientData`] for fewer than 3 observations.
    /// - [`TestError::InvalidData`] for non-finite values.
    /// - [`TestError::ZeroVariance`] for a constant series.
    pub fn jarque_bera(data: &[f64]) -> TestResult<Self> {
        validate_series(data, 3)?;
        let n = data.len() as f64;
        let mean = data.iter().sum::<f64>() / n;
        let (m2, m3, m4) = data.iter().fold((0.0, 0.0, 0.0), |(m2, m3, m4), &y| {
            let d = y - mean;
            let d2 = d * d;
            (m2 + d2, m3 + d2 * d, m4 + d2 * d2)
        });
        let (m2, m3, m4) = (m2 / n, m3 / n, m4 / n);
        if m2 <= 0.0 {
            return Err(TestError::ZeroVariance);
        }
        let skewness = m3 / m2.powf(1.5);
        let kurtosis = m4 / (m2 * m2);
        let statistic = n / 6.0 * (skewness.powi(2) + (kurtosis - 3.0).powi(2) / 4.0);
        let chi2 = ChiSquared::new(2.0)
            .map_err(|e| TestError::Distribution { reason: e.to_string() })?;
        Ok(Self { statistic, p_value: chi2.sf(statistic), skewness, kurtosis })
    }
}
