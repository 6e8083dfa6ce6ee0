//! Goodness-of-fit summaries.
use serde::Serialize;

/// Likelihood-based information criteria (smaller is better).
///
/// ```text
/// AIC  = 2k − 2ℓ
/// BIC  = k ln n − 2ℓ
/// HQIC = 2k ln ln n − 2ℓ
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct InformationCriteria {
    pub aic: f64,
    pub bic: f64,
    pub hqic: f64,
}

impl InformationCriteria {
    pub fn new(loglik: f64, n_params: usize, nobs: usize) -> Self {
        let k = n_params as f64;
        let n = nobs as f64;
        Self {
            aic: 2.0 * k - 2.0 * loglik,
            bic: k * n.ln() - 2.0 * loglik,
            hqic: 2.0 * k * n.ln().ln() - 2.0 * loglik,
        }
    }
}

/// Summary of a fitted dynamic factor model.
///
/// `loglik` is the exact Gaussian log-likelihood of the working
/// (standardized) panel at the estimate; `n_params` counts free parameters.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FitSummary {
    pub loglik: f64,
    pub aic: f64,
    pub bic: f64,
    pub hqic: f64,
    pub nobs: usize,
    pub n_params: usize,
    pub iterations: usize,
    pub status: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    // Purpose
    // -------
    // Criteria follow their textbook formulas.
    //
    // Given
    // -----
    // - ℓ = −100, k = 5, n = 50.
    //
    // Expect
    // ------
    // - AIC = 210, BIC = 200 + 5 ln 50, HQIC = 200 + 10 ln ln 50.
    fn criteria_match_formulas() {
        let ic = InformationCriteria::new(-100.0, 5, 50);

        assert_abs_diff_eq!(ic.aic, 210.0, epsilon = 1e-12);
        assert_abs_diff_eq!(ic.bic, 200.0 + 5.0 * 50.0_f64.ln(), epsilon = 1e-12);
        assert_abs_diff_eq!(ic.hqic, 200.0 + 10.0 * 50.0_f64.ln().ln(), epsilon = 1e-12);
    }
}
