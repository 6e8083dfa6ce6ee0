//! Point-forecast accuracy metrics.
//!
//! For actual `y` and prediction `ŷ` over `n` periods:
//! ```text
//! MAE  = (1/n) Σ |y_t − ŷ_t|
//! MSE  = (1/n) Σ (y_t − ŷ_t)²
//! RMSE = √MSE
//! ```
use ndarray::ArrayView2;
use serde::Serialize;

use crate::dfm::errors::{DFMError, DFMResult};

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ErrorMetrics {
    pub mae: f64,
    pub mse: f64,
    pub rmse: f64,
}

impl ErrorMetrics {
    /// Metrics of one series; `None` for empty or mismatched input.
    pub fn from_errors<I>(errors: I) -> Option<Self>
    where
        I: IntoIterator<Item = f64>,
    {
        let (mut n, mut abs, mut sq) = (0usize, 0.0, 0.0);
        for e in errors {
            n += 1;
            abs += e.abs();
            sq += e * e;
        }
        if n == 0 {
            return None;
        }
        let mse = sq / n as f64;
        Some(Self { mae: abs / n as f64, mse, rmse: mse.sqrt() })
    }
}

/// Metrics for one variable.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VariableMetrics {
    pub variable: String,
    pub metrics: ErrorMetrics,
}

/// Per-variable metrics in model variable order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EvaluationResult {
    entries: Vec<VariableMetrics>,
}

impl EvaluationResult {
    /// Column-wise metrics of `actual − predicted`.
    ///
    /// # Errors
    /// - [`DFMError::InvalidArgument`] if the shapes differ, there are no
    ///   rows, or `columns` does not match the width.
    pub fn compute(
        columns: &[String], actual: ArrayView2<f64>, predicted: ArrayView2<f64>,
    ) -> DFMResult<Self> {
        if actual.dim() != predicted.dim() || actual.ncols() != columns.len() {
            return Err(DFMError::argument(
                "predicted",
                format!(
                    "shape {:?} does not match actual {:?} with {} columns",
                    predicted.dim(),
                    actual.dim(),
                    columns.len()
                ),
            ));
        }
        let entries = columns
            .iter()
            .zip(actual.columns().into_iter().zip(predicted.columns()))
            .map(|(name, (y, y_hat))| {
                let errors = y.iter().zip(y_hat.iter()).map(|(a, b)| a - b);
                ErrorMetrics::from_errors(errors)
                    .map(|metrics| VariableMetrics { variable: name.clone(), metrics })
                    .ok_or_else(|| DFMError::argument("actual", "no observations to evaluate"))
            })
            .collect::<DFMResult<Vec<_>>>()?;
        Ok(Self { entries })
    }

    pub fn entries(&self) -> &[VariableMetrics] {
        &self.entries
    }

    pub fn get(&self, variable: &str) -> Option<&ErrorMetrics> {
        self.entries.iter().find(|e| e.variable == variable).map(|e| &e.metrics)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use ndarray::array;

    #[test]
    // Purpose
    // -------
    // Metrics match hand computations and keep column order.
    //
    // Given
    // -----
    // - Errors (1, −3) for "a" and (0, 2) for "b".
    //
    // Expect
    // ------
    // - a: MAE 2, MSE 5, RMSE √5; b: MAE 1, MSE 2, RMSE √2.
    fn metrics_match_hand_computation() {
        // Arrange
        let cols = vec!["a".to_string(), "b".to_string()];
        let actual = array![[2.0, 1.0], [0.0, 5.0]];
        let predicted = array![[1.0, 1.0], [3.0, 3.0]];

        // Act
        let res = EvaluationResult::compute(&cols, actual.view(), predicted.view()).expect("ok");

        // Assert
        assert_eq!(res.entries()[0].variable, "a");
        let a = res.get("a").expect("present");
        let b = res.get("b").expect("present");
        assert_abs_diff_eq!(a.mae, 2.0, epsilon = 1e-12);
        assert_abs_diff_eq!(a.mse, 5.0, epsilon = 1e-12);
        assert_abs_diff_eq!(a.rmse, 5.0_f64.sqrt(), epsilon = 1e-12);
        assert_abs_diff_eq!(b.mae, 1.0, epsilon = 1e-12);
        assert_abs_diff_eq!(b.rmse * b.rmse, b.mse, epsilon = 1e-12);
        assert!(res.get("c").is_none());
    }

    #[test]
    // Purpose
    // -------
    // Mismatched shapes are rejected.
    //
    // Given
    // -----
    // - 2 × 2 actual against 1 × 2 predicted.
    //
    // Expect
    // ------
    // - `InvalidArgument`.
    fn mismatched_shapes_are_rejected() {
        let cols = vec!["a".to_string(), "b".to_string()];
        let actual = array![[2.0, 1.0], [0.0, 5.0]];
        let predicted = array![[1.0, 1.0]];

        let res = EvaluationResult::compute(&cols, actual.view(), predicted.view());

        assert!(matches!(res, Err(DFMError::InvalidArgument { .. })));
    }
}
