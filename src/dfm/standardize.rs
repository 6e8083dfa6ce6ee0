//! Per-series standardization moments.
//!
//! The estimator works on `z_ti = (x_ti − μ_i) / s_i` with the sample mean
//! and the sample standard deviation (`n − 1` denominator). Everything
//! returned to callers is mapped back with [`Standardization::restore`].
//! With standardization disabled, `μ_i` is still removed (the state-space
//! form has no intercept) and `s_i = 1`.
use ndarray::{Array1, Array2, ArrayView2, Axis};
use serde::Serialize;

use crate::dfm::errors::{DFMError, DFMResult};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Standardization {
    pub mean: Array1<f64>,
    pub scale: Array1<f64>,
}

impl Standardization {
    /// Estimate moments column by column.
    ///
    /// # Errors
    /// - [`DFMError::InvalidConfiguration`] if a column has zero variance or
    ///   there are fewer than two rows.
    pub fn estimate(x: ArrayView2<f64>, columns: &[String], scale: bool) -> DFMResult<Self> {
        if x.nrows() < 2 {
            return Err(DFMError::config("need at least two observations to standardize"));
        }
        let mean = x.mean_axis(Axis(0)).ok_or_else(|| DFMError::config("empty panel"))?;
        let std = x.std_axis(Axis(0), 1.0);
        if let Some((i, _)) = std.iter().enumerate().find(|(_, s)| !(**s > 0.0)) {
            let name = columns.get(i).map(String::as_str).unwrap_or("?");
            return Err(DFMError::config(format!("variable '{name}' has zero variance")));
        }
        let scale = if scale { std } else { Array1::ones(x.ncols()) };
        Ok(Self { mean, scale })
    }

    /// `(x − μ) / s`.
    pub fn apply(&self, x: ArrayView2<f64>) -> Array2<f64> {
        (&x - &self.mean) / &self.scale
    }

    /// `z · s + μ`.
    pub fn restore(&self, z: ArrayView2<f64>) -> Array2<f64> {
        &z * &self.scale + &self.mean
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
    // `restore(apply(x)) = x` and standardized columns have unit variance.
    //
    // Given
    // -----
    // - x = [[1, 10], [2, 30], [3, 20]].
    //
    // Expect
    // ------
    // - Zero means, unit sample variances, exact round trip.
    fn apply_then_restore_is_identity() {
        let x = array![[1.0, 10.0], [2.0, 30.0], [3.0, 20.0]];
        let cols = vec!["a".to_string(), "b".to_string()];
        let m = Standardization::estimate(x.view(), &cols, true).expect("non-constant");

        let z = m.apply(x.view());
        let back = m.restore(z.view());

        for j in 0..2 {
            assert_abs_diff_eq!(z.column(j).sum(), 0.0, epsilon = 1e-12);
            assert_abs_diff_eq!(z.column(j).var(1.0), 1.0, epsilon = 1e-12);
        }
        for (a, b) in back.iter().zip(x.iter()) {
            assert_abs_diff_eq!(*a, *b, epsilon = 1e-12);
        }
    }

    #[test]
    // Purpose
    // -------
    // A constant column is rejected by name.
    //
    // Given
    // -----
    // - Column "flat" constant at 5.
    //
    // Expect
    // ------
    // - `InvalidConfiguration` mentioning "flat".
    fn constant_column_is_rejected() {
        let x = array![[1.0, 5.0], [2.0, 5.0], [4.0, 5.0]];
        let cols = vec!["a".to_string(), "flat".to_string()];

        let err = Standardization::estimate(x.view(), &cols, false).expect_err("zero variance");

        assert!(err.to_string().contains("flat"), "Got: {err}");
    }
}
