//! Forecast tables.
//!
//! A [`ForecastTable`] holds `h`-step-ahead predictions for every modeled
//! variable: row `h − 1` is the forecast `h` periods past the end of the
//! conditioning window, columns follow the model's variable order.
//! Predictions are conditional means with all future shocks set to zero.
use ndarray::{Array2, ArrayView1};
use serde::Serialize;

use crate::dfm::errors::{DFMError, DFMResult};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ForecastTable {
    columns: Vec<String>,
    values: Array2<f64>,
}

impl ForecastTable {
    pub(crate) fn new(columns: Vec<String>, values: Array2<f64>) -> Self {
        Self { columns, values }
    }

    /// Number of forecast steps (rows).
    pub fn steps(&self) -> usize {
        self.values.nrows()
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// `steps × N` predictions in original units.
    pub fn values(&self) -> &Array2<f64> {
        &self.values
    }

    /// Forecast path of one variable.
    ///
    /// # Errors
    /// - [`DFMError::InvalidArgument`] if `name` is not a modeled variable.
    pub fn column(&self, name: &str) -> DFMResult<ArrayView1<'_, f64>> {
        let idx = self
            .columns
            .iter()
            .position(|c| c == name)
            .ok_or_else(|| DFMError::argument("name", format!("unknown variable '{name}'")))?;
        Ok(self.values.column(idx))
    }
}
