//! Model specification: variable selection and hyperparameters.
//!
//! Purpose
//! -------
//! Turn "which columns, how many factors, which lag orders" into an
//! immutable, validated [`ModelConfig`] before any numerical work happens.
//!
//! Invariants & assumptions
//! ------------------------
//! - The selection is non-empty, has no repeats, and every name exists in
//!   the panel it was validated against.
//! - `1 ≤ k_factors ≤ #selected`, `factor_order ≥ 1`, `error_order ≥ 1`.
//!
//! Conventions
//! -----------
//! - `variables = None` selects every panel column, in panel order.
//! - Construction is cheap and side-effect free; fitting re-checks the
//!   config against the panel it is given.
use serde::Serialize;
use std::collections::HashSet;

use crate::{
    dfm::{
        errors::{DFMError, DFMResult},
        shape::DFMShape,
    },
    panel::Panel,
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ModelConfig {
    variables: Vec<String>,
    k_factors: usize,
    factor_order: usize,
    error_order: usize,
}

impl ModelConfig {
    /// Validate a selection and hyperparameters against `panel`.
    ///
    /// # Errors
    /// [`DFMError::InvalidConfiguration`] if
    /// - the selection is empty, repeats a name, or names an absent column;
    /// - any of `k_factors`, `factor_order`, `error_order` is zero;
    /// - `k_factors` exceeds the number of selected variables.
    pub fn new(
        panel: &Panel, variables: Option<&[&str]>, k_factors: usize, factor_order: usize,
        error_order: usize,
    ) -> DFMResult<Self> {
        let variables: Vec<String> = match variables {
            Some(names) => names.iter().map(|n| n.to_string()).collect(),
            None => panel.columns().to_vec(),
        };
        let config = Self { variables, k_factors, factor_order, error_order };
        config.validate_against(panel)?;
        Ok(config)
    }

    /// Re-run every check against `panel`.
    ///
    /// # Errors
    /// Same as [`ModelConfig::new`].
    pub fn validate_against(&self, panel: &Panel) -> DFMResult<()> {
        if self.variables.is_empty() {
            return Err(DFMError::config("no variables selected"));
        }
        let mut seen = HashSet::with_capacity(self.variables.len());
        for name in &self.variables {
            if !seen.insert(name.as_str()) {
                return Err(DFMError::config(format!("variable '{name}' selected twice")));
            }
            if panel.column_index(name).is_none() {
                return Err(DFMError::config(format!("variable '{name}' not found in panel")));
            }
        }
        for (label, value) in [
            ("k_factors", self.k_factors),
            ("factor_order", self.factor_order),
            ("error_order", self.error_order),
        ] {
            if value < 1 {
                return Err(DFMError::config(format!("{label} must be at least 1, got {value}")));
            }
        }
        if self.k_factors > self.variables.len() {
            return Err(DFMError::config(format!(
                "k_factors = {} exceeds the {} selected variables",
                self.k_factors,
                self.variables.len()
            )));
        }
        Ok(())
    }

    pub fn variables(&self) -> &[String] {
        &self.variables
    }

    pub fn k_factors(&self) -> usize {
        self.k_factors
    }

    pub fn factor_order(&self) -> usize {
        self.factor_order
    }

    pub fn error_order(&self) -> usize {
        self.error_order
    }

    pub fn shape(&self) -> DFMShape {
        DFMShape {
            n_vars: self.variables.len(),
            k_factors: self.k_factors,
            factor_order: self.factor_order,
            error_order: self.error_order,
        }
    }
}
