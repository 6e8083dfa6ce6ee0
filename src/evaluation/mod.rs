//! evaluation — accuracy metrics, residual diagnostics and baselines.
//!
//! Purpose
//! -------
//! Score a fitted [`DFMModel`](crate::dfm::DFMModel) in and out of sample
//! and check its residuals. Everything here is read-only with respect to
//! the model.
//!
//! Key behaviors
//! -------------
//! - [`Evaluator`] is the entry point: in-sample and out-of-sample
//!   MAE/MSE/RMSE, chronological split, ACF/PACF, impulse responses,
//!   Jarque–Bera, residual densities and the ARMA comparison.
//! - [`metrics`] holds the per-variable accuracy tables.
//! - [`diagnostics`] holds the per-variable wrappers and the Gaussian KDE.
//! - [`baseline`] fits the univariate ARMA benchmark.
//!
//! Conventions
//! -----------
//! - Tables keep the model's variable order and derive `Serialize`.

pub mod baseline;
pub mod diagnostics;
pub mod evaluator;
pub mod metrics;

pub use self::baseline::{ArmaBaseline, ArmaComparison, ArmaFit};
pub use self::diagnostics::{DensityEstimate, VariableDiagnostic};
pub use self::evaluator::Evaluator;
pub use self::metrics::{ErrorMetrics, EvaluationResult, VariableMetrics};
