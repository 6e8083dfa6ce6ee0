//! dfm — dynamic factor model specification, estimation and use.
//!
//! Purpose
//! -------
//! Estimate `X_t = Λ F_t + ε_t` with VAR(p) factors and AR(q) idiosyncratic
//! errors by exact Gaussian maximum likelihood, and expose what a fitted
//! model is used for: one-step-ahead fitted values, smoothed factors,
//! multi-step forecasts, impulse responses and information criteria.
//!
//! Key behaviors
//! -------------
//! - [`ModelConfig`] names the modeled columns and the orders `(k, p, q)`
//!   and is validated against a [`Panel`](crate::panel::Panel).
//! - [`DFMModel::new`] standardizes the selection; [`DFMModel::fit`] runs
//!   the Kalman-filter likelihood through
//!   [`maximize`](crate::optimization::loglik_optimizer::maximize) from
//!   principal-component start values ([`init`]).
//! - [`params`] maps the unconstrained optimizer vector onto stationary
//!   AR/VAR blocks and positive variances, and builds the state-space form.
//!
//! Invariants & assumptions
//! ------------------------
//! - Every value returned to callers is in the panel's original units.
//! - A model is either unfitted, fitted, or failed; no call observes a
//!   partially fitted model.
//! - Fitting is single-threaded and deterministic for a given panel and
//!   options.
//!
//! Conventions
//! -----------
//! - The reported log-likelihood is that of the working (standardized)
//!   panel; information criteria use it with `n_params = shape.theta_len()`.
//! - `tracing` events: `info` at fit start/end, `warn` on non-convergence,
//!   `debug` for start values.

pub mod config;
pub mod errors;
pub mod forecasts;
pub mod init;
pub mod model;
pub mod options;
pub mod params;
pub mod shape;
pub mod standardize;
pub mod summary;

pub use self::config::ModelConfig;
pub use self::errors::{DFMError, DFMResult};
pub use self::forecasts::ForecastTable;
pub use self::model::{DFMModel, FitState, FittedModel};
pub use self::options::DFMOptions;
pub use self::params::DFMParams;
pub use self::shape::DFMShape;
pub use self::standardize::Standardization;
pub use self::summary::{FitSummary, InformationCriteria};

pub mod prelude {
    pub use super::{DFMError, DFMModel, DFMOptions, DFMResult, ForecastTable, ModelConfig};
}
