//! dynfactor — dynamic factor model estimation and evaluation.
//!
//! Purpose
//! -------
//! Fit a linear Gaussian dynamic factor model to a wide, date-indexed
//! numeric panel by exact maximum likelihood and evaluate it: in-sample and
//! out-of-sample accuracy, forecasts, smoothed factors, impulse responses
//! and residual diagnostics.
//!
//! Key behaviors
//! -------------
//! - [`panel`] validates the input table and provides column selection and
//!   chronological splits.
//! - [`dfm`] specifies ([`dfm::ModelConfig`]), estimates
//!   ([`dfm::DFMModel::fit`]) and uses the model.
//! - [`evaluation`] scores a fitted model and checks its residuals.
//! - [`statespace`] holds the Kalman filter, smoother and Lyapunov solver;
//!   [`optimization`] the argmin-backed likelihood maximizer;
//!   [`statistical_tests`] the correlograms and normality test.
//!
//! Invariants & assumptions
//! ------------------------
//! - Input panels are already clean: finite values, strictly increasing
//!   dates, unique column names. Construction rejects anything else.
//! - All public types are `Send + Sync`; fitting is single-threaded, so
//!   independent configurations can be fitted on separate threads.
//!
//! Conventions
//! -----------
//! - Each subtree owns its error enum (`errors.rs`) and a `…Result<T>`
//!   alias; model-level calls return [`dfm::DFMError`].
//! - Diagnostics go through `tracing`; the library never installs a
//!   subscriber.
//!
//! Downstream usage
//! ----------------
//! ```no_run
//! use dynfactor::{
//!     dfm::{DFMModel, DFMOptions, ModelConfig},
//!     evaluation::Evaluator,
//!     panel::Panel,
//! };
//!
//! # fn run(panel: Panel) -> Result<(), dynfactor::dfm::DFMError> {
//! let config = ModelConfig::new(&panel, None, 1, 1, 1)?;
//! let mut model = DFMModel::new(&panel, config, DFMOptions::default())?;
//! model.fit()?;
//! let mut evaluator = Evaluator::new(&model);
//! let insample = evaluator.evaluate_insample()?;
//! evaluator.split_data(0.2)?;
//! let outsample = evaluator.evaluate_outsample()?;
//! let forecast = model.forecast(12)?;
//! # let _ = (insample, outsample, forecast);
//! # Ok(())
//! # }
//! ```

pub mod dfm;
pub mod evaluation;
pub mod optimization;
pub mod panel;
pub mod statespace;
pub mod statistical_tests;
