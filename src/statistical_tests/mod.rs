//! statistical_tests — residual diagnostics and their shared infrastructure.
//!
//! Purpose
//! -------
//! Collect the statistics used to check a fitted model's residuals:
//! autocorrelation and partial autocorrelation functions with their
//! white-noise band, and the Jarque–Bera normality test.
//!
//! Key behaviors
//! -------------
//! - [`correlogram::acf`] / [`correlogram::pacf`] return a [`Correlogram`]
//!   with coefficients at lags `1..=L` and the `±1.96/√n` band.
//! - [`JarqueBeraOutcome::jarque_bera`] reports the statistic, its χ²(2)
//!   p-value, skewness and kurtosis.
//! - Input guards live in [`validation`] and are shared by every routine.
//!
//! Invariants & assumptions
//! ------------------------
//! - Inputs are finite, real-valued residual series; routines validate
//!   before computing and report failures via [`TestResult`].
//! - Nothing here panics on user input.
//!
//! Downstream usage
//! ----------------
//! - The evaluator calls these per variable on fitted residuals and wraps
//!   [`TestError`] into the model error type.

pub mod correlogram;
pub mod errors;
pub mod jarque_bera;
pub mod validation;

// ---- Re-exports (primary public surface) ----------------------------------

pub use self::correlogram::{Correlogram, acf, pacf};
pub use self::errors::{TestError, TestResult};
pub use self::jarque_bera::JarqueBeraOutcome;

pub mod prelude {
    pub use super::correlogram::{Correlogram, acf, pacf};
    pub use super::errors::{TestError, TestResult};
    pub use super::jarque_bera::JarqueBeraOutcome;
}
