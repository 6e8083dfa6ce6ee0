//! statistical_tests::errors — shared error type for residual diagnostics.
//!
//! Purpose
//! -------
//! Provide the error enum and result alias used by the correlogram, normality
//! and density routines, so input problems surface as values instead of
//! `NaN` statistics.
//!
//! Conventions
//! -----------
//! - Messages are phrased as domain constraints ("need at least n
//!   observations", "lag must be ≥ 1") rather than low-level details.
//! - Model-level errors live in their own subtrees; [`TestError`] is wrapped
//!   by `DFMError::Test` when diagnostics run on fitted residuals.
use thiserror::Error;

pub type TestResult<T> = Result<T, TestError>;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum TestError {
    #[error("Need at least {required} observations, got {found}")]
    InsufficientData { required: usize, found: usize },

    #[error("Invalid data value {value} at index {index}: must be a finite number")]
    InvalidData { index: usize, value: f64 },

    #[error("Invalid lag count {lags}: must be at least 1")]
    InvalidLag { lags: usize },

    #[error("Invalid grid size {points}: need at least 2 points")]
    InvalidGrid { points: usize },

    #[error("Series has zero variance; statistic is undefined")]
    ZeroVariance,

    #[error("Reference distribution unavailable: {reason}")]
    Distribution { reason: String },
}
