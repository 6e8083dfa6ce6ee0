//! statespace::errors — failures of the linear Gaussian state-space kernels.
use thiserror::Error;

pub type StateSpaceResult<T> = Result<T, StateSpaceError>;

/// Errors raised while building a system or running the filter/smoother.
///
/// Numerical variants (`NotPositiveDefinite`, `LyapunovNotConverged`,
/// `NonFiniteState`) are recoverable from the optimizer's point of view: a
/// parameter vector that triggers them is simply a bad point.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum StateSpaceError {
    #[error("Dimension mismatch for {what}: expected {expected:?}, found {found:?}")]
    DimensionMismatch { what: &'static str, expected: (usize, usize), found: (usize, usize) },

    #[error("Innovation covariance is not positive definite at t = {t}")]
    NotPositiveDefinite { t: usize },

    #[error("Stationary covariance did not converge after {iterations} doubling steps")]
    LyapunovNotConverged { iterations: usize },

    #[error("Non-finite state estimate at t = {t}")]
    NonFiniteState { t: usize },

    #[error("Shock index {index} out of range for {n_shocks} shocks")]
    ShockOutOfRange { index: usize, n_shocks: usize },
}

impl StateSpaceError {
    /// `true` for breakdowns caused by the parameter values rather than by
    /// inconsistent inputs.
    pub fn is_numerical(&self) -> bool {
        matches!(
            self,
            StateSpaceError::NotPositiveDefinite { .. }
                | StateSpaceError::LyapunovNotConverged { .. }
                | StateSpaceError::NonFiniteState { .. }
        )
    }
}
