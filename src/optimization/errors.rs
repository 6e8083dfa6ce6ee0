//! optimization::errors — unified error surface for the MLE stack.
//!
//! Purpose
//! -------
//! Collect every failure the optimizer layer can report (bad options,
//! invalid gradients, backend solver errors, numerical breakdowns inside a
//! likelihood) into a single enum so model code can propagate with `?`
//! without leaking `argmin` error types.
//!
//! Conventions
//! -----------
//! - Variants carry just enough payload to explain the failure.
//! - `argmin::core::Error` values are downcast into structured variants where
//!   possible and wrapped as [`OptError::BackendError`] otherwise.
//! - State-space failures ([`StateSpaceError`]) convert losslessly via
//!   [`OptError::StateSpace`].
use argmin::core::{ArgminError, Error};
use thiserror::Error as ThisError;

use crate::statespace::errors::StateSpaceError;

/// Crate-wide result alias for optimizer operations.
pub type OptResult<T> = Result<T, OptError>;

#[derive(Debug, Clone, PartialEq, ThisError)]
pub enum OptError {
    // ---- Gradient ----
    /// Implies that FD should be used
    #[error("Gradient optimization not implemented")]
    GradientNotImplemented,

    #[error("Gradient dimension mismatch: expected {expected}, found {found}")]
    GradientDimMismatch { expected: usize, found: usize },

    #[error("Invalid gradient at index {index}: {value}: {reason}")]
    InvalidGradient { index: usize, value: f64, reason: &'static str },

    // ---- MLEOptions ----
    #[error("Invalid gradient tolerance {tol}: {reason}")]
    InvalidTolGrad { tol: f64, reason: &'static str },

    #[error("Invalid cost function change tolerance {tol}: {reason}")]
    InvalidTolCost { tol: f64, reason: &'static str },

    #[error("Invalid maximum iterations {max_iter}: {reason}")]
    InvalidMaxIter { max_iter: usize, reason: &'static str },

    #[error("No tolerances provided")]
    NoTolerancesProvided,

    #[error("Invalid line searcher '{name}': {reason}")]
    InvalidLineSearch { name: String, reason: &'static str },

    #[error("Invalid L-BFGS memory {mem}: {reason}")]
    InvalidLBFGSMem { mem: usize, reason: &'static str },

    // ---- Cost function ----
    #[error("Non-finite cost value: {value}")]
    NonFiniteCost { value: f64 },

    // ---- Parameter vector ----
    #[error("Theta length mismatch: expected {expected}, actual {actual}")]
    ThetaLengthMismatch { expected: usize, actual: usize },

    #[error("Invalid theta input at index {index}: {value}, must be finite")]
    InvalidThetaInput { index: usize, value: f64 },

    // ---- Optimizer outcome ----
    #[error("Invalid estimated parameter at index {index}: {value}: {reason}")]
    InvalidThetaHat { index: usize, value: f64, reason: &'static str },

    #[error("Missing estimated parameters (theta hat)")]
    MissingThetaHat,

    // ---- Numerical ----
    #[error(transparent)]
    StateSpace(#[from] StateSpaceError),

    // ---- Argmin ----
    #[error("Invalid parameter: {text}")]
    InvalidParameter { text: String },

    #[error("Not implemented: {text}")]
    NotImplemented { text: String },

    #[error("Not initialized: {text}")]
    NotInitialized { text: String },

    #[error("Condition violated: {text}")]
    ConditionViolated { text: String },

    #[error("Checkpoint not found: {text}")]
    CheckPointNotFound { text: String },

    #[error("Potential bug: {text}")]
    PotentialBug { text: String },

    #[error("Impossible error: {text}")]
    ImpossibleError { text: String },

    #[error("Backend error: {text}")]
    BackendError { text: String },

    // ---- Fallback ----
    #[error("Unknown error")]
    UnknownError,
}

impl From<Error> for OptError {
    fn from(original_err: Error) -> Self {
        // Our own errors travel through argmin boxed; recover them first.
        let original_err = match original_err.downcast::<OptError>() {
            Ok(opt_err) => return opt_err,
            Err(err) => err,
        };
        match original_err.downcast() {
            Ok(argmin_err) => match argmin_err {
                ArgminError::InvalidParameter { text } => OptError::InvalidParameter { text },
                ArgminError::NotImplemented { text } => OptError::NotImplemented { text },
                ArgminError::NotInitialized { text } => OptError::NotInitialized { text },
                ArgminError::ConditionViolated { text } => OptError::ConditionViolated { text },
                ArgminError::CheckpointNotFound { text } => OptError::CheckPointNotFound { text },
                ArgminError::PotentialBug { text } => OptError::PotentialBug { text },
                ArgminError::ImpossibleError { text } => OptError::ImpossibleError { text },
                _ => OptError::UnknownError,
            },
            Err(err) => OptError::BackendError { text: err.to_string() },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - Display formatting of representative variants.
    // - Round-tripping an `OptError` through `argmin::core::Error`.
    // - Mapping of `ArgminError` variants into structured `OptError`s.
    // -------------------------------------------------------------------------

    #[test]
    // Purpose
    // -------
    // Ensure the Display message embeds the offending payload.
    //
    // Given
    // -----
    // - `OptError::InvalidMaxIter { max_iter: 0, .. }`.
    //
    // Expect
    // ------
    // - The message contains "0" and the reason string.
    fn opt_error_display_includes_payload() {
        // Arrange
        let err = OptError::InvalidMaxIter { max_iter: 0, reason: "must be positive" };

        // Act
        let msg = err.to_string();

        // Assert
        assert!(msg.contains('0'), "Got: {msg}");
        assert!(msg.contains("must be positive"), "Got: {msg}");
    }

    #[test]
    // Purpose
    // -------
    // Verify that an `OptError` boxed into an argmin error comes back
    // unchanged, which is how likelihood failures surface after a run.
    //
    // Given
    // -----
    // - `OptError::NonFiniteCost { value: NaN }` converted into `argmin::core::Error`.
    //
    // Expect
    // ------
    // - Converting back yields `OptError::NonFiniteCost`.
    fn opt_error_round_trips_through_argmin_error() {
        // Arrange
        let boxed: Error = OptError::NonFiniteCost { value: f64::INFINITY }.into();

        // Act
        let back = OptError::from(boxed);

        // Assert
        assert_eq!(back, OptError::NonFiniteCost { value: f64::INFINITY });
    }

    #[test]
    // Purpose
    // -------
    // Check that argmin's own error enum is mapped variant-by-variant.
    //
    // Given
    // -----
    // - `ArgminError::InvalidParameter` wrapped into `argmin::core::Error`.
    //
    // Expect
    // ------
    // - `OptError::InvalidParameter` with the same text.
    fn argmin_invalid_parameter_maps_to_structured_variant() {
        // Arrange
        let boxed: Error = ArgminError::InvalidParameter { text: "tol".to_string() }.into();

        // Act
        let mapped = OptError::from(boxed);

        // Assert
        assert_eq!(mapped, OptError::InvalidParameter { text: "tol".to_string() });
    }
}
