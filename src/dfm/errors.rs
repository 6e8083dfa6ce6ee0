//! dfm::errors — failure surface of model specification, fitting and use.
//!
//! Purpose
//! -------
//! Give callers one enum to match on for everything that can go wrong
//! between "here is a panel" and "here are metrics": configuration
//! mistakes, estimation that did not converge, calls made in the wrong
//! order, and lower-level panel / diagnostic failures.
//!
//! Conventions
//! -----------
//! - Configuration and out-of-order calls surface immediately and never
//!   change model state.
//! - [`DFMError::ConvergenceError`] is the only variant produced by `fit`
//!   for numerical trouble, so callers can retry with other hyperparameters.
//! - Lower-level enums convert with `?` via `#[from]`.
use thiserror::Error;

use crate::{
    optimization::errors::OptError, panel::errors::PanelError,
    statespace::errors::StateSpaceError, statistical_tests::errors::TestError,
};

pub type DFMResult<T> = Result<T, DFMError>;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum DFMError {
    // ---- Specification ----
    #[error("Invalid model configuration: {reason}")]
    InvalidConfiguration { reason: String },

    #[error("Invalid argument '{name}': {reason}")]
    InvalidArgument { name: &'static str, reason: String },

    // ---- Estimation ----
    #[error("Estimation did not converge after {iterations} iterations: {status}")]
    ConvergenceError { status: String, iterations: usize },

    // ---- Call order ----
    #[error("Model has not been fitted")]
    ModelNotFitted,

    #[error("Data has not been split; call split_data first")]
    DataNotSplit,

    // ---- Pass-through ----
    #[error(transparent)]
    Panel(#[from] PanelError),

    #[error(transparent)]
    Test(#[from] TestError),

    #[error(transparent)]
    StateSpace(#[from] StateSpaceError),

    #[error(transparent)]
    Optimization(#[from] OptError),
}

impl DFMError {
    pub(crate) fn config(reason: impl Into<String>) -> Self {
        DFMError::InvalidConfiguration { reason: reason.into() }
    }

    pub(crate) fn argument(name: &'static str, reason: impl Into<String>) -> Self {
        DFMError::InvalidArgument { name, reason: reason.into() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // Messages carry their payload and lower-level errors convert with `?`.
    // -------------------------------------------------------------------------

    #[test]
    // Purpose
    // -------
    // Convergence failures report status and iteration count.
    //
    // Given
    // -----
    // - `ConvergenceError { status: "MaxItersReached", iterations: 500 }`.
    //
    // Expect
    // ------
    // - Both appear in the message.
    fn convergence_error_message_includes_status_and_iterations() {
        let err = DFMError::ConvergenceError { status: "MaxItersReached".into(), iterations: 500 };

        let msg = err.to_string();

        assert!(msg.contains("MaxItersReached") && msg.contains("500"), "Got: {msg}");
    }

    #[test]
    // Purpose
    // -------
    // Panel errors convert transparently.
    //
    // Given
    // -----
    // - `PanelError::EmptyPanel`.
    //
    // Expect
    // ------
    // - `DFMError::Panel(..)` with the same message.
    fn panel_error_converts_transparently() {
        let inner = PanelError::EmptyPanel;

        let err: DFMError = inner.clone().into();

        assert_eq!(err.to_string(), inner.to_string());
        assert!(matches!(err, DFMError::Panel(PanelError::EmptyPanel)));
    }
}
