//! numerical_stability — stable transforms between optimizer and model space.
//!
//! Purpose
//! -------
//! Collect the scalar and matrix maps that let the optimizer search an
//! unconstrained `θ` while the model only ever sees admissible parameters:
//! strictly positive variances, stationary univariate AR polynomials, and
//! stable VAR coefficient blocks.
//!
//! Invariants & assumptions
//! ------------------------
//! - Inputs are finite; shape checks happen in the model layer.
//! - Every forward map lands strictly inside the admissible region, kept
//!   away from the boundary by [`STATIONARITY_MARGIN`] / [`VARIANCE_FLOOR`].
//! - Inverse maps return `None` for points outside that region instead of
//!   producing non-finite coordinates.
//!
//! Conventions
//! -----------
//! - Pure functions, no logging, no global state.
//! - `ndarray` in and out; `nalgebra` is used internally for Cholesky solves.

pub mod transformations;

// ---- Re-exports (primary public surface) ----------------------------------

pub use self::transformations::{
    STATIONARITY_MARGIN, VARIANCE_FLOOR, ar_to_pacf, constrain_var, pacf_to_ar, safe_softplus,
    safe_softplus_inv, unconstrain_var,
};

pub mod prelude {
    pub use super::transformations::{
        STATIONARITY_MARGIN, VARIANCE_FLOOR, ar_to_pacf, constrain_var, pacf_to_ar,
        safe_softplus, safe_softplus_inv, unconstrain_var,
    };
}
