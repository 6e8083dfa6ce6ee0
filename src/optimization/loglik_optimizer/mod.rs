//! loglik_optimizer — argmin-powered log-likelihood maximizer.
//!
//! Purpose
//! -------
//! Provide the estimation engine behind every model in the crate: callers
//! implement [`LogLikelihood`] and invoke [`maximize`] to run L-BFGS with a
//! configurable line search, tolerances, iteration budget and timeout, and
//! finite-difference gradients when no analytic gradient exists.
//!
//! Key behaviors
//! -------------
//! - Convert `ℓ(θ)` into the argmin cost `c(θ) = -ℓ(θ)` via
//!   [`adapter::ArgMinAdapter`].
//! - [`maximize`] validates the start with [`LogLikelihood::check`], selects a
//!   solver via [`builders`], and executes it via [`run::run_lbfgs`].
//! - Normalize results into an [`OptimOutcome`] whose `converged` flag is
//!   true only for tolerance-based termination.
//!
//! Invariants & assumptions
//! ------------------------
//! - The optimizer **always maximizes**; models implement `ℓ(θ)` and never
//!   the cost directly.
//! - [`LogLikelihood::value`] treats invalid inputs as recoverable
//!   [`OptError`](crate::optimization::errors::OptError) values, not panics.
//! - Configuration types ([`Tolerances`], [`MLEOptions`]) are validated on
//!   construction.
//!
//! Conventions
//! -----------
//! - Parameters live in an unconstrained space as [`Theta`]; mapping to
//!   constrained model space happens in the model layer.
//! - No logging happens here; model layers log around `maximize`.
//!
//! Testing notes
//! -------------
//! - Unit tests cover sign conventions and FD fallback ([`adapter`]), solver
//!   wiring ([`builders`]), option/outcome invariants ([`traits`]), guards
//!   ([`validation`]), and end-to-end toy problems ([`api`]).
//! - The dynamic factor and ARMA fits exercise the stack on real
//!   state-space likelihoods.

pub mod adapter;
pub mod api;
pub mod builders;
pub mod run;
pub mod traits;
pub mod types;
pub mod validation;

// ---- Re-exports (primary public surface) ----------------------------------

pub use self::api::maximize;
pub use self::traits::{LineSearcher, LogLikelihood, MLEOptions, OptimOutcome, Tolerances};
pub use self::types::{Cost, DEFAULT_LBFGS_MEM, FnEvalMap, Grad, Theta};

pub mod prelude {
    pub use super::api::maximize;
    pub use super::traits::{LineSearcher, LogLikelihood, MLEOptions, OptimOutcome, Tolerances};
    pub use super::types::{Cost, Grad, Theta};
}
