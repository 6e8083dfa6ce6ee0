//! statespace — linear Gaussian state-space kernels.
//!
//! Purpose
//! -------
//! Provide the model-agnostic machinery shared by the dynamic factor model
//! and the univariate ARMA baseline: a system description, stationary
//! initialization, the Kalman filter (likelihood, one-step predictions,
//! filtered end state) and the fixed-interval state smoother.
//!
//! Key behaviors
//! -------------
//! - [`system::StateSpaceModel`] validates `(T, Z, R, Q)` shapes once and
//!   caches `R Q Rᵀ`; it also computes impulse responses and projections.
//! - [`lyapunov::solve_discrete_lyapunov`] gives the unconditional state
//!   covariance used as the initial `P_1`.
//! - [`kalman::loglikelihood`] is the allocation-light path the optimizer
//!   hits on every evaluation; [`kalman::kalman_filter`] stores what the
//!   smoother and fitted values need.
//! - [`smoother::smooth_states`] runs the backward `r_t` recursion.
//!
//! Invariants & assumptions
//! ------------------------
//! - Observations carry no measurement noise (`H = 0`); every observed
//!   series must receive a fresh shock through `R Q Rᵀ` so `F_t` stays
//!   positive definite.
//! - Observations are demeaned by the caller; the filter has no intercept.
//! - Numerical breakdowns are returned as [`errors::StateSpaceError`], never
//!   panics.

pub mod errors;
pub mod kalman;
pub(crate) mod linalg;
pub mod lyapunov;
pub mod smoother;
pub mod system;

pub use self::errors::{StateSpaceError, StateSpaceResult};
pub use self::kalman::{InitialState, KalmanOutput, kalman_filter, loglikelihood};
pub use self::smoother::smooth_states;
pub use self::system::StateSpaceModel;
