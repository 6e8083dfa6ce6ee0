//! optimization — MLE stack, numerical helpers, and unified error surface.
//!
//! Purpose
//! -------
//! Provide the optimization layer used to fit every model in the crate: an
//! argmin-backed log-likelihood maximizer, numerically stable parameter
//! transforms, and a single error/result surface. Model code implements a
//! log-likelihood, chooses tolerances, and receives fitted parameters and
//! termination diagnostics without touching solver internals.
//!
//! Key behaviors
//! -------------
//! - [`loglik_optimizer`]: maximize `ℓ(θ)` with L-BFGS (More–Thuente or
//!   Hager–Zhang), finite-difference gradients, iteration and wall-clock
//!   budgets.
//! - [`numerical_stability`]: softplus for variances, PACF/Levinson–Durbin
//!   for univariate AR stationarity, a norm-bounded map for VAR blocks.
//! - [`errors`]: configuration issues, numerical failures and backend solver
//!   errors normalized into [`OptError`](errors::OptError).
//!
//! Conventions
//! -----------
//! - Solvers conceptually maximize `ℓ(θ)` by minimizing `c(θ) = -ℓ(θ)`;
//!   user-facing outcomes are expressed in terms of `ℓ`.
//! - Entry points that can fail return `OptResult<T>`; callers never see raw
//!   argmin errors.
//! - This layer does not log; the model layer reports progress via
//!   `tracing`.

pub mod errors;
pub mod loglik_optimizer;
pub mod numerical_stability;

pub mod prelude {
    pub use super::errors::{OptError, OptResult};
    pub use super::loglik_optimizer::prelude::*;
    pub use super::numerical_stability::prelude::*;
}
