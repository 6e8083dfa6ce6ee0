//! loglik_optimizer::builders — L-BFGS solver construction helpers.
//!
//! Purpose
//! -------
//! Build L-BFGS solvers for the two supported line searches and apply the
//! crate-level tolerances from [`MLEOptions`]. The initial parameter vector,
//! iteration budget, and timeout are runtime concerns left to
//! [`run_lbfgs`](super::run::run_lbfgs).
//!
//! Invariants & assumptions
//! ------------------------
//! - Memory `m` is `opts.lbfgs_mem` or [`DEFAULT_LBFGS_MEM`].
//! - Tolerances rejected by argmin surface as [`OptError`](crate::optimization::errors::OptError)
//!   through `From<argmin::core::Error>`.
use argmin::solver::quasinewton::LBFGS;

use crate::optimization::{
    errors::OptResult,
    loglik_optimizer::{
        traits::MLEOptions,
        types::{
            Cost, DEFAULT_LBFGS_MEM, Grad, HagerZhangLS, LbfgsHagerZhang, LbfgsMoreThuente,
            MoreThuenteLS, Theta,
        },
    },
};

/// L-BFGS with Hager–Zhang line search and the tolerances from `opts`.
///
/// # Errors
/// Returns `OptError` when argmin rejects a tolerance.
pub fn build_optimizer_hager_zhang(opts: &MLEOptions) -> OptResult<LbfgsHagerZhang> {
    let lbfgs = LbfgsHagerZhang::new(HagerZhangLS::new(), lbfgs_memory(opts));
    configure_lbfgs(lbfgs, opts)
}

/// L-BFGS with More–Thuente line search and the tolerances from `opts`.
///
/// # Errors
/// Returns `OptError` when argmin rejects a tolerance.
pub fn build_optimizer_more_thuente(opts: &MLEOptions) -> OptResult<LbfgsMoreThuente> {
    let lbfgs = LbfgsMoreThuente::new(MoreThuenteLS::new(), lbfgs_memory(opts));
    configure_lbfgs(lbfgs, opts)
}

/// Apply optional gradient and cost-change tolerances to an L-BFGS solver,
/// whatever its line search. `None` keeps argmin's default.
pub fn configure_lbfgs<L>(
    mut solver: LBFGS<L, Theta, Grad, Cost>, opts: &MLEOptions,
) -> OptResult<LBFGS<L, Theta, Grad, Cost>> {
    if let Some(g) = opts.tols.tol_grad {
        solver = solver.with_tolerance_grad(g)?;
    }
    if let Some(c) = opts.tols.tol_cost {
        solver = solver.with_tolerance_cost(c)?;
    }
    Ok(solver)
}

fn lbfgs_memory(opts: &MLEOptions) -> usize {
    opts.lbfgs_mem.unwrap_or(DEFAULT_LBFGS_MEM)
}
