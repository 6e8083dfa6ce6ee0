//! Stationary state covariance via the discrete Lyapunov equation.
//!
//! Solves `P = T P Tᵀ + Q` by doubling:
//! `S₀ = Q, A₀ = T; S_{k+1} = S_k + A_k S_k A_kᵀ, A_{k+1} = A_k²`,
//! so `S_k` sums the first `2ᵏ` terms of `Σ Tʲ Q Tʲᵀ`.
use ndarray::Array2;

use crate::statespace::{
    errors::{StateSpaceError, StateSpaceResult},
    linalg::symmetrize,
};

/// Upper bound on doubling steps (covers `2⁶⁴` series terms).
pub const MAX_DOUBLING_STEPS: usize = 64;

const RELATIVE_TOL: f64 = 1e-13;

/// Solve `P = T P Tᵀ + Q` for a stable `T`.
///
/// # Errors
/// - [`StateSpaceError::LyapunovNotConverged`] if the increments have not
///   vanished after [`MAX_DOUBLING_STEPS`] steps or became non-finite, which
///   happens when `T` has an eigenvalue on or outside the unit circle.
pub fn solve_discrete_lyapunov(
    transition: &Array2<f64>, q: &Array2<f64>,
) -> StateSpaceResult<Array2<f64>> {
    let mut a = transition.clone();
    let mut s = q.clone();
    for _ in 0..MAX_DOUBLING_STEPS {
        let increment = a.dot(&s).dot(&a.t());
        let inc_max = increment.iter().fold(0.0_f64, |acc, v| acc.max(v.abs()));
        if !inc_max.is_finite() {
            break;
        }
        s += &increment;
        let s_max = s.iter().fold(0.0_f64, |acc, v| acc.max(v.abs()));
        if inc_max <= RELATIVE_TOL * (1.0 + s_max) {
            symmetrize(&mut s);
            return Ok(s);
        }
        a = a.dot(&a);
    }
    Err(StateSpaceError::LyapunovNotConverged { iterations: MAX_DOUBLING_STEPS })
}
