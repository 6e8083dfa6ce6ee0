//! Fixed-interval state smoother (Durbin–Koopman form).
//!
//! Backward pass over the stored filter output:
//! ```text
//! K_t = T P_t Zᵀ F_t⁻¹,   L_t = T − K_t Z
//! r_{t−1} = Zᵀ F_t⁻¹ v_t + L_tᵀ r_t,   r_T = 0
//! α̂_t = a_t + P_t r_{t−1}
//! ```
//! Only `F_t` is ever inverted (in the filter); state covariances never are,
//! which keeps the pass well defined when `P_t` is singular (lagged states).
use ndarray::{Array1, Array2};

use crate::statespace::{
    errors::{StateSpaceError, StateSpaceResult},
    kalman::KalmanOutput,
    system::StateSpaceModel,
};

/// Smoothed states `E[α_t | y_1..y_T]`, one row per period.
///
/// # Errors
/// - [`StateSpaceError::DimensionMismatch`] if `filtered` does not come from
///   a system of the same dimensions.
/// - [`StateSpaceError::NonFiniteState`] if the backward recursion blows up.
pub fn smooth_states(
    ss: &StateSpaceModel, filtered: &KalmanOutput,
) -> StateSpaceResult<Array2<f64>> {
    let (n_periods, m) = filtered.predicted_states.dim();
    if m != ss.state_dim() || filtered.predicted_covs.len() != n_periods {
        return Err(StateSpaceError::DimensionMismatch {
            what: "filter output",
            expected: (n_periods, ss.state_dim()),
            found: (filtered.predicted_covs.len(), m),
        });
    }
    let z = ss.design();
    let t_mat = ss.transition();
    let mut smoothed = Array2::zeros((n_periods, m));
    let mut r: Array1<f64> = Array1::zeros(m);

    for t in (0..n_periods).rev() {
        let p = &filtered.predicted_covs[t];
        let f_inv = &filtered.innovation_inv[t];
        let v = filtered.innovations.row(t);

        let gain = t_mat.dot(&p.dot(&z.t())).dot(f_inv);
        let l = t_mat - &gain.dot(z);
        r = z.t().dot(&f_inv.dot(&v)) + l.t().dot(&r);

        let alpha = &filtered.predicted_states.row(t) + &p.dot(&r);
        if alpha.iter().any(|x| !x.is_finite()) {
            return Err(StateSpaceError::NonFiniteState { t });
        }
        smoothed.row_mut(t).assign(&alpha);
    }
    Ok(smoothed)
}
