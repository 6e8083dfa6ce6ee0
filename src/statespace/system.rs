//! Linear Gaussian state-space system.
//!
//! ```text
//! y_t     = Z α_t                      (observation, no measurement noise)
//! α_{t+1} = T α_t + R η_t,  η_t ~ N(0, Q)
//! ```
//!
//! `y_t` has `n` entries, `α_t` has `m`, `η_t` has `g`. The system is a
//! plain value: model code builds one per parameter vector and hands it to
//! the filter.
use ndarray::{Array1, Array2};

use crate::statespace::errors::{StateSpaceError, StateSpaceResult};

#[derive(Debug, Clone, PartialEq)]
pub struct StateSpaceModel {
    transition: Array2<f64>,
    design: Array2<f64>,
    selection: Array2<f64>,
    state_cov: Array2<f64>,
    rqr: Array2<f64>,
}

impl StateSpaceModel {
    /// Build a system from `T (m×m)`, `Z (n×m)`, `R (m×g)` and `Q (g×g)`.
    ///
    /// # Errors
    /// - [`StateSpaceError::DimensionMismatch`] when the shapes disagree.
    pub fn new(
        transition: Array2<f64>, design: Array2<f64>, selection: Array2<f64>,
        state_cov: Array2<f64>,
    ) -> StateSpaceResult<Self> {
        let m = transition.nrows();
        let g = state_cov.nrows();
        check_dim("transition", (m, m), transition.dim())?;
        check_dim("design", (design.nrows(), m), design.dim())?;
        check_dim("selection", (m, g), selection.dim())?;
        check_dim("state covariance", (g, g), state_cov.dim())?;
        let rqr = selection.dot(&state_cov).dot(&selection.t());
        Ok(Self { transition, design, selection, state_cov, rqr })
    }

    pub fn state_dim(&self) -> usize {
        self.transition.nrows()
    }

    pub fn obs_dim(&self) -> usize {
        self.design.nrows()
    }

    pub fn n_shocks(&self) -> usize {
        self.state_cov.nrows()
    }

    /// Transition matrix `T`.
    pub fn transition(&self) -> &Array2<f64> {
        &self.transition
    }

    /// Design matrix `Z`.
    pub fn design(&self) -> &Array2<f64> {
        &self.design
    }

    /// Selection matrix `R`.
    pub fn selection(&self) -> &Array2<f64> {
        &self.selection
    }

    /// Precomputed `R Q Rᵀ`.
    pub fn rqr(&self) -> &Array2<f64> {
        &self.rqr
    }

    /// Responses of `y` to a unit impulse in shock `shock` at horizons
    /// `0..=steps`: row `h` is `Z Tʰ R e_shock`.
    ///
    /// # Errors
    /// - [`StateSpaceError::ShockOutOfRange`] if `shock >= g`.
    pub fn impulse_responses(&self, shock: usize, steps: usize) -> StateSpaceResult<Array2<f64>> {
        let g = self.n_shocks();
        if shock >= g {
            return Err(StateSpaceError::ShockOutOfRange { index: shock, n_shocks: g });
        }
        let mut state: Array1<f64> = self.selection.column(shock).to_owned();
        let mut out = Array2::zeros((steps + 1, self.obs_dim()));
        for h in 0..=steps {
            out.row_mut(h).assign(&self.design.dot(&state));
            state = self.transition.dot(&state);
        }
        Ok(out)
    }

    /// Iterate `a ← T a` for `steps` periods and map each state through `Z`.
    /// Row `h` is the `(h + 1)`-step-ahead observation forecast.
    pub fn project(&self, start: &Array1<f64>, steps: usize) -> Array2<f64> {
        let mut state = start.clone();
        let mut out = Array2::zeros((steps, self.obs_dim()));
        for h in 0..steps {
            state = self.transition.dot(&state);
            out.row_mut(h).assign(&self.design.dot(&state));
        }
        out
    }
}

fn check_dim(
    what: &'static str, expected: (usize, usize), found: (usize, usize),
) -> StateSpaceResult<()> {
    if expected != found {
        return Err(StateSpaceError::DimensionMismatch { what, expected, found });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use ndarray::array;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover shape validation, the precomputed RQRᵀ, impulse
    // responses and forward projection on a scalar AR(1).
    // -------------------------------------------------------------------------

    fn ar1(phi: f64, sigma2: f64) -> StateSpaceModel {
        StateSpaceModel::new(array![[phi]], array![[1.0]], array![[1.0]], array![[sigma2]])
            .expect("valid AR(1) system")
    }

    #[test]
    // Purpose
    // -------
    // Mismatched shapes are rejected with the offending component named.
    //
    // Given
    // -----
    // - A 2×2 transition with a 1×1 design.
    //
    // Expect
    // ------
    // - `DimensionMismatch { what: "design", .. }`.
    fn new_rejects_mismatched_design() {
        let result = StateSpaceModel::new(
            Array2::eye(2),
            array![[1.0]],
            Array2::eye(2),
            Array2::eye(2),
        );
        assert!(matches!(
            result,
            Err(StateSpaceError::DimensionMismatch { what: "design", .. })
        ));
    }

    #[test]
    // Purpose
    // -------
    // AR(1) impulse responses decay geometrically.
    //
    // Given
    // -----
    // - φ = 0.5, unit shock, 3 steps.
    //
    // Expect
    // ------
    // - Responses 1, 0.5, 0.25, 0.125 and RQRᵀ = σ².
    fn impulse_responses_follow_powers_of_transition() {
        let ss = ar1(0.5, 2.0);
        let irf = ss.impulse_responses(0, 3).expect("shock 0 exists");

        assert_eq!(irf.dim(), (4, 1));
        for (h, expected) in [1.0, 0.5, 0.25, 0.125].iter().enumerate() {
            assert_abs_diff_eq!(irf[[h, 0]], *expected, epsilon = 1e-12);
        }
        assert_abs_diff_eq!(ss.rqr()[[0, 0]], 2.0, epsilon = 1e-12);
        assert!(ss.impulse_responses(1, 3).is_err());
    }

    #[test]
    // Purpose
    // -------
    // Projection applies T before each observation.
    //
    // Given
    // -----
    // - φ = 0.8 starting from a = 10, 2 steps.
    //
    // Expect
    // ------
    // - Forecasts 8 and 6.4.
    fn project_iterates_transition() {
        let out = ar1(0.8, 1.0).project(&array![10.0], 2);
        assert_abs_diff_eq!(out[[0, 0]], 8.0, epsilon = 1e-12);
        assert_abs_diff_eq!(out[[1, 0]], 6.4, epsilon = 1e-12);
    }
}
