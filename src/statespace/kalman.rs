//! Kalman filter for exact Gaussian likelihood evaluation.
//!
//! Runs the prediction-error decomposition over a `T × n` panel of
//! (already demeaned) observations. Two entry points share one recursion:
//! [`loglikelihood`] keeps only the running sum and is what the optimizer
//! calls; [`kalman_filter`] also stores the one-step-ahead states,
//! covariances and innovations needed for fitted values and smoothing.
//!
//! Per step, with `a_t = a_{t|t-1}` and `P_t = P_{t|t-1}`:
//! ```text
//! v_t = y_t − Z a_t          F_t = Z P_t Zᵀ
//! ℓ  += −½ (n ln 2π + ln|F_t| + v_tᵀ F_t⁻¹ v_t)
//! a_{t|t} = a_t + P_t Zᵀ F_t⁻¹ v_t
//! P_{t|t} = P_t − P_t Zᵀ F_t⁻¹ Z P_t
//! a_{t+1} = T a_{t|t}        P_{t+1} = T P_{t|t} Tᵀ + R Q Rᵀ
//! ```
use ndarray::{Array1, Array2, ArrayView2};
use std::f64::consts::PI;

use crate::statespace::{
    errors::{StateSpaceError, StateSpaceResult},
    linalg::{spd_inverse_logdet, symmetrize},
    lyapunov::solve_discrete_lyapunov,
    system::StateSpaceModel,
};

/// Mean and covariance of `α_1`.
#[derive(Debug, Clone, PartialEq)]
pub struct InitialState {
    pub mean: Array1<f64>,
    pub cov: Array2<f64>,
}

impl InitialState {
    /// Zero mean and the unconditional covariance of a stationary system.
    ///
    /// # Errors
    /// - [`StateSpaceError::LyapunovNotConverged`] for a non-stable `T`.
    pub fn stationary(ss: &StateSpaceModel) -> StateSpaceResult<Self> {
        let cov = solve_discrete_lyapunov(ss.transition(), ss.rqr())?;
        Ok(Self { mean: Array1::zeros(ss.state_dim()), cov })
    }
}

/// Everything the smoother and the fitted-value computations need.
#[derive(Debug, Clone, PartialEq)]
pub struct KalmanOutput {
    pub loglik: f64,
    /// `a_{t|t-1}`, one row per period.
    pub predicted_states: Array2<f64>,
    /// `P_{t|t-1}` per period.
    pub predicted_covs: Vec<Array2<f64>>,
    /// `v_t = y_t − Z a_{t|t-1}`, one row per period.
    pub innovations: Array2<f64>,
    /// `F_t⁻¹` per period.
    pub innovation_inv: Vec<Array2<f64>>,
    /// `a_{T|T}` after the last observation.
    pub filtered_state: Array1<f64>,
    /// `P_{T|T}` after the last observation.
    pub filtered_cov: Array2<f64>,
}

impl KalmanOutput {
    /// One-step-ahead predictions `Z a_{t|t-1}` (`T × n`).
    pub fn one_step_predictions(&self, ss: &StateSpaceModel) -> Array2<f64> {
        self.predicted_states.dot(&ss.design().t())
    }
}

/// Gaussian log-likelihood of `y` (rows are periods) under `ss`.
///
/// # Errors
/// - [`StateSpaceError::DimensionMismatch`] if `y` has the wrong width.
/// - [`StateSpaceError::NotPositiveDefinite`] if some `F_t` is singular.
/// - [`StateSpaceError::NonFiniteState`] if the recursion blows up.
pub fn loglikelihood(
    ss: &StateSpaceModel, y: ArrayView2<f64>, init: &InitialState,
) -> StateSpaceResult<f64> {
    let mut sink = NoStorage;
    let (loglik, _, _) = run_filter(ss, y, init, &mut sink)?;
    Ok(loglik)
}

/// Full filter pass storing per-period quantities.
///
/// # Errors
/// Same as [`loglikelihood`].
pub fn kalman_filter(
    ss: &StateSpaceModel, y: ArrayView2<f64>, init: &InitialState,
) -> StateSpaceResult<KalmanOutput> {
    let n_periods = y.nrows();
    let mut store = FullStorage {
        predicted_states: Array2::zeros((n_periods, ss.state_dim())),
        predicted_covs: Vec::with_capacity(n_periods),
        innovations: Array2::zeros((n_periods, ss.obs_dim())),
        innovation_inv: Vec::with_capacity(n_periods),
    };
    let (loglik, filtered_state, filtered_cov) = run_filter(ss, y, init, &mut store)?;
    Ok(KalmanOutput {
        loglik,
        predicted_states: store.predicted_states,
        predicted_covs: store.predicted_covs,
        innovations: store.innovations,
        innovation_inv: store.innovation_inv,
        filtered_state,
        filtered_cov,
    })
}

// ---- Helper methods ----

trait StepSink {
    fn record(
        &mut self, t: usize, a: &Array1<f64>, p: &Array2<f64>, v: &Array1<f64>,
        f_inv: &Array2<f64>,
    );
}

struct NoStorage;

impl StepSink for NoStorage {
    fn record(&mut self, _: usize, _: &Array1<f64>, _: &Array2<f64>, _: &Array1<f64>, _: &Array2<f64>) {
    }
}

struct FullStorage {
    predicted_states: Array2<f64>,
    predicted_covs: Vec<Array2<f64>>,
    innovations: Array2<f64>,
    innovation_inv: Vec<Array2<f64>>,
}

impl StepSink for FullStorage {
    fn record(
        &mut self, t: usize, a: &Array1<f64>, p: &Array2<f64>, v: &Array1<f64>,
        f_inv: &Array2<f64>,
    ) {
        self.predicted_states.row_mut(t).assign(a);
        self.predicted_covs.push(p.clone());
        self.innovations.row_mut(t).assign(v);
        self.innovation_inv.push(f_inv.clone());
    }
}

fn run_filter<S: StepSink>(
    ss: &StateSpaceModel, y: ArrayView2<f64>, init: &InitialState, sink: &mut S,
) -> StateSpaceResult<(f64, Array1<f64>, Array2<f64>)> {
    let n = ss.obs_dim();
    if y.ncols() != n {
        return Err(StateSpaceError::DimensionMismatch {
            what: "observations",
            expected: (y.nrows(), n),
            found: y.dim(),
        });
    }
    let z = ss.design();
    let t_mat = ss.transition();
    let log_2pi = (2.0 * PI).ln();

    let mut a = init.mean.clone();
    let mut p = init.cov.clone();
    let mut a_filt = a.clone();
    let mut p_filt = p.clone();
    let mut loglik = 0.0;

    for (t, y_t) in y.outer_iter().enumerate() {
        let v = &y_t - &z.dot(&a);
        let pzt = p.dot(&z.t());
        let mut f = z.dot(&pzt);
        symmetrize(&mut f);
        let (f_inv, logdet) =
            spd_inverse_logdet(f.view()).ok_or(StateSpaceError::NotPositiveDefinite { t })?;
        let f_inv_v = f_inv.dot(&v);
        loglik -= 0.5 * (n as f64 * log_2pi + logdet + v.dot(&f_inv_v));
        sink.record(t, &a, &p, &v, &f_inv);

        a_filt = &a + &pzt.dot(&f_inv_v);
        p_filt = &p - &pzt.dot(&f_inv).dot(&pzt.t());
        symmetrize(&mut p_filt);

        a = t_mat.dot(&a_filt);
        p = t_mat.dot(&p_filt).dot(&t_mat.t()) + ss.rqr();
        symmetrize(&mut p);

        if !loglik.is_finite() || a.iter().any(|x| !x.is_finite()) {
            return Err(StateSpaceError::NonFiniteState { t });
        }
    }
    Ok((loglik, a_filt, p_filt))
}
