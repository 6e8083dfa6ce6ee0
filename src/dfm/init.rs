//! Start values for DFM estimation.
//!
//! Purpose
//! -------
//! Give the optimizer a starting `θ` close to a sensible optimum so the
//! local search has a chance: the likelihood surface of a factor model is
//! flat in many directions and has sign/rotation symmetries.
//!
//! Key behaviors
//! -------------
//! - Principal components: with `Y = U S Vᵀ` (thin SVD of the `T × N`
//!   working panel) the `k` leading components give factors
//!   `F = √T · U_k` (unit sample variance) and loadings
//!   `Λ = V_k S_k / √T`, so `Y ≈ F Λᵀ`.
//! - Factor VAR(p) and per-series AR(q) coefficients come from OLS on the
//!   factor path and the residual panel `Y − F Λᵀ`.
//! - Idiosyncratic variances start at the AR residual variance, floored at
//!   a small fraction of each series' variance.
//!
//! Invariants & assumptions
//! ------------------------
//! - Never fails: degenerate regressions fall back to zero coefficients, and
//!   AR estimates outside the stationary region are replaced by zeros.
use nalgebra::{DMatrix, DVector};
use ndarray::{Array1, Array2, ArrayView2, Axis};
use tracing::debug;

use crate::{
    dfm::{params::DFMParams, shape::DFMShape},
    optimization::loglik_optimizer::Theta,
    statespace::linalg::{solve_least_squares, to_dmatrix},
};

/// Start variances never fall below this share of the series variance.
const MIN_START_VARIANCE_SHARE: f64 = 1e-2;

/// Starting `θ` for `y` (`T × N`, already demeaned/standardized).
pub fn start_values(y: ArrayView2<f64>, shape: &DFMShape) -> Theta {
    let params = start_params(y, shape);
    if let Some(theta) = params.to_theta(shape) {
        return theta;
    }
    debug!("start AR coefficients outside the stationary region, using zeros");
    let neutral = DFMParams {
        factor_ar: vec![Array2::zeros((shape.k_factors, shape.k_factors)); shape.factor_order],
        idio_ar: Array2::zeros((shape.n_vars, shape.error_order)),
        ..params
    };
    neutral.to_theta(shape).unwrap_or_else(|| Array1::zeros(shape.theta_len()))
}

/// Model-space start values; AR blocks may be non-stationary.
pub fn start_params(y: ArrayView2<f64>, shape: &DFMShape) -> DFMParams {
    let DFMShape { n_vars, k_factors: k, factor_order: p, error_order: q } = *shape;
    let (factors, loadings) = principal_components(y, k);
    let factor_ar = fit_var(factors.view(), p);

    let resid = &y - &factors.dot(&loadings.t());
    let mut idio_ar = Array2::zeros((n_vars, q));
    let mut idio_var = Array1::zeros(n_vars);
    for (i, (e, y_i)) in resid.axis_iter(Axis(1)).zip(y.axis_iter(Axis(1))).enumerate() {
        let e = e.to_vec();
        let (phi, resid_var) = fit_ar(&e, q);
        let floor = MIN_START_VARIANCE_SHARE * sample_variance(&y_i.to_vec()).max(f64::EPSILON);
        idio_ar.row_mut(i).assign(&Array1::from(phi));
        idio_var[i] = resid_var.max(floor);
    }
    DFMParams { loadings, factor_ar, idio_ar, idio_var }
}

// ---- Helper methods ----

/// `(F, Λ)` from the `k` leading principal components.
fn principal_components(y: ArrayView2<f64>, k: usize) -> (Array2<f64>, Array2<f64>) {
    let (n_obs, n_vars) = y.dim();
    let mut factors = Array2::zeros((n_obs, k));
    let mut loadings = Array2::zeros((n_vars, k));
    let svd = to_dmatrix(y).svd(true, true);
    let (Some(u), Some(v_t)) = (svd.u.as_ref(), svd.v_t.as_ref()) else {
        return (factors, loadings);
    };
    let mut order: Vec<usize> = (0..svd.singular_values.len()).collect();
    order.sort_by(|&a, &b| svd.singular_values[b].total_cmp(&svd.singular_values[a]));
    let root_t = (n_obs as f64).sqrt();
    for (j, &idx) in order.iter().take(k).enumerate() {
        let sv = svd.singular_values[idx];
        for t in 0..n_obs {
            factors[[t, j]] = u[(t, idx)] * root_t;
        }
        for i in 0..n_vars {
            loadings[[i, j]] = v_t[(idx, i)] * sv / root_t;
        }
    }
    (factors, loadings)
}

/// OLS VAR(p) without intercept; zeros when the regression is degenerate.
fn fit_var(factors: ArrayView2<f64>, p: usize) -> Vec<Array2<f64>> {
    let (n_obs, k) = factors.dim();
    let mut blocks = vec![Array2::zeros((k, k)); p];
    if n_obs <= p {
        return blocks;
    }
    let rows = n_obs - p;
    let x = DMatrix::from_fn(rows, k * p, |r, c| {
        let (lag, j) = (c / k + 1, c % k);
        factors[[r + p - lag, j]]
    });
    for target in 0..k {
        let y = DVector::from_fn(rows, |r, _| factors[[r + p, target]]);
        if let Some(beta) = solve_least_squares(&x, &y) {
            for (lag, block) in blocks.iter_mut().enumerate() {
                for j in 0..k {
                    block[[target, j]] = beta[lag * k + j];
                }
            }
        }
    }
    blocks
}

/// OLS AR(q) without intercept: `(φ, residual variance)`.
pub(crate) fn fit_ar(e: &[f64], q: usize) -> (Vec<f64>, f64) {
    let n = e.len();
    if n <= q + 1 {
        return (vec![0.0; q], sample_variance(e));
    }
    let rows = n - q;
    let x = DMatrix::from_fn(rows, q, |r, c| e[r + q - c - 1]);
    let y = DVector::from_fn(rows, |r, _| e[r + q]);
    match solve_least_squares(&x, &y) {
        Some(beta) => {
            let resid = &y - &x * &beta;
            (beta.iter().copied().collect(), resid.norm_squared() / rows as f64)
        }
        None => (vec![0.0; q], sample_variance(e)),
    }
}

pub(crate) fn sample_variance(x: &[f64]) -> f64 {
    let n = x.len() as f64;
    if x.is_empty() {
        return 0.0;
    }
    let mean = x.iter().sum::<f64>() / n;
    x.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n
}
