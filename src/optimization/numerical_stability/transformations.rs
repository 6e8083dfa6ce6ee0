//! Numerical stability utilities.
//!
//! Safe implementations of the nonlinear maps that take unconstrained
//! optimizer coordinates into constrained model space:
//!
//! - [`safe_softplus`] / [`safe_softplus_inv`]: ℝ ↔ (0, ∞) for variances,
//!   guarded at `x > 20.0` to keep `f64` arithmetic well conditioned.
//! - [`pacf_to_ar`] / [`ar_to_pacf`]: ℝᵖ ↔ coefficients of a stationary
//!   univariate AR(p) via partial autocorrelations and Levinson–Durbin.
//! - [`constrain_var`] / [`unconstrain_var`]: unconstrained `k × k` blocks ↔
//!   coefficient matrices of a stationary VAR(p) with unit innovations, via
//!   multivariate partial autocorrelations. The map is onto the whole
//!   stationary region, not a norm ball inside it.
use nalgebra::DMatrix;
use ndarray::{Array2, s};

use crate::statespace::{
    linalg::{from_dmatrix, to_dmatrix},
    lyapunov::solve_discrete_lyapunov,
};

/// Safety margin keeping AR/VAR roots strictly inside the unit circle.
pub const STATIONARITY_MARGIN: f64 = 1e-6;

/// Floor added to every variance produced by [`safe_softplus`] in model code.
pub const VARIANCE_FLOOR: f64 = 1e-8;

/// Numerically stable softplus: `softplus(x) = ln(1 + exp(x))`.
///
/// For `x > 20` the result equals `x` to `f64` precision; below that
/// `ln1p(exp(x))` is exact enough and cannot overflow.
pub fn safe_softplus(x: f64) -> f64 {
    if x > 20.0 { x } else { x.exp().ln_1p() }
}

/// Stable inverse of softplus on `(0, ∞)`: `t = ln(exp(x) - 1)`.
///
/// `x` must be finite and `> 0`.
pub fn safe_softplus_inv(x: f64) -> f64 {
    if x > 20.0 { x } else { x.exp_m1().ln() }
}

/// Map unconstrained values to the coefficients of a stationary AR(p).
///
/// Each entry becomes a partial autocorrelation
/// `r_k = (1 − STATIONARITY_MARGIN)·tanh(x_k)` and the Levinson–Durbin
/// recursion turns the PACF sequence into `φ_1..φ_p` of
/// `y_t = φ_1 y_{t−1} + … + φ_p y_{t−p} + e_t`.
pub fn pacf_to_ar(x: &[f64]) -> Vec<f64> {
    let p = x.len();
    let mut phi = vec![0.0; p];
    let mut prev = vec![0.0; p];
    for k in 0..p {
        let r = (1.0 - STATIONARITY_MARGIN) * x[k].tanh();
        prev[..k].copy_from_slice(&phi[..k]);
        phi[k] = r;
        for j in 0..k {
            phi[j] = prev[j] - r * prev[k - 1 - j];
        }
    }
    phi
}

/// Inverse of [`pacf_to_ar`].
///
/// Runs Levinson–Durbin backwards to recover the partial autocorrelations.
/// Returns `None` when `phi` is not stationary (some `|r_k| ≥ 1 − margin`),
/// so callers can fall back to a neutral start.
pub fn ar_to_pacf(phi: &[f64]) -> Option<Vec<f64>> {
    let p = phi.len();
    let bound = 1.0 - STATIONARITY_MARGIN;
    let mut cur = phi.to_vec();
    let mut x = vec![0.0; p];
    for k in (0..p).rev() {
        let r = cur[k];
        if !r.is_finite() || r.abs() >= bound {
            return None;
        }
        x[k] = (r / bound).atanh();
        let denom = 1.0 - r * r;
        let prev: Vec<f64> = (0..k).map(|j| (cur[j] + r * cur[k - 1 - j]) / denom).collect();
        cur[..k].copy_from_slice(&prev);
    }
    Some(x)
}

/// Map `p` unconstrained `k × k` blocks to the coefficients of a stationary
/// VAR(p) with innovation covariance `I_k`.
///
/// Each block `B` first becomes a partial autocorrelation matrix
/// `P = (1 − STATIONARITY_MARGIN)·L⁻¹B` with `LLᵀ = I + BBᵀ`, so `‖P‖₂ < 1`.
/// The Whittle recursion (Ansley and Kohn, 1986) then turns `P_1..P_p` into
/// `A_1..A_p` of a process with `Γ(0) = I`, and the similarity transform
/// `A_i ↦ L_p⁻¹ A_i L_p`, where `L_p L_pᵀ` is the resulting innovation
/// covariance, rescales that covariance to `I_k`. Every stationary VAR(p)
/// with unit innovations lies in the image.
///
/// Returns `None` if a factorization fails (only for non-finite input).
pub fn constrain_var(blocks: &[Array2<f64>]) -> Option<Vec<Array2<f64>>> {
    let pacf = blocks
        .iter()
        .map(|b| block_to_pacf(&to_dmatrix(b.view())))
        .collect::<Option<Vec<_>>>()?;
    let coeffs = pacf_to_var(&pacf)?;
    Some(coeffs.iter().map(from_dmatrix).collect())
}

/// Inverse of [`constrain_var`].
///
/// Recovers the autocovariances `Γ(0..=p)` of the unit-innovation VAR from
/// the Lyapunov equation of its companion form, runs the Whittle recursion
/// forwards to get `P_1..P_p` and undoes the block map. Returns `None` when
/// `coeffs` is not stationary or some `‖P_i‖₂ ≥ 1 − STATIONARITY_MARGIN`.
pub fn unconstrain_var(coeffs: &[Array2<f64>]) -> Option<Vec<Array2<f64>>> {
    let coeffs: Vec<DMatrix<f64>> = coeffs.iter().map(|a| to_dmatrix(a.view())).collect();
    let pacf = var_to_pacf(&coeffs)?;
    pacf.iter().map(|p| pacf_to_block(p).map(|b| from_dmatrix(&b))).collect()
}

fn block_to_pacf(b: &DMatrix<f64>) -> Option<DMatrix<f64>> {
    let k = b.nrows();
    let gram = DMatrix::<f64>::identity(k, k) + b * b.transpose();
    let p = gram.cholesky()?.l().solve_lower_triangular(b)?;
    Some(p.scale(1.0 - STATIONARITY_MARGIN))
}

fn pacf_to_block(p: &DMatrix<f64>) -> Option<DMatrix<f64>> {
    let k = p.nrows();
    let p = p.scale(1.0 / (1.0 - STATIONARITY_MARGIN));
    // I − PPᵀ = L⁻¹L⁻ᵀ, so its Cholesky factor is L⁻¹ and B = L P.
    let s = DMatrix::<f64>::identity(k, k) - &p * p.transpose();
    s.cholesky()?.l().solve_lower_triangular(&p)
}

/// Order-`s + 1` forward and backward predictor coefficients from the
/// order-`s` ones and the new last-lag matrices `f`, `b`.
fn extend_predictors(
    fwd: &[DMatrix<f64>], bwd: &[DMatrix<f64>], f: DMatrix<f64>, b: DMatrix<f64>,
) -> (Vec<DMatrix<f64>>, Vec<DMatrix<f64>>) {
    let s = fwd.len();
    let mut next_fwd: Vec<DMatrix<f64>> =
        (0..s).map(|j| &fwd[j] - &f * &bwd[s - 1 - j]).collect();
    let mut next_bwd: Vec<DMatrix<f64>> =
        (0..s).map(|j| &bwd[j] - &b * &fwd[s - 1 - j]).collect();
    next_fwd.push(f);
    next_bwd.push(b);
    (next_fwd, next_bwd)
}

fn pacf_to_var(pacf: &[DMatrix<f64>]) -> Option<Vec<DMatrix<f64>>> {
    let Some(first) = pacf.first() else {
        return Some(Vec::new());
    };
    let k = first.nrows();
    let eye = DMatrix::<f64>::identity(k, k);
    // Cholesky factors of the forward / backward prediction-error covariances.
    let mut l_fwd = eye.clone();
    let mut l_bwd = eye.clone();
    let mut fwd: Vec<DMatrix<f64>> = Vec::with_capacity(pacf.len());
    let mut bwd: Vec<DMatrix<f64>> = Vec::with_capacity(pacf.len());
    for p in pacf {
        let l_fwd_inv = l_fwd.clone().try_inverse()?;
        let l_bwd_inv = l_bwd.clone().try_inverse()?;
        let f = &l_fwd * p * &l_bwd_inv;
        let b = &l_bwd * p.transpose() * &l_fwd_inv;
        (fwd, bwd) = extend_predictors(&fwd, &bwd, f, b);
        l_fwd = l_fwd * (&eye - p * p.transpose()).cholesky()?.l();
        l_bwd = l_bwd * (&eye - p.transpose() * p).cholesky()?.l();
    }
    let l_inv = l_fwd.clone().try_inverse()?;
    Some(fwd.iter().map(|a| &l_inv * a * &l_fwd).collect())
}

fn var_to_pacf(coeffs: &[DMatrix<f64>]) -> Option<Vec<DMatrix<f64>>> {
    if coeffs.is_empty() {
        return Some(Vec::new());
    }
    let gamma = var_autocovariances(coeffs)?;
    let mut v_fwd = gamma[0].clone();
    let mut v_bwd = gamma[0].clone();
    let mut fwd: Vec<DMatrix<f64>> = Vec::with_capacity(coeffs.len());
    let mut bwd: Vec<DMatrix<f64>> = Vec::with_capacity(coeffs.len());
    let mut pacf = Vec::with_capacity(coeffs.len());
    for s in 0..coeffs.len() {
        // Δ = Γ(s + 1) − Σ_j Φ_{s,j} Γ(s + 1 − j)
        let mut delta = gamma[s + 1].clone();
        for (j, phi) in fwd.iter().enumerate() {
            delta -= phi * &gamma[s - j];
        }
        let chol_fwd = v_fwd.clone().cholesky()?;
        let chol_bwd = v_bwd.clone().cholesky()?;
        // P = L⁻¹ Δ L*⁻ᵀ
        let left = chol_fwd.l().solve_lower_triangular(&delta)?;
        let p = chol_bwd.l().solve_lower_triangular(&left.transpose())?.transpose();
        if !p.iter().all(|v| v.is_finite()) {
            return None;
        }
        let f = chol_bwd.solve(&delta.transpose()).transpose();
        let b = chol_fwd.solve(&delta).transpose();
        v_fwd -= &f * delta.transpose();
        v_bwd -= &b * &delta;
        (fwd, bwd) = extend_predictors(&fwd, &bwd, f, b);
        pacf.push(p);
    }
    Some(pacf)
}

/// `Γ(0..=p)`, `Γ(h) = E[y_t y_{t−h}ᵀ]`, of the VAR with unit innovations.
fn var_autocovariances(coeffs: &[DMatrix<f64>]) -> Option<Vec<DMatrix<f64>>> {
    let (k, order) = (coeffs[0].nrows(), coeffs.len());
    let m = k * order;
    let mut companion = Array2::zeros((m, m));
    for (lag, a) in coeffs.iter().enumerate() {
        companion.slice_mut(s![..k, lag * k..(lag + 1) * k]).assign(&from_dmatrix(a));
    }
    for j in k..m {
        companion[[j, j - k]] = 1.0;
    }
    let mut noise = Array2::zeros((m, m));
    for j in 0..k {
        noise[[j, j]] = 1.0;
    }
    let stationary = solve_discrete_lyapunov(&companion, &noise).ok()?;
    let mut gamma: Vec<DMatrix<f64>> = (0..order)
        .map(|lag| to_dmatrix(stationary.slice(s![..k, lag * k..(lag + 1) * k])))
        .collect();
    let last = coeffs
        .iter()
        .enumerate()
        .fold(DMatrix::<f64>::zeros(k, k), |acc, (i, a)| acc + a * &gamma[order - 1 - i]);
    gamma.push(last);
    Some(gamma)
}
