//! DFM parameterization: model space ↔ optimizer space ↔ state space.
//!
//! Purpose
//! -------
//! Hold the constrained, model-space parameters of a fitted DFM and provide
//! the three maps the estimator needs: `θ → DFMParams` (every optimizer
//! iterate), `DFMParams → θ` (start values) and `DFMParams → StateSpaceModel`
//! (filtering, forecasting, impulse responses).
//!
//! Mapping conventions
//! -------------------
//! - Loadings are unconstrained and copied verbatim.
//! - `σ²_i = softplus(θ) + VARIANCE_FLOOR`.
//! - Factor AR, `k = 1`: the `p` entries are PACF coordinates mapped by
//!   [`pacf_to_ar`]. `k > 1`: `p` row-major `k × k` blocks mapped by
//!   [`constrain_var`].
//! - Idiosyncratic AR: `q` PACF coordinates per series, mapped by
//!   [`pacf_to_ar`].
//!
//! State-space form
//! ----------------
//! ```text
//! T = blockdiag( companion(A_1..A_p), per-series companion(B_i1..B_iq) )
//! Z = [ Λ  0 … | I_N  0 … ]
//! R = [ I_k at F_t ; I_N at ε_t ],   Q = blockdiag(I_k, diag σ²)
//! ```
use ndarray::{Array1, Array2, ArrayView1, s};
use serde::Serialize;

use crate::{
    dfm::shape::DFMShape,
    optimization::{
        errors::{OptError, OptResult},
        loglik_optimizer::{Theta, validation::validate_theta},
        numerical_stability::transformations::{
            VARIANCE_FLOOR, ar_to_pacf, constrain_var, pacf_to_ar, safe_softplus,
            safe_softplus_inv, unconstrain_var,
        },
    },
    statespace::{StateSpaceModel, StateSpaceResult},
};

/// Model-space DFM parameters.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DFMParams {
    /// `Λ`, `N × k`.
    pub loadings: Array2<f64>,
    /// `A_1..A_p`, each `k × k`.
    pub factor_ar: Vec<Array2<f64>>,
    /// Row `i` holds `B_i1..B_iq`.
    pub idio_ar: Array2<f64>,
    /// `σ²_i > 0`.
    pub idio_var: Array1<f64>,
}

impl DFMParams {
    /// Map an unconstrained `θ` into model space.
    ///
    /// # Errors
    /// - [`OptError::ThetaLengthMismatch`] / [`OptError::InvalidThetaInput`]
    ///   for a malformed `θ`.
    /// - [`OptError::ConditionViolated`] if a VAR block cannot be factorized.
    pub fn from_theta(theta: &Theta, shape: &DFMShape) -> OptResult<Self> {
        validate_theta(theta, shape.theta_len())?;
        let DFMShape { n_vars, k_factors: k, factor_order: p, error_order: q } = *shape;
        let [_, off_var, off_fac, off_idio] = shape.offsets();

        let loadings = theta
            .slice(s![..off_var])
            .to_owned()
            .into_shape((n_vars, k))
            .map_err(|e| OptError::ConditionViolated { text: e.to_string() })?;
        let idio_var = theta.slice(s![off_var..off_fac]).mapv(|x| safe_softplus(x) + VARIANCE_FLOOR);

        let fac = theta.slice(s![off_fac..off_idio]);
        let factor_ar = if k == 1 {
            pacf_to_ar(&fac.to_vec()).into_iter().map(|a| Array2::from_elem((1, 1), a)).collect()
        } else {
            let blocks = (0..p)
                .map(|i| {
                    let raw = fac.slice(s![i * k * k..(i + 1) * k * k]).to_owned();
                    raw.into_shape((k, k))
                        .map_err(|e| OptError::ConditionViolated { text: e.to_string() })
                })
                .collect::<OptResult<Vec<_>>>()?;
            constrain_var(&blocks).ok_or_else(|| OptError::ConditionViolated {
                text: "factor VAR block is not factorizable".to_string(),
            })?
        };

        let mut idio_ar = Array2::zeros((n_vars, q));
        let idio = theta.slice(s![off_idio..]);
        for i in 0..n_vars {
            let coeffs = pacf_to_ar(&idio.slice(s![i * q..(i + 1) * q]).to_vec());
            idio_ar.row_mut(i).assign(&ArrayView1::from(&coeffs));
        }

        Ok(Self { loadings, factor_ar, idio_ar, idio_var })
    }

    /// Map back to an unconstrained `θ`.
    ///
    /// Returns `None` if some AR polynomial lies outside the stationary
    /// region the forward map can reach.
    pub fn to_theta(&self, shape: &DFMShape) -> Option<Theta> {
        let mut theta = Array1::zeros(shape.theta_len());
        let [_, off_var, off_fac, off_idio] = shape.offsets();
        let (k, q) = (shape.k_factors, shape.error_order);

        theta.slice_mut(s![..off_var]).assign(&Array1::from_iter(self.loadings.iter().copied()));
        theta
            .slice_mut(s![off_var..off_fac])
            .assign(&self.idio_var.mapv(|v| safe_softplus_inv((v - VARIANCE_FLOOR).max(1e-12))));

        let fac: Vec<f64> = if k == 1 {
            ar_to_pacf(&self.factor_ar.iter().map(|a| a[[0, 0]]).collect::<Vec<_>>())?
        } else {
            unconstrain_var(&self.factor_ar)?.iter().flat_map(|b| b.iter().copied()).collect()
        };
        theta.slice_mut(s![off_fac..off_idio]).assign(&Array1::from(fac));

        for (i, row) in self.idio_ar.outer_iter().enumerate() {
            let x = ar_to_pacf(&row.to_vec())?;
            let start = off_idio + i * q;
            theta.slice_mut(s![start..start + q]).assign(&Array1::from(x));
        }
        Some(theta)
    }

    /// Build the state-space system implied by these parameters.
    ///
    /// # Errors
    /// Propagates [`StateSpaceModel::new`] shape checks.
    pub fn state_space(&self, shape: &DFMShape) -> StateSpaceResult<StateSpaceModel> {
        let DFMShape { n_vars, k_factors: k, factor_order: p, error_order: q } = *shape;
        let m = shape.state_dim();
        let g = shape.n_shocks();

        let mut transition = Array2::zeros((m, m));
        for (lag, a) in self.factor_ar.iter().enumerate() {
            transition.slice_mut(s![..k, lag * k..(lag + 1) * k]).assign(a);
        }
        for j in k..k * p {
            transition[[j, j - k]] = 1.0;
        }
        for i in 0..n_vars {
            let head = shape.idio_state(i, 0);
            for lag in 0..q {
                transition[[head, shape.idio_state(i, lag)]] = self.idio_ar[[i, lag]];
                if lag > 0 {
                    transition[[shape.idio_state(i, lag), shape.idio_state(i, lag - 1)]] = 1.0;
                }
            }
        }

        let mut design = Array2::zeros((n_vars, m));
        design.slice_mut(s![.., ..k]).assign(&self.loadings);
        let mut selection = Array2::zeros((m, g));
        let mut state_cov = Array2::zeros((g, g));
        for j in 0..k {
            selection[[j, j]] = 1.0;
            state_cov[[j, j]] = 1.0;
        }
        for i in 0..n_vars {
            design[[i, shape.idio_state(i, 0)]] = 1.0;
            selection[[shape.idio_state(i, 0), k + i]] = 1.0;
            state_cov[[k + i, k + i]] = self.idio_var[i];
        }

        StateSpaceModel::new(transition, design, selection, state_cov)
    }
}
