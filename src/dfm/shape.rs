//! Dimensions of a DFM and the layouts derived from them.
//!
//! `n_vars = N`, `k_factors = k`, `factor_order = p`, `error_order = q`.
//!
//! State vector (`m = k·p + N·q`):
//! ```text
//! α_t = [F_t, F_{t−1}, …, F_{t−p+1}, ε_t, ε_{t−1}, …, ε_{t−q+1}]
//! ```
//! Shocks (`g = k + N`): `[u_t, v_t]`.
//!
//! Unconstrained parameter vector (`θ`):
//! ```text
//! [ Λ row-major (N·k) | softplus⁻¹ σ² (N) | factor AR (p·k·k) | idio AR (N·q) ]
//! ```
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DFMShape {
    pub n_vars: usize,
    pub k_factors: usize,
    pub factor_order: usize,
    pub error_order: usize,
}

impl DFMShape {
    pub fn state_dim(&self) -> usize {
        self.k_factors * self.factor_order + self.n_vars * self.error_order
    }

    pub fn n_shocks(&self) -> usize {
        self.k_factors + self.n_vars
    }

    pub fn n_loadings(&self) -> usize {
        self.n_vars * self.k_factors
    }

    pub fn n_factor_ar(&self) -> usize {
        self.factor_order * self.k_factors * self.k_factors
    }

    pub fn n_idio_ar(&self) -> usize {
        self.n_vars * self.error_order
    }

    /// Length of `θ`; also the parameter count used by information criteria.
    pub fn theta_len(&self) -> usize {
        self.n_loadings() + self.n_vars + self.n_factor_ar() + self.n_idio_ar()
    }

    /// Offsets of the four `θ` blocks: loadings, variances, factor AR, idio AR.
    pub(crate) fn offsets(&self) -> [usize; 4] {
        let var = self.n_loadings();
        let fac = var + self.n_vars;
        let idio = fac + self.n_factor_ar();
        [0, var, fac, idio]
    }

    /// State index of `ε_{t−lag}` for series `i`.
    pub(crate) fn idio_state(&self, series: usize, lag: usize) -> usize {
        self.k_factors * self.factor_order + lag * self.n_vars + series
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    // Purpose
    // -------
    // Derived sizes and offsets are consistent.
    //
    // Given
    // -----
    // - N = 3, k = 2, p = 2, q = 1.
    //
    // Expect
    // ------
    // - m = 7, g = 5, θ = 6 + 3 + 8 + 3 = 20, offsets [0, 6, 9, 17].
    fn derived_sizes_are_consistent() {
        let shape = DFMShape { n_vars: 3, k_factors: 2, factor_order: 2, error_order: 1 };

        assert_eq!(shape.state_dim(), 7);
        assert_eq!(shape.n_shocks(), 5);
        assert_eq!(shape.theta_len(), 20);
        assert_eq!(shape.offsets(), [0, 6, 9, 17]);
        assert_eq!(shape.idio_state(2, 0), 6);
    }
}
