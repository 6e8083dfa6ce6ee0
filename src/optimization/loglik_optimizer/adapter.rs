//! Adapter that exposes a user `LogLikelihood` as an `argmin` problem.
//!
//! Maximizing `ℓ(θ)` becomes minimizing the cost `c(θ) = -ℓ(θ)`. Analytic
//! gradients are negated; when a model has none, the **cost** closure is
//! finite-differenced so no sign flip is needed in that branch.
use std::cell::RefCell;

use crate::optimization::{
    errors::OptError,
    loglik_optimizer::{
        traits::LogLikelihood,
        types::{Cost, Grad, Theta},
        validation::validate_grad,
    },
};
use argmin::core::{CostFunction, Error, Gradient};
use finitediff::FiniteDiff;

/// Bridges a user `LogLikelihood` to `argmin`'s `CostFunction` and `Gradient`.
#[derive(Debug, Clone)]
pub struct ArgMinAdapter<'a, F: LogLikelihood> {
    pub f: &'a F,
    pub data: &'a F::Data,
}

impl<'a, F: LogLikelihood> ArgMinAdapter<'a, F> {
    pub fn new(f: &'a F, data: &'a F::Data) -> Self {
        Self { f, data }
    }
}

impl<F: LogLikelihood> CostFunction for ArgMinAdapter<'_, F> {
    type Param = Theta;
    type Output = Cost;

    /// Evaluate `c(θ) = -ℓ(θ)`, rejecting non-finite log-likelihoods.
    fn cost(&self, theta: &Self::Param) -> Result<Self::Output, Error> {
        let output = self.f.value(theta, self.data)?;
        if !output.is_finite() {
            return Err((OptError::NonFiniteCost { value: output }).into());
        }
        Ok(-output)
    }
}

impl<F: LogLikelihood> Gradient for ArgMinAdapter<'_, F> {
    type Param = Theta;
    type Gradient = Grad;

    /// Gradient of the cost at `θ`.
    ///
    /// Uses the model's analytic `∇ℓ` when available (negated). Otherwise
    /// central differences of the cost, falling back to forward differences
    /// when a central stencil point fails to evaluate or yields a non-finite
    /// gradient.
    ///
    /// # Errors
    /// - Model errors other than `GradientNotImplemented`.
    /// - The first cost-evaluation error captured during the forward pass.
    /// - Dimension / finiteness violations from `validate_grad`.
    fn gradient(&self, theta: &Self::Param) -> Result<Self::Gradient, Error> {
        match self.f.grad(theta, self.data) {
            Ok(g) => {
                validate_grad(&g, theta.len())?;
                Ok(-g)
            }
            Err(OptError::GradientNotImplemented) => self.fd_gradient(theta),
            Err(e) => Err(e.into()),
        }
    }
}

impl<F: LogLikelihood> ArgMinAdapter<'_, F> {
    fn fd_gradient(&self, theta: &Theta) -> Result<Grad, Error> {
        // The finitediff closure must return f64, so the first failure is parked
        // here and replaced by NaN.
        let closure_err: RefCell<Option<Error>> = RefCell::new(None);
        let cost_func = |t: &Theta| -> f64 {
            self.cost(t).unwrap_or_else(|e| {
                closure_err.borrow_mut().get_or_insert(e);
                f64::NAN
            })
        };

        let central = theta.central_diff(&cost_func);
        let central_failed = closure_err.replace(None).is_some();
        if !central_failed && validate_grad(&central, theta.len()).is_ok() {
            return Ok(central);
        }

        let forward = theta.forward_diff(&cost_func);
        if let Some(err) = closure_err.take() {
            return Err(err);
        }
        validate_grad(&forward, theta.len())?;
        Ok(forward)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::optimization::errors::OptResult;
    use approx::assert_abs_diff_eq;
    use ndarray::array;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover the sign conventions of the adapter and the
    // finite-difference fallback when no analytic gradient exists.
    // -------------------------------------------------------------------------

    struct Quadratic;

    impl LogLikelihood for Quadratic {
        type Data = ();

        fn value(&self, theta: &Theta, _data: &()) -> OptResult<f64> {
            Ok(-(theta[0] - 1.0).powi(2) - 2.0 * (theta[1] + 0.5).powi(2))
        }

        fn check(&self, _theta: &Theta, _data: &()) -> OptResult<()> {
            Ok(())
        }
    }

    #[test]
    // Purpose
    // -------
    // The cost is the negated log-likelihood.
    //
    // Given
    // -----
    // - `ℓ(θ) = -(θ₀ - 1)² - 2(θ₁ + 0.5)²` evaluated at `θ = (0, 0)`.
    //
    // Expect
    // ------
    // - `c(θ) = 1 + 0.5 = 1.5`.
    fn cost_is_negated_loglik() {
        // Arrange
        let adapter = ArgMinAdapter::new(&Quadratic, &());

        // Act
        let cost = adapter.cost(&array![0.0, 0.0]).expect("finite cost");

        // Assert
        assert_abs_diff_eq!(cost, 1.5, epsilon = 1e-12);
    }

    #[test]
    // Purpose
    // -------
    // Without an analytic gradient, the FD gradient of the cost is returned.
    //
    // Given
    // -----
    // - The quadratic above at `θ = (0, 0)`; `∇c = (-2, 2)`.
    //
    // Expect
    // ------
    // - FD gradient within 1e-5 of the analytic cost gradient.
    fn gradient_falls_back_to_finite_differences() {
        // Arrange
        let adapter = ArgMinAdapter::new(&Quadratic, &());

        // Act
        let g = adapter.gradient(&array![0.0, 0.0]).expect("FD gradient");

        // Assert
        assert_abs_diff_eq!(g[0], -2.0, epsilon = 1e-5);
        assert_abs_diff_eq!(g[1], 2.0, epsilon = 1e-5);
    }
}
