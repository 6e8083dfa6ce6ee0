//! High-level entry point for maximizing a user-provided `LogLikelihood`.
//!
//! Selects an L-BFGS solver with either Hager–Zhang or More–Thuente line
//! search, wraps the model in an `ArgMinAdapter` (which *minimizes* `-ℓ(θ)`),
//! and delegates the run to `run_lbfgs`.
use crate::optimization::{
    errors::OptResult,
    loglik_optimizer::{
        OptimOutcome, Theta,
        adapter::ArgMinAdapter,
        builders::{build_optimizer_hager_zhang, build_optimizer_more_thuente},
        run::run_lbfgs,
        traits::{LineSearcher, LogLikelihood, MLEOptions},
    },
};

/// Maximize a log-likelihood `ℓ(θ)` using L-BFGS with the chosen line search.
///
/// # Parameters
/// - `f`: model implementing [`LogLikelihood`].
/// - `theta0`: initial parameter vector (consumed by the executor).
/// - `data`: model data passed through to `value`/`grad`.
/// - `opts`: tolerances, iteration/time budget, line search, verbosity.
///
/// # Errors
/// - Propagates any error from `f.check`.
/// - Propagates builder errors and runtime errors from `run_lbfgs`.
///
/// # Returns
/// An [`OptimOutcome`]; callers decide what to do when
/// `outcome.converged == false`.
///
/// # Example
/// ```no_run
/// use ndarray::array;
/// use dynfactor::optimization::errors::OptResult;
/// use dynfactor::optimization::loglik_optimizer::{maximize, LogLikelihood, MLEOptions, Theta};
///
/// struct Bowl;
/// impl LogLikelihood for Bowl {
///     type Data = ();
///     fn value(&self, theta: &Theta, _: &()) -> OptResult<f64> {
///         Ok(-theta.dot(theta))
///     }
///     fn check(&self, _: &Theta, _: &()) -> OptResult<()> {
///         Ok(())
///     }
/// }
///
/// let out = maximize(&Bowl, array![0.1, -0.2, 0.3], &(), &MLEOptions::default())?;
/// assert!(out.converged);
/// # Ok::<(), dynfactor::optimization::errors::OptError>(())
/// ```
pub fn maximize<F: LogLikelihood>(
    f: &F, theta0: Theta, data: &F::Data, opts: &MLEOptions,
) -> OptResult<OptimOutcome> {
    f.check(&theta0, data)?;
    let problem = ArgMinAdapter::new(f, data);
    match opts.line_searcher {
        LineSearcher::MoreThuente => {
            let solver = build_optimizer_more_thuente(opts)?;
            run_lbfgs(theta0, opts, problem, solver)
        }
        LineSearcher::HagerZhang => {
            let solver = build_optimizer_hager_zhang(opts)?;
            run_lbfgs(theta0, opts, problem, solver)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::optimization::{
        errors::OptError,
        loglik_optimizer::{traits::Tolerances, validation::validate_theta},
    };
    use approx::assert_abs_diff_eq;
    use ndarray::array;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover end-to-end runs of `maximize` on a smooth concave
    // toy likelihood:
    // - convergence to the known maximizer with both line searches,
    // - budget exhaustion reported as `converged == false`,
    // - `check` failures short-circuiting the run.
    // -------------------------------------------------------------------------

    /// Gaussian-shaped log-likelihood with maximum at (1, -2).
    struct ShiftedBowl;

    impl LogLikelihood for ShiftedBowl {
        type Data = ();

        fn value(&self, theta: &Theta, _data: &()) -> OptResult<f64> {
            Ok(-0.5 * ((theta[0] - 1.0).powi(2) + 4.0 * (theta[1] + 2.0).powi(2)))
        }

        fn check(&self, theta: &Theta, _data: &()) -> OptResult<()> {
            validate_theta(theta, 2)
        }
    }

    #[test]
    // Purpose
    // -------
    // Both line searches locate the maximizer of a concave bowl.
    //
    // Given
    // -----
    // - `ShiftedBowl` started at the origin with default tolerances.
    //
    // Expect
    // ------
    // - `converged == true` and `θ̂ ≈ (1, -2)` within 1e-4.
    fn maximize_recovers_known_optimum_with_both_line_searches() {
        for line_searcher in [LineSearcher::MoreThuente, LineSearcher::HagerZhang] {
            // Arrange
            let opts = MLEOptions { line_searcher, ..MLEOptions::default() };

            // Act
            let out = maximize(&ShiftedBowl, array![0.0, 0.0], &(), &opts).expect("run succeeds");

            // Assert
            assert!(out.converged, "status: {}", out.status);
            assert_abs_diff_eq!(out.theta_hat[0], 1.0, epsilon = 1e-4);
            assert_abs_diff_eq!(out.theta_hat[1], -2.0, epsilon = 1e-4);
            assert!(out.value <= 0.0);
        }
    }

    #[test]
    // Purpose
    // -------
    // A one-iteration budget with no tolerances ends as not converged.
    //
    // Given
    // -----
    // - `Tolerances { tol_grad: None, tol_cost: None, max_iter: 1 }`.
    //
    // Expect
    // ------
    // - `Ok(outcome)` with `converged == false` and status "MaxItersReached".
    fn maximize_reports_budget_exhaustion_as_not_converged() {
        // Arrange
        let tols = Tolerances::new(None, None, Some(1)).expect("valid tolerances");
        let opts = MLEOptions::new(tols, LineSearcher::MoreThuente, false, None)
            .expect("valid options");

        // Act
        let out = maximize(&ShiftedBowl, array![5.0, 5.0], &(), &opts).expect("run succeeds");

        // Assert
        assert!(!out.converged);
        assert_eq!(out.status, "MaxItersReached");
    }

    #[test]
    // Purpose
    // -------
    // `check` runs before any solver work.
    //
    // Given
    // -----
    // - A length-3 starting vector for a 2-parameter model.
    //
    // Expect
    // ------
    // - `OptError::ThetaLengthMismatch`.
    fn maximize_propagates_check_failures() {
        // Act
        let result = maximize(&ShiftedBowl, array![0.0, 0.0, 0.0], &(), &MLEOptions::default());

        // Assert
        assert_eq!(result, Err(OptError::ThetaLengthMismatch { expected: 2, actual: 3 }));
    }
}
