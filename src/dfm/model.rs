//! Dynamic factor model: estimation, fitted values, smoothing, forecasting.
//!
//! ```text
//! X_t = Λ F_t + ε_t
//! F_t = A_1 F_{t−1} + … + A_p F_{t−p} + u_t,   u_t ~ N(0, I_k)
//! ε_t = B_1 ε_{t−1} + … + B_q ε_{t−q} + v_t,   v_t ~ N(0, diag σ²)
//! ```
//!
//! [`DFMModel`] owns the selected, validated panel and its standardized
//! working copy. [`DFMModel::fit`] maximizes the average Gaussian
//! log-likelihood (Kalman filter, L-BFGS with finite-difference gradients)
//! starting from principal-component values, then stores a [`FittedModel`]:
//! parameters, the state-space system, smoothed factors, one-step-ahead
//! fitted values and residuals in original units, and the filtered end
//! state forecasts start from.
//!
//! A model moves `Unfitted → Fitted | FitFailed` and never holds a partial
//! fit. Parameter vectors that make the filter break down numerically are
//! scored with a large finite penalty instead of aborting the search.
use ndarray::{Array1, Array2, ArrayView2, s};
use tracing::{debug, info, warn};

use crate::{
    dfm::{
        config::ModelConfig,
        errors::{DFMError, DFMResult},
        forecasts::ForecastTable,
        init::start_values,
        options::DFMOptions,
        params::DFMParams,
        shape::DFMShape,
        standardize::Standardization,
        summary::{FitSummary, InformationCriteria},
    },
    optimization::{
        errors::{OptError, OptResult},
        loglik_optimizer::{LogLikelihood, OptimOutcome, Theta, maximize, validation::validate_theta},
    },
    panel::Panel,
    statespace::{
        InitialState, StateSpaceError, StateSpaceModel, StateSpaceResult, kalman_filter,
        loglikelihood, smooth_states,
    },
};

/// Average log-likelihood assigned to parameters the filter cannot evaluate.
pub(crate) const NUMERICAL_FAILURE_LOGLIK: f64 = -1e10;

/// Estimation state of a [`DFMModel`].
#[derive(Debug, Clone, PartialEq)]
pub enum FitState {
    Unfitted,
    Fitted(Box<FittedModel>),
    FitFailed { reason: String },
}

/// Everything produced by a successful fit.
#[derive(Debug, Clone, PartialEq)]
pub struct FittedModel {
    params: DFMParams,
    system: StateSpaceModel,
    outcome: OptimOutcome,
    loglik: f64,
    smoothed_factors: Array2<f64>,
    fitted_values: Array2<f64>,
    residuals: Array2<f64>,
    end_state: Array1<f64>,
}

impl FittedModel {
    pub fn params(&self) -> &DFMParams {
        &self.params
    }

    /// State-space system at the estimate (working units).
    pub fn system(&self) -> &StateSpaceModel {
        &self.system
    }

    pub fn outcome(&self) -> &OptimOutcome {
        &self.outcome
    }

    /// Exact log-likelihood of the working panel at the estimate.
    pub fn loglik(&self) -> f64 {
        self.loglik
    }

    /// `T × k` smoothed factors `E[F_t | X_1..X_T]` (working units).
    pub fn smoothed_factors(&self) -> &Array2<f64> {
        &self.smoothed_factors
    }

    /// `T × N` one-step-ahead predictions in original units.
    pub fn fitted_values(&self) -> &Array2<f64> {
        &self.fitted_values
    }

    /// `T × N` actual − fitted, original units.
    pub fn residuals(&self) -> &Array2<f64> {
        &self.residuals
    }
}

/// Dynamic factor model over a selection of panel columns.
#[derive(Debug, Clone, PartialEq)]
pub struct DFMModel {
    panel: Panel,
    config: ModelConfig,
    options: DFMOptions,
    shape: DFMShape,
    moments: Standardization,
    data: Array2<f64>,
    state: FitState,
}

impl DFMModel {
    /// Bind a configuration to a panel.
    ///
    /// Re-validates `config` against `panel`, keeps only the selected
    /// columns (in selection order) and prepares the working data.
    ///
    /// # Errors
    /// - [`DFMError::InvalidConfiguration`] if `config` does not fit
    ///   `panel`, there are too few rows for the lag orders
    ///   (`T ≤ max(p, q) + 1`), or a selected column has zero variance.
    pub fn new(panel: &Panel, config: ModelConfig, options: DFMOptions) -> DFMResult<Self> {
        config.validate_against(panel)?;
        let names: Vec<&str> = config.variables().iter().map(String::as_str).collect();
        let panel = panel.select(&names)?;
        let shape = config.shape();
        let min_rows = shape.factor_order.max(shape.error_order) + 2;
        if panel.n_rows() < min_rows {
            return Err(DFMError::config(format!(
                "need at least {min_rows} observations for the requested lag orders, got {}",
                panel.n_rows()
            )));
        }
        let moments = Standardization::estimate(panel.values(), panel.columns(), options.standardize)?;
        let data = moments.apply(panel.values());
        Ok(Self { panel, config, options, shape, moments, data, state: FitState::Unfitted })
    }

    /// Estimate parameters by maximum likelihood.
    ///
    /// Refitting is allowed from any state; the previous result is replaced.
    ///
    /// # Errors
    /// - [`DFMError::ConvergenceError`] if the optimizer exhausts its budget
    ///   or timeout, fails internally, or ends at a point where the filter
    ///   cannot be evaluated. The model is then in [`FitState::FitFailed`].
    pub fn fit(&mut self) -> DFMResult<&FittedModel> {
        let shape = self.shape;
        info!(
            n_obs = self.data.nrows(),
            n_vars = shape.n_vars,
            k_factors = shape.k_factors,
            factor_order = shape.factor_order,
            error_order = shape.error_order,
            n_params = shape.theta_len(),
            "fitting dynamic factor model"
        );
        let theta0 = start_values(self.data.view(), &shape);
        debug!(start_loglik = self.value(&theta0, &self.data).ok(), "start values computed");

        let outcome = match maximize(&*self, theta0, &self.data, &self.options.mle_opts) {
            Ok(outcome) => outcome,
            Err(err) => return Err(self.fail(err.to_string(), 0)),
        };
        let iterations = outcome.iterations;
        if !outcome.converged {
            let status = outcome.status.clone();
            return Err(self.fail(status, iterations));
        }
        if outcome.value <= NUMERICAL_FAILURE_LOGLIK {
            return Err(self.fail("likelihood not finite at the optimum".to_string(), iterations));
        }
        let fitted = match self.build_fitted(outcome) {
            Ok(fitted) => fitted,
            Err(err) => return Err(self.fail(err.to_string(), iterations)),
        };
        info!(loglik = fitted.loglik, iterations, "dynamic factor model fitted");
        self.state = FitState::Fitted(Box::new(fitted));
        self.fitted()
    }

    pub fn fit_state(&self) -> &FitState {
        &self.state
    }

    pub fn is_fitted(&self) -> bool {
        matches!(self.state, FitState::Fitted(_))
    }

    /// The fitted model.
    ///
    /// # Errors
    /// - [`DFMError::ModelNotFitted`] unless the last fit succeeded.
    pub fn fitted(&self) -> DFMResult<&FittedModel> {
        match &self.state {
            FitState::Fitted(fitted) => Ok(fitted),
            _ => Err(DFMError::ModelNotFitted),
        }
    }

    /// Selected columns only, in selection order.
    pub fn panel(&self) -> &Panel {
        &self.panel
    }

    pub fn config(&self) -> &ModelConfig {
        &self.config
    }

    pub fn options(&self) -> &DFMOptions {
        &self.options
    }

    pub fn shape(&self) -> &DFMShape {
        &self.shape
    }

    pub fn standardization(&self) -> &Standardization {
        &self.moments
    }

    /// `T × N` one-step-ahead predictions `Z a_{t|t−1}`, original units.
    ///
    /// # Errors
    /// - [`DFMError::ModelNotFitted`].
    pub fn fitted_values(&self) -> DFMResult<&Array2<f64>> {
        Ok(self.fitted()?.fitted_values())
    }

    /// `T × k` smoothed factor path.
    ///
    /// # Errors
    /// - [`DFMError::ModelNotFitted`].
    pub fn smoothed_factors(&self) -> DFMResult<&Array2<f64>> {
        Ok(self.fitted()?.smoothed_factors())
    }

    /// `steps`-ahead forecasts from the end of the estimation sample.
    ///
    /// # Errors
    /// - [`DFMError::InvalidArgument`] for `steps == 0`.
    /// - [`DFMError::ModelNotFitted`].
    pub fn forecast(&self, steps: usize) -> DFMResult<ForecastTable> {
        check_steps(steps)?;
        let fitted = self.fitted()?;
        let path = fitted.system.project(&fitted.end_state, steps);
        Ok(self.forecast_table(path.view()))
    }

    /// `steps`-ahead forecasts after filtering `window` (original units,
    /// columns in selection order) with the estimated parameters.
    ///
    /// # Errors
    /// An empty window forecasts from the stationary distribution, i.e. the
    /// sample means.
    ///
    /// # Errors
    /// - [`DFMError::InvalidArgument`] for `steps == 0` or a window of the
    ///   wrong width.
    /// - [`DFMError::ModelNotFitted`].
    /// - [`DFMError::StateSpace`] if the filter breaks down on `window`.
    pub fn forecast_from(&self, window: ArrayView2<f64>, steps: usize) -> DFMResult<ForecastTable> {
        check_steps(steps)?;
        let fitted = self.fitted()?;
        if window.ncols() != self.shape.n_vars {
            return Err(DFMError::argument(
                "window",
                format!("expected {} columns, got {}", self.shape.n_vars, window.ncols()),
            ));
        }
        let init = InitialState::stationary(&fitted.system)?;
        let start = if window.nrows() == 0 {
            init.mean
        } else {
            let z = self.moments.apply(window);
            kalman_filter(&fitted.system, z.view(), &init)?.filtered_state
        };
        let path = fitted.system.project(&start, steps);
        Ok(self.forecast_table(path.view()))
    }

    /// Responses of every variable (original units) at horizons
    /// `0..=steps` to a one-standard-deviation shock in each factor.
    /// Element `j` of the result is the `(steps + 1) × N` response to
    /// factor `j`.
    ///
    /// # Errors
    /// - [`DFMError::ModelNotFitted`].
    pub fn impulse_responses(&self, steps: usize) -> DFMResult<Vec<Array2<f64>>> {
        let fitted = self.fitted()?;
        let mut responses = Vec::with_capacity(self.shape.k_factors);
        for j in 0..self.shape.k_factors {
            responses.push(fitted.system.impulse_responses(j, steps)? * &self.moments.scale);
        }
        Ok(responses)
    }

    /// Log-likelihood, information criteria and optimizer statistics.
    ///
    /// # Errors
    /// - [`DFMError::ModelNotFitted`].
    pub fn summary(&self) -> DFMResult<FitSummary> {
        let fitted = self.fitted()?;
        let nobs = self.data.nrows();
        let n_params = self.shape.theta_len();
        let ic = InformationCriteria::new(fitted.loglik, n_params, nobs);
        Ok(FitSummary {
            loglik: fitted.loglik,
            aic: ic.aic,
            bic: ic.bic,
            hqic: ic.hqic,
            nobs,
            n_params,
            iterations: fitted.outcome.iterations,
            status: fitted.outcome.status.clone(),
        })
    }

    /// Working (standardized) data the likelihood is evaluated on.
    pub fn working_data(&self) -> &Array2<f64> {
        &self.data
    }

    // ---- Helper methods ----

    fn fail(&mut self, status: String, iterations: usize) -> DFMError {
        warn!(%status, iterations, "dynamic factor model did not converge");
        self.state = FitState::FitFailed { reason: status.clone() };
        DFMError::ConvergenceError { status, iterations }
    }

    fn build_fitted(&self, outcome: OptimOutcome) -> DFMResult<FittedModel> {
        let params = DFMParams::from_theta(&outcome.theta_hat, &self.shape)?;
        let system = params.state_space(&self.shape)?;
        let init = InitialState::stationary(&system)?;
        let filtered = kalman_filter(&system, self.data.view(), &init)?;
        let smoothed = smooth_states(&system, &filtered)?;
        let smoothed_factors = smoothed.slice(s![.., ..self.shape.k_factors]).to_owned();
        let fitted_values =
            self.moments.restore(filtered.one_step_predictions(&system).view());
        let residuals = &self.panel.values() - &fitted_values;
        Ok(FittedModel {
            params,
            system,
            loglik: filtered.loglik,
            outcome,
            smoothed_factors,
            fitted_values,
            residuals,
            end_state: filtered.filtered_state,
        })
    }

    fn forecast_table(&self, path: ArrayView2<f64>) -> ForecastTable {
        ForecastTable::new(self.config.variables().to_vec(), self.moments.restore(path))
    }
}

impl LogLikelihood for DFMModel {
    type Data = Array2<f64>;

    /// Average log-likelihood `ℓ(θ) / T` of the working panel.
    ///
    /// Numerical breakdowns of the filter (non-PD innovation covariance,
    /// non-stable transition, overflow) or of the VAR transform score
    /// [`NUMERICAL_FAILURE_LOGLIK`].
    fn value(&self, theta: &Theta, data: &Self::Data) -> OptResult<f64> {
        let params = match DFMParams::from_theta(theta, &self.shape) {
            Ok(params) => params,
            Err(OptError::ConditionViolated { .. }) => return Ok(NUMERICAL_FAILURE_LOGLIK),
            Err(err) => return Err(err),
        };
        match average_loglik(&params, &self.shape, data.view()) {
            Ok(ll) => Ok(ll),
            Err(err) if err.is_numerical() => Ok(NUMERICAL_FAILURE_LOGLIK),
            Err(err) => Err(err.into()),
        }
    }

    fn check(&self, theta: &Theta, data: &Self::Data) -> OptResult<()> {
        validate_theta(theta, self.shape.theta_len())?;
        if data.ncols() != self.shape.n_vars {
            return Err(OptError::StateSpace(StateSpaceError::DimensionMismatch {
                what: "observations",
                expected: (data.nrows(), self.shape.n_vars),
                found: data.dim(),
            }));
        }
        Ok(())
    }
}

fn average_loglik(
    params: &DFMParams, shape: &DFMShape, y: ArrayView2<f64>,
) -> StateSpaceResult<f64> {
    let ss = params.state_space(shape)?;
    let init = InitialState::stationary(&ss)?;
    Ok(loglikelihood(&ss, y, &init)? / y.nrows() as f64)
}

fn check_steps(steps: usize) -> DFMResult<()> {
    if steps == 0 {
        return Err(DFMError::argument("steps", "must be at least 1"));
    }
    Ok(())
}
