//! Accuracy evaluation and residual diagnostics for a fitted DFM.
//!
//! Purpose
//! -------
//! Turn a fitted [`DFMModel`] into the numbers a dashboard shows: in-sample
//! and out-of-sample MAE/MSE/RMSE per variable, residuals and their
//! correlograms, factor impulse responses, normality tests, residual
//! densities and an ARMA baseline comparison.
//!
//! Key behaviors
//! -------------
//! - [`Evaluator::evaluate_insample`] compares one-step-ahead fitted values
//!   with the data over the whole estimation window.
//! - [`Evaluator::split_data`] records a chronological train/test boundary
//!   at `floor(T · (1 − f))`; the model is **not** refit.
//! - [`Evaluator::evaluate_outsample`] filters the training rows with the
//!   full-sample parameters, forecasts `len(test)` steps from the end of
//!   the training window and scores them against the held-out rows.
//!
//! Invariants & assumptions
//! ------------------------
//! - Out-of-sample scores use parameters estimated on the full panel, so
//!   they carry look-ahead bias; they measure the forecasting recursion,
//!   not a true pseudo-real-time exercise.
//! - Every diagnostic requires a fitted model and reports
//!   [`DFMError::ModelNotFitted`] otherwise; `evaluate_outsample` checks
//!   that before [`DFMError::DataNotSplit`].
//! - Results are recomputed on each call; the evaluator caches nothing but
//!   the split boundary.
use ndarray::Array2;
use tracing::debug;

use crate::{
    dfm::{
        errors::{DFMError, DFMResult},
        model::DFMModel,
        summary::InformationCriteria,
    },
    evaluation::{
        baseline::{ArmaBaseline, ArmaComparison},
        diagnostics::{DensityEstimate, VariableDiagnostic},
        metrics::EvaluationResult,
    },
    panel::PanelView,
    statistical_tests::{Correlogram, JarqueBeraOutcome, acf, pacf},
};

/// Evaluation front-end borrowing a model.
#[derive(Debug, Clone, Copy)]
pub struct Evaluator<'a> {
    model: &'a DFMModel,
    split_row: Option<usize>,
}

impl<'a> Evaluator<'a> {
    pub fn new(model: &'a DFMModel) -> Self {
        Self { model, split_row: None }
    }

    pub fn model(&self) -> &'a DFMModel {
        self.model
    }

    /// First test row, once [`split_data`](Self::split_data) has run.
    pub fn split_row(&self) -> Option<usize> {
        self.split_row
    }

    /// MAE/MSE/RMSE of the one-step-ahead fitted values.
    ///
    /// # Errors
    /// - [`DFMError::ModelNotFitted`].
    pub fn evaluate_insample(&self) -> DFMResult<EvaluationResult> {
        let fitted = self.model.fitted_values()?;
        let panel = self.model.panel();
        EvaluationResult::compute(panel.columns(), panel.values(), fitted.view())
    }

    /// Split the model's panel chronologically; `test_fraction` of the rows
    /// (rounded so the training part is `floor(T · (1 − f))`) are held out.
    /// Train and test always cover all `T` rows; for fractions close to 0
    /// or 1 one side may be empty.
    ///
    /// # Errors
    /// - [`DFMError::InvalidArgument`] unless `0 < test_fraction < 1`.
    pub fn split_data(&mut self, test_fraction: f64) -> DFMResult<(PanelView<'a>, PanelView<'a>)> {
        if !(test_fraction > 0.0 && test_fraction < 1.0) {
            return Err(DFMError::argument(
                "test_fraction",
                format!("must lie strictly between 0 and 1, got {test_fraction}"),
            ));
        }
        let panel = self.model.panel();
        let cutoff = (panel.n_rows() as f64 * (1.0 - test_fraction)).floor() as usize;
        let (train, test) = panel.split_at(cutoff)?;
        debug!(train = train.n_rows(), test = test.n_rows(), "panel split");
        self.split_row = Some(cutoff);
        Ok((train, test))
    }

    /// Score forecasts from the end of the training window on the test rows.
    /// An empty training window forecasts from the stationary distribution.
    ///
    /// # Errors
    /// - [`DFMError::ModelNotFitted`].
    /// - [`DFMError::DataNotSplit`] if [`split_data`](Self::split_data) has
    ///   not been called.
    /// - [`DFMError::InvalidArgument`] if the split left no test rows.
    pub fn evaluate_outsample(&self) -> DFMResult<EvaluationResult> {
        self.model.fitted()?;
        let cutoff = self.split_row.ok_or(DFMError::DataNotSplit)?;
        let (train, test) = self.model.panel().split_at(cutoff)?;
        if test.n_rows() == 0 {
            return Err(DFMError::argument(
                "test_fraction",
                format!("split at row {cutoff} leaves no rows to evaluate"),
            ));
        }
        let table = self.model.forecast_from(train.values(), test.n_rows())?;
        EvaluationResult::compute(test.columns(), test.values(), table.values().view())
    }

    /// `T × N` actual − fitted, original units.
    ///
    /// # Errors
    /// - [`DFMError::ModelNotFitted`].
    pub fn residuals(&self) -> DFMResult<&'a Array2<f64>> {
        Ok(self.model.fitted()?.residuals())
    }

    /// Residual autocorrelations per variable.
    ///
    /// # Errors
    /// - [`DFMError::InvalidArgument`] for `lags == 0`.
    /// - [`DFMError::ModelNotFitted`].
    /// - [`DFMError::Test`] for a degenerate residual series.
    pub fn acf(&self, lags: usize) -> DFMResult<Vec<VariableDiagnostic<Correlogram>>> {
        check_lags(lags)?;
        self.per_variable(|e| Ok(acf(e, lags)?))
    }

    /// Residual partial autocorrelations per variable.
    ///
    /// # Errors
    /// Same as [`acf`](Self::acf).
    pub fn pacf(&self, lags: usize) -> DFMResult<Vec<VariableDiagnostic<Correlogram>>> {
        check_lags(lags)?;
        self.per_variable(|e| Ok(pacf(e, lags)?))
    }

    /// Per-factor responses of every variable at horizons `0..=steps`.
    ///
    /// # Errors
    /// - [`DFMError::ModelNotFitted`].
    pub fn impulse_responses(&self, steps: usize) -> DFMResult<Vec<Array2<f64>>> {
        self.model.impulse_responses(steps)
    }

    /// Jarque–Bera normality test of each variable's residuals.
    ///
    /// # Errors
    /// - [`DFMError::ModelNotFitted`].
    /// - [`DFMError::Test`] for too few or constant residuals.
    pub fn jarque_bera(&self) -> DFMResult<Vec<VariableDiagnostic<JarqueBeraOutcome>>> {
        self.per_variable(|e| Ok(JarqueBeraOutcome::jarque_bera(e)?))
    }

    /// Gaussian kernel density of each variable's residuals on `points`
    /// grid values.
    ///
    /// # Errors
    /// - [`DFMError::ModelNotFitted`].
    /// - [`DFMError::Test`] for `points < 2` or degenerate residuals.
    pub fn residual_density(
        &self, points: usize,
    ) -> DFMResult<Vec<VariableDiagnostic<DensityEstimate>>> {
        self.per_variable(|e| Ok(DensityEstimate::gaussian_kde(e, points)?))
    }

    /// Fit an ARMA(p, q) with constant to each variable's working series
    /// and report its information criteria next to the DFM's.
    ///
    /// # Errors
    /// - [`DFMError::ModelNotFitted`].
    /// - [`DFMError::Optimization`] if a series is too short for the orders.
    pub fn compare_with_arma(&self, p: usize, q: usize) -> DFMResult<Vec<ArmaComparison>> {
        let summary = self.model.summary()?;
        let dfm = InformationCriteria::new(summary.loglik, summary.n_params, summary.nobs);
        let baseline = ArmaBaseline::new(p, q);
        let opts = &self.model.options().mle_opts;
        let data = self.model.working_data();
        self.model
            .config()
            .variables()
            .iter()
            .zip(data.columns())
            .map(|(name, series)| -> DFMResult<ArmaComparison> {
                debug!(variable = %name, p, q, "fitting ARMA baseline");
                Ok(ArmaComparison {
                    variable: name.clone(),
                    arma: baseline.fit(series, opts)?,
                    dfm,
                })
            })
            .collect()
    }

    // ---- Helper methods ----

    fn per_variable<T, F>(&self, f: F) -> DFMResult<Vec<VariableDiagnostic<T>>>
    where
        F: Fn(&[f64]) -> DFMResult<T>,
    {
        let resid = self.residuals()?;
        self.model
            .config()
            .variables()
            .iter()
            .zip(resid.columns())
            .map(|(name, col)| -> DFMResult<VariableDiagnostic<T>> {
                let e = col.to_vec();
                Ok(VariableDiagnostic { variable: name.clone(), result: f(&e)? })
            })
            .collect()
    }
}

fn check_lags(lags: usize) -> DFMResult<()> {
    if lags == 0 {
        return Err(DFMError::argument("lags", "must be at least 1"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        dfm::{DFMOptions, ModelConfig},
        panel::Panel,
    };
    use approx::assert_abs_diff_eq;
    use chrono::NaiveDate;
    use rand::{SeedableRng, rngs::StdRng};
    use rand_distr::{Distribution, Normal};

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - call-order errors (unfitted model, missing split),
    // - split boundaries and argument checks,
    // - metric identities in and out of sample,
    // - shapes of the residual diagnostics.
    // -------------------------------------------------------------------------

    fn panel(n_obs: usize, seed: u64) -> Panel {
        let mut rng = StdRng::seed_from_u64(seed);
        let noise = Normal::new(0.0, 1.0).expect("valid normal");
        let mut f = 0.0;
        let mut values = Array2::zeros((n_obs, 3));
        for t in 0..n_obs {
            f = 0.6 * f + noise.sample(&mut rng);
            values[[t, 0]] = f + 0.5 * noise.sample(&mut rng);
            values[[t, 1]] = 0.7 * f + 0.5 * noise.sample(&mut rng) + 2.0;
            values[[t, 2]] = -0.5 * f + 0.5 * noise.sample(&mut rng) - 1.0;
        }
        let start = NaiveDate::from_ymd_opt(2020, 1, 1).expect("valid date");
        let dates = (0..n_obs).map(|i| start + chrono::Duration::days(i as i64)).collect();
        let columns = vec!["a".to_string(), "b".to_string(), "c".to_string()];
        Panel::new(dates, columns, values).expect("valid panel")
    }

    fn fitted_model(n_obs: usize, seed: u64) -> DFMModel {
        let p = panel(n_obs, seed);
        let config = ModelConfig::new(&p, None, 1, 1, 1).expect("valid config");
        let mut model = DFMModel::new(&p, config, DFMOptions::default()).expect("valid model");
        model.fit().expect("simulated panel converges");
        model
    }

    #[test]
    // Purpose
    // -------
    // Every evaluation call on an unfitted model reports `ModelNotFitted`,
    // even before a split.
    //
    // Given
    // -----
    // - An unfitted model.
    //
    // Expect
    // ------
    // - `ModelNotFitted` for in-sample, out-of-sample and diagnostics.
    fn unfitted_model_is_rejected_everywhere() {
        let p = panel(60, 1);
        let config = ModelConfig::new(&p, None, 1, 1, 1).expect("valid config");
        let model = DFMModel::new(&p, config, DFMOptions::default()).expect("valid model");
        let ev = Evaluator::new(&model);

        assert_eq!(ev.evaluate_insample().err(), Some(DFMError::ModelNotFitted));
        assert_eq!(ev.evaluate_outsample().err(), Some(DFMError::ModelNotFitted));
        assert_eq!(ev.residuals().err(), Some(DFMError::ModelNotFitted));
        assert_eq!(ev.jarque_bera().err(), Some(DFMError::ModelNotFitted));
        assert_eq!(ev.compare_with_arma(1, 1).err(), Some(DFMError::ModelNotFitted));
    }

    #[test]
    // Purpose
    // -------
    // The split boundary is `floor(T (1 − f))` and out-of-sample evaluation
    // needs it.
    //
    // Given
    // -----
    // - A fitted 100-row model; f = 0.2, then f ∈ {0, 1, −0.1, NaN}.
    //
    // Expect
    // ------
    // - `DataNotSplit` before splitting; 80/20 afterwards; `InvalidArgument`
    //   for the bad fractions; metrics for the 20 test rows.
    fn split_then_evaluate_outsample() {
        // Arrange
        let model = fitted_model(100, 2);
        let mut ev = Evaluator::new(&model);

        // Act / Assert
        assert_eq!(ev.evaluate_outsample().err(), Some(DFMError::DataNotSplit));
        let (train, test) = ev.split_data(0.2).expect("valid fraction");
        assert_eq!((train.n_rows(), test.n_rows()), (80, 20));
        assert!(train.last_date() < test.first_date());
        for bad in [0.0, 1.0, -0.1, f64::NAN] {
            assert!(matches!(ev.split_data(bad), Err(DFMError::InvalidArgument { .. })));
        }
        assert_eq!(ev.split_row(), Some(80));

        let out = ev.evaluate_outsample().expect("fitted and split");
        assert_eq!(out.len(), 3);
        for entry in out.entries() {
            assert_abs_diff_eq!(entry.metrics.rmse.powi(2), entry.metrics.mse, epsilon = 1e-9);
        }
    }

    #[test]
    // Purpose
    // -------
    // Every fraction strictly inside (0, 1) splits, and the two sides always
    // cover the whole panel.
    //
    // Given
    // -----
    // - A fitted 100-row model; fractions from 1e-17 up to 0.999999,
    //   including ones that leave a side empty.
    //
    // Expect
    // ------
    // - Train rows = floor(100 (1 − f)); train + test = 100.
    fn split_counts_sum_to_panel_length_for_all_fractions() {
        let model = fitted_model(100, 6);
        let mut ev = Evaluator::new(&model);
        let fractions =
            [1e-17, 1e-4, 0.005, 0.013, 0.2, 0.25, 0.5, 0.731, 0.99, 0.995, 0.999, 0.999999];

        for f in fractions {
            let (train, test) = ev.split_data(f).expect("fraction inside (0, 1)");

            assert_eq!(train.n_rows(), (100.0 * (1.0 - f)).floor() as usize, "f = {f}");
            assert_eq!(train.n_rows() + test.n_rows(), 100, "f = {f}");
            assert_eq!(ev.split_row(), Some(train.n_rows()));
        }
    }

    #[test]
    // Purpose
    // -------
    // Degenerate splits are handled at evaluation time: an empty training
    // window forecasts from the stationary distribution, an empty test
    // window has nothing to score.
    //
    // Given
    // -----
    // - A fitted 100-row model; f = 0.995 (no training rows), then
    //   f = 1e-17 (no test rows).
    //
    // Expect
    // ------
    // - Finite metrics for all 3 variables in the first case.
    // - `InvalidArgument` in the second.
    fn degenerate_splits_evaluate_or_report() {
        let model = fitted_model(100, 7);
        let mut ev = Evaluator::new(&model);

        let (train, _) = ev.split_data(0.995).expect("valid fraction");
        assert_eq!(train.n_rows(), 0);
        let out = ev.evaluate_outsample().expect("forecast from the stationary prior");
        assert_eq!(out.len(), 3);
        assert!(out.entries().iter().all(|e| e.metrics.mse.is_finite()));

        let (_, test) = ev.split_data(1e-17).expect("valid fraction");
        assert_eq!(test.n_rows(), 0);
        assert!(matches!(
            ev.evaluate_outsample(),
            Err(DFMError::InvalidArgument { name: "test_fraction", .. })
        ));
    }

    #[test]
    // Purpose
    // -------
    // In-sample evaluation is repeatable and consistent with the residuals.
    //
    // Given
    // -----
    // - A fitted model evaluated twice.
    //
    // Expect
    // ------
    // - Identical results; MSE of column "b" equals mean squared residual.
    fn insample_is_idempotent_and_matches_residuals() {
        let model = fitted_model(100, 3);
        let ev = Evaluator::new(&model);

        let first = ev.evaluate_insample().expect("fitted");
        let second = ev.evaluate_insample().expect("fitted");

        assert_eq!(first, second);
        let resid = ev.residuals().expect("fitted");
        let mse_b = resid.column(1).mapv(|e| e * e).sum() / 100.0;
        assert_abs_diff_eq!(first.get("b").expect("present").mse, mse_b, epsilon = 1e-12);
    }

    #[test]
    // Purpose
    // -------
    // Diagnostics return one entry per variable with the requested sizes.
    //
    // Given
    // -----
    // - A fitted 100-row model; 10 lags; 64 density points; 6 IRF steps.
    //
    // Expect
    // ------
    // - 3 correlograms of 10 values; 3 JB outcomes with p ∈ [0, 1];
    //   3 densities of 64 points; 1 × (7 × 3) impulse response; lags = 0
    //   rejected.
    fn diagnostics_have_expected_shapes() {
        let model = fitted_model(100, 4);
        let ev = Evaluator::new(&model);

        let acfs = ev.acf(10).expect("fitted");
        let pacfs = ev.pacf(10).expect("fitted");
        let jb = ev.jarque_bera().expect("fitted");
        let kde = ev.residual_density(64).expect("fitted");
        let irf = ev.impulse_responses(6).expect("fitted");

        assert_eq!(acfs.len(), 3);
        assert!(acfs.iter().chain(pacfs.iter()).all(|d| d.result.values.len() == 10));
        assert_eq!(acfs[2].variable, "c");
        assert!(jb.iter().all(|d| (0.0..=1.0).contains(&d.result.p_value)));
        assert!(kde.iter().all(|d| d.result.density.len() == 64));
        assert_eq!(irf.len(), 1);
        assert_eq!(irf[0].dim(), (7, 3));
        assert!(matches!(ev.acf(0), Err(DFMError::InvalidArgument { name: "lags", .. })));
    }

    #[test]
    // Purpose
    // -------
    // The ARMA comparison reports finite criteria for every variable.
    //
    // Given
    // -----
    // - A fitted 100-row model; ARMA(1, 1).
    //
    // Expect
    // ------
    // - 3 rows, finite AIC/BIC on both sides, DFM criteria equal the summary.
    fn arma_comparison_reports_both_sides() {
        let model = fitted_model(100, 5);
        let ev = Evaluator::new(&model);

        let rows = ev.compare_with_arma(1, 1).expect("fitted");

        let summary = model.summary().expect("fitted");
        assert_eq!(rows.len(), 3);
        for row in &rows {
            assert!(row.arma.criteria.aic.is_finite() && row.arma.criteria.bic.is_finite());
            assert_eq!(row.arma.n_params, 4);
            assert_abs_diff_eq!(row.dfm.aic, summary.aic, epsilon = 1e-12);
        }
    }
}
