//! Estimation options for the dynamic factor model.
use crate::optimization::loglik_optimizer::MLEOptions;

/// Runtime options for [`DFMModel::fit`](crate::dfm::DFMModel::fit).
///
/// - `mle_opts`: optimizer tolerances, iteration budget, line search,
///   L-BFGS memory, verbosity and optional wall-clock timeout.
/// - `standardize`: demean and scale each series to unit variance before
///   estimation; outputs are always mapped back to original units.
///
/// Default: `MLEOptions::default()` and `standardize = true`.
#[derive(Debug, Clone, PartialEq)]
pub struct DFMOptions {
    pub mle_opts: MLEOptions,
    pub standardize: bool,
}

impl DFMOptions {
    pub fn new(mle_opts: MLEOptions, standardize: bool) -> Self {
        Self { mle_opts, standardize }
    }
}

impl Default for DFMOptions {
    fn default() -> Self {
        Self { mle_opts: MLEOptions::default(), standardize: true }
    }
}
