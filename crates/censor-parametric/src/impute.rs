//! Imputation from a fitted distribution

use crate::family::Family;
use crate::fit::{parametric_fit, FitOptions, FittedDistribution};
use censor_core::{CensoringType, ImputeType, Observation, Result, Sample};
use rand::Rng;
use tracing::instrument;

impl FittedDistribution {
    /// Replace every censored row by the conditional mean of the fitted
    /// distribution over its bracket, or by a draw from it
    ///
    /// Results are clipped to the bracket and, for positive families, kept
    /// strictly positive.
    pub fn impute<R: Rng + ?Sized>(&self, sample: &Sample, impute_type: ImputeType, rng: &mut R) -> Vec<f64> {
        sample
            .iter()
            .map(|obs| {
                if obs.is_censored() {
                    self.impute_one(obs, impute_type, rng)
                } else {
                    obs.value
                }
            })
            .collect()
    }

    fn impute_one<R: Rng + ?Sized>(&self, obs: &Observation, impute_type: ImputeType, rng: &mut R) -> f64 {
        let dist = &self.distribution;
        let raw = match impute_type {
            ImputeType::Mean => dist.conditional_mean(obs.left_bound, obs.right_bound),
            ImputeType::Stochastic => dist.sample_between(obs.left_bound, obs.right_bound, rng),
        };
        let value = obs.clamp(if raw.is_finite() { raw } else { obs.value });
        if self.family().requires_positive() && value <= 0.0 {
            f64::MIN_POSITIVE.min(obs.right_bound)
        } else {
            value
        }
    }
}

/// Fit `family` to the whole sample and impute its censored rows
///
/// Mixed samples share one fit; left and right rows are each filled from
/// their own side of it.
#[instrument(skip(sample, options, rng), fields(n = sample.len(), censored = sample.censored_count()))]
pub fn parametric_impute<R: Rng + ?Sized>(
    sample: &Sample,
    censoring: CensoringType,
    family: Family,
    impute_type: ImputeType,
    options: &FitOptions,
    rng: &mut R,
) -> Result<Vec<f64>> {
    sample.check_censoring(censoring)?;
    let fit = parametric_fit(sample, family, options)?;
    Ok(fit.impute(sample, impute_type, rng))
}
