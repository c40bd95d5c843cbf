//! Choosing a family by information criterion

use crate::family::Family;
use crate::fit::{parametric_fit, FitOptions, FittedDistribution};
use censor_core::{CensoringType, Error, Result, Sample};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument, warn};

/// Outcome of [`select_best_distribution`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Selection {
    pub family: Family,
    /// AIC of the chosen family
    pub score: f64,
    /// AIC of every family that could be fitted, in candidate order
    pub scores: Vec<(Family, f64)>,
    pub fit: FittedDistribution,
}

/// Fit every eligible candidate and keep the one with the lowest AIC
///
/// Positive-support families are skipped when the sample has a
/// non-positive value. Insufficient data fails the whole selection; a
/// candidate whose fit breaks numerically is skipped.
#[instrument(skip(sample, candidates, options), fields(n = sample.len()))]
pub fn select_best_distribution(
    sample: &Sample,
    censoring: CensoringType,
    candidates: &[Family],
    options: &FitOptions,
) -> Result<Selection> {
    if candidates.is_empty() {
        return Err(Error::InvalidParameter("no candidate families given".to_string()));
    }
    sample.check_censoring(censoring)?;
    let positive = sample.is_positive();

    let mut best: Option<FittedDistribution> = None;
    let mut scores = Vec::with_capacity(candidates.len());
    for &family in candidates {
        if family.requires_positive() && !positive {
            debug!(%family, "skipping family: sample has non-positive values");
            continue;
        }
        let fit = match parametric_fit(sample, family, options) {
            Ok(fit) => fit,
            Err(err @ Error::InsufficientData { .. }) => return Err(err),
            Err(err) => {
                warn!(%family, error = %err, "skipping family that could not be fitted");
                continue;
            }
        };
        let aic = fit.aic();
        debug!(%family, aic, "candidate scored");
        scores.push((family, aic));
        if best.as_ref().map_or(true, |b| aic < b.aic()) {
            best = Some(fit);
        }
    }

    let fit = best.ok_or_else(|| {
        Error::InvalidParameter("none of the candidate families could be fitted to this sample".to_string())
    })?;
    debug!(family = %fit.family(), aic = fit.aic(), "family selected");
    Ok(Selection {
        family: fit.family(),
        score: fit.aic(),
        scores,
        fit,
    })
}
