//! ROS fit and imputation

use crate::plotting::{plotting_positions, PlottingPosition, PlottingPositions, Position};
use crate::transform::Transform;
use censor_core::math::normal;
use censor_core::{fit_line, CensorStatus, CensoringType, ImputeType, LinearFit, Observation, Result, Sample};
use censor_survival::TurnbullOptions;
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

/// Fewest exact values a line can be fitted through
pub const MIN_OBSERVED: usize = 2;

/// ROS configuration
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct RosOptions {
    pub plotting_position: PlottingPosition,
    pub impute_type: ImputeType,
    pub transform: Transform,
    /// EM settings used whenever Turnbull probabilities are needed
    #[serde(skip)]
    pub turnbull: TurnbullOptions,
}

impl RosOptions {
    pub fn with_plotting_position(mut self, plotting_position: PlottingPosition) -> Self {
        self.plotting_position = plotting_position;
        self
    }

    pub fn with_impute_type(mut self, impute_type: ImputeType) -> Self {
        self.impute_type = impute_type;
        self
    }

    pub fn with_transform(mut self, transform: Transform) -> Self {
        self.transform = transform;
        self
    }

    pub fn with_turnbull(mut self, turnbull: TurnbullOptions) -> Self {
        self.turnbull = turnbull;
        self
    }
}

/// A regression line on the probit scale together with the probability
/// band of every row
#[derive(Debug, Clone)]
pub struct RosModel {
    line: LinearFit,
    positions: Vec<Position>,
    transform: Transform,
    converged: bool,
}

impl RosModel {
    /// Fit the transformed exact values against the normal quantiles of
    /// their plotting positions
    pub fn fit(sample: &Sample, censoring: CensoringType, options: &RosOptions) -> Result<Self> {
        sample.check_censoring(censoring)?;
        sample.require_observed(MIN_OBSERVED)?;
        if options.transform.requires_positive() {
            sample.require_positive(options.transform.name())?;
        }

        let PlottingPositions { positions, converged } =
            plotting_positions(sample, censoring, options.plotting_position, &options.turnbull)?;

        let (x, y): (Vec<f64>, Vec<f64>) = sample
            .iter()
            .zip(&positions)
            .filter_map(|(obs, pos)| match pos {
                Position::Point(p) => Some((normal::ppf(*p), options.transform.forward(obs.value))),
                Position::Band { .. } => None,
            })
            .unzip();
        let line = fit_line(&x, &y)?;

        debug!(
            intercept = line.intercept,
            slope = line.slope,
            points = line.n,
            "ROS line fitted"
        );

        Ok(Self {
            line,
            positions,
            transform: options.transform,
            converged,
        })
    }

    pub fn line(&self) -> &LinearFit {
        &self.line
    }

    pub fn positions(&self) -> &[Position] {
        &self.positions
    }

    /// Whether the probability estimate behind the positions converged
    pub fn converged(&self) -> bool {
        self.converged
    }

    /// Fill every censored row; exact rows pass through unchanged
    pub fn impute<R: Rng + ?Sized>(&self, sample: &Sample, impute_type: ImputeType, rng: &mut R) -> Vec<f64> {
        sample
            .iter()
            .zip(&self.positions)
            .map(|(obs, pos)| match *pos {
                Position::Point(_) => obs.value,
                Position::Band { lo, hi } => {
                    let (lo, hi) = self.effective_band(obs, lo, hi);
                    let raw = match impute_type {
                        ImputeType::Mean => self.project(normal::truncated_mean(lo, hi)),
                        ImputeType::Stochastic => self.draw(obs, lo, hi, rng),
                    };
                    let value = if raw.is_finite() { raw } else { obs.value };
                    obs.clamp(value)
                }
            })
            .collect()
    }

    fn project(&self, z: f64) -> f64 {
        self.transform.inverse(self.line.predict(z))
    }

    /// Probability band the bracket itself covers under the fitted line
    fn bracket_band(&self, obs: &Observation) -> Option<(f64, f64)> {
        let LinearFit { intercept, slope, .. } = self.line;
        if !(slope > 0.0) {
            return None;
        }
        let to_p = |bound: f64| {
            let t = self.transform.forward(bound);
            if t.is_nan() {
                // log of -inf: nothing of the fitted distribution lies below
                0.0
            } else {
                normal::cdf((t - intercept) / slope)
            }
        };
        Some((to_p(obs.left_bound), to_p(obs.right_bound)))
    }

    /// Rank band narrowed to the part the bracket allows; falls back to the
    /// bracket band when the two do not overlap
    fn effective_band(&self, obs: &Observation, lo: f64, hi: f64) -> (f64, f64) {
        match self.bracket_band(obs) {
            Some((b_lo, b_hi)) => {
                let (n_lo, n_hi) = (lo.max(b_lo), hi.min(b_hi));
                if n_hi > n_lo {
                    (n_lo, n_hi)
                } else if b_hi > b_lo {
                    (b_lo, b_hi)
                } else {
                    (lo, hi)
                }
            }
            None => (lo, hi),
        }
    }

    /// Bounded intervals are sampled uniformly between their bounds; any
    /// bracket open on the transformed scale is sampled from the fitted
    /// distribution restricted to its band
    fn draw<R: Rng + ?Sized>(&self, obs: &Observation, lo: f64, hi: f64, rng: &mut R) -> f64 {
        if obs.status == CensorStatus::IntervalCensored {
            let left = self.transform.forward(obs.left_bound);
            let right = self.transform.forward(obs.right_bound);
            if left.is_finite() && right.is_finite() {
                let u: f64 = rng.gen();
                return obs.left_bound + (obs.right_bound - obs.left_bound) * u;
            }
        }
        self.project(normal::sample_truncated(rng, lo, hi))
    }
}

/// Impute the censored rows of `sample` by regression on order statistics
///
/// Returns one value per row in input order. Censored results always lie
/// within their bracket.
#[instrument(skip(sample, options, rng), fields(n = sample.len(), censored = sample.censored_count()))]
pub fn ros_impute<R: Rng + ?Sized>(
    sample: &Sample,
    censoring: CensoringType,
    options: &RosOptions,
    rng: &mut R,
) -> Result<Vec<f64>> {
    let model = RosModel::fit(sample, censoring, options)?;
    Ok(model.impute(sample, options.impute_type, rng))
}
