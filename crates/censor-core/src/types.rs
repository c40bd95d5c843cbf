//! Observation and sample types shared by every imputation engine

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Censoring status of a single observation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CensorStatus {
    /// Exact measurement
    Observed,
    /// True value is below the reported limit
    LeftCensored,
    /// True value is above the reported limit
    RightCensored,
    /// True value lies within `[left_bound, right_bound]`
    IntervalCensored,
}

impl CensorStatus {
    /// Decode the conventional integer status codes (-1 left, 0 observed, 1 right)
    pub fn from_code(code: i8) -> Result<Self> {
        match code {
            -1 => Ok(Self::LeftCensored),
            0 => Ok(Self::Observed),
            1 => Ok(Self::RightCensored),
            other => Err(Error::InvalidInput(format!(
                "status code {other} is not one of -1, 0, 1"
            ))),
        }
    }

    /// Integer code for this status; interval censoring maps to 2
    pub fn code(self) -> i8 {
        match self {
            Self::LeftCensored => -1,
            Self::Observed => 0,
            Self::RightCensored => 1,
            Self::IntervalCensored => 2,
        }
    }

    pub fn is_censored(self) -> bool {
        !matches!(self, Self::Observed)
    }
}

/// Censoring pattern of a whole sample
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CensoringType {
    Left,
    Right,
    Mixed,
    Interval,
}

impl CensoringType {
    pub fn name(self) -> &'static str {
        match self {
            Self::Left => "left",
            Self::Right => "right",
            Self::Mixed => "mixed",
            Self::Interval => "interval",
        }
    }

    /// Whether an observation with `status` may appear in a sample of this type
    pub fn admits(self, status: CensorStatus) -> bool {
        match (self, status) {
            (_, CensorStatus::Observed) => true,
            (Self::Left, CensorStatus::LeftCensored) => true,
            (Self::Right, CensorStatus::RightCensored) => true,
            (Self::Mixed, CensorStatus::LeftCensored | CensorStatus::RightCensored) => true,
            (Self::Interval, _) => true,
            _ => false,
        }
    }
}

impl FromStr for CensoringType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "left" => Ok(Self::Left),
            "right" => Ok(Self::Right),
            "mixed" => Ok(Self::Mixed),
            "interval" => Ok(Self::Interval),
            other => Err(Error::unknown_option(
                "censoring type",
                other,
                &["left", "right", "mixed", "interval"],
            )),
        }
    }
}

impl fmt::Display for CensoringType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// How censored points are filled in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ImputeType {
    /// Conditional expectation; identical limits give identical values
    Mean,
    /// Draw from the conditional distribution
    #[default]
    Stochastic,
}

impl FromStr for ImputeType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "mean" => Ok(Self::Mean),
            "stochastic" => Ok(Self::Stochastic),
            other => Err(Error::unknown_option(
                "impute type",
                other,
                &["mean", "stochastic"],
            )),
        }
    }
}

/// One sample unit with its censoring bracket
///
/// `left_bound <= right_bound` always holds for values built through the
/// constructors. A left-censored observation has `left_bound = -inf`, a
/// right-censored one `right_bound = +inf`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    /// Reported value, or the limit for censored points
    pub value: f64,
    pub left_bound: f64,
    pub right_bound: f64,
    pub status: CensorStatus,
}

impl Observation {
    pub fn observed(value: f64) -> Self {
        Self {
            value,
            left_bound: value,
            right_bound: value,
            status: CensorStatus::Observed,
        }
    }

    pub fn left_censored(limit: f64) -> Self {
        Self {
            value: limit,
            left_bound: f64::NEG_INFINITY,
            right_bound: limit,
            status: CensorStatus::LeftCensored,
        }
    }

    pub fn right_censored(limit: f64) -> Self {
        Self {
            value: limit,
            left_bound: limit,
            right_bound: f64::INFINITY,
            status: CensorStatus::RightCensored,
        }
    }

    /// Build from a value and a status code
    pub fn with_status(value: f64, status: CensorStatus) -> Result<Self> {
        match status {
            CensorStatus::Observed => Ok(Self::observed(value)),
            CensorStatus::LeftCensored => Ok(Self::left_censored(value)),
            CensorStatus::RightCensored => Ok(Self::right_censored(value)),
            CensorStatus::IntervalCensored => Err(Error::InvalidInput(
                "interval-censored observations need both bounds".to_string(),
            )),
        }
    }

    /// Classify a bracket: equal bounds are exact, an infinite side makes it
    /// one-sided, anything else is an interval.
    ///
    /// Returns `None` when either bound is NaN or `left > right`.
    pub fn from_bounds(left: f64, right: f64) -> Option<Self> {
        if left.is_nan() || right.is_nan() || left > right {
            return None;
        }
        let obs = if left == right {
            Self::observed(left)
        } else if left == f64::NEG_INFINITY && right.is_finite() {
            Self::left_censored(right)
        } else if right == f64::INFINITY && left.is_finite() {
            Self::right_censored(left)
        } else {
            let value = match (left.is_finite(), right.is_finite()) {
                (true, true) => 0.5 * (left + right),
                (true, false) => left,
                (false, true) => right,
                (false, false) => 0.0,
            };
            Self {
                value,
                left_bound: left,
                right_bound: right,
                status: CensorStatus::IntervalCensored,
            }
        };
        Some(obs)
    }

    pub fn is_censored(&self) -> bool {
        self.status.is_censored()
    }

    /// Whether `x` lies inside this observation's bracket
    pub fn contains(&self, x: f64) -> bool {
        x >= self.left_bound && x <= self.right_bound
    }

    /// Clip `x` into the bracket
    pub fn clamp(&self, x: f64) -> f64 {
        if x < self.left_bound {
            self.left_bound
        } else if x > self.right_bound {
            self.right_bound
        } else {
            x
        }
    }
}

/// An ordered collection of observations; row order is preserved end to end
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    observations: Vec<Observation>,
}

impl Sample {
    /// Validate and wrap a list of observations
    pub fn new(observations: Vec<Observation>) -> Result<Self> {
        for (index, obs) in observations.iter().enumerate() {
            if obs.value.is_nan() || obs.left_bound.is_nan() || obs.right_bound.is_nan() {
                return Err(Error::InvalidInput(format!(
                    "observation {index} contains NaN"
                )));
            }
            if obs.left_bound > obs.right_bound {
                return Err(Error::MalformedBounds {
                    index,
                    left: obs.left_bound,
                    right: obs.right_bound,
                });
            }
            if obs.status == CensorStatus::Observed && !obs.value.is_finite() {
                return Err(Error::InvalidInput(format!(
                    "observed value at {index} is not finite"
                )));
            }
        }
        Ok(Self { observations })
    }

    /// Values paired with explicit statuses
    pub fn from_status(values: &[f64], status: &[CensorStatus]) -> Result<Self> {
        if values.len() != status.len() {
            return Err(Error::size_mismatch(values.len(), status.len(), "status"));
        }
        let observations = values
            .iter()
            .zip(status)
            .map(|(&v, &s)| Observation::with_status(v, s))
            .collect::<Result<Vec<_>>>()?;
        Self::new(observations)
    }

    /// Values paired with -1/0/1 status codes
    pub fn from_codes(values: &[f64], codes: &[i8]) -> Result<Self> {
        let status = codes
            .iter()
            .map(|&c| CensorStatus::from_code(c))
            .collect::<Result<Vec<_>>>()?;
        Self::from_status(values, &status)
    }

    /// Values paired with a boolean censoring mask; `censoring` picks the side
    pub fn from_mask(values: &[f64], censored: &[bool], censoring: CensoringType) -> Result<Self> {
        let side = match censoring {
            CensoringType::Left => CensorStatus::LeftCensored,
            CensoringType::Right => CensorStatus::RightCensored,
            other => {
                return Err(Error::InvalidParameter(format!(
                    "a boolean censoring mask needs left or right censoring, got {other}"
                )))
            }
        };
        let status: Vec<CensorStatus> = censored
            .iter()
            .map(|&c| if c { side } else { CensorStatus::Observed })
            .collect();
        Self::from_status(values, &status)
    }

    /// Left/right bound pairs; status is inferred per row
    pub fn from_bounds(left: &[f64], right: &[f64]) -> Result<Self> {
        if left.len() != right.len() {
            return Err(Error::size_mismatch(left.len(), right.len(), "right bounds"));
        }
        let observations = left
            .iter()
            .zip(right)
            .enumerate()
            .map(|(index, (&l, &r))| {
                Observation::from_bounds(l, r).ok_or(Error::MalformedBounds {
                    index,
                    left: l,
                    right: r,
                })
            })
            .collect::<Result<Vec<_>>>()?;
        Self::new(observations)
    }

    pub fn len(&self) -> usize {
        self.observations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observations.is_empty()
    }

    pub fn observations(&self) -> &[Observation] {
        &self.observations
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Observation> {
        self.observations.iter()
    }

    pub fn values(&self) -> Vec<f64> {
        self.observations.iter().map(|o| o.value).collect()
    }

    pub fn left_bounds(&self) -> Vec<f64> {
        self.observations.iter().map(|o| o.left_bound).collect()
    }

    pub fn right_bounds(&self) -> Vec<f64> {
        self.observations.iter().map(|o| o.right_bound).collect()
    }

    pub fn observed_count(&self) -> usize {
        self.observations.iter().filter(|o| !o.is_censored()).count()
    }

    pub fn censored_count(&self) -> usize {
        self.len() - self.observed_count()
    }

    /// Censoring pattern inferred from the statuses present
    pub fn censoring_type(&self) -> CensoringType {
        let mut left = false;
        let mut right = false;
        for obs in &self.observations {
            match obs.status {
                CensorStatus::IntervalCensored => return CensoringType::Interval,
                CensorStatus::LeftCensored => left = true,
                CensorStatus::RightCensored => right = true,
                CensorStatus::Observed => {}
            }
        }
        match (left, right) {
            (true, true) => CensoringType::Mixed,
            (false, true) => CensoringType::Right,
            _ => CensoringType::Left,
        }
    }

    /// Fail unless every status is admissible under `censoring`
    pub fn check_censoring(&self, censoring: CensoringType) -> Result<()> {
        match self
            .observations
            .iter()
            .position(|o| !censoring.admits(o.status))
        {
            Some(index) => Err(Error::InvalidParameter(format!(
                "observation {index} is {:?}, which {censoring} censoring does not allow",
                self.observations[index].status
            ))),
            None => Ok(()),
        }
    }

    /// Fail unless at least `min` observations are exact
    pub fn require_observed(&self, min: usize) -> Result<()> {
        let actual = self.observed_count();
        if actual < min {
            return Err(Error::insufficient_observed(min, actual));
        }
        Ok(())
    }

    /// Fail unless every value is usable by a positive-support family
    ///
    /// Exact values and one-sided limits must be `> 0`. Interval lower
    /// bounds may be `0`, upper bounds must be `> 0`.
    pub fn require_positive(&self, family: &'static str) -> Result<()> {
        for (index, obs) in self.observations.iter().enumerate() {
            let bad = match obs.status {
                CensorStatus::IntervalCensored => {
                    (obs.left_bound.is_finite() && obs.left_bound < 0.0)
                        .then_some(obs.left_bound)
                        .or((obs.right_bound <= 0.0).then_some(obs.right_bound))
                }
                _ => (obs.value <= 0.0).then_some(obs.value),
            };
            if let Some(value) = bad {
                return Err(Error::DataDomain {
                    index,
                    value,
                    family,
                });
            }
        }
        Ok(())
    }

    /// Whether every value would pass [`Sample::require_positive`]
    pub fn is_positive(&self) -> bool {
        self.require_positive("").is_ok()
    }
}

impl<'a> IntoIterator for &'a Sample {
    type Item = &'a Observation;
    type IntoIter = std::slice::Iter<'a, Observation>;

    fn into_iter(self) -> Self::IntoIter {
        self.observations.iter()
    }
}
