//! Substitution baseline
//!
//! Replaces each censored value by a fixed fraction of its limit. Biased
//! for anything but the crudest summaries; kept for comparison with ROS and
//! the parametric engine.

use censor_core::{CensorStatus, Error, Observation, Result, Sample};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Value substituted for a left-censored limit `L`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubstitutionRule {
    /// `L / 2`
    #[default]
    Half,
    /// `0`
    Zero,
    /// `L`
    Limit,
}

impl SubstitutionRule {
    pub fn name(self) -> &'static str {
        match self {
            Self::Half => "half",
            Self::Zero => "zero",
            Self::Limit => "limit",
        }
    }

    fn substitute(self, obs: &Observation) -> f64 {
        let raw = match obs.status {
            CensorStatus::Observed => return obs.value,
            CensorStatus::LeftCensored => match self {
                Self::Half => 0.5 * obs.value,
                Self::Zero => 0.0,
                Self::Limit => obs.value,
            },
            CensorStatus::RightCensored | CensorStatus::IntervalCensored => obs.value,
        };
        obs.clamp(raw)
    }
}

impl FromStr for SubstitutionRule {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "half" => Ok(Self::Half),
            "zero" => Ok(Self::Zero),
            "limit" => Ok(Self::Limit),
            other => Err(Error::unknown_option("substitution rule", other, &["half", "zero", "limit"])),
        }
    }
}

impl fmt::Display for SubstitutionRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Substitute every censored row
///
/// Right-censored rows keep their limit and intervals take their midpoint
/// (or their finite side when half-open). Results are clipped to the bracket,
/// so `half` of a negative limit stays at the limit.
pub fn substitute(sample: &Sample, rule: SubstitutionRule) -> Vec<f64> {
    sample.iter().map(|obs| rule.substitute(obs)).collect()
}
