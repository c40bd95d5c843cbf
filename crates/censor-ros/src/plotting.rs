//! Plotting positions
//!
//! Every observation gets a place on the cumulative probability axis: exact
//! values a single point, censored values the band their bracket allows.

use censor_core::{CensorStatus, CensoringType, Error, Observation, Result, Sample};
use censor_survival::{turnbull_em, KaplanMeierCurve, SurvivalFunction, TurnbullOptions};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;
use tracing::debug;

/// Plotting position convention
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PlottingPosition {
    /// `rank / (n + 1)` with censored points ranked at their limit
    Simple,
    /// Product-limit (Kaplan-Meier) exceedance probabilities
    #[default]
    KaplanMeier,
}

impl PlottingPosition {
    pub fn name(self) -> &'static str {
        match self {
            Self::Simple => "simple",
            Self::KaplanMeier => "kaplan-meier",
        }
    }
}

impl FromStr for PlottingPosition {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "simple" => Ok(Self::Simple),
            "kaplan-meier" | "kaplan_meier" | "km" | "product-limit" => Ok(Self::KaplanMeier),
            other => Err(Error::unknown_option(
                "plotting position",
                other,
                &["simple", "kaplan-meier"],
            )),
        }
    }
}

impl fmt::Display for PlottingPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Position of one observation on the cumulative probability axis
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Position {
    /// Exact value at cumulative probability `p`
    Point(f64),
    /// Censored value somewhere in `(lo, hi)`
    Band { lo: f64, hi: f64 },
}

/// Row-ordered plotting positions
#[derive(Debug, Clone, PartialEq)]
pub struct PlottingPositions {
    pub positions: Vec<Position>,
    /// False when the Turnbull EM behind the positions hit its iteration cap
    pub converged: bool,
}

impl PlottingPositions {
    fn closed_form(positions: Vec<Position>) -> Self {
        Self {
            positions,
            converged: true,
        }
    }
}

/// Plotting positions for every row of `sample`, in row order
///
/// Interval-censored samples always use Turnbull probabilities. Mixed
/// samples under the product-limit convention do too; one-sided brackets
/// are open at their limit there, so Turnbull breaks ties the way
/// Kaplan-Meier does.
pub fn plotting_positions(
    sample: &Sample,
    censoring: CensoringType,
    method: PlottingPosition,
    turnbull: &TurnbullOptions,
) -> Result<PlottingPositions> {
    match (method, censoring) {
        (PlottingPosition::Simple, CensoringType::Left | CensoringType::Right | CensoringType::Mixed) => {
            Ok(PlottingPositions::closed_form(simple_positions(sample)))
        }
        (PlottingPosition::KaplanMeier, CensoringType::Left) => {
            let (values, censored) = split(sample);
            let curve = KaplanMeierCurve::left_censored(&values, &censored)?;
            Ok(PlottingPositions::closed_form(from_survival(sample, &curve)))
        }
        (PlottingPosition::KaplanMeier, CensoringType::Right) => {
            let (values, censored) = split(sample);
            let curve = KaplanMeierCurve::right_censored(&values, &censored)?;
            Ok(PlottingPositions::closed_form(from_survival(sample, &curve)))
        }
        (method, censoring) => {
            debug!(%method, %censoring, "using Turnbull probabilities for plotting positions");
            let estimate = turnbull_em(&sample.left_bounds(), &sample.right_bounds(), turnbull)?;
            Ok(PlottingPositions {
                positions: from_survival(sample, &estimate),
                converged: estimate.converged(),
            })
        }
    }
}

fn split(sample: &Sample) -> (Vec<f64>, Vec<bool>) {
    sample.iter().map(|o| (o.value, o.is_censored())).unzip()
}

/// Exact values share their jump evenly: the `j`-th of `d` ties sits at
/// `lo + (hi - lo) * (j - 0.5) / d`
fn from_survival<S: SurvivalFunction>(sample: &Sample, estimate: &S) -> Vec<Position> {
    let observations = sample.observations();
    let mut positions: Vec<Position> = observations
        .iter()
        .map(|obs| {
            let (lo, hi) = estimate.band(obs);
            Position::Band { lo, hi }
        })
        .collect();

    let mut exact: Vec<usize> = (0..observations.len())
        .filter(|&i| !observations[i].is_censored())
        .collect();
    exact.sort_by(|&a, &b| observations[a].value.total_cmp(&observations[b].value));

    for group in exact.chunk_by(|&a, &b| observations[a].value == observations[b].value) {
        let (lo, hi) = estimate.band(&observations[group[0]]);
        let d = group.len() as f64;
        for (j, &index) in group.iter().enumerate() {
            positions[index] = Position::Point(lo + (hi - lo) * (j as f64 + 0.5) / d);
        }
    }
    positions
}

/// Rank key: at equal values left-censored sorts first, right-censored last
fn rank_class(obs: &Observation) -> u8 {
    match obs.status {
        CensorStatus::LeftCensored => 0,
        CensorStatus::Observed | CensorStatus::IntervalCensored => 1,
        CensorStatus::RightCensored => 2,
    }
}

fn rank_cmp(a: &Observation, b: &Observation) -> Ordering {
    a.value
        .total_cmp(&b.value)
        .then_with(|| rank_class(a).cmp(&rank_class(b)))
}

fn simple_positions(sample: &Sample) -> Vec<Position> {
    let observations = sample.observations();
    let n1 = (observations.len() + 1) as f64;

    let mut order: Vec<usize> = (0..observations.len()).collect();
    order.sort_by(|&a, &b| rank_cmp(&observations[a], &observations[b]));
    let mut ranks = vec![0usize; observations.len()];
    for (rank, &index) in order.iter().enumerate() {
        ranks[index] = rank + 1;
    }
    let sorted: Vec<&Observation> = order.iter().map(|&i| &observations[i]).collect();

    observations
        .iter()
        .zip(&ranks)
        .map(|(obs, &rank)| match obs.status {
            CensorStatus::LeftCensored => {
                // Everything ranked at or below this limit
                let m = sorted.partition_point(|o| rank_cmp(o, obs) != Ordering::Greater);
                Position::Band { lo: 0.0, hi: m as f64 / n1 }
            }
            CensorStatus::RightCensored => {
                let m = sorted.partition_point(|o| rank_cmp(o, obs) == Ordering::Less);
                Position::Band { lo: (m + 1) as f64 / n1, hi: 1.0 }
            }
            _ => Position::Point(rank as f64 / n1),
        })
        .collect()
}
