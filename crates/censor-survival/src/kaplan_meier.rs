//! Kaplan-Meier product-limit estimator
//!
//! The curve is built on a right-censored axis. Left-censored samples are
//! reflected (`y = -x`) so that "below the limit" becomes "above the limit";
//! every query negates back, so callers always work on the original axis.

use crate::traits::SurvivalFunction;
use censor_core::{Error, Result};
use ordered_float::OrderedFloat;
use tracing::debug;

/// Step-function survival estimate
#[derive(Debug, Clone, PartialEq)]
pub struct KaplanMeierCurve {
    /// Distinct event times on the internal axis, ascending
    times: Vec<f64>,
    /// Survival just after each event time
    survival: Vec<f64>,
    /// Units at risk at each event time
    at_risk: Vec<usize>,
    /// Exact events at each event time
    events: Vec<usize>,
    /// Whether the internal axis is the negated value axis
    reflected: bool,
}

/// Kaplan-Meier estimate for right-censored data
///
/// `is_censored[i]` marks `times[i]` as a censoring time (the unit survived
/// past it) rather than an exact event.
pub fn kaplan_meier(times: &[f64], is_censored: &[bool]) -> Result<KaplanMeierCurve> {
    KaplanMeierCurve::right_censored(times, is_censored)
}

impl KaplanMeierCurve {
    /// Estimate from right-censored data: a censored time `c` means `T > c`
    pub fn right_censored(times: &[f64], is_censored: &[bool]) -> Result<Self> {
        Self::build(times, is_censored, false)
    }

    /// Estimate from left-censored data: a censored value `c` means `X < c`
    pub fn left_censored(values: &[f64], is_censored: &[bool]) -> Result<Self> {
        let reflected: Vec<f64> = values.iter().map(|&v| -v).collect();
        Self::build(&reflected, is_censored, true)
    }

    fn build(times: &[f64], is_censored: &[bool], reflected: bool) -> Result<Self> {
        if times.len() != is_censored.len() {
            return Err(Error::size_mismatch(times.len(), is_censored.len(), "censoring indicator"));
        }
        if times.iter().any(|t| !t.is_finite()) {
            return Err(Error::non_finite("Kaplan-Meier times"));
        }

        // Exact events sort ahead of censorings at the same time, so a unit
        // censored at t is still at risk for the step at t
        let mut order: Vec<(OrderedFloat<f64>, bool)> = times
            .iter()
            .zip(is_censored)
            .map(|(&t, &c)| (OrderedFloat(t), c))
            .collect();
        order.sort_unstable();

        let n = order.len();
        let mut curve = Self {
            times: Vec::new(),
            survival: Vec::new(),
            at_risk: Vec::new(),
            events: Vec::new(),
            reflected,
        };

        let mut removed = 0usize;
        let mut s = 1.0;
        let mut i = 0;
        while i < n {
            let t = order[i].0;
            let at_risk = n - removed;
            let mut events = 0usize;
            let mut censored = 0usize;
            while i < n && order[i].0 == t {
                if order[i].1 {
                    censored += 1;
                } else {
                    events += 1;
                }
                i += 1;
            }
            if events > 0 {
                s *= 1.0 - events as f64 / at_risk as f64;
                curve.times.push(t.into_inner());
                curve.survival.push(s);
                curve.at_risk.push(at_risk);
                curve.events.push(events);
            }
            removed += events + censored;
        }

        debug!(
            n,
            steps = curve.times.len(),
            reflected,
            "Kaplan-Meier curve built"
        );
        Ok(curve)
    }

    /// Event times on the original value axis, ascending
    pub fn event_times(&self) -> Vec<f64> {
        if self.reflected {
            self.times.iter().rev().map(|&t| -t).collect()
        } else {
            self.times.clone()
        }
    }

    /// Internal-axis survival after each step
    pub fn steps(&self) -> &[f64] {
        &self.survival
    }

    pub fn at_risk(&self) -> &[usize] {
        &self.at_risk
    }

    pub fn events(&self) -> &[usize] {
        &self.events
    }

    pub fn is_reflected(&self) -> bool {
        self.reflected
    }

    /// Product over event times `<= y` on the internal axis
    fn step_at(&self, y: f64) -> f64 {
        let idx = self.times.partition_point(|&t| t <= y);
        if idx == 0 {
            1.0
        } else {
            self.survival[idx - 1]
        }
    }

    /// Product over event times `< y` on the internal axis
    fn step_before(&self, y: f64) -> f64 {
        let idx = self.times.partition_point(|&t| t < y);
        if idx == 0 {
            1.0
        } else {
            self.survival[idx - 1]
        }
    }
}

impl SurvivalFunction for KaplanMeierCurve {
    fn survival(&self, t: f64) -> f64 {
        if self.reflected {
            // P(X > t) = P(Y < -t)
            1.0 - self.step_before(-t)
        } else {
            self.step_at(t)
        }
    }

    fn survival_before(&self, t: f64) -> f64 {
        if self.reflected {
            // P(X >= t) = P(Y <= -t)
            1.0 - self.step_at(-t)
        } else {
            self.step_before(t)
        }
    }
}
