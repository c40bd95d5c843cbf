//! The survival-function seam between estimators and their consumers

use censor_core::{CensorStatus, Observation};

/// A nonparametric estimate of a distribution on the value axis
pub trait SurvivalFunction {
    /// `P(T > t)`
    fn survival(&self, t: f64) -> f64;

    /// `P(T >= t)`
    fn survival_before(&self, t: f64) -> f64;

    /// `P(T <= t)`
    fn cdf(&self, t: f64) -> f64 {
        1.0 - self.survival(t)
    }

    /// `P(T < t)`
    fn cdf_before(&self, t: f64) -> f64 {
        1.0 - self.survival_before(t)
    }

    /// Evaluate [`SurvivalFunction::survival`] at every query time
    fn survival_many(&self, times: &[f64]) -> Vec<f64> {
        times.iter().map(|&t| self.survival(t)).collect()
    }

    /// Cumulative probability band `(p_lo, p_hi)` occupied by an observation
    ///
    /// Exact values get the jump at their value. A left-censored limit `L`
    /// gets `(0, P(T < L))`, a right-censored limit `R` gets `(P(T <= R), 1)`
    /// and an interval `[l, r]` gets `(P(T < l), P(T <= r))`.
    fn band(&self, obs: &Observation) -> (f64, f64) {
        let (lo, hi) = match obs.status {
            CensorStatus::Observed => (self.cdf_before(obs.value), self.cdf(obs.value)),
            CensorStatus::LeftCensored => (0.0, self.cdf_before(obs.right_bound)),
            CensorStatus::RightCensored => (self.cdf(obs.left_bound), 1.0),
            CensorStatus::IntervalCensored => {
                (self.cdf_before(obs.left_bound), self.cdf(obs.right_bound))
            }
        };
        let lo = lo.clamp(0.0, 1.0);
        (lo, hi.clamp(lo, 1.0))
    }
}
