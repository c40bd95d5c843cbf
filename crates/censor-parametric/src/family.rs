//! Distribution families
//!
//! [`Family`] is the configuration tag; [`Distribution`] is a family with
//! concrete parameters. Both are closed enums, so every operation below is
//! an exhaustive match.

use censor_core::math::normal;
use censor_core::{Error, Result};
use rand::Rng;
use serde::{Deserialize, Serialize};
use statrs::distribution::{Continuous, LogNormal, Normal, Weibull};
use statrs::function::gamma::{gamma, gamma_lr, gamma_ur};
use std::fmt;
use std::str::FromStr;

/// Candidate parametric family
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Family {
    Normal,
    #[default]
    Lognormal,
    Weibull,
}

impl Family {
    pub const ALL: [Family; 3] = [Family::Normal, Family::Lognormal, Family::Weibull];

    pub fn name(self) -> &'static str {
        match self {
            Self::Normal => "normal",
            Self::Lognormal => "lognormal",
            Self::Weibull => "weibull",
        }
    }

    /// Whether the family's support is `x > 0`
    pub fn requires_positive(self) -> bool {
        !matches!(self, Self::Normal)
    }

    /// Number of free parameters
    pub fn n_params(self) -> usize {
        2
    }

    /// Map unconstrained optimizer coordinates to a distribution
    ///
    /// Normal and lognormal use `(mu, ln sigma)`, weibull `(ln k, ln lambda)`.
    pub fn from_theta(self, theta: &[f64]) -> Distribution {
        let (a, b) = (theta[0], theta[1]);
        match self {
            Self::Normal => Distribution::Normal { mu: a, sigma: b.exp() },
            Self::Lognormal => Distribution::Lognormal { mu: a, sigma: b.exp() },
            Self::Weibull => Distribution::Weibull {
                shape: a.exp(),
                scale: b.exp(),
            },
        }
    }

    /// Starting point from the exact values of a sample
    pub fn initial_theta(self, observed: &[f64]) -> Vec<f64> {
        let log_sd = |sd: f64| if sd > 0.0 && sd.is_finite() { sd.ln() } else { 0.0 };
        match self {
            Self::Normal => {
                let m = censor_core::utils::mean(observed);
                let sd = censor_core::utils::std_dev(observed);
                vec![m, log_sd(sd)]
            }
            Self::Lognormal => {
                let logs: Vec<f64> = observed.iter().map(|x| x.ln()).collect();
                vec![censor_core::utils::mean(&logs), log_sd(censor_core::utils::std_dev(&logs))]
            }
            Self::Weibull => {
                // sd(ln X) = pi / (k sqrt 6), E[ln X] = ln lambda - gamma_e / k
                let logs: Vec<f64> = observed.iter().map(|x| x.ln()).collect();
                let sd = censor_core::utils::std_dev(&logs);
                let k = if sd > 0.0 {
                    std::f64::consts::PI / (sd * 6f64.sqrt())
                } else {
                    1.0
                };
                let ln_lambda = censor_core::utils::mean(&logs) + 0.577_215_664_901_532_9 / k;
                vec![k.ln(), ln_lambda]
            }
        }
    }
}

impl FromStr for Family {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "normal" | "gaussian" => Ok(Self::Normal),
            "lognormal" => Ok(Self::Lognormal),
            "weibull" => Ok(Self::Weibull),
            other => Err(Error::unknown_option(
                "distribution family",
                other,
                &["normal", "lognormal", "weibull"],
            )),
        }
    }
}

impl fmt::Display for Family {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A family with fitted parameters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "family", rename_all = "snake_case")]
pub enum Distribution {
    Normal { mu: f64, sigma: f64 },
    /// `ln X ~ Normal(mu, sigma)`
    Lognormal { mu: f64, sigma: f64 },
    Weibull { shape: f64, scale: f64 },
}

impl Distribution {
    pub fn family(&self) -> Family {
        match self {
            Self::Normal { .. } => Family::Normal,
            Self::Lognormal { .. } => Family::Lognormal,
            Self::Weibull { .. } => Family::Weibull,
        }
    }

    /// Log density on the original scale; `-inf` outside the support
    pub fn ln_pdf(&self, x: f64) -> f64 {
        let value = match *self {
            Self::Normal { mu, sigma } => Normal::new(mu, sigma).map(|d| d.ln_pdf(x)),
            Self::Lognormal { .. } | Self::Weibull { .. } if x <= 0.0 => return f64::NEG_INFINITY,
            Self::Lognormal { mu, sigma } => LogNormal::new(mu, sigma).map(|d| d.ln_pdf(x)),
            Self::Weibull { shape, scale } => Weibull::new(shape, scale).map(|d| d.ln_pdf(x)),
        };
        value.unwrap_or(f64::NEG_INFINITY)
    }

    /// Standardized normal score for the normal-based families
    fn z(mu: f64, sigma: f64, t: f64) -> f64 {
        (t - mu) / sigma
    }

    fn log_z(mu: f64, sigma: f64, x: f64) -> f64 {
        if x <= 0.0 {
            f64::NEG_INFINITY
        } else {
            Self::z(mu, sigma, x.ln())
        }
    }

    /// `(x / lambda)^k`, zero below the support
    fn weibull_t(shape: f64, scale: f64, x: f64) -> f64 {
        if x <= 0.0 {
            0.0
        } else {
            (x / scale).powf(shape)
        }
    }

    pub fn cdf(&self, x: f64) -> f64 {
        match *self {
            Self::Normal { mu, sigma } => normal::cdf(Self::z(mu, sigma, x)),
            Self::Lognormal { mu, sigma } => normal::cdf(Self::log_z(mu, sigma, x)),
            Self::Weibull { shape, scale } => -(-Self::weibull_t(shape, scale, x)).exp_m1(),
        }
    }

    /// Upper tail `P(X > x)`
    pub fn sf(&self, x: f64) -> f64 {
        match *self {
            Self::Normal { mu, sigma } => normal::sf(Self::z(mu, sigma, x)),
            Self::Lognormal { mu, sigma } => normal::sf(Self::log_z(mu, sigma, x)),
            Self::Weibull { shape, scale } => (-Self::weibull_t(shape, scale, x)).exp(),
        }
    }

    pub fn inverse_cdf(&self, p: f64) -> f64 {
        match *self {
            Self::Normal { mu, sigma } => mu + sigma * normal::ppf(p),
            Self::Lognormal { mu, sigma } => (mu + sigma * normal::ppf(p)).exp(),
            Self::Weibull { shape, scale } => scale * (-(-p).ln_1p()).powf(1.0 / shape),
        }
    }

    /// Inverse of the upper tail, accurate for small `q`
    pub fn inverse_sf(&self, q: f64) -> f64 {
        match *self {
            Self::Normal { mu, sigma } => mu - sigma * normal::ppf(q),
            Self::Lognormal { mu, sigma } => (mu - sigma * normal::ppf(q)).exp(),
            Self::Weibull { shape, scale } => scale * (-q.ln()).powf(1.0 / shape),
        }
    }

    /// `P(left < X <= right)`, taken from whichever tail keeps precision
    pub fn probability(&self, left: f64, right: f64) -> f64 {
        if self.cdf(left) > 0.5 {
            self.sf(left) - self.sf(right)
        } else {
            self.cdf(right) - self.cdf(left)
        }
        .max(0.0)
    }

    /// `E[X | left < X <= right]`
    ///
    /// NaN when the fitted distribution puts no measurable mass on the
    /// bracket; callers fall back to the limit.
    pub fn conditional_mean(&self, left: f64, right: f64) -> f64 {
        let mass = self.probability(left, right);
        if !(mass > 0.0) {
            return f64::NAN;
        }
        match *self {
            Self::Normal { mu, sigma } => {
                let a = Self::z(mu, sigma, left);
                let b = Self::z(mu, sigma, right);
                mu + sigma * (normal::pdf(a) - normal::pdf(b)) / mass
            }
            Self::Lognormal { mu, sigma } => {
                // Partial moment: exp(mu + sigma^2 / 2) * P(a - sigma < Z <= b - sigma)
                let a = Self::log_z(mu, sigma, left) - sigma;
                let b = Self::log_z(mu, sigma, right) - sigma;
                let shifted = if a > 0.0 {
                    normal::sf(a) - normal::sf(b)
                } else {
                    normal::cdf(b) - normal::cdf(a)
                };
                (mu + 0.5 * sigma * sigma).exp() * shifted.max(0.0) / mass
            }
            Self::Weibull { shape, scale } => {
                // E[X; X <= x] = lambda * Gamma(s) * P(s, (x / lambda)^k), s = 1 + 1/k
                let s = 1.0 + 1.0 / shape;
                let tl = Self::weibull_t(shape, scale, left);
                let tr = Self::weibull_t(shape, scale, right);
                let partial = if self.cdf(left) > 0.5 {
                    upper_regularized(s, tl) - upper_regularized(s, tr)
                } else {
                    lower_regularized(s, tr) - lower_regularized(s, tl)
                };
                scale * gamma(s) * partial.max(0.0) / mass
            }
        }
    }

    /// `E[X | X < limit]`
    pub fn mean_below(&self, limit: f64) -> f64 {
        self.conditional_mean(f64::NEG_INFINITY, limit)
    }

    /// `E[X | X > limit]`
    pub fn mean_above(&self, limit: f64) -> f64 {
        self.conditional_mean(limit, f64::INFINITY)
    }

    /// Inverse-CDF draw from the distribution restricted to `(left, right]`
    pub fn sample_between<R: Rng + ?Sized>(&self, left: f64, right: f64, rng: &mut R) -> f64 {
        let u: f64 = rng.gen();
        let lo = self.cdf(left);
        if lo > 0.5 {
            let (q_hi, q_lo) = (self.sf(left), self.sf(right));
            self.inverse_sf(q_lo + (q_hi - q_lo) * u)
        } else {
            let hi = self.cdf(right);
            self.inverse_cdf(lo + (hi - lo) * u)
        }
    }
}

fn lower_regularized(s: f64, t: f64) -> f64 {
    if t <= 0.0 {
        0.0
    } else if t.is_infinite() {
        1.0
    } else {
        gamma_lr(s, t)
    }
}

fn upper_regularized(s: f64, t: f64) -> f64 {
    if t <= 0.0 {
        1.0
    } else if t.is_infinite() {
        0.0
    } else {
        gamma_ur(s, t)
    }
}
