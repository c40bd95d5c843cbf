//! Censored maximum-likelihood fitting
//!
//! The negative censored log-likelihood is minimized with argmin's
//! Nelder-Mead over unconstrained coordinates (see [`Family::from_theta`]).
//! Exact values contribute `ln f(x)`, left-censored limits `ln F(L)`,
//! right-censored limits `ln S(R)` and intervals `ln P(l < X <= r)`.

use crate::family::{Distribution, Family};
use argmin::core::{CostFunction, Executor, State, TerminationReason, TerminationStatus};
use argmin::solver::neldermead::NelderMead;
use censor_core::{CensorStatus, Error, Result, Sample};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument, warn};

/// Fewest exact values a two-parameter family is fitted from
pub const MIN_OBSERVED: usize = 2;

/// Cost reported for parameters where the likelihood is not finite
const INFEASIBLE_COST: f64 = 1e300;

/// Optimizer settings
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FitOptions {
    /// Simplex cost standard deviation at which Nelder-Mead stops
    pub tolerance: f64,
    pub max_iter: u64,
}

impl Default for FitOptions {
    fn default() -> Self {
        Self {
            tolerance: 1e-10,
            max_iter: 2000,
        }
    }
}

impl FitOptions {
    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    pub fn with_max_iter(mut self, max_iter: u64) -> Self {
        self.max_iter = max_iter;
        self
    }
}

/// Maximum-likelihood fit of one family to one sample
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FittedDistribution {
    pub distribution: Distribution,
    /// Censored log-likelihood at the optimum, on the original data scale
    pub log_likelihood: f64,
    /// False when the optimizer stopped at its iteration cap
    pub converged: bool,
    pub iterations: u64,
}

impl FittedDistribution {
    pub fn family(&self) -> Family {
        self.distribution.family()
    }

    /// Akaike information criterion; lower is better
    pub fn aic(&self) -> f64 {
        2.0 * self.family().n_params() as f64 - 2.0 * self.log_likelihood
    }
}

/// Censored log-likelihood of `sample` under `dist`
pub fn log_likelihood(dist: &Distribution, sample: &Sample) -> f64 {
    sample
        .iter()
        .map(|obs| match obs.status {
            CensorStatus::Observed => dist.ln_pdf(obs.value),
            CensorStatus::LeftCensored => dist.cdf(obs.right_bound).ln(),
            CensorStatus::RightCensored => dist.sf(obs.left_bound).ln(),
            CensorStatus::IntervalCensored => dist.probability(obs.left_bound, obs.right_bound).ln(),
        })
        .sum()
}

/// argmin problem: negative log-likelihood over unconstrained coordinates
struct CensoredLikelihood<'a> {
    family: Family,
    sample: &'a Sample,
}

impl CostFunction for CensoredLikelihood<'_> {
    type Param = Vec<f64>;
    type Output = f64;

    fn cost(&self, theta: &Self::Param) -> std::result::Result<Self::Output, argmin::core::Error> {
        let ll = log_likelihood(&self.family.from_theta(theta), self.sample);
        Ok(if ll.is_finite() { -ll } else { INFEASIBLE_COST })
    }
}

/// Fit `family` to `sample` by censored maximum likelihood
///
/// Fails with a data-domain error when a positive-support family meets a
/// non-positive value, and with an insufficient-data error when fewer than
/// two values are exact. Hitting the iteration cap is reported through
/// `converged`, not as an error.
#[instrument(skip(sample, options), fields(n = sample.len(), family = %family))]
pub fn parametric_fit(sample: &Sample, family: Family, options: &FitOptions) -> Result<FittedDistribution> {
    if family.requires_positive() {
        sample.require_positive(family.name())?;
    }
    sample.require_observed(MIN_OBSERVED)?;

    let observed: Vec<f64> = sample
        .iter()
        .filter(|o| !o.is_censored())
        .map(|o| o.value)
        .collect();
    let theta0 = family.initial_theta(&observed);
    if theta0.iter().any(|t| !t.is_finite()) {
        return Err(Error::non_finite("initial parameter guess"));
    }

    // Initial simplex: the starting point plus one step along each axis
    let mut simplex = vec![theta0.clone()];
    for i in 0..theta0.len() {
        let mut vertex = theta0.clone();
        vertex[i] += 0.25 * theta0[i].abs().max(1.0);
        simplex.push(vertex);
    }
    let solver = NelderMead::new(simplex).with_sd_tolerance(options.tolerance)?;
    let problem = CensoredLikelihood { family, sample };

    let result = Executor::new(problem, solver)
        .configure(|state| state.max_iters(options.max_iter))
        .run()?;
    let state = result.state();

    let theta = state
        .get_best_param()
        .cloned()
        .ok_or_else(|| Error::Computation("optimizer returned no parameters".to_string()))?;
    let distribution = family.from_theta(&theta);
    let log_likelihood = -state.get_best_cost();
    if !log_likelihood.is_finite() || log_likelihood <= -INFEASIBLE_COST {
        return Err(Error::Computation(format!(
            "{family} likelihood is not finite at any explored parameter"
        )));
    }

    let iterations = state.get_iter();
    let converged = !matches!(
        state.get_termination_status(),
        TerminationStatus::Terminated(TerminationReason::MaxItersReached)
    );
    if converged {
        debug!(?distribution, log_likelihood, iterations, "censored MLE converged");
    } else {
        warn!(
            ?distribution,
            log_likelihood,
            iterations,
            "censored MLE stopped at the iteration cap"
        );
    }

    Ok(FittedDistribution {
        distribution,
        log_likelihood,
        converged,
        iterations,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;
    use rand_distr::{Distribution as _, Normal};

    fn normal_sample(n: usize, limit: f64, seed: u64) -> Sample {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let dist = Normal::new(10.0, 2.0).unwrap();
        let (values, codes): (Vec<f64>, Vec<i8>) = (0..n)
            .map(|_| {
                let x = dist.sample(&mut rng);
                if x < limit { (limit, -1) } else { (x, 0) }
            })
            .unzip();
        Sample::from_codes(&values, &codes).unwrap()
    }

    #[test]
    fn test_recovers_normal_parameters_under_censoring() {
        let sample = normal_sample(2000, 8.0, 42);
        let fit = parametric_fit(&sample, Family::Normal, &FitOptions::default()).unwrap();
        assert!(fit.converged);
        match fit.distribution {
            Distribution::Normal { mu, sigma } => {
                assert!((mu - 10.0).abs() < 0.15, "mu = {mu}");
                assert!((sigma - 2.0).abs() < 0.15, "sigma = {sigma}");
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_positive_families_reject_non_positive() {
        let sample = Sample::from_codes(&[-1.0, 0.5, 2.0, 3.0], &[0, -1, 0, 0]).unwrap();
        for family in [Family::Lognormal, Family::Weibull] {
            let err = parametric_fit(&sample, family, &FitOptions::default()).unwrap_err();
            assert!(matches!(err, Error::DataDomain { index: 0, .. }));
        }
        assert!(parametric_fit(&sample, Family::Normal, &FitOptions::default()).is_ok());
    }

    #[test]
    fn test_insufficient_observed() {
        let sample = Sample::from_codes(&[1.0, 1.0, 2.0], &[-1, -1, 0]).unwrap();
        assert!(matches!(
            parametric_fit(&sample, Family::Normal, &FitOptions::default()),
            Err(Error::InsufficientData { expected: 2, actual: 1 })
        ));
    }

    #[test]
    fn test_iteration_cap_is_reported() {
        let sample = normal_sample(200, 8.0, 1);
        let fit = parametric_fit(&sample, Family::Normal, &FitOptions::default().with_max_iter(2)).unwrap();
        assert!(!fit.converged);
        assert_eq!(fit.iterations, 2);
    }

    #[test]
    fn test_log_likelihood_terms() {
        let d = Distribution::Normal { mu: 0.0, sigma: 1.0 };
        let sample = Sample::from_codes(&[0.0, 0.0, 0.0], &[0, -1, 1]).unwrap();
        let expected = d.ln_pdf(0.0) + 2.0 * 0.5f64.ln();
        assert!((log_likelihood(&d, &sample) - expected).abs() < 1e-12);
    }
}
