//! Shared utilities for integration tests

#![allow(dead_code)]

use censor_impute::Sample;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use rand_distr::{Distribution, LogNormal, Normal};

pub use approx::assert_relative_eq;

/// Lognormal draws with everything below `limit` reported as a non-detect
pub fn left_censored_lognormal(n: usize, mu: f64, sigma: f64, limit: f64, seed: u64) -> (Vec<f64>, Sample) {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let dist = LogNormal::new(mu, sigma).unwrap();
    let truth: Vec<f64> = (0..n).map(|_| dist.sample(&mut rng)).collect();
    let (values, codes): (Vec<f64>, Vec<i8>) = truth
        .iter()
        .map(|&x| if x < limit { (limit, -1) } else { (x, 0) })
        .unzip();
    (truth, Sample::from_codes(&values, &codes).unwrap())
}

/// Normal draws censored below `low` and above `high`
pub fn mixed_censored_normal(n: usize, low: f64, high: f64, seed: u64) -> Sample {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let dist = Normal::new(50.0, 10.0).unwrap();
    let (values, codes): (Vec<f64>, Vec<i8>) = (0..n)
        .map(|_| {
            let x = dist.sample(&mut rng);
            if x < low {
                (low, -1)
            } else if x > high {
                (high, 1)
            } else {
                (x, 0)
            }
        })
        .unzip();
    Sample::from_codes(&values, &codes).unwrap()
}

/// Ten identical `[0, 5]` intervals followed by twenty exact values in `[6, 10]`
pub fn repeated_intervals() -> Sample {
    let mut left = vec![0.0; 10];
    let mut right = vec![5.0; 10];
    for i in 0..20 {
        let v = 6.0 + 4.0 * i as f64 / 19.0;
        left.push(v);
        right.push(v);
    }
    Sample::from_bounds(&left, &right).unwrap()
}

/// Whether any two entries of `values` are equal
pub fn has_duplicates(values: &[f64]) -> bool {
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    sorted.windows(2).any(|w| w[0] == w[1])
}
