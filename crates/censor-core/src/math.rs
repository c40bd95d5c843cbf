//! Standard normal helpers shared by the ROS and parametric engines
//!
//! All functions work on the probit scale: a probability `p` maps to
//! `z = Φ⁻¹(p)` and back.

/// Standard normal distribution utilities
pub mod normal {
    use rand::Rng;
    use statrs::function::erf::{erfc, erfc_inv};
    use std::f64::consts::{PI, SQRT_2};

    /// Smallest probability handed to the quantile function when sampling
    const MIN_TAIL: f64 = 1e-300;

    /// Density of the standard normal distribution
    pub fn pdf(x: f64) -> f64 {
        if x.is_infinite() {
            return 0.0;
        }
        (-0.5 * x * x).exp() / (2.0 * PI).sqrt()
    }

    /// Cumulative distribution function of the standard normal distribution
    pub fn cdf(x: f64) -> f64 {
        if x == f64::NEG_INFINITY {
            0.0
        } else if x == f64::INFINITY {
            1.0
        } else {
            0.5 * erfc(-x / SQRT_2)
        }
    }

    /// Upper tail `1 - Φ(x)`, accurate for large `x`
    pub fn sf(x: f64) -> f64 {
        cdf(-x)
    }

    /// Quantile function (inverse CDF) of the standard normal distribution
    pub fn ppf(p: f64) -> f64 {
        if p <= 0.0 {
            return f64::NEG_INFINITY;
        }
        if p >= 1.0 {
            return f64::INFINITY;
        }
        -SQRT_2 * erfc_inv(2.0 * p)
    }

    /// Alias for ppf (percent point function) that matches common naming
    #[inline]
    pub fn quantile(p: f64) -> f64 {
        ppf(p)
    }

    /// `E[Z | Φ(Z) ∈ (p_lo, p_hi)]` for a standard normal `Z`
    ///
    /// Collapses to the quantile of the midpoint when the band is too
    /// narrow to evaluate the ratio stably.
    pub fn truncated_mean(p_lo: f64, p_hi: f64) -> f64 {
        let p_lo = p_lo.clamp(0.0, 1.0);
        let p_hi = p_hi.clamp(p_lo, 1.0);
        let mass = p_hi - p_lo;
        if mass < 1e-12 {
            return ppf(0.5 * (p_lo + p_hi));
        }
        (pdf(ppf(p_lo)) - pdf(ppf(p_hi))) / mass
    }

    /// Draw `Z` from the standard normal restricted to `Φ(Z) ∈ (p_lo, p_hi)`
    ///
    /// Upper-half bands are sampled through the complementary probability so
    /// that far right tails keep their resolution.
    pub fn sample_truncated<R: Rng + ?Sized>(rng: &mut R, p_lo: f64, p_hi: f64) -> f64 {
        let p_lo = p_lo.clamp(0.0, 1.0);
        let p_hi = p_hi.clamp(p_lo, 1.0);
        let u: f64 = rng.gen();
        if p_lo >= 0.5 {
            let q_lo = 1.0 - p_hi;
            let q = q_lo + (p_hi - p_lo) * u;
            -ppf(q.clamp(MIN_TAIL, 0.5))
        } else {
            let p = p_lo + (p_hi - p_lo) * u;
            ppf(p.clamp(MIN_TAIL, 1.0 - f64::EPSILON))
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;
        use approx::assert_abs_diff_eq;
        use rand::SeedableRng;
        use rand_chacha::ChaCha8Rng;

        #[test]
        fn test_normal_cdf() {
            assert_abs_diff_eq!(cdf(0.0), 0.5, epsilon = 1e-12);
            assert_abs_diff_eq!(cdf(-1.959963984540054), 0.025, epsilon = 1e-9);
            assert_abs_diff_eq!(cdf(1.959963984540054), 0.975, epsilon = 1e-9);
            assert_abs_diff_eq!(sf(1.959963984540054), 0.025, epsilon = 1e-9);
        }

        #[test]
        fn test_normal_ppf() {
            assert_abs_diff_eq!(ppf(0.5), 0.0, epsilon = 1e-12);
            assert_abs_diff_eq!(ppf(0.025), -1.959963984540054, epsilon = 1e-8);
            assert_eq!(ppf(0.0), f64::NEG_INFINITY);
            assert_eq!(ppf(1.0), f64::INFINITY);
        }

        #[test]
        fn test_cdf_ppf_inverse() {
            for &p in &[0.001, 0.01, 0.05, 0.1, 0.25, 0.5, 0.75, 0.9, 0.95, 0.99, 0.999] {
                let x = ppf(p);
                let p_recovered = cdf(x);
                assert!((p - p_recovered).abs() < 1e-10,
                       "Failed for p={p}: ppf({p})={x}, cdf({x})={p_recovered}");
            }
        }

        #[test]
        fn test_truncated_mean() {
            // Lower half of the standard normal: -φ(0)/0.5
            let expected = -pdf(0.0) / 0.5;
            assert_abs_diff_eq!(truncated_mean(0.0, 0.5), expected, epsilon = 1e-10);
            assert_abs_diff_eq!(truncated_mean(0.5, 1.0), -expected, epsilon = 1e-10);
            assert_abs_diff_eq!(truncated_mean(0.0, 1.0), 0.0, epsilon = 1e-12);
            // Degenerate band
            assert_abs_diff_eq!(truncated_mean(0.3, 0.3), ppf(0.3), epsilon = 1e-12);
        }

        #[test]
        fn test_sample_truncated_stays_in_band() {
            let mut rng = ChaCha8Rng::seed_from_u64(7);
            for _ in 0..2000 {
                let z = sample_truncated(&mut rng, 0.2, 0.4);
                assert!(z >= ppf(0.2) - 1e-9 && z <= ppf(0.4) + 1e-9);
                let z = sample_truncated(&mut rng, 0.999, 1.0);
                assert!(z.is_finite());
                assert!(z >= ppf(0.999) - 1e-9);
                let z = sample_truncated(&mut rng, 0.0, 1e-6);
                assert!(z.is_finite());
                assert!(z <= ppf(1e-6) + 1e-9);
            }
        }

        proptest::proptest! {
            #[test]
            fn truncated_mean_lies_in_band(lo in 0.0f64..0.99, frac in 0.0f64..1.0) {
                let hi = lo + (1.0 - lo) * frac;
                proptest::prop_assume!(hi - lo > 1e-9);
                let m = truncated_mean(lo, hi);
                proptest::prop_assert!(m >= ppf(lo) - 1e-6 && m <= ppf(hi) + 1e-6);
            }
        }
    }
}
