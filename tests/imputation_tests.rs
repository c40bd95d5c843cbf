mod common;

use censor_impute::prelude::*;
use censor_impute::{Error, SubstitutionRule};
use common::{has_duplicates, left_censored_lognormal, mixed_censored_normal, repeated_intervals};
use proptest::prelude::*;

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn censored_only(result: &ImputationResult) -> Vec<f64> {
    result
        .iter()
        .filter(|r| r.is_imputed)
        .map(|r| r.imputed_value)
        .collect()
}

#[test]
fn seeded_calls_reproduce_across_engines() {
    init_tracing();
    let (_, left) = left_censored_lognormal(300, 0.0, 1.0, 0.8, 1);
    let intervals = repeated_intervals();

    let cases = [
        (&left, ImputeOptions::new(Method::Ros)),
        (&intervals, ImputeOptions::new(Method::Ros)),
        (&left, ImputeOptions::new(Method::Parametric)),
        (&left, ImputeOptions::new(Method::Parametric).with_family(FamilyChoice::Auto)),
    ];
    for (sample, options) in cases {
        let a = impute(sample, &options.clone().with_seed(42)).unwrap();
        let b = impute(sample, &options.clone().with_seed(42)).unwrap();
        assert_eq!(a.imputed_values(), b.imputed_values(), "{options:?}");

        let c = impute(sample, &options.clone().with_seed(43)).unwrap();
        assert_ne!(censored_only(&a), censored_only(&c), "{options:?}");

        let d = impute(sample, &options).unwrap();
        let e = impute(sample, &options).unwrap();
        assert_ne!(censored_only(&d), censored_only(&e), "{options:?}");
    }
}

#[test]
fn mean_mode_ties_and_stochastic_mode_spreads() {
    let (_, sample) = left_censored_lognormal(200, 0.0, 1.0, 0.5, 9);
    for method in [Method::Ros, Method::Parametric] {
        let mean = impute(
            &sample,
            &ImputeOptions::new(method).with_impute_type(ImputeType::Mean).with_seed(0),
        )
        .unwrap();
        let filled = censored_only(&mean);
        assert!(filled.windows(2).all(|w| w[0] == w[1]), "{method}");

        let stochastic = impute(&sample, &ImputeOptions::new(method).with_seed(0)).unwrap();
        assert!(!has_duplicates(&censored_only(&stochastic)), "{method}");
    }
}

#[test]
fn repeated_intervals_draw_distinct_values() {
    let result = impute(&repeated_intervals(), &ImputeOptions::default().with_seed(5)).unwrap();
    let filled = censored_only(&result);
    assert_eq!(filled.len(), 10);
    assert!(!has_duplicates(&filled));
    assert!(result.respects_bounds());
    assert_eq!(result.diagnostics().censoring, CensoringType::Interval);
}

#[test]
fn auto_selection_reports_scores() {
    let (_, sample) = left_censored_lognormal(600, 1.0, 0.8, 1.5, 77);
    let options = ImputeOptions::new(Method::Parametric)
        .with_family(FamilyChoice::Auto)
        .with_seed(3);
    let result = impute(&sample, &options).unwrap();
    let diag = result.diagnostics();
    assert_eq!(diag.family, Some(Family::Lognormal));
    assert_eq!(diag.family_scores.len(), 3);
    let best = diag.fit_score.unwrap();
    assert!(diag.family_scores.iter().all(|&(_, s)| s >= best));
    assert!(diag.converged);
}

#[test]
fn positivity_guard() {
    let sample = mixed_censored_normal(200, 35.0, 70.0, 4);
    let shifted: Vec<f64> = sample.values().iter().map(|v| v - 60.0).collect();
    let codes: Vec<i8> = sample.iter().map(|o| o.status.code()).collect();
    let negative = Sample::from_codes(&shifted, &codes).unwrap();

    for family in [Family::Lognormal, Family::Weibull] {
        let err = impute(&negative, &ImputeOptions::new(Method::Parametric).with_family(family)).unwrap_err();
        assert!(err.is_data_domain(), "{family}: {err}");
    }
    let err = impute(&negative, &ImputeOptions::new(Method::Ros)).unwrap_err();
    assert!(err.is_data_domain());

    for method in [Method::Ros, Method::Parametric] {
        let result = impute(&negative, &ImputeOptions::new(method).with_family(Family::Normal)).unwrap();
        assert!(result.respects_bounds());
    }

    // Automatic selection falls back to the normal family
    let result = impute(
        &negative,
        &ImputeOptions::new(Method::Parametric).with_family(FamilyChoice::Auto),
    )
    .unwrap();
    assert_eq!(result.diagnostics().family, Some(Family::Normal));
}

#[test]
fn insufficient_observed_points() {
    let sample = Sample::from_codes(&[0.5, 0.5, 0.5, 2.0], &[-1, -1, -1, 0]).unwrap();
    for method in [Method::Ros, Method::Parametric] {
        let err = impute(&sample, &ImputeOptions::new(method)).unwrap_err();
        assert!(matches!(err, Error::InsufficientData { expected: 2, actual: 1 }));
    }
}

#[test]
fn string_input_matches_manual_status() {
    let manual = Sample::from_mask(&[0.5, 1.0, 2.0, 0.5, 3.0], &[true, false, false, true, false], CensoringType::Left)
        .unwrap();
    let options = ImputeOptions::default().with_seed(42);
    let expected = impute(&manual, &options).unwrap();

    let raw: Vec<RawValue> = ["<0.5", "1.0", "2.0", "<0.5", "3.0"].into_iter().map(RawValue::from).collect();
    let parsed = censor_impute::impute_raw(&raw, &Markers::default(), &options).unwrap();
    assert_eq!(expected.imputed_values(), parsed.imputed_values());
    assert_eq!(parsed.is_imputed(), vec![true, false, false, true, false]);
}

#[test]
fn string_input_mixed_and_custom_markers() {
    let raw: Vec<RawValue> = ["<0.5", "5.0", ">10.0", "7.0"].into_iter().map(RawValue::from).collect();
    let result = impute_raw(&raw, &Markers::default(), &ImputeOptions::default().with_seed(1)).unwrap();
    assert_eq!(result.status_codes(), vec![-1, 0, 1, 0]);
    assert_eq!(result.diagnostics().censoring, CensoringType::Mixed);
    let v = result.imputed_values();
    assert!(v[0] <= 0.5 && v[2] >= 10.0);

    let raw: Vec<RawValue> = ["LOD_0.5", "1.0", "CENS_10.0", "4.0"].into_iter().map(RawValue::from).collect();
    let result = impute_raw(&raw, &Markers::new("LOD_", "CENS_"), &ImputeOptions::default()).unwrap();
    assert_eq!(result.status_codes(), vec![-1, 0, 1, 0]);

    let raw: Vec<RawValue> = ["bad_format", "1.0"].into_iter().map(RawValue::from).collect();
    assert!(matches!(
        impute_raw(&raw, &Markers::default(), &ImputeOptions::default()),
        Err(Error::InvalidInput(_))
    ));
}

#[test]
fn substitution_baseline() {
    let sample = Sample::from_codes(&[1.0, 2.0, 4.0, 8.0], &[-1, 0, 0, 1]).unwrap();
    let result = impute(&sample, &ImputeOptions::new(Method::Substitution)).unwrap();
    assert_eq!(result.imputed_values(), vec![0.5, 2.0, 4.0, 8.0]);
    let result = impute(
        &sample,
        &ImputeOptions::new(Method::Substitution).with_substitution(SubstitutionRule::Limit),
    )
    .unwrap();
    assert_eq!(result.censored_mean(), Some(4.5));
}

#[test]
fn ros_recovers_lognormal_mean() {
    let (truth, sample) = left_censored_lognormal(1000, 1.0, 0.6, 2.7, 2024);
    let result = impute(&sample, &ImputeOptions::default().with_seed(8)).unwrap();
    let true_mean = censor_impute::censor_core::utils::mean(&truth);
    assert!((result.mean() - true_mean).abs() / true_mean < 0.05);
    assert!(result.censored_mean().unwrap() < 2.7);
}

#[test]
fn options_load_from_json() {
    let options: ImputeOptions =
        serde_json::from_str(r#"{"method": "parametric", "family": "auto", "impute_type": "mean", "seed": 7}"#)
            .unwrap();
    assert_eq!(options.method, Method::Parametric);
    assert_eq!(options.family, FamilyChoice::Auto);
    assert_eq!(options.impute_type, ImputeType::Mean);
    assert_eq!(options.seed, Some(7));
    assert_eq!(options.plotting_position, PlottingPosition::KaplanMeier);
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn every_engine_respects_brackets(
        rows in prop::collection::vec((0.1f64..100.0, -1i8..=1), 8..50),
        seed in any::<u64>(),
        method in prop::sample::select(vec![Method::Ros, Method::Parametric, Method::Substitution]),
        mean_mode in any::<bool>(),
    ) {
        let detects = rows.iter().filter(|(_, c)| *c == 0).count();
        prop_assume!(detects >= 4);
        let (values, codes): (Vec<f64>, Vec<i8>) = rows.into_iter().unzip();
        let sample = Sample::from_codes(&values, &codes).unwrap();
        let options = ImputeOptions::new(method)
            .with_family(Family::Normal)
            .with_impute_type(if mean_mode { ImputeType::Mean } else { ImputeType::Stochastic })
            .with_seed(seed);
        let result = impute(&sample, &options).unwrap();
        prop_assert_eq!(result.len(), values.len());
        prop_assert!(result.respects_bounds());
        for (row, &v) in result.iter().zip(&values) {
            if !row.is_imputed {
                prop_assert_eq!(row.imputed_value, v);
            }
        }
    }
}
