//! Imputation of censored observations
//!
//! Fills in values known only to lie below a detection limit, above a limit,
//! or inside an interval, so that ordinary summary statistics can be
//! computed on the completed sample.
//!
//! Engines:
//!
//! - **ROS**: regression on order statistics with Kaplan-Meier or Turnbull
//!   plotting positions ([`censor_ros`])
//! - **Parametric**: censored maximum likelihood for normal, lognormal and
//!   weibull, with optional AIC-based family selection ([`censor_parametric`])
//! - **Substitution**: the fixed-fraction baseline
//!
//! # Example
//!
//! ```rust
//! use censor_impute::{impute_raw, ImputeOptions, Markers, RawValue};
//!
//! let raw: Vec<RawValue> = ["<0.5", "1.0", "2.0", "<0.5", "3.0", "1.4"]
//!     .into_iter()
//!     .map(RawValue::from)
//!     .collect();
//! let result = impute_raw(&raw, &Markers::default(), &ImputeOptions::default().with_seed(42)).unwrap();
//! assert_eq!(result.len(), 6);
//! assert!(result.rows()[0].is_imputed && result.rows()[0].imputed_value <= 0.5);
//! assert_eq!(result.rows()[1].imputed_value, 1.0);
//! ```

pub mod api;
pub mod parse;
pub mod result;
pub mod substitution;

// Re-export workspace crates
pub use censor_core;
pub use censor_parametric;
pub use censor_ros;
pub use censor_survival;

pub use api::{impute, impute_raw, FamilyChoice, ImputeOptions, Method};
pub use censor_core::{
    seeded_rng, CensorStatus, CensoringType, Error, ImputeType, Observation, Result, Sample,
};
pub use censor_parametric::{
    parametric_fit, parametric_impute, select_best_distribution, Distribution, Family, FitOptions,
    FittedDistribution, Selection,
};
pub use censor_ros::{ros_impute, PlottingPosition, RosOptions, Transform};
pub use censor_survival::{
    kaplan_meier, predict_turnbull, turnbull_em, EquivalenceInterval, KaplanMeierCurve,
    SurvivalFunction, TurnbullEstimate, TurnbullOptions,
};
pub use parse::{parse_markers, Markers, ParsedInput, RawValue};
pub use result::{Diagnostics, ImputationResult, ImputedRow};
pub use substitution::{substitute, SubstitutionRule};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::{
        impute, impute_raw, CensorStatus, CensoringType, Family, FamilyChoice, ImputationResult,
        ImputeOptions, ImputeType, Markers, Method, PlottingPosition, RawValue, Sample,
    };
}
