//! Nonparametric survival estimators for censored samples
//!
//! - [`KaplanMeierCurve`]: product-limit estimator for right-censored data,
//!   and for left-censored data through reflection
//! - [`TurnbullEstimate`]: NPMLE for arbitrary interval censoring, fitted
//!   by EM over equivalence intervals
//!
//! Both implement [`SurvivalFunction`], which is what the ROS engine
//! consumes to turn a sample into plotting positions.
//!
//! # Example
//!
//! ```rust
//! use censor_survival::{turnbull_em, SurvivalFunction, TurnbullOptions};
//!
//! let estimate = turnbull_em(&[2.0, 1.0, 2.0], &[2.0, 3.0, 4.0], &TurnbullOptions::default()).unwrap();
//! let total: f64 = estimate.probabilities().iter().sum();
//! assert!((total - 1.0).abs() < 1e-9);
//! assert_eq!(estimate.survival(0.0), 1.0);
//! ```

pub mod kaplan_meier;
pub mod traits;
pub mod turnbull;

pub use kaplan_meier::{kaplan_meier, KaplanMeierCurve};
pub use traits::SurvivalFunction;
pub use turnbull::{
    predict_turnbull, turnbull_em, EquivalenceInterval, TurnbullEstimate, TurnbullOptions,
};
