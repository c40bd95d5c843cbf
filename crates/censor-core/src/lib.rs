//! Core types and numeric helpers for censored-data imputation
//!
//! This crate holds what every engine shares:
//!
//! - **Data model**: [`Observation`], [`Sample`] and the censoring enums
//! - **Errors**: one [`Error`] taxonomy for data-domain, insufficient-data,
//!   configuration and numeric failures
//! - **Numerics**: probit-scale normal helpers, the OLS line used by ROS
//! - **Randomness**: construction of the explicit generator passed to every
//!   stochastic call
//!
//! # Example
//!
//! ```rust
//! use censor_core::{CensoringType, Sample};
//!
//! // Two non-detects below 0.5 and three detects
//! let sample = Sample::from_codes(&[0.5, 0.7, 0.5, 1.2, 0.9], &[-1, 0, -1, 0, 0]).unwrap();
//! assert_eq!(sample.censoring_type(), CensoringType::Left);
//! assert_eq!(sample.censored_count(), 2);
//! ```

pub mod error;
pub mod math;
pub mod regression;
pub mod rng;
pub mod types;
pub mod utils;

// Re-export core types
pub use error::{Error, Result};
pub use regression::{fit_line, LinearFit};
pub use rng::{seeded_rng, ImputeRng};
pub use types::{CensorStatus, CensoringType, ImputeType, Observation, Sample};

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::error::Error;
    pub use crate::{
        CensorStatus, CensoringType, ImputeType, Observation, Result, Sample,
    };
}
