//! Regression on order statistics (ROS)
//!
//! ROS fits a straight line between the transformed detected values and the
//! normal quantiles of their plotting positions, then fills every censored
//! point from the part of that fitted distribution its bracket allows.
//!
//! ```rust
//! use censor_core::{seeded_rng, CensoringType, ImputeType, Sample};
//! use censor_ros::{ros_impute, RosOptions};
//!
//! let sample = Sample::from_codes(
//!     &[0.5, 0.8, 0.5, 1.3, 2.1, 0.9, 3.4],
//!     &[-1, 0, -1, 0, 0, 0, 0],
//! ).unwrap();
//! let options = RosOptions::default().with_impute_type(ImputeType::Mean);
//! let mut rng = seeded_rng(Some(1));
//! let imputed = ros_impute(&sample, CensoringType::Left, &options, &mut rng).unwrap();
//! assert!(imputed[0] <= 0.5);
//! assert_eq!(imputed[0], imputed[2]);
//! assert_eq!(imputed[1], 0.8);
//! ```

pub mod engine;
pub mod plotting;
pub mod transform;

pub use engine::{ros_impute, RosModel, RosOptions};
pub use plotting::{plotting_positions, PlottingPosition, PlottingPositions, Position};
pub use transform::Transform;
