//! Monotone transforms applied before the probit regression

use censor_core::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Value-scale transform: identity for normal ROS, natural log for lognormal ROS
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Transform {
    Normal,
    #[default]
    Lognormal,
}

impl Transform {
    pub fn forward(self, x: f64) -> f64 {
        match self {
            Self::Normal => x,
            Self::Lognormal => x.ln(),
        }
    }

    pub fn inverse(self, y: f64) -> f64 {
        match self {
            Self::Normal => y,
            Self::Lognormal => y.exp(),
        }
    }

    /// Whether the transform needs strictly positive data
    pub fn requires_positive(self) -> bool {
        matches!(self, Self::Lognormal)
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Normal => "normal",
            Self::Lognormal => "lognormal",
        }
    }
}

impl FromStr for Transform {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "normal" | "identity" => Ok(Self::Normal),
            "lognormal" | "log" => Ok(Self::Lognormal),
            other => Err(Error::unknown_option("ROS transform", other, &["normal", "lognormal"])),
        }
    }
}

impl fmt::Display for Transform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
