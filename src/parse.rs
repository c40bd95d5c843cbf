//! Marker-prefixed raw input
//!
//! Turns a mixed list of numbers and strings such as `["<0.5", "1.2", ">10"]`
//! into values, statuses and an inferred censoring type.

use censor_core::{CensorStatus, CensoringType, Error, Result, Sample};
use serde::{Deserialize, Serialize};

/// One raw input cell
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawValue {
    Number(f64),
    Text(String),
}

impl From<f64> for RawValue {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<&str> for RawValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for RawValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

/// Prefixes that flag a censored value
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Markers {
    pub left: String,
    pub right: String,
}

impl Default for Markers {
    fn default() -> Self {
        Self {
            left: "<".to_string(),
            right: ">".to_string(),
        }
    }
}

impl Markers {
    pub fn new(left: impl Into<String>, right: impl Into<String>) -> Self {
        Self {
            left: left.into(),
            right: right.into(),
        }
    }

    /// Split a marker off `text`; the longer marker wins when one prefixes the other
    fn strip<'a>(&self, text: &'a str) -> (CensorStatus, &'a str) {
        let mut candidates = [
            (self.left.as_str(), CensorStatus::LeftCensored),
            (self.right.as_str(), CensorStatus::RightCensored),
        ];
        candidates.sort_by_key(|(marker, _)| std::cmp::Reverse(marker.len()));
        for (marker, status) in candidates {
            if !marker.is_empty() {
                if let Some(rest) = text.strip_prefix(marker) {
                    return (status, rest.trim_start());
                }
            }
        }
        (CensorStatus::Observed, text)
    }
}

/// Normalized input
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedInput {
    pub values: Vec<f64>,
    pub status: Vec<CensorStatus>,
    pub censoring: CensoringType,
}

impl ParsedInput {
    pub fn to_sample(&self) -> Result<Sample> {
        Sample::from_status(&self.values, &self.status)
    }

    /// Status codes: -1 left, 0 observed, 1 right
    pub fn codes(&self) -> Vec<i8> {
        self.status.iter().map(|s| s.code()).collect()
    }
}

/// Parse raw cells, inferring left, right or mixed censoring from the
/// markers present
///
/// Input without any marker is treated as left-censored with nothing censored.
pub fn parse_markers(raw: &[RawValue], markers: &Markers) -> Result<ParsedInput> {
    let mut values = Vec::with_capacity(raw.len());
    let mut status = Vec::with_capacity(raw.len());

    for (index, cell) in raw.iter().enumerate() {
        let (s, v) = match cell {
            RawValue::Number(v) => (CensorStatus::Observed, *v),
            RawValue::Text(text) => {
                let (s, number) = markers.strip(text.trim());
                let v = number.parse::<f64>().map_err(|_| {
                    Error::InvalidInput(format!(
                        "row {index}: cannot read {text:?} as a number with optional '{}' or '{}' marker",
                        markers.left, markers.right
                    ))
                })?;
                (s, v)
            }
        };
        if v.is_nan() {
            return Err(Error::InvalidInput(format!("row {index} is NaN")));
        }
        values.push(v);
        status.push(s);
    }

    let has_left = status.contains(&CensorStatus::LeftCensored);
    let has_right = status.contains(&CensorStatus::RightCensored);
    let censoring = match (has_left, has_right) {
        (true, true) => CensoringType::Mixed,
        (false, true) => CensoringType::Right,
        _ => CensoringType::Left,
    };

    Ok(ParsedInput {
        values,
        status,
        censoring,
    })
}
