//! Imputation output

use crate::api::Method;
use censor_core::utils::mean;
use censor_core::{CensorStatus, CensoringType, Sample};
use censor_parametric::Family;
use serde::{Deserialize, Serialize};

/// One input row with its imputed value
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ImputedRow {
    pub original_value: f64,
    pub left_bound: f64,
    pub right_bound: f64,
    pub status: CensorStatus,
    pub imputed_value: f64,
    pub is_imputed: bool,
}

impl ImputedRow {
    /// -1 left, 0 observed, 1 right, 2 interval
    pub fn status_code(&self) -> i8 {
        self.status.code()
    }
}

/// Whole-result metadata
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Diagnostics {
    pub method: Method,
    pub censoring: CensoringType,
    /// Family used by the parametric engine, or the transform used by ROS
    pub family: Option<Family>,
    /// AIC of the fitted family
    pub fit_score: Option<f64>,
    /// AIC of every family tried during automatic selection
    pub family_scores: Vec<(Family, f64)>,
    /// False when an iterative fit stopped at its iteration cap
    pub converged: bool,
    pub seed: Option<u64>,
}

impl Diagnostics {
    pub(crate) fn new(method: Method, censoring: CensoringType, seed: Option<u64>) -> Self {
        Self {
            method,
            censoring,
            family: None,
            fit_score: None,
            family_scores: Vec::new(),
            converged: true,
            seed,
        }
    }
}

/// Rows in input order plus diagnostics
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImputationResult {
    rows: Vec<ImputedRow>,
    diagnostics: Diagnostics,
}

impl ImputationResult {
    pub(crate) fn new(sample: &Sample, imputed: Vec<f64>, diagnostics: Diagnostics) -> Self {
        let rows = sample
            .iter()
            .zip(imputed)
            .map(|(obs, imputed_value)| ImputedRow {
                original_value: obs.value,
                left_bound: obs.left_bound,
                right_bound: obs.right_bound,
                status: obs.status,
                imputed_value,
                is_imputed: obs.is_censored(),
            })
            .collect();
        Self { rows, diagnostics }
    }

    pub fn rows(&self) -> &[ImputedRow] {
        &self.rows
    }

    pub fn diagnostics(&self) -> &Diagnostics {
        &self.diagnostics
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ImputedRow> {
        self.rows.iter()
    }

    pub fn imputed_values(&self) -> Vec<f64> {
        self.rows.iter().map(|r| r.imputed_value).collect()
    }

    pub fn is_imputed(&self) -> Vec<bool> {
        self.rows.iter().map(|r| r.is_imputed).collect()
    }

    pub fn status_codes(&self) -> Vec<i8> {
        self.rows.iter().map(|r| r.status_code()).collect()
    }

    /// Mean over all rows after imputation
    pub fn mean(&self) -> f64 {
        mean(&self.imputed_values())
    }

    /// Mean of the imputed rows only; `None` when nothing was censored
    pub fn censored_mean(&self) -> Option<f64> {
        let imputed: Vec<f64> = self
            .rows
            .iter()
            .filter(|r| r.is_imputed)
            .map(|r| r.imputed_value)
            .collect();
        (!imputed.is_empty()).then(|| mean(&imputed))
    }

    /// Whether every row lies within its bracket
    pub fn respects_bounds(&self) -> bool {
        self.rows
            .iter()
            .all(|r| r.imputed_value >= r.left_bound && r.imputed_value <= r.right_bound)
    }
}

impl<'a> IntoIterator for &'a ImputationResult {
    type Item = &'a ImputedRow;
    type IntoIter = std::slice::Iter<'a, ImputedRow>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.iter()
    }
}
