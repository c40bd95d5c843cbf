//! Imputation entry point
//!
//! [`impute`] validates a sample against the requested censoring type,
//! builds the random generator from the optional seed and routes to the
//! ROS, parametric or substitution engine.

use crate::parse::{parse_markers, Markers, RawValue};
use crate::result::{Diagnostics, ImputationResult};
use crate::substitution::{substitute, SubstitutionRule};
use censor_core::{seeded_rng, CensoringType, Error, ImputeType, ImputeRng, Result, Sample};
use censor_parametric::{parametric_fit, select_best_distribution, Family, FitOptions};
use censor_ros::{PlottingPosition, RosModel, RosOptions, Transform};
use censor_survival::TurnbullOptions;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing::{debug, instrument};

/// Imputation engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Method {
    /// Regression on order statistics
    #[default]
    Ros,
    /// Censored maximum likelihood
    Parametric,
    /// Fixed fraction of the limit
    Substitution,
}

impl Method {
    pub fn name(self) -> &'static str {
        match self {
            Self::Ros => "ros",
            Self::Parametric => "parametric",
            Self::Substitution => "substitution",
        }
    }
}

impl FromStr for Method {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "ros" => Ok(Self::Ros),
            "parametric" | "mle" => Ok(Self::Parametric),
            "substitution" => Ok(Self::Substitution),
            other => Err(Error::unknown_option(
                "method",
                other,
                &["ros", "parametric", "substitution"],
            )),
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Requested distribution: a fixed family or automatic selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FamilyChoice {
    Fixed(Family),
    Auto,
}

impl Default for FamilyChoice {
    fn default() -> Self {
        Self::Fixed(Family::Lognormal)
    }
}

impl From<Family> for FamilyChoice {
    fn from(family: Family) -> Self {
        Self::Fixed(family)
    }
}

impl FromStr for FamilyChoice {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        if s.eq_ignore_ascii_case("auto") {
            Ok(Self::Auto)
        } else {
            s.parse::<Family>().map(Self::Fixed).map_err(|_| {
                Error::unknown_option("distribution", s, &["normal", "lognormal", "weibull", "auto"])
            })
        }
    }
}

impl fmt::Display for FamilyChoice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Fixed(family) => family.fmt(f),
            Self::Auto => f.write_str("auto"),
        }
    }
}

/// Everything [`impute`] needs besides the data
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ImputeOptions {
    pub method: Method,
    pub family: FamilyChoice,
    pub impute_type: ImputeType,
    pub plotting_position: PlottingPosition,
    pub substitution: SubstitutionRule,
    /// Inferred from the sample when unset
    pub censoring: Option<CensoringType>,
    /// Fresh entropy per call when unset
    pub seed: Option<u64>,
    pub fit: FitOptions,
    #[serde(skip)]
    pub turnbull: TurnbullOptions,
}

impl ImputeOptions {
    pub fn new(method: Method) -> Self {
        Self {
            method,
            ..Self::default()
        }
    }

    pub fn with_family(mut self, family: impl Into<FamilyChoice>) -> Self {
        self.family = family.into();
        self
    }

    pub fn with_impute_type(mut self, impute_type: ImputeType) -> Self {
        self.impute_type = impute_type;
        self
    }

    pub fn with_plotting_position(mut self, plotting_position: PlottingPosition) -> Self {
        self.plotting_position = plotting_position;
        self
    }

    pub fn with_substitution(mut self, rule: SubstitutionRule) -> Self {
        self.substitution = rule;
        self
    }

    pub fn with_censoring(mut self, censoring: CensoringType) -> Self {
        self.censoring = Some(censoring);
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_fit_options(mut self, fit: FitOptions) -> Self {
        self.fit = fit;
        self
    }

    pub fn with_turnbull(mut self, turnbull: TurnbullOptions) -> Self {
        self.turnbull = turnbull;
        self
    }
}

/// Impute every censored row of `sample`
///
/// Rows come back in input order. The same seed with the same input gives
/// bit-identical output; no seed draws fresh entropy.
#[instrument(skip(sample, options), fields(n = sample.len(), method = %options.method))]
pub fn impute(sample: &Sample, options: &ImputeOptions) -> Result<ImputationResult> {
    let censoring = match options.censoring {
        Some(censoring) => {
            sample.check_censoring(censoring)?;
            censoring
        }
        None => sample.censoring_type(),
    };
    let mut rng = seeded_rng(options.seed);
    let mut diagnostics = Diagnostics::new(options.method, censoring, options.seed);

    let values = match options.method {
        Method::Ros => run_ros(sample, censoring, options, &mut diagnostics, &mut rng)?,
        Method::Parametric => run_parametric(sample, censoring, options, &mut diagnostics, &mut rng)?,
        Method::Substitution => substitute(sample, options.substitution),
    };

    Ok(ImputationResult::new(sample, values, diagnostics))
}

/// Parse marker-prefixed cells and impute them
///
/// The censoring type inferred from the markers is used unless `options`
/// sets one.
pub fn impute_raw(raw: &[RawValue], markers: &Markers, options: &ImputeOptions) -> Result<ImputationResult> {
    let parsed = parse_markers(raw, markers)?;
    let sample = parsed.to_sample()?;
    let mut options = options.clone();
    if options.censoring.is_none() {
        options.censoring = Some(parsed.censoring);
    }
    impute(&sample, &options)
}

/// Families with a ROS transform
const ROS_FAMILIES: [Family; 2] = [Family::Normal, Family::Lognormal];

fn run_ros(
    sample: &Sample,
    censoring: CensoringType,
    options: &ImputeOptions,
    diagnostics: &mut Diagnostics,
    rng: &mut ImputeRng,
) -> Result<Vec<f64>> {
    let family = match options.family {
        FamilyChoice::Fixed(Family::Weibull) => {
            return Err(Error::InvalidParameter(
                "ROS supports the normal and lognormal distributions, not weibull".to_string(),
            ))
        }
        FamilyChoice::Fixed(family) => family,
        FamilyChoice::Auto => {
            let selection = select_best_distribution(sample, censoring, &ROS_FAMILIES, &options.fit)?;
            diagnostics.fit_score = Some(selection.score);
            diagnostics.family_scores = selection.scores;
            selection.family
        }
    };
    let transform = match family {
        Family::Normal => Transform::Normal,
        _ => Transform::Lognormal,
    };
    debug!(%transform, "ROS transform chosen");

    let ros = RosOptions::default()
        .with_plotting_position(options.plotting_position)
        .with_impute_type(options.impute_type)
        .with_transform(transform)
        .with_turnbull(options.turnbull);
    let model = RosModel::fit(sample, censoring, &ros)?;

    diagnostics.family = Some(family);
    diagnostics.converged = model.converged();
    Ok(model.impute(sample, options.impute_type, rng))
}

fn run_parametric(
    sample: &Sample,
    censoring: CensoringType,
    options: &ImputeOptions,
    diagnostics: &mut Diagnostics,
    rng: &mut ImputeRng,
) -> Result<Vec<f64>> {
    let fit = match options.family {
        FamilyChoice::Fixed(family) => {
            let fit = parametric_fit(sample, family, &options.fit)?;
            diagnostics.family_scores = vec![(family, fit.aic())];
            fit
        }
        FamilyChoice::Auto => {
            let selection = select_best_distribution(sample, censoring, &Family::ALL, &options.fit)?;
            diagnostics.family_scores = selection.scores;
            selection.fit
        }
    };

    diagnostics.family = Some(fit.family());
    diagnostics.fit_score = Some(fit.aic());
    diagnostics.converged = fit.converged;
    Ok(fit.impute(sample, options.impute_type, rng))
}
