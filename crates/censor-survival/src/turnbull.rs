//! Turnbull nonparametric maximum likelihood estimator
//!
//! Each observation is a bracket `[l, r]` (exact values have `l == r`). A
//! bracket with one infinite side is one-sided censoring and is open at its
//! finite end: `(-inf, L)` and `(R, inf)`. Tied exact values therefore sort
//! inside the censored unit's risk set, as in Kaplan-Meier. The estimator
//! places all mass on the innermost "equivalence" intervals of those
//! brackets and fits the masses by EM.
//!
//! A non-degenerate equivalence interval `[a, b]` holds its mass in
//! `(a, b]`, or in `(a, b)` when it closes on an open bracket end; a
//! degenerate one holds it exactly at `a`.

use crate::traits::SurvivalFunction;
use censor_core::{Error, Observation, Result};
use ordered_float::OrderedFloat;
use tracing::{debug, instrument, warn};

/// An innermost interval of the observation brackets
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EquivalenceInterval {
    pub lower: f64,
    pub upper: f64,
    upper_open: bool,
}

impl EquivalenceInterval {
    pub fn new(lower: f64, upper: f64) -> Self {
        Self {
            lower,
            upper,
            upper_open: false,
        }
    }

    /// An interval whose mass lies strictly below `upper`
    pub fn open_above(lower: f64, upper: f64) -> Self {
        Self {
            lower,
            upper,
            upper_open: true,
        }
    }

    pub fn is_point(&self) -> bool {
        self.lower == self.upper
    }

    pub fn is_upper_open(&self) -> bool {
        self.upper_open
    }

    /// Whether all of this interval's mass is strictly above `t`
    fn lies_above(&self, t: f64) -> bool {
        self.lower > t || (self.lower == t && !self.is_point())
    }

    fn starts_within(&self, bracket: &Bracket) -> bool {
        if bracket.open_below {
            self.lies_above(bracket.left)
        } else {
            self.lower >= bracket.left
        }
    }

    fn ends_within(&self, bracket: &Bracket) -> bool {
        if bracket.open_above {
            self.upper < bracket.right || (self.upper == bracket.right && self.upper_open)
        } else {
            self.upper <= bracket.right
        }
    }
}

/// Observation bracket with the openness implied by one-sided censoring
#[derive(Debug, Clone, Copy)]
struct Bracket {
    left: f64,
    right: f64,
    open_below: bool,
    open_above: bool,
}

impl Bracket {
    fn new(left: f64, right: f64) -> Self {
        Self {
            left,
            right,
            open_below: right == f64::INFINITY && left.is_finite(),
            open_above: left == f64::NEG_INFINITY && right.is_finite(),
        }
    }

    fn of(obs: &Observation) -> Self {
        Self::new(obs.left_bound, obs.right_bound)
    }
}

/// Endpoint kinds in their sort order at a shared value
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum Endpoint {
    /// Right end of `(-inf, L)`: just below `L`
    OpenRight,
    ClosedLeft,
    ClosedRight,
    /// Left end of `(R, inf)`: just above `R`
    OpenLeft,
}

impl Endpoint {
    fn is_left(self) -> bool {
        matches!(self, Self::ClosedLeft | Self::OpenLeft)
    }
}

/// EM stopping rule
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TurnbullOptions {
    /// Stop once the largest change in any interval mass is below this
    pub tolerance: f64,
    /// Iteration cap; reaching it is reported, not an error
    pub max_iter: usize,
}

impl Default for TurnbullOptions {
    fn default() -> Self {
        Self {
            tolerance: 1e-8,
            max_iter: 5000,
        }
    }
}

impl TurnbullOptions {
    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    pub fn with_max_iter(mut self, max_iter: usize) -> Self {
        self.max_iter = max_iter;
        self
    }
}

/// Fitted Turnbull NPMLE
#[derive(Debug, Clone, PartialEq)]
pub struct TurnbullEstimate {
    intervals: Vec<EquivalenceInterval>,
    probabilities: Vec<f64>,
    /// `cumulative[j]` is the mass of intervals `0..j`
    cumulative: Vec<f64>,
    iterations: usize,
    converged: bool,
}

impl TurnbullEstimate {
    fn new(
        intervals: Vec<EquivalenceInterval>,
        probabilities: Vec<f64>,
        iterations: usize,
        converged: bool,
    ) -> Self {
        let mut cumulative = Vec::with_capacity(probabilities.len() + 1);
        let mut acc = 0.0;
        cumulative.push(acc);
        for &p in &probabilities {
            acc += p;
            cumulative.push(acc);
        }
        Self {
            intervals,
            probabilities,
            cumulative,
            iterations,
            converged,
        }
    }

    pub fn intervals(&self) -> &[EquivalenceInterval] {
        &self.intervals
    }

    pub fn probabilities(&self) -> &[f64] {
        &self.probabilities
    }

    pub fn iterations(&self) -> usize {
        self.iterations
    }

    pub fn converged(&self) -> bool {
        self.converged
    }

    /// Conservative survival at each query time; see [`predict_turnbull`]
    pub fn predict(&self, times: &[f64]) -> Vec<f64> {
        self.survival_many(times)
    }
}

impl SurvivalFunction for TurnbullEstimate {
    fn survival(&self, t: f64) -> f64 {
        conservative_survival(&self.intervals, &self.probabilities, t)
    }

    fn survival_before(&self, t: f64) -> f64 {
        self.intervals
            .iter()
            .zip(&self.probabilities)
            .filter(|(iv, _)| iv.lower >= t)
            .map(|(_, &p)| p)
            .sum::<f64>()
            .min(1.0)
    }

    /// Mass of the equivalence intervals inside the observation's bracket,
    /// placed after the mass of every interval below them
    fn band(&self, obs: &Observation) -> (f64, f64) {
        let bracket = if obs.is_censored() {
            Bracket::of(obs)
        } else {
            Bracket::new(obs.value, obs.value)
        };
        let (start, end) = contained_range(&self.intervals, &bracket);
        let lo = self.cumulative[start].clamp(0.0, 1.0);
        (lo, self.cumulative[end].clamp(lo, 1.0))
    }
}

/// Indices `start..end` of the sorted, disjoint intervals inside `bracket`
fn contained_range(intervals: &[EquivalenceInterval], bracket: &Bracket) -> (usize, usize) {
    let start = intervals.partition_point(|iv| !iv.starts_within(bracket));
    let len = intervals[start..]
        .iter()
        .take_while(|iv| iv.ends_within(bracket))
        .count();
    (start, start + len)
}

fn conservative_survival(intervals: &[EquivalenceInterval], probabilities: &[f64], t: f64) -> f64 {
    intervals
        .iter()
        .zip(probabilities)
        .filter(|(iv, _)| iv.lies_above(t))
        .map(|(_, &p)| p)
        .sum::<f64>()
        .min(1.0)
}

/// Innermost intervals: a left endpoint immediately followed by a right
/// endpoint in the sorted, deduplicated endpoint list
fn equivalence_intervals(brackets: &[Bracket]) -> Vec<EquivalenceInterval> {
    let mut endpoints: Vec<(OrderedFloat<f64>, Endpoint)> = brackets
        .iter()
        .flat_map(|b| {
            let left = if b.open_below { Endpoint::OpenLeft } else { Endpoint::ClosedLeft };
            let right = if b.open_above { Endpoint::OpenRight } else { Endpoint::ClosedRight };
            [(OrderedFloat(b.left), left), (OrderedFloat(b.right), right)]
        })
        .collect();
    endpoints.sort_unstable();
    endpoints.dedup();

    endpoints
        .windows(2)
        .filter(|w| w[0].1.is_left() && !w[1].1.is_left())
        .map(|w| {
            let (lower, upper) = (w[0].0.into_inner(), w[1].0.into_inner());
            match w[1].1 {
                Endpoint::OpenRight => EquivalenceInterval::open_above(lower, upper),
                _ => EquivalenceInterval::new(lower, upper),
            }
        })
        .collect()
}

/// Fit the Turnbull NPMLE to brackets `[left[i], right[i]]`
///
/// Returns the equivalence intervals in ascending order with masses summing
/// to 1. Hitting `max_iter` yields the last iterate with `converged = false`.
#[instrument(skip(left, right, options), fields(n = left.len()))]
pub fn turnbull_em(left: &[f64], right: &[f64], options: &TurnbullOptions) -> Result<TurnbullEstimate> {
    if left.len() != right.len() {
        return Err(Error::size_mismatch(left.len(), right.len(), "right bounds"));
    }
    if left.is_empty() {
        return Err(Error::InvalidInput("Turnbull estimator needs at least one observation".to_string()));
    }
    for (index, (&l, &r)) in left.iter().zip(right).enumerate() {
        if l.is_nan() || r.is_nan() || l > r {
            return Err(Error::MalformedBounds { index, left: l, right: r });
        }
    }
    if !(options.tolerance > 0.0) {
        return Err(Error::InvalidParameter(format!(
            "Turnbull tolerance must be positive, got {}",
            options.tolerance
        )));
    }

    let brackets: Vec<Bracket> = left.iter().zip(right).map(|(&l, &r)| Bracket::new(l, r)).collect();
    let intervals = equivalence_intervals(&brackets);
    let m = intervals.len();

    // Membership in CSR form: observation i owns intervals ranges[i]
    let mut ranges = Vec::with_capacity(brackets.len());
    for (index, bracket) in brackets.iter().enumerate() {
        let (start, end) = contained_range(&intervals, bracket);
        if start == end {
            let (l, r) = (bracket.left, bracket.right);
            return Err(Error::Computation(format!(
                "observation {index} bracket [{l}, {r}] contains no equivalence interval"
            )));
        }
        ranges.push(start..end);
    }

    let n = left.len() as f64;
    let mut p = vec![1.0 / m as f64; m];
    let mut next = vec![0.0; m];
    let mut iterations = 0;
    let mut converged = false;

    while iterations < options.max_iter {
        iterations += 1;
        next.iter_mut().for_each(|v| *v = 0.0);

        // E-step: split each observation over the intervals it may occupy
        for range in &ranges {
            let members = &p[range.clone()];
            let denom: f64 = members.iter().sum();
            if denom > 0.0 {
                for (slot, &pj) in next[range.clone()].iter_mut().zip(members) {
                    *slot += pj / denom;
                }
            } else {
                let share = 1.0 / range.len() as f64;
                next[range.clone()].iter_mut().for_each(|slot| *slot += share);
            }
        }

        // M-step: average responsibility
        next.iter_mut().for_each(|v| *v /= n);

        let delta = p
            .iter()
            .zip(&next)
            .map(|(a, b)| (a - b).abs())
            .fold(0.0, f64::max);
        std::mem::swap(&mut p, &mut next);

        if delta < options.tolerance {
            converged = true;
            break;
        }
    }

    let total: f64 = p.iter().sum();
    if total > 0.0 {
        p.iter_mut().for_each(|v| *v /= total);
    }

    if converged {
        debug!(intervals = m, iterations, "Turnbull EM converged");
    } else {
        warn!(
            intervals = m,
            iterations,
            "Turnbull EM reached the iteration cap before converging"
        );
    }

    Ok(TurnbullEstimate::new(intervals, p, iterations, converged))
}

/// Conservative survival `P(T > t)` at each query time
///
/// Only mass lying entirely above `t` is counted: an interval `[a, b]`
/// straddling `t` contributes nothing, and a degenerate interval at `t`
/// does not survive past it.
pub fn predict_turnbull(
    intervals: &[EquivalenceInterval],
    probabilities: &[f64],
    times: &[f64],
) -> Result<Vec<f64>> {
    if intervals.len() != probabilities.len() {
        return Err(Error::size_mismatch(intervals.len(), probabilities.len(), "interval probabilities"));
    }
    Ok(times
        .iter()
        .map(|&t| conservative_survival(intervals, probabilities, t))
        .collect())
}
