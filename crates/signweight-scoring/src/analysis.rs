//! Post-solve validation and weight diagnostics.
//!
//! The validator re-checks every generated constraint and every variable
//! bound against the returned weights. A solution with any violation beyond
//! tolerance is reported inconsistent even when the solver said optimal.

use std::collections::BTreeMap;

use serde::Serialize;
use signweight_config::{PremiumPair, DEFAULT_TOLERANCE};
use signweight_core::{Bounds, Constraint, ConstraintSet, SignClass, SignId, Solution};
use tracing::{info, warn};

use crate::classifier::Classification;

/// A constraint that does not hold for the returned weights.
#[derive(Debug, Clone, PartialEq)]
pub struct Violation {
    pub constraint: Constraint,
    /// `lhs - rhs`, below `-tolerance`.
    pub slack: f64,
}

/// A weight outside its class bounds.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BoundViolation {
    pub sign: SignId,
    pub class: SignClass,
    pub weight: f64,
    pub bounds: Bounds,
}

/// Distribution summary of a weight map.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Diagnostics {
    pub weight_range: (f64, f64),
    pub weight_spread: f64,
    pub mean: f64,
    /// Population standard deviation.
    pub std_dev: f64,
    pub total_weight: f64,
    pub total_signs: usize,
    /// Mean weight per class; `None` for classes without signs.
    pub class_means: BTreeMap<SignClass, Option<f64>>,
    /// Mean of `over` minus mean of `under`, keyed by [`PremiumPair::name`].
    pub premiums: BTreeMap<String, Option<f64>>,
    /// Mean weight of compound signs; `None` without any.
    pub compound_mean: Option<f64>,
}

impl Diagnostics {
    /// Summarizes `weights`; `None` when there are none.
    pub fn compute(
        weights: &BTreeMap<SignId, f64>,
        classification: &Classification,
        premiums: &[PremiumPair],
    ) -> Option<Self> {
        if weights.is_empty() {
            return None;
        }
        let values: Vec<f64> = weights.values().copied().collect();
        let n = values.len() as f64;
        let min = values.iter().copied().fold(f64::INFINITY, f64::min);
        let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let total: f64 = values.iter().sum();
        let mean = total / n;
        let variance = values.iter().map(|w| (w - mean).powi(2)).sum::<f64>() / n;

        let class_means: BTreeMap<SignClass, Option<f64>> = SignClass::ALL
            .iter()
            .map(|&class| {
                let mean = mean_of(weights, |id| classification.class_of(id) == Some(class));
                (class, mean)
            })
            .collect();
        let premiums = premiums
            .iter()
            .map(|pair| {
                let premium = match (class_means[&pair.over], class_means[&pair.under]) {
                    (Some(over), Some(under)) => Some(over - under),
                    _ => None,
                };
                (pair.name(), premium)
            })
            .collect();

        Some(Self {
            weight_range: (min, max),
            weight_spread: max - min,
            mean,
            std_dev: variance.sqrt(),
            total_weight: total,
            total_signs: values.len(),
            class_means,
            premiums,
            compound_mean: mean_of(weights, |id| classification.is_compound(id)),
        })
    }
}

fn mean_of(weights: &BTreeMap<SignId, f64>, include: impl Fn(SignId) -> bool) -> Option<f64> {
    let members: Vec<f64> = weights
        .iter()
        .filter(|(id, _)| include(**id))
        .map(|(_, w)| *w)
        .collect();
    if members.is_empty() {
        None
    } else {
        Some(members.iter().sum::<f64>() / members.len() as f64)
    }
}

/// Overall judgement of a solution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    /// Every constraint and bound holds within tolerance.
    Consistent,
    /// Weights exist but at least one check failed; do not trust the map
    /// for hierarchy-sensitive uses.
    Inconsistent,
    /// No weights: infeasible, time limit or unbounded.
    Rejected,
}

/// Output of [`SolutionValidator::validate`].
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationReport {
    pub verdict: Verdict,
    pub tolerance: f64,
    /// Number of constraints evaluated.
    pub checked: usize,
    pub violations: Vec<Violation>,
    pub bound_violations: Vec<BoundViolation>,
    pub diagnostics: Option<Diagnostics>,
}

impl ValidationReport {
    pub fn is_consistent(&self) -> bool {
        self.verdict == Verdict::Consistent
    }

    /// Constraint and bound violations together.
    pub fn violation_count(&self) -> usize {
        self.violations.len() + self.bound_violations.len()
    }

    /// The violation with the most negative slack.
    pub fn worst(&self) -> Option<&Violation> {
        self.violations
            .iter()
            .min_by(|a, b| a.slack.total_cmp(&b.slack))
    }
}

/// Re-checks a solution against its own constraints.
///
/// # Example
///
/// ```
/// use std::collections::BTreeMap;
/// use std::time::Duration;
/// use signweight_config::WeightConfig;
/// use signweight_core::{Constraint, ConstraintSet, SignId, Solution, SolverStatus};
/// use signweight_corpus::Corpus;
/// use signweight_scoring::{Classifier, SolutionValidator, Verdict};
///
/// let (corpus, _) = Corpus::parse("M-1\t1 342 125\n");
/// let classification = Classifier::new(&WeightConfig::new()).classify(corpus.vocabulary());
///
/// let mut constraints = ConstraintSet::new();
/// constraints.push(Constraint::hierarchy(SignId(125), SignId(342), 0.5, "authority>commodity"));
///
/// // Solver claims optimal, but 125 does not dominate 342.
/// let weights = BTreeMap::from([(SignId(1), 3.0), (SignId(342), 3.0), (SignId(125), 3.0)]);
/// let solution = Solution::solved(SolverStatus::Optimal, 9.0, weights, Duration::ZERO);
///
/// let report = SolutionValidator::default().validate(&solution, &constraints, &classification, &[]);
/// assert_eq!(report.verdict, Verdict::Inconsistent);
/// assert_eq!(report.violations.len(), 1);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct SolutionValidator {
    tolerance: f64,
}

impl Default for SolutionValidator {
    fn default() -> Self {
        Self::new(DEFAULT_TOLERANCE)
    }
}

impl SolutionValidator {
    pub fn new(tolerance: f64) -> Self {
        Self { tolerance }
    }

    pub fn tolerance(&self) -> f64 {
        self.tolerance
    }

    /// Evaluates every constraint and bound. Missing weights count as 0.
    pub fn validate(
        &self,
        solution: &Solution,
        constraints: &ConstraintSet,
        classification: &Classification,
        premiums: &[PremiumPair],
    ) -> ValidationReport {
        if !solution.has_weights() {
            info!(
                event = "validate_end",
                verdict = "rejected",
                status = solution.status().as_str(),
            );
            return ValidationReport {
                verdict: Verdict::Rejected,
                tolerance: self.tolerance,
                checked: 0,
                violations: Vec::new(),
                bound_violations: Vec::new(),
                diagnostics: None,
            };
        }

        let weight = |id: SignId| solution.weight(id).unwrap_or(0.0);
        let violations: Vec<Violation> = constraints
            .iter()
            .filter_map(|c| {
                let slack = c.slack(&weight);
                (slack < -self.tolerance).then(|| Violation {
                    constraint: c.clone(),
                    slack,
                })
            })
            .collect();

        let bound_violations: Vec<BoundViolation> = classification
            .iter()
            .filter_map(|(sign, class)| {
                let bounds = classification.class_bounds(class);
                let w = weight(sign);
                (!bounds.contains(w, self.tolerance)).then_some(BoundViolation {
                    sign,
                    class,
                    weight: w,
                    bounds,
                })
            })
            .collect();

        let verdict = if violations.is_empty() && bound_violations.is_empty() {
            Verdict::Consistent
        } else {
            Verdict::Inconsistent
        };

        for v in violations.iter().take(5) {
            warn!(slack = v.slack, "violated: {}", v.constraint);
        }
        for b in bound_violations.iter().take(5) {
            warn!(
                sign = %b.sign,
                weight = b.weight,
                bounds = %b.bounds,
                "weight outside class bounds"
            );
        }

        let report = ValidationReport {
            verdict,
            tolerance: self.tolerance,
            checked: constraints.len(),
            violations,
            bound_violations,
            diagnostics: Diagnostics::compute(solution.weights(), classification, premiums),
        };
        info!(
            event = "validate_end",
            verdict = if report.is_consistent() { "consistent" } else { "inconsistent" },
            checked = report.checked as u64,
            violation_count = report.violation_count() as u64,
        );
        report
    }
}

#[cfg(test)]
#[path = "analysis_tests.rs"]
mod tests;
