//! The persisted weight map.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::Serialize;
use signweight_config::BoundMode;
use signweight_core::{ConstraintKind, Result, SignId, SignWeightError, SolverStatus};
use signweight_scoring::{Diagnostics, Verdict};
use tracing::info;

use crate::pipeline::RunOutcome;

/// JSON document written for a solved run.
///
/// Weights are keyed by sign id in ascending numeric order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeightReport {
    pub status: SolverStatus,
    pub objective: Option<f64>,
    pub variables: usize,
    pub free_variables: bool,
    pub verdict: Verdict,
    pub weights: BTreeMap<SignId, f64>,
    pub constraints: BTreeMap<&'static str, usize>,
    pub analysis: Option<Diagnostics>,
    pub violations: usize,
    pub warnings: Vec<String>,
}

impl WeightReport {
    pub fn from_outcome(outcome: &RunOutcome) -> Self {
        let constraints = outcome
            .constraints
            .counts()
            .iter()
            .map(|(kind, n)| (kind.as_str(), *n))
            .collect();

        let mut warnings: Vec<String> = outcome.constraints.warnings().to_vec();
        if outcome.corpus_report.skipped_count() > 0 {
            warnings.push(format!(
                "{} malformed corpus rows skipped",
                outcome.corpus_report.skipped_count()
            ));
        }
        for path in &outcome.table_report.unavailable {
            warnings.push(format!("table {} unavailable", path.display()));
        }
        let validation = &outcome.validation;
        warnings.extend(
            validation
                .violations
                .iter()
                .map(|v| format!("violated by {:.6}: {}", -v.slack, v.constraint)),
        );
        warnings.extend(validation.bound_violations.iter().map(|b| {
            format!(
                "sign {} ({}) weight {:.6} outside {}",
                b.sign, b.class, b.weight, b.bounds
            )
        }));

        Self {
            status: outcome.solution.status(),
            objective: outcome.solution.objective(),
            variables: outcome.vocabulary_size(),
            free_variables: outcome.bound_mode == BoundMode::Free,
            verdict: validation.verdict,
            weights: outcome.solution.weights().clone(),
            constraints,
            analysis: validation.diagnostics.clone(),
            violations: validation.violation_count(),
            warnings,
        }
    }

    pub fn count(&self, kind: ConstraintKind) -> usize {
        self.constraints.get(kind.as_str()).copied().unwrap_or(0)
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(|e| SignWeightError::Internal(e.to_string()))
    }

    /// Writes the report as pretty JSON, creating parent directories.
    pub fn write(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, self.to_json()?)?;
        info!(
            event = "write_end",
            path = %path.display(),
            weight_count = self.weights.len() as u64,
        );
        Ok(())
    }
}
