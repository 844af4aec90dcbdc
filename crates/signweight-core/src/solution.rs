//! Solver output: status, objective and the weight map.

use std::collections::BTreeMap;
use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::sign::SignId;

/// Outcome reported by the LP solve step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SolverStatus {
    Optimal,
    /// A feasible, not provably optimal assignment.
    Feasible,
    Infeasible,
    /// The configured time limit elapsed before the solver returned.
    TimeLimitExceeded,
    /// Cannot happen with finite bounds; kept so the backend status maps totally.
    Unbounded,
}

impl SolverStatus {
    /// Only optimal and feasible outcomes carry a weight map.
    pub fn has_solution(&self) -> bool {
        matches!(self, SolverStatus::Optimal | SolverStatus::Feasible)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SolverStatus::Optimal => "optimal",
            SolverStatus::Feasible => "feasible",
            SolverStatus::Infeasible => "infeasible",
            SolverStatus::TimeLimitExceeded => "time_limit_exceeded",
            SolverStatus::Unbounded => "unbounded",
        }
    }
}

impl fmt::Display for SolverStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of one solve invocation. Never mutated after it is produced.
#[derive(Debug, Clone, PartialEq)]
pub struct Solution {
    status: SolverStatus,
    objective: Option<f64>,
    weights: BTreeMap<SignId, f64>,
    duration: Duration,
}

impl Solution {
    /// A solution carrying weights. `status` should be optimal or feasible.
    pub fn solved(
        status: SolverStatus,
        objective: f64,
        weights: BTreeMap<SignId, f64>,
        duration: Duration,
    ) -> Self {
        debug_assert!(status.has_solution());
        Self {
            status,
            objective: Some(objective),
            weights,
            duration,
        }
    }

    /// A solution without weights (infeasible, time limit, unbounded).
    pub fn unsolved(status: SolverStatus, duration: Duration) -> Self {
        Self {
            status,
            objective: None,
            weights: BTreeMap::new(),
            duration,
        }
    }

    pub fn status(&self) -> SolverStatus {
        self.status
    }

    pub fn objective(&self) -> Option<f64> {
        self.objective
    }

    pub fn weights(&self) -> &BTreeMap<SignId, f64> {
        &self.weights
    }

    pub fn weight(&self, id: SignId) -> Option<f64> {
        self.weights.get(&id).copied()
    }

    pub fn duration(&self) -> Duration {
        self.duration
    }

    pub fn has_weights(&self) -> bool {
        self.status.has_solution()
    }
}
