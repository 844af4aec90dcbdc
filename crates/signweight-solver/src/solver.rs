//! Solves an [`LpProblem`] with the `minilp` dual simplex.
//!
//! Logging levels:
//! - **INFO**: solve start and end with problem size, status and duration
//! - **DEBUG**: backend outcome details

use std::collections::BTreeMap;
use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::thread;
use std::time::{Duration, Instant};

use minilp::{ComparisonOp, LinearExpr, OptimizationDirection, Problem};
use signweight_config::WeightConfig;
use signweight_core::{Solution, SolverStatus};
use tracing::{debug, info};

use crate::error::SolveError;
use crate::problem::LpProblem;
use crate::termination::TimeLimit;

/// What the backend reported.
#[derive(Debug, Clone, PartialEq)]
enum Outcome {
    Optimal { objective: f64, values: Vec<f64> },
    Infeasible,
    Unbounded,
}

/// Minimizes total weight subject to the problem's rows and bounds.
///
/// # Example
///
/// ```
/// use signweight_core::{Bounds, Constraint, ConstraintSet, SignId, SolverStatus};
/// use signweight_solver::{LpProblem, WeightSolver};
///
/// let mut constraints = ConstraintSet::new();
/// constraints.push(Constraint::hierarchy(SignId(125), SignId(342), 0.5, "authority>commodity"));
/// let variables = [
///     (SignId(125), Bounds::new(1.0, 8.0)),
///     (SignId(342), Bounds::new(1.0, 4.0)),
/// ];
/// let problem = LpProblem::build(variables, &constraints).unwrap();
///
/// let solution = WeightSolver::new().solve(&problem).unwrap();
/// assert_eq!(solution.status(), SolverStatus::Optimal);
/// assert!((solution.weight(SignId(125)).unwrap() - 1.5).abs() < 1e-6);
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct WeightSolver {
    time_limit: Option<TimeLimit>,
}

impl WeightSolver {
    /// A solver without a time limit.
    pub fn new() -> Self {
        Self::default()
    }

    /// A solver honoring the configuration's `termination` section.
    pub fn from_config(config: &WeightConfig) -> Self {
        Self {
            time_limit: TimeLimit::from_config(config),
        }
    }

    pub fn with_time_limit(mut self, limit: TimeLimit) -> Self {
        self.time_limit = Some(limit);
        self
    }

    pub fn time_limit(&self) -> Option<TimeLimit> {
        self.time_limit
    }

    /// Solves the problem.
    ///
    /// Infeasible, unbounded and timed-out solves return a [`Solution`]
    /// without weights; only worker failures are errors.
    pub fn solve(&self, problem: &LpProblem) -> Result<Solution, SolveError> {
        let start = Instant::now();
        info!(
            event = "solve_start",
            variable_count = problem.variable_count() as u64,
            constraint_count = problem.row_count() as u64,
            time_limit_ms = self.time_limit.map(|l| l.duration().as_millis() as u64),
        );

        let outcome = if let Some(origin) = problem.infeasible_row() {
            debug!(origin, "constraint reduces to an impossible inequality");
            Some(Outcome::Infeasible)
        } else if problem.is_empty() {
            Some(Outcome::Optimal {
                objective: 0.0,
                values: Vec::new(),
            })
        } else {
            match self.time_limit {
                Some(limit) => solve_with_limit(problem.clone(), limit.duration())?,
                None => Some(run_backend(problem)),
            }
        };

        let duration = start.elapsed();
        let solution = match outcome {
            Some(Outcome::Optimal { objective, values }) => {
                let weights: BTreeMap<_, _> =
                    problem.signs().iter().copied().zip(values).collect();
                Solution::solved(SolverStatus::Optimal, objective, weights, duration)
            }
            Some(Outcome::Infeasible) => Solution::unsolved(SolverStatus::Infeasible, duration),
            Some(Outcome::Unbounded) => Solution::unsolved(SolverStatus::Unbounded, duration),
            None => Solution::unsolved(SolverStatus::TimeLimitExceeded, duration),
        };

        info!(
            event = "solve_end",
            status = solution.status().as_str(),
            objective = solution.objective(),
            duration_ms = duration.as_millis() as u64,
        );
        Ok(solution)
    }
}

// Runs the backend on a worker thread and stops waiting at `limit`. A
// worker that outlives the limit is abandoned; its result is dropped.
fn solve_with_limit(problem: LpProblem, limit: Duration) -> Result<Option<Outcome>, SolveError> {
    let (tx, rx) = mpsc::channel();
    thread::Builder::new()
        .name("signweight-lp".to_string())
        .spawn(move || {
            let _ = tx.send(run_backend(&problem));
        })
        .map_err(|e| SolveError::Worker(e.to_string()))?;
    await_outcome(&rx, limit)
}

fn await_outcome(rx: &Receiver<Outcome>, limit: Duration) -> Result<Option<Outcome>, SolveError> {
    match rx.recv_timeout(limit) {
        Ok(outcome) => Ok(Some(outcome)),
        Err(RecvTimeoutError::Timeout) => {
            debug!(limit_ms = limit.as_millis() as u64, "time limit reached, abandoning worker");
            Ok(None)
        }
        Err(RecvTimeoutError::Disconnected) => Err(SolveError::Worker(
            "worker exited without a result".to_string(),
        )),
    }
}

fn run_backend(problem: &LpProblem) -> Outcome {
    let mut lp = Problem::new(OptimizationDirection::Minimize);
    let vars: Vec<_> = problem
        .bounds()
        .iter()
        .map(|b| lp.add_var(1.0, (b.lower, b.upper)))
        .collect();

    for row in problem.rows() {
        let mut expr = LinearExpr::empty();
        for &(index, coefficient) in &row.coefficients {
            expr.add(vars[index], coefficient);
        }
        lp.add_constraint(expr, ComparisonOp::Ge, row.rhs);
    }

    match lp.solve() {
        Ok(solution) => Outcome::Optimal {
            objective: solution.objective(),
            values: vars.iter().map(|&v| solution[v]).collect(),
        },
        Err(minilp::Error::Infeasible) => Outcome::Infeasible,
        Err(minilp::Error::Unbounded) => Outcome::Unbounded,
    }
}

#[cfg(test)]
#[path = "solver_tests.rs"]
mod tests;
