//! SignWeight Solver
//!
//! This crate turns a constraint set into a linear program and solves it:
//! - [`LpProblem`]: one bounded variable per sign, one `>=` row per constraint
//! - [`WeightSolver`]: minimizes total weight, optionally under a time limit
//! - [`TimeLimit`]: the wall-clock bound on a solve

pub mod error;
pub mod problem;
pub mod solver;
pub mod termination;

pub use error::SolveError;
pub use problem::{LpProblem, LpRow};
pub use solver::WeightSolver;
pub use termination::TimeLimit;
