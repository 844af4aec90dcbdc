//! Process exit codes.
//!
//! - 0: weights written (violations, if any, are reported as warnings)
//! - 1: corpus, configuration or output failure
//! - 2: the solve produced no weights (infeasible, time limit, unbounded)

use std::process::ExitCode;

use signweight::{SignWeightError, SolverStatus};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum CliExitCode {
    Success = 0,
    /// Inputs, configuration or output could not be handled.
    Failure = 1,
    /// The problem has no acceptable weight assignment.
    NoSolution = 2,
}

impl From<CliExitCode> for ExitCode {
    fn from(code: CliExitCode) -> Self {
        ExitCode::from(code as u8)
    }
}

impl From<&SignWeightError> for CliExitCode {
    fn from(_: &SignWeightError) -> Self {
        CliExitCode::Failure
    }
}

impl From<SolverStatus> for CliExitCode {
    fn from(status: SolverStatus) -> Self {
        if status.has_solution() {
            CliExitCode::Success
        } else {
            CliExitCode::NoSolution
        }
    }
}
