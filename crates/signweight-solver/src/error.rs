//! Solver failures that are not outcomes of the linear program itself.
//!
//! Infeasible, unbounded and timed-out solves are statuses on the returned
//! [`Solution`](signweight_core::Solution), not errors.

use signweight_core::{Bounds, SignId, SignWeightError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SolveError {
    /// A constraint references a sign that has no variable.
    #[error("constraint {origin} references sign {sign} with no variable")]
    UnknownSign { sign: SignId, origin: String },

    /// Variable bounds are negative, non-finite or inverted.
    #[error("invalid bounds {bounds} for sign {sign}")]
    InvalidBounds { sign: SignId, bounds: Bounds },

    /// The same sign was given two variables.
    #[error("duplicate variable for sign {0}")]
    DuplicateVariable(SignId),

    /// The worker thread could not be started or died without a result.
    #[error("solver worker failed: {0}")]
    Worker(String),
}

impl From<SolveError> for SignWeightError {
    fn from(err: SolveError) -> Self {
        SignWeightError::Solver(err.to_string())
    }
}
