//! SignWeight - sign weight assignment by linear programming
//!
//! Loads a corpus of inscriptions, classifies every sign, generates
//! curvature, hierarchy, compound and efficiency constraints, minimizes the
//! total weight under class bounds and validates the result.
//!
//! # Example
//!
//! ```rust
//! use signweight::prelude::*;
//!
//! let (corpus, _) = Corpus::parse("M-1\t1 342 125\nM-2\t2 410 125\n");
//! let pipeline = Pipeline::new(WeightConfig::new()).unwrap();
//! let outcome = pipeline.run_loaded(corpus, ConstraintTables::new()).unwrap();
//!
//! assert_eq!(outcome.solution.status(), SolverStatus::Optimal);
//! assert!(outcome.validation.is_consistent());
//! ```

pub use signweight_config::{
    BoundMode, ConfigError, HierarchyRule, PremiumPair, TerminationConfig, WeightConfig,
};
pub use signweight_core::{
    Bounds, Constraint, ConstraintKind, ConstraintSet, Result, SignClass, SignId,
    SignWeightError, Solution, SolverStatus,
};
pub use signweight_corpus::{ConstraintTables, Corpus, LoadReport, TableReport};
pub use signweight_scoring::{
    Classification, Classifier, ConstraintBuilder, Diagnostics, SolutionValidator,
    ValidationReport, Verdict,
};
pub use signweight_solver::{LpProblem, WeightSolver};

mod pipeline;
mod report;

pub use pipeline::{Inputs, Pipeline, RunOutcome};
pub use report::WeightReport;

/// Installs the colored console logger.
#[cfg(feature = "console")]
pub use signweight_console::{init as init_console, init_with_level as init_console_with_level};

pub mod prelude {
    pub use super::{BoundMode, HierarchyRule, WeightConfig};
    pub use super::{ConstraintTables, Corpus};
    pub use super::{Inputs, Pipeline, RunOutcome, WeightReport};
    pub use super::{SignClass, SignId, SolverStatus, Verdict};
}
