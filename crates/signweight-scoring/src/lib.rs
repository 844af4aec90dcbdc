//! Classification, constraint generation and solution analysis.
//!
//! This crate turns a loaded corpus into a solver-ready constraint set and
//! checks the weights that come back:
//!
//! - [`Classifier`] assigns every sign a [`SignClass`](signweight_core::SignClass)
//!   and the bounds of its weight variable
//! - [`ConstraintBuilder`] emits curvature, hierarchy, compound and
//!   efficiency constraints as plain data
//! - [`SolutionValidator`] re-evaluates a [`Solution`](signweight_core::Solution)
//!   against those constraints and summarizes the weight distribution

pub mod analysis;
pub mod builder;
pub mod classifier;

pub use analysis::{
    BoundViolation, Diagnostics, SolutionValidator, ValidationReport, Verdict, Violation,
};
pub use builder::ConstraintBuilder;
pub use classifier::{Classification, Classifier};
