//! SignWeight Core - Core types for sign weight assignment
//!
//! This crate provides the fundamental abstractions for SignWeight:
//! - Sign identifiers, classes, bounds and the vocabulary
//! - Inscriptions (ordered sign sequences)
//! - Linear constraints and constraint sets
//! - Solutions and solver status

pub mod constraint;
pub mod error;
pub mod inscription;
pub mod sign;
pub mod solution;

#[cfg(test)]
mod constraint_tests;

pub use constraint::{Constraint, ConstraintKind, ConstraintSet, Term};
pub use error::{MalformedRowError, Result, SignWeightError};
pub use inscription::Inscription;
pub use sign::{Bounds, ParseSignIdError, Sign, SignClass, SignId, Vocabulary};
pub use solution::{Solution, SolverStatus};
