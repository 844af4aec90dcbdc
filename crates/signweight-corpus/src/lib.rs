//! Corpus ingestion for SignWeight.
//!
//! - [`Corpus`] parses `(id, sign-sequence)` rows into inscriptions and the
//!   vocabulary with frequency counts
//! - [`ConstraintTables`] loads the optional compound and modifier tables

pub mod corpus;
pub mod tables;
mod tabular;

pub use corpus::{parse_sign_list, Corpus, CorpusError, LoadReport};
pub use tables::{ConstraintTables, TableReport};
