//! Shared test fixtures for SignWeight crates.
//!
//! This crate provides corpora and configurations for testing.
//! It does NOT depend on `signweight-scoring` or `signweight-solver` so
//! both can use it as a dev-dependency.
//!
//! - [`corpora`] - in-memory corpora and the configurations that go with them
//! - [`files`] - the same fixtures written to disk as TSV tables
//!
//! # Usage
//!
//! ```toml
//! [dev-dependencies]
//! signweight-test = { workspace = true }
//! ```
//!
//! ```ignore
//! use signweight_test::corpora::{scenario, scenario_config};
//! ```

pub mod corpora;
pub mod files;

pub use corpora::{from_sequences, scenario, scenario_config};
