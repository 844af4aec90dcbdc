//! Load, classify, build, solve and validate in one call.

use std::path::{Path, PathBuf};

use signweight_config::{BoundMode, WeightConfig};
use signweight_core::{ConstraintSet, Result, Solution};
use signweight_corpus::{ConstraintTables, Corpus, LoadReport, TableReport};
use signweight_scoring::{
    Classification, Classifier, ConstraintBuilder, SolutionValidator, ValidationReport,
};
use signweight_solver::{LpProblem, WeightSolver};
use tracing::info;

use crate::report::WeightReport;

/// Input file locations.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Inputs {
    pub corpus: PathBuf,
    pub compounds: Option<PathBuf>,
    pub modifiers: Option<PathBuf>,
}

impl Inputs {
    pub fn new(corpus: impl Into<PathBuf>) -> Self {
        Self {
            corpus: corpus.into(),
            ..Self::default()
        }
    }

    pub fn with_compounds(mut self, path: impl Into<PathBuf>) -> Self {
        self.compounds = Some(path.into());
        self
    }

    pub fn with_modifiers(mut self, path: impl Into<PathBuf>) -> Self {
        self.modifiers = Some(path.into());
        self
    }
}

/// Everything one run produced.
#[derive(Debug, Clone)]
pub struct RunOutcome {
    pub corpus_report: LoadReport,
    pub table_report: TableReport,
    pub inscription_count: usize,
    pub classification: Classification,
    pub constraints: ConstraintSet,
    pub solution: Solution,
    pub validation: ValidationReport,
    pub bound_mode: BoundMode,
}

impl RunOutcome {
    /// True when the solver produced a weight map.
    pub fn is_solved(&self) -> bool {
        self.solution.has_weights()
    }

    /// Number of distinct signs, one LP variable each.
    pub fn vocabulary_size(&self) -> usize {
        self.classification.len()
    }

    pub fn report(&self) -> WeightReport {
        WeightReport::from_outcome(self)
    }

    /// Writes the weight map to `path` if there is one.
    ///
    /// Returns whether a file was written. Infeasible, unbounded and
    /// timed-out runs write nothing.
    pub fn write_weights(&self, path: &Path) -> Result<bool> {
        if !self.is_solved() {
            return Ok(false);
        }
        self.report().write(path)?;
        Ok(true)
    }
}

/// The weight assignment pipeline for one configuration.
#[derive(Debug, Clone)]
pub struct Pipeline {
    config: WeightConfig,
}

impl Pipeline {
    /// Validates `config` and wraps it.
    pub fn new(config: WeightConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &WeightConfig {
        &self.config
    }

    /// Loads the corpus and tables named by `inputs`, then runs.
    ///
    /// An unreadable or empty corpus is an error; missing tables are not.
    pub fn run(&self, inputs: &Inputs) -> Result<RunOutcome> {
        let (corpus, corpus_report) = Corpus::load(&inputs.corpus)?;
        let (tables, table_report) =
            ConstraintTables::load(inputs.compounds.as_deref(), inputs.modifiers.as_deref());
        self.run_with_reports(corpus, tables, corpus_report, table_report)
    }

    /// Runs on an already loaded corpus.
    pub fn run_loaded(&self, corpus: Corpus, tables: ConstraintTables) -> Result<RunOutcome> {
        self.run_with_reports(corpus, tables, LoadReport::default(), TableReport::default())
    }

    fn run_with_reports(
        &self,
        corpus: Corpus,
        tables: ConstraintTables,
        corpus_report: LoadReport,
        table_report: TableReport,
    ) -> Result<RunOutcome> {
        let corpus = corpus.with_compounds(tables.compound_ids());

        let classification = Classifier::new(&self.config).classify(corpus.vocabulary());
        let constraints =
            ConstraintBuilder::new(&self.config).build(&corpus, &classification, &tables);

        let problem = LpProblem::build(classification.variable_bounds(), &constraints)?;
        let solution = WeightSolver::from_config(&self.config).solve(&problem)?;

        let validation = SolutionValidator::new(self.config.tolerance).validate(
            &solution,
            &constraints,
            &classification,
            &self.config.premiums,
        );

        info!(
            event = "run_end",
            status = solution.status().as_str(),
            sign_count = classification.len() as u64,
            constraint_count = constraints.len() as u64,
        );

        Ok(RunOutcome {
            corpus_report,
            table_report,
            inscription_count: corpus.len(),
            classification,
            constraints,
            solution,
            validation,
            bound_mode: self.config.bound_mode,
        })
    }
}
