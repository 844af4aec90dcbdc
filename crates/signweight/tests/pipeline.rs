//! End-to-end runs through the public pipeline.

use signweight::prelude::*;
use signweight::{ConstraintKind, SignWeightError};
use signweight_test::{corpora, files};

const TOL: f64 = 1e-6;

#[test]
fn scenario_solves_with_hierarchy_and_curvature() {
    let pipeline = Pipeline::new(corpora::scenario_config()).unwrap();
    let outcome = pipeline
        .run_loaded(corpora::scenario(), ConstraintTables::new())
        .unwrap();

    assert_eq!(outcome.solution.status(), SolverStatus::Optimal);
    assert!(outcome.validation.is_consistent());
    assert_eq!(outcome.vocabulary_size(), 9);

    let w = |id: u32| outcome.solution.weight(SignId(id)).unwrap();
    for a in [125, 126] {
        for c in [342, 410, 740] {
            assert!(w(a) >= w(c) + 0.5 - TOL);
        }
    }
    for [i, j, k] in corpora::SCENARIO {
        assert!(w(i) - 2.0 * w(j) + w(k) >= -TOL);
    }
}

#[test]
fn infeasible_run_has_no_weights() {
    let pipeline = Pipeline::new(corpora::infeasible_config()).unwrap();
    let outcome = pipeline
        .run_loaded(corpora::scenario(), ConstraintTables::new())
        .unwrap();

    assert_eq!(outcome.solution.status(), SolverStatus::Infeasible);
    assert!(!outcome.is_solved());
    assert_eq!(outcome.validation.verdict, Verdict::Rejected);

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("weights.json");
    assert!(!outcome.write_weights(&path).unwrap());
    assert!(!path.exists());
}

#[test]
fn missing_compound_table_degrades_gracefully() {
    let dir = tempfile::tempdir().unwrap();
    let written = files::write_scenario(dir.path()).unwrap();
    let inputs = Inputs::new(&written.corpus).with_compounds(dir.path().join("absent.tsv"));

    let outcome = Pipeline::new(corpora::scenario_config())
        .unwrap()
        .run(&inputs)
        .unwrap();

    assert_eq!(outcome.solution.status(), SolverStatus::Optimal);
    assert_eq!(outcome.constraints.count(ConstraintKind::Compound), 0);
    assert_eq!(outcome.table_report.unavailable.len(), 1);
    assert!(outcome.report().warnings.iter().any(|w| w.contains("absent.tsv")));
}

#[test]
fn compound_table_adds_constraint() {
    let dir = tempfile::tempdir().unwrap();
    let written = files::write_scenario(dir.path()).unwrap();
    let inputs = Inputs::new(&written.corpus)
        .with_compounds(&written.compounds)
        .with_modifiers(&written.modifiers);

    let outcome = Pipeline::new(corpora::scenario_config())
        .unwrap()
        .run(&inputs)
        .unwrap();

    assert_eq!(outcome.constraints.count(ConstraintKind::Compound), 1);
    assert_eq!(outcome.solution.status(), SolverStatus::Optimal);
    assert!(outcome.validation.is_consistent());
    // 905 >= 3 + 1
    let w = |id: u32| outcome.solution.weight(SignId(id)).unwrap();
    assert!(w(905) >= w(3) + w(1) - TOL);
}

#[test]
fn runs_are_deterministic() {
    let pipeline = Pipeline::new(corpora::scenario_config()).unwrap();
    let first = pipeline
        .run_loaded(corpora::scenario(), ConstraintTables::new())
        .unwrap();
    let second = pipeline
        .run_loaded(corpora::scenario(), ConstraintTables::new())
        .unwrap();

    assert_eq!(first.constraints, second.constraints);
    assert_eq!(first.solution.weights(), second.solution.weights());
    assert_eq!(first.report().to_json().unwrap(), second.report().to_json().unwrap());
}

#[test]
fn weight_file_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let written = files::write_scenario(dir.path()).unwrap();
    let outcome = Pipeline::new(corpora::scenario_config())
        .unwrap()
        .run(&Inputs::new(&written.corpus))
        .unwrap();

    let path = dir.path().join("output").join("weights.json");
    assert!(outcome.write_weights(&path).unwrap());

    let text = std::fs::read_to_string(&path).unwrap();
    let json: serde_json::Value = serde_json::from_str(&text).unwrap();
    assert_eq!(json["status"], "optimal");
    assert_eq!(json["variables"], 9);
    assert_eq!(json["free_variables"], true);
    assert_eq!(json["constraints"]["curvature"], 4);
    assert_eq!(json["constraints"]["hierarchy"], 6);
    assert_eq!(json["violations"], 0);

    let weights = json["weights"].as_object().unwrap();
    let keys: Vec<&str> = weights.keys().map(String::as_str).collect();
    assert_eq!(keys.len(), 9);
    assert!(weights["125"].as_f64().unwrap() >= 3.0 - TOL);
    assert!(json["analysis"]["premiums"]["authority_over_commodity"]
        .as_f64()
        .unwrap()
        >= 0.5 - TOL);
}

#[test]
fn empty_corpus_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("corpus.tsv");
    std::fs::write(&path, "inscr_id\tsign_seq\nM-1\tnot numbers\n").unwrap();

    let err = Pipeline::new(WeightConfig::new())
        .unwrap()
        .run(&Inputs::new(&path))
        .unwrap_err();
    assert!(matches!(err, SignWeightError::Corpus(_)));
}

#[test]
fn missing_corpus_is_an_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = Pipeline::new(WeightConfig::new())
        .unwrap()
        .run(&Inputs::new(dir.path().join("nope.tsv")))
        .unwrap_err();
    assert!(matches!(err, SignWeightError::Io(_)));
}

#[test]
fn invalid_config_is_rejected() {
    let err = Pipeline::new(WeightConfig::new().with_tolerance(0.0)).unwrap_err();
    assert!(matches!(err, SignWeightError::Config(_)));
}

#[test]
fn fixed_bounds_mode() {
    let config = corpora::scenario_config().with_bound_mode(BoundMode::Fixed);
    let outcome = Pipeline::new(config)
        .unwrap()
        .run_loaded(corpora::scenario(), ConstraintTables::new())
        .unwrap();

    assert_eq!(outcome.solution.status(), SolverStatus::Optimal);
    assert!(!outcome.report().free_variables);
    for w in outcome.solution.weights().values() {
        assert!(*w >= 0.1 - TOL && *w <= 10.0 + TOL);
    }
}

#[test]
fn errors_propagate_through_the_result_alias() -> signweight::Result<()> {
    let outcome = Pipeline::new(corpora::scenario_config())?
        .run_loaded(corpora::scenario(), ConstraintTables::new())?;
    assert!(outcome.is_solved());
    Ok(())
}
