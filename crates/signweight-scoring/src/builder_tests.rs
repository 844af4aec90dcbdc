//! Tests for constraint generation.

use super::*;
use crate::classifier::Classifier;
use signweight_config::{BoundMode, EfficiencyConfig};
use signweight_core::{Bounds, SignClass};
use signweight_test::corpora;

fn build(config: &WeightConfig, corpus: &Corpus, tables: &ConstraintTables) -> ConstraintSet {
    let classification = Classifier::new(config).classify(corpus.vocabulary());
    ConstraintBuilder::new(config).build(corpus, &classification, tables)
}

#[test]
fn test_scenario_counts() {
    let corpus = corpora::scenario();
    let set = build(&corpora::scenario_config(), &corpus, &ConstraintTables::new());

    assert_eq!(set.count(ConstraintKind::Curvature), 4);
    // 2 authority x 3 commodity
    assert_eq!(set.count(ConstraintKind::Hierarchy), 6);
    assert_eq!(set.count(ConstraintKind::Compound), 0);
    assert_eq!(set.count(ConstraintKind::Efficiency), 0);
    assert!(set.warnings().is_empty());
}

#[test]
fn test_curvature_sliding_window() {
    let corpus = corpora::from_sequences(&[&[1, 2, 3, 4, 5], &[7, 8], &[9]]);
    let set = build(&WeightConfig::new().with_hierarchy(vec![]), &corpus, &ConstraintTables::new());

    assert_eq!(set.len(), 3);
    let origins: Vec<&str> = set.iter().map(|c| c.origin()).collect();
    assert_eq!(origins, vec!["I-1@0", "I-1@1", "I-1@2"]);
    let signs: Vec<SignId> = set.constraints()[2].signs().collect();
    assert_eq!(signs, vec![SignId(3), SignId(4), SignId(5)]);
}

#[test]
fn test_hierarchy_margin_and_direction() {
    let corpus = corpora::scenario();
    let config = corpora::scenario_config().with_hierarchy(vec![HierarchyRule::new(
        SignClass::Authority,
        SignClass::Commodity,
    )
    .with_margin(0.75)]);
    let set = build(&config, &corpus, &ConstraintTables::new());

    let first = set
        .iter()
        .find(|c| c.kind() == ConstraintKind::Hierarchy)
        .unwrap();
    assert_eq!(first.rhs(), 0.75);
    assert_eq!(first.terms()[0].sign, SignId(125));
    assert_eq!(first.terms()[0].coefficient, 1.0);
    assert_eq!(first.terms()[1].sign, SignId(342));
    assert_eq!(first.terms()[1].coefficient, -1.0);
    assert_eq!(first.origin(), "authority>commodity");
}

#[test]
fn test_hierarchy_cap_keeps_most_frequent() {
    // 342 occurs twice, 410 and 740 once each.
    let corpus = corpora::scenario();
    let config = corpora::scenario_config().with_hierarchy(vec![HierarchyRule::new(
        SignClass::Authority,
        SignClass::Commodity,
    )
    .with_dominated_cap(2)]);
    let set = build(&config, &corpus, &ConstraintTables::new());

    let dominated: BTreeSet<SignId> = set
        .iter()
        .filter(|c| c.kind() == ConstraintKind::Hierarchy)
        .map(|c| c.terms()[1].sign)
        .collect();
    // Tie between 410 and 740 is broken by the lower id.
    assert_eq!(dominated, BTreeSet::from([SignId(342), SignId(410)]));
    assert_eq!(set.count(ConstraintKind::Hierarchy), 4);
}

#[test]
fn test_hierarchy_excludes_modifiers() {
    let corpus = corpora::scenario();
    let tables = ConstraintTables::new().with_modifier(SignId(410));
    let set = build(&corpora::scenario_config(), &corpus, &tables);
    assert_eq!(set.count(ConstraintKind::Hierarchy), 4);
    assert!(set
        .iter()
        .filter(|c| c.kind() == ConstraintKind::Hierarchy)
        .all(|c| !c.signs().any(|s| s == SignId(410))));

    let mut rule = HierarchyRule::new(SignClass::Authority, SignClass::Commodity);
    rule.exclude_modifiers = false;
    let config = corpora::scenario_config().with_hierarchy(vec![rule]);
    let set = build(&config, &corpus, &tables);
    assert_eq!(set.count(ConstraintKind::Hierarchy), 6);
}

#[test]
fn test_malformed_hierarchy_rules_fall_back() {
    let corpus = corpora::scenario();
    let config = corpora::scenario_config().with_hierarchy(vec![
        HierarchyRule::new(SignClass::Authority, SignClass::Authority),
        HierarchyRule::new(SignClass::Authority, SignClass::Commodity).with_margin(f64::NAN),
    ]);
    let set = build(&config, &corpus, &ConstraintTables::new());

    assert_eq!(set.count(ConstraintKind::Hierarchy), 6);
    assert!(set
        .iter()
        .filter(|c| c.kind() == ConstraintKind::Hierarchy)
        .all(|c| c.rhs() == DEFAULT_MARGIN));
    assert_eq!(set.warnings().len(), 2);
}

#[test]
fn test_compounds_with_unknown_signs_are_skipped() {
    let corpus = corpora::from_sequences(&[&[900, 1, 2], &[901, 3]]);
    let tables = ConstraintTables::new()
        .with_compound(SignId(900), [SignId(1), SignId(2)])
        .with_compound(SignId(901), [SignId(3), SignId(77)])
        .with_compound(SignId(902), [SignId(1)])
        .with_compound(SignId(903), []);
    let set = build(&WeightConfig::new().with_hierarchy(vec![]), &corpus, &tables);

    assert_eq!(set.count(ConstraintKind::Compound), 1);
    let compound = set
        .iter()
        .find(|c| c.kind() == ConstraintKind::Compound)
        .unwrap();
    assert_eq!(compound.origin(), "compound 900");
    assert_eq!(compound.terms().len(), 3);

    assert_eq!(set.warnings().len(), 3);
    assert!(set.warnings()[0].contains("unknown constituents [77]"));
    assert!(set.warnings()[1].contains("902"));
    assert!(set.warnings()[2].contains("no constituents"));
}

#[test]
fn test_no_compound_table_means_no_compound_constraints() {
    let corpus = corpora::scenario();
    let set = build(&corpora::scenario_config(), &corpus, &ConstraintTables::new());
    assert_eq!(set.count(ConstraintKind::Compound), 0);
}

#[test]
fn test_efficiency_pairs() {
    // frequencies: 1 x4, 2 x3, 3 x2, 4 x1
    let corpus = corpora::from_sequences(&[&[1, 1, 1, 1], &[2, 2, 2], &[3, 3], &[4]]);
    let mut config = WeightConfig::new().with_hierarchy(vec![]);
    config.efficiency = EfficiencyConfig {
        enabled: true,
        top_n: 4,
        slack: 1.0,
    };
    let set = build(&config, &corpus, &ConstraintTables::new());

    assert_eq!(set.count(ConstraintKind::Efficiency), 4);
    let first = set
        .iter()
        .find(|c| c.kind() == ConstraintKind::Efficiency)
        .unwrap();
    assert_eq!(first.origin(), "efficiency 1<=3");
    assert_eq!(first.rhs(), -1.0);
}

#[test]
fn test_empty_constraint_set_is_not_an_error() {
    let corpus = corpora::from_sequences(&[&[500, 600]]);
    let set = build(
        &WeightConfig::new().with_bound_mode(BoundMode::Fixed),
        &corpus,
        &ConstraintTables::new(),
    );
    assert!(set.is_empty());
}

#[test]
fn test_build_is_deterministic() {
    let corpus = corpora::scenario();
    let tables = ConstraintTables::new()
        .with_compound(SignId(905), [SignId(3), SignId(1)])
        .with_modifier(SignId(2));
    let mut config = corpora::scenario_config()
        .with_authority([125, 126, 905], Bounds::new(3.0, 8.0));
    config.efficiency.enabled = true;

    let first = build(&config, &corpus, &tables);
    let second = build(&config.clone(), &corpus.clone(), &tables.clone());
    assert_eq!(first, second);
    assert!(!first.is_empty());
}
