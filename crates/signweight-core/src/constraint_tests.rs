//! Tests for constraint types

use super::constraint::*;
use super::sign::SignId;

fn weights(pairs: &'static [(u32, f64)]) -> impl Fn(SignId) -> f64 {
    move |id| {
        pairs
            .iter()
            .find(|(s, _)| *s == id.0)
            .map_or(0.0, |(_, w)| *w)
    }
}

#[test]
fn test_curvature_terms() {
    let c = Constraint::curvature([SignId(1), SignId(2), SignId(3)], "t@0");
    assert_eq!(c.kind(), ConstraintKind::Curvature);
    let coefs: Vec<f64> = c.terms().iter().map(|t| t.coefficient).collect();
    assert_eq!(coefs, vec![1.0, -2.0, 1.0]);
    assert_eq!(c.rhs(), 0.0);
}

#[test]
fn test_curvature_merges_repeated_signs() {
    let c = Constraint::curvature([SignId(5), SignId(5), SignId(7)], "t@0");
    assert_eq!(c.terms().len(), 2);
    assert_eq!(c.terms()[0].sign, SignId(5));
    assert_eq!(c.terms()[0].coefficient, -1.0);

    let flat = Constraint::curvature([SignId(4), SignId(4), SignId(4)], "t@1");
    assert!(flat.is_trivial());
    assert!(flat.is_satisfied(|_| 10.0, 0.0));
}

#[test]
fn test_hierarchy_slack() {
    let c = Constraint::hierarchy(SignId(125), SignId(342), 0.5, "authority>commodity");
    let w = weights(&[(125, 3.0), (342, 2.0)]);
    assert_eq!(c.slack(&w), 0.5);
    assert!(c.is_satisfied(&w, 1e-3));

    let tight = weights(&[(125, 2.2), (342, 2.0)]);
    assert!(!c.is_satisfied(tight, 1e-3));
}

#[test]
fn test_compound_sum_of_parts() {
    let c = Constraint::compound(SignId(900), &[SignId(1), SignId(2)], "compound 900");
    assert_eq!(c.terms().len(), 3);
    assert!(c.is_satisfied(weights(&[(900, 3.0), (1, 1.0), (2, 2.0)]), 0.0));
    assert!(!c.is_satisfied(weights(&[(900, 2.0), (1, 1.0), (2, 2.0)]), 1e-3));
}

#[test]
fn test_efficiency_allows_slack() {
    let c = Constraint::efficiency(SignId(10), SignId(20), 1.0, "efficiency");
    assert_eq!(c.rhs(), -1.0);
    assert!(c.is_satisfied(weights(&[(10, 3.0), (20, 2.0)]), 0.0));
    assert!(!c.is_satisfied(weights(&[(10, 3.5), (20, 2.0)]), 1e-3));
}

#[test]
fn test_display() {
    let c = Constraint::curvature([SignId(1), SignId(342), SignId(125)], "M-1@0");
    assert_eq!(c.to_string(), "curvature [M-1@0]: w(1) - 2·w(342) + w(125) >= 0");
}

#[test]
fn test_constraint_set_counts() {
    let mut set = ConstraintSet::new();
    set.push(Constraint::curvature([SignId(1), SignId(2), SignId(3)], "a@0"));
    set.push(Constraint::curvature([SignId(2), SignId(3), SignId(4)], "a@1"));
    set.push(Constraint::hierarchy(SignId(1), SignId(2), 0.5, "r"));
    set.warn("compound 7 skipped");

    assert_eq!(set.len(), 3);
    assert_eq!(set.count(ConstraintKind::Curvature), 2);
    assert_eq!(set.count(ConstraintKind::Compound), 0);
    assert_eq!(set.counts()[1], (ConstraintKind::Hierarchy, 1));
    assert_eq!(set.warnings().len(), 1);
}
