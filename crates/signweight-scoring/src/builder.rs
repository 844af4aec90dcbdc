//! Constraint generation from the corpus, the classification and the tables.
//!
//! Logging levels:
//! - **INFO**: constraint counts per kind
//! - **WARN**: skipped compounds and configuration fallbacks

use std::collections::BTreeSet;

use signweight_config::{HierarchyRule, WeightConfig, DEFAULT_MARGIN};
use signweight_core::{Constraint, ConstraintKind, ConstraintSet, SignId};
use signweight_corpus::{ConstraintTables, Corpus};
use tracing::{info, warn};

use crate::classifier::Classification;

const DEFAULT_EFFICIENCY_SLACK: f64 = 1.0;

/// Produces the full constraint set as plain data.
///
/// Output order is deterministic: curvature constraints in corpus order,
/// hierarchy constraints in rule order then id order, compounds in id
/// order, efficiency constraints last.
///
/// # Example
///
/// ```
/// use signweight_config::WeightConfig;
/// use signweight_core::ConstraintKind;
/// use signweight_corpus::{ConstraintTables, Corpus};
/// use signweight_scoring::{Classifier, ConstraintBuilder};
///
/// let (corpus, _) = Corpus::parse("M-1\t1 342 125 9\n");
/// let config = WeightConfig::new();
/// let classification = Classifier::new(&config).classify(corpus.vocabulary());
/// let set = ConstraintBuilder::new(&config).build(&corpus, &classification, &ConstraintTables::new());
///
/// assert_eq!(set.count(ConstraintKind::Curvature), 2);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct ConstraintBuilder<'a> {
    config: &'a WeightConfig,
}

impl<'a> ConstraintBuilder<'a> {
    pub fn new(config: &'a WeightConfig) -> Self {
        Self { config }
    }

    /// Builds every constraint family. Never fails; problems become warnings.
    pub fn build(
        &self,
        corpus: &Corpus,
        classification: &Classification,
        tables: &ConstraintTables,
    ) -> ConstraintSet {
        let mut set = ConstraintSet::new();
        add_curvature(&mut set, corpus);
        for rule in &self.config.hierarchy {
            add_hierarchy(&mut set, rule, corpus, classification, tables);
        }
        add_compounds(&mut set, corpus, tables);
        if self.config.efficiency.enabled {
            self.add_efficiency(&mut set, corpus);
        }

        for warning in set.warnings() {
            warn!("{}", warning);
        }
        info!(
            event = "build_end",
            constraint_count = set.len() as u64,
            curvature_count = set.count(ConstraintKind::Curvature) as u64,
            hierarchy_count = set.count(ConstraintKind::Hierarchy) as u64,
            compound_count = set.count(ConstraintKind::Compound) as u64,
            efficiency_count = set.count(ConstraintKind::Efficiency) as u64,
            warning_count = set.warnings().len() as u64,
        );
        set
    }

    // Among the `top_n` most frequent signs, the first half must not
    // outweigh the second half by more than `slack`.
    fn add_efficiency(&self, set: &mut ConstraintSet, corpus: &Corpus) {
        let efficiency = &self.config.efficiency;
        let slack = if efficiency.slack.is_finite() && efficiency.slack >= 0.0 {
            efficiency.slack
        } else {
            set.warn(format!(
                "efficiency slack {} is invalid, using {}",
                efficiency.slack, DEFAULT_EFFICIENCY_SLACK
            ));
            DEFAULT_EFFICIENCY_SLACK
        };

        let top: Vec<SignId> = corpus
            .vocabulary()
            .by_frequency()
            .into_iter()
            .take(efficiency.top_n)
            .map(|s| s.id)
            .collect();
        let (frequent, rare) = top.split_at(top.len() / 2);
        for &f in frequent {
            for &r in rare {
                set.push(Constraint::efficiency(
                    f,
                    r,
                    slack,
                    format!("efficiency {}<={}", f, r),
                ));
            }
        }
    }
}

fn add_curvature(set: &mut ConstraintSet, corpus: &Corpus) {
    for inscription in corpus.inscriptions() {
        for (pos, triple) in inscription.triples() {
            set.push(Constraint::curvature(
                triple,
                format!("{}@{}", inscription.id(), pos),
            ));
        }
    }
}

fn add_hierarchy(
    set: &mut ConstraintSet,
    rule: &HierarchyRule,
    corpus: &Corpus,
    classification: &Classification,
    tables: &ConstraintTables,
) {
    if rule.dominant == rule.dominated {
        set.warn(format!(
            "hierarchy rule {} > {} compares a class with itself, skipped",
            rule.dominant, rule.dominated
        ));
        return;
    }
    let margin = if rule.margin.is_finite() && rule.margin >= 0.0 {
        rule.margin
    } else {
        set.warn(format!(
            "hierarchy margin {} for {} > {} is invalid, using {}",
            rule.margin, rule.dominant, rule.dominated, DEFAULT_MARGIN
        ));
        DEFAULT_MARGIN
    };

    let keep = |id: &SignId| !(rule.exclude_modifiers && tables.is_modifier(*id));
    let dominant: Vec<SignId> = classification
        .members(rule.dominant)
        .into_iter()
        .filter(keep)
        .collect();
    let mut dominated: Vec<SignId> = classification
        .members(rule.dominated)
        .into_iter()
        .filter(keep)
        .collect();

    if let Some(cap) = rule.dominated_cap {
        let vocabulary = corpus.vocabulary();
        dominated.sort_by(|a, b| {
            vocabulary
                .frequency(*b)
                .cmp(&vocabulary.frequency(*a))
                .then(a.cmp(b))
        });
        dominated.truncate(cap);
        dominated.sort();
    }

    let origin = format!("{}>{}", rule.dominant, rule.dominated);
    for &a in &dominant {
        for &b in &dominated {
            set.push(Constraint::hierarchy(a, b, margin, origin.clone()));
        }
    }
}

fn add_compounds(set: &mut ConstraintSet, corpus: &Corpus, tables: &ConstraintTables) {
    let vocabulary = corpus.vocabulary();
    for (&compound, parts) in tables.compounds() {
        if parts.is_empty() {
            set.warn(format!("compound {} has no constituents, skipped", compound));
            continue;
        }
        if !vocabulary.contains(compound) {
            set.warn(format!(
                "compound {} does not occur in the corpus, skipped",
                compound
            ));
            continue;
        }
        let missing: BTreeSet<SignId> = parts
            .iter()
            .copied()
            .filter(|p| !vocabulary.contains(*p))
            .collect();
        if !missing.is_empty() {
            let missing: Vec<String> = missing.iter().map(SignId::to_string).collect();
            set.warn(format!(
                "compound {} references unknown constituents [{}], skipped",
                compound,
                missing.join(", ")
            ));
            continue;
        }
        set.push(Constraint::compound(
            compound,
            parts,
            format!("compound {}", compound),
        ));
    }
}

#[cfg(test)]
#[path = "builder_tests.rs"]
mod tests;
