//! Partitions the vocabulary into semantic classes.
//!
//! Classification is a priority list: explicit authority membership,
//! explicit commodity membership, the numeral heuristic, then the
//! `standard` default. Every sign gets exactly one class, and the result
//! depends only on the vocabulary and the configuration.

use std::collections::{BTreeMap, BTreeSet};

use signweight_config::{default_bounds, BoundMode, ClassConfig, WeightConfig};
use signweight_core::{Bounds, SignClass, SignId, Vocabulary};
use tracing::{info, warn};

fn class_index(class: SignClass) -> usize {
    match class {
        SignClass::Authority => 0,
        SignClass::Commodity => 1,
        SignClass::Numeral => 2,
        SignClass::Standard => 3,
    }
}

/// Assigns classes and bounds according to a [`ClassConfig`].
#[derive(Debug, Clone)]
pub struct Classifier {
    classes: ClassConfig,
    bounds: [Bounds; 4],
}

impl Classifier {
    /// Resolves the bounds of every class.
    ///
    /// Invalid class bounds fall back to the class default; in fixed mode
    /// every class shares `fixed_bounds`.
    pub fn new(config: &WeightConfig) -> Self {
        let bounds = SignClass::ALL.map(|class| match config.bound_mode {
            BoundMode::Fixed if config.fixed_bounds.is_valid() => config.fixed_bounds,
            BoundMode::Fixed => {
                warn!(
                    bounds = %config.fixed_bounds,
                    "invalid fixed bounds, using per-class defaults"
                );
                default_bounds(class)
            }
            BoundMode::Free => resolve_bounds(&config.classes, class),
        });
        Self {
            classes: config.classes.clone(),
            bounds,
        }
    }

    /// Class of a single sign.
    pub fn classify_sign(&self, id: SignId, frequency: u64) -> SignClass {
        if self.classes.authority.members.contains(&id) {
            SignClass::Authority
        } else if self.classes.commodity.members.contains(&id) {
            SignClass::Commodity
        } else if self.classes.numeral.matches(id, frequency) {
            SignClass::Numeral
        } else {
            SignClass::Standard
        }
    }

    pub fn bounds(&self, class: SignClass) -> Bounds {
        self.bounds[class_index(class)]
    }

    /// Classifies every sign of the vocabulary.
    pub fn classify(&self, vocabulary: &Vocabulary) -> Classification {
        let classes: BTreeMap<SignId, SignClass> = vocabulary
            .iter()
            .map(|sign| (sign.id, self.classify_sign(sign.id, sign.frequency)))
            .collect();
        let compounds: BTreeSet<SignId> = vocabulary
            .iter()
            .filter(|sign| sign.compound)
            .map(|sign| sign.id)
            .collect();
        let classification = Classification {
            classes,
            compounds,
            bounds: self.bounds,
        };
        info!(
            event = "classify_end",
            sign_count = classification.len() as u64,
            authority_count = classification.count(SignClass::Authority) as u64,
            commodity_count = classification.count(SignClass::Commodity) as u64,
            numeral_count = classification.count(SignClass::Numeral) as u64,
            standard_count = classification.count(SignClass::Standard) as u64,
            compound_count = classification.compound_count() as u64,
        );
        classification
    }
}

fn resolve_bounds(classes: &ClassConfig, class: SignClass) -> Bounds {
    match classes.configured_bounds(class) {
        Some(b) if b.is_valid() => b,
        Some(b) => {
            let fallback = default_bounds(class);
            warn!(
                class = %class,
                bounds = %b,
                fallback = %fallback,
                "invalid class bounds, using default"
            );
            fallback
        }
        None => default_bounds(class),
    }
}

/// Class and bounds of every sign in a vocabulary.
#[derive(Debug, Clone, PartialEq)]
pub struct Classification {
    classes: BTreeMap<SignId, SignClass>,
    compounds: BTreeSet<SignId>,
    bounds: [Bounds; 4],
}

impl Classification {
    pub fn class_of(&self, id: SignId) -> Option<SignClass> {
        self.classes.get(&id).copied()
    }

    /// Bounds of the weight variable for `id`.
    pub fn bounds_of(&self, id: SignId) -> Option<Bounds> {
        self.class_of(id).map(|c| self.class_bounds(c))
    }

    pub fn class_bounds(&self, class: SignClass) -> Bounds {
        self.bounds[class_index(class)]
    }

    pub fn contains(&self, id: SignId) -> bool {
        self.classes.contains_key(&id)
    }

    /// Members of a class in ascending id order.
    pub fn members(&self, class: SignClass) -> Vec<SignId> {
        self.classes
            .iter()
            .filter(|(_, c)| **c == class)
            .map(|(id, _)| *id)
            .collect()
    }

    pub fn count(&self, class: SignClass) -> usize {
        self.classes.values().filter(|c| **c == class).count()
    }

    /// True for signs flagged as compounds in the vocabulary.
    pub fn is_compound(&self, id: SignId) -> bool {
        self.compounds.contains(&id)
    }

    pub fn compound_count(&self) -> usize {
        self.compounds.len()
    }

    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }

    /// `(id, class)` pairs in ascending id order.
    pub fn iter(&self) -> impl Iterator<Item = (SignId, SignClass)> + '_ {
        self.classes.iter().map(|(id, c)| (*id, *c))
    }

    /// `(id, bounds)` of every weight variable, in ascending id order.
    pub fn variable_bounds(&self) -> impl Iterator<Item = (SignId, Bounds)> + '_ {
        self.iter().map(|(id, c)| (id, self.class_bounds(c)))
    }
}
