//! Signs, semantic classes, weight bounds and the corpus vocabulary.

use std::collections::btree_map;
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::inscription::Inscription;

/// Identifier of a sign in the corpus.
///
/// # Example
///
/// ```
/// use signweight_core::SignId;
///
/// let id: SignId = "342".parse().unwrap();
/// assert_eq!(id, SignId(342));
/// assert_eq!(id.to_string(), "342");
/// assert!("M342".parse::<SignId>().is_err());
/// ```
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct SignId(pub u32);

/// Error returned when a token is not a sign identifier.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid sign id: '{0}'")]
pub struct ParseSignIdError(pub String);

impl FromStr for SignId {
    type Err = ParseSignIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let token = s.trim();
        if !token.starts_with(|c: char| c.is_ascii_digit()) {
            return Err(ParseSignIdError(s.to_string()));
        }
        token
            .parse::<u32>()
            .map(SignId)
            .map_err(|_| ParseSignIdError(s.to_string()))
    }
}

impl fmt::Display for SignId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u32> for SignId {
    fn from(id: u32) -> Self {
        SignId(id)
    }
}

/// Coarse semantic class of a sign.
///
/// Every sign belongs to exactly one class; the class decides the
/// bounds of its weight variable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SignClass {
    Authority,
    Commodity,
    Numeral,
    Standard,
}

impl SignClass {
    /// All classes, in classification priority order.
    pub const ALL: [SignClass; 4] = [
        SignClass::Authority,
        SignClass::Commodity,
        SignClass::Numeral,
        SignClass::Standard,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SignClass::Authority => "authority",
            SignClass::Commodity => "commodity",
            SignClass::Numeral => "numeral",
            SignClass::Standard => "standard",
        }
    }
}

impl fmt::Display for SignClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SignClass {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "authority" => Ok(SignClass::Authority),
            "commodity" => Ok(SignClass::Commodity),
            "numeral" => Ok(SignClass::Numeral),
            "standard" => Ok(SignClass::Standard),
            other => Err(format!("unknown sign class '{}'", other)),
        }
    }
}

/// Inclusive `(lower, upper)` range for a weight variable.
///
/// Serialized as a two-element array, e.g. `[3.0, 8.0]`.
///
/// # Example
///
/// ```
/// use signweight_core::Bounds;
///
/// let b = Bounds::new(1.0, 4.0);
/// assert!(b.is_valid());
/// assert!(b.contains(4.0005, 1e-3));
/// assert!(!Bounds::new(5.0, 2.0).is_valid());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "(f64, f64)", into = "(f64, f64)")]
pub struct Bounds {
    pub lower: f64,
    pub upper: f64,
}

impl Bounds {
    pub const fn new(lower: f64, upper: f64) -> Self {
        Self { lower, upper }
    }

    /// Finite, non-negative and `lower <= upper`.
    pub fn is_valid(&self) -> bool {
        self.lower.is_finite()
            && self.upper.is_finite()
            && 0.0 <= self.lower
            && self.lower <= self.upper
    }

    /// Returns true if `value` lies within the bounds, widened by `tolerance`.
    pub fn contains(&self, value: f64, tolerance: f64) -> bool {
        value >= self.lower - tolerance && value <= self.upper + tolerance
    }
}

impl From<(f64, f64)> for Bounds {
    fn from((lower, upper): (f64, f64)) -> Self {
        Bounds::new(lower, upper)
    }
}

impl From<Bounds> for (f64, f64) {
    fn from(b: Bounds) -> Self {
        (b.lower, b.upper)
    }
}

impl fmt::Display for Bounds {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}]", self.lower, self.upper)
    }
}

/// A distinct sign of the corpus with its occurrence count.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sign {
    pub id: SignId,
    /// Number of occurrences over all inscriptions.
    pub frequency: u64,
    /// Set when the compound table lists this sign as a compound.
    pub compound: bool,
}

impl Sign {
    pub fn new(id: SignId, frequency: u64) -> Self {
        Self {
            id,
            frequency,
            compound: false,
        }
    }
}

/// All distinct signs of a corpus, ordered by id.
///
/// Iteration never depends on hash order, which keeps classification and
/// constraint generation reproducible.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Vocabulary {
    signs: BTreeMap<SignId, Sign>,
}

impl Vocabulary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Derives the vocabulary and frequency counts from inscriptions.
    pub fn from_inscriptions<'a>(inscriptions: impl IntoIterator<Item = &'a Inscription>) -> Self {
        let mut signs: BTreeMap<SignId, Sign> = BTreeMap::new();
        for inscription in inscriptions {
            for &id in inscription.signs() {
                signs.entry(id).or_insert_with(|| Sign::new(id, 0)).frequency += 1;
            }
        }
        Self { signs }
    }

    /// Flags the given ids as compounds. Ids outside the vocabulary are ignored.
    pub fn with_compounds(mut self, compounds: impl IntoIterator<Item = SignId>) -> Self {
        for id in compounds {
            if let Some(sign) = self.signs.get_mut(&id) {
                sign.compound = true;
            }
        }
        self
    }

    pub fn get(&self, id: SignId) -> Option<&Sign> {
        self.signs.get(&id)
    }

    pub fn contains(&self, id: SignId) -> bool {
        self.signs.contains_key(&id)
    }

    pub fn frequency(&self, id: SignId) -> u64 {
        self.signs.get(&id).map_or(0, |s| s.frequency)
    }

    pub fn len(&self) -> usize {
        self.signs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.signs.is_empty()
    }

    pub fn iter(&self) -> btree_map::Values<'_, SignId, Sign> {
        self.signs.values()
    }

    pub fn ids(&self) -> impl Iterator<Item = SignId> + '_ {
        self.signs.keys().copied()
    }

    /// Total number of sign tokens the vocabulary was derived from.
    pub fn token_count(&self) -> u64 {
        self.signs.values().map(|s| s.frequency).sum()
    }

    /// Signs ordered by descending frequency, ties broken by ascending id.
    pub fn by_frequency(&self) -> Vec<&Sign> {
        let mut signs: Vec<&Sign> = self.signs.values().collect();
        signs.sort_by(|a, b| b.frequency.cmp(&a.frequency).then(a.id.cmp(&b.id)));
        signs
    }
}

impl<'a> IntoIterator for &'a Vocabulary {
    type Item = &'a Sign;
    type IntoIter = btree_map::Values<'a, SignId, Sign>;

    fn into_iter(self) -> Self::IntoIter {
        self.signs.values()
    }
}
