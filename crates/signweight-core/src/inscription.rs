//! Inscriptions: ordered, non-empty sign sequences.

use crate::sign::SignId;

/// One inscription of the corpus.
///
/// The order of signs is significant: it defines the adjacency used by
/// curvature constraints.
///
/// # Example
///
/// ```
/// use signweight_core::{Inscription, SignId};
///
/// let ins = Inscription::new("M-314", vec![SignId(1), SignId(342), SignId(125), SignId(9)]).unwrap();
/// let triples: Vec<_> = ins.triples().collect();
/// assert_eq!(triples.len(), 2);
/// assert_eq!(triples[1], (1, [SignId(342), SignId(125), SignId(9)]));
///
/// assert!(Inscription::new("empty", vec![]).is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Inscription {
    id: String,
    signs: Vec<SignId>,
}

impl Inscription {
    /// Creates an inscription, or `None` when `signs` is empty.
    pub fn new(id: impl Into<String>, signs: Vec<SignId>) -> Option<Self> {
        if signs.is_empty() {
            return None;
        }
        Some(Self {
            id: id.into(),
            signs,
        })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn signs(&self) -> &[SignId] {
        &self.signs
    }

    pub fn len(&self) -> usize {
        self.signs.len()
    }

    /// Always false; inscriptions are non-empty by construction.
    pub fn is_empty(&self) -> bool {
        self.signs.is_empty()
    }

    /// Consecutive windows of three signs with the start position.
    pub fn triples(&self) -> impl Iterator<Item = (usize, [SignId; 3])> + '_ {
        self.signs
            .windows(3)
            .enumerate()
            .map(|(pos, w)| (pos, [w[0], w[1], w[2]]))
    }
}
