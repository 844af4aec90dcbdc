//! Linear constraints over sign weights.
//!
//! Every constraint has the normalized form `sum(coef * w(sign)) >= rhs`.
//! The constraint builder produces them as plain data so that generation can
//! be tested without an LP backend.

use std::fmt;

use smallvec::SmallVec;

use crate::sign::SignId;

/// Family a constraint belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ConstraintKind {
    /// `w(i) - 2 w(j) + w(k) >= 0` for a consecutive triple.
    Curvature,
    /// `w(a) - w(b) >= margin` for a dominating/dominated pair.
    Hierarchy,
    /// `w(c) - sum w(p) >= 0` for a compound and its constituents.
    Compound,
    /// `w(rare) - w(frequent) >= -slack` among the most frequent signs.
    Efficiency,
}

impl ConstraintKind {
    pub const ALL: [ConstraintKind; 4] = [
        ConstraintKind::Curvature,
        ConstraintKind::Hierarchy,
        ConstraintKind::Compound,
        ConstraintKind::Efficiency,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ConstraintKind::Curvature => "curvature",
            ConstraintKind::Hierarchy => "hierarchy",
            ConstraintKind::Compound => "compound",
            ConstraintKind::Efficiency => "efficiency",
        }
    }
}

impl fmt::Display for ConstraintKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One `coefficient * w(sign)` term.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Term {
    pub sign: SignId,
    pub coefficient: f64,
}

/// A linear inequality `sum(terms) >= rhs`.
///
/// Terms on the same sign are merged and zero coefficients dropped, so
/// `(5, 5, 7)` as a curvature triple becomes `-w(5) + w(7) >= 0`.
///
/// # Example
///
/// ```
/// use signweight_core::{Constraint, SignId};
///
/// let c = Constraint::curvature([SignId(1), SignId(342), SignId(125)], "M-1@0");
/// let w = |id: SignId| match id.0 { 1 => 0.5, 342 => 1.0, _ => 3.0 };
/// assert_eq!(c.slack(w), 1.5);
/// assert!(c.is_satisfied(w, 1e-3));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Constraint {
    kind: ConstraintKind,
    terms: SmallVec<[Term; 4]>,
    rhs: f64,
    origin: String,
}

impl Constraint {
    /// Builds a constraint from raw terms, merging duplicates.
    pub fn new(
        kind: ConstraintKind,
        terms: impl IntoIterator<Item = (SignId, f64)>,
        rhs: f64,
        origin: impl Into<String>,
    ) -> Self {
        let mut merged: SmallVec<[Term; 4]> = SmallVec::new();
        for (sign, coefficient) in terms {
            match merged.iter_mut().find(|t| t.sign == sign) {
                Some(term) => term.coefficient += coefficient,
                None => merged.push(Term { sign, coefficient }),
            }
        }
        merged.retain(|t| t.coefficient != 0.0);
        Self {
            kind,
            terms: merged,
            rhs,
            origin: origin.into(),
        }
    }

    pub fn curvature([i, j, k]: [SignId; 3], origin: impl Into<String>) -> Self {
        Self::new(
            ConstraintKind::Curvature,
            [(i, 1.0), (j, -2.0), (k, 1.0)],
            0.0,
            origin,
        )
    }

    pub fn hierarchy(
        dominant: SignId,
        dominated: SignId,
        margin: f64,
        origin: impl Into<String>,
    ) -> Self {
        Self::new(
            ConstraintKind::Hierarchy,
            [(dominant, 1.0), (dominated, -1.0)],
            margin,
            origin,
        )
    }

    pub fn compound(compound: SignId, parts: &[SignId], origin: impl Into<String>) -> Self {
        let terms = std::iter::once((compound, 1.0)).chain(parts.iter().map(|&p| (p, -1.0)));
        Self::new(ConstraintKind::Compound, terms, 0.0, origin)
    }

    pub fn efficiency(
        frequent: SignId,
        rare: SignId,
        slack: f64,
        origin: impl Into<String>,
    ) -> Self {
        Self::new(
            ConstraintKind::Efficiency,
            [(rare, 1.0), (frequent, -1.0)],
            -slack,
            origin,
        )
    }

    pub fn kind(&self) -> ConstraintKind {
        self.kind
    }

    pub fn terms(&self) -> &[Term] {
        &self.terms
    }

    pub fn rhs(&self) -> f64 {
        self.rhs
    }

    /// Where the constraint came from (inscription and position, rule, compound).
    pub fn origin(&self) -> &str {
        &self.origin
    }

    /// True when every term cancelled out.
    pub fn is_trivial(&self) -> bool {
        self.terms.is_empty()
    }

    pub fn signs(&self) -> impl Iterator<Item = SignId> + '_ {
        self.terms.iter().map(|t| t.sign)
    }

    /// Evaluates the left-hand side for the given weights.
    pub fn lhs<F: Fn(SignId) -> f64>(&self, weight: F) -> f64 {
        self.terms
            .iter()
            .map(|t| t.coefficient * weight(t.sign))
            .sum()
    }

    /// `lhs - rhs`; negative means the constraint does not hold.
    pub fn slack<F: Fn(SignId) -> f64>(&self, weight: F) -> f64 {
        self.lhs(weight) - self.rhs
    }

    pub fn is_satisfied<F: Fn(SignId) -> f64>(&self, weight: F, tolerance: f64) -> bool {
        self.slack(weight) >= -tolerance
    }
}

impl fmt::Display for Constraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} [{}]: ", self.kind, self.origin)?;
        if self.terms.is_empty() {
            write!(f, "0")?;
        }
        for (idx, term) in self.terms.iter().enumerate() {
            let sign = if term.coefficient < 0.0 { "-" } else { "+" };
            let abs = term.coefficient.abs();
            if idx == 0 {
                if term.coefficient < 0.0 {
                    write!(f, "-")?;
                }
            } else {
                write!(f, " {} ", sign)?;
            }
            if abs == 1.0 {
                write!(f, "w({})", term.sign)?;
            } else {
                write!(f, "{}·w({})", abs, term.sign)?;
            }
        }
        write!(f, " >= {}", self.rhs)
    }
}

/// The full output of constraint generation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConstraintSet {
    constraints: Vec<Constraint>,
    warnings: Vec<String>,
}

impl ConstraintSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, constraint: Constraint) {
        self.constraints.push(constraint);
    }

    pub fn warn(&mut self, warning: impl Into<String>) {
        self.warnings.push(warning.into());
    }

    pub fn constraints(&self) -> &[Constraint] {
        &self.constraints
    }

    /// Recoverable problems met during generation (e.g. skipped compounds).
    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }

    pub fn len(&self) -> usize {
        self.constraints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.constraints.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Constraint> {
        self.constraints.iter()
    }

    pub fn count(&self, kind: ConstraintKind) -> usize {
        self.constraints.iter().filter(|c| c.kind == kind).count()
    }

    /// Constraint counts for every kind, in `ConstraintKind::ALL` order.
    pub fn counts(&self) -> [(ConstraintKind, usize); 4] {
        ConstraintKind::ALL.map(|kind| (kind, self.count(kind)))
    }
}

impl<'a> IntoIterator for &'a ConstraintSet {
    type Item = &'a Constraint;
    type IntoIter = std::slice::Iter<'a, Constraint>;

    fn into_iter(self) -> Self::IntoIter {
        self.constraints.iter()
    }
}

impl Extend<Constraint> for ConstraintSet {
    fn extend<I: IntoIterator<Item = Constraint>>(&mut self, iter: I) {
        self.constraints.extend(iter);
    }
}
