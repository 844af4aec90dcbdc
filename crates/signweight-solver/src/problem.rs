//! The linear program as plain data.
//!
//! Variables are indexed in ascending sign id order. Rows hold variable
//! indices, so the problem can be moved to a worker thread and translated
//! into the backend there.

use std::collections::BTreeMap;

use signweight_core::{Bounds, ConstraintSet, SignId};

use crate::error::SolveError;

// Trivial rows with a rhs at or below this are satisfied by any assignment.
const TRIVIAL_EPSILON: f64 = 1e-12;

/// One `>=` row: `sum(coefficient * x[index]) >= rhs`.
#[derive(Debug, Clone, PartialEq)]
pub struct LpRow {
    pub coefficients: Vec<(usize, f64)>,
    pub rhs: f64,
    pub origin: String,
}

/// Minimize `sum(x)` subject to per-variable bounds and `>=` rows.
///
/// # Example
///
/// ```
/// use signweight_core::{Bounds, Constraint, ConstraintSet, SignId};
/// use signweight_solver::LpProblem;
///
/// let mut constraints = ConstraintSet::new();
/// constraints.push(Constraint::hierarchy(SignId(125), SignId(342), 0.5, "authority>commodity"));
///
/// let variables = [
///     (SignId(125), Bounds::new(3.0, 8.0)),
///     (SignId(342), Bounds::new(1.0, 4.0)),
/// ];
/// let problem = LpProblem::build(variables, &constraints).unwrap();
/// assert_eq!(problem.variable_count(), 2);
/// assert_eq!(problem.row_count(), 1);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LpProblem {
    signs: Vec<SignId>,
    bounds: Vec<Bounds>,
    rows: Vec<LpRow>,
    infeasible_row: Option<String>,
}

impl LpProblem {
    /// Builds the program from `(sign, bounds)` pairs and a constraint set.
    ///
    /// Constraints whose terms all cancelled are not emitted as rows; one
    /// with a positive rhs marks the problem infeasible by construction.
    pub fn build(
        variables: impl IntoIterator<Item = (SignId, Bounds)>,
        constraints: &ConstraintSet,
    ) -> Result<Self, SolveError> {
        let mut by_sign: BTreeMap<SignId, Bounds> = BTreeMap::new();
        for (sign, bounds) in variables {
            if !bounds.is_valid() {
                return Err(SolveError::InvalidBounds { sign, bounds });
            }
            if by_sign.insert(sign, bounds).is_some() {
                return Err(SolveError::DuplicateVariable(sign));
            }
        }
        let index: BTreeMap<SignId, usize> = by_sign
            .keys()
            .enumerate()
            .map(|(i, sign)| (*sign, i))
            .collect();

        let mut rows = Vec::with_capacity(constraints.len());
        let mut infeasible_row = None;
        for constraint in constraints {
            if constraint.is_trivial() {
                if constraint.rhs() > TRIVIAL_EPSILON && infeasible_row.is_none() {
                    infeasible_row = Some(constraint.origin().to_string());
                }
                continue;
            }
            let coefficients = constraint
                .terms()
                .iter()
                .map(|term| {
                    index
                        .get(&term.sign)
                        .map(|&i| (i, term.coefficient))
                        .ok_or_else(|| SolveError::UnknownSign {
                            sign: term.sign,
                            origin: constraint.origin().to_string(),
                        })
                })
                .collect::<Result<Vec<_>, _>>()?;
            rows.push(LpRow {
                coefficients,
                rhs: constraint.rhs(),
                origin: constraint.origin().to_string(),
            });
        }

        let (signs, bounds) = by_sign.into_iter().unzip();
        Ok(Self {
            signs,
            bounds,
            rows,
            infeasible_row,
        })
    }

    pub fn variable_count(&self) -> usize {
        self.signs.len()
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.signs.is_empty()
    }

    /// Sign ids in variable index order.
    pub fn signs(&self) -> &[SignId] {
        &self.signs
    }

    pub fn bounds(&self) -> &[Bounds] {
        &self.bounds
    }

    pub fn rows(&self) -> &[LpRow] {
        &self.rows
    }

    /// Origin of a cancelled-out constraint that can never hold.
    pub fn infeasible_row(&self) -> Option<&str> {
        self.infeasible_row.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use signweight_core::{Constraint, ConstraintKind};

    fn bounds() -> Bounds {
        Bounds::new(1.0, 6.0)
    }

    #[test]
    fn test_variables_are_sorted_by_sign() {
        let variables = [(SignId(9), bounds()), (SignId(2), bounds()), (SignId(5), bounds())];
        let problem = LpProblem::build(variables, &ConstraintSet::new()).unwrap();
        assert_eq!(problem.signs(), &[SignId(2), SignId(5), SignId(9)]);
        assert_eq!(problem.bounds().len(), 3);
    }

    #[test]
    fn test_rows_use_variable_indices() {
        let mut set = ConstraintSet::new();
        set.push(Constraint::curvature([SignId(9), SignId(2), SignId(5)], "M-1@0"));
        let variables = [(SignId(9), bounds()), (SignId(2), bounds()), (SignId(5), bounds())];
        let problem = LpProblem::build(variables, &set).unwrap();

        let row = &problem.rows()[0];
        assert_eq!(row.coefficients, vec![(2, 1.0), (0, -2.0), (1, 1.0)]);
        assert_eq!(row.rhs, 0.0);
        assert_eq!(row.origin, "M-1@0");
    }

    #[test]
    fn test_trivial_constraints() {
        let mut set = ConstraintSet::new();
        // w(7) - 2·w(7) + w(7) cancels to 0 >= 0
        set.push(Constraint::curvature([SignId(7), SignId(7), SignId(7)], "M-2@0"));
        let problem = LpProblem::build([(SignId(7), bounds())], &set).unwrap();
        assert_eq!(problem.row_count(), 0);
        assert_eq!(problem.infeasible_row(), None);

        let mut set = ConstraintSet::new();
        set.push(Constraint::new(
            ConstraintKind::Hierarchy,
            [(SignId(7), 1.0), (SignId(7), -1.0)],
            0.5,
            "authority>commodity",
        ));
        let problem = LpProblem::build([(SignId(7), bounds())], &set).unwrap();
        assert_eq!(problem.infeasible_row(), Some("authority>commodity"));
    }

    #[test]
    fn test_unknown_sign_is_rejected() {
        let mut set = ConstraintSet::new();
        set.push(Constraint::hierarchy(SignId(1), SignId(2), 0.5, "r"));
        let err = LpProblem::build([(SignId(1), bounds())], &set).unwrap_err();
        assert!(matches!(err, SolveError::UnknownSign { sign: SignId(2), .. }));
    }

    #[test]
    fn test_invalid_bounds_are_rejected() {
        let err = LpProblem::build([(SignId(1), Bounds::new(5.0, 1.0))], &ConstraintSet::new())
            .unwrap_err();
        assert!(matches!(err, SolveError::InvalidBounds { .. }));

        let err = LpProblem::build(
            [(SignId(1), bounds()), (SignId(1), bounds())],
            &ConstraintSet::new(),
        )
        .unwrap_err();
        assert!(matches!(err, SolveError::DuplicateVariable(SignId(1))));
    }
}
