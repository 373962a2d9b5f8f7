//! Path predicate consistency check
//!
//! A recovered formula for a point is consistent with a traversed path when
//! every literal of the formula originates from a branch lying on that path.
//! Advisory only: the result decides whether the formula is attached to a
//! trigger record.

use rustc_hash::FxHashSet;
use std::sync::Arc;

use crate::shared::models::{Literal, PathFormula, ProgramPoint};
use crate::shared::ports::PathPredicateIndex;

/// Outcome of checking one point's formula against a path
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PredicateCheck {
    /// No formula recovered for the point
    Vacuous,

    Consistent(PathFormula),

    /// Literals whose originating branch is off-path or unknown
    Inconsistent {
        formula: PathFormula,
        missing: Vec<Literal>,
    },
}

impl PredicateCheck {
    pub fn is_consistent(&self) -> bool {
        !matches!(self, Self::Inconsistent { .. })
    }

    /// Formula to attach to evidence, if any
    pub fn attachable_formula(&self) -> Option<&PathFormula> {
        match self {
            Self::Consistent(formula) => Some(formula),
            _ => None,
        }
    }
}

pub struct PathPredicateConsistencyCheck {
    index: Arc<dyn PathPredicateIndex>,
}

impl PathPredicateConsistencyCheck {
    pub fn new(index: Arc<dyn PathPredicateIndex>) -> Self {
        Self { index }
    }

    pub fn is_consistent(&self, point: &ProgramPoint, traversed_path: &[ProgramPoint]) -> bool {
        self.check(point, traversed_path).is_consistent()
    }

    pub fn check(&self, point: &ProgramPoint, traversed_path: &[ProgramPoint]) -> PredicateCheck {
        let formula = match self.index.formula_for(point) {
            Some(formula) => formula,
            None => return PredicateCheck::Vacuous,
        };

        let on_path: FxHashSet<&ProgramPoint> = traversed_path.iter().collect();
        let missing: Vec<Literal> = formula
            .literals
            .iter()
            .filter(|literal| {
                match self.index.branch_instruction_for_literal(literal) {
                    Some(origin) => !on_path.contains(&origin.point),
                    // A literal with no originating branch cannot be placed on any path
                    None => true,
                }
            })
            .copied()
            .collect();

        if missing.is_empty() {
            PredicateCheck::Consistent(formula)
        } else {
            tracing::debug!(
                point = %point,
                formula = %formula,
                missing = missing.len(),
                "inconsistent path predicate"
            );
            PredicateCheck::Inconsistent { formula, missing }
        }
    }
}
