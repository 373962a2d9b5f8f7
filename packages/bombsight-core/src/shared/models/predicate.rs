//! Path predicates
//!
//! A path formula is the conjunction of branch outcomes that must hold for
//! execution to reach one program point. Each literal stands for exactly one
//! branch decision.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::program::ProgramPoint;

/// Signed atomic proposition tied to one branch outcome
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Literal {
    /// Proposition id (shared by both polarities)
    pub id: u32,

    /// `true` for the taken edge, `false` for the fall-through edge
    pub positive: bool,
}

impl Literal {
    pub fn positive(id: u32) -> Self {
        Self { id, positive: true }
    }

    pub fn negative(id: u32) -> Self {
        Self {
            id,
            positive: false,
        }
    }

    pub fn negate(self) -> Self {
        Self {
            id: self.id,
            positive: !self.positive,
        }
    }
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.positive {
            write!(f, "b{}", self.id)
        } else {
            write!(f, "!b{}", self.id)
        }
    }
}

/// Conjunction of literals guarding one program point
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PathFormula {
    pub point: ProgramPoint,
    pub literals: Vec<Literal>,
}

impl PathFormula {
    pub fn new(point: ProgramPoint, literals: Vec<Literal>) -> Self {
        Self { point, literals }
    }

    pub fn is_trivial(&self) -> bool {
        self.literals.is_empty()
    }
}

impl fmt::Display for PathFormula {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.literals.is_empty() {
            return f.write_str("true");
        }
        let parts: Vec<String> = self.literals.iter().map(|l| l.to_string()).collect();
        f.write_str(&parts.join(" & "))
    }
}
