//! Per-comparison branch analysis result

use serde::{Deserialize, Serialize};

use crate::shared::models::{LiteralConstant, SymbolicValue, TagFamily, ValueRef};

/// Which operand of a comparison carries the resolved provenance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OperandSide {
    A,
    B,
}

/// Provenance of one normalised comparison `operand_a <op> operand_b`
///
/// `operand_*_values` are `None` for literal operands and for operands the
/// provenance engine knows nothing about; `Some(vec![])` means the engine
/// answered but no value is coherent at the branch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BranchAnalysisResult {
    pub operand_a: ValueRef,
    pub operand_b: ValueRef,
    pub operand_a_values: Option<Vec<SymbolicValue>>,
    pub operand_b_values: Option<Vec<SymbolicValue>>,

    /// Side whose coherent set is non-empty (A wins ties)
    pub primary_side: Option<OperandSide>,

    /// Coherent values of the primary operand
    pub primary_values: Option<Vec<SymbolicValue>>,

    /// Constant the primary operand is compared against
    pub resolved_constant: Option<LiteralConstant>,

    /// Primary is `expr <op> 0`, `expr <op> -1` or another sentinel
    pub is_sentinel_check: bool,
}

impl BranchAnalysisResult {
    pub fn neither_operand_constant(&self) -> bool {
        !self.operand_a.is_constant() && !self.operand_b.is_constant()
    }

    pub fn primary_has_tag_in(&self, families: &[TagFamily]) -> bool {
        self.primary_values
            .iter()
            .flatten()
            .any(|v| v.has_tag_in(families))
    }

    pub fn any_operand_has_tag_in(&self, families: &[TagFamily]) -> bool {
        self.operand_a_values
            .iter()
            .chain(self.operand_b_values.iter())
            .flatten()
            .any(|v| v.has_tag_in(families))
    }

    /// Suspicious-branch rule: a tagged primary, or two non-literal operands
    /// either of which is tagged
    pub fn is_suspicious(&self, families: &[TagFamily]) -> bool {
        self.primary_has_tag_in(families)
            || (self.neither_operand_constant() && self.any_operand_has_tag_in(families))
    }

    /// Comparand is integer `-1` or `null`
    pub fn compares_against_marker(&self) -> bool {
        self.resolved_constant
            .as_ref()
            .map_or(false, |c| c.is_integral_minus_one() || c.is_null())
    }
}
