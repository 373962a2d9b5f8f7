/*
 * Branch Condition Analyzer
 *
 * Resolves the operands of a branch to their path-coherent symbolic values
 * and decides which operand is the "primary" one, what constant it is
 * compared against, and whether the comparison looks like a sentinel check.
 *
 * A two-way branch yields one result; a multiway dispatch yields one result
 * per case (`key == literal`).
 *
 * Pure: absent provenance yields `None` fields, never an error.
 */

use std::sync::Arc;

use crate::features::trigger_analysis::domain::{BranchAnalysisResult, OperandSide};
use crate::shared::models::{
    BranchInstruction, Comparison, LiteralConstant, ProgramPoint, SymbolicValue, ValueRef,
};
use crate::shared::ports::ProvenanceQuery;

// ============================================================================
// Sentinel policy
// ============================================================================

/// Constants treated as "no value" markers on the right of a binary expression
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SentinelPolicy {
    extra: Vec<LiteralConstant>,
}

impl SentinelPolicy {
    pub fn new(extra: Vec<LiteralConstant>) -> Self {
        Self { extra }
    }

    /// Type-appropriate zero (`null` included), `-1`, or a configured extra
    pub fn is_sentinel(&self, constant: &LiteralConstant) -> bool {
        constant.is_zero() || constant.is_minus_one() || self.extra.contains(constant)
    }

    /// Some value is `expr <op> sentinel`
    pub fn any_sentinel_expression(&self, values: &[SymbolicValue]) -> bool {
        values.iter().any(|value| {
            value
                .binary_right()
                .and_then(|right| right.as_constant())
                .map_or(false, |c| self.is_sentinel(c))
        })
    }
}

// ============================================================================
// Analyzer
// ============================================================================

pub struct BranchConditionAnalyzer {
    provenance: Arc<dyn ProvenanceQuery>,
    policy: SentinelPolicy,
}

impl BranchConditionAnalyzer {
    pub fn new(provenance: Arc<dyn ProvenanceQuery>, policy: SentinelPolicy) -> Self {
        Self { provenance, policy }
    }

    pub fn policy(&self) -> &SentinelPolicy {
        &self.policy
    }

    /// One result per normalised comparison of `branch`, resolved at `at`
    pub fn analyze(
        &self,
        branch: &BranchInstruction,
        at: &ProgramPoint,
    ) -> Vec<BranchAnalysisResult> {
        branch
            .comparisons()
            .into_iter()
            .map(|comparison| self.analyze_comparison(comparison, at))
            .collect()
    }

    fn analyze_comparison(
        &self,
        comparison: Comparison,
        at: &ProgramPoint,
    ) -> BranchAnalysisResult {
        let Comparison {
            operand_a,
            operand_b,
            ..
        } = comparison;

        let operand_a_values = self.coherent_values(&operand_a, at);
        let operand_b_values = self.coherent_values(&operand_b, at);

        let primary_side = if non_empty(&operand_a_values) {
            Some(OperandSide::A)
        } else if non_empty(&operand_b_values) {
            Some(OperandSide::B)
        } else {
            None
        };

        let (primary_values, resolved_constant) = match primary_side {
            Some(OperandSide::A) => (
                operand_a_values.clone(),
                resolve_constant(&operand_b, operand_b_values.as_deref()),
            ),
            Some(OperandSide::B) => (
                operand_b_values.clone(),
                resolve_constant(&operand_a, operand_a_values.as_deref()),
            ),
            None => (
                None,
                operand_b
                    .as_constant()
                    .or_else(|| operand_a.as_constant())
                    .copied(),
            ),
        };

        let is_sentinel_check = primary_values
            .as_deref()
            .map_or(false, |values| self.policy.any_sentinel_expression(values));

        BranchAnalysisResult {
            operand_a,
            operand_b,
            operand_a_values,
            operand_b_values,
            primary_side,
            primary_values,
            resolved_constant,
            is_sentinel_check,
        }
    }

    fn coherent_values(&self, operand: &ValueRef, at: &ProgramPoint) -> Option<Vec<SymbolicValue>> {
        if operand.is_constant() {
            return None;
        }
        self.provenance
            .contextual_values_for(operand, at)
            .map(|values| values.coherent_values_at(at))
    }
}

fn non_empty(values: &Option<Vec<SymbolicValue>>) -> bool {
    values.as_ref().map_or(false, |v| !v.is_empty())
}

/// Constant on the other side: the literal operand itself, or the first
/// integral constant among its coherent values
fn resolve_constant(
    other: &ValueRef,
    other_values: Option<&[SymbolicValue]>,
) -> Option<LiteralConstant> {
    if let Some(constant) = other.as_constant() {
        return Some(*constant);
    }
    other_values?
        .iter()
        .filter_map(|value| value.as_constant())
        .find(|constant| constant.is_integral())
        .copied()
}
