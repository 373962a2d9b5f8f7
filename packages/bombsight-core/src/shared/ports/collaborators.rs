/*
 * Collaborator Ports
 *
 * Interfaces the detection engine consumes but does not implement:
 * - InterproceduralCfg   : control flow + call edges
 * - ProvenanceQuery      : path-sensitive symbolic values with provenance tags
 * - PathPredicateIndex   : path formulas and literal -> branch reverse map
 * - BranchCatalog        : every branch and its guarded block
 * - SensitiveApiCatalog  : security/privacy-sensitive procedures
 * - FilteredLibraryCatalog : namespaces excluded from reporting
 *
 * All ports are read-only during a run and shared across worker threads,
 * hence the `Send + Sync` supertraits.
 */

use serde::{Deserialize, Serialize};

use crate::shared::models::{
    BranchInstruction, InstructionKind, Literal, PathFormula, Procedure, ProgramPoint,
    SymbolicValue, ValueRef,
};

// ============================================================================
// Contextual values
// ============================================================================

/// Symbolic value together with the program points whose paths it flows along
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContextualValue {
    pub value: SymbolicValue,
    pub contexts: Vec<ProgramPoint>,
}

/// All values that may have produced one value reference
///
/// `coherent_values_at` is the path-sensitive view: only values produced on
/// paths that pass through the given point.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContextualValues {
    values: Vec<ContextualValue>,
}

impl ContextualValues {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, value: SymbolicValue, contexts: Vec<ProgramPoint>) {
        self.values.push(ContextualValue { value, contexts });
    }

    pub fn with_value(mut self, value: SymbolicValue, contexts: Vec<ProgramPoint>) -> Self {
        self.push(value, contexts);
        self
    }

    /// Values reachable along paths through `point`, in insertion order
    pub fn coherent_values_at(&self, point: &ProgramPoint) -> Vec<SymbolicValue> {
        self.values
            .iter()
            .filter(|cv| cv.contexts.contains(point))
            .map(|cv| cv.value.clone())
            .collect()
    }

    /// Every value regardless of path context
    pub fn all_values(&self) -> Vec<SymbolicValue> {
        self.values.iter().map(|cv| cv.value.clone()).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

// ============================================================================
// Ports
// ============================================================================

/// Interprocedural control-flow graph
pub trait InterproceduralCfg: Send + Sync {
    /// Start points of the forward traversal
    fn entry_points(&self) -> Vec<ProgramPoint>;

    /// Intraprocedural successors
    fn successors_of(&self, point: &ProgramPoint) -> Vec<ProgramPoint>;

    /// Call sites invoking `procedure`
    fn callers_of(&self, procedure: &Procedure) -> Vec<ProgramPoint>;

    /// Resolved call targets at `point` (empty if not a call)
    fn callees_of(&self, point: &ProgramPoint) -> Vec<Procedure>;

    /// Instructions of a procedure body (empty for phantom/abstract procedures)
    fn points_of(&self, procedure: &Procedure) -> Vec<ProgramPoint>;

    /// Whether `procedure` has a concrete, analyzable body
    fn has_body(&self, procedure: &Procedure) -> bool {
        !self.points_of(procedure).is_empty()
    }

    fn instruction_at(&self, point: &ProgramPoint) -> Option<InstructionKind>;
}

/// Path-sensitive symbolic provenance
pub trait ProvenanceQuery: Send + Sync {
    /// Values that may have produced `value` as used at `at`
    fn contextual_values_for(&self, value: &ValueRef, at: &ProgramPoint)
        -> Option<ContextualValues>;
}

/// Path predicate recovery
pub trait PathPredicateIndex: Send + Sync {
    fn formula_for(&self, point: &ProgramPoint) -> Option<PathFormula>;

    /// Branch whose outcome `literal` denotes
    fn branch_instruction_for_literal(&self, literal: &Literal) -> Option<BranchInstruction>;
}

/// Branch enumeration and control dependence
pub trait BranchCatalog: Send + Sync {
    fn all_branches(&self) -> Vec<BranchInstruction>;

    /// Instructions control-dependent on `branch`
    fn guarded_block_of(&self, branch: &BranchInstruction) -> Vec<ProgramPoint>;

    /// Branches that use `value` (defined in `scope`) as an operand
    fn branches_using(&self, value: &ValueRef, scope: &Procedure) -> Vec<BranchInstruction> {
        self.all_branches()
            .into_iter()
            .filter(|branch| branch.uses(value, scope))
            .collect()
    }
}

pub trait SensitiveApiCatalog: Send + Sync {
    fn is_sensitive(&self, procedure: &Procedure) -> bool;
}

pub trait FilteredLibraryCatalog: Send + Sync {
    fn is_filtered(&self, declaring_type: &str) -> bool;
}
