//! Trigger records, run flags and verdicts

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::shared::models::{BranchInstruction, PathFormula, Procedure, SymbolicValue};

// ============================================================================
// Trigger record
// ============================================================================

/// One confirmed trigger branch
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TriggerRecord {
    pub branch: BranchInstruction,

    /// Tagged symbolic values that survived post-filtering (never empty)
    pub evidence: Vec<SymbolicValue>,

    /// First sensitive procedure found under the branch
    pub gated_sensitive_procedure: Procedure,

    /// Recovered path formula, attached only when consistent
    pub path_predicate: Option<PathFormula>,

    pub predicate_consistent: bool,
}

impl TriggerRecord {
    pub fn new(
        branch: BranchInstruction,
        evidence: Vec<SymbolicValue>,
        gated_sensitive_procedure: Procedure,
    ) -> Self {
        Self {
            branch,
            evidence,
            gated_sensitive_procedure,
            path_predicate: None,
            predicate_consistent: true,
        }
    }

    /// Merge evidence from a later detection of the same branch.
    ///
    /// The gated procedure is never replaced.
    pub fn merge_evidence(&mut self, evidence: impl IntoIterator<Item = SymbolicValue>) {
        for value in evidence {
            if !self.evidence.contains(&value) {
                self.evidence.push(value);
            }
        }
    }
}

// ============================================================================
// Run flags / stats
// ============================================================================

/// Gate flags; once set they stay set for the rest of the run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunFlags {
    pub saw_suspicious: bool,
    pub saw_suspicious_controlling_sensitive_action: bool,
    pub saw_suspicious_surviving_post_filter: bool,
}

/// Run statistics
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunStats {
    /// Distinct branch points reached by the forward traversal
    pub branches_traversed: usize,
    pub branches_classified: usize,

    pub suspicious: usize,
    pub controlling_sensitive_action: usize,
    pub surviving_post_filter: usize,

    /// Branches suppressed because their declaring type is filtered
    pub filtered_library: usize,

    /// Recovered formulas contradicted by the traversal path
    pub inconsistent_predicates: usize,

    /// Records removed by `require_consistent_predicate`
    pub dropped_inconsistent: usize,

    /// Control-dependency searches aborted by the node budget
    pub search_budget_exhausted: usize,

    /// Control-dependency searches with at least one path pruned at the
    /// depth limit
    pub search_depth_cutoffs: usize,

    pub branches_searched: usize,
    pub procedures_searched: usize,
}

// ============================================================================
// Report
// ============================================================================

/// Output of one detector run
#[derive(Debug, Clone, Default)]
pub struct TriggerReport {
    /// Confirmed triggers in branch order
    pub triggers: BTreeMap<BranchInstruction, TriggerRecord>,
    pub flags: RunFlags,
    pub stats: RunStats,
}

impl TriggerReport {
    pub fn len(&self) -> usize {
        self.triggers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.triggers.is_empty()
    }

    pub fn get(&self, branch: &BranchInstruction) -> Option<&TriggerRecord> {
        self.triggers.get(branch)
    }

    pub fn records(&self) -> impl Iterator<Item = &TriggerRecord> {
        self.triggers.values()
    }
}

// ============================================================================
// Verdicts
// ============================================================================

/// How far a branch got through the three gates
#[derive(Debug, Clone, PartialEq)]
pub enum Verdict {
    /// Gate 1 failed
    NotSuspicious,

    /// Gate 2 failed
    NoSensitiveAction,

    /// Gate 3 left no evidence
    NoEvidence,

    /// Evidence found in a filtered namespace; not reported
    FilteredLibrary {
        evidence: Vec<SymbolicValue>,
        gated_sensitive_procedure: Procedure,
    },

    Trigger(TriggerRecord),
}

impl Verdict {
    pub fn passed_suspicious(&self) -> bool {
        !matches!(self, Self::NotSuspicious)
    }

    pub fn passed_control_dependency(&self) -> bool {
        !matches!(self, Self::NotSuspicious | Self::NoSensitiveAction)
    }

    pub fn is_trigger(&self) -> bool {
        matches!(self, Self::Trigger(_))
    }
}

/// Bookkeeping of one control-dependency search
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SearchStats {
    pub branches_visited: usize,
    pub procedures_visited: usize,
    /// Paths pruned at the depth limit
    pub depth_cutoffs: usize,
    /// Node budget ran out and the search was abandoned
    pub budget_exhausted: bool,
}

/// Result of classifying one branch
#[derive(Debug, Clone, PartialEq)]
pub struct ClassificationOutcome {
    pub verdict: Verdict,
    pub search: SearchStats,
}

impl ClassificationOutcome {
    pub fn record(&self) -> Option<&TriggerRecord> {
        match &self.verdict {
            Verdict::Trigger(record) => Some(record),
            _ => None,
        }
    }
}
