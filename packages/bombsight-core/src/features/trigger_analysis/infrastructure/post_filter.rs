//! Post-filtering of suspicious branch evidence
//!
//! Removes comparisons that are almost always benign: checks against `-1`,
//! `null`, and `expr <op> 0/-1` sentinel expressions. Values tagged
//! `SUSPICIOUS.GENERIC` are kept regardless.

use crate::features::trigger_analysis::domain::BranchAnalysisResult;
use crate::shared::models::{SymbolicValue, TagFamily};

pub struct PostFilter<'a> {
    tracked_families: &'a [TagFamily],
}

impl<'a> PostFilter<'a> {
    pub fn new(tracked_families: &'a [TagFamily]) -> Self {
        Self { tracked_families }
    }

    /// Surviving evidence across all comparisons, deduplicated, in order
    pub fn evidence(&self, results: &[BranchAnalysisResult]) -> Vec<SymbolicValue> {
        let mut evidence: Vec<SymbolicValue> = Vec::new();

        for result in results {
            let sentinel_comparison = result.compares_against_marker() || result.is_sentinel_check;

            for value in result.primary_values.iter().flatten() {
                if !value.has_tag_in(self.tracked_families) {
                    continue;
                }
                let exempt = value.tags.iter().any(|tag| tag.is_generic_suspicious());
                if sentinel_comparison && !exempt {
                    tracing::trace!(value = %value, "skipping sentinel comparison");
                    continue;
                }
                if !evidence.contains(value) {
                    evidence.push(value.clone());
                }
            }
        }

        evidence
    }
}
