//! Report assertions

use bombsight_core::shared::models::{BranchInstruction, ProvenanceTag};
use bombsight_core::{TriggerRecord, TriggerReport};

/// Assert the report holds exactly `expected` triggers
pub fn assert_trigger_count(report: &TriggerReport, expected: usize) {
    assert_eq!(
        report.len(),
        expected,
        "Expected {expected} triggers, got {}: {:?}",
        report.len(),
        report.records().map(|r| r.branch.to_string()).collect::<Vec<_>>()
    );
}

/// Assert `branch` was reported and return its record
pub fn assert_reported<'r>(
    report: &'r TriggerReport,
    branch: &BranchInstruction,
) -> &'r TriggerRecord {
    report.get(branch).unwrap_or_else(|| {
        panic!(
            "Expected '{}' at {} to be reported, reported: {:?}",
            branch,
            branch.point,
            report.records().map(|r| r.branch.to_string()).collect::<Vec<_>>()
        )
    })
}

pub fn assert_not_reported(report: &TriggerReport, branch: &BranchInstruction) {
    assert!(
        report.get(branch).is_none(),
        "Expected '{}' at {} not to be reported",
        branch,
        branch.point
    );
}

/// Assert some evidence value carries `tag`
pub fn assert_evidence_tagged(record: &TriggerRecord, tag: ProvenanceTag) {
    assert!(
        record.evidence.iter().any(|v| v.has_tag(tag)),
        "Expected evidence tagged {tag}, got: {:?}",
        record.evidence.iter().map(|v| v.to_string()).collect::<Vec<_>>()
    );
}
