// Trigger analysis ports: flat, serialisable report DTOs for reporting layers.

use serde::{Deserialize, Serialize};

use super::domain::{RunFlags, RunStats, TriggerRecord, TriggerReport};
use crate::errors::TriggerResult;

// ============================================================================
// DTOs (Data Transfer Objects)
// ============================================================================

/// One reported trigger
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TriggerDTO {
    pub procedure: String,
    pub declaring_type: String,
    pub instruction_index: u32,
    pub line: Option<u32>,
    pub condition: String,
    pub gated_sensitive_procedure: String,
    pub evidence: Vec<String>,
    pub tags: Vec<String>,
    pub path_predicate: Option<String>,
    pub predicate_consistent: bool,
}

impl From<&TriggerRecord> for TriggerDTO {
    fn from(record: &TriggerRecord) -> Self {
        let point = &record.branch.point;
        let mut tags: Vec<String> = record
            .evidence
            .iter()
            .flat_map(|value| value.tags.iter().map(|t| t.as_str().to_string()))
            .collect();
        tags.sort();
        tags.dedup();

        Self {
            procedure: point.procedure.signature(),
            declaring_type: point.procedure.declaring_type.clone(),
            instruction_index: point.index,
            line: point.line,
            condition: record.branch.to_string(),
            gated_sensitive_procedure: record.gated_sensitive_procedure.signature(),
            evidence: record.evidence.iter().map(|v| v.to_string()).collect(),
            tags,
            path_predicate: record.path_predicate.as_ref().map(|f| f.to_string()),
            predicate_consistent: record.predicate_consistent,
        }
    }
}

/// Whole-run report
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TriggerReportDTO {
    pub triggers: Vec<TriggerDTO>,
    pub flags: RunFlags,
    pub stats: RunStats,
}

impl From<&TriggerReport> for TriggerReportDTO {
    fn from(report: &TriggerReport) -> Self {
        Self {
            triggers: report.records().map(TriggerDTO::from).collect(),
            flags: report.flags,
            stats: report.stats.clone(),
        }
    }
}

impl TriggerReportDTO {
    pub fn to_json(&self) -> TriggerResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(json: &str) -> TriggerResult<Self> {
        Ok(serde_json::from_str(json)?)
    }
}
