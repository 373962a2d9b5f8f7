// Trigger-condition (logic bomb) detection
//
// Hexagonal Architecture:
// - domain: analysis results, trigger records, verdicts, run flags
// - infrastructure: analyzer, consistency check, control-dependency search,
//   post-filter, classifier
// - ports: report DTOs
// - application: TriggerDetector use case

pub mod application;
pub mod domain;
pub mod infrastructure;
pub mod ports;

// Re-export application layer (primary interface)
pub use application::{TriggerDetector, TriggerDetectorBuilder};

// Re-export domain types
pub use domain::{
    BranchAnalysisResult, ClassificationOutcome, OperandSide, RunFlags, RunStats, SearchStats,
    TriggerRecord, TriggerReport, Verdict,
};

pub use infrastructure::{
    BranchConditionAnalyzer, PathPredicateConsistencyCheck, PredicateCheck, SearchLimits,
    SentinelPolicy,
};
pub use ports::{TriggerDTO, TriggerReportDTO};
