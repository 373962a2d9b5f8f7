// Trigger analysis domain: per-comparison analysis results, trigger records,
// run flags and classification verdicts.

pub mod analysis;
pub mod trigger;

pub use analysis::{BranchAnalysisResult, OperandSide};
pub use trigger::{
    ClassificationOutcome, RunFlags, RunStats, SearchStats, TriggerRecord, TriggerReport, Verdict,
};
