// Trigger analysis infrastructure
//
// - branch_condition:   operand provenance per comparison
// - path_consistency:   recovered formula vs traversed path
// - traversal:          forward ICFG walk
// - control_dependency: does a branch gate a sensitive call
// - post_filter:        sentinel / null-check suppression
// - classifier:         the three-gate pipeline

pub mod branch_condition;
pub mod classifier;
pub mod control_dependency;
pub mod path_consistency;
pub mod post_filter;
pub mod traversal;

pub use branch_condition::{BranchConditionAnalyzer, SentinelPolicy};
pub use classifier::TriggerClassifier;
pub use control_dependency::{ControlDependencySearch, SearchLimits};
pub use path_consistency::{PathPredicateConsistencyCheck, PredicateCheck};
pub use post_filter::PostFilter;
pub use traversal::{ForwardTraversal, TraversalStats};
