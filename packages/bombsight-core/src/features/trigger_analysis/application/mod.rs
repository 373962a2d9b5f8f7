/*
 * Trigger Analysis Application Layer
 *
 * Use case: detect trigger branches over one program.
 *
 * ```
 * ForwardTraversal ──(point, path)──> PathPredicateConsistencyCheck
 *        │
 * BranchCatalog ──> TriggerClassifier ──(outcome)──> TriggerAccumulator ──> TriggerReport
 *                   (per branch, optionally on rayon)
 * ```
 *
 * Collaborators are wired through `TriggerDetector::builder()`; a missing one
 * is reported before any analysis runs.
 */

use rayon::prelude::*;
use rustc_hash::FxHashMap;
use std::collections::btree_map::Entry;
use std::sync::Arc;
use std::time::Instant;

use super::domain::{ClassificationOutcome, TriggerReport, Verdict};
use super::infrastructure::{
    BranchConditionAnalyzer, ForwardTraversal, PathPredicateConsistencyCheck, PredicateCheck,
    SearchLimits, SentinelPolicy, TriggerClassifier,
};
use crate::config::TriggerConfig;
use crate::errors::{TriggerError, TriggerResult};
use crate::shared::models::{BranchInstruction, ProgramPoint};
use crate::shared::ports::{
    BranchCatalog, FilteredLibraryCatalog, InterproceduralCfg, PathPredicateIndex,
    ProvenanceQuery, SensitiveApiCatalog,
};

// ============================================================================
// Detector
// ============================================================================

/// Trigger detection use case
pub struct TriggerDetector {
    cfg: Arc<dyn InterproceduralCfg>,
    predicates: Arc<dyn PathPredicateIndex>,
    branches: Arc<dyn BranchCatalog>,
    sensitive: Arc<dyn SensitiveApiCatalog>,
    filtered: Arc<dyn FilteredLibraryCatalog>,
    analyzer: BranchConditionAnalyzer,
    config: TriggerConfig,
}

impl TriggerDetector {
    pub fn builder() -> TriggerDetectorBuilder {
        TriggerDetectorBuilder::default()
    }

    pub fn config(&self) -> &TriggerConfig {
        &self.config
    }

    /// Classify a single branch in isolation
    pub fn classify(&self, branch: &BranchInstruction) -> ClassificationOutcome {
        self.classifier().classify(branch)
    }

    fn classifier(&self) -> TriggerClassifier<'_> {
        TriggerClassifier {
            analyzer: &self.analyzer,
            cfg: self.cfg.as_ref(),
            branches: self.branches.as_ref(),
            sensitive: self.sensitive.as_ref(),
            filtered: self.filtered.as_ref(),
            tracked_families: &self.config.tracked_families,
            limits: SearchLimits {
                max_depth: self.config.max_search_depth,
                max_visited_nodes: self.config.max_visited_nodes,
            },
        }
    }

    /// Run the full detection pass
    pub fn run(&self) -> TriggerResult<TriggerReport> {
        let start = Instant::now();
        tracing::info!(
            parallel = self.config.parallel,
            verify_path_predicates = self.config.verify_path_predicates,
            max_search_depth = self.config.max_search_depth,
            "starting trigger detection"
        );

        let mut accumulator = TriggerAccumulator::new(self.config.require_consistent_predicate);

        // 1. Forward traversal: path context for every reachable branch
        let checker = PathPredicateConsistencyCheck::new(self.predicates.clone());
        let mut checks: FxHashMap<ProgramPoint, PredicateCheck> = FxHashMap::default();
        let traversal = ForwardTraversal::new(self.cfg.as_ref()).visit_branches(|point, path| {
            if self.config.verify_path_predicates {
                checks
                    .entry(point.clone())
                    .or_insert_with(|| checker.check(point, path));
            }
        });
        accumulator.report.stats.branches_traversed = traversal.branches_visited;

        // 2. Classification, in catalogue order
        let branches = self.branches.all_branches();
        let classifier = self.classifier();
        let outcomes: Vec<ClassificationOutcome> = if self.config.parallel {
            branches.par_iter().map(|b| classifier.classify(b)).collect()
        } else {
            branches.iter().map(|b| classifier.classify(b)).collect()
        };

        // 3. Accumulation
        for (branch, outcome) in branches.iter().zip(outcomes) {
            let predicate = if outcome.verdict.is_trigger() {
                Some(self.predicate_for(&checker, &mut checks, &branch.point))
            } else {
                None
            };
            accumulator.absorb(outcome, predicate);
        }
        accumulator.report.stats.inconsistent_predicates = checks
            .values()
            .filter(|check| !check.is_consistent())
            .count();

        let report = accumulator.finish();
        tracing::info!(
            triggers = report.triggers.len(),
            classified = report.stats.branches_classified,
            suspicious = report.stats.suspicious,
            filtered = report.stats.filtered_library,
            budget_exhausted = report.stats.search_budget_exhausted,
            depth_cutoffs = report.stats.search_depth_cutoffs,
            elapsed_ms = start.elapsed().as_millis() as u64,
            "trigger detection complete"
        );
        Ok(report)
    }

    /// Formula check for a trigger branch.
    ///
    /// Branches the traversal never reached are checked against an empty
    /// path; with verification off the recovered formula is taken as is.
    fn predicate_for(
        &self,
        checker: &PathPredicateConsistencyCheck,
        checks: &mut FxHashMap<ProgramPoint, PredicateCheck>,
        point: &ProgramPoint,
    ) -> PredicateCheck {
        if !self.config.verify_path_predicates {
            return match self.predicates.formula_for(point) {
                Some(formula) => PredicateCheck::Consistent(formula),
                None => PredicateCheck::Vacuous,
            };
        }
        checks
            .entry(point.clone())
            .or_insert_with(|| checker.check(point, &[]))
            .clone()
    }
}

// ============================================================================
// Builder
// ============================================================================

#[derive(Default)]
pub struct TriggerDetectorBuilder {
    cfg: Option<Arc<dyn InterproceduralCfg>>,
    provenance: Option<Arc<dyn ProvenanceQuery>>,
    predicates: Option<Arc<dyn PathPredicateIndex>>,
    branches: Option<Arc<dyn BranchCatalog>>,
    sensitive: Option<Arc<dyn SensitiveApiCatalog>>,
    filtered: Option<Arc<dyn FilteredLibraryCatalog>>,
    config: Option<TriggerConfig>,
}

impl TriggerDetectorBuilder {
    /// Wire all four graph-side ports from one program model
    pub fn program<P>(self, program: Arc<P>) -> Self
    where
        P: InterproceduralCfg + ProvenanceQuery + PathPredicateIndex + BranchCatalog + 'static,
    {
        self.icfg(program.clone())
            .provenance(program.clone())
            .path_predicates(program.clone())
            .branch_catalog(program)
    }

    pub fn icfg(mut self, cfg: Arc<dyn InterproceduralCfg>) -> Self {
        self.cfg = Some(cfg);
        self
    }

    pub fn provenance(mut self, provenance: Arc<dyn ProvenanceQuery>) -> Self {
        self.provenance = Some(provenance);
        self
    }

    pub fn path_predicates(mut self, predicates: Arc<dyn PathPredicateIndex>) -> Self {
        self.predicates = Some(predicates);
        self
    }

    pub fn branch_catalog(mut self, branches: Arc<dyn BranchCatalog>) -> Self {
        self.branches = Some(branches);
        self
    }

    pub fn sensitive_apis(mut self, sensitive: Arc<dyn SensitiveApiCatalog>) -> Self {
        self.sensitive = Some(sensitive);
        self
    }

    pub fn filtered_libraries(mut self, filtered: Arc<dyn FilteredLibraryCatalog>) -> Self {
        self.filtered = Some(filtered);
        self
    }

    pub fn config(mut self, config: TriggerConfig) -> Self {
        self.config = Some(config);
        self
    }

    pub fn build(self) -> TriggerResult<TriggerDetector> {
        let cfg = self.cfg.ok_or(TriggerError::MissingCollaborator("icfg"))?;
        let provenance = self
            .provenance
            .ok_or(TriggerError::MissingCollaborator("provenance"))?;
        let predicates = self
            .predicates
            .ok_or(TriggerError::MissingCollaborator("path_predicates"))?;
        let branches = self
            .branches
            .ok_or(TriggerError::MissingCollaborator("branch_catalog"))?;
        let sensitive = self
            .sensitive
            .ok_or(TriggerError::MissingCollaborator("sensitive_apis"))?;
        let filtered = self
            .filtered
            .ok_or(TriggerError::MissingCollaborator("filtered_libraries"))?;

        let config = self.config.unwrap_or_default();
        config.validate()?;

        let analyzer = BranchConditionAnalyzer::new(
            provenance,
            SentinelPolicy::new(config.extra_sentinels.clone()),
        );

        Ok(TriggerDetector {
            cfg,
            predicates,
            branches,
            sensitive,
            filtered,
            analyzer,
            config,
        })
    }
}

// ============================================================================
// Accumulator
// ============================================================================

/// Folds classification outcomes into a report, in catalogue order
struct TriggerAccumulator {
    report: TriggerReport,
    require_consistent_predicate: bool,
}

impl TriggerAccumulator {
    fn new(require_consistent_predicate: bool) -> Self {
        Self {
            report: TriggerReport::default(),
            require_consistent_predicate,
        }
    }

    fn absorb(&mut self, outcome: ClassificationOutcome, predicate: Option<PredicateCheck>) {
        let stats = &mut self.report.stats;
        let flags = &mut self.report.flags;

        stats.branches_classified += 1;
        stats.branches_searched += outcome.search.branches_visited;
        stats.procedures_searched += outcome.search.procedures_visited;
        if outcome.search.budget_exhausted {
            stats.search_budget_exhausted += 1;
        }
        if outcome.search.depth_cutoffs > 0 {
            stats.search_depth_cutoffs += 1;
        }

        if outcome.verdict.passed_suspicious() {
            flags.saw_suspicious = true;
            stats.suspicious += 1;
        }
        if outcome.verdict.passed_control_dependency() {
            flags.saw_suspicious_controlling_sensitive_action = true;
            stats.controlling_sensitive_action += 1;
        }

        let mut record = match outcome.verdict {
            Verdict::Trigger(record) => record,
            Verdict::FilteredLibrary { .. } => {
                stats.filtered_library += 1;
                return;
            }
            _ => return,
        };

        flags.saw_suspicious_surviving_post_filter = true;
        stats.surviving_post_filter += 1;

        if let Some(check) = predicate {
            record.path_predicate = check.attachable_formula().cloned();
            record.predicate_consistent = check.is_consistent();
            if !record.predicate_consistent && self.require_consistent_predicate {
                stats.dropped_inconsistent += 1;
                tracing::debug!(
                    branch = %record.branch,
                    "dropping trigger with inconsistent path predicate"
                );
                return;
            }
        }

        match self.report.triggers.entry(record.branch.clone()) {
            Entry::Occupied(mut existing) => existing.get_mut().merge_evidence(record.evidence),
            Entry::Vacant(slot) => {
                slot.insert(record);
            }
        }
    }

    fn finish(self) -> TriggerReport {
        self.report
    }
}
