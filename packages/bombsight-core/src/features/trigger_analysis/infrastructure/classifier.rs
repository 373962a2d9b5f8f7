/*
 * Trigger Classifier
 *
 * Three-gate pipeline applied to one branch:
 *
 *   suspicious? -> controls a sensitive action? -> survives post-filter?
 *
 * Classification is pure with respect to the run: the verdict is returned and
 * the caller folds it into the result map and run flags. Every call owns its
 * own control-dependency visited sets, so branches can be classified in any
 * order or in parallel.
 */

use crate::features::trigger_analysis::domain::{
    ClassificationOutcome, SearchStats, TriggerRecord, Verdict,
};
use crate::shared::models::{BranchInstruction, TagFamily};
use crate::shared::ports::{
    BranchCatalog, FilteredLibraryCatalog, InterproceduralCfg, SensitiveApiCatalog,
};

use super::branch_condition::BranchConditionAnalyzer;
use super::control_dependency::{ControlDependencySearch, SearchLimits};
use super::post_filter::PostFilter;

pub struct TriggerClassifier<'a> {
    pub analyzer: &'a BranchConditionAnalyzer,
    pub cfg: &'a dyn InterproceduralCfg,
    pub branches: &'a dyn BranchCatalog,
    pub sensitive: &'a dyn SensitiveApiCatalog,
    pub filtered: &'a dyn FilteredLibraryCatalog,
    pub tracked_families: &'a [TagFamily],
    pub limits: SearchLimits,
}

impl<'a> TriggerClassifier<'a> {
    pub fn classify(&self, branch: &BranchInstruction) -> ClassificationOutcome {
        // Gate 1: suspicious
        let results = self.analyzer.analyze(branch, &branch.point);
        if !results.iter().any(|r| r.is_suspicious(self.tracked_families)) {
            return ClassificationOutcome {
                verdict: Verdict::NotSuspicious,
                search: SearchStats::default(),
            };
        }
        tracing::debug!(branch = %branch, point = %branch.point, "suspicious branch");

        // Gate 2: controls a sensitive action
        let (gated, search) =
            ControlDependencySearch::new(self.cfg, self.branches, self.sensitive, self.limits)
                .controls_sensitive_action(branch);
        let gated = match gated {
            Some(procedure) => procedure,
            None => {
                return ClassificationOutcome {
                    verdict: Verdict::NoSensitiveAction,
                    search,
                }
            }
        };
        tracing::debug!(branch = %branch, gated = %gated, "branch gates sensitive action");

        // Gate 3: post-filter
        let results = self.analyzer.analyze(branch, &branch.point);
        let evidence = PostFilter::new(self.tracked_families).evidence(&results);
        let verdict = if evidence.is_empty() {
            Verdict::NoEvidence
        } else if self.filtered.is_filtered(branch.declaring_type()) {
            tracing::debug!(
                branch = %branch,
                declaring_type = branch.declaring_type(),
                "suppressed in filtered library"
            );
            Verdict::FilteredLibrary {
                evidence,
                gated_sensitive_procedure: gated,
            }
        } else {
            Verdict::Trigger(TriggerRecord::new(branch.clone(), evidence, gated))
        };

        ClassificationOutcome { verdict, search }
    }
}
