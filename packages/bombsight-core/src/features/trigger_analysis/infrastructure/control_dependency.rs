/*
 * Control-Dependency Search
 *
 * Decides whether a branch (transitively) gates a call to a sensitive
 * procedure. Three ways a branch can control a sensitive action:
 *
 * 1. Direct hit: an instruction in the guarded block calls a sensitive
 *    procedure, possibly through concrete callees with bodies.
 * 2. Assigned values: an instruction in the guarded block defines a value,
 *    and another branch testing that value controls a sensitive action.
 * 3. Boolean helper: the branch decides a `return 0` / `return 1`, and a
 *    caller branches on the returned result.
 *
 * Example (2):
 * ```text
 * if (hour > 22) { armed = true; }       // B1
 * ...
 * if (armed) { sms.sendTextMessage(..) } // B2 -> sensitive
 * ```
 *
 * Visited sets live for one top-level search and only grow. A path nested
 * deeper than the depth limit is pruned on its own; its siblings are still
 * searched. Exceeding the node budget aborts the whole search. Neither is an
 * error, only a negative answer for what was cut off.
 */

use rustc_hash::FxHashSet;
use std::collections::VecDeque;

use crate::features::trigger_analysis::domain::SearchStats;
use crate::shared::models::{BranchInstruction, Procedure, ProgramPoint, ValueRef};
use crate::shared::ports::{BranchCatalog, InterproceduralCfg, SensitiveApiCatalog};

/// Search budget
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchLimits {
    /// Maximum branch-to-branch nesting
    pub max_depth: usize,

    /// Maximum branches + procedures visited
    pub max_visited_nodes: usize,
}

impl Default for SearchLimits {
    fn default() -> Self {
        Self {
            max_depth: 64,
            max_visited_nodes: 20_000,
        }
    }
}

pub struct ControlDependencySearch<'a> {
    cfg: &'a dyn InterproceduralCfg,
    branches: &'a dyn BranchCatalog,
    sensitive: &'a dyn SensitiveApiCatalog,
    limits: SearchLimits,

    visited_procedures: FxHashSet<Procedure>,
    visited_branches: FxHashSet<ProgramPoint>,
    depth_cutoffs: usize,
    budget_exhausted: bool,
}

impl<'a> ControlDependencySearch<'a> {
    pub fn new(
        cfg: &'a dyn InterproceduralCfg,
        branches: &'a dyn BranchCatalog,
        sensitive: &'a dyn SensitiveApiCatalog,
        limits: SearchLimits,
    ) -> Self {
        Self {
            cfg,
            branches,
            sensitive,
            limits,
            visited_procedures: FxHashSet::default(),
            visited_branches: FxHashSet::default(),
            depth_cutoffs: 0,
            budget_exhausted: false,
        }
    }

    /// First sensitive procedure gated by `branch`, if any
    pub fn controls_sensitive_action(
        mut self,
        branch: &BranchInstruction,
    ) -> (Option<Procedure>, SearchStats) {
        let found = self.search(branch, 0);
        let stats = SearchStats {
            branches_visited: self.visited_branches.len(),
            procedures_visited: self.visited_procedures.len(),
            depth_cutoffs: self.depth_cutoffs,
            budget_exhausted: self.budget_exhausted,
        };
        if stats.budget_exhausted {
            tracing::debug!(
                branch = %branch.point,
                branches = stats.branches_visited,
                procedures = stats.procedures_visited,
                "control-dependency search budget exhausted"
            );
        }
        (found, stats)
    }

    fn visited_nodes(&self) -> usize {
        self.visited_branches.len() + self.visited_procedures.len()
    }

    fn over_budget(&mut self) -> bool {
        if self.visited_nodes() >= self.limits.max_visited_nodes {
            self.budget_exhausted = true;
        }
        self.budget_exhausted
    }

    fn search(&mut self, branch: &BranchInstruction, depth: usize) -> Option<Procedure> {
        if depth > self.limits.max_depth {
            self.depth_cutoffs += 1;
            tracing::trace!(branch = %branch.point, depth, "path pruned at depth limit");
            return None;
        }
        if self.over_budget() || !self.visited_branches.insert(branch.point.clone()) {
            return None;
        }
        tracing::trace!(branch = %branch.point, depth, "searching guarded block");

        let guarded = self.branches.guarded_block_of(branch);

        for point in &guarded {
            if let Some(procedure) = self.sensitive_call_from(point) {
                return Some(procedure);
            }
        }

        for point in &guarded {
            let defined = match self.cfg.instruction_at(point) {
                Some(kind) => kind.defined_value().cloned(),
                None => None,
            };
            if let Some(value) = defined {
                if let Some(procedure) =
                    self.search_branches_using(&value, &point.procedure, depth)
                {
                    return Some(procedure);
                }
            }
        }

        self.search_boolean_helper_callers(branch, depth)
    }

    /// Branches testing `value` (as seen from `scope`)
    fn search_branches_using(
        &mut self,
        value: &ValueRef,
        scope: &Procedure,
        depth: usize,
    ) -> Option<Procedure> {
        for dependent in self.branches.branches_using(value, scope) {
            if self.visited_branches.contains(&dependent.point) {
                continue;
            }
            if let Some(procedure) = self.search(&dependent, depth + 1) {
                return Some(procedure);
            }
            if self.budget_exhausted {
                return None;
            }
        }
        None
    }

    /// A branch whose immediate successor returns 0/1 acts through the
    /// enclosing procedure's callers
    fn search_boolean_helper_callers(
        &mut self,
        branch: &BranchInstruction,
        depth: usize,
    ) -> Option<Procedure> {
        let returns_boolean = self
            .cfg
            .successors_of(&branch.point)
            .iter()
            .filter_map(|succ| self.cfg.instruction_at(succ))
            .any(|kind| kind.returns_boolean_constant());
        if !returns_boolean {
            return None;
        }

        for call_site in self.cfg.callers_of(branch.procedure()) {
            let result = match self.cfg.instruction_at(&call_site) {
                Some(kind) => kind.defined_value().cloned(),
                None => None,
            };
            if let Some(result) = result {
                if let Some(procedure) =
                    self.search_branches_using(&result, &call_site.procedure, depth)
                {
                    return Some(procedure);
                }
            }
            if self.budget_exhausted {
                return None;
            }
        }
        None
    }

    /// Sensitive procedure reached by the call at `point`, descending into
    /// concrete callees not yet visited
    fn sensitive_call_from(&mut self, point: &ProgramPoint) -> Option<Procedure> {
        let mut worklist: VecDeque<Procedure> = self.cfg.callees_of(point).into();

        while let Some(callee) = worklist.pop_front() {
            if self.sensitive.is_sensitive(&callee) {
                return Some(callee);
            }
            if !self.cfg.has_body(&callee) || self.visited_procedures.contains(&callee) {
                continue;
            }
            if self.over_budget() {
                return None;
            }
            self.visited_procedures.insert(callee.clone());

            for inner in self.cfg.points_of(&callee) {
                worklist.extend(self.cfg.callees_of(&inner));
            }
        }
        None
    }
}
