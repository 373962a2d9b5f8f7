//! Forward ICFG traversal
//!
//! Depth-first walk from every entry point, following intraprocedural
//! successors and descending into callee bodies. Each instruction is visited
//! once per run; the path by which it was first reached is handed to the
//! visitor at branch instructions.

use rustc_hash::FxHashSet;

use crate::shared::models::{InstructionKind, ProgramPoint};
use crate::shared::ports::InterproceduralCfg;

/// Traversal summary
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TraversalStats {
    pub points_visited: usize,
    pub branches_visited: usize,
}

pub struct ForwardTraversal<'a> {
    cfg: &'a dyn InterproceduralCfg,
}

impl<'a> ForwardTraversal<'a> {
    pub fn new(cfg: &'a dyn InterproceduralCfg) -> Self {
        Self { cfg }
    }

    /// Walk the ICFG, calling `on_branch(point, path)` at each branch.
    ///
    /// `path` ends with `point`.
    pub fn visit_branches<F>(&self, mut on_branch: F) -> TraversalStats
    where
        F: FnMut(&ProgramPoint, &[ProgramPoint]),
    {
        let mut stats = TraversalStats::default();
        let mut visited: FxHashSet<ProgramPoint> = FxHashSet::default();
        let mut path: Vec<ProgramPoint> = Vec::new();

        for entry in self.cfg.entry_points() {
            // (point, length of the path leading to it)
            let mut stack: Vec<(ProgramPoint, usize)> = vec![(entry, 0)];

            while let Some((point, depth)) = stack.pop() {
                if !visited.insert(point.clone()) {
                    continue;
                }
                stats.points_visited += 1;

                path.truncate(depth);
                path.push(point.clone());

                if matches!(self.cfg.instruction_at(&point), Some(InstructionKind::Branch)) {
                    stats.branches_visited += 1;
                    on_branch(&point, &path);
                }

                let next_depth = path.len();
                // Callee bodies before the call's own successors
                let mut next: Vec<ProgramPoint> = self
                    .cfg
                    .callees_of(&point)
                    .iter()
                    .filter_map(|callee| self.cfg.points_of(callee).into_iter().next())
                    .collect();
                next.extend(self.cfg.successors_of(&point));
                // Reverse so the first candidate is explored first
                for succ in next.into_iter().rev() {
                    if !visited.contains(&succ) {
                        stack.push((succ, next_depth));
                    }
                }
            }
            path.clear();
        }

        tracing::trace!(
            points = stats.points_visited,
            branches = stats.branches_visited,
            "forward traversal complete"
        );
        stats
    }
}
