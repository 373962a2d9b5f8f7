/*
 * In-Memory Program Model
 *
 * Reference implementation of the graph-side collaborator ports
 * (InterproceduralCfg, ProvenanceQuery, PathPredicateIndex, BranchCatalog)
 * over plain tables. Used for fixtures, tests and embedding a precomputed
 * analysis snapshot.
 *
 * A `ProgramSnapshot` is the serialisable form; `InMemoryProgram` indexes it
 * for lookups.
 */

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use super::collaborators::{
    BranchCatalog, ContextualValues, InterproceduralCfg, PathPredicateIndex, ProvenanceQuery,
};
use crate::errors::TriggerResult;
use crate::shared::models::{
    BranchInstruction, InstructionKind, Literal, PathFormula, Procedure, ProgramPoint,
    SymbolicValue, ValueRef,
};

// ============================================================================
// Snapshot (serialisable)
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstructionEntry {
    pub point: ProgramPoint,
    pub kind: InstructionKind,
    #[serde(default)]
    pub successors: Vec<ProgramPoint>,
    #[serde(default)]
    pub callees: Vec<Procedure>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GuardedBranch {
    pub branch: BranchInstruction,
    #[serde(default)]
    pub guarded: Vec<ProgramPoint>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProvenanceEntry {
    pub value: ValueRef,
    pub at: ProgramPoint,
    pub values: ContextualValues,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LiteralOrigin {
    pub literal_id: u32,
    pub branch: BranchInstruction,
}

/// Flat, serialisable program description
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgramSnapshot {
    #[serde(default)]
    pub instructions: Vec<InstructionEntry>,
    #[serde(default)]
    pub branches: Vec<GuardedBranch>,
    #[serde(default)]
    pub provenance: Vec<ProvenanceEntry>,
    #[serde(default)]
    pub formulas: Vec<PathFormula>,
    #[serde(default)]
    pub literal_origins: Vec<LiteralOrigin>,
}

// ============================================================================
// Indexed program
// ============================================================================

/// Indexed view over a `ProgramSnapshot`
#[derive(Debug, Clone, Default)]
pub struct InMemoryProgram {
    snapshot: ProgramSnapshot,
    instructions: FxHashMap<ProgramPoint, usize>,
    bodies: FxHashMap<Procedure, Vec<ProgramPoint>>,
    callers: FxHashMap<Procedure, Vec<ProgramPoint>>,
    guarded: FxHashMap<ProgramPoint, usize>,
    provenance: FxHashMap<(ValueRef, ProgramPoint), usize>,
    formulas: FxHashMap<ProgramPoint, usize>,
    origins: FxHashMap<u32, usize>,
}

impl InMemoryProgram {
    pub fn from_snapshot(snapshot: ProgramSnapshot) -> Self {
        let mut program = Self {
            snapshot,
            ..Self::default()
        };
        program.reindex();
        program
    }

    pub fn from_json(json: &str) -> TriggerResult<Self> {
        let snapshot: ProgramSnapshot = serde_json::from_str(json)?;
        Ok(Self::from_snapshot(snapshot))
    }

    pub fn to_json(&self) -> TriggerResult<String> {
        Ok(serde_json::to_string_pretty(&self.snapshot)?)
    }

    pub fn snapshot(&self) -> &ProgramSnapshot {
        &self.snapshot
    }

    fn reindex(&mut self) {
        self.instructions.clear();
        self.bodies.clear();
        self.callers.clear();
        self.guarded.clear();
        self.provenance.clear();
        self.formulas.clear();
        self.origins.clear();

        for (idx, entry) in self.snapshot.instructions.iter().enumerate() {
            self.instructions.insert(entry.point.clone(), idx);
            self.bodies
                .entry(entry.point.procedure.clone())
                .or_insert_with(Vec::new)
                .push(entry.point.clone());
            for callee in &entry.callees {
                self.callers
                    .entry(callee.clone())
                    .or_insert_with(Vec::new)
                    .push(entry.point.clone());
            }
        }
        for body in self.bodies.values_mut() {
            body.sort();
        }
        for (idx, guarded) in self.snapshot.branches.iter().enumerate() {
            self.guarded.insert(guarded.branch.point.clone(), idx);
        }
        for (idx, entry) in self.snapshot.provenance.iter().enumerate() {
            self.provenance
                .insert((entry.value.clone(), entry.at.clone()), idx);
        }
        for (idx, formula) in self.snapshot.formulas.iter().enumerate() {
            self.formulas.insert(formula.point.clone(), idx);
        }
        for (idx, origin) in self.snapshot.literal_origins.iter().enumerate() {
            self.origins.insert(origin.literal_id, idx);
        }
    }

    fn entry(&self, point: &ProgramPoint) -> Option<&InstructionEntry> {
        self.instructions
            .get(point)
            .map(|&idx| &self.snapshot.instructions[idx])
    }
}

impl InterproceduralCfg for InMemoryProgram {
    /// First instruction of every procedure, in procedure order
    fn entry_points(&self) -> Vec<ProgramPoint> {
        let mut entries: Vec<ProgramPoint> = self
            .bodies
            .values()
            .filter_map(|body| body.first().cloned())
            .collect();
        entries.sort();
        entries
    }

    fn successors_of(&self, point: &ProgramPoint) -> Vec<ProgramPoint> {
        self.entry(point)
            .map(|e| e.successors.clone())
            .unwrap_or_default()
    }

    fn callers_of(&self, procedure: &Procedure) -> Vec<ProgramPoint> {
        self.callers.get(procedure).cloned().unwrap_or_default()
    }

    fn callees_of(&self, point: &ProgramPoint) -> Vec<Procedure> {
        self.entry(point)
            .map(|e| e.callees.clone())
            .unwrap_or_default()
    }

    fn points_of(&self, procedure: &Procedure) -> Vec<ProgramPoint> {
        self.bodies.get(procedure).cloned().unwrap_or_default()
    }

    fn has_body(&self, procedure: &Procedure) -> bool {
        self.bodies.contains_key(procedure)
    }

    fn instruction_at(&self, point: &ProgramPoint) -> Option<InstructionKind> {
        self.entry(point).map(|e| e.kind.clone())
    }
}

impl ProvenanceQuery for InMemoryProgram {
    fn contextual_values_for(
        &self,
        value: &ValueRef,
        at: &ProgramPoint,
    ) -> Option<ContextualValues> {
        self.provenance
            .get(&(value.clone(), at.clone()))
            .map(|&idx| self.snapshot.provenance[idx].values.clone())
    }
}

impl PathPredicateIndex for InMemoryProgram {
    fn formula_for(&self, point: &ProgramPoint) -> Option<PathFormula> {
        self.formulas
            .get(point)
            .map(|&idx| self.snapshot.formulas[idx].clone())
    }

    fn branch_instruction_for_literal(&self, literal: &Literal) -> Option<BranchInstruction> {
        self.origins
            .get(&literal.id)
            .map(|&idx| self.snapshot.literal_origins[idx].branch.clone())
    }
}

impl BranchCatalog for InMemoryProgram {
    fn all_branches(&self) -> Vec<BranchInstruction> {
        self.snapshot
            .branches
            .iter()
            .map(|g| g.branch.clone())
            .collect()
    }

    fn guarded_block_of(&self, branch: &BranchInstruction) -> Vec<ProgramPoint> {
        self.guarded
            .get(&branch.point)
            .map(|&idx| self.snapshot.branches[idx].guarded.clone())
            .unwrap_or_default()
    }
}

// ============================================================================
// Builder
// ============================================================================

/// Incremental construction of an `InMemoryProgram`
///
/// Points are numbered per procedure in creation order.
#[derive(Debug, Default)]
pub struct ProgramBuilder {
    snapshot: ProgramSnapshot,
    next_index: FxHashMap<Procedure, u32>,
}

impl ProgramBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an instruction to `procedure`
    pub fn point(&mut self, procedure: &Procedure, kind: InstructionKind) -> ProgramPoint {
        let counter = self.next_index.entry(procedure.clone()).or_insert(0);
        let point = ProgramPoint::new(procedure.clone(), *counter);
        *counter += 1;
        self.snapshot.instructions.push(InstructionEntry {
            point: point.clone(),
            kind,
            successors: Vec::new(),
            callees: Vec::new(),
        });
        point
    }

    /// Append a call instruction targeting `callee`
    pub fn call(
        &mut self,
        procedure: &Procedure,
        callee: &Procedure,
        result: Option<ValueRef>,
    ) -> ProgramPoint {
        let point = self.point(procedure, InstructionKind::Invoke { result });
        self.add_callee(&point, callee);
        point
    }

    /// Append a branch instruction with the given condition shape
    pub fn branch(
        &mut self,
        procedure: &Procedure,
        build: impl FnOnce(ProgramPoint) -> BranchInstruction,
    ) -> BranchInstruction {
        let point = self.point(procedure, InstructionKind::Branch);
        let branch = build(point);
        self.snapshot.branches.push(GuardedBranch {
            branch: branch.clone(),
            guarded: Vec::new(),
        });
        branch
    }

    pub fn add_callee(&mut self, point: &ProgramPoint, callee: &Procedure) {
        if let Some(entry) = self
            .snapshot
            .instructions
            .iter_mut()
            .find(|e| &e.point == point)
        {
            entry.callees.push(callee.clone());
        }
    }

    /// Control-flow edge `from -> to`
    pub fn flow(&mut self, from: &ProgramPoint, to: &ProgramPoint) {
        if let Some(entry) = self
            .snapshot
            .instructions
            .iter_mut()
            .find(|e| &e.point == from)
        {
            entry.successors.push(to.clone());
        }
    }

    /// Sequential edges along `points`
    pub fn chain(&mut self, points: &[ProgramPoint]) {
        for pair in points.windows(2) {
            self.flow(&pair[0], &pair[1]);
        }
    }

    /// Mark `guarded` as control-dependent on `branch`
    pub fn guard(&mut self, branch: &BranchInstruction, guarded: &[ProgramPoint]) {
        if let Some(entry) = self
            .snapshot
            .branches
            .iter_mut()
            .find(|g| g.branch.point == branch.point)
        {
            entry.guarded.extend(guarded.iter().cloned());
        }
    }

    /// Values of `value` coherent at `at`
    pub fn provenance(&mut self, value: ValueRef, at: &ProgramPoint, values: Vec<SymbolicValue>) {
        let contextual = values
            .into_iter()
            .fold(ContextualValues::new(), |acc, v| {
                acc.with_value(v, vec![at.clone()])
            });
        self.provenance_in_context(value, at, contextual);
    }

    /// Raw contextual values for `value` used at `at`
    pub fn provenance_in_context(
        &mut self,
        value: ValueRef,
        at: &ProgramPoint,
        values: ContextualValues,
    ) {
        self.snapshot.provenance.push(ProvenanceEntry {
            value,
            at: at.clone(),
            values,
        });
    }

    pub fn formula(&mut self, formula: PathFormula) {
        self.snapshot.formulas.push(formula);
    }

    /// Declare `branch` as the origin of proposition `literal_id`
    pub fn literal_origin(&mut self, literal_id: u32, branch: &BranchInstruction) {
        self.snapshot.literal_origins.push(LiteralOrigin {
            literal_id,
            branch: branch.clone(),
        });
    }

    pub fn build(self) -> InMemoryProgram {
        InMemoryProgram::from_snapshot(self.snapshot)
    }
}
