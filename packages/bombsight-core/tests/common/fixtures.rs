//! Program fixtures
//!
//! Small Android-flavoured programs built with `ProgramBuilder`.

use std::sync::Arc;

use bombsight_core::features::trigger_analysis::TriggerDetector;
use bombsight_core::shared::models::{
    BranchInstruction, ComparisonOperator, InstructionKind, LiteralConstant, Procedure,
    ProgramPoint, ProvenanceTag, SymbolicValue, ValueRef,
};
use bombsight_core::shared::ports::{
    BranchCatalog, InterproceduralCfg, PathPredicateIndex, ProvenanceQuery,
};
use bombsight_core::{
    InMemoryProgram, PrefixLibraryFilter, ProgramBuilder, SignatureCatalog, TriggerConfig,
};

// ============================================================================
// Values and procedures
// ============================================================================

pub fn sms_send() -> Procedure {
    Procedure::new("android.telephony.SmsManager", "sendTextMessage")
}

pub fn hour_of_day() -> SymbolicValue {
    SymbolicValue::opaque("Calendar.get(HOUR_OF_DAY)").with_tag(ProvenanceTag::TimeHour)
}

pub fn current_time() -> SymbolicValue {
    SymbolicValue::opaque("System.currentTimeMillis()").with_tag(ProvenanceTag::TimeGeneric)
}

pub fn compare_local(
    local: &str,
    operator: ComparisonOperator,
    comparand: LiteralConstant,
) -> impl FnOnce(ProgramPoint) -> BranchInstruction + '_ {
    move |point| {
        BranchInstruction::compare(
            point,
            operator,
            ValueRef::local(local),
            ValueRef::constant(comparand),
        )
    }
}

pub fn assign(local: &str) -> InstructionKind {
    InstructionKind::Assign {
        target: ValueRef::local(local),
    }
}

// ============================================================================
// Detector wiring
// ============================================================================

/// Detector over `program` with the default catalogues
pub fn detector<P>(program: Arc<P>, config: TriggerConfig) -> TriggerDetector
where
    P: InterproceduralCfg + ProvenanceQuery + PathPredicateIndex + BranchCatalog + 'static,
{
    TriggerDetector::builder()
        .program(program)
        .sensitive_apis(Arc::new(SignatureCatalog::android_defaults()))
        .filtered_libraries(Arc::new(PrefixLibraryFilter::with_defaults()))
        .config(config)
        .build()
        .expect("fixture detector wiring")
}

// ============================================================================
// Time bomb
// ============================================================================

/// ```text
/// h = <value>
/// if (h > comparand) sendTextMessage(..)
/// return
/// ```
pub struct TimeBomb {
    pub builder: ProgramBuilder,
    pub procedure: Procedure,
    pub entry: ProgramPoint,
    pub branch: BranchInstruction,
    pub send_call: ProgramPoint,
}

impl TimeBomb {
    pub fn new(declaring_type: &str, comparand: LiteralConstant, value: SymbolicValue) -> Self {
        let procedure = Procedure::new(declaring_type, "onCreate");
        let mut builder = ProgramBuilder::new();

        let entry = builder.point(&procedure, assign("h"));
        let branch = builder.branch(
            &procedure,
            compare_local("h", ComparisonOperator::Gt, comparand),
        );
        let send_call = builder.call(&procedure, &sms_send(), None);
        let exit = builder.point(&procedure, InstructionKind::Return { value: None });

        builder.chain(&[entry.clone(), branch.point.clone(), send_call.clone(), exit.clone()]);
        builder.flow(&branch.point, &exit);
        builder.guard(&branch, &[send_call.clone()]);
        builder.provenance(ValueRef::local("h"), &branch.point, vec![value]);

        Self {
            builder,
            procedure,
            entry,
            branch,
            send_call,
        }
    }

    pub fn build(self) -> (Arc<InMemoryProgram>, BranchInstruction) {
        (Arc::new(self.builder.build()), self.branch)
    }
}

pub fn time_bomb(
    declaring_type: &str,
    comparand: LiteralConstant,
    value: SymbolicValue,
) -> (Arc<InMemoryProgram>, BranchInstruction) {
    TimeBomb::new(declaring_type, comparand, value).build()
}

// ============================================================================
// Chained bomb
// ============================================================================

/// ```text
/// h = <hour>
/// if (h > 22) armed = 1        // B1 (suspicious)
/// if (armed != 0) sendText(..) // B2 (not suspicious on its own)
/// ```
pub struct ChainedBomb {
    pub program: Arc<InMemoryProgram>,
    pub b1: BranchInstruction,
    pub b2: BranchInstruction,
}

pub fn chained_bomb() -> ChainedBomb {
    let main = Procedure::new("com.example.Alarm", "onReceive");
    let mut builder = ProgramBuilder::new();

    let entry = builder.point(&main, assign("h"));
    let b1 = builder.branch(
        &main,
        compare_local("h", ComparisonOperator::Gt, LiteralConstant::Int(22)),
    );
    let set_armed = builder.point(&main, assign("armed"));
    let b2 = builder.branch(
        &main,
        compare_local("armed", ComparisonOperator::Ne, LiteralConstant::Int(0)),
    );
    let send = builder.call(&main, &sms_send(), None);
    let exit = builder.point(&main, InstructionKind::Return { value: None });

    builder.chain(&[
        entry,
        b1.point.clone(),
        set_armed.clone(),
        b2.point.clone(),
        send.clone(),
        exit.clone(),
    ]);
    builder.flow(&b1.point, &b2.point);
    builder.flow(&b2.point, &exit);
    builder.guard(&b1, &[set_armed]);
    builder.guard(&b2, &[send]);

    builder.provenance(ValueRef::local("h"), &b1.point, vec![hour_of_day()]);
    builder.provenance(
        ValueRef::local("armed"),
        &b2.point,
        vec![SymbolicValue::constant(LiteralConstant::Int(1))],
    );

    ChainedBomb {
        program: Arc::new(builder.build()),
        b1,
        b2,
    }
}
