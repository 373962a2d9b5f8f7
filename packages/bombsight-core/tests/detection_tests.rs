//! End-to-end trigger detection scenarios

mod common;

use std::sync::Arc;

use bombsight_core::shared::models::{
    BranchInstruction, ComparisonOperator, InstructionKind, Literal, LiteralConstant, PathFormula,
    Procedure, ProvenanceTag, SwitchCase, SymbolicValue, ValueRef,
};
use bombsight_core::{ProgramBuilder, TriggerConfig, TriggerReportDTO};
use common::*;
use pretty_assertions::assert_eq;

// ============================================================================
// Sentinel suppression
// ============================================================================

#[test]
fn test_time_compared_to_minus_one_is_suppressed() {
    let (program, branch) = time_bomb("com.example.Main", LiteralConstant::Int(-1), current_time());
    let report = detector(program, TriggerConfig::default()).run().unwrap();

    assert_not_reported(&report, &branch);
    assert!(report.flags.saw_suspicious);
    assert!(report.flags.saw_suspicious_controlling_sensitive_action);
    assert!(!report.flags.saw_suspicious_surviving_post_filter);
}

#[test]
fn test_time_compared_to_regular_constant_is_reported() {
    let (program, branch) = time_bomb("com.example.Main", LiteralConstant::Int(42), current_time());
    let report = detector(program, TriggerConfig::default()).run().unwrap();

    assert_trigger_count(&report, 1);
    let record = assert_reported(&report, &branch);
    assert_eq!(record.gated_sensitive_procedure, sms_send());
    assert_eq!(record.evidence, vec![current_time()]);
    assert!(report.flags.saw_suspicious_surviving_post_filter);
}

#[test]
fn test_null_comparand_is_suppressed() {
    let (program, branch) = time_bomb("com.example.Main", LiteralConstant::Null, current_time());
    let report = detector(program, TriggerConfig::default()).run().unwrap();
    assert_not_reported(&report, &branch);
}

#[test]
fn test_generic_suspicious_exempt_from_sentinel_suppression() {
    let tainted = current_time().with_tag(ProvenanceTag::SuspiciousGeneric);
    let (program, branch) = time_bomb("com.example.Main", LiteralConstant::Int(-1), tainted);
    let report = detector(program, TriggerConfig::default()).run().unwrap();

    let record = assert_reported(&report, &branch);
    assert_evidence_tagged(record, ProvenanceTag::SuspiciousGeneric);
}

#[test]
fn test_configured_extra_sentinel() {
    use bombsight_core::shared::models::{BinaryOperator, SymbolicOperand};

    // h = millis % 7 ; if (h > 1000) ...
    let remainder = SymbolicValue::binary(
        SymbolicOperand::Symbolic(Box::new(current_time())),
        BinaryOperator::Rem,
        SymbolicOperand::Value(ValueRef::constant(LiteralConstant::Int(7))),
    )
    .with_tag(ProvenanceTag::TimeGeneric);

    let (program, branch) =
        time_bomb("com.example.Main", LiteralConstant::Int(1000), remainder.clone());
    let report = detector(program, TriggerConfig::default()).run().unwrap();
    assert_reported(&report, &branch);

    let (program, branch) = time_bomb("com.example.Main", LiteralConstant::Int(1000), remainder);
    let config = TriggerConfig::default().extra_sentinel(LiteralConstant::Int(7));
    let report = detector(program, config).run().unwrap();
    assert_not_reported(&report, &branch);
}

// ============================================================================
// Gates
// ============================================================================

#[test]
fn test_filtered_library_is_not_reported() {
    let (program, branch) =
        time_bomb("com.google.ads.Refresh", LiteralConstant::Int(42), hour_of_day());
    let report = detector(program, TriggerConfig::default()).run().unwrap();

    assert_not_reported(&report, &branch);
    assert_eq!(report.stats.filtered_library, 1);
    assert!(report.flags.saw_suspicious_controlling_sensitive_action);
    assert!(!report.flags.saw_suspicious_surviving_post_filter);
}

#[test]
fn test_untagged_branch_is_not_suspicious() {
    let (program, branch) = time_bomb(
        "com.example.Main",
        LiteralConstant::Int(42),
        SymbolicValue::opaque("readConfig()"),
    );
    let report = detector(program, TriggerConfig::default()).run().unwrap();

    assert_not_reported(&report, &branch);
    assert_eq!(report.flags, Default::default());
}

#[test]
fn test_untracked_family_is_not_suspicious() {
    use bombsight_core::shared::models::TagFamily;

    let (program, branch) = time_bomb("com.example.Main", LiteralConstant::Int(42), hour_of_day());
    let config =
        TriggerConfig::default().tracked_families(vec![TagFamily::Sms, TagFamily::Location]);
    let report = detector(program, config).run().unwrap();

    assert_not_reported(&report, &branch);
    assert!(!report.flags.saw_suspicious);
}

#[test]
fn test_suspicious_without_sensitive_action() {
    let main = Procedure::new("com.example.Main", "onCreate");
    let mut builder = ProgramBuilder::new();
    let branch = builder.branch(
        &main,
        compare_local("h", ComparisonOperator::Gt, LiteralConstant::Int(22)),
    );
    let log = builder.call(&main, &Procedure::new("android.util.Log", "d"), None);
    builder.chain(&[branch.point.clone(), log.clone()]);
    builder.guard(&branch, &[log]);
    builder.provenance(ValueRef::local("h"), &branch.point, vec![hour_of_day()]);

    let report = detector(Arc::new(builder.build()), TriggerConfig::default())
        .run()
        .unwrap();

    assert!(report.is_empty());
    assert!(report.flags.saw_suspicious);
    assert!(!report.flags.saw_suspicious_controlling_sensitive_action);
}

#[test]
fn test_two_tagged_operands_without_literal() {
    // if (sender == configuredNumber) sendTextMessage(..)
    let main = Procedure::new("com.example.SmsReceiver", "onReceive");
    let mut builder = ProgramBuilder::new();
    let branch = builder.branch(&main, |p| {
        BranchInstruction::compare(
            p,
            ComparisonOperator::Eq,
            ValueRef::local("number"),
            ValueRef::local("sender"),
        )
    });
    let send = builder.call(&main, &sms_send(), None);
    builder.chain(&[branch.point.clone(), send.clone()]);
    builder.guard(&branch, &[send]);
    builder.provenance(
        ValueRef::local("number"),
        &branch.point,
        vec![SymbolicValue::opaque("prefs.getString(\"n\")")],
    );
    builder.provenance(
        ValueRef::local("sender"),
        &branch.point,
        vec![SymbolicValue::opaque("msg.getOriginatingAddress()")
            .with_tag(ProvenanceTag::SmsSender)],
    );

    let report = detector(Arc::new(builder.build()), TriggerConfig::default())
        .run()
        .unwrap();

    // Suspicious via the secondary operand; evidence is drawn from the
    // untagged primary, so nothing survives post-filtering
    assert!(report.flags.saw_suspicious_controlling_sensitive_action);
    assert_not_reported(&report, &branch);
}

// ============================================================================
// Control-dependency chaining
// ============================================================================

#[test]
fn test_chained_control_dependency() {
    let bomb = chained_bomb();
    let report = detector(bomb.program, TriggerConfig::default()).run().unwrap();

    assert_trigger_count(&report, 1);
    let record = assert_reported(&report, &bomb.b1);
    assert_eq!(record.gated_sensitive_procedure, sms_send());
    assert_evidence_tagged(record, ProvenanceTag::TimeHour);
    assert_not_reported(&report, &bomb.b2);
}

#[test]
fn test_boolean_helper_gates_caller() {
    // boolean isNight() { if (h > 22) return 1; return 0; }
    // onCreate() { r = isNight(); if (r != 0) sendTextMessage(..) }
    let helper = Procedure::new("com.example.Clock", "isNight");
    let main = Procedure::new("com.example.Main", "onCreate");
    let mut builder = ProgramBuilder::new();

    let read = builder.point(&helper, assign("h"));
    let inner = builder.branch(
        &helper,
        compare_local("h", ComparisonOperator::Gt, LiteralConstant::Int(22)),
    );
    let ret_true = builder.point(
        &helper,
        InstructionKind::Return {
            value: Some(ValueRef::constant(LiteralConstant::Int(1))),
        },
    );
    let ret_false = builder.point(
        &helper,
        InstructionKind::Return {
            value: Some(ValueRef::constant(LiteralConstant::Int(0))),
        },
    );
    builder.chain(&[read, inner.point.clone(), ret_true.clone()]);
    builder.flow(&inner.point, &ret_false);
    builder.guard(&inner, &[ret_true]);
    builder.provenance(ValueRef::local("h"), &inner.point, vec![hour_of_day()]);

    let call = builder.call(&main, &helper, Some(ValueRef::local("r")));
    let outer = builder.branch(
        &main,
        compare_local("r", ComparisonOperator::Ne, LiteralConstant::Int(0)),
    );
    let send = builder.call(&main, &sms_send(), None);
    builder.chain(&[call, outer.point.clone(), send.clone()]);
    builder.guard(&outer, &[send]);

    let report = detector(Arc::new(builder.build()), TriggerConfig::default())
        .run()
        .unwrap();

    let record = assert_reported(&report, &inner);
    assert_eq!(record.gated_sensitive_procedure, sms_send());
    assert_not_reported(&report, &outer);
}

#[test]
fn test_sensitive_call_through_wrapper() {
    // if (h > 42) exfiltrate();   exfiltrate() { Runtime.exec(..) }
    let main = Procedure::new("com.example.Main", "onCreate");
    let wrapper = Procedure::new("com.example.Net", "exfiltrate");
    let exec = Procedure::new("java.lang.Runtime", "exec");
    let mut builder = ProgramBuilder::new();

    let entry = builder.point(&main, assign("h"));
    let branch = builder.branch(
        &main,
        compare_local("h", ComparisonOperator::Gt, LiteralConstant::Int(42)),
    );
    let call_wrapper = builder.call(&main, &wrapper, None);
    builder.chain(&[entry, branch.point.clone(), call_wrapper.clone()]);
    builder.guard(&branch, &[call_wrapper]);
    builder.provenance(ValueRef::local("h"), &branch.point, vec![hour_of_day()]);

    let prologue = builder.point(&wrapper, InstructionKind::Other);
    let call_exec = builder.call(&wrapper, &exec, None);
    builder.chain(&[prologue, call_exec]);

    let report = detector(Arc::new(builder.build()), TriggerConfig::default())
        .run()
        .unwrap();

    let record = assert_reported(&report, &branch);
    assert_eq!(record.gated_sensitive_procedure, exec);
    assert_eq!(report.stats.procedures_searched, 1);
}

// ============================================================================
// Multiway dispatch
// ============================================================================

fn switch_bomb(
    literals: &[LiteralConstant],
) -> (Arc<bombsight_core::InMemoryProgram>, BranchInstruction) {
    let main = Procedure::new("com.example.Main", "onCreate");
    let mut builder = ProgramBuilder::new();
    let entry = builder.point(&main, assign("h"));
    let send = builder.call(&main, &sms_send(), None);
    let cases: Vec<SwitchCase> = literals
        .iter()
        .map(|literal| SwitchCase {
            literal: *literal,
            target: send.clone(),
        })
        .collect();
    let branch = builder.branch(&main, |p| {
        BranchInstruction::switch(p, ValueRef::local("h"), cases)
    });
    builder.chain(&[entry, branch.point.clone()]);
    builder.flow(&branch.point, &send);
    builder.guard(&branch, &[send]);
    builder.provenance(ValueRef::local("h"), &branch.point, vec![hour_of_day()]);
    (Arc::new(builder.build()), branch)
}

#[test]
fn test_switch_reported_when_any_case_survives() {
    let (program, branch) = switch_bomb(&[LiteralConstant::Int(-1), LiteralConstant::Int(3)]);
    let report = detector(program, TriggerConfig::default()).run().unwrap();

    let record = assert_reported(&report, &branch);
    assert_eq!(record.evidence, vec![hour_of_day()]);
}

#[test]
fn test_switch_on_sentinel_only_is_suppressed() {
    let (program, branch) = switch_bomb(&[LiteralConstant::Int(-1)]);
    let report = detector(program, TriggerConfig::default()).run().unwrap();
    assert_not_reported(&report, &branch);
}

// ============================================================================
// Path predicates
// ============================================================================

/// Time bomb whose formula is `b1`, with `b1` originating either in a
/// launcher that calls the bomb or in an unrelated procedure
fn guarded_time_bomb(
    origin_on_path: bool,
) -> (Arc<bombsight_core::InMemoryProgram>, BranchInstruction) {
    let mut bomb = TimeBomb::new("com.example.Main", LiteralConstant::Int(42), hour_of_day());
    let debug_check = compare_local("debug", ComparisonOperator::Eq, LiteralConstant::Int(0));

    let guard = if origin_on_path {
        let launcher = Procedure::new("com.example.Launcher", "start");
        let guard = bomb.builder.branch(&launcher, debug_check);
        let call = bomb.builder.call(&launcher, &bomb.procedure, None);
        bomb.builder.flow(&guard.point, &call);
        guard
    } else {
        let unrelated = Procedure::new("com.example.Unrelated", "run");
        bomb.builder.branch(&unrelated, debug_check)
    };

    bomb.builder.literal_origin(1, &guard);
    bomb.builder.formula(PathFormula::new(
        bomb.branch.point.clone(),
        vec![Literal::positive(1)],
    ));
    bomb.build()
}

#[test]
fn test_consistent_formula_is_attached() {
    let (program, branch) = guarded_time_bomb(true);
    let report = detector(program, TriggerConfig::default()).run().unwrap();

    let record = assert_reported(&report, &branch);
    assert!(record.predicate_consistent);
    assert_eq!(
        record.path_predicate.as_ref().map(|f| f.to_string()),
        Some("b1".to_string())
    );
    assert_eq!(report.stats.inconsistent_predicates, 0);
}

#[test]
fn test_inconsistent_formula_is_detached() {
    let (program, branch) = guarded_time_bomb(false);
    let report = detector(program, TriggerConfig::default()).run().unwrap();

    let record = assert_reported(&report, &branch);
    assert!(!record.predicate_consistent);
    assert!(record.path_predicate.is_none());
    assert_eq!(report.stats.inconsistent_predicates, 1);
}

#[test]
fn test_inconsistent_formula_drops_record_when_required() {
    let (program, branch) = guarded_time_bomb(false);
    let config = TriggerConfig::default().require_consistent_predicate(true);
    let report = detector(program, config).run().unwrap();

    assert_not_reported(&report, &branch);
    assert_eq!(report.stats.dropped_inconsistent, 1);
}

#[test]
fn test_unverified_formula_attached_as_recovered() {
    let (program, branch) = guarded_time_bomb(false);
    let config = TriggerConfig::default().verify_path_predicates(false);
    let report = detector(program, config).run().unwrap();

    let record = assert_reported(&report, &branch);
    assert!(record.path_predicate.is_some());
    assert_eq!(report.stats.inconsistent_predicates, 0);
}

// ============================================================================
// Report DTO
// ============================================================================

#[test]
fn test_report_dto_from_run() {
    let bomb = chained_bomb();
    let report = detector(bomb.program, TriggerConfig::default()).run().unwrap();
    let dto = TriggerReportDTO::from(&report);

    assert_eq!(dto.triggers.len(), 1);
    assert_eq!(dto.triggers[0].procedure, "<com.example.Alarm: onReceive>");
    assert_eq!(dto.triggers[0].tags, vec!["TIME.HOUR".to_string()]);
    assert_eq!(dto.stats.branches_classified, 2);

    let json = dto.to_json().unwrap();
    assert_eq!(TriggerReportDTO::from_json(&json).unwrap(), dto);
}
