//! Branch instructions
//!
//! Two-way comparisons and multiway dispatches, normalised to a list of
//! binary comparisons for analysis.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::constant::LiteralConstant;
use super::program::{Procedure, ProgramPoint, ValueRef};

/// Comparison operator of a two-way branch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ComparisonOperator {
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
}

impl ComparisonOperator {
    pub fn symbol(self) -> &'static str {
        match self {
            Self::Eq => "==",
            Self::Ne => "!=",
            Self::Lt => "<",
            Self::Le => "<=",
            Self::Gt => ">",
            Self::Ge => ">=",
        }
    }
}

/// One `case literal: goto target` arm of a multiway dispatch
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SwitchCase {
    pub literal: LiteralConstant,
    pub target: ProgramPoint,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum BranchCondition {
    Compare {
        operator: ComparisonOperator,
        left: ValueRef,
        right: ValueRef,
    },
    Switch {
        key: ValueRef,
        cases: Vec<SwitchCase>,
    },
}

/// Normalised binary comparison `operand_a <op> operand_b`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Comparison {
    pub operator: ComparisonOperator,
    pub operand_a: ValueRef,
    pub operand_b: ValueRef,
}

/// Conditional branch at a program point
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BranchInstruction {
    pub point: ProgramPoint,
    pub condition: BranchCondition,
}

impl BranchInstruction {
    pub fn compare(
        point: ProgramPoint,
        operator: ComparisonOperator,
        left: ValueRef,
        right: ValueRef,
    ) -> Self {
        Self {
            point,
            condition: BranchCondition::Compare {
                operator,
                left,
                right,
            },
        }
    }

    pub fn switch(point: ProgramPoint, key: ValueRef, cases: Vec<SwitchCase>) -> Self {
        Self {
            point,
            condition: BranchCondition::Switch { key, cases },
        }
    }

    /// Comparisons equivalent to this branch.
    ///
    /// A two-way branch yields itself; a multiway dispatch yields
    /// `key == literal` for every case, in case order.
    pub fn comparisons(&self) -> Vec<Comparison> {
        match &self.condition {
            BranchCondition::Compare {
                operator,
                left,
                right,
            } => vec![Comparison {
                operator: *operator,
                operand_a: left.clone(),
                operand_b: right.clone(),
            }],
            BranchCondition::Switch { key, cases } => cases
                .iter()
                .map(|case| Comparison {
                    operator: ComparisonOperator::Eq,
                    operand_a: key.clone(),
                    operand_b: ValueRef::Constant(case.literal),
                })
                .collect(),
        }
    }

    pub fn operands(&self) -> Vec<&ValueRef> {
        match &self.condition {
            BranchCondition::Compare { left, right, .. } => vec![left, right],
            BranchCondition::Switch { key, .. } => vec![key],
        }
    }

    /// Whether `value`, defined in `scope`, is an operand of this branch
    pub fn uses(&self, value: &ValueRef, scope: &Procedure) -> bool {
        self.operands()
            .into_iter()
            .any(|operand| operand.same_storage(&self.point.procedure, value, scope))
    }

    pub fn procedure(&self) -> &Procedure {
        &self.point.procedure
    }

    pub fn declaring_type(&self) -> &str {
        self.point.declaring_type()
    }
}

impl fmt::Display for BranchInstruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.condition {
            BranchCondition::Compare {
                operator,
                left,
                right,
            } => write!(f, "if {} {} {}", left, operator.symbol(), right),
            BranchCondition::Switch { key, cases } => {
                let labels: Vec<String> = cases.iter().map(|c| c.literal.to_string()).collect();
                write!(f, "switch {} [{}]", key, labels.join(", "))
            }
        }
    }
}
