//! Shared models

mod branch;
mod constant;
mod predicate;
mod program;
mod symbolic;

pub use branch::{BranchCondition, BranchInstruction, Comparison, ComparisonOperator, SwitchCase};
pub use constant::LiteralConstant;
pub use predicate::{Literal, PathFormula};
pub use program::{InstructionKind, Procedure, ProgramPoint, ValueRef};
pub use symbolic::{
    BinaryOperator, ProvenanceTag, SymbolicKind, SymbolicOperand, SymbolicValue, TagFamily,
};
