//! Program entities (procedures, program points, value references)
//!
//! These are the identities the detection engine exchanges with its
//! collaborators. They carry no graph structure of their own.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};

use super::constant::LiteralConstant;

/// A procedure (method) identified by declaring type and name
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Procedure {
    /// Fully qualified declaring type (e.g. `com.example.Payload`)
    pub declaring_type: String,

    /// Method name, optionally with a descriptor suffix
    pub name: String,
}

impl Procedure {
    pub fn new(declaring_type: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            declaring_type: declaring_type.into(),
            name: name.into(),
        }
    }

    /// Soot-style signature `<Type: name>`
    pub fn signature(&self) -> String {
        format!("<{}: {}>", self.declaring_type, self.name)
    }
}

impl fmt::Display for Procedure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<{}: {}>", self.declaring_type, self.name)
    }
}

/// One instruction in one procedure
///
/// Identity is `(procedure, index)`. The source line is best-effort metadata
/// and does not take part in equality, hashing or ordering.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProgramPoint {
    pub procedure: Procedure,
    pub index: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line: Option<u32>,
}

impl ProgramPoint {
    pub fn new(procedure: Procedure, index: u32) -> Self {
        Self {
            procedure,
            index,
            line: None,
        }
    }

    pub fn with_line(mut self, line: u32) -> Self {
        self.line = Some(line);
        self
    }

    pub fn declaring_procedure(&self) -> &Procedure {
        &self.procedure
    }

    pub fn declaring_type(&self) -> &str {
        &self.procedure.declaring_type
    }
}

impl PartialEq for ProgramPoint {
    fn eq(&self, other: &Self) -> bool {
        self.index == other.index && self.procedure == other.procedure
    }
}

impl Eq for ProgramPoint {}

impl Hash for ProgramPoint {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.procedure.hash(state);
        self.index.hash(state);
    }
}

impl Ord for ProgramPoint {
    fn cmp(&self, other: &Self) -> Ordering {
        self.procedure
            .cmp(&other.procedure)
            .then(self.index.cmp(&other.index))
    }
}

impl PartialOrd for ProgramPoint {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for ProgramPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.line {
            Some(line) => write!(f, "{}#{} (line {})", self.procedure, self.index, line),
            None => write!(f, "{}#{}", self.procedure, self.index),
        }
    }
}

/// Reference to a program value used at a program point
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueRef {
    /// Local variable, scoped to the procedure that uses it
    Local(String),

    /// Static or instance field
    Field {
        declaring_type: String,
        name: String,
    },

    Constant(LiteralConstant),
}

impl ValueRef {
    pub fn local(name: impl Into<String>) -> Self {
        Self::Local(name.into())
    }

    pub fn field(declaring_type: impl Into<String>, name: impl Into<String>) -> Self {
        Self::Field {
            declaring_type: declaring_type.into(),
            name: name.into(),
        }
    }

    pub fn constant(value: LiteralConstant) -> Self {
        Self::Constant(value)
    }

    pub fn as_constant(&self) -> Option<&LiteralConstant> {
        match self {
            Self::Constant(c) => Some(c),
            _ => None,
        }
    }

    pub fn is_constant(&self) -> bool {
        matches!(self, Self::Constant(_))
    }

    /// Whether `self` used in `scope` and `other` used in `other_scope`
    /// denote the same storage location.
    ///
    /// Locals only alias within one procedure; fields alias program-wide;
    /// constants are not storage.
    pub fn same_storage(
        &self,
        scope: &Procedure,
        other: &ValueRef,
        other_scope: &Procedure,
    ) -> bool {
        match (self, other) {
            (Self::Local(a), Self::Local(b)) => a == b && scope == other_scope,
            (Self::Field { .. }, Self::Field { .. }) => self == other,
            _ => false,
        }
    }
}

impl fmt::Display for ValueRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Local(name) => write!(f, "{}", name),
            Self::Field {
                declaring_type,
                name,
            } => write!(f, "{}.{}", declaring_type, name),
            Self::Constant(c) => write!(f, "{}", c),
        }
    }
}

/// The ICFG's view of what an instruction does
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum InstructionKind {
    Assign { target: ValueRef },
    Invoke { result: Option<ValueRef> },
    Return { value: Option<ValueRef> },
    Branch,
    Other,
}

impl InstructionKind {
    /// Value written by this instruction, if any
    pub fn defined_value(&self) -> Option<&ValueRef> {
        match self {
            Self::Assign { target } => Some(target),
            Self::Invoke { result } => result.as_ref(),
            _ => None,
        }
    }

    /// `return 0` / `return 1`
    pub fn returns_boolean_constant(&self) -> bool {
        match self {
            Self::Return {
                value: Some(ValueRef::Constant(c)),
            } => c.is_boolean_shaped(),
            _ => false,
        }
    }
}
