//! Typed literal constants
//!
//! Constants compare by type and value. Floating point payloads compare by
//! bit pattern so constants can key hash maps and ordered maps.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};

/// Immutable constant carried by value (int / long / float / double / null)
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "lowercase")]
pub enum LiteralConstant {
    Int(i32),
    Long(i64),
    Float(f32),
    Double(f64),
    Null,
}

impl LiteralConstant {
    fn type_rank(&self) -> u8 {
        match self {
            Self::Int(_) => 0,
            Self::Long(_) => 1,
            Self::Float(_) => 2,
            Self::Double(_) => 3,
            Self::Null => 4,
        }
    }

    /// Int or long
    pub fn is_integral(&self) -> bool {
        matches!(self, Self::Int(_) | Self::Long(_))
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Type-appropriate zero. `null` is the reference-typed zero.
    pub fn is_zero(&self) -> bool {
        match *self {
            Self::Int(v) => v == 0,
            Self::Long(v) => v == 0,
            Self::Float(v) => v == 0.0,
            Self::Double(v) => v == 0.0,
            Self::Null => true,
        }
    }

    /// Type-appropriate `-1`
    pub fn is_minus_one(&self) -> bool {
        match *self {
            Self::Int(v) => v == -1,
            Self::Long(v) => v == -1,
            Self::Float(v) => v == -1.0,
            Self::Double(v) => v == -1.0,
            Self::Null => false,
        }
    }

    /// Integer literal `-1` (int or long)
    pub fn is_integral_minus_one(&self) -> bool {
        self.is_integral() && self.is_minus_one()
    }

    /// Bytecode booleans are ints restricted to 0 / 1
    pub fn is_boolean_shaped(&self) -> bool {
        matches!(self, Self::Int(0) | Self::Int(1))
    }
}

impl PartialEq for LiteralConstant {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Int(a), Self::Int(b)) => a == b,
            (Self::Long(a), Self::Long(b)) => a == b,
            (Self::Float(a), Self::Float(b)) => a.to_bits() == b.to_bits(),
            (Self::Double(a), Self::Double(b)) => a.to_bits() == b.to_bits(),
            (Self::Null, Self::Null) => true,
            _ => false,
        }
    }
}

impl Eq for LiteralConstant {}

impl Hash for LiteralConstant {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.type_rank().hash(state);
        match *self {
            Self::Int(v) => v.hash(state),
            Self::Long(v) => v.hash(state),
            Self::Float(v) => v.to_bits().hash(state),
            Self::Double(v) => v.to_bits().hash(state),
            Self::Null => {}
        }
    }
}

impl Ord for LiteralConstant {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Self::Int(a), Self::Int(b)) => a.cmp(b),
            (Self::Long(a), Self::Long(b)) => a.cmp(b),
            (Self::Float(a), Self::Float(b)) => a.total_cmp(b),
            (Self::Double(a), Self::Double(b)) => a.total_cmp(b),
            _ => self.type_rank().cmp(&other.type_rank()),
        }
    }
}

impl PartialOrd for LiteralConstant {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for LiteralConstant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(v) => write!(f, "{}", v),
            Self::Long(v) => write!(f, "{}L", v),
            Self::Float(v) => write!(f, "{}f", v),
            Self::Double(v) => write!(f, "{}d", v),
            Self::Null => write!(f, "null"),
        }
    }
}
