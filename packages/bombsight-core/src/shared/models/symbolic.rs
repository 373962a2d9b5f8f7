//! Symbolic values and provenance tags
//!
//! Symbolic values are produced by the provenance engine. The detection core
//! only looks at the variant kind and the attached tag set.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use super::constant::LiteralConstant;
use super::program::ValueRef;

// ============================================================================
// Provenance tags
// ============================================================================

/// Family a provenance tag belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TagFamily {
    Time,
    Location,
    Sms,
    Suspicious,
}

impl TagFamily {
    pub const ALL: [TagFamily; 4] = [Self::Time, Self::Location, Self::Sms, Self::Suspicious];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Time => "time",
            Self::Location => "location",
            Self::Sms => "sms",
            Self::Suspicious => "suspicious",
        }
    }
}

impl fmt::Display for TagFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Closed provenance taxonomy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ProvenanceTag {
    #[serde(rename = "TIME.SECOND")]
    TimeSecond,
    #[serde(rename = "TIME.MINUTE")]
    TimeMinute,
    #[serde(rename = "TIME.HOUR")]
    TimeHour,
    #[serde(rename = "TIME.MONTH")]
    TimeMonth,
    #[serde(rename = "TIME.YEAR")]
    TimeYear,
    #[serde(rename = "TIME.EPOCH_MILLIS")]
    TimeEpochMillis,
    #[serde(rename = "TIME.GENERIC")]
    TimeGeneric,
    #[serde(rename = "LOCATION.LATITUDE")]
    LocationLatitude,
    #[serde(rename = "LOCATION.LONGITUDE")]
    LocationLongitude,
    #[serde(rename = "LOCATION.GENERIC")]
    LocationGeneric,
    #[serde(rename = "SMS.SENDER")]
    SmsSender,
    #[serde(rename = "SMS.BODY")]
    SmsBody,
    #[serde(rename = "SMS.GENERIC")]
    SmsGeneric,
    /// Catch-all for tainted sources outside the other families
    #[serde(rename = "SUSPICIOUS.GENERIC")]
    SuspiciousGeneric,
}

impl ProvenanceTag {
    pub const ALL: [ProvenanceTag; 14] = [
        Self::TimeSecond,
        Self::TimeMinute,
        Self::TimeHour,
        Self::TimeMonth,
        Self::TimeYear,
        Self::TimeEpochMillis,
        Self::TimeGeneric,
        Self::LocationLatitude,
        Self::LocationLongitude,
        Self::LocationGeneric,
        Self::SmsSender,
        Self::SmsBody,
        Self::SmsGeneric,
        Self::SuspiciousGeneric,
    ];

    pub fn family(self) -> TagFamily {
        match self {
            Self::TimeSecond
            | Self::TimeMinute
            | Self::TimeHour
            | Self::TimeMonth
            | Self::TimeYear
            | Self::TimeEpochMillis
            | Self::TimeGeneric => TagFamily::Time,
            Self::LocationLatitude | Self::LocationLongitude | Self::LocationGeneric => {
                TagFamily::Location
            }
            Self::SmsSender | Self::SmsBody | Self::SmsGeneric => TagFamily::Sms,
            Self::SuspiciousGeneric => TagFamily::Suspicious,
        }
    }

    pub fn is_generic_suspicious(self) -> bool {
        self == Self::SuspiciousGeneric
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::TimeSecond => "TIME.SECOND",
            Self::TimeMinute => "TIME.MINUTE",
            Self::TimeHour => "TIME.HOUR",
            Self::TimeMonth => "TIME.MONTH",
            Self::TimeYear => "TIME.YEAR",
            Self::TimeEpochMillis => "TIME.EPOCH_MILLIS",
            Self::TimeGeneric => "TIME.GENERIC",
            Self::LocationLatitude => "LOCATION.LATITUDE",
            Self::LocationLongitude => "LOCATION.LONGITUDE",
            Self::LocationGeneric => "LOCATION.GENERIC",
            Self::SmsSender => "SMS.SENDER",
            Self::SmsBody => "SMS.BODY",
            Self::SmsGeneric => "SMS.GENERIC",
            Self::SuspiciousGeneric => "SUSPICIOUS.GENERIC",
        }
    }
}

impl FromStr for ProvenanceTag {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|tag| tag.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("Unknown provenance tag '{}'", s))
    }
}

impl fmt::Display for ProvenanceTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Symbolic values
// ============================================================================

/// Operator of a symbolic binary expression
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BinaryOperator {
    Add,
    Sub,
    Mul,
    Div,
    Rem,
    And,
    Or,
    Xor,
    Shl,
    Shr,
    Ushr,
    /// Three-way compare (`cmp-long`, `cmpl-*`, `cmpg-*`)
    Cmp,
}

impl BinaryOperator {
    pub fn symbol(self) -> &'static str {
        match self {
            Self::Add => "+",
            Self::Sub => "-",
            Self::Mul => "*",
            Self::Div => "/",
            Self::Rem => "%",
            Self::And => "&",
            Self::Or => "|",
            Self::Xor => "^",
            Self::Shl => "<<",
            Self::Shr => ">>",
            Self::Ushr => ">>>",
            Self::Cmp => "cmp",
        }
    }
}

/// Operand of a symbolic binary expression
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SymbolicOperand {
    Value(ValueRef),
    Symbolic(Box<SymbolicValue>),
}

impl SymbolicOperand {
    /// Literal constant behind this operand, looking through both shapes
    pub fn as_constant(&self) -> Option<&LiteralConstant> {
        match self {
            Self::Value(v) => v.as_constant(),
            Self::Symbolic(s) => s.as_constant(),
        }
    }
}

impl fmt::Display for SymbolicOperand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Value(v) => write!(f, "{}", v),
            Self::Symbolic(s) => write!(f, "{}", s.kind),
        }
    }
}

/// Variant kind of a symbolic value
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SymbolicKind {
    Constant(LiteralConstant),
    BinaryOp {
        left: SymbolicOperand,
        operator: BinaryOperator,
        right: SymbolicOperand,
    },
    /// Any other engine-specific shape (method results, fields, ...)
    Opaque(String),
}

impl fmt::Display for SymbolicKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Constant(c) => write!(f, "{}", c),
            Self::BinaryOp {
                left,
                operator,
                right,
            } => write!(f, "({} {} {})", left, operator.symbol(), right),
            Self::Opaque(description) => f.write_str(description),
        }
    }
}

/// Symbolic value with its provenance tag set
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SymbolicValue {
    pub kind: SymbolicKind,
    #[serde(default)]
    pub tags: BTreeSet<ProvenanceTag>,
}

impl SymbolicValue {
    pub fn new(kind: SymbolicKind) -> Self {
        Self {
            kind,
            tags: BTreeSet::new(),
        }
    }

    pub fn constant(value: LiteralConstant) -> Self {
        Self::new(SymbolicKind::Constant(value))
    }

    pub fn binary(left: SymbolicOperand, operator: BinaryOperator, right: SymbolicOperand) -> Self {
        Self::new(SymbolicKind::BinaryOp {
            left,
            operator,
            right,
        })
    }

    pub fn opaque(description: impl Into<String>) -> Self {
        Self::new(SymbolicKind::Opaque(description.into()))
    }

    pub fn with_tag(mut self, tag: ProvenanceTag) -> Self {
        self.tags.insert(tag);
        self
    }

    pub fn with_tags(mut self, tags: impl IntoIterator<Item = ProvenanceTag>) -> Self {
        self.tags.extend(tags);
        self
    }

    pub fn has_any_tag(&self) -> bool {
        !self.tags.is_empty()
    }

    pub fn has_tag(&self, tag: ProvenanceTag) -> bool {
        self.tags.contains(&tag)
    }

    /// Carries at least one tag from one of `families`
    pub fn has_tag_in(&self, families: &[TagFamily]) -> bool {
        self.tags.iter().any(|tag| families.contains(&tag.family()))
    }

    pub fn as_constant(&self) -> Option<&LiteralConstant> {
        match &self.kind {
            SymbolicKind::Constant(c) => Some(c),
            _ => None,
        }
    }

    /// Right-hand side of a binary expression
    pub fn binary_right(&self) -> Option<&SymbolicOperand> {
        match &self.kind {
            SymbolicKind::BinaryOp { right, .. } => Some(right),
            _ => None,
        }
    }
}

impl fmt::Display for SymbolicValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.kind)?;
        if !self.tags.is_empty() {
            let tags: Vec<&str> = self.tags.iter().map(|t| t.as_str()).collect();
            write!(f, " [{}]", tags.join(", "))?;
        }
        Ok(())
    }
}
