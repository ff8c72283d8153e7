//! Issue data model shared by every schema engine implementation
//!
//! An [`Issue`] is one atomic validation failure, tagged with the path of the
//! offending value and a machine-readable code. Code-specific details
//! (minimum/maximum bounds, the received type, enum options) live on the
//! [`IssueKind`] variant for that code rather than on a single loosely-typed
//! struct with many optional fields.
//!
//! Copyright (c) 2025 Formspec Team
//! Licensed under the Apache-2.0 license

use serde::{Deserialize, Serialize};
use std::fmt;

/// One segment of a value path: an object key or an array index.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PathSegment {
    /// Array index, rendered as its decimal string form in dotted field names
    Index(usize),
    /// Object key
    Key(String),
}

impl fmt::Display for PathSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathSegment::Index(i) => write!(f, "{}", i),
            PathSegment::Key(k) => write!(f, "{}", k),
        }
    }
}

impl From<&str> for PathSegment {
    fn from(key: &str) -> Self {
        PathSegment::Key(key.to_string())
    }
}

impl From<String> for PathSegment {
    fn from(key: String) -> Self {
        PathSegment::Key(key)
    }
}

impl From<usize> for PathSegment {
    fn from(index: usize) -> Self {
        PathSegment::Index(index)
    }
}

/// Code-specific detail of an issue, tagged by the machine code
///
/// Serialized with the code inline (`{"code": "too_small", "minimum": 3}`),
/// matching the wire shape emitted by the schema engines this layer consumes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "code", rename_all = "snake_case")]
pub enum IssueKind {
    /// Value has the wrong primitive type, or a required value is missing
    /// (`received` is `"undefined"` in that case)
    InvalidType { expected: String, received: String },
    /// Value does not equal a required literal
    InvalidLiteral { expected: String },
    /// Object carries keys the schema does not know
    UnrecognizedKeys { keys: Vec<String> },
    /// Value matched none of the union branches
    InvalidUnion,
    /// Value is not one of the allowed enum options
    InvalidEnumValue { options: Vec<String>, received: String },
    /// Value is not a parseable date
    InvalidDate,
    /// String failed a format check (email, url, regex, ...)
    InvalidString { validation: String },
    /// Value is under the allowed minimum (length, size, or count)
    TooSmall {
        minimum: f64,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        exact: Option<f64>,
    },
    /// Value is over the allowed maximum (length, size, or count)
    TooBig {
        maximum: f64,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        exact: Option<f64>,
    },
    /// Number is not a multiple of the required step
    NotMultipleOf { multiple_of: f64 },
    /// Number is NaN or infinite
    NotFinite,
    /// Engine- or caller-defined check failed
    Custom,
}

impl IssueKind {
    /// The machine code for this kind, identical to its serialized `code` tag.
    pub fn code(&self) -> &'static str {
        match self {
            IssueKind::InvalidType { .. } => "invalid_type",
            IssueKind::InvalidLiteral { .. } => "invalid_literal",
            IssueKind::UnrecognizedKeys { .. } => "unrecognized_keys",
            IssueKind::InvalidUnion => "invalid_union",
            IssueKind::InvalidEnumValue { .. } => "invalid_enum_value",
            IssueKind::InvalidDate => "invalid_date",
            IssueKind::InvalidString { .. } => "invalid_string",
            IssueKind::TooSmall { .. } => "too_small",
            IssueKind::TooBig { .. } => "too_big",
            IssueKind::NotMultipleOf { .. } => "not_multiple_of",
            IssueKind::NotFinite => "not_finite",
            IssueKind::Custom => "custom",
        }
    }
}

/// One atomic validation failure reported by a schema engine
///
/// Issues are immutable once produced; downstream layers only read them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Issue {
    /// Path of the offending value, empty for object-level failures
    pub path: Vec<PathSegment>,
    /// Code-specific detail
    #[serde(flatten)]
    pub kind: IssueKind,
    /// Engine-supplied human-readable default message
    pub message: String,
}

impl Issue {
    /// Create an issue at the given path.
    pub fn new<M: Into<String>>(path: Vec<PathSegment>, kind: IssueKind, message: M) -> Self {
        Self {
            path,
            kind,
            message: message.into(),
        }
    }

    /// Create an object-level issue with an empty path.
    pub fn at_root<M: Into<String>>(kind: IssueKind, message: M) -> Self {
        Self::new(Vec::new(), kind, message)
    }

    /// The machine code of this issue.
    pub fn code(&self) -> &'static str {
        self.kind.code()
    }

    /// Re-root the issue under a path prefix.
    ///
    /// Used by composing schemas that validate a nested value and need the
    /// resulting issues addressed from the enclosing object.
    pub fn prefixed(mut self, prefix: &[PathSegment]) -> Self {
        let mut path = prefix.to_vec();
        path.append(&mut self.path);
        self.path = path;
        self
    }
}
