//! Schema engine contract
//!
//! The validation layer does not define a schema language of its own. It
//! consumes any engine that can take a JSON value and either return the
//! validated value or fail with a structured list of [`Issue`]s. This module
//! is that observed contract: the [`Schema`] trait, the issue data model, and
//! the two failure shapes downstream code distinguishes.
//!
//! Everything that is not the structured shape is an *unclassified* failure:
//! it still surfaces as an invalid result, but carries no field-level detail.
//!
//! Copyright (c) 2025 Formspec Team
//! Licensed under the Apache-2.0 license

pub mod issue;
pub mod jsonschema;

pub use self::issue::{Issue, IssueKind, PathSegment};
pub use self::jsonschema::JsonSchema;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// Structured failure produced by a schema engine: an ordered list of issues
/// plus a summary message.
#[derive(Debug, Clone, PartialEq, Error, Serialize, Deserialize)]
#[error("{message}")]
pub struct SchemaFailure {
    /// Issues in the order the engine emitted them
    pub issues: Vec<Issue>,
    /// Engine-level summary of the failure
    pub message: String,
}

impl SchemaFailure {
    /// Create a failure with a generated summary message.
    pub fn new(issues: Vec<Issue>) -> Self {
        let message = match issues.len() {
            1 => "Validation failed with 1 issue".to_string(),
            n => format!("Validation failed with {} issues", n),
        };
        Self { issues, message }
    }

    /// Create a failure with an explicit summary message.
    pub fn with_message<M: Into<String>>(issues: Vec<Issue>, message: M) -> Self {
        Self {
            issues,
            message: message.into(),
        }
    }

    /// Number of issues in this failure.
    pub fn issue_count(&self) -> usize {
        self.issues.len()
    }
}

/// Failure of a [`Schema::parse`] call
///
/// Callers gate field-level error handling on the [`ParseError::Schema`]
/// variant; anything else degrades to a generic, field-less invalid result.
#[derive(Debug, Error)]
pub enum ParseError {
    /// The engine's structured failure shape
    #[error(transparent)]
    Schema(#[from] SchemaFailure),

    /// Any other engine failure; carries no field-level detail
    #[error("unclassified schema engine failure: {message}")]
    Unclassified {
        message: String,
        #[source]
        source: Option<anyhow::Error>,
    },
}

impl ParseError {
    /// Create an unclassified failure from a bare message.
    pub fn unclassified<M: Into<String>>(message: M) -> Self {
        ParseError::Unclassified {
            message: message.into(),
            source: None,
        }
    }

    /// The structured failure, if this is one.
    pub fn as_schema_failure(&self) -> Option<&SchemaFailure> {
        match self {
            ParseError::Schema(failure) => Some(failure),
            ParseError::Unclassified { .. } => None,
        }
    }
}

/// A validating schema
///
/// `parse` returns the validated value on success. Implementations that
/// normalize or coerce may return a value different from the input; plain
/// validators return the input unchanged.
pub trait Schema: Send + Sync {
    /// Validate `data`, returning the validated value or a failure.
    fn parse(&self, data: &Value) -> Result<Value, ParseError>;

    /// Whether `data` passes validation.
    fn is_valid(&self, data: &Value) -> bool {
        self.parse(data).is_ok()
    }
}

/// Adapter turning a closure into a [`Schema`].
///
/// Useful for inline fragments and test doubles:
///
/// ```
/// use formspec_schemas::engine::{schema_fn, Schema};
/// use serde_json::{json, Value};
///
/// let any = schema_fn(|data: &Value| Ok(data.clone()));
/// assert!(any.is_valid(&json!({"anything": true})));
/// ```
pub struct SchemaFn<F>(F);

impl<F> Schema for SchemaFn<F>
where
    F: Fn(&Value) -> Result<Value, ParseError> + Send + Sync,
{
    fn parse(&self, data: &Value) -> Result<Value, ParseError> {
        (self.0)(data)
    }
}

/// Wrap a closure as a [`Schema`].
pub fn schema_fn<F>(f: F) -> SchemaFn<F>
where
    F: Fn(&Value) -> Result<Value, ParseError> + Send + Sync,
{
    SchemaFn(f)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_schema_failure_summary() {
        let failure = SchemaFailure::new(vec![Issue::at_root(IssueKind::Custom, "bad")]);
        assert_eq!(failure.message, "Validation failed with 1 issue");
        assert_eq!(failure.issue_count(), 1);

        let failure = SchemaFailure::new(vec![
            Issue::at_root(IssueKind::Custom, "bad"),
            Issue::at_root(IssueKind::InvalidUnion, "worse"),
        ]);
        assert_eq!(failure.message, "Validation failed with 2 issues");
    }

    #[test]
    fn test_parse_error_classification() {
        let schema_err = ParseError::Schema(SchemaFailure::new(vec![]));
        assert!(schema_err.as_schema_failure().is_some());

        let other = ParseError::unclassified("engine exploded");
        assert!(other.as_schema_failure().is_none());
        assert!(other.to_string().contains("engine exploded"));
    }

    #[test]
    fn test_schema_fn_rejects() {
        let never = schema_fn(|_: &Value| {
            Err(ParseError::Schema(SchemaFailure::new(vec![Issue::at_root(
                IssueKind::Custom,
                "always fails",
            )])))
        });
        assert!(!never.is_valid(&json!({})));
    }
}
