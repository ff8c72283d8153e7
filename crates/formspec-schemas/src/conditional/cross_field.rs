//! Cross-field checks for object-level refinement
//!
//! Copyright (c) 2025 Formspec Team
//! Licensed under the Apache-2.0 license

use super::{field_segments, nested_value};
use crate::engine::{Issue, IssueKind, ParseError, Schema, SchemaFailure};
use serde_json::Value;
use std::sync::Arc;

/// A named predicate over several fields' current values.
///
/// The check reads each field (one level of dotted nesting supported,
/// missing fields read as null) and hands the values to the predicate in
/// declaration order. It does not execute validation by itself; plug it into
/// [`refined`] to attach a failing check to a field path.
pub struct CrossFieldCheck {
    fields: Vec<String>,
    predicate: Box<dyn Fn(&[Value]) -> bool + Send + Sync>,
}

/// Build a [`CrossFieldCheck`].
///
/// ```
/// use formspec_schemas::conditional::cross_field_check;
/// use serde_json::json;
///
/// let check = cross_field_check(
///     ["password", "confirmPassword"],
///     |values| values[0] == values[1],
/// );
/// assert!(check.evaluate(&json!({"password": "x", "confirmPassword": "x"})));
/// assert!(!check.evaluate(&json!({"password": "x", "confirmPassword": "y"})));
/// ```
pub fn cross_field_check<I, S, P>(fields: I, predicate: P) -> CrossFieldCheck
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
    P: Fn(&[Value]) -> bool + Send + Sync + 'static,
{
    CrossFieldCheck {
        fields: fields.into_iter().map(Into::into).collect(),
        predicate: Box::new(predicate),
    }
}

impl CrossFieldCheck {
    /// The fields this check reads, in the order the predicate receives them.
    pub fn fields(&self) -> &[String] {
        &self.fields
    }

    /// Evaluate the predicate against the current data.
    pub fn evaluate(&self, data: &Value) -> bool {
        let values: Vec<Value> = self
            .fields
            .iter()
            .map(|field| nested_value(data, field).cloned().unwrap_or(Value::Null))
            .collect();
        (self.predicate)(&values)
    }
}

/// Object-level refinement: the base schema plus a [`CrossFieldCheck`] whose
/// failure attaches a `custom` issue at the caller-specified field path.
///
/// The check only runs when the base schema accepts the data, so refinement
/// messages never pile on top of structural errors for the same field.
pub struct Refined {
    base: Arc<dyn Schema>,
    check: CrossFieldCheck,
    message: String,
    attach_to: String,
}

/// Build a [`Refined`] schema.
pub fn refined<M, A>(base: Arc<dyn Schema>, check: CrossFieldCheck, message: M, attach_to: A) -> Refined
where
    M: Into<String>,
    A: Into<String>,
{
    Refined {
        base,
        check,
        message: message.into(),
        attach_to: attach_to.into(),
    }
}

impl Schema for Refined {
    fn parse(&self, data: &Value) -> Result<Value, ParseError> {
        let parsed = self.base.parse(data)?;
        if self.check.evaluate(data) {
            Ok(parsed)
        } else {
            let issue = Issue::new(
                field_segments(&self.attach_to),
                IssueKind::Custom,
                self.message.clone(),
            );
            Err(ParseError::Schema(SchemaFailure::new(vec![issue])))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::{schema_fn, PathSegment};
    use serde_json::json;

    fn passthrough() -> Arc<dyn Schema> {
        Arc::new(schema_fn(|value: &Value| Ok(value.clone())))
    }

    #[test]
    fn test_check_reads_dotted_fields_as_null_when_missing() {
        let check = cross_field_check(["name.en", "name.he"], |values| {
            values.iter().all(|v| !v.is_null())
        });
        assert!(check.evaluate(&json!({"name": {"en": "a", "he": "b"}})));
        assert!(!check.evaluate(&json!({"name": {"en": "a"}})));
    }

    #[test]
    fn test_refined_attaches_issue_at_named_field() {
        let check = cross_field_check(["password", "confirmPassword"], |values| {
            values[0] == values[1]
        });
        let schema = refined(
            passthrough(),
            check,
            "Passwords must match",
            "confirmPassword",
        );

        assert!(schema.is_valid(&json!({"password": "a", "confirmPassword": "a"})));

        let err = schema
            .parse(&json!({"password": "a", "confirmPassword": "b"}))
            .unwrap_err();
        let failure = err.as_schema_failure().unwrap();
        assert_eq!(failure.issues.len(), 1);
        assert_eq!(failure.issues[0].code(), "custom");
        assert_eq!(failure.issues[0].message, "Passwords must match");
        assert_eq!(
            failure.issues[0].path,
            vec![PathSegment::from("confirmPassword")]
        );
    }

    #[test]
    fn test_refined_skips_check_when_base_rejects() {
        let base: Arc<dyn Schema> = Arc::new(schema_fn(|_: &Value| {
            Err(ParseError::Schema(SchemaFailure::new(vec![Issue::at_root(
                IssueKind::Custom,
                "structural",
            )])))
        }));
        let check = cross_field_check(["a", "b"], |_| false);
        let schema = refined(base, check, "never reached", "b");

        let err = schema.parse(&json!({})).unwrap_err();
        let failure = err.as_schema_failure().unwrap();
        assert_eq!(failure.issues[0].message, "structural");
    }
}
