//! Conditionally-required field combinators
//!
//! Copyright (c) 2025 Formspec Team
//! Licensed under the Apache-2.0 license

use super::{field_segments, nested_value};
use crate::engine::{Issue, IssueKind, ParseError, Schema, SchemaFailure};
use serde_json::Value;
use std::sync::Arc;

/// Object-level schema that requires a field exactly when a dependent field
/// holds a given value.
///
/// When the condition holds and the target field is missing (or null, or an
/// empty string), a `custom` issue is attached at the target field's path.
/// When the target is present, the base schema validates it regardless of
/// the condition, so an optional-but-filled field is still checked.
pub struct RequiredIf {
    field: String,
    dependent_field: String,
    required_value: Value,
    base: Arc<dyn Schema>,
}

/// Build a [`RequiredIf`] combinator.
///
/// ```
/// use formspec_schemas::conditional::required_if;
/// use formspec_schemas::engine::{schema_fn, Schema};
/// use serde_json::{json, Value};
/// use std::sync::Arc;
///
/// let any = Arc::new(schema_fn(|v: &Value| Ok(v.clone())));
/// let schema = required_if("premiumFeature", "type", json!("premium"), any);
/// assert!(!schema.is_valid(&json!({"type": "premium"})));
/// assert!(schema.is_valid(&json!({"type": "basic"})));
/// ```
pub fn required_if<F, D>(
    field: F,
    dependent_field: D,
    required_value: Value,
    base: Arc<dyn Schema>,
) -> RequiredIf
where
    F: Into<String>,
    D: Into<String>,
{
    RequiredIf {
        field: field.into(),
        dependent_field: dependent_field.into(),
        required_value,
        base,
    }
}

impl Schema for RequiredIf {
    fn parse(&self, data: &Value) -> Result<Value, ParseError> {
        let required =
            nested_value(data, &self.dependent_field) == Some(&self.required_value);
        validate_target(data, &self.field, required, self.base.as_ref())
    }
}

/// Object-level schema that requires a field exactly when a predicate over
/// the whole object holds.
///
/// The predicate sees the full form data, so requiredness can depend on any
/// combination of other fields.
pub struct RequiredWhen {
    field: String,
    condition: Box<dyn Fn(&Value) -> bool + Send + Sync>,
    base: Arc<dyn Schema>,
}

/// Build a [`RequiredWhen`] combinator.
pub fn required_when<F, C>(field: F, condition: C, base: Arc<dyn Schema>) -> RequiredWhen
where
    F: Into<String>,
    C: Fn(&Value) -> bool + Send + Sync + 'static,
{
    RequiredWhen {
        field: field.into(),
        condition: Box::new(condition),
        base,
    }
}

impl Schema for RequiredWhen {
    fn parse(&self, data: &Value) -> Result<Value, ParseError> {
        let required = (self.condition)(data);
        validate_target(data, &self.field, required, self.base.as_ref())
    }
}

/// Schema that applies a fragment only when a condition over the data holds,
/// and passes everything through otherwise.
pub struct Conditional {
    condition: Box<dyn Fn(&Value) -> bool + Send + Sync>,
    schema: Arc<dyn Schema>,
}

/// Build a [`Conditional`] combinator.
pub fn conditional<C>(condition: C, schema: Arc<dyn Schema>) -> Conditional
where
    C: Fn(&Value) -> bool + Send + Sync + 'static,
{
    Conditional {
        condition: Box::new(condition),
        schema,
    }
}

impl Schema for Conditional {
    fn parse(&self, data: &Value) -> Result<Value, ParseError> {
        if (self.condition)(data) {
            self.schema.parse(data)
        } else {
            Ok(data.clone())
        }
    }
}

fn validate_target(
    data: &Value,
    field: &str,
    required: bool,
    base: &dyn Schema,
) -> Result<Value, ParseError> {
    let target = nested_value(data, field);
    let missing = matches!(target, None | Some(Value::Null))
        || matches!(target, Some(Value::String(s)) if s.is_empty());

    if missing {
        if required {
            let issue = Issue::new(
                field_segments(field),
                IssueKind::Custom,
                format!("{} is required", field),
            );
            return Err(ParseError::Schema(SchemaFailure::new(vec![issue])));
        }
        return Ok(data.clone());
    }

    // Present values are validated against the base schema either way;
    // issues are re-rooted at the target field.
    let value = target.cloned().unwrap_or(Value::Null);
    match base.parse(&value) {
        Ok(_) => Ok(data.clone()),
        Err(ParseError::Schema(failure)) => {
            let prefix = field_segments(field);
            let issues = failure
                .issues
                .into_iter()
                .map(|issue| issue.prefixed(&prefix))
                .collect();
            Err(ParseError::Schema(SchemaFailure::with_message(
                issues,
                failure.message,
            )))
        }
        Err(other) => Err(other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::{schema_fn, PathSegment};
    use serde_json::json;

    /// Minimal string fragment: at least three characters.
    fn short_string_schema() -> Arc<dyn Schema> {
        Arc::new(schema_fn(|value: &Value| match value.as_str() {
            Some(s) if s.len() >= 3 => Ok(value.clone()),
            Some(s) => Err(ParseError::Schema(SchemaFailure::new(vec![Issue::at_root(
                IssueKind::TooSmall {
                    minimum: 3.0,
                    exact: None,
                },
                format!("String must contain at least 3 character(s), got {}", s.len()),
            )]))),
            None => Err(ParseError::Schema(SchemaFailure::new(vec![Issue::at_root(
                IssueKind::InvalidType {
                    expected: "string".to_string(),
                    received: "null".to_string(),
                },
                "Expected string",
            )]))),
        }))
    }

    #[test]
    fn test_required_if_missing_when_condition_holds() {
        let schema = required_if(
            "premiumFeature",
            "type",
            json!("premium"),
            short_string_schema(),
        );
        let err = schema.parse(&json!({"type": "premium"})).unwrap_err();
        let failure = err.as_schema_failure().unwrap();
        assert_eq!(failure.issues.len(), 1);
        assert_eq!(failure.issues[0].code(), "custom");
        // Attributed to the target field, not the dependent field.
        assert_eq!(
            failure.issues[0].path,
            vec![PathSegment::from("premiumFeature")]
        );
    }

    #[test]
    fn test_required_if_optional_when_condition_does_not_hold() {
        let schema = required_if(
            "premiumFeature",
            "type",
            json!("premium"),
            short_string_schema(),
        );
        assert!(schema.is_valid(&json!({"type": "basic"})));
    }

    #[test]
    fn test_required_if_still_validates_present_optional_value() {
        let schema = required_if(
            "premiumFeature",
            "type",
            json!("premium"),
            short_string_schema(),
        );
        let err = schema
            .parse(&json!({"type": "basic", "premiumFeature": "ab"}))
            .unwrap_err();
        let failure = err.as_schema_failure().unwrap();
        assert_eq!(failure.issues[0].code(), "too_small");
        assert_eq!(
            failure.issues[0].path,
            vec![PathSegment::from("premiumFeature")]
        );
    }

    #[test]
    fn test_required_if_dotted_dependent_field() {
        let schema = required_if(
            "localName",
            "flags.localized",
            json!(true),
            short_string_schema(),
        );
        assert!(!schema.is_valid(&json!({"flags": {"localized": true}})));
        assert!(schema.is_valid(&json!({"flags": {"localized": false}})));
    }

    #[test]
    fn test_required_if_empty_string_counts_as_missing() {
        let schema = required_if(
            "premiumFeature",
            "type",
            json!("premium"),
            short_string_schema(),
        );
        assert!(!schema.is_valid(&json!({"type": "premium", "premiumFeature": ""})));
    }

    #[test]
    fn test_required_when_predicate_over_whole_object() {
        let schema = required_when(
            "companyName",
            |data: &Value| data.get("isCompany") == Some(&json!(true)),
            short_string_schema(),
        );
        assert!(!schema.is_valid(&json!({"isCompany": true})));
        assert!(schema.is_valid(&json!({"isCompany": false})));
        assert!(schema.is_valid(&json!({"isCompany": true, "companyName": "Acme"})));
    }

    #[test]
    fn test_conditional_gates_on_condition() {
        let inner: Arc<dyn Schema> = Arc::new(schema_fn(|_: &Value| {
            Err(ParseError::Schema(SchemaFailure::new(vec![Issue::at_root(
                IssueKind::Custom,
                "always fails",
            )])))
        }));
        let schema = conditional(
            |data: &Value| data.get("checked") == Some(&json!(true)),
            inner,
        );
        assert!(schema.is_valid(&json!({"checked": false})));
        assert!(!schema.is_valid(&json!({"checked": true})));
    }
}
