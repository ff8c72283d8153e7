//! Deterministic leaf schemas emitting engine-shaped issues
//!
//! [`ObjectSchema`] validates a JSON object field by field, in declaration
//! order, and reports failures with the same codes and detail fields a
//! production engine would: `invalid_type` with the received type,
//! `too_small`/`too_big` with bounds, `invalid_string` for format checks,
//! `invalid_enum_value` with the allowed options.

use formspec_schemas::engine::{
    Issue, IssueKind, ParseError, PathSegment, Schema, SchemaFailure,
};
use serde_json::Value;

/// String constraints: length bounds and a naive email format check.
#[derive(Debug, Clone, Default)]
pub struct StringRule {
    min: Option<usize>,
    max: Option<usize>,
    email: bool,
}

impl StringRule {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn min(mut self, min: usize) -> Self {
        self.min = Some(min);
        self
    }

    pub fn max(mut self, max: usize) -> Self {
        self.max = Some(max);
        self
    }

    pub fn email(mut self) -> Self {
        self.email = true;
        self
    }
}

/// Numeric range constraints.
#[derive(Debug, Clone, Default)]
pub struct NumberRule {
    min: Option<f64>,
    max: Option<f64>,
}

impl NumberRule {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn min(mut self, min: f64) -> Self {
        self.min = Some(min);
        self
    }

    pub fn max(mut self, max: f64) -> Self {
        self.max = Some(max);
        self
    }
}

/// One field's validation rule.
#[derive(Debug, Clone)]
pub enum Rule {
    String(StringRule),
    Number(NumberRule),
    Boolean,
    /// String restricted to a fixed option set
    Enumeration(Vec<String>),
    /// Array with an optional minimum element count
    Array { min_items: Option<usize> },
    /// Nested object validated recursively
    Object(ObjectSchema),
}

impl From<StringRule> for Rule {
    fn from(rule: StringRule) -> Self {
        Rule::String(rule)
    }
}

impl From<NumberRule> for Rule {
    fn from(rule: NumberRule) -> Self {
        Rule::Number(rule)
    }
}

impl From<ObjectSchema> for Rule {
    fn from(schema: ObjectSchema) -> Self {
        Rule::Object(schema)
    }
}

impl Rule {
    fn type_label(&self) -> &'static str {
        match self {
            Rule::String(_) | Rule::Enumeration(_) => "string",
            Rule::Number(_) => "number",
            Rule::Boolean => "boolean",
            Rule::Array { .. } => "array",
            Rule::Object(_) => "object",
        }
    }
}

/// Object schema validating declared fields in order.
///
/// Fields are required by default; `optional_field` skips absent values but
/// still validates present ones.
#[derive(Debug, Clone, Default)]
pub struct ObjectSchema {
    fields: Vec<(String, Rule, bool)>,
}

impl ObjectSchema {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare a required field.
    pub fn field<N: Into<String>, R: Into<Rule>>(mut self, name: N, rule: R) -> Self {
        self.fields.push((name.into(), rule.into(), true));
        self
    }

    /// Declare an optional field.
    pub fn optional_field<N: Into<String>, R: Into<Rule>>(mut self, name: N, rule: R) -> Self {
        self.fields.push((name.into(), rule.into(), false));
        self
    }

    fn collect_issues(&self, data: &Value, prefix: &[PathSegment], issues: &mut Vec<Issue>) {
        let Some(object) = data.as_object() else {
            issues.push(Issue::new(
                prefix.to_vec(),
                IssueKind::InvalidType {
                    expected: "object".to_string(),
                    received: json_type_name(data).to_string(),
                },
                format!("Expected object, received {}", json_type_name(data)),
            ));
            return;
        };

        for (name, rule, required) in &self.fields {
            let mut path = prefix.to_vec();
            path.push(PathSegment::Key(name.clone()));

            match object.get(name) {
                None | Some(Value::Null) => {
                    if *required {
                        issues.push(Issue::new(
                            path,
                            IssueKind::InvalidType {
                                expected: rule.type_label().to_string(),
                                received: "undefined".to_string(),
                            },
                            "Required",
                        ));
                    }
                }
                Some(value) => check_rule(rule, value, &path, issues),
            }
        }
    }
}

impl Schema for ObjectSchema {
    fn parse(&self, data: &Value) -> Result<Value, ParseError> {
        let mut issues = Vec::new();
        self.collect_issues(data, &[], &mut issues);
        if issues.is_empty() {
            Ok(data.clone())
        } else {
            Err(ParseError::Schema(SchemaFailure::new(issues)))
        }
    }
}

fn check_rule(rule: &Rule, value: &Value, path: &[PathSegment], issues: &mut Vec<Issue>) {
    match rule {
        Rule::String(string_rule) => {
            let Some(text) = value.as_str() else {
                push_type_issue(issues, path, "string", value);
                return;
            };
            let length = text.chars().count();
            if let Some(min) = string_rule.min {
                if length < min {
                    issues.push(Issue::new(
                        path.to_vec(),
                        IssueKind::TooSmall {
                            minimum: min as f64,
                            exact: None,
                        },
                        format!("String must contain at least {} character(s)", min),
                    ));
                }
            }
            if let Some(max) = string_rule.max {
                if length > max {
                    issues.push(Issue::new(
                        path.to_vec(),
                        IssueKind::TooBig {
                            maximum: max as f64,
                            exact: None,
                        },
                        format!("String must contain at most {} character(s)", max),
                    ));
                }
            }
            if string_rule.email && !(text.contains('@') && text.contains('.')) {
                issues.push(Issue::new(
                    path.to_vec(),
                    IssueKind::InvalidString {
                        validation: "email".to_string(),
                    },
                    "Invalid email",
                ));
            }
        }
        Rule::Number(number_rule) => {
            let Some(number) = value.as_f64() else {
                push_type_issue(issues, path, "number", value);
                return;
            };
            if let Some(min) = number_rule.min {
                if number < min {
                    issues.push(Issue::new(
                        path.to_vec(),
                        IssueKind::TooSmall {
                            minimum: min,
                            exact: None,
                        },
                        format!("Number must be greater than or equal to {}", min),
                    ));
                }
            }
            if let Some(max) = number_rule.max {
                if number > max {
                    issues.push(Issue::new(
                        path.to_vec(),
                        IssueKind::TooBig {
                            maximum: max,
                            exact: None,
                        },
                        format!("Number must be less than or equal to {}", max),
                    ));
                }
            }
        }
        Rule::Boolean => {
            if !value.is_boolean() {
                push_type_issue(issues, path, "boolean", value);
            }
        }
        Rule::Enumeration(options) => {
            let matched = value
                .as_str()
                .map(|text| options.iter().any(|option| option == text))
                .unwrap_or(false);
            if !matched {
                let received = match value {
                    Value::String(s) => s.clone(),
                    other => other.to_string(),
                };
                issues.push(Issue::new(
                    path.to_vec(),
                    IssueKind::InvalidEnumValue {
                        options: options.clone(),
                        received: received.clone(),
                    },
                    format!(
                        "Invalid enum value. Expected {}, received '{}'",
                        options.join(" | "),
                        received
                    ),
                ));
            }
        }
        Rule::Array { min_items } => {
            let Some(items) = value.as_array() else {
                push_type_issue(issues, path, "array", value);
                return;
            };
            if let Some(min) = min_items {
                if items.len() < *min {
                    issues.push(Issue::new(
                        path.to_vec(),
                        IssueKind::TooSmall {
                            minimum: *min as f64,
                            exact: None,
                        },
                        format!("Array must contain at least {} element(s)", min),
                    ));
                }
            }
        }
        Rule::Object(schema) => schema.collect_issues(value, path, issues),
    }
}

fn push_type_issue(issues: &mut Vec<Issue>, path: &[PathSegment], expected: &str, value: &Value) {
    issues.push(Issue::new(
        path.to_vec(),
        IssueKind::InvalidType {
            expected: expected.to_string(),
            received: json_type_name(value).to_string(),
        },
        format!("Expected {}, received {}", expected, json_type_name(value)),
    ));
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn signup_schema() -> ObjectSchema {
        ObjectSchema::new()
            .field("name", StringRule::new().min(3))
            .field("email", StringRule::new().email())
    }

    #[test]
    fn test_valid_object_passes() {
        let schema = signup_schema();
        assert!(schema.is_valid(&json!({"name": "Ada", "email": "ada@example.com"})));
    }

    #[test]
    fn test_issues_in_declaration_order() {
        let schema = signup_schema();
        let err = schema
            .parse(&json!({"name": "AB", "email": "bad"}))
            .unwrap_err();
        let failure = err.as_schema_failure().unwrap();
        assert_eq!(failure.issues.len(), 2);
        assert_eq!(failure.issues[0].code(), "too_small");
        assert_eq!(failure.issues[1].code(), "invalid_string");
    }

    #[test]
    fn test_missing_required_field() {
        let schema = signup_schema();
        let err = schema.parse(&json!({"email": "a@b.co"})).unwrap_err();
        let failure = err.as_schema_failure().unwrap();
        assert_eq!(failure.issues[0].message, "Required");
        assert_eq!(
            failure.issues[0].kind,
            IssueKind::InvalidType {
                expected: "string".to_string(),
                received: "undefined".to_string(),
            }
        );
    }

    #[test]
    fn test_optional_field_skipped_when_absent() {
        let schema = ObjectSchema::new().optional_field("nickname", StringRule::new().min(2));
        assert!(schema.is_valid(&json!({})));
        assert!(!schema.is_valid(&json!({"nickname": "x"})));
    }

    #[test]
    fn test_nested_object_paths() {
        let schema = ObjectSchema::new().field(
            "name",
            ObjectSchema::new()
                .field("en", StringRule::new().min(1))
                .field("he", StringRule::new().min(1)),
        );
        let err = schema.parse(&json!({"name": {"en": "Studio"}})).unwrap_err();
        let failure = err.as_schema_failure().unwrap();
        assert_eq!(
            failure.issues[0].path,
            vec![PathSegment::from("name"), PathSegment::from("he")]
        );
    }

    #[test]
    fn test_enum_and_boolean_rules() {
        let schema = ObjectSchema::new()
            .field("kind", Rule::Enumeration(vec!["basic".into(), "premium".into()]))
            .field("isActive", Rule::Boolean);

        assert!(schema.is_valid(&json!({"kind": "basic", "isActive": true})));

        let err = schema
            .parse(&json!({"kind": "golden", "isActive": "yes"}))
            .unwrap_err();
        let failure = err.as_schema_failure().unwrap();
        assert_eq!(failure.issues[0].code(), "invalid_enum_value");
        assert_eq!(failure.issues[1].code(), "invalid_type");
    }

    #[test]
    fn test_number_bounds() {
        let schema = ObjectSchema::new().field("maxOccupancy", NumberRule::new().min(1.0).max(50.0));
        assert!(schema.is_valid(&json!({"maxOccupancy": 10})));
        assert!(!schema.is_valid(&json!({"maxOccupancy": 0})));
        assert!(!schema.is_valid(&json!({"maxOccupancy": 99})));
    }
}
