//! JSON Schema engine adapter
//!
//! Wraps a compiled JSON Schema document (draft 2020-12 by default) as a
//! [`Schema`], mapping the library's validation errors into the [`Issue`]
//! model: instance paths become path segments, a missing required property is
//! attributed to the property's own path, and bound/type/format keywords map
//! onto the corresponding issue codes.
//!
//! Copyright (c) 2025 Formspec Team
//! Licensed under the Apache-2.0 license

use super::{Issue, IssueKind, ParseError, PathSegment, Schema, SchemaFailure};
use jsonschema::error::ValidationErrorKind;
use jsonschema::Validator;
use serde_json::Value;
use thiserror::Error;

/// Error raised when a schema document itself does not compile.
#[derive(Debug, Error)]
#[error("invalid schema document: {message}")]
pub struct SchemaCompileError {
    message: String,
}

/// A [`Schema`] backed by a compiled JSON Schema document.
pub struct JsonSchema {
    validator: Validator,
}

impl JsonSchema {
    /// Compile a schema document.
    pub fn compile(schema: &Value) -> Result<Self, SchemaCompileError> {
        let validator = jsonschema::validator_for(schema).map_err(|e| SchemaCompileError {
            message: e.to_string(),
        })?;
        Ok(Self { validator })
    }

    /// Compile a schema document with `format` keyword checks enabled
    /// (email, uri, date, ...).
    pub fn compile_with_formats(schema: &Value) -> Result<Self, SchemaCompileError> {
        let validator = jsonschema::options()
            .should_validate_formats(true)
            .build(schema)
            .map_err(|e| SchemaCompileError {
                message: e.to_string(),
            })?;
        Ok(Self { validator })
    }
}

impl Schema for JsonSchema {
    fn parse(&self, data: &Value) -> Result<Value, ParseError> {
        let issues: Vec<Issue> = self.validator.iter_errors(data).map(|e| issue_for(&e)).collect();
        if issues.is_empty() {
            Ok(data.clone())
        } else {
            Err(ParseError::Schema(SchemaFailure::new(issues)))
        }
    }
}

fn issue_for(err: &jsonschema::ValidationError<'_>) -> Issue {
    let message = err.to_string();
    let mut path = pointer_to_path(&err.instance_path.to_string());

    let kind = match &err.kind {
        ValidationErrorKind::Required { property } => {
            // The error points at the object; the issue belongs to the
            // missing property itself.
            let name = property
                .as_str()
                .map(ToString::to_string)
                .unwrap_or_else(|| property.to_string());
            path.push(PathSegment::Key(name));
            IssueKind::InvalidType {
                expected: "value".to_string(),
                received: "undefined".to_string(),
            }
        }
        ValidationErrorKind::Type { .. } => IssueKind::InvalidType {
            expected: expected_types(&message),
            received: json_type_name(&err.instance).to_string(),
        },
        ValidationErrorKind::MinLength { limit } => IssueKind::TooSmall {
            minimum: *limit as f64,
            exact: None,
        },
        ValidationErrorKind::MaxLength { limit } => IssueKind::TooBig {
            maximum: *limit as f64,
            exact: None,
        },
        ValidationErrorKind::MinItems { limit } => IssueKind::TooSmall {
            minimum: *limit as f64,
            exact: None,
        },
        ValidationErrorKind::MaxItems { limit } => IssueKind::TooBig {
            maximum: *limit as f64,
            exact: None,
        },
        ValidationErrorKind::MinProperties { limit } => IssueKind::TooSmall {
            minimum: *limit as f64,
            exact: None,
        },
        ValidationErrorKind::MaxProperties { limit } => IssueKind::TooBig {
            maximum: *limit as f64,
            exact: None,
        },
        ValidationErrorKind::Minimum { limit } => IssueKind::TooSmall {
            minimum: limit.as_f64().unwrap_or_default(),
            exact: None,
        },
        ValidationErrorKind::Maximum { limit } => IssueKind::TooBig {
            maximum: limit.as_f64().unwrap_or_default(),
            exact: None,
        },
        ValidationErrorKind::ExclusiveMinimum { limit } => IssueKind::TooSmall {
            minimum: limit.as_f64().unwrap_or_default(),
            exact: None,
        },
        ValidationErrorKind::ExclusiveMaximum { limit } => IssueKind::TooBig {
            maximum: limit.as_f64().unwrap_or_default(),
            exact: None,
        },
        ValidationErrorKind::Format { format } => IssueKind::InvalidString {
            validation: format.clone(),
        },
        ValidationErrorKind::Pattern { .. } => IssueKind::InvalidString {
            validation: "regex".to_string(),
        },
        // The allowed options are carried in the message text.
        ValidationErrorKind::Enum { .. } => IssueKind::InvalidEnumValue {
            options: Vec::new(),
            received: enum_received(&err.instance),
        },
        ValidationErrorKind::AdditionalProperties { unexpected } => IssueKind::UnrecognizedKeys {
            keys: unexpected.clone(),
        },
        ValidationErrorKind::MultipleOf { multiple_of } => IssueKind::NotMultipleOf {
            multiple_of: *multiple_of,
        },
        _ => IssueKind::Custom,
    };

    Issue::new(path, kind, message)
}

/// Split a JSON Pointer (`/name/items/0`) into path segments, unescaping
/// per RFC 6901 and reading canonical decimals as array indices.
fn pointer_to_path(pointer: &str) -> Vec<PathSegment> {
    pointer
        .split('/')
        .skip(1)
        .map(|raw| {
            let token = raw.replace("~1", "/").replace("~0", "~");
            match token.parse::<usize>() {
                Ok(index) if token == "0" || !token.starts_with('0') => PathSegment::Index(index),
                _ => PathSegment::Key(token),
            }
        })
        .collect()
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

/// Extract the expected type names from the standard `is not of type`
/// message shape; the kind payload is not stable across library releases.
fn expected_types(message: &str) -> String {
    match message.rfind("is not of type") {
        Some(idx) => {
            let tail = message[idx + "is not of type".len()..]
                .trim_start_matches('s')
                .trim();
            let cleaned = tail.replace('"', "");
            if cleaned.is_empty() {
                "unknown".to_string()
            } else {
                cleaned
            }
        }
        None => "unknown".to_string(),
    }
}

fn enum_received(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
