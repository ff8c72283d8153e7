//! Step-scoped validation for multi-step forms
//!
//! Validates a schema against the full form data or a step-scoped subset,
//! then filters the formatted errors down to the fields the step owns. The
//! ownership check is three-way - exact match, child of a step field, or
//! parent of a step field - because a step may declare a parent group
//! (`name`) while the schema reports errors on its children (`name.en`), or
//! vice versa.
//!
//! Copyright (c) 2025 Formspec Team
//! Licensed under the Apache-2.0 license

use crate::format::{format_failure, FieldError, FormatOptions, GENERIC_FAILURE_MESSAGE};
use crate::message::{MessageResolver, Translator};
use crate::path::path_to_field;
use formspec_schemas::engine::{Issue, ParseError, Schema};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, warn};

/// Options for a single step validation pass.
#[derive(Debug, Clone, Default)]
pub struct StepOptions {
    /// Validate a projection holding only the step's declared fields
    /// instead of the whole form data, and filter the resulting errors to
    /// the step's field ownership.
    pub validate_only_step_fields: bool,
    /// Dotted field names the step owns. Leaving this empty disables
    /// projection and filtering even when `validate_only_step_fields` is
    /// set; that permissive default is deliberate.
    pub step_field_names: Vec<String>,
}

impl StepOptions {
    /// Options scoped to the given step fields.
    pub fn scoped_to<I, S>(field_names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            validate_only_step_fields: true,
            step_field_names: field_names.into_iter().map(Into::into).collect(),
        }
    }
}

/// Result of validating one step.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StepValidationResult {
    pub is_valid: bool,
    /// Combined message per field, restricted to the step's ownership
    pub errors: HashMap<String, String>,
    /// Per-issue errors, restricted the same way
    pub field_errors: Vec<FieldError>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl StepValidationResult {
    fn valid() -> Self {
        Self {
            is_valid: true,
            errors: HashMap::new(),
            field_errors: Vec::new(),
            message: None,
        }
    }
}

/// One step of a multi-step form, for aggregate validation.
pub struct StepDefinition {
    pub id: String,
    /// Steps without a schema are vacuously valid
    pub schema: Option<Arc<dyn Schema>>,
    pub field_names: Vec<String>,
    pub validate_only_step_fields: bool,
}

impl StepDefinition {
    pub fn new<I: Into<String>>(id: I) -> Self {
        Self {
            id: id.into(),
            schema: None,
            field_names: Vec::new(),
            validate_only_step_fields: false,
        }
    }

    pub fn with_schema(mut self, schema: Arc<dyn Schema>) -> Self {
        self.schema = Some(schema);
        self
    }

    pub fn with_fields<I, S>(mut self, field_names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.field_names = field_names.into_iter().map(Into::into).collect();
        self
    }

    /// Validate only this step's fields instead of the whole form data.
    pub fn scoped(mut self) -> Self {
        self.validate_only_step_fields = true;
        self
    }
}

/// Aggregate result over every step of a form.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormValidationResult {
    pub is_valid: bool,
    pub step_results: HashMap<String, StepValidationResult>,
    /// Merged field -> message map across steps; the earliest step wins on
    /// a shared path
    pub errors: HashMap<String, String>,
    pub field_errors: Vec<FieldError>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Validate one step.
///
/// A step without a schema is vacuously valid. On a structured engine
/// failure the issues are formatted through the [`MessageResolver`] and,
/// when step scoping is on, filtered to the step's field ownership. Any
/// other engine failure yields an invalid result with no field detail.
pub fn validate_step(
    schema: Option<&dyn Schema>,
    form_data: &Value,
    step_id: &str,
    options: &StepOptions,
    translator: &dyn Translator,
) -> StepValidationResult {
    let Some(schema) = schema else {
        debug!(step_id, "step has no schema, vacuously valid");
        return StepValidationResult::valid();
    };

    let scoped = options.validate_only_step_fields && !options.step_field_names.is_empty();
    let data_to_validate = if scoped {
        project_step_data(form_data, &options.step_field_names)
    } else {
        form_data.clone()
    };

    match schema.parse(&data_to_validate) {
        Ok(_) => StepValidationResult::valid(),
        Err(ParseError::Schema(failure)) => {
            let resolver = MessageResolver::new(translator);
            let format = |issue: &Issue| {
                let field_path = path_to_field(&issue.path);
                if field_path.is_empty() {
                    resolver.resolve(issue, None)
                } else {
                    resolver.resolve(issue, Some(&field_path))
                }
            };
            let error = format_failure(
                &failure,
                &FormatOptions {
                    format_message: Some(&format),
                },
            );

            let errors: HashMap<String, String> = if scoped {
                error
                    .field_errors
                    .iter()
                    .filter(|(path, _)| is_step_field(path, &options.step_field_names))
                    .map(|(path, message)| (path.clone(), message.clone()))
                    .collect()
            } else {
                error.field_errors.clone()
            };

            let field_errors = error
                .errors
                .iter()
                .filter(|field_error| errors.contains_key(&field_error.path))
                .cloned()
                .collect();

            StepValidationResult {
                is_valid: false,
                errors,
                field_errors,
                message: error.message,
            }
        }
        Err(other) => {
            warn!(step_id, error = %other, "unclassified engine failure during step validation");
            StepValidationResult {
                is_valid: false,
                errors: HashMap::new(),
                field_errors: Vec::new(),
                message: Some(GENERIC_FAILURE_MESSAGE.to_string()),
            }
        }
    }
}

/// Validate every step and merge the results.
pub fn validate_steps(
    steps: &[StepDefinition],
    form_data: &Value,
    translator: &dyn Translator,
) -> FormValidationResult {
    let mut result = FormValidationResult {
        is_valid: true,
        ..FormValidationResult::default()
    };

    for step in steps {
        let options = StepOptions {
            validate_only_step_fields: step.validate_only_step_fields,
            step_field_names: step.field_names.clone(),
        };
        let step_result = validate_step(
            step.schema.as_deref(),
            form_data,
            &step.id,
            &options,
            translator,
        );

        if !step_result.is_valid {
            result.is_valid = false;
            if result.message.is_none() {
                result.message = step_result.message.clone();
            }
        }
        for (path, message) in &step_result.errors {
            result
                .errors
                .entry(path.clone())
                .or_insert_with(|| message.clone());
        }
        result.field_errors.extend(step_result.field_errors.clone());
        result.step_results.insert(step.id.clone(), step_result);
    }

    result
}

/// Copy only the step's declared fields out of the form data, preserving
/// the nested-object shape of dotted fields.
fn project_step_data(form_data: &Value, field_names: &[String]) -> Value {
    let mut projection = Map::new();

    for field in field_names {
        match field.split_once('.') {
            Some((parent, child)) => {
                let entry = projection
                    .entry(parent.to_string())
                    .or_insert_with(|| Value::Object(Map::new()));
                if let Value::Object(map) = entry {
                    if let Some(value) = form_data.get(parent).and_then(|p| p.get(child)) {
                        map.insert(child.to_string(), value.clone());
                    }
                }
            }
            None => {
                if let Some(value) = form_data.get(field.as_str()) {
                    projection.insert(field.clone(), value.clone());
                }
            }
        }
    }

    Value::Object(projection)
}

/// Whether an error path belongs to a step: an exact step field, a child of
/// one, or a parent of one.
fn is_step_field(path: &str, step_fields: &[String]) -> bool {
    step_fields.iter().any(|step_field| {
        step_field == path
            || path.starts_with(&format!("{}.", step_field))
            || step_field.starts_with(&format!("{}.", path))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_project_step_data_preserves_nested_shape() {
        let data = json!({
            "name": {"en": "Studio", "he": "סטודיו"},
            "address": "Main St 1",
            "phone": "050-0000000"
        });
        let projection = project_step_data(
            &data,
            &["name.en".to_string(), "address".to_string()],
        );
        assert_eq!(
            projection,
            json!({"name": {"en": "Studio"}, "address": "Main St 1"})
        );
    }

    #[test]
    fn test_project_step_data_keeps_parent_object_for_missing_child() {
        let data = json!({"address": "Main St 1"});
        let projection = project_step_data(&data, &["name.en".to_string()]);
        assert_eq!(projection, json!({"name": {}}));
    }

    #[test]
    fn test_is_step_field_three_way() {
        let step_fields = vec!["name".to_string(), "details.phone".to_string()];
        // Exact
        assert!(is_step_field("name", &step_fields));
        // Child of a step field
        assert!(is_step_field("name.en", &step_fields));
        // Parent of a step field
        assert!(is_step_field("details", &step_fields));
        // Unrelated, including shared prefixes without a dot boundary
        assert!(!is_step_field("nameplate", &step_fields));
        assert!(!is_step_field("address", &step_fields));
    }
}
