//! Aggregation of raw schema issues into a field-addressable error model
//!
//! Converts a [`SchemaFailure`] into a [`ValidationError`]: an ordered list
//! of per-issue [`FieldError`]s plus a field -> message map where a field
//! with several issues gets all of its messages joined. The aggregate is a
//! value, created fresh on each validation attempt and never patched
//! incrementally.
//!
//! Callers gate on the structured failure variant before invoking the
//! formatter; anything else degrades to [`ValidationError::generic`].
//!
//! Copyright (c) 2025 Formspec Team
//! Licensed under the Apache-2.0 license

use crate::path::{matches_field_pattern, path_to_field};
use formspec_schemas::engine::{Issue, SchemaFailure};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Top-level message used when a failure carries no summary of its own.
pub const GENERIC_FAILURE_MESSAGE: &str = "Validation failed";

/// Separator between joined messages for a field with several issues.
pub const MESSAGE_SEPARATOR: &str = ", ";

/// One formatted issue, addressed by dotted field path.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldError {
    /// Dotted field path (`name.en`, `items.0.title`)
    pub path: String,
    /// Human-readable message
    pub message: String,
    /// Machine code of the underlying issue, when known
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
}

/// Field-addressable aggregate of one validation attempt
///
/// Invariant: every key in `field_errors` has one or more entries in
/// `errors` with the same path; a multi-issue field holds its messages
/// joined by [`MESSAGE_SEPARATOR`] in the map while `errors` keeps one
/// entry per original issue, in emission order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationError {
    /// Combined message per dotted field path
    pub field_errors: HashMap<String, String>,
    /// One entry per issue, in the order the engine emitted them
    pub errors: Vec<FieldError>,
    /// Top-level summary message
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl ValidationError {
    /// A field-less failure with the generic top-level message, used when an
    /// engine failure carries no structured issues.
    pub fn generic() -> Self {
        Self {
            field_errors: HashMap::new(),
            errors: Vec::new(),
            message: Some(GENERIC_FAILURE_MESSAGE.to_string()),
        }
    }

    /// Whether no field has an error.
    pub fn is_empty(&self) -> bool {
        self.field_errors.is_empty()
    }

    /// The combined message for a field, if it has one.
    pub fn field_error(&self, field: &str) -> Option<&str> {
        self.field_errors.get(field).map(String::as_str)
    }

    /// Whether a field has an error.
    pub fn has_field_error(&self, field: &str) -> bool {
        self.field_errors.contains_key(field)
    }

    /// The subset of `field_errors` whose paths match a wildcard pattern
    /// (`name.*`, `items.*.title`).
    pub fn errors_matching(&self, pattern: &str) -> HashMap<String, String> {
        self.field_errors
            .iter()
            .filter(|(path, _)| matches_field_pattern(path, pattern))
            .map(|(path, message)| (path.clone(), message.clone()))
            .collect()
    }
}

/// Per-call options for [`format_failure`].
#[derive(Default)]
pub struct FormatOptions<'a> {
    /// Override for the per-issue message; defaults to the engine-supplied
    /// message on the issue itself.
    pub format_message: Option<&'a (dyn Fn(&Issue) -> String + 'a)>,
}

/// Aggregate a structured engine failure into a [`ValidationError`].
pub fn format_failure(failure: &SchemaFailure, options: &FormatOptions<'_>) -> ValidationError {
    let mut field_errors: HashMap<String, String> = HashMap::new();
    let mut errors = Vec::with_capacity(failure.issues.len());

    for issue in &failure.issues {
        let field_path = path_to_field(&issue.path);
        let message = match options.format_message {
            Some(format) => format(issue),
            None => issue.message.clone(),
        };

        errors.push(FieldError {
            path: field_path.clone(),
            message: message.clone(),
            code: Some(issue.code().to_string()),
        });

        field_errors
            .entry(field_path)
            .and_modify(|existing| {
                existing.push_str(MESSAGE_SEPARATOR);
                existing.push_str(&message);
            })
            .or_insert(message);
    }

    let message = if failure.message.is_empty() {
        GENERIC_FAILURE_MESSAGE.to_string()
    } else {
        failure.message.clone()
    };

    ValidationError {
        field_errors,
        errors,
        message: Some(message),
    }
}
