//! Localized message resolution for schema issues
//!
//! Resolves one issue (plus an optional field name) to a human-readable
//! message through a priority-ordered fallback chain: a field + code
//! translation override, a generic per-field override, field-shape
//! heuristics for common form fields, and finally a per-code translation
//! key defaulting to the engine-supplied message. The chosen template then
//! gets `{{minimum}}`/`{{maximum}}`/`{{exact}}`/`{{path}}` placeholders
//! interpolated from the issue.
//!
//! The lookup function is injected per call site, never a module-level
//! singleton, so different languages can coexist; nothing is cached across
//! calls.
//!
//! Copyright (c) 2025 Formspec Team
//! Licensed under the Apache-2.0 license

use crate::format::FieldError;
use crate::path::path_to_field;
use formspec_schemas::engine::{Issue, IssueKind};
use std::collections::HashMap;

/// Translation lookup contract
///
/// Missing keys resolve to the provided default, or echo the key itself
/// when no default is given; the resolver uses the key echo as its
/// missing-translation sentinel.
pub trait Translator {
    fn lookup(&self, key: &str, default: Option<&str>) -> String;
}

impl<F> Translator for F
where
    F: Fn(&str, Option<&str>) -> String,
{
    fn lookup(&self, key: &str, default: Option<&str>) -> String {
        self(key, default)
    }
}

/// Map-backed translation catalog.
#[derive(Debug, Clone, Default)]
pub struct StaticCatalog {
    entries: HashMap<String, String>,
}

impl StaticCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a translation entry.
    pub fn insert<K: Into<String>, V: Into<String>>(mut self, key: K, message: V) -> Self {
        self.entries.insert(key.into(), message.into());
        self
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for StaticCatalog {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            entries: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

impl Translator for StaticCatalog {
    fn lookup(&self, key: &str, default: Option<&str>) -> String {
        match self.entries.get(key) {
            Some(message) => message.clone(),
            None => default.unwrap_or(key).to_string(),
        }
    }
}

/// Translator with no catalog at all; every lookup misses.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoTranslations;

impl Translator for NoTranslations {
    fn lookup(&self, key: &str, default: Option<&str>) -> String {
        default.unwrap_or(key).to_string()
    }
}

/// The translation key for a machine code, with a generic fallback for
/// codes that have no dedicated key.
pub fn error_code_key(code: &str) -> &'static str {
    match code {
        "invalid_type" => "validation.errors.invalidType",
        "invalid_literal" => "validation.errors.invalidLiteral",
        "unrecognized_keys" => "validation.errors.unrecognizedKeys",
        "invalid_union" => "validation.errors.invalidUnion",
        "invalid_enum_value" => "validation.errors.invalidEnumValue",
        "invalid_date" => "validation.errors.invalidDate",
        "invalid_string" => "validation.errors.invalidString",
        "too_small" => "validation.errors.tooSmall",
        "too_big" => "validation.errors.tooBig",
        "not_multiple_of" => "validation.errors.notMultipleOf",
        "not_finite" => "validation.errors.notFinite",
        "custom" => "validation.errors.custom",
        _ => "validation.errors.generic",
    }
}

/// Priority-ordered message resolver over an injected [`Translator`].
pub struct MessageResolver<'a> {
    translator: &'a dyn Translator,
}

impl<'a> MessageResolver<'a> {
    pub fn new(translator: &'a dyn Translator) -> Self {
        Self { translator }
    }

    /// Resolve the message for one issue; first match wins.
    pub fn resolve(&self, issue: &Issue, field_name: Option<&str>) -> String {
        if let Some(field) = field_name {
            // Field + code override, e.g. validation.fields.name.en.too_small
            let key = format!("validation.fields.{}.{}", field, issue.code());
            let message = self.translator.lookup(&key, Some(""));
            if !message.is_empty() && message != key {
                return interpolate(&message, issue);
            }

            // Generic per-field override, e.g. validation.fields.name.en.error
            let key = format!("validation.fields.{}.error", field);
            let message = self.translator.lookup(&key, Some(""));
            if !message.is_empty() && message != key {
                return interpolate(&message, issue);
            }

            if let Some(message) = field_shape_message(issue, field) {
                return message;
            }
        }

        let base = self
            .translator
            .lookup(error_code_key(issue.code()), Some(&issue.message));
        interpolate(&base, issue)
    }

    /// Resolve an already-formatted field error, preferring a per-field
    /// translation override and falling back to the stored message.
    pub fn resolve_field_error(&self, field_error: &FieldError) -> String {
        let key = format!("validation.fields.{}.error", field_error.path);
        let message = self.translator.lookup(&key, Some(""));
        if !message.is_empty() && message != key {
            message
        } else {
            field_error.message.clone()
        }
    }
}

/// Bespoke messages for common field shapes, used when no translation
/// override exists. Only missing/mistyped values qualify.
fn field_shape_message(issue: &Issue, field: &str) -> Option<String> {
    let received = match &issue.kind {
        IssueKind::InvalidType { received, .. } => received.as_str(),
        _ => return None,
    };

    // Two-segment names whose second segment is a language tag are
    // translated-text fields: name.en, description.he, ...
    if let Some((base, tag)) = field.split_once('.') {
        if !base.is_empty() && !tag.contains('.') {
            if let Some(language) = language_name(tag) {
                return Some(format!("Please enter the {} in {}", base, language));
            }
        }
    }

    let message = match field {
        "address" => "Address is required",
        "phone" => "Phone number is required",
        "coverImage" => "Cover image is required",
        "galleryImages" => "At least one gallery image is required",
        "maxOccupancy" => {
            if received == "string" {
                "Max occupancy must be a number"
            } else {
                "Max occupancy is required"
            }
        }
        "isSmokingAllowed" | "isWheelchairAccessible" => {
            if received == "string" {
                "This field must be a valid selection"
            } else {
                "This field is required"
            }
        }
        _ => return None,
    };
    Some(message.to_string())
}

fn language_name(tag: &str) -> Option<&'static str> {
    match tag {
        "en" => Some("English"),
        "he" => Some("Hebrew (עברית)"),
        _ => None,
    }
}

/// Replace `{{minimum}}`, `{{maximum}}`, `{{exact}}`, and `{{path}}`
/// placeholders with values present on the issue.
fn interpolate(template: &str, issue: &Issue) -> String {
    let mut message = template.to_string();

    match &issue.kind {
        IssueKind::TooSmall { minimum, exact } => {
            message = message.replace("{{minimum}}", &minimum.to_string());
            if let Some(exact) = exact {
                message = message.replace("{{exact}}", &exact.to_string());
            }
        }
        IssueKind::TooBig { maximum, exact } => {
            message = message.replace("{{maximum}}", &maximum.to_string());
            if let Some(exact) = exact {
                message = message.replace("{{exact}}", &exact.to_string());
            }
        }
        _ => {}
    }

    if !issue.path.is_empty() {
        message = message.replace("{{path}}", &path_to_field(&issue.path));
    }

    message
}
