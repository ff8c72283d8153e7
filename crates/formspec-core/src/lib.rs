//! Formspec Core - field-addressable validation for schema-driven forms
//!
//! This crate sits between a declarative schema engine and a multi-step
//! data-entry form. It converts an engine failure (an unordered collection
//! of path-tagged issues) into a stable error model a caller can query by
//! dotted field name, filter by form step, and render with localized
//! messages.
//!
//! # Main Components
//!
//! - **Path Mapper**: pure conversions between dotted field names and path
//!   segments, wildcard matching, parent/child derivation
//! - **Error Formatter**: aggregates raw issues into a field -> message map
//!   with multi-error combination
//! - **Message Resolver**: priority-ordered, template-interpolating message
//!   resolution over an injected translation lookup
//! - **Step Validator**: validates full or step-scoped data and filters
//!   errors to the step's field ownership
//! - **Form State**: nested values, touched tracking, and mode-gated,
//!   debounced re-validation
//! - **Debouncer**: trailing-edge debounce for change-triggered validation
//!
//! # Example
//!
//! ```
//! use formspec_core::{format_failure, FormatOptions};
//! use formspec_schemas::{JsonSchema, ParseError, Schema};
//! use serde_json::json;
//!
//! let schema = JsonSchema::compile(&json!({
//!     "type": "object",
//!     "properties": {"name": {"type": "string", "minLength": 3}},
//!     "required": ["name"]
//! }))
//! .unwrap();
//!
//! if let Err(ParseError::Schema(failure)) = schema.parse(&json!({"name": "AB"})) {
//!     let error = format_failure(&failure, &FormatOptions::default());
//!     assert!(error.has_field_error("name"));
//! }
//! ```
//!
//! Copyright (c) 2025 Formspec Team
//! Licensed under the Apache-2.0 license

pub mod debounce;
pub mod error;
pub mod form;
pub mod format;
pub mod message;
pub mod path;
pub mod step;

// Re-export main types for convenience
pub use debounce::{debounce, Debounced, Debouncer};
pub use error::{Error, Result};
pub use form::{FormOptions, FormState, ValidationMode};
pub use format::{
    format_failure, FieldError, FormatOptions, ValidationError, GENERIC_FAILURE_MESSAGE,
    MESSAGE_SEPARATOR,
};
pub use message::{
    error_code_key, MessageResolver, NoTranslations, StaticCatalog, Translator,
};
pub use path::{child_fields, field_to_path, matches_field_pattern, parent_field, path_to_field};
pub use step::{
    validate_step, validate_steps, FormValidationResult, StepDefinition, StepOptions,
    StepValidationResult,
};

// Re-export the engine contract so callers need only one import root.
pub use formspec_schemas::engine::{
    Issue, IssueKind, ParseError, PathSegment, Schema, SchemaFailure,
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_library_version() {
        assert!(!VERSION.is_empty());
    }
}
