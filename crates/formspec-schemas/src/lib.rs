//! Formspec Schemas - engine contract and conditional combinators
//!
//! This crate defines the schema-engine contract the formspec validation
//! layer consumes, and the combinators that compose schema fragments with
//! runtime conditions:
//!
//! - **Engine contract**: the [`Schema`] trait plus the [`Issue`] data model
//!   every engine reports failures through. An engine either returns the
//!   validated value or fails with an ordered list of path-tagged issues;
//!   anything else is an unclassified failure with no field detail.
//! - **JSON Schema adapter**: [`JsonSchema`] compiles a JSON Schema document
//!   (draft 2020-12) and maps the `jsonschema` crate's errors into issues.
//! - **Conditional combinators**: fields required only under a condition,
//!   fragments gated on a predicate, and named cross-field checks for
//!   object-level refinement (password-confirmation style rules).
//!
//! ## Quick Start
//!
//! ```
//! use formspec_schemas::{JsonSchema, Schema};
//! use serde_json::json;
//!
//! let schema = JsonSchema::compile(&json!({
//!     "type": "object",
//!     "properties": {"name": {"type": "string", "minLength": 3}},
//!     "required": ["name"]
//! }))
//! .unwrap();
//!
//! match schema.parse(&json!({"name": "AB"})) {
//!     Ok(_) => println!("valid"),
//!     Err(e) => println!("invalid: {}", e),
//! }
//! ```
//!
//! Copyright (c) 2025 Formspec Team
//! Licensed under the Apache-2.0 license

pub mod conditional;
pub mod engine;

// Re-export commonly used types for convenience
pub use conditional::{
    conditional, cross_field_check, refined, required_if, required_when, Conditional,
    CrossFieldCheck, Refined, RequiredIf, RequiredWhen,
};
pub use engine::{
    schema_fn, Issue, IssueKind, JsonSchema, ParseError, PathSegment, Schema, SchemaFailure,
    SchemaFn,
};
pub use engine::jsonschema::SchemaCompileError;
