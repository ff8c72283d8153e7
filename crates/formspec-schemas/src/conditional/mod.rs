//! Conditional schema combinators
//!
//! Builders that compose [`Schema`](crate::engine::Schema) fragments with
//! runtime conditions: a field required only when another field holds a given
//! value, a fragment applied only under a predicate, and named cross-field
//! checks for object-level refinement. Combinators depend solely on the
//! engine contract's composition surface; they carry no schema language of
//! their own.
//!
//! On violation, the issue is attached to the *target* field path the caller
//! named, never to the dependent field.
//!
//! Copyright (c) 2025 Formspec Team
//! Licensed under the Apache-2.0 license

pub mod cross_field;
pub mod required;

pub use cross_field::{cross_field_check, refined, CrossFieldCheck, Refined};
pub use required::{conditional, required_if, required_when, Conditional, RequiredIf, RequiredWhen};

use crate::engine::PathSegment;
use serde_json::Value;

/// Read a field value from an object, supporting one level of dotted
/// nesting (`parent.child`).
pub(crate) fn nested_value<'a>(data: &'a Value, field: &str) -> Option<&'a Value> {
    match field.split_once('.') {
        Some((parent, child)) => data.get(parent)?.get(child),
        None => data.get(field),
    }
}

/// Split a dotted field name into path segments, reading canonical decimal
/// segments as array indices.
pub(crate) fn field_segments(field: &str) -> Vec<PathSegment> {
    field
        .split('.')
        .map(|seg| match seg.parse::<usize>() {
            Ok(index) if seg == "0" || !seg.starts_with('0') => PathSegment::Index(index),
            _ => PathSegment::Key(seg.to_string()),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_nested_value_reads_one_level() {
        let data = json!({"type": "premium", "name": {"en": "Studio"}});
        assert_eq!(nested_value(&data, "type"), Some(&json!("premium")));
        assert_eq!(nested_value(&data, "name.en"), Some(&json!("Studio")));
        assert_eq!(nested_value(&data, "name.he"), None);
        assert_eq!(nested_value(&data, "missing"), None);
    }

    #[test]
    fn test_field_segments_reads_indices() {
        assert_eq!(
            field_segments("items.0.name"),
            vec![
                PathSegment::Key("items".to_string()),
                PathSegment::Index(0),
                PathSegment::Key("name".to_string()),
            ]
        );
    }
}
