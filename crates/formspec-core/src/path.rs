//! Dotted field names and path segments
//!
//! Pure, total conversions between the dotted field names callers address
//! form values with (`name.en`, `items.0.title`) and the path-segment lists
//! schema engines report issues against, plus wildcard pattern matching and
//! parent/child derivation.
//!
//! Splitting is on `.` only; there is no escaping for field names that
//! themselves contain a literal dot.
//!
//! Copyright (c) 2025 Formspec Team
//! Licensed under the Apache-2.0 license

use formspec_schemas::engine::PathSegment;
use regex::Regex;

/// Split a dotted field name into path segments.
///
/// Canonical decimal segments (no leading zeros) become array indices, so
/// `items.0.name` addresses the first element of `items`.
pub fn field_to_path(name: &str) -> Vec<PathSegment> {
    name.split('.')
        .map(|seg| match seg.parse::<usize>() {
            Ok(index) if seg == "0" || !seg.starts_with('0') => PathSegment::Index(index),
            _ => PathSegment::Key(seg.to_string()),
        })
        .collect()
}

/// Join path segments into a dotted field name, rendering array indices in
/// their decimal string form (`["items", 0, "name"]` -> `items.0.name`).
pub fn path_to_field(path: &[PathSegment]) -> String {
    path.iter()
        .map(|seg| seg.to_string())
        .collect::<Vec<_>>()
        .join(".")
}

/// Whether a field name matches a wildcard pattern.
///
/// Exact equality short-circuits. Otherwise each `*` segment in the pattern
/// matches exactly one non-dot segment, and the whole pattern must match the
/// whole field name: `name.*` matches `name.en` but not `name.en.long` or
/// `address.en`.
pub fn matches_field_pattern(field: &str, pattern: &str) -> bool {
    if field == pattern {
        return true;
    }
    let body = pattern
        .split('.')
        .map(|seg| {
            if seg == "*" {
                "[^.]+".to_string()
            } else {
                regex::escape(seg)
            }
        })
        .collect::<Vec<_>>()
        .join("\\.");
    Regex::new(&format!("^{}$", body))
        .map(|re| re.is_match(field))
        .unwrap_or(false)
}

/// The parent of a dotted field name, if it has one
/// (`a.b.c` -> `a.b`, `a` -> `None`).
pub fn parent_field(field: &str) -> Option<&str> {
    field.rsplit_once('.').map(|(parent, _)| parent)
}

/// Every field in `all_fields` nested under `field`
/// (`name` -> `name.en`, `name.he`, but never `name` itself).
pub fn child_fields<'a>(field: &str, all_fields: &'a [String]) -> Vec<&'a str> {
    let prefix = format!("{}.", field);
    all_fields
        .iter()
        .filter(|candidate| candidate.starts_with(&prefix))
        .map(String::as_str)
        .collect()
}
