//! Unit tests composing the conditional combinators with the JSON Schema
//! engine adapter

use formspec_schemas::conditional::{cross_field_check, refined, required_if};
use formspec_schemas::engine::{ParseError, PathSegment, Schema};
use formspec_schemas::JsonSchema;
use serde_json::json;
use std::sync::Arc;

fn short_string() -> Arc<dyn Schema> {
    Arc::new(JsonSchema::compile(&json!({"type": "string", "minLength": 3})).unwrap())
}

#[test]
fn test_required_if_over_compiled_fragment() {
    let schema = required_if("premiumFeature", "type", json!("premium"), short_string());

    assert!(schema.is_valid(&json!({"type": "basic"})));
    assert!(schema.is_valid(&json!({"type": "premium", "premiumFeature": "priority"})));
    assert!(!schema.is_valid(&json!({"type": "premium"})));
}

#[test]
fn test_fragment_issues_rerooted_at_target() {
    let schema = required_if("premiumFeature", "type", json!("premium"), short_string());

    let err = schema
        .parse(&json!({"type": "premium", "premiumFeature": "ab"}))
        .unwrap_err();
    let failure = match err {
        ParseError::Schema(failure) => failure,
        other => panic!("expected structured failure, got {}", other),
    };
    assert_eq!(failure.issues[0].code(), "too_small");
    assert_eq!(
        failure.issues[0].path,
        vec![PathSegment::Key("premiumFeature".to_string())]
    );
}

#[test]
fn test_refinement_over_compiled_base() {
    let base = Arc::new(
        JsonSchema::compile(&json!({
            "type": "object",
            "properties": {
                "password": {"type": "string", "minLength": 8},
                "confirmPassword": {"type": "string"}
            },
            "required": ["password", "confirmPassword"]
        }))
        .unwrap(),
    );
    let check = cross_field_check(["password", "confirmPassword"], |values| {
        values[0] == values[1]
    });
    let schema = refined(base, check, "Passwords must match", "confirmPassword");

    assert!(schema.is_valid(&json!({
        "password": "secret-123",
        "confirmPassword": "secret-123"
    })));

    let err = schema
        .parse(&json!({
            "password": "secret-123",
            "confirmPassword": "secret-124"
        }))
        .unwrap_err();
    let failure = match err {
        ParseError::Schema(failure) => failure,
        other => panic!("expected structured failure, got {}", other),
    };
    assert_eq!(
        failure.issues[0].path,
        vec![PathSegment::Key("confirmPassword".to_string())]
    );
    assert_eq!(failure.issues[0].message, "Passwords must match");
}
