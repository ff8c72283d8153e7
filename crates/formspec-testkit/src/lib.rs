//! Test infrastructure for the formspec validation layer
//!
//! This crate provides a small, deterministic schema engine for exercising
//! the validation layer in tests without a production engine: leaf rules
//! that emit the same issue shapes real engines report (missing values,
//! type mismatches, bound violations, format and enum failures), plus
//! instrumented wrappers for observing engine interactions (parse counting,
//! always-unclassified failures).
//!
//! It is test tooling, not a shipped schema language.

pub mod instrument;
pub mod schemas;

pub use instrument::{AcceptAll, CountingSchema, UnclassifiedSchema};
pub use schemas::{NumberRule, ObjectSchema, Rule, StringRule};
