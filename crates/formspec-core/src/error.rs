//! Error types for the formspec core library
//!
//! Validation failures are data, not errors: they surface as
//! [`ValidationError`](crate::format::ValidationError) values and never
//! propagate as `Err`. The `Err` surface below is reserved for contract
//! misuse by the caller.

use thiserror::Error;

/// Main error type for formspec operations
#[derive(Debug, Error)]
pub enum Error {
    /// Dotted field names support a single `parent.child` level; deeper
    /// nesting must be modeled as nested object values.
    #[error("field name '{field}' nests deeper than the supported parent.child level")]
    FieldDepth { field: String },
}

/// Convenience type alias for Results using our Error type
pub type Result<T> = std::result::Result<T, Error>;
