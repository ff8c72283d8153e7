//! Instrumented schema wrappers for observing engine interactions

use formspec_schemas::engine::{ParseError, Schema};
use serde_json::Value;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// Schema accepting any value unchanged.
#[derive(Debug, Clone, Copy, Default)]
pub struct AcceptAll;

impl Schema for AcceptAll {
    fn parse(&self, data: &Value) -> Result<Value, ParseError> {
        Ok(data.clone())
    }
}

/// Wrapper counting how many times `parse` runs.
///
/// Clones share the counter, so a clone can be handed to the code under
/// test while the original observes the count:
///
/// ```
/// use formspec_testkit::{AcceptAll, CountingSchema};
/// use formspec_schemas::Schema;
/// use serde_json::json;
/// use std::sync::Arc;
///
/// let counting = CountingSchema::new(Arc::new(AcceptAll));
/// let schema = counting.clone();
/// schema.parse(&json!({})).unwrap();
/// assert_eq!(counting.parse_count(), 1);
/// ```
#[derive(Clone)]
pub struct CountingSchema {
    inner: Arc<dyn Schema>,
    calls: Arc<AtomicUsize>,
}

impl CountingSchema {
    pub fn new(inner: Arc<dyn Schema>) -> Self {
        Self {
            inner,
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Number of `parse` calls observed so far.
    pub fn parse_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl Schema for CountingSchema {
    fn parse(&self, data: &Value) -> Result<Value, ParseError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.inner.parse(data)
    }
}

/// Schema that always fails with an unclassified, non-structured error.
#[derive(Debug, Clone)]
pub struct UnclassifiedSchema {
    message: String,
}

impl UnclassifiedSchema {
    pub fn new<M: Into<String>>(message: M) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl Default for UnclassifiedSchema {
    fn default() -> Self {
        Self::new("engine exploded")
    }
}

impl Schema for UnclassifiedSchema {
    fn parse(&self, _data: &Value) -> Result<Value, ParseError> {
        Err(ParseError::unclassified(self.message.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_counting_schema_shares_counter_across_clones() {
        let counting = CountingSchema::new(Arc::new(AcceptAll));
        let clone = counting.clone();

        clone.parse(&json!({})).unwrap();
        clone.parse(&json!({})).unwrap();

        assert_eq!(counting.parse_count(), 2);
    }

    #[test]
    fn test_unclassified_schema_is_not_structured() {
        let schema = UnclassifiedSchema::default();
        let err = schema.parse(&json!({})).unwrap_err();
        assert!(err.as_schema_failure().is_none());
    }
}
