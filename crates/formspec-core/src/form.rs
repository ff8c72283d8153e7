//! Form state with mode-gated, debounced re-validation
//!
//! [`FormState`] owns the nested form data and the touched-field set;
//! external code mutates them only through the named operations here. Change
//! and blur triggers re-validate under the configured [`ValidationMode`],
//! routed through the debouncer so rapid keystrokes collapse into one
//! validation pass; `validate` stays synchronous and authoritative for
//! submit-time gating.
//!
//! The debounced pass is eventually-consistent cosmetic feedback: it runs
//! against whatever the data is when the timer fires, so a reset with a
//! pending timer stays harmless.
//!
//! Copyright (c) 2025 Formspec Team
//! Licensed under the Apache-2.0 license

use crate::debounce::Debouncer;
use crate::error::{Error, Result};
use crate::format::{format_failure, FieldError, FormatOptions, ValidationError};
use formspec_schemas::engine::{ParseError, Schema};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tracing::{debug, warn};

/// When the form state re-validates on its own.
///
/// The mode gates only the automatic triggers; `validate` is always
/// available regardless of mode.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ValidationMode {
    /// Only on explicit `validate` calls
    #[default]
    OnSubmit,
    /// On field blur
    OnBlur,
    /// On field change, debounced
    OnChange,
    /// On both blur and change
    All,
}

impl ValidationMode {
    fn validates_on_change(self) -> bool {
        matches!(self, ValidationMode::OnChange | ValidationMode::All)
    }

    fn validates_on_blur(self) -> bool {
        matches!(self, ValidationMode::OnBlur | ValidationMode::All)
    }
}

/// Configuration for [`FormState::new`].
#[derive(Debug, Clone)]
pub struct FormOptions {
    /// Starting form data; also the value `reset` restores
    pub initial_data: Value,
    pub mode: ValidationMode,
    /// Run a full validation pass immediately on construction
    pub validate_on_mount: bool,
    /// Quiet period for change-triggered validation
    pub debounce_delay: Duration,
}

impl Default for FormOptions {
    fn default() -> Self {
        Self {
            initial_data: Value::Object(Map::new()),
            mode: ValidationMode::OnSubmit,
            validate_on_mount: false,
            debounce_delay: Duration::from_millis(300),
        }
    }
}

impl FormOptions {
    pub fn with_initial_data(mut self, data: Value) -> Self {
        self.initial_data = data;
        self
    }

    pub fn with_mode(mut self, mode: ValidationMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_validate_on_mount(mut self) -> Self {
        self.validate_on_mount = true;
        self
    }

    pub fn with_debounce_delay(mut self, delay: Duration) -> Self {
        self.debounce_delay = delay;
        self
    }
}

#[derive(Debug, Default)]
struct FormStateInner {
    data: Value,
    touched: HashSet<String>,
    errors: HashMap<String, String>,
    message: Option<String>,
}

/// Long-lived form state for one schema.
pub struct FormState {
    schema: Arc<dyn Schema>,
    mode: ValidationMode,
    initial_data: Value,
    debouncer: Debouncer,
    inner: Arc<Mutex<FormStateInner>>,
}

impl FormState {
    pub fn new(schema: Arc<dyn Schema>, options: FormOptions) -> Self {
        let state = Self {
            schema,
            mode: options.mode,
            initial_data: options.initial_data.clone(),
            debouncer: Debouncer::new(options.debounce_delay),
            inner: Arc::new(Mutex::new(FormStateInner {
                data: options.initial_data,
                ..FormStateInner::default()
            })),
        };
        if options.validate_on_mount {
            state.validate();
        }
        state
    }

    /// The configured trigger mode.
    pub fn mode(&self) -> ValidationMode {
        self.mode
    }

    /// A clone of the current form data.
    pub fn data(&self) -> Value {
        self.lock().data.clone()
    }

    /// Set one field, supporting a single `parent.child` nesting level, and
    /// mark it touched. Under change-triggered modes this schedules a
    /// debounced validation pass for the field.
    pub fn set_field(&self, name: &str, value: Value) -> Result<()> {
        ensure_supported_depth(name)?;
        {
            let mut inner = self.lock();
            apply_field(&mut inner.data, name, value);
            inner.touched.insert(name.to_string());
        }
        if self.mode.validates_on_change() {
            self.schedule_field_validation(name);
        }
        Ok(())
    }

    /// Read one field, mirroring `set_field`'s nesting support.
    pub fn get_field(&self, name: &str) -> Result<Option<Value>> {
        ensure_supported_depth(name)?;
        let inner = self.lock();
        let value = match name.split_once('.') {
            Some((parent, child)) => inner.data.get(parent).and_then(|p| p.get(child)).cloned(),
            None => inner.data.get(name).cloned(),
        };
        Ok(value)
    }

    /// Replace the whole data object. Under change-triggered modes this
    /// schedules a debounced full validation pass.
    pub fn set_form_data(&self, data: Value) {
        {
            self.lock().data = data;
        }
        if self.mode.validates_on_change() {
            self.schedule_full_validation();
        }
    }

    /// Replace the data object as a function of the previous value.
    pub fn update_form_data<F>(&self, update: F)
    where
        F: FnOnce(&Value) -> Value,
    {
        {
            let mut inner = self.lock();
            inner.data = update(&inner.data);
        }
        if self.mode.validates_on_change() {
            self.schedule_full_validation();
        }
    }

    /// Mark a field touched on blur. Under blur-triggered modes this
    /// schedules a debounced validation pass for the field.
    pub fn blur_field(&self, name: &str) {
        {
            self.lock().touched.insert(name.to_string());
        }
        if self.mode.validates_on_blur() {
            self.schedule_field_validation(name);
        }
    }

    /// Synchronous full validation against the current data, regardless of
    /// mode; returns the failure report, if any, and replaces the stored
    /// error state either way.
    pub fn validate(&self) -> Option<ValidationError> {
        let data = self.lock().data.clone();
        match self.schema.parse(&data) {
            Ok(_) => {
                let mut inner = self.lock();
                inner.errors.clear();
                inner.message = None;
                None
            }
            Err(ParseError::Schema(failure)) => {
                let error = format_failure(&failure, &FormatOptions::default());
                let mut inner = self.lock();
                inner.errors = error.field_errors.clone();
                inner.message = error.message.clone();
                Some(error)
            }
            Err(other) => {
                warn!(error = %other, "unclassified engine failure during validation");
                let error = ValidationError::generic();
                let mut inner = self.lock();
                inner.errors.clear();
                inner.message = error.message.clone();
                Some(error)
            }
        }
    }

    /// Validate the current data and return just one field's combined
    /// message, without touching the stored error state.
    pub fn validate_field(&self, name: &str) -> Option<String> {
        let data = self.lock().data.clone();
        match self.schema.parse(&data) {
            Ok(_) => None,
            Err(ParseError::Schema(failure)) => {
                format_failure(&failure, &FormatOptions::default())
                    .field_errors
                    .get(name)
                    .cloned()
            }
            Err(_) => None,
        }
    }

    /// Whether the current error state is empty.
    pub fn is_valid(&self) -> bool {
        self.lock().errors.is_empty()
    }

    /// Combined message per field from the last validation pass.
    pub fn errors(&self) -> HashMap<String, String> {
        self.lock().errors.clone()
    }

    /// The stored errors as a field-error list.
    pub fn field_errors(&self) -> Vec<FieldError> {
        self.lock()
            .errors
            .iter()
            .map(|(path, message)| FieldError {
                path: path.clone(),
                message: message.clone(),
                code: None,
            })
            .collect()
    }

    /// Top-level message from the last validation pass, if any.
    pub fn error_message(&self) -> Option<String> {
        self.lock().message.clone()
    }

    /// The combined message for one field, if it has an error.
    pub fn field_error(&self, name: &str) -> Option<String> {
        self.lock().errors.get(name).cloned()
    }

    /// Whether a field has been touched since construction or the last
    /// reset.
    pub fn is_touched(&self, name: &str) -> bool {
        self.lock().touched.contains(name)
    }

    /// Drop all stored errors without re-running the schema.
    pub fn clear_errors(&self) {
        let mut inner = self.lock();
        inner.errors.clear();
        inner.message = None;
    }

    /// Drop one field's stored error without re-running the schema.
    pub fn clear_field_error(&self, name: &str) {
        self.lock().errors.remove(name);
    }

    /// Restore the captured initial data and clear touched state and
    /// errors. A debounced validation still pending fires against the new
    /// data, which is harmless because re-validation is idempotent.
    pub fn reset(&self) {
        let mut inner = self.lock();
        inner.data = self.initial_data.clone();
        inner.touched.clear();
        inner.errors.clear();
        inner.message = None;
    }

    fn lock(&self) -> MutexGuard<'_, FormStateInner> {
        lock_inner(&self.inner)
    }

    fn schedule_field_validation(&self, name: &str) {
        let schema = Arc::clone(&self.schema);
        let inner = Arc::clone(&self.inner);
        let field = name.to_string();
        debug!(field = %field, "scheduling debounced field validation");
        self.debouncer.call(move || {
            let data = lock_inner(&inner).data.clone();
            match schema.parse(&data) {
                Ok(_) => {
                    let mut state = lock_inner(&inner);
                    state.errors.remove(&field);
                    if state.errors.is_empty() {
                        state.message = None;
                    }
                }
                Err(ParseError::Schema(failure)) => {
                    let error = format_failure(&failure, &FormatOptions::default());
                    let mut state = lock_inner(&inner);
                    match error.field_errors.get(&field) {
                        Some(message) => {
                            state.errors.insert(field.clone(), message.clone());
                        }
                        None => {
                            state.errors.remove(&field);
                        }
                    }
                }
                Err(other) => {
                    warn!(error = %other, "unclassified engine failure during debounced validation");
                }
            }
        });
    }

    fn schedule_full_validation(&self) {
        let schema = Arc::clone(&self.schema);
        let inner = Arc::clone(&self.inner);
        debug!("scheduling debounced full validation");
        self.debouncer.call(move || {
            let data = lock_inner(&inner).data.clone();
            match schema.parse(&data) {
                Ok(_) => {
                    let mut state = lock_inner(&inner);
                    state.errors.clear();
                    state.message = None;
                }
                Err(ParseError::Schema(failure)) => {
                    let error = format_failure(&failure, &FormatOptions::default());
                    let mut state = lock_inner(&inner);
                    state.errors = error.field_errors;
                    state.message = error.message;
                }
                Err(other) => {
                    warn!(error = %other, "unclassified engine failure during debounced validation");
                }
            }
        });
    }
}

fn lock_inner(inner: &Mutex<FormStateInner>) -> MutexGuard<'_, FormStateInner> {
    inner.lock().unwrap_or_else(PoisonError::into_inner)
}

fn ensure_supported_depth(name: &str) -> Result<()> {
    if name.split('.').count() > 2 {
        return Err(Error::FieldDepth {
            field: name.to_string(),
        });
    }
    Ok(())
}

/// Write a field into the data object, shallow-merging one `parent.child`
/// level. A non-object parent value is replaced by a fresh object.
fn apply_field(data: &mut Value, name: &str, value: Value) {
    if !data.is_object() {
        *data = Value::Object(Map::new());
    }
    let Some(root) = data.as_object_mut() else {
        return;
    };
    match name.split_once('.') {
        Some((parent, child)) => {
            let entry = root
                .entry(parent.to_string())
                .or_insert_with(|| Value::Object(Map::new()));
            if !entry.is_object() {
                *entry = Value::Object(Map::new());
            }
            if let Value::Object(map) = entry {
                map.insert(child.to_string(), value);
            }
        }
        None => {
            root.insert(name.to_string(), value);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use formspec_schemas::engine::schema_fn;
    use serde_json::json;

    fn accept_anything() -> Arc<dyn Schema> {
        Arc::new(schema_fn(|value: &Value| Ok(value.clone())))
    }

    #[test]
    fn test_set_and_get_flat_field() {
        let form = FormState::new(accept_anything(), FormOptions::default());
        form.set_field("address", json!("Main St 1")).unwrap();
        assert_eq!(form.get_field("address").unwrap(), Some(json!("Main St 1")));
        assert!(form.is_touched("address"));
        assert!(!form.is_touched("phone"));
    }

    #[test]
    fn test_set_field_shallow_merges_one_level() {
        let form = FormState::new(
            accept_anything(),
            FormOptions::default().with_initial_data(json!({"name": {"en": "Old"}})),
        );
        form.set_field("name.he", json!("חדש")).unwrap();
        assert_eq!(form.data(), json!({"name": {"en": "Old", "he": "חדש"}}));
    }

    #[test]
    fn test_set_field_replaces_non_object_parent() {
        let form = FormState::new(
            accept_anything(),
            FormOptions::default().with_initial_data(json!({"name": "flat"})),
        );
        form.set_field("name.en", json!("Nested")).unwrap();
        assert_eq!(form.data(), json!({"name": {"en": "Nested"}}));
    }

    #[test]
    fn test_deeper_nesting_is_rejected() {
        let form = FormState::new(accept_anything(), FormOptions::default());
        let err = form.set_field("a.b.c", json!(1)).unwrap_err();
        assert!(matches!(err, Error::FieldDepth { .. }));
        assert!(form.get_field("a.b.c").is_err());
    }

    #[test]
    fn test_update_form_data_sees_previous_value() {
        let form = FormState::new(
            accept_anything(),
            FormOptions::default().with_initial_data(json!({"count": 1})),
        );
        form.update_form_data(|previous| {
            let mut next = previous.clone();
            next["count"] = json!(previous["count"].as_i64().unwrap_or(0) + 1);
            next
        });
        assert_eq!(form.data(), json!({"count": 2}));
    }

    #[test]
    fn test_reset_restores_initial_data_and_clears_touched() {
        let form = FormState::new(
            accept_anything(),
            FormOptions::default().with_initial_data(json!({"address": "Main St 1"})),
        );
        form.set_field("address", json!("Other St 2")).unwrap();
        form.set_field("phone", json!("050")).unwrap();
        assert!(form.is_touched("address"));

        form.reset();
        assert_eq!(form.data(), json!({"address": "Main St 1"}));
        assert!(!form.is_touched("address"));
        assert!(!form.is_touched("phone"));
        assert!(form.is_valid());
    }

    #[test]
    fn test_clear_field_error_is_local() {
        let form = FormState::new(accept_anything(), FormOptions::default());
        {
            let mut inner = form.lock();
            inner.errors.insert("name".to_string(), "bad".to_string());
            inner.errors.insert("email".to_string(), "bad".to_string());
        }
        form.clear_field_error("name");
        assert!(form.field_error("name").is_none());
        assert_eq!(form.field_error("email").as_deref(), Some("bad"));

        form.clear_errors();
        assert!(form.is_valid());
    }

    #[test]
    fn test_validation_mode_gates() {
        assert!(ValidationMode::OnChange.validates_on_change());
        assert!(ValidationMode::All.validates_on_change());
        assert!(!ValidationMode::OnBlur.validates_on_change());
        assert!(ValidationMode::OnBlur.validates_on_blur());
        assert!(ValidationMode::All.validates_on_blur());
        assert!(!ValidationMode::OnSubmit.validates_on_blur());
    }
}
