//! Server-side handling of the submitted field.
//!
//! [`QuillFormField`] turns the submitted hidden-field text into a stored
//! value; [`QuillModelField`] describes how that value is persisted.

use serde_json::{Map, Value};
use thiserror::Error;

use crate::validate::{validate_value, ValidationError};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FormError {
    #[error("This field is required.")]
    Required,
    #[error("Enter a valid JSON.")]
    InvalidJson,
    #[error("This field cannot be null.")]
    Null,
    #[error(transparent)]
    Invalid(#[from] ValidationError),
}

impl FormError {
    pub fn code(&self) -> &'static str {
        match self {
            FormError::Required => "required",
            FormError::InvalidJson | FormError::Invalid(_) => "invalid",
            FormError::Null => "null",
        }
    }
}

fn empty_object() -> Value {
    Value::Object(Map::new())
}

fn is_empty_value(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.is_empty(),
        Value::Array(items) => items.is_empty(),
        Value::Object(map) => map.is_empty(),
        _ => false,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuillFormField {
    pub required: bool,
}

impl Default for QuillFormField {
    fn default() -> Self {
        Self { required: true }
    }
}

impl QuillFormField {
    pub fn new(required: bool) -> Self {
        Self { required }
    }

    /// Convert submitted text to a value. Empty submissions become `{}`.
    pub fn to_value(&self, raw: Option<&str>) -> Result<Value, FormError> {
        match raw.map(str::trim) {
            None | Some("") => Ok(empty_object()),
            Some(text) => serde_json::from_str(text).map_err(|_| FormError::InvalidJson),
        }
    }

    pub fn validate(&self, value: &Value) -> Result<(), FormError> {
        if self.required && is_empty_value(value) {
            return Err(FormError::Required);
        }
        validate_value(Some(value))?;
        Ok(())
    }

    /// Parse and validate a submission.
    pub fn clean(&self, raw: Option<&str>) -> Result<Value, FormError> {
        let value = self.to_value(raw)?;
        self.validate(&value)?;
        tracing::debug!(empty = is_empty_value(&value), "cleaned quill field");
        Ok(value)
    }

    /// Text to put in the hidden field when rendering the form.
    pub fn prepare_value(&self, value: Option<&Value>) -> String {
        match value {
            None | Some(Value::Null) => "{}".to_string(),
            Some(value) => value.to_string(),
        }
    }
}

/// Persistence rules for a stored value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct QuillModelField {
    /// Whether a missing value may be stored as SQL `NULL`.
    pub null: bool,
}

impl QuillModelField {
    /// New rows start with the empty object.
    pub fn default_value(&self) -> Value {
        empty_object()
    }

    pub fn validate(&self, value: Option<&Value>) -> Result<(), FormError> {
        if !self.null && value.map_or(true, Value::is_null) {
            return Err(FormError::Null);
        }
        validate_value(value)?;
        Ok(())
    }

    /// The form field used to edit this model field.
    pub fn form_field(&self, required: bool) -> QuillFormField {
        QuillFormField::new(required)
    }
}
