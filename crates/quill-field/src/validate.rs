//! Validation of values before they are stored.

use serde_json::Value;
use thiserror::Error;

use crate::envelope::DELTA_KEY;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Value must be a object.")]
    NotAnObject,
    #[error("Value object must have a delta key.")]
    MissingDelta,
}

impl ValidationError {
    /// Machine-readable error code.
    pub fn code(&self) -> &'static str {
        "invalid"
    }
}

/// Check a value is fit to store.
///
/// Nothing, `null` and the empty object are accepted; anything else must be an
/// object with a `delta` key. The delta itself is not inspected.
///
/// ```
/// use quill_field::validate::validate_value;
/// use serde_json::json;
///
/// assert!(validate_value(None).is_ok());
/// assert!(validate_value(Some(&json!({}))).is_ok());
/// assert!(validate_value(Some(&json!({"delta": {"ops": []}}))).is_ok());
/// assert!(validate_value(Some(&json!([]))).is_err());
/// ```
pub fn validate_value(value: Option<&Value>) -> Result<(), ValidationError> {
    let Some(value) = value else {
        return Ok(());
    };
    match value {
        Value::Null => Ok(()),
        Value::Object(map) if map.is_empty() => Ok(()),
        Value::Object(map) if map.contains_key(DELTA_KEY) => Ok(()),
        Value::Object(_) => Err(ValidationError::MissingDelta),
        _ => Err(ValidationError::NotAnObject),
    }
}
