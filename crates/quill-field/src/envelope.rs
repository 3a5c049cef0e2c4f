//! The JSON envelope stored in the hidden field.
//!
//! Written as `{"delta": {"ops": [...]}}`, or `{}` for an empty document.
//! Read back leniently: older values carry the delta at the top level.

use serde::ser::{Serialize, SerializeMap, Serializer};
use serde_json::{Map, Value};
use thiserror::Error;

use crate::delta::Delta;

/// Key the delta is namespaced under.
pub const DELTA_KEY: &str = "delta";

#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("stored value is not valid JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),
}

/// A decoded stored value, resolved once into one of the two accepted shapes.
#[derive(Debug, Clone, PartialEq)]
pub enum StoredValue {
    /// `{"delta": <ops>}`.
    Namespaced { delta: Value },
    /// Anything without a (non-null) `delta` key, handed over as the delta
    /// itself.
    Bare(Value),
}

impl StoredValue {
    /// Decode field text. Absent, empty and whitespace-only text decode as
    /// the empty object, so the surface starts blank.
    pub fn decode(text: Option<&str>) -> Result<Self, DecodeError> {
        let value = match text.map(str::trim) {
            None | Some("") => Value::Object(Map::new()),
            Some(text) => serde_json::from_str(text)?,
        };
        Ok(Self::from_value(value))
    }

    pub fn from_value(value: Value) -> Self {
        match value {
            Value::Object(mut map) if map.get(DELTA_KEY).is_some_and(|d| !d.is_null()) => {
                let delta = map.remove(DELTA_KEY).unwrap_or(Value::Null);
                StoredValue::Namespaced { delta }
            }
            other => StoredValue::Bare(other),
        }
    }

    /// The value to load into the surface.
    pub fn delta(&self) -> &Value {
        match self {
            StoredValue::Namespaced { delta } => delta,
            StoredValue::Bare(delta) => delta,
        }
    }

    pub fn into_delta(self) -> Value {
        match self {
            StoredValue::Namespaced { delta } => delta,
            StoredValue::Bare(delta) => delta,
        }
    }

    pub fn is_legacy(&self) -> bool {
        matches!(self, StoredValue::Bare(_))
    }
}

/// The value written to the hidden field.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Empty,
    Delta(Delta),
}

impl FieldValue {
    /// Read the surface contents as a field value. A blank document
    /// normalizes to [`FieldValue::Empty`].
    pub fn from_contents(contents: &Delta) -> Self {
        if contents.is_blank_document() {
            FieldValue::Empty
        } else {
            FieldValue::Delta(contents.clone())
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, FieldValue::Empty)
    }

    pub fn delta(&self) -> Option<&Delta> {
        match self {
            FieldValue::Empty => None,
            FieldValue::Delta(delta) => Some(delta),
        }
    }

    pub fn encode(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    pub fn to_value(&self) -> Result<Value, serde_json::Error> {
        serde_json::to_value(self)
    }
}

impl Serialize for FieldValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            FieldValue::Empty => serializer.serialize_map(Some(0))?.end(),
            FieldValue::Delta(delta) => {
                let mut map = serializer.serialize_map(Some(1))?;
                map.serialize_entry(DELTA_KEY, delta)?;
                map.end()
            }
        }
    }
}
