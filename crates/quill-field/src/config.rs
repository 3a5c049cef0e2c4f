//! Editor options and crate settings.

use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid settings: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("editor options must be a JSON object")]
    NotAnObject,
}

/// Options handed to the editor constructor.
///
/// Opaque to this crate: whatever keys are present are passed on as-is. The
/// helpers only cover the handful of keys the in-memory surface looks at.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EditorConfig(Map<String, Value>);

impl EditorConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_value(value: Value) -> Result<Self, ConfigError> {
        match value {
            Value::Object(map) => Ok(Self(map)),
            _ => Err(ConfigError::NotAnObject),
        }
    }

    pub fn with(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.0.insert(key.to_string(), value.into());
        self
    }

    pub fn theme(self, theme: &str) -> Self {
        self.with("theme", theme)
    }

    pub fn placeholder(self, placeholder: &str) -> Self {
        self.with("placeholder", placeholder)
    }

    pub fn read_only(self, read_only: bool) -> Self {
        self.with("readOnly", read_only)
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn is_read_only(&self) -> bool {
        self.get("readOnly").and_then(Value::as_bool).unwrap_or(false)
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    pub fn to_value(&self) -> Value {
        Value::Object(self.0.clone())
    }
}

/// Settings for rendering and binding fields.
///
/// ```toml
/// js = ["https://cdn.quilljs.com/1.3.7/quill.min.js", "quill/quill.js"]
/// css = ["https://cdn.quilljs.com/1.3.7/quill.snow.css"]
///
/// [editor]
/// theme = "snow"
/// placeholder = "Write something…"
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct QuillSettings {
    /// Scripts the page must load, in order.
    pub js: Vec<String>,
    /// Stylesheets the page must load.
    pub css: Vec<String>,
    /// Default editor options for every widget.
    pub editor: EditorConfig,
}

impl Default for QuillSettings {
    fn default() -> Self {
        Self {
            js: vec![
                "https://cdn.quilljs.com/1.3.7/quill.min.js".into(),
                "quill/quill.js".into(),
            ],
            css: vec!["https://cdn.quilljs.com/1.3.7/quill.snow.css".into()],
            editor: EditorConfig::new().theme("snow"),
        }
    }
}

impl QuillSettings {
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let settings = Self::from_toml_str(&text)?;
        tracing::debug!(path = %path.display(), "loaded settings");
        Ok(settings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn editor_config_is_passed_through_verbatim() {
        let options = json!({
            "theme": "bubble",
            "modules": {"toolbar": [["bold", "italic"], ["link"]]},
            "somethingUnknown": 3
        });
        let config = EditorConfig::from_value(options.clone()).unwrap();
        assert_eq!(config.to_value(), options);
        assert_eq!(serde_json::to_value(&config).unwrap(), options);
    }

    #[test]
    fn editor_config_helpers() {
        let config = EditorConfig::new()
            .theme("snow")
            .placeholder("Notes")
            .read_only(true);
        assert_eq!(config.get("theme"), Some(&json!("snow")));
        assert_eq!(config.get("placeholder"), Some(&json!("Notes")));
        assert!(config.is_read_only());
        assert!(!EditorConfig::new().is_read_only());
        assert!(EditorConfig::from_value(json!([1])).is_err());
    }

    #[test]
    fn settings_default_to_snow_theme() {
        let settings = QuillSettings::default();
        assert_eq!(settings.editor.get("theme"), Some(&json!("snow")));
        assert_eq!(settings.js.len(), 2);
    }

    #[test]
    fn settings_parse_from_toml_with_defaults() {
        let settings = QuillSettings::from_toml_str(
            r#"
            css = ["/static/quill.bubble.css"]

            [editor]
            theme = "bubble"
            readOnly = true

            [editor.modules]
            toolbar = false
            "#,
        )
        .unwrap();
        assert_eq!(settings.css, vec!["/static/quill.bubble.css".to_string()]);
        assert_eq!(settings.js, QuillSettings::default().js);
        assert_eq!(
            settings.editor.to_value(),
            json!({"theme": "bubble", "readOnly": true, "modules": {"toolbar": false}})
        );
        assert!(settings.editor.is_read_only());
    }

    #[test]
    fn settings_report_toml_errors() {
        assert!(matches!(
            QuillSettings::from_toml_str("js = 3"),
            Err(ConfigError::Toml(_))
        ));
        assert!(matches!(
            QuillSettings::load(Path::new("/definitely/not/here.toml")),
            Err(ConfigError::Io { .. })
        ));
    }
}
