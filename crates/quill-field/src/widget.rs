//! Markup for a bound field.
//!
//! A rendered widget is a container holding the editor mount point and the
//! hidden input, plus a module script that binds them in the browser:
//!
//! ```html
//! <div id="id_notes" class="quill-field" data-quill-container="notes">
//!   <div data-quill-editor></div>
//!   <input type="hidden" name="notes" value="{}" data-quill-input>
//! </div>
//! <script type="module">window.quill_notes = new QuillWrapper(...);</script>
//! ```

use indexmap::IndexMap;
use serde_json::Value;

use crate::binding::{CONTAINER_MARKER, EDITOR_MARKER, INPUT_MARKER};
use crate::config::{EditorConfig, QuillSettings};
use crate::dom::memory::escape_html;
use crate::dom::MemoryElement;

/// Script and stylesheet assets a page needs for the widget.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Media {
    pub js: Vec<String>,
    pub css: Vec<String>,
}

impl Media {
    pub fn render_js(&self) -> Vec<String> {
        self.js
            .iter()
            .map(|src| format!("<script src=\"{}\"></script>", escape_html(src)))
            .collect()
    }

    pub fn render_css(&self) -> Vec<String> {
        self.css
            .iter()
            .map(|href| {
                format!(
                    "<link href=\"{}\" media=\"all\" rel=\"stylesheet\">",
                    escape_html(href)
                )
            })
            .collect()
    }

    /// Stylesheets first, then scripts, one tag per line.
    pub fn render(&self) -> String {
        let mut tags = self.render_css();
        tags.extend(self.render_js());
        tags.join("\n")
    }
}

/// Everything the markup is built from.
#[derive(Debug, Clone, PartialEq)]
pub struct WidgetContext {
    pub name: String,
    /// Global the bound wrapper is stored under.
    pub module: String,
    pub id: String,
    pub value: String,
    pub attrs: IndexMap<String, String>,
}

#[derive(Debug, Clone, Default)]
pub struct QuillWidget {
    settings: QuillSettings,
    attrs: IndexMap<String, String>,
}

impl QuillWidget {
    pub fn new(settings: QuillSettings) -> Self {
        Self {
            settings,
            attrs: IndexMap::new(),
        }
    }

    /// Extra attributes for the container element. `id` overrides the
    /// generated one.
    pub fn with_attr(mut self, name: &str, value: &str) -> Self {
        self.attrs.insert(name.to_string(), value.to_string());
        self
    }

    pub fn settings(&self) -> &QuillSettings {
        &self.settings
    }

    pub fn editor_config(&self) -> &EditorConfig {
        &self.settings.editor
    }

    pub fn media(&self) -> Media {
        Media {
            js: self.settings.js.clone(),
            css: self.settings.css.clone(),
        }
    }

    /// Hidden-field text for a value. Missing values render as `{}`.
    pub fn format_value(&self, value: Option<&Value>) -> String {
        match value {
            None | Some(Value::Null) => "{}".to_string(),
            Some(value) => value.to_string(),
        }
    }

    pub fn context(&self, name: &str, value: &str) -> WidgetContext {
        let id = self
            .attrs
            .get("id")
            .cloned()
            .unwrap_or_else(|| format!("id_{name}"));
        WidgetContext {
            name: name.to_string(),
            module: module_name(name),
            id,
            value: value.to_string(),
            attrs: self.attrs.clone(),
        }
    }

    /// Selector that finds the container rendered for `name`.
    pub fn container_selector(&self, name: &str) -> String {
        let name = name.replace('\\', "\\\\").replace('"', "\\\"");
        format!("[{CONTAINER_MARKER}=\"{name}\"]")
    }

    /// Build the container element holding `value` as its hidden-field text.
    pub fn render_fragment(&self, name: &str, value: &str) -> MemoryElement {
        let context = self.context(name, value);
        let class = match context.attrs.get("class") {
            Some(extra) => format!("quill-field {extra}"),
            None => "quill-field".to_string(),
        };
        let mut container = MemoryElement::new("div")
            .with_attr("id", &context.id)
            .with_attr("class", &class);
        for (attr, attr_value) in &context.attrs {
            if attr != "id" && attr != "class" {
                container = container.with_attr(attr, attr_value);
            }
        }
        container
            .with_attr(CONTAINER_MARKER, &context.name)
            .with_child(MemoryElement::new("div").with_attr(EDITOR_MARKER, ""))
            .with_child(
                MemoryElement::new("input")
                    .with_attr("type", "hidden")
                    .with_attr("name", &context.name)
                    .with_attr("value", &context.value)
                    .with_attr(INPUT_MARKER, ""),
            )
    }

    /// Full widget HTML: the container and the script binding it.
    pub fn render(&self, name: &str, value: Option<&Value>) -> String {
        let value = self.format_value(value);
        let fragment = self.render_fragment(name, &value);
        let context = self.context(name, &value);
        let selector = Value::String(self.container_selector(name)).to_string();
        let options = self.settings.editor.to_value().to_string();
        format!(
            "{}\n<script type=\"module\">window.{} = new QuillWrapper({}, {});</script>",
            fragment.to_html(),
            context.module,
            script_safe(&selector),
            script_safe(&options),
        )
    }
}

/// `quill_` followed by the field name with dashes made identifier-safe.
pub fn module_name(name: &str) -> String {
    format!("quill_{}", name.replace('-', "_"))
}

/// Keep JSON embedded in a script element from closing it early.
fn script_safe(json: &str) -> String {
    json.replace("</", "<\\/")
}
