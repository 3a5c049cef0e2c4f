//! WASM bindings for quill-field.
//!
//! Exposes a `QuillWrapper` class that binds a Quill editor to the hidden
//! input of a rendered widget:
//!
//! ```js
//! const wrapper = new QuillWrapper('[data-quill-container="notes"]', { theme: "snow" });
//! wrapper.getValue(); // {} or { delta: { ops: [...] } }
//! ```
//!
//! The options object is handed to `new Quill(...)` untouched.

use serde::Serialize as _;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;

use quill_field::{BindError, EditorFieldBinding};

pub mod dom;
pub mod quill;

use dom::{WebDocument, WebNode};
use quill::{QuillFactory, QuillSurface};

/// Best-effort message from a thrown JS value.
pub(crate) fn js_error_message(value: &JsValue) -> String {
    if let Some(error) = value.dyn_ref::<js_sys::Error>() {
        return String::from(error.message());
    }
    value.as_string().unwrap_or_else(|| format!("{value:?}"))
}

fn to_js_error(error: BindError) -> JsValue {
    js_sys::Error::new(&error.to_string()).into()
}

#[wasm_bindgen]
pub struct QuillWrapper {
    binding: EditorFieldBinding<QuillSurface, WebNode>,
}

#[wasm_bindgen]
impl QuillWrapper {
    /// Bind the container matching `container_selector`.
    ///
    /// Throws when the container, its `[data-quill-editor]` mount point or its
    /// `[data-quill-input]` field is missing, or when the stored value is not
    /// valid JSON.
    #[wasm_bindgen(constructor)]
    pub fn new(container_selector: &str, quill_options: JsValue) -> Result<QuillWrapper, JsValue> {
        let document = WebDocument::current()
            .ok_or_else(|| JsValue::from(js_sys::Error::new("no document available")))?;
        let binding = EditorFieldBinding::bind(&document, container_selector, &quill_options, &QuillFactory)
            .map_err(to_js_error)?;
        Ok(Self { binding })
    }

    /// `{}` for an empty editor, otherwise `{ delta }`.
    #[wasm_bindgen(js_name = "getValue")]
    pub fn get_value(&self) -> Result<JsValue, JsValue> {
        let value = self.binding.value().map_err(to_js_error)?;
        value
            .serialize(&serde_wasm_bindgen::Serializer::json_compatible())
            .map_err(|e| js_sys::Error::new(&e.to_string()).into())
    }

    /// Load stored field text into the editor.
    #[wasm_bindgen(js_name = "setValue")]
    pub fn set_value(&mut self, value: Option<String>) -> Result<(), JsValue> {
        self.binding.set_value(value.as_deref()).map_err(to_js_error)
    }

    /// Write the editor's value into the hidden input.
    pub fn sync(&self) -> Result<(), JsValue> {
        self.binding.sync().map_err(to_js_error)
    }

    /// The underlying Quill instance.
    #[wasm_bindgen(getter)]
    pub fn quill(&self) -> JsValue {
        self.binding.surface().quill().clone().into()
    }
}
