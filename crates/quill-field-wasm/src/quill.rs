//! The Quill editor, imported from the page.

use serde::Serialize as _;
use serde_json::Value;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::Element;

use quill_field::surface::{ChangeHandler, EditableSurface, Source, SurfaceError, SurfaceFactory, TextChange};
use quill_field::Delta;

use crate::dom::WebNode;
use crate::js_error_message;

#[wasm_bindgen]
extern "C" {
    /// The global `Quill` class.
    #[derive(Debug, Clone)]
    pub type Quill;

    #[wasm_bindgen(constructor, catch)]
    fn new(container: &Element, options: &JsValue) -> Result<Quill, JsValue>;

    #[wasm_bindgen(method, js_name = getContents)]
    fn get_contents(this: &Quill) -> JsValue;

    #[wasm_bindgen(method, catch, js_name = setContents)]
    fn set_contents(this: &Quill, delta: &JsValue, source: &str) -> Result<JsValue, JsValue>;

    #[wasm_bindgen(method)]
    fn on(this: &Quill, event: &str, handler: &js_sys::Function);
}

/// Read a Quill `Delta` (or anything shaped like one) into a [`Delta`].
pub(crate) fn delta_from_js(value: &JsValue) -> Result<Delta, SurfaceError> {
    let text: String = js_sys::JSON::stringify(value)
        .map_err(|e| SurfaceError::Read(js_error_message(&e)))?
        .into();
    delta_from_json(&text)
}

fn delta_from_json(text: &str) -> Result<Delta, SurfaceError> {
    serde_json::from_str(text).map_err(|e| SurfaceError::Read(e.to_string()))
}

pub(crate) fn source_from_js(value: &JsValue) -> Source {
    source_from_name(value.as_string().as_deref())
}

/// Quill reports `"api"`, `"user"` or `"silent"`; anything else counts as api.
fn source_from_name(name: Option<&str>) -> Source {
    match name {
        Some("user") => Source::User,
        Some("silent") => Source::Silent,
        _ => Source::Api,
    }
}

type TextChangeClosure = Closure<dyn FnMut(JsValue, JsValue, JsValue)>;

/// A Quill instance driven through [`EditableSurface`].
pub struct QuillSurface {
    quill: Quill,
    // Dropping a closure invalidates the JS callback, so they live as long as
    // the surface.
    listeners: Vec<TextChangeClosure>,
}

impl QuillSurface {
    pub fn new(quill: Quill) -> Self {
        Self {
            quill,
            listeners: Vec::new(),
        }
    }

    pub fn quill(&self) -> &Quill {
        &self.quill
    }
}

impl EditableSurface for QuillSurface {
    fn contents(&self) -> Result<Delta, SurfaceError> {
        delta_from_js(&self.quill.get_contents())
    }

    fn set_contents(&mut self, contents: &Value) -> Result<(), SurfaceError> {
        let delta = contents
            .serialize(&serde_wasm_bindgen::Serializer::json_compatible())
            .map_err(|e| SurfaceError::Rejected(e.to_string()))?;
        self.quill
            .set_contents(&delta, Source::Api.as_str())
            .map_err(|e| SurfaceError::Rejected(js_error_message(&e)))?;
        Ok(())
    }

    fn on_text_change(&mut self, mut handler: ChangeHandler) {
        let quill = self.quill.clone();
        let closure = TextChangeClosure::new(move |change: JsValue, old: JsValue, source: JsValue| {
            let read = delta_from_js(&change).and_then(|change| {
                Ok((change, delta_from_js(&old)?, delta_from_js(&quill.get_contents())?))
            });
            match read {
                Ok((change, old_contents, contents)) => handler(&TextChange {
                    change: &change,
                    old_contents: &old_contents,
                    contents: &contents,
                    source: source_from_js(&source),
                }),
                Err(error) => tracing::warn!(%error, "skipping unreadable text-change"),
            }
        });
        self.quill.on("text-change", closure.as_ref().unchecked_ref());
        self.listeners.push(closure);
    }
}

/// Constructs `new Quill(mount, options)`. The options object is passed on
/// exactly as the page supplied it.
#[derive(Debug, Default, Clone, Copy)]
pub struct QuillFactory;

impl SurfaceFactory<WebNode> for QuillFactory {
    type Config = JsValue;
    type Surface = QuillSurface;

    fn create(&self, mount: &WebNode, options: &JsValue) -> Result<QuillSurface, SurfaceError> {
        Quill::new(mount.element(), options)
            .map(QuillSurface::new)
            .map_err(|e| SurfaceError::Create(js_error_message(&e)))
    }
}
