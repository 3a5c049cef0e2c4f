//! The page DOM behind [`quill_field::dom`]'s traits.

use wasm_bindgen::JsCast;
use web_sys::{Element, HtmlInputElement, HtmlTextAreaElement};

use quill_field::dom::{Document, DomError, Node};

use crate::js_error_message;

fn invalid_selector(selector: &str, error: &wasm_bindgen::JsValue) -> DomError {
    DomError::InvalidSelector {
        selector: selector.to_string(),
        reason: js_error_message(error),
    }
}

#[derive(Debug, Clone)]
pub struct WebNode(Element);

impl WebNode {
    pub fn new(element: Element) -> Self {
        Self(element)
    }

    pub fn element(&self) -> &Element {
        &self.0
    }
}

impl Node for WebNode {
    fn query_selector(&self, selector: &str) -> Result<Option<Self>, DomError> {
        self.0
            .query_selector(selector)
            .map(|found| found.map(WebNode))
            .map_err(|e| invalid_selector(selector, &e))
    }

    fn value(&self) -> String {
        if let Some(input) = self.0.dyn_ref::<HtmlInputElement>() {
            input.value()
        } else if let Some(area) = self.0.dyn_ref::<HtmlTextAreaElement>() {
            area.value()
        } else {
            self.0.get_attribute("value").unwrap_or_default()
        }
    }

    fn set_value(&self, value: &str) {
        if let Some(input) = self.0.dyn_ref::<HtmlInputElement>() {
            input.set_value(value);
        } else if let Some(area) = self.0.dyn_ref::<HtmlTextAreaElement>() {
            area.set_value(value);
        } else if let Err(e) = self.0.set_attribute("value", value) {
            tracing::warn!(error = %js_error_message(&e), "failed to set value attribute");
        }
    }
}

#[derive(Debug, Clone)]
pub struct WebDocument(web_sys::Document);

impl WebDocument {
    /// The document of the current window, if there is one.
    pub fn current() -> Option<Self> {
        web_sys::window()?.document().map(Self)
    }
}

impl Document for WebDocument {
    type Node = WebNode;

    fn query_selector(&self, selector: &str) -> Result<Option<WebNode>, DomError> {
        self.0
            .query_selector(selector)
            .map(|found| found.map(WebNode))
            .map_err(|e| invalid_selector(selector, &e))
    }
}
