//! In-process element tree.
//!
//! Elements are shared handles (`Rc<RefCell<_>>`), like DOM references: a
//! clone points at the same element, so a write through one handle is seen
//! through every other.

use std::cell::RefCell;
use std::fmt::Write as _;
use std::rc::Rc;

use indexmap::IndexMap;

use super::selector::Selector;
use super::{Document, DomError, Node};

/// Elements serialized without a closing tag.
const VOID_ELEMENTS: &[&str] = &["br", "hr", "img", "input", "link", "meta"];

#[derive(Debug)]
struct ElementData {
    tag: String,
    attributes: IndexMap<String, String>,
    children: Vec<MemoryElement>,
}

#[derive(Debug, Clone)]
pub struct MemoryElement(Rc<RefCell<ElementData>>);

impl PartialEq for MemoryElement {
    /// Identity, not structure.
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl Eq for MemoryElement {}

impl MemoryElement {
    pub fn new(tag: &str) -> Self {
        Self(Rc::new(RefCell::new(ElementData {
            tag: tag.to_ascii_lowercase(),
            attributes: IndexMap::new(),
            children: Vec::new(),
        })))
    }

    pub fn with_attr(self, name: &str, value: &str) -> Self {
        self.set_attribute(name, value);
        self
    }

    pub fn with_child(self, child: MemoryElement) -> Self {
        self.append_child(child);
        self
    }

    pub fn tag(&self) -> String {
        self.0.borrow().tag.clone()
    }

    pub fn attribute(&self, name: &str) -> Option<String> {
        self.0.borrow().attributes.get(name).cloned()
    }

    pub fn set_attribute(&self, name: &str, value: &str) {
        self.0
            .borrow_mut()
            .attributes
            .insert(name.to_string(), value.to_string());
    }

    pub fn append_child(&self, child: MemoryElement) {
        self.0.borrow_mut().children.push(child);
    }

    pub fn children(&self) -> Vec<MemoryElement> {
        self.0.borrow().children.clone()
    }

    pub fn select_first(&self, selector: &str) -> Result<Option<MemoryElement>, DomError> {
        let selector = Selector::parse(selector)?;
        let mut found = None;
        self.walk(&mut vec![self.clone()], &mut |element: &MemoryElement, ancestors: &[MemoryElement]| {
            if selector.matches(element, ancestors) {
                found = Some(element.clone());
                false
            } else {
                true
            }
        });
        Ok(found)
    }

    /// Depth-first over descendants in document order. `visit` returns
    /// `false` to stop.
    fn walk<F>(&self, ancestors: &mut Vec<MemoryElement>, visit: &mut F) -> bool
    where
        F: FnMut(&MemoryElement, &[MemoryElement]) -> bool,
    {
        for child in self.children() {
            if !visit(&child, ancestors) {
                return false;
            }
            ancestors.push(child.clone());
            let keep_going = child.walk(ancestors, visit);
            ancestors.pop();
            if !keep_going {
                return false;
            }
        }
        true
    }

    pub fn to_html(&self) -> String {
        let mut out = String::new();
        self.write_html(&mut out);
        out
    }

    fn write_html(&self, out: &mut String) {
        let data = self.0.borrow();
        let _ = write!(out, "<{}", data.tag);
        for (name, value) in &data.attributes {
            if value.is_empty() {
                let _ = write!(out, " {name}");
            } else {
                let _ = write!(out, " {name}=\"{}\"", escape_html(value));
            }
        }
        out.push('>');
        if VOID_ELEMENTS.contains(&data.tag.as_str()) {
            return;
        }
        for child in &data.children {
            child.write_html(out);
        }
        let _ = write!(out, "</{}>", data.tag);
    }
}

impl Node for MemoryElement {
    fn query_selector(&self, selector: &str) -> Result<Option<Self>, DomError> {
        self.select_first(selector)
    }

    fn value(&self) -> String {
        self.attribute("value").unwrap_or_default()
    }

    fn set_value(&self, value: &str) {
        self.set_attribute("value", value);
    }
}

/// A document whose content hangs off a `<body>` element.
#[derive(Debug, Clone)]
pub struct MemoryDocument {
    body: MemoryElement,
}

impl Default for MemoryDocument {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryDocument {
    pub fn new() -> Self {
        Self {
            body: MemoryElement::new("body"),
        }
    }

    pub fn with_child(self, child: MemoryElement) -> Self {
        self.body.append_child(child);
        self
    }

    pub fn body(&self) -> &MemoryElement {
        &self.body
    }
}

impl Document for MemoryDocument {
    type Node = MemoryElement;

    fn query_selector(&self, selector: &str) -> Result<Option<MemoryElement>, DomError> {
        self.body.select_first(selector)
    }
}

/// Escape text for use inside a double-quoted attribute or element body.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            c => out.push(c),
        }
    }
    out
}
