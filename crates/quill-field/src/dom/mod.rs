//! The slice of the DOM the binding touches.
//!
//! The binding only ever looks elements up by selector and reads or writes a
//! form control's value. [`memory`] provides an in-process element tree; the
//! browser build implements the same traits over `web-sys`.

pub mod memory;
pub mod selector;

use thiserror::Error;

pub use memory::{MemoryDocument, MemoryElement};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomError {
    #[error("invalid selector `{selector}`: {reason}")]
    InvalidSelector { selector: String, reason: String },
}

/// A handle to an element. Cloning yields another handle to the same element.
pub trait Node: Clone + 'static {
    /// First descendant matching `selector`.
    fn query_selector(&self, selector: &str) -> Result<Option<Self>, DomError>;

    /// The element's form value (empty when it has none).
    fn value(&self) -> String;

    fn set_value(&self, value: &str);
}

pub trait Document {
    type Node: Node;

    fn query_selector(&self, selector: &str) -> Result<Option<Self::Node>, DomError>;
}
