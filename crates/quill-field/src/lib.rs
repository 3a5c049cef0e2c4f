//! quill-field: bind a Quill rich-text editor to a hidden form field.
//!
//! The field carries the editor's delta as JSON so an ordinary form
//! submission sends the edited content:
//!
//! ```
//! use quill_field::binding::EditorFieldBinding;
//! use quill_field::config::EditorConfig;
//! use quill_field::dom::{MemoryDocument, MemoryElement, Node};
//! use quill_field::memory::{MemorySurface, MemorySurfaceFactory};
//! use quill_field::surface::Source;
//!
//! let document = MemoryDocument::new().with_child(
//!     MemoryElement::new("div")
//!         .with_attr("id", "notes")
//!         .with_child(MemoryElement::new("div").with_attr("data-quill-editor", ""))
//!         .with_child(MemoryElement::new("input").with_attr("data-quill-input", "")),
//! );
//! let mut binding: EditorFieldBinding<MemorySurface, MemoryElement> =
//!     EditorFieldBinding::bind(&document, "#notes", &EditorConfig::new(), &MemorySurfaceFactory)
//!         .unwrap();
//! assert_eq!(binding.field().value(), "{}");
//!
//! binding.surface_mut().insert_text(0, "hi", None, Source::User).unwrap();
//! assert_eq!(binding.field().value(), r#"{"delta":{"ops":[{"insert":"hi\n"}]}}"#);
//! ```
//!
//! Modules:
//! - [`delta`]: the rich-text delta format
//! - [`envelope`]: the stored/field JSON envelope
//! - [`surface`], [`memory`]: the editor seam and an in-process editor
//! - [`dom`]: the DOM seam and an in-process element tree
//! - [`binding`]: the binding itself
//! - [`validate`], [`form`], [`widget`]: server-side handling and markup

pub mod binding;
pub mod cli;
pub mod config;
pub mod delta;
pub mod dom;
pub mod envelope;
pub mod error;
pub mod form;
pub mod memory;
pub mod surface;
pub mod validate;
pub mod widget;

pub use binding::EditorFieldBinding;
pub use delta::{Delta, DeltaOp, Insert};
pub use envelope::{FieldValue, StoredValue};
pub use error::BindError;
