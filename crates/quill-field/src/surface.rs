//! The editable surface the binding drives.
//!
//! The rich-text engine itself lives outside this crate. These traits are the
//! only things the binding needs from it: read and replace the contents, and
//! hear about changes. [`crate::memory::MemorySurface`] implements them in
//! process; the browser build implements them over Quill.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::delta::{Delta, DeltaError};

#[derive(Debug, Error)]
pub enum SurfaceError {
    #[error("invalid contents: {0}")]
    InvalidContents(#[from] DeltaError),
    #[error("range {index}..{end} is outside the document (length {length})", end = .index + .len)]
    OutOfRange {
        index: usize,
        len: usize,
        length: usize,
    },
    #[error("editor could not be created: {0}")]
    Create(String),
    #[error("editor rejected contents: {0}")]
    Rejected(String),
    #[error("editor returned unreadable contents: {0}")]
    Read(String),
}

/// Who caused a change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Source {
    /// Programmatic change.
    Api,
    /// Change made by the person editing.
    User,
    /// Applied without notifying listeners.
    Silent,
}

impl Source {
    pub fn as_str(self) -> &'static str {
        match self {
            Source::Api => "api",
            Source::User => "user",
            Source::Silent => "silent",
        }
    }
}

/// One text change, as delivered to listeners.
#[derive(Debug, Clone, Copy)]
pub struct TextChange<'a> {
    pub change: &'a Delta,
    pub old_contents: &'a Delta,
    pub contents: &'a Delta,
    pub source: Source,
}

pub type ChangeHandler = Box<dyn FnMut(&TextChange<'_>)>;

pub trait EditableSurface {
    /// Current document.
    fn contents(&self) -> Result<Delta, SurfaceError>;

    /// Replace the whole document. The value's shape is checked by the
    /// surface, not by the caller.
    fn set_contents(&mut self, contents: &Value) -> Result<(), SurfaceError>;

    /// Register a listener for every subsequent text change.
    fn on_text_change(&mut self, handler: ChangeHandler);
}

/// Builds a surface over a mount node. `Config` is handed over untouched.
pub trait SurfaceFactory<N> {
    type Config: ?Sized;
    type Surface: EditableSurface;

    fn create(&self, mount: &N, config: &Self::Config) -> Result<Self::Surface, SurfaceError>;
}
