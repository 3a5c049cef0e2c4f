use thiserror::Error;

use crate::dom::DomError;
use crate::envelope::DecodeError;
use crate::surface::SurfaceError;

/// Why binding or synchronizing a field failed.
#[derive(Debug, Error)]
pub enum BindError {
    #[error("no element matches container selector `{selector}`")]
    MissingContainer { selector: String },
    #[error("container `{selector}` has no editor mount point ([data-quill-editor])")]
    MissingMountPoint { selector: String },
    #[error("container `{selector}` has no hidden field ([data-quill-input])")]
    MissingHiddenField { selector: String },
    #[error(transparent)]
    Dom(#[from] DomError),
    #[error(transparent)]
    Decode(#[from] DecodeError),
    #[error(transparent)]
    Surface(#[from] SurfaceError),
    #[error("failed to encode field value: {0}")]
    Encode(#[source] serde_json::Error),
}

impl BindError {
    /// A required element was absent from the container.
    pub fn is_precondition(&self) -> bool {
        matches!(
            self,
            BindError::MissingContainer { .. }
                | BindError::MissingMountPoint { .. }
                | BindError::MissingHiddenField { .. }
        )
    }
}
