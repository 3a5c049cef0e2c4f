//! Keeps a hidden form field in step with an editable surface.
//!
//! The container holds two marked descendants: the element the editor mounts
//! on (`data-quill-editor`) and the hidden field that carries the value
//! (`data-quill-input`). Binding loads the field into the editor, writes the
//! normalized value straight back, then rewrites the field on every change,
//! so whatever the form submits matches what the editor shows.

use crate::delta::Delta;
use crate::dom::{Document, Node};
use crate::envelope::{FieldValue, StoredValue};
use crate::error::BindError;
use crate::surface::{EditableSurface, SurfaceFactory, TextChange};

/// Marks the element the editor mounts on.
pub const EDITOR_MARKER: &str = "data-quill-editor";
/// Marks the hidden field carrying the value.
pub const INPUT_MARKER: &str = "data-quill-input";
/// Marks the container rendered by the widget.
pub const CONTAINER_MARKER: &str = "data-quill-container";

#[derive(Debug)]
pub struct EditorFieldBinding<S, N> {
    surface: S,
    field: N,
}

impl<S, N> EditorFieldBinding<S, N>
where
    S: EditableSurface,
    N: Node,
{
    /// Bind the container matching `container_selector`.
    ///
    /// `config` goes to `factory` untouched. Both marked elements are looked
    /// up before the surface is created, so a malformed container fails
    /// without side effects.
    pub fn bind<D, F>(
        document: &D,
        container_selector: &str,
        config: &F::Config,
        factory: &F,
    ) -> Result<Self, BindError>
    where
        D: Document<Node = N>,
        F: SurfaceFactory<N, Surface = S>,
    {
        let selector = container_selector.to_string();
        let container = document
            .query_selector(container_selector)?
            .ok_or_else(|| BindError::MissingContainer { selector: selector.clone() })?;
        let mount = container
            .query_selector(&format!("[{EDITOR_MARKER}]"))?
            .ok_or_else(|| BindError::MissingMountPoint { selector: selector.clone() })?;
        let field = container
            .query_selector(&format!("[{INPUT_MARKER}]"))?
            .ok_or_else(|| BindError::MissingHiddenField { selector: selector.clone() })?;

        let surface = factory.create(&mount, config)?;
        let mut binding = Self { surface, field };

        let initial = binding.field.value();
        binding.set_value(Some(&initial))?;
        binding.sync()?;

        let field = binding.field.clone();
        binding
            .surface
            .on_text_change(Box::new(move |change: &TextChange<'_>| {
                if let Err(error) = write_field(&field, change.contents) {
                    tracing::error!(%error, "failed to synchronize hidden field");
                }
            }));

        tracing::debug!(%selector, "bound editor to hidden field");
        Ok(binding)
    }

    /// The surface's current content as a field value. No side effects.
    pub fn value(&self) -> Result<FieldValue, BindError> {
        Ok(FieldValue::from_contents(&self.surface.contents()?))
    }

    /// Load stored field text into the surface, replacing its content.
    ///
    /// Absent or blank text leaves the surface empty. A value namespaced under
    /// `delta` is preferred; otherwise the whole value is taken as the delta.
    pub fn set_value(&mut self, text: Option<&str>) -> Result<(), BindError> {
        let stored = StoredValue::decode(text)?;
        if stored.is_legacy() {
            tracing::debug!("loading top-level delta");
        }
        self.surface.set_contents(stored.delta())?;
        Ok(())
    }

    /// Write the current value into the hidden field.
    pub fn sync(&self) -> Result<(), BindError> {
        let contents = self.surface.contents()?;
        write_field(&self.field, &contents)
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    pub fn field(&self) -> &N {
        &self.field
    }
}

fn write_field<N: Node>(field: &N, contents: &Delta) -> Result<(), BindError> {
    let text = FieldValue::from_contents(contents)
        .encode()
        .map_err(BindError::Encode)?;
    tracing::trace!(len = text.len(), "writing hidden field");
    field.set_value(&text);
    Ok(())
}
