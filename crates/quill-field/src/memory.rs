//! In-process editable surface.
//!
//! Keeps a document delta and mirrors the editor behaviour the binding relies
//! on: contents always end with a newline, every non-silent change notifies
//! listeners, and a read-only surface ignores user edits.

use serde_json::{Map, Value};

use crate::config::EditorConfig;
use crate::delta::{Attributes, Delta};
use crate::dom::Node;
use crate::surface::{ChangeHandler, EditableSurface, Source, SurfaceError, SurfaceFactory, TextChange};

pub struct MemorySurface {
    contents: Delta,
    config: EditorConfig,
    handlers: Vec<ChangeHandler>,
}

impl std::fmt::Debug for MemorySurface {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemorySurface")
            .field("contents", &self.contents)
            .field("config", &self.config)
            .field("handlers", &self.handlers.len())
            .finish()
    }
}

impl MemorySurface {
    pub fn new(config: EditorConfig) -> Self {
        Self {
            contents: Delta::blank_document(),
            config,
            handlers: Vec::new(),
        }
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn length(&self) -> usize {
        self.contents.length()
    }

    pub fn text(&self) -> String {
        self.contents.text()
    }

    pub fn insert_text(
        &mut self,
        index: usize,
        text: &str,
        attributes: Option<Attributes>,
        source: Source,
    ) -> Result<Delta, SurfaceError> {
        self.check_range(index, 0)?;
        let change = Delta::new().retain(index, None).insert(text, attributes);
        self.apply(change, source)
    }

    pub fn insert_embed(
        &mut self,
        index: usize,
        embed: Map<String, Value>,
        source: Source,
    ) -> Result<Delta, SurfaceError> {
        self.check_range(index, 0)?;
        let change = Delta::new().retain(index, None).insert_embed(embed, None);
        self.apply(change, source)
    }

    pub fn delete_text(&mut self, index: usize, len: usize, source: Source) -> Result<Delta, SurfaceError> {
        self.check_range(index, len)?;
        let change = Delta::new().retain(index, None).delete(len);
        self.apply(change, source)
    }

    /// Apply formats over a range. A `null` value removes that format.
    pub fn format_text(
        &mut self,
        index: usize,
        len: usize,
        attributes: Attributes,
        source: Source,
    ) -> Result<Delta, SurfaceError> {
        self.check_range(index, len)?;
        let change = Delta::new().retain(index, None).retain(len, Some(attributes));
        self.apply(change, source)
    }

    /// Apply an arbitrary change delta.
    pub fn update_contents(&mut self, change: Delta, source: Source) -> Result<Delta, SurfaceError> {
        let touched = change
            .ops
            .iter()
            .filter(|op| !op.is_insert())
            .map(|op| op.len())
            .sum();
        self.check_range(0, touched)?;
        self.apply(change, source)
    }

    fn check_range(&self, index: usize, len: usize) -> Result<(), SurfaceError> {
        let length = self.length();
        if index.checked_add(len).is_some_and(|end| end <= length) {
            Ok(())
        } else {
            Err(SurfaceError::OutOfRange { index, len, length })
        }
    }

    fn apply(&mut self, change: Delta, source: Source) -> Result<Delta, SurfaceError> {
        if source == Source::User && self.config.is_read_only() {
            tracing::trace!("ignoring user change on read-only surface");
            return Ok(Delta::new());
        }
        let contents = self.contents.compose(&change).into_document()?;
        self.replace(contents, change.clone(), source);
        Ok(change)
    }

    fn replace(&mut self, contents: Delta, change: Delta, source: Source) {
        let old_contents = std::mem::replace(&mut self.contents, contents);
        if source == Source::Silent {
            return;
        }
        tracing::trace!(source = source.as_str(), length = self.contents.length(), "text change");
        let event = TextChange {
            change: &change,
            old_contents: &old_contents,
            contents: &self.contents,
            source,
        };
        for handler in &mut self.handlers {
            handler(&event);
        }
    }
}

impl EditableSurface for MemorySurface {
    fn contents(&self) -> Result<Delta, SurfaceError> {
        Ok(self.contents.clone())
    }

    fn set_contents(&mut self, contents: &Value) -> Result<(), SurfaceError> {
        let contents = Delta::from_value(contents)?.into_document()?;
        // The change deletes the old document and inserts the new one.
        let mut change = Delta::new();
        for op in &contents.ops {
            change.push(op.clone());
        }
        let change = change.delete(self.length());
        self.replace(contents, change, Source::Api);
        Ok(())
    }

    fn on_text_change(&mut self, handler: ChangeHandler) {
        self.handlers.push(handler);
    }
}

/// Creates a [`MemorySurface`] over any mount node.
#[derive(Debug, Default, Clone, Copy)]
pub struct MemorySurfaceFactory;

impl<N: Node> SurfaceFactory<N> for MemorySurfaceFactory {
    type Config = EditorConfig;
    type Surface = MemorySurface;

    fn create(&self, _mount: &N, config: &EditorConfig) -> Result<MemorySurface, SurfaceError> {
        Ok(MemorySurface::new(config.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn recorder(surface: &mut MemorySurface) -> Rc<RefCell<Vec<(Source, String)>>> {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        surface.on_text_change(Box::new(move |event: &TextChange<'_>| {
            sink.borrow_mut().push((event.source, event.contents.text()));
        }));
        seen
    }

    #[test]
    fn starts_blank() {
        let surface = MemorySurface::new(EditorConfig::new());
        assert!(surface.contents().unwrap().is_blank_document());
        assert_eq!(surface.length(), 1);
    }

    #[test]
    fn set_contents_restores_trailing_newline_and_notifies() {
        let mut surface = MemorySurface::new(EditorConfig::new());
        let seen = recorder(&mut surface);
        surface.set_contents(&json!({"ops": [{"insert": "abc"}]})).unwrap();
        assert_eq!(surface.text(), "abc\n");
        assert_eq!(*seen.borrow(), vec![(Source::Api, "abc\n".to_string())]);
    }

    #[test]
    fn set_contents_rejects_non_documents() {
        let mut surface = MemorySurface::new(EditorConfig::new());
        assert!(matches!(
            surface.set_contents(&json!({"ops": [{"retain": 3}]})),
            Err(SurfaceError::InvalidContents(_))
        ));
        assert!(matches!(
            surface.set_contents(&json!(42)),
            Err(SurfaceError::InvalidContents(_))
        ));
        assert_eq!(surface.text(), "\n");
    }

    #[test]
    fn user_typing_builds_the_document() {
        let mut surface = MemorySurface::new(EditorConfig::new());
        let seen = recorder(&mut surface);
        surface.insert_text(0, "h", None, Source::User).unwrap();
        surface.insert_text(1, "i", None, Source::User).unwrap();
        assert_eq!(surface.contents().unwrap(), Delta::new().insert("hi\n", None));
        assert_eq!(seen.borrow().len(), 2);
        assert_eq!(seen.borrow()[1], (Source::User, "hi\n".to_string()));
    }

    #[test]
    fn change_carries_old_and_new_contents() {
        let mut surface = MemorySurface::new(EditorConfig::new());
        let seen = Rc::new(RefCell::new(None));
        let sink = Rc::clone(&seen);
        surface.on_text_change(Box::new(move |event: &TextChange<'_>| {
            *sink.borrow_mut() = Some((
                event.change.clone(),
                event.old_contents.text(),
                event.contents.text(),
            ));
        }));
        surface.insert_text(0, "x", None, Source::User).unwrap();
        let (change, old, new) = seen.borrow_mut().take().unwrap();
        assert_eq!(change, Delta::new().insert("x", None));
        assert_eq!(old, "\n");
        assert_eq!(new, "x\n");
    }

    #[test]
    fn deleting_the_final_newline_keeps_the_document_valid() {
        let mut surface = MemorySurface::new(EditorConfig::new());
        surface.insert_text(0, "ab", None, Source::User).unwrap();
        surface.delete_text(1, 2, Source::User).unwrap();
        assert_eq!(surface.text(), "a\n");
    }

    #[test]
    fn out_of_range_edits_are_rejected() {
        let mut surface = MemorySurface::new(EditorConfig::new());
        let err = surface.delete_text(0, 5, Source::User).unwrap_err();
        assert_eq!(
            err.to_string(),
            "range 0..5 is outside the document (length 1)"
        );
        assert!(surface.insert_text(2, "x", None, Source::User).is_err());
    }

    #[test]
    fn formatting_applies_and_erases_attributes() {
        let mut surface = MemorySurface::new(EditorConfig::new());
        surface.insert_text(0, "bold", None, Source::User).unwrap();
        let bold = json!({"bold": true}).as_object().cloned().unwrap();
        surface.format_text(0, 4, bold, Source::User).unwrap();
        assert_eq!(
            serde_json::to_value(surface.contents().unwrap()).unwrap(),
            json!({"ops": [{"insert": "bold", "attributes": {"bold": true}}, {"insert": "\n"}]})
        );
        let erase = json!({"bold": null}).as_object().cloned().unwrap();
        surface.format_text(0, 4, erase, Source::User).unwrap();
        assert_eq!(surface.contents().unwrap(), Delta::new().insert("bold\n", None));
    }

    #[test]
    fn embeds_count_as_one_unit() {
        let mut surface = MemorySurface::new(EditorConfig::new());
        let image = json!({"image": "cat.png"}).as_object().cloned().unwrap();
        surface.insert_embed(0, image, Source::User).unwrap();
        assert_eq!(surface.length(), 2);
        assert_eq!(surface.text(), "\n");
    }

    #[test]
    fn silent_changes_do_not_notify() {
        let mut surface = MemorySurface::new(EditorConfig::new());
        let seen = recorder(&mut surface);
        surface.insert_text(0, "quiet", None, Source::Silent).unwrap();
        assert_eq!(surface.text(), "quiet\n");
        assert!(seen.borrow().is_empty());
    }

    #[test]
    fn read_only_surface_ignores_user_edits() {
        let mut surface = MemorySurface::new(EditorConfig::new().read_only(true));
        let change = surface.insert_text(0, "nope", None, Source::User).unwrap();
        assert_eq!(change, Delta::new());
        assert_eq!(surface.text(), "\n");
        surface.insert_text(0, "api", None, Source::Api).unwrap();
        assert_eq!(surface.text(), "api\n");
    }

    #[test]
    fn update_contents_applies_change_deltas() {
        let mut surface = MemorySurface::new(EditorConfig::new());
        surface.set_contents(&json!([{"insert": "hello\n"}])).unwrap();
        surface
            .update_contents(Delta::new().retain(5, None).insert("!", None), Source::User)
            .unwrap();
        assert_eq!(surface.text(), "hello!\n");
        assert!(surface
            .update_contents(Delta::new().retain(10, None).delete(1), Source::User)
            .is_err());
    }
}
