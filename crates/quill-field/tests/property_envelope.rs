use proptest::prelude::*;
use quill_field::binding::{EditorFieldBinding, EDITOR_MARKER, INPUT_MARKER};
use quill_field::config::EditorConfig;
use quill_field::delta::Attributes;
use quill_field::dom::{MemoryDocument, MemoryElement, Node};
use quill_field::memory::{MemorySurface, MemorySurfaceFactory};
use quill_field::surface::EditableSurface;
use quill_field::{Delta, FieldValue};
use serde_json::{json, Value};

type Binding = EditorFieldBinding<MemorySurface, MemoryElement>;

fn bind(stored: &str) -> Binding {
    let document = MemoryDocument::new().with_child(
        MemoryElement::new("div")
            .with_attr("id", "field")
            .with_child(MemoryElement::new("div").with_attr(EDITOR_MARKER, ""))
            .with_child(
                MemoryElement::new("input")
                    .with_attr("value", stored)
                    .with_attr(INPUT_MARKER, ""),
            ),
    );
    EditorFieldBinding::bind(&document, "#field", &EditorConfig::new(), &MemorySurfaceFactory)
        .unwrap()
}

fn attributes() -> impl Strategy<Value = Option<Attributes>> {
    prop_oneof![
        Just(None),
        Just(json!({"bold": true}).as_object().cloned()),
        Just(json!({"italic": true, "color": "#f00"}).as_object().cloned()),
    ]
}

/// Canonical, non-blank documents.
fn document() -> impl Strategy<Value = Delta> {
    prop::collection::vec(("[a-z \n]{1,8}", attributes()), 1..6).prop_map(|segments| {
        let mut delta = Delta::new();
        for (text, attrs) in segments {
            delta = delta.insert(text, attrs);
        }
        delta.insert("\n", None)
    })
}

proptest! {
    #[test]
    fn namespaced_documents_read_back_unchanged(doc in document()) {
        let stored = json!({"delta": doc}).to_string();
        let binding = bind(&stored);
        prop_assert_eq!(binding.value().unwrap(), FieldValue::Delta(doc.clone()));
        let field: Value = serde_json::from_str(&binding.field().value()).unwrap();
        prop_assert_eq!(field, json!({"delta": doc}));
    }

    #[test]
    fn bare_and_namespaced_values_load_the_same_content(doc in document()) {
        let bare = bind(&serde_json::to_string(&doc).unwrap());
        let namespaced = bind(&json!({"delta": doc}).to_string());
        prop_assert_eq!(
            bare.surface().contents().unwrap(),
            namespaced.surface().contents().unwrap()
        );
    }

    #[test]
    fn sync_twice_changes_nothing(doc in document()) {
        let binding = bind(&json!({"delta": doc}).to_string());
        binding.sync().unwrap();
        let first = binding.field().value();
        binding.sync().unwrap();
        prop_assert_eq!(binding.field().value(), first);
    }

    #[test]
    fn field_always_decodes_to_surface_contents(
        doc in document(),
        index_seed in any::<usize>(),
        text in "[a-z]{1,4}",
    ) {
        let mut binding = bind(&json!({"delta": doc}).to_string());
        let index = index_seed % binding.surface().length();
        binding
            .surface_mut()
            .insert_text(index, &text, None, quill_field::surface::Source::User)
            .unwrap();
        let contents = binding.surface().contents().unwrap();
        let field: Value = serde_json::from_str(&binding.field().value()).unwrap();
        prop_assert_eq!(field, json!({"delta": contents}));
    }
}
