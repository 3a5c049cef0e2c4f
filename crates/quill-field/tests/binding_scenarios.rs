use quill_field::binding::{EditorFieldBinding, EDITOR_MARKER, INPUT_MARKER};
use quill_field::config::EditorConfig;
use quill_field::dom::{MemoryDocument, MemoryElement, Node};
use quill_field::memory::{MemorySurface, MemorySurfaceFactory};
use quill_field::surface::{EditableSurface, Source};
use quill_field::{BindError, FieldValue};
use serde_json::json;

type Binding = EditorFieldBinding<MemorySurface, MemoryElement>;

fn container(stored: Option<&str>, with_mount: bool, with_input: bool) -> MemoryElement {
    let mut container = MemoryElement::new("div").with_attr("class", "editor");
    if with_mount {
        container = container.with_child(MemoryElement::new("div").with_attr(EDITOR_MARKER, ""));
    }
    if with_input {
        let mut input = MemoryElement::new("input")
            .with_attr("type", "hidden")
            .with_attr(INPUT_MARKER, "");
        if let Some(stored) = stored {
            input = input.with_attr("value", stored);
        }
        container = container.with_child(input);
    }
    container
}

fn bind_stored(stored: Option<&str>) -> Result<Binding, BindError> {
    let document = MemoryDocument::new().with_child(container(stored, true, true));
    EditorFieldBinding::bind(&document, ".editor", &EditorConfig::new(), &MemorySurfaceFactory)
}

#[test]
fn empty_stored_value_binds_to_empty_object() {
    let binding = bind_stored(Some("")).unwrap();
    assert_eq!(binding.field().value(), "{}");
    assert_eq!(binding.value().unwrap(), FieldValue::Empty);
}

#[test]
fn absent_value_attribute_binds_to_empty_object() {
    let binding = bind_stored(None).unwrap();
    assert_eq!(binding.field().value(), "{}");
}

#[test]
fn legacy_bare_delta_is_rewritten_namespaced() {
    let binding = bind_stored(Some(r#"{"ops":[{"insert":"hello\n"}]}"#)).unwrap();
    assert_eq!(
        binding.field().value(),
        r#"{"delta":{"ops":[{"insert":"hello\n"}]}}"#
    );
}

#[test]
fn legacy_and_namespaced_values_load_identically() {
    let ops = json!({"ops": [
        {"insert": "Title", "attributes": {"bold": true}},
        {"insert": "\n", "attributes": {"header": 1}},
        {"insert": "body\n"}
    ]});
    let bare = bind_stored(Some(&ops.to_string())).unwrap();
    let namespaced = bind_stored(Some(&json!({"delta": ops}).to_string())).unwrap();
    assert_eq!(
        bare.surface().contents().unwrap(),
        namespaced.surface().contents().unwrap()
    );
    assert_eq!(bare.field().value(), namespaced.field().value());
}

#[test]
fn typing_into_an_empty_surface_updates_the_field() {
    let mut binding = bind_stored(Some("")).unwrap();
    binding
        .surface_mut()
        .insert_text(0, "h", None, Source::User)
        .unwrap();
    binding
        .surface_mut()
        .insert_text(1, "i", None, Source::User)
        .unwrap();
    let field: serde_json::Value = serde_json::from_str(&binding.field().value()).unwrap();
    assert_eq!(field, json!({"delta": {"ops": [{"insert": "hi\n"}]}}));
}

#[test]
fn formatting_changes_reach_the_field() {
    let mut binding = bind_stored(Some(r#"{"delta":{"ops":[{"insert":"bold me\n"}]}}"#)).unwrap();
    let bold = json!({"bold": true}).as_object().cloned().unwrap();
    binding
        .surface_mut()
        .format_text(0, 4, bold, Source::User)
        .unwrap();
    let field: serde_json::Value = serde_json::from_str(&binding.field().value()).unwrap();
    assert_eq!(
        field,
        json!({"delta": {"ops": [
            {"insert": "bold", "attributes": {"bold": true}},
            {"insert": " me\n"}
        ]}})
    );
}

#[test]
fn sync_is_idempotent() {
    let binding = bind_stored(Some(r#"{"delta":{"ops":[{"insert":"same\n"}]}}"#)).unwrap();
    binding.sync().unwrap();
    let first = binding.field().value();
    binding.sync().unwrap();
    assert_eq!(binding.field().value(), first);
}

#[test]
fn sync_repairs_a_tampered_field() {
    let binding = bind_stored(Some("")).unwrap();
    binding.field().set_value("garbage");
    binding.sync().unwrap();
    assert_eq!(binding.field().value(), "{}");
}

#[test]
fn missing_hidden_field_is_a_precondition_error() {
    let document = MemoryDocument::new().with_child(container(Some(""), true, false));
    let err = Binding::bind(&document, ".editor", &EditorConfig::new(), &MemorySurfaceFactory)
        .unwrap_err();
    assert!(matches!(err, BindError::MissingHiddenField { .. }));
    assert!(err.is_precondition());
    assert_eq!(
        err.to_string(),
        "container `.editor` has no hidden field ([data-quill-input])"
    );
}

#[test]
fn missing_mount_point_is_a_precondition_error() {
    let document = MemoryDocument::new().with_child(container(Some(""), false, true));
    let err = Binding::bind(&document, ".editor", &EditorConfig::new(), &MemorySurfaceFactory)
        .unwrap_err();
    assert!(matches!(err, BindError::MissingMountPoint { .. }));
}

#[test]
fn missing_container_is_a_precondition_error() {
    let document = MemoryDocument::new();
    let err = Binding::bind(&document, ".editor", &EditorConfig::new(), &MemorySurfaceFactory)
        .unwrap_err();
    assert!(matches!(err, BindError::MissingContainer { .. }));
}

#[test]
fn malformed_stored_json_is_an_initialization_error() {
    let err = bind_stored(Some("{\"delta\":")).unwrap_err();
    assert!(matches!(err, BindError::Decode(_)));
    assert!(err.to_string().starts_with("stored value is not valid JSON"));
}

#[test]
fn unexpected_shapes_are_rejected_by_the_surface() {
    let err = bind_stored(Some(r#"{"delta":{"ops":[{"retain":2}]}}"#)).unwrap_err();
    assert!(matches!(err, BindError::Surface(_)));
}

#[test]
fn whitespace_only_document_is_not_empty() {
    let binding = bind_stored(Some(r#"{"delta":{"ops":[{"insert":" \n"}]}}"#)).unwrap();
    assert_eq!(
        binding.field().value(),
        r#"{"delta":{"ops":[{"insert":" \n"}]}}"#
    );
}

#[test]
fn config_reaches_the_surface_untouched() {
    let document = MemoryDocument::new().with_child(container(Some(""), true, true));
    let config = EditorConfig::new()
        .theme("bubble")
        .with("modules", json!({"toolbar": false}));
    let binding = Binding::bind(&document, ".editor", &config, &MemorySurfaceFactory).unwrap();
    assert_eq!(binding.surface().config(), &config);
}
