//! Logic behind the command-line tools:
//! - `quill-normalize`: bind a stored value and print the resulting field text
//! - `quill-validate`: clean a submitted value like the form field does

use std::io::{self, Read};

use thiserror::Error;
use tracing_subscriber::EnvFilter;

use crate::binding::EditorFieldBinding;
use crate::config::{ConfigError, QuillSettings};
use crate::dom::{MemoryDocument, MemoryElement, Node};
use crate::error::BindError;
use crate::form::{FormError, QuillFormField};
use crate::memory::{MemorySurface, MemorySurfaceFactory};
use crate::widget::QuillWidget;

/// Field name used for the scratch widget.
const FIELD_NAME: &str = "content";

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Bind(#[from] BindError),
    #[error(transparent)]
    Form(#[from] FormError),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("failed to read stdin: {0}")]
    Io(#[from] io::Error),
    #[error("{0}")]
    Usage(String),
}

/// Render a widget holding `stored`, bind it, and return the hidden field's
/// text afterwards.
pub fn normalize_stored_value(stored: &str, settings: &QuillSettings) -> Result<String, CliError> {
    let widget = QuillWidget::new(settings.clone());
    let document = MemoryDocument::new().with_child(widget.render_fragment(FIELD_NAME, stored));
    let binding: EditorFieldBinding<MemorySurface, MemoryElement> = EditorFieldBinding::bind(
        &document,
        &widget.container_selector(FIELD_NAME),
        widget.editor_config(),
        &MemorySurfaceFactory,
    )?;
    Ok(binding.field().value())
}

/// Clean a submitted value and return it as compact JSON.
pub fn clean_submitted_value(raw: &str, required: bool) -> Result<String, CliError> {
    let value = QuillFormField::new(required).clean(Some(raw))?;
    Ok(value.to_string())
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Args {
    pub config: Option<String>,
    pub required: bool,
}

/// Parse `--config <path>` and `--required`.
pub fn parse_args<I: IntoIterator<Item = String>>(args: I) -> Result<Args, CliError> {
    let mut parsed = Args::default();
    let mut args = args.into_iter();
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--config" => {
                let path = args
                    .next()
                    .ok_or_else(|| CliError::Usage("--config needs a path".into()))?;
                parsed.config = Some(path);
            }
            "--required" => parsed.required = true,
            other => return Err(CliError::Usage(format!("unknown argument `{other}`"))),
        }
    }
    Ok(parsed)
}

pub fn load_settings(args: &Args) -> Result<QuillSettings, CliError> {
    match &args.config {
        Some(path) => Ok(QuillSettings::load(std::path::Path::new(path))?),
        None => Ok(QuillSettings::default()),
    }
}

pub fn read_stdin() -> Result<String, CliError> {
    let mut buf = String::new();
    io::stdin().read_to_string(&mut buf)?;
    Ok(buf)
}

/// Filter built from `RUST_LOG`-style directives. Missing, blank or
/// unparsable directives fall back to `warn`.
pub fn log_filter(directives: Option<&str>) -> EnvFilter {
    directives
        .filter(|directives| !directives.trim().is_empty())
        .and_then(|directives| EnvFilter::try_new(directives).ok())
        .unwrap_or_else(|| EnvFilter::new("warn"))
}

/// Log to stderr, `warn` unless `RUST_LOG` says otherwise.
pub fn init_logging() {
    let directives = std::env::var(EnvFilter::DEFAULT_ENV).ok();
    let _ = tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(log_filter(directives.as_deref()))
        .try_init();
}
