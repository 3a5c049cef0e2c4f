//! `quill-normalize`: print the hidden-field text a stored value binds to.
//!
//! Usage:
//!   quill-normalize [--config <settings.toml>] < stored.json
//!
//! The stored value is read from stdin. An empty input prints `{}`.

use quill_field::cli::{init_logging, load_settings, normalize_stored_value, parse_args, read_stdin, CliError};

fn run() -> Result<String, CliError> {
    let args = parse_args(std::env::args().skip(1))?;
    let settings = load_settings(&args)?;
    let stored = read_stdin()?;
    normalize_stored_value(stored.trim(), &settings)
}

fn main() {
    init_logging();
    match run() {
        Ok(text) => println!("{text}"),
        Err(e) => {
            eprintln!("{e}");
            std::process::exit(1);
        }
    }
}
