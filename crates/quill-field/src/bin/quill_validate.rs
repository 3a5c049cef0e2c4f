//! `quill-validate`: clean a submitted field value.
//!
//! Usage:
//!   quill-validate [--required] < submitted.json
//!
//! Prints the cleaned value as compact JSON, or the validation message on
//! stderr with exit status 1.

use quill_field::cli::{clean_submitted_value, init_logging, parse_args, read_stdin, CliError};

fn run() -> Result<String, CliError> {
    let args = parse_args(std::env::args().skip(1))?;
    let raw = read_stdin()?;
    clean_submitted_value(&raw, args.required)
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
