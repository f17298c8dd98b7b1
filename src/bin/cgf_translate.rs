//! Defs → CGF translation CLI
//!
//! Reads a defs YAML file, expands every coverpoint template, and writes the
//! enumerated CGF document.
//!
//! ## Usage
//!
//! ```bash
//! cargo run --bin cgf_translate -- config.defs output.cgf
//! ```

use std::path::PathBuf;
use std::process;

use anyhow::{Context, Result};

fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let mut args = std::env::args().skip(1);
    let (input, output) = match (args.next(), args.next()) {
        (Some(input), Some(output)) => (PathBuf::from(input), PathBuf::from(output)),
        _ => {
            eprintln!("usage: cgf_translate <input.defs> <output.cgf>");
            process::exit(2);
        }
    };

    cgf_translator::translate_file(&input, &output)
        .with_context(|| format!("failed to translate {}", input.display()))?;
    Ok(())
}
