//! Result Output
//!
//! Writes run records and batch results as pretty-printed JSON.

use serde::Serialize;
use std::fs;
use std::io::{self, Write};
use std::path::Path;

/// Serialize `value` as pretty JSON.
pub fn to_json<T: Serialize>(value: &T) -> io::Result<String> {
    serde_json::to_string_pretty(value).map_err(io::Error::other)
}

/// Write `value` as JSON to `path`, creating parent directories as needed.
pub fn write_json<T: Serialize>(path: impl AsRef<Path>, value: &T) -> io::Result<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            fs::create_dir_all(parent)?;
        }
    }

    let json = to_json(value)?;
    fs::write(path, json)?;
    tracing::info!(path = %path.display(), "Wrote results");
    Ok(())
}

/// Write `value` as JSON to stdout, or to `path` when one is given.
pub fn emit_json<T: Serialize>(path: Option<&Path>, value: &T) -> io::Result<()> {
    match path {
        Some(path) => write_json(path, value),
        None => {
            let json = to_json(value)?;
            let mut stdout = io::stdout().lock();
            writeln!(stdout, "{}", json)
        }
    }
}
