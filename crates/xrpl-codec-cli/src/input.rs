//! Reading command input from a file, an argument, or stdin.

use serde_json::Value;
use std::io::{self, Read};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum InputError {
    #[error("Failed to read file {path}: {source}")]
    File { path: String, source: io::Error },
    #[error("Failed to read stdin: {0}")]
    Stdin(#[from] io::Error),
    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Reads the file at `path`, or all of stdin.
pub fn read_text(path: Option<&str>) -> Result<String, InputError> {
    match path {
        Some(path) => std::fs::read_to_string(path).map_err(|source| InputError::File {
            path: path.to_string(),
            source,
        }),
        None => {
            let mut buffer = String::new();
            io::stdin().read_to_string(&mut buffer)?;
            Ok(buffer)
        }
    }
}

/// Reads and parses a JSON document.
pub fn read_json(path: Option<&str>) -> Result<Value, InputError> {
    Ok(serde_json::from_str(&read_text(path)?)?)
}
