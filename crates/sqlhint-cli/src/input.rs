//! Input handling for the SQL document and the schema file.

use anyhow::{Context, Result};
use sqlhint_core::Schema;
use std::io::{self, Read};
use std::path::Path;

/// Read the SQL document from `file`, or from stdin when none is given.
pub fn read_sql(file: Option<&Path>) -> Result<String> {
    match file {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read file: {}", path.display())),
        None => read_from_stdin(),
    }
}

fn read_from_stdin() -> Result<String> {
    let mut content = String::new();
    io::stdin()
        .read_to_string(&mut content)
        .context("Failed to read from stdin")?;
    Ok(content)
}

/// Load a JSON schema file. Without a file the schema is empty, which still
/// yields keyword completions.
pub fn load_schema(file: Option<&Path>) -> Result<Schema> {
    let Some(path) = file else {
        return Ok(Schema::default());
    };

    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read schema file: {}", path.display()))?;
    serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse schema file: {}", path.display()))
}
