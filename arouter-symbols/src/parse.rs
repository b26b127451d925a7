//! Snapshot parsing utilities

use crate::error::SymbolLookupError;
use crate::types::SymbolSnapshot;
use std::fs;
use std::path::Path;

pub fn parse_snapshot_file<P: AsRef<Path>>(path: P) -> Result<SymbolSnapshot, SymbolLookupError> {
    let display = path.as_ref().display().to_string();
    let content = fs::read_to_string(&path).map_err(|e| SymbolLookupError::ParseError {
        path: display.clone(),
        source: e.to_string(),
    })?;

    parse_snapshot_content(&content).map_err(|source| SymbolLookupError::ParseError {
        path: display,
        source,
    })
}

pub fn parse_snapshot_content(content: &str) -> Result<SymbolSnapshot, String> {
    serde_json::from_str(content).map_err(|e| format!("Failed to parse symbol snapshot JSON: {}", e))
}
