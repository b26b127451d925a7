//! Error types for declaration lookup

use crate::search::Suggestion;

/// Structured error type for snapshot lookups.
#[derive(Debug, Clone)]
pub enum SymbolLookupError {
    NotFound {
        input: String,
        suggestions: Vec<Suggestion>,
    },
    ParseError {
        path: String,
        source: String,
    },
}

impl std::fmt::Display for SymbolLookupError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SymbolLookupError::NotFound { input, suggestions } => {
                write!(f, "Declaration not found: '{}'", input)?;
                if !suggestions.is_empty() {
                    write!(f, ". Did you mean: {}?", suggestions[0].candidate)?;
                }
                Ok(())
            }
            SymbolLookupError::ParseError { path, source } => {
                write!(f, "Parse error in {}: {}", path, source)
            }
        }
    }
}

impl std::error::Error for SymbolLookupError {}
