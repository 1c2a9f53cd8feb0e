//! Error types for the catalog crate.
//!
//! These are the only failures in the whole engine: everything downstream of
//! a loaded profile and candidate pool degrades gracefully instead of
//! erroring.

use thiserror::Error;

/// Errors that can occur while loading or querying the catalog
#[derive(Error, Debug)]
pub enum CatalogError {
    /// File could not be found or opened
    #[error("Failed to open file: {path}")]
    FileNotFound { path: String },

    /// I/O error occurred while reading a file
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// A JSON document couldn't be parsed
    #[error("Parse error in {file}: {source}")]
    ParseError {
        file: String,
        #[source]
        source: serde_json::Error,
    },

    /// Two records share an id
    #[error("Duplicate {entity} id: {id}")]
    DuplicateId { entity: String, id: String },

    /// No profile with this id
    #[error("Profile not found: {0}")]
    ProfileNotFound(String),

    /// No candidate with this id in the requested pool
    #[error("Candidate not found: {0}")]
    CandidateNotFound(String),

    /// Data validation failed
    #[error("Validation failed: {0}")]
    ValidationError(String),
}

/// Convenience type alias for Results in this crate
pub type Result<T> = std::result::Result<T, CatalogError>;
