//! Parsers for the catalog's JSON documents.
//!
//! Each document is a JSON array of records. Candidates get their kind from
//! the file they were read from, whatever the record itself says.

use crate::error::{CatalogError, Result};
use crate::types::{Candidate, CandidateKind, Profile};
use serde::de::DeserializeOwned;
use std::fs;
use std::io::ErrorKind;
use std::path::Path;

/// Read a whole document. A missing file is reported as such, every other
/// I/O failure keeps its underlying error.
fn read_document(path: &Path) -> Result<String> {
    fs::read_to_string(path).map_err(|err| match err.kind() {
        ErrorKind::NotFound => CatalogError::FileNotFound {
            path: path.display().to_string(),
        },
        _ => CatalogError::IoError(err),
    })
}

/// Parse a JSON array document into records.
fn parse_array<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>> {
    let raw = read_document(path)?;
    serde_json::from_str(&raw).map_err(|source| CatalogError::ParseError {
        file: path.display().to_string(),
        source,
    })
}

/// Parse `profiles.json`
pub fn parse_profiles(path: &Path) -> Result<Vec<Profile>> {
    parse_array(path)
}

/// Parse a candidate pool document and stamp every record with `kind`
pub fn parse_candidates(path: &Path, kind: CandidateKind) -> Result<Vec<Candidate>> {
    let mut candidates: Vec<Candidate> = parse_array(path)?;
    for candidate in &mut candidates {
        candidate.kind = kind;
    }
    Ok(candidates)
}

/// Parse candidates from an in-memory JSON string (used by tests and tools
/// that receive pools from elsewhere)
pub fn candidates_from_str(json: &str, kind: CandidateKind) -> Result<Vec<Candidate>> {
    let mut candidates: Vec<Candidate> =
        serde_json::from_str(json).map_err(|source| CatalogError::ParseError {
            file: "<inline>".to_string(),
            source,
        })?;
    for candidate in &mut candidates {
        candidate.kind = kind;
    }
    Ok(candidates)
}
