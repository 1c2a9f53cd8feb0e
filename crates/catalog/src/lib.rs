//! # Catalog Crate
//!
//! Data model and data access for the style match engine.
//!
//! ## Main Components
//!
//! - **types**: `Profile`, `Candidate` and their supporting types
//! - **parser**: parse the JSON documents into records
//! - **store**: `Catalog`, an in-memory store loaded from a directory
//! - **provider**: the `CatalogProvider` read interface
//! - **error**: error types for loading and lookups
//!
//! ## Example Usage
//!
//! ```ignore
//! use catalog::{Catalog, CatalogProvider, CandidateKind};
//! use std::path::Path;
//!
//! let catalog = Catalog::load_from_dir(Path::new("data"))?;
//! let profile = catalog.get_profile("me")?;
//! let products = catalog.get_candidate_pool(CandidateKind::Product)?;
//! ```

pub mod error;
pub mod parser;
pub mod provider;
pub mod store;
pub mod types;

pub use error::{CatalogError, Result};
pub use provider::CatalogProvider;
pub use store::Catalog;
pub use types::{
    Candidate, CandidateId, CandidateKind, DisplayAttributes, MatchableAttributes, Profile,
    ProfileId, RecentProduct, Relationship,
};
