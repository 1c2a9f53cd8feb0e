//! Server crate for the style match engine.
//!
//! This crate contains the discovery service that ties the catalog, the
//! matching engine and the ranking pipeline together, plus its
//! configuration.

pub mod config;
pub mod orchestrator;

pub use config::{ConfigError, EngineConfig};
pub use orchestrator::{Comparison, DiscoveryService};
