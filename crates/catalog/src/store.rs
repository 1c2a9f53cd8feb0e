//! In-memory catalog of profiles and candidate pools.
//!
//! Stands in for the application's profile and recommendation stores. It
//! is loaded once and then only read, so it can be shared behind an `Arc`
//! without locking.

use crate::error::{CatalogError, Result};
use crate::parser;
use crate::provider::CatalogProvider;
use crate::types::{Candidate, CandidateKind, Profile, ProfileId};
use std::collections::{HashMap, HashSet};
use std::path::Path;
use tracing::info;

pub const PROFILES_FILE: &str = "profiles.json";
pub const PRODUCTS_FILE: &str = "products.json";
pub const PEOPLE_FILE: &str = "people.json";

/// Profiles plus the two candidate pools.
#[derive(Debug, Default)]
pub struct Catalog {
    profiles: HashMap<ProfileId, Profile>,
    /// Profile ids in load order, for stable listing
    profile_order: Vec<ProfileId>,
    products: Vec<Candidate>,
    people: Vec<Candidate>,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a catalog from already-materialized records.
    ///
    /// Fails on duplicate profile ids or duplicate candidate ids within a
    /// pool.
    pub fn from_parts(
        profiles: Vec<Profile>,
        products: Vec<Candidate>,
        people: Vec<Candidate>,
    ) -> Result<Self> {
        let mut catalog = Catalog::new();
        for profile in profiles {
            catalog.insert_profile(profile)?;
        }
        catalog.products = dedup_checked(products, CandidateKind::Product)?;
        catalog.people = dedup_checked(people, CandidateKind::Person)?;
        Ok(catalog)
    }

    /// Load `profiles.json`, `products.json` and `people.json` from a
    /// directory. The three files are parsed in parallel.
    pub fn load_from_dir(data_dir: &Path) -> Result<Self> {
        let profiles_path = data_dir.join(PROFILES_FILE);
        let products_path = data_dir.join(PRODUCTS_FILE);
        let people_path = data_dir.join(PEOPLE_FILE);

        let ((profiles, products), people) = rayon::join(
            || {
                rayon::join(
                    || parser::parse_profiles(&profiles_path),
                    || parser::parse_candidates(&products_path, CandidateKind::Product),
                )
            },
            || parser::parse_candidates(&people_path, CandidateKind::Person),
        );

        let catalog = Self::from_parts(profiles?, products?, people?)?;
        let (profiles, products, people) = catalog.counts();
        info!(
            "Loaded catalog from {}: {} profiles, {} products, {} people",
            data_dir.display(),
            profiles,
            products,
            people
        );
        Ok(catalog)
    }

    /// Insert a profile, rejecting a duplicate id.
    pub fn insert_profile(&mut self, profile: Profile) -> Result<()> {
        if profile.id.trim().is_empty() {
            return Err(CatalogError::ValidationError(
                "profile id must not be blank".to_string(),
            ));
        }
        if self.profiles.contains_key(&profile.id) {
            return Err(CatalogError::DuplicateId {
                entity: "profile".to_string(),
                id: profile.id,
            });
        }
        self.profile_order.push(profile.id.clone());
        self.profiles.insert(profile.id.clone(), profile);
        Ok(())
    }

    pub fn profile(&self, id: &str) -> Option<&Profile> {
        self.profiles.get(id)
    }

    pub fn pool(&self, kind: CandidateKind) -> &[Candidate] {
        match kind {
            CandidateKind::Product => &self.products,
            CandidateKind::Person => &self.people,
        }
    }

    /// (profiles, products, people)
    pub fn counts(&self) -> (usize, usize, usize) {
        (self.profiles.len(), self.products.len(), self.people.len())
    }
}

fn dedup_checked(candidates: Vec<Candidate>, kind: CandidateKind) -> Result<Vec<Candidate>> {
    let mut seen = HashSet::with_capacity(candidates.len());
    for candidate in &candidates {
        if candidate.id.trim().is_empty() {
            return Err(CatalogError::ValidationError(format!(
                "{} candidate with blank id",
                kind
            )));
        }
        if !seen.insert(candidate.id.as_str()) {
            return Err(CatalogError::DuplicateId {
                entity: kind.to_string(),
                id: candidate.id.clone(),
            });
        }
    }
    Ok(candidates)
}

impl CatalogProvider for Catalog {
    fn get_profile(&self, id: &str) -> Result<Profile> {
        self.profile(id)
            .cloned()
            .ok_or_else(|| CatalogError::ProfileNotFound(id.to_string()))
    }

    fn get_candidate_pool(&self, kind: CandidateKind) -> Result<Vec<Candidate>> {
        Ok(self.pool(kind).to_vec())
    }

    fn profiles(&self) -> Vec<Profile> {
        self.profile_order
            .iter()
            .filter_map(|id| self.profiles.get(id).cloned())
            .collect()
    }
}
