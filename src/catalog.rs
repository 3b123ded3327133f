// Analyzer catalog
//
// The catalog is the administrator-maintained list of analyzer profiles,
// stored as a JSON array. It is read once at startup and looked up by
// profile name; the pipeline never modifies it.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use thiserror::Error;
use tracing::info;

use crate::analyzer::{AnalyzerProfile, ProfileError};

#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("Failed to read catalog: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse catalog: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid profile: {0}")]
    InvalidProfile(#[from] ProfileError),

    #[error("Duplicate profile: {0}")]
    DuplicateProfile(String),

    #[error("Unknown analyzer profile: {0}")]
    UnknownProfile(String),
}

#[derive(Debug, Clone, Default)]
pub struct AnalyzerCatalog {
    profiles: BTreeMap<String, AnalyzerProfile>,
}

impl AnalyzerCatalog {
    pub fn from_profiles(
        profiles: impl IntoIterator<Item = AnalyzerProfile>,
    ) -> Result<Self, CatalogError> {
        let mut by_name = BTreeMap::new();
        for profile in profiles {
            profile.validate()?;
            if by_name.contains_key(&profile.name) {
                return Err(CatalogError::DuplicateProfile(profile.name));
            }
            by_name.insert(profile.name.clone(), profile);
        }
        Ok(Self { profiles: by_name })
    }

    pub fn from_json_str(json: &str) -> Result<Self, CatalogError> {
        let profiles: Vec<AnalyzerProfile> = serde_json::from_str(json)?;
        Self::from_profiles(profiles)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let path = path.as_ref();
        let catalog = Self::from_json_str(&fs::read_to_string(path)?)?;
        info!(
            catalog = %path.display(),
            profiles = catalog.profiles.len(),
            "Loaded analyzer catalog"
        );
        Ok(catalog)
    }

    pub fn get(&self, name: &str) -> Result<&AnalyzerProfile, CatalogError> {
        self.profiles
            .get(name)
            .ok_or_else(|| CatalogError::UnknownProfile(name.to_string()))
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.profiles.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.profiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.profiles.is_empty()
    }
}
