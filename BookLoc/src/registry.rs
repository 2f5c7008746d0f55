//! Name registry and exclusion list
//!
//! The registry collects display names that need translating. It is
//! append-only across runs: every key starts out mapped to itself so a
//! translator can edit the value in place, and later runs never touch keys
//! that already exist.

use std::collections::BTreeSet;
use std::collections::HashSet;
use std::path::Path;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::utils::json::{read_json, write_json};

/// Names that must never enter the registry
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExclusionSet {
    names: HashSet<String>,
}

impl ExclusionSet {
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            names: names.into_iter().map(Into::into).collect(),
        }
    }

    /// Load a JSON array of names.
    ///
    /// A missing or unusable file yields an empty set; the list is optional.
    #[must_use]
    pub fn load(path: &Path) -> Self {
        if !path.is_file() {
            tracing::info!(
                "No exclusion list at {}; create one to keep names out of the registry",
                path.display()
            );
            return Self::default();
        }

        match read_json::<Vec<String>>(path) {
            Ok(names) => {
                let set = Self::new(names);
                tracing::info!("Loaded {} excluded names from {}", set.len(), path.display());
                set
            }
            Err(e) => {
                tracing::warn!("Ignoring exclusion list {}: expected a JSON array of strings ({e})", path.display());
                Self::default()
            }
        }
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.names.contains(name)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.names.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

/// Display name -> translated display name
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NameRegistry {
    entries: IndexMap<String, String>,
}

impl NameRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Load the registry left by previous runs.
    ///
    /// A missing file starts an empty registry; an unreadable one is
    /// replaced with a warning.
    #[must_use]
    pub fn load(path: &Path) -> Self {
        if !path.is_file() {
            tracing::info!("No name registry at {}; creating a new one", path.display());
            return Self::default();
        }

        match read_json(path) {
            Ok(registry) => {
                tracing::info!("Updating existing name registry {}", path.display());
                registry
            }
            Err(e) => {
                tracing::warn!("Name registry {} is malformed, starting over: {e}", path.display());
                Self::default()
            }
        }
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        write_json(path, self)
    }

    /// Add names not yet present and not excluded, in sorted order.
    ///
    /// Existing entries keep their (possibly translated) values. Returns the
    /// number of entries added.
    pub fn add_names<I, S>(&mut self, names: I, excluded: &ExclusionSet) -> usize
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let sorted: BTreeSet<String> = names.into_iter().map(Into::into).collect();
        let mut added = 0;
        for name in sorted {
            if name.is_empty() || excluded.contains(&name) || self.entries.contains_key(&name) {
                continue;
            }
            self.entries.insert(name.clone(), name);
            added += 1;
        }
        added
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries.get(name).map(String::as_str)
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}
