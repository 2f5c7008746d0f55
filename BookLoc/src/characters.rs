//! Character resolver
//!
//! Maps speaker ids used in book grids to display names, built from the
//! character table of the master document. Unknown ids resolve to themselves.

use std::path::Path;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::config::PipelineConfig;
use crate::error::{Error, Result};
use crate::formats::MasterDocument;
use crate::utils::json::{read_json, write_json};

/// Speaker id -> display name
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CharacterMap {
    names: IndexMap<String, String>,
}

impl CharacterMap {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from the first character table of the master document.
    ///
    /// Only the first grid whose name carries the table suffix is read. Rows
    /// too short for the id or name column, or with either cell empty, are
    /// ignored.
    #[must_use]
    pub fn from_master(master: &MasterDocument, config: &PipelineConfig) -> Self {
        let mut map = Self::new();
        let Some(table) = master.find_table(&config.character_table_suffix) else {
            tracing::warn!(
                "No grid ending with '{}' in master document",
                config.character_table_suffix
            );
            return map;
        };

        let columns = [config.character_id_index, config.character_name_index];
        for row in table.data_rows() {
            if !row.reaches(&columns) {
                continue;
            }
            let id = row.cell(config.character_id_index);
            let name = row.cell(config.character_name_index);
            if !id.is_empty() && !name.is_empty() {
                map.insert(id, name);
            }
        }

        tracing::debug!("Character table '{}': {} entries", table.name, map.len());
        map
    }

    /// Display name for `id`, or `id` itself when unmapped
    #[must_use]
    pub fn resolve<'a>(&'a self, id: &'a str) -> &'a str {
        self.names.get(id).map_or(id, String::as_str)
    }

    #[must_use]
    pub fn get(&self, id: &str) -> Option<&str> {
        self.names.get(id).map(String::as_str)
    }

    pub fn insert(&mut self, id: impl Into<String>, name: impl Into<String>) {
        self.names.insert(id.into(), name.into());
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.names.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Load the map persisted by the extraction stage
    pub fn load(path: &Path) -> Result<Self> {
        if !path.is_file() {
            return Err(Error::MissingPrerequisite {
                path: path.to_path_buf(),
                hint: "run `extract` first".to_string(),
            });
        }
        read_json(path)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        write_json(path, self)
    }
}
