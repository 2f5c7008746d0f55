//! Document kinds of the asset format
//!
//! - Master document: `{ "settingList": [grid, ...] }`
//! - Book document: `{ "importGridList": [grid, ...] }`
//! - Plugin document: `{ "<grid name>": [[cell, ...], ...], ... }`

use std::path::Path;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use super::grid::{Grid, Row};
use crate::error::Result;
use crate::utils::json::read_json;

/// The document holding the setting tables, including the character table
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RawMasterDocument")]
pub struct MasterDocument {
    #[serde(rename = "settingList")]
    pub setting_list: Vec<Grid>,
}

/// Setting tables may omit their name; only the character table is found by it
#[derive(Deserialize)]
struct RawMasterDocument {
    #[serde(rename = "settingList", default)]
    setting_list: Vec<RawSettingGrid>,
}

#[derive(Deserialize)]
struct RawSettingGrid {
    #[serde(default)]
    name: String,
    #[serde(default)]
    rows: Vec<Row>,
}

impl From<RawMasterDocument> for MasterDocument {
    fn from(raw: RawMasterDocument) -> Self {
        Self {
            setting_list: raw
                .setting_list
                .into_iter()
                .map(|grid| Grid::new(grid.name, grid.rows))
                .collect(),
        }
    }
}

impl MasterDocument {
    pub fn load(path: &Path) -> Result<Self> {
        read_json(path)
    }

    /// First grid whose name ends with `suffix`, in document order
    #[must_use]
    pub fn find_table(&self, suffix: &str) -> Option<&Grid> {
        self.setting_list
            .iter()
            .find(|grid| grid.name.ends_with(suffix))
    }
}

/// A per-scene document whose grids hold dialogue
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookDocument {
    #[serde(rename = "importGridList", default)]
    pub import_grid_list: Vec<Grid>,
}

impl BookDocument {
    pub fn load(path: &Path) -> Result<Self> {
        read_json(path)
    }

    /// Flatten into the grid name -> rows shape the game loader reads
    #[must_use]
    pub fn to_plugin(&self) -> PluginDocument {
        PluginDocument(
            self.import_grid_list
                .iter()
                .map(|grid| (grid.name.clone(), grid.to_string_rows()))
                .collect(),
        )
    }
}

/// Packaged book, keyed by full grid name in document order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PluginDocument(pub IndexMap<String, Vec<Vec<String>>>);

impl PluginDocument {
    #[must_use]
    pub fn get(&self, grid_name: &str) -> Option<&Vec<Vec<String>>> {
        self.0.get(grid_name)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
