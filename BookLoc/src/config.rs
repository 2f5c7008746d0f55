//! Pipeline configuration (bookloc.toml)
//!
//! Column names, table markers and file suffixes of the asset format, plus the
//! on-disk layout of the workspace the stages read from and write to. Both are
//! passed explicitly to every stage.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::Result;

fn default_speaker_column() -> String {
    "Arg1".to_string()
}

fn default_text_column() -> String {
    "Text".to_string()
}

fn default_character_table_suffix() -> String {
    ":Character".to_string()
}

fn default_character_id_index() -> usize {
    1
}

fn default_character_name_index() -> usize {
    2
}

fn default_book_suffix() -> String {
    ".book.json".to_string()
}

fn default_chapter_suffix() -> String {
    ".chapter.json".to_string()
}

fn default_source_only_folder() -> String {
    "CharaScenario".to_string()
}

fn default_master_path() -> PathBuf {
    PathBuf::from("Adventure").join("Master.chapter.json")
}

fn default_out_dir() -> PathBuf {
    PathBuf::from("out")
}

fn default_exclude_names() -> PathBuf {
    PathBuf::from("exclude_names.json")
}

/// Asset-format settings shared by all stages
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Header name of the speaker-id column in book grids
    #[serde(default = "default_speaker_column")]
    pub speaker_column: String,
    /// Header name of the dialogue-text column in book grids
    #[serde(default = "default_text_column")]
    pub text_column: String,
    /// Grid name suffix marking the character table in the master document
    #[serde(default = "default_character_table_suffix")]
    pub character_table_suffix: String,
    /// Cell index of the character id in character-table rows
    #[serde(default = "default_character_id_index")]
    pub character_id_index: usize,
    /// Cell index of the display name in character-table rows
    #[serde(default = "default_character_name_index")]
    pub character_name_index: usize,
    /// Filename suffix identifying book documents
    #[serde(default = "default_book_suffix")]
    pub book_suffix: String,
    /// Filename suffix given to packaged documents
    #[serde(default = "default_chapter_suffix")]
    pub chapter_suffix: String,
    /// Folder name that only exists in the source tree; dropped from packaged paths
    #[serde(default = "default_source_only_folder")]
    pub source_only_folder: String,
    /// Master document location, relative to the source root
    #[serde(default = "default_master_path")]
    pub master_path: PathBuf,
    /// Treat dialogue entries missing `name` or `message` as malformed
    #[serde(default)]
    pub strict_dialogue_keys: bool,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            speaker_column: default_speaker_column(),
            text_column: default_text_column(),
            character_table_suffix: default_character_table_suffix(),
            character_id_index: default_character_id_index(),
            character_name_index: default_character_name_index(),
            book_suffix: default_book_suffix(),
            chapter_suffix: default_chapter_suffix(),
            source_only_folder: default_source_only_folder(),
            master_path: default_master_path(),
            strict_dialogue_keys: false,
        }
    }
}

impl PipelineConfig {
    /// Whether a file name marks a book document
    #[must_use]
    pub fn is_book(&self, path: &Path) -> bool {
        path.file_name()
            .and_then(|name| name.to_str())
            .is_some_and(|name| name.ends_with(&self.book_suffix))
    }
}

/// Where each stage's artifacts live
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkspaceLayout {
    /// Root of all generated output
    #[serde(default = "default_out_dir")]
    pub out_dir: PathBuf,
    /// Exclusion list consulted while growing the name registry
    #[serde(default = "default_exclude_names")]
    pub exclude_names: PathBuf,
}

impl Default for WorkspaceLayout {
    fn default() -> Self {
        Self::new(default_out_dir())
    }
}

impl WorkspaceLayout {
    /// Layout rooted at `out_dir`
    pub fn new(out_dir: impl Into<PathBuf>) -> Self {
        Self {
            out_dir: out_dir.into(),
            exclude_names: default_exclude_names(),
        }
    }

    /// Extraction output, input of the mapping stage
    #[must_use]
    pub fn for_translation_dir(&self) -> PathBuf {
        self.out_dir.join("1_For_Translation")
    }

    /// Mapping output handed to translators
    #[must_use]
    pub fn ready_dir(&self) -> PathBuf {
        self.out_dir.join("2_Ready_For_Translation")
    }

    /// Finished translations; the root of the idempotency gate
    #[must_use]
    pub fn translated_dir(&self) -> PathBuf {
        self.out_dir.join("3_Translated")
    }

    /// Packaging output consumed by the game plugin
    #[must_use]
    pub fn plugin_data_dir(&self) -> PathBuf {
        self.out_dir.join("4_Plugin_Data")
    }

    /// Persisted id -> display name map
    #[must_use]
    pub fn characters_file(&self) -> PathBuf {
        self.out_dir.join("master_characters.json")
    }

    /// Persisted name registry
    #[must_use]
    pub fn names_file(&self) -> PathBuf {
        self.out_dir.join("names.json")
    }
}

/// Contents of a `bookloc.toml` file
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConfigFile {
    #[serde(default)]
    pub pipeline: PipelineConfig,
    #[serde(default)]
    pub layout: Option<WorkspaceLayout>,
}

impl ConfigFile {
    /// Load a config file from disk
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::parse(&text)
    }

    /// Parse config file contents
    pub fn parse(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }
}
