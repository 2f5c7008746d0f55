//! Extraction stage
//!
//! Reads the original asset tree and writes one dialogue file per grid into
//! the for-translation tree, skipping grids that already have a translation.
//! Also persists the character map and grows the name registry.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use crate::characters::CharacterMap;
use crate::config::{PipelineConfig, WorkspaceLayout};
use crate::error::{Error, Result};
use crate::formats::{BookDocument, DialogueEntry, Grid, MasterDocument};
use crate::registry::{ExclusionSet, NameRegistry};
use crate::utils::json::write_json;
use crate::utils::path::{find_files_with_suffix, normalize_path, relative_to, strip_final_extension};

use super::types::{ItemFailure, StagePhase, StageProgress, StageProgressCallback, TranslationGate};

/// Options for the extraction stage
#[derive(Debug, Clone)]
pub struct ExtractOptions {
    /// Root of the unpacked original asset tree
    pub source: PathBuf,
    /// Rewrite grids even when a translation exists
    pub force: bool,
    /// Exclusion list; the layout default is used when `None`
    pub exclude: Option<PathBuf>,
}

impl ExtractOptions {
    pub fn new(source: impl Into<PathBuf>) -> Self {
        Self {
            source: source.into(),
            force: false,
            exclude: None,
        }
    }
}

/// Summary of an extraction run
#[derive(Debug, Clone, Default)]
pub struct ExtractResult {
    /// Book documents found under the source root
    pub books_scanned: usize,
    /// Book documents that could not be read
    pub books_failed: usize,
    /// Grids without rows or lacking the speaker or text column
    pub grids_skipped: usize,
    /// Dialogue files written
    pub extracted: usize,
    /// Dialogue files left alone because a translation exists
    pub skipped: usize,
    /// Entries in the character map
    pub characters: usize,
    /// Names newly added to the registry
    pub names_added: usize,
    /// Registry size after the run
    pub names_total: usize,
    pub failures: Vec<ItemFailure>,
}

/// Dialogue pulled from one grid
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GridDialogue {
    pub grid_id: String,
    pub entries: Vec<DialogueEntry>,
    /// Non-ASCII speaker ids seen in the grid
    pub speakers: BTreeSet<String>,
}

/// Pull dialogue entries out of a grid.
///
/// Fails with [`Error::ColumnNotFound`] when the header lacks either column;
/// such grids contribute nothing.
pub fn extract_grid(grid: &Grid, config: &PipelineConfig) -> Result<GridDialogue> {
    let speaker_col = grid.column_index(&config.speaker_column)?;
    let text_col = grid.column_index(&config.text_column)?;

    let mut entries = Vec::new();
    let mut speakers = BTreeSet::new();
    for row in grid.data_rows() {
        if !row.reaches(&[speaker_col, text_col]) {
            continue;
        }
        let speaker = row.cell(speaker_col);
        let text = row.cell(text_col);

        if !speaker.is_empty() && !speaker.is_ascii() {
            speakers.insert(speaker.to_string());
        }
        if !text.is_empty() {
            entries.push(DialogueEntry::new(speaker, text));
        }
    }

    Ok(GridDialogue {
        grid_id: grid.grid_id().to_string(),
        entries,
        speakers,
    })
}

/// Relative dialogue file path for a grid of a book: `<book minus ext>/<gridId>.json`
#[must_use]
pub fn dialogue_path(book_relative: &Path, grid_id: &str) -> PathBuf {
    strip_final_extension(book_relative).join(format!("{grid_id}.json"))
}

/// Run the extraction stage.
///
/// # Errors
/// Fails when the source root or master document is missing or unreadable,
/// or on IO errors writing outputs. Malformed books are skipped and counted.
pub fn extract(
    options: &ExtractOptions,
    config: &PipelineConfig,
    layout: &WorkspaceLayout,
    gate: &dyn TranslationGate,
    progress: StageProgressCallback,
) -> Result<ExtractResult> {
    if !options.source.is_dir() {
        return Err(Error::NotFound {
            path: options.source.clone(),
        });
    }

    // Character map
    progress(&StageProgress::new(StagePhase::ReadingCharacters, 0, 1));
    let master_path = options.source.join(&config.master_path);
    if !master_path.is_file() {
        return Err(Error::NotFound { path: master_path });
    }
    let master = MasterDocument::load(&master_path)?;
    let characters = CharacterMap::from_master(&master, config);

    let output_dir = layout.for_translation_dir();
    if options.force && output_dir.exists() {
        tracing::warn!("--force: recreating {}", output_dir.display());
        std::fs::remove_dir_all(&output_dir)?;
    }
    std::fs::create_dir_all(&output_dir)?;
    std::fs::create_dir_all(layout.translated_dir())?;

    characters.save(&layout.characters_file())?;
    tracing::info!(
        "Extracted {} characters to {}",
        characters.len(),
        layout.characters_file().display()
    );

    // Books
    let books = find_files_with_suffix(&options.source, &config.book_suffix)?;
    let total = books.len();
    tracing::info!("Scanning {total} book documents");

    let mut result = ExtractResult {
        books_scanned: total,
        characters: characters.len(),
        ..ExtractResult::default()
    };
    let mut speakers = BTreeSet::new();

    for (i, book_path) in books.iter().enumerate() {
        let relative = relative_to(book_path, &options.source)?;
        progress(&StageProgress::with_file(
            StagePhase::ExtractingBooks,
            i + 1,
            total,
            normalize_path(&relative),
        ));

        let book = match BookDocument::load(book_path) {
            Ok(book) => book,
            Err(e) => {
                tracing::warn!("Skipping {}: {e}", book_path.display());
                result.books_failed += 1;
                result.failures.push(ItemFailure::new(book_path, e.to_string()));
                continue;
            }
        };

        for grid in &book.import_grid_list {
            if grid.rows.is_empty() {
                result.grids_skipped += 1;
                continue;
            }
            let dialogue = match extract_grid(grid, config) {
                Ok(dialogue) => dialogue,
                Err(e) => {
                    tracing::debug!("{}: {e}", normalize_path(&relative));
                    result.grids_skipped += 1;
                    continue;
                }
            };
            speakers.extend(dialogue.speakers);

            if dialogue.entries.is_empty() {
                continue;
            }

            let target = dialogue_path(&relative, &dialogue.grid_id);
            if !options.force && gate.already_translated(&target) {
                result.skipped += 1;
                continue;
            }

            write_json(&output_dir.join(&target), &dialogue.entries)?;
            result.extracted += 1;
        }
    }

    // Name registry
    progress(&StageProgress::new(StagePhase::UpdatingRegistry, 0, 1));
    let exclude_path = options
        .exclude
        .clone()
        .unwrap_or_else(|| layout.exclude_names.clone());
    let excluded = ExclusionSet::load(&exclude_path);

    let names_path = layout.names_file();
    let mut registry = NameRegistry::load(&names_path);
    let display_names: Vec<&str> = speakers
        .iter()
        .map(|id| characters.resolve(id))
        .filter(|name| !name.is_empty())
        .collect();
    result.names_added = registry.add_names(display_names, &excluded);
    result.names_total = registry.len();
    registry.save(&names_path)?;

    if result.names_added > 0 {
        tracing::info!("Added {} new names to {}", result.names_added, names_path.display());
    } else {
        tracing::info!("No new names for {}", names_path.display());
    }

    progress(&StageProgress::new(StagePhase::Complete, total, total));
    tracing::info!(
        "Extraction complete: {} extracted, {} skipped, {} failed",
        result.extracted,
        result.skipped,
        result.books_failed
    );

    Ok(result)
}
