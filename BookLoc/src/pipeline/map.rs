//! Mapping stage
//!
//! Rewrites extracted dialogue files with display names in place of speaker
//! ids, for the translator's benefit. Packaging does not depend on it.

use std::path::Path;

use crate::characters::CharacterMap;
use crate::config::{PipelineConfig, WorkspaceLayout};
use crate::error::{Error, Result};
use crate::formats::{DialogueEntry, read_dialogue};
use crate::utils::json::write_json;
use crate::utils::path::{find_files_with_suffix, normalize_path, relative_to};

use super::types::{ItemFailure, StagePhase, StageProgress, StageProgressCallback, TranslationGate};

/// Options for the mapping stage
#[derive(Debug, Clone, Copy, Default)]
pub struct MapOptions {
    /// Remap files even when a translation exists
    pub force: bool,
}

/// Summary of a mapping run
#[derive(Debug, Clone, Default)]
pub struct MapResult {
    /// Dialogue files written to the ready tree
    pub mapped: usize,
    /// Files left alone because a translation exists
    pub skipped: usize,
    /// Files that could not be parsed
    pub failed: usize,
    pub failures: Vec<ItemFailure>,
}

/// Replace every speaker id with its display name
#[must_use]
pub fn map_entries(entries: &[DialogueEntry], characters: &CharacterMap) -> Vec<DialogueEntry> {
    entries
        .iter()
        .map(|entry| DialogueEntry::new(characters.resolve(&entry.name), entry.message.clone()))
        .collect()
}

/// Run the mapping stage.
///
/// # Errors
/// Fails with [`Error::MissingPrerequisite`] when extraction has not run.
pub fn map(
    options: &MapOptions,
    config: &PipelineConfig,
    layout: &WorkspaceLayout,
    gate: &dyn TranslationGate,
    progress: StageProgressCallback,
) -> Result<MapResult> {
    let input_dir = layout.for_translation_dir();
    if !input_dir.is_dir() {
        return Err(Error::MissingPrerequisite {
            path: input_dir,
            hint: "run `extract` first".to_string(),
        });
    }
    let characters = CharacterMap::load(&layout.characters_file())?;
    tracing::info!("Loaded {} character mappings", characters.len());

    let output_dir = layout.ready_dir();
    if options.force && output_dir.exists() {
        tracing::warn!("--force: recreating {}", output_dir.display());
        std::fs::remove_dir_all(&output_dir)?;
    }
    std::fs::create_dir_all(&output_dir)?;
    std::fs::create_dir_all(layout.translated_dir())?;

    let files = find_files_with_suffix(&input_dir, ".json")?;
    let total = files.len();
    let mut result = MapResult::default();

    for (i, path) in files.iter().enumerate() {
        let relative = relative_to(path, &input_dir)?;
        progress(&StageProgress::with_file(
            StagePhase::MappingDialogue,
            i + 1,
            total,
            normalize_path(&relative),
        ));

        if !options.force && gate.already_translated(&relative) {
            result.skipped += 1;
            continue;
        }

        match map_file(path, &output_dir.join(&relative), &characters, config) {
            Ok(()) => result.mapped += 1,
            Err(e @ Error::MalformedDocument { .. }) => {
                tracing::warn!("Skipping {}: {e}", path.display());
                result.failed += 1;
                result.failures.push(ItemFailure::new(path, e.to_string()));
            }
            Err(e) => return Err(e),
        }
    }

    progress(&StageProgress::new(StagePhase::Complete, total, total));
    tracing::info!(
        "Mapping complete: {} mapped, {} skipped, {} failed",
        result.mapped,
        result.skipped,
        result.failed
    );

    Ok(result)
}

fn map_file(
    source: &Path,
    dest: &Path,
    characters: &CharacterMap,
    config: &PipelineConfig,
) -> Result<()> {
    let entries = read_dialogue(source, config.strict_dialogue_keys)?;
    write_json(dest, &map_entries(&entries, characters))
}
