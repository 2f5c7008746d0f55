//! Packaging stage
//!
//! Writes translated dialogue back into clones of the original book
//! documents and serializes them in the flat grid name -> rows shape the game
//! plugin loads. The output tree is rebuilt from scratch on every run.
//!
//! Translated entries are matched to rows by position: the n-th entry of a
//! grid's translated file replaces the text of the n-th row whose original
//! text is non-empty.

use std::fmt;
use std::path::{Path, PathBuf};

use crate::config::{PipelineConfig, WorkspaceLayout};
use crate::error::{Error, Result};
use crate::formats::{BookDocument, DialogueEntry, Grid, Row, read_dialogue};
use crate::utils::json::write_json;
use crate::utils::path::{
    find_files_with_suffix, normalize_path, relative_to, rewrite_output_path, strip_final_extension,
};

use super::types::{ItemFailure, StagePhase, StageProgress, StageProgressCallback};

/// Options for the packaging stage
#[derive(Debug, Clone)]
pub struct PackageOptions {
    /// Root of the original asset tree, used as the structural template
    pub source: PathBuf,
}

impl PackageOptions {
    pub fn new(source: impl Into<PathBuf>) -> Self {
        Self {
            source: source.into(),
        }
    }
}

/// Count mismatch between a grid's translatable rows and its translated entries
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PackageWarning {
    /// Fewer entries than rows; the remaining rows keep their original text
    TranslationShortfall {
        document: PathBuf,
        grid: String,
        expected: usize,
        available: usize,
    },
    /// More entries than rows; the file is likely misaligned with the grid
    TranslationSurplus {
        document: PathBuf,
        grid: String,
        expected: usize,
        available: usize,
    },
}

impl fmt::Display for PackageWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TranslationShortfall {
                document,
                grid,
                expected,
                available,
            } => write!(
                f,
                "{} '{}': {available} translated entries for {expected} rows, remaining rows left untranslated",
                normalize_path(document),
                grid
            ),
            Self::TranslationSurplus {
                document,
                grid,
                expected,
                available,
            } => write!(
                f,
                "{} '{}': {available} translated entries for {expected} rows, extra entries ignored",
                normalize_path(document),
                grid
            ),
        }
    }
}

/// Summary of a packaging run
#[derive(Debug, Clone, Default)]
pub struct PackageResult {
    /// Book documents found under the source root
    pub books_scanned: usize,
    /// Plugin documents written
    pub packaged: usize,
    /// Books without a translated directory, or with nothing applied
    pub untranslated: usize,
    /// Books or translated grid files that could not be read
    pub failed: usize,
    /// Rows whose text was replaced
    pub rows_translated: usize,
    /// Grids without rows or lacking the speaker or text column
    pub grids_skipped: usize,
    /// Grids with no translated file
    pub grids_untranslated: usize,
    pub warnings: Vec<PackageWarning>,
    pub failures: Vec<ItemFailure>,
}

/// Outcome of applying one translated file to one grid
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridApplication {
    /// Rows with non-empty original text
    pub translatable: usize,
    /// Entries in the translated file
    pub available: usize,
    /// Rows actually overwritten
    pub applied: usize,
}

impl GridApplication {
    #[must_use]
    pub fn is_shortfall(&self) -> bool {
        self.available < self.translatable
    }

    #[must_use]
    pub fn is_surplus(&self) -> bool {
        self.available > self.translatable
    }
}

/// Overwrite the text column of `grid` with `entries`, in order.
///
/// A row takes an entry when its original text is non-empty and it reaches
/// the speaker column, the same rows extraction turns into entries. When the entries run out, the remaining rows keep their
/// original text.
pub fn apply_translations(
    grid: &mut Grid,
    text_col: usize,
    speaker_col: usize,
    entries: &[DialogueEntry],
) -> GridApplication {
    let takes_entry =
        |row: &Row| row.reaches(&[speaker_col, text_col]) && !row.cell(text_col).is_empty();

    let translatable = grid.data_rows().iter().filter(|row| takes_entry(row)).count();

    let mut cursor = 0;
    for row in grid.data_rows_mut() {
        if !takes_entry(row) {
            continue;
        }
        let Some(entry) = entries.get(cursor) else {
            break;
        };
        row.set_cell(text_col, entry.message.as_str());
        cursor += 1;
    }

    GridApplication {
        translatable,
        available: entries.len(),
        applied: cursor,
    }
}

/// A packaged book and what happened while building it
#[derive(Debug, Clone, Default)]
pub struct BookPackage {
    /// The translated clone, if any row changed
    pub document: Option<BookDocument>,
    pub rows_translated: usize,
    /// Grids without rows or lacking the speaker or text column
    pub grids_skipped: usize,
    /// Grids with no translated file
    pub grids_untranslated: usize,
    pub warnings: Vec<PackageWarning>,
    pub failures: Vec<ItemFailure>,
}

/// Apply the translated grid files in `translated_dir` to a clone of `original`.
///
/// `label` names the document in warnings. The original is never modified.
pub fn package_book(
    original: &BookDocument,
    translated_dir: &Path,
    label: &Path,
    config: &PipelineConfig,
) -> BookPackage {
    let mut document = original.clone();
    let mut package = BookPackage::default();

    for grid in &mut document.import_grid_list {
        if grid.rows.is_empty() {
            package.grids_skipped += 1;
            continue;
        }
        let columns = grid
            .column_index(&config.speaker_column)
            .and_then(|speaker_col| {
                grid.column_index(&config.text_column)
                    .map(|text_col| (speaker_col, text_col))
            });
        let (speaker_col, text_col) = match columns {
            Ok(columns) => columns,
            Err(e) => {
                tracing::debug!("{}: {e}", normalize_path(label));
                package.grids_skipped += 1;
                continue;
            }
        };
        let translated_file = translated_dir.join(format!("{}.json", grid.grid_id()));
        if !translated_file.is_file() {
            package.grids_untranslated += 1;
            continue;
        }

        let entries = match read_dialogue(&translated_file, config.strict_dialogue_keys) {
            Ok(entries) => entries,
            Err(e) => {
                tracing::warn!("Skipping {}: {e}", translated_file.display());
                package.failures.push(ItemFailure::new(&translated_file, e.to_string()));
                continue;
            }
        };

        let applied = apply_translations(grid, text_col, speaker_col, &entries);
        package.rows_translated += applied.applied;

        let warning = if applied.is_shortfall() {
            Some(PackageWarning::TranslationShortfall {
                document: label.to_path_buf(),
                grid: grid.name.clone(),
                expected: applied.translatable,
                available: applied.available,
            })
        } else if applied.is_surplus() {
            Some(PackageWarning::TranslationSurplus {
                document: label.to_path_buf(),
                grid: grid.name.clone(),
                expected: applied.translatable,
                available: applied.available,
            })
        } else {
            None
        };
        if let Some(warning) = warning {
            tracing::warn!("{warning}");
            package.warnings.push(warning);
        }
    }

    if package.rows_translated > 0 {
        package.document = Some(document);
    }
    package
}

/// Run the packaging stage.
///
/// # Errors
/// Fails when the source root or translated tree is missing, or on IO errors
/// rebuilding the output tree. Unreadable books and translated files are
/// skipped and counted.
pub fn package(
    options: &PackageOptions,
    config: &PipelineConfig,
    layout: &WorkspaceLayout,
    progress: StageProgressCallback,
) -> Result<PackageResult> {
    let translated_root = layout.translated_dir();
    for required in [&options.source, &translated_root] {
        if !required.is_dir() {
            return Err(Error::NotFound {
                path: required.clone(),
            });
        }
    }

    let output_dir = layout.plugin_data_dir();
    if output_dir.exists() {
        std::fs::remove_dir_all(&output_dir)?;
    }
    std::fs::create_dir_all(&output_dir)?;

    let books = find_files_with_suffix(&options.source, &config.book_suffix)?;
    let total = books.len();
    let mut result = PackageResult {
        books_scanned: total,
        ..PackageResult::default()
    };

    for (i, book_path) in books.iter().enumerate() {
        let relative = relative_to(book_path, &options.source)?;
        progress(&StageProgress::with_file(
            StagePhase::PackagingBooks,
            i + 1,
            total,
            normalize_path(&relative),
        ));

        let translated_dir = translated_root.join(strip_final_extension(&relative));
        if !translated_dir.is_dir() {
            result.untranslated += 1;
            continue;
        }

        let original = match BookDocument::load(book_path) {
            Ok(original) => original,
            Err(e) => {
                tracing::warn!("Skipping {}: {e}", book_path.display());
                result.failed += 1;
                result.failures.push(ItemFailure::new(book_path, e.to_string()));
                continue;
            }
        };

        let package = package_book(&original, &translated_dir, &relative, config);
        result.rows_translated += package.rows_translated;
        result.grids_skipped += package.grids_skipped;
        result.grids_untranslated += package.grids_untranslated;
        result.failed += package.failures.len();
        result.failures.extend(package.failures);
        result.warnings.extend(package.warnings);

        let Some(document) = package.document else {
            result.untranslated += 1;
            continue;
        };

        let output_path = output_dir.join(rewrite_output_path(
            &relative,
            &config.source_only_folder,
            &config.book_suffix,
            &config.chapter_suffix,
        ));
        write_json(&output_path, &document.to_plugin())?;
        result.packaged += 1;
    }

    progress(&StageProgress::new(StagePhase::Complete, total, total));
    tracing::info!(
        "Packaging complete: {} packaged, {} rows translated, {} warnings",
        result.packaged,
        result.rows_translated,
        result.warnings.len()
    );

    Ok(result)
}
