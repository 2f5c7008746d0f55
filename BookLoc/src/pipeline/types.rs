//! Types shared by the pipeline stages: the idempotency gate and progress reporting

use std::path::{Path, PathBuf};

/// Decides whether a dialogue file has already been translated.
///
/// `relative` is the dialogue file's path relative to the stage trees, e.g.
/// `Chapter1/Scene1.book/A.json`. Stages skip such files unless forced.
pub trait TranslationGate {
    fn already_translated(&self, relative: &Path) -> bool;
}

impl<F> TranslationGate for F
where
    F: Fn(&Path) -> bool,
{
    fn already_translated(&self, relative: &Path) -> bool {
        self(relative)
    }
}

/// Gate backed by the translated tree on disk
#[derive(Debug, Clone)]
pub struct TranslatedTree {
    root: PathBuf,
}

impl TranslatedTree {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl TranslationGate for TranslatedTree {
    fn already_translated(&self, relative: &Path) -> bool {
        self.root.join(relative).exists()
    }
}

/// Progress callback type for pipeline stages
pub type StageProgressCallback<'a> = &'a dyn Fn(&StageProgress);

/// Progress information during a stage
#[derive(Debug, Clone)]
pub struct StageProgress {
    /// Current stage phase
    pub phase: StagePhase,
    /// Current item number (1-indexed)
    pub current: usize,
    /// Total number of items
    pub total: usize,
    /// Current file being processed (if applicable)
    pub current_file: Option<String>,
}

impl StageProgress {
    /// Create a new progress update
    #[must_use]
    pub fn new(phase: StagePhase, current: usize, total: usize) -> Self {
        Self {
            phase,
            current,
            total,
            current_file: None,
        }
    }

    /// Create a progress update with a file name
    #[must_use]
    pub fn with_file(phase: StagePhase, current: usize, total: usize, file: impl Into<String>) -> Self {
        Self {
            phase,
            current,
            total,
            current_file: Some(file.into()),
        }
    }
}

/// Phase of a pipeline stage
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StagePhase {
    /// Reading the master document's character table
    ReadingCharacters,
    /// Pulling dialogue out of book documents
    ExtractingBooks,
    /// Growing the name registry
    UpdatingRegistry,
    /// Substituting display names into dialogue files
    MappingDialogue,
    /// Writing translations back into book documents
    PackagingBooks,
    /// Stage finished
    Complete,
}

impl StagePhase {
    /// Get a human-readable description of this phase
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::ReadingCharacters => "Reading characters",
            Self::ExtractingBooks => "Extracting dialogue",
            Self::UpdatingRegistry => "Updating name registry",
            Self::MappingDialogue => "Mapping speaker names",
            Self::PackagingBooks => "Packaging translations",
            Self::Complete => "Complete",
        }
    }
}

/// An item a stage gave up on, with the reason
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemFailure {
    pub path: PathBuf,
    pub message: String,
}

impl ItemFailure {
    pub fn new(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

/// Callback that ignores progress updates
pub fn no_progress(_: &StageProgress) {}
