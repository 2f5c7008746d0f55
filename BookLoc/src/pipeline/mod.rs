//! The three localization stages
//!
//! - [`extract`]: originals -> for-translation tree, character map, name registry
//! - [`map`]: for-translation tree -> ready tree with display names
//! - [`package`]: originals + translated tree -> plugin data tree
//!
//! Stages only communicate through the files described by
//! [`WorkspaceLayout`](crate::config::WorkspaceLayout).

pub mod extract;
pub mod map;
pub mod package;
pub mod types;

pub use extract::{ExtractOptions, ExtractResult, extract, extract_grid};
pub use map::{MapOptions, MapResult, map};
pub use package::{PackageOptions, PackageResult, PackageWarning, apply_translations, package};
pub use types::{
    ItemFailure, StagePhase, StageProgress, StageProgressCallback, TranslatedTree, TranslationGate,
    no_progress,
};
