//! # BookLoc
//!
//! Localization workflow for grid-based game script documents.
//!
//! Dialogue lives in *book* documents (`*.book.json`), each a list of grids
//! whose first row names the columns. Speakers are referenced by id and
//! resolved through the character table of the *master* document. The
//! workflow runs in stages that talk to each other only through files:
//!
//! 1. **extract** - write one dialogue list per grid for translation, persist the
//!    character map and grow the append-only name registry
//! 2. **map** - swap speaker ids for display names in those lists
//! 3. *(translate outside the tool into `out/3_Translated`)*
//! 4. **package** - write the translations back into the original document
//!    shape for the game plugin
//!
//! ## Quick Start
//!
//! ```no_run
//! use bookloc::prelude::*;
//!
//! let config = PipelineConfig::default();
//! let layout = WorkspaceLayout::default();
//! let gate = TranslatedTree::new(layout.translated_dir());
//!
//! let result = extract(&ExtractOptions::new("unpacked/"), &config, &layout, &gate, &no_progress)?;
//! println!("{} dialogue files written", result.extracted);
//!
//! let result = package(&PackageOptions::new("unpacked/"), &config, &layout, &no_progress)?;
//! println!("{} documents packaged", result.packaged);
//! # Ok::<(), bookloc::Error>(())
//! ```
//!
//! ## Feature Flags
//!
//! - `cli` - Enables the `bookloc` command-line binary

pub mod characters;
pub mod config;
pub mod error;
pub mod formats;
pub mod pipeline;
pub mod registry;
pub mod utils;

// Re-exports for convenience
pub use error::{Error, Result};

/// Prelude module for common imports
pub mod prelude {
    pub use crate::characters::CharacterMap;
    pub use crate::config::{ConfigFile, PipelineConfig, WorkspaceLayout};
    pub use crate::error::{Error, Result};
    pub use crate::formats::{BookDocument, DialogueEntry, Grid, MasterDocument, PluginDocument, Row};
    pub use crate::registry::{ExclusionSet, NameRegistry};

    pub use crate::pipeline::{
        ExtractOptions, ExtractResult, MapOptions, MapResult, PackageOptions, PackageResult,
        PackageWarning, StageProgress, TranslatedTree, TranslationGate, extract, map, no_progress,
        package,
    };
}

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// CLI module (feature-gated)
#[cfg(feature = "cli")]
pub mod cli;
