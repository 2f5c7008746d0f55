//! On-disk formats: grids, book/master/plugin documents and dialogue files

pub mod dialogue;
pub mod document;
pub mod grid;

pub use dialogue::{DialogueEntry, parse_dialogue, read_dialogue};
pub use document::{BookDocument, MasterDocument, PluginDocument};
pub use grid::{Grid, Row};
