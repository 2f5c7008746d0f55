//! Per-grid dialogue files
//!
//! A JSON array of `{ "name": speaker, "message": text }` in row order. This is
//! what extraction writes, mapping rewrites and translators hand back.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// One line of dialogue
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DialogueEntry {
    pub name: String,
    pub message: String,
}

impl DialogueEntry {
    pub fn new(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            message: message.into(),
        }
    }
}

/// Entry shape accepted when missing keys are tolerated
#[derive(Deserialize)]
struct LenientEntry {
    #[serde(default)]
    name: String,
    #[serde(default)]
    message: String,
}

/// Parse a dialogue list.
///
/// With `strict`, an entry lacking `name` or `message` fails the whole list;
/// otherwise missing keys read as empty strings.
pub fn parse_dialogue(text: &str, strict: bool) -> serde_json::Result<Vec<DialogueEntry>> {
    if strict {
        serde_json::from_str(text)
    } else {
        let entries: Vec<LenientEntry> = serde_json::from_str(text)?;
        Ok(entries
            .into_iter()
            .map(|e| DialogueEntry::new(e.name, e.message))
            .collect())
    }
}

/// Read and parse a dialogue file
pub fn read_dialogue(path: &Path, strict: bool) -> Result<Vec<DialogueEntry>> {
    let text = std::fs::read_to_string(path)?;
    parse_dialogue(&text, strict).map_err(|e| Error::malformed(path, e))
}
