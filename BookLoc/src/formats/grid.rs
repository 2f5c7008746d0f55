//! Grid model
//!
//! A grid is a named table: row 0 holds column names, the remaining rows hold
//! cells aligned to those names by position. Rows may be shorter than the
//! header; missing trailing cells read as empty.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Separator between a grid's namespace and its id
pub const GRID_ID_SEPARATOR: char = ':';

/// One row of cells
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Row {
    #[serde(default)]
    pub strings: Vec<String>,
}

impl Row {
    pub fn new<I, S>(cells: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            strings: cells.into_iter().map(Into::into).collect(),
        }
    }

    /// Cell at `index`, or `""` when the row is too short
    #[must_use]
    pub fn cell(&self, index: usize) -> &str {
        self.strings.get(index).map_or("", String::as_str)
    }

    /// Whether the row has a cell at every given index
    #[must_use]
    pub fn reaches(&self, indices: &[usize]) -> bool {
        indices.iter().all(|&i| i < self.strings.len())
    }

    /// Overwrite the cell at `index`; returns false when the row is too short
    pub fn set_cell(&mut self, index: usize, value: impl Into<String>) -> bool {
        match self.strings.get_mut(index) {
            Some(cell) => {
                *cell = value.into();
                true
            }
            None => false,
        }
    }
}

/// A named table with a header row
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Grid {
    pub name: String,
    #[serde(default)]
    pub rows: Vec<Row>,
}

impl Grid {
    pub fn new(name: impl Into<String>, rows: Vec<Row>) -> Self {
        Self {
            name: name.into(),
            rows,
        }
    }

    /// Id used to correlate this grid with its dialogue file.
    ///
    /// The part of the name after the last `:`, or the whole name.
    #[must_use]
    pub fn grid_id(&self) -> &str {
        self.name
            .rsplit(GRID_ID_SEPARATOR)
            .next()
            .unwrap_or(&self.name)
    }

    /// Column names, if the grid has any rows
    #[must_use]
    pub fn header(&self) -> Option<&[String]> {
        self.rows.first().map(|row| row.strings.as_slice())
    }

    /// Zero-based index of the column named `column`
    pub fn column_index(&self, column: &str) -> Result<usize> {
        self.header()
            .and_then(|header| header.iter().position(|name| name == column))
            .ok_or_else(|| Error::ColumnNotFound {
                grid: self.name.clone(),
                column: column.to_string(),
            })
    }

    /// Rows after the header
    #[must_use]
    pub fn data_rows(&self) -> &[Row] {
        self.rows.get(1..).unwrap_or_default()
    }

    pub fn data_rows_mut(&mut self) -> &mut [Row] {
        self.rows.get_mut(1..).unwrap_or_default()
    }

    /// Bare cell arrays, header included
    #[must_use]
    pub fn to_string_rows(&self) -> Vec<Vec<String>> {
        self.rows.iter().map(|row| row.strings.clone()).collect()
    }
}
