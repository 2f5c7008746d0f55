//! Error types for `BookLoc`

use std::path::PathBuf;

use thiserror::Error;

/// The error type for `BookLoc` operations.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum Error {
    // ==================== IO Errors ====================
    /// IO error from file operations.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Directory traversal error.
    #[error("directory walk error: {0}")]
    WalkDir(String),

    // ==================== Prerequisite Errors ====================
    /// A required input root or singleton file does not exist.
    #[error("not found: {path}")]
    NotFound {
        /// The missing path.
        path: PathBuf,
    },

    /// An artifact produced by an earlier stage is missing.
    #[error("missing prerequisite {path}: {hint}")]
    MissingPrerequisite {
        /// The missing artifact.
        path: PathBuf,
        /// What to run to produce it.
        hint: String,
    },

    // ==================== Document Errors ====================
    /// A document exists but could not be parsed into the expected shape.
    #[error("malformed document {path}: {message}")]
    MalformedDocument {
        /// The offending document.
        path: PathBuf,
        /// Parser message.
        message: String,
    },

    /// A grid header lacks a column the stage needs.
    #[error("column '{column}' not found in grid '{grid}'")]
    ColumnNotFound {
        /// Full grid name.
        grid: String,
        /// The column that was looked up.
        column: String,
    },

    // ==================== Parsing Errors ====================
    /// JSON parsing or serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML configuration could not be parsed.
    #[error("config error: {0}")]
    Toml(#[from] toml::de::Error),

    // ==================== File System Errors ====================
    /// Invalid file path.
    #[error("invalid path: {0}")]
    InvalidPath(String),
}

impl Error {
    /// Build a [`Error::MalformedDocument`] from any displayable parser error.
    pub fn malformed(path: impl Into<PathBuf>, err: impl std::fmt::Display) -> Self {
        Error::MalformedDocument {
            path: path.into(),
            message: err.to_string(),
        }
    }
}

// Add conversion from walkdir::Error
impl From<walkdir::Error> for Error {
    fn from(err: walkdir::Error) -> Self {
        Error::WalkDir(err.to_string())
    }
}

/// A specialized Result type for `BookLoc` operations.
pub type Result<T> = std::result::Result<T, Error>;
