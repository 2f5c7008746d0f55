//! Utility functions

pub mod json;
pub mod path;

pub use json::{read_json, write_json};
pub use path::normalize_path;
