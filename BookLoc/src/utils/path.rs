//! Path utilities

use std::path::{Component, Path, PathBuf};

use walkdir::WalkDir;

use crate::error::{Error, Result};

/// Normalize path separators to forward slashes (for log and report output)
pub fn normalize_path<P: AsRef<Path>>(path: P) -> String {
    path.as_ref().to_string_lossy().replace('\\', "/")
}

/// `path` relative to `base`
pub fn relative_to(path: &Path, base: &Path) -> Result<PathBuf> {
    path.strip_prefix(base)
        .map(Path::to_path_buf)
        .map_err(|_| {
            Error::InvalidPath(format!(
                "{} is not under {}",
                path.display(),
                base.display()
            ))
        })
}

/// Drop the final extension only: `a/Scene1.book.json` -> `a/Scene1.book`
#[must_use]
pub fn strip_final_extension(path: &Path) -> PathBuf {
    path.with_extension("")
}

/// Find all files under `dir` whose name ends with `suffix`, sorted
pub fn find_files_with_suffix(dir: &Path, suffix: &str) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in WalkDir::new(dir).follow_links(true) {
        let entry = entry?;
        if entry.file_type().is_file()
            && entry
                .file_name()
                .to_str()
                .is_some_and(|name| name.ends_with(suffix))
        {
            files.push(entry.into_path());
        }
    }
    files.sort();
    Ok(files)
}

/// Remove every component equal to `folder` and swap a trailing filename
/// suffix: `X/CharaScenario/S.book.json` -> `X/S.chapter.json`
#[must_use]
pub fn rewrite_output_path(relative: &Path, folder: &str, from_suffix: &str, to_suffix: &str) -> PathBuf {
    let mut out: PathBuf = relative
        .components()
        .filter(|c| !matches!(c, Component::Normal(name) if *name == folder))
        .collect();

    let renamed = out
        .file_name()
        .and_then(|n| n.to_str())
        .and_then(|name| name.strip_suffix(from_suffix))
        .map(|stem| format!("{stem}{to_suffix}"));
    if let Some(renamed) = renamed {
        out.set_file_name(renamed);
    }
    out
}
