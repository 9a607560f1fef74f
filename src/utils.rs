//! Utility functions for output paths

use crate::config::FileCollisionAction;
use crate::error::{Error, Result};
use std::path::{Path, PathBuf};

/// Maximum number of rename attempts when resolving file collisions
const MAX_RENAME_ATTEMPTS: u32 = 9999;

/// Suffix of the temporary file an artifact is streamed into
const PARTIAL_SUFFIX: &str = ".part";

/// Get the path to write an artifact to, handling collisions according to the specified action
///
/// # Examples
///
/// ```
/// use doctask::utils::get_unique_path;
/// use doctask::config::FileCollisionAction;
/// use std::path::Path;
///
/// let path = Path::new("/tmp/report.txt");
/// let unique = get_unique_path(path, FileCollisionAction::Rename).unwrap();
/// // If /tmp/report.txt exists, returns /tmp/report (1).txt
/// // If that exists too, returns /tmp/report (2).txt, etc.
/// ```
pub fn get_unique_path(path: &Path, action: FileCollisionAction) -> Result<PathBuf> {
    match action {
        FileCollisionAction::Overwrite => Ok(path.to_path_buf()),
        FileCollisionAction::Rename => {
            if !path.exists() {
                return Ok(path.to_path_buf());
            }

            let stem = path.file_stem().and_then(|s| s.to_str()).ok_or_else(|| {
                Error::validation(format!(
                    "cannot extract file stem from '{}'",
                    path.display()
                ))
            })?;
            let extension = path.extension().and_then(|e| e.to_str());
            let parent = path.parent().unwrap_or_else(|| Path::new(""));

            for i in 1..=MAX_RENAME_ATTEMPTS {
                let new_name = match extension {
                    Some(ext) => format!("{} ({}).{}", stem, i, ext),
                    None => format!("{} ({})", stem, i),
                };
                let new_path = parent.join(new_name);
                if !new_path.exists() {
                    return Ok(new_path);
                }
            }

            Err(Error::validation(format!(
                "could not find a free file name for '{}' after {} attempts",
                path.display(),
                MAX_RENAME_ATTEMPTS
            )))
        }
    }
}

/// Create the directory an output file will be written to
///
/// Paths without a parent component (a bare file name) need nothing.
pub async fn ensure_parent_dir(path: &Path) -> Result<()> {
    let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) else {
        return Ok(());
    };
    tokio::fs::create_dir_all(parent).await.map_err(|e| {
        Error::validation(format!(
            "cannot create output directory '{}': {}",
            parent.display(),
            e
        ))
    })
}

/// Temporary path an artifact is streamed into before being renamed into place
pub fn partial_path(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(PARTIAL_SUFFIX);
    path.with_file_name(name)
}

/// Base name of a path as UTF-8, if it has one
pub fn file_name_str(path: &Path) -> Option<&str> {
    path.file_name().and_then(|n| n.to_str())
}
