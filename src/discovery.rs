//! Discovery
//!
//! Filesystem enumeration of databases and collections. Output is always
//! sorted so listings and tests are deterministic.

use std::ffi::OsStr;
use std::fs;
use std::io;
use std::path::Path;

use tracing::debug;

use crate::error::{NoboxError, Result};

/// Names of the first-level subdirectories of `dir`
///
/// A missing `dir` yields an empty list.
pub fn list_subdirs(dir: &Path) -> Result<Vec<String>> {
    let mut names = Vec::new();

    let Some(entries) = read_dir_if_exists(dir)? else {
        return Ok(names);
    };

    for entry in entries {
        let entry = entry.map_err(|e| NoboxError::storage(dir, e))?;
        let path = entry.path();

        if path.is_dir() {
            if let Some(name) = path.file_name().and_then(OsStr::to_str) {
                names.push(name.to_string());
            }
        }
    }

    names.sort();
    debug!(dir = %dir.display(), count = names.len(), "listed directories");
    Ok(names)
}

/// Stems of the files in `dir` whose extension is `extension`
///
/// "contacts.json" -> "contacts". A missing `dir` yields an empty list.
pub fn list_files_with_extension(dir: &Path, extension: &str) -> Result<Vec<String>> {
    let mut names = Vec::new();

    let Some(entries) = read_dir_if_exists(dir)? else {
        return Ok(names);
    };

    for entry in entries {
        let entry = entry.map_err(|e| NoboxError::storage(dir, e))?;
        let path = entry.path();

        if !path.is_file() || path.extension().and_then(OsStr::to_str) != Some(extension) {
            continue;
        }

        if let Some(stem) = path.file_stem().and_then(OsStr::to_str) {
            names.push(stem.to_string());
        }
    }

    names.sort();
    debug!(dir = %dir.display(), extension, count = names.len(), "listed files");
    Ok(names)
}

fn read_dir_if_exists(dir: &Path) -> Result<Option<fs::ReadDir>> {
    match fs::read_dir(dir) {
        Ok(entries) => Ok(Some(entries)),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(NoboxError::storage(dir, e)),
    }
}
