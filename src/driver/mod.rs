//! Driver Module
//!
//! Per-format serialization of a collection file.
//!
//! ## Responsibilities
//! - Name the file extension and the storage subdirectory of a format
//! - Decode a collection file into a [`Collection`]
//! - Encode a [`Collection`] back to disk
//!
//! ## Layout
//! ```text
//! {data_root}/
//!   ├── json/                 JsonDriver::format_subdir()
//!   │   └── demo/
//!   │       └── contacts.json
//!   └── yaml/                 YamlDriver::format_subdir()
//!       └── demo/
//!           └── contacts.yaml
//! ```
//!
//! Each format owns its own subdirectory, so `jsonbox demo` and
//! `yamlbox demo` never see each other's files.

mod json;
mod yaml;

pub use json::JsonDriver;
pub use yaml::YamlDriver;

use std::ffi::OsString;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::{NoboxError, Result};
use crate::record::Collection;

/// A storage format for collection files
///
/// Implementors supply the codec; `load` and `save` handle the file
/// itself and are shared by every format.
pub trait Driver {
    /// Human-readable format name ("JSON", "YAML")
    fn name(&self) -> &'static str;

    /// File extension without the leading dot
    fn extension(&self) -> &'static str;

    /// Subdirectory of the data root holding this format's databases
    fn format_subdir(&self) -> &'static str;

    /// Parse file contents. `path` is only used in error messages.
    fn decode(&self, path: &Path, contents: &str) -> Result<Collection>;

    /// Render a collection as file contents
    fn encode(&self, path: &Path, collection: &Collection) -> Result<String>;

    /// Load a collection file, or an empty collection if it does not exist
    fn load(&self, path: &Path) -> Result<Collection> {
        let contents = match fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!(path = %path.display(), "collection file missing, treating as empty");
                return Ok(Collection::new());
            }
            Err(e) if e.kind() == io::ErrorKind::InvalidData => {
                return Err(NoboxError::format(path, "file is not valid UTF-8"));
            }
            Err(e) => return Err(NoboxError::storage(path, e)),
        };

        let collection = self.decode(path, &contents)?;
        debug!(path = %path.display(), entries = collection.len(), "loaded collection");
        Ok(collection)
    }

    /// Save a collection, creating parent directories as needed
    ///
    /// The document goes to a sibling temp file first and is renamed over
    /// the target, so readers never observe a half-written collection.
    fn save(&self, path: &Path, collection: &Collection) -> Result<()> {
        let contents = self.encode(path, collection)?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| NoboxError::storage(parent, e))?;
        }

        let tmp = temp_path(path);
        if let Err(e) = fs::write(&tmp, contents) {
            let _ = fs::remove_file(&tmp);
            return Err(NoboxError::storage(&tmp, e));
        }

        if let Err(e) = fs::rename(&tmp, path) {
            let _ = fs::remove_file(&tmp);
            return Err(NoboxError::storage(path, e));
        }

        debug!(path = %path.display(), entries = collection.len(), "saved collection");
        Ok(())
    }
}

/// "contacts.json" -> "contacts.json.tmp"
fn temp_path(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_else(|| OsString::from("collection"));
    name.push(".tmp");
    path.with_file_name(name)
}
