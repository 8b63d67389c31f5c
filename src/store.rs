//! Store Module
//!
//! CRUD and listing over collection files.
//!
//! ## Responsibilities
//! - Resolve database/collection names to paths under the format root
//! - Apply merge semantics on `set`
//! - Enumerate databases and collections
//! - Expose destructive primitives (callers confirm first)
//!
//! ## Concurrency
//! Every mutation is load whole file → change in memory → write whole file.
//! There is no locking: two processes writing the same collection race and
//! the last writer wins. A file lock or a version field in the collection
//! would be the place to add multi-writer safety.

use std::fs;
use std::io::{self, BufRead};
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::config::Config;
use crate::discovery;
use crate::driver::Driver;
use crate::error::{NoboxError, Result};
use crate::import::{self, ImportFormat, ImportReport};
use crate::record::{merge_into, Collection, Entry, Record};

/// Record store for one storage format
///
/// Databases live at `{data_root}/{driver.format_subdir()}/{database}/` and
/// collections at `{database}/{collection}.{driver.extension()}`.
pub struct Store<D: Driver> {
    /// Store configuration
    config: Config,

    /// Serializer for collection files
    driver: D,

    /// `{data_root}/{format_subdir}`
    format_root: PathBuf,
}

impl<D: Driver> Store<D> {
    /// Create a store over the configured data root
    ///
    /// Nothing is created on disk until the first write.
    pub fn new(config: Config, driver: D) -> Self {
        let format_root = config.data_root.join(driver.format_subdir());
        Self {
            config,
            driver,
            format_root,
        }
    }

    /// Create a store rooted at `path` (convenience method)
    pub fn open_path(path: &Path, driver: D) -> Self {
        let config = Config::builder().data_root(path).build();
        Self::new(config, driver)
    }

    // =========================================================================
    // Record Operations
    // =========================================================================

    /// Get the entry stored under `key`
    ///
    /// Returns `Ok(None)` when the key, the collection or the database does
    /// not exist.
    pub fn get(&self, database: &str, collection: &str, key: &str) -> Result<Option<Entry>> {
        let mut data = self.load(database, collection)?;
        Ok(data.remove(key))
    }

    /// Create or update a record
    ///
    /// An existing record is merged with `fields` (new fields added, existing
    /// fields overwritten, the rest kept). A missing key, or one holding a
    /// bare scalar, is replaced by `fields`.
    pub fn set(&self, database: &str, collection: &str, key: &str, fields: Record) -> Result<()> {
        let path = self.collection_path(database, collection)?;
        let mut data = self.driver.load(&path)?;

        apply_set(&mut data, key.to_string(), fields);

        self.driver.save(&path, &data)?;
        debug!(database, collection, key, "set record");
        Ok(())
    }

    /// Apply several `set`s in order with a single load and save
    ///
    /// Returns how many records were applied.
    pub fn set_many<I>(&self, database: &str, collection: &str, records: I) -> Result<usize>
    where
        I: IntoIterator<Item = (String, Record)>,
    {
        let path = self.collection_path(database, collection)?;
        let mut data = self.driver.load(&path)?;

        let mut applied = 0;
        for (key, fields) in records {
            apply_set(&mut data, key, fields);
            applied += 1;
        }

        if applied > 0 {
            self.driver.save(&path, &data)?;
        }
        debug!(database, collection, applied, "set records");
        Ok(applied)
    }

    /// Delete a record
    ///
    /// Returns `true` if the key existed. The file is only rewritten when
    /// something was removed.
    pub fn delete(&self, database: &str, collection: &str, key: &str) -> Result<bool> {
        let path = self.collection_path(database, collection)?;
        let mut data = self.driver.load(&path)?;

        if data.remove(key).is_none() {
            return Ok(false);
        }

        self.driver.save(&path, &data)?;
        debug!(database, collection, key, "deleted record");
        Ok(true)
    }

    /// All keys of a collection, in storage (sorted) order
    pub fn keys(&self, database: &str, collection: &str) -> Result<Vec<String>> {
        Ok(self.load(database, collection)?.into_keys().collect())
    }

    /// The whole collection
    pub fn all(&self, database: &str, collection: &str) -> Result<Collection> {
        self.load(database, collection)
    }

    /// Whether `key` exists in the collection
    pub fn exists(&self, database: &str, collection: &str, key: &str) -> Result<bool> {
        Ok(self.load(database, collection)?.contains_key(key))
    }

    /// Number of entries in the collection
    pub fn count(&self, database: &str, collection: &str) -> Result<usize> {
        Ok(self.load(database, collection)?.len())
    }

    /// Parse `reader` and merge every valid record into the collection
    ///
    /// Malformed lines are collected in the report; only an unreadable
    /// stream or a store failure is an error.
    pub fn import<R: BufRead>(
        &self,
        database: &str,
        collection: &str,
        reader: R,
        format: ImportFormat,
    ) -> Result<ImportReport> {
        let (records, errors) = import::read_input(reader, format)?;
        let imported = self.set_many(database, collection, records)?;

        info!(
            database,
            collection,
            imported,
            skipped = errors.len(),
            "import finished"
        );
        Ok(ImportReport { imported, errors })
    }

    // =========================================================================
    // Discovery
    // =========================================================================

    /// All databases of this format, sorted
    pub fn list_databases(&self) -> Result<Vec<String>> {
        discovery::list_subdirs(&self.format_root)
    }

    /// All collections of a database, sorted, without extension
    pub fn list_collections(&self, database: &str) -> Result<Vec<String>> {
        let dir = self.database_dir(database)?;
        discovery::list_files_with_extension(&dir, self.driver.extension())
    }

    /// Whether the database directory exists
    pub fn database_exists(&self, database: &str) -> Result<bool> {
        Ok(self.database_dir(database)?.is_dir())
    }

    /// Whether the collection file exists
    pub fn collection_exists(&self, database: &str, collection: &str) -> Result<bool> {
        Ok(self.collection_path(database, collection)?.is_file())
    }

    // =========================================================================
    // Destructive Operations (no confirmation here)
    // =========================================================================

    /// Remove a collection file. Returns `false` if it did not exist.
    pub fn delete_collection(&self, database: &str, collection: &str) -> Result<bool> {
        let path = self.collection_path(database, collection)?;

        match fs::remove_file(&path) {
            Ok(()) => {
                info!(database, collection, "deleted collection");
                Ok(true)
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(NoboxError::storage(&path, e)),
        }
    }

    /// Remove a database directory and everything in it. Returns `false` if
    /// it did not exist.
    pub fn delete_database(&self, database: &str) -> Result<bool> {
        let dir = self.database_dir(database)?;

        if !dir.is_dir() {
            return Ok(false);
        }

        fs::remove_dir_all(&dir).map_err(|e| NoboxError::storage(&dir, e))?;
        info!(database, "deleted database");
        Ok(true)
    }

    // =========================================================================
    // Paths & Accessors
    // =========================================================================

    /// Directory of a database
    pub fn database_dir(&self, database: &str) -> Result<PathBuf> {
        Ok(self.format_root.join(validate_name(database)?))
    }

    /// File of a collection
    pub fn collection_path(&self, database: &str, collection: &str) -> Result<PathBuf> {
        let file_name = format!("{}.{}", validate_name(collection)?, self.driver.extension());
        Ok(self.database_dir(database)?.join(file_name))
    }

    /// `{data_root}/{format_subdir}`
    pub fn format_root(&self) -> &Path {
        &self.format_root
    }

    /// The format driver
    pub fn driver(&self) -> &D {
        &self.driver
    }

    /// Get the configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    fn load(&self, database: &str, collection: &str) -> Result<Collection> {
        let path = self.collection_path(database, collection)?;
        self.driver.load(&path)
    }
}

/// Merge into an existing record, otherwise replace
fn apply_set(data: &mut Collection, key: String, fields: Record) {
    match data.get_mut(&key) {
        Some(Entry::Record(existing)) => merge_into(existing, fields),
        _ => {
            data.insert(key, Entry::Record(fields));
        }
    }
}

/// Reject names that could escape the format root
fn validate_name(name: &str) -> Result<&str> {
    let invalid = name.is_empty()
        || name == "."
        || name == ".."
        || name.contains(['/', '\\', '\0']);

    if invalid {
        return Err(NoboxError::InvalidName(name.to_string()));
    }
    Ok(name)
}
