//! YAML Driver
//!
//! Collections as block-style YAML mappings.

use std::path::Path;

use crate::error::{NoboxError, Result};
use crate::record::Collection;

use super::Driver;

/// Stores collections as `{database}/{collection}.yaml` under `yaml/`
#[derive(Debug, Clone, Copy, Default)]
pub struct YamlDriver;

impl Driver for YamlDriver {
    fn name(&self) -> &'static str {
        "YAML"
    }

    fn extension(&self) -> &'static str {
        "yaml"
    }

    fn format_subdir(&self) -> &'static str {
        "yaml"
    }

    fn decode(&self, path: &Path, contents: &str) -> Result<Collection> {
        // An empty document and an explicit `null` both mean "no records"
        if contents.trim().is_empty() {
            return Ok(Collection::new());
        }

        let parsed: Option<Collection> =
            serde_yaml::from_str(contents).map_err(|e| NoboxError::format(path, e))?;
        Ok(parsed.unwrap_or_default())
    }

    fn encode(&self, path: &Path, collection: &Collection) -> Result<String> {
        serde_yaml::to_string(collection).map_err(|e| NoboxError::format(path, e))
    }
}
