//! JSON Driver
//!
//! Collections as pretty-printed JSON objects.

use std::path::Path;

use crate::error::{NoboxError, Result};
use crate::record::Collection;

use super::Driver;

/// Stores collections as `{database}/{collection}.json` under `json/`
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonDriver;

impl Driver for JsonDriver {
    fn name(&self) -> &'static str {
        "JSON"
    }

    fn extension(&self) -> &'static str {
        "json"
    }

    fn format_subdir(&self) -> &'static str {
        "json"
    }

    fn decode(&self, path: &Path, contents: &str) -> Result<Collection> {
        serde_json::from_str(contents).map_err(|e| NoboxError::format(path, e))
    }

    fn encode(&self, path: &Path, collection: &Collection) -> Result<String> {
        let mut out = serde_json::to_string_pretty(collection)
            .map_err(|e| NoboxError::format(path, e))?;
        out.push('\n');
        Ok(out)
    }
}
