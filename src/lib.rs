//! # NoBox
//!
//! Schema-less key-value storage in plain JSON or YAML files:
//! - Database → directory, collection → file, key → flat record
//! - `set` merges into existing records instead of replacing them
//! - Case-sensitive keys, stored verbatim
//! - Best-effort line import with integer/float/string coercion
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                 CLI (jsonbox / yamlbox)                      │
//! └──────────┬──────────────────────────────────┬───────────────┘
//!            │                                  │
//! ┌──────────▼──────────┐            ┌──────────▼──────────┐
//! │    Import Parser    │            │   Output Renderer   │
//! │ (key field:value)   │            │ (table/csv/json...) │
//! └──────────┬──────────┘            └──────────▲──────────┘
//!            │                                  │
//! ┌──────────▼──────────────────────────────────┴───────────────┐
//! │                        Store                                 │
//! │         (load → mutate → save whole collection)              │
//! └──────────┬──────────────────────────────────┬───────────────┘
//!            │                                  │
//!            ▼                                  ▼
//!   ┌─────────────────┐                ┌─────────────────┐
//!   │     Driver      │                │    Discovery    │
//!   │  (JSON / YAML)  │                │  (dirs, files)  │
//!   └─────────────────┘                └─────────────────┘
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod config;

pub mod record;
pub mod driver;
pub mod discovery;
pub mod import;
pub mod output;
pub mod store;
pub mod cli;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use error::{NoboxError, Result};
pub use config::Config;
pub use driver::{Driver, JsonDriver, YamlDriver};
pub use record::{Collection, Entry, FieldValue, Record};
pub use store::Store;

// =============================================================================
// Version Info
// =============================================================================

/// Current version of NoBox
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
