// In: src/config.rs

//! The single source of truth for table construction settings.
//!
//! `TableConfig` is created once at the application boundary (in code, or from a
//! JSON document) and shared read-only through an `Arc<TableConfig>` by every table
//! built with it. Every field has a default, so a partial document is valid.

use serde::{Deserialize, Serialize};

use crate::error::LightTableError;

/// Settings applied while a table imports its columns.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub struct TableConfig {
    /// Discard an imported null bitmap that has no set bit.
    ///
    /// Turning this off keeps every imported bitmap; `has_nulls`, `nulls_count`
    /// and `is_null` answer identically either way.
    #[serde(default = "default_true")]
    pub collapse_empty_null_bitmaps: bool,

    /// Emit one `info` record per imported table with row, column and bitmap counts.
    #[serde(default)]
    pub log_import_summary: bool,
}

impl TableConfig {
    /// Parses a config from JSON, filling omitted fields with their defaults.
    pub fn from_json_str(json: &str) -> Result<Self, LightTableError> {
        Ok(serde_json::from_str(json)?)
    }
}

// Default implementation to make constructing the config easier.
impl Default for TableConfig {
    fn default() -> Self {
        Self {
            collapse_empty_null_bitmaps: default_true(),
            log_import_summary: false,
        }
    }
}

/// Helper for `serde` to default a boolean field to true.
fn default_true() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_document_uses_defaults() {
        let config = TableConfig::from_json_str("{}").unwrap();
        assert_eq!(config, TableConfig::default());
        assert!(config.collapse_empty_null_bitmaps);
        assert!(!config.log_import_summary);
    }

    #[test]
    fn test_partial_document() {
        let config =
            TableConfig::from_json_str(r#"{ "collapse_empty_null_bitmaps": false }"#).unwrap();
        assert!(!config.collapse_empty_null_bitmaps);
        assert!(!config.log_import_summary);
    }

    #[test]
    fn test_malformed_document_is_serde_error() {
        let result = TableConfig::from_json_str("{ not json");
        assert!(matches!(result, Err(LightTableError::SerdeJson(_))));
    }
}
