//! Table configuration.
//!
//! Every option has a default, so a config file only needs the options it
//! changes:
//!
//! ```yaml
//! enableVirtualScroll: true
//! virtualScrollItemHeight: 32
//! pageSizeOptions: [20, 50]
//! selectionMode: single
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Result, TableError};
use crate::selection::SelectionMode;

/// Feature switches and tuning for a [`Table`](crate::Table).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TableConfig {
    pub enable_multi_sort: bool,
    pub enable_filtering: bool,
    pub enable_pagination: bool,
    pub enable_row_selection: bool,
    pub enable_column_resize: bool,
    pub enable_column_reorder: bool,
    pub enable_virtual_scroll: bool,
    pub enable_frozen_columns: bool,
    /// Fixed row height used by the windowing math.
    pub virtual_scroll_item_height: f64,
    /// Extra rows rendered above and below the viewport.
    pub virtual_scroll_buffer_size: usize,
    pub page_size: usize,
    pub page_size_options: Vec<usize>,
    pub selection_mode: SelectionMode,
    pub show_selection_checkbox: bool,
    /// Field that identifies a row when no key function is registered.
    pub row_key_field: String,
    /// Viewport height used by the windowing math.
    pub table_height: f64,
}

impl Default for TableConfig {
    fn default() -> Self {
        TableConfig {
            enable_multi_sort: true,
            enable_filtering: true,
            enable_pagination: true,
            enable_row_selection: true,
            enable_column_resize: true,
            enable_column_reorder: true,
            enable_virtual_scroll: false,
            enable_frozen_columns: true,
            virtual_scroll_item_height: 48.0,
            virtual_scroll_buffer_size: 5,
            page_size: 10,
            page_size_options: vec![5, 10, 25, 50, 100],
            selection_mode: SelectionMode::Multiple,
            show_selection_checkbox: true,
            row_key_field: "id".to_string(),
            table_height: 600.0,
        }
    }
}

impl TableConfig {
    /// Parses a configuration from YAML.
    ///
    /// # Errors
    ///
    /// Returns [`TableError::Yaml`] if the YAML is malformed or an option has
    /// the wrong type.
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Parses a configuration from JSON.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Loads a configuration file, picking the parser by extension
    /// (`.yaml`, `.yml` or `.json`).
    ///
    /// ```rust,ignore
    /// let config = TableConfig::from_file("./grid.yaml")?;
    /// ```
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase);
        let parse: fn(&str) -> Result<Self> = match extension.as_deref() {
            Some("yaml") | Some("yml") => Self::from_yaml,
            Some("json") => Self::from_json,
            _ => return Err(TableError::UnsupportedFormat(path.to_path_buf())),
        };
        let content = std::fs::read_to_string(path).map_err(|source| TableError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        parse(&content)
    }

    /// Page size to use, never zero.
    pub(crate) fn effective_page_size(&self) -> usize {
        self.page_size.max(1)
    }
}
