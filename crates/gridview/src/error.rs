//! Error types for table operations.

use std::path::PathBuf;

use thiserror::Error;

/// Errors surfaced by [`Table`](crate::Table) and [`TableConfig`](crate::TableConfig).
///
/// The view pipeline itself never fails. Bad filter values, unknown
/// operators, and out-of-range pages or scroll offsets all degrade to a safe
/// result instead.
#[derive(Debug, Error)]
pub enum TableError {
    /// The current view has no rows to export.
    #[error("nothing to export: the current view is empty")]
    EmptyExport,

    /// A computed column cannot be saved without a title.
    #[error("computed column title must not be blank")]
    BlankComputedTitle,

    /// The computed-column editor was used while closed.
    #[error("computed column editor is not open")]
    EditorClosed,

    /// No computed column has this key.
    #[error("unknown computed column '{0}'")]
    UnknownComputedColumn(String),

    /// Configuration file could not be read.
    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Configuration YAML did not parse.
    #[error("invalid YAML configuration: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// Configuration JSON did not parse.
    #[error("invalid JSON configuration: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration file extension is neither YAML nor JSON.
    #[error("unsupported configuration format: {}", .0.display())]
    UnsupportedFormat(PathBuf),
}

/// Result type for table operations.
pub type Result<T> = std::result::Result<T, TableError>;
