//! Loading table configuration from files.

use std::fs;

use gridview::{ColumnSpec, SelectionMode, Table, TableConfig, TableError};
use serde_json::json;
use tempfile::TempDir;

#[test]
fn loads_yaml_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("grid.yml");
    fs::write(
        &path,
        "pageSize: 25\nenableVirtualScroll: true\nselectionMode: single\n",
    )
    .unwrap();

    let config = TableConfig::from_file(&path).unwrap();
    assert_eq!(config.page_size, 25);
    assert!(config.enable_virtual_scroll);
    assert_eq!(config.selection_mode, SelectionMode::Single);
    assert!(config.enable_filtering);
}

#[test]
fn loads_json_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("grid.JSON");
    fs::write(&path, r#"{"enablePagination": false, "tableHeight": 320}"#).unwrap();

    let config = TableConfig::from_file(&path).unwrap();
    assert!(!config.enable_pagination);
    assert_eq!(config.table_height, 320.0);
}

#[test]
fn rejects_unknown_extension() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("grid.toml");
    fs::write(&path, "pageSize = 5").unwrap();

    assert!(matches!(
        TableConfig::from_file(&path),
        Err(TableError::UnsupportedFormat(p)) if p == path
    ));
}

#[test]
fn missing_file_reports_path() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("absent.yaml");
    let err = TableConfig::from_file(&path).unwrap_err();
    assert!(matches!(err, TableError::Io { .. }));
    assert!(err.to_string().contains("absent.yaml"));
}

#[test]
fn loaded_config_drives_table() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("grid.yaml");
    fs::write(&path, "pageSize: 5\nenableRowSelection: false\n").unwrap();

    let config = TableConfig::from_file(&path).unwrap();
    let rows: Vec<_> = (1..=12).map(|id| json!({"id": id})).collect();
    let mut table = Table::new(vec![ColumnSpec::new("id")], rows).with_config(config);

    assert_eq!(table.page_size(), 5);
    assert_eq!(table.total_pages(), 3);
    assert!(!table.toggle_row(1i64));
    assert!(table.layout().left.is_empty());
    assert!(table.drain_events().is_empty());
}
