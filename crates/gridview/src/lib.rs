//! gridview - Derived-view pipeline for interactive data tables.
//!
//! A [`Table`] owns rows, column declarations and the user's interaction
//! state (filters, sorts, page, scroll position, selection, column layout,
//! computed columns, colors) and derives what to render from them:
//!
//! ```text
//! rows -> filtered -> sorted -> paged -> windowed     => Table::view
//! columns + computed columns -> processed -> layout   => Table::layout
//! ```
//!
//! Each stage is memoized against the revisions of its inputs (see
//! [`graph`]), so reading the view after a page change does not filter or
//! sort again.
//!
//! # Quick Start
//!
//! ```rust
//! use gridview::{ColumnSpec, FilterEntry, FrozenPosition, Table, TableEvent};
//! use serde_json::json;
//!
//! let rows = vec![
//!     json!({"id": 1, "name": "Ada", "team": "core"}),
//!     json!({"id": 2, "name": "Linus", "team": "kernel"}),
//!     json!({"id": 3, "name": "Grace", "team": "core"}),
//! ];
//! let columns = vec![
//!     ColumnSpec::new("id").width(80).frozen(FrozenPosition::Left),
//!     ColumnSpec::new("name").title("Name"),
//!     ColumnSpec::new("team"),
//! ];
//! let mut table = Table::new(columns, rows);
//!
//! table.set_filter(FilterEntry::new("team", "core", "equals"));
//! table.click_header("name", false);
//!
//! let names: Vec<_> = table.view().rows().map(|r| r["name"].clone()).collect();
//! assert_eq!(names, vec![json!("Ada"), json!("Grace")]);
//!
//! let layout = table.layout();
//! assert_eq!(layout.left[0].left, Some(50));
//!
//! assert!(matches!(table.drain_events()[0], TableEvent::FilterChanged { .. }));
//! ```
//!
//! # Configuration
//!
//! [`TableConfig`] toggles features and tunes pagination and windowing. It
//! can be built in code or loaded from YAML or JSON with
//! [`TableConfig::from_file`].
//!
//! # Rows
//!
//! Any type implementing [`Record`] can be a row. JSON values and string
//! maps work out of the box.

mod color;
mod computed;
mod config;
mod error;
mod event;
mod export;
pub mod graph;
mod pagination;
mod selection;
mod table;
mod window;

pub use color::{foreground_for, palette, ColorAssignments};
pub use computed::{
    compute_column_value, ColumnCondition, ComputedColumnDefinition, ComputedColumnEditor,
    ComputedColumns, ConditionOperator, COMPUTED_KEY_PREFIX,
};
pub use config::TableConfig;
pub use error::{Result, TableError};
pub use event::TableEvent;
pub use export::{format_cell, ExportColumn, ExportRow, ExportSnapshot, Exporter};
pub use pagination::{apply_pagination, PageCursor, PageRange};
pub use selection::{RowKey, Selection, SelectionMode};
pub use table::{PipelineStats, Table, TableView};
pub use window::{compute_window, scroll_offset_for, VirtualWindow, WindowParams};

pub use gridview_layout::{
    Align, CellType, Column, ColumnLayout, ColumnSpec, FreezeOverride, FrozenPosition,
    LayoutState, PlacedColumn, SELECTION_COLUMN_WIDTH,
};
pub use gridview_query::{
    FilterEntry, FilterOperator, FilterState, FilterType, FilterValue, Record, SortDirection,
    SortEntry, SortState, Timestamp, Value,
};
