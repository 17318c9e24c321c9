//! Notifications emitted by table mutations.

use std::collections::BTreeSet;

use gridview_query::{FilterEntry, SortEntry};
use serde::Serialize;

use crate::selection::RowKey;

/// Something the user changed.
///
/// Events queue up inside the table until drained with
/// [`Table::drain_events`](crate::Table::drain_events).
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum TableEvent {
    /// `row` is the toggled row, or `None` for bulk changes.
    SelectionChanged {
        selected: BTreeSet<RowKey>,
        row: Option<RowKey>,
        is_selected: bool,
    },
    SortChanged {
        sorts: Vec<SortEntry>,
    },
    FilterChanged {
        filters: Vec<FilterEntry>,
    },
    PageChanged {
        page: usize,
        page_size: usize,
    },
    ColumnResized {
        column: String,
        width: u32,
    },
    ColumnReordered {
        columns: Vec<String>,
        moved_column: String,
        from_index: usize,
        to_index: usize,
    },
}

impl TableEvent {
    /// Event name as used by external listeners.
    pub fn name(&self) -> &'static str {
        match self {
            TableEvent::SelectionChanged { .. } => "selectionChanged",
            TableEvent::SortChanged { .. } => "sortChanged",
            TableEvent::FilterChanged { .. } => "filterChanged",
            TableEvent::PageChanged { .. } => "pageChanged",
            TableEvent::ColumnResized { .. } => "columnResized",
            TableEvent::ColumnReordered { .. } => "columnReordered",
        }
    }
}
