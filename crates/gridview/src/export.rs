//! Read-only view snapshots for export consumers, and cell rendering.
//!
//! File formats are left to [`Exporter`] implementations. The table only
//! hands over what is on screen: the current page's rows, the visible
//! columns in layout order, and each cell's resolved background.

use chrono::{DateTime, NaiveDate};
use gridview_layout::CellType;
use gridview_query::{Timestamp, Value};
use serde::Serialize;

use crate::selection::RowKey;

/// A column as exported.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportColumn {
    pub key: String,
    pub title: String,
    pub cell_type: CellType,
}

/// A row as exported. `cells` and `colors` follow the snapshot's columns.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ExportRow {
    pub key: RowKey,
    pub cells: Vec<String>,
    pub colors: Vec<Option<String>>,
}

/// Rows x columns x colors of the current view.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct ExportSnapshot {
    pub columns: Vec<ExportColumn>,
    pub rows: Vec<ExportRow>,
}

impl ExportSnapshot {
    pub fn titles(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|c| c.title.as_str())
    }
}

/// Consumer of an [`ExportSnapshot`], e.g. a CSV or spreadsheet writer.
pub trait Exporter {
    type Output;

    fn export(&mut self, snapshot: &ExportSnapshot) -> Self::Output;
}

impl<F, O> Exporter for F
where
    F: FnMut(&ExportSnapshot) -> O,
{
    type Output = O;

    fn export(&mut self, snapshot: &ExportSnapshot) -> O {
        self(snapshot)
    }
}

/// Renders a cell for display according to its column's cell type.
///
/// - `date`: timestamps and RFC 3339 / `YYYY-MM-DD` text as `YYYY-MM-DD`
/// - `boolean`: `Yes` / `No`
/// - everything else: the value's text form
///
/// Values that do not fit the cell type render as plain text.
pub fn format_cell(value: &Value<'_>, cell_type: CellType) -> String {
    match (cell_type, value) {
        (CellType::Date, Value::Timestamp(ts)) => {
            format_date(*ts).unwrap_or_else(|| ts.to_string())
        }
        (CellType::Date, Value::Text(text)) => parse_date(text).unwrap_or_else(|| text.to_string()),
        (CellType::Boolean, Value::Bool(b)) => yes_no(*b).to_string(),
        (CellType::Boolean, Value::Text(text)) => match text.trim().to_ascii_lowercase().as_str() {
            "true" => yes_no(true).to_string(),
            "false" => yes_no(false).to_string(),
            _ => text.to_string(),
        },
        _ => value.to_text().into_owned(),
    }
}

fn yes_no(b: bool) -> &'static str {
    if b {
        "Yes"
    } else {
        "No"
    }
}

fn format_date(ts: Timestamp) -> Option<String> {
    ts.to_datetime().map(|dt| dt.format("%Y-%m-%d").to_string())
}

fn parse_date(text: &str) -> Option<String> {
    let text = text.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Some(dt.format("%Y-%m-%d").to_string());
    }
    NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .ok()
        .map(|date| date.format("%Y-%m-%d").to_string())
}
