//! Background color overrides for rows, columns and single cells.

use std::collections::BTreeMap;

use crate::selection::RowKey;

/// Palette backgrounds and the text color that reads well on each.
const PALETTE: [(&str, &str); 10] = [
    ("#FFCDD2", "#B71C1C"),
    ("#F8BBD0", "#880E4F"),
    ("#E1BEE7", "#4A148C"),
    ("#BBDEFB", "#0D47A1"),
    ("#B2EBF2", "#006064"),
    ("#C8E6C9", "#1B5E20"),
    ("#FFF9C4", "#F57F17"),
    ("#FFE0B2", "#E65100"),
    ("#D7CCC8", "#3E2723"),
    ("#CFD8DC", "#263238"),
];

/// Background colors of the palette, in menu order.
pub fn palette() -> impl Iterator<Item = &'static str> {
    PALETTE.iter().map(|(background, _)| *background)
}

/// Text color paired with a palette background. Case-insensitive.
pub fn foreground_for(background: &str) -> Option<&'static str> {
    PALETTE
        .iter()
        .find(|(bg, _)| bg.eq_ignore_ascii_case(background.trim()))
        .map(|(_, fg)| *fg)
}

/// Color assignments. Cell beats row beats column.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ColorAssignments {
    rows: BTreeMap<RowKey, String>,
    columns: BTreeMap<String, String>,
    cells: BTreeMap<(RowKey, String), String>,
}

fn assign<K: Ord>(map: &mut BTreeMap<K, String>, key: K, color: &str) -> bool {
    if color.is_empty() {
        return map.remove(&key).is_some();
    }
    map.insert(key, color.to_string()).as_deref() != Some(color)
}

impl ColorAssignments {
    pub fn new() -> Self {
        ColorAssignments::default()
    }

    /// Colors a whole row. An empty color clears the assignment.
    pub fn set_row(&mut self, row: RowKey, color: &str) -> bool {
        assign(&mut self.rows, row, color)
    }

    /// Colors a whole column. An empty color clears the assignment.
    pub fn set_column(&mut self, column: &str, color: &str) -> bool {
        assign(&mut self.columns, column.to_string(), color)
    }

    /// Colors one cell. An empty color clears the assignment.
    pub fn set_cell(&mut self, row: RowKey, column: &str, color: &str) -> bool {
        assign(&mut self.cells, (row, column.to_string()), color)
    }

    pub fn row(&self, row: &RowKey) -> Option<&str> {
        self.rows.get(row).map(String::as_str)
    }

    pub fn column(&self, column: &str) -> Option<&str> {
        self.columns.get(column).map(String::as_str)
    }

    /// Effective background of a cell.
    pub fn resolve(&self, row: &RowKey, column: &str) -> Option<&str> {
        self.cells
            .get(&(row.clone(), column.to_string()))
            .or_else(|| self.rows.get(row))
            .or_else(|| self.columns.get(column))
            .map(String::as_str)
    }

    /// Drops every assignment that mentions `column`.
    pub fn forget_column(&mut self, column: &str) -> bool {
        let mut changed = self.columns.remove(column).is_some();
        let before = self.cells.len();
        self.cells.retain(|(_, c), _| c != column);
        changed |= self.cells.len() != before;
        changed
    }

    /// Removes every assignment. Returns `true` if any existed.
    pub fn clear(&mut self) -> bool {
        let changed = !self.is_empty();
        self.rows.clear();
        self.columns.clear();
        self.cells.clear();
        changed
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty() && self.columns.is_empty() && self.cells.is_empty()
    }
}
