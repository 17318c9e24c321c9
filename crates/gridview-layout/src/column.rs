//! Column declarations and their processed form.
//!
//! A [`ColumnSpec`] is what callers declare: only `key` is required and every
//! other field may be left unset. [`process_columns`](crate::process_columns)
//! turns specs into [`Column`]s, where every field has a concrete value.

use gridview_query::FilterType;
use serde::{Deserialize, Serialize};

/// Width of a column that does not declare one.
pub const DEFAULT_WIDTH: u32 = 150;
/// Smallest width a column can be resized to unless it declares its own.
pub const DEFAULT_MIN_WIDTH: u32 = 50;
/// Largest width a column can be resized to unless it declares its own.
pub const DEFAULT_MAX_WIDTH: u32 = 500;

/// Text alignment within a cell.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Align {
    #[default]
    Left,
    Center,
    Right,
}

/// Edge a frozen column sticks to.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FrozenPosition {
    #[default]
    Left,
    Right,
}

/// How a cell value is rendered when the column has no custom formatter.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CellType {
    #[default]
    Text,
    Number,
    Date,
    Boolean,
    /// Rendered by a formatter registered for the column.
    Custom,
}

/// A column as declared by the caller.
///
/// Unset fields take the defaults documented on [`Column`].
///
/// # Example
///
/// ```rust
/// use gridview_layout::{ColumnSpec, FrozenPosition};
///
/// let spec = ColumnSpec::new("name")
///     .title("Name")
///     .width(220)
///     .frozen(FrozenPosition::Left);
/// assert_eq!(spec.key, "name");
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColumnSpec {
    pub key: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_width: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_width: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sortable: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filterable: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resizable: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub frozen: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub frozen_position: Option<FrozenPosition>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub visible: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub align: Option<Align>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filter_type: Option<FilterType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cell_type: Option<CellType>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub is_computed: bool,
}

impl ColumnSpec {
    /// Creates a spec with only its key set.
    pub fn new(key: impl Into<String>) -> Self {
        ColumnSpec {
            key: key.into(),
            ..Default::default()
        }
    }

    /// Set the header title.
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Set the initial position.
    pub fn order(mut self, order: usize) -> Self {
        self.order = Some(order);
        self
    }

    /// Set the initial width.
    pub fn width(mut self, width: u32) -> Self {
        self.width = Some(width);
        self
    }

    /// Set the resize bounds.
    pub fn bounds(mut self, min: u32, max: u32) -> Self {
        self.min_width = Some(min);
        self.max_width = Some(max);
        self
    }

    /// Set whether header clicks sort by this column.
    pub fn sortable(mut self, sortable: bool) -> Self {
        self.sortable = Some(sortable);
        self
    }

    /// Set whether the column accepts a filter.
    pub fn filterable(mut self, filterable: bool) -> Self {
        self.filterable = Some(filterable);
        self
    }

    /// Set whether the column can be resized.
    pub fn resizable(mut self, resizable: bool) -> Self {
        self.resizable = Some(resizable);
        self
    }

    /// Freeze the column to an edge.
    pub fn frozen(mut self, position: FrozenPosition) -> Self {
        self.frozen = Some(true);
        self.frozen_position = Some(position);
        self
    }

    /// Start the column hidden.
    pub fn hidden(mut self) -> Self {
        self.visible = Some(false);
        self
    }

    /// Set the text alignment.
    pub fn align(mut self, align: Align) -> Self {
        self.align = Some(align);
        self
    }

    /// Set alignment to right (shorthand for `.align(Align::Right)`).
    pub fn right(self) -> Self {
        self.align(Align::Right)
    }

    /// Set the filter input kind.
    pub fn filter_type(mut self, filter_type: FilterType) -> Self {
        self.filter_type = Some(filter_type);
        self
    }

    /// Set how cells render.
    pub fn cell_type(mut self, cell_type: CellType) -> Self {
        self.cell_type = Some(cell_type);
        self
    }

    /// Mark the column as derived from computed-column rules.
    pub fn computed(mut self) -> Self {
        self.is_computed = true;
        self
    }
}

/// A column with every field resolved.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Column {
    /// Unique key across base and computed columns.
    pub key: String,
    /// Header text, the key when not declared.
    pub title: String,
    /// Initial position, the declaration index when not declared.
    pub order: usize,
    pub width: u32,
    pub min_width: u32,
    pub max_width: u32,
    pub sortable: bool,
    pub filterable: bool,
    pub resizable: bool,
    pub frozen: bool,
    pub frozen_position: FrozenPosition,
    pub visible: bool,
    pub align: Align,
    pub filter_type: FilterType,
    pub cell_type: CellType,
    pub is_computed: bool,
}

impl Column {
    /// Clamps a width into this column's `[min_width, max_width]` bounds.
    ///
    /// When the declared bounds are inverted, `min_width` wins.
    pub fn clamp_width(&self, width: u32) -> u32 {
        width.min(self.max_width).max(self.min_width)
    }

    /// Returns `true` if the column sticks to `position`.
    pub fn is_frozen_at(&self, position: FrozenPosition) -> bool {
        self.frozen && self.frozen_position == position
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::process_columns;

    #[test]
    fn builder_sets_fields() {
        let spec = ColumnSpec::new("amount")
            .title("Amount")
            .width(90)
            .bounds(60, 120)
            .right()
            .cell_type(CellType::Number)
            .filter_type(FilterType::Number);
        assert_eq!(spec.title.as_deref(), Some("Amount"));
        assert_eq!(spec.width, Some(90));
        assert_eq!(spec.min_width, Some(60));
        assert_eq!(spec.max_width, Some(120));
        assert_eq!(spec.align, Some(Align::Right));
        assert_eq!(spec.cell_type, Some(CellType::Number));
    }

    #[test]
    fn spec_deserializes_camel_case() {
        let spec: ColumnSpec = serde_json::from_str(
            r#"{"key": "name", "minWidth": 80, "frozenPosition": "right", "frozen": true,
                "filterType": "select", "cellType": "date"}"#,
        )
        .unwrap();
        assert_eq!(spec.min_width, Some(80));
        assert_eq!(spec.frozen_position, Some(FrozenPosition::Right));
        assert_eq!(spec.filter_type, Some(FilterType::Select));
        assert_eq!(spec.cell_type, Some(CellType::Date));
        assert!(!spec.is_computed);
    }

    #[test]
    fn spec_serializes_only_set_fields() {
        let json = serde_json::to_value(ColumnSpec::new("id").width(40)).unwrap();
        assert_eq!(json, serde_json::json!({"key": "id", "width": 40}));
    }

    #[test]
    fn clamp_width_respects_bounds() {
        let column = &process_columns(&[ColumnSpec::new("a").bounds(60, 200)])[0];
        assert_eq!(column.clamp_width(10), 60);
        assert_eq!(column.clamp_width(120), 120);
        assert_eq!(column.clamp_width(900), 200);

        let inverted = &process_columns(&[ColumnSpec::new("b").bounds(300, 100)])[0];
        assert_eq!(inverted.clamp_width(200), 300);
    }
}
