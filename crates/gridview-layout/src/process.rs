//! Merging column declarations with defaults.

use crate::column::{Column, ColumnSpec, DEFAULT_MAX_WIDTH, DEFAULT_MIN_WIDTH, DEFAULT_WIDTH};

/// Resolves every unset field of every spec.
///
/// Defaults: width 150, bounds `[50, 500]`, sortable, filterable and
/// resizable, left aligned, text cells and text filter, visible, not frozen
/// (left when frozen without a position), title equal to the key, and the
/// declaration index as `order`. Nothing is rejected.
///
/// ```rust
/// use gridview_layout::{process_columns, ColumnSpec};
///
/// let columns = process_columns(&[ColumnSpec::new("id"), ColumnSpec::new("name").width(200)]);
/// assert_eq!(columns[0].title, "id");
/// assert_eq!(columns[0].width, 150);
/// assert_eq!(columns[1].order, 1);
/// assert_eq!(columns[1].width, 200);
/// ```
pub fn process_columns(specs: &[ColumnSpec]) -> Vec<Column> {
    specs
        .iter()
        .enumerate()
        .map(|(index, spec)| process_column(index, spec))
        .collect()
}

fn process_column(index: usize, spec: &ColumnSpec) -> Column {
    Column {
        key: spec.key.clone(),
        title: spec.title.clone().unwrap_or_else(|| spec.key.clone()),
        order: spec.order.unwrap_or(index),
        width: spec.width.unwrap_or(DEFAULT_WIDTH),
        min_width: spec.min_width.unwrap_or(DEFAULT_MIN_WIDTH),
        max_width: spec.max_width.unwrap_or(DEFAULT_MAX_WIDTH),
        sortable: spec.sortable.unwrap_or(true),
        filterable: spec.filterable.unwrap_or(true),
        resizable: spec.resizable.unwrap_or(true),
        frozen: spec.frozen.unwrap_or(false),
        frozen_position: spec.frozen_position.unwrap_or_default(),
        visible: spec.visible.unwrap_or(true),
        align: spec.align.unwrap_or_default(),
        filter_type: spec.filter_type.unwrap_or_default(),
        cell_type: spec.cell_type.unwrap_or_default(),
        is_computed: spec.is_computed,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::column::{Align, CellType, FrozenPosition};
    use gridview_query::FilterType;

    #[test]
    fn bare_spec_gets_every_default() {
        let column = &process_columns(&[ColumnSpec::new("status")])[0];
        assert_eq!(
            *column,
            Column {
                key: "status".into(),
                title: "status".into(),
                order: 0,
                width: 150,
                min_width: 50,
                max_width: 500,
                sortable: true,
                filterable: true,
                resizable: true,
                frozen: false,
                frozen_position: FrozenPosition::Left,
                visible: true,
                align: Align::Left,
                filter_type: FilterType::Text,
                cell_type: CellType::Text,
                is_computed: false,
            }
        );
    }

    #[test]
    fn declared_fields_win() {
        let spec = ColumnSpec::new("total")
            .title("Total")
            .order(7)
            .sortable(false)
            .frozen(FrozenPosition::Right)
            .hidden()
            .computed();
        let column = &process_columns(&[spec])[0];
        assert_eq!(column.title, "Total");
        assert_eq!(column.order, 7);
        assert!(!column.sortable);
        assert!(column.is_frozen_at(FrozenPosition::Right));
        assert!(!column.visible);
        assert!(column.is_computed);
    }

    #[test]
    fn order_defaults_to_declaration_index() {
        let columns = process_columns(&[
            ColumnSpec::new("a"),
            ColumnSpec::new("b").order(0),
            ColumnSpec::new("c"),
        ]);
        let orders: Vec<usize> = columns.iter().map(|c| c.order).collect();
        assert_eq!(orders, vec![0, 0, 2]);
    }

    #[test]
    fn empty_input() {
        assert!(process_columns(&[]).is_empty());
    }
}
