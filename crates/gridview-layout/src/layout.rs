//! Final column arrangement.
//!
//! [`compose`] applies the user's layout customizations on top of processed
//! columns, in a fixed order:
//!
//! 1. static order (stable by [`Column::order`])
//! 2. width overrides from resizing
//! 3. the explicit reorder permutation
//! 4. freeze overrides
//! 5. visibility
//!
//! The survivors are partitioned into frozen-left, scrollable and
//! frozen-right groups, and frozen columns get their sticky offsets.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::column::{Column, FrozenPosition};

/// Width reserved at the left edge for the row-selection checkbox column.
pub const SELECTION_COLUMN_WIDTH: u32 = 50;

/// A runtime freeze decision that overrides a column's declaration.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FreezeOverride {
    Left,
    Right,
    /// Forces the column to scroll even if it was declared frozen.
    Unfrozen,
}

impl From<FrozenPosition> for FreezeOverride {
    fn from(position: FrozenPosition) -> Self {
        match position {
            FrozenPosition::Left => FreezeOverride::Left,
            FrozenPosition::Right => FreezeOverride::Right,
        }
    }
}

/// User customizations of the column layout.
///
/// Every map is keyed by column key; absent keys defer to the column
/// declaration.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutState {
    #[serde(default)]
    widths: BTreeMap<String, u32>,
    #[serde(default)]
    order: Vec<String>,
    #[serde(default)]
    freeze: BTreeMap<String, FreezeOverride>,
    #[serde(default)]
    visibility: BTreeMap<String, bool>,
}

impl LayoutState {
    pub fn new() -> Self {
        LayoutState::default()
    }

    /// Overrides a column width. Returns `true` if it changed.
    pub fn set_width(&mut self, key: &str, width: u32) -> bool {
        self.widths.insert(key.to_string(), width) != Some(width)
    }

    /// The width override for a column, if any.
    pub fn width_of(&self, key: &str) -> Option<u32> {
        self.widths.get(key).copied()
    }

    /// The explicit reorder permutation. Empty until first initialized.
    pub fn order(&self) -> &[String] {
        &self.order
    }

    /// Replaces the reorder permutation. Returns `true` if it changed.
    pub fn set_order(&mut self, order: Vec<String>) -> bool {
        if self.order == order {
            return false;
        }
        self.order = order;
        true
    }

    /// Seeds the permutation only when none exists yet.
    pub fn init_order_if_empty<I, S>(&mut self, keys: I) -> bool
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        if !self.order.is_empty() {
            return false;
        }
        self.order = keys.into_iter().map(Into::into).collect();
        !self.order.is_empty()
    }

    /// The freeze override for a column, if any.
    pub fn freeze_of(&self, key: &str) -> Option<FreezeOverride> {
        self.freeze.get(key).copied()
    }

    /// Sets a freeze override. Returns `true` if it changed.
    pub fn set_freeze(&mut self, key: &str, value: FreezeOverride) -> bool {
        self.freeze.insert(key.to_string(), value) != Some(value)
    }

    /// Drops a freeze override so the declaration applies again.
    pub fn clear_freeze(&mut self, key: &str) -> bool {
        self.freeze.remove(key).is_some()
    }

    /// The visibility override for a column, if any.
    pub fn visibility_of(&self, key: &str) -> Option<bool> {
        self.visibility.get(key).copied()
    }

    /// Sets a visibility override. Returns `true` if it changed.
    pub fn set_visible(&mut self, key: &str, visible: bool) -> bool {
        self.visibility.insert(key.to_string(), visible) != Some(visible)
    }

    /// Drops every visibility override.
    pub fn clear_visibility(&mut self) -> bool {
        let changed = !self.visibility.is_empty();
        self.visibility.clear();
        changed
    }

    /// Removes every reference to a column.
    pub fn forget(&mut self, key: &str) -> bool {
        let before = self.order.len();
        self.order.retain(|k| k != key);
        let mut changed = self.order.len() != before;
        changed |= self.widths.remove(key).is_some();
        changed |= self.freeze.remove(key).is_some();
        changed |= self.visibility.remove(key).is_some();
        changed
    }

    /// Returns `true` if nothing has been customized.
    pub fn is_pristine(&self) -> bool {
        self.widths.is_empty()
            && self.order.is_empty()
            && self.freeze.is_empty()
            && self.visibility.is_empty()
    }
}

/// Settings from the table configuration that shape the layout.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LayoutOptions {
    /// Reserve [`SELECTION_COLUMN_WIDTH`] before the frozen-left group.
    pub show_selection_column: bool,
    /// When `false`, every column scrolls.
    pub frozen_enabled: bool,
}

impl Default for LayoutOptions {
    fn default() -> Self {
        LayoutOptions {
            show_selection_column: false,
            frozen_enabled: true,
        }
    }
}

/// A column in its final position.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PlacedColumn {
    /// The column with overrides applied.
    pub column: Column,
    /// Sticky left offset for frozen-left columns.
    pub left: Option<u32>,
    /// Sticky right offset for frozen-right columns.
    pub right: Option<u32>,
}

impl PlacedColumn {
    pub fn key(&self) -> &str {
        &self.column.key
    }

    pub fn width(&self) -> u32 {
        self.column.width
    }
}

/// The rendered column arrangement.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ColumnLayout {
    pub left: Vec<PlacedColumn>,
    pub center: Vec<PlacedColumn>,
    pub right: Vec<PlacedColumn>,
}

impl ColumnLayout {
    /// All columns in render order: left, center, right.
    pub fn iter(&self) -> impl Iterator<Item = &PlacedColumn> {
        self.left.iter().chain(&self.center).chain(&self.right)
    }

    /// Keys in render order.
    pub fn keys(&self) -> Vec<&str> {
        self.iter().map(PlacedColumn::key).collect()
    }

    pub fn get(&self, key: &str) -> Option<&PlacedColumn> {
        self.iter().find(|placed| placed.key() == key)
    }

    pub fn len(&self) -> usize {
        self.left.len() + self.center.len() + self.right.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Sum of all column widths, excluding the selection column.
    pub fn total_width(&self) -> u32 {
        self.iter().map(PlacedColumn::width).sum()
    }
}

/// Merges a static key order with an explicit permutation.
///
/// Keys present in `permutation` come first in permutation order; the rest
/// follow in static order. Permutation keys with no matching column are
/// skipped.
pub fn ordered_keys<'a>(static_keys: &[&'a str], permutation: &[String]) -> Vec<&'a str> {
    let mut ordered: Vec<&'a str> = Vec::with_capacity(static_keys.len());
    for key in permutation {
        let found = static_keys.iter().copied().find(|k| *k == key.as_str());
        if let Some(found) = found {
            if !ordered.contains(&found) {
                ordered.push(found);
            }
        }
    }
    for &key in static_keys {
        if !ordered.contains(&key) {
            ordered.push(key);
        }
    }
    ordered
}

/// Moves `key` to the index `target` currently occupies.
///
/// Returns the `(from, to)` indices, or `None` when either key is missing or
/// they are the same.
pub fn move_column(order: &mut Vec<String>, key: &str, target: &str) -> Option<(usize, usize)> {
    let from = order.iter().position(|k| k == key)?;
    let to = order.iter().position(|k| k == target)?;
    if from == to {
        return None;
    }
    let moved = order.remove(from);
    order.insert(to, moved);
    Some((from, to))
}

/// Composes the final layout.
///
/// ```rust
/// use gridview_layout::{compose, process_columns, ColumnSpec, FrozenPosition, LayoutOptions,
///     LayoutState};
///
/// let columns = process_columns(&[
///     ColumnSpec::new("id").width(80).frozen(FrozenPosition::Left),
///     ColumnSpec::new("name"),
///     ColumnSpec::new("actions").width(60).frozen(FrozenPosition::Right),
/// ]);
/// let options = LayoutOptions { show_selection_column: true, frozen_enabled: true };
/// let layout = compose(&columns, &LayoutState::new(), options);
///
/// assert_eq!(layout.keys(), vec!["id", "name", "actions"]);
/// assert_eq!(layout.left[0].left, Some(50));
/// assert_eq!(layout.right[0].right, Some(0));
/// ```
pub fn compose(columns: &[Column], state: &LayoutState, options: LayoutOptions) -> ColumnLayout {
    let mut by_static: Vec<&Column> = columns.iter().collect();
    by_static.sort_by_key(|column| column.order);

    let static_keys: Vec<&str> = by_static.iter().map(|c| c.key.as_str()).collect();
    let keys = ordered_keys(&static_keys, state.order());

    let mut layout = ColumnLayout::default();
    for key in keys {
        let Some(source) = by_static.iter().find(|c| c.key == key) else {
            continue;
        };
        let mut column = (*source).clone();
        if let Some(width) = state.width_of(key) {
            column.width = width;
        }
        match state.freeze_of(key) {
            Some(FreezeOverride::Left) => {
                column.frozen = true;
                column.frozen_position = FrozenPosition::Left;
            }
            Some(FreezeOverride::Right) => {
                column.frozen = true;
                column.frozen_position = FrozenPosition::Right;
            }
            Some(FreezeOverride::Unfrozen) => column.frozen = false,
            None => {}
        }
        if !state.visibility_of(key).unwrap_or(column.visible) {
            continue;
        }
        column.visible = true;

        let placed = PlacedColumn {
            column,
            left: None,
            right: None,
        };
        if !options.frozen_enabled || !placed.column.frozen {
            layout.center.push(placed);
        } else if placed.column.frozen_position == FrozenPosition::Left {
            layout.left.push(placed);
        } else {
            layout.right.push(placed);
        }
    }

    let mut offset = if options.show_selection_column {
        SELECTION_COLUMN_WIDTH
    } else {
        0
    };
    for placed in &mut layout.left {
        placed.left = Some(offset);
        offset += placed.column.width;
    }
    let mut offset = 0;
    for placed in layout.right.iter_mut().rev() {
        placed.right = Some(offset);
        offset += placed.column.width;
    }

    log::trace!(
        "composed layout: {} left, {} center, {} right",
        layout.left.len(),
        layout.center.len(),
        layout.right.len()
    );
    layout
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::column::ColumnSpec;
    use crate::process::process_columns;

    fn columns() -> Vec<Column> {
        process_columns(&[
            ColumnSpec::new("id").width(60).frozen(FrozenPosition::Left),
            ColumnSpec::new("name").width(200).frozen(FrozenPosition::Left),
            ColumnSpec::new("email"),
            ColumnSpec::new("city"),
            ColumnSpec::new("edit").width(40).frozen(FrozenPosition::Right),
            ColumnSpec::new("delete").width(45).frozen(FrozenPosition::Right),
        ])
    }

    fn options(selection: bool) -> LayoutOptions {
        LayoutOptions {
            show_selection_column: selection,
            frozen_enabled: true,
        }
    }

    #[test]
    fn partitions_and_offsets() {
        let layout = compose(&columns(), &LayoutState::new(), options(false));
        let lefts: Vec<Option<u32>> = layout.left.iter().map(|p| p.left).collect();
        let rights: Vec<Option<u32>> = layout.right.iter().map(|p| p.right).collect();
        assert_eq!(lefts, vec![Some(0), Some(60)]);
        assert_eq!(rights, vec![Some(45), Some(0)]);
        assert!(layout.center.iter().all(|p| p.left.is_none() && p.right.is_none()));
    }

    #[test]
    fn selection_column_shifts_left_offsets() {
        let layout = compose(&columns(), &LayoutState::new(), options(true));
        let lefts: Vec<Option<u32>> = layout.left.iter().map(|p| p.left).collect();
        assert_eq!(lefts, vec![Some(50), Some(110)]);
    }

    #[test]
    fn width_override_moves_offsets() {
        let mut state = LayoutState::new();
        state.set_width("id", 100);
        let layout = compose(&columns(), &state, options(false));
        assert_eq!(layout.left[1].left, Some(100));
    }

    #[test]
    fn unfrozen_override_beats_declaration() {
        let mut state = LayoutState::new();
        state.set_freeze("id", FreezeOverride::Unfrozen);
        state.set_freeze("city", FreezeOverride::Right);
        let layout = compose(&columns(), &state, options(false));
        assert_eq!(layout.left.len(), 1);
        assert_eq!(layout.left[0].key(), "name");
        assert_eq!(layout.left[0].left, Some(0));
        assert!(layout.center.iter().any(|p| p.key() == "id"));
        let right: Vec<&str> = layout.right.iter().map(PlacedColumn::key).collect();
        assert_eq!(right, vec!["city", "edit", "delete"]);
        assert_eq!(layout.right[0].right, Some(85));
    }

    #[test]
    fn hidden_columns_take_no_space() {
        let mut state = LayoutState::new();
        state.set_visible("id", false);
        let layout = compose(&columns(), &state, options(true));
        assert!(layout.get("id").is_none());
        assert_eq!(layout.left[0].left, Some(50));
    }

    #[test]
    fn visibility_override_reveals_hidden_declaration() {
        let columns = process_columns(&[ColumnSpec::new("a"), ColumnSpec::new("b").hidden()]);
        let layout = compose(&columns, &LayoutState::new(), LayoutOptions::default());
        assert_eq!(layout.keys(), vec!["a"]);

        let mut state = LayoutState::new();
        state.set_visible("b", true);
        let layout = compose(&columns, &state, LayoutOptions::default());
        assert_eq!(layout.keys(), vec!["a", "b"]);
    }

    #[test]
    fn frozen_disabled_scrolls_everything() {
        let layout = compose(
            &columns(),
            &LayoutState::new(),
            LayoutOptions {
                show_selection_column: true,
                frozen_enabled: false,
            },
        );
        assert!(layout.left.is_empty());
        assert!(layout.right.is_empty());
        assert_eq!(layout.center.len(), 6);
    }

    #[test]
    fn permutation_keys_lead_static_order() {
        let columns = process_columns(&[
            ColumnSpec::new("a").order(2),
            ColumnSpec::new("b").order(0),
            ColumnSpec::new("c").order(1),
            ColumnSpec::new("d").order(3),
        ]);
        let layout = compose(&columns, &LayoutState::new(), LayoutOptions::default());
        assert_eq!(layout.keys(), vec!["b", "c", "a", "d"]);

        let mut state = LayoutState::new();
        state.set_order(vec!["d".into(), "ghost".into(), "a".into()]);
        let layout = compose(&columns, &state, LayoutOptions::default());
        assert_eq!(layout.keys(), vec!["d", "a", "b", "c"]);
    }

    #[test]
    fn move_column_reports_indices() {
        let mut order: Vec<String> = ["a", "b", "c", "d"].iter().map(|s| s.to_string()).collect();
        assert_eq!(move_column(&mut order, "a", "c"), Some((0, 2)));
        assert_eq!(order, vec!["b", "c", "a", "d"]);
        assert_eq!(move_column(&mut order, "d", "b"), Some((3, 0)));
        assert_eq!(order, vec!["d", "b", "c", "a"]);
        assert_eq!(move_column(&mut order, "d", "d"), None);
        assert_eq!(move_column(&mut order, "x", "d"), None);
    }

    #[test]
    fn init_order_only_once() {
        let mut state = LayoutState::new();
        assert!(state.init_order_if_empty(["a", "b"]));
        assert!(!state.init_order_if_empty(["x"]));
        assert_eq!(state.order(), &["a".to_string(), "b".to_string()]);
    }

    #[test]
    fn forget_drops_all_references() {
        let mut state = LayoutState::new();
        state.init_order_if_empty(["a", "b"]);
        state.set_width("a", 90);
        state.set_freeze("a", FreezeOverride::Left);
        state.set_visible("a", false);
        assert!(state.forget("a"));
        assert_eq!(state.order(), &["b".to_string()]);
        assert_eq!(state.width_of("a"), None);
        assert_eq!(state.freeze_of("a"), None);
        assert_eq!(state.visibility_of("a"), None);
        assert!(!state.forget("a"));
    }
}
