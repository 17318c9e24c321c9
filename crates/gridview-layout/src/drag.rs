//! Pointer-independent resize and reorder sessions.
//!
//! A session starts when the user grabs a header, follows the pointer with
//! updates, and ends with a commit or a cancel. Only the commit changes
//! [`LayoutState`].

use crate::column::Column;
use crate::layout::{move_column, LayoutState};

/// An in-progress column resize.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResizeDrag {
    key: String,
    min_width: u32,
    max_width: u32,
    start_width: u32,
    width: u32,
}

impl ResizeDrag {
    /// Starts resizing `column` from its current rendered width.
    pub fn begin(column: &Column, current_width: u32) -> Self {
        let width = column.clamp_width(current_width);
        ResizeDrag {
            key: column.key.clone(),
            min_width: column.min_width,
            max_width: column.max_width,
            start_width: width,
            width,
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// Width the column would get if committed now.
    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn start_width(&self) -> u32 {
        self.start_width
    }

    /// Sets an absolute width, clamped to the column bounds.
    pub fn resize_to(&mut self, width: u32) -> u32 {
        self.width = width.min(self.max_width).max(self.min_width);
        self.width
    }

    /// Sets the width from the pointer distance travelled since the start.
    pub fn drag_by(&mut self, delta: i64) -> u32 {
        let target = (i64::from(self.start_width) + delta).clamp(0, i64::from(u32::MAX));
        self.resize_to(target as u32)
    }

    /// Writes the width into `state`. Returns the key and committed width if
    /// the stored width changed.
    pub fn commit(self, state: &mut LayoutState) -> Option<(String, u32)> {
        if state.set_width(&self.key, self.width) {
            Some((self.key, self.width))
        } else {
            None
        }
    }
}

/// An in-progress column reorder.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReorderDrag {
    dragged: String,
    target: Option<String>,
}

/// Outcome of a committed reorder.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Reordered {
    pub moved_column: String,
    pub from_index: usize,
    pub to_index: usize,
    /// Full key order after the move.
    pub columns: Vec<String>,
}

impl ReorderDrag {
    pub fn begin(key: impl Into<String>) -> Self {
        ReorderDrag {
            dragged: key.into(),
            target: None,
        }
    }

    pub fn dragged(&self) -> &str {
        &self.dragged
    }

    pub fn target(&self) -> Option<&str> {
        self.target.as_deref()
    }

    /// Records the header currently under the pointer.
    pub fn hover(&mut self, target: impl Into<String>) {
        self.target = Some(target.into());
    }

    /// Clears the hover target, e.g. when the pointer leaves the header row.
    pub fn leave(&mut self) {
        self.target = None;
    }

    /// Moves the dragged key to the target's position in `current_order`
    /// and stores the result in `state`.
    ///
    /// `current_order` is the full key order as rendered. Returns `None`
    /// without touching `state` when there is no target, the target is the
    /// dragged column, or either key is unknown.
    pub fn commit(self, current_order: Vec<String>, state: &mut LayoutState) -> Option<Reordered> {
        let target = self.target?;
        let mut order = current_order;
        let (from_index, to_index) = move_column(&mut order, &self.dragged, &target)?;
        state.set_order(order.clone());
        Some(Reordered {
            moved_column: self.dragged,
            from_index,
            to_index,
            columns: order,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::column::ColumnSpec;
    use crate::process::process_columns;

    fn keys(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn resize_clamps_and_commits() {
        let column = &process_columns(&[ColumnSpec::new("name").bounds(80, 300)])[0];
        let mut drag = ResizeDrag::begin(column, 150);
        assert_eq!(drag.drag_by(-500), 80);
        assert_eq!(drag.drag_by(40), 190);
        assert_eq!(drag.resize_to(1000), 300);

        let mut state = LayoutState::new();
        assert_eq!(drag.clone().commit(&mut state), Some(("name".into(), 300)));
        assert_eq!(state.width_of("name"), Some(300));
        assert_eq!(drag.commit(&mut state), None);
    }

    #[test]
    fn reorder_without_target_is_noop() {
        let mut state = LayoutState::new();
        let drag = ReorderDrag::begin("a");
        assert_eq!(drag.commit(keys(&["a", "b"]), &mut state), None);
        assert!(state.order().is_empty());
    }

    #[test]
    fn reorder_commit_reports_move() {
        let mut state = LayoutState::new();
        let mut drag = ReorderDrag::begin("c");
        drag.hover("b");
        drag.leave();
        drag.hover("a");
        let result = drag.commit(keys(&["a", "b", "c"]), &mut state).unwrap();
        assert_eq!(result.moved_column, "c");
        assert_eq!((result.from_index, result.to_index), (2, 0));
        assert_eq!(result.columns, keys(&["c", "a", "b"]));
        assert_eq!(state.order(), &keys(&["c", "a", "b"])[..]);
    }
}
