//! gridview-layout - Column definitions and frozen-column layout.
//!
//! Columns go through two steps before they are rendered:
//!
//! 1. [`process_columns`] fills every unset [`ColumnSpec`] field with its
//!    default, producing [`Column`]s.
//! 2. [`compose`] applies the user's [`LayoutState`] (widths, order, freeze
//!    and visibility overrides) and splits the result into frozen-left,
//!    scrollable and frozen-right groups with sticky offsets.
//!
//! [`ResizeDrag`] and [`ReorderDrag`] model header drags as explicit
//! begin / update / commit sessions.

mod column;
mod drag;
mod layout;
mod process;

pub use column::{
    Align, CellType, Column, ColumnSpec, FrozenPosition, DEFAULT_MAX_WIDTH, DEFAULT_MIN_WIDTH,
    DEFAULT_WIDTH,
};
pub use drag::{ReorderDrag, Reordered, ResizeDrag};
pub use layout::{
    compose, move_column, ordered_keys, ColumnLayout, FreezeOverride, LayoutOptions, LayoutState,
    PlacedColumn, SELECTION_COLUMN_WIDTH,
};
pub use process::process_columns;
