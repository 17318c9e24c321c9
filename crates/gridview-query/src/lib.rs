//! gridview-query - Filter and sort engines for tabular rows.
//!
//! The engines work on any sequence of `Copy` items (row indices, row
//! references) through an accessor that reads a named cell as a [`Value`]:
//!
//! - [`apply_filtering`]: keeps items for which every [`FilterEntry`] holds
//! - [`apply_sorting`]: orders items by prioritized [`SortEntry`] keys
//!
//! # Quick Start
//!
//! ```rust
//! use gridview_query::{apply_filtering, apply_sorting, FilterEntry, Record, SortEntry,
//!     SortDirection, Value};
//! use serde_json::json;
//!
//! let rows = vec![
//!     json!({"name": "Write docs", "priority": 3}),
//!     json!({"name": "Fix bug", "priority": 5}),
//!     json!({"name": "Old task", "priority": 1}),
//! ];
//! let indices: Vec<usize> = (0..rows.len()).collect();
//! let cell = |i: usize, key: &str| rows[i].field(key);
//!
//! let filters = [FilterEntry::new("priority", "3", "greaterThanOrEqual")];
//! let kept = apply_filtering(&indices, &filters, cell);
//!
//! let sorts = [SortEntry::new("priority", SortDirection::Desc, 1)];
//! let sorted = apply_sorting(&kept, &sorts, cell, |_, _, _, _| None);
//! assert_eq!(rows[sorted[0]]["name"], "Fix bug");
//! ```
//!
//! # Operators
//!
//! | Kind | Operators |
//! |------|-----------|
//! | Text (case-insensitive) | `equals`, `notEquals`, `contains`, `notContains`, `startsWith`, `endsWith` |
//! | Numeric | `greaterThan`, `lessThan`, `greaterThanOrEqual`, `lessThanOrEqual`, `between` |
//! | List | `inList` |
//!
//! Unknown operators and malformed values never raise: they let rows through.

mod error;
mod filter;
mod op;
mod record;
mod sort;
mod value;

pub use error::{QueryError, Result};
pub use filter::{apply_filtering, FilterEntry, FilterState, FilterValue};
pub use op::{operators_for, FilterOperator, FilterType};
pub use record::Record;
pub use sort::{
    apply_sorting, compare_by_sorts, compare_values, locale_compare, SortDirection, SortEntry,
    SortState,
};
pub use value::{parse_number, Number, Timestamp, Value};
