//! Per-column filter predicates.
//!
//! A [`FilterEntry`] pairs a column key with an operator and a filter value.
//! [`FilterState`] holds at most one entry per column; [`apply_filtering`]
//! keeps the rows for which every active entry holds.

use serde::{Deserialize, Serialize};

use crate::op::FilterOperator;
use crate::value::{parse_number, Value};

/// Value a filter compares cells against.
///
/// Free-text input produces [`FilterValue::Single`]. `between` and `inList`
/// need a [`FilterValue::List`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FilterValue {
    Single(String),
    List(Vec<String>),
}

impl FilterValue {
    /// Blank values clear the filter instead of being stored.
    pub fn is_blank(&self) -> bool {
        match self {
            FilterValue::Single(s) => s.trim().is_empty(),
            FilterValue::List(items) => items.iter().all(|s| s.trim().is_empty()),
        }
    }

    /// Text form of the value. Lists are comma-joined.
    pub fn text(&self) -> String {
        match self {
            FilterValue::Single(s) => s.clone(),
            FilterValue::List(items) => items.join(","),
        }
    }
}

impl From<&str> for FilterValue {
    fn from(s: &str) -> Self {
        FilterValue::Single(s.to_string())
    }
}

impl From<String> for FilterValue {
    fn from(s: String) -> Self {
        FilterValue::Single(s)
    }
}

impl From<Vec<String>> for FilterValue {
    fn from(items: Vec<String>) -> Self {
        FilterValue::List(items)
    }
}

impl From<Vec<&str>> for FilterValue {
    fn from(items: Vec<&str>) -> Self {
        FilterValue::List(items.into_iter().map(str::to_string).collect())
    }
}

impl<const N: usize> From<[&str; N]> for FilterValue {
    fn from(items: [&str; N]) -> Self {
        FilterValue::List(items.iter().map(|s| s.to_string()).collect())
    }
}

/// A single column filter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterEntry {
    /// Column key the filter reads.
    pub key: String,
    /// Value to compare against.
    pub value: FilterValue,
    /// How to compare.
    pub operator: FilterOperator,
}

impl FilterEntry {
    /// Creates a new filter entry.
    pub fn new(
        key: impl Into<String>,
        value: impl Into<FilterValue>,
        operator: impl Into<FilterOperator>,
    ) -> Self {
        FilterEntry {
            key: key.into(),
            value: value.into(),
            operator: operator.into(),
        }
    }

    /// Evaluates this filter against a cell value.
    ///
    /// Text operators compare lowercase strings. Numeric operators cast both
    /// sides and fail on `NaN`. `between` and `inList` with a value of the
    /// wrong shape, and unknown operators, let the cell through.
    pub fn matches(&self, cell: &Value<'_>) -> bool {
        match &self.operator {
            FilterOperator::Equals => lowered(cell) == self.value.text().to_lowercase(),
            FilterOperator::NotEquals => lowered(cell) != self.value.text().to_lowercase(),
            FilterOperator::Contains => lowered(cell).contains(&self.value.text().to_lowercase()),
            FilterOperator::NotContains => {
                !lowered(cell).contains(&self.value.text().to_lowercase())
            }
            FilterOperator::StartsWith => {
                lowered(cell).starts_with(&self.value.text().to_lowercase())
            }
            FilterOperator::EndsWith => lowered(cell).ends_with(&self.value.text().to_lowercase()),
            op @ (FilterOperator::GreaterThan
            | FilterOperator::LessThan
            | FilterOperator::GreaterThanOrEqual
            | FilterOperator::LessThanOrEqual) => {
                let bound = parse_number(&self.value.text());
                cell.to_number()
                    .partial_cmp(&bound)
                    .is_some_and(|ordering| op.eval_ordering(ordering))
            }
            FilterOperator::Between => match &self.value {
                FilterValue::List(bounds) if bounds.len() == 2 => {
                    let n = cell.to_number();
                    let low = parse_number(&bounds[0]);
                    let high = parse_number(&bounds[1]);
                    n >= low && n <= high
                }
                _ => true,
            },
            FilterOperator::InList => match &self.value {
                FilterValue::List(items) => {
                    let cell = lowered(cell);
                    items.iter().any(|item| item.to_lowercase() == cell)
                }
                FilterValue::Single(_) => true,
            },
            FilterOperator::Other(_) => true,
        }
    }
}

fn lowered(cell: &Value<'_>) -> String {
    cell.to_text().to_lowercase()
}

/// Active filters, at most one per column, in the order they were first set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FilterState {
    entries: Vec<FilterEntry>,
}

impl FilterState {
    /// Creates an empty filter state.
    pub fn new() -> Self {
        FilterState::default()
    }

    /// Sets the filter for `entry.key`, replacing any prior entry for that
    /// column. A blank value removes the entry instead.
    ///
    /// Returns `true` if the state changed.
    pub fn set(&mut self, entry: FilterEntry) -> bool {
        if entry.value.is_blank() {
            return self.remove(&entry.key);
        }
        match self.entries.iter_mut().find(|e| e.key == entry.key) {
            Some(existing) if *existing == entry => false,
            Some(existing) => {
                *existing = entry;
                true
            }
            None => {
                self.entries.push(entry);
                true
            }
        }
    }

    /// Removes the filter for a column. Returns `true` if one was present.
    pub fn remove(&mut self, key: &str) -> bool {
        let before = self.entries.len();
        self.entries.retain(|e| e.key != key);
        self.entries.len() != before
    }

    /// Removes every filter. Returns `true` if any were present.
    pub fn clear(&mut self) -> bool {
        let changed = !self.entries.is_empty();
        self.entries.clear();
        changed
    }

    /// Returns the filter for a column, if any.
    pub fn get(&self, key: &str) -> Option<&FilterEntry> {
        self.entries.iter().find(|e| e.key == key)
    }

    /// Returns the active filters.
    pub fn entries(&self) -> &[FilterEntry] {
        &self.entries
    }

    /// Number of active filters.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if no filter is active.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Keeps the items for which every filter holds, preserving order.
///
/// `accessor` reads a named cell from an item; the items themselves are
/// usually row indices or row references.
///
/// ```
/// use gridview_query::{apply_filtering, FilterEntry, Value};
///
/// let names = ["Ada", "Grace", "Alan"];
/// let filters = [FilterEntry::new("name", "a", "startsWith")];
/// let kept = apply_filtering(&[0usize, 1, 2], &filters, |i, _| Value::from(names[i]));
/// assert_eq!(kept, vec![0, 2]);
/// ```
pub fn apply_filtering<'r, I, F>(items: &[I], filters: &[FilterEntry], accessor: F) -> Vec<I>
where
    I: Copy,
    F: Fn(I, &str) -> Value<'r>,
{
    if filters.is_empty() {
        return items.to_vec();
    }
    items
        .iter()
        .copied()
        .filter(|&item| {
            filters
                .iter()
                .all(|filter| filter.matches(&accessor(item, &filter.key)))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::Number;

    fn text(s: &str) -> Value<'_> {
        Value::from(s)
    }

    #[test]
    fn text_operators_ignore_case() {
        assert!(FilterEntry::new("k", "ALICE", "equals").matches(&text("alice")));
        assert!(FilterEntry::new("k", "bob", "notEquals").matches(&text("alice")));
        assert!(FilterEntry::new("k", "LIC", "contains").matches(&text("Alice")));
        assert!(FilterEntry::new("k", "x", "notContains").matches(&text("Alice")));
        assert!(FilterEntry::new("k", "al", "startsWith").matches(&text("Alice")));
        assert!(FilterEntry::new("k", "CE", "endsWith").matches(&text("Alice")));
        assert!(!FilterEntry::new("k", "z", "startsWith").matches(&text("Alice")));
    }

    #[test]
    fn text_operators_stringify_cells() {
        assert!(FilterEntry::new("k", "TRUE", "equals").matches(&Value::Bool(true)));
        assert!(FilterEntry::new("k", "42", "equals").matches(&Value::Number(Number::I64(42))));
        assert!(FilterEntry::new("k", "", "contains").matches(&Value::None));
    }

    #[test]
    fn numeric_operators() {
        let cell = Value::Number(Number::I64(10));
        assert!(FilterEntry::new("k", "5", "greaterThan").matches(&cell));
        assert!(!FilterEntry::new("k", "10", "greaterThan").matches(&cell));
        assert!(FilterEntry::new("k", "10", "greaterThanOrEqual").matches(&cell));
        assert!(FilterEntry::new("k", "11", "lessThan").matches(&cell));
        assert!(FilterEntry::new("k", "10", "lessThanOrEqual").matches(&cell));
        assert!(FilterEntry::new("k", " 9.5 ", "greaterThan").matches(&text("10")));
    }

    #[test]
    fn nan_never_compares() {
        assert!(!FilterEntry::new("k", "5", "greaterThan").matches(&text("abc")));
        assert!(!FilterEntry::new("k", "5", "lessThan").matches(&text("abc")));
        assert!(!FilterEntry::new("k", "abc", "lessThanOrEqual").matches(&text("3")));
        assert!(!FilterEntry::new("k", "5", "greaterThan").matches(&Value::None));
    }

    #[test]
    fn between_is_inclusive() {
        let filter = FilterEntry::new("k", ["10", "20"], "between");
        assert!(filter.matches(&Value::from(10i64)));
        assert!(filter.matches(&Value::from(20i64)));
        assert!(filter.matches(&Value::from(15.5f64)));
        assert!(!filter.matches(&Value::from(21i64)));
        assert!(!filter.matches(&text("n/a")));
    }

    #[test]
    fn between_with_wrong_shape_passes() {
        assert!(FilterEntry::new("k", "10", "between").matches(&Value::from(99i64)));
        assert!(FilterEntry::new("k", ["1", "2", "3"], "between").matches(&Value::from(99i64)));
    }

    #[test]
    fn in_list_membership() {
        let filter = FilterEntry::new("k", ["Active", "pending"], "inList");
        assert!(filter.matches(&text("active")));
        assert!(filter.matches(&text("PENDING")));
        assert!(!filter.matches(&text("closed")));
        assert!(FilterEntry::new("k", "active", "inList").matches(&text("closed")));
    }

    #[test]
    fn unknown_operator_fails_open() {
        assert!(FilterEntry::new("k", "x", "soundsLike").matches(&text("y")));
    }

    #[test]
    fn state_keeps_one_entry_per_column() {
        let mut state = FilterState::new();
        assert!(state.set(FilterEntry::new("name", "a", "contains")));
        assert!(state.set(FilterEntry::new("name", "b", "equals")));
        assert_eq!(state.len(), 1);
        assert_eq!(state.get("name").unwrap().value, FilterValue::from("b"));
        assert_eq!(state.get("name").unwrap().operator, FilterOperator::Equals);
        assert!(!state.set(FilterEntry::new("name", "b", "equals")));
    }

    #[test]
    fn blank_value_removes_entry() {
        let mut state = FilterState::new();
        state.set(FilterEntry::new("name", "a", "contains"));
        assert!(state.set(FilterEntry::new("name", "   ", "contains")));
        assert!(state.is_empty());
        assert!(!state.set(FilterEntry::new("name", "", "contains")));
    }

    #[test]
    fn apply_filtering_ands_columns() {
        let rows = [("ann", 30i64), ("bob", 40), ("anna", 50)];
        let filters = [
            FilterEntry::new("name", "an", "startsWith"),
            FilterEntry::new("age", "35", "greaterThan"),
        ];
        let kept = apply_filtering(&[0usize, 1, 2], &filters, |i, key| match key {
            "name" => Value::from(rows[i].0),
            "age" => Value::from(rows[i].1),
            _ => Value::None,
        });
        assert_eq!(kept, vec![2]);
    }
}
