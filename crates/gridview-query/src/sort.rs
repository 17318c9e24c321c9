//! Multi-key sorting.
//!
//! Provides [`SortDirection`], [`SortEntry`], the default cell comparator
//! [`compare_values`], the engine [`apply_sorting`], and [`SortState`], which
//! turns header clicks into an ordered list of sort entries.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use deunicode::deunicode;
use serde::{Deserialize, Serialize};

use crate::error::QueryError;
use crate::value::Value;

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    /// Smallest first.
    #[default]
    Asc,
    /// Largest first.
    Desc,
}

impl SortDirection {
    /// Applies this direction to an ordering.
    pub fn apply(self, ordering: Ordering) -> Ordering {
        match self {
            SortDirection::Asc => ordering,
            SortDirection::Desc => ordering.reverse(),
        }
    }

    /// Returns the opposite direction.
    pub fn reversed(self) -> Self {
        match self {
            SortDirection::Asc => SortDirection::Desc,
            SortDirection::Desc => SortDirection::Asc,
        }
    }

    /// Returns the display name of this direction.
    pub fn as_str(self) -> &'static str {
        match self {
            SortDirection::Asc => "asc",
            SortDirection::Desc => "desc",
        }
    }
}

impl fmt::Display for SortDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for SortDirection {
    type Err = QueryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "asc" => Ok(SortDirection::Asc),
            "desc" => Ok(SortDirection::Desc),
            _ => Err(QueryError::UnknownDirection(s.to_string())),
        }
    }
}

/// One active sort key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortEntry {
    /// Column key to sort by.
    pub key: String,
    /// Sort direction.
    pub direction: SortDirection,
    /// 1-based priority; lower sorts first.
    pub order: usize,
}

impl SortEntry {
    /// Creates a new sort entry.
    pub fn new(key: impl Into<String>, direction: SortDirection, order: usize) -> Self {
        SortEntry {
            key: key.into(),
            direction,
            order,
        }
    }
}

/// Default comparator for cell values. Direction-agnostic and total, so
/// columns mixing value kinds still sort.
///
/// - values of the same kind compare naturally: numbers arithmetically
///   (`NaN` after every number), timestamps chronologically, `false` before
///   `true`, text by [`locale_compare`]
/// - mixed kinds order as numbers, timestamps, booleans, text
/// - `None` sorts after every defined value
pub fn compare_values(a: &Value<'_>, b: &Value<'_>) -> Ordering {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => x.total_cmp(*y),
        (Value::Timestamp(x), Value::Timestamp(y)) => x.cmp(y),
        (Value::Bool(x), Value::Bool(y)) => x.cmp(y),
        (Value::Text(x), Value::Text(y)) => locale_compare(x, y),
        _ => kind_rank(a).cmp(&kind_rank(b)),
    }
}

fn kind_rank(value: &Value<'_>) -> u8 {
    match value {
        Value::Number(_) => 0,
        Value::Timestamp(_) => 1,
        Value::Bool(_) => 2,
        Value::Text(_) => 3,
        Value::None => 4,
    }
}

/// Compares text the way a reader expects: accents and case are folded for
/// the primary comparison, raw text breaks ties.
pub fn locale_compare(a: &str, b: &str) -> Ordering {
    let folded_a = deunicode(a).to_lowercase();
    let folded_b = deunicode(b).to_lowercase();
    folded_a.cmp(&folded_b).then_with(|| a.cmp(b))
}

/// Compares two items by a list of sort entries already ordered by priority.
///
/// `custom` returns `Some` for columns with their own comparator; that result
/// is used as-is since custom comparators handle direction themselves.
/// Otherwise [`compare_values`] runs and `desc` reverses its result.
pub fn compare_by_sorts<'r, I, F, C>(
    a: I,
    b: I,
    sorts: &[SortEntry],
    accessor: &F,
    custom: &C,
) -> Ordering
where
    I: Copy,
    F: Fn(I, &str) -> Value<'r>,
    C: Fn(&str, I, I, SortDirection) -> Option<Ordering>,
{
    for entry in sorts {
        let ordering = match custom(&entry.key, a, b, entry.direction) {
            Some(ordering) => ordering,
            None => {
                let left = accessor(a, &entry.key);
                let right = accessor(b, &entry.key);
                entry.direction.apply(compare_values(&left, &right))
            }
        };
        if ordering != Ordering::Equal {
            return ordering;
        }
    }
    Ordering::Equal
}

/// Returns the items ordered by the active sort entries.
///
/// Entries apply in ascending `order`. The sort is stable, so items tying on
/// every key keep their input order.
pub fn apply_sorting<'r, I, F, C>(
    items: &[I],
    sorts: &[SortEntry],
    accessor: F,
    custom: C,
) -> Vec<I>
where
    I: Copy,
    F: Fn(I, &str) -> Value<'r>,
    C: Fn(&str, I, I, SortDirection) -> Option<Ordering>,
{
    let mut sorted = items.to_vec();
    if sorts.is_empty() {
        return sorted;
    }
    let mut ordered = sorts.to_vec();
    ordered.sort_by_key(|entry| entry.order);
    sorted.sort_by(|a, b| compare_by_sorts(*a, *b, &ordered, &accessor, &custom));
    sorted
}

/// Sort entries driven by header clicks.
///
/// Entries are kept ordered by priority with dense 1-based `order` values.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SortState {
    entries: Vec<SortEntry>,
}

impl SortState {
    /// Creates an empty sort state.
    pub fn new() -> Self {
        SortState::default()
    }

    /// Handles a click on a sortable header.
    ///
    /// A plain click cycles the clicked key asc → desc → unsorted and drops
    /// every other key. With `multi`, only the clicked key moves: it is
    /// appended as ascending, flipped to descending, then removed, and the
    /// remaining priorities are compacted.
    pub fn click(&mut self, key: &str, multi: bool) {
        if multi {
            self.cycle_in_place(key);
        } else {
            self.cycle_single(key);
        }
    }

    fn cycle_single(&mut self, key: &str) {
        let next = match self.direction_of(key) {
            None => Some(SortDirection::Asc),
            Some(SortDirection::Asc) => Some(SortDirection::Desc),
            Some(SortDirection::Desc) => None,
        };
        self.entries.clear();
        if let Some(direction) = next {
            self.entries.push(SortEntry::new(key, direction, 1));
        }
    }

    fn cycle_in_place(&mut self, key: &str) {
        match self.entries.iter().position(|e| e.key == key) {
            None => {
                let order = self.entries.len() + 1;
                self.entries.push(SortEntry::new(key, SortDirection::Asc, order));
            }
            Some(index) if self.entries[index].direction == SortDirection::Asc => {
                self.entries[index].direction = SortDirection::Desc;
            }
            Some(index) => {
                self.entries.remove(index);
                self.compact();
            }
        }
    }

    /// Replaces the entries, dropping duplicate keys and renumbering
    /// priorities densely in their relative `order`.
    pub fn set(&mut self, entries: Vec<SortEntry>) {
        let mut entries = entries;
        entries.sort_by_key(|e| e.order);
        let mut seen = std::collections::HashSet::new();
        entries.retain(|e| seen.insert(e.key.clone()));
        self.entries = entries;
        self.compact();
    }

    /// Removes the entry for a key. Returns `true` if one was present.
    pub fn remove(&mut self, key: &str) -> bool {
        let before = self.entries.len();
        self.entries.retain(|e| e.key != key);
        let changed = self.entries.len() != before;
        if changed {
            self.compact();
        }
        changed
    }

    /// Removes every entry. Returns `true` if any were present.
    pub fn clear(&mut self) -> bool {
        let changed = !self.entries.is_empty();
        self.entries.clear();
        changed
    }

    fn compact(&mut self) {
        self.entries.sort_by_key(|e| e.order);
        for (index, entry) in self.entries.iter_mut().enumerate() {
            entry.order = index + 1;
        }
    }

    /// Direction of a key, if it is sorted.
    pub fn direction_of(&self, key: &str) -> Option<SortDirection> {
        self.entries
            .iter()
            .find(|e| e.key == key)
            .map(|e| e.direction)
    }

    /// 1-based priority of a key, if it is sorted.
    pub fn priority_of(&self, key: &str) -> Option<usize> {
        self.entries.iter().find(|e| e.key == key).map(|e| e.order)
    }

    /// Active entries in priority order.
    pub fn entries(&self) -> &[SortEntry] {
        &self.entries
    }

    /// Returns `true` if nothing is sorted.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::{Number, Timestamp};

    fn no_custom(_: &str, _: usize, _: usize, _: SortDirection) -> Option<Ordering> {
        None
    }

    #[test]
    fn direction_apply() {
        assert_eq!(SortDirection::Asc.apply(Ordering::Less), Ordering::Less);
        assert_eq!(SortDirection::Desc.apply(Ordering::Less), Ordering::Greater);
        assert_eq!(SortDirection::Desc.apply(Ordering::Equal), Ordering::Equal);
    }

    #[test]
    fn direction_parse() {
        assert_eq!("DESC".parse::<SortDirection>(), Ok(SortDirection::Desc));
        assert_eq!(
            "up".parse::<SortDirection>(),
            Err(QueryError::UnknownDirection("up".into()))
        );
    }

    #[test]
    fn none_sorts_last() {
        let some = Value::from("x");
        assert_eq!(compare_values(&Value::None, &some), Ordering::Greater);
        assert_eq!(compare_values(&some, &Value::None), Ordering::Less);
        assert_eq!(compare_values(&Value::None, &Value::None), Ordering::Equal);
        assert_eq!(
            compare_values(&Value::None, &Value::Number(Number::I64(-5))),
            Ordering::Greater
        );
    }

    #[test]
    fn numbers_and_timestamps() {
        assert_eq!(
            compare_values(&Value::from(2i64), &Value::from(10i64)),
            Ordering::Less
        );
        assert_eq!(
            compare_values(&Value::from(2.5f64), &Value::from(2i64)),
            Ordering::Greater
        );
        assert_eq!(
            compare_values(&Value::from(f64::NAN), &Value::from(1i64)),
            Ordering::Greater
        );
        assert_eq!(
            compare_values(&Value::from(-0.0f64), &Value::from(0i64)),
            Ordering::Equal
        );
        assert_eq!(
            compare_values(
                &Value::from(u64::MAX as f64),
                &Value::Number(Number::U64(u64::MAX))
            ),
            Ordering::Greater
        );
        assert_eq!(
            compare_values(
                &Value::Timestamp(Timestamp(5)),
                &Value::Timestamp(Timestamp(3))
            ),
            Ordering::Greater
        );
    }

    #[test]
    fn mixed_kinds_rank_by_kind() {
        let nine = Value::from(9i64);
        let ten = Value::from(10i64);
        let five = Value::from("5");
        assert_eq!(compare_values(&nine, &ten), Ordering::Less);
        assert_eq!(compare_values(&ten, &five), Ordering::Less);
        assert_eq!(compare_values(&nine, &five), Ordering::Less);
        assert_eq!(compare_values(&Value::Bool(true), &five), Ordering::Less);
        assert_eq!(
            compare_values(&Value::Timestamp(Timestamp(0)), &Value::Bool(false)),
            Ordering::Less
        );
        assert_eq!(compare_values(&Value::Bool(false), &Value::Bool(true)), Ordering::Less);
    }

    #[test]
    fn text_folds_case_and_accents() {
        assert_eq!(locale_compare("apple", "Banana"), Ordering::Less);
        assert_eq!(locale_compare("éclair", "fudge"), Ordering::Less);
        assert_eq!(locale_compare("same", "same"), Ordering::Equal);
        assert_ne!(locale_compare("a", "A"), Ordering::Equal);
    }

    #[test]
    fn multi_key_tie_break() {
        let rows = [("b", 1i64), ("a", 2), ("a", 1)];
        let accessor = |i: usize, key: &str| match key {
            "name" => Value::from(rows[i].0),
            _ => Value::from(rows[i].1),
        };
        let sorts = [
            SortEntry::new("n", SortDirection::Desc, 2),
            SortEntry::new("name", SortDirection::Asc, 1),
        ];
        let sorted = apply_sorting(&[0usize, 1, 2], &sorts, accessor, no_custom);
        assert_eq!(sorted, vec![1, 2, 0]);
    }

    #[test]
    fn stable_when_all_keys_tie() {
        let sorts = [SortEntry::new("k", SortDirection::Asc, 1)];
        let sorted = apply_sorting(&[3usize, 1, 2], &sorts, |_, _| Value::from(1i64), no_custom);
        assert_eq!(sorted, vec![3, 1, 2]);
    }

    #[test]
    fn custom_comparator_owns_direction() {
        let values = [3i64, 1, 2];
        let sorts = [SortEntry::new("k", SortDirection::Desc, 1)];
        // Ignores direction on purpose: result stays ascending.
        let custom = |_: &str, a: usize, b: usize, _: SortDirection| Some(values[a].cmp(&values[b]));
        let sorted = apply_sorting(&[0usize, 1, 2], &sorts, |_, _| Value::None, custom);
        assert_eq!(sorted, vec![1, 2, 0]);
    }

    #[test]
    fn plain_click_cycles() {
        let mut state = SortState::new();
        state.click("name", false);
        assert_eq!(state.direction_of("name"), Some(SortDirection::Asc));
        state.click("name", false);
        assert_eq!(state.direction_of("name"), Some(SortDirection::Desc));
        state.click("name", false);
        assert!(state.is_empty());
    }

    #[test]
    fn plain_click_on_other_key_resets() {
        let mut state = SortState::new();
        state.click("name", false);
        state.click("name", false);
        state.click("age", false);
        assert_eq!(state.entries(), &[SortEntry::new("age", SortDirection::Asc, 1)]);
    }

    #[test]
    fn multi_click_compacts_priorities() {
        let mut state = SortState::new();
        state.click("a", true);
        state.click("b", true);
        state.click("c", true);
        assert_eq!(state.priority_of("c"), Some(3));

        state.click("a", true);
        assert_eq!(state.direction_of("a"), Some(SortDirection::Desc));
        assert_eq!(state.priority_of("a"), Some(1));

        state.click("a", true);
        assert_eq!(state.direction_of("a"), None);
        assert_eq!(
            state.entries(),
            &[
                SortEntry::new("b", SortDirection::Asc, 1),
                SortEntry::new("c", SortDirection::Asc, 2),
            ]
        );
    }

    #[test]
    fn set_dedupes_and_renumbers() {
        let mut state = SortState::new();
        state.set(vec![
            SortEntry::new("b", SortDirection::Desc, 7),
            SortEntry::new("a", SortDirection::Asc, 3),
            SortEntry::new("a", SortDirection::Desc, 9),
        ]);
        assert_eq!(
            state.entries(),
            &[
                SortEntry::new("a", SortDirection::Asc, 1),
                SortEntry::new("b", SortDirection::Desc, 2),
            ]
        );
        assert!(state.remove("a"));
        assert_eq!(state.priority_of("b"), Some(1));
    }
}
