//! Computed columns: values derived from a row through ordered rules.
//!
//! A [`ComputedColumnDefinition`] holds a list of [`ColumnCondition`]s. The
//! value of the column for a row is the `then_value` of the first condition
//! that holds; when none does, the definition's `default_value` is used,
//! falling back to the first condition's `else_value` when the default is
//! empty.
//!
//! Definitions are created and edited through [`ComputedColumnEditor`], which
//! works on a draft copy until saved.

use std::fmt;

use gridview_layout::ColumnSpec;
use gridview_query::{parse_number, Record, Value};
use serde::{Deserialize, Serialize};

use crate::error::{Result, TableError};

/// Prefix of keys assigned to new computed columns.
pub const COMPUTED_KEY_PREFIX: &str = "computed_";

/// Comparison used by a computed-column condition.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ConditionOperator {
    Equals,
    NotEquals,
    Contains,
    NotContains,
    GreaterThan,
    LessThan,
    GreaterThanOrEqual,
    LessThanOrEqual,
    IsEmpty,
    IsNotEmpty,
    /// Unrecognized operator name. Never holds.
    Other(String),
}

impl ConditionOperator {
    pub fn as_str(&self) -> &str {
        match self {
            ConditionOperator::Equals => "equals",
            ConditionOperator::NotEquals => "notEquals",
            ConditionOperator::Contains => "contains",
            ConditionOperator::NotContains => "notContains",
            ConditionOperator::GreaterThan => "greaterThan",
            ConditionOperator::LessThan => "lessThan",
            ConditionOperator::GreaterThanOrEqual => "greaterThanOrEqual",
            ConditionOperator::LessThanOrEqual => "lessThanOrEqual",
            ConditionOperator::IsEmpty => "isEmpty",
            ConditionOperator::IsNotEmpty => "isNotEmpty",
            ConditionOperator::Other(name) => name,
        }
    }

    /// Returns `true` if the operator ignores the compare value.
    pub fn is_unary(&self) -> bool {
        matches!(self, ConditionOperator::IsEmpty | ConditionOperator::IsNotEmpty)
    }
}

impl From<&str> for ConditionOperator {
    fn from(name: &str) -> Self {
        match name {
            "equals" => ConditionOperator::Equals,
            "notEquals" => ConditionOperator::NotEquals,
            "contains" => ConditionOperator::Contains,
            "notContains" => ConditionOperator::NotContains,
            "greaterThan" => ConditionOperator::GreaterThan,
            "lessThan" => ConditionOperator::LessThan,
            "greaterThanOrEqual" => ConditionOperator::GreaterThanOrEqual,
            "lessThanOrEqual" => ConditionOperator::LessThanOrEqual,
            "isEmpty" => ConditionOperator::IsEmpty,
            "isNotEmpty" => ConditionOperator::IsNotEmpty,
            other => ConditionOperator::Other(other.to_string()),
        }
    }
}

impl From<String> for ConditionOperator {
    fn from(name: String) -> Self {
        ConditionOperator::from(name.as_str())
    }
}

impl From<ConditionOperator> for String {
    fn from(op: ConditionOperator) -> Self {
        op.as_str().to_string()
    }
}

impl fmt::Display for ConditionOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One rule of a computed column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColumnCondition {
    /// Raw field the rule reads.
    pub source_column: String,
    pub operator: ConditionOperator,
    #[serde(default)]
    pub compare_value: String,
    /// Value of the column when the rule holds.
    #[serde(default)]
    pub then_value: String,
    /// Fallback used when no rule holds and the default is empty.
    #[serde(default)]
    pub else_value: String,
}

impl ColumnCondition {
    pub fn new(
        source_column: impl Into<String>,
        operator: impl Into<ConditionOperator>,
        compare_value: impl Into<String>,
        then_value: impl Into<String>,
    ) -> Self {
        ColumnCondition {
            source_column: source_column.into(),
            operator: operator.into(),
            compare_value: compare_value.into(),
            then_value: then_value.into(),
            else_value: String::new(),
        }
    }

    pub fn with_else(mut self, else_value: impl Into<String>) -> Self {
        self.else_value = else_value.into();
        self
    }

    /// Tests the rule against a source cell.
    ///
    /// Text comparisons are case-insensitive on the stringified cell.
    /// Ordering comparisons cast both sides to numbers and fail on `NaN`.
    pub fn holds(&self, cell: &Value<'_>) -> bool {
        let text = || cell.to_text().to_lowercase();
        let expected = || self.compare_value.to_lowercase();
        let numeric = |test: fn(f64, f64) -> bool| {
            let (left, right) = (cell.to_number(), parse_number(&self.compare_value));
            !left.is_nan() && !right.is_nan() && test(left, right)
        };
        match &self.operator {
            ConditionOperator::Equals => text() == expected(),
            ConditionOperator::NotEquals => text() != expected(),
            ConditionOperator::Contains => text().contains(&expected()),
            ConditionOperator::NotContains => !text().contains(&expected()),
            ConditionOperator::GreaterThan => numeric(|a, b| a > b),
            ConditionOperator::LessThan => numeric(|a, b| a < b),
            ConditionOperator::GreaterThanOrEqual => numeric(|a, b| a >= b),
            ConditionOperator::LessThanOrEqual => numeric(|a, b| a <= b),
            ConditionOperator::IsEmpty => cell.is_empty(),
            ConditionOperator::IsNotEmpty => !cell.is_empty(),
            ConditionOperator::Other(_) => false,
        }
    }
}

/// A column whose values come from rules over other fields.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComputedColumnDefinition {
    pub key: String,
    pub title: String,
    #[serde(default)]
    pub conditions: Vec<ColumnCondition>,
    #[serde(default)]
    pub default_value: String,
}

impl ComputedColumnDefinition {
    /// Evaluates the column for one row. Rules read raw fields only.
    pub fn evaluate<R: Record + ?Sized>(&self, row: &R) -> String {
        compute_column_value(row, self)
    }

    /// Column declaration for the layout.
    pub fn to_spec(&self) -> ColumnSpec {
        ColumnSpec::new(self.key.clone())
            .title(self.title.clone())
            .computed()
    }
}

/// Value of a computed column for a row.
///
/// ```rust
/// use gridview::{compute_column_value, ColumnCondition, ComputedColumnDefinition};
/// use serde_json::json;
///
/// let status = ComputedColumnDefinition {
///     key: "computed_1".into(),
///     title: "Status".into(),
///     conditions: vec![ColumnCondition::new("status", "equals", "true", "Active")],
///     default_value: "Inactive".into(),
/// };
/// assert_eq!(compute_column_value(&json!({"status": true}), &status), "Active");
/// assert_eq!(compute_column_value(&json!({"status": false}), &status), "Inactive");
/// ```
pub fn compute_column_value<R: Record + ?Sized>(
    row: &R,
    definition: &ComputedColumnDefinition,
) -> String {
    let matched = definition
        .conditions
        .iter()
        .find(|condition| condition.holds(&row.field(&condition.source_column)));
    if let Some(condition) = matched {
        return condition.then_value.clone();
    }
    if !definition.default_value.is_empty() {
        return definition.default_value.clone();
    }
    definition
        .conditions
        .first()
        .map(|condition| condition.else_value.clone())
        .unwrap_or_default()
}

/// Saved computed-column definitions, in creation order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ComputedColumns {
    definitions: Vec<ComputedColumnDefinition>,
    next_id: u64,
}

impl ComputedColumns {
    pub fn new() -> Self {
        ComputedColumns::default()
    }

    pub fn get(&self, key: &str) -> Option<&ComputedColumnDefinition> {
        self.definitions.iter().find(|d| d.key == key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ComputedColumnDefinition> {
        self.definitions.iter()
    }

    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }

    /// Declarations for every definition, in creation order.
    pub fn specs(&self) -> Vec<ColumnSpec> {
        self.definitions.iter().map(|d| d.to_spec()).collect()
    }

    /// Stores a new definition under a fresh `computed_<n>` key. Keys in
    /// `reserved` (the base column keys) are skipped.
    pub fn insert(
        &mut self,
        mut definition: ComputedColumnDefinition,
        reserved: &[&str],
    ) -> String {
        loop {
            self.next_id += 1;
            let key = format!("{COMPUTED_KEY_PREFIX}{}", self.next_id);
            if !self.contains(&key) && !reserved.contains(&key.as_str()) {
                definition.key = key;
                break;
            }
        }
        let key = definition.key.clone();
        self.definitions.push(definition);
        key
    }

    /// Replaces the definition stored under `definition.key`, keeping its
    /// position.
    pub fn replace(&mut self, definition: ComputedColumnDefinition) -> Result<()> {
        let slot = self
            .definitions
            .iter_mut()
            .find(|d| d.key == definition.key)
            .ok_or_else(|| TableError::UnknownComputedColumn(definition.key.clone()))?;
        *slot = definition;
        Ok(())
    }

    pub fn remove(&mut self, key: &str) -> Option<ComputedColumnDefinition> {
        let index = self.definitions.iter().position(|d| d.key == key)?;
        Some(self.definitions.remove(index))
    }

    /// Removes every definition. Key numbering keeps counting.
    pub fn clear(&mut self) -> bool {
        let changed = !self.definitions.is_empty();
        self.definitions.clear();
        changed
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Draft {
    /// Key of the definition being edited, `None` for a new one.
    editing: Option<String>,
    definition: ComputedColumnDefinition,
}

/// Modal editor for computed columns.
///
/// `open_new` / `open_edit` start a session on a draft copy; the stored
/// definitions change only on a successful [`save`](Self::save).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ComputedColumnEditor {
    draft: Option<Draft>,
}

impl ComputedColumnEditor {
    pub fn new() -> Self {
        ComputedColumnEditor::default()
    }

    pub fn is_open(&self) -> bool {
        self.draft.is_some()
    }

    /// Key of the definition being edited, `None` when creating or closed.
    pub fn editing(&self) -> Option<&str> {
        self.draft.as_ref().and_then(|d| d.editing.as_deref())
    }

    /// The draft being edited.
    pub fn draft(&self) -> Option<&ComputedColumnDefinition> {
        self.draft.as_ref().map(|d| &d.definition)
    }

    /// Starts a new definition with one empty condition. Discards any open
    /// draft.
    pub fn open_new(&mut self) {
        self.draft = Some(Draft {
            editing: None,
            definition: ComputedColumnDefinition {
                conditions: vec![ColumnCondition::new("", ConditionOperator::Equals, "", "")],
                ..Default::default()
            },
        });
    }

    /// Starts editing a copy of an existing definition.
    pub fn open_edit(&mut self, columns: &ComputedColumns, key: &str) -> Result<()> {
        let definition = columns
            .get(key)
            .ok_or_else(|| TableError::UnknownComputedColumn(key.to_string()))?
            .clone();
        self.draft = Some(Draft {
            editing: Some(key.to_string()),
            definition,
        });
        Ok(())
    }

    fn draft_mut(&mut self) -> Result<&mut ComputedColumnDefinition> {
        self.draft
            .as_mut()
            .map(|d| &mut d.definition)
            .ok_or(TableError::EditorClosed)
    }

    pub fn set_title(&mut self, title: impl Into<String>) -> Result<()> {
        self.draft_mut()?.title = title.into();
        Ok(())
    }

    pub fn set_default_value(&mut self, value: impl Into<String>) -> Result<()> {
        self.draft_mut()?.default_value = value.into();
        Ok(())
    }

    pub fn add_condition(&mut self, condition: ColumnCondition) -> Result<()> {
        self.draft_mut()?.conditions.push(condition);
        Ok(())
    }

    /// Replaces a condition. Out-of-range indices are ignored.
    pub fn update_condition(&mut self, index: usize, condition: ColumnCondition) -> Result<()> {
        if let Some(slot) = self.draft_mut()?.conditions.get_mut(index) {
            *slot = condition;
        }
        Ok(())
    }

    /// Removes a condition. Out-of-range indices are ignored.
    pub fn remove_condition(&mut self, index: usize) -> Result<()> {
        let conditions = &mut self.draft_mut()?.conditions;
        if index < conditions.len() {
            conditions.remove(index);
        }
        Ok(())
    }

    /// Validates the draft and stores it, closing the editor. A new column
    /// never takes a key listed in `reserved`.
    ///
    /// Returns the key of the saved definition.
    ///
    /// # Errors
    ///
    /// - [`TableError::EditorClosed`] if no session is open
    /// - [`TableError::BlankComputedTitle`] if the title is blank; the
    ///   editor stays open with the draft intact
    /// - [`TableError::UnknownComputedColumn`] if the edited definition was
    ///   removed meanwhile
    pub fn save(&mut self, columns: &mut ComputedColumns, reserved: &[&str]) -> Result<String> {
        let draft = self.draft.as_ref().ok_or(TableError::EditorClosed)?;
        if draft.definition.title.trim().is_empty() {
            return Err(TableError::BlankComputedTitle);
        }
        let mut definition = draft.definition.clone();
        definition.title = definition.title.trim().to_string();
        let key = match &draft.editing {
            Some(key) => {
                definition.key = key.clone();
                columns.replace(definition)?;
                key.clone()
            }
            None => columns.insert(definition, reserved),
        };
        self.draft = None;
        Ok(key)
    }

    /// Closes the editor, discarding the draft.
    pub fn cancel(&mut self) -> bool {
        self.draft.take().is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn status_column() -> ComputedColumnDefinition {
        ComputedColumnDefinition {
            key: "computed_1".into(),
            title: "State".into(),
            conditions: vec![ColumnCondition::new("status", "equals", "true", "Active")],
            default_value: "Inactive".into(),
        }
    }

    #[test]
    fn boolean_source_is_compared_as_text() {
        let def = status_column();
        assert_eq!(def.evaluate(&json!({"status": true})), "Active");
        assert_eq!(def.evaluate(&json!({"status": "TRUE"})), "Active");
        assert_eq!(def.evaluate(&json!({"status": false})), "Inactive");
        assert_eq!(def.evaluate(&json!({})), "Inactive");
    }

    #[test]
    fn first_matching_condition_wins() {
        let def = ComputedColumnDefinition {
            conditions: vec![
                ColumnCondition::new("age", "greaterThanOrEqual", "65", "Senior"),
                ColumnCondition::new("age", "greaterThanOrEqual", "18", "Adult"),
            ],
            default_value: "Minor".into(),
            ..Default::default()
        };
        assert_eq!(def.evaluate(&json!({"age": 70})), "Senior");
        assert_eq!(def.evaluate(&json!({"age": "30"})), "Adult");
        assert_eq!(def.evaluate(&json!({"age": 3})), "Minor");
        assert_eq!(def.evaluate(&json!({"age": "n/a"})), "Minor");
    }

    #[test]
    fn else_value_backs_up_empty_default() {
        let def = ComputedColumnDefinition {
            conditions: vec![ColumnCondition::new("x", "equals", "1", "one").with_else("other")],
            ..Default::default()
        };
        assert_eq!(def.evaluate(&json!({"x": 2})), "other");
        let bare = ComputedColumnDefinition::default();
        assert_eq!(bare.evaluate(&json!({"x": 2})), "");
    }

    #[test]
    fn operator_semantics() {
        let cell = Value::from("Hello World");
        assert!(ColumnCondition::new("k", "contains", "WORLD", "").holds(&cell));
        assert!(ColumnCondition::new("k", "notContains", "moon", "").holds(&cell));
        assert!(ColumnCondition::new("k", "notEquals", "hello", "").holds(&cell));
        assert!(ColumnCondition::new("k", "isNotEmpty", "", "").holds(&cell));
        assert!(ColumnCondition::new("k", "isEmpty", "", "").holds(&Value::None));
        assert!(ColumnCondition::new("k", "isEmpty", "", "").holds(&Value::from("")));
        assert!(ColumnCondition::new("k", "lessThan", "10", "").holds(&Value::from(9i64)));
        assert!(!ColumnCondition::new("k", "lessThan", "", "").holds(&Value::from(9i64)));
        assert!(!ColumnCondition::new("k", "matches", "x", "").holds(&cell));
    }

    #[test]
    fn operator_names_round_trip() {
        let condition: ColumnCondition = serde_json::from_value(json!({
            "sourceColumn": "a",
            "operator": "isNotEmpty",
            "thenValue": "yes"
        }))
        .unwrap();
        assert_eq!(condition.operator, ConditionOperator::IsNotEmpty);
        assert!(condition.operator.is_unary());
        assert_eq!(
            serde_json::to_value(&condition).unwrap()["operator"],
            "isNotEmpty"
        );
    }

    #[test]
    fn editor_creates_with_fresh_keys() {
        let mut columns = ComputedColumns::new();
        let mut editor = ComputedColumnEditor::new();

        editor.open_new();
        editor.set_title("  Band ").unwrap();
        assert_eq!(editor.save(&mut columns, &[]).unwrap(), "computed_1");
        assert!(!editor.is_open());

        editor.open_new();
        editor.set_title("Other").unwrap();
        assert_eq!(editor.save(&mut columns, &[]).unwrap(), "computed_2");
        assert_eq!(columns.get("computed_1").unwrap().title, "Band");

        columns.remove("computed_2");
        editor.open_new();
        editor.set_title("Third").unwrap();
        assert_eq!(editor.save(&mut columns, &[]).unwrap(), "computed_3");
    }

    #[test]
    fn new_keys_skip_reserved_column_keys() {
        let mut columns = ComputedColumns::new();
        let mut editor = ComputedColumnEditor::new();
        editor.open_new();
        editor.set_title("Band").unwrap();
        let key = editor
            .save(&mut columns, &["id", "computed_1", "computed_2"])
            .unwrap();
        assert_eq!(key, "computed_3");
        assert!(!columns.contains("computed_1"));
    }

    #[test]
    fn blank_title_keeps_editor_open() {
        let mut columns = ComputedColumns::new();
        let mut editor = ComputedColumnEditor::new();
        editor.open_new();
        editor.set_title("   ").unwrap();
        assert!(matches!(
            editor.save(&mut columns, &[]),
            Err(TableError::BlankComputedTitle)
        ));
        assert!(editor.is_open());
        assert!(columns.is_empty());
    }

    #[test]
    fn edit_works_on_a_copy() {
        let mut columns = ComputedColumns::new();
        let key = columns.insert(status_column(), &[]);
        let mut editor = ComputedColumnEditor::new();

        editor.open_edit(&columns, &key).unwrap();
        assert_eq!(editor.editing(), Some(key.as_str()));
        editor.set_default_value("Unknown").unwrap();
        assert_eq!(columns.get(&key).unwrap().default_value, "Inactive");
        assert!(editor.cancel());
        assert_eq!(columns.get(&key).unwrap().default_value, "Inactive");

        editor.open_edit(&columns, &key).unwrap();
        editor.remove_condition(0).unwrap();
        editor
            .add_condition(ColumnCondition::new("status", "equals", "false", "Off"))
            .unwrap();
        editor
            .update_condition(0, ColumnCondition::new("status", "equals", "false", "Down"))
            .unwrap();
        assert_eq!(editor.save(&mut columns, &[]).unwrap(), key);
        let saved = columns.get(&key).unwrap();
        assert_eq!(saved.conditions.len(), 1);
        assert_eq!(saved.conditions[0].then_value, "Down");
    }

    #[test]
    fn closed_editor_rejects_edits() {
        let mut editor = ComputedColumnEditor::new();
        assert!(matches!(editor.set_title("x"), Err(TableError::EditorClosed)));
        assert!(matches!(
            editor.save(&mut ComputedColumns::new(), &[]),
            Err(TableError::EditorClosed)
        ));
        assert!(matches!(
            editor.open_edit(&ComputedColumns::new(), "computed_9"),
            Err(TableError::UnknownComputedColumn(_))
        ));
        assert!(!editor.cancel());
    }

    #[test]
    fn specs_are_marked_computed() {
        let mut columns = ComputedColumns::new();
        columns.insert(status_column(), &[]);
        let specs = columns.specs();
        assert_eq!(specs.len(), 1);
        assert!(specs[0].is_computed);
        assert_eq!(specs[0].title.as_deref(), Some("State"));
    }
}
