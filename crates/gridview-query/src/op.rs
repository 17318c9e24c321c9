//! Filter operators and column filter types.
//!
//! [`FilterOperator`] names how a filter value is compared against a cell.
//! Names follow the camelCase vocabulary used in filter definitions
//! (`equals`, `greaterThanOrEqual`, `inList`, ...). Unrecognized names are
//! kept as [`FilterOperator::Other`] rather than rejected, and such filters
//! let every row through.

use std::cmp::Ordering;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{QueryError, Result};

/// Comparison operator for a filter entry.
///
/// Grouped by how they read the cell:
/// - **Text** (case-insensitive): `Equals`, `NotEquals`, `Contains`,
///   `NotContains`, `StartsWith`, `EndsWith`
/// - **Numeric**: `GreaterThan`, `LessThan`, `GreaterThanOrEqual`,
///   `LessThanOrEqual`, `Between`
/// - **List**: `InList`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum FilterOperator {
    Equals,
    NotEquals,
    Contains,
    NotContains,
    StartsWith,
    EndsWith,
    GreaterThan,
    LessThan,
    GreaterThanOrEqual,
    LessThanOrEqual,
    /// Inclusive numeric range; the filter value must be a two-element list.
    Between,
    /// Case-insensitive membership; the filter value must be a list.
    InList,
    /// Unrecognized operator name, kept verbatim.
    Other(String),
}

impl FilterOperator {
    /// Every recognized operator, in menu order.
    pub const ALL: [FilterOperator; 12] = [
        FilterOperator::Equals,
        FilterOperator::NotEquals,
        FilterOperator::Contains,
        FilterOperator::NotContains,
        FilterOperator::StartsWith,
        FilterOperator::EndsWith,
        FilterOperator::GreaterThan,
        FilterOperator::LessThan,
        FilterOperator::GreaterThanOrEqual,
        FilterOperator::LessThanOrEqual,
        FilterOperator::Between,
        FilterOperator::InList,
    ];

    /// Parses an operator name, rejecting unknown names.
    pub fn parse_strict(name: &str) -> Result<Self> {
        match FilterOperator::from(name) {
            FilterOperator::Other(name) => Err(QueryError::UnknownOperator(name)),
            op => Ok(op),
        }
    }

    /// Returns `true` if this operator coerces both sides to numbers.
    pub fn is_numeric(&self) -> bool {
        matches!(
            self,
            FilterOperator::GreaterThan
                | FilterOperator::LessThan
                | FilterOperator::GreaterThanOrEqual
                | FilterOperator::LessThanOrEqual
                | FilterOperator::Between
        )
    }

    /// Returns `true` if this operator expects a list value.
    pub fn expects_list(&self) -> bool {
        matches!(self, FilterOperator::Between | FilterOperator::InList)
    }

    /// Evaluates an ordering-based operator. Non-ordering operators yield `false`.
    pub fn eval_ordering(&self, ordering: Ordering) -> bool {
        match self {
            FilterOperator::GreaterThan => ordering == Ordering::Greater,
            FilterOperator::LessThan => ordering == Ordering::Less,
            FilterOperator::GreaterThanOrEqual => ordering != Ordering::Less,
            FilterOperator::LessThanOrEqual => ordering != Ordering::Greater,
            _ => false,
        }
    }

    /// Returns the wire name of this operator.
    pub fn as_str(&self) -> &str {
        match self {
            FilterOperator::Equals => "equals",
            FilterOperator::NotEquals => "notEquals",
            FilterOperator::Contains => "contains",
            FilterOperator::NotContains => "notContains",
            FilterOperator::StartsWith => "startsWith",
            FilterOperator::EndsWith => "endsWith",
            FilterOperator::GreaterThan => "greaterThan",
            FilterOperator::LessThan => "lessThan",
            FilterOperator::GreaterThanOrEqual => "greaterThanOrEqual",
            FilterOperator::LessThanOrEqual => "lessThanOrEqual",
            FilterOperator::Between => "between",
            FilterOperator::InList => "inList",
            FilterOperator::Other(name) => name,
        }
    }
}

impl From<&str> for FilterOperator {
    fn from(name: &str) -> Self {
        match name {
            "equals" => FilterOperator::Equals,
            "notEquals" => FilterOperator::NotEquals,
            "contains" => FilterOperator::Contains,
            "notContains" => FilterOperator::NotContains,
            "startsWith" => FilterOperator::StartsWith,
            "endsWith" => FilterOperator::EndsWith,
            "greaterThan" => FilterOperator::GreaterThan,
            "lessThan" => FilterOperator::LessThan,
            "greaterThanOrEqual" => FilterOperator::GreaterThanOrEqual,
            "lessThanOrEqual" => FilterOperator::LessThanOrEqual,
            "between" => FilterOperator::Between,
            "inList" => FilterOperator::InList,
            other => FilterOperator::Other(other.to_string()),
        }
    }
}

impl From<String> for FilterOperator {
    fn from(name: String) -> Self {
        FilterOperator::from(name.as_str())
    }
}

impl From<FilterOperator> for String {
    fn from(op: FilterOperator) -> Self {
        op.as_str().to_string()
    }
}

impl fmt::Display for FilterOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Kind of filter input a column offers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FilterType {
    #[default]
    Text,
    Number,
    Date,
    Select,
    Boolean,
}

impl FilterType {
    /// Operator applied to free-text filter input for this column type.
    pub fn default_operator(self) -> FilterOperator {
        match self {
            FilterType::Text => FilterOperator::Contains,
            FilterType::Number | FilterType::Date | FilterType::Select | FilterType::Boolean => {
                FilterOperator::Equals
            }
        }
    }

    /// Operators offered for this column type.
    pub fn operators(self) -> Vec<FilterOperator> {
        use FilterOperator as Op;
        match self {
            FilterType::Text => vec![
                Op::Contains,
                Op::NotContains,
                Op::Equals,
                Op::NotEquals,
                Op::StartsWith,
                Op::EndsWith,
                Op::InList,
            ],
            FilterType::Number | FilterType::Date => vec![
                Op::Equals,
                Op::NotEquals,
                Op::GreaterThan,
                Op::LessThan,
                Op::GreaterThanOrEqual,
                Op::LessThanOrEqual,
                Op::Between,
            ],
            FilterType::Select => vec![Op::Equals, Op::NotEquals, Op::InList],
            FilterType::Boolean => vec![Op::Equals, Op::NotEquals],
        }
    }
}

/// Operators offered for a filter type.
pub fn operators_for(filter_type: FilterType) -> Vec<FilterOperator> {
    filter_type.operators()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_round_trip() {
        for op in FilterOperator::ALL {
            assert_eq!(FilterOperator::from(op.as_str()), op);
        }
    }

    #[test]
    fn unknown_names_are_kept() {
        let op = FilterOperator::from("fuzzy");
        assert_eq!(op, FilterOperator::Other("fuzzy".into()));
        assert_eq!(op.to_string(), "fuzzy");
        assert_eq!(
            FilterOperator::parse_strict("fuzzy"),
            Err(QueryError::UnknownOperator("fuzzy".into()))
        );
        assert_eq!(
            FilterOperator::parse_strict("between"),
            Ok(FilterOperator::Between)
        );
    }

    #[test]
    fn eval_ordering() {
        assert!(FilterOperator::GreaterThan.eval_ordering(Ordering::Greater));
        assert!(!FilterOperator::GreaterThan.eval_ordering(Ordering::Equal));
        assert!(FilterOperator::GreaterThanOrEqual.eval_ordering(Ordering::Equal));
        assert!(FilterOperator::LessThanOrEqual.eval_ordering(Ordering::Less));
        assert!(!FilterOperator::LessThan.eval_ordering(Ordering::Greater));
        assert!(!FilterOperator::Equals.eval_ordering(Ordering::Equal));
    }

    #[test]
    fn serde_uses_wire_names() {
        let json = serde_json::to_string(&FilterOperator::GreaterThanOrEqual).unwrap();
        assert_eq!(json, "\"greaterThanOrEqual\"");
        let op: FilterOperator = serde_json::from_str("\"notContains\"").unwrap();
        assert_eq!(op, FilterOperator::NotContains);
    }

    #[test]
    fn filter_type_defaults() {
        assert_eq!(FilterType::Text.default_operator(), FilterOperator::Contains);
        assert_eq!(FilterType::Number.default_operator(), FilterOperator::Equals);
        assert!(operators_for(FilterType::Number).contains(&FilterOperator::Between));
        assert!(!operators_for(FilterType::Boolean).contains(&FilterOperator::Contains));
    }
}
