//! Error types for the query crate.

use thiserror::Error;

/// Errors raised when parsing query vocabulary from text.
///
/// Evaluation itself never fails: unknown operators are carried through as
/// [`FilterOperator::Other`](crate::FilterOperator::Other) and pass every row.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum QueryError {
    /// Sort direction was neither `asc` nor `desc`.
    #[error("unknown sort direction '{0}', expected 'asc' or 'desc'")]
    UnknownDirection(String),

    /// Operator name is not one of the recognized filter operators.
    #[error("unknown filter operator '{0}'")]
    UnknownOperator(String),
}

/// Result type for query operations.
pub type Result<T> = std::result::Result<T, QueryError>;
