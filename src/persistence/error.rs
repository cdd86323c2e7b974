//! Every failure the persistence engine can report.
//!
//! The variants are kinds, not call sites: the same [`TableError::ColumnNotFound`]
//! comes back from a projection, an update or an ordering request. The message
//! carries the offending name or index so the shell can print it as-is.

use thiserror::Error;

use super::value::DataType;

pub type Result<T> = std::result::Result<T, TableError>;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum TableError {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("invalid value: {0}")]
    InvalidValue(String),

    #[error("invalid column name '{0}': names can not be empty")]
    InvalidColumnName(String),

    #[error("duplicate column '{0}': already exists")]
    DuplicateColumn(String),

    #[error("duplicate field '{0}': already exists in the row")]
    DuplicateField(String),

    #[error("invalid column '{0}': does not exist")]
    ColumnNotFound(String),

    #[error("invalid field '{0}': does not exist in the row")]
    FieldNotFound(String),

    #[error("field conflict on '{0}': joined rows must not share field names")]
    FieldConflict(String),

    #[error("out of bound; index {index} with length {len}")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("invalid value for column '{column}': expected {expected}, found {found}")]
    TypeMismatch {
        column: String,
        expected: DataType,
        found: DataType,
    },

    #[error("inconsistent arguments: {0}")]
    InconsistentArguments(String),

    #[error("missing predicate: a filter condition has not been defined")]
    MissingPredicate,

    #[error("missing order: no ordering configuration has been defined")]
    MissingOrderSpec,

    #[error("not comparable: values of column '{0}' have no ordering")]
    NotComparable(String),

    #[error("invalid sort result: expected {expected} rows, found {found}")]
    InvalidSortResult { expected: usize, found: usize },

    #[error("empty table: no columns defined in the table")]
    EmptyTable,

    #[error("conversion error: can not convert {from} '{value}' to {to}")]
    ConversionError {
        from: String,
        value: String,
        to: &'static str,
    },

    #[error("no current row: the cursor is not positioned on a row")]
    NoCurrentRow,

    #[error("invalid table '{0}': does not exist")]
    TableNotFound(String),

    #[error("integrity violation; table '{0}' already exists")]
    DuplicateTable(String),
}
