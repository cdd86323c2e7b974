use std::fmt::Display;

use super::cell::Cell;
use super::error::{Result, TableError};
use super::value::{DataType, Value};

#[derive(Debug, Clone, PartialEq)]
pub struct ColumnInformation {
    pub(super) datatype: DataType,
    pub(super) default: Value,
}

impl ColumnInformation {
    pub fn from(datatype: DataType, default: Value) -> ColumnInformation {
        ColumnInformation { datatype, default }
    }

    pub fn datatype(&self) -> DataType {
        self.datatype
    }

    pub fn default(&self) -> &Value {
        &self.default
    }

    pub fn default_cell(&self) -> Cell {
        Cell::new(self.default.clone())
    }
}

/// The ordered column descriptors of a [`super::Table`].
///
/// A column's position here is its position in every row of the table.
#[derive(Debug, Clone, Default)]
pub struct Schema(Vec<(String, ColumnInformation)>);

impl Schema {
    pub fn new(schema: Vec<(String, ColumnInformation)>) -> Schema {
        //! Create a schema from a vector of column names and its associated
        //! [`ColumnInformation`]s

        Schema(schema)
    }

    pub fn get(&self, index: usize) -> Option<&(String, ColumnInformation)> {
        //! Get schema column name and its information at the `index`.

        self.0.get(index)
    }

    pub fn get_vec(&self) -> &Vec<(String, ColumnInformation)> {
        //! Get the 0 attribute as a read-only reference.

        self.0.as_ref()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn names(&self) -> Vec<String> {
        self.0.iter().map(|(name, _)| name.clone()).collect()
    }

    pub fn position(&self, column_name: &str) -> Option<usize> {
        self.0.iter().position(|(name, _)| name == column_name)
    }

    pub fn contains(&self, column_name: &str) -> bool {
        self.position(column_name).is_some()
    }

    pub fn column(&self, column_name: &str) -> Result<(usize, &ColumnInformation)> {
        //! Find a column by name.
        //!
        //! Returns its position alongside its information.

        self.0
            .iter()
            .enumerate()
            .find_map(|(index, (name, info))| (name == column_name).then_some((index, info)))
            .ok_or_else(|| TableError::ColumnNotFound(column_name.to_string()))
    }

    pub fn validate(&self, index: usize, value: &Value) -> Result<()> {
        //! Check that `value` may be stored in the column at `index`: either
        //! the null sentinel or a value of the column's declared type.

        let (name, info) = self.0.get(index).ok_or(TableError::IndexOutOfRange {
            index,
            len: self.len(),
        })?;

        match value.datatype() {
            Some(found) if found != info.datatype => Err(TableError::TypeMismatch {
                column: name.clone(),
                expected: info.datatype,
                found,
            }),
            _ => Ok(()),
        }
    }

    pub(super) fn push(&mut self, name: String, info: ColumnInformation) {
        self.0.push((name, info));
    }

    pub(super) fn remove(&mut self, index: usize) -> (String, ColumnInformation) {
        self.0.remove(index)
    }
}

impl Display for Schema {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let schema: Vec<String> = self
            .0
            .iter()
            .map(|(col, info)| format!("{} ({})", col.as_str(), info.datatype))
            .collect();
        write!(f, "{}", schema.join(" | "))
    }
}
