use std::fmt::Display;
use std::ops::Index;

use indexmap::IndexMap;

use super::cell::Cell;
use super::error::{Result, TableError};
use super::value::Value;

/// An ordered set of uniquely named [`Cell`]s.
///
/// The field order is the insertion order and positional access follows it.
/// Field names are case-sensitive. The name and value accessors hand out
/// copies, so callers can not reshape a stored row through them.
///
/// Rows that live inside a [`super::Table`] always carry exactly the table's
/// columns, in column order; the table rewrites every row on DDL.
#[derive(Debug, Clone, Default)]
pub struct Row {
    fields: IndexMap<String, Cell>,
}

impl Row {
    pub fn new(field_names: Vec<String>, field_values: Vec<Cell>) -> Result<Row> {
        //! Build a row from two position-aligned vectors.
        //!
        //! Fails when the lengths differ, or on an empty or repeated name.

        if field_names.len() != field_values.len() {
            return Err(TableError::InconsistentArguments(format!(
                "{} field names for {} values",
                field_names.len(),
                field_values.len()
            )));
        }

        let mut row = Row::default();
        for (name, cell) in field_names.into_iter().zip(field_values) {
            row.add(name, cell)?;
        }
        Ok(row)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn field_names(&self) -> Vec<String> {
        self.fields.keys().cloned().collect()
    }

    pub fn field_values(&self) -> Vec<Cell> {
        self.fields.values().cloned().collect()
    }

    pub fn get(&self, field_name: &str) -> Result<&Cell> {
        self.fields
            .get(field_name)
            .ok_or_else(|| TableError::FieldNotFound(field_name.to_string()))
    }

    pub fn at(&self, index: usize) -> Result<&Cell> {
        self.fields
            .get_index(index)
            .map(|(_, cell)| cell)
            .ok_or(TableError::IndexOutOfRange {
                index,
                len: self.len(),
            })
    }

    pub(crate) fn get_mut(&mut self, field_name: &str) -> Result<&mut Cell> {
        self.fields
            .get_mut(field_name)
            .ok_or_else(|| TableError::FieldNotFound(field_name.to_string()))
    }

    pub fn add(&mut self, field_name: impl Into<String>, cell: Cell) -> Result<()> {
        //! Append a new field at the end of the row.

        let field_name = field_name.into();
        if field_name.is_empty() {
            return Err(TableError::InvalidArgument(
                "field names can not be empty".to_string(),
            ));
        }
        if self.fields.contains_key(&field_name) {
            return Err(TableError::DuplicateField(field_name));
        }

        self.fields.insert(field_name, cell);
        Ok(())
    }

    pub fn remove(&mut self, field_name: &str) -> bool {
        //! Remove a field, keeping the relative order of the others.
        //!
        //! Returns whether the field existed.

        self.fields.shift_remove(field_name).is_some()
    }

    pub fn join(&self, other: &Row) -> Result<Row> {
        //! Concatenate two rows into a new one, `self` first.
        //!
        //! The field sets must be disjoint.

        if let Some(shared) = self.fields.keys().find(|name| other.contains_field(name)) {
            return Err(TableError::FieldConflict(shared.clone()));
        }

        let mut joined = self.clone();
        joined
            .fields
            .extend(other.fields.iter().map(|(name, cell)| (name.clone(), cell.clone())));
        Ok(joined)
    }

    pub fn contains_field(&self, field_name: &str) -> bool {
        self.fields.contains_key(field_name)
    }

    pub fn contains_value(&self, value: &Value) -> bool {
        self.fields.values().any(|cell| cell == value)
    }

    pub fn get_cells(&self, field_names: &[&str]) -> Result<Vec<Cell>> {
        //! Copy the named cells, in the requested order.

        if field_names.is_empty() {
            return Err(TableError::InvalidArgument(
                "the field names can not be empty".to_string(),
            ));
        }

        field_names
            .iter()
            .map(|name| self.get(name).cloned())
            .collect()
    }

    pub fn get_filtered_row(&self, field_names: &[&str]) -> Result<Row> {
        let cells = self.get_cells(field_names)?;
        Row::new(field_names.iter().map(|name| name.to_string()).collect(), cells)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Cell)> {
        self.fields.iter().map(|(name, cell)| (name.as_str(), cell))
    }

    pub fn for_each<F>(&self, mut iteration: F)
    where
        F: FnMut(&str, &Cell),
    {
        self.iter().for_each(|(name, cell)| iteration(name, cell));
    }

    pub fn for_each_field_name<F>(&self, iteration: F)
    where
        F: FnMut(&String),
    {
        self.fields.keys().for_each(iteration);
    }

    pub fn for_each_cell<F>(&self, iteration: F)
    where
        F: FnMut(&Cell),
    {
        self.fields.values().for_each(iteration);
    }

    pub fn for_each_value<F>(&self, mut iteration: F)
    where
        F: FnMut(&Value),
    {
        self.fields.values().for_each(|cell| iteration(cell.value()));
    }

    pub fn clear(&mut self) {
        self.fields.clear();
    }
}

impl PartialEq for Row {
    fn eq(&self, other: &Self) -> bool {
        self.fields.iter().eq(other.fields.iter())
    }
}

impl AsRef<Row> for Row {
    fn as_ref(&self) -> &Row {
        self
    }
}

/// Panicking lookup by field name, handy inside filter closures.
impl Index<&str> for Row {
    type Output = Cell;

    fn index(&self, field_name: &str) -> &Self::Output {
        match self.get(field_name) {
            Ok(cell) => cell,
            Err(error) => panic!("{}", error),
        }
    }
}

impl Index<usize> for Row {
    type Output = Cell;

    fn index(&self, index: usize) -> &Self::Output {
        match self.at(index) {
            Ok(cell) => cell,
            Err(error) => panic!("{}", error),
        }
    }
}

impl Display for Row {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let row: Vec<String> = self
            .fields
            .values()
            .map(|cell| match cell.is_null() {
                true => "NIL".to_string(),
                false => cell.to_string(),
            })
            .collect();
        write!(f, "{}", row.join(" | "))
    }
}
