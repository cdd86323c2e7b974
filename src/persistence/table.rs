use std::fmt::Display;

use log::{debug, warn};

use super::cell::Cell;
use super::cursor::ResultCursor;
use super::error::{Result, TableError};
use super::order::OrderSpec;
use super::reader::{TableReader, resolve_columns, sort_rows};
use super::row::Row;
use super::schema::{ColumnInformation, Schema};
use super::value::{DataType, Value};

/// A row predicate, as taken by the filtered DML and query operations.
///
/// The operations take an `Option` of it and reject [`None`] with
/// [`TableError::MissingPredicate`].
pub type RowFilter<'a> = &'a dyn Fn(&Row) -> bool;

/// A typed column schema and the rows stored under it.
///
/// Every row carries exactly the table's current columns, in column order,
/// and every cell holds either the null sentinel or a value of its column's
/// declared type. Column DDL rewrites all rows to keep that true.
///
/// The table has no locking of its own. Share it behind one exclusive guard,
/// see [`super::Catalog`].
///
/// # Issues
/// - Lookups by column name are linear scans over the schema. Tables here are
///   expected to be narrow.
#[derive(Debug, Clone, Default)]
pub struct Table {
    schema: Schema,
    rows: Vec<Row>,
}

impl Table {
    pub fn new() -> Table {
        Table::default()
    }

    fn _require_columns(&self) -> Result<()> {
        if self.schema.is_empty() {
            Err(TableError::EmptyTable)
        } else {
            Ok(())
        }
    }

    fn _check_row_index(&self, row_index: usize) -> Result<()> {
        if row_index < self.rows.len() {
            Ok(())
        } else {
            Err(TableError::IndexOutOfRange {
                index: row_index,
                len: self.rows.len(),
            })
        }
    }

    fn _check_new_column(&self, column_name: &str) -> Result<()> {
        if column_name.is_empty() {
            return Err(TableError::InvalidColumnName(column_name.to_string()));
        }
        if self.schema.contains(column_name) {
            return Err(TableError::DuplicateColumn(column_name.to_string()));
        }
        Ok(())
    }

    fn _build_row(&self, mut cells: Vec<Option<Value>>) -> Result<Row> {
        //! Materialize a row in column order. Missing values take the
        //! column default, supplied ones are type checked.

        cells.resize(self.schema.len(), None);
        let mut row = Row::default();

        for (index, ((name, info), value)) in self.schema.get_vec().iter().zip(cells).enumerate() {
            let cell = match value {
                Some(value) => {
                    self.schema.validate(index, &value)?;
                    Cell::new(value)
                }
                None => info.default_cell(),
            };
            row.add(name.clone(), cell)?;
        }
        Ok(row)
    }

    fn _assignments(&self, column_names: &[&str], values: Vec<Value>) -> Result<Vec<(String, Value)>> {
        //! Validate a whole update list against the schema before any row is
        //! touched.

        if column_names.len() != values.len() {
            return Err(TableError::InconsistentArguments(format!(
                "{} column names for {} values",
                column_names.len(),
                values.len()
            )));
        }

        column_names
            .iter()
            .zip(values)
            .map(|(name, value)| {
                let (index, _) = self.schema.column(name)?;
                self.schema.validate(index, &value)?;
                Ok((name.to_string(), value))
            })
            .collect()
    }

    fn _apply(row: &mut Row, assignments: &[(String, Value)]) -> Result<()> {
        for (name, value) in assignments {
            row.get_mut(name)?.set_value(value.clone());
        }
        Ok(())
    }

    // --- schema and row access ---

    pub fn column_count(&self) -> usize {
        self.schema.len()
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    pub fn column_names(&self) -> Vec<String> {
        self.schema.names()
    }

    pub fn column_type(&self, column_name: &str) -> Result<DataType> {
        let (_, info) = self.schema.column(column_name)?;
        Ok(info.datatype())
    }

    pub fn last_index(&self) -> Option<usize> {
        self.rows.len().checked_sub(1)
    }

    pub fn first(&self) -> Option<&Row> {
        self.rows.first()
    }

    pub fn last(&self) -> Option<&Row> {
        self.rows.last()
    }

    pub fn row(&self, row_index: usize) -> Result<&Row> {
        self._check_row_index(row_index)?;
        Ok(&self.rows[row_index])
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Row> {
        self.rows.iter()
    }

    pub fn first_rows(&self, row_count: usize) -> Vec<Row> {
        //! Copies of at most `row_count` leading rows.

        self.rows.iter().take(row_count).cloned().collect()
    }

    pub fn for_each<F>(&self, mut iteration: F)
    where
        F: FnMut(usize, &Row),
    {
        self.rows
            .iter()
            .enumerate()
            .for_each(|(index, row)| iteration(index, row));
    }

    pub fn cell(&self, row_index: usize, column_index: usize) -> Result<&Cell> {
        self._check_row_index(row_index)?;
        self.rows[row_index].at(column_index)
    }

    pub fn cell_by_name(&self, row_index: usize, column_name: &str) -> Result<&Cell> {
        self._check_row_index(row_index)?;
        let (index, _) = self.schema.column(column_name)?;
        self.rows[row_index].at(index)
    }

    pub fn set_cell(&mut self, row_index: usize, column_name: &str, value: impl Into<Value>) -> Result<()> {
        //! Overwrite one cell after checking the value against the column type.

        self._check_row_index(row_index)?;
        let value = value.into();
        let (index, _) = self.schema.column(column_name)?;
        self.schema.validate(index, &value)?;

        self.rows[row_index].get_mut(column_name)?.set_value(value);
        Ok(())
    }

    // --- DDL ---

    pub fn create_column(&mut self, column_name: &str, default: impl Into<Value>) -> Result<()> {
        //! Add a column whose type is the type of `default`.
        //!
        //! The null sentinel carries no type, so it is refused here. Use
        //! [`Table::create_typed_column`] for a column defaulting to null.

        self._check_new_column(column_name)?;
        let default = default.into();
        let datatype = default.datatype().ok_or_else(|| {
            TableError::InvalidValue(format!(
                "the default value of column '{}' can not be null",
                column_name
            ))
        })?;
        self.create_typed_column(column_name, datatype, default)
    }

    pub fn create_typed_column(
        &mut self,
        column_name: &str,
        datatype: DataType,
        default: impl Into<Value>,
    ) -> Result<()> {
        //! Add a column of an explicit type at the end of the schema.
        //!
        //! Every existing row receives the default at the new position.

        self._check_new_column(column_name)?;

        let default = default.into();
        if !default.fits(datatype) {
            return Err(TableError::TypeMismatch {
                column: column_name.to_string(),
                expected: datatype,
                // a non-fitting value always has a type
                found: default.datatype().unwrap_or(datatype),
            });
        }

        for row in self.rows.iter_mut() {
            row.add(column_name, Cell::new(default.clone()))?;
        }
        self.schema
            .push(column_name.to_string(), ColumnInformation::from(datatype, default));

        debug!(
            "created column '{}' ({}), {} rows extended",
            column_name,
            datatype,
            self.rows.len()
        );
        Ok(())
    }

    pub fn drop_column(&mut self, column_name: &str) -> Result<()> {
        //! Remove a column from the schema and from every row.

        self._require_columns()?;
        let (index, _) = self.schema.column(column_name)?;

        self.schema.remove(index);
        for row in self.rows.iter_mut() {
            row.remove(column_name);
        }

        debug!("dropped column '{}'", column_name);
        Ok(())
    }

    // --- DML ---

    pub fn insert(&mut self, values: Vec<Value>) -> Result<usize> {
        //! Positional insert aligned to the column order. Trailing columns
        //! without a value take their default.
        //!
        //! Returns the index of the new row.

        self._require_columns()?;
        if values.len() > self.schema.len() {
            return Err(TableError::InconsistentArguments(format!(
                "{} values for {} columns",
                values.len(),
                self.schema.len()
            )));
        }

        let row = self._build_row(values.into_iter().map(Some).collect())?;
        self.rows.push(row);

        debug!("inserted row {}", self.rows.len() - 1);
        Ok(self.rows.len() - 1)
    }

    pub fn insert_named(&mut self, column_names: &[&str], values: Vec<Value>) -> Result<usize> {
        //! Insert by column name. Columns that are not named take their
        //! default.
        //!
        //! Returns the index of the new row.

        self._require_columns()?;
        if column_names.len() != values.len() {
            return Err(TableError::InconsistentArguments(format!(
                "{} column names for {} values",
                column_names.len(),
                values.len()
            )));
        }

        let mut cells: Vec<Option<Value>> = vec![None; self.schema.len()];
        for (name, value) in column_names.iter().zip(values) {
            let (index, _) = self.schema.column(name)?;
            if cells[index].is_some() {
                return Err(TableError::DuplicateColumn(name.to_string()));
            }
            cells[index] = Some(value);
        }

        let row = self._build_row(cells)?;
        self.rows.push(row);

        debug!("inserted row {}", self.rows.len() - 1);
        Ok(self.rows.len() - 1)
    }

    pub fn delete_all(&mut self) -> Result<usize> {
        //! Clear the table.
        //!
        //! Returns the number of removed rows.

        self._require_columns()?;
        let deleted = self.rows.len();
        self.rows.clear();

        debug!("deleted all {} rows", deleted);
        Ok(deleted)
    }

    pub fn delete_where(&mut self, filter: Option<RowFilter>) -> Result<usize> {
        //! Remove every row matching `filter`.
        //!
        //! Returns the number of removed rows.

        self._require_columns()?;
        let filter = filter.ok_or(TableError::MissingPredicate)?;

        let before = self.rows.len();
        self.rows.retain(|row| !filter(row));
        let deleted = before - self.rows.len();

        debug!("deleted {} of {} rows by filter", deleted, before);
        Ok(deleted)
    }

    pub fn delete_at(&mut self, row_index: usize) -> Result<usize> {
        //! Remove one row by position.
        //!
        //! An index outside the table is not an error: nothing is removed and
        //! 0 is returned.

        self._require_columns()?;
        if row_index >= self.rows.len() {
            warn!(
                "delete of row {} ignored: table has {} rows",
                row_index,
                self.rows.len()
            );
            return Ok(0);
        }

        self.rows.remove(row_index);
        debug!("deleted row {}", row_index);
        Ok(1)
    }

    pub fn update_all(&mut self, column_names: &[&str], values: Vec<Value>) -> Result<usize> {
        //! Assign the values to the named columns of every row.
        //!
        //! The whole assignment list is checked before the first row changes,
        //! so an error leaves the table as it was.

        self._require_columns()?;
        let assignments = self._assignments(column_names, values)?;

        for row in self.rows.iter_mut() {
            Table::_apply(row, &assignments)?;
        }

        debug!("updated all {} rows", self.rows.len());
        Ok(self.rows.len())
    }

    pub fn update_where(
        &mut self,
        filter: Option<RowFilter>,
        column_names: &[&str],
        values: Vec<Value>,
    ) -> Result<usize> {
        //! Assign the values to the named columns of the rows matching
        //! `filter`. The filter sees the rows as they were before the update.
        //!
        //! Returns the number of updated rows.

        self._require_columns()?;
        let assignments = self._assignments(column_names, values)?;
        let filter = filter.ok_or(TableError::MissingPredicate)?;

        let matching: Vec<usize> = self
            .rows
            .iter()
            .enumerate()
            .filter(|(_, row)| filter(*row))
            .map(|(index, _)| index)
            .collect();

        for &index in matching.iter() {
            Table::_apply(&mut self.rows[index], &assignments)?;
        }

        debug!("updated {} rows by filter", matching.len());
        Ok(matching.len())
    }

    pub fn update_at(&mut self, row_index: usize, column_names: &[&str], values: Vec<Value>) -> Result<usize> {
        self._require_columns()?;
        let assignments = self._assignments(column_names, values)?;
        self._check_row_index(row_index)?;

        Table::_apply(&mut self.rows[row_index], &assignments)?;

        debug!("updated row {}", row_index);
        Ok(1)
    }

    // --- queries ---

    pub fn reader(&self) -> Result<TableReader<'_>> {
        //! Get a reader over the current rows to run a query pipeline.

        self._require_columns()?;
        Ok(TableReader::new(&self.schema, &self.rows))
    }

    fn _select(
        &self,
        filter: Option<RowFilter>,
        order: Option<&OrderSpec>,
        columns: Option<&[&str]>,
    ) -> Result<ResultCursor> {
        //! Validate everything up front, then run filter, order and
        //! projection in that order.

        let mut reader = self.reader()?;
        if let Some(columns) = columns {
            resolve_columns(&self.schema, columns)?;
        }
        if let Some(order) = order {
            if order.is_unset() {
                return Err(TableError::MissingOrderSpec);
            }
            self.schema.column(order.column())?;
        }

        if let Some(filter) = filter {
            reader = reader.filter(filter);
        }
        if let Some(order) = order {
            reader = reader.order_by(order)?;
        }

        let cursor = match columns {
            Some(columns) => reader.project(columns)?,
            None => reader.all()?,
        };
        debug!("query produced {}", cursor.summary());
        Ok(cursor)
    }

    pub fn select_all(&self) -> Result<ResultCursor> {
        self._select(None, None, None)
    }

    pub fn select_all_where(&self, filter: Option<RowFilter>) -> Result<ResultCursor> {
        let filter = filter.ok_or(TableError::MissingPredicate)?;
        self._select(Some(filter), None, None)
    }

    pub fn select_all_ordered(&self, order: &OrderSpec) -> Result<ResultCursor> {
        self._select(None, Some(order), None)
    }

    pub fn select_all_where_ordered(
        &self,
        filter: Option<RowFilter>,
        order: &OrderSpec,
    ) -> Result<ResultCursor> {
        let filter = filter.ok_or(TableError::MissingPredicate)?;
        self._select(Some(filter), Some(order), None)
    }

    pub fn select(&self, columns: &[&str]) -> Result<ResultCursor> {
        self._select(None, None, Some(columns))
    }

    pub fn select_where(&self, filter: Option<RowFilter>, columns: &[&str]) -> Result<ResultCursor> {
        let filter = filter.ok_or(TableError::MissingPredicate)?;
        self._select(Some(filter), None, Some(columns))
    }

    pub fn select_ordered(&self, order: &OrderSpec, columns: &[&str]) -> Result<ResultCursor> {
        self._select(None, Some(order), Some(columns))
    }

    pub fn select_where_ordered(
        &self,
        filter: Option<RowFilter>,
        order: &OrderSpec,
        columns: &[&str],
    ) -> Result<ResultCursor> {
        let filter = filter.ok_or(TableError::MissingPredicate)?;
        self._select(Some(filter), Some(order), Some(columns))
    }

    pub fn select_row(&self, row_index: usize, columns: &[&str]) -> Result<ResultCursor> {
        //! Project a single row.

        self._require_columns()?;
        let indices = resolve_columns(&self.schema, columns)?;
        self._check_row_index(row_index)?;

        let row = &self.rows[row_index];
        let cells = indices
            .iter()
            .map(|&index| row.at(index).cloned())
            .collect::<Result<Vec<_>>>()?;
        ResultCursor::new(columns.iter().map(|name| name.to_string()).collect(), vec![cells])
    }

    pub fn select_row_all(&self, row_index: usize) -> Result<ResultCursor> {
        self._require_columns()?;
        let names = self.schema.names();
        let columns: Vec<&str> = names.iter().map(String::as_str).collect();
        self.select_row(row_index, &columns)
    }

    // --- ordering and lookup ---

    pub fn order_by(&mut self, order: &OrderSpec) -> Result<()> {
        //! Permanently reorder the stored rows.
        //!
        //! Every check runs before the rows move, so a failure leaves the
        //! order untouched.

        sort_rows(&self.schema, &mut self.rows, order)?;
        debug!("table reordered: {}", order);
        Ok(())
    }

    pub fn custom_ordering<F>(&mut self, sort_fn: F) -> Result<()>
    where
        F: FnOnce(Vec<Row>) -> Vec<Row>,
    {
        //! Reorder the rows with a caller supplied function.
        //!
        //! The function receives copies of the rows and must give back the
        //! same number of rows, shaped like the table's columns and holding
        //! values of the column types. Tables with fewer than two rows are
        //! left alone.

        if self.rows.len() <= 1 {
            return Ok(());
        }

        let ordered = sort_fn(self.rows.clone());
        if ordered.len() != self.rows.len() {
            return Err(TableError::InvalidSortResult {
                expected: self.rows.len(),
                found: ordered.len(),
            });
        }

        let names = self.schema.names();
        if ordered.iter().any(|row| row.field_names() != names) {
            return Err(TableError::InconsistentArguments(
                "the sorted rows do not match the table columns".to_string(),
            ));
        }
        for row in ordered.iter() {
            for (index, cell) in row.field_values().iter().enumerate() {
                self.schema.validate(index, cell.value())?;
            }
        }

        self.rows = ordered;
        debug!("table reordered by a custom function");
        Ok(())
    }

    pub fn index_of<F>(&self, condition: F) -> Option<usize>
    where
        F: Fn(&Row) -> bool,
    {
        self.rows.iter().position(condition)
    }

    pub fn last_index_of<F>(&self, condition: F) -> Option<usize>
    where
        F: Fn(&Row) -> bool,
    {
        self.rows.iter().rposition(condition)
    }

    pub fn default_row(&self) -> Result<Row> {
        //! A row made of the column defaults. It is not inserted.

        self._require_columns()?;
        self._build_row(Vec::new())
    }

    pub fn default_row_with(&self, values: Vec<Value>) -> Result<Row> {
        //! A row made of `values`, positionally, with defaults for the
        //! missing trailing columns. It is not inserted.

        self._require_columns()?;
        if values.len() > self.schema.len() {
            return Err(TableError::InconsistentArguments(format!(
                "{} values for {} columns",
                values.len(),
                self.schema.len()
            )));
        }
        self._build_row(values.into_iter().map(Some).collect())
    }
}

impl<'a> IntoIterator for &'a Table {
    type Item = &'a Row;
    type IntoIter = std::slice::Iter<'a, Row>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.iter()
    }
}

impl Display for Table {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let rows: Vec<String> = self.rows.iter().map(|row| format!("{}", row)).collect();

        writeln!(f, "{}\n{}", self.schema, rows.join("\n"))
    }
}
