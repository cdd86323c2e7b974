//! The query pipeline behind every `select` of a [`super::Table`].
//!
//! A query runs in three eager stages:
//! - filter: keep the source rows matching the predicate
//! - order: stable sort of the survivors by one column
//! - project: copy the requested cells into a [`ResultCursor`]
//!
//! Until the projection the reader only borrows the table's rows, so nothing
//! is copied that the query throws away.

use log::trace;

use super::cursor::ResultCursor;
use super::error::{Result, TableError};
use super::order::{Direction, OrderSpec};
use super::row::Row;
use super::schema::Schema;

pub struct TableReader<'a> {
    schema: &'a Schema,
    rows: Vec<&'a Row>,
}

impl<'a> TableReader<'a> {
    pub(super) fn new(schema: &'a Schema, rows: &'a [Row]) -> TableReader<'a> {
        TableReader {
            schema,
            rows: rows.iter().collect(),
        }
    }

    pub fn count_rows(&self) -> usize {
        self.rows.len()
    }

    pub fn filter<F>(self, filter: F) -> TableReader<'a>
    where
        F: Fn(&Row) -> bool,
    {
        //! Keep only the rows matching the filter criteria.

        let before = self.rows.len();
        let rows: Vec<&Row> = self.rows.into_iter().filter(|&row| filter(row)).collect();
        trace!("filter kept {} of {} rows", rows.len(), before);

        TableReader {
            schema: self.schema,
            rows,
        }
    }

    pub fn order_by(mut self, order: &OrderSpec) -> Result<TableReader<'a>> {
        //! Stable sort of the current rows by the column of `order`.

        sort_rows(self.schema, &mut self.rows, order)?;
        Ok(self)
    }

    pub fn project(self, columns: &[&str]) -> Result<ResultCursor> {
        //! Copy the requested columns, in the requested order, into a new
        //! [`ResultCursor`].

        let indices = resolve_columns(self.schema, columns)?;
        trace!("projecting {:?} over {} rows", columns, self.rows.len());

        let cells = self
            .rows
            .iter()
            .map(|row| {
                indices
                    .iter()
                    .map(|&index| row.at(index).cloned())
                    .collect::<Result<Vec<_>>>()
            })
            .collect::<Result<Vec<_>>>()?;

        ResultCursor::new(columns.iter().map(|name| name.to_string()).collect(), cells)
    }

    pub fn all(self) -> Result<ResultCursor> {
        //! Project every column of the table.

        let cells = self.rows.iter().map(|row| row.field_values()).collect();
        ResultCursor::new(self.schema.names(), cells)
    }
}

pub(super) fn resolve_columns(schema: &Schema, columns: &[&str]) -> Result<Vec<usize>> {
    //! Map projected column names to schema positions.
    //!
    //! The list must be non-empty, known to the schema and free of repeats.

    if columns.is_empty() {
        return Err(TableError::InvalidArgument(
            "no columns defined in the select method".to_string(),
        ));
    }

    let mut indices: Vec<usize> = Vec::with_capacity(columns.len());
    for column in columns {
        let (index, _) = schema.column(column)?;
        if indices.contains(&index) {
            return Err(TableError::DuplicateColumn(column.to_string()));
        }
        indices.push(index);
    }
    Ok(indices)
}

pub(super) fn sort_rows<R>(schema: &Schema, rows: &mut [R], order: &OrderSpec) -> Result<()>
where
    R: AsRef<Row>,
{
    //! Stable sort by the natural ordering of one column.
    //!
    //! Fails when `order` is unset, names an unknown column, or when two of
    //! the column's values can not be compared.

    if order.is_unset() {
        return Err(TableError::MissingOrderSpec);
    }
    let (index, _) = schema.column(order.column())?;

    let keys = rows
        .iter()
        .map(|row| row.as_ref().at(index).map(|cell| cell.value()))
        .collect::<Result<Vec<_>>>()?;
    let reference = keys.iter().find(|value| !value.is_null());
    if let Some(reference) = reference {
        let incomparable = keys
            .iter()
            .any(|value| value.compare(value).is_none() || value.compare(reference).is_none());
        if incomparable {
            return Err(TableError::NotComparable(order.column().to_string()));
        }
    }

    // every pair of keys is comparable past this point
    rows.sort_by(|a, b| {
        let ordering = match (a.as_ref().at(index), b.as_ref().at(index)) {
            (Ok(a), Ok(b)) => a.value().compare(b.value()),
            _ => None,
        }
        .unwrap_or(std::cmp::Ordering::Equal);

        match order.direction() {
            Direction::Ascending => ordering,
            Direction::Descending => ordering.reverse(),
        }
    });

    trace!("sorted {} rows: {}", rows.len(), order);
    Ok(())
}
