use std::fmt::Display;

use super::cell::Cell;
use super::error::{Result, TableError};
use super::value::Value;

/// A frozen, forward-only snapshot of a query's output.
///
/// The cursor owns copies of the cells it was built from, so it never sees
/// later changes to the source table and can be handed to another thread.
///
/// Positions run from before-first, over every row, to after-last.
/// [`ResultCursor::read`] moves one step forward and reports whether a row is
/// now current. It never wraps around.
#[derive(Debug, Clone, PartialEq)]
pub struct ResultCursor {
    columns: Vec<String>,
    rows: Vec<Vec<Cell>>,
    // -1 is before-first, rows.len() is after-last
    position: isize,
}

impl ResultCursor {
    pub fn new(columns: Vec<String>, rows: Vec<Vec<Cell>>) -> Result<ResultCursor> {
        if columns.is_empty() {
            return Err(TableError::InvalidArgument(
                "a result needs at least one column".to_string(),
            ));
        }
        if let Some(row) = rows.iter().find(|row| row.len() != columns.len()) {
            return Err(TableError::InconsistentArguments(format!(
                "result row has {} cells for {} columns",
                row.len(),
                columns.len()
            )));
        }

        Ok(ResultCursor {
            columns,
            rows,
            position: -1,
        })
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn column_names(&self) -> &[String] {
        &self.columns
    }

    pub fn current_index(&self) -> isize {
        self.position
    }

    pub fn position(&self) -> Option<usize> {
        //! The current row, if the cursor stands on one.

        usize::try_from(self.position)
            .ok()
            .filter(|&index| index < self.rows.len())
    }

    pub fn read(&mut self) -> bool {
        if self.position < self.rows.len() as isize {
            self.position += 1;
        }
        self.position().is_some()
    }

    pub fn reset(&mut self) {
        self.position = -1;
    }

    fn _current_row(&self) -> Result<&Vec<Cell>> {
        self.position()
            .map(|index| &self.rows[index])
            .ok_or(TableError::NoCurrentRow)
    }

    pub fn get(&self, column_name: &str) -> Result<&Cell> {
        let row = self._current_row()?;
        let index = self
            .columns
            .iter()
            .position(|name| name == column_name)
            .ok_or_else(|| TableError::ColumnNotFound(column_name.to_string()))?;
        Ok(&row[index])
    }

    pub fn at(&self, column_index: usize) -> Result<&Cell> {
        let row = self._current_row()?;
        row.get(column_index).ok_or(TableError::IndexOutOfRange {
            index: column_index,
            len: self.columns.len(),
        })
    }

    pub fn current_row_cells(&self) -> Result<Vec<Cell>> {
        self._current_row().cloned()
    }

    pub fn current_row_values(&self) -> Result<Vec<Value>> {
        let row = self._current_row()?;
        Ok(row.iter().map(|cell| cell.value().clone()).collect())
    }

    pub fn rows(&self) -> &[Vec<Cell>] {
        //! The whole snapshot, independent of the cursor position.

        &self.rows
    }

    pub fn summary(&self) -> String {
        format!(
            "Result: Columns = {}, Rows = {}",
            self.column_count(),
            self.row_count()
        )
    }

    pub fn to_json(&self) -> serde_json::Value {
        //! Export the snapshot as `{"columns": [...], "rows": [[...], ...]}`.

        let rows: Vec<serde_json::Value> = self
            .rows
            .iter()
            .map(|row| row.iter().map(|cell| cell.value().to_json()).collect())
            .collect();

        serde_json::json!({
            "columns": self.columns,
            "rows": rows,
        })
    }
}

impl Display for ResultCursor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let rows: Vec<String> = self
            .rows
            .iter()
            .map(|row| {
                row.iter()
                    .map(|cell| match cell.is_null() {
                        true => "NIL".to_string(),
                        false => cell.to_string(),
                    })
                    .collect::<Vec<String>>()
                    .join(" | ")
            })
            .collect();

        writeln!(f, "{}\n{}", self.columns.join(" | "), rows.join("\n"))
    }
}
