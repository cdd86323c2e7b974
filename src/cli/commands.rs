//! This module where all the shell commands are executed.
//!
//! Tabula command line syntax:
//!
//! - tabula --help | Command Line Help
//! - tabula client | Run the interactive shell.
//! - tabula demo   | Run a scripted session and exit.
//!
//! Once the user is inside the REPL, the command parser in
//! [`crate::cli::parsers`] takes over and hands a [`ShellCommand`] to the
//! [`CommandExecutor`].

use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use colored::Colorize;

use crate::cli::colors::TABULA_TEAL;
use crate::cli::messages::{highlight_argument, system_message};
use crate::cli::parsers::{DeleteTarget, ShellCommand};
use crate::persistence::{
    Cell, ResultCursor, Row, RowFilter, SharedTable, TableError, read_table, write_table,
};
use crate::sessions::session::Session;

/// The executor struct that runs the commands.
///
/// Every command needs an executor to be run. The executor takes the lock of
/// the table in focus for exactly as long as one table call lasts, so the
/// cursor it hands back is already detached from the table.
pub struct CommandExecutor {
    command: ShellCommand,
    session: Arc<RwLock<Session>>,
}

/// After a command completes, its result may need to be displayed on the
/// terminal.
///
/// Queries carry a [`ResultCursor`], DML commands the number of rows they
/// touched and everything else a short message.
#[derive(Default)]
pub struct CommandResult {
    pub cursor: Option<ResultCursor>,
    pub n_rows_processed: Option<usize>,
    pub message: Option<String>,
}

impl CommandResult {
    fn _message(message: String) -> CommandResult {
        CommandResult {
            message: Some(message),
            ..Default::default()
        }
    }

    fn _processed(n_rows: usize) -> CommandResult {
        CommandResult {
            n_rows_processed: Some(n_rows),
            ..Default::default()
        }
    }
}

fn _table_error(error: TableError) -> String {
    system_message("exctr", highlight_argument(&error.to_string()))
}

impl CommandExecutor {
    pub fn new(command: ShellCommand, session: &Arc<RwLock<Session>>) -> CommandExecutor {
        CommandExecutor {
            command,
            session: Arc::clone(session),
        }
    }

    fn _session(&self) -> RwLockReadGuard<'_, Session> {
        self.session.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn _session_mut(&self) -> RwLockWriteGuard<'_, Session> {
        self.session.write().unwrap_or_else(PoisonError::into_inner)
    }

    fn _active_table(&self) -> Result<SharedTable, String> {
        self._session().get_active_table().ok_or(system_message(
            "exctr",
            format!(
                "No table in focus. Try '{}' first.",
                highlight_argument("use <table>")
            ),
        ))
    }

    pub fn execute(&self) -> Result<CommandResult, String> {
        //! Run the assigned command and return whatever should be displayed.

        match &self.command {
            ShellCommand::Tables => {
                let session = self._session();
                let mut rows = Vec::new();
                for name in session.get_available_tables() {
                    let table = session.get_table(&name).map_err(_table_error)?;
                    let table = read_table(&table);
                    rows.push(vec![
                        Cell::new(name.as_str()),
                        Cell::new(table.column_count() as i64),
                        Cell::new(table.row_count() as i64),
                    ]);
                }

                let cursor = ResultCursor::new(
                    vec!["table".to_string(), "columns".to_string(), "rows".to_string()],
                    rows,
                )
                .map_err(_table_error)?;

                Ok(CommandResult {
                    cursor: Some(cursor),
                    ..Default::default()
                })
            }
            ShellCommand::CreateTable(name) => {
                self._session_mut()
                    .create_table(name)
                    .map_err(_table_error)?;
                Ok(CommandResult::_message(format!(
                    "Table {} created. Use '{}' to focus on it.",
                    highlight_argument(name),
                    highlight_argument(&format!("use {}", name))
                )))
            }
            ShellCommand::UseTable(name) => {
                self._session_mut().use_table(name).map_err(_table_error)?;
                Ok(CommandResult::_message(format!(
                    "Table {} is now in focus.",
                    highlight_argument(name)
                )))
            }
            ShellCommand::DropTable(name) => {
                self._session_mut()
                    .drop_table(name)
                    .ok_or_else(|| _table_error(TableError::TableNotFound(name.clone())))?;
                Ok(CommandResult::_message(format!(
                    "Table {} dropped.",
                    highlight_argument(name)
                )))
            }
            ShellCommand::CreateColumn { name, default } => {
                let table = self._active_table()?;
                let mut table = write_table(&table);
                table
                    .create_column(name, default.clone())
                    .map_err(_table_error)?;
                let datatype = table.column_type(name).map_err(_table_error)?;

                Ok(CommandResult::_message(format!(
                    "Column {} of type {} added to {} row(s).",
                    highlight_argument(name),
                    highlight_argument(&datatype.to_string()),
                    table.row_count()
                )))
            }
            ShellCommand::DropColumn(name) => {
                let table = self._active_table()?;
                write_table(&table)
                    .drop_column(name)
                    .map_err(_table_error)?;
                Ok(CommandResult::_message(format!(
                    "Column {} dropped.",
                    highlight_argument(name)
                )))
            }
            ShellCommand::Insert(values) => {
                let table = self._active_table()?;
                let row_index = write_table(&table)
                    .insert(values.clone())
                    .map_err(_table_error)?;
                Ok(CommandResult {
                    n_rows_processed: Some(1),
                    message: Some(format!("Inserted as row {}.", row_index)),
                    ..Default::default()
                })
            }
            ShellCommand::Select {
                columns,
                condition,
                order,
            } => {
                let table = self._active_table()?;
                let predicate = condition
                    .as_ref()
                    .map(|condition| move |row: &Row| condition.matches(row));
                let filter: Option<RowFilter> = predicate
                    .as_ref()
                    .map(|predicate| predicate as RowFilter);
                let columns: Option<Vec<&str>> = columns
                    .as_ref()
                    .map(|columns| columns.iter().map(String::as_str).collect());

                let cursor = {
                    let table = read_table(&table);
                    let result = match (filter, order.as_ref(), columns) {
                        (None, None, None) => table.select_all(),
                        (Some(filter), None, None) => table.select_all_where(Some(filter)),
                        (None, Some(order), None) => table.select_all_ordered(order),
                        (Some(filter), Some(order), None) => {
                            table.select_all_where_ordered(Some(filter), order)
                        }
                        (None, None, Some(columns)) => table.select(&columns),
                        (Some(filter), None, Some(columns)) => {
                            table.select_where(Some(filter), &columns)
                        }
                        (None, Some(order), Some(columns)) => {
                            table.select_ordered(order, &columns)
                        }
                        (Some(filter), Some(order), Some(columns)) => {
                            table.select_where_ordered(Some(filter), order, &columns)
                        }
                    };
                    result.map_err(_table_error)?
                };

                self._session_mut().set_last_result(cursor.clone());
                Ok(CommandResult {
                    n_rows_processed: Some(cursor.row_count()),
                    cursor: Some(cursor),
                    ..Default::default()
                })
            }
            ShellCommand::Delete(target) => {
                let table = self._active_table()?;
                let mut table = write_table(&table);
                let n_rows = match target {
                    DeleteTarget::All => table.delete_all(),
                    DeleteTarget::Row(index) => table.delete_at(*index),
                    DeleteTarget::Where(condition) => {
                        let predicate = |row: &Row| condition.matches(row);
                        table.delete_where(Some(&predicate as RowFilter))
                    }
                }
                .map_err(_table_error)?;
                Ok(CommandResult::_processed(n_rows))
            }
            ShellCommand::Update {
                column,
                value,
                condition,
            } => {
                let table = self._active_table()?;
                let mut table = write_table(&table);
                let n_rows = match condition {
                    Some(condition) => {
                        let predicate = |row: &Row| condition.matches(row);
                        table.update_where(
                            Some(&predicate as RowFilter),
                            &[column.as_str()],
                            vec![value.clone()],
                        )
                    }
                    None => table.update_all(&[column.as_str()], vec![value.clone()]),
                }
                .map_err(_table_error)?;
                Ok(CommandResult::_processed(n_rows))
            }
            ShellCommand::Sort(order) => {
                let table = self._active_table()?;
                write_table(&table).order_by(order).map_err(_table_error)?;
                Ok(CommandResult::_message(format!("Rows are now {}.", order)))
            }
            ShellCommand::Json => {
                let session = self._session();
                let cursor = session.get_last_result().ok_or(system_message(
                    "exctr",
                    "There is no query result to export yet.".to_string(),
                ))?;
                let json = serde_json::to_string_pretty(&cursor.to_json())
                    .map_err(|e| system_message("exctr", e.to_string()))?;
                Ok(CommandResult::_message(json))
            }
        }
    }
}

pub fn render_cursor(cursor: &ResultCursor, null_display: &str) -> String {
    //! Lay the snapshot out as an aligned grid, with `null_display` standing
    //! in for null cells.

    let cells: Vec<Vec<String>> = cursor
        .rows()
        .iter()
        .map(|row| {
            row.iter()
                .map(|cell| match cell.is_null() {
                    true => null_display.to_string(),
                    false => cell.to_string(),
                })
                .collect()
        })
        .collect();

    let widths: Vec<usize> = cursor
        .column_names()
        .iter()
        .enumerate()
        .map(|(index, name)| {
            cells
                .iter()
                .map(|row| row[index].chars().count())
                .chain(std::iter::once(name.chars().count()))
                .max()
                .unwrap_or(0)
        })
        .collect();

    let header: Vec<String> = cursor
        .column_names()
        .iter()
        .zip(widths.iter())
        .map(|(name, &width)| format!("{:width$}", name, width = width))
        .collect();
    let separator: Vec<String> = widths.iter().map(|&width| "-".repeat(width)).collect();

    let mut lines = vec![
        header.join(" | ").color(TABULA_TEAL).bold().to_string(),
        separator.join("-+-"),
    ];
    for row in cells.iter() {
        let padded: Vec<String> = row
            .iter()
            .zip(widths.iter())
            .map(|(cell, &width)| format!("{:width$}", cell, width = width))
            .collect();
        lines.push(padded.join(" | "));
    }

    lines.join("\n")
}
