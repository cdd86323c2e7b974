//! The only point of truth for all information that is related to the
//! current user session in the shell. A session keeps the command history,
//! the table currently in focus and the last query result, so it can be
//! printed again or exported.
//!
//! At the end of each session these objects are discarded. Tables live in the
//! [`Catalog`] the session was opened on, not in the session.

use std::{
    collections::VecDeque,
    fmt::Display,
    sync::{Arc, PoisonError, RwLock},
    time::SystemTime,
};

use chrono::{DateTime, Local};

use crate::persistence::{Catalog, ResultCursor, SharedTable, TableError};

struct CommandHistory {
    command: String,
    command_time: SystemTime,
}

impl CommandHistory {
    pub fn command_time_string(&self) -> String {
        let datetime: DateTime<Local> = self.command_time.into();
        datetime.format("%Y-%m-%d %H:%M:%S").to_string()
    }
}

impl Display for CommandHistory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} - {}", self.command_time_string(), self.command)
    }
}

pub struct Session {
    command_history: VecDeque<CommandHistory>,
    history_limit: usize,
    start_time: SystemTime,
    active_table: Option<(String, SharedTable)>,
    last_result: Option<ResultCursor>,
    catalog: Arc<RwLock<Catalog>>,
}

impl Session {
    pub fn client(catalog: &Arc<RwLock<Catalog>>, history_limit: usize) -> Session {
        //! Returns a new client session.

        Session {
            command_history: VecDeque::new(),
            history_limit,
            start_time: SystemTime::now(),
            active_table: None,
            last_result: None,
            catalog: Arc::clone(catalog),
        }
    }

    pub fn use_table(&mut self, table_name: &str) -> Result<(), TableError> {
        //! Set the table that future commands run against.

        let table = {
            let catalog = self.catalog.read().unwrap_or_else(PoisonError::into_inner);
            catalog.get_table(table_name)?
        };
        self.active_table = Some((table_name.to_string(), table));
        Ok(())
    }

    pub fn get_active_table(&self) -> Option<SharedTable> {
        //! Get a handle to the table in focus, otherwise return [`None`]

        self.active_table.as_ref().map(|(_, table)| Arc::clone(table))
    }

    pub fn get_active_table_name(&self) -> Option<&str> {
        self.active_table.as_ref().map(|(name, _)| name.as_str())
    }

    pub fn add_to_command_history(&mut self, command: &str) {
        //! Remember a command, forgetting the oldest once the limit is hit.

        if self.history_limit == 0 {
            return;
        }
        while self.command_history.len() >= self.history_limit {
            self.command_history.pop_front();
        }
        self.command_history.push_back(CommandHistory {
            command: command.to_string(),
            command_time: SystemTime::now(),
        });
    }

    pub fn history_len(&self) -> usize {
        self.command_history.len()
    }

    pub fn start_time_string(&self) -> String {
        //! Convert the [`SystemTime`] object into a string representation
        //! to be more readable.

        let datetime: DateTime<Local> = self.start_time.into();
        datetime.format("%Y-%m-%d %H:%M:%S").to_string()
    }

    pub fn show_command_history(&self, n_prev: Option<usize>) {
        //! Show the list of previously invoked commands.
        //! Use `n_prev` to limit the number of commands you see.

        let limit = n_prev.unwrap_or(self.command_history.len());

        for (index, command) in self.command_history.iter().rev().take(limit).enumerate() {
            println!("{:3} | {}", index, command);
        }
    }

    pub fn get_last_command(&self, nth_back: usize) -> Option<&str> {
        //! Gets the `nth_back`th last command from the history, 1 being the
        //! most recent one.

        self.command_history
            .iter()
            .nth_back(nth_back.checked_sub(1)?)
            .map(|cmd| cmd.command.as_str())
    }

    pub fn create_table(&mut self, table_name: &str) -> Result<SharedTable, TableError> {
        let mut catalog = self.catalog.write().unwrap_or_else(PoisonError::into_inner);
        catalog.create_table(table_name, false)
    }

    pub fn get_table(&self, table_name: &str) -> Result<SharedTable, TableError> {
        let catalog = self.catalog.read().unwrap_or_else(PoisonError::into_inner);
        catalog.get_table(table_name)
    }

    pub fn get_available_tables(&self) -> Vec<String> {
        //! Returns a list of all available table names.

        let catalog = self.catalog.read().unwrap_or_else(PoisonError::into_inner);
        catalog.table_names()
    }

    pub fn drop_table(&mut self, table_name: &str) -> Option<SharedTable> {
        //! Remove the table from the catalog. If it was in focus, the
        //! session loses its focus too.

        if self.get_active_table_name() == Some(table_name) {
            self.active_table = None;
        }
        let mut catalog = self.catalog.write().unwrap_or_else(PoisonError::into_inner);
        catalog.drop_table(table_name)
    }

    pub fn set_last_result(&mut self, cursor: ResultCursor) {
        self.last_result = Some(cursor);
    }

    pub fn get_last_result(&self) -> Option<&ResultCursor> {
        self.last_result.as_ref()
    }
}
