use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use indexmap::IndexMap;
use log::debug;

use super::error::{Result, TableError};
use super::table::Table;

/// A handle to a [`Table`] that can be shared between threads.
///
/// The single [`RwLock`] is the exclusive guard for every DDL, DML and query
/// call on the table. A [`super::ResultCursor`] taken under a read guard stays
/// valid after the guard is released.
pub type SharedTable = Arc<RwLock<Table>>;

/// A single place to store all tables of a process.
///
/// Based on an [`IndexMap`] registry pattern: the order prevails and names
/// always come back in creation order.
#[derive(Default)]
pub struct Catalog {
    registry: IndexMap<String, SharedTable>,
}

/// Lock a shared table for reading. A poisoned lock is recovered: the
/// table's invariants are checked before every mutation, so a panic in
/// another holder can not leave it half-written.
pub fn read_table(table: &SharedTable) -> RwLockReadGuard<'_, Table> {
    table.read().unwrap_or_else(PoisonError::into_inner)
}

pub fn write_table(table: &SharedTable) -> RwLockWriteGuard<'_, Table> {
    table.write().unwrap_or_else(PoisonError::into_inner)
}

impl Catalog {
    pub fn new() -> Catalog {
        Catalog {
            registry: IndexMap::new(),
        }
    }

    pub fn contains_table(&self, table_name: &str) -> bool {
        //! Check if a table already exists in the catalog.

        self.registry.contains_key(table_name)
    }

    pub fn create_table(&mut self, table_name: &str, if_not_exists: bool) -> Result<SharedTable> {
        //! Create a new, column-less table.
        //!
        //! With `if_not_exists`, an existing table of the same name is
        //! returned instead of failing.

        if table_name.is_empty() {
            return Err(TableError::InvalidArgument(
                "table names can not be empty".to_string(),
            ));
        }

        if let Some(table) = self.registry.get(table_name) {
            return if if_not_exists {
                Ok(Arc::clone(table))
            } else {
                Err(TableError::DuplicateTable(table_name.to_string()))
            };
        }

        let table = Arc::new(RwLock::new(Table::new()));
        self.registry
            .insert(table_name.to_string(), Arc::clone(&table));

        debug!("created table '{}'", table_name);
        Ok(table)
    }

    pub fn get_table(&self, table_name: &str) -> Result<SharedTable> {
        self.registry
            .get(table_name)
            .map(Arc::clone)
            .ok_or_else(|| TableError::TableNotFound(table_name.to_string()))
    }

    pub fn table_names(&self) -> Vec<String> {
        //! Get a list of all available tables in the catalog.

        self.registry.keys().cloned().collect()
    }

    pub fn drop_table(&mut self, table_name: &str) -> Option<SharedTable> {
        //! Remove a table from the catalog.
        //!
        //! Handles given out earlier keep the table alive until they are
        //! dropped.

        let dropped = self.registry.shift_remove(table_name);
        if dropped.is_some() {
            debug!("dropped table '{}'", table_name);
        }
        dropped
    }
}
