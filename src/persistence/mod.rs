//! The in-memory table engine is made of the following components
//! - Value (closed set of runtime value kinds, with conversions)
//! - Cell (holds one value of a row, never absent, maybe null)
//! - Row (uniquely named cells, in order)
//! - Schema (mapping of column names to declared types and defaults, order is important)
//! - Table (a schema and its rows, DDL, DML and queries)
//! - ResultCursor (frozen, forward-only snapshot of a query)
//! - Catalog (named tables behind one lock each)
//!

//  All modules of this lib
mod catalog;
mod cell;
mod cursor;
mod error;
mod order;
mod reader;
mod row;
mod schema;
mod table;
mod value;

//  External API
pub use catalog::{Catalog, SharedTable, read_table, write_table};
pub use cell::{Cell, CellType};
pub use cursor::ResultCursor;
pub use error::{Result, TableError};
pub use order::{Direction, OrderSpec};
pub use reader::TableReader;
pub use row::Row;
pub use schema::{ColumnInformation, Schema};
pub use table::{RowFilter, Table};
pub use value::{DataType, Value, base_date, base_datetime};
