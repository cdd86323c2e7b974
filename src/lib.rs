//! An embedded, schema-typed, in-memory table engine.
//!
//! The [`persistence`] module is the library: tables of typed columns, rows of
//! cells, queries returning frozen result cursors. The [`cli`] and
//! [`sessions`] modules make up the `tabula` shell on top of it.

pub mod cli;
pub mod config;
pub mod persistence;
pub mod sessions;
