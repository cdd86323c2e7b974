//! Per-user state of the interactive shell.

pub mod session;
