//! General message formatting functions for prettifying the CLI.
//!
//! - Highlight Text (make the text teal but not bold)
//! - System message formatting functions that produce the same
//! format messages.

use colored::Colorize;

use crate::cli::colors::{TABULA_AMBER, TABULA_TEAL};

pub fn highlight_argument(argument: &str) -> String {
    //! Highlight a piece of text in the tabula teal color to make it
    //! obvious.

    format!("{}", argument.color(TABULA_TEAL))
}

pub fn system_message(source_name: &str, message: String) -> String {
    //! Format a system message according to the command line theme.
    //!
    //! Takes in a source name (like 'system') and the message as a
    //! formatted text; output of [`format!`].

    let source_formatted = format!("{:6}", source_name.color(TABULA_TEAL).bold());
    format!("[{}] {}", source_formatted, message)
}

pub fn warning_message(source_name: &str, message: String) -> String {
    let source_formatted = format!("{:6}", source_name.color(TABULA_AMBER).bold());
    format!("[{}] {}", source_formatted, message)
}
