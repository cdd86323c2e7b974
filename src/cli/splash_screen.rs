//! The module contains function for displaying CLI splash screen.
//!
//! - Title
//! - Short Description
//! - Version Information

use colored::*;

use crate::cli::colors::TABULA_TEAL;

pub fn splash_screen() {
    show_splash_screen();
    show_version_info();
}

fn show_splash_screen() {
    print!(
        r#"
    {}
        "#,
        r"
    ████████╗ █████╗ ██████╗ ██╗   ██╗██╗      █████╗
    ╚══██╔══╝██╔══██╗██╔══██╗██║   ██║██║     ██╔══██╗
       ██║   ███████║██████╔╝██║   ██║██║     ███████║
       ██║   ██╔══██║██╔══██╗██║   ██║██║     ██╔══██║
       ██║   ██║  ██║██████╔╝╚██████╔╝███████╗██║  ██║
       ╚═╝   ╚═╝  ╚═╝╚═════╝  ╚═════╝ ╚══════╝╚═╝  ╚═╝
        "
        .color(TABULA_TEAL)
    )
}

fn show_version_info() {
    println!(
        r"
    {}

    Version {}
    Authored by {}
        ",
        env!("CARGO_PKG_DESCRIPTION").color(TABULA_TEAL),
        env!("CARGO_PKG_VERSION").color(TABULA_TEAL).italic(),
        env!("CARGO_PKG_AUTHORS").color(TABULA_TEAL).italic(),
    )
}
