//! To maintain a theme of colors, colors are kept here as constants so
//! the shell looks the same everywhere.
//!
//! - TABULA_TEAL: Main Color
//! - TABULA_AMBER: Warnings

use colored::Color;

pub(crate) const TABULA_TEAL: Color = Color::TrueColor {
    r: 38,
    g: 166,
    b: 154,
};

pub(crate) const TABULA_AMBER: Color = Color::TrueColor {
    r: 255,
    g: 179,
    b: 0,
};
