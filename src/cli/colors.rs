//! To maintain a theme of colors, colors are kept here as constants so the
//! output does not look bad at any point.
//!
//! - D4M_BLUE: Main Color
//! - MISSING_GREY: tables that do not exist

use colored::Color;

pub(crate) const D4M_BLUE: Color = Color::TrueColor {
    r: 87,
    g: 160,
    b: 255,
};

pub(crate) const MISSING_GREY: Color = Color::TrueColor {
    r: 128,
    g: 128,
    b: 128,
};
