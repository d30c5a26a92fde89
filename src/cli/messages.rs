//! General message formatting functions for prettifying the CLI.
//! Includes basic utility functions such as:
//!
//! - Highlight Text (make the text D4M blue but not bold)
//! - System message formatting functions that produce the same
//! format messages.
//! - Error reports that walk the whole chain of causes.

use std::error::Error;

use colored::Colorize;

use crate::cli::colors::D4M_BLUE;

pub fn highlight_argument(argument: &str) -> String {
    //! Highlight a piece of text in the D4M blue color to make it obvious.
    //!
    //! Returns a formatted string.

    format!("{}", argument.color(D4M_BLUE))
}

pub fn system_message(source_name: &str, message: String) -> String {
    //! Write a system message on the command line, properly
    //! formatted, according to the command line theme.
    //!
    //! Takes in a source name (like 'd4m') and the message as a formatted
    //! text; output of [`format!`].

    let source_formatted = format!("{:6}", source_name.color(D4M_BLUE).bold());

    format!("[{}] {}", source_formatted, message)
}

pub fn error_report(error: &dyn Error) -> String {
    //! One system message for the error, followed by one `caused by` line
    //! per source.

    let mut report = system_message("error", error.to_string());
    let mut source = error.source();

    while let Some(cause) = source {
        report.push_str(&format!("\n         caused by: {}", cause));
        source = cause.source();
    }

    report
}

pub fn printable_bytes(bytes: &[u8]) -> String {
    //! Show raw keys and values with control characters escaped, so a tab
    //! delimiter reads as `\t`.

    bytes.escape_ascii().to_string()
}
