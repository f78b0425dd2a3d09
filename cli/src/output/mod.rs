//! CLI-specific output
//!
//! Formatting for resolved configuration and the field schema. Colors are
//! only used when stdout is a terminal.

pub mod formatters;

pub use formatters::ConfigFormatter;

use std::io::IsTerminal;

/// Whether stdout should receive ANSI colors
pub fn use_color() -> bool {
    std::io::stdout().is_terminal() && std::env::var_os("NO_COLOR").is_none()
}
