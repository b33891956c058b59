// src/geometry.rs

//! Terminal dimensions.

use std::fmt;

/// Terminal size in character cells. Queried fresh every time; never cached,
/// since the terminal can be resized between calls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TerminalSize {
    /// Columns.
    pub width: u16,
    /// Rows.
    pub height: u16,
}

impl TerminalSize {
    pub const fn new(width: u16, height: u16) -> Self {
        Self { width, height }
    }

    /// Column of the horizontal midpoint, rounded down.
    pub const fn midpoint(&self) -> usize {
        self.width as usize / 2
    }
}

impl fmt::Display for TerminalSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}
