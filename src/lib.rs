//! Terminal-control primitives.
//!
//! Raw single-byte input with guaranteed terminal restoration, an interrupt
//! guard that resets the terminal before the process dies, ANSI escape
//! sequence builders, and geometry-aware text centering.
//!
//! The host program owns argument parsing and output flushing. A typical host
//! calls [`install_interrupt_guard`] once at startup and [`get_raw_byte`] per
//! keystroke.

pub mod config;
pub mod error;
pub mod escape;
pub mod geometry;
pub mod interrupt;
pub mod layout;
pub mod platform;
pub mod raw_mode;
pub mod screen;
pub mod state;

pub use error::{Error, Result};
pub use escape::{
    bold_text, color_sequence, rgb_bg, rgb_fg, underline_text, ColorRole, Direction,
    StyleRequest, DEFAULT_TERM_STYLE, NORMAL_SCREEN_BUFFER,
};
pub use geometry::TerminalSize;
pub use layout::VisualWidth;

#[cfg(unix)]
use crate::platform::{default_device, TerminalDevice};
#[cfg(unix)]
use crate::raw_mode::RawModeController;

/// Reads one unechoed byte from the controlling terminal.
///
/// If the terminal attributes cannot be restored afterwards, the process
/// writes the emergency reset sequences and exits with the configured
/// interrupt status rather than return to a caller with a raw terminal.
#[cfg(unix)]
pub fn get_raw_byte() -> Result<u8> {
    RawModeController::new(default_device())
        .read_raw_byte_or_terminate(i32::from(config::CONFIG.interrupt.exit_status))
}

/// Size of the controlling terminal, queried fresh.
#[cfg(unix)]
pub fn query_terminal_size() -> Result<TerminalSize> {
    default_device().size()
}

/// Installs the process-wide interrupt guard. Idempotent. Fails with
/// `SignalRegistrationFailed` where signal handlers are unsupported.
pub fn install_interrupt_guard() -> Result<()> {
    interrupt::install()
}

/// Centers `line` against the current terminal width.
#[cfg(unix)]
pub fn center_line(line: &str, visual_width: impl Into<VisualWidth>) -> Result<String> {
    let device = default_device();
    layout::TextLayout::new(&device).center_line(line, visual_width.into())
}

/// Centers each line of `text` independently.
#[cfg(unix)]
pub fn center_text(text: &str, visual_width: impl Into<VisualWidth>) -> Result<String> {
    let device = default_device();
    layout::TextLayout::new(&device).center_text(text, visual_width.into())
}

/// Centers `text` as one block, using the first line's width.
#[cfg(unix)]
pub fn center_text_block(text: &str, visual_width: impl Into<VisualWidth>) -> Result<String> {
    let device = default_device();
    layout::TextLayout::new(&device).center_text_block(text, visual_width.into())
}
