// src/platform/mod.rs
//
// Platform-specific terminal access behind the `TerminalDevice` trait.

#[cfg(test)]
pub mod mock;
pub mod platform_trait;
#[cfg(unix)]
pub mod unix;

pub use platform_trait::TerminalDevice;

#[cfg(unix)]
pub use unix::{process_terminal_state, TtyAttributes, UnixTerminal};

/// The device for the process's controlling terminal on this platform.
#[cfg(unix)]
pub fn default_device() -> UnixTerminal {
    UnixTerminal::new()
}
