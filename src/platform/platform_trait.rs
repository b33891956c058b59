// src/platform/platform_trait.rs
//
// Defines the `TerminalDevice` trait, which abstracts over the platform's
// terminal driver: attribute save/restore, raw-mode construction, single-byte
// input and window-size queries.

use crate::error::Result;
use crate::geometry::TerminalSize;
use crate::state::ProcessTerminalState;
use std::fmt::Debug;
use std::io;

/// A terminal the raw-mode controller can drive.
///
/// Implementations exist for Unix terminals (termios) and for an in-memory
/// mock compiled into the unit tests. Selection happens at build time through
/// [`crate::platform::default_device`].
pub trait TerminalDevice {
    /// Opaque line-discipline configuration.
    type Attributes: Copy + PartialEq + Debug;

    /// Reads the driver's current attributes (`tcgetattr`).
    fn attributes(&self) -> Result<Self::Attributes>;

    /// Applies `attrs` immediately (`tcsetattr(TCSANOW)`).
    fn apply(&mut self, attrs: &Self::Attributes) -> io::Result<()>;

    /// Derives raw-mode attributes from `attrs`: no echo, no canonical
    /// buffering, no signal generation, one-byte blocking reads.
    fn raw_from(&self, attrs: &Self::Attributes) -> Self::Attributes;

    /// Reads exactly one byte. `Ok(None)` means end of input.
    ///
    /// An `ErrorKind::Interrupted` error is retried by the caller.
    fn read_byte(&mut self) -> io::Result<Option<u8>>;

    /// Current window size.
    fn size(&self) -> Result<TerminalSize>;

    /// The snapshot cell the interrupt handler restores from.
    fn process_state(&self) -> &ProcessTerminalState<Self::Attributes>;
}
