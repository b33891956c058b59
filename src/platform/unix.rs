// src/platform/unix.rs

//! `TerminalDevice` for Unix terminals, built on termios and `ioctl`.

use crate::error::{Error, Result};
use crate::geometry::TerminalSize;
use crate::interrupt::EmergencySink;
use crate::platform::platform_trait::TerminalDevice;
use crate::state::ProcessTerminalState;

use libc::{winsize, STDIN_FILENO, STDOUT_FILENO, TIOCGWINSZ};
use log::{debug, trace};
use std::io;
use std::mem;
use std::os::unix::io::RawFd;
use termios::{cfmakeraw, tcsetattr, Termios, TCSANOW, VMIN, VTIME};

/// Saved termios together with the descriptor it belongs to, so the
/// interrupt handler knows which device to restore.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TtyAttributes {
    pub fd: RawFd,
    pub termios: Termios,
}

/// The one process-wide snapshot cell. Initialized empty at load time and
/// filled on the first raw-mode entry; never torn down.
static PROCESS_TERMINAL_STATE: ProcessTerminalState<TtyAttributes> = ProcessTerminalState::new();

/// Sole accessor for the process-wide snapshot.
pub fn process_terminal_state() -> &'static ProcessTerminalState<TtyAttributes> {
    &PROCESS_TERMINAL_STATE
}

/// Restores the saved attributes if a raw-mode read is in progress.
///
/// Only calls `tcsetattr`, which POSIX lists as async-signal-safe, so this is
/// usable from the interrupt handler. Returns whether a restore was attempted
/// and succeeded.
pub(crate) fn restore_from_signal_context() -> bool {
    match PROCESS_TERMINAL_STATE.raw_snapshot() {
        Some(saved) => tcsetattr(saved.fd, TCSANOW, &saved.termios).is_ok(),
        None => false,
    }
}

/// The controlling terminal as seen through stdin (input, attributes) and
/// stdout (geometry).
#[derive(Debug, Clone, Copy)]
pub struct UnixTerminal {
    input_fd: RawFd,
    output_fd: RawFd,
}

impl UnixTerminal {
    pub fn new() -> Self {
        Self::from_fds(STDIN_FILENO, STDOUT_FILENO)
    }

    /// Uses explicit descriptors. The caller keeps them open for the
    /// lifetime of the device.
    pub fn from_fds(input_fd: RawFd, output_fd: RawFd) -> Self {
        Self {
            input_fd,
            output_fd,
        }
    }
}

impl Default for UnixTerminal {
    fn default() -> Self {
        Self::new()
    }
}

impl TerminalDevice for UnixTerminal {
    type Attributes = TtyAttributes;

    fn attributes(&self) -> Result<TtyAttributes> {
        let termios = Termios::from_fd(self.input_fd).map_err(Error::AttributesUnavailable)?;
        Ok(TtyAttributes {
            fd: self.input_fd,
            termios,
        })
    }

    fn apply(&mut self, attrs: &TtyAttributes) -> io::Result<()> {
        tcsetattr(attrs.fd, TCSANOW, &attrs.termios)
    }

    fn raw_from(&self, attrs: &TtyAttributes) -> TtyAttributes {
        let mut raw = attrs.termios;
        cfmakeraw(&mut raw);
        // read() blocks until exactly one byte is available.
        raw.c_cc[VMIN] = 1;
        raw.c_cc[VTIME] = 0;
        TtyAttributes {
            fd: attrs.fd,
            termios: raw,
        }
    }

    fn read_byte(&mut self) -> io::Result<Option<u8>> {
        let mut byte = 0u8;
        // SAFETY: `byte` is a valid one-byte buffer for the duration of the call.
        let n = unsafe { libc::read(self.input_fd, (&mut byte as *mut u8).cast(), 1) };
        match n {
            -1 => Err(io::Error::last_os_error()),
            0 => Ok(None),
            _ => {
                trace!("UnixTerminal: read byte {:#04x} from fd {}", byte, self.input_fd);
                Ok(Some(byte))
            }
        }
    }

    fn size(&self) -> Result<TerminalSize> {
        // SAFETY: `ioctl` is an FFI call; `winsz` is a valid, zeroed winsize.
        let winsz = unsafe {
            let mut winsz: winsize = mem::zeroed();
            if libc::ioctl(self.output_fd, TIOCGWINSZ, &mut winsz) == -1 {
                return Err(Error::GeometryUnavailable(io::Error::last_os_error()));
            }
            winsz
        };
        // A zero width would turn every centering offset into garbage.
        if winsz.ws_col == 0 || winsz.ws_row == 0 {
            return Err(Error::GeometryUnavailable(io::Error::new(
                io::ErrorKind::InvalidData,
                format!(
                    "terminal on fd {} reported {}x{} cells",
                    self.output_fd, winsz.ws_col, winsz.ws_row
                ),
            )));
        }
        debug!(
            "UnixTerminal: fd {} is {}x{} cells",
            self.output_fd, winsz.ws_col, winsz.ws_row
        );
        Ok(TerminalSize::new(winsz.ws_col, winsz.ws_row))
    }

    fn process_state(&self) -> &ProcessTerminalState<TtyAttributes> {
        process_terminal_state()
    }
}

/// Everything here is async-signal-safe, so the signal handler and the
/// failed-restore escalation share this sink.
impl EmergencySink for UnixTerminal {
    fn restore_saved_attributes(&mut self) -> bool {
        restore_from_signal_context()
    }

    fn write_unbuffered(&mut self, bytes: &[u8]) {
        let mut remaining = bytes;
        while !remaining.is_empty() {
            // SAFETY: `remaining` is a valid buffer; write(2) is async-signal-safe.
            let n = unsafe {
                libc::write(
                    self.output_fd,
                    remaining.as_ptr().cast::<libc::c_void>(),
                    remaining.len(),
                )
            };
            if n <= 0 {
                // Nothing more can be done from here.
                return;
            }
            remaining = &remaining[n as usize..];
        }
    }

    fn terminate(&mut self, status: i32) {
        // SAFETY: _exit is async-signal-safe and never returns.
        unsafe { libc::_exit(status) }
    }
}

#[cfg(test)]
#[path = "unix_tests.rs"]
mod tests;
