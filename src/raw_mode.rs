// src/raw_mode.rs

//! Single-byte raw reads with guaranteed attribute restoration.
//!
//! State machine: `Normal -> Raw -> Normal`, never nested. The saved
//! attributes are published to the device's [`ProcessTerminalState`] before
//! the switch to raw mode and before the blocking read, so an interrupt
//! arriving at any point after entry has something meaningful to restore.
//!
//! [`ProcessTerminalState`]: crate::state::ProcessTerminalState

use crate::error::{Error, Result};
use crate::interrupt::{handle_interrupt, EmergencySink, InterruptPolicy};
use crate::platform::TerminalDevice;
use log::{debug, error, trace, warn};
use std::io;

/// Where the controller is in its `Normal -> Raw -> Normal` cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RawState {
    Normal,
    Raw,
}

pub struct RawModeController<D: TerminalDevice> {
    device: D,
    state: RawState,
}

impl<D: TerminalDevice> RawModeController<D> {
    pub fn new(device: D) -> Self {
        Self {
            device,
            state: RawState::Normal,
        }
    }

    pub fn state(&self) -> RawState {
        self.state
    }

    pub fn device(&self) -> &D {
        &self.device
    }

    pub fn device_mut(&mut self) -> &mut D {
        &mut self.device
    }

    pub fn into_device(self) -> D {
        self.device
    }

    /// Reads one byte with echo, line buffering and signal generation off.
    ///
    /// The saved attributes are restored on every return path. If the restore
    /// itself fails the result is [`Error::TerminalRestoreFailed`], which is
    /// fatal: the terminal is in an unknown raw-like state and the caller must
    /// stop using it.
    ///
    /// Entering while another raw-mode read is in progress on the same
    /// process state is rejected with [`Error::AlreadyRaw`].
    pub fn read_raw_byte(&mut self) -> Result<u8> {
        let saved = self.device.attributes()?;
        let mut session = RawSession::enter(&mut self.device, saved)?;
        self.state = RawState::Raw;

        let read = session.read_one();
        let restored = session.finish();
        self.state = RawState::Normal;

        restored?;
        match read {
            Ok(Some(byte)) => Ok(byte),
            Ok(None) => Err(Error::EndOfInput),
            Err(e) => Err(Error::ReadFailed(e)),
        }
    }
}

impl<D: TerminalDevice + EmergencySink> RawModeController<D> {
    /// [`read_raw_byte`](Self::read_raw_byte), escalating a fatal restore
    /// failure to the emergency path: reset sequences, then termination
    /// with `exit_status`. Real devices never return from that path.
    pub fn read_raw_byte_or_terminate(&mut self, exit_status: i32) -> Result<u8> {
        match self.read_raw_byte() {
            Err(e) if e.is_fatal() => {
                error!("{}. Terminating.", e);
                let policy = InterruptPolicy {
                    exit_status,
                    restore_attributes: true,
                };
                handle_interrupt(&mut self.device, policy);
                Err(e)
            }
            other => other,
        }
    }
}

/// One raw-mode entry. Restores the saved attributes when finished, or on
/// drop if a panic unwinds through the read.
struct RawSession<'a, D: TerminalDevice> {
    device: &'a mut D,
    saved: D::Attributes,
    active: bool,
}

impl<'a, D: TerminalDevice> RawSession<'a, D> {
    fn enter(device: &'a mut D, saved: D::Attributes) -> Result<Self> {
        if !device.process_state().begin_raw(saved) {
            warn!("RawModeController: raw-mode entry while already raw; rejecting.");
            return Err(Error::AlreadyRaw);
        }

        let mut session = RawSession {
            device,
            saved,
            active: true,
        };

        let raw = session.device.raw_from(&saved);
        if let Err(e) = session.device.apply(&raw) {
            // The switch may have partially applied; put the saved state back.
            session.finish()?;
            return Err(Error::RawModeFailed(e));
        }
        debug!("RawModeController: terminal switched to raw mode.");
        Ok(session)
    }

    fn read_one(&mut self) -> io::Result<Option<u8>> {
        loop {
            match self.device.read_byte() {
                Err(ref e) if e.kind() == io::ErrorKind::Interrupted => {
                    trace!("RawModeController: read interrupted, retrying.");
                }
                other => return other,
            }
        }
    }

    fn finish(&mut self) -> Result<()> {
        if !self.active {
            return Ok(());
        }
        self.active = false;
        match self.device.apply(&self.saved) {
            Ok(()) => {
                self.device.process_state().end_raw();
                debug!("RawModeController: terminal attributes restored.");
                Ok(())
            }
            // The state stays raw so the emergency path still sees the snapshot.
            Err(e) => {
                error!("RawModeController: failed to restore terminal attributes: {}", e);
                Err(Error::TerminalRestoreFailed(e))
            }
        }
    }
}

impl<D: TerminalDevice> Drop for RawSession<'_, D> {
    fn drop(&mut self) {
        if let Err(e) = self.finish() {
            // Log error, but don't panic in drop.
            error!("RawModeController: error during restore in drop: {}", e);
        }
    }
}

#[cfg(test)]
#[path = "raw_mode_tests.rs"]
mod tests;
