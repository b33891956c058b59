// src/interrupt.rs

//! Process-wide interrupt guard.
//!
//! On a termination signal the handler puts the terminal back into a usable
//! state and exits. It runs preemptively on top of whatever the main flow was
//! doing, so its body is limited to async-signal-safe operations:
//!
//! 1. `tcsetattr` with the snapshot saved by the raw-mode controller, only
//!    while a raw read is in progress. POSIX lists `tcsetattr` as
//!    async-signal-safe; this is the guaranteed part of the restoration.
//! 2. One unbuffered `write(2)` of [`EMERGENCY_RESET`] to stdout (default
//!    style, normal screen buffer, visible cursor). This is best-effort: it
//!    only helps if the terminal honours the sequences.
//! 3. `_exit` with the configured status. No destructors, no stdio flushing.
//!
//! Nothing here logs, allocates or takes a lock once the handler is running.

use crate::config::{InterruptConfig, CONFIG};
use crate::error::{Error, Result};
#[cfg(unix)]
use crate::platform::UnixTerminal;
use log::{debug, info};
#[cfg(unix)]
use nix::sys::signal::Signal;
use std::io;
#[cfg(unix)]
use std::sync::atomic::AtomicI32;
use std::sync::atomic::{AtomicBool, Ordering};

/// Written by the handler: `ESC[0m` (default style), `ESC[?47l` (normal
/// screen buffer), `ESC[?25h` (show cursor), then a line break.
pub const EMERGENCY_RESET: &[u8] = b"\x1b[0m\x1b[?47l\x1b[?25h\r\n";

/// What the handler does once it fires.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InterruptPolicy {
    pub exit_status: i32,
    /// Whether to restore the saved termios before writing the reset.
    pub restore_attributes: bool,
}

impl InterruptPolicy {
    /// 128 + SIGINT, the shell convention for "killed by ^C".
    pub const DEFAULT_EXIT_STATUS: i32 = 130;
}

impl Default for InterruptPolicy {
    fn default() -> Self {
        Self {
            exit_status: Self::DEFAULT_EXIT_STATUS,
            restore_attributes: true,
        }
    }
}

impl From<&InterruptConfig> for InterruptPolicy {
    fn from(config: &InterruptConfig) -> Self {
        Self {
            exit_status: i32::from(config.exit_status),
            restore_attributes: config.restore_attributes,
        }
    }
}

// Read by the signal handler; atomics are the only shared state it may touch.
#[cfg(unix)]
static EXIT_STATUS: AtomicI32 = AtomicI32::new(InterruptPolicy::DEFAULT_EXIT_STATUS);
#[cfg(unix)]
static RESTORE_ATTRIBUTES: AtomicBool = AtomicBool::new(true);

#[cfg(unix)]
fn active_policy() -> InterruptPolicy {
    InterruptPolicy {
        exit_status: EXIT_STATUS.load(Ordering::Relaxed),
        restore_attributes: RESTORE_ATTRIBUTES.load(Ordering::Relaxed),
    }
}

/// The operations the emergency path is allowed to perform.
pub trait EmergencySink {
    /// Restores the attributes saved at raw-mode entry, if a raw read is in
    /// progress. Returns whether anything was restored.
    fn restore_saved_attributes(&mut self) -> bool;

    /// Writes `bytes` without going through any userspace buffer.
    fn write_unbuffered(&mut self, bytes: &[u8]);

    /// Ends the process with `status`. Real sinks do not return.
    fn terminate(&mut self, status: i32);
}

/// The handler body, independent of how the interrupt was delivered.
pub fn handle_interrupt<S: EmergencySink + ?Sized>(sink: &mut S, policy: InterruptPolicy) {
    if policy.restore_attributes {
        sink.restore_saved_attributes();
    }
    sink.write_unbuffered(EMERGENCY_RESET);
    sink.terminate(policy.exit_status);
}

#[cfg(unix)]
extern "C" fn on_termination_signal(_signal: libc::c_int) {
    // Constructing the device only copies two descriptors.
    handle_interrupt(&mut UnixTerminal::new(), active_policy());
}

/// Installs a handler for one signal.
#[cfg(unix)]
pub trait SignalRegistrar {
    fn register(&mut self, signal: Signal) -> Result<()>;
}

/// Registers [`on_termination_signal`] with `sigaction(2)`.
#[cfg(unix)]
pub struct SigactionRegistrar;

#[cfg(unix)]
impl SignalRegistrar for SigactionRegistrar {
    fn register(&mut self, signal: Signal) -> Result<()> {
        use nix::sys::signal::{sigaction, SaFlags, SigAction, SigHandler, SigSet};

        let action = SigAction::new(
            SigHandler::Handler(on_termination_signal),
            SaFlags::empty(),
            SigSet::empty(),
        );
        // SAFETY: the handler only performs async-signal-safe operations.
        unsafe { sigaction(signal, &action) }.map_err(|errno| {
            Error::SignalRegistrationFailed {
                signal: signal.as_str().to_string(),
                source: io::Error::from(errno),
            }
        })?;
        debug!("InterruptGuard: handler registered for {}", signal.as_str());
        Ok(())
    }
}

/// Registers the termination handler at most once.
pub struct InterruptGuard {
    installed: AtomicBool,
}

impl InterruptGuard {
    pub const fn new() -> Self {
        Self {
            installed: AtomicBool::new(false),
        }
    }

    pub fn is_installed(&self) -> bool {
        self.installed.load(Ordering::Acquire)
    }

    /// Registers the handler for every configured signal.
    ///
    /// Returns `Ok(false)` without registering anything if this guard was
    /// already installed. A failed registration leaves the guard uninstalled
    /// so the caller may retry or continue without guaranteed cleanup.
    #[cfg(unix)]
    pub fn install_with<R: SignalRegistrar>(
        &self,
        registrar: &mut R,
        config: &InterruptConfig,
    ) -> Result<bool> {
        if self
            .installed
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            debug!("InterruptGuard: already installed.");
            return Ok(false);
        }

        let result = config.termination_signals().and_then(|signals| {
            let policy = InterruptPolicy::from(config);
            EXIT_STATUS.store(policy.exit_status, Ordering::Relaxed);
            RESTORE_ATTRIBUTES.store(policy.restore_attributes, Ordering::Relaxed);
            for signal in &signals {
                registrar.register(*signal)?;
            }
            Ok(signals)
        });

        match result {
            Ok(signals) => {
                info!(
                    "InterruptGuard: installed for {:?} (exit status {}).",
                    signals.iter().map(|s| s.as_str()).collect::<Vec<_>>(),
                    config.exit_status
                );
                Ok(true)
            }
            Err(e) => {
                self.installed.store(false, Ordering::Release);
                Err(e)
            }
        }
    }
}

impl Default for InterruptGuard {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(unix)]
static PROCESS_GUARD: InterruptGuard = InterruptGuard::new();

/// Installs the process-wide guard using [`CONFIG`]. Idempotent.
#[cfg(unix)]
pub fn install() -> Result<()> {
    PROCESS_GUARD
        .install_with(&mut SigactionRegistrar, &CONFIG.interrupt)
        .map(|_| ())
}

/// Only Unix signal delivery is supported; elsewhere the host runs without
/// guaranteed cleanup.
#[cfg(not(unix))]
pub fn install() -> Result<()> {
    Err(Error::SignalRegistrationFailed {
        signal: CONFIG.interrupt.signals.join(","),
        source: io::Error::new(
            io::ErrorKind::Unsupported,
            "signal handlers are only supported on Unix",
        ),
    })
}

#[cfg(all(test, unix))]
#[path = "interrupt_tests.rs"]
mod tests;
