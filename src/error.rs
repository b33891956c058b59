// src/error.rs

//! Error taxonomy for the terminal-control layer.
//!
//! Geometry and signal-registration failures are recoverable and returned to
//! the caller. `TerminalRestoreFailed` is fatal: the process-level entry point
//! [`crate::get_raw_byte`] terminates rather than leave the user's shell in
//! raw mode.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    /// No controlling terminal, or the driver reported a zero-sized window.
    #[error("terminal geometry unavailable: {0}")]
    GeometryUnavailable(#[source] io::Error),

    /// `tcgetattr` failed, typically because stdin is not a terminal.
    #[error("failed to read terminal attributes: {0}")]
    AttributesUnavailable(#[source] io::Error),

    #[error("failed to switch terminal to raw mode: {0}")]
    RawModeFailed(#[source] io::Error),

    /// A raw-mode read is already in progress on this process.
    #[error("a raw-mode read is already in progress")]
    AlreadyRaw,

    #[error("failed to read from terminal: {0}")]
    ReadFailed(#[source] io::Error),

    #[error("terminal input closed")]
    EndOfInput,

    /// Fatal. The terminal may be left in a raw-like state.
    #[error("failed to restore terminal attributes: {0}")]
    TerminalRestoreFailed(#[source] io::Error),

    #[error("failed to register handler for {signal}: {source}")]
    SignalRegistrationFailed {
        signal: String,
        #[source]
        source: io::Error,
    },

    #[error("unknown signal name `{0}`")]
    UnknownSignal(String),

    #[error("invalid configuration in {}: {source}", path.display())]
    Config {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

impl Error {
    /// Whether the process must stop using the terminal after this error.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Error::TerminalRestoreFailed(_))
    }
}

pub type Result<T> = std::result::Result<T, Error>;
