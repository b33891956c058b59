// src/config.rs

//! Configuration for the terminal-control layer.
//!
//! The configuration is read from a JSON file so the interrupt behavior can be
//! adjusted without rebuilding the host program. Every section carries
//! defaults; a missing file yields [`Config::default`].
//!
//! Lookup order for the file:
//! 1. the path in `TERMKIT_CONFIG`,
//! 2. `$XDG_CONFIG_HOME/termkit/config.json`,
//! 3. `$HOME/.config/termkit/config.json`.

use crate::error::{Error, Result};
use log::{debug, warn};
#[cfg(unix)]
use nix::sys::signal::Signal;
use once_cell::sync::Lazy;
use serde::{Deserialize, Deserializer, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
#[cfg(unix)]
use std::str::FromStr;

/// Environment variable naming an explicit config file.
pub const CONFIG_ENV_VAR: &str = "TERMKIT_CONFIG";

/// Process-wide configuration, loaded on first use.
pub static CONFIG: Lazy<Config> = Lazy::new(Config::load);

/// Signals the interrupt guard may be asked to handle. All of them request
/// termination by default.
#[cfg(unix)]
const TERMINATION_SIGNALS: [Signal; 4] = [
    Signal::SIGINT,
    Signal::SIGTERM,
    Signal::SIGHUP,
    Signal::SIGQUIT,
];

// --- Top-Level Configuration Structure ---

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    /// Interrupt-guard settings.
    pub interrupt: InterruptConfig,
}

// --- Interrupt Configuration ---

/// Defines how the process reacts to termination signals.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct InterruptConfig {
    /// Exit status used after the emergency reset, in `1..=255`. Zero is
    /// refused so an interrupted host never reports success.
    #[serde(deserialize_with = "nonzero_exit_status")]
    pub exit_status: u8,
    /// Signal names (e.g. "SIGINT") that trigger the emergency reset.
    pub signals: Vec<String>,
    /// Restore the saved termios from the handler when a raw read is active.
    /// When off, only the reset escape sequences are written.
    pub restore_attributes: bool,
}

impl Default for InterruptConfig {
    fn default() -> Self {
        InterruptConfig {
            exit_status: 130,
            signals: vec!["SIGINT".to_string()],
            restore_attributes: true,
        }
    }
}

/// `u8` already refuses negatives and values above 255.
fn nonzero_exit_status<'de, D>(deserializer: D) -> std::result::Result<u8, D::Error>
where
    D: Deserializer<'de>,
{
    match u8::deserialize(deserializer)? {
        0 => Err(serde::de::Error::custom("exit_status must be in 1..=255")),
        status => Ok(status),
    }
}

#[cfg(unix)]
impl InterruptConfig {
    /// Parses [`Self::signals`], rejecting anything that is not a
    /// termination-requesting signal. Duplicates are collapsed.
    pub fn termination_signals(&self) -> Result<Vec<Signal>> {
        let mut signals = Vec::with_capacity(self.signals.len());
        for name in &self.signals {
            let signal = parse_termination_signal(name)?;
            if !signals.contains(&signal) {
                signals.push(signal);
            }
        }
        Ok(signals)
    }
}

#[cfg(unix)]
fn parse_termination_signal(name: &str) -> Result<Signal> {
    let trimmed = name.trim().to_ascii_uppercase();
    let canonical = if trimmed.starts_with("SIG") {
        trimmed
    } else {
        format!("SIG{}", trimmed)
    };
    Signal::from_str(&canonical)
        .ok()
        .filter(|signal| TERMINATION_SIGNALS.contains(signal))
        .ok_or_else(|| Error::UnknownSignal(name.to_string()))
}

impl Config {
    /// Loads the configuration from the first file found, falling back to
    /// defaults when none exists or the file cannot be used.
    pub fn load() -> Self {
        let Some(path) = Self::config_path() else {
            debug!("Config: no config location available, using defaults.");
            return Self::default();
        };
        if !path.exists() {
            debug!("Config: {} not found, using defaults.", path.display());
            return Self::default();
        }
        match Self::from_path(&path) {
            Ok(config) => {
                debug!("Config: loaded {}", path.display());
                config
            }
            Err(e) => {
                warn!("Config: {}. Using defaults.", e);
                Self::default()
            }
        }
    }

    /// Reads and parses one config file.
    pub fn from_path(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| Error::Config {
            path: path.to_path_buf(),
            source: serde_json::Error::io(e),
        })?;
        Self::from_json(&content).map_err(|source| Error::Config {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    /// Resolves the config file location.
    pub fn config_path() -> Option<PathBuf> {
        if let Some(explicit) = std::env::var_os(CONFIG_ENV_VAR) {
            return Some(PathBuf::from(explicit));
        }
        let base = std::env::var_os("XDG_CONFIG_HOME")
            .map(PathBuf::from)
            .filter(|p| p.is_absolute())
            .or_else(|| std::env::var_os("HOME").map(|home| PathBuf::from(home).join(".config")))?;
        Some(base.join("termkit").join("config.json"))
    }
}
