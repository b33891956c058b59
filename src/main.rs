// src/main.rs

//! Demo host for the termkit primitives.
//!
//! Installs the interrupt guard, prints a centered banner, then reports each
//! raw keystroke until `q` is pressed. A termination signal during a pending
//! read resets the terminal and exits through the guard.

#[cfg(unix)]
use anyhow::Context;
#[cfg(unix)]
use log::{info, warn};
#[cfg(unix)]
use std::io::{self, Write};
#[cfg(unix)]
use termkit::{bold_text, escape, rgb_fg, Error, VisualWidth};

const BANNER: &str = "termkit";
const QUIT_KEY: u8 = b'q';

#[cfg(not(unix))]
fn main() -> anyhow::Result<()> {
    anyhow::bail!("{} needs a Unix terminal", BANNER)
}

#[cfg(unix)]
fn main() -> anyhow::Result<()> {
    // Initialize the logger. Default filter is "info" if RUST_LOG is not set.
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_micros()
        .init();

    termkit::install_interrupt_guard().context("Failed to install interrupt guard")?;

    let styled = rgb_fg(&bold_text(BANNER, false), 255, 165, 0, false);
    let banner = match termkit::center_line(&styled, VisualWidth::Fixed(BANNER.len())) {
        Ok(centered) => centered,
        Err(Error::GeometryUnavailable(e)) => {
            warn!("Terminal size unknown ({}); printing banner uncentered.", e);
            styled
        }
        Err(e) => return Err(e).context("Failed to center banner"),
    };

    let mut stdout = io::stdout();
    writeln!(stdout, "{}", banner).context("Failed to write banner")?;

    loop {
        writeln!(stdout, "ready (press {} to quit)", QUIT_KEY as char)
            .and_then(|_| stdout.flush())
            .context("Failed to write prompt")?;

        let byte = match termkit::get_raw_byte() {
            Ok(byte) => byte,
            Err(Error::EndOfInput) => {
                info!("Input closed. Exiting.");
                break;
            }
            Err(e) => return Err(e).context("Failed to read keystroke"),
        };

        writeln!(
            stdout,
            "{}got {:#04x}",
            escape::clear_line(),
            byte
        )
        .context("Failed to report keystroke")?;

        if byte == QUIT_KEY {
            break;
        }
    }

    info!("termkit demo exited successfully.");
    Ok(())
}
