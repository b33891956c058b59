// src/screen.rs

//! Emits cursor and screen sequences to a writer.
//!
//! These are the printing counterparts of the builders in [`crate::escape`].
//! Each call writes its sequence and flushes, so the effect is visible
//! immediately even when stdout is line-buffered.

use crate::escape::{self, Direction};
use log::trace;
use std::io::{self, Write};

/// Writes `seq` and flushes.
pub fn emit<W: Write>(w: &mut W, seq: &str) -> io::Result<()> {
    trace!("screen: emitting {:?}", seq);
    w.write_all(seq.as_bytes())?;
    w.flush()
}

/// Writes `seq` to stdout and flushes.
pub fn emit_stdout(seq: &str) -> io::Result<()> {
    let stdout = io::stdout();
    let mut lock = stdout.lock();
    emit(&mut lock, seq)
}

pub fn move_cursor(direction: Direction, count: u32) -> io::Result<()> {
    emit_stdout(&escape::movement_sequence(direction, count))
}

pub fn move_cursor_up(count: u32) -> io::Result<()> {
    move_cursor(Direction::Up, count)
}

pub fn move_cursor_down(count: u32) -> io::Result<()> {
    move_cursor(Direction::Down, count)
}

pub fn move_cursor_left(count: u32) -> io::Result<()> {
    move_cursor(Direction::Left, count)
}

pub fn move_cursor_right(count: u32) -> io::Result<()> {
    move_cursor(Direction::Right, count)
}

pub fn set_cursor_pos(line: u32, column: u32) -> io::Result<()> {
    emit_stdout(&escape::set_cursor_sequence(line, column))
}

pub fn save_cursor_pos() -> io::Result<()> {
    emit_stdout(escape::save_cursor())
}

pub fn restore_cursor_pos() -> io::Result<()> {
    emit_stdout(escape::restore_cursor())
}

pub fn clear_line() -> io::Result<()> {
    emit_stdout(escape::clear_line())
}

/// Clears the screen and scrollback and homes the cursor.
pub fn clear() -> io::Result<()> {
    emit_stdout(&escape::clear_screen_and_history())
}

pub fn hide_cursor() -> io::Result<()> {
    emit_stdout(escape::hide_cursor())
}

pub fn show_cursor() -> io::Result<()> {
    emit_stdout(escape::show_cursor())
}

pub fn set_term_title(title: &str) -> io::Result<()> {
    emit_stdout(&escape::set_title(title))
}
