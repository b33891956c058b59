// src/escape.rs

//! ANSI/VT escape-sequence construction.
//!
//! Everything in here is pure string building. Styling wrappers are always
//! self-closing: the text they wrap is followed by the closer for the same
//! attribute, so the style never leaks into subsequent output.
//!
//! Optional padding compensates for tools that measure alignment by raw byte
//! length: the wrapper is prefixed with one space per non-printing byte it
//! injects. The count depends on the decimal width of each color channel and
//! is recomputed on every call.

use std::fmt;

// --- ANSI Escape Code Constants ---

/// Reset all SGR attributes (colors and text effects).
pub const DEFAULT_TERM_STYLE: &str = "\x1b[0m";
/// Leave the alternate screen buffer.
pub const NORMAL_SCREEN_BUFFER: &str = "\x1b[?47l";

const CSI: &str = "\x1b[";
const OSC_SET_TITLE: &str = "\x1b]2;";
const BEL: char = '\x07';

const CURSOR_HIDE: &str = "\x1b[?25l";
const CURSOR_SHOW: &str = "\x1b[?25h";
const CURSOR_SAVE: &str = "\x1b[s";
const CURSOR_RESTORE: &str = "\x1b[u";
const CURSOR_HOME: &str = "\x1b[H";
const CLEAR_LINE: &str = "\x1b[2K";
const CLEAR_SCREEN: &str = "\x1b[2J";
const CLEAR_SCROLLBACK: &str = "\x1b[3J";

const SGR_BOLD_ON: &str = "\x1b[1m";
const SGR_BOLD_OFF: &str = "\x1b[22m";
const SGR_UNDERLINE_ON: &str = "\x1b[4m";
const SGR_UNDERLINE_OFF: &str = "\x1b[24m";
const SGR_FG_DEFAULT: &str = "\x1b[39m";
const SGR_BG_DEFAULT: &str = "\x1b[49m";

/// Which layer a 24-bit color applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColorRole {
    Foreground,
    Background,
}

impl ColorRole {
    /// SGR selector for a direct (24-bit) color on this layer.
    fn direct_selector(self) -> u8 {
        match self {
            ColorRole::Foreground => 38,
            ColorRole::Background => 48,
        }
    }

    /// SGR sequence restoring this layer's default color.
    fn closer(self) -> &'static str {
        match self {
            ColorRole::Foreground => SGR_FG_DEFAULT,
            ColorRole::Background => SGR_BG_DEFAULT,
        }
    }
}

/// A single styling request.
///
/// Channels are `u8`, so values outside 0-255 cannot be expressed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StyleRequest {
    Foreground(u8, u8, u8),
    Background(u8, u8, u8),
    Bold,
    Underline,
    Reset,
}

impl StyleRequest {
    /// The sequence emitted before the wrapped text.
    pub fn opener(&self) -> String {
        match *self {
            StyleRequest::Foreground(r, g, b) => direct_color(ColorRole::Foreground, r, g, b),
            StyleRequest::Background(r, g, b) => direct_color(ColorRole::Background, r, g, b),
            StyleRequest::Bold => SGR_BOLD_ON.to_string(),
            StyleRequest::Underline => SGR_UNDERLINE_ON.to_string(),
            StyleRequest::Reset => DEFAULT_TERM_STYLE.to_string(),
        }
    }

    /// The sequence emitted after the wrapped text. `Reset` has none.
    pub fn closer(&self) -> &'static str {
        match self {
            StyleRequest::Foreground(..) => ColorRole::Foreground.closer(),
            StyleRequest::Background(..) => ColorRole::Background.closer(),
            StyleRequest::Bold => SGR_BOLD_OFF,
            StyleRequest::Underline => SGR_UNDERLINE_OFF,
            StyleRequest::Reset => "",
        }
    }

    /// Number of non-printing bytes this request injects around its text.
    pub fn overhead(&self) -> usize {
        self.opener().len() + self.closer().len()
    }

    /// Wraps `text` in this style, optionally left-padded by [`Self::overhead`] spaces.
    pub fn wrap(&self, text: &str, pad: bool) -> String {
        let opener = self.opener();
        let closer = self.closer();
        let padding = if pad { opener.len() + closer.len() } else { 0 };

        let mut out = String::with_capacity(padding + opener.len() + text.len() + closer.len());
        out.extend(std::iter::repeat(' ').take(padding));
        out.push_str(&opener);
        out.push_str(text);
        out.push_str(closer);
        out
    }
}

fn direct_color(role: ColorRole, r: u8, g: u8, b: u8) -> String {
    format!("{}{};2;{};{};{}m", CSI, role.direct_selector(), r, g, b)
}

/// Wraps `text` in a 24-bit color for `role`, closed by that role's default.
pub fn color_sequence(role: ColorRole, text: &str, r: u8, g: u8, b: u8, pad: bool) -> String {
    let request = match role {
        ColorRole::Foreground => StyleRequest::Foreground(r, g, b),
        ColorRole::Background => StyleRequest::Background(r, g, b),
    };
    request.wrap(text, pad)
}

pub fn rgb_fg(text: &str, r: u8, g: u8, b: u8, pad: bool) -> String {
    color_sequence(ColorRole::Foreground, text, r, g, b, pad)
}

pub fn rgb_bg(text: &str, r: u8, g: u8, b: u8, pad: bool) -> String {
    color_sequence(ColorRole::Background, text, r, g, b, pad)
}

pub fn bold_text(text: &str, pad: bool) -> String {
    StyleRequest::Bold.wrap(text, pad)
}

pub fn underline_text(text: &str) -> String {
    StyleRequest::Underline.wrap(text, false)
}

/// Cursor movement direction for CUU/CUD/CUF/CUB.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Up,
    Down,
    Right,
    Left,
}

impl Direction {
    fn final_byte(self) -> char {
        match self {
            Direction::Up => 'A',
            Direction::Down => 'B',
            Direction::Right => 'C',
            Direction::Left => 'D',
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Direction::Up => "up",
            Direction::Down => "down",
            Direction::Right => "right",
            Direction::Left => "left",
        };
        f.write_str(name)
    }
}

/// Moves the cursor `count` cells in `direction`.
///
/// Terminals treat a count of 0 as 1.
pub fn movement_sequence(direction: Direction, count: u32) -> String {
    format!("{}{}{}", CSI, count, direction.final_byte())
}

/// Places the cursor at `line`, `column` (1-based; 1,1 is the top left).
pub fn set_cursor_sequence(line: u32, column: u32) -> String {
    format!("{}{};{}f", CSI, line, column)
}

pub fn save_cursor() -> &'static str {
    CURSOR_SAVE
}

pub fn restore_cursor() -> &'static str {
    CURSOR_RESTORE
}

pub fn clear_line() -> &'static str {
    CLEAR_LINE
}

/// Clears the visible screen and the scrollback, then homes the cursor.
pub fn clear_screen_and_history() -> String {
    format!("{}{}{}", CLEAR_SCREEN, CLEAR_SCROLLBACK, CURSOR_HOME)
}

pub fn hide_cursor() -> &'static str {
    CURSOR_HIDE
}

pub fn show_cursor() -> &'static str {
    CURSOR_SHOW
}

/// Sets the window title (OSC 2, BEL-terminated).
///
/// Control characters are dropped so the title cannot end the OSC string early.
pub fn set_title(title: &str) -> String {
    let mut out = String::with_capacity(OSC_SET_TITLE.len() + title.len() + 1);
    out.push_str(OSC_SET_TITLE);
    out.extend(title.chars().filter(|c| !c.is_control()));
    out.push(BEL);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_log::test;

    const CHANNEL_BOUNDARIES: [u8; 6] = [0, 9, 10, 99, 100, 255];

    fn digits(v: u8) -> usize {
        v.to_string().len()
    }

    #[test]
    fn foreground_opens_and_closes_foreground() {
        for r in CHANNEL_BOUNDARIES {
            for g in CHANNEL_BOUNDARIES {
                for b in CHANNEL_BOUNDARIES {
                    let s = rgb_fg("txt", r, g, b, false);
                    assert!(s.starts_with(&format!("\x1b[38;2;{};{};{}m", r, g, b)));
                    assert!(s.ends_with("txt\x1b[39m"));
                    assert!(!s.contains("\x1b[49m"));
                }
            }
        }
    }

    #[test]
    fn background_opens_and_closes_background() {
        let s = rgb_bg("txt", 1, 22, 255, false);
        assert_eq!(s, "\x1b[48;2;1;22;255mtxt\x1b[49m");
        assert!(!s.contains("\x1b[39m"));
    }

    #[test]
    fn full_channel_sweep_keeps_roles_paired() {
        for v in 0..=255u8 {
            let fg = rgb_fg("", v, v, v, false);
            let bg = rgb_bg("", v, v, v, false);
            assert!(fg.starts_with("\x1b[38;2;") && fg.ends_with("\x1b[39m"));
            assert!(bg.starts_with("\x1b[48;2;") && bg.ends_with("\x1b[49m"));
        }
    }

    #[test]
    fn padding_tracks_channel_digit_lengths() {
        for v in [0u8, 9, 99, 255] {
            let padded = rgb_fg("x", v, v, v, true);
            let leading = padded.chars().take_while(|c| *c == ' ').count();
            // "\x1b[38;2;" + three channels + two ';' + 'm' + "\x1b[39m"
            let expected = 7 + 3 * digits(v) + 2 + 1 + 5;
            assert_eq!(leading, expected, "channel value {}", v);
            assert_eq!(leading, StyleRequest::Foreground(v, v, v).overhead());
            assert_eq!(&padded[leading..], rgb_fg("x", v, v, v, false));
        }
    }

    #[test]
    fn color_padding_is_fifteen_plus_channel_digits() {
        let s = rgb_bg("", 255, 0, 42, true);
        let leading = s.chars().take_while(|c| *c == ' ').count();
        assert_eq!(leading, 15 + 3 + 1 + 2);
    }

    #[test]
    fn bold_is_self_closing_and_pads_exactly() {
        assert_eq!(bold_text("hi", false), "\x1b[1mhi\x1b[22m");
        let padded = bold_text("hi", true);
        assert_eq!(padded, format!("{}\x1b[1mhi\x1b[22m", " ".repeat(9)));
    }

    #[test]
    fn underline_is_self_closing() {
        assert_eq!(underline_text("u"), "\x1b[4mu\x1b[24m");
        assert_eq!(StyleRequest::Underline.overhead(), 9);
    }

    #[test]
    fn reset_has_no_closer() {
        assert_eq!(StyleRequest::Reset.wrap("t", false), "\x1b[0mt");
        assert_eq!(StyleRequest::Reset.overhead(), DEFAULT_TERM_STYLE.len());
    }

    #[test]
    fn movement_sequences_use_cursor_final_bytes() {
        assert_eq!(movement_sequence(Direction::Up, 3), "\x1b[3A");
        assert_eq!(movement_sequence(Direction::Down, 1), "\x1b[1B");
        assert_eq!(movement_sequence(Direction::Right, 12), "\x1b[12C");
        assert_eq!(movement_sequence(Direction::Left, 0), "\x1b[0D");
    }

    #[test]
    fn fixed_sequences() {
        assert_eq!(set_cursor_sequence(4, 7), "\x1b[4;7f");
        assert_eq!(save_cursor(), "\x1b[s");
        assert_eq!(restore_cursor(), "\x1b[u");
        assert_eq!(clear_line(), "\x1b[2K");
        assert_eq!(clear_screen_and_history(), "\x1b[2J\x1b[3J\x1b[H");
        assert_eq!(hide_cursor(), "\x1b[?25l");
        assert_eq!(show_cursor(), "\x1b[?25h");
    }

    #[test]
    fn title_is_bel_terminated_and_sanitized() {
        assert_eq!(set_title("hello"), "\x1b]2;hello\x07");
        assert_eq!(set_title("a\x07b\x1b[31mc"), "\x1b]2;ab[31mc\x07");
    }
}
