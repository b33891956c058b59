// src/layout.rs

//! Horizontal centering against the terminal width.
//!
//! Offsets are `floor(width / 2) - floor(text_width / 2)`, saturating at zero
//! when the text is wider than the terminal. The `*_in` functions take the
//! terminal width explicitly; the others query the controlling terminal and
//! propagate `GeometryUnavailable`.

use crate::error::Result;
use crate::platform::TerminalDevice;

/// How wide a line is when rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum VisualWidth {
    /// Measure the text itself (character count).
    #[default]
    Auto,
    /// Caller-supplied width, for text with embedded escape sequences.
    /// `Fixed(0)` measures like `Auto`.
    Fixed(usize),
}

impl VisualWidth {
    fn resolve(self, line: &str) -> usize {
        match self {
            VisualWidth::Auto | VisualWidth::Fixed(0) => measure(line),
            VisualWidth::Fixed(width) => width,
        }
    }
}

/// `0` is the auto-detect sentinel.
impl From<usize> for VisualWidth {
    fn from(width: usize) -> Self {
        if width == 0 {
            VisualWidth::Auto
        } else {
            VisualWidth::Fixed(width)
        }
    }
}

fn measure(line: &str) -> usize {
    line.trim_end_matches('\r').chars().count()
}

fn offset(terminal_width: usize, text_width: usize) -> usize {
    (terminal_width / 2).saturating_sub(text_width / 2)
}

/// Empty lines stay empty.
fn indent(offset: usize, line: &str, out: &mut String) {
    if line.is_empty() {
        return;
    }
    out.extend(std::iter::repeat(' ').take(offset));
    out.push_str(line);
}

/// Centers one line in a terminal `terminal_width` columns wide.
pub fn center_line_in(terminal_width: usize, line: &str, visual_width: VisualWidth) -> String {
    let mut out = String::new();
    indent(offset(terminal_width, visual_width.resolve(line)), line, &mut out);
    out
}

/// Centers every `\n`-separated line on its own. With `Auto`, each line is
/// measured separately; a fixed width applies to all lines.
pub fn center_text_in(terminal_width: usize, text: &str, visual_width: VisualWidth) -> String {
    let mut out = String::with_capacity(text.len());
    for (i, line) in text.split('\n').enumerate() {
        if i > 0 {
            out.push('\n');
        }
        indent(offset(terminal_width, visual_width.resolve(line)), line, &mut out);
    }
    out
}

/// Centers `text` as a block: one offset, computed from the fixed width or
/// from the first line when `Auto`, is applied to every line so the block
/// keeps its internal alignment.
pub fn center_text_block_in(
    terminal_width: usize,
    text: &str,
    visual_width: VisualWidth,
) -> String {
    let first_line = text.split('\n').next().unwrap_or("");
    let block_offset = offset(terminal_width, visual_width.resolve(first_line));

    let mut out = String::with_capacity(text.len());
    for (i, line) in text.split('\n').enumerate() {
        if i > 0 {
            out.push('\n');
        }
        indent(block_offset, line, &mut out);
    }
    out
}

/// A layout helper bound to a terminal device.
pub struct TextLayout<'a, D: TerminalDevice> {
    device: &'a D,
}

impl<'a, D: TerminalDevice> TextLayout<'a, D> {
    pub fn new(device: &'a D) -> Self {
        Self { device }
    }

    fn width(&self) -> Result<usize> {
        Ok(self.device.size()?.width as usize)
    }

    pub fn center_line(&self, line: &str, visual_width: VisualWidth) -> Result<String> {
        Ok(center_line_in(self.width()?, line, visual_width))
    }

    pub fn center_text(&self, text: &str, visual_width: VisualWidth) -> Result<String> {
        Ok(center_text_in(self.width()?, text, visual_width))
    }

    pub fn center_text_block(&self, text: &str, visual_width: VisualWidth) -> Result<String> {
        Ok(center_text_block_in(self.width()?, text, visual_width))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::geometry::TerminalSize;
    use crate::platform::mock::MockTerminal;
    use test_log::test;

    #[test]
    fn single_char_lands_at_midpoint() {
        for width in [1usize, 2, 79, 80, 81, 200] {
            let centered = center_line_in(width, "x", VisualWidth::from(0));
            assert_eq!(centered, format!("{}x", " ".repeat(width / 2)));
        }
    }

    #[test]
    fn fixed_width_overrides_measurement() {
        let styled = "\x1b[1mhi\x1b[22m";
        let centered = center_line_in(20, styled, VisualWidth::Fixed(2));
        assert_eq!(centered, format!("{}{}", " ".repeat(9), styled));
    }

    #[test]
    fn fixed_zero_width_measures_like_auto() {
        for line in ["x", "abcdef", "éé"] {
            assert_eq!(
                center_line_in(40, line, VisualWidth::Fixed(0)),
                center_line_in(40, line, VisualWidth::Auto)
            );
        }
        assert_eq!(
            center_text_block_in(20, "abcd\nab", VisualWidth::Fixed(0)),
            "        abcd\n        ab"
        );
    }

    #[test]
    fn wider_than_terminal_saturates_at_zero() {
        let long = "y".repeat(50);
        assert_eq!(center_line_in(10, &long, VisualWidth::Auto), long);
        assert_eq!(center_line_in(10, "z", VisualWidth::Fixed(usize::MAX)), "z");
        assert_eq!(center_line_in(0, "z", VisualWidth::Auto), "z");
    }

    #[test]
    fn auto_width_counts_characters_not_bytes() {
        // Four characters, eight bytes.
        let centered = center_line_in(10, "éééé", VisualWidth::Auto);
        assert_eq!(centered, "   éééé");
    }

    #[test]
    fn center_text_keeps_line_breaks() {
        let centered = center_text_in(10, "ab\n\ncd", VisualWidth::Auto);
        assert_eq!(centered, "    ab\n\n    cd");
    }

    #[test]
    fn center_text_and_block_diverge_on_ragged_lines() {
        let text = "abcdef\nab";
        let per_line = center_text_in(20, text, VisualWidth::Auto);
        let block = center_text_block_in(20, text, VisualWidth::Auto);

        assert_eq!(per_line, "       abcdef\n         ab");
        assert_eq!(block, "       abcdef\n       ab");
        assert_ne!(per_line, block);
    }

    #[test]
    fn fixed_width_applies_uniformly_in_both_modes() {
        let text = "abcdef\nab";
        let per_line = center_text_in(20, text, VisualWidth::Fixed(4));
        let block = center_text_block_in(20, text, VisualWidth::Fixed(4));
        assert_eq!(per_line, "        abcdef\n        ab");
        assert_eq!(per_line, block);
    }

    #[test]
    fn trailing_newline_is_preserved() {
        assert_eq!(center_text_in(4, "a\n", VisualWidth::Auto), "  a\n");
        assert_eq!(center_text_block_in(4, "a\n", VisualWidth::Auto), "  a\n");
        assert_eq!(center_text_in(80, "\n\n", VisualWidth::Auto), "\n\n");
    }

    #[test]
    fn layout_uses_device_width() {
        let device = MockTerminal::new(Some(TerminalSize::new(30, 10)));
        let layout = TextLayout::new(&device);
        assert_eq!(
            layout.center_line("x", VisualWidth::Auto).unwrap(),
            format!("{}x", " ".repeat(15))
        );
    }

    #[test]
    fn layout_surfaces_missing_geometry() {
        let device = MockTerminal::new(None);
        let layout = TextLayout::new(&device);
        assert!(matches!(
            layout.center_text_block("x", VisualWidth::Auto),
            Err(Error::GeometryUnavailable(_))
        ));
    }
}
