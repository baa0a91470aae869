//! Text placement on the terminal: wrapping, centering, right alignment and randomized
//! positioning. Widths are measured in display columns, not bytes.

use rand::Rng;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use crate::terminal::Geometry;

/// Last placement computed by a centering or randomizing call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Position {
    pub x: usize,
    pub y: usize,
}

#[derive(Debug, Clone)]
pub struct TextLayout {
    geometry: Geometry,
    position: Position,
}

impl TextLayout {
    pub fn new(geometry: Geometry) -> Self {
        Self {
            geometry,
            position: Position::default(),
        }
    }

    pub fn set_geometry(&mut self, geometry: Geometry) {
        self.geometry = geometry;
    }

    pub fn geometry(&self) -> Geometry {
        self.geometry
    }

    pub fn position(&self) -> Position {
        self.position
    }

    /// Reflow every line to at most the terminal width. Existing newlines are kept as hard
    /// breaks, and every output line is padded to the widest input line (capped at the
    /// terminal width) so the block keeps its shape once centered.
    pub fn wrap(&self, text: &str) -> String {
        if text.is_empty() {
            return String::new();
        }

        let limit = self.geometry.width();
        let widest = text.split('\n').map(display_width).max().unwrap_or(0);
        let block = widest.min(limit);

        let mut lines = Vec::new();
        for line in text.split('\n') {
            wrap_line(line, limit, &mut lines);
        }

        lines
            .iter()
            .map(|l| pad_right(l, block))
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Left-pad each line by `ceil((width - len) / 2)` columns (never negative).
    /// Each input line comes back terminated by a newline.
    pub fn center_horizontally(&self, text: &str) -> String {
        let width = self.geometry.width();
        let mut out = String::with_capacity(text.len());
        for line in text.lines() {
            let pad = (width.saturating_sub(display_width(line)) + 1) / 2;
            out.push_str(&" ".repeat(pad));
            out.push_str(line);
            out.push('\n');
        }
        out
    }

    /// Prepend `floor((height - lines) / 2)` blank lines (never negative).
    pub fn center_vertically(&mut self, text: &str) -> String {
        let pad = self
            .geometry
            .height()
            .saturating_sub(line_count(text))
            / 2;
        self.position.y = pad;
        format!("{}{}", "\n".repeat(pad), text)
    }

    /// Left-pad a single line so it ends on the last column.
    pub fn align_right(&self, text: &str) -> String {
        let pad = self.geometry.width().saturating_sub(display_width(text));
        format!("{}{}", " ".repeat(pad), text)
    }

    pub fn randomize_horizontally(&mut self, text: &str) -> String {
        self.randomize_horizontally_with(text, &mut rand::thread_rng())
    }

    /// Shift every line right by a random `x` in `[0, width - longest line]`.
    pub fn randomize_horizontally_with<R: Rng>(
        &mut self,
        text: &str,
        rng: &mut R,
    ) -> String {
        let longest = text.lines().map(display_width).max().unwrap_or(0);
        let room = self.geometry.width().saturating_sub(longest);
        self.position.x = rng.gen_range(0..=room);

        let pad = " ".repeat(self.position.x);
        text.split('\n')
            .map(|line| {
                if line.is_empty() {
                    String::new()
                } else {
                    format!("{pad}{line}")
                }
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    pub fn randomize_vertically(&mut self, text: &str) -> String {
        self.randomize_vertically_with(text, &mut rand::thread_rng())
    }

    /// Push the text down by a random `y` in `[0, height - lines]`.
    pub fn randomize_vertically_with<R: Rng>(
        &mut self,
        text: &str,
        rng: &mut R,
    ) -> String {
        let room = self.geometry.height().saturating_sub(line_count(text));
        self.position.y = rng.gen_range(0..=room);
        format!("{}{}", "\n".repeat(self.position.y), text)
    }
}

pub fn display_width(s: &str) -> usize {
    UnicodeWidthStr::width(s)
}

fn line_count(text: &str) -> usize {
    text.lines().count()
}

fn pad_right(line: &str, width: usize) -> String {
    let w = display_width(line);
    if w >= width {
        line.to_string()
    } else {
        format!("{line}{}", " ".repeat(width - w))
    }
}

/// Split one hard line into pieces no wider than `limit`, breaking at the last blank that
/// fits and splitting words that are wider than the whole line. Inner spacing is kept.
fn wrap_line(line: &str, limit: usize, out: &mut Vec<String>) {
    let mut rest = line;
    loop {
        if display_width(rest) <= limit {
            out.push(rest.to_string());
            return;
        }

        // Byte offset where the first `limit` columns end.
        let mut cut = 0;
        let mut cols = 0;
        for (idx, ch) in rest.char_indices() {
            let w = UnicodeWidthChar::width(ch).unwrap_or(0);
            if cols + w > limit {
                break;
            }
            cols += w;
            cut = idx + ch.len_utf8();
        }
        if cut == 0 {
            // A single glyph wider than the terminal; emit it alone.
            cut = rest.chars().next().map(char::len_utf8).unwrap_or(rest.len());
        }

        match rest[..cut].rfind(' ').filter(|&i| i > 0) {
            Some(space) => {
                out.push(rest[..space].to_string());
                rest = &rest[space + 1..];
            }
            None if rest[cut..].starts_with(' ') => {
                out.push(rest[..cut].to_string());
                rest = &rest[cut + 1..];
            }
            None => {
                out.push(rest[..cut].to_string());
                rest = &rest[cut..];
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn layout(width: u16, height: u16) -> TextLayout {
        TextLayout::new(Geometry::new(width, height))
    }

    fn leading_spaces(s: &str) -> usize {
        s.len() - s.trim_start_matches(' ').len()
    }

    #[test]
    fn centers_short_line_at_ceil_half() {
        let out = layout(80, 25).center_horizontally("hi");
        assert_eq!(leading_spaces(&out), 39);
        assert_eq!(out.trim(), "hi");
        assert!(out.ends_with('\n'));

        let out = layout(80, 25).center_horizontally("odd");
        assert_eq!(leading_spaces(&out), 39);
    }

    #[test]
    fn horizontal_centering_never_truncates() {
        let long = "x".repeat(100);
        let out = layout(80, 25).center_horizontally(&long);
        assert_eq!(out, format!("{long}\n"));
    }

    #[test]
    fn horizontal_centering_emits_one_newline_per_line() {
        let out = layout(20, 5).center_horizontally("ab\ncdef\n");
        assert_eq!(out.matches('\n').count(), 2);
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(leading_spaces(lines[0]), 9);
        assert_eq!(leading_spaces(lines[1]), 8);
    }

    #[test]
    fn centers_vertically_with_floor_half() {
        let mut l = layout(80, 25);
        let out = l.center_vertically("1\n2\n3\n4\n5");
        assert!(out.starts_with(&"\n".repeat(10)));
        assert!(!out.starts_with(&"\n".repeat(11)));
        assert_eq!(l.position().y, 10);
    }

    #[test]
    fn vertical_centering_clamps_when_text_is_taller() {
        let mut l = layout(80, 3);
        let text = "a\nb\nc\nd";
        assert_eq!(l.center_vertically(text), text);
        assert_eq!(l.position().y, 0);
    }

    #[test]
    fn empty_text_is_trivial() {
        let mut l = layout(80, 25);
        assert_eq!(l.wrap(""), "");
        assert_eq!(l.center_horizontally(""), "");
        assert_eq!(l.center_vertically(""), "\n".repeat(12));
        assert_eq!(l.align_right(""), " ".repeat(80));
        assert_eq!(l.randomize_horizontally(""), "");
    }

    #[test]
    fn align_right_ends_on_last_column() {
        let out = layout(10, 5).align_right("abc");
        assert_eq!(out, "       abc");
        assert_eq!(layout(2, 5).align_right("abc"), "abc");
    }

    #[test]
    fn wrap_keeps_hard_breaks_and_block_shape() {
        let out = layout(80, 25).wrap("ab\nabcd");
        assert_eq!(out, "ab  \nabcd");
    }

    #[test]
    fn wrap_breaks_at_last_blank_that_fits() {
        let out = layout(10, 25).wrap("the quick brown fox");
        let lines: Vec<&str> = out.split('\n').collect();
        assert_eq!(lines, vec!["the quick ", "brown fox "]);
        assert!(lines.iter().all(|l| display_width(l) <= 10));
    }

    #[test]
    fn wrap_hard_splits_long_words() {
        let out = layout(4, 25).wrap("abcdefghij");
        assert_eq!(out, "abcd\nefgh\nij  ");
    }

    #[test]
    fn wrap_measures_display_columns() {
        // Each katakana is two columns wide.
        let out = layout(4, 25).wrap("アイウ");
        assert_eq!(out, "アイ\nウ  ");
    }

    #[test]
    fn randomized_positions_stay_inside_the_terminal() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut l = layout(20, 6);
        for _ in 0..500 {
            let out = l.randomize_horizontally_with("hello", &mut rng);
            let x = l.position().x;
            assert!(x <= 15);
            assert_eq!(leading_spaces(&out), x);

            let out = l.randomize_vertically_with("a\nb", &mut rng);
            let y = l.position().y;
            assert!(y <= 4);
            assert!(out.starts_with(&"\n".repeat(y)));
        }
    }

    #[test]
    fn randomize_with_oversized_content_pins_to_origin() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut l = layout(3, 1);
        let text = "wider than three";
        assert_eq!(l.randomize_horizontally_with(text, &mut rng), text);
        assert_eq!(l.position().x, 0);
        assert_eq!(l.randomize_vertically_with("a\nb", &mut rng), "a\nb");
        assert_eq!(l.position().y, 0);
    }

    #[test]
    fn randomize_shifts_every_line_equally() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut l = layout(40, 10);
        let out = l.randomize_horizontally_with("ab\nabcdef", &mut rng);
        let x = l.position().x;
        for line in out.lines() {
            assert_eq!(leading_spaces(line), x);
        }
    }
}
