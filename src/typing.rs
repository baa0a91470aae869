//! Typewriter-style output: one character at a time, flushed immediately.

use std::time::Duration;

use crate::config::defaults;
use crate::error::ScreenResult;
use crate::screen::FrameContext;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Typist {
    char_delay: Duration,
    line_delay: Duration,
}

impl Typist {
    /// Line pause defaults to ten character delays.
    pub fn new(char_delay: Duration) -> Self {
        Self {
            char_delay,
            line_delay: char_delay * defaults::LINE_DELAY_FACTOR,
        }
    }

    pub fn with_line_delay(mut self, line_delay: Duration) -> Self {
        self.line_delay = line_delay;
        self
    }

    /// No pauses at all; output is byte-for-byte the input.
    pub fn instant() -> Self {
        Self::new(Duration::ZERO)
    }

    pub fn char_delay(&self) -> Duration {
        self.char_delay
    }

    pub fn line_delay(&self) -> Duration {
        self.line_delay
    }

    /// Print `text` character by character. Blanks are written without a pause, every other
    /// character is followed by `char_delay`, and every line (including the last, possibly
    /// empty one) is followed by `line_delay`. Newlines are written only between lines, so
    /// the output equals the input.
    pub fn type_print(&self, ctx: &mut FrameContext<'_>, text: &str) -> ScreenResult<()> {
        let mut buf = [0u8; 4];
        let mut lines = text.split('\n').peekable();

        while let Some(line) = lines.next() {
            for ch in line.chars() {
                ctx.out.write_all(ch.encode_utf8(&mut buf).as_bytes())?;
                ctx.out.flush()?;
                if ch == ' ' {
                    ctx.pacer.check()?;
                } else {
                    ctx.pause(self.char_delay)?;
                }
            }
            if lines.peek().is_some() {
                ctx.out.write_all(b"\n")?;
                ctx.out.flush()?;
            }
            ctx.pause(self.line_delay)?;
        }
        Ok(())
    }
}

impl Default for Typist {
    fn default() -> Self {
        Self::new(defaults::CHAR_DELAY)
    }
}
