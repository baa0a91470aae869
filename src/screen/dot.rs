//! A run of characters sliding left to right, growing or shrinking on each pass.

use std::time::Duration;

use clap::Args;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::{seconds_option, FrameContext, Screen};
use crate::config::defaults;
use crate::error::ScreenResult;
use crate::layout::Position;
use crate::terminal::{Geometry, TerminalGeometry};

#[derive(Debug, Clone, Args)]
pub struct DotArgs {
    /// Character to draw
    #[arg(short = 'c', long = "char", default_value_t = defaults::DOT_CHAR)]
    pub glyph: char,

    /// Seconds between steps (keep it between 0.01 and 0.1)
    #[arg(short, long, default_value_t = defaults::DOT_DELAY.as_secs_f64())]
    pub delay: f64,
}

pub struct DotScreen {
    glyph: char,
    delay: Duration,
    text: String,
    position: Position,
    geometry: TerminalGeometry,
    rng: StdRng,
}

impl DotScreen {
    pub fn from_args(args: DotArgs) -> ScreenResult<Self> {
        let delay = seconds_option("delay", args.delay)?;
        Ok(Self::new(args.glyph, delay, TerminalGeometry::new()))
    }

    pub fn new(glyph: char, delay: Duration, geometry: TerminalGeometry) -> Self {
        Self {
            glyph,
            delay,
            text: String::new(),
            position: Position::default(),
            geometry,
            rng: StdRng::from_entropy(),
        }
    }

    pub fn with_rng(mut self, rng: StdRng) -> Self {
        self.rng = rng;
        self
    }

    pub fn position(&self) -> Position {
        self.position
    }

    /// Advance one column. Reaching the right edge starts a new pass on a random row with
    /// the run one character longer or shorter.
    pub fn step(&mut self, size: Geometry) -> String {
        let width = size.width();
        let len = self.text.chars().count();

        if len == 0 || self.position.x + len >= width {
            self.position.x = 0;
            self.position.y = self.rng.gen_range(0..size.height());
            let shrink = len > 1 && (len + 1 >= width || self.rng.gen_bool(0.5));
            if shrink {
                self.text.pop();
            } else if len + 1 < width {
                self.text.push(self.glyph);
            }
        }
        self.position.x += 1;

        format!(
            "{}{}{}",
            "\n".repeat(self.position.y),
            " ".repeat(self.position.x),
            self.text
        )
    }
}

impl Screen for DotScreen {
    fn name(&self) -> &'static str {
        "dot"
    }

    fn description(&self) -> &'static str {
        "displays a random running dot"
    }

    fn cleanup_per_cycle(&self) -> bool {
        true
    }

    fn render_frame(&mut self, ctx: &mut FrameContext<'_>) -> ScreenResult<()> {
        let size = self.geometry.refresh();
        let frame = self.step(size);
        ctx.print(&frame)?;
        ctx.pause(self.delay)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::display_width;
    use crate::screen::RecordingPacer;

    fn dot(width: u16, height: u16) -> DotScreen {
        DotScreen::new('*', Duration::from_millis(50), TerminalGeometry::fixed(width, height))
            .with_rng(StdRng::seed_from_u64(3))
    }

    #[test]
    fn run_always_fits_the_terminal() {
        let size = Geometry::new(12, 6);
        let mut screen = dot(12, 6);
        for _ in 0..500 {
            let frame = screen.step(size);
            let last = frame.lines().last().unwrap();
            assert!(display_width(last) <= 12, "{last:?}");
            assert!(screen.position().y < 6);
        }
    }

    #[test]
    fn moves_one_column_per_step() {
        let size = Geometry::new(40, 10);
        let mut screen = dot(40, 10);
        screen.step(size);
        let row = screen.position().y;
        assert_eq!(screen.position().x, 1);
        screen.step(size);
        assert_eq!(screen.position(), Position { x: 2, y: row });
    }

    #[test]
    fn frame_is_printed_then_paced() {
        let mut screen = dot(20, 5);
        let pacer = RecordingPacer::new();
        let mut out = Vec::new();
        let mut ctx = FrameContext::new(&mut out, &pacer);
        screen.render_frame(&mut ctx).unwrap();

        assert!(String::from_utf8_lossy(&out).ends_with(" *"));
        assert_eq!(pacer.pauses(), vec![Duration::from_millis(50)]);
    }
}
