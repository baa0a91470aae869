use std::time::Duration;

use clap::Args;
use rand::rngs::StdRng;
use rand::SeedableRng;

use super::{seconds_option, FrameContext, Screen};
use crate::config::defaults;
use crate::error::{ScreenError, ScreenResult};
use crate::layout::TextLayout;
use crate::terminal::TerminalGeometry;
use crate::typing::Typist;

#[derive(Debug, Clone, Args)]
pub struct RandTxtArgs {
    /// Word to display (quote it if it contains spaces)
    #[arg(short, long, default_value = defaults::RANDTXT_WORD)]
    pub word: String,

    /// Seconds the word stays put before moving
    #[arg(short, long, default_value_t = defaults::RANDTXT_FREEZE.as_secs_f64())]
    pub delay: f64,
}

/// Types a word at a random spot, waits, and does it again somewhere else.
pub struct RandTxtScreen {
    word: String,
    freeze: Duration,
    typist: Typist,
    geometry: TerminalGeometry,
    layout: TextLayout,
    rng: StdRng,
}

impl RandTxtScreen {
    pub fn from_args(args: RandTxtArgs) -> ScreenResult<Self> {
        if args.word.trim().is_empty() {
            return Err(ScreenError::invalid_option("word", "The word can not be blank."));
        }
        let freeze = seconds_option("delay", args.delay)?;
        Ok(Self::new(args.word, freeze, TerminalGeometry::new()))
    }

    pub fn new(word: String, freeze: Duration, geometry: TerminalGeometry) -> Self {
        let layout = TextLayout::new(geometry.current());
        Self {
            word,
            freeze,
            typist: Typist::new(defaults::RANDTXT_CHAR_DELAY).with_line_delay(Duration::ZERO),
            geometry,
            layout,
            rng: StdRng::from_entropy(),
        }
    }

    pub fn with_rng(mut self, rng: StdRng) -> Self {
        self.rng = rng;
        self
    }
}

impl Screen for RandTxtScreen {
    fn name(&self) -> &'static str {
        "randtxt"
    }

    fn description(&self) -> &'static str {
        "displays word in random places on screen"
    }

    fn cleanup_per_cycle(&self) -> bool {
        true
    }

    fn render_frame(&mut self, ctx: &mut FrameContext<'_>) -> ScreenResult<()> {
        self.layout.set_geometry(self.geometry.refresh());
        let text = self
            .layout
            .randomize_horizontally_with(&self.word, &mut self.rng);
        let text = self.layout.randomize_vertically_with(&text, &mut self.rng);
        self.typist.type_print(ctx, &text)?;
        ctx.pause(self.freeze)
    }
}
