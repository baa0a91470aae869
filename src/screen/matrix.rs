//! Falling katakana rain, one terminal line per frame.

use std::collections::VecDeque;
use std::time::Duration;

use clap::Args;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::{FrameContext, Screen};
use crate::config::defaults;
use crate::error::{ScreenError, ScreenResult};
use crate::terminal::{Geometry, TerminalGeometry};

const KANA_HALF: &str = "ｱｲｳｴｵｶｷｸｹｺｻｼｽｾｿﾀﾁﾂﾃﾄﾅﾆﾇﾈﾉﾊﾋﾌﾍﾎﾏﾐﾑﾒﾓﾔﾕﾖﾗﾘﾙﾚﾛﾜﾝｦ";
const KANA_FULL: &str = "アイウエオカキクケコサシスセソタチツテトナニヌネノハヒフヘホマミムメモヤユヨラリルレロワヰヱヲンー";
const ALNUM_HALF: &str = "0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ";
const ALNUM_FULL: &str = "０１２３４５６７８９ＡＢＣＤＥＦＧＨＩＪＫＬＭＮＯＰＱＲＳＴＵＶＷＸＹＺ";
const SPACE_HALF: char = ' ';
/// Ideographic space, as wide as a full-width glyph.
const SPACE_FULL: char = '\u{3000}';

#[derive(Debug, Clone, Args)]
pub struct MatrixArgs {
    /// How dense the rain is, from 1 (sparse) to 100 (crowded)
    #[arg(short, long, default_value_t = defaults::MATRIX_GRANULARITY as i64, allow_negative_numbers = true)]
    pub granularity: i64,

    /// Seconds between lines
    #[arg(short, long, allow_negative_numbers = true)]
    pub delay: Option<f64>,

    /// Only katakana, no letters or digits
    #[arg(short, long = "kana-only")]
    pub kana_only: bool,

    /// Full-width characters
    #[arg(short, long)]
    pub zenkaku: bool,
}

pub struct MatrixScreen {
    granularity: u32,
    line_delay: Duration,
    glyphs: Vec<char>,
    space: char,
    /// Columns per glyph.
    proportion: usize,
    columns: Vec<VecDeque<char>>,
    geometry: TerminalGeometry,
    rng: StdRng,
}

impl MatrixScreen {
    pub fn from_args(args: MatrixArgs) -> ScreenResult<Self> {
        if args.granularity <= 0 {
            return Err(ScreenError::invalid_option(
                "granularity",
                "Must be higher than zero",
            ));
        }
        let granularity = u32::try_from(args.granularity)
            .map_err(|_| ScreenError::invalid_option("granularity", "Value is too large"))?;

        let line_delay = match args.delay {
            Some(secs) if secs.is_finite() && secs > 0.0 => Duration::from_secs_f64(secs),
            Some(_) => {
                return Err(ScreenError::invalid_option(
                    "delay",
                    "Must be higher than zero",
                ))
            }
            None => defaults::CHAR_DELAY * defaults::MATRIX_LINE_DELAY_FACTOR,
        };

        Ok(Self::new(
            granularity,
            line_delay,
            args.kana_only,
            args.zenkaku,
            TerminalGeometry::new(),
        ))
    }

    pub fn new(
        granularity: u32,
        line_delay: Duration,
        kana_only: bool,
        zenkaku: bool,
        geometry: TerminalGeometry,
    ) -> Self {
        let (kana, alnum, space, proportion) = if zenkaku {
            (KANA_FULL, ALNUM_FULL, SPACE_FULL, 2)
        } else {
            (KANA_HALF, ALNUM_HALF, SPACE_HALF, 1)
        };
        let mut glyphs: Vec<char> = kana.chars().collect();
        if !kana_only {
            glyphs.extend(alnum.chars());
        }

        Self {
            granularity,
            line_delay,
            glyphs,
            space,
            proportion,
            columns: Vec::new(),
            geometry,
            rng: StdRng::from_entropy(),
        }
    }

    pub fn with_rng(mut self, rng: StdRng) -> Self {
        self.rng = rng;
        self
    }

    /// A run of leading blanks followed by a run of glyphs, never empty.
    fn drop_column(&mut self, size: Geometry) -> VecDeque<char> {
        let height = size.height();
        let sparse = height * 20 / (self.granularity as usize * self.proportion);
        loop {
            let blanks = self.rng.gen_range(0..=sparse).min(height);
            let glyphs = self.rng.gen_range(0..=height - blanks);
            if blanks + glyphs == 0 {
                continue;
            }
            let mut column: VecDeque<char> = std::iter::repeat(self.space).take(blanks).collect();
            for _ in 0..glyphs {
                let idx = self.rng.gen_range(0..self.glyphs.len());
                column.push_back(self.glyphs[idx]);
            }
            return column;
        }
    }

    fn build_columns(&mut self, size: Geometry) {
        let count = size.width() / self.proportion;
        let mut columns = Vec::with_capacity(count);
        for _ in 0..count {
            if self.rng.gen_bool(0.5) {
                columns.push(self.drop_column(size));
            } else {
                let blanks = self.rng.gen_range(0..=size.height());
                columns.push(std::iter::repeat(self.space).take(blanks).collect());
            }
        }
        self.columns = columns;
    }

    /// Pop the head of every column, refilling the ones that ran dry.
    pub fn next_line(&mut self) -> String {
        let size = self.geometry.refresh();
        if self.columns.is_empty() || self.geometry.changed() {
            self.build_columns(size);
        }

        let mut line = String::with_capacity(self.columns.len() * 3);
        for i in 0..self.columns.len() {
            if self.columns[i].is_empty() {
                self.columns[i] = self.drop_column(size);
            }
            if let Some(ch) = self.columns[i].pop_front() {
                line.push(ch);
            }
        }
        line
    }
}

impl Screen for MatrixScreen {
    fn name(&self) -> &'static str {
        "matrix"
    }

    fn description(&self) -> &'static str {
        "displays a matrix movie alike screensaver"
    }

    fn render_frame(&mut self, ctx: &mut FrameContext<'_>) -> ScreenResult<()> {
        let line = self.next_line();
        ctx.print(&line)?;
        ctx.print("\n")?;
        ctx.pause(self.line_delay)
    }
}
