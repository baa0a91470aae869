//! A large digital clock with the date above it.

use chrono::{Datelike, Local, NaiveDateTime, Timelike};
use clap::Args;

use super::{FrameContext, Screen};
use crate::config::defaults;
use crate::error::ScreenResult;
use crate::layout::TextLayout;
use crate::terminal::TerminalGeometry;

#[derive(Debug, Clone, Default, Args)]
pub struct ClockArgs {
    /// Show the time in 12-hour format with an am/pm suffix
    #[arg(short = 'f', long = "format")]
    pub twelve_hour: bool,
}

const GLYPH_ROWS: usize = 6;

/// Figlet "standard" font, every glyph 7 columns by 6 rows.
fn glyph(c: char) -> Option<[&'static str; GLYPH_ROWS]> {
    let rows = match c {
        '0' => [r"  ___  ", r" / _ \ ", r"| | | |", r"| |_| |", r" \___/ ", r"       "],
        '1' => [r"   _   ", r"  / |  ", r"  | |  ", r"  | |  ", r"  |_|  ", r"       "],
        '2' => [r" ____  ", r"|___ \ ", r"  __) |", r" / __/ ", r"|_____|", r"       "],
        '3' => [r" _____ ", r"|___ / ", r"  |_ \ ", r" ___) |", r"|____/ ", r"       "],
        '4' => [r" _  _  ", r"| || | ", r"| || | ", r"|__  | ", r"   |_| ", r"       "],
        '5' => [r" ____  ", r"| ___| ", r"|___ \ ", r" ___) |", r"|____/ ", r"       "],
        '6' => [r"  __   ", r" / /_  ", r"| '_ \ ", r"| (_) |", r" \___/ ", r"       "],
        '7' => [r" _____ ", r"|___  |", r"   / / ", r"  / /  ", r" /_/   ", r"       "],
        '8' => [r"  ___  ", r" ( _ ) ", r" / _ \ ", r"| (_) |", r" \___/ ", r"       "],
        '9' => [r"  ___  ", r" / _ \ ", r"| (_) |", r" \__, |", r"   /_/ ", r"       "],
        ':' => [r"       ", r"   _   ", r"  (_)  ", r"   _   ", r"  (_)  ", r"       "],
        'm' => [r"       ", r" _ _ _ ", r"|     |", r"| | | |", r"|_|_|_|", r"       "],
        'p' => [r"       ", r" _ __  ", r"| `_ \ ", r"| |_) |", r"| .__/ ", r"|_|    "],
        'a' => [r"       ", r"  __ _ ", r" / _` |", r"| (_| |", r" \__,_|", r"       "],
        _ => return None,
    };
    Some(rows)
}

/// `1st`, `2nd`, `3rd`, `4th`, ..., `11th`, `12th`, `13th`, ..., `21st`.
pub fn day_suffix(day: u32) -> &'static str {
    match (day % 10, day % 100) {
        (_, 11..=13) => "th",
        (1, _) => "st",
        (2, _) => "nd",
        (3, _) => "rd",
        _ => "th",
    }
}

/// "Sunday, 18th October 2026"
pub fn date_line(now: &NaiveDateTime) -> String {
    format!(
        "{}, {}{} {}",
        now.format("%A"),
        now.day(),
        day_suffix(now.day()),
        now.format("%B %Y")
    )
}

/// The time as plain characters: `HH:MM` or `H:MMam` / `H:MMpm`.
pub fn clock_text(now: &NaiveDateTime, twelve_hour: bool) -> String {
    if !twelve_hour {
        return format!("{:02}:{:02}", now.hour(), now.minute());
    }
    let (pm, hour) = now.hour12();
    format!(
        "{}:{:02}{}",
        hour,
        now.minute(),
        if pm { "pm" } else { "am" }
    )
}

/// Render `text` in the large font, one output line per glyph row.
pub fn ascii_time(text: &str) -> String {
    let glyphs: Vec<_> = text.chars().filter_map(glyph).collect();
    let mut out = String::new();
    for row in 0..GLYPH_ROWS {
        for g in &glyphs {
            out.push_str(g[row]);
        }
        out.push('\n');
    }
    out
}

pub struct ClockScreen {
    twelve_hour: bool,
    geometry: TerminalGeometry,
    layout: TextLayout,
    now: fn() -> NaiveDateTime,
}

impl ClockScreen {
    pub fn from_args(args: ClockArgs) -> ScreenResult<Self> {
        Ok(Self::new(args.twelve_hour, TerminalGeometry::new()))
    }

    pub fn new(twelve_hour: bool, geometry: TerminalGeometry) -> Self {
        let layout = TextLayout::new(geometry.current());
        Self {
            twelve_hour,
            geometry,
            layout,
            now: || Local::now().naive_local(),
        }
    }

    pub fn with_clock(mut self, now: fn() -> NaiveDateTime) -> Self {
        self.now = now;
        self
    }

    pub fn frame_text(&mut self, now: &NaiveDateTime) -> String {
        self.layout.set_geometry(self.geometry.refresh());
        let text = format!(
            "\n{}\n{}\n",
            date_line(now),
            ascii_time(&clock_text(now, self.twelve_hour))
        );
        let text = self.layout.center_horizontally(&text);
        self.layout.center_vertically(&text)
    }
}

impl Screen for ClockScreen {
    fn name(&self) -> &'static str {
        "clock"
    }

    fn description(&self) -> &'static str {
        "displays a digital clock on screen"
    }

    fn cleanup_per_cycle(&self) -> bool {
        true
    }

    fn render_frame(&mut self, ctx: &mut FrameContext<'_>) -> ScreenResult<()> {
        let now = (self.now)();
        let text = self.frame_text(&now);
        ctx.print(&text)?;
        ctx.pause(if self.twelve_hour {
            defaults::CLOCK_FRAME_12H
        } else {
            defaults::CLOCK_FRAME
        })
    }
}
