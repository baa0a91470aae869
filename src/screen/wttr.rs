use std::time::Duration;

use clap::{Args, ValueEnum};

use super::{seconds_option, FrameContext, Screen};
use crate::config::{defaults, Settings};
use crate::error::ScreenResult;
use crate::fetch::{Fetch, UrlFetcher};
use crate::layout::TextLayout;
use crate::terminal::TerminalGeometry;
use crate::typing::Typist;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Units {
    Metric,
    Imperial,
}

#[derive(Debug, Clone, Args)]
pub struct WttrArgs {
    /// Seconds between weather refreshes
    #[arg(short, long, default_value_t = defaults::WTTR_REFRESH.as_secs_f64())]
    pub delay: f64,

    /// Type the report out instead of printing it at once
    #[arg(short, long)]
    pub typing: bool,

    /// Units for temperature and wind speed
    #[arg(short, long, value_enum)]
    pub units: Option<Units>,

    /// Narrow the report to 80 columns
    #[arg(short, long)]
    pub narrow: bool,
}

/// Build the wttr.in address for the given display options.
pub fn wttr_url(units: Option<Units>, narrow: bool) -> String {
    let mut url = defaults::WTTR_URL.to_string();
    match units {
        Some(Units::Metric) => url.push('m'),
        Some(Units::Imperial) => url.push('u'),
        None => {}
    }
    if narrow {
        url.push('n');
    }
    url
}

/// Weather report from wttr.in, refreshed periodically.
pub struct WttrScreen {
    url: String,
    refresh: Duration,
    typist: Option<Typist>,
    fetcher: Box<dyn Fetch>,
    geometry: TerminalGeometry,
    layout: TextLayout,
}

impl WttrScreen {
    pub fn from_args(args: WttrArgs, settings: &Settings) -> ScreenResult<Self> {
        let refresh = seconds_option("delay", args.delay)?;
        let typist = args.typing.then(|| Typist::new(settings.char_delay()));
        // Cache no longer than one refresh period, or the report would never change.
        let fetcher = UrlFetcher::new(refresh.min(settings.fetch_interval()))
            .with_user_agent(defaults::WTTR_USER_AGENT);
        Ok(Self::new(
            wttr_url(args.units, args.narrow),
            refresh,
            typist,
            Box::new(fetcher),
            TerminalGeometry::new(),
        ))
    }

    pub fn new(
        url: String,
        refresh: Duration,
        typist: Option<Typist>,
        fetcher: Box<dyn Fetch>,
        geometry: TerminalGeometry,
    ) -> Self {
        let layout = TextLayout::new(geometry.current());
        Self {
            url,
            refresh,
            typist,
            fetcher,
            geometry,
            layout,
        }
    }
}

impl Screen for WttrScreen {
    fn name(&self) -> &'static str {
        "wttr"
    }

    fn description(&self) -> &'static str {
        "displays a weather report from wttr.in"
    }

    fn render_frame(&mut self, ctx: &mut FrameContext<'_>) -> ScreenResult<()> {
        let report = self.fetcher.fetch(&self.url, ctx.pacer)?;
        ctx.clear()?;

        self.layout.set_geometry(self.geometry.refresh());
        let text = self.layout.center_vertically(&report);
        match &self.typist {
            Some(typist) => typist.type_print(ctx, &text)?,
            None => ctx.print(&text)?,
        }
        ctx.pause(self.refresh)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::screen::{Pacer, RecordingPacer};

    struct Canned;

    impl Fetch for Canned {
        fn fetch(&mut self, url: &str, _pacer: &dyn Pacer) -> ScreenResult<String> {
            Ok(format!("report for {url}"))
        }
    }

    #[test]
    fn url_options() {
        assert_eq!(wttr_url(None, false), "https://wttr.in/?a");
        assert_eq!(wttr_url(Some(Units::Metric), true), "https://wttr.in/?amn");
        assert_eq!(wttr_url(Some(Units::Imperial), false), "https://wttr.in/?au");
    }

    #[test]
    fn frame_prints_centered_report_and_waits() {
        let mut screen = WttrScreen::new(
            wttr_url(None, false),
            Duration::from_secs(300),
            None,
            Box::new(Canned),
            TerminalGeometry::fixed(80, 5),
        );
        let pacer = RecordingPacer::new();
        let mut out = Vec::new();
        let mut ctx = FrameContext::new(&mut out, &pacer);
        screen.render_frame(&mut ctx).unwrap();

        let text = String::from_utf8_lossy(&out);
        assert!(text.ends_with("\n\nreport for https://wttr.in/?a"));
        assert_eq!(pacer.pauses(), vec![Duration::from_secs(300)]);
    }
}
