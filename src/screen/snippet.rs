//! Screens that cut one block of text out of a web page and show it centered: a random
//! quote from quotes4all.net or a random joke from jokes4all.net.

use std::time::Duration;

use clap::Args;

use super::{seconds_option, FrameContext, Screen};
use crate::config::{defaults, Settings};
use crate::error::{ScreenError, ScreenResult};
use crate::fetch::{Fetch, UrlFetcher};
use crate::layout::TextLayout;
use crate::rss;
use crate::terminal::TerminalGeometry;
use crate::typing::Typist;

#[derive(Debug, Clone, Args)]
pub struct Quotes4AllArgs {
    /// Seconds each quote stays on screen
    #[arg(short, long, default_value_t = defaults::QUOTES4ALL_DWELL.as_secs_f64())]
    pub delay: f64,
}

#[derive(Debug, Clone, Args)]
pub struct Jokes4AllArgs {
    /// Seconds each joke stays on screen
    #[arg(short, long, default_value_t = defaults::JOKES4ALL_DWELL.as_secs_f64())]
    pub delay: f64,
}

/// Markers around the interesting block of a page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Marker {
    pub start: &'static str,
    pub end: &'static str,
    /// Fold line breaks and runs of blanks into single spaces.
    pub flatten: bool,
}

const QUOTE: Marker = Marker {
    start: r#"<div class="q-te"><span>"#,
    end: "</span></div>",
    flatten: true,
};

const JOKE: Marker = Marker {
    start: r#"<div class="joke">"#,
    end: "</div>",
    flatten: false,
};

/// The text between the first `marker.start` and the following `marker.end`, as plain text.
pub fn extract(url: &str, page: &str, marker: Marker) -> ScreenResult<String> {
    let block = page
        .split_once(marker.start)
        .and_then(|(_, rest)| rest.split_once(marker.end))
        .map(|(block, _)| block)
        .ok_or_else(|| ScreenError::parse(url, "The page layout was not recognised."))?;

    let text = rss::strip_html(&rss::unescape(block));
    let text = if marker.flatten {
        text.split_whitespace().collect::<Vec<_>>().join(" ")
    } else {
        text.trim().to_string()
    };
    if text.is_empty() {
        return Err(ScreenError::parse(url, "The page had nothing to show."));
    }
    Ok(text)
}

pub struct SnippetScreen {
    name: &'static str,
    description: &'static str,
    url: String,
    marker: Marker,
    dwell: Duration,
    typist: Typist,
    fetcher: Box<dyn Fetch>,
    geometry: TerminalGeometry,
    layout: TextLayout,
}

impl SnippetScreen {
    pub fn quotes4all(args: Quotes4AllArgs, settings: &Settings) -> ScreenResult<Self> {
        Ok(Self::new(
            "quotes4all",
            "displays random quotes from quotes4all.net (NSFW)",
            defaults::QUOTES4ALL_URL.to_string(),
            QUOTE,
            seconds_option("delay", args.delay)?,
            Box::new(UrlFetcher::new(Duration::ZERO)),
            TerminalGeometry::new(),
        )
        .with_typist(Typist::new(settings.char_delay()).with_line_delay(Duration::ZERO)))
    }

    pub fn jokes4all(args: Jokes4AllArgs, settings: &Settings) -> ScreenResult<Self> {
        Ok(Self::new(
            "jokes4all",
            "displays random jokes from jokes4all.net (NSFW)",
            defaults::JOKES4ALL_URL.to_string(),
            JOKE,
            seconds_option("delay", args.delay)?,
            Box::new(UrlFetcher::new(Duration::ZERO)),
            TerminalGeometry::new(),
        )
        .with_typist(Typist::new(settings.char_delay()).with_line_delay(Duration::ZERO)))
    }

    pub fn new(
        name: &'static str,
        description: &'static str,
        url: String,
        marker: Marker,
        dwell: Duration,
        fetcher: Box<dyn Fetch>,
        geometry: TerminalGeometry,
    ) -> Self {
        let layout = TextLayout::new(geometry.current());
        Self {
            name,
            description,
            url,
            marker,
            dwell,
            typist: Typist::default(),
            fetcher,
            geometry,
            layout,
        }
    }

    pub fn with_typist(mut self, typist: Typist) -> Self {
        self.typist = typist;
        self
    }
}

impl Screen for SnippetScreen {
    fn name(&self) -> &'static str {
        self.name
    }

    fn description(&self) -> &'static str {
        self.description
    }

    fn cleanup_per_cycle(&self) -> bool {
        true
    }

    /// Every fetch returns a different random entry, so there is no caching.
    fn render_frame(&mut self, ctx: &mut FrameContext<'_>) -> ScreenResult<()> {
        let page = self.fetcher.fetch(&self.url, ctx.pacer)?;
        let text = extract(&self.url, &page, self.marker)?;

        self.layout.set_geometry(self.geometry.refresh());
        let text = self.layout.wrap(&text);
        let text = self.layout.center_horizontally(&text);
        let text = self.layout.center_vertically(&text);

        ctx.clear()?;
        self.typist.type_print(ctx, &text)?;
        ctx.pause(self.dwell)
    }
}
