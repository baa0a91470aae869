//! RSS-driven screens: a generic feed reader and the asciiartfarts preset.

use std::time::Duration;

use clap::Args;

use super::{seconds_option, FrameContext, Screen};
use crate::config::{defaults, Settings};
use crate::error::ScreenResult;
use crate::fetch::{self, Fetch, UrlFetcher};
use crate::layout::TextLayout;
use crate::rss;
use crate::terminal::TerminalGeometry;
use crate::typing::Typist;

const NO_URL_HELP: &str = "\
You just need to provide the URL of the RSS feed termsaver should read, for example:

    termsaver rssfeed -u https://blog.rust-lang.org/feed.xml";

#[derive(Debug, Clone, Default, Args)]
pub struct RssFeedArgs {
    /// Address of the RSS feed (mandatory)
    #[arg(short, long)]
    pub url: Option<String>,

    /// Item format; {title}, {link}, {description} and {pubDate} are replaced
    #[arg(short, long)]
    pub format: Option<String>,

    /// Keep HTML markup in the item text
    #[arg(short, long)]
    pub raw: bool,
}

#[derive(Debug, Clone, Args)]
pub struct AsciiArtFartsArgs {
    /// Seconds each picture stays on screen
    #[arg(short, long, default_value_t = defaults::ASCIIARTFARTS_DWELL.as_secs_f64())]
    pub delay: f64,
}

/// Presentation knobs that distinguish the feed screens from each other.
#[derive(Debug, Clone)]
pub struct FeedStyle {
    pub format: String,
    pub raw: bool,
    pub dwell: Duration,
    pub center: bool,
    pub clear_per_item: bool,
}

impl Default for FeedStyle {
    fn default() -> Self {
        Self {
            format: defaults::RSS_FORMAT.to_string(),
            raw: false,
            dwell: defaults::RSS_ITEM_DWELL,
            center: false,
            clear_per_item: false,
        }
    }
}

pub struct RssFeedScreen {
    name: &'static str,
    description: &'static str,
    url: String,
    style: FeedStyle,
    typist: Typist,
    fetcher: Box<dyn Fetch>,
    geometry: TerminalGeometry,
    layout: TextLayout,
}

impl RssFeedScreen {
    pub fn from_args(args: RssFeedArgs, settings: &Settings) -> ScreenResult<Self> {
        let url = fetch::url_option(args.url.as_deref(), NO_URL_HELP)?;
        let style = FeedStyle {
            format: args
                .format
                .map(|f| rss::unescape_format(&f))
                .unwrap_or_else(|| defaults::RSS_FORMAT.to_string()),
            raw: args.raw,
            ..FeedStyle::default()
        };
        Ok(Self::new(
            "rssfeed",
            "displays rss feed information",
            url,
            style,
            Box::new(UrlFetcher::new(settings.fetch_interval())),
        )
        .with_typist(Typist::new(settings.char_delay())))
    }

    pub fn ascii_art_farts(args: AsciiArtFartsArgs, settings: &Settings) -> ScreenResult<Self> {
        let style = FeedStyle {
            format: "{description}".to_string(),
            dwell: seconds_option("delay", args.delay)?,
            center: true,
            clear_per_item: true,
            ..FeedStyle::default()
        };
        Ok(Self::new(
            "asciiartfarts",
            "displays ascii images from asciiartfarts.com (NSFW)",
            defaults::ASCIIARTFARTS_URL.to_string(),
            style,
            Box::new(UrlFetcher::new(settings.fetch_interval())),
        )
        .with_typist(Typist::new(settings.char_delay())))
    }

    pub fn new(
        name: &'static str,
        description: &'static str,
        url: String,
        style: FeedStyle,
        fetcher: Box<dyn Fetch>,
    ) -> Self {
        let geometry = TerminalGeometry::new();
        let layout = TextLayout::new(geometry.current());
        Self {
            name,
            description,
            url,
            style,
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

    pub fn with_geometry(mut self, geometry: TerminalGeometry) -> Self {
        self.layout.set_geometry(geometry.current());
        self.geometry = geometry;
        self
    }

    fn item_text(&mut self, item: &rss::FeedItem) -> String {
        let mut text = rss::unescape(&item.render(&self.style.format));
        if !self.style.raw {
            text = rss::strip_html(&text);
        }
        if self.style.center {
            self.layout.set_geometry(self.geometry.refresh());
            let wrapped = self.layout.wrap(text.trim_matches('\n'));
            let centered = self.layout.center_horizontally(&wrapped);
            text = self.layout.center_vertically(&centered);
        }
        text
    }
}

impl Screen for RssFeedScreen {
    fn name(&self) -> &'static str {
        self.name
    }

    fn description(&self) -> &'static str {
        self.description
    }

    fn cleanup_per_cycle(&self) -> bool {
        true
    }

    /// Fetch the feed and show each of its items in turn.
    fn render_frame(&mut self, ctx: &mut FrameContext<'_>) -> ScreenResult<()> {
        let body = self.fetcher.fetch(&self.url, ctx.pacer)?;
        let items = rss::parse_items(&self.url, &body)?;
        ctx.clear()?;

        for item in &items {
            let text = self.item_text(item);
            self.typist.type_print(ctx, &text)?;
            ctx.pause(self.style.dwell)?;
            if self.style.clear_per_item {
                ctx.clear()?;
            }
        }
        Ok(())
    }
}
