use clap::Args;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

use super::{seconds_option, FrameContext, Screen};
use crate::config::{defaults, Settings};
use crate::error::ScreenResult;
use crate::fetch::{self, Fetch, UrlFetcher};
use crate::typing::Typist;

const NO_URL_HELP: &str = "\
You just need to provide the URL from where termsaver will read and display on
screen. Plain text works best, for example an RFC:

    termsaver urlfetcher -u https://www.rfc-editor.org/rfc/rfc1034.txt";

#[derive(Debug, Clone, Default, Args)]
pub struct UrlFetcherArgs {
    /// Address to fetch the text from (mandatory)
    #[arg(short, long)]
    pub url: Option<String>,

    /// Seconds between typed characters
    #[arg(short, long)]
    pub delay: Option<f64>,
}

/// RFCs worth reading, one of which is picked for every `rfc` frame.
const RFC_NUMBERS: &[u32] = &[
    768, 791, 792, 793, 826, 854, 855, 862, 863, 864, 868, 903, 937, 951, 959, 1034, 1035,
    1036, 1058, 1059, 1087, 1112, 1119, 1149, 1157, 1176, 1294, 1305, 1321, 1350, 1436, 1441,
    1459, 1730, 1777, 1855, 1889, 1918, 1939, 1945, 1948, 1950, 1951, 1952, 1964, 1991, 2080,
    2119, 2131, 2177, 2195, 2228, 2246, 2251, 2252, 2253, 2254, 2255, 2256, 2326, 2327, 2328,
    2351, 2362, 2397, 2407, 2408, 2409, 2440, 2445, 2453, 2460, 2549, 2570, 2606, 2616, 2740,
    2743, 2744, 2810, 2811, 2812, 2813, 2821, 2822, 2853, 2865, 2866, 2965, 2974, 3022, 3031,
    3056, 3080, 3162, 3261, 3284, 3286, 3315, 3339, 3376, 3401, 3402, 3403, 3404, 3405, 3501,
    3530, 3720, 3783, 3801, 3977, 4213, 4217, 4251, 4271, 4287, 4291, 4353, 4408, 4422, 4541,
    4575, 4579, 4634, 4646, 4787, 4960, 5023, 5533, 5969, 6455,
];

#[derive(Debug, Clone, Default, Args)]
pub struct RfcArgs {
    /// Seconds between typed characters
    #[arg(short, long)]
    pub delay: Option<f64>,
}

pub fn rfc_url(number: u32) -> String {
    format!("{}{number}.txt", defaults::RFC_URL_PREFIX)
}

/// Where the next frame's text comes from.
enum Source {
    Fixed(String),
    RandomRfc(StdRng),
}

impl Source {
    fn next_url(&mut self) -> String {
        match self {
            Source::Fixed(url) => url.clone(),
            Source::RandomRfc(rng) => {
                let number = RFC_NUMBERS.choose(rng).copied().unwrap_or(RFC_NUMBERS[0]);
                rfc_url(number)
            }
        }
    }
}

/// Fetches a URL and types its body, over and over.
pub struct UrlFetcherScreen {
    name: &'static str,
    description: &'static str,
    source: Source,
    typist: Typist,
    fetcher: Box<dyn Fetch>,
}

fn char_delay(delay: Option<f64>, settings: &Settings) -> ScreenResult<std::time::Duration> {
    match delay {
        Some(secs) => seconds_option("delay", secs),
        None => Ok(settings.char_delay()),
    }
}

impl UrlFetcherScreen {
    pub fn from_args(args: UrlFetcherArgs, settings: &Settings) -> ScreenResult<Self> {
        let url = fetch::url_option(args.url.as_deref(), NO_URL_HELP)?;
        Ok(Self::new(
            url,
            Typist::new(char_delay(args.delay, settings)?),
            Box::new(UrlFetcher::new(settings.fetch_interval())),
        ))
    }

    /// A random RFC from the IETF archive on every frame.
    pub fn rfc(args: RfcArgs, settings: &Settings) -> ScreenResult<Self> {
        Ok(Self {
            name: "rfc",
            description: "randomly displays RFC contents",
            source: Source::RandomRfc(StdRng::from_entropy()),
            typist: Typist::new(char_delay(args.delay, settings)?),
            fetcher: Box::new(UrlFetcher::new(settings.fetch_interval())),
        })
    }

    pub fn new(url: String, typist: Typist, fetcher: Box<dyn Fetch>) -> Self {
        Self {
            name: "urlfetcher",
            description: "displays url contents with typing animation",
            source: Source::Fixed(url),
            typist,
            fetcher,
        }
    }

    pub fn with_rng(mut self, rng: StdRng) -> Self {
        if let Source::RandomRfc(current) = &mut self.source {
            *current = rng;
        }
        self
    }

    pub fn with_fetcher(mut self, fetcher: Box<dyn Fetch>) -> Self {
        self.fetcher = fetcher;
        self
    }
}

impl Screen for UrlFetcherScreen {
    fn name(&self) -> &'static str {
        self.name
    }

    fn description(&self) -> &'static str {
        self.description
    }

    fn render_frame(&mut self, ctx: &mut FrameContext<'_>) -> ScreenResult<()> {
        let url = self.source.next_url();
        let body = self.fetcher.fetch(&url, ctx.pacer)?;
        ctx.clear()?;
        self.typist.type_print(ctx, &body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ScreenError;
    use crate::screen::{Pacer, RecordingPacer};

    struct Canned(&'static str);

    impl Fetch for Canned {
        fn fetch(&mut self, _url: &str, _pacer: &dyn Pacer) -> ScreenResult<String> {
            Ok(self.0.to_string())
        }
    }

    #[test]
    fn url_is_mandatory() {
        let err = UrlFetcherScreen::from_args(UrlFetcherArgs::default(), &Settings::default())
            .err()
            .unwrap();
        assert!(matches!(err, ScreenError::InvalidOption { ref option, .. } if option == "url"));
    }

    #[test]
    fn valid_url_passes_validation() {
        let args = UrlFetcherArgs {
            url: Some("example.com".into()),
            delay: None,
        };
        let screen = UrlFetcherScreen::from_args(args, &Settings::default()).unwrap();
        assert!(matches!(screen.source, Source::Fixed(ref url) if url == "http://example.com/"));
    }

    #[test]
    fn frame_types_fetched_body() {
        let mut screen = UrlFetcherScreen::new(
            "http://example.com/".into(),
            Typist::instant(),
            Box::new(Canned("line one\nline two")),
        );
        let pacer = RecordingPacer::new();
        let mut out = Vec::new();
        let mut ctx = FrameContext::new(&mut out, &pacer);
        screen.render_frame(&mut ctx).unwrap();
        assert!(String::from_utf8_lossy(&out).ends_with("line one\nline two"));
    }

    /// Records the URLs it was asked for.
    struct Log(std::rc::Rc<std::cell::RefCell<Vec<String>>>);

    impl Fetch for Log {
        fn fetch(&mut self, url: &str, _pacer: &dyn Pacer) -> ScreenResult<String> {
            self.0.borrow_mut().push(url.to_string());
            Ok("RFC text".into())
        }
    }

    #[test]
    fn rfc_picks_a_listed_document_every_frame() {
        let urls = std::rc::Rc::new(std::cell::RefCell::new(Vec::new()));
        let mut screen = UrlFetcherScreen::rfc(RfcArgs::default(), &Settings::default())
            .unwrap()
            .with_rng(StdRng::seed_from_u64(9))
            .with_fetcher(Box::new(Log(urls.clone())));
        assert_eq!(screen.name(), "rfc");

        let pacer = RecordingPacer::new();
        for _ in 0..20 {
            let mut out = Vec::new();
            let mut ctx = FrameContext::new(&mut out, &pacer);
            screen.render_frame(&mut ctx).unwrap();
        }

        let urls = urls.borrow();
        assert_eq!(urls.len(), 20);
        assert!(urls.iter().all(|u| {
            let number = u
                .strip_prefix(defaults::RFC_URL_PREFIX)
                .and_then(|rest| rest.strip_suffix(".txt"))
                .and_then(|n| n.parse::<u32>().ok());
            number.is_some_and(|n| RFC_NUMBERS.contains(&n))
        }));
        assert!(urls.iter().any(|u| u != &urls[0]));
    }
}
