//! Compile-time table of the available screens and the mapping from a parsed command to a
//! ready-to-run screen.

use rand::seq::SliceRandom;
use rand::Rng;
use tracing::debug;

use super::clock::ClockScreen;
use super::dot::DotScreen;
use super::matrix::MatrixScreen;
use super::programmer::ProgrammerScreen;
use super::randtxt::RandTxtScreen;
use super::rssfeed::RssFeedScreen;
use super::snippet::SnippetScreen;
use super::sysmon::SysmonScreen;
use super::urlfetcher::UrlFetcherScreen;
use super::wttr::WttrScreen;
use super::Screen;
use crate::cli::ScreenCommand;
use crate::config::Settings;
use crate::error::{ScreenError, ScreenResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScreenInfo {
    pub name: &'static str,
    pub description: &'static str,
}

pub const SCREENS: &[ScreenInfo] = &[
    ScreenInfo {
        name: "asciiartfarts",
        description: "displays ascii images from asciiartfarts.com (NSFW)",
    },
    ScreenInfo {
        name: "clock",
        description: "displays a digital clock on screen",
    },
    ScreenInfo {
        name: "dot",
        description: "displays a random running dot",
    },
    ScreenInfo {
        name: "jokes4all",
        description: "displays random jokes from jokes4all.net (NSFW)",
    },
    ScreenInfo {
        name: "matrix",
        description: "displays a matrix movie alike screensaver",
    },
    ScreenInfo {
        name: "programmer",
        description: "displays source code in typing animation",
    },
    ScreenInfo {
        name: "quotes4all",
        description: "displays random quotes from quotes4all.net (NSFW)",
    },
    ScreenInfo {
        name: "randtxt",
        description: "displays word in random places on screen",
    },
    ScreenInfo {
        name: "rfc",
        description: "randomly displays RFC contents",
    },
    ScreenInfo {
        name: "rssfeed",
        description: "displays rss feed information",
    },
    ScreenInfo {
        name: "sysmon",
        description: "displays a graphical system monitor",
    },
    ScreenInfo {
        name: "urlfetcher",
        description: "displays url contents with typing animation",
    },
    ScreenInfo {
        name: "wttr",
        description: "displays a weather report from wttr.in",
    },
];

pub fn lookup(name: &str) -> Option<&'static ScreenInfo> {
    SCREENS.iter().find(|s| s.name == name)
}

/// Validate the command's options and construct its screen.
pub fn build(command: ScreenCommand, settings: &Settings) -> ScreenResult<Box<dyn Screen>> {
    let screen: Box<dyn Screen> = match command {
        ScreenCommand::Asciiartfarts(args) => {
            Box::new(RssFeedScreen::ascii_art_farts(args, settings)?)
        }
        ScreenCommand::Clock(args) => Box::new(ClockScreen::from_args(args)?),
        ScreenCommand::Dot(args) => Box::new(DotScreen::from_args(args)?),
        ScreenCommand::Jokes4all(args) => Box::new(SnippetScreen::jokes4all(args, settings)?),
        ScreenCommand::Matrix(args) => Box::new(MatrixScreen::from_args(args)?),
        ScreenCommand::Programmer(args) => Box::new(ProgrammerScreen::from_args(args)?),
        ScreenCommand::Quotes4all(args) => Box::new(SnippetScreen::quotes4all(args, settings)?),
        ScreenCommand::Randtxt(args) => Box::new(RandTxtScreen::from_args(args)?),
        ScreenCommand::Rfc(args) => Box::new(UrlFetcherScreen::rfc(args, settings)?),
        ScreenCommand::Rssfeed(args) => Box::new(RssFeedScreen::from_args(args, settings)?),
        ScreenCommand::Sysmon(args) => Box::new(SysmonScreen::from_args(args)?),
        ScreenCommand::Urlfetcher(args) => Box::new(UrlFetcherScreen::from_args(args, settings)?),
        ScreenCommand::Wttr(args) => Box::new(WttrScreen::from_args(args, settings)?),
    };
    debug!(screen = screen.name(), "Screen options validated");
    Ok(screen)
}

/// Pick the screen to run: the explicit one, or a random one from the settings' list when
/// `random` is set. `None` means nothing was asked for.
pub fn select<R: Rng>(
    explicit: Option<ScreenCommand>,
    random: bool,
    settings: &Settings,
    rng: &mut R,
) -> ScreenResult<Option<ScreenCommand>> {
    match (explicit, random) {
        (Some(_), true) => Err(ScreenError::invalid_option(
            "random",
            "It can not be combined with a screen name.",
        )),
        (Some(command), false) => Ok(Some(command)),
        (None, false) => Ok(None),
        (None, true) => {
            let candidates: Vec<&str> = settings
                .random_screens
                .iter()
                .map(String::as_str)
                .filter(|name| lookup(name).is_some())
                .collect();
            let name = candidates.choose(rng).ok_or_else(|| {
                ScreenError::invalid_option("random", "No known screens are listed for it.")
            })?;
            debug!(screen = name, "Randomly selected screen");
            Ok(Some(ScreenCommand::with_defaults(name)?))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn table_matches_screen_descriptions() {
        for name in &Settings::default().random_screens {
            let command = ScreenCommand::with_defaults(name).unwrap();
            let screen = build(command, &Settings::default()).unwrap();
            let info = lookup(name).unwrap();
            assert_eq!(screen.name(), info.name);
            assert_eq!(screen.description(), info.description);
        }
    }

    #[test]
    fn table_is_sorted_by_name() {
        assert!(SCREENS.windows(2).all(|w| w[0].name < w[1].name));
    }

    #[test]
    fn default_random_list_is_runnable_without_options() {
        for name in &Settings::default().random_screens {
            assert!(lookup(name).is_some(), "{name} is not registered");
            assert!(ScreenCommand::with_defaults(name).is_ok());
        }
    }

    #[test]
    fn random_selection_uses_settings() {
        let settings = Settings {
            random_screens: vec!["bogus".into(), "clock".into()],
            ..Settings::default()
        };
        let mut rng = StdRng::seed_from_u64(1);
        for _ in 0..10 {
            let picked = select(None, true, &settings, &mut rng).unwrap();
            assert!(matches!(picked, Some(ScreenCommand::Clock(_))));
        }
    }

    #[test]
    fn random_with_explicit_screen_is_rejected() {
        let mut rng = StdRng::seed_from_u64(1);
        let command = ScreenCommand::with_defaults("clock").unwrap();
        let err = select(Some(command), true, &Settings::default(), &mut rng).unwrap_err();
        assert!(err.to_string().contains("'random'"));
    }

    #[test]
    fn empty_random_list_is_an_error() {
        let settings = Settings {
            random_screens: Vec::new(),
            ..Settings::default()
        };
        let mut rng = StdRng::seed_from_u64(1);
        assert!(select(None, true, &settings, &mut rng).is_err());
    }
}
