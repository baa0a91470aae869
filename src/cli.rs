use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::error::{ContextKind, ContextValue, ErrorKind};
use clap::{Parser, Subcommand};

use crate::error::ScreenError;
use crate::screen::clock::ClockArgs;
use crate::screen::dot::DotArgs;
use crate::screen::matrix::MatrixArgs;
use crate::screen::programmer::ProgrammerArgs;
use crate::screen::randtxt::RandTxtArgs;
use crate::screen::rssfeed::{AsciiArtFartsArgs, RssFeedArgs};
use crate::screen::snippet::{Jokes4AllArgs, Quotes4AllArgs};
use crate::screen::sysmon::SysmonArgs;
use crate::screen::urlfetcher::{RfcArgs, UrlFetcherArgs};
use crate::screen::wttr::WttrArgs;

#[derive(Parser, Debug)]
#[command(
    name = "termsaver",
    version,
    about = "A simple text-based terminal screensaver",
    after_help = "Press Ctrl+C to stop a running screen. Use 'termsaver <screen> --help' for screen options.",
    disable_help_subcommand = true
)]
pub struct Cli {
    /// Log debug information to stderr and show full error details
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Run a randomly chosen screen that needs no options
    #[arg(long, global = true)]
    pub random: bool,

    /// Settings file to use instead of the default location
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub screen: Option<ScreenCommand>,
}

#[derive(Subcommand, Debug, Clone)]
pub enum ScreenCommand {
    /// displays ascii images from asciiartfarts.com (NSFW)
    Asciiartfarts(AsciiArtFartsArgs),
    /// displays a digital clock on screen
    Clock(ClockArgs),
    /// displays a random running dot
    Dot(DotArgs),
    /// displays random jokes from jokes4all.net (NSFW)
    #[command(name = "jokes4all")]
    Jokes4all(Jokes4AllArgs),
    /// displays a matrix movie alike screensaver
    Matrix(MatrixArgs),
    /// displays source code in typing animation
    Programmer(ProgrammerArgs),
    /// displays random quotes from quotes4all.net (NSFW)
    #[command(name = "quotes4all")]
    Quotes4all(Quotes4AllArgs),
    /// displays word in random places on screen
    Randtxt(RandTxtArgs),
    /// randomly displays RFC contents
    Rfc(RfcArgs),
    /// displays rss feed information
    Rssfeed(RssFeedArgs),
    /// displays a graphical system monitor
    Sysmon(SysmonArgs),
    /// displays url contents with typing animation
    Urlfetcher(UrlFetcherArgs),
    /// displays a weather report from wttr.in
    Wttr(WttrArgs),
}

impl ScreenCommand {
    /// The command for `name` with every option at its default.
    pub fn with_defaults(name: &str) -> Result<Self> {
        let cli = Cli::try_parse_from(["termsaver", name])
            .with_context(|| format!("Screen '{name}' can not run without options"))?;
        cli.screen
            .with_context(|| format!("Unknown screen '{name}'"))
    }
}

/// Translate a clap parse failure into the option it is about.
///
/// Returns `None` for failures that are not about a specific option (help, version,
/// unknown subcommand), which clap reports better itself.
pub fn option_error(err: &clap::Error) -> Option<ScreenError> {
    match err.kind() {
        ErrorKind::ValueValidation
        | ErrorKind::InvalidValue
        | ErrorKind::UnknownArgument
        | ErrorKind::MissingRequiredArgument
        | ErrorKind::NoEquals
        | ErrorKind::TooManyValues
        | ErrorKind::TooFewValues
        | ErrorKind::WrongNumberOfValues
        | ErrorKind::ArgumentConflict => {}
        _ => return None,
    }

    let option = match err.get(ContextKind::InvalidArg) {
        Some(ContextValue::String(arg)) => option_name(arg),
        Some(ContextValue::Strings(args)) => args.first().map(|a| option_name(a))?,
        _ => return None,
    };
    let reason = match err.get(ContextKind::InvalidValue) {
        Some(ContextValue::String(value)) if !value.is_empty() => {
            format!("'{value}' is not an acceptable value.")
        }
        _ => err.kind().to_string(),
    };
    Some(ScreenError::invalid_option(option, reason))
}

/// `--delay <DELAY>` and `-d` both become `delay`/`d`.
fn option_name(arg: &str) -> String {
    arg.split_whitespace()
        .next()
        .unwrap_or(arg)
        .trim_start_matches('-')
        .to_string()
}
