use cliclack::{intro, log, outro};
use colored::*;

use crate::error::ScreenError;
use crate::screen::registry::{ScreenInfo, SCREENS};

const BUG_REPORT_URL: &str = "https://github.com/brunobraga/termsaver/issues";

pub fn print_banner() {
    intro(" TERMSAVER ").ok();
    log::remark(format!(
        "A simple text-based terminal screensaver (v{})",
        env!("CARGO_PKG_VERSION")
    ))
    .ok();
}

/// Screen names padded to a common width, one per line.
pub fn screen_list(screens: &[ScreenInfo]) -> String {
    let width = screens.iter().map(|s| s.name.len()).max().unwrap_or(0);
    screens
        .iter()
        .map(|s| format!("  {}  {}", format!("{:<width$}", s.name).cyan(), s.description))
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn print_usage() {
    print_banner();
    log::info(format!(
        "Usage: termsaver [OPTIONS] <SCREEN> [SCREEN OPTIONS]\n\nScreens:\n{}",
        screen_list(SCREENS)
    ))
    .ok();
    log::remark(
        "Options:
  -v, --verbose        Show debug logging and full error details
      --random         Run a random screen
      --config <FILE>  Read settings from FILE
  -h, --help           Show help (also per screen: termsaver <screen> --help)",
    )
    .ok();
    outro("Pick a screen and press Ctrl+C to stop it.").ok();
}

/// Human-readable, kind-specific message for a failure.
pub fn describe(err: &ScreenError) -> String {
    match err {
        ScreenError::InvalidOption { .. } => format!(
            "{err}\nRun the screen with --help for the list of options."
        ),
        ScreenError::PathNotFound { .. } => err.to_string(),
        ScreenError::Url { .. } => format!("{err}\nCheck your connection or the address."),
        ScreenError::Parse { .. } => err.to_string(),
        ScreenError::Interrupted => String::new(),
        ScreenError::Other(inner) => inner.to_string(),
    }
}

pub fn print_error(message: &str) {
    log::error(message).ok();
}

pub fn print_info(message: &str) {
    log::info(message).ok();
}

/// Report a fatal error. With `verbose`, unclassified errors carry their full chain.
pub fn report_error(err: &anyhow::Error, verbose: bool) {
    let Some(screen_err) = err.downcast_ref::<ScreenError>() else {
        report_unclassified(err, verbose);
        return;
    };
    if let ScreenError::Other(inner) = screen_err {
        report_unclassified(inner, verbose);
        return;
    }

    print_error(&format!("{} {}", "Oops!".bold(), describe(screen_err)));
    if let Some(help) = screen_err.help() {
        print_info(help);
    }
}

fn report_unclassified(err: &anyhow::Error, verbose: bool) {
    if verbose {
        print_error(&format!("{} Something went terribly wrong.\n{err:?}", "Oops!".bold()));
    } else {
        print_error(&format!(
            "{} Something went terribly wrong: {err}\nRun again with --verbose for details, and report it at {}",
            "Oops!".bold(),
            BUG_REPORT_URL.underline()
        ));
    }
}
