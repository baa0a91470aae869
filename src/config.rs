use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Pacing and sizing constants shared by the screens.
///
/// Screens read these instead of inlining literals; the values that users may want to tune
/// globally are also exposed through [`Settings`].
pub mod defaults {
    use std::time::Duration;

    /// Typewriter speed per non-blank character.
    pub const CHAR_DELAY: Duration = Duration::from_millis(3);
    /// Line pause is this many character delays.
    pub const LINE_DELAY_FACTOR: u32 = 10;
    /// Minimum time between two network fetches of the same screen.
    pub const FETCH_INTERVAL: Duration = Duration::from_secs(3600);
    /// Upper bound on a single HTTP request, connection included.
    pub const FETCH_TIMEOUT: Duration = Duration::from_secs(30);
    /// Bytes inspected when deciding whether a file is binary.
    pub const BINARY_SNIFF_BYTES: u64 = 1024;

    pub const TERMINAL_WIDTH: u16 = 80;
    pub const TERMINAL_HEIGHT: u16 = 25;

    pub const CLOCK_FRAME: Duration = Duration::from_secs(1);
    pub const CLOCK_FRAME_12H: Duration = Duration::from_millis(700);

    pub const RANDTXT_WORD: &str = "TermSaver";
    pub const RANDTXT_FREEZE: Duration = Duration::from_secs(3);
    pub const RANDTXT_CHAR_DELAY: Duration = Duration::from_millis(10);

    pub const RSS_ITEM_DWELL: Duration = Duration::from_secs(1);
    pub const RSS_FORMAT: &str = "{title} ({pubDate})\n\n";

    pub const ASCIIARTFARTS_URL: &str = "http://www.asciiartfarts.com/farts.rss";
    pub const ASCIIARTFARTS_DWELL: Duration = Duration::from_secs(5);

    pub const WTTR_URL: &str = "https://wttr.in/?a";
    /// wttr.in only answers with terminal graphics to curl-like agents.
    pub const WTTR_USER_AGENT: &str = "curl/7.37.0";
    pub const WTTR_REFRESH: Duration = Duration::from_secs(300);

    pub const RFC_URL_PREFIX: &str = "https://www.rfc-editor.org/rfc/rfc";

    pub const DOT_CHAR: char = '*';
    pub const DOT_DELAY: Duration = Duration::from_millis(50);

    pub const QUOTES4ALL_URL: &str = "https://quotes4all.net";
    pub const QUOTES4ALL_DWELL: Duration = Duration::from_secs(10);
    pub const JOKES4ALL_URL: &str = "https://jokes4all.net";
    pub const JOKES4ALL_DWELL: Duration = Duration::from_secs(30);

    /// Matrix line delay is this many character delays.
    pub const MATRIX_LINE_DELAY_FACTOR: u32 = 30;
    pub const MATRIX_GRANULARITY: u32 = 10;

    pub const SYSMON_SAMPLE: Duration = Duration::from_millis(500);

    /// Screens eligible for `--random` (none of them need a mandatory option).
    pub const RANDOM_SCREENS: &[&str] = &[
        "asciiartfarts",
        "clock",
        "dot",
        "jokes4all",
        "matrix",
        "quotes4all",
        "randtxt",
        "rfc",
        "sysmon",
        "wttr",
    ];
}

/// User settings, read from `<config dir>/termsaver/config.json` when present.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct Settings {
    pub char_delay_ms: u64,
    pub fetch_interval_secs: u64,
    pub random_screens: Vec<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            char_delay_ms: defaults::CHAR_DELAY.as_millis() as u64,
            fetch_interval_secs: defaults::FETCH_INTERVAL.as_secs(),
            random_screens: defaults::RANDOM_SCREENS
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }
}

impl Settings {
    pub fn get_path() -> Result<PathBuf> {
        let mut path = dirs::config_dir().context("Could not determine config directory")?;
        path.push("termsaver");
        path.push("config.json");
        Ok(path)
    }

    /// Load from the default location. A missing file yields `None`.
    pub fn load() -> Result<Option<Self>> {
        let path = Self::get_path()?;
        Self::load_from(&path)
    }

    pub fn load_from(path: &Path) -> Result<Option<Self>> {
        if !path.exists() {
            return Ok(None);
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let settings: Settings = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;

        Ok(Some(settings))
    }

    /// Resolve settings from an explicit path or the default location, falling back to
    /// built-in defaults.
    pub fn resolve(explicit: Option<&Path>) -> Result<Self> {
        let loaded = match explicit {
            Some(p) => Self::load_from(p)?,
            None => Self::load()?,
        };
        Ok(loaded.unwrap_or_default())
    }

    pub fn char_delay(&self) -> Duration {
        Duration::from_millis(self.char_delay_ms)
    }

    pub fn fetch_interval(&self) -> Duration {
        Duration::from_secs(self.fetch_interval_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn missing_file_is_not_an_error() {
        let dir = TempDir::new().unwrap();
        let loaded = Settings::load_from(&dir.path().join("config.json")).unwrap();
        assert!(loaded.is_none());
    }

    #[test]
    fn partial_file_keeps_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, r#"{ "char_delay_ms": 7 }"#).unwrap();

        let settings = Settings::resolve(Some(&path)).unwrap();
        assert_eq!(settings.char_delay(), Duration::from_millis(7));
        assert_eq!(settings.fetch_interval(), defaults::FETCH_INTERVAL);
        assert!(settings.random_screens.contains(&"clock".to_string()));
    }

    #[test]
    fn malformed_file_is_reported() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, "{ not json").unwrap();

        let err = Settings::load_from(&path).unwrap_err();
        assert!(err.to_string().contains("Failed to parse config file"));
    }
}
