//! Terminal geometry and the handful of control sequences screens need.
//!
//! Geometry is queried through an ordered list of sources (native call, `tput`, environment
//! variables); the first one that answers wins and 80x25 is used when none do.

use std::env;
use std::io::{self, Write};
use std::process::{Command, Stdio};

use anyhow::{Context, Result};
use crossterm::{
    cursor::{Hide, MoveTo, Show},
    terminal::{self, Clear, ClearType},
    ExecutableCommand, QueueableCommand,
};
use tracing::debug;

use crate::config::defaults;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Geometry {
    pub width: u16,
    pub height: u16,
}

impl Geometry {
    pub fn new(width: u16, height: u16) -> Self {
        Self {
            width: width.max(1),
            height: height.max(1),
        }
    }

    pub fn width(self) -> usize {
        self.width as usize
    }

    pub fn height(self) -> usize {
        self.height as usize
    }
}

impl Default for Geometry {
    fn default() -> Self {
        Self::new(defaults::TERMINAL_WIDTH, defaults::TERMINAL_HEIGHT)
    }
}

/// One strategy for discovering the terminal size, as `(columns, rows)`.
pub type SizeSource = fn() -> Option<(u16, u16)>;

/// Stored snapshot of the terminal size plus change detection between refreshes.
#[derive(Debug, Clone)]
pub struct TerminalGeometry {
    current: Geometry,
    refreshed: bool,
    changed: bool,
    sources: Vec<SizeSource>,
}

impl TerminalGeometry {
    pub fn new() -> Self {
        Self::with_sources(vec![native_size, tput_size, env_size])
    }

    pub fn with_sources(sources: Vec<SizeSource>) -> Self {
        Self {
            current: Geometry::default(),
            refreshed: false,
            changed: false,
            sources,
        }
    }

    /// A geometry that never queries anything and always reports `width x height`.
    pub fn fixed(width: u16, height: u16) -> Self {
        let mut g = Self::with_sources(Vec::new());
        g.current = Geometry::new(width, height);
        g.refreshed = true;
        g
    }

    /// Re-query the terminal. The first refresh never reports a change.
    pub fn refresh(&mut self) -> Geometry {
        if self.sources.is_empty() && self.refreshed {
            self.changed = false;
            return self.current;
        }

        let next = self
            .sources
            .iter()
            .find_map(|source| source().filter(|(w, h)| *w > 0 && *h > 0))
            .map(|(w, h)| Geometry::new(w, h))
            .unwrap_or_default();

        self.changed = self.refreshed && next != self.current;
        if self.changed {
            debug!(width = next.width, height = next.height, "Terminal geometry changed");
        }
        self.current = next;
        self.refreshed = true;
        next
    }

    pub fn current(&self) -> Geometry {
        self.current
    }

    pub fn changed(&self) -> bool {
        self.changed
    }
}

impl Default for TerminalGeometry {
    fn default() -> Self {
        Self::new()
    }
}

fn native_size() -> Option<(u16, u16)> {
    terminal::size().ok()
}

fn tput_size() -> Option<(u16, u16)> {
    let query = |what: &str| -> Option<u16> {
        let output = Command::new("tput")
            .arg(what)
            .stdin(Stdio::inherit())
            .stderr(Stdio::null())
            .output()
            .ok()?;
        if !output.status.success() {
            return None;
        }
        String::from_utf8_lossy(&output.stdout).trim().parse().ok()
    };
    Some((query("cols")?, query("lines")?))
}

fn env_size() -> Option<(u16, u16)> {
    let read = |name: &str| env::var(name).ok()?.trim().parse::<u16>().ok();
    Some((read("COLUMNS")?, read("LINES")?))
}

/// Clear the whole screen and home the cursor.
pub fn clear_screen(out: &mut dyn Write) -> io::Result<()> {
    out.queue(Clear(ClearType::All))?.queue(MoveTo(0, 0))?;
    out.flush()
}

pub fn hide_cursor(out: &mut dyn Write) -> io::Result<()> {
    out.execute(Hide).map(|_| ())
}

pub fn show_cursor(out: &mut dyn Write) -> io::Result<()> {
    out.execute(Show).map(|_| ())
}

/// Hides the cursor for as long as it lives and restores it on drop, including when the
/// run loop exits through an error or a panic.
pub struct TerminalGuard {
    _private: (),
}

impl TerminalGuard {
    pub fn acquire() -> Result<Self> {
        hide_cursor(&mut io::stdout()).context("Failed to hide cursor")?;
        Ok(Self { _private: () })
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = show_cursor(&mut io::stdout());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn none() -> Option<(u16, u16)> {
        None
    }

    fn zero() -> Option<(u16, u16)> {
        Some((0, 0))
    }

    fn small() -> Option<(u16, u16)> {
        Some((40, 12))
    }

    fn large() -> Option<(u16, u16)> {
        Some((120, 40))
    }

    #[test]
    fn falls_back_to_80x25_when_nothing_answers() {
        let mut g = TerminalGeometry::with_sources(vec![none, none]);
        assert_eq!(g.refresh(), Geometry::new(80, 25));
    }

    #[test]
    fn first_answering_source_wins_and_zero_is_rejected() {
        let mut g = TerminalGeometry::with_sources(vec![none, zero, small, large]);
        assert_eq!(g.refresh(), Geometry::new(40, 12));
    }

    #[test]
    fn first_refresh_never_reports_change() {
        let mut g = TerminalGeometry::with_sources(vec![large]);
        g.refresh();
        assert!(!g.changed());
        g.refresh();
        assert!(!g.changed());
    }

    #[test]
    fn change_is_detected_against_previous_snapshot() {
        let mut g = TerminalGeometry::with_sources(vec![small]);
        g.refresh();
        g.sources = vec![large];
        g.refresh();
        assert!(g.changed());
        g.refresh();
        assert!(!g.changed());
    }

    #[test]
    fn fixed_geometry_is_stable() {
        let mut g = TerminalGeometry::fixed(100, 30);
        assert_eq!(g.refresh(), Geometry::new(100, 30));
        assert!(!g.changed());
    }

    #[test]
    fn geometry_is_never_zero() {
        let g = Geometry::new(0, 0);
        assert_eq!((g.width, g.height), (1, 1));
    }

    #[test]
    fn clear_writes_escape_sequence() {
        let mut buf = Vec::new();
        clear_screen(&mut buf).unwrap();
        assert!(buf.starts_with(b"\x1b["));
    }
}
