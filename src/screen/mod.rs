//! The screen abstraction: a [`Screen`] renders frames into a [`FrameContext`] and paces
//! itself through a [`Pacer`], which is also where a keyboard interrupt is observed.

use std::cell::RefCell;
use std::io::Write;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};

use crate::error::{ScreenError, ScreenResult};
use crate::terminal;

pub mod clock;
pub mod dot;
pub mod lifecycle;
pub mod matrix;
pub mod programmer;
pub mod randtxt;
pub mod registry;
pub mod rssfeed;
pub mod snippet;
pub mod sysmon;
pub mod urlfetcher;
pub mod wttr;

/// Longest uninterrupted sleep; interrupts are noticed at least this often.
const PAUSE_SLICE: Duration = Duration::from_millis(50);

/// Shared "stop now" flag, raised by SIGINT/SIGTERM or by hand.
#[derive(Debug, Clone, Default)]
pub struct Interrupt(Arc<AtomicBool>);

impl Interrupt {
    pub fn new() -> Self {
        Self::default()
    }

    /// Route the process termination signals into this flag instead of killing the process.
    /// Repeated signals only raise the flag again, so every shutdown runs the cleanup path.
    pub fn install(&self) -> Result<()> {
        for &signal in signal_hook::consts::TERM_SIGNALS {
            signal_hook::flag::register(signal, Arc::clone(&self.0))
                .with_context(|| format!("Failed to register handler for signal {signal}"))?;
        }
        Ok(())
    }

    pub fn trigger(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_set(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Source of all waiting a screen does.
///
/// A pause fails with [`ScreenError::Interrupted`] as soon as an interrupt is seen, which
/// unwinds the current frame through `?`.
pub trait Pacer {
    fn pause(&self, duration: Duration) -> ScreenResult<()>;

    fn interrupted(&self) -> bool;

    fn check(&self) -> ScreenResult<()> {
        if self.interrupted() {
            Err(ScreenError::Interrupted)
        } else {
            Ok(())
        }
    }
}

/// Real-time pacer that sleeps in short slices.
#[derive(Debug, Clone)]
pub struct SleepPacer {
    interrupt: Interrupt,
}

impl SleepPacer {
    pub fn new(interrupt: Interrupt) -> Self {
        Self { interrupt }
    }
}

impl Pacer for SleepPacer {
    fn pause(&self, duration: Duration) -> ScreenResult<()> {
        let deadline = Instant::now() + duration;
        loop {
            self.check()?;
            let now = Instant::now();
            if now >= deadline {
                return Ok(());
            }
            thread::sleep((deadline - now).min(PAUSE_SLICE));
        }
    }

    fn interrupted(&self) -> bool {
        self.interrupt.is_set()
    }
}

/// Pacer that never sleeps and keeps a log of the pauses it was asked for.
///
/// With `interrupt_after`, it raises its own interrupt once that many pauses were requested,
/// which lets a run loop terminate deterministically.
#[derive(Debug, Default)]
pub struct RecordingPacer {
    interrupt: Interrupt,
    interrupt_after: Option<usize>,
    pauses: RefCell<Vec<Duration>>,
}

impl RecordingPacer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn interrupt_after(pauses: usize) -> Self {
        Self {
            interrupt_after: Some(pauses),
            ..Self::default()
        }
    }

    pub fn interrupt(&self) -> &Interrupt {
        &self.interrupt
    }

    pub fn pauses(&self) -> Vec<Duration> {
        self.pauses.borrow().clone()
    }

    pub fn total(&self) -> Duration {
        self.pauses.borrow().iter().sum()
    }
}

impl Pacer for RecordingPacer {
    fn pause(&self, duration: Duration) -> ScreenResult<()> {
        self.check()?;
        let count = {
            let mut pauses = self.pauses.borrow_mut();
            pauses.push(duration);
            pauses.len()
        };
        if self.interrupt_after.is_some_and(|limit| count >= limit) {
            self.interrupt.trigger();
        }
        Ok(())
    }

    fn interrupted(&self) -> bool {
        self.interrupt.is_set()
    }
}

/// Everything a screen needs while drawing one frame.
pub struct FrameContext<'a> {
    pub out: &'a mut dyn Write,
    pub pacer: &'a dyn Pacer,
}

impl<'a> FrameContext<'a> {
    pub fn new(out: &'a mut dyn Write, pacer: &'a dyn Pacer) -> Self {
        Self { out, pacer }
    }

    pub fn pause(&self, duration: Duration) -> ScreenResult<()> {
        self.pacer.pause(duration)
    }

    /// Write and flush in one go.
    pub fn print(&mut self, text: &str) -> ScreenResult<()> {
        self.out.write_all(text.as_bytes())?;
        self.out.flush()?;
        Ok(())
    }

    pub fn clear(&mut self) -> ScreenResult<()> {
        terminal::clear_screen(self.out)?;
        Ok(())
    }
}

/// Convert a user-supplied number of seconds into a pause.
pub(crate) fn seconds_option(option: &str, secs: f64) -> ScreenResult<Duration> {
    Duration::try_from_secs_f64(secs).map_err(|_| {
        ScreenError::invalid_option(option, "Expected a non-negative number of seconds.")
    })
}

/// A named animation driven by [`lifecycle::Lifecycle`].
pub trait Screen {
    fn name(&self) -> &'static str;

    fn description(&self) -> &'static str;

    /// Clear the terminal after every frame.
    fn cleanup_per_cycle(&self) -> bool {
        false
    }

    /// Runs once, after the first clear and before the first frame.
    fn setup(&mut self, _ctx: &mut FrameContext<'_>) -> ScreenResult<()> {
        Ok(())
    }

    fn render_frame(&mut self, ctx: &mut FrameContext<'_>) -> ScreenResult<()>;

    /// Release resources once the loop has been interrupted.
    fn on_interrupt(&mut self) {}
}
