//! The render loop every screen runs under.

use std::io::Write;

use tracing::{debug, info};

use super::{FrameContext, Pacer, Screen};
use crate::error::{ScreenError, ScreenResult};
use crate::terminal;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderCycle {
    Init,
    Running,
    Interrupted,
    Terminated,
}

pub struct Lifecycle<'a> {
    state: RenderCycle,
    pacer: &'a dyn Pacer,
}

impl<'a> Lifecycle<'a> {
    pub fn new(pacer: &'a dyn Pacer) -> Self {
        Self {
            state: RenderCycle::Init,
            pacer,
        }
    }

    pub fn state(&self) -> RenderCycle {
        self.state
    }

    /// Clear the terminal, then render frames until interrupted.
    ///
    /// An interrupt is a clean exit: the screen gets its `on_interrupt` call, the cursor is
    /// shown again and `Ok` is returned. Any other error ends the loop and is returned as is.
    pub fn run(&mut self, screen: &mut dyn Screen, out: &mut dyn Write) -> ScreenResult<()> {
        self.state = RenderCycle::Running;
        info!(screen = screen.name(), "Starting screen");

        let result = {
            let mut ctx = FrameContext::new(&mut *out, self.pacer);
            drive(screen, &mut ctx)
        };

        match result {
            Ok(()) | Err(ScreenError::Interrupted) => {
                self.state = RenderCycle::Interrupted;
                debug!(screen = screen.name(), "Interrupted");
                screen.on_interrupt();
                terminal::show_cursor(out)?;
                self.state = RenderCycle::Terminated;
                Ok(())
            }
            Err(err) => {
                self.state = RenderCycle::Terminated;
                let _ = terminal::show_cursor(out);
                Err(err)
            }
        }
    }
}

fn drive(screen: &mut dyn Screen, ctx: &mut FrameContext<'_>) -> ScreenResult<()> {
    ctx.clear()?;
    screen.setup(ctx)?;
    while !ctx.pacer.interrupted() {
        screen.render_frame(ctx)?;
        if screen.cleanup_per_cycle() {
            ctx.clear()?;
        }
    }
    Ok(())
}
