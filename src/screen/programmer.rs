use std::fs;
use std::path::PathBuf;

use clap::Args;
use tracing::warn;

use super::{seconds_option, FrameContext, Screen};
use crate::config::defaults;
use crate::discovery::{self, FileQueue};
use crate::error::{ScreenError, ScreenResult};
use crate::typing::Typist;

const NO_PATH_HELP: &str = "\
You just need to provide the path to the location from where termsaver will
read and display on screen.

If you do not have any code in your local machine, clone some interesting
project from the Internet and point termsaver at it:

    git clone https://github.com/rust-lang/rust.git
    termsaver programmer -p rust/library";

#[derive(Debug, Clone, Default, Args)]
pub struct ProgrammerArgs {
    /// Directory (searched recursively) or single file to display
    #[arg(short, long)]
    pub path: Option<PathBuf>,

    /// Seconds between typed characters
    #[arg(short, long)]
    pub delay: Option<f64>,

    /// Only show files whose name ends with this (for example "rs" or ".py")
    #[arg(short, long)]
    pub extension: Option<String>,
}

/// Types out every text file under a path, forever.
pub struct ProgrammerScreen {
    path: PathBuf,
    extension: Option<String>,
    typist: Typist,
    queue: Option<FileQueue>,
}

impl ProgrammerScreen {
    pub fn from_args(args: ProgrammerArgs) -> ScreenResult<Self> {
        let path = args
            .path
            .filter(|p| !p.as_os_str().is_empty())
            .ok_or_else(|| ScreenError::mandatory("path", Some(NO_PATH_HELP.to_string())))?;
        if !path.exists() {
            return Err(ScreenError::path_not_found(
                path,
                "Make sure the file or directory exists.",
            ));
        }

        let char_delay = match args.delay {
            Some(secs) => seconds_option("delay", secs)?,
            None => defaults::CHAR_DELAY,
        };
        let extension = args.extension.filter(|e| !e.is_empty());
        Ok(Self::new(path, extension, Typist::new(char_delay)))
    }

    pub fn new(path: PathBuf, extension: Option<String>, typist: Typist) -> Self {
        Self {
            path,
            extension,
            typist,
            queue: None,
        }
    }
}

impl Screen for ProgrammerScreen {
    fn name(&self) -> &'static str {
        "programmer"
    }

    fn description(&self) -> &'static str {
        "displays source code in typing animation"
    }

    fn cleanup_per_cycle(&self) -> bool {
        true
    }

    fn setup(&mut self, _ctx: &mut FrameContext<'_>) -> ScreenResult<()> {
        self.queue = Some(discovery::start_scan(
            &self.path,
            self.extension.as_deref(),
        )?);
        Ok(())
    }

    /// One file per frame.
    fn render_frame(&mut self, ctx: &mut FrameContext<'_>) -> ScreenResult<()> {
        let Some(queue) = self.queue.as_mut() else {
            return Err(anyhow::anyhow!("file scan was not started").into());
        };

        let path = queue.next(ctx.pacer)?;
        let bytes = match fs::read(&path) {
            Ok(bytes) => bytes,
            Err(err) => {
                // Gone or unreadable since the scan saw it; drop it from the cycle.
                warn!(path = %path.display(), error = %err, "Could not read file");
                return Ok(());
            }
        };
        queue.requeue(path);

        self.typist
            .type_print(ctx, &String::from_utf8_lossy(&bytes))
    }

    fn on_interrupt(&mut self) {
        self.queue = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn path_is_mandatory() {
        let err = ProgrammerScreen::from_args(ProgrammerArgs::default())
            .err()
            .unwrap();
        assert!(matches!(err, ScreenError::InvalidOption { ref option, .. } if option == "path"));
        assert!(err.help().is_some());
    }

    #[test]
    fn missing_path_is_reported() {
        let err = ProgrammerScreen::from_args(ProgrammerArgs {
            path: Some(PathBuf::from("/definitely/not/here")),
            ..ProgrammerArgs::default()
        })
        .err()
        .unwrap();
        assert_eq!(err.exit_code(), libc::ENOENT);
    }
}
