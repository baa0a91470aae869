use std::path::PathBuf;

use thiserror::Error;

/// Failures a screen can surface to the top-level handler.
///
/// Every variant maps to a distinct process exit status (see [`ScreenError::exit_code`]).
/// `Interrupted` is not a failure: it is how a keyboard interrupt unwinds a frame.
#[derive(Debug, Error)]
pub enum ScreenError {
    #[error("Invalid use of option '{option}'. {reason}")]
    InvalidOption {
        option: String,
        reason: String,
        help: Option<String>,
    },

    #[error("Could not find path for {}. {reason}", path.display())]
    PathNotFound { path: PathBuf, reason: String },

    #[error("Error while trying to fetch from {url}. {reason}")]
    Url { url: String, reason: String },

    #[error("There were parsing issues with '{name}'. {reason}")]
    Parse { name: String, reason: String },

    #[error("Interrupted")]
    Interrupted,

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl ScreenError {
    pub fn invalid_option(option: impl Into<String>, reason: impl Into<String>) -> Self {
        ScreenError::InvalidOption {
            option: option.into(),
            reason: reason.into(),
            help: None,
        }
    }

    /// A missing required option, with an optional screen-specific hint.
    pub fn mandatory(option: impl Into<String>, help: Option<String>) -> Self {
        ScreenError::InvalidOption {
            option: option.into(),
            reason: "It is mandatory option".to_string(),
            help,
        }
    }

    pub fn path_not_found(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        ScreenError::PathNotFound {
            path: path.into(),
            reason: reason.into(),
        }
    }

    pub fn url(url: impl Into<String>, reason: impl Into<String>) -> Self {
        ScreenError::Url {
            url: url.into(),
            reason: reason.into(),
        }
    }

    pub fn parse(name: impl Into<String>, reason: impl Into<String>) -> Self {
        ScreenError::Parse {
            name: name.into(),
            reason: reason.into(),
        }
    }

    pub fn is_interrupt(&self) -> bool {
        matches!(self, ScreenError::Interrupted)
    }

    /// Extra guidance attached to the error, shown after the main message.
    pub fn help(&self) -> Option<&str> {
        match self {
            ScreenError::InvalidOption { help, .. } => help.as_deref(),
            _ => None,
        }
    }

    /// errno-style exit status for this kind of failure.
    pub fn exit_code(&self) -> i32 {
        match self {
            ScreenError::InvalidOption { .. } => libc::EINVAL,
            ScreenError::PathNotFound { .. } => libc::ENOENT,
            ScreenError::Url { .. } => libc::ENETUNREACH,
            ScreenError::Parse { .. } => libc::ENOEXEC,
            ScreenError::Interrupted => 0,
            ScreenError::Other(_) => libc::EPERM,
        }
    }
}

impl From<std::io::Error> for ScreenError {
    fn from(err: std::io::Error) -> Self {
        ScreenError::Other(anyhow::Error::new(err).context("Terminal write failed"))
    }
}

pub type ScreenResult<T> = Result<T, ScreenError>;

/// Classify an application-level error, looking through `anyhow` wrapping.
pub fn exit_code_for(err: &anyhow::Error) -> i32 {
    match err.downcast_ref::<ScreenError>() {
        Some(e) => e.exit_code(),
        None => libc::EPERM,
    }
}
