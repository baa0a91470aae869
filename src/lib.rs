//! Terminal screensaver: a family of text animations sharing one render loop.

pub mod cli;
pub mod config;
pub mod discovery;
pub mod error;
pub mod fetch;
pub mod layout;
pub mod rss;
pub mod runtime;
pub mod screen;
pub mod terminal;
pub mod typing;
pub mod ui;

pub use error::{ScreenError, ScreenResult};
