//! Terminal UI for dropwire
//!
//! A thin shell over [`dropwire_app::App`] that provides terminal I/O:
//! keyboard input, slash commands, clipboard access and ratatui views.
//! Session policy lives in `dropwire-app`; network and filesystem I/O
//! in `dropwire-client`. This crate only wires them together.

#![forbid(unsafe_code)]
#![deny(missing_docs)]

pub mod clipboard;
pub mod commands;
pub mod input;
pub mod runtime;
pub mod ui;

pub use dropwire_app::{App, AppAction, AppEvent};
pub use input::{InputState, KeyInput};
pub use runtime::{Runtime, RuntimeError};
