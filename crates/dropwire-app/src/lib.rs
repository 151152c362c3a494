//! Application layer for the dropwire client
//!
//! Pure state machine for the chat session: events in, actions out,
//! no I/O. The runtime (terminal shell) feeds it stream updates and
//! user intents and executes the actions it returns, which keeps every
//! piece of session policy unit-testable without a server or a
//! terminal.
//!
//! # Components
//!
//! - [`App`]: session state machine (connection, identity, transcript)
//! - [`AppEvent`] / [`AppAction`]: the event-in/action-out boundary
//! - [`render`]: pure message-to-transcript rendering

#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod action;
mod app;
mod event;
mod state;

pub mod render;

pub use action::AppAction;
pub use app::App;
pub use event::AppEvent;
pub use state::{ConnectionState, Entry, NoticeId};
