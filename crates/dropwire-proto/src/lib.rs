//! Wire types for the dropwire chat protocol
//!
//! The server pushes JSON objects over a server-sent event stream and
//! accepts plain JSON / multipart requests in return. This crate defines
//! the typed forms of both directions and the decode step that turns a
//! raw event payload into a [`SessionEvent`].

#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod event;
mod message;

pub use event::{DecodeError, SessionEvent};
pub use message::{Message, MessageKind, TextPayload, UploadResponse};
