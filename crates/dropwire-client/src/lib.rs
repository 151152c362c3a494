//! I/O side of the dropwire client
//!
//! Owns everything that touches the network or the filesystem: the
//! durable client identity, the best-effort device label, the
//! server-sent event stream with its reconnect loop, and the outbound
//! request path for text and file payloads.
//!
//! Protocol decoding lives in [`dropwire_proto`]; nothing here holds UI
//! state.

#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod config;
mod error;

pub mod device;
pub mod identity;
pub mod outbound;
pub mod stream;

pub use config::ClientConfig;
pub use error::ClientError;
pub use outbound::Dispatcher;
pub use stream::{StreamHandle, StreamUpdate};
