//! Session state types.

use crate::render::RenderedMessage;

/// Connection state of the session stream.
///
/// A UI indicator only: sends always attempt the outbound path
/// regardless of this value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    /// A connection attempt is in progress.
    Connecting,

    /// The push channel is open.
    Open,

    /// The push channel is down; the transport retries on its own.
    Disconnected,
}

/// Identifier for a transient transcript notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NoticeId(pub u64);

/// One entry in the transcript.
///
/// The transcript is append-only and is the only retained message
/// history; a `history` event repopulates it wholesale.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Entry {
    /// A rendered chat message.
    Message(RenderedMessage),

    /// A transient system notice (e.g. an upload in progress).
    Notice {
        /// Handle used to remove or rewrite the notice later.
        id: NoticeId,
        /// Display text.
        text: String,
    },
}
