//! Application input events.
//!
//! Events originate from three sources: the session stream (connection
//! transitions and decoded server events), the runtime's background
//! send/upload tasks reporting back, and the terminal (tick, resize).
//! User keystrokes do not appear here; the input layer calls [`crate::App`]
//! API methods directly.

use dropwire_proto::Message;

use crate::NoticeId;

/// Events processed by the App state machine.
#[derive(Debug, Clone)]
pub enum AppEvent {
    /// Periodic tick.
    Tick,

    /// Terminal resize; the views size themselves from the frame, so
    /// this only forces a redraw.
    Resize,

    /// The stream is (re)connecting.
    StreamConnecting,

    /// The stream request was accepted.
    StreamOpened,

    /// The stream failed; the transport will retry on its own.
    StreamLost,

    /// Server assigned us a display name for this connection.
    Welcome {
        /// Name attached to our outbound messages.
        assigned_name: String,
    },

    /// Presence count changed.
    UserCount {
        /// Connected client count.
        count: u64,
    },

    /// Message backlog for (re)population of the transcript.
    History {
        /// Messages oldest first.
        messages: Vec<Message>,
    },

    /// A live message arrived.
    MessageReceived(Message),

    /// A background text send failed.
    SendFailed {
        /// Failure description for the status line.
        reason: String,
    },

    /// An upload request completed (transport-level success).
    UploadFinished {
        /// The transcript notice created when the upload started.
        notice: NoticeId,
        /// Error reported in the server's response body, if any.
        error: Option<String>,
    },

    /// An upload request failed at the transport level.
    UploadFailed {
        /// The transcript notice created when the upload started.
        notice: NoticeId,
    },

    /// A file download completed.
    SaveFinished {
        /// Name of the saved file.
        filename: String,
        /// Destination path, for the status line.
        dest: String,
    },

    /// A file download failed.
    SaveFailed {
        /// Failure description for the status line.
        reason: String,
    },
}
