//! Application side-effects and intents.
//!
//! [`AppAction`] values are instructions produced by the
//! [`crate::App`] state machine for the runtime to execute.

use std::path::PathBuf;

use crate::NoticeId;

/// Actions produced by the App state machine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppAction {
    /// Render the UI.
    Render,

    /// Quit the application.
    Quit,

    /// Submit a text message.
    SendText {
        /// Message body (already guarded against empty input).
        content: String,
    },

    /// Upload files.
    UploadFiles {
        /// Local files to upload.
        paths: Vec<PathBuf>,
        /// Transcript notice to resolve when the upload finishes.
        notice: NoticeId,
    },

    /// Put text on the clipboard.
    CopyText {
        /// Text to copy.
        text: String,
    },

    /// Download a shared file.
    SaveFile {
        /// File URL as carried by the message (possibly relative).
        url: String,
        /// Suggested file name.
        filename: String,
    },
}
