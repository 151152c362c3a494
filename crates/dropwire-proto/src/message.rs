//! Chat message and request/response payloads.

use serde::{Deserialize, Serialize};

/// Content kind of a [`Message`], from its `type` field.
///
/// Tags outside the known set decode as [`MessageKind::Unknown`] so a
/// newer server cannot break the event loop; the renderer drops such
/// messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageKind {
    /// Plain text message (`content` is meaningful).
    Text,
    /// File announcement (`filename` and `url` are meaningful).
    File,
    /// Unrecognized tag.
    #[serde(other)]
    Unknown,
}

/// A chat message as broadcast by the server.
///
/// Only the fields required by [`Message::kind`] are meaningful; the
/// rest stay `None`. `timestamp` is a pre-formatted display string
/// assigned by the server, not a parseable instant.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Message {
    /// Content kind, decoded from the `type` tag.
    #[serde(rename = "type")]
    pub kind: MessageKind,
    /// Stable identity of the sending client.
    pub sender_id: String,
    /// Display name the server held for the sender at send time.
    #[serde(default)]
    pub sender_name: Option<String>,
    /// Text body (`text` messages).
    #[serde(default)]
    pub content: Option<String>,
    /// Original file name (`file` messages).
    #[serde(default)]
    pub filename: Option<String>,
    /// Download URL, typically relative to the server base (`file`
    /// messages).
    #[serde(default)]
    pub url: Option<String>,
    /// Pre-formatted send time, e.g. `14:03:59`.
    #[serde(default)]
    pub timestamp: Option<String>,
}

/// Body of `POST /send`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TextPayload {
    /// Message text.
    pub content: String,
    /// Sender's durable client identity.
    pub sender_id: String,
    /// Sender's current assigned display name.
    pub sender_name: String,
}

/// JSON response of `POST /upload`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UploadResponse {
    /// Human-readable success note.
    #[serde(default)]
    pub message: Option<String>,
    /// Names of the stored files.
    #[serde(default)]
    pub files: Option<Vec<String>>,
    /// Present when the server rejected the upload.
    #[serde(default)]
    pub error: Option<String>,
}
