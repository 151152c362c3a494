//! Stream event decoding.
//!
//! Every payload on the push channel is a JSON object carrying a `type`
//! tag. Three tags address the session itself (`welcome`, `history`,
//! `user_count`); every other object is a live chat [`Message`]. The
//! dispatch here is explicit so the message fallthrough is a deliberate
//! default branch rather than an accident of ordering.

use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;

use crate::Message;

/// Failed to decode a stream payload.
#[derive(Debug, Error)]
pub enum DecodeError {
    /// Payload was not valid JSON.
    #[error("invalid JSON payload: {0}")]
    Json(#[from] serde_json::Error),

    /// Payload was valid JSON but not a known event shape.
    #[error("malformed {tag} event: {reason}")]
    Malformed {
        /// The `type` tag the payload carried.
        tag: String,
        /// Underlying field error.
        reason: String,
    },
}

/// A decoded event from the push channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    /// Connection handshake: the server's assigned display name for
    /// this session.
    Welcome {
        /// Name the server will attach to our messages.
        assigned_name: String,
    },

    /// Message backlog replayed on (re)connect, in original order.
    History {
        /// Messages oldest first.
        messages: Vec<Message>,
    },

    /// Presence update.
    UserCount {
        /// Number of connected clients.
        count: u64,
    },

    /// A live chat message (the default variant for any other tag).
    Message(Message),
}

#[derive(Deserialize)]
struct WelcomeWire {
    assigned_name: String,
}

#[derive(Deserialize)]
struct HistoryWire {
    messages: Vec<Message>,
}

#[derive(Deserialize)]
struct UserCountWire {
    count: u64,
}

impl SessionEvent {
    /// Decode one event payload.
    ///
    /// Dispatches on the `type` tag; any tag outside the session set is
    /// treated as a live [`Message`]. A payload that names a known tag
    /// but misses its fields is an error, not a message.
    pub fn decode(data: &str) -> Result<Self, DecodeError> {
        let value: Value = serde_json::from_str(data)?;
        let tag = value.get("type").and_then(Value::as_str).unwrap_or_default().to_owned();

        match tag.as_str() {
            "welcome" => {
                let wire: WelcomeWire = from_tagged(&tag, value)?;
                Ok(Self::Welcome { assigned_name: wire.assigned_name })
            },
            "history" => {
                let wire: HistoryWire = from_tagged(&tag, value)?;
                Ok(Self::History { messages: wire.messages })
            },
            "user_count" => {
                let wire: UserCountWire = from_tagged(&tag, value)?;
                Ok(Self::UserCount { count: wire.count })
            },
            _ => {
                let message: Message = from_tagged(&tag, value)?;
                Ok(Self::Message(message))
            },
        }
    }
}

fn from_tagged<T: serde::de::DeserializeOwned>(tag: &str, value: Value) -> Result<T, DecodeError> {
    serde_json::from_value(value)
        .map_err(|e| DecodeError::Malformed { tag: tag.to_owned(), reason: e.to_string() })
}
