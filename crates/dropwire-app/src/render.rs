//! Message rendering.
//!
//! Pure functions from a decoded [`Message`] plus the local identity to
//! a displayable transcript entry. Classification (self vs. other),
//! display-name fallback and the file extension tag all live here so
//! the UI layer only lays out already-shaped data.
//!
//! # Sanitization invariant
//!
//! All user-supplied text (content, file names, display names) passes
//! through [`sanitize`] before display. The display layer never
//! interprets message text as markup, and [`sanitize`] removes control
//! characters, so untrusted content cannot inject escape sequences into
//! the terminal. Printable characters, including `< > & " '`, pass
//! through verbatim.

use dropwire_proto::{Message, MessageKind};

/// How many characters of the sender id make up the fallback label.
const FALLBACK_ID_CHARS: usize = 4;

/// Maximum length of a file extension tag.
const EXT_TAG_MAX: usize = 4;

/// A message shaped for display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedMessage {
    /// Whether the local client authored this message.
    pub is_self: bool,
    /// Display label for the sender ("Me" for self).
    pub sender: String,
    /// Pre-formatted send time; empty when the server sent none.
    pub timestamp: String,
    /// Type-specific body.
    pub body: RenderedBody,
}

/// Body of a rendered message, by content type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderedBody {
    /// Plain text.
    Text {
        /// Sanitized message text.
        content: String,
    },
    /// Shared file.
    File {
        /// Sanitized original file name.
        filename: String,
        /// Uppercase extension tag, at most four characters.
        ext_tag: String,
        /// Download URL (unsanitized; consumed by the request path,
        /// never displayed raw).
        url: String,
    },
}

/// Render a message for the transcript.
///
/// Returns `None` for unrecognized message kinds and for file messages
/// missing their file fields; both are dropped silently apart from a
/// debug log.
pub fn render(message: &Message, my_id: &str) -> Option<RenderedMessage> {
    let is_self = message.sender_id == my_id;
    let sender = sanitize(&display_name(message, is_self));
    let timestamp = message.timestamp.clone().unwrap_or_default();

    let body = match message.kind {
        MessageKind::Text => RenderedBody::Text {
            content: sanitize(message.content.as_deref().unwrap_or_default()),
        },
        MessageKind::File => {
            let (Some(filename), Some(url)) = (&message.filename, &message.url) else {
                tracing::debug!(sender_id = %message.sender_id, "file message missing fields");
                return None;
            };
            RenderedBody::File {
                filename: sanitize(filename),
                ext_tag: extension_tag(filename),
                url: url.clone(),
            }
        },
        MessageKind::Unknown => {
            tracing::debug!(sender_id = %message.sender_id, "dropping message of unknown kind");
            return None;
        },
    };

    Some(RenderedMessage { is_self, sender, timestamp, body })
}

/// Sender label: "Me" for self regardless of any `sender_name`, then
/// the server-assigned name, then a fragment of the sender id.
fn display_name(message: &Message, is_self: bool) -> String {
    if is_self {
        return "Me".to_owned();
    }
    match message.sender_name.as_deref() {
        Some(name) if !name.is_empty() => name.to_owned(),
        _ => {
            let prefix: String = message.sender_id.chars().take(FALLBACK_ID_CHARS).collect();
            format!("User {prefix}")
        },
    }
}

/// Strip control characters from untrusted text.
///
/// Tabs and newlines collapse to single spaces (transcript entries are
/// line-oriented); everything else the Unicode control class covers,
/// ESC included, is removed outright.
pub fn sanitize(text: &str) -> String {
    text.chars()
        .filter_map(|c| match c {
            '\n' | '\r' | '\t' => Some(' '),
            c if c.is_control() => None,
            c => Some(c),
        })
        .collect()
}

/// Uppercase tag from the final dot segment of a file name, truncated
/// to four characters. A name without a dot tags as itself. Control
/// characters are stripped; the tag reaches the display layer as-is.
pub fn extension_tag(filename: &str) -> String {
    let segment = filename.rsplit('.').next().unwrap_or(filename);
    segment.to_uppercase().chars().filter(|c| !c.is_control()).take(EXT_TAG_MAX).collect()
}

#[cfg(test)]
mod tests {
    use proptest::prelude::proptest;

    use super::*;

    fn text_message(sender_id: &str, sender_name: Option<&str>, content: &str) -> Message {
        Message {
            kind: MessageKind::Text,
            sender_id: sender_id.to_owned(),
            sender_name: sender_name.map(str::to_owned),
            content: Some(content.to_owned()),
            filename: None,
            url: None,
            timestamp: Some("12:00:00".to_owned()),
        }
    }

    fn file_message(sender_id: &str, filename: &str, url: &str) -> Message {
        Message {
            kind: MessageKind::File,
            sender_id: sender_id.to_owned(),
            sender_name: Some("Mac".to_owned()),
            content: None,
            filename: Some(filename.to_owned()),
            url: Some(url.to_owned()),
            timestamp: None,
        }
    }

    #[test]
    fn own_messages_render_as_me_even_with_sender_name() {
        let message = text_message("my-id", Some("Linux PC"), "hi");
        let rendered = render(&message, "my-id").unwrap();
        assert!(rendered.is_self);
        assert_eq!(rendered.sender, "Me");
    }

    #[test]
    fn other_messages_use_sender_name() {
        let rendered = render(&text_message("peer", Some("Pixel 6"), "hi"), "my-id").unwrap();
        assert!(!rendered.is_self);
        assert_eq!(rendered.sender, "Pixel 6");
    }

    #[test]
    fn missing_sender_name_falls_back_to_id_fragment() {
        let rendered = render(&text_message("abcdef123", None, "hi"), "my-id").unwrap();
        assert_eq!(rendered.sender, "User abcd");
    }

    #[test]
    fn markup_characters_pass_through_verbatim() {
        let rendered =
            render(&text_message("peer", None, r#"<script>&"'</script>"#), "my-id").unwrap();
        let RenderedBody::Text { content } = rendered.body else {
            unreachable!("expected text body");
        };
        assert_eq!(content, r#"<script>&"'</script>"#);
    }

    #[test]
    fn control_characters_are_stripped_from_content() {
        let rendered =
            render(&text_message("peer", None, "safe\u{1b}[31mred\u{7}"), "my-id").unwrap();
        let RenderedBody::Text { content } = rendered.body else {
            unreachable!("expected text body");
        };
        assert_eq!(content, "safe[31mred");
    }

    #[test]
    fn file_message_renders_extension_tag() {
        let rendered =
            render(&file_message("peer", "report.final.PDF", "/files/x/report.final.PDF"), "me")
                .unwrap();
        let RenderedBody::File { ext_tag, filename, .. } = rendered.body else {
            unreachable!("expected file body");
        };
        assert_eq!(ext_tag, "PDF");
        assert_eq!(filename, "report.final.PDF");
    }

    #[test]
    fn long_extension_is_truncated_to_four_chars() {
        assert_eq!(extension_tag("archive.targz12345"), "TARG");
    }

    #[test]
    fn dotless_filename_tags_as_itself() {
        assert_eq!(extension_tag("README"), "READ");
        assert_eq!(extension_tag("a.b"), "B");
    }

    #[test]
    fn extension_tag_strips_control_characters() {
        assert_eq!(extension_tag("evil.\u{1b}]0;x"), "]0;X");
        assert_eq!(extension_tag("note.t\u{7}xt"), "TXT");
    }

    #[test]
    fn rendered_file_tag_has_no_control_characters() {
        let rendered =
            render(&file_message("peer", "evil.\u{1b}]0;x", "/files/x/evil"), "me").unwrap();
        let RenderedBody::File { ext_tag, .. } = rendered.body else {
            unreachable!("expected file body");
        };
        assert!(ext_tag.chars().all(|c| !c.is_control()));
    }

    #[test]
    fn unknown_kind_renders_nothing() {
        let message = Message {
            kind: MessageKind::Unknown,
            sender_id: "peer".to_owned(),
            sender_name: None,
            content: None,
            filename: None,
            url: None,
            timestamp: None,
        };
        assert!(render(&message, "me").is_none());
    }

    #[test]
    fn file_message_missing_url_renders_nothing() {
        let mut message = file_message("peer", "a.txt", "/files/a.txt");
        message.url = None;
        assert!(render(&message, "me").is_none());
    }

    proptest! {
        #[test]
        fn sanitized_text_has_no_control_characters(input in ".*") {
            let cleaned = sanitize(&input);
            assert!(cleaned.chars().all(|c| !c.is_control()));
        }

        #[test]
        fn sanitize_preserves_printable_text(input in "[ -~]*") {
            // Printable ASCII, including < > & " ', is untouched.
            assert_eq!(sanitize(&input), input);
        }
    }
}
