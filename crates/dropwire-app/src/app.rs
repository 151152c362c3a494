//! Session state machine.
//!
//! Owns all session state: the client identity, the connection-scoped
//! assigned name, the connection indicator and the transcript. Events
//! come in through
//! [`App::handle`]; user intents come in through the API methods the
//! input layer calls. Both return [`AppAction`]s for the runtime to
//! execute.

use std::path::PathBuf;

use crate::render::{self, RenderedBody, RenderedMessage};
use crate::{AppAction, AppEvent, ConnectionState, Entry, NoticeId};

/// Placeholder display name until the server's welcome arrives.
const DEFAULT_NAME: &str = "Me";

/// Session state machine.
#[derive(Debug, Clone)]
pub struct App {
    /// Durable client identity; the sender key on everything we send.
    identity: String,
    /// Display name assigned by the server for this connection.
    assigned_name: String,
    /// Stream indicator state.
    connection: ConnectionState,
    /// Presence count, once the server has reported one.
    user_count: Option<u64>,
    /// Append-only transcript; the only retained message history.
    transcript: Vec<Entry>,
    /// Transient status line (errors, command feedback).
    status_message: Option<String>,
    /// Counter for transcript notice ids.
    next_notice: u64,
}

impl App {
    /// Create an App for the given client identity, in connecting
    /// state.
    pub fn new(identity: String) -> Self {
        Self {
            identity,
            assigned_name: DEFAULT_NAME.to_owned(),
            connection: ConnectionState::Connecting,
            user_count: None,
            transcript: Vec::new(),
            status_message: None,
            next_notice: 0,
        }
    }

    /// Process an event and return actions for the runtime.
    pub fn handle(&mut self, event: AppEvent) -> Vec<AppAction> {
        match event {
            AppEvent::Tick => vec![],
            AppEvent::Resize => vec![AppAction::Render],
            AppEvent::StreamConnecting => {
                self.connection = ConnectionState::Connecting;
                vec![AppAction::Render]
            },
            AppEvent::StreamOpened => {
                self.connection = ConnectionState::Open;
                vec![AppAction::Render]
            },
            AppEvent::StreamLost => {
                self.connection = ConnectionState::Disconnected;
                vec![AppAction::Render]
            },
            AppEvent::Welcome { assigned_name } => {
                tracing::debug!(name = %assigned_name, "assigned name");
                self.assigned_name = assigned_name;
                vec![AppAction::Render]
            },
            AppEvent::UserCount { count } => {
                self.user_count = Some(count);
                vec![AppAction::Render]
            },
            AppEvent::History { messages } => {
                // The server replays the backlog on every (re)connect;
                // the transcript is repopulated rather than appended to.
                self.transcript.clear();
                for message in &messages {
                    self.append_message(message);
                }
                vec![AppAction::Render]
            },
            AppEvent::MessageReceived(message) => {
                self.append_message(&message);
                vec![AppAction::Render]
            },
            AppEvent::SendFailed { reason } => {
                self.status_message = Some(format!("Failed to send message: {reason}"));
                vec![AppAction::Render]
            },
            AppEvent::UploadFinished { notice, error } => {
                self.transcript.retain(|entry| !matches!(entry, Entry::Notice { id, .. } if *id == notice));
                if let Some(error) = error {
                    self.status_message = Some(format!("Upload failed: {error}"));
                }
                vec![AppAction::Render]
            },
            AppEvent::UploadFailed { notice } => {
                for entry in &mut self.transcript {
                    if let Entry::Notice { id, text } = entry {
                        if *id == notice {
                            *text = "Upload failed.".to_owned();
                        }
                    }
                }
                vec![AppAction::Render]
            },
            AppEvent::SaveFinished { filename, dest } => {
                self.status_message = Some(format!("Saved {filename} to {dest}"));
                vec![AppAction::Render]
            },
            AppEvent::SaveFailed { reason } => {
                self.status_message = Some(format!("Download failed: {reason}"));
                vec![AppAction::Render]
            },
        }
    }

    /// Submit the current input as a text message.
    ///
    /// Empty or whitespace-only input is a no-op: no action, no state
    /// change. Otherwise the send is optimistic; nothing is rendered
    /// locally until the stream echoes the message back.
    pub fn send_text(&mut self, content: String) -> Vec<AppAction> {
        if content.trim().is_empty() {
            return vec![];
        }
        vec![AppAction::SendText { content }, AppAction::Render]
    }

    /// Start an upload and place its progress notice in the transcript.
    pub fn upload_files(&mut self, paths: Vec<PathBuf>) -> Vec<AppAction> {
        if paths.is_empty() {
            self.status_message = Some("Usage: /upload <path>...".to_owned());
            return vec![AppAction::Render];
        }

        let notice = self.push_notice(format!("Uploading {} file(s)...", paths.len()));
        vec![AppAction::UploadFiles { paths, notice }, AppAction::Render]
    }

    /// Copy the `back`-th most recent text message (0 = newest).
    pub fn copy_message(&mut self, back: usize) -> Vec<AppAction> {
        let content = self
            .rendered_messages()
            .rev()
            .filter_map(|message| match &message.body {
                RenderedBody::Text { content } => Some(content.clone()),
                RenderedBody::File { .. } => None,
            })
            .nth(back);

        match content {
            Some(text) => vec![AppAction::CopyText { text }],
            None => {
                self.status_message = Some("No text message to copy".to_owned());
                vec![AppAction::Render]
            },
        }
    }

    /// Save the `back`-th most recent file message (0 = newest).
    pub fn save_file(&mut self, back: usize) -> Vec<AppAction> {
        let target = self
            .rendered_messages()
            .rev()
            .filter_map(|message| match &message.body {
                RenderedBody::File { filename, url, .. } => {
                    Some((url.clone(), filename.clone()))
                },
                RenderedBody::Text { .. } => None,
            })
            .nth(back);

        match target {
            Some((url, filename)) => {
                self.status_message = Some(format!("Saving {filename}..."));
                vec![AppAction::SaveFile { url, filename }, AppAction::Render]
            },
            None => {
                self.status_message = Some("No file message to save".to_owned());
                vec![AppAction::Render]
            },
        }
    }

    /// Quit the application.
    pub fn quit(&self) -> Vec<AppAction> {
        vec![AppAction::Quit]
    }

    /// Set the transient status line.
    pub fn set_status(&mut self, message: impl Into<String>) {
        self.status_message = Some(message.into());
    }

    /// Append a live or replayed message, dropping unrenderable ones.
    fn append_message(&mut self, message: &dropwire_proto::Message) {
        if let Some(rendered) = render::render(message, &self.identity) {
            self.transcript.push(Entry::Message(rendered));
        }
    }

    fn push_notice(&mut self, text: String) -> NoticeId {
        let id = NoticeId(self.next_notice);
        self.next_notice = self.next_notice.wrapping_add(1);
        self.transcript.push(Entry::Notice { id, text });
        id
    }

    fn rendered_messages(&self) -> impl DoubleEndedIterator<Item = &RenderedMessage> {
        self.transcript.iter().filter_map(|entry| match entry {
            Entry::Message(message) => Some(message),
            Entry::Notice { .. } => None,
        })
    }

    /// Durable client identity.
    pub fn identity(&self) -> &str {
        &self.identity
    }

    /// Current assigned display name ("Me" until welcomed).
    pub fn assigned_name(&self) -> &str {
        &self.assigned_name
    }

    /// Connection indicator state.
    pub fn connection_state(&self) -> ConnectionState {
        self.connection
    }

    /// Presence count, if reported.
    pub fn user_count(&self) -> Option<u64> {
        self.user_count
    }

    /// Transcript entries in arrival order.
    pub fn transcript(&self) -> &[Entry] {
        &self.transcript
    }

    /// Transient status line.
    pub fn status_message(&self) -> Option<&str> {
        self.status_message.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use dropwire_proto::{Message, MessageKind};

    use super::*;

    fn text_message(sender_id: &str, content: &str) -> Message {
        Message {
            kind: MessageKind::Text,
            sender_id: sender_id.to_owned(),
            sender_name: Some("Peer".to_owned()),
            content: Some(content.to_owned()),
            filename: None,
            url: None,
            timestamp: None,
        }
    }

    fn file_message(filename: &str, url: &str) -> Message {
        Message {
            kind: MessageKind::File,
            sender_id: "peer".to_owned(),
            sender_name: Some("Peer".to_owned()),
            content: None,
            filename: Some(filename.to_owned()),
            url: Some(url.to_owned()),
            timestamp: None,
        }
    }

    fn transcript_texts(app: &App) -> Vec<String> {
        app.transcript()
            .iter()
            .map(|entry| match entry {
                Entry::Message(m) => match &m.body {
                    RenderedBody::Text { content } => content.clone(),
                    RenderedBody::File { filename, .. } => filename.clone(),
                },
                Entry::Notice { text, .. } => text.clone(),
            })
            .collect()
    }

    #[test]
    fn history_repopulates_transcript_in_order() {
        let mut app = App::new("me".into());
        let _ = app.handle(AppEvent::MessageReceived(text_message("peer", "stale")));

        let _ = app.handle(AppEvent::History {
            messages: vec![
                text_message("a", "m1"),
                text_message("b", "m2"),
                text_message("c", "m3"),
            ],
        });

        assert_eq!(transcript_texts(&app), ["m1", "m2", "m3"]);
    }

    #[test]
    fn resize_only_requests_a_render() {
        let mut app = App::new("me".into());
        assert_eq!(app.handle(AppEvent::Resize), vec![AppAction::Render]);
    }

    #[test]
    fn whitespace_only_send_is_a_no_op() {
        let mut app = App::new("me".into());
        assert!(app.send_text("   \t ".into()).is_empty());
        assert!(app.send_text(String::new()).is_empty());
    }

    #[test]
    fn send_text_emits_send_action() {
        let mut app = App::new("me".into());
        let actions = app.send_text("hello".into());
        assert!(matches!(
            actions.as_slice(),
            [AppAction::SendText { content }, AppAction::Render] if content == "hello"
        ));
    }

    #[test]
    fn stream_transitions_update_indicator() {
        let mut app = App::new("me".into());
        assert_eq!(app.connection_state(), ConnectionState::Connecting);

        let _ = app.handle(AppEvent::StreamOpened);
        assert_eq!(app.connection_state(), ConnectionState::Open);

        let _ = app.handle(AppEvent::StreamLost);
        assert_eq!(app.connection_state(), ConnectionState::Disconnected);

        let _ = app.handle(AppEvent::StreamConnecting);
        assert_eq!(app.connection_state(), ConnectionState::Connecting);
    }

    #[test]
    fn welcome_replaces_assigned_name() {
        let mut app = App::new("me".into());
        assert_eq!(app.assigned_name(), "Me");

        let _ = app.handle(AppEvent::Welcome { assigned_name: "Pixel 6-1".into() });
        assert_eq!(app.assigned_name(), "Pixel 6-1");
    }

    #[test]
    fn upload_places_notice_and_finish_removes_it() {
        let mut app = App::new("me".into());
        let actions = app.upload_files(vec![PathBuf::from("a.txt"), PathBuf::from("b.txt")]);

        let [AppAction::UploadFiles { notice, .. }, AppAction::Render] = actions.as_slice() else {
            unreachable!("expected upload action");
        };
        assert_eq!(transcript_texts(&app), ["Uploading 2 file(s)..."]);

        let _ = app.handle(AppEvent::UploadFinished { notice: *notice, error: None });
        assert!(app.transcript().is_empty());
        assert!(app.status_message().is_none());
    }

    #[test]
    fn upload_server_error_removes_notice_and_sets_status() {
        let mut app = App::new("me".into());
        let actions = app.upload_files(vec![PathBuf::from("a.txt")]);
        let [AppAction::UploadFiles { notice, .. }, _] = actions.as_slice() else {
            unreachable!("expected upload action");
        };

        let _ = app.handle(AppEvent::UploadFinished {
            notice: *notice,
            error: Some("disk full".into()),
        });

        assert!(app.transcript().is_empty());
        assert_eq!(app.status_message(), Some("Upload failed: disk full"));
    }

    #[test]
    fn upload_transport_failure_mutates_notice_in_place() {
        let mut app = App::new("me".into());
        let actions = app.upload_files(vec![PathBuf::from("a.txt")]);
        let [AppAction::UploadFiles { notice, .. }, _] = actions.as_slice() else {
            unreachable!("expected upload action");
        };

        let _ = app.handle(AppEvent::UploadFailed { notice: *notice });
        assert_eq!(transcript_texts(&app), ["Upload failed."]);
    }

    #[test]
    fn send_failure_surfaces_on_status_line() {
        let mut app = App::new("me".into());
        let _ = app.handle(AppEvent::SendFailed { reason: "connection refused".into() });
        assert_eq!(app.status_message(), Some("Failed to send message: connection refused"));
    }

    #[test]
    fn copy_targets_newest_text_message() {
        let mut app = App::new("me".into());
        let _ = app.handle(AppEvent::MessageReceived(text_message("a", "older")));
        let _ = app.handle(AppEvent::MessageReceived(file_message("a.txt", "/files/a.txt")));
        let _ = app.handle(AppEvent::MessageReceived(text_message("b", "newest")));

        let actions = app.copy_message(0);
        assert!(matches!(
            actions.as_slice(),
            [AppAction::CopyText { text }] if text == "newest"
        ));

        let actions = app.copy_message(1);
        assert!(matches!(
            actions.as_slice(),
            [AppAction::CopyText { text }] if text == "older"
        ));
    }

    #[test]
    fn save_targets_newest_file_message() {
        let mut app = App::new("me".into());
        let _ = app.handle(AppEvent::MessageReceived(file_message("a.txt", "/files/a.txt")));
        let _ = app.handle(AppEvent::MessageReceived(text_message("b", "chatter")));
        let _ = app.handle(AppEvent::MessageReceived(file_message("b.pdf", "/files/b.pdf")));

        let actions = app.save_file(0);
        assert!(matches!(
            actions.as_slice(),
            [AppAction::SaveFile { filename, .. }, AppAction::Render] if filename == "b.pdf"
        ));
    }

    #[test]
    fn copy_with_no_text_messages_sets_status() {
        let mut app = App::new("me".into());
        let actions = app.copy_message(0);
        assert_eq!(actions, vec![AppAction::Render]);
        assert_eq!(app.status_message(), Some("No text message to copy"));
    }

    #[test]
    fn unknown_kind_message_is_not_appended() {
        let mut app = App::new("me".into());
        let mut message = text_message("peer", "hi");
        message.kind = MessageKind::Unknown;

        let _ = app.handle(AppEvent::MessageReceived(message));
        assert!(app.transcript().is_empty());
    }
}
