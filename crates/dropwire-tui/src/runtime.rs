//! Async runtime
//!
//! Event loop that drives terminal I/O and coordinates between the App
//! state machine, the session stream and the outbound dispatcher. Uses
//! tokio::select! to handle terminal events, stream updates and task
//! feedback concurrently.
//!
//! Outbound work (sends, uploads, downloads) runs in spawned tasks so
//! the loop never blocks on the network; each task reports its outcome
//! back through the feedback channel as an [`AppEvent`].

use std::io::{self, stdout};

use crossterm::{
    ExecutableCommand,
    event::{Event, EventStream, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use dropwire_client::{ClientConfig, ClientError, Dispatcher, StreamHandle, StreamUpdate, device, identity};
use dropwire_proto::SessionEvent;
use futures::StreamExt;
use ratatui::{Terminal, backend::CrosstermBackend};
use thiserror::Error;
use tokio::sync::mpsc;

use crate::{
    App,
    AppAction,
    AppEvent,
    clipboard,
    input::{InputState, KeyInput},
    ui,
};

/// Runtime errors.
#[derive(Debug, Error)]
pub enum RuntimeError {
    /// I/O error from terminal operations.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

/// Async runtime for the TUI.
///
/// Manages terminal setup/teardown, the main event loop, and
/// coordinates between App (state) and the client crate (I/O).
pub struct Runtime {
    terminal: Terminal<CrosstermBackend<io::Stdout>>,
    app: App,
    input: InputState,
    dispatcher: Dispatcher,
    stream: StreamHandle,
    feedback_tx: mpsc::Sender<AppEvent>,
    feedback_rx: mpsc::Receiver<AppEvent>,
}

impl Runtime {
    /// Create a runtime connected to `server`.
    ///
    /// `label` overrides device-name detection when given. Terminal raw
    /// mode is entered here and left again on drop.
    pub async fn new(server: String, label: Option<String>) -> Result<Self, RuntimeError> {
        let identity = identity::load_or_create();
        let device_name = match label {
            Some(label) => label,
            None => device::detect().await,
        };
        tracing::info!(device = %device_name, "starting session");

        let config = ClientConfig::new(server);
        let dispatcher = Dispatcher::new(config.clone(), identity.clone());
        let stream = dropwire_client::stream::connect(&config, &device_name);

        enable_raw_mode()?;
        stdout().execute(EnterAlternateScreen)?;

        let backend = CrosstermBackend::new(stdout());
        let terminal = Terminal::new(backend)?;
        let app = App::new(identity);

        let (feedback_tx, feedback_rx) = mpsc::channel(64);

        Ok(Self {
            terminal,
            app,
            input: InputState::new(),
            dispatcher,
            stream,
            feedback_tx,
            feedback_rx,
        })
    }

    /// Run the main event loop.
    pub async fn run(mut self) -> Result<(), RuntimeError> {
        self.render()?;

        let mut event_stream = EventStream::new();
        let mut tick_interval = tokio::time::interval(std::time::Duration::from_millis(100));

        loop {
            let should_quit = tokio::select! {
                // Terminal events
                maybe_event = event_stream.next() => {
                    match maybe_event {
                        Some(Ok(event)) => self.handle_terminal_event(event)?,
                        Some(Err(e)) => return Err(RuntimeError::Io(e)),
                        None => true,
                    }
                }

                // Session stream updates
                maybe_update = self.stream.updates.recv() => {
                    match maybe_update {
                        Some(update) => {
                            let actions = self.app.handle(stream_event(update));
                            self.process_actions(actions)?
                        },
                        // The stream task only exits when aborted.
                        None => false,
                    }
                }

                // Outcomes reported by spawned outbound tasks
                Some(event) = self.feedback_rx.recv() => {
                    let actions = self.app.handle(event);
                    self.process_actions(actions)?
                }

                // Periodic tick
                _ = tick_interval.tick() => {
                    let actions = self.app.handle(AppEvent::Tick);
                    self.process_actions(actions)?
                }
            };

            if should_quit {
                break;
            }
        }

        Ok(())
    }

    /// Handle a terminal event and return whether to quit.
    fn handle_terminal_event(&mut self, event: Event) -> Result<bool, RuntimeError> {
        let actions = match event {
            Event::Key(key) if key.kind == KeyEventKind::Press => match key_input(&key) {
                Some(key) => self.input.handle_key(key, &mut self.app),
                None => return Ok(false),
            },
            Event::Resize(_, _) => self.app.handle(AppEvent::Resize),
            _ => return Ok(false),
        };

        self.process_actions(actions)
    }

    /// Process actions returned by the app. Returns true if should quit.
    fn process_actions(&mut self, actions: Vec<AppAction>) -> Result<bool, RuntimeError> {
        for action in actions {
            match action {
                AppAction::Render => self.render()?,
                AppAction::Quit => return Ok(true),
                AppAction::SendText { content } => {
                    let dispatcher = self.dispatcher.clone();
                    let sender_name = self.app.assigned_name().to_owned();
                    let feedback = self.feedback_tx.clone();
                    tokio::spawn(async move {
                        if let Err(e) = dispatcher.send_text(&content, &sender_name).await {
                            let _ = feedback
                                .send(AppEvent::SendFailed { reason: e.to_string() })
                                .await;
                        }
                    });
                },
                AppAction::UploadFiles { paths, notice } => {
                    let dispatcher = self.dispatcher.clone();
                    let sender_name = self.app.assigned_name().to_owned();
                    let feedback = self.feedback_tx.clone();
                    tokio::spawn(async move {
                        let event = match dispatcher.send_files(&paths, &sender_name).await {
                            Ok(_) => AppEvent::UploadFinished { notice, error: None },
                            Err(ClientError::Rejected(error)) => {
                                AppEvent::UploadFinished { notice, error: Some(error) }
                            },
                            Err(e) => {
                                tracing::warn!(error = %e, "upload failed");
                                AppEvent::UploadFailed { notice }
                            },
                        };
                        let _ = feedback.send(event).await;
                    });
                },
                AppAction::CopyText { text } => {
                    match clipboard::copy(&text) {
                        Ok(()) => self.app.set_status("Copied"),
                        Err(e) => self.app.set_status(format!("Copy failed: {e}")),
                    }
                    self.render()?;
                },
                AppAction::SaveFile { url, filename } => {
                    let dispatcher = self.dispatcher.clone();
                    let feedback = self.feedback_tx.clone();
                    tokio::spawn(async move {
                        let event = match dispatcher.fetch_file(&url, &filename).await {
                            Ok(dest) => AppEvent::SaveFinished {
                                filename,
                                dest: dest.display().to_string(),
                            },
                            Err(e) => AppEvent::SaveFailed { reason: e.to_string() },
                        };
                        let _ = feedback.send(event).await;
                    });
                },
            }
        }
        Ok(false)
    }

    /// Render the UI.
    fn render(&mut self) -> Result<(), RuntimeError> {
        self.terminal.draw(|frame| {
            ui::render(frame, &self.app, &self.input);
        })?;
        Ok(())
    }
}

impl Drop for Runtime {
    fn drop(&mut self) {
        self.stream.stop();
        let _ = disable_raw_mode();
        let _ = stdout().execute(LeaveAlternateScreen);
    }
}

/// Map a stream update to the app event it drives.
fn stream_event(update: StreamUpdate) -> AppEvent {
    match update {
        StreamUpdate::Connecting => AppEvent::StreamConnecting,
        StreamUpdate::Opened => AppEvent::StreamOpened,
        StreamUpdate::Lost => AppEvent::StreamLost,
        StreamUpdate::Event(event) => match event {
            SessionEvent::Welcome { assigned_name } => AppEvent::Welcome { assigned_name },
            SessionEvent::History { messages } => AppEvent::History { messages },
            SessionEvent::UserCount { count } => AppEvent::UserCount { count },
            SessionEvent::Message(message) => AppEvent::MessageReceived(message),
        },
    }
}

/// Translate a crossterm key event into the input layer's alphabet.
fn key_input(key: &KeyEvent) -> Option<KeyInput> {
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        return match key.code {
            KeyCode::Char('c') => Some(KeyInput::Esc),
            _ => None,
        };
    }

    match key.code {
        KeyCode::Char(c) => Some(KeyInput::Char(c)),
        KeyCode::Enter => Some(KeyInput::Enter),
        KeyCode::Backspace => Some(KeyInput::Backspace),
        KeyCode::Delete => Some(KeyInput::Delete),
        KeyCode::Esc => Some(KeyInput::Esc),
        KeyCode::Left => Some(KeyInput::Left),
        KeyCode::Right => Some(KeyInput::Right),
        KeyCode::Home => Some(KeyInput::Home),
        KeyCode::End => Some(KeyInput::End),
        _ => None,
    }
}
