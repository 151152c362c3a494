//! Input state and key handling.
//!
//! Owns the text input buffer and cursor and handles character-level
//! key events. Command parsing happens here on Enter; everything else
//! goes to the [`App`] API as a text send.

use dropwire_app::{App, AppAction};

use crate::commands::{self, Command};

/// Key input events from the terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyInput {
    /// Character input.
    Char(char),
    /// Enter/Return key.
    Enter,
    /// Backspace key.
    Backspace,
    /// Delete key.
    Delete,
    /// Escape key.
    Esc,
    /// Left arrow.
    Left,
    /// Right arrow.
    Right,
    /// Home key.
    Home,
    /// End key.
    End,
}

/// Input state for the TUI.
///
/// Manages the text input buffer and cursor position.
#[derive(Debug, Default)]
pub struct InputState {
    /// Text buffer for user input.
    buffer: String,
    /// Cursor position within the buffer (byte index).
    cursor: usize,
}

impl InputState {
    /// Create a new empty input state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current text in the input buffer.
    pub fn buffer(&self) -> &str {
        &self.buffer
    }

    /// Current cursor position.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Handle a key input event.
    pub fn handle_key(&mut self, key: KeyInput, app: &mut App) -> Vec<AppAction> {
        match key {
            KeyInput::Char(c) => {
                self.buffer.insert(self.cursor, c);
                self.cursor = self.cursor.saturating_add(c.len_utf8());
                vec![AppAction::Render]
            },
            KeyInput::Backspace => {
                if self.cursor > 0 {
                    let prev = previous_boundary(&self.buffer, self.cursor);
                    self.buffer.remove(prev);
                    self.cursor = prev;
                }
                vec![AppAction::Render]
            },
            KeyInput::Delete => {
                if self.cursor < self.buffer.len() {
                    self.buffer.remove(self.cursor);
                }
                vec![AppAction::Render]
            },
            KeyInput::Left => {
                if self.cursor > 0 {
                    self.cursor = previous_boundary(&self.buffer, self.cursor);
                }
                vec![AppAction::Render]
            },
            KeyInput::Right => {
                if self.cursor < self.buffer.len() {
                    self.cursor = next_boundary(&self.buffer, self.cursor);
                }
                vec![AppAction::Render]
            },
            KeyInput::Home => {
                self.cursor = 0;
                vec![AppAction::Render]
            },
            KeyInput::End => {
                self.cursor = self.buffer.len();
                vec![AppAction::Render]
            },
            KeyInput::Enter => self.handle_enter(app),
            KeyInput::Esc => app.quit(),
        }
    }

    /// Handle Enter: run a command or send the buffer as a message.
    ///
    /// Whitespace-only input is a strict no-op: nothing is sent and the
    /// buffer is left untouched. Otherwise the buffer is cleared before
    /// the network call starts (the optimistic clear).
    fn handle_enter(&mut self, app: &mut App) -> Vec<AppAction> {
        if self.buffer.trim().is_empty() {
            return vec![];
        }

        let text = std::mem::take(&mut self.buffer);
        self.cursor = 0;

        if !text.starts_with('/') {
            return app.send_text(text);
        }

        match commands::parse(&text) {
            Command::Upload { paths } => app.upload_files(paths),
            Command::Copy { back } => app.copy_message(back),
            Command::Save { back } => app.save_file(back),
            Command::Quit => app.quit(),
            Command::Unknown { input } => {
                app.set_status(format!("Unknown command: {input}"));
                vec![AppAction::Render]
            },
            Command::InvalidArgs { command, error } => {
                app.set_status(format!("/{command}: {error}"));
                vec![AppAction::Render]
            },
        }
    }
}

fn previous_boundary(text: &str, from: usize) -> usize {
    let mut idx = from.saturating_sub(1);
    while idx > 0 && !text.is_char_boundary(idx) {
        idx -= 1;
    }
    idx
}

fn next_boundary(text: &str, from: usize) -> usize {
    let mut idx = from.saturating_add(1);
    while idx < text.len() && !text.is_char_boundary(idx) {
        idx += 1;
    }
    idx.min(text.len())
}
