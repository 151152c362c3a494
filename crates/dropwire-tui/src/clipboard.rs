//! Clipboard access with a two-tier fallback.
//!
//! The system clipboard (arboard) is tried first; when no clipboard
//! backend is reachable (headless session, SSH) the text is emitted as
//! an OSC 52 escape sequence so capable terminal emulators can pick it
//! up. Only when both tiers fail does the caller see an error.

use std::io::{self, Write};

use base64::Engine as _;
use thiserror::Error;

/// Both clipboard tiers failed.
#[derive(Debug, Error)]
pub enum ClipboardError {
    /// The terminal escape fallback could not be written.
    #[error("clipboard unavailable: {0}")]
    Io(#[from] io::Error),
}

/// Put `text` on the clipboard.
pub fn copy(text: &str) -> Result<(), ClipboardError> {
    match arboard::Clipboard::new().and_then(|mut clipboard| clipboard.set_text(text.to_owned())) {
        Ok(()) => Ok(()),
        Err(e) => {
            tracing::debug!(error = %e, "system clipboard failed, trying OSC 52");
            osc52_copy(text)
        },
    }
}

/// Emit an OSC 52 clipboard-set sequence on stdout.
fn osc52_copy(text: &str) -> Result<(), ClipboardError> {
    let encoded = base64::engine::general_purpose::STANDARD.encode(text.as_bytes());
    let mut out = io::stdout();
    write!(out, "\x1b]52;c;{encoded}\x07")?;
    out.flush()?;
    Ok(())
}
