//! Slash-command parsing.
//!
//! Anything typed with a leading `/` is a command; everything else is
//! message text. Parsing is pure so the dispatch in the input layer
//! stays trivially testable.

use std::path::PathBuf;

/// A parsed slash command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// `/upload <path>...`: upload local files.
    Upload {
        /// Files to upload, in argument order.
        paths: Vec<PathBuf>,
    },

    /// `/copy [n]`: copy the n-th most recent text message (0 =
    /// newest, the default).
    Copy {
        /// Offset back from the newest text message.
        back: usize,
    },

    /// `/save [n]`: download the n-th most recent file message.
    Save {
        /// Offset back from the newest file message.
        back: usize,
    },

    /// `/quit` or `/q`: exit.
    Quit,

    /// Unrecognized command name.
    Unknown {
        /// The raw input for the status line.
        input: String,
    },

    /// Recognized command with unusable arguments.
    InvalidArgs {
        /// The command name.
        command: &'static str,
        /// What was wrong.
        error: String,
    },
}

/// Parse a command line (with or without the leading `/`).
pub fn parse(input: &str) -> Command {
    let stripped = input.strip_prefix('/').unwrap_or(input);
    let mut parts = stripped.split_whitespace();
    let name = parts.next().unwrap_or_default();

    match name {
        "upload" | "up" => {
            Command::Upload { paths: parts.map(PathBuf::from).collect() }
        },
        "copy" | "cp" => parse_back("copy", parts.next()),
        "save" | "dl" => parse_back("save", parts.next()),
        "quit" | "q" => Command::Quit,
        _ => Command::Unknown { input: input.to_owned() },
    }
}

fn parse_back(command: &'static str, arg: Option<&str>) -> Command {
    let back = match arg {
        None => 0,
        Some(raw) => match raw.parse::<usize>() {
            Ok(n) => n,
            Err(_) => {
                return Command::InvalidArgs {
                    command,
                    error: format!("expected a number, got '{raw}'"),
                };
            },
        },
    };
    match command {
        "copy" => Command::Copy { back },
        _ => Command::Save { back },
    }
}
