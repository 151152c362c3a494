//! Dropwire TUI entry point.

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use dropwire_tui::runtime::Runtime;
use tracing_subscriber::EnvFilter;

/// Dropwire terminal client
#[derive(Parser, Debug)]
#[command(name = "dropwire")]
#[command(about = "Terminal client for dropwire group chat and file drop")]
#[command(version)]
struct Args {
    /// Server base URL.
    #[arg(short, long, default_value = "http://localhost:5001")]
    server: String,

    /// Device label to announce instead of the detected one.
    #[arg(short, long)]
    label: Option<String>,

    /// Write logs to this file (the terminal is owned by the UI, so
    /// logging is off unless a file is given).
    #[arg(long)]
    log_file: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    if let Some(path) = &args.log_file {
        let file = std::fs::OpenOptions::new().create(true).append(true).open(path)?;
        tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::from_default_env())
            .with_writer(Arc::new(file))
            .with_ansi(false)
            .init();
    }

    let runtime = Runtime::new(args.server, args.label).await?;
    Ok(runtime.run().await?)
}
