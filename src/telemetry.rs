//! Tracing setup
//!
//! The terminal belongs to the UI, so log lines go to a file or nowhere.

use std::fs::OpenOptions;
use std::io;
use std::path::Path;
use std::sync::Mutex;

use tracing_subscriber::EnvFilter;

const DEFAULT_FILTER: &str = "skywatch=info";

/// Install a global subscriber appending to `path`. `RUST_LOG` overrides the filter.
pub fn init(path: Option<&Path>) -> io::Result<()> {
    let Some(path) = path else {
        return Ok(());
    };

    let file = OpenOptions::new().create(true).append(true).open(path)?;
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_target(false)
        .try_init()
        .map_err(|e| io::Error::other(format!("tracing init failed: {e}")))?;

    tracing::info!(path = %path.display(), "logging initialised");
    Ok(())
}
