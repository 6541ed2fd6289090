use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Mutex;

use tracing_subscriber::{
    fmt::writer::BoxMakeWriter, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter,
};

/// Install the global subscriber.
///
/// The terminal UI owns stderr, so logs are appended to `log_path`. When
/// the file can't be opened they are dropped. Returns false if a global
/// subscriber was already installed.
pub fn init(default_filter: &str, log_path: Option<&Path>) -> bool {
    let writer = log_path
        .and_then(|path| {
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent).ok()?;
            }
            OpenOptions::new().create(true).append(true).open(path).ok()
        })
        .map(|file| BoxMakeWriter::new(Mutex::new(file)))
        .unwrap_or_else(|| BoxMakeWriter::new(std::io::sink));

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_filter))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let result = tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_writer(writer),
        )
        .try_init();

    match result {
        Ok(()) => true,
        Err(e) => {
            // Goes to whichever subscriber is already installed
            tracing::warn!(error = %e, "tracing subscriber not installed");
            false
        }
    }
}
