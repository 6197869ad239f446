//! Core library for the colima vmnet daemon supervisor
//!
//! This crate provides session path resolution, configuration, process
//! probing/termination and the runner for the supervised `vde_vmnet` binary.

pub mod error;

pub mod config;
pub mod process;
pub mod session;
pub mod vmnet;

type StderrLayer = tracing_subscriber::fmt::Layer<
    tracing_subscriber::Registry,
    tracing_subscriber::fmt::format::DefaultFields,
    tracing_subscriber::fmt::format::Format,
    fn() -> std::io::Stderr,
>;

/// Handle on the installed stderr log layer
///
/// Colour is chosen while stderr still points at the invoking terminal. A
/// detached daemon calls [`LogHandle::plain_text`] once its stderr has been
/// redirected to the log file.
#[derive(Default)]
pub struct LogHandle {
    stderr: Option<tracing_subscriber::reload::Handle<StderrLayer, tracing_subscriber::Registry>>,
}

impl LogHandle {
    /// Stop emitting ANSI colour codes
    pub fn plain_text(&self) {
        if let Some(handle) = &self.stderr {
            if let Err(e) = handle.modify(|layer| layer.set_ansi(false)) {
                tracing::warn!("Failed to disable coloured logs: {}", e);
            }
        }
    }
}

/// Initialize logging infrastructure
///
/// Sets up tracing with systemd journal logging when running under systemd.
/// Otherwise logs to stderr; colours are only used when stderr is a terminal.
pub fn init_logging(verbose: bool) -> Result<LogHandle, Box<dyn std::error::Error>> {
    use std::io::IsTerminal;
    use tracing_subscriber::filter::LevelFilter;
    use tracing_subscriber::{layer::SubscriberExt, reload, util::SubscriberInitExt};

    let level = if verbose {
        LevelFilter::DEBUG
    } else {
        LevelFilter::INFO
    };

    #[cfg(target_os = "linux")]
    {
        if std::env::var("JOURNAL_STREAM").is_ok() {
            let journal_layer = tracing_journald::layer()?;
            tracing_subscriber::registry()
                .with(journal_layer)
                .with(level)
                .init();
            return Ok(LogHandle::default());
        }
    }

    let stderr_layer: StderrLayer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr as fn() -> std::io::Stderr)
        .with_ansi(std::io::stderr().is_terminal());
    let (stderr_layer, handle) = reload::Layer::new(stderr_layer);

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(level)
        .init();

    Ok(LogHandle {
        stderr: Some(handle),
    })
}
