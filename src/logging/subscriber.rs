//! Tracing subscriber setup: log file layer, `ERROR:` console formatter.
use std::fs;
use std::io::Write as _;
use std::path::Path;
use std::sync::Mutex;

use anyhow::{Context as _, Result};
use tracing::Dispatch;
use tracing::dispatcher::DefaultGuard;

use super::utils::{format_utc_datetime, strip_ansi, version};

/// Environment variable overriding the log file verbosity (`EnvFilter`
/// syntax, default `debug`).
pub const LOG_ENV: &str = "INSTMON_LOG";

/// Extracts the `message` field from a [`tracing::Event`].
#[derive(Default)]
struct MessageExtractor {
    message: String,
}

impl tracing::field::Visit for MessageExtractor {
    fn record_debug(&mut self, field: &tracing::field::Field, value: &dyn std::fmt::Debug) {
        if field.name() == "message" {
            self.message = format!("{value:?}");
        }
    }

    fn record_str(&mut self, field: &tracing::field::Field, value: &str) {
        if field.name() == "message" {
            self.message = value.to_string();
        }
    }
}

/// A [`tracing_subscriber::Layer`] that appends events to the `-log` file.
///
/// Errors are written as `ERROR: <message>`, everything else as
/// `instmon: <message>`.  ANSI codes are stripped.
#[derive(Debug)]
pub(super) struct FileLayer {
    file: Mutex<fs::File>,
}

impl FileLayer {
    /// Open `path` for appending (creating it if needed) and write a run
    /// header.
    pub(super) fn open(path: &Path) -> std::io::Result<Self> {
        let mut file = fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)?;
        writeln!(
            file,
            "instmon: ==== instmon {} {} ====",
            version(),
            format_utc_datetime()
        )?;
        Ok(Self {
            file: Mutex::new(file),
        })
    }
}

impl<S: tracing::Subscriber> tracing_subscriber::Layer<S> for FileLayer {
    fn on_event(
        &self,
        event: &tracing::Event<'_>,
        _ctx: tracing_subscriber::layer::Context<'_, S>,
    ) {
        let mut extractor = MessageExtractor::default();
        event.record(&mut extractor);
        let msg = strip_ansi(&extractor.message);

        let line = if *event.metadata().level() == tracing::Level::ERROR {
            format!("ERROR: {msg}")
        } else {
            format!("instmon: {msg}")
        };

        if let Ok(mut f) = self.file.lock() {
            writeln!(f, "{line}").ok();
        }
    }
}

/// A [`tracing_subscriber::fmt::FormatEvent`] that prints `ERROR: <message>`.
struct ErrorFormatter;

impl<S, N> tracing_subscriber::fmt::FormatEvent<S, N> for ErrorFormatter
where
    S: tracing::Subscriber + for<'a> tracing_subscriber::registry::LookupSpan<'a>,
    N: for<'a> tracing_subscriber::fmt::FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        _ctx: &tracing_subscriber::fmt::FmtContext<'_, S, N>,
        mut writer: tracing_subscriber::fmt::format::Writer<'_>,
        event: &tracing::Event<'_>,
    ) -> std::fmt::Result {
        let mut extractor = MessageExtractor::default();
        event.record(&mut extractor);
        writeln!(writer, "ERROR: {}", extractor.message)
    }
}

/// Dispatcher that prints errors to standard error and drops everything
/// else.
fn console_dispatch() -> Dispatch {
    use tracing_subscriber::{Layer as _, filter::LevelFilter, fmt, layer::SubscriberExt as _};

    let console_layer = fmt::layer()
        .event_format(ErrorFormatter)
        .with_writer(std::io::stderr)
        .with_filter(LevelFilter::ERROR);
    Dispatch::new(tracing_subscriber::registry().with(console_layer))
}

/// Install the subscriber for the current thread.
///
/// With a log file, every event at the configured verbosity is appended to
/// it and nothing is printed.  Without one, only errors are printed to
/// standard error.  The subscriber stays active until the returned guard
/// is dropped.
///
/// # Errors
///
/// Returns an error if the log file cannot be opened for appending.
pub fn init_subscriber(log_file: Option<&Path>) -> Result<DefaultGuard> {
    use tracing_subscriber::{EnvFilter, Layer as _, layer::SubscriberExt as _};

    let dispatch = match log_file {
        Some(path) => {
            let file_layer = FileLayer::open(path)
                .with_context(|| format!("Failed to write log file: {}", path.display()))?;
            let filter =
                EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("debug"));
            Dispatch::new(tracing_subscriber::registry().with(file_layer.with_filter(filter)))
        }
        None => console_dispatch(),
    };
    Ok(tracing::dispatcher::set_default(&dispatch))
}

/// Log a fatal error through the active subscriber.
///
/// The outermost message becomes the `ERROR:` line; underlying causes
/// follow at `info` level and only reach the log file.
pub fn report(err: &anyhow::Error) {
    tracing::error!("{err}");
    for cause in err.chain().skip(1) {
        tracing::info!("caused by: {cause}");
    }
}

/// Report a fatal error raised before a subscriber was installed.
pub fn fatal(err: &anyhow::Error) {
    let _guard = tracing::dispatcher::set_default(&console_dispatch());
    report(err);
}
