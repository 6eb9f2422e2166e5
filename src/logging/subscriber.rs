//! Tracing subscriber for a run: coloured console lines plus a per-command
//! log file headed by what the run covers.
use std::fs;
use std::io::Write as _;
use std::sync::Mutex;

use tracing::Level;

use super::utils::{format_utc_datetime, format_utc_time, log_file_path, strip_ansi};
use crate::config::RunConfig;
use crate::report::{Style, colorize};

/// Event target used by [`Logger::stage`](super::Logger::stage).
pub(super) const STAGE_TARGET: &str = "devenv::stage";

/// How an event is presented on the console and in the log file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LineKind {
    /// A domain heading.
    Stage,
    Error,
    Warn,
    Info,
    Debug,
}

impl LineKind {
    fn of(level: Level, target: &str) -> Self {
        match level {
            Level::ERROR => Self::Error,
            Level::WARN => Self::Warn,
            Level::INFO if target == STAGE_TARGET => Self::Stage,
            Level::INFO => Self::Info,
            _ => Self::Debug,
        }
    }

    const fn file_tag(self) -> &'static str {
        match self {
            Self::Stage => "==> ",
            Self::Error => "    [error] ",
            Self::Warn => "    [warn] ",
            Self::Info => "    ",
            Self::Debug => "    [debug] ",
        }
    }

    fn console_line(self, msg: &str) -> String {
        match self {
            Self::Stage => {
                format!("{} {}", colorize("==>", Style::Strong), colorize(msg, Style::Strong))
            }
            Self::Error => format!("{} {msg}", colorize("ERROR", Style::Error)),
            Self::Warn => format!("{}  {msg}", colorize("WARN", Style::Warning)),
            Self::Info => format!("  {msg}"),
            Self::Debug => format!("  {}", colorize(msg, Style::Muted)),
        }
    }
}

/// Classify `event` and pull out its `message` field.
fn read_event(event: &tracing::Event<'_>) -> (LineKind, String) {
    #[derive(Default)]
    struct Message(String);

    impl tracing::field::Visit for Message {
        fn record_debug(&mut self, field: &tracing::field::Field, value: &dyn std::fmt::Debug) {
            if field.name() == "message" {
                self.0 = format!("{value:?}");
            }
        }

        fn record_str(&mut self, field: &tracing::field::Field, value: &str) {
            if field.name() == "message" {
                self.0 = value.to_string();
            }
        }
    }

    let metadata = event.metadata();
    let mut message = Message::default();
    event.record(&mut message);
    (LineKind::of(*metadata.level(), metadata.target()), message.0)
}

/// The log file header line describing what `config` covers.
pub(super) fn describe_run(config: &RunConfig) -> String {
    let domains: Vec<String> = config.domains.iter().map(ToString::to_string).collect();
    let mut line = format!(
        "mode={} home={} domains={}",
        config.mode,
        config.home.display(),
        domains.join(",")
    );
    if config.force {
        line.push_str(" force");
    }
    if config.keep_data {
        line.push_str(" keep-data");
    }
    line
}

/// A [`tracing_subscriber::Layer`] that appends every event to
/// `$XDG_CACHE_HOME/devenv/<command>.log`, timestamped and without colour.
#[derive(Debug)]
pub(super) struct FileLayer {
    file: Mutex<fs::File>,
}

impl FileLayer {
    /// Truncate the log file for `command` and write the run header.
    ///
    /// Returns `None` if the file cannot be written; the run continues
    /// without a log file.
    pub(super) fn open(command: &str, run: &str) -> Option<Self> {
        let path = log_file_path(command)?;
        let version =
            option_env!("DEVENV_VERSION").unwrap_or(concat!("dev-", env!("CARGO_PKG_VERSION")));
        let header = format!(
            "# devenv {version} {command} {}\n# {run}\n",
            format_utc_datetime()
        );
        fs::write(&path, header).ok()?;
        let file = fs::OpenOptions::new().append(true).open(&path).ok()?;
        Some(Self {
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
        let (kind, msg) = read_event(event);
        let line = format!("[{}] {}{}", format_utc_time(), kind.file_tag(), strip_ansi(&msg));
        if let Ok(mut f) = self.file.lock() {
            writeln!(f, "{line}").ok();
        }
    }
}

struct ConsoleFormat;

impl<S, N> tracing_subscriber::fmt::FormatEvent<S, N> for ConsoleFormat
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
        let (kind, msg) = read_event(event);
        writeln!(writer, "{}", kind.console_line(&msg))
    }
}

/// Install the global subscriber for a run of `command` under `config`.
///
/// Warnings and errors go to stderr, everything else to stdout; debug
/// lines reach the console only when `config.verbose` is set.  The log
/// file always receives debug lines.  Call once, before any logging.
pub fn init_subscriber(config: &RunConfig, command: &str) {
    use tracing_subscriber::fmt::writer::MakeWriterExt as _;
    use tracing_subscriber::{
        Layer as _, filter::LevelFilter, fmt, layer::SubscriberExt as _,
        util::SubscriberInitExt as _,
    };

    let console_level = if config.verbose {
        LevelFilter::DEBUG
    } else {
        LevelFilter::INFO
    };

    let make_writer = std::io::stderr
        .with_max_level(Level::WARN)
        .and(std::io::stdout.with_min_level(Level::INFO));

    let console_layer = fmt::layer()
        .event_format(ConsoleFormat)
        .with_writer(make_writer)
        .with_filter(console_level);

    let file_layer =
        FileLayer::open(command, &describe_run(config)).map(|l| l.with_filter(LevelFilter::DEBUG));

    tracing_subscriber::registry()
        .with(console_layer)
        .with(file_layer)
        .init();
}
