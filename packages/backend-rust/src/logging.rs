//! Tracing setup for the demo binary
//!
//! Stdout always; a rolling file sink when `LogSettings::file` is present.

use std::path::PathBuf;
use std::str::FromStr;

use tracing_appender::non_blocking::{NonBlocking, WorkerGuard};
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

pub const DEFAULT_LOG_DIR: &str = "./logs";
pub const LOG_FILE_PREFIX: &str = "pathway.log";

#[derive(Debug, thiserror::Error)]
#[error("unknown log rotation `{0}` (expected hourly, daily or never)")]
pub struct UnknownRotation(String);

/// How often the file sink starts a new file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogRotation {
    Hourly,
    #[default]
    Daily,
    Never,
}

impl LogRotation {
    fn to_appender_rotation(self) -> Rotation {
        match self {
            LogRotation::Hourly => Rotation::HOURLY,
            LogRotation::Daily => Rotation::DAILY,
            LogRotation::Never => Rotation::NEVER,
        }
    }
}

impl FromStr for LogRotation {
    type Err = UnknownRotation;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "hourly" => Ok(LogRotation::Hourly),
            "daily" => Ok(LogRotation::Daily),
            "never" => Ok(LogRotation::Never),
            _ => Err(UnknownRotation(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileLogSettings {
    pub dir: PathBuf,
    pub prefix: String,
    pub rotation: LogRotation,
}

impl Default for FileLogSettings {
    fn default() -> Self {
        Self {
            dir: PathBuf::from(DEFAULT_LOG_DIR),
            prefix: LOG_FILE_PREFIX.to_string(),
            rotation: LogRotation::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogSettings {
    /// `EnvFilter` directives, e.g. `info` or `pathway_backend=debug`
    pub level: String,
    pub file: Option<FileLogSettings>,
}

impl Default for LogSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            file: None,
        }
    }
}

impl LogSettings {
    /// Directives that fail to parse fall back to `info`.
    pub fn env_filter(&self) -> EnvFilter {
        EnvFilter::try_new(&self.level).unwrap_or_else(|_| EnvFilter::new("info"))
    }
}

/// Keeps the non-blocking file writer alive; drop it last.
pub struct FileLogGuard {
    _guard: WorkerGuard,
}

fn open_file_writer(file: &FileLogSettings) -> std::io::Result<(NonBlocking, WorkerGuard)> {
    std::fs::create_dir_all(&file.dir)?;
    let appender =
        RollingFileAppender::new(file.rotation.to_appender_rotation(), &file.dir, &file.prefix);
    Ok(tracing_appender::non_blocking(appender))
}

/// Installs the global subscriber. A file sink that cannot be opened is
/// reported once and skipped; stdout logging still comes up.
pub fn init_tracing(settings: &LogSettings) -> Option<FileLogGuard> {
    let mut open_failure = None;
    let mut guard = None;
    let file_layer = settings.file.as_ref().and_then(|file| match open_file_writer(file) {
        Ok((writer, worker_guard)) => {
            guard = Some(FileLogGuard {
                _guard: worker_guard,
            });
            Some(
                fmt::layer()
                    .with_writer(writer)
                    .with_ansi(false)
                    .with_target(true),
            )
        }
        Err(err) => {
            open_failure = Some((file.dir.clone(), err));
            None
        }
    });

    tracing_subscriber::registry()
        .with(settings.env_filter())
        .with(fmt::layer().with_target(true))
        .with(file_layer)
        .init();

    if let Some((dir, err)) = open_failure {
        tracing::warn!(dir = %dir.display(), error = %err, "file logging disabled");
    }
    guard
}
