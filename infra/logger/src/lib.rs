//! # Logger
//!
//! Installs the shell's global `tracing` subscriber from its `[logging]`
//! configuration section.
//!
//! * Console output goes to **stderr** so it never interleaves with the screen
//!   the shell renders on stdout.
//! * A rolling daily file sink is attached when `path` is set, optionally as
//!   JSON lines.
//! * `RUST_LOG` wins over the configured level; `directives` are parsed as an
//!   `EnvFilter` on top of it.
//!
//! ## Example
//!
//! ```rust
//! use sailor_logger::{Logger, LoggingConfig};
//!
//! let config = LoggingConfig { level: "debug".to_owned(), ..LoggingConfig::default() };
//! let _logger = Logger::from_config("sailor", &config).unwrap();
//! ```

mod error;

pub use crate::error::{LoggerError, LoggerErrorExt};
pub use sailor_domain::config::LoggingConfig;

use std::fs;
use std::path::PathBuf;
use tracing::level_filters::LevelFilter;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::fmt::layer;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

const LOG_FILE_SUFFIX: &str = "log";

/// Rolling file destination.
#[derive(Debug, Clone, PartialEq, Eq)]
struct FileSink {
    dir: PathBuf,
    max_files: usize,
    json: bool,
}

/// A [`LoggingConfig`] checked for everything that can be rejected before the
/// global subscriber is touched.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Plan {
    name: String,
    level: LevelFilter,
    directives: Option<String>,
    console: bool,
    file: Option<FileSink>,
}

impl Plan {
    fn new(name: &str, config: &LoggingConfig) -> Result<Self, LoggerError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(invalid("Logger name cannot be empty"));
        }

        let level = config.level.trim().parse::<LevelFilter>().map_err(|e| {
            invalid(format!("Invalid log level '{}': {e}", config.level))
        })?;

        let file = match &config.path {
            Some(_) if config.max_files == 0 => {
                return Err(invalid("max_files must be greater than zero"));
            },
            Some(dir) => {
                Some(FileSink { dir: dir.clone(), max_files: config.max_files, json: config.json })
            },
            None => None,
        };

        if !config.console && file.is_none() {
            return Err(invalid("No logging layers enabled. Enable console or set a log path."));
        }

        let directives = config
            .directives
            .as_deref()
            .map(str::trim)
            .filter(|d| !d.is_empty())
            .map(str::to_owned);

        let plan = Self { name: name.to_owned(), level, directives, console: config.console, file };
        plan.env_filter()?;
        Ok(plan)
    }

    fn env_filter(&self) -> Result<EnvFilter, LoggerError> {
        let builder = EnvFilter::builder().with_default_directive(self.level.into());
        self.directives.as_ref().map_or_else(
            || Ok(builder.from_env_lossy()),
            |directives| {
                builder.parse(directives).map_err(|e| {
                    invalid(format!("Invalid log directives '{directives}': {e}"))
                })
            },
        )
    }

    fn install(self) -> Result<Logger, LoggerError> {
        let env_filter = self.env_filter()?;
        let mut layers = Vec::new();

        if self.console {
            layers.push(layer().compact().with_writer(std::io::stderr).with_ansi(true).boxed());
        }

        let guard = match self.file {
            Some(sink) => {
                fs::create_dir_all(&sink.dir).map_err(|e| LoggerError::Internal {
                    message: e.to_string().into(),
                    context: Some(format!("Failed to create path: {}", sink.dir.display()).into()),
                })?;

                let appender = RollingFileAppender::builder()
                    .rotation(Rotation::DAILY)
                    .filename_prefix(&self.name)
                    .filename_suffix(LOG_FILE_SUFFIX)
                    .max_log_files(sink.max_files)
                    .build(&sink.dir)?;
                let (writer, guard) = tracing_appender::non_blocking(appender);

                let file_layer = layer().with_writer(writer).with_ansi(false);
                layers.push(if sink.json { file_layer.json().boxed() } else { file_layer.boxed() });
                Some(guard)
            },
            None => None,
        };

        tracing_subscriber::registry().with(env_filter).with(layers).try_init()?;
        Ok(Logger { guard })
    }
}

fn invalid(message: impl Into<std::borrow::Cow<'static, str>>) -> LoggerError {
    LoggerError::InvalidConfiguration { message: message.into(), context: None }
}

/// A handle to the installed subscriber.
///
/// Holds the file writer's worker guard; buffered lines are flushed when it
/// is dropped.
#[must_use = "Dropping this handle stops the background file writer."]
#[derive(Debug)]
pub struct Logger {
    guard: Option<WorkerGuard>,
}

impl Logger {
    /// Installs the global subscriber described by `config`.
    ///
    /// `name` prefixes rolling log files (e.g. `sailor.2026-10-18.log`).
    ///
    /// # Errors
    /// Returns [`LoggerError::InvalidConfiguration`] for an unknown level,
    /// malformed directives, a zero `max_files` or no enabled output, all
    /// before anything is installed. Returns [`LoggerError::Subscriber`] if a
    /// global subscriber is already set.
    pub fn from_config(name: &str, config: &LoggingConfig) -> Result<Self, LoggerError> {
        Plan::new(name, config)?.install()
    }

    /// Whether a rolling file sink is attached.
    #[must_use]
    pub const fn writes_files(&self) -> bool {
        self.guard.is_some()
    }
}

impl Drop for Logger {
    fn drop(&mut self) {
        if self.guard.is_some() {
            tracing::info!("Logging system shutting down, flushing buffers...");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> LoggingConfig {
        LoggingConfig::default()
    }

    #[test]
    fn test_default_config_is_console_at_warn() {
        let plan = Plan::new("sailor", &config()).unwrap();
        assert_eq!(plan.level, LevelFilter::WARN);
        assert!(plan.console);
        assert!(plan.file.is_none());
        assert!(plan.directives.is_none());
    }

    #[test]
    fn test_level_is_trimmed_and_case_insensitive() {
        let plan =
            Plan::new("sailor", &LoggingConfig { level: " DEBUG ".to_owned(), ..config() }).unwrap();
        assert_eq!(plan.level, LevelFilter::DEBUG);

        let err = Plan::new("sailor", &LoggingConfig { level: "chatty".to_owned(), ..config() })
            .unwrap_err();
        assert!(err.to_string().contains("chatty"), "{err}");
    }

    #[test]
    fn test_path_enables_file_sink() {
        let cfg = LoggingConfig {
            path: Some(PathBuf::from("logs")),
            json: true,
            max_files: 3,
            ..config()
        };
        let plan = Plan::new("sailor", &cfg).unwrap();
        assert_eq!(
            plan.file,
            Some(FileSink { dir: PathBuf::from("logs"), max_files: 3, json: true })
        );
    }

    #[test]
    fn test_json_without_path_stays_console_only() {
        let plan = Plan::new("sailor", &LoggingConfig { json: true, ..config() }).unwrap();
        assert!(plan.file.is_none());
    }

    #[test]
    fn test_rejections() {
        let zero = LoggingConfig { path: Some(PathBuf::from("logs")), max_files: 0, ..config() };
        let silent = LoggingConfig { console: false, ..config() };
        let directives =
            LoggingConfig { directives: Some("sailor_modules=loud".to_owned()), ..config() };

        let cases = [("sailor", zero), ("sailor", silent), ("sailor", directives), ("  ", config())];
        for (name, cfg) in cases {
            assert!(
                matches!(Plan::new(name, &cfg), Err(LoggerError::InvalidConfiguration { .. })),
                "{cfg:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_blank_directives_are_ignored() {
        let plan =
            Plan::new("sailor", &LoggingConfig { directives: Some("  ".to_owned()), ..config() })
                .unwrap();
        assert!(plan.directives.is_none());
    }
}
