use crate::constants::APP_TITLE;
use serde::Deserialize;
use std::ops::{Deref, DerefMut};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

/// Top-level shell configuration.
#[derive(Default, Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ShellConfigInner {
    pub shell: ShellSection,
    pub loader: LoaderConfig,
    pub session: SessionConfig,
    pub logging: LoggingConfig,
}

/// Thin Arc-wrapped config for inexpensive cloning into subsystems.
#[derive(Default, Debug, Clone, Deserialize)]
pub struct ShellConfig {
    #[serde(flatten, default)]
    inner: Arc<ShellConfigInner>,
}

impl Deref for ShellConfig {
    type Target = ShellConfigInner;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

impl DerefMut for ShellConfig {
    fn deref_mut(&mut self) -> &mut ShellConfigInner {
        Arc::make_mut(&mut self.inner)
    }
}

/// Presentation knobs. None of them change module-access semantics.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ShellSection {
    pub title: String,
    pub collapsed: bool,
    /// Prefix navigation entries with their icon glyph.
    pub icons: bool,
}

#[derive(Default, Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoaderConfig {
    /// Upper bound for a single factory invocation. Unbounded when absent.
    pub timeout_ms: Option<u64>,
}

impl LoaderConfig {
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_ms.filter(|ms| *ms > 0).map(Duration::from_millis)
    }
}

/// Where the session reads its identity and entitlements from.
#[derive(Default, Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    pub entitlements: Option<PathBuf>,
    pub user: Option<PathBuf>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub console: bool,
    pub level: String,
    /// Extra `EnvFilter` directives, e.g. `sailor_modules=debug`.
    pub directives: Option<String>,
    /// Directory for rolling log files. File logging is off when absent.
    pub path: Option<PathBuf>,
    pub json: bool,
    pub max_files: usize,
}

// --- Default ---

impl Default for ShellSection {
    fn default() -> Self {
        Self { title: APP_TITLE.to_owned(), collapsed: false, icons: true }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            console: true,
            level: "warn".to_owned(),
            directives: None,
            path: None,
            json: false,
            max_files: 7,
        }
    }
}
