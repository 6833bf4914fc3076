use config::{Config, Environment, File};
use serde::de::DeserializeOwned;
use std::borrow::Cow;
use std::path::{Path, PathBuf};
use tracing::info;

/// Base name probed in the working directory when no path is given.
pub const DEFAULT_CONFIG_NAME: &str = "shell";
pub const ENV_PREFIX: &str = "SAILOR";

/// Custom error type for config loading.
#[sailor_derive::sailor_error]
pub enum ConfigError {
    #[error("Config error{}: {source}", format_context(.context))]
    Config { source: config::ConfigError, context: Option<Cow<'static, str>> },
}

/// A reusable configuration loader that combines file-based settings with environment overrides.
///
/// Layers, lowest precedence first:
/// 1. **Base File**: an explicit `path` must exist. Without one, a `shell.*`
///    file in the working directory is used if present (any format the
///    `config` crate recognizes), otherwise only defaults apply.
/// 2. **Environment Overrides**: variables prefixed with `SAILOR__`. Nested keys
///    use double underscores (`SAILOR__LOADER__TIMEOUT_MS` maps to `loader.timeout_ms`).
///
/// # Errors
/// Returns [`ConfigError::Config`] if an explicit file is missing, cannot be
/// parsed, or does not match the structure of `T`.
pub fn load_config<T>(path: Option<impl AsRef<Path>>) -> Result<T, ConfigError>
where
    T: DeserializeOwned,
{
    let (effective_path, required) = path.map_or_else(
        || (PathBuf::from(DEFAULT_CONFIG_NAME), false),
        |p| (p.as_ref().to_path_buf(), true),
    );

    let builder = Config::builder()
        .add_source(File::from(effective_path.as_path()).required(required))
        .add_source(
            Environment::with_prefix(ENV_PREFIX)
                .separator("__")
                .convert_case(config::Case::Snake),
        );

    info!(path = %effective_path.display(), required, "Loading config");

    let config = builder
        .build()
        .context("Failed to build config")?
        .try_deserialize::<T>()
        .context("Failed to deserialize config")?;

    Ok(config)
}
