//! Configuration loading.
//!
//! Reads YAML from a file or string, deserializes it into an
//! [`InstrumentConfig`], then applies environment overrides.

use std::path::Path;
use std::time::Duration;

use crate::config::schema::InstrumentConfig;
use crate::error::ConfigError;

/// Environment variable overriding `default_timeout`.
pub const TIMEOUT_ENV: &str = "DECORABLE_TIMEOUT";

/// Origin reported for configuration parsed from a string.
const INLINE_ORIGIN: &str = "<inline>";

/// Loads configuration from a YAML file.
///
/// # Errors
///
/// Returns [`ConfigError::Read`] if the file cannot be read,
/// [`ConfigError::Parse`] if it is not a valid document, and
/// [`ConfigError::InvalidDuration`] if `DECORABLE_TIMEOUT` is malformed.
pub fn load_config(path: impl AsRef<Path>) -> Result<InstrumentConfig, ConfigError> {
    let path = path.as_ref();
    let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    let mut config = parse(&raw, &path.display().to_string())?;
    apply_env_overrides(&mut config, std::env::var(TIMEOUT_ENV).ok().as_deref())?;

    tracing::debug!(
        path = %path.display(),
        monitors = config.monitors.len(),
        "configuration loaded"
    );
    Ok(config)
}

impl InstrumentConfig {
    /// Parses configuration from a YAML string.
    ///
    /// Environment overrides are not applied.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] if `yaml` is not a valid document.
    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigError> {
        parse(yaml, INLINE_ORIGIN)
    }
}

fn parse(yaml: &str, origin: &str) -> Result<InstrumentConfig, ConfigError> {
    // An empty document means all defaults.
    if yaml.trim().is_empty() {
        return Ok(InstrumentConfig::default());
    }
    serde_yaml::from_str(yaml).map_err(|e| ConfigError::Parse {
        origin: origin.to_string(),
        message: e.to_string(),
    })
}

/// Applies a `DECORABLE_TIMEOUT` value, when present, as the default timeout.
///
/// # Errors
///
/// Returns [`ConfigError::InvalidDuration`] if `timeout` is not a
/// human-readable duration.
pub fn apply_env_overrides(
    config: &mut InstrumentConfig,
    timeout: Option<&str>,
) -> Result<(), ConfigError> {
    if let Some(raw) = timeout.map(str::trim).filter(|raw| !raw.is_empty()) {
        config.default_timeout = Some(parse_duration(TIMEOUT_ENV, raw)?);
    }
    Ok(())
}

/// Parses a human-readable duration such as `"250ms"` or `"2s"`.
///
/// # Errors
///
/// Returns [`ConfigError::InvalidDuration`] naming `field` on failure.
pub fn parse_duration(field: &str, raw: &str) -> Result<Duration, ConfigError> {
    humantime::parse_duration(raw).map_err(|e| ConfigError::InvalidDuration {
        field: field.to_string(),
        value: raw.to_string(),
        message: e.to_string(),
    })
}
