//! Instrumentation configuration schema.
//!
//! ```yaml
//! default_timeout: 2s
//! logging:
//!   token_length: 12
//!   sink: tracing
//! monitors:
//!   Calculator::divide:
//!     monitor_name: division
//!     timeout: 250ms
//! ```

use std::collections::BTreeMap;
use std::time::Duration;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::loggable::SinkKind;
use crate::monitorable::MonitorableOptions;
use crate::utils::DEFAULT_TOKEN_LENGTH;

/// Root configuration document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct InstrumentConfig {
    /// Settings for [`Loggable`](crate::Loggable) wrappers.
    pub logging: LoggingConfig,
    /// Timeout for monitors that do not set their own.
    #[serde(
        deserialize_with = "deserialize_duration",
        serialize_with = "serialize_duration"
    )]
    pub default_timeout: Option<Duration>,
    /// Per-method monitor settings keyed by `<Class>::<method>`.
    pub monitors: BTreeMap<String, MonitorConfig>,
}

/// Logging settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoggingConfig {
    /// Correlation token length.
    pub token_length: usize,
    /// Where default log lines go.
    pub sink: SinkKind,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            token_length: DEFAULT_TOKEN_LENGTH,
            sink: SinkKind::Console,
        }
    }
}

/// Settings for one monitored method.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MonitorConfig {
    /// Overrides the default monitor name.
    pub monitor_name: Option<String>,
    /// Timeout as a human-readable duration (`"250ms"`, `"2s"`).
    #[serde(
        deserialize_with = "deserialize_duration",
        serialize_with = "serialize_duration"
    )]
    pub timeout: Option<Duration>,
}

impl From<&MonitorConfig> for MonitorableOptions {
    fn from(config: &MonitorConfig) -> Self {
        Self {
            monitor_name: config.monitor_name.clone(),
            timeout: config.timeout,
        }
    }
}

impl InstrumentConfig {
    /// Resolves the monitor options for `class::method`.
    ///
    /// Methods without an entry, or whose entry has no timeout, fall back to
    /// `default_timeout`.
    #[must_use]
    pub fn monitor_options(&self, class_name: &str, method_name: &str) -> MonitorableOptions {
        let mut options = self
            .monitors
            .get(&format!("{class_name}::{method_name}"))
            .map(MonitorableOptions::from)
            .unwrap_or_default();
        if options.timeout.is_none() {
            options.timeout = self.default_timeout;
        }
        options
    }
}

fn deserialize_duration<'de, D>(deserializer: D) -> Result<Option<Duration>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer)?
        .map(|raw| humantime::parse_duration(raw.trim()).map_err(serde::de::Error::custom))
        .transpose()
}

fn serialize_duration<S>(timeout: &Option<Duration>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    match timeout {
        Some(d) => serializer.serialize_some(&humantime::format_duration(*d).to_string()),
        None => serializer.serialize_none(),
    }
}
