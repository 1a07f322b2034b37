//! Configuration for instrumented methods.
//!
//! Token length and log sink for [`Loggable`](crate::Loggable), plus
//! per-method [`MonitorableOptions`](crate::MonitorableOptions), read from
//! YAML.

pub mod loader;
pub mod schema;

pub use loader::{TIMEOUT_ENV, apply_env_overrides, load_config, parse_duration};
pub use schema::{InstrumentConfig, LoggingConfig, MonitorConfig};
