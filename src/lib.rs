//! `decorable` - call logging and execution monitoring wrappers for methods
//!
//! Two wrappers are provided, both applied once per method and driven on
//! every call:
//!
//! - [`Loggable`] emits a call event before the method runs and a result or
//!   error event once it settles, correlated by a random token.
//! - [`Monitorable`] measures each invocation and reports exactly one
//!   outcome (`FINISHED`, `FAILED` or `TIMEOUT`) to a consumer.
//!
//! Synchronous methods go through `invoke`, methods returning a future
//! through `invoke_async`. The wrapped method's return value and error are
//! passed through unchanged.

pub mod cli;
pub mod config;
pub mod error;
pub mod loggable;
pub mod monitorable;
pub mod observability;
pub mod utils;
pub mod wrap;

pub use config::{InstrumentConfig, load_config};
pub use error::{DecorableError, DecorateError};
pub use loggable::{
    LineSink, Loggable, LoggableCall, LoggableError, LoggableResult, Logger, default_logger,
};
pub use monitorable::{
    Monitorable, MonitorableConsumer, MonitorableData, MonitorableOptions, MonitorableResult,
    MonitorableStatus,
};
pub use utils::{generate_random_token, stringify, stringify_error};
pub use wrap::{Lifecycle, MethodTarget, Target};
