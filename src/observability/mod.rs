//! Observability for `decorable` itself.
//!
//! Wrapper diagnostics (armed and fired alarms, dropped late outcomes, sink
//! failures) are emitted as `tracing` events; this module installs the
//! subscriber that renders them.

pub mod logging;

pub use logging::{LOG_LEVEL_ENV, LogFormat, init_logging, verbosity_to_directive};
