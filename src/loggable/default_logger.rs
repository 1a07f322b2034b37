//! Built-in callback set used when no custom [`Logger`] is supplied.
//!
//! Each event becomes one line:
//!
//! ```text
//! 2001-01-19T11:09:48.830Z [aB3dE9xQ::call] Calculator::add with args [1,2]
//! 2001-01-19T11:09:48.831Z [aB3dE9xQ::success] Calculator::add returned 3
//! 2001-01-19T11:09:48.831Z [Zk29LmPq::error] Calculator::divide thrown {"name":"DivideByZero","message":"division by zero"}
//! ```
//!
//! Call and result lines go to the informational stream, error lines to the
//! error stream of a [`LineSink`].

use std::fmt::{self, Debug, Display};
use std::io::Write;
use std::sync::{Arc, Mutex, PoisonError};

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use super::events::{Logger, LoggableCall, LoggableError, LoggableResult};
use crate::utils::{stringify, stringify_error};

/// Destination for default log lines.
pub enum LineSink {
    /// Informational lines to stdout, error lines to stderr.
    Console,
    /// `tracing` events at `INFO` / `ERROR` under the `decorable::loggable` target.
    Tracing,
    /// Two injected writers.
    Writers {
        /// Receives call and result lines.
        info: Mutex<Box<dyn Write + Send>>,
        /// Receives error lines.
        error: Mutex<Box<dyn Write + Send>>,
    },
}

/// Configuration name of a [`LineSink`] variant.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum SinkKind {
    /// [`LineSink::Console`]
    #[default]
    Console,
    /// [`LineSink::Tracing`]
    Tracing,
}

impl From<SinkKind> for LineSink {
    fn from(kind: SinkKind) -> Self {
        match kind {
            SinkKind::Console => Self::Console,
            SinkKind::Tracing => Self::Tracing,
        }
    }
}

impl LineSink {
    /// A sink writing to the given informational and error writers.
    #[must_use]
    pub fn writers(info: Box<dyn Write + Send>, error: Box<dyn Write + Send>) -> Self {
        Self::Writers {
            info: Mutex::new(info),
            error: Mutex::new(error),
        }
    }

    /// Writes an informational line.
    ///
    /// Write failures are dropped; logging must not break the wrapped call.
    pub fn info(&self, line: &str) {
        match self {
            Self::Console => write_line(std::io::stdout().lock(), line),
            Self::Tracing => tracing::info!(target: "decorable::loggable", "{line}"),
            Self::Writers { info, .. } => write_locked(info, line),
        }
    }

    /// Writes an error line.
    pub fn error(&self, line: &str) {
        match self {
            Self::Console => write_line(std::io::stderr().lock(), line),
            Self::Tracing => tracing::error!(target: "decorable::loggable", "{line}"),
            Self::Writers { error, .. } => write_locked(error, line),
        }
    }
}

fn write_locked(writer: &Mutex<Box<dyn Write + Send>>, line: &str) {
    let mut w = writer.lock().unwrap_or_else(PoisonError::into_inner);
    write_line(&mut *w, line);
}

fn write_line<W: Write>(mut writer: W, line: &str) {
    if let Err(e) = writeln!(writer, "{line}").and_then(|()| writer.flush()) {
        tracing::debug!(error = %e, "dropping log line");
    }
}

// Box<dyn Write> is not Debug.
impl fmt::Debug for LineSink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Console => f.write_str("Console"),
            Self::Tracing => f.write_str("Tracing"),
            Self::Writers { .. } => f.debug_struct("Writers").finish_non_exhaustive(),
        }
    }
}

/// Formats a timestamp as ISO-8601 UTC with millisecond precision.
#[must_use]
pub fn format_timestamp(timestamp: &DateTime<Utc>) -> String {
    timestamp.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Renders a call event as a default log line.
#[must_use]
pub fn default_call_line<A>(call: &LoggableCall<'_, A>) -> String
where
    A: Serialize + Debug,
{
    format!(
        "{} [{}::call] {}::{} with args {}",
        format_timestamp(&call.timestamp),
        call.token,
        call.class_name,
        call.method_name,
        stringify(call.args),
    )
}

/// Renders a result event as a default log line.
#[must_use]
pub fn default_result_line<T>(result: &LoggableResult<'_, T>) -> String
where
    T: Serialize + Debug,
{
    format!(
        "{} [{}::success] {}::{} returned {}",
        format_timestamp(&result.timestamp),
        result.token,
        result.class_name,
        result.method_name,
        stringify(result.returned_value),
    )
}

/// Renders an error event as a default log line.
#[must_use]
pub fn default_error_line<E>(error: &LoggableError<'_, E>) -> String
where
    E: Display,
{
    format!(
        "{} [{}::error] {}::{} thrown {}",
        format_timestamp(&error.timestamp),
        error.token,
        error.class_name,
        error.method_name,
        stringify_error(error.error),
    )
}

/// Builds the default callback set writing to `sink`.
#[must_use]
pub fn default_logger<A, T, E>(sink: LineSink) -> Logger<A, T, E>
where
    A: Serialize + Debug + 'static,
    T: Serialize + Debug + 'static,
    E: Display + 'static,
{
    let sink = Arc::new(sink);
    let call_sink = Arc::clone(&sink);
    let result_sink = Arc::clone(&sink);
    let error_sink = sink;

    Logger::empty()
        .on_call(move |call: &LoggableCall<'_, A>| call_sink.info(&default_call_line(call)))
        .on_result(move |result: &LoggableResult<'_, T>| {
            result_sink.info(&default_result_line(result));
        })
        .on_error(move |error: &LoggableError<'_, E>| {
            error_sink.error(&default_error_line(error));
        })
}
