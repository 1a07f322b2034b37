//! Logging events and the optional-slot callback set that receives them.

use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;

/// Emitted before the original method runs.
#[derive(Debug, Serialize)]
pub struct LoggableCall<'a, A> {
    /// Correlation token shared by all events of one invocation.
    pub token: &'a str,
    /// Name of the type declaring the method.
    pub class_name: &'a str,
    /// Name of the method.
    pub method_name: &'a str,
    /// When the event was created.
    pub timestamp: DateTime<Utc>,
    /// The arguments passed to the method.
    pub args: &'a A,
}

/// Emitted after the original method returned `Ok`.
#[derive(Debug, Serialize)]
pub struct LoggableResult<'a, T> {
    /// Correlation token shared by all events of one invocation.
    pub token: &'a str,
    /// Name of the type declaring the method.
    pub class_name: &'a str,
    /// Name of the method.
    pub method_name: &'a str,
    /// When the event was created.
    pub timestamp: DateTime<Utc>,
    /// The value the method returned (or its future resolved to).
    pub returned_value: &'a T,
}

/// Emitted after the original method returned `Err`.
#[derive(Debug, Serialize)]
pub struct LoggableError<'a, E> {
    /// Correlation token shared by all events of one invocation.
    pub token: &'a str,
    /// Name of the type declaring the method.
    pub class_name: &'a str,
    /// Name of the method.
    pub method_name: &'a str,
    /// When the event was created.
    pub timestamp: DateTime<Utc>,
    /// The error the method returned (or its future resolved to).
    pub error: &'a E,
}

/// Receives [`LoggableCall`] events.
pub type CallLogger<A> = Arc<dyn Fn(&LoggableCall<'_, A>) + Send + Sync>;

/// Receives [`LoggableResult`] events.
pub type ResultLogger<T> = Arc<dyn Fn(&LoggableResult<'_, T>) + Send + Sync>;

/// Receives [`LoggableError`] events.
pub type ErrorLogger<E> = Arc<dyn Fn(&LoggableError<'_, E>) + Send + Sync>;

/// Callback set for [`Loggable`](super::Loggable).
///
/// Every slot is optional. An empty slot suppresses that event; it never
/// falls back to the default logger.
pub struct Logger<A, T, E> {
    /// Receives call events.
    pub call_logger: Option<CallLogger<A>>,
    /// Receives result events.
    pub result_logger: Option<ResultLogger<T>>,
    /// Receives error events.
    pub error_logger: Option<ErrorLogger<E>>,
}

impl<A, T, E> Logger<A, T, E> {
    /// A callback set with every slot empty.
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            call_logger: None,
            result_logger: None,
            error_logger: None,
        }
    }

    /// Sets the call slot.
    #[must_use]
    pub fn on_call<F>(mut self, f: F) -> Self
    where
        F: Fn(&LoggableCall<'_, A>) + Send + Sync + 'static,
    {
        self.call_logger = Some(Arc::new(f));
        self
    }

    /// Sets the result slot.
    #[must_use]
    pub fn on_result<F>(mut self, f: F) -> Self
    where
        F: Fn(&LoggableResult<'_, T>) + Send + Sync + 'static,
    {
        self.result_logger = Some(Arc::new(f));
        self
    }

    /// Sets the error slot.
    #[must_use]
    pub fn on_error<F>(mut self, f: F) -> Self
    where
        F: Fn(&LoggableError<'_, E>) + Send + Sync + 'static,
    {
        self.error_logger = Some(Arc::new(f));
        self
    }
}

impl<A, T, E> Clone for Logger<A, T, E> {
    fn clone(&self) -> Self {
        Self {
            call_logger: self.call_logger.clone(),
            result_logger: self.result_logger.clone(),
            error_logger: self.error_logger.clone(),
        }
    }
}

// Closures are not Debug; report which slots are filled.
impl<A, T, E> fmt::Debug for Logger<A, T, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Logger")
            .field("call_logger", &self.call_logger.is_some())
            .field("result_logger", &self.result_logger.is_some())
            .field("error_logger", &self.error_logger.is_some())
            .finish()
    }
}
