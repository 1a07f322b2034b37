//! Call / result / error logging for methods.
//!
//! A [`Loggable`] is built once per method, at the point where the method is
//! defined, and every call of the method goes through it:
//!
//! ```
//! use decorable::{Loggable, Target};
//!
//! struct Calculator {
//!     add_log: Loggable<(i64, i64), i64, std::convert::Infallible>,
//! }
//!
//! impl Calculator {
//!     fn add(&self, a: i64, b: i64) -> i64 {
//!         let Ok(sum) = self.add_log.invoke((a, b), |(a, b)| Ok(a + b));
//!         sum
//!     }
//! }
//!
//! let calc = Calculator {
//!     add_log: Loggable::new(Target::method("Calculator", "add")).unwrap(),
//! };
//! assert_eq!(calc.add(2, 3), 5);
//! ```
//!
//! Each invocation gets a fresh correlation token. A call event is emitted
//! before the method runs, then exactly one result or error event once it
//! settles.

pub mod default_logger;
pub mod events;

use std::fmt::{Debug, Display};
use std::future::Future;

use chrono::Utc;
use serde::Serialize;

pub use default_logger::{LineSink, SinkKind, default_logger};
pub use events::{Logger, LoggableCall, LoggableError, LoggableResult};

use crate::error::DecorateError;
use crate::utils::{DEFAULT_TOKEN_LENGTH, generate_random_token};
use crate::wrap::{self, Lifecycle, MethodTarget, Target};

const DECORATOR: &str = "Loggable";

/// Logging wrapper for one method.
#[derive(Debug, Clone)]
pub struct Loggable<A, T, E> {
    target: MethodTarget,
    logger: Logger<A, T, E>,
    token_length: usize,
}

impl<A, T, E> Loggable<A, T, E>
where
    A: Serialize + Debug + 'static,
    T: Serialize + Debug + 'static,
    E: Display + 'static,
{
    /// Wraps `target` with the default logger writing to the console.
    ///
    /// # Errors
    ///
    /// Returns [`DecorateError::UnsupportedTarget`] if `target` is not a
    /// method of a named type.
    pub fn new(target: Target) -> Result<Self, DecorateError> {
        Self::with_sink(target, LineSink::Console)
    }

    /// Wraps `target` with the default logger writing to `sink`.
    ///
    /// # Errors
    ///
    /// Returns [`DecorateError::UnsupportedTarget`] if `target` is not a
    /// method of a named type.
    pub fn with_sink(target: Target, sink: LineSink) -> Result<Self, DecorateError> {
        Self::with_logger(target, default_logger(sink))
    }
}

impl<A, T, E> Loggable<A, T, E> {
    /// Wraps `target` with a custom callback set.
    ///
    /// # Errors
    ///
    /// Returns [`DecorateError::UnsupportedTarget`] if `target` is not a
    /// method of a named type.
    pub fn with_logger(target: Target, logger: Logger<A, T, E>) -> Result<Self, DecorateError> {
        Ok(Self {
            target: target.validate(DECORATOR)?,
            logger,
            token_length: DEFAULT_TOKEN_LENGTH,
        })
    }

    /// Overrides the correlation token length.
    #[must_use]
    pub fn with_token_length(mut self, token_length: usize) -> Self {
        self.token_length = token_length;
        self
    }

    /// The wrapped method.
    #[must_use]
    pub const fn target(&self) -> &MethodTarget {
        &self.target
    }

    /// Calls a synchronous method body, logging around it.
    ///
    /// # Errors
    ///
    /// Returns the error of `f` unchanged.
    pub fn invoke<F>(&self, args: A, f: F) -> Result<T, E>
    where
        F: FnOnce(A) -> Result<T, E>,
    {
        wrap::invoke(self, args, f)
    }

    /// Calls an asynchronous method body, logging around it.
    ///
    /// The call event is emitted immediately; the result or error event once
    /// the returned future completes.
    pub fn invoke_async<F, Fut>(&self, args: A, f: F) -> impl Future<Output = Result<T, E>>
    where
        F: FnOnce(A) -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        wrap::invoke_async(self, args, f)
    }

    /// Turns a method body taking its receiver into a logged callable with
    /// the same signature.
    pub fn wrap<R, F>(self, f: F) -> impl Fn(&R, A) -> Result<T, E>
    where
        R: ?Sized,
        F: Fn(&R, A) -> Result<T, E>,
    {
        move |receiver: &R, args: A| self.invoke(args, |args| f(receiver, args))
    }
}

impl<A, T, E> Lifecycle<A, T, E> for Loggable<A, T, E> {
    type Context = String;

    fn enter(&self, args: &A) -> String {
        let token = generate_random_token(self.token_length);
        if let Some(call_logger) = &self.logger.call_logger {
            call_logger(&LoggableCall {
                token: &token,
                class_name: &self.target.class_name,
                method_name: &self.target.method_name,
                timestamp: Utc::now(),
                args,
            });
        }
        token
    }

    fn succeeded(&self, token: String, value: &T) {
        if let Some(result_logger) = &self.logger.result_logger {
            result_logger(&LoggableResult {
                token: &token,
                class_name: &self.target.class_name,
                method_name: &self.target.method_name,
                timestamp: Utc::now(),
                returned_value: value,
            });
        }
    }

    fn failed(&self, token: String, error: &E) {
        if let Some(error_logger) = &self.logger.error_logger {
            error_logger(&LoggableError {
                token: &token,
                class_name: &self.target.class_name,
                method_name: &self.target.method_name,
                timestamp: Utc::now(),
                error,
            });
        }
    }
}
