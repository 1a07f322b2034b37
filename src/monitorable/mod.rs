//! Execution time and timeout monitoring for methods.
//!
//! Every invocation of a monitored method delivers exactly one
//! [`MonitorableResult`] to the consumer: `Finished`, `Failed`, or `Timeout`
//! when a configured timeout elapses first. The timeout alarm and the real
//! settlement race for a per-invocation latch; whichever loses is dropped,
//! and a settled invocation cancels its pending alarm.
//!
//! When the consumer has a `consume_before` callback, it is never called from
//! the call site and never runs alongside the method body. For methods
//! returning a future it is delivered on the first poll, before the method's
//! future is polled. Otherwise the outcome path (settlement or alarm)
//! delivers it just before the outcome. Either way it is delivered once and
//! always before the outcome.

pub mod types;

use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use chrono::Utc;
use tokio::runtime::Handle;
use tokio::time::Instant;

pub use types::{
    MonitorableConsumer, MonitorableData, MonitorableOptions, MonitorableResult,
    MonitorableStatus,
};

use crate::error::DecorateError;
use crate::utils::{TimerHandle, schedule};
use crate::wrap::{self, Lifecycle, MethodTarget, Target};

const DECORATOR: &str = "Monitorable";

/// Monitoring wrapper for one method.
#[derive(Debug, Clone)]
pub struct Monitorable {
    target: MethodTarget,
    consumer: MonitorableConsumer,
    monitor_name: String,
    timeout: Option<Duration>,
    runtime: Option<Handle>,
}

impl Monitorable {
    /// Wraps `target`, scheduling timers on the current tokio runtime.
    ///
    /// # Errors
    ///
    /// Returns [`DecorateError::UnsupportedTarget`] if `target` is not a
    /// method of a named type, and [`DecorateError::NoRuntime`] if a timeout
    /// is configured outside a tokio runtime.
    pub fn new(
        target: Target,
        consumer: MonitorableConsumer,
        options: MonitorableOptions,
    ) -> Result<Self, DecorateError> {
        let target = target.validate(DECORATOR)?;
        let needs_runtime = options.effective_timeout().is_some();
        let runtime = match Handle::try_current() {
            Ok(handle) => Some(handle),
            Err(_) if !needs_runtime => None,
            Err(_) => return Err(DecorateError::NoRuntime { decorator: DECORATOR }),
        };
        Ok(Self::build(target, consumer, &options, runtime))
    }

    /// Wraps `target`, scheduling timers on `runtime`.
    ///
    /// # Errors
    ///
    /// Returns [`DecorateError::UnsupportedTarget`] if `target` is not a
    /// method of a named type.
    pub fn with_handle(
        target: Target,
        consumer: MonitorableConsumer,
        options: MonitorableOptions,
        runtime: Handle,
    ) -> Result<Self, DecorateError> {
        let target = target.validate(DECORATOR)?;
        Ok(Self::build(target, consumer, &options, Some(runtime)))
    }

    fn build(
        target: MethodTarget,
        consumer: MonitorableConsumer,
        options: &MonitorableOptions,
        runtime: Option<Handle>,
    ) -> Self {
        let monitor_name = options
            .monitor_name
            .clone()
            .unwrap_or_else(|| target.to_string());
        Self {
            target,
            consumer,
            monitor_name,
            timeout: options.effective_timeout(),
            runtime,
        }
    }

    /// The wrapped method.
    #[must_use]
    pub const fn target(&self) -> &MethodTarget {
        &self.target
    }

    /// The resolved monitor name.
    #[must_use]
    pub fn monitor_name(&self) -> &str {
        &self.monitor_name
    }

    /// The armed timeout, if any.
    #[must_use]
    pub const fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    /// Calls a synchronous method body under monitoring.
    ///
    /// # Errors
    ///
    /// Returns the error of `f` unchanged.
    pub fn invoke<A, T, E, F>(&self, args: A, f: F) -> Result<T, E>
    where
        F: FnOnce(A) -> Result<T, E>,
    {
        wrap::invoke(self, args, f)
    }

    /// Calls an asynchronous method body under monitoring.
    ///
    /// The start time is taken and the alarm armed immediately. The start
    /// notification is delivered on the first poll; the outcome when the
    /// returned future completes, unless the alarm fired first.
    pub fn invoke_async<A, T, E, F, Fut>(
        &self,
        args: A,
        f: F,
    ) -> impl Future<Output = Result<T, E>>
    where
        F: FnOnce(A) -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        wrap::invoke_async(self, args, f)
    }

    /// Turns a method body taking its receiver into a monitored callable
    /// with the same signature.
    pub fn wrap<R, A, T, E, F>(self, f: F) -> impl Fn(&R, A) -> Result<T, E>
    where
        R: ?Sized,
        F: Fn(&R, A) -> Result<T, E>,
    {
        move |receiver: &R, args: A| self.invoke(args, |args| f(receiver, args))
    }
}

/// State shared by one invocation and its alarm.
struct Invocation {
    consumer: MonitorableConsumer,
    data: MonitorableData,
    started: Instant,
    before_pending: Mutex<bool>,
    settled: AtomicBool,
}

impl Invocation {
    /// Delivers the start notification if it is still owed.
    ///
    /// The lock is held across the callback so an outcome can never overtake
    /// a notification already in progress.
    fn notify_before(&self) {
        let mut pending = self
            .before_pending
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        if std::mem::take(&mut *pending) {
            self.consumer.consume_before(self.data.clone());
        }
    }

    /// Delivers the outcome unless another path already did.
    fn finish(&self, state: MonitorableStatus) -> bool {
        if self.settled.swap(true, Ordering::SeqCst) {
            tracing::debug!(
                monitor = %self.data.monitor_name,
                %state,
                "outcome dropped, invocation already settled"
            );
            return false;
        }
        self.notify_before();
        self.consumer.consume(MonitorableResult::from_data(
            self.data.clone(),
            Utc::now(),
            self.started.elapsed(),
            state,
        ));
        true
    }
}

/// Per-invocation context handed from `enter` to the settlement hooks.
pub struct MonitorContext {
    invocation: Arc<Invocation>,
    alarm: Option<TimerHandle>,
}

impl MonitorContext {
    fn settle(self, state: MonitorableStatus) {
        if let Some(alarm) = &self.alarm {
            alarm.cancel();
        }
        self.invocation.finish(state);
    }
}

impl<A, T, E> Lifecycle<A, T, E> for Monitorable {
    type Context = MonitorContext;

    fn enter(&self, _args: &A) -> MonitorContext {
        let data = MonitorableData {
            class_name: self.target.class_name.clone(),
            method_name: self.target.method_name.clone(),
            monitor_name: self.monitor_name.clone(),
            started_at: Utc::now(),
        };
        let has_before = self.consumer.has_before();
        let invocation = Arc::new(Invocation {
            consumer: self.consumer.clone(),
            data,
            started: Instant::now(),
            before_pending: Mutex::new(has_before),
            settled: AtomicBool::new(false),
        });

        let alarm = self.runtime.as_ref().zip(self.timeout).map(|(runtime, timeout)| {
            let pending = Arc::clone(&invocation);
            schedule(runtime, timeout, move || {
                if pending.finish(MonitorableStatus::Timeout) {
                    tracing::debug!(
                        monitor = %pending.data.monitor_name,
                        timeout_ms = u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX),
                        "monitored call timed out"
                    );
                }
            })
        });

        MonitorContext { invocation, alarm }
    }

    fn first_poll(&self, cx: &MonitorContext) {
        cx.invocation.notify_before();
    }

    fn succeeded(&self, cx: MonitorContext, _value: &T) {
        cx.settle(MonitorableStatus::Finished);
    }

    fn failed(&self, cx: MonitorContext, _error: &E) {
        cx.settle(MonitorableStatus::Failed);
    }
}
