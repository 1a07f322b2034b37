//! Monitoring data, outcomes, consumer callbacks and options.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize, Serializer};

/// How a monitored invocation concluded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MonitorableStatus {
    /// The method returned `Err`.
    Failed,
    /// The method returned `Ok`.
    Finished,
    /// The timeout alarm fired before the method settled.
    Timeout,
}

impl fmt::Display for MonitorableStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Failed => "FAILED",
            Self::Finished => "FINISHED",
            Self::Timeout => "TIMEOUT",
        })
    }
}

/// Identity of one monitored invocation, known when it starts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MonitorableData {
    /// Name of the type declaring the method.
    pub class_name: String,
    /// Name of the method.
    pub method_name: String,
    /// Configured monitor name, `<class>::<method>` by default.
    pub monitor_name: String,
    /// When the invocation started.
    pub started_at: DateTime<Utc>,
}

/// Terminal outcome of one monitored invocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MonitorableResult {
    /// Name of the type declaring the method.
    pub class_name: String,
    /// Name of the method.
    pub method_name: String,
    /// Configured monitor name.
    pub monitor_name: String,
    /// When the invocation started.
    pub started_at: DateTime<Utc>,
    /// When the invocation settled or the alarm fired.
    pub finished_at: DateTime<Utc>,
    /// Monotonic time between start and `finished_at`.
    #[serde(rename = "duration_ms", serialize_with = "serialize_millis")]
    pub elapsed: Duration,
    /// How the invocation concluded.
    pub state: MonitorableStatus,
}

impl MonitorableResult {
    pub(crate) fn from_data(
        data: MonitorableData,
        finished_at: DateTime<Utc>,
        elapsed: Duration,
        state: MonitorableStatus,
    ) -> Self {
        Self {
            class_name: data.class_name,
            method_name: data.method_name,
            monitor_name: data.monitor_name,
            started_at: data.started_at,
            finished_at,
            elapsed,
            state,
        }
    }
}

fn serialize_millis<S: Serializer>(elapsed: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_u64(u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX))
}

/// Receives the terminal outcome.
pub type ConsumeFn = Arc<dyn Fn(MonitorableResult) + Send + Sync>;

/// Receives the start notification.
pub type ConsumeBeforeFn = Arc<dyn Fn(MonitorableData) + Send + Sync>;

/// Callbacks for [`Monitorable`](super::Monitorable).
///
/// `consume` is mandatory; `consume_before` is optional.
#[derive(Clone)]
pub struct MonitorableConsumer {
    consume: ConsumeFn,
    consume_before: Option<ConsumeBeforeFn>,
}

impl MonitorableConsumer {
    /// A consumer receiving only terminal outcomes.
    pub fn new<F>(consume: F) -> Self
    where
        F: Fn(MonitorableResult) + Send + Sync + 'static,
    {
        Self {
            consume: Arc::new(consume),
            consume_before: None,
        }
    }

    /// Adds a start notification callback.
    #[must_use]
    pub fn with_before<F>(mut self, consume_before: F) -> Self
    where
        F: Fn(MonitorableData) + Send + Sync + 'static,
    {
        self.consume_before = Some(Arc::new(consume_before));
        self
    }

    /// Returns `true` if a start notification callback is set.
    #[must_use]
    pub const fn has_before(&self) -> bool {
        self.consume_before.is_some()
    }

    pub(crate) fn consume(&self, result: MonitorableResult) {
        (self.consume)(result);
    }

    pub(crate) fn consume_before(&self, data: MonitorableData) {
        if let Some(before) = &self.consume_before {
            before(data);
        }
    }
}

impl fmt::Debug for MonitorableConsumer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MonitorableConsumer")
            .field("consume_before", &self.consume_before.is_some())
            .finish_non_exhaustive()
    }
}

/// Options for [`Monitorable`](super::Monitorable).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MonitorableOptions {
    /// Overrides the default `<class>::<method>` monitor name.
    pub monitor_name: Option<String>,
    /// Arms a timeout alarm per invocation. Zero disables it.
    pub timeout: Option<Duration>,
}

impl MonitorableOptions {
    /// Sets the monitor name.
    #[must_use]
    pub fn monitor_name(mut self, name: impl Into<String>) -> Self {
        self.monitor_name = Some(name.into());
        self
    }

    /// Sets the timeout.
    #[must_use]
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Sets the timeout in milliseconds.
    #[must_use]
    pub fn timeout_ms(self, millis: u64) -> Self {
        self.timeout(Duration::from_millis(millis))
    }

    /// The timeout to arm, if any. A zero duration means none.
    #[must_use]
    pub fn effective_timeout(&self) -> Option<Duration> {
        self.timeout.filter(|t| !t.is_zero())
    }
}
