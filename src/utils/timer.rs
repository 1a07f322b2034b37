//! One-shot delayed callbacks on a tokio runtime.
//!
//! [`schedule`] runs a callback once after a delay and returns a
//! [`TimerHandle`] that can cancel it. [`defer`] is the zero-delay form: the
//! callback runs on a later turn of the runtime, never inline.

use std::time::Duration;

use tokio::runtime::Handle;
use tokio::task::JoinHandle;

/// Cancellable handle to a scheduled callback.
///
/// Dropping the handle does not cancel the callback.
#[derive(Debug)]
pub struct TimerHandle {
    task: JoinHandle<()>,
}

impl TimerHandle {
    /// Cancels the callback if it has not started yet.
    ///
    /// Cancelling a handle whose callback already ran is a no-op.
    pub fn cancel(&self) {
        self.task.abort();
    }

    /// Returns `true` once the callback ran or was cancelled.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }
}

/// Runs `f` once after `delay` on the runtime behind `handle`.
pub fn schedule<F>(handle: &Handle, delay: Duration, f: F) -> TimerHandle
where
    F: FnOnce() + Send + 'static,
{
    let task = handle.spawn(async move {
        if delay.is_zero() {
            tokio::task::yield_now().await;
        } else {
            tokio::time::sleep(delay).await;
        }
        f();
    });
    TimerHandle { task }
}

/// Runs `f` on a later turn of the runtime behind `handle`.
pub fn defer<F>(handle: &Handle, f: F) -> TimerHandle
where
    F: FnOnce() + Send + 'static,
{
    schedule(handle, Duration::ZERO, f)
}
