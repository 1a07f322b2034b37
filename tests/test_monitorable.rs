//! Outcome delivery of `Monitorable`: one outcome per invocation, timeout
//! races, and start notifications.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use decorable::{
    DecorateError, Monitorable, MonitorableConsumer, MonitorableOptions, MonitorableResult,
    MonitorableStatus, Target,
};
use tokio_test::{assert_err, assert_ok};

#[derive(Debug, Clone, PartialEq, Eq)]
enum Seen {
    Before(String),
    Outcome(MonitorableStatus),
}

type Log = Arc<Mutex<Vec<Seen>>>;
type Results = Arc<Mutex<Vec<MonitorableResult>>>;

fn consumer_with_before() -> (Log, Results, MonitorableConsumer) {
    let log: Log = Arc::default();
    let results: Results = Arc::default();
    let (outcome_log, before_log, sink) = (Arc::clone(&log), Arc::clone(&log), Arc::clone(&results));
    let consumer = MonitorableConsumer::new(move |result: MonitorableResult| {
        outcome_log.lock().unwrap().push(Seen::Outcome(result.state));
        sink.lock().unwrap().push(result);
    })
    .with_before(move |data| {
        before_log.lock().unwrap().push(Seen::Before(data.monitor_name));
    });
    (log, results, consumer)
}

fn consumer() -> (Results, MonitorableConsumer) {
    let results: Results = Arc::default();
    let sink = Arc::clone(&results);
    let consumer = MonitorableConsumer::new(move |result| sink.lock().unwrap().push(result));
    (results, consumer)
}

// ============================================================================
// Timeout race
// ============================================================================

#[tokio::test(start_paused = true)]
async fn timeout_fires_once_and_late_settlement_is_dropped() {
    let (results, consumer) = consumer();
    let monitor = Monitorable::new(
        Target::method("Test", "test"),
        consumer,
        MonitorableOptions::default().timeout_ms(50),
    )
    .unwrap();

    let out = monitor
        .invoke_async((), |()| async {
            tokio::time::sleep(Duration::from_millis(200)).await;
            Ok::<_, String>("late")
        })
        .await;

    // The caller still gets the real value.
    assert_eq!(out, Ok("late"));

    tokio::time::sleep(Duration::from_secs(1)).await;

    let results = results.lock().unwrap();
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].state, MonitorableStatus::Timeout);
    assert_eq!(results[0].monitor_name, "Test::test");
    assert!(results[0].elapsed >= Duration::from_millis(50));
    assert!(results[0].elapsed < Duration::from_millis(200));
}

#[tokio::test(start_paused = true)]
async fn late_failure_is_dropped_after_timeout() {
    let (results, consumer) = consumer();
    let monitor = Monitorable::new(
        Target::method("Test", "flaky"),
        consumer,
        MonitorableOptions::default().timeout(Duration::from_millis(5)),
    )
    .unwrap();

    let out: Result<(), String> = monitor
        .invoke_async((), |()| async {
            tokio::time::sleep(Duration::from_millis(20)).await;
            Err("gave up".to_string())
        })
        .await;
    assert_err!(out);

    let states: Vec<_> = results.lock().unwrap().iter().map(|r| r.state).collect();
    assert_eq!(states, [MonitorableStatus::Timeout]);
}

#[tokio::test(start_paused = true)]
async fn concurrent_invocations_are_independent() {
    let (results, consumer) = consumer();
    let monitor = Monitorable::new(
        Target::method("Worker", "job"),
        consumer,
        MonitorableOptions::default().timeout_ms(30),
    )
    .unwrap();

    let run = |ms: u64| {
        monitor.invoke_async(ms, |ms| async move {
            tokio::time::sleep(Duration::from_millis(ms)).await;
            Ok::<_, String>(ms)
        })
    };
    let (fast, slow) = tokio::join!(run(10), run(60));
    assert_eq!(fast, Ok(10));
    assert_eq!(slow, Ok(60));

    let mut states: Vec<_> = results
        .lock()
        .unwrap()
        .iter()
        .map(|r| r.state.to_string())
        .collect();
    states.sort();
    assert_eq!(states, ["FINISHED", "TIMEOUT"]);
}

#[tokio::test(start_paused = true)]
async fn zero_timeout_arms_no_alarm() {
    let (results, consumer) = consumer();
    let monitor = Monitorable::new(
        Target::method("Test", "test"),
        consumer,
        MonitorableOptions::default().timeout_ms(0),
    )
    .unwrap();
    assert_eq!(monitor.timeout(), None);

    let out = monitor
        .invoke_async((), |()| async {
            tokio::time::sleep(Duration::from_secs(10)).await;
            Ok::<_, String>(())
        })
        .await;
    assert_ok!(out);

    let results = results.lock().unwrap();
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].state, MonitorableStatus::Finished);
    assert!(results[0].elapsed >= Duration::from_secs(10));
}

// ============================================================================
// Outcomes
// ============================================================================

#[tokio::test]
async fn async_rejection_reports_failed() {
    let (results, consumer) = consumer();
    let monitor =
        Monitorable::new(Target::method("Test", "test"), consumer, MonitorableOptions::default())
            .unwrap();

    let out: Result<u8, &str> = monitor.invoke_async((), |()| async { Err("rejected") }).await;
    assert_eq!(out, Err("rejected"));

    let results = results.lock().unwrap();
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].state, MonitorableStatus::Failed);
    assert_eq!(results[0].class_name, "Test");
    assert_eq!(results[0].method_name, "test");
}

#[test]
fn custom_monitor_name_is_reported() {
    let (results, consumer) = consumer();
    let monitor = Monitorable::new(
        Target::method("Test", "test"),
        consumer,
        MonitorableOptions::default().monitor_name("checkout"),
    )
    .unwrap();
    assert_eq!(monitor.monitor_name(), "checkout");

    assert_ok!(monitor.invoke(1, |n: i32| Ok::<_, String>(n + 1)));
    assert_eq!(results.lock().unwrap()[0].monitor_name, "checkout");
}

#[test]
fn misapplied_targets_are_rejected() {
    let (_, consumer) = consumer();
    let err = Monitorable::new(
        Target::detached("test"),
        consumer,
        MonitorableOptions::default(),
    )
    .unwrap_err();
    assert!(matches!(
        err,
        DecorateError::UnsupportedTarget {
            decorator: "Monitorable",
            ..
        }
    ));
}

#[test]
fn explicit_handle_allows_construction_outside_runtime() {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .start_paused(true)
        .build()
        .unwrap();
    let (results, consumer) = consumer();
    let monitor = Monitorable::with_handle(
        Target::method("Test", "test"),
        consumer,
        MonitorableOptions::default().timeout_ms(10),
        runtime.handle().clone(),
    )
    .unwrap();

    runtime.block_on(async {
        let out = monitor
            .invoke_async((), |()| async {
                tokio::time::sleep(Duration::from_millis(100)).await;
                Ok::<_, String>(())
            })
            .await;
        assert_ok!(out);
    });

    assert_eq!(results.lock().unwrap()[0].state, MonitorableStatus::Timeout);
}

// ============================================================================
// Start notifications
// ============================================================================

#[tokio::test]
async fn before_precedes_sync_outcome() {
    let (log, _, consumer) = consumer_with_before();
    let monitor =
        Monitorable::new(Target::method("Test", "test"), consumer, MonitorableOptions::default())
            .unwrap();

    assert_ok!(monitor.invoke((), |()| Ok::<_, String>(())));
    // Nothing is left to run later; the notification is not delivered twice.
    tokio::task::yield_now().await;
    tokio::task::yield_now().await;

    assert_eq!(
        *log.lock().unwrap(),
        [
            Seen::Before("Test::test".to_string()),
            Seen::Outcome(MonitorableStatus::Finished)
        ]
    );
}

#[tokio::test(start_paused = true)]
async fn before_is_deferred_for_async_methods() {
    let (log, results, consumer) = consumer_with_before();
    let monitor =
        Monitorable::new(Target::method("Test", "test"), consumer, MonitorableOptions::default())
            .unwrap();

    let pending = monitor.invoke_async((), |()| async {
        tokio::time::sleep(Duration::from_millis(10)).await;
        Ok::<_, String>(())
    });
    // Nothing is delivered at the call site.
    tokio::task::yield_now().await;
    assert!(log.lock().unwrap().is_empty());

    assert_ok!(pending.await);

    assert_eq!(
        *log.lock().unwrap(),
        [
            Seen::Before("Test::test".to_string()),
            Seen::Outcome(MonitorableStatus::Finished)
        ]
    );
    let results = results.lock().unwrap();
    assert!(results[0].finished_at >= results[0].started_at);
}

#[tokio::test(start_paused = true)]
async fn before_precedes_timeout() {
    let (log, _, consumer) = consumer_with_before();
    let monitor = Monitorable::new(
        Target::method("Test", "test"),
        consumer,
        MonitorableOptions::default().timeout_ms(1),
    )
    .unwrap();

    assert_ok!(
        monitor
            .invoke_async((), |()| async {
                tokio::time::sleep(Duration::from_millis(50)).await;
                Ok::<_, String>(())
            })
            .await
    );

    assert_eq!(
        *log.lock().unwrap(),
        [
            Seen::Before("Test::test".to_string()),
            Seen::Outcome(MonitorableStatus::Timeout)
        ]
    );
}

#[test]
fn before_callback_needs_no_runtime() {
    let (log, _, consumer) = consumer_with_before();
    let monitor =
        Monitorable::new(Target::method("Test", "test"), consumer, MonitorableOptions::default())
            .unwrap();

    assert_ok!(monitor.invoke((), |()| Ok::<_, String>(())));
    assert_eq!(
        *log.lock().unwrap(),
        [
            Seen::Before("Test::test".to_string()),
            Seen::Outcome(MonitorableStatus::Finished)
        ]
    );
}

#[test]
fn timeout_requires_runtime() {
    let (_, consumer) = consumer();
    let err = Monitorable::new(
        Target::method("Test", "test"),
        consumer,
        MonitorableOptions::default().timeout_ms(5),
    )
    .unwrap_err();
    assert_eq!(err, DecorateError::NoRuntime { decorator: "Monitorable" });
}

// ============================================================================
// Start notifications on a multi-thread runtime
// ============================================================================

fn traced_consumer(trace: &Arc<Mutex<Vec<String>>>) -> MonitorableConsumer {
    let (outcomes, befores) = (Arc::clone(trace), Arc::clone(trace));
    MonitorableConsumer::new(move |result| {
        outcomes.lock().unwrap().push(format!("outcome {}", result.state));
    })
    .with_before(move |_| befores.lock().unwrap().push("before".to_string()))
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn before_never_overlaps_sync_method_body() {
    let trace: Arc<Mutex<Vec<String>>> = Arc::default();
    let monitor = Monitorable::new(
        Target::method("Test", "blocking"),
        traced_consumer(&trace),
        MonitorableOptions::default(),
    )
    .unwrap();

    let body = Arc::clone(&trace);
    assert_ok!(monitor.invoke((), move |()| {
        body.lock().unwrap().push("method start".to_string());
        std::thread::sleep(Duration::from_millis(100));
        body.lock().unwrap().push("method end".to_string());
        Ok::<_, String>(())
    }));
    tokio::time::sleep(Duration::from_millis(50)).await;

    assert_eq!(
        *trace.lock().unwrap(),
        ["method start", "method end", "before", "outcome FINISHED"]
    );
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn before_runs_on_first_poll_of_async_method() {
    let trace: Arc<Mutex<Vec<String>>> = Arc::default();
    let monitor = Monitorable::new(
        Target::method("Test", "fetch"),
        traced_consumer(&trace),
        MonitorableOptions::default().timeout_ms(1_000),
    )
    .unwrap();

    let body = Arc::clone(&trace);
    let pending = monitor.invoke_async((), move |()| async move {
        body.lock().unwrap().push("method start".to_string());
        tokio::time::sleep(Duration::from_millis(20)).await;
        body.lock().unwrap().push("method end".to_string());
        Ok::<_, String>(())
    });
    std::thread::sleep(Duration::from_millis(50));
    trace.lock().unwrap().push("call site".to_string());

    assert_ok!(pending.await);

    assert_eq!(
        *trace.lock().unwrap(),
        [
            "call site",
            "before",
            "method start",
            "method end",
            "outcome FINISHED"
        ]
    );
}
