//! `demo` command: a sample calculator with instrumented methods.
//!
//! Every method is both logged and monitored. Log lines go to the
//! configured sink as they happen; monitor outcomes are collected and
//! printed as JSON lines on stdout once the run completes.

use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use thiserror::Error;

use crate::cli::args::DemoArgs;
use crate::config::{InstrumentConfig, TIMEOUT_ENV, apply_env_overrides, load_config};
use crate::error::DecorableError;
use crate::loggable::{LineSink, Loggable};
use crate::monitorable::{Monitorable, MonitorableConsumer, MonitorableResult};
use crate::wrap::Target;

const CLASS: &str = "Calculator";

/// Errors raised by the sample calculator.
#[derive(Debug, Error)]
pub enum CalcError {
    /// Division with a zero divisor.
    #[error("division by zero")]
    DivideByZero,
}

type Outcomes = Arc<Mutex<Vec<MonitorableResult>>>;

struct Calculator {
    add_log: Loggable<(i64, i64), i64, CalcError>,
    add_monitor: Monitorable,
    divide_log: Loggable<(i64, i64), i64, CalcError>,
    divide_monitor: Monitorable,
    square_log: Loggable<i64, i64, CalcError>,
    square_monitor: Monitorable,
    delay: Duration,
}

impl Calculator {
    fn new(
        config: &InstrumentConfig,
        consumer: &MonitorableConsumer,
        delay: Duration,
    ) -> Result<Self, DecorableError> {
        let monitor = |method: &str| {
            Monitorable::new(
                Target::method(CLASS, method),
                consumer.clone(),
                config.monitor_options(CLASS, method),
            )
        };
        Ok(Self {
            add_log: logged(config, "add")?,
            add_monitor: monitor("add")?,
            divide_log: logged(config, "divide")?,
            divide_monitor: monitor("divide")?,
            square_log: logged(config, "slow_square")?,
            square_monitor: monitor("slow_square")?,
            delay,
        })
    }

    fn add(&self, a: i64, b: i64) -> Result<i64, CalcError> {
        self.add_monitor.invoke((a, b), |args| {
            self.add_log.invoke(args, |(a, b)| Ok(a + b))
        })
    }

    fn divide(&self, a: i64, b: i64) -> Result<i64, CalcError> {
        self.divide_monitor.invoke((a, b), |args| {
            self.divide_log.invoke(args, |(a, b)| {
                if b == 0 {
                    Err(CalcError::DivideByZero)
                } else {
                    Ok(a / b)
                }
            })
        })
    }

    async fn slow_square(&self, n: i64) -> Result<i64, CalcError> {
        let delay = self.delay;
        self.square_monitor
            .invoke_async(n, |n| {
                self.square_log.invoke_async(n, |n| async move {
                    tokio::time::sleep(delay).await;
                    Ok(n * n)
                })
            })
            .await
    }
}

fn logged<A, T>(
    config: &InstrumentConfig,
    method: &str,
) -> Result<Loggable<A, T, CalcError>, DecorableError>
where
    A: serde::Serialize + std::fmt::Debug + 'static,
    T: serde::Serialize + std::fmt::Debug + 'static,
{
    Ok(
        Loggable::with_sink(Target::method(CLASS, method), LineSink::from(config.logging.sink))?
            .with_token_length(config.logging.token_length),
    )
}

fn resolve_config(args: &DemoArgs) -> Result<InstrumentConfig, DecorableError> {
    let mut config = match &args.config {
        Some(path) => load_config(path)?,
        None => {
            let mut config = InstrumentConfig::default();
            apply_env_overrides(&mut config, std::env::var(TIMEOUT_ENV).ok().as_deref())?;
            config
        }
    };
    if let Some(timeout) = args.timeout {
        config.default_timeout = Some(timeout);
    }
    if let Some(sink) = args.sink {
        config.logging.sink = sink;
    }
    Ok(config)
}

/// Run the sample calculator and print each monitor outcome.
///
/// # Errors
///
/// Returns an error if the configuration cannot be loaded or an outcome
/// cannot be serialized.
pub async fn run(args: &DemoArgs) -> Result<(), DecorableError> {
    let config = resolve_config(args)?;
    let outcomes: Outcomes = Arc::default();
    let sink = Arc::clone(&outcomes);
    let consumer = MonitorableConsumer::new(move |result| {
        sink.lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(result);
    })
    .with_before(|data| {
        tracing::info!(monitor = %data.monitor_name, "monitored call started");
    });

    let calculator = Calculator::new(&config, &consumer, args.delay)?;

    let sum = calculator.add(2, 3);
    tracing::info!(?sum, "add finished");
    let quotient = calculator.divide(6, 3);
    tracing::info!(?quotient, "divide finished");
    if let Err(e) = calculator.divide(1, 0) {
        tracing::info!(error = %e, "divide failed as expected");
    }
    let square = calculator.slow_square(7).await;
    tracing::info!(?square, "slow_square finished");

    let outcomes = std::mem::take(&mut *outcomes.lock().unwrap_or_else(PoisonError::into_inner));
    for outcome in &outcomes {
        println!("{}", serde_json::to_string(outcome)?);
    }
    Ok(())
}
