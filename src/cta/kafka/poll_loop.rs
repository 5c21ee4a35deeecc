//! Cooperative poll loop
//!
//! A consumer is driven by repeatedly calling [`drain_once`] until a step
//! makes no progress, then suspending on the tokio timer for the configured
//! interval. Every failure of a single record (transport error, undecodable
//! payload, handler error or panic) is logged and reported as a
//! [`DrainOutcome::Dropped`]; none of them escape the loop and the record is
//! never retried.

use super::kafka_error::{ConsumerError, KafkaClientError};
use super::message::ConsumedRecord;
use async_trait::async_trait;
use futures::FutureExt;
use log::{debug, error, info};
use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::time::Duration;
use tokio::sync::watch;

/// Error a handler may return for a record it could not process
pub type HandlerError = Box<dyn std::error::Error + Send + Sync>;

/// Receives every successfully polled record
#[async_trait]
pub trait RecordHandler: Send {
    async fn handle(&mut self, record: &ConsumedRecord) -> Result<(), HandlerError>;
}

/// Adapter turning a closure into a [`RecordHandler`]
pub struct FnHandler<F>(F);

/// Wrap a synchronous closure as a record handler
pub fn handler_fn<F>(f: F) -> FnHandler<F>
where
    F: FnMut(&ConsumedRecord) -> Result<(), HandlerError> + Send,
{
    FnHandler(f)
}

#[async_trait]
impl<F> RecordHandler for FnHandler<F>
where
    F: FnMut(&ConsumedRecord) -> Result<(), HandlerError> + Send,
{
    async fn handle(&mut self, record: &ConsumedRecord) -> Result<(), HandlerError> {
        (self.0)(record)
    }
}

/// Something that yields at most one record per bounded poll
#[async_trait]
pub trait PollSource: Send {
    /// Topic or pattern, for log lines
    fn label(&self) -> &str;

    /// `None` when nothing arrived within the poll timeout
    async fn poll(&mut self) -> Option<Result<ConsumedRecord, ConsumerError>>;

    /// Whether everything the source held when asked has been polled.
    /// Sources without a known end are always caught up.
    fn caught_up(&self) -> Result<bool, ConsumerError> {
        Ok(true)
    }
}

/// Why a record was dropped
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DropReason {
    /// The client reported an error instead of a message
    Transport(String),
    /// The payload could not be decoded
    Deserialization(String),
    /// The handler returned an error or panicked
    Handler(String),
}

/// Result of a single drain step
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DrainOutcome {
    Processed,
    Idle,
    Dropped(DropReason),
}

impl DrainOutcome {
    /// Only a handled record counts as progress
    pub fn made_progress(&self) -> bool {
        matches!(self, DrainOutcome::Processed)
    }
}

/// Counters of a finished [`run_poll_loop`]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConsumeStats {
    pub processed: u64,
    pub dropped: u64,
    /// Number of times the loop suspended for the idle interval
    pub idle_cycles: u64,
}

impl ConsumeStats {
    fn record(&mut self, outcome: &DrainOutcome) {
        match outcome {
            DrainOutcome::Processed => self.processed += 1,
            DrainOutcome::Dropped(_) => self.dropped += 1,
            DrainOutcome::Idle => {}
        }
    }
}

/// Poll once and hand the record, if any, to `handler`
pub async fn drain_once<S, H>(source: &mut S, handler: &mut H) -> DrainOutcome
where
    S: PollSource + ?Sized,
    H: RecordHandler + ?Sized,
{
    let record = match source.poll().await {
        None => return DrainOutcome::Idle,
        Some(Ok(record)) => record,
        Some(Err(KafkaClientError::SerializationError(e))) => {
            error!(
                "Failed deserialization. topic and error: {}, {}",
                source.label(),
                e
            );
            return DrainOutcome::Dropped(DropReason::Deserialization(e.to_string()));
        }
        Some(Err(KafkaClientError::Schema(e))) => {
            error!(
                "Failed deserialization. topic and error: {}, {}",
                source.label(),
                e
            );
            return DrainOutcome::Dropped(DropReason::Deserialization(e.to_string()));
        }
        Some(Err(e)) => {
            error!("Message error. topic and error: {}, {}", source.label(), e);
            return DrainOutcome::Dropped(DropReason::Transport(e.to_string()));
        }
    };

    match AssertUnwindSafe(handler.handle(&record)).catch_unwind().await {
        Ok(Ok(())) => DrainOutcome::Processed,
        Ok(Err(e)) => {
            error!(
                "Processing error. topic {} partition {} offset {}: {}",
                record.topic, record.partition, record.offset, e
            );
            DrainOutcome::Dropped(DropReason::Handler(e.to_string()))
        }
        Err(panic) => {
            let message = panic_message(panic.as_ref());
            error!(
                "Handler panicked. topic {} partition {} offset {}: {}",
                record.topic, record.partition, record.offset, message
            );
            DrainOutcome::Dropped(DropReason::Handler(message))
        }
    }
}

fn panic_message(panic: &(dyn Any + Send)) -> String {
    if let Some(s) = panic.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else {
        "handler panicked".to_string()
    }
}

/// Drain until no progress, sleep `interval`, repeat until `stop` fires
pub async fn run_poll_loop<S, H>(
    source: &mut S,
    handler: &mut H,
    interval: Duration,
    mut stop: StopSignal,
) -> ConsumeStats
where
    S: PollSource + ?Sized,
    H: RecordHandler + ?Sized,
{
    let mut stats = ConsumeStats::default();
    debug!("Poll loop started for {}", source.label());

    'cycles: while !stop.is_stopped() {
        loop {
            let outcome = drain_once(source, handler).await;
            stats.record(&outcome);
            if !outcome.made_progress() {
                break;
            }
            if stop.is_stopped() {
                break 'cycles;
            }
        }

        stats.idle_cycles += 1;
        tokio::select! {
            _ = tokio::time::sleep(interval) => {}
            _ = stop.stopped() => break,
        }
    }

    info!(
        "Poll loop stopped for {}: {} processed, {} dropped, {} idle cycles",
        source.label(),
        stats.processed,
        stats.dropped,
        stats.idle_cycles
    );
    stats
}

/// Owner side of a stop signal
#[derive(Debug)]
pub struct StopHandle {
    tx: watch::Sender<bool>,
}

/// Observer side of a stop signal; dropping every [`StopHandle`] also stops
#[derive(Debug, Clone)]
pub struct StopSignal {
    rx: watch::Receiver<bool>,
}

/// Create a connected stop handle and signal
pub fn stop_channel() -> (StopHandle, StopSignal) {
    let (tx, rx) = watch::channel(false);
    (StopHandle { tx }, StopSignal { rx })
}

impl StopHandle {
    pub fn stop(&self) {
        let _ = self.tx.send(true);
    }

    /// Another signal observing this handle
    pub fn signal(&self) -> StopSignal {
        StopSignal {
            rx: self.tx.subscribe(),
        }
    }
}

impl StopSignal {
    pub fn is_stopped(&self) -> bool {
        *self.rx.borrow() || self.rx.has_changed().is_err()
    }

    /// Resolves once the handle stops or is dropped
    pub async fn stopped(&mut self) {
        let _ = self.rx.wait_for(|stopped| *stopped).await;
    }
}
